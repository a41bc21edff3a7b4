//! Configuration and per-operation input types.
//!
//! # Design
//! Inputs the service accepts as loosely-typed option objects are records
//! with named fields here; requiredness that cannot be expressed in the
//! type (e.g. a device registration missing its `device_type`) is enforced
//! by `build_*` validation so the failure names the exact field.
//! Heterogeneous payload pieces — notification extras, tag values — stay
//! `serde_json` maps because the service accepts arbitrary fields there and
//! the client passes them through verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Production endpoint of the Pushwoosh JSON API.
pub const DEFAULT_HOST: &str = "https://cp.pushwoosh.com/json";

/// API version segment used when none is configured.
pub const DEFAULT_API_VERSION: &str = "1.3";

/// Recognized construction options for [`crate::PushwooshClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub host: String,
    pub api_version: String,
    /// Address a group of applications instead of a single one: requests
    /// carry `applications_group` where they would carry `application`.
    pub use_applications_group: bool,
    /// When `false`, a send with no devices fails validation instead of
    /// broadcasting to every registered device.
    pub should_send_to_all_devices: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_applications_group: false,
            should_send_to_all_devices: true,
        }
    }
}

/// Recipients and extra notification fields for a send-message call.
///
/// The default value broadcasts (no `devices` field in the wire body, no
/// extras). Extra fields are merged into the notification key-by-key after
/// the computed defaults, so a caller-supplied `send_date` or
/// `ignore_user_timezone` wins; unknown keys pass through to the wire
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub devices: Vec<String>,
    pub extra: Map<String, Value>,
}

impl MessageOptions {
    /// Target a single device token.
    pub fn to_device(device: impl Into<String>) -> Self {
        Self {
            devices: vec![device.into()],
            ..Self::default()
        }
    }

    /// Target an ordered list of device tokens. Order is preserved on the
    /// wire exactly as given.
    pub fn to_devices<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            devices: devices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add an extra notification field, overriding any computed default
    /// with the same name.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Fields for a `registerDevice` call.
///
/// `push_token`, `hwid` and `device_type` are required by the service;
/// they are optional here so validation can name the missing field the way
/// the API contract does, instead of failing on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hwid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl DeviceRegistration {
    pub fn new(
        push_token: impl Into<String>,
        hwid: impl Into<String>,
        device_type: u32,
    ) -> Self {
        Self {
            push_token: Some(push_token.into()),
            hwid: Some(hwid.into()),
            device_type: Some(device_type),
            timezone: None,
            language: None,
        }
    }
}

/// Tags to assign to a device in a `setTags` call.
///
/// Tag values may be strings, numbers, booleans, or lists of primitives;
/// the service defines the vocabulary, the client passes values through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub hwid: String,
    pub tags: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
