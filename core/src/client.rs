//! Stateless request builder and operation surface for the Pushwoosh API.
//!
//! # Design
//! `PushwooshClient` holds only the immutable account configuration and
//! carries no mutable state between calls. Each remote operation is split
//! into a `build_*` method that validates arguments and produces a
//! [`WireRequest`], and the shared [`classify`] step that consumes the
//! [`crate::WireResponse`]. The high-level methods (`send_message`, …)
//! compose the two around a caller-supplied [`Transport`], so the core
//! stays deterministic and free of I/O dependencies.
//!
//! Validation always runs first: a request that fails to build never
//! reaches the transport.

use serde_json::{json, Map, Value};

use crate::error::Error;
use crate::http::{Transport, WireRequest};
use crate::response::{classify, ApiResponse};
use crate::types::{ClientOptions, DeviceRegistration, MessageOptions, TagSet};

const CREATE_MESSAGE: &str = "createMessage";
const CREATE_TARGETED_MESSAGE: &str = "createTargetedMessage";
const DELETE_MESSAGE: &str = "deleteMessage";
const REGISTER_DEVICE: &str = "registerDevice";
const UNREGISTER_DEVICE: &str = "unregisterDevice";
const SET_TAGS: &str = "setTags";
const GET_TAGS: &str = "getTags";

/// Keys a targeted message refuses in its extras: they either address the
/// message some other way or belong to the client configuration.
const TARGETED_MESSAGE_FORBIDDEN_KEYS: [&str; 6] = [
    "application",
    "applications_group",
    "platforms",
    "devices",
    "filter",
    "conditions",
];

/// Immutable client for the Pushwoosh JSON API.
///
/// Construct once and reuse; all methods take `&self` and the client is
/// safe to share across threads. No retries, timeouts, or logging happen
/// here — every outcome surfaces to the caller.
#[derive(Debug, Clone)]
pub struct PushwooshClient {
    app_code: String,
    auth_token: String,
    host: String,
    api_version: String,
    use_applications_group: bool,
    should_send_to_all_devices: bool,
}

impl PushwooshClient {
    /// Create a client with default [`ClientOptions`].
    pub fn new(app_code: &str, auth_token: &str) -> Result<Self, Error> {
        Self::with_options(app_code, auth_token, ClientOptions::default())
    }

    /// Create a client against a specific host/version or identifier mode.
    ///
    /// `app_code` is the application identifier, or the applications-group
    /// identifier when `options.use_applications_group` is set.
    pub fn with_options(
        app_code: &str,
        auth_token: &str,
        options: ClientOptions,
    ) -> Result<Self, Error> {
        if app_code.is_empty() || auth_token.is_empty() {
            return Err(Error::Validation(
                "Application ID and Authentication Token from Pushwoosh must be provided"
                    .to_string(),
            ));
        }
        Ok(Self {
            app_code: app_code.to_string(),
            auth_token: auth_token.to_string(),
            host: options.host.trim_end_matches('/').to_string(),
            api_version: options.api_version,
            use_applications_group: options.use_applications_group,
            should_send_to_all_devices: options.should_send_to_all_devices,
        })
    }

    pub fn app_code(&self) -> &str {
        &self.app_code
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn use_applications_group(&self) -> bool {
        self.use_applications_group
    }

    // ------------------------------------------------------------------
    // Request builders
    // ------------------------------------------------------------------

    /// Build a `createMessage` request.
    ///
    /// The notification starts from the computed defaults (`send_date:
    /// "now"`, `ignore_user_timezone: true`, the message content, and the
    /// devices list when one was given), then `options.extra` is applied
    /// key-by-key on top — the caller wins, and unknown keys pass through
    /// to the wire verbatim.
    pub fn build_send_message(
        &self,
        message: &str,
        options: &MessageOptions,
    ) -> Result<WireRequest, Error> {
        if message.is_empty() {
            return Err(Error::Validation("Message has to be provided".to_string()));
        }

        let mut notification = Map::new();
        notification.insert("send_date".to_string(), json!("now"));
        notification.insert("ignore_user_timezone".to_string(), json!(true));
        notification.insert("content".to_string(), json!(message));
        if !options.devices.is_empty() {
            notification.insert("devices".to_string(), json!(options.devices));
        }
        for (key, value) in &options.extra {
            notification.insert(key.clone(), value.clone());
        }

        if !self.should_send_to_all_devices && !has_devices(&notification) {
            return Err(Error::Validation(
                "No devices specified while the client is configured to require explicit devices"
                    .to_string(),
            ));
        }

        let mut payload = Map::new();
        payload.insert(self.application_key().to_string(), json!(self.app_code));
        payload.insert("auth".to_string(), json!(self.auth_token));
        payload.insert("notifications".to_string(), json!([notification]));
        Ok(self.wire(CREATE_MESSAGE, payload))
    }

    /// Build a `createTargetedMessage` request.
    ///
    /// Targeted messages address recipients through `devices_filter`
    /// exclusively, so extras naming another addressing mechanism (or the
    /// client's own identifiers) are rejected up front. Extras merge into
    /// the request envelope itself, not into a notifications list; `auth`
    /// is applied last and cannot be overridden.
    pub fn build_send_targeted_message(
        &self,
        message: &str,
        devices_filter: &str,
        extra: &Map<String, Value>,
    ) -> Result<WireRequest, Error> {
        if message.is_empty() {
            return Err(Error::Validation("Message has to be provided".to_string()));
        }
        for key in TARGETED_MESSAGE_FORBIDDEN_KEYS {
            if extra.contains_key(key) {
                return Err(Error::Validation(format!(
                    "Parameter {key} is not allowed in a targeted message"
                )));
            }
        }
        if devices_filter.is_empty() {
            return Err(Error::Validation("Devices filter must be provided".to_string()));
        }

        let mut payload = Map::new();
        payload.insert("send_date".to_string(), json!("now"));
        payload.insert("content".to_string(), json!(message));
        for (key, value) in extra {
            payload.insert(key.clone(), value.clone());
        }
        payload.insert("devices_filter".to_string(), json!(devices_filter));
        payload.insert("auth".to_string(), json!(self.auth_token));
        Ok(self.wire(CREATE_TARGETED_MESSAGE, payload))
    }

    /// Build a `deleteMessage` request. Carries `auth` and the message
    /// code only — no application identifier.
    pub fn build_delete_message(&self, message_code: &str) -> Result<WireRequest, Error> {
        if message_code.is_empty() {
            return Err(Error::Validation("Message code must be provided".to_string()));
        }
        let mut payload = Map::new();
        payload.insert("auth".to_string(), json!(self.auth_token));
        payload.insert("message".to_string(), json!(message_code));
        Ok(self.wire(DELETE_MESSAGE, payload))
    }

    /// Build a `registerDevice` request. Each required field is checked
    /// separately so the error names what is missing.
    pub fn build_register_device(
        &self,
        registration: &DeviceRegistration,
    ) -> Result<WireRequest, Error> {
        let push_token = require_str(
            registration.push_token.as_deref(),
            "Device push token must be provided",
        )?;
        let hwid = require_str(registration.hwid.as_deref(), "Device hwid must be provided")?;
        let device_type = registration
            .device_type
            .ok_or_else(|| Error::Validation("Device type must be provided".to_string()))?;

        let mut payload = Map::new();
        payload.insert("application".to_string(), json!(self.app_code));
        payload.insert("push_token".to_string(), json!(push_token));
        payload.insert("hwid".to_string(), json!(hwid));
        payload.insert("device_type".to_string(), json!(device_type));
        if let Some(timezone) = &registration.timezone {
            payload.insert("timezone".to_string(), json!(timezone));
        }
        if let Some(language) = &registration.language {
            payload.insert("language".to_string(), json!(language));
        }
        Ok(self.wire(REGISTER_DEVICE, payload))
    }

    /// Build an `unregisterDevice` request.
    pub fn build_unregister_device(&self, hwid: &str) -> Result<WireRequest, Error> {
        let payload = self.device_payload(hwid)?;
        Ok(self.wire(UNREGISTER_DEVICE, payload))
    }

    /// Build a `setTags` request.
    pub fn build_set_tags(&self, tags: &TagSet) -> Result<WireRequest, Error> {
        let mut payload = self.device_payload(&tags.hwid)?;
        if tags.tags.is_empty() {
            return Err(Error::Validation("Tags must be provided".to_string()));
        }
        payload.insert("tags".to_string(), Value::Object(tags.tags.clone()));
        if let Some(user_id) = &tags.user_id {
            payload.insert("user_id".to_string(), json!(user_id));
        }
        Ok(self.wire(SET_TAGS, payload))
    }

    /// Build a `getTags` request.
    pub fn build_get_tags(&self, hwid: &str) -> Result<WireRequest, Error> {
        let payload = self.device_payload(hwid)?;
        Ok(self.wire(GET_TAGS, payload))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Execute an already-built request: one POST, one classification.
    pub fn execute<T: Transport>(
        &self,
        transport: &T,
        request: &WireRequest,
    ) -> Result<ApiResponse, Error> {
        let response = transport.post(request)?;
        classify(response.status, &response.body)
    }

    /// Send a push message to the devices in `options`, or to all devices
    /// when none are given and the client allows broadcasting.
    pub fn send_message<T: Transport>(
        &self,
        transport: &T,
        message: &str,
        options: &MessageOptions,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_send_message(message, options)?;
        self.execute(transport, &request)
    }

    /// Send a message to the devices selected by a filter expression.
    pub fn send_targeted_message<T: Transport>(
        &self,
        transport: &T,
        message: &str,
        devices_filter: &str,
        extra: &Map<String, Value>,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_send_targeted_message(message, devices_filter, extra)?;
        self.execute(transport, &request)
    }

    /// Delete a previously created message by its message code.
    pub fn delete_message<T: Transport>(
        &self,
        transport: &T,
        message_code: &str,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_delete_message(message_code)?;
        self.execute(transport, &request)
    }

    /// Register a device for push delivery.
    pub fn register_device<T: Transport>(
        &self,
        transport: &T,
        registration: &DeviceRegistration,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_register_device(registration)?;
        self.execute(transport, &request)
    }

    /// Remove a device registration.
    pub fn unregister_device<T: Transport>(
        &self,
        transport: &T,
        hwid: &str,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_unregister_device(hwid)?;
        self.execute(transport, &request)
    }

    /// Assign tags to a device.
    pub fn set_tags<T: Transport>(
        &self,
        transport: &T,
        tags: &TagSet,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_set_tags(tags)?;
        self.execute(transport, &request)
    }

    /// Read the tags currently assigned to a device.
    pub fn get_tags<T: Transport>(&self, transport: &T, hwid: &str) -> Result<ApiResponse, Error> {
        let request = self.build_get_tags(hwid)?;
        self.execute(transport, &request)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn application_key(&self) -> &'static str {
        if self.use_applications_group {
            "applications_group"
        } else {
            "application"
        }
    }

    /// Common `{application, hwid}` payload of the device-addressed
    /// operations. These authenticate by application code alone.
    fn device_payload(&self, hwid: &str) -> Result<Map<String, Value>, Error> {
        if hwid.is_empty() {
            return Err(Error::Validation("Device hwid must be provided".to_string()));
        }
        let mut payload = Map::new();
        payload.insert("application".to_string(), json!(self.app_code));
        payload.insert("hwid".to_string(), json!(hwid));
        Ok(payload)
    }

    fn wire(&self, operation: &str, payload: Map<String, Value>) -> WireRequest {
        WireRequest {
            operation: operation.to_string(),
            uri: format!("{}/{}/{}", self.host, self.api_version, operation),
            body: json!({ "request": payload }),
        }
    }
}

/// Whether the merged notification addresses at least one device. Extras
/// may have replaced the computed `devices` list, so the merged map is
/// what gets checked.
fn has_devices(notification: &Map<String, Value>) -> bool {
    match notification.get("devices") {
        Some(Value::Array(devices)) => !devices.is_empty(),
        Some(_) => true,
        None => false,
    }
}

fn require_str<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Validation(message.to_string())),
    }
}
