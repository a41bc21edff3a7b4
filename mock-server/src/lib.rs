//! In-memory stand-in for the Pushwoosh JSON API.
//!
//! Implements the `POST /json/{version}/{operation}` surface with the
//! service's response envelope (`status_code` / `status_message` /
//! `response`). Service-level validation failures come back as HTTP 200
//! with `status_code` 210, mirroring the real endpoint. Two escape hatches
//! exist for exercising the transport-level error paths: a request whose
//! envelope lacks the top-level `request` key gets HTTP 400, and any
//! request addressing the reserved hwid [`INTERNAL_ERROR_HWID`] gets
//! HTTP 500.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Requests addressing this hwid are answered with HTTP 500.
pub const INTERNAL_ERROR_HWID: &str = "hwid-500";

/// A registered device and its tags.
#[derive(Clone, Debug, Default)]
pub struct Device {
    pub push_token: String,
    pub device_type: u64,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub tags: Map<String, Value>,
}

pub type Registry = Arc<RwLock<HashMap<String, Device>>>;

/// Response envelope of the emulated service.
#[derive(Debug, Serialize)]
pub struct ServiceReply {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

pub fn app() -> Router {
    let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/json/{version}/{operation}", post(dispatch))
        .with_state(registry)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Reply = (StatusCode, Json<ServiceReply>);

fn ok(response: Value) -> Reply {
    (
        StatusCode::OK,
        Json(ServiceReply {
            status_code: 200,
            status_message: Some("OK".to_string()),
            response: Some(response),
        }),
    )
}

fn argument_error(message: &str) -> Reply {
    (
        StatusCode::OK,
        Json(ServiceReply {
            status_code: 210,
            status_message: Some(message.to_string()),
            response: None,
        }),
    )
}

fn http_error(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(ServiceReply {
            status_code: status.as_u16(),
            status_message: Some(message.to_string()),
            response: None,
        }),
    )
}

async fn dispatch(
    State(registry): State<Registry>,
    Path((_version, operation)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    debug!(%operation, "pushwoosh request");

    let Some(request) = body.get("request") else {
        return http_error(StatusCode::BAD_REQUEST, "Malformed request string");
    };
    if request.get("hwid").and_then(Value::as_str) == Some(INTERNAL_ERROR_HWID) {
        return http_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error");
    }

    match operation.as_str() {
        "createMessage" => create_message(&registry, request).await,
        "createTargetedMessage" => create_targeted_message(request),
        "deleteMessage" => delete_message(request),
        "registerDevice" => register_device(&registry, request).await,
        "unregisterDevice" => unregister_device(&registry, request).await,
        "setTags" => set_tags(&registry, request).await,
        "getTags" => get_tags(&registry, request).await,
        _ => http_error(StatusCode::NOT_FOUND, "Unknown operation"),
    }
}

fn str_field<'a>(request: &'a Value, key: &str) -> Option<&'a str> {
    request.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `auth` plus one of `application` / `applications_group`.
fn check_credentials(request: &Value) -> Option<Reply> {
    if str_field(request, "auth").is_none() {
        return Some(argument_error("auth is required"));
    }
    if str_field(request, "application").is_none()
        && str_field(request, "applications_group").is_none()
    {
        return Some(argument_error("application is required"));
    }
    None
}

async fn create_message(registry: &Registry, request: &Value) -> Reply {
    if let Some(reply) = check_credentials(request) {
        return reply;
    }
    let Some(notifications) = request.get("notifications").and_then(Value::as_array) else {
        return argument_error("notifications are required");
    };
    let mut codes = Vec::with_capacity(notifications.len());
    for notification in notifications {
        if str_field(notification, "content").is_none() {
            return argument_error("Notification content must not be empty");
        }
        if let Some(devices) = notification.get("devices").and_then(Value::as_array) {
            let known = registry.read().await;
            let reachable = devices
                .iter()
                .filter_map(Value::as_str)
                .any(|hwid| known.contains_key(hwid));
            if !reachable {
                return argument_error("No recipients among the listed devices");
            }
        }
        codes.push(json!(Uuid::new_v4().to_string()));
    }
    ok(json!({"Messages": codes}))
}

fn create_targeted_message(request: &Value) -> Reply {
    if str_field(request, "auth").is_none() {
        return argument_error("auth is required");
    }
    if str_field(request, "devices_filter").is_none() {
        return argument_error("devices_filter is required");
    }
    if str_field(request, "content").is_none() {
        return argument_error("Notification content must not be empty");
    }
    ok(json!({"MessageCode": Uuid::new_v4().to_string()}))
}

fn delete_message(request: &Value) -> Reply {
    if str_field(request, "auth").is_none() {
        return argument_error("auth is required");
    }
    if str_field(request, "message").is_none() {
        return argument_error("message code is required");
    }
    ok(json!({}))
}

async fn register_device(registry: &Registry, request: &Value) -> Reply {
    if str_field(request, "application").is_none() {
        return argument_error("application is required");
    }
    let Some(push_token) = str_field(request, "push_token") else {
        return argument_error("push_token is required");
    };
    let Some(hwid) = str_field(request, "hwid") else {
        return argument_error("hwid is required");
    };
    let Some(device_type) = request.get("device_type").and_then(Value::as_u64) else {
        return argument_error("device_type is required");
    };

    let device = Device {
        push_token: push_token.to_string(),
        device_type,
        timezone: str_field(request, "timezone").map(str::to_string),
        language: str_field(request, "language").map(str::to_string),
        tags: Map::new(),
    };
    registry.write().await.insert(hwid.to_string(), device);
    ok(json!({}))
}

async fn unregister_device(registry: &Registry, request: &Value) -> Reply {
    let Some(hwid) = str_field(request, "hwid") else {
        return argument_error("hwid is required");
    };
    match registry.write().await.remove(hwid) {
        Some(_) => ok(json!({})),
        None => argument_error("Device not found"),
    }
}

async fn set_tags(registry: &Registry, request: &Value) -> Reply {
    let Some(hwid) = str_field(request, "hwid") else {
        return argument_error("hwid is required");
    };
    let Some(tags) = request.get("tags").and_then(Value::as_object) else {
        return argument_error("tags are required");
    };
    let mut registry = registry.write().await;
    let Some(device) = registry.get_mut(hwid) else {
        return argument_error("Device not found");
    };
    for (key, value) in tags {
        device.tags.insert(key.clone(), value.clone());
    }
    ok(json!({}))
}

async fn get_tags(registry: &Registry, request: &Value) -> Reply {
    let Some(hwid) = str_field(request, "hwid") else {
        return argument_error("hwid is required");
    };
    match registry.read().await.get(hwid) {
        Some(device) => ok(json!({"result": device.tags})),
        None => argument_error("Device not found"),
    }
}
