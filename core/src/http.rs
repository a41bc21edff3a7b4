//! Wire types and the transport boundary for the host-does-IO pattern.
//!
//! # Design
//! These types describe the HTTP exchange as plain data. The core crate
//! builds `WireRequest` values and classifies `WireResponse` values without
//! ever touching the network — the caller (host) implements [`Transport`]
//! and is responsible for executing the actual I/O. Every Pushwoosh
//! operation is a JSON POST, so a request is fully described by its target
//! URI and body.
//!
//! All fields use owned types so values can be moved freely between the
//! builder, the transport, and test harnesses.

use serde_json::Value;

use crate::error::TransportError;

/// An HTTP request to the Pushwoosh API described as plain data.
///
/// Built by `PushwooshClient::build_*` methods. The body is the complete
/// `{"request": {...}}` envelope, ready to be JSON-encoded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    /// Remote operation name, e.g. `createMessage`.
    pub operation: String,
    /// Full POST target: `{host}/{api_version}/{operation}`.
    pub uri: String,
    /// JSON envelope to send.
    pub body: Value,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing a [`WireRequest`], then
/// handed to [`crate::response::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

/// The consumed HTTP capability: POST a JSON body, get back status + body.
///
/// The core ships no implementation. Integration tests back this with a
/// blocking HTTP client; production callers plug in whatever stack they
/// already run. A transport may apply its own timeout but must not retry —
/// the service's idempotency for repeated sends is unspecified.
pub trait Transport {
    fn post(&self, request: &WireRequest) -> Result<WireResponse, TransportError>;
}
