//! Client core for the Pushwoosh remote push-notification API.
//!
//! # Overview
//! Builds `WireRequest` values and classifies `WireResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip through a [`Transport`] implementation, making the
//! core fully deterministic and testable.
//!
//! # Design
//! - `PushwooshClient` is stateless — it holds only the immutable account
//!   configuration and is safe to share across concurrent calls.
//! - Each remote operation is split into a `build_*` method (validates
//!   arguments, produces the JSON envelope) and the shared [`classify`]
//!   function (maps HTTP status + response envelope to a result), so the
//!   I/O boundary is explicit.
//! - Argument validation always fails before the transport is invoked.
//! - Service-level argument errors (status_code 210 under HTTP 200) are a
//!   *success* value, [`ApiResponse::ArgumentError`] — the upstream protocol
//!   does not treat them as failures and neither does this crate.

pub mod client;
pub mod error;
pub mod http;
pub mod response;
pub mod types;

pub use client::PushwooshClient;
pub use error::{Error, TransportError};
pub use http::{Transport, WireRequest, WireResponse};
pub use response::{classify, ApiResponse, ArgumentError};
pub use types::{
    ClientOptions, DeviceRegistration, MessageOptions, TagSet, DEFAULT_API_VERSION, DEFAULT_HOST,
};
