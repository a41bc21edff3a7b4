//! Error types for the Pushwoosh client core.
//!
//! # Design
//! A closed set of variants matched by kind, not by downcasting. `Internal`
//! and `Malformed` carry the fixed message and code the service documents
//! for HTTP 500 and 400. Service-level argument errors (200/210) are *not*
//! here — the upstream protocol reports them on the success channel, as
//! [`crate::response::ApiResponse::ArgumentError`].

use thiserror::Error;

/// Failure reported by a [`crate::http::Transport`] implementation.
///
/// Opaque to the core: whatever the transport reports is carried through to
/// the caller unchanged, never classified or retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors surfaced by `PushwooshClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required argument was missing, empty, or not allowed. Raised
    /// before any network I/O; always caller-fixable.
    #[error("{0}")]
    Validation(String),

    /// The transport failed to complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered HTTP 500.
    #[error("Internal Error From Pushwoosh")]
    Internal,

    /// The service answered HTTP 400 — it could not parse the request.
    #[error("Malformed request string")]
    Malformed,

    /// A status/body combination outside the classification table.
    #[error("Unknown response code / error")]
    Unknown,
}

impl Error {
    /// Fixed numeric code for the service-mapped variants.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Internal => Some(500),
            Error::Malformed => Some(400),
            _ => None,
        }
    }
}
