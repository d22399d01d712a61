//! Failure talking to an external service.

use thiserror::Error;

/// A call to an external API could not produce a usable answer.
///
/// Always retryable on the next scheduled attempt and never a definitive
/// negative result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network failure or timeout.
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: &'static str, reason: String },

    /// The response did not have the expected shape.
    #[error("{service} returned a malformed response: {reason}")]
    MalformedResponse { service: &'static str, reason: String },

    /// The service answered with a non-success HTTP status.
    #[error("{service} responded with HTTP {status}")]
    Status { service: &'static str, status: u16 },
}

impl TransportError {
    /// Map a reqwest error, keeping HTTP status and decode errors distinct.
    #[must_use]
    pub fn from_reqwest(service: &'static str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Status {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                service,
                reason: err.to_string(),
            }
        } else {
            Self::Unavailable {
                service,
                reason: err.to_string(),
            }
        }
    }

    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. }
            | Self::MalformedResponse { service, .. }
            | Self::Status { service, .. } => service,
        }
    }
}
