use reqwest::StatusCode;
use thiserror::Error;

/// Failures produced by [`crate::client::WeatherService`] implementations.
///
/// This is the only typed error surface in the crate: the orchestration
/// layers above the client translate every variant into user-facing state
/// and never let one of these escape to a presentation collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The query cannot be used to build a request (e.g. it is empty).
    #[error("invalid query: {0}")]
    Validation(String),

    /// Transport-level failure, including no connectivity.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a status outside the 200-299 range.
    #[error("provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body does not match the expected shape.
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True for the "no connectivity" flavor of [`ClientError::Network`].
    ///
    /// Callers use this to pick a connection-specific user message over the
    /// generic one; everything else about the variants stays opaque to them.
    pub fn is_connectivity(&self) -> bool {
        match self {
            ClientError::Network(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_is_not_connectivity() {
        let err = ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert!(!err.is_connectivity());
    }

    #[test]
    fn validation_error_is_not_connectivity() {
        let err = ClientError::Validation("query must not be empty".to_string());
        assert!(!err.is_connectivity());
        assert!(err.to_string().contains("invalid query"));
    }

    #[test]
    fn decode_error_carries_serde_message() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ClientError::from(serde_err);
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().contains("failed to decode"));
    }
}
