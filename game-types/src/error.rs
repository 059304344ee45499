//! Error types for dama-sync.

use thiserror::Error;

/// Errors that can occur while encoding or decoding channel events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Event name not part of the protocol
    #[error("unknown event name: {0}")]
    UnknownEvent(String),

    /// Coordinate string not convertible to a grid position
    #[error("invalid coordinate: {0}")]
    InvalidCoord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProtocolError::UnknownEvent("whisper".into());
        assert_eq!(err.to_string(), "unknown event name: whisper");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolError>();
    }
}
