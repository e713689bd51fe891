//! Protocol error types

use thiserror::Error;

/// Structural wire-format violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The device answered a control query with fewer bytes than the
    /// request's wLength promises.
    #[error("short control response: expected {expected} bytes, got {actual}")]
    ShortResponse { expected: usize, actual: usize },
}

/// Type alias for protocol results
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_response_display() {
        let err = ProtocolError::ShortResponse {
            expected: 8,
            actual: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("short control response"));
        assert!(msg.contains('8'));
        assert!(msg.contains('3'));
    }
}
