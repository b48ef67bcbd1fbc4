//! Parsing limits.

use serde::{Deserialize, Serialize};

/// Limits applied while parsing inbound messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum input size in bytes (0 = unlimited)
    pub max_message_size: usize,
    /// Maximum number of entries in a batch (0 = unlimited)
    pub max_batch_len: usize,
    /// Longest accepted error message in bytes
    pub max_error_message_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_size: 1024 * 1024, // 1 MB
            max_batch_len: 0,
            max_error_message_len: 4096,
        }
    }
}

impl Limits {
    /// Limits with every bound disabled except the error message length
    pub fn unlimited() -> Self {
        Self {
            max_message_size: 0,
            max_batch_len: 0,
            ..Self::default()
        }
    }

    pub fn with_max_message_size(mut self, bytes: usize) -> Self {
        self.max_message_size = bytes;
        self
    }

    pub fn with_max_batch_len(mut self, entries: usize) -> Self {
        self.max_batch_len = entries;
        self
    }

    pub fn with_max_error_message_len(mut self, bytes: usize) -> Self {
        self.max_error_message_len = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_message_size, 1024 * 1024);
        assert_eq!(limits.max_batch_len, 0);
        assert_eq!(limits.max_error_message_len, 4096);
    }

    #[test]
    fn test_unlimited() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_message_size, 0);
        assert_eq!(limits.max_batch_len, 0);
        assert_eq!(limits.max_error_message_len, 4096);
    }

    #[test]
    fn test_builder_setters() {
        let limits = Limits::default()
            .with_max_message_size(512)
            .with_max_batch_len(10)
            .with_max_error_message_len(64);
        assert_eq!(limits.max_message_size, 512);
        assert_eq!(limits.max_batch_len, 10);
        assert_eq!(limits.max_error_message_len, 64);
    }

    #[test]
    fn test_partial_config_document() {
        let limits: Limits = serde_json::from_str(r#"{"max_batch_len": 50}"#).unwrap();
        assert_eq!(limits.max_batch_len, 50);
        assert_eq!(limits.max_message_size, 1024 * 1024);

        let text = serde_json::to_string(&limits).unwrap();
        let back: Limits = serde_json::from_str(&text).unwrap();
        assert_eq!(back, limits);
    }
}
