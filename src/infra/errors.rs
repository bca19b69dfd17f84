// src/infra/errors.rs — Error types for Optiscope

use thiserror::Error;

use crate::telemetry::Category;

#[derive(Error, Debug)]
pub enum OptiscopeError {
    // Input errors
    #[error("No {category} XML file found in {folder}")]
    NotFound { category: Category, folder: String },

    #[error("Chat is not ready: run the summarization pass first")]
    NotReady,

    #[error("No extraction rules defined for {category} telemetry")]
    NoExtractionRules { category: Category },

    // Backend errors (never retried)
    #[error("Backend '{backend}' error: {message}")]
    Backend { backend: String, message: String },

    // Ingestion
    #[error("Failed to decode message: {0}")]
    Decode(String),

    #[error("Alarm feed error: {0}")]
    Feed(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OptiscopeError {
    /// True when an expected telemetry file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OptiscopeError::NotFound { .. })
    }

    pub(crate) fn backend(backend: &str, message: impl Into<String>) -> Self {
        OptiscopeError::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let e = OptiscopeError::NotFound {
            category: Category::Alarm,
            folder: "/data/alarm".into(),
        };
        assert_eq!(e.to_string(), "No alarm XML file found in /data/alarm");
        assert!(e.is_not_found());
    }

    #[test]
    fn test_not_ready_message() {
        let e = OptiscopeError::NotReady;
        assert!(e.to_string().contains("run the summarization pass first"));
        assert!(!e.is_not_found());
    }

    #[test]
    fn test_backend_helper() {
        let e = OptiscopeError::backend("ollama", "connection refused");
        assert_eq!(e.to_string(), "Backend 'ollama' error: connection refused");
    }
}
