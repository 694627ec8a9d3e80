//! Error handling for SensorView
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the history engine. An empty window is not an error; see
//! [`crate::history::LoadOutcome::NoData`].

use thiserror::Error;

/// Main error type for SensorView operations
#[derive(Error, Debug)]
pub enum SensorViewError {
    /// Malformed session, signal or date selection
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure while talking to the data source
    #[error("Transport error: {0}")]
    Transport(String),

    /// The data source answered with something we could not decode
    #[error("Parse error: {0}")]
    Parse(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SensorViewError>,
    },
}

impl SensorViewError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SensorViewError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error came from the fetch path (network or decoding)
    pub fn is_transport(&self) -> bool {
        match self {
            SensorViewError::Transport(_) | SensorViewError::Parse(_) => true,
            SensorViewError::WithContext { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SensorViewError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SensorViewError::Parse(err.to_string())
        } else {
            SensorViewError::Transport(err.to_string())
        }
    }
}

/// Result type alias for SensorView operations
pub type Result<T> = std::result::Result<T, SensorViewError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SensorViewError::Validation("bad session id".to_string());
        assert_eq!(err.to_string(), "Validation error: bad session id");
    }

    #[test]
    fn test_error_with_context() {
        let err = SensorViewError::Transport("connection refused".to_string());
        let with_ctx = err.with_context("Failed to fetch window");
        assert!(with_ctx.to_string().contains("Failed to fetch window"));
        assert!(with_ctx.to_string().contains("connection refused"));
    }

    #[test]
    fn test_is_transport_sees_through_context() {
        let err = SensorViewError::Parse("missing field".to_string()).with_context("window");
        assert!(err.is_transport());
        assert!(!SensorViewError::Config("x".to_string()).is_transport());
    }

    #[test]
    fn test_result_ext_context() {
        let res: Result<()> = Err(SensorViewError::Transport("timeout".to_string()));
        let err = res.context("Loading sessions").unwrap_err();
        assert!(err.to_string().starts_with("Loading sessions"));
    }
}
