//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Template referenced a placeholder outside the known vocabulary
    #[error("Unknown placeholder '{{{{{name}}}}}' in template")]
    UnknownPlaceholder { name: String },

    /// Template could not be parsed
    #[error("Template syntax error in {template:?}: {message}")]
    TemplateSyntax { template: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The async worker registry no longer accepts jobs
    #[error("Async sink workers already shut down")]
    WorkersClosed,
}

impl LoggerError {
    /// Create an unknown placeholder error
    pub fn unknown_placeholder(name: impl Into<String>) -> Self {
        LoggerError::UnknownPlaceholder { name: name.into() }
    }

    /// Create a template syntax error
    pub fn syntax(template: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TemplateSyntax {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from building a formatter
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            LoggerError::UnknownPlaceholder { .. } | LoggerError::TemplateSyntax { .. }
        )
    }
}
