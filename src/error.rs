// file: src/error.rs
// version: 1.0.0
// guid: 3c0f5e1a-8b2d-4f6e-9a71-d2c4b8e60f13

use thiserror::Error;

/// Result type alias for devctl
pub type Result<T> = std::result::Result<T, DevctlError>;

/// Error types surfaced by devctl commands
#[derive(Error, Debug)]
pub enum DevctlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{kind} '{name}' not found in configuration")]
    NotFound { kind: &'static str, name: String },

    #[error("{field} is required")]
    MissingField { field: String },

    /// Covers both a tool that could not be launched and one that exited non-zero
    #[error("{tool} {operation} failed: {detail}")]
    Process {
        tool: String,
        operation: String,
        detail: String,
    },

    #[error("System error: {0}")]
    System(String),
}

impl DevctlError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a new process error
    pub fn process(
        tool: impl Into<String>,
        operation: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Process {
            tool: tool.into(),
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Create a new system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_field() {
        let err = DevctlError::missing("apps.web.build.image_name");
        assert_eq!(err.to_string(), "apps.web.build.image_name is required");
    }

    #[test]
    fn test_process_error_message() {
        let err = DevctlError::process("helm", "uninstall redis", "exit status: 1");
        assert_eq!(err.to_string(), "helm uninstall redis failed: exit status: 1");
    }

    #[test]
    fn test_not_found_message() {
        let err = DevctlError::not_found("Dependency", "redis");
        assert_eq!(err.to_string(), "Dependency 'redis' not found in configuration");
    }
}
