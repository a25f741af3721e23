//! Error types for pagewalk
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Paging itself is generic over the fetch error, so the paginator never
//! wraps or reclassifies what a fetch function returns.

use thiserror::Error;

/// The main error type for pagewalk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Service Errors
    // ============================================================================
    #[error("Service error (HTTP {status}) {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Operation '{operation}' not found in catalog '{catalog}'. Available operations: {available}")]
    OperationNotFound {
        catalog: String,
        operation: String,
        available: String,
    },

    #[error("Catalog '{name}' not found. Built-in catalogs: {available}. Or provide a path to a YAML file.")]
    CatalogNotFound { name: String, available: String },

    #[error("Missing required parameter '{name}' for operation '{operation}'")]
    MissingParameter { operation: String, name: String },

    #[error("Operation '{operation}' does not support paging")]
    NotPaged { operation: String },

    // ============================================================================
    // Interaction Errors
    // ============================================================================
    #[error("Declined: {action} on \"{target}\" was not confirmed")]
    Declined { action: String, target: String },

    #[error("Invalid tag '{input}': {message}")]
    InvalidTag { input: String, message: String },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a service error
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an operation-not-found error
    pub fn operation_not_found(
        catalog: impl Into<String>,
        operation: impl Into<String>,
        available: impl Into<String>,
    ) -> Self {
        Self::OperationNotFound {
            catalog: catalog.into(),
            operation: operation.into(),
            available: available.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_param(operation: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingParameter {
            operation: operation.into(),
            name: name.into(),
        }
    }

    /// Create an invalid tag error
    pub fn invalid_tag(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTag {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Network failure reaching the API
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout { .. })
    }

    /// Application-level failure returned by the API
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service { .. })
    }
}

/// Result type alias for pagewalk
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
