//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and
//! proper error chaining.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type ThreatlensResult<T> = Result<T, ThreatlensError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the threatlens system
#[derive(Error, Debug)]
pub enum ThreatlensError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("LLM error: {message}")]
    Llm {
        message: String,
        model: Option<String>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Report rendering error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl ThreatlensError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ThreatlensError::Config { context, .. } => Some(context),
            ThreatlensError::Validation { context, .. } => Some(context),
            ThreatlensError::Llm { context, .. } => Some(context),
            ThreatlensError::Network { context, .. } => Some(context),
            ThreatlensError::Render { context, .. } => Some(context),
            ThreatlensError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ThreatlensError::Network { .. } => true,
            ThreatlensError::Render { .. } => true,
            ThreatlensError::Config { .. } => false,
            ThreatlensError::Validation { .. } => false,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ThreatlensError::Config { .. } | ThreatlensError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            ThreatlensError::Network { .. } | ThreatlensError::Render { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Recoverable error (degraded operation possible)"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::ThreatlensError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::ThreatlensError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Complete the missing field before generating"),
        }
    };
}
