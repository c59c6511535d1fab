//! Error types for shelf-lookup.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for lookup operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShelfError {
    /// The selection index is outside the registered catalog range.
    #[error("Unknown lookup mode: {mode_id}")]
    UnknownMode { mode_id: usize },

    /// The operator's text failed coercion for the mode's input kind.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Any fault raised by the storage layer while running a lookup.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A run action arrived while another lookup was still outstanding.
    #[error("A lookup is already running")]
    Busy,

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    /// Creates an unknown-mode error for the given index.
    pub fn unknown_mode(mode_id: usize) -> Self {
        Self::UnknownMode { mode_id }
    }

    /// Creates an invalid-input error with the given reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownMode { .. } => "Mode Error",
            Self::InvalidInput { .. } => "Input Error",
            Self::Persistence(_) => "Persistence Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Busy => "Busy",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ShelfError.
pub type Result<T> = std::result::Result<T, ShelfError>;
