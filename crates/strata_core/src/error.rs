//! # World Error Types
//!
//! Generation and meshing never fail. Everything that can go wrong
//! happens while reading and validating configuration.

use thiserror::Error;

/// Errors raised while setting up a world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration text is not valid TOML for `WorldConfig`.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {reason}")]
    ConfigIo {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

impl WorldError {
    /// Shorthand for [`WorldError::InvalidConfig`].
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for world setup operations.
pub type WorldResult<T> = Result<T, WorldError>;
