//! Error types for SDK descriptor operations.
//!
//! Resolution itself never fails; these cover loading, validating and
//! looking up descriptors, and exporting resolved inputs.

use std::path::PathBuf;

/// Errors that can occur outside of resolution.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading descriptor files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor file not found.
    #[error("descriptor file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A descriptor failed validation.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },

    /// No descriptor is registered under the requested name.
    #[error("unknown SDK: '{name}'")]
    UnknownSdk {
        /// The requested SDK name.
        name: String,
    },

    /// The platform identifier could not be parsed.
    #[error(transparent)]
    Platform(#[from] linkplan_platform::PlatformError),

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {detail}")]
    Logging {
        /// Description of the failure.
        detail: String,
    },
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
