//! Error types for platform identifiers.

/// Errors that can occur while interpreting a platform identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The identifier does not name any known platform.
    #[error("unknown platform: '{name}'")]
    Unknown {
        /// The identifier as supplied.
        name: String,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
