//! Error types for the state file store.

use std::path::PathBuf;

/// Errors that can occur while loading or writing the state file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The state file does not exist.
    #[error(
        "no state file at {}. Write one with at least {{\"token\": \"your-token\"}}",
        .path.display()
    )]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The state file exists but has no usable token.
    #[error(
        "state file {} is missing a token. Add one: {{\"token\": \"your-token\"}}",
        .path.display()
    )]
    MissingToken {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// Reading or writing the file failed.
    #[error("state file I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file content is not a valid state document.
    #[error("state file {} is not valid: {source}", .path.display())]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The catalog could not be serialized.
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}
