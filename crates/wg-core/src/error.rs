use std::path::PathBuf;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or inspecting content.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A content pack could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A content pack is not valid JSON or does not match the schema.
    #[error("invalid content pack: {0}")]
    Parse(#[from] serde_json::Error),

    /// A reference to a snippet that does not exist.
    #[error("unknown snippet: \"{0}\"")]
    UnknownSnippet(String),
}
