//! Error types for `cfgloc`

use thiserror::Error;

/// The error type for `cfgloc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Config File Grammar Errors ====================
    /// A line matched none of the config grammar rules.
    ///
    /// The whole file is rejected; no partial tree is returned.
    #[error("{file}:{line_number}: cannot parse line: {content}")]
    UnparsableLine {
        /// Name of the file being parsed (or `<input>` for in-memory text).
        file: String,
        /// 1-based line number in the source text.
        line_number: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// A closing brace with no open node to close.
    #[error("{file}:{line_number}: unbalanced closing brace")]
    UnbalancedBraces {
        /// Name of the file being parsed.
        file: String,
        /// 1-based line number of the extra `}`.
        line_number: usize,
    },

    // ==================== Metadata Codec Errors ====================
    /// A metadata string contained a line the codec did not produce.
    #[error("unrecognized metadata line: {line:?}")]
    UnrecognizedMetadata {
        /// The offending line.
        line: String,
    },

    // ==================== Settings Errors ====================
    /// `cfgloc.toml` could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A tree could not be rendered as JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== File System Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `cfgloc` operations.
pub type Result<T> = std::result::Result<T, Error>;
