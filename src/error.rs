//! Application-wide error types.
//!
//! Library modules return [`Error`] through the [`Result`] alias, while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum covering catalog, path, and tag-writing failures
//! - Per-song failures are turned into a failed `SongProcessingResult` by the
//!   batch coordinator; only catalog enumeration errors escape a batch
//!
//! # Example
//!
//! ```ignore
//! use catalog_tagger::error::{Error, Result};
//!
//! fn write_one(path: &Path) -> Result<()> {
//!     let format = TagFormat::from_path(path)?; // UnsupportedFormat
//!     std::fs::metadata(path)?;                 // IO errors auto-convert
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error (read, write, rename)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The song row does not exist in the catalog
    #[error("Song not found: {0}")]
    SongNotFound(i64),

    /// File extension is not one of the supported container families
    #[error("Writing support for {0:?} not yet implemented")]
    UnsupportedFormat(String),

    /// External helper program could not be started
    #[error("{tool} not found: install it or set writer.remux_tool")]
    ToolUnavailable { tool: String },

    /// External helper program ran but reported failure
    #[error("{tool} failed ({status}): {output}")]
    ToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    /// Malformed container or tag data
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Tag library refused to write
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Catalog path rejected by the library sandbox
    #[error("Invalid library path: {0}")]
    InvalidPath(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}
