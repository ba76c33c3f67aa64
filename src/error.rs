//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`TagError`](crate::metadata::TagError),
//!   [`CatalogError`], [`AuthError`], [`ConfigError`](crate::config::ConfigError))
//!   for detailed handling
//!
//! Per-file and per-tier failures never become an [`Error`]; they are
//! recorded in the walk report. Only startup and publish-setup failures
//! travel up as errors.

use std::path::PathBuf;

use crate::catalog::CatalogError;
use crate::catalog::spotify::AuthError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// OAuth failure
    #[error("Authorization failed: {0}")]
    Auth(#[from] AuthError),

    /// Catalog API failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// File or folder not found
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
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
