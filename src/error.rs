//! Typed error types for startup-layers.
//!
//! Callers at the crate boundary can match on these variants instead of
//! relying on opaque `anyhow` strings. `StartupLayers::report` turns each
//! variant into the matching host feedback (silence, alert, or warning).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

/// Everything that can go wrong while saving, loading, or switching layouts.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A confirm/prompt dialog was dismissed or returned an empty answer.
    #[error("operation cancelled by the user")]
    UserCancelled,

    /// Save or delete targeted one of the built-in layouts.
    #[error("\"{0}\" is a built-in layout and cannot be overwritten or deleted")]
    ReservedName(String),

    /// The named layout is unknown to the registry or missing from storage.
    #[error("layout \"{0}\" not found")]
    NotFound(String),

    /// A layout name was registered twice in one session.
    #[error("layout \"{0}\" is already registered")]
    DuplicateName(String),

    /// A live layer did not report exactly one known layer kind.
    #[error("live layer \"{0}\" does not report exactly one known layer kind")]
    UnknownLayerKind(String),

    /// The layout text could not be parsed or violates the record rules.
    #[error("malformed layout record: {0}")]
    MalformedRecord(String),

    /// A storage file could not be read, written, or removed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File or directory the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The host refused a change to the live layer tree.
    #[error("host rejected the operation: {0}")]
    Host(String),
}

impl LayoutError {
    /// Attach a path to an I/O error.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayoutError::Io {
            path: path.into(),
            source,
        }
    }
}
