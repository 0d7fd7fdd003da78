//! Error types for notabili.
//!
//! The interaction core never fails on its own; these errors come from the
//! collaborators around it (note store, preference store, configuration) and
//! are turned into display strings by the host.

use std::path::PathBuf;

use crate::host::NoteId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Main notabili error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A note draft was rejected before reaching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No note with this id exists.
    #[error("note {0} not found")]
    NotFound(NoteId),

    /// The persistence collaborator failed.
    #[error("store error: {0}")]
    Store(String),

    /// The persistence worker has shut down.
    #[error("persistence worker is not running")]
    WorkerGone,

    /// A stored preference could not be read or written.
    #[error("preference error: {0}")]
    Preference(String),

    /// Configuration file could not be loaded.
    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
