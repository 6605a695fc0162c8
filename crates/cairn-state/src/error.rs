//! Error types for reconciliation
//!
//! Validation problems never show up here: they are reported through a
//! failed `StateResult`. Only failures the caller must see as a failed
//! call are errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The store rejected the request or could not be reached
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    /// The key source file passed validation but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;
