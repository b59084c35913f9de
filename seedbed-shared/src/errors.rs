//! Error types for seedbed.

use std::path::PathBuf;

/// Result alias used across seedbed and host adapters.
pub type SeedbedResult<T> = Result<T, SeedbedError>;

#[derive(Debug, thiserror::Error)]
pub enum SeedbedError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("content store error: {0}")]
    Content(String),

    #[error("permission error: {0}")]
    Permission(String),

    #[error("admin provisioning error: {0}")]
    Admin(String),

    #[error("seed dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
