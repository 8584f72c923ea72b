use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A path or CLI argument that does not parse as a UUID.
    #[error("invalid {kind} id: {raw}")]
    InvalidId { kind: &'static str, raw: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("no database at {} (run `blogd init` first)", .0.display())]
    NotInitialized(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),
}
