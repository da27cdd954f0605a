use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persistent record store.
///
/// Every variant means the persistence layer could not serve the call;
/// handlers surface them as UNAVAILABLE.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot at {0} is not a JSON object")]
    NotAnObject(PathBuf),

    #[error("snapshot entry `{key}` is unreadable: {reason}")]
    BadEntry { key: String, reason: String },

    #[error("blocking store task failed: {0}")]
    Worker(String),

    #[error("record id `{record}` does not match key `{key}`")]
    KeyMismatch { key: String, record: String },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Outcome of a lifecycle operation that did not produce a record.
#[derive(Error, Debug)]
pub enum FoodError {
    #[error("Food with id '{0}' not found")]
    NotFound(String),

    #[error("invalid food payload: {0}")]
    InvalidPayload(String),

    #[error("storage unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config.json not found in any of: {}", display_paths(.0))]
    NotFound(Vec<PathBuf>),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config.json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open food store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to install tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
