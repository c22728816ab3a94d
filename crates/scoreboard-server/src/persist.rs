//! JSON snapshot persistence for the in-memory store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use scoreboard_core::error::StoreError;
use scoreboard_core::store::{MemoryStore, StoreSnapshot};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rejected snapshot: {0}")]
    Store(#[from] StoreError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError + '_ {
    move |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a store from `path`. A missing file yields an empty store.
pub async fn load(path: &Path) -> Result<MemoryStore, PersistError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MemoryStore::new()),
        Err(e) => return Err(io_error(path)(e)),
    };
    let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)?;
    Ok(MemoryStore::from_snapshot(snapshot)?)
}

/// Write the store to `path` via a temporary file and rename.
pub async fn save(store: &MemoryStore, path: &Path) -> Result<(), PersistError> {
    let snapshot = store.snapshot().await;
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await.map_err(io_error(&tmp))?;
    tokio::fs::rename(&tmp, path).await.map_err(io_error(path))?;
    Ok(())
}
