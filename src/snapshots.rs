//! Numbered on-disk snapshots of API responses.
//!
//! Each run gets its own `test{N}` directory under the snapshot root, with `N`
//! one past the highest existing number. Files inside are numbered in the
//! order they are saved.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::AppError;

const DIR_PREFIX: &str = "test";

/// Returns the next free snapshot number under `root`, creating `root` if
/// needed. Entries that do not look like `test{N}` are ignored.
pub async fn next_snapshot_number(root: &Path) -> Result<u32, AppError> {
    tokio::fs::create_dir_all(root).await?;

    let mut highest = 0;
    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(n) = name
            .to_str()
            .and_then(|name| name.strip_prefix(DIR_PREFIX))
            .and_then(|n| n.parse::<u32>().ok())
        {
            highest = highest.max(n);
        }
    }
    Ok(highest + 1)
}

#[derive(Debug)]
pub struct SnapshotDir {
    path: PathBuf,
    saved: usize,
}

impl SnapshotDir {
    /// Creates the next numbered directory under `root`.
    pub async fn create(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref();
        let number = next_snapshot_number(root).await?;
        let path = root.join(format!("{DIR_PREFIX}{number}"));
        tokio::fs::create_dir_all(&path).await?;
        info!("Saving responses to {}", path.display());
        Ok(Self { path, saved: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `value` as pretty-printed JSON to `{k}_{name}.json`.
    pub async fn save<T: Serialize>(&mut self, name: &str, value: &T) -> Result<PathBuf, AppError> {
        self.saved += 1;
        let file_path = self.path.join(format!("{}_{name}.json", self.saved));
        let content = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&file_path, content).await?;
        info!("Saved {}", file_path.display());
        Ok(file_path)
    }
}
