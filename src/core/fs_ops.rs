// src/core/fs_ops.rs
//! File system helpers for exports and downloads

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Write `content` as `dir/file_name`, creating `dir` when needed.
    pub async fn write_into(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        Self::ensure_dir_exists(dir).await?;

        let path = dir.join(file_name);
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(path)
    }
}
