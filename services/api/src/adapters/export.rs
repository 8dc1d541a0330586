//! services/api/src/adapters/export.rs
//!
//! This module contains the reading-export adapter, which implements the
//! `ReadingExporter` port: finished passages land as dated plain-text files
//! in a configurable directory.

use async_trait::async_trait;
use chrono::Utc;
use reading_coach_core::ports::{PortError, PortResult, ReadingExporter};
use std::path::PathBuf;
use tracing::info;

/// An exporter that writes passages to `{dir}/English_Reading_{YYYYMMDD}.txt`.
/// A second export on the same day overwrites the day's file.
#[derive(Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ReadingExporter for FileExporter {
    /// Writes the (already markdown-cleaned) text and returns its path.
    async fn export(&self, text: &str) -> PortResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Unexpected(format!("creating export dir: {}", e)))?;

        let filename = format!("English_Reading_{}.txt", Utc::now().format("%Y%m%d"));
        let path = self.dir.join(filename);

        tokio::fs::write(&path, text)
            .await
            .map_err(|e| PortError::Unexpected(format!("writing export file: {}", e)))?;

        info!(path = %path.display(), "reading exported");
        Ok(path)
    }
}
