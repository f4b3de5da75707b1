//! Collaborators the store talks to
//!
//! The store owns no I/O of its own. The backend transport and the save-as
//! side effect sit behind these traits so the UI layer (or a test) decides
//! what they do.

use crate::types::{ParseResponse, UploadFile};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Parsing backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit the drawing and both spreadsheets for parsing
    async fn parse(
        &self,
        pdf: &UploadFile,
        bom: &UploadFile,
        manager: &UploadFile,
        bom_sheet_index: u32,
    ) -> Result<ParseResponse>;

    /// Render a payload into a spreadsheet, returned as raw bytes
    async fn export(&self, payload: &ParseResponse) -> Result<Vec<u8>>;
}

/// Where exported spreadsheets end up
pub trait SaveTarget: Send + Sync {
    /// Save `blob` under `filename`, returning where it landed
    fn save(&self, blob: &[u8], filename: &str) -> std::io::Result<PathBuf>;
}

/// Saves exports into a directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, blob: &[u8], filename: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, blob)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved export");
        Ok(path)
    }
}
