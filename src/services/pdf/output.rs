//! Delivery of finished PDFs.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::settings::ExportSettings;
use crate::services::settings::SettingsService;

/// Receives the finished file, the headless counterpart of a browser download.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink: Send + Sync {
    /// Store `bytes` under `filename`; returns where the file ended up
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Configured output directory, or the user's download folder
    pub fn from_settings(settings: &ExportSettings) -> Self {
        let dir = settings
            .output_dir
            .clone()
            .unwrap_or_else(SettingsService::default_download_dir);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create download directory: {:?}", self.dir))?;
        }

        // The target is only ever replaced by a complete file
        let path = self.dir.join(filename);
        let partial = self.dir.join(format!("{}.part", filename));

        let result = write_file(&partial, bytes).and_then(|()| {
            fs::rename(&partial, &path)
                .with_context(|| format!("Failed to move PDF into place: {:?}", path))
        });
        if let Err(e) = result {
            if partial.exists() {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    log::warn!("Failed to remove partial download {:?}: {}", partial, cleanup);
                }
            }
            return Err(e);
        }

        Ok(path)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create PDF file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .with_context(|| format!("Failed to write PDF file: {:?}", path))?;
    writer.flush().context("Failed to flush PDF file")?;
    writer
        .get_ref()
        .sync_all()
        .with_context(|| format!("Failed to sync PDF file: {:?}", path))?;
    Ok(())
}

/// Keeps downloads in memory, e.g. to stream them back over HTTP
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered files in delivery order
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl OutputSink for MemorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
