use crate::models::settings::ExportSettings;
use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "export.toml";

/// Loads and stores [`ExportSettings`] as TOML
pub struct SettingsService;

impl SettingsService {
    /// Per-user config location, e.g. `~/.config/task-calendar-pdf/export.toml`
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "TaskCalendar", "task-calendar-pdf") {
            proj_dirs.config_dir().join(SETTINGS_FILE)
        } else {
            PathBuf::from(SETTINGS_FILE)
        }
    }

    /// Where exports land when no output directory is configured
    pub fn default_download_dir() -> PathBuf {
        match UserDirs::new() {
            Some(dirs) => dirs
                .download_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dirs.home_dir().to_path_buf()),
            None => PathBuf::from("."),
        }
    }

    /// Read and validate settings from `path`
    pub fn load(path: &Path) -> Result<ExportSettings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings: ExportSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {:?}: {}", path, e))?;

        Ok(settings)
    }

    /// Settings from `path` (or the default path); defaults when the file is missing
    pub fn load_or_default(path: Option<&Path>) -> Result<ExportSettings> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Ok(ExportSettings::default());
        }
        Self::load(&path)
    }

    pub fn save(path: &Path, settings: &ExportSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;

        log::info!("Saved export settings to {:?}", path);
        Ok(())
    }
}
