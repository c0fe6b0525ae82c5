// Settings module
// Tunables for the export pipeline, loadable from a TOML file

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Page size in mm (A4 portrait by default)
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Margin applied on every side of a page
    pub margin_mm: f32,
    /// Width of the offscreen render surface (A4 at 96 dpi)
    pub render_width_px: u32,
    /// Tallest single bitmap band the rasterizer allocates (one band per page)
    pub max_surface_height_px: u32,
    /// JPEG quality of the full capture
    pub capture_quality: u8,
    /// JPEG quality of each page slice
    pub page_quality: u8,
    /// Upper bound on waiting for render resources to settle
    pub settle_timeout_ms: u64,
    /// How long success/failure toasts stay visible
    pub toast_duration_ms: u64,
    /// Rows per list table before a page break
    pub list_rows_per_table: usize,
    /// Event count above which every view falls back to the list layout
    pub list_view_threshold: usize,
    /// Titles shown per day cell in calendar grids
    pub max_events_per_day: usize,
    /// Titles longer than this get their id appended in the list
    pub long_title_chars: usize,
    /// Download directory; the user's Downloads folder when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            render_width_px: 794,
            max_surface_height_px: 65_535,
            capture_quality: 70,
            page_quality: 80,
            settle_timeout_ms: 500,
            toast_duration_ms: 3000,
            list_rows_per_table: 40,
            list_view_threshold: 20,
            max_events_per_day: 4,
            long_title_chars: 60,
            output_dir: None,
        }
    }
}

impl ExportSettings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        if self.page_width_mm <= 0.0 || self.page_height_mm <= 0.0 {
            return Err("Page dimensions must be positive".to_string());
        }
        if self.margin_mm < 0.0
            || self.margin_mm * 2.0 >= self.page_width_mm
            || self.margin_mm * 2.0 >= self.page_height_mm
        {
            return Err("Margins must leave room for page content".to_string());
        }
        if self.render_width_px == 0 {
            return Err("Render width must be at least 1 pixel".to_string());
        }
        if self.max_surface_height_px == 0 || self.max_surface_height_px > 65_535 {
            return Err("Maximum surface height must be between 1 and 65535".to_string());
        }
        for (name, quality) in [
            ("Capture quality", self.capture_quality),
            ("Page quality", self.page_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(format!("{} must be between 1 and 100", name));
            }
        }
        if self.list_rows_per_table == 0 {
            return Err("List tables need at least one row".to_string());
        }

        Ok(())
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}
