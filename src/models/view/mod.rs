// View module
// Calendar display granularity selected when the export was triggered

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
    List,
    Year,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Month,
        ViewMode::Week,
        ViewMode::Day,
        ViewMode::List,
        ViewMode::Year,
    ];

    /// Human-readable label used in the header and toasts
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Month => "Monthly View",
            ViewMode::Week => "Weekly View",
            ViewMode::Day => "Daily View",
            ViewMode::List => "List View",
            ViewMode::Year => "Year View",
        }
    }

    /// Label as used in the exported file name
    pub fn file_token(&self) -> &'static str {
        match self {
            ViewMode::Month => "Monthly-View",
            ViewMode::Week => "Weekly-View",
            ViewMode::Day => "Daily-View",
            ViewMode::List => "List-View",
            ViewMode::Year => "Year-View",
        }
    }

    /// Date part of the file name: `2026` for the year view, `Oct-2026` otherwise
    pub fn date_token(&self, date: NaiveDate) -> String {
        match self {
            ViewMode::Year => format!("{:04}", date.year()),
            _ => date.format("%b-%Y").to_string(),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            "list" => Ok(ViewMode::List),
            "year" => Ok(ViewMode::Year),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

/// Name of the downloaded file for a view and reference date
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use task_calendar_pdf::models::view::{export_filename, ViewMode};
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// assert_eq!(
///     export_filename(ViewMode::Month, date),
///     "Scheduled-Tasks-Calendar-Monthly-View-Oct-2026.pdf"
/// );
/// ```
pub fn export_filename(view: ViewMode, date: NaiveDate) -> String {
    format!(
        "Scheduled-Tasks-Calendar-{}-{}.pdf",
        view.file_token(),
        view.date_token(date)
    )
}
