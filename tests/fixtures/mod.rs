// Test fixtures - reusable test data
// Provides consistent events and requests across the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use task_calendar_pdf::{CalendarEvent, ExportRequest, ViewMode};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Oct 19, 2026
    pub fn export_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    /// Feb 2026 starts on a Sunday and fills exactly four weeks
    pub fn feb_2026() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    /// `count` events cycling through PPM, AMC and other titles, one per day from Oct 1 2026
    pub fn mixed(count: usize) -> Vec<CalendarEvent> {
        (0..count)
            .map(|i| {
                let title = match i % 3 {
                    0 => format!("PPM - Chiller inspection {}", i),
                    1 => format!("AMC - Fire panel service {}", i),
                    _ => format!("Replace lobby lights {}", i),
                };
                let day = 1 + (i % 28) as u32;
                let start = format!("2026-10-{:02}T{:02}:30:00", day, 8 + i % 9);
                CalendarEvent::new(i as i64 + 1, title, start).with_status("scheduled")
            })
            .collect()
    }

    /// One event per month of 2026, on the 15th
    pub fn one_per_month_2026() -> Vec<CalendarEvent> {
        (1..=12u32)
            .map(|month| {
                CalendarEvent::new(
                    month as i64,
                    format!("PPM - Generator run {}", month),
                    format!("2026-{:02}-15T10:00:00", month),
                )
            })
            .collect()
    }

    pub fn with_invalid_start() -> CalendarEvent {
        CalendarEvent::new("legacy-9", "AMC - Pump overhaul", "not a date")
    }
}

pub fn request(events: Vec<CalendarEvent>, view: ViewMode) -> ExportRequest {
    ExportRequest::new(events, view, dates::export_day())
}
