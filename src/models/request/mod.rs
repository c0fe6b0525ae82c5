// Request module
// One export invocation: what to render and under which view

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::CalendarEvent;
use super::filters::CalendarFilters;
use super::view::ViewMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub events: Vec<CalendarEvent>,
    pub view: ViewMode,
    /// Reference date; selects the month (or year) that is rendered
    pub date: NaiveDate,
    #[serde(default)]
    pub active_filters: CalendarFilters,
}

impl ExportRequest {
    pub fn new(events: Vec<CalendarEvent>, view: ViewMode, date: NaiveDate) -> Self {
        Self {
            events,
            view,
            date,
            active_filters: CalendarFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: CalendarFilters) -> Self {
        self.active_filters = filters;
        self
    }
}
