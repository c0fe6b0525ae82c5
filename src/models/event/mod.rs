// Event module
// Scheduled-task calendar event as delivered by the task API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::color::Color;
use crate::utils::date::parse_timestamp;

/// Title shown for events without one.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// Identifier of a calendar event; the task API sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Number(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        EventId::Text(value)
    }
}

/// A scheduled task as shown on the calendar.
///
/// Fields mirror the JSON payload; `start` stays a raw string because the
/// upstream API is not consistent about its timestamp format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(default)]
    pub title: Option<String>,
    pub start: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CalendarEvent {
    /// Create an event with an id, title and start timestamp
    ///
    /// # Examples
    /// ```
    /// use task_calendar_pdf::models::event::{CalendarEvent, TaskKind};
    ///
    /// let event = CalendarEvent::new(7, "Monthly PPM Check", "2026-03-02T09:00:00");
    /// assert_eq!(event.kind(), TaskKind::Ppm);
    /// ```
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            start: start.into(),
            color: None,
            status: None,
        }
    }

    /// Set the display color (hex format)
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the workflow status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Title to display, falling back to [`UNTITLED_TASK`]
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED_TASK,
        }
    }

    /// Parsed start time, `None` when the timestamp is malformed
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start)
    }

    pub fn kind(&self) -> TaskKind {
        TaskKind::classify(self.title.as_deref())
    }

    pub fn task_status(&self) -> TaskStatus {
        TaskStatus::parse(self.status.as_deref())
    }

    /// Event color, or the task type color when absent or malformed
    pub fn display_color(&self) -> Color {
        self.color
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or_else(|| self.kind().color())
    }
}

/// Parse a JSON array of events as returned by the task API.
pub fn events_from_json(json: &str) -> serde_json::Result<Vec<CalendarEvent>> {
    serde_json::from_str(json)
}

/// Task type bucket derived from the event title.
///
/// The task API carries no structured type field, so the bucket is a
/// case-insensitive substring match on the title. "ppm" wins over "amc".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Ppm,
    Amc,
    Other,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Ppm, TaskKind::Amc, TaskKind::Other];

    pub fn classify(title: Option<&str>) -> Self {
        let title = match title {
            Some(title) => title.to_lowercase(),
            None => return TaskKind::Other,
        };

        if title.contains("ppm") {
            TaskKind::Ppm
        } else if title.contains("amc") {
            TaskKind::Amc
        } else {
            TaskKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Ppm => "PPM",
            TaskKind::Amc => "AMC",
            TaskKind::Other => "Other",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TaskKind::Ppm => Color::rgb(37, 99, 235),
            TaskKind::Amc => Color::rgb(124, 58, 237),
            TaskKind::Other => Color::rgb(107, 114, 128),
        }
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Scheduled,
    Open,
    InProgress,
    Completed,
    Closed,
    Overdue,
    Unknown(String),
}

impl TaskStatus {
    /// Parse a free-text status; spacing, `_` and `-` are treated alike
    pub fn parse(status: Option<&str>) -> Self {
        let raw = status.unwrap_or("").trim();
        let normalized = raw
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "scheduled" => TaskStatus::Scheduled,
            "open" => TaskStatus::Open,
            "in progress" | "inprogress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "closed" => TaskStatus::Closed,
            "overdue" => TaskStatus::Overdue,
            _ => TaskStatus::Unknown(raw.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            TaskStatus::Scheduled => "Scheduled".to_string(),
            TaskStatus::Open => "Open".to_string(),
            TaskStatus::InProgress => "In Progress".to_string(),
            TaskStatus::Completed => "Completed".to_string(),
            TaskStatus::Closed => "Closed".to_string(),
            TaskStatus::Overdue => "Overdue".to_string(),
            TaskStatus::Unknown(raw) if raw.is_empty() => "N/A".to_string(),
            TaskStatus::Unknown(raw) => raw.clone(),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TaskStatus::Scheduled => Color::rgb(234, 179, 8),
            TaskStatus::Open => Color::rgb(236, 72, 153),
            TaskStatus::InProgress => Color::rgb(59, 130, 246),
            TaskStatus::Completed | TaskStatus::Closed => Color::rgb(34, 197, 94),
            TaskStatus::Overdue => Color::rgb(239, 68, 68),
            TaskStatus::Unknown(_) => Color::rgb(156, 163, 175),
        }
    }
}

/// Per-kind event counts shown in the summary panel and list footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub ppm: usize,
    pub amc: usize,
    pub other: usize,
}

impl TaskCounts {
    pub fn tally(events: &[CalendarEvent]) -> Self {
        events.iter().fold(Self::default(), |mut counts, event| {
            match event.kind() {
                TaskKind::Ppm => counts.ppm += 1,
                TaskKind::Amc => counts.amc += 1,
                TaskKind::Other => counts.other += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.ppm + self.amc + self.other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("Monthly PPM Check"), TaskKind::Ppm ; "ppm upper case")]
    #[test_case(Some("quarterly ppm"), TaskKind::Ppm ; "ppm lower case")]
    #[test_case(Some("AMC Renewal"), TaskKind::Amc ; "amc")]
    #[test_case(Some("PPM under AMC contract"), TaskKind::Ppm ; "ppm wins over amc")]
    #[test_case(Some("Generic Task"), TaskKind::Other ; "other")]
    #[test_case(Some(""), TaskKind::Other ; "empty title")]
    #[test_case(None, TaskKind::Other ; "missing title")]
    fn test_classify(title: Option<&str>, expected: TaskKind) {
        assert_eq!(TaskKind::classify(title), expected);
    }

    #[test_case(Some("scheduled"), TaskStatus::Scheduled)]
    #[test_case(Some("OPEN"), TaskStatus::Open)]
    #[test_case(Some("in_progress"), TaskStatus::InProgress)]
    #[test_case(Some("In Progress"), TaskStatus::InProgress)]
    #[test_case(Some("in-progress"), TaskStatus::InProgress)]
    #[test_case(Some("Closed"), TaskStatus::Closed)]
    #[test_case(Some("overdue "), TaskStatus::Overdue)]
    fn test_status_parse(raw: Option<&str>, expected: TaskStatus) {
        assert_eq!(TaskStatus::parse(raw), expected);
    }

    #[test]
    fn test_unknown_status_is_gray() {
        let status = TaskStatus::parse(Some("Awaiting Parts"));
        assert_eq!(status.label(), "Awaiting Parts");
        assert_eq!(status.color(), Color::rgb(156, 163, 175));
        assert_eq!(TaskStatus::parse(None).label(), "N/A");
    }

    #[test]
    fn test_completed_and_closed_share_green() {
        assert_eq!(TaskStatus::Completed.color(), TaskStatus::Closed.color());
    }

    #[test]
    fn test_display_title_fallback() {
        let mut event = CalendarEvent::new(1, "   ", "2026-01-01");
        assert_eq!(event.display_title(), UNTITLED_TASK);
        event.title = None;
        assert_eq!(event.display_title(), UNTITLED_TASK);
    }

    #[test]
    fn test_display_color_falls_back_to_kind() {
        let event = CalendarEvent::new(1, "AMC visit", "2026-01-01").with_color("blue");
        assert_eq!(event.display_color(), TaskKind::Amc.color());

        let event = event.with_color("#ff0000");
        assert_eq!(event.display_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_events_from_json_accepts_mixed_ids() {
        let json = r##"[
            {"id": 12, "title": "PPM - Chiller", "start": "2026-02-03T08:00:00", "status": "open"},
            {"id": "T-9", "start": "2026-02-04", "color": "#22c55e"}
        ]"##;
        let events = events_from_json(json).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, EventId::Number(12));
        assert_eq!(events[1].id, EventId::Text("T-9".into()));
        assert_eq!(events[1].title, None);
        assert_eq!(events[1].kind(), TaskKind::Other);
    }

    #[test]
    fn test_counts_tally() {
        let events = vec![
            CalendarEvent::new(1, "PPM pump", "2026-01-01"),
            CalendarEvent::new(2, "amc lift", "2026-01-01"),
            CalendarEvent::new(3, "Inspection", "2026-01-01"),
            CalendarEvent::new(4, "ppm boiler", "2026-01-01"),
        ];
        let counts = TaskCounts::tally(&events);
        assert_eq!(counts, TaskCounts { ppm: 2, amc: 1, other: 1 });
        assert_eq!(counts.total(), 4);
    }
}
