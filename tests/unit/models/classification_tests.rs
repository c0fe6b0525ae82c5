// Tests for task classification and status presentation
// Covers the free-text inputs the calendar API is known to send

use task_calendar_pdf::models::color::Color;
use task_calendar_pdf::models::event::{events_from_json, TaskCounts, UNTITLED_TASK};
use task_calendar_pdf::{CalendarEvent, EventId, TaskKind, TaskStatus};
use test_case::test_case;

#[test_case("PPM - Boiler service", TaskKind::Ppm ; "ppm prefix")]
#[test_case("Quarterly ppm inspection", TaskKind::Ppm ; "ppm lower case inside")]
#[test_case("AMC renewal - HVAC", TaskKind::Amc ; "amc prefix")]
#[test_case("Camcorder repair", TaskKind::Amc ; "amc substring matches")]
#[test_case("Replace lobby lights", TaskKind::Other ; "no keyword")]
#[test_case("", TaskKind::Other ; "empty title")]
fn test_kind_from_title(title: &str, expected: TaskKind) {
    assert_eq!(TaskKind::classify(Some(title)), expected);
}

#[test]
fn test_missing_title_is_other_and_untitled() {
    let event: CalendarEvent =
        serde_json::from_str(r#"{"id": 4, "start": "2026-10-01"}"#).unwrap();
    assert_eq!(event.kind(), TaskKind::Other);
    assert_eq!(event.display_title(), UNTITLED_TASK);
}

#[test_case(Some("Scheduled"), "Scheduled", Color::rgb(234, 179, 8) ; "scheduled")]
#[test_case(Some("OPEN"), "Open", Color::rgb(236, 72, 153) ; "open upper case")]
#[test_case(Some("in_progress"), "In Progress", Color::rgb(59, 130, 246) ; "in progress snake case")]
#[test_case(Some("In-Progress"), "In Progress", Color::rgb(59, 130, 246) ; "in progress kebab case")]
#[test_case(Some("closed"), "Closed", Color::rgb(34, 197, 94) ; "closed")]
#[test_case(Some("overdue"), "Overdue", Color::rgb(239, 68, 68) ; "overdue")]
#[test_case(Some("Awaiting parts"), "Awaiting parts", Color::rgb(156, 163, 175) ; "unknown keeps text")]
#[test_case(None, "N/A", Color::rgb(156, 163, 175) ; "missing")]
fn test_status_label_and_color(raw: Option<&str>, label: &str, color: Color) {
    let status = TaskStatus::parse(raw);
    assert_eq!(status.label(), label);
    assert_eq!(status.color(), color);
}

#[test]
fn test_completed_and_closed_share_color() {
    assert_eq!(
        TaskStatus::parse(Some("completed")).color(),
        TaskStatus::parse(Some("closed")).color()
    );
}

#[test]
fn test_counts_from_json_payload() {
    let json = r##"[
        {"id": 1, "title": "PPM - AHU", "start": "2026-10-01T08:00:00", "status": "open"},
        {"id": "A-2", "title": "AMC - Lift", "start": "2026-10-02T08:00:00"},
        {"id": 3, "title": null, "start": "2026-10-03", "color": "#10b981"}
    ]"##;
    let events = events_from_json(json).unwrap();

    assert_eq!(events[1].id, EventId::from("A-2"));
    assert_eq!(
        TaskCounts::tally(&events),
        TaskCounts {
            ppm: 1,
            amc: 1,
            other: 1
        }
    );
    assert_eq!(events[2].display_color(), Color::rgb(16, 185, 129));
}
