// Integration tests for the export pipeline
// Assemble -> rasterize -> paginate -> deliver, through the public API

mod fixtures;

use chrono::NaiveDate;
use fixtures::{dates, events, request};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use task_calendar_pdf::services::pdf::assembler::{DocumentAssembler, NO_TASKS_TEXT};
use task_calendar_pdf::services::pdf::html::to_html;
use task_calendar_pdf::services::pdf::output::{DirectorySink, MemorySink};
use task_calendar_pdf::services::pdf::progress::{toast_callback, ToastCallback};
use task_calendar_pdf::{ExportSettings, PdfExportService, ViewMode};
use tempfile::TempDir;

fn assembler(settings: &ExportSettings) -> DocumentAssembler<'_> {
    DocumentAssembler::new(settings, dates::export_day().and_hms_opt(9, 0, 0).unwrap())
}

fn recorder() -> (ToastCallback, Arc<Mutex<Vec<(String, bool)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let callback = toast_callback(move |message, visible| {
        sink.lock().unwrap().push((message.to_string(), visible));
    });
    (callback, calls)
}

#[tokio::test]
async fn test_empty_list_export() {
    let _ = env_logger::builder().is_test(true).try_init();
    let settings = ExportSettings::default();

    let document = assembler(&settings).assemble(&request(Vec::new(), ViewMode::List));
    let tables: Vec<_> = document.tables().collect();
    assert_eq!(tables.len(), 1);
    assert!(tables[0].rows.is_empty());
    assert_eq!(tables[0].empty_text, NO_TASKS_TEXT);
    assert_eq!(document.page_breaks(), 0);

    let html = to_html(&document, settings.render_width_px);
    assert_eq!(html.matches(NO_TASKS_TEXT).count(), 1);

    let sink = MemorySink::new();
    let service = PdfExportService::with_sink(settings, sink.clone()).unwrap();
    let (toast, _calls) = recorder();
    let outcome = service
        .export(&request(Vec::new(), ViewMode::List), toast)
        .await
        .unwrap();

    assert_eq!(outcome.page_count, 1);
    assert_eq!(outcome.filename, "Scheduled-Tasks-Calendar-List-View-Oct-2026.pdf");
    let files = sink.files();
    assert_eq!(files.len(), 1);
    assert!(files[0].1.starts_with(b"%PDF"));
    assert_eq!(files[0].1.len(), outcome.size_bytes);
}

#[test]
fn test_large_month_falls_back_to_paged_list() {
    let settings = ExportSettings::default();
    let document = assembler(&settings).assemble(&request(events::mixed(45), ViewMode::Month));

    assert_eq!(document.grids().count(), 0);
    let tables: Vec<_> = document.tables().collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].rows.len(), 40);
    assert_eq!(tables[1].rows.len(), 5);
    assert_eq!(document.page_breaks(), 1);

    assert_eq!(tables[0].footer, None);
    assert_eq!(
        tables[1].footer.as_deref(),
        Some("Total: 45 | PPM: 15 | AMC: 15 | Other: 15")
    );
}

#[tokio::test]
async fn test_large_list_export_spans_two_pages() {
    let settings = ExportSettings::default();
    let req = request(events::mixed(45), ViewMode::List);

    let document = assembler(&settings).assemble(&req);
    let tables: Vec<_> = document.tables().collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].rows.len(), 40);
    assert_eq!(tables[1].rows.len(), 5);
    assert_eq!(document.page_breaks(), 1);

    let sink = MemorySink::new();
    let service = PdfExportService::with_sink(settings, sink.clone()).unwrap();
    let (toast, _calls) = recorder();
    let outcome = service.export(&req, toast).await.unwrap();

    assert_eq!(outcome.filename, "Scheduled-Tasks-Calendar-List-View-Oct-2026.pdf");
    assert_eq!(outcome.page_count, 2);
    assert_eq!(sink.files().len(), 1);
}

#[test]
fn test_list_is_chronological_with_invalid_dates_last() {
    let settings = ExportSettings::default();
    let mut input = events::mixed(3);
    input.insert(0, events::with_invalid_start());
    input.reverse();

    let document = assembler(&settings).assemble(&request(input, ViewMode::List));
    assert_eq!(document.event_ids(), vec!["1", "2", "3", "legacy-9"]);

    let html = to_html(&document, settings.render_width_px);
    assert!(html.contains("Invalid date"));
}

#[test]
fn test_year_grids_pad_adjacent_months() {
    let settings = ExportSettings::default();
    let mut req = request(events::one_per_month_2026(), ViewMode::Year);
    req.date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    let document = assembler(&settings).assemble(&req);
    let grids: Vec<_> = document.grids().collect();
    assert_eq!(grids.len(), 12);
    assert_eq!(document.page_breaks(), 11);
    assert_eq!(grids[0].title, "January 2026");
    assert_eq!(grids[11].title, "December 2026");

    // Jan 1 2026 is a Thursday: Sun-Wed belong to December 2025
    let first_week = &grids[0].weeks[0];
    assert_eq!(first_week[0].date, NaiveDate::from_ymd_opt(2025, 12, 28).unwrap());
    assert_eq!(first_week.iter().filter(|c| !c.in_month).count(), 4);
    assert!(first_week[4].in_month);

    // Dec 31 2026 is a Thursday: Fri-Sat belong to January 2027
    let last_week = grids[11].weeks.last().unwrap();
    assert_eq!(last_week.iter().filter(|c| !c.in_month).count(), 2);
    assert_eq!(last_week[6].date, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap());

    let mut ids = document.event_ids();
    ids.sort_by_key(|id| id.parse::<u32>().unwrap());
    let expected: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_february_2026_has_four_weeks() {
    let settings = ExportSettings::default();
    let mut req = request(Vec::new(), ViewMode::Month);
    req.date = dates::feb_2026();

    let document = assembler(&settings).assemble(&req);
    let grid = document.grids().next().unwrap();
    assert_eq!(grid.weeks.len(), 4);
    assert!(grid.weeks.iter().flatten().all(|cell| cell.in_month));
}

#[tokio::test]
async fn test_year_export_one_page_per_month() {
    let temp = TempDir::new().unwrap();
    let service = PdfExportService::with_sink(
        ExportSettings::default(),
        DirectorySink::new(temp.path()),
    )
    .unwrap();
    let (toast, _calls) = recorder();

    let outcome = service
        .export(&request(events::one_per_month_2026(), ViewMode::Year), toast)
        .await
        .unwrap();

    assert_eq!(outcome.filename, "Scheduled-Tasks-Calendar-Year-View-2026.pdf");
    assert_eq!(outcome.location, temp.path().join(&outcome.filename));
    assert_eq!(outcome.page_count, 12);
    let written = std::fs::read(&outcome.location).unwrap();
    assert!(written.starts_with(b"%PDF"));
    assert_eq!(service.render_host().attached_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_toast_sequence_for_successful_export() {
    let settings = ExportSettings {
        toast_duration_ms: 3000,
        ..Default::default()
    };
    let service = PdfExportService::with_sink(settings, MemorySink::new()).unwrap();
    let (toast, calls) = recorder();

    service
        .export(&request(events::mixed(5), ViewMode::Week), toast)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(3001)).await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ("Exporting Weekly View (5 tasks)...".to_string(), true),
            ("Weekly View exported successfully!".to_string(), true),
            (String::new(), false),
        ]
    );
}

#[tokio::test]
async fn test_sequential_exports_both_succeed() {
    let sink = MemorySink::new();
    let service = PdfExportService::with_sink(ExportSettings::default(), sink.clone()).unwrap();

    for view in [ViewMode::Day, ViewMode::List] {
        let (toast, _calls) = recorder();
        service.export(&request(events::mixed(3), view), toast).await.unwrap();
    }

    let names: Vec<String> = sink.files().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "Scheduled-Tasks-Calendar-Daily-View-Oct-2026.pdf",
            "Scheduled-Tasks-Calendar-List-View-Oct-2026.pdf",
        ]
    );
}
