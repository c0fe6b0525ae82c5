// Property-based tests for pagination and event placement
// Random event sets and surface heights must never lose or duplicate content

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use task_calendar_pdf::services::pdf::assembler::DocumentAssembler;
use task_calendar_pdf::services::pdf::html::to_html;
use task_calendar_pdf::services::pdf::paginator::{plan_slices, PageLayout};
use task_calendar_pdf::services::pdf::raster::BitmapRasterizer;
use task_calendar_pdf::{CalendarEvent, ExportRequest, ExportSettings, ViewMode};

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn october_event(id: usize, day: u32, hour: u32) -> CalendarEvent {
    CalendarEvent::new(
        id as i64,
        format!("Task {}", id),
        format!("2026-10-{:02}T{:02}:00:00", day, hour),
    )
}

proptest! {
    /// Property: slices cover the surface exactly, in order, one page per slice
    #[test]
    fn prop_slices_cover_height(total in 0u32..200_000, per_page in 1u32..5_000) {
        let slices = plan_slices(total, per_page);

        prop_assert_eq!(slices.len() as u32, total.div_ceil(per_page));
        prop_assert_eq!(slices.iter().map(|s| s.height).sum::<u32>(), total);

        let mut expected_y = 0;
        for slice in &slices {
            prop_assert_eq!(slice.y, expected_y);
            prop_assert!(slice.height >= 1 && slice.height <= per_page);
            expected_y += slice.height;
        }
    }

    /// Property: every page fits inside the margins for any page geometry
    #[test]
    fn prop_rows_per_page_fit_content_box(
        width_px in 100u32..4000,
        page_w in 100.0f32..600.0,
        page_h in 100.0f32..900.0,
        margin in 0.0f32..40.0,
    ) {
        let layout = PageLayout { page_width_mm: page_w, page_height_mm: page_h, margin_mm: margin };
        let rows = layout.rows_per_page(width_px);
        prop_assert!(layout.rows_to_mm(rows, width_px) <= layout.content_height_mm() + 0.01);
    }

    /// Property: the list shows each event exactly once
    #[test]
    fn prop_list_contains_each_event_once(
        starts in prop::collection::vec((1u32..=31, 0u32..24), 0..120)
    ) {
        let settings = ExportSettings::default();
        let events: Vec<_> = starts
            .iter()
            .enumerate()
            .map(|(i, (day, hour))| october_event(i + 1, *day, *hour))
            .collect();
        let request = ExportRequest::new(events, ViewMode::List, generated_at().date());

        let document = DocumentAssembler::new(&settings, generated_at()).assemble(&request);
        let html = to_html(&document, settings.render_width_px);

        let mut ids = document.event_ids();
        ids.sort_by_key(|id| id.parse::<usize>().unwrap());
        let expected: Vec<String> = (1..=starts.len()).map(|i| i.to_string()).collect();
        prop_assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(html.matches("data-event-id=").count(), starts.len());
    }

    /// Property: the month grid shows each in-month event exactly once
    #[test]
    fn prop_month_grid_contains_each_event_once(
        days in prop::collection::btree_set(1u32..=31, 0..=20)
    ) {
        let settings = ExportSettings::default();
        let events: Vec<_> = days
            .iter()
            .enumerate()
            .map(|(i, day)| october_event(i + 1, *day, 10))
            .collect();
        let request = ExportRequest::new(events, ViewMode::Month, generated_at().date());

        let document = DocumentAssembler::new(&settings, generated_at()).assemble(&request);
        prop_assert_eq!(document.grids().count(), 1);
        prop_assert_eq!(document.event_ids().len(), days.len());

        let html = to_html(&document, settings.render_width_px);
        prop_assert_eq!(html.matches("data-event-id=").count(), days.len());
    }

    /// Property: each list table starts on its own page
    #[test]
    fn prop_list_tables_start_on_page_boundaries(count in 1usize..200) {
        let settings = ExportSettings::default();
        let events: Vec<_> = (0..count)
            .map(|i| october_event(i + 1, 1 + (i % 31) as u32, (i % 24) as u32))
            .collect();
        let request = ExportRequest::new(events, ViewMode::List, generated_at().date());
        let document = DocumentAssembler::new(&settings, generated_at()).assemble(&request);

        let width = settings.render_width_px;
        let height = BitmapRasterizer::new(&settings).measure(&document, width);
        let rows = PageLayout::from_settings(&settings).rows_per_page(width);

        prop_assert_eq!(height.div_ceil(rows) as usize, document.tables().count());
    }
}
