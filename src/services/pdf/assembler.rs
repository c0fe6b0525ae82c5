//! Document assembly: header, body (list or calendar grids) and legend.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use super::document::{
    Block, Column, DayCell, Document, GridEntry, Inline, LegendRow, MonthGrid, Panel, PanelItem,
    PanelLayout, Table, TableRow,
};
use crate::models::color::Color;
use crate::models::event::{CalendarEvent, TaskCounts, TaskKind, TaskStatus};
use crate::models::filters::CalendarFilters;
use crate::models::request::ExportRequest;
use crate::models::settings::ExportSettings;
use crate::models::view::ViewMode;
use crate::utils::date::{format_list_date, format_list_time, month_weeks};

pub const DOCUMENT_TITLE: &str = "Scheduled Tasks Calendar";
pub const NO_TASKS_TEXT: &str = "No tasks found";

/// Builds the printable document for one export request.
pub struct DocumentAssembler<'a> {
    settings: &'a ExportSettings,
    generated_at: NaiveDateTime,
}

impl<'a> DocumentAssembler<'a> {
    /// `generated_at` is printed in the header; its date is the highlighted "today"
    pub fn new(settings: &'a ExportSettings, generated_at: NaiveDateTime) -> Self {
        Self {
            settings,
            generated_at,
        }
    }

    /// Header, body and legend as a single document
    pub fn assemble(&self, request: &ExportRequest) -> Document {
        let mut document = Document::new();
        document.extend(self.build_header(
            request.view.label(),
            &request.active_filters,
            &request.events,
        ));
        document.extend(self.build_body(request));
        document.extend(build_legend());
        document
    }

    pub fn build_header(
        &self,
        view_label: &str,
        filters: &CalendarFilters,
        events: &[CalendarEvent],
    ) -> Vec<Block> {
        let mut blocks = vec![
            Block::Heading(format!("{} - {}", DOCUMENT_TITLE, view_label)),
            Block::Text {
                text: format!(
                    "Generated on: {}",
                    self.generated_at.format("%b %d, %Y at %I:%M %p")
                ),
                muted: true,
            },
        ];

        let applied = filters.applied();
        if !applied.is_empty() {
            blocks.push(Block::Panel(Panel {
                title: Some("Applied Filters".to_string()),
                layout: PanelLayout::Stacked,
                items: applied
                    .into_iter()
                    .map(|(label, value)| PanelItem {
                        label: label.to_string(),
                        value: value.to_string(),
                        accent: None,
                    })
                    .collect(),
            }));
        }

        let counts = TaskCounts::tally(events);
        let tile = |label: &str, value: usize, accent: Color| PanelItem {
            label: label.to_string(),
            value: value.to_string(),
            accent: Some(accent),
        };
        blocks.push(Block::Panel(Panel {
            title: None,
            layout: PanelLayout::Tiles,
            items: vec![
                tile("PPM Tasks", counts.ppm, TaskKind::Ppm.color()),
                tile("AMC Tasks", counts.amc, TaskKind::Amc.color()),
                tile("Other Tasks", counts.other, TaskKind::Other.color()),
                tile("Total Tasks", counts.total(), Color::BLACK),
            ],
        }));

        blocks
    }

    pub fn build_body(&self, request: &ExportRequest) -> Vec<Block> {
        if uses_list_layout(
            request.view,
            request.events.len(),
            self.settings.list_view_threshold,
        ) {
            return self.build_list(&request.events);
        }

        let placed = place_by_date(&request.events);
        match request.view {
            ViewMode::Year => {
                let year = request.date.year();
                let mut blocks = Vec::with_capacity(23);
                for month in 1..=12 {
                    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                        continue;
                    };
                    if month > 1 {
                        blocks.push(Block::PageBreak);
                    }
                    blocks.push(Block::Grid(self.build_month_grid(first, &placed)));
                }
                blocks
            }
            _ => vec![Block::Grid(self.build_month_grid(request.date, &placed))],
        }
    }

    fn build_list(&self, events: &[CalendarEvent]) -> Vec<Block> {
        let mut sorted: Vec<(Option<NaiveDateTime>, &CalendarEvent)> =
            events.iter().map(|e| (e.start_time(), e)).collect();
        sorted.sort_by_key(|(start, _)| (start.is_none(), *start));

        let rows: Vec<TableRow> = sorted
            .iter()
            .enumerate()
            .map(|(index, (start, event))| self.list_row(index + 1, *start, event))
            .collect();

        if rows.is_empty() {
            return vec![Block::Table(list_table(Vec::new(), None))];
        }

        let counts = TaskCounts::tally(events);
        let footer = format!(
            "Total: {} | PPM: {} | AMC: {} | Other: {}",
            counts.total(),
            counts.ppm,
            counts.amc,
            counts.other
        );

        let chunks: Vec<&[TableRow]> = rows.chunks(self.settings.list_rows_per_table.max(1)).collect();
        let last = chunks.len() - 1;
        let mut blocks = Vec::with_capacity(chunks.len() * 2);
        for (i, chunk) in chunks.into_iter().enumerate() {
            if i > 0 {
                blocks.push(Block::PageBreak);
            }
            let footer = (i == last).then(|| footer.clone());
            blocks.push(Block::Table(list_table(chunk.to_vec(), footer)));
        }
        blocks
    }

    fn list_row(
        &self,
        index: usize,
        start: Option<NaiveDateTime>,
        event: &CalendarEvent,
    ) -> TableRow {
        let (date, time) = match start {
            Some(start) => (format_list_date(&start), format_list_time(&start)),
            None => {
                log::warn!(
                    "Task {} has an unparseable start '{}'",
                    event.id,
                    event.start
                );
                ("Invalid date".to_string(), "--".to_string())
            }
        };

        let title = event.display_title();
        let title = if title.chars().count() > self.settings.long_title_chars {
            format!("{} (ID: {})", title, event.id)
        } else {
            title.to_string()
        };

        let kind = event.kind();
        let status: TaskStatus = event.task_status();

        TableRow {
            event_id: Some(event.id.to_string()),
            cells: vec![
                Inline::Text(index.to_string()),
                Inline::Text(date),
                Inline::Text(time),
                Inline::Text(title),
                Inline::Badge {
                    text: kind.label().to_string(),
                    color: kind.color(),
                },
                Inline::Status {
                    label: status.label(),
                    color: status.color(),
                },
                Inline::Muted(event.id.to_string()),
                Inline::Swatch(event.display_color()),
            ],
        }
    }

    fn build_month_grid(
        &self,
        date: NaiveDate,
        placed: &HashMap<NaiveDate, Vec<&CalendarEvent>>,
    ) -> MonthGrid {
        let today = self.generated_at.date();
        let weeks = month_weeks(date)
            .into_iter()
            .map(|week| {
                week.map(|day| {
                    let in_month = day.month() == date.month() && day.year() == date.year();
                    let entries: Vec<GridEntry> = if in_month {
                        placed
                            .get(&day)
                            .map(|events| {
                                events
                                    .iter()
                                    .take(self.settings.max_events_per_day)
                                    .map(|event| GridEntry {
                                        event_id: event.id.to_string(),
                                        title: event.display_title().to_string(),
                                        color: event.display_color(),
                                    })
                                    .collect()
                            })
                            .unwrap_or_default()
                    } else {
                        Vec::new()
                    };

                    DayCell {
                        date: day,
                        in_month,
                        is_today: in_month && day == today,
                        entries,
                    }
                })
            })
            .collect();

        MonthGrid {
            title: date.format("%B %Y").to_string(),
            weeks,
        }
    }
}

/// Whether the body is a flat list rather than calendar grids
pub fn uses_list_layout(view: ViewMode, event_count: usize, threshold: usize) -> bool {
    view == ViewMode::List || event_count > threshold
}

/// Static reference block for type badges and status colors
pub fn build_legend() -> Vec<Block> {
    let kinds = TaskKind::ALL
        .iter()
        .map(|kind| Inline::Badge {
            text: kind.label().to_string(),
            color: kind.color(),
        })
        .collect();

    let statuses = [
        TaskStatus::Scheduled,
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Overdue,
    ]
    .iter()
    .map(|status| {
        let label = match status {
            TaskStatus::Completed => "Completed / Closed".to_string(),
            other => other.label(),
        };
        Inline::Status {
            label,
            color: status.color(),
        }
    })
    .collect();

    vec![
        Block::Heading("Legend".to_string()),
        Block::Legend(vec![
            LegendRow {
                label: "Task Types".to_string(),
                items: kinds,
            },
            LegendRow {
                label: "Status".to_string(),
                items: statuses,
            },
        ]),
    ]
}

fn list_table(rows: Vec<TableRow>, footer: Option<String>) -> Table {
    Table {
        columns: vec![
            Column::new("#", 4),
            Column::new("Date", 15),
            Column::new("Time", 8),
            Column::new("Task", 30),
            Column::new("Type", 7),
            Column::new("Status", 12),
            Column::new("ID", 8),
            Column::new("Color", 6),
        ],
        rows,
        footer,
        empty_text: NO_TASKS_TEXT.to_string(),
    }
}

/// Events keyed by start date, each day ordered by start time
fn place_by_date(events: &[CalendarEvent]) -> HashMap<NaiveDate, Vec<&CalendarEvent>> {
    let mut timed: Vec<(NaiveDateTime, &CalendarEvent)> = events
        .iter()
        .filter_map(|e| e.start_time().map(|start| (start, e)))
        .collect();
    timed.sort_by_key(|(start, _)| *start);

    let mut placed: HashMap<NaiveDate, Vec<&CalendarEvent>> = HashMap::new();
    for (start, event) in timed {
        placed.entry(start.date()).or_default().push(event);
    }
    placed
}
