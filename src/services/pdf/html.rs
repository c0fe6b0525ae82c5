//! HTML rendering of an assembled document.
//!
//! Produces a self-contained fragment with inline styles, suitable for
//! previews. Every placed event carries exactly one `data-event-id` attribute.

use std::fmt::Write;

use super::document::{
    Block, DayCell, Document, Inline, LegendRow, MonthGrid, Panel, PanelLayout, Table,
    WEEKDAY_NAMES,
};

const PAGE_BREAK: &str = "<div class=\"page-break\" style=\"page-break-before:always\"></div>";

/// Render `document` as an HTML fragment at the given container width
pub fn to_html(document: &Document, width_px: u32) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        "<div class=\"calendar-export\" style=\"width:{}px;font-family:Arial,sans-serif;color:#111827;background:#ffffff;padding:24px;box-sizing:border-box\">",
        width_px
    );

    for block in &document.blocks {
        match block {
            Block::Heading(text) => {
                let _ = write!(out, "<h2 style=\"margin:0 0 8px\">{}</h2>", escape(text));
            }
            Block::Text { text, muted } => {
                let color = if *muted { "#6b7280" } else { "#111827" };
                let _ = write!(
                    out,
                    "<p style=\"margin:0 0 12px;color:{}\">{}</p>",
                    color,
                    escape(text)
                );
            }
            Block::Panel(panel) => render_panel(&mut out, panel),
            Block::Table(table) => render_table(&mut out, table),
            Block::Grid(grid) => render_grid(&mut out, grid),
            Block::Legend(rows) => render_legend(&mut out, rows),
            Block::PageBreak => out.push_str(PAGE_BREAK),
        }
    }

    out.push_str("</div>");
    out
}

fn render_panel(out: &mut String, panel: &Panel) {
    out.push_str("<div class=\"panel\" style=\"background:#f3f4f6;border-radius:6px;padding:10px;margin-bottom:12px\">");
    if let Some(title) = &panel.title {
        let _ = write!(out, "<strong>{}</strong>", escape(title));
    }
    match panel.layout {
        PanelLayout::Stacked => {
            for item in &panel.items {
                let _ = write!(
                    out,
                    "<div><span style=\"color:#6b7280\">{}:</span> {}</div>",
                    escape(&item.label),
                    escape(&item.value)
                );
            }
        }
        PanelLayout::Tiles => {
            out.push_str("<div style=\"display:flex;gap:8px\">");
            for item in &panel.items {
                let accent = item
                    .accent
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "#111827".to_string());
                let _ = write!(
                    out,
                    "<div class=\"tile\" style=\"flex:1;background:#ffffff;border-top:3px solid {};padding:6px;text-align:center\"><div style=\"font-size:20px;font-weight:bold;color:{}\">{}</div><div style=\"font-size:11px\">{}</div></div>",
                    accent,
                    accent,
                    escape(&item.value),
                    escape(&item.label)
                );
            }
            out.push_str("</div>");
        }
    }
    out.push_str("</div>");
}

fn render_table(out: &mut String, table: &Table) {
    out.push_str("<table class=\"task-list\" style=\"width:100%;border-collapse:collapse;font-size:11px;margin-bottom:12px\"><thead><tr>");
    let total: u32 = table.columns.iter().map(|c| c.weight).sum::<u32>().max(1);
    for column in &table.columns {
        let _ = write!(
            out,
            "<th style=\"width:{}%;background:#374151;color:#ffffff;padding:4px;text-align:left\">{}</th>",
            column.weight * 100 / total,
            escape(&column.header)
        );
    }
    out.push_str("</tr></thead><tbody>");

    let span = table.columns.len().max(1);
    if table.rows.is_empty() {
        let _ = write!(
            out,
            "<tr class=\"empty\"><td colspan=\"{}\" style=\"padding:12px;text-align:center;color:#6b7280\">{}</td></tr>",
            span,
            escape(&table.empty_text)
        );
    }

    for (i, row) in table.rows.iter().enumerate() {
        let background = if i % 2 == 1 { "#f9fafb" } else { "#ffffff" };
        match &row.event_id {
            Some(id) => {
                let _ = write!(
                    out,
                    "<tr data-event-id=\"{}\" style=\"background:{}\">",
                    escape(id),
                    background
                );
            }
            None => {
                let _ = write!(out, "<tr style=\"background:{}\">", background);
            }
        }
        for cell in &row.cells {
            out.push_str("<td style=\"padding:4px;border-bottom:1px solid #e5e7eb\">");
            render_inline(out, cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }

    if let Some(footer) = &table.footer {
        let _ = write!(
            out,
            "<tr class=\"summary\"><td colspan=\"{}\" style=\"padding:6px;font-weight:bold;background:#e5e7eb\">{}</td></tr>",
            span,
            escape(footer)
        );
    }
    out.push_str("</tbody></table>");
}

fn render_grid(out: &mut String, grid: &MonthGrid) {
    let _ = write!(
        out,
        "<h3 style=\"margin:8px 0\">{}</h3><table class=\"month-grid\" style=\"width:100%;border-collapse:collapse;table-layout:fixed;font-size:10px\"><thead><tr>",
        escape(&grid.title)
    );
    for name in WEEKDAY_NAMES {
        let _ = write!(
            out,
            "<th style=\"background:#374151;color:#ffffff;padding:4px\">{}</th>",
            name
        );
    }
    out.push_str("</tr></thead><tbody>");

    for week in &grid.weeks {
        out.push_str("<tr>");
        for cell in week {
            render_day_cell(out, cell);
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

fn render_day_cell(out: &mut String, cell: &DayCell) {
    let background = if cell.is_today {
        "#fef9c3"
    } else if cell.in_month {
        "#ffffff"
    } else {
        "#f3f4f6"
    };
    let color = if cell.in_month { "#111827" } else { "#9ca3af" };
    let _ = write!(
        out,
        "<td data-date=\"{}\" style=\"height:70px;vertical-align:top;border:1px solid #d1d5db;padding:2px;background:{};color:{}\"><div style=\"font-weight:bold\">{}</div>",
        cell.date.format("%Y-%m-%d"),
        background,
        color,
        chrono::Datelike::day(&cell.date)
    );
    for entry in &cell.entries {
        let _ = write!(
            out,
            "<div class=\"event\" data-event-id=\"{}\" style=\"border-left:3px solid {};padding-left:2px;overflow:hidden;white-space:nowrap\">{}</div>",
            escape(&entry.event_id),
            entry.color,
            escape(&entry.title)
        );
    }
    out.push_str("</td>");
}

fn render_legend(out: &mut String, rows: &[LegendRow]) {
    out.push_str("<div class=\"legend\" style=\"font-size:11px\">");
    for row in rows {
        let _ = write!(out, "<div><strong>{}:</strong> ", escape(&row.label));
        for item in &row.items {
            render_inline(out, item);
            out.push(' ');
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

fn render_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => out.push_str(&escape(text)),
        Inline::Muted(text) => {
            let _ = write!(out, "<span style=\"color:#6b7280\">{}</span>", escape(text));
        }
        Inline::Badge { text, color } => {
            let _ = write!(
                out,
                "<span class=\"badge\" style=\"background:{};color:#ffffff;border-radius:3px;padding:1px 4px\">{}</span>",
                color,
                escape(text)
            );
        }
        Inline::Status { label, color } => {
            let _ = write!(
                out,
                "<span class=\"status\"><span style=\"display:inline-block;width:8px;height:8px;border-radius:50%;background:{}\"></span> {}</span>",
                color,
                escape(label)
            );
        }
        Inline::Swatch(color) => {
            let _ = write!(
                out,
                "<span class=\"swatch\" style=\"display:inline-block;width:12px;height:12px;border:1px solid #d1d5db;background:{}\"></span>",
                color
            );
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
