//! Headless bitmap backend.
//!
//! Layout walks the document once and emits a display list at absolute
//! pixel positions; painting replays that list onto an RGB bitmap whose
//! height is the laid-out content height.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, Rgb, RgbImage};
use std::future::Future;

use super::document::{
    Block, DayCell, Document, Inline, LegendRow, MonthGrid, Panel, PanelLayout, Table,
    WEEKDAY_NAMES,
};
use super::error::RasterError;
use super::paginator::PageLayout;
use super::surface::OffscreenContainer;
use crate::models::color::Color;
use crate::models::settings::ExportSettings;

const PADDING: u32 = 24;
const GLYPH: u32 = 8;
const LINE: u32 = 12;
const BLOCK_GAP: u32 = 12;
const HEADER_ROW: u32 = 20;
const BODY_ROW: u32 = 18;
const EMPTY_ROW: u32 = 28;
const GRID_ENTRY: u32 = 11;
const MIN_GRID_ENTRIES: u32 = 4;

const HEADER_FILL: Color = Color::rgb(55, 65, 81);
const STRIPE_FILL: Color = Color::rgb(249, 250, 251);
const FOOTER_FILL: Color = Color::rgb(229, 231, 235);
const TODAY_FILL: Color = Color::rgb(254, 249, 195);
const TODAY_BORDER: Color = Color::rgb(59, 130, 246);
const DIMMED_TEXT: Color = Color::rgb(156, 163, 175);

/// Converts a mounted container into a bitmap.
pub trait Rasterizer {
    /// Resolves once fonts and images used by the container are ready.
    /// Callers bound the wait with their own timeout.
    fn settled(&self, container: &OffscreenContainer) -> impl Future<Output = ()> + Send;

    fn rasterize(&self, container: &OffscreenContainer) -> Result<Capture, RasterError>;
}

/// Full-height bitmap of a rendered container, stored as horizontal bands.
///
/// Bands are stacked top to bottom and share one width. A paged rasterizer
/// emits one band per page so no single bitmap outgrows the JPEG limits.
#[derive(Debug, Clone)]
pub struct Capture {
    bands: Vec<RgbImage>,
    width: u32,
    height: u32,
}

impl Capture {
    pub fn new(image: RgbImage) -> Self {
        Self::from_bands(vec![image])
    }

    pub fn from_bands(bands: Vec<RgbImage>) -> Self {
        let width = bands.first().map(RgbImage::width).unwrap_or(0);
        let height = bands.iter().map(RgbImage::height).sum();
        Self {
            bands,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Pixel at absolute position `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        let mut top = 0;
        for band in &self.bands {
            if y < top + band.height() {
                return (x < band.width()).then(|| *band.get_pixel(x, y - top));
            }
            top += band.height();
        }
        None
    }

    /// Rows `y..y + height` as a new bitmap of the same width
    pub fn rows(&self, y: u32, height: u32) -> RgbImage {
        let mut out = RgbImage::new(self.width, height);
        let end = y.saturating_add(height);
        let mut top = 0;
        for band in &self.bands {
            let bottom = top + band.height();
            let from = y.max(top);
            let to = end.min(bottom);
            if from < to {
                let strip = imageops::crop_imm(band, 0, from - top, self.width, to - from).to_image();
                imageops::replace(&mut out, &strip, 0, (from - y) as i64);
            }
            top = bottom;
        }
        out
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, RasterError> {
        match self.bands.as_slice() {
            [band] => encode_jpeg(band, quality),
            _ => encode_jpeg(&self.rows(0, self.height), quality),
        }
    }
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, RasterError> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder.encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)?;
    Ok(buffer)
}

/// Built-in rasterizer using 8x8 bitmap glyphs.
#[derive(Debug, Clone)]
pub struct BitmapRasterizer {
    page_rows: Option<u32>,
    max_height: u32,
    min_grid_entries: u32,
}

impl BitmapRasterizer {
    /// Page breaks snap to the slice height the paginator will use
    pub fn new(settings: &ExportSettings) -> Self {
        let layout = PageLayout::from_settings(settings);
        Self {
            page_rows: Some(layout.rows_per_page(settings.render_width_px)),
            max_height: settings.max_surface_height_px,
            min_grid_entries: (settings.max_events_per_day as u32).max(MIN_GRID_ENTRIES),
        }
    }

    /// Lay out without page alignment
    pub fn unpaged(max_height: u32) -> Self {
        Self {
            page_rows: None,
            max_height,
            min_grid_entries: MIN_GRID_ENTRIES,
        }
    }

    /// Height in px the document occupies at `width_px`
    pub fn measure(&self, document: &Document, width_px: u32) -> u32 {
        self.layout(document, width_px).height
    }

    fn layout(&self, document: &Document, width_px: u32) -> DisplayList {
        let mut layout = Layout {
            inner: width_px.saturating_sub(PADDING * 2).max(GLYPH),
            page_rows: self.page_rows,
            grid_entries: self.min_grid_entries,
            cursor: PADDING,
            ops: Vec::new(),
        };
        for block in &document.blocks {
            layout.block(block);
        }
        DisplayList {
            height: layout.cursor + PADDING,
            ops: layout.ops,
        }
    }
}

impl Rasterizer for BitmapRasterizer {
    fn settled(&self, _container: &OffscreenContainer) -> impl Future<Output = ()> + Send {
        // Glyphs are compiled in; nothing to wait for
        std::future::ready(())
    }

    fn rasterize(&self, container: &OffscreenContainer) -> Result<Capture, RasterError> {
        let width = container.width_px();
        let list = self.layout(container.document(), width);
        let band_rows = self.page_rows.unwrap_or(list.height).clamp(1, list.height.max(1));
        if band_rows > self.max_height {
            return Err(RasterError::SurfaceTooLarge {
                width,
                height: band_rows,
                max: self.max_height,
            });
        }

        let mut bands = Vec::with_capacity(list.height.div_ceil(band_rows) as usize);
        let mut top = 0;
        while top < list.height {
            let rows = band_rows.min(list.height - top);
            let bottom = top + rows;
            let mut band = RgbImage::from_pixel(width, rows, Rgb(Color::WHITE.to_pixel()));
            for op in list.ops.iter().filter(|op| op.overlaps(top, bottom)) {
                paint(&mut band, top, op);
            }
            bands.push(band);
            top = bottom;
        }
        log::debug!(
            "Rasterized container {} into {}x{} px ({} bands, {} draw ops)",
            container.id(),
            width,
            list.height,
            bands.len(),
            list.ops.len()
        );
        Ok(Capture::from_bands(bands))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Fill {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: Color,
    },
    Stroke {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: Color,
    },
    Dot {
        cx: u32,
        cy: u32,
        r: u32,
        color: Color,
    },
    Text {
        x: u32,
        y: u32,
        text: String,
        scale: u32,
        color: Color,
    },
}

impl Op {
    /// Whether the op can touch any row in `top..bottom`
    fn overlaps(&self, top: u32, bottom: u32) -> bool {
        let (start, end) = match self {
            Op::Fill { y, h, .. } | Op::Stroke { y, h, .. } => (*y, y.saturating_add(*h)),
            Op::Dot { cy, r, .. } => (cy.saturating_sub(*r), cy + r + 1),
            Op::Text { y, scale, .. } => (*y, y + GLYPH * scale),
        };
        start < bottom && end > top
    }
}

struct DisplayList {
    height: u32,
    ops: Vec<Op>,
}

struct Layout {
    inner: u32,
    page_rows: Option<u32>,
    grid_entries: u32,
    cursor: u32,
    ops: Vec<Op>,
}

impl Layout {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(text) => {
                self.text(PADDING, self.cursor, text, self.inner, 2, Color::BLACK);
                self.cursor += GLYPH * 2 + 4;
            }
            Block::Text { text, muted } => {
                let color = if *muted { Color::GRAY } else { Color::BLACK };
                self.text(PADDING, self.cursor, text, self.inner, 1, color);
                self.cursor += LINE;
            }
            Block::Panel(panel) => self.panel(panel),
            Block::Table(table) => self.table(table),
            Block::Grid(grid) => self.grid(grid),
            Block::Legend(rows) => self.legend(rows),
            Block::PageBreak => {
                if let Some(rows) = self.page_rows.filter(|rows| *rows > 0) {
                    let remainder = self.cursor % rows;
                    if remainder != 0 {
                        self.cursor += rows - remainder;
                    }
                }
                return;
            }
        }
        self.cursor += BLOCK_GAP;
    }

    fn panel(&mut self, panel: &Panel) {
        let top = self.cursor;
        match panel.layout {
            PanelLayout::Stacked => {
                let title_rows = panel.title.is_some() as u32;
                let height = 8 + (title_rows + panel.items.len() as u32) * LINE + 4;
                self.fill(PADDING, top, self.inner, height, Color::LIGHT_GRAY);

                let mut y = top + 6;
                if let Some(title) = &panel.title {
                    self.text(PADDING + 8, y, title, self.inner.saturating_sub(16), 1, Color::BLACK);
                    y += LINE;
                }
                for item in &panel.items {
                    let line = format!("{}: {}", item.label, item.value);
                    self.text(PADDING + 8, y, &line, self.inner.saturating_sub(16), 1, Color::BLACK);
                    y += LINE;
                }
                self.cursor = top + height;
            }
            PanelLayout::Tiles => {
                let height = 44;
                let count = panel.items.len().max(1) as u32;
                let gap = 8;
                let tile_w = self.inner.saturating_sub(gap * (count - 1)) / count;
                self.fill(PADDING, top, self.inner, height, Color::LIGHT_GRAY);

                for (i, item) in panel.items.iter().enumerate() {
                    let x = PADDING + i as u32 * (tile_w + gap);
                    let accent = item.accent.unwrap_or(Color::BLACK);
                    self.fill(x + 2, top + 2, tile_w.saturating_sub(4), height - 4, Color::WHITE);
                    self.fill(x + 2, top + 2, tile_w.saturating_sub(4), 3, accent);
                    self.centered(x, top + 9, tile_w, &item.value, 2, accent);
                    self.centered(x, top + 29, tile_w, &item.label, 1, Color::BLACK);
                }
                self.cursor = top + height;
            }
        }
    }

    fn table(&mut self, table: &Table) {
        let columns = split_widths(
            self.inner,
            &table.columns.iter().map(|c| c.weight).collect::<Vec<_>>(),
        );

        let top = self.cursor;
        self.fill(PADDING, top, self.inner, HEADER_ROW, HEADER_FILL);
        for (column, (x, w)) in table.columns.iter().zip(&columns) {
            self.text(x + 4, top + 6, &column.header, w.saturating_sub(8), 1, Color::WHITE);
        }
        self.cursor += HEADER_ROW;

        if table.rows.is_empty() {
            self.stroke(PADDING, self.cursor, self.inner, EMPTY_ROW, Color::BORDER);
            self.centered(PADDING, self.cursor + 10, self.inner, &table.empty_text, 1, Color::GRAY);
            self.cursor += EMPTY_ROW;
        }

        for (i, row) in table.rows.iter().enumerate() {
            let y = self.cursor;
            if i % 2 == 1 {
                self.fill(PADDING, y, self.inner, BODY_ROW, STRIPE_FILL);
            }
            self.fill(PADDING, y + BODY_ROW - 1, self.inner, 1, FOOTER_FILL);
            for (cell, (x, w)) in row.cells.iter().zip(&columns) {
                self.inline(*x + 4, y + 5, w.saturating_sub(8), cell);
            }
            self.cursor += BODY_ROW;
        }

        if let Some(footer) = &table.footer {
            self.fill(PADDING, self.cursor, self.inner, HEADER_ROW, FOOTER_FILL);
            self.text(PADDING + 4, self.cursor + 6, footer, self.inner.saturating_sub(8), 1, Color::BLACK);
            self.cursor += HEADER_ROW;
        }
    }

    fn grid(&mut self, grid: &MonthGrid) {
        self.text(PADDING, self.cursor, &grid.title, self.inner, 2, Color::BLACK);
        self.cursor += GLYPH * 2 + 6;

        let columns = split_widths(self.inner, &[1; 7]);
        self.fill(PADDING, self.cursor, self.inner, BODY_ROW, HEADER_FILL);
        for (name, (x, w)) in WEEKDAY_NAMES.iter().zip(&columns) {
            self.centered(*x, self.cursor + 5, *w, name, 1, Color::WHITE);
        }
        self.cursor += BODY_ROW;

        for week in &grid.weeks {
            let entries = week
                .iter()
                .map(|cell| cell.entries.len() as u32)
                .max()
                .unwrap_or(0)
                .max(self.grid_entries);
            let height = 16 + entries * GRID_ENTRY + 2;
            for (cell, (x, w)) in week.iter().zip(&columns) {
                self.day_cell(*x, self.cursor, *w, height, cell);
            }
            self.cursor += height;
        }
    }

    fn day_cell(&mut self, x: u32, y: u32, w: u32, h: u32, cell: &DayCell) {
        let background = if cell.is_today {
            TODAY_FILL
        } else if cell.in_month {
            Color::WHITE
        } else {
            Color::LIGHT_GRAY
        };
        self.fill(x, y, w, h, background);
        let border = if cell.is_today { TODAY_BORDER } else { Color::BORDER };
        self.stroke(x, y, w, h, border);

        let number_color = if cell.in_month { Color::BLACK } else { DIMMED_TEXT };
        let day = chrono::Datelike::day(&cell.date).to_string();
        self.text(x + 3, y + 4, &day, w.saturating_sub(6), 1, number_color);

        let mut entry_y = y + 16;
        for entry in &cell.entries {
            self.fill(x + 3, entry_y, 3, GLYPH, entry.color);
            self.text(x + 8, entry_y, &entry.title, w.saturating_sub(10), 1, Color::BLACK);
            entry_y += GRID_ENTRY;
        }
    }

    fn legend(&mut self, rows: &[LegendRow]) {
        for row in rows {
            let label = format!("{}:", row.label);
            self.text(PADDING, self.cursor + 4, &label, self.inner, 1, Color::BLACK);
            let mut x = PADDING + (label.chars().count() as u32 + 1) * GLYPH;
            for item in &row.items {
                let remaining = (PADDING + self.inner).saturating_sub(x);
                x += self.inline(x, self.cursor + 4, remaining, item) + GLYPH * 2;
            }
            self.cursor += 16;
        }
    }

    /// Draws an inline item and returns the width it used
    fn inline(&mut self, x: u32, y: u32, max_w: u32, inline: &Inline) -> u32 {
        match inline {
            Inline::Text(text) => self.text(x, y, text, max_w, 1, Color::BLACK),
            Inline::Muted(text) => self.text(x, y, text, max_w, 1, Color::GRAY),
            Inline::Badge { text, color } => {
                let text = fit(text, max_w.saturating_sub(8), 1);
                let w = text_width(&text, 1) + 8;
                self.fill(x, y.saturating_sub(2), w, GLYPH + 4, *color);
                self.text(x + 4, y, &text, w, 1, Color::WHITE);
                w
            }
            Inline::Status { label, color } => {
                self.ops.push(Op::Dot {
                    cx: x + 4,
                    cy: y + 4,
                    r: 4,
                    color: *color,
                });
                12 + self.text(x + 12, y, label, max_w.saturating_sub(12), 1, Color::BLACK)
            }
            Inline::Swatch(color) => {
                self.fill(x, y.saturating_sub(1), 10, 10, *color);
                self.stroke(x, y.saturating_sub(1), 10, 10, Color::BORDER);
                10
            }
        }
    }

    /// Draws text truncated to `max_w` and returns its width
    fn text(&mut self, x: u32, y: u32, text: &str, max_w: u32, scale: u32, color: Color) -> u32 {
        let text = fit(text, max_w, scale);
        let width = text_width(&text, scale);
        if !text.is_empty() {
            self.ops.push(Op::Text {
                x,
                y,
                text,
                scale,
                color,
            });
        }
        width
    }

    fn centered(&mut self, x: u32, y: u32, w: u32, text: &str, scale: u32, color: Color) {
        let fitted = fit(text, w, scale);
        let offset = w.saturating_sub(text_width(&fitted, scale)) / 2;
        self.text(x + offset, y, &fitted, w, scale, color);
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.ops.push(Op::Fill { x, y, w, h, color });
    }

    fn stroke(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.ops.push(Op::Stroke { x, y, w, h, color });
    }
}

/// Column origins and widths proportional to `weights`; the last column absorbs rounding
fn split_widths(total: u32, weights: &[u32]) -> Vec<(u32, u32)> {
    let sum: u32 = weights.iter().sum::<u32>().max(1);
    let mut columns = Vec::with_capacity(weights.len());
    let mut x = 0;
    for (i, weight) in weights.iter().enumerate() {
        let w = if i + 1 == weights.len() {
            total.saturating_sub(x)
        } else {
            total * weight / sum
        };
        columns.push((PADDING + x, w));
        x += w;
    }
    columns
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

/// Truncate `text` with an ellipsis so it fits in `max_w` pixels
fn fit(text: &str, max_w: u32, scale: u32) -> String {
    let max_chars = (max_w / (GLYPH * scale.max(1))) as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars < 4 {
        return text.chars().take(max_chars).collect();
    }
    let mut truncated: String = text.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Paint `op` into a band whose first row is document row `top`
fn paint(image: &mut RgbImage, top: u32, op: &Op) {
    match op {
        Op::Fill { x, y, w, h, color } => fill_rect(image, top, *x, *y, *w, *h, *color),
        Op::Stroke { x, y, w, h, color } => {
            if *w == 0 || *h == 0 {
                return;
            }
            fill_rect(image, top, *x, *y, *w, 1, *color);
            fill_rect(image, top, *x, y + h - 1, *w, 1, *color);
            fill_rect(image, top, *x, *y, 1, *h, *color);
            fill_rect(image, top, x + w - 1, *y, 1, *h, *color);
        }
        Op::Dot { cx, cy, r, color } => {
            let r = *r as i64;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy <= r * r {
                        let px = *cx as i64 + dx;
                        let py = *cy as i64 + dy;
                        if px >= 0 && py >= 0 {
                            put(image, top, px as u32, py as u32, *color);
                        }
                    }
                }
            }
        }
        Op::Text {
            x,
            y,
            text,
            scale,
            color,
        } => {
            for (i, c) in text.chars().enumerate() {
                let origin_x = x + i as u32 * GLYPH * scale;
                for (row, bits) in glyph(c).iter().enumerate() {
                    for col in 0..8u32 {
                        if bits & (1 << col) != 0 {
                            fill_rect(
                                image,
                                top,
                                origin_x + col * scale,
                                y + row as u32 * scale,
                                *scale,
                                *scale,
                                *color,
                            );
                        }
                    }
                }
            }
        }
    }
}

fn fill_rect(image: &mut RgbImage, top: u32, x: u32, y: u32, w: u32, h: u32, color: Color) {
    let x_end = x.saturating_add(w).min(image.width());
    let y_start = y.max(top);
    let y_end = y.saturating_add(h).min(top.saturating_add(image.height()));
    for py in y_start..y_end {
        for px in x..x_end {
            image.put_pixel(px, py - top, Rgb(color.to_pixel()));
        }
    }
}

fn put(image: &mut RgbImage, top: u32, x: u32, y: u32, color: Color) {
    if x < image.width() && y >= top && y - top < image.height() {
        image.put_pixel(x, y - top, Rgb(color.to_pixel()));
    }
}
