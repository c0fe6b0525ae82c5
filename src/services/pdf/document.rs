//! Structured document tree produced by the assembler.
//!
//! The assembler emits data, not markup; render backends ([`super::html`],
//! [`super::raster`]) decide how each block looks.

use chrono::NaiveDate;

use crate::models::color::Color;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    pub fn page_breaks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn grids(&self) -> impl Iterator<Item = &MonthGrid> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    /// Ids of every event placed in a table row or grid cell, in document order
    pub fn event_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Table(table) => {
                    ids.extend(table.rows.iter().filter_map(|r| r.event_id.as_deref()))
                }
                Block::Grid(grid) => ids.extend(
                    grid.weeks
                        .iter()
                        .flatten()
                        .flat_map(|cell| cell.entries.iter().map(|e| e.event_id.as_str())),
                ),
                _ => {}
            }
        }
        ids
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Text { text: String, muted: bool },
    Panel(Panel),
    Table(Table),
    Grid(MonthGrid),
    Legend(Vec<LegendRow>),
    /// Forces the following block onto a new page
    PageBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLayout {
    /// One `label: value` line per item
    Stacked,
    /// Items side by side as equally wide tiles
    Tiles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub layout: PanelLayout,
    pub items: Vec<PanelItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelItem {
    pub label: String,
    pub value: String,
    pub accent: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    /// Relative width
    pub weight: u32,
}

impl Column {
    pub fn new(header: impl Into<String>, weight: u32) -> Self {
        Self {
            header: header.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
    /// Full-width closing row
    pub footer: Option<String>,
    /// Shown as a single full-width row when `rows` is empty
    pub empty_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub event_id: Option<String>,
    pub cells: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Muted(String),
    Badge { text: String, color: Color },
    Status { label: String, color: Color },
    Swatch(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub title: String,
    pub weeks: Vec<[DayCell; 7]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub entries: Vec<GridEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridEntry {
    pub event_id: String,
    pub title: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub label: String,
    pub items: Vec<Inline>,
}

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
