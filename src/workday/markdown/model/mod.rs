use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Runtime type of a spreadsheet cell as seen by the schema detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Date,
    Empty,
    /// Numbers, booleans, error cells and anything else that is neither text
    /// nor a date.
    Other,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Text => write!(f, "text"),
            CellKind::Date => write!(f, "date"),
            CellKind::Empty => write!(f, "empty"),
            CellKind::Other => write!(f, "other"),
        }
    }
}

/// A typed cell value produced by the row reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Date(NaiveDateTime),
    /// Non-text, non-date value kept in its display form for diagnostics.
    Other(String),
    Empty,
}

impl Cell {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Creates a date cell at midnight of the given day.
    pub fn date(date: NaiveDate) -> Self {
        Cell::Date(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Text(_) => CellKind::Text,
            Cell::Date(_) => CellKind::Date,
            Cell::Other(_) => CellKind::Other,
            Cell::Empty => CellKind::Empty,
        }
    }

    /// Text accessor. Non-text cells yield their display form; empty cells an
    /// empty string.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(value) | Cell::Other(value) => value.clone(),
            Cell::Date(value) => value.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Date accessor, `None` unless the cell holds a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(value) => Some(value.date()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One spreadsheet row together with its one-based line number in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<Cell>) -> Self {
        Self { line, cells }
    }

    /// Number of fields present in the row.
    pub fn field_count(&self) -> usize {
        self.cells.len()
    }

    /// Runtime type of the field at `index`; out-of-range fields are empty.
    pub fn kind(&self, index: usize) -> CellKind {
        self.cells.get(index).map_or(CellKind::Empty, Cell::kind)
    }

    pub fn text(&self, index: usize) -> String {
        self.cells.get(index).map(Cell::as_text).unwrap_or_default()
    }

    /// Text of the field at `index`, or `None` when the cell is empty.
    pub fn optional_text(&self, index: usize) -> Option<String> {
        match self.cells.get(index) {
            None | Some(Cell::Empty) => None,
            Some(cell) => Some(cell.as_text()),
        }
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.cells.get(index).and_then(Cell::as_date)
    }

    /// Renders every field as `value (type: kind)`, comma separated.
    pub fn dump(&self) -> String {
        self.cells
            .iter()
            .map(|cell| format!("{cell} (type: {})", cell.kind()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A normalized peer feedback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Recipient, trimmed.
    pub to: String,
    /// Author, trimmed.
    pub from: String,
    pub date: NaiveDate,
    pub question: String,
    /// Free-text answer; `None` when the source cell was empty.
    pub response: Option<String>,
    pub confidential: bool,
}

/// Feedback grouped by recipient. Recipients iterate in ascending byte order
/// of their name; each group keeps ingestion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub groups: BTreeMap<String, Vec<Feedback>>,
}

impl Report {
    pub fn recipient_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
