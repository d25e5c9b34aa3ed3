//! Schema detection and row normalization.
//!
//! Two export layouts are understood:
//!
//! * the wide layout, ten columns with explicit recipient and giver columns;
//! * the narrow layout, six columns where recipient and giver are embedded in
//!   a compound "action" text such as
//!   `Feedback Given: on Carol from Dave on 2024-05-01`.
//!
//! Layout detection happens per row, so a workbook can be read without knowing
//! which export produced it.

use std::sync::LazyLock;

use regex::Regex;

use crate::workday::markdown::error::RowError;
use crate::workday::markdown::model::{CellKind, Feedback, RawRow};

/// Non-matching rows tolerated silently at the top of every file.
pub const HEADER_ROWS: usize = 2;

pub const WIDE_FIELD_COUNT: usize = 10;
pub const NARROW_FIELD_COUNT: usize = 6;

static ACTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^Feedback Given: on (?P<receiver>.+?) from (?P<giver>.+?) on .*$")
        .expect("action pattern is valid")
});

/// Layout a row was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSchema {
    Wide,
    Narrow,
}

impl RowSchema {
    /// Classifies `row`, or returns `None` when it fits neither layout.
    pub fn detect(row: &RawRow) -> Option<RowSchema> {
        if row.field_count() == WIDE_FIELD_COUNT && row.kind(2) == CellKind::Date {
            return Some(RowSchema::Wide);
        }
        if row.field_count() == NARROW_FIELD_COUNT
            && [0, 3, 4, 5].iter().all(|&index| row.kind(index) == CellKind::Text)
            && row.kind(1) == CellKind::Date
        {
            return Some(RowSchema::Narrow);
        }
        None
    }
}

/// Receiver and giver extracted from a narrow-layout action text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub receiver: String,
    pub giver: String,
}

/// Splits `Feedback Given: on <receiver> from <giver> on <rest>`.
///
/// Names are matched lazily, so a receiver containing " from " or a giver
/// containing " on " is cut at the first occurrence.
pub fn parse_action(action: &str) -> Option<Action> {
    let captures = ACTION_PATTERN.captures(action)?;
    Some(Action {
        receiver: captures["receiver"].to_string(),
        giver: captures["giver"].to_string(),
    })
}

/// Case-insensitive "yes" after trimming; anything else is not confidential.
pub fn parse_confidential(flag: &str) -> bool {
    flag.trim().to_lowercase() == "yes"
}

/// Stateful per-file normalizer.
///
/// A fresh instance must be used for every file so that the header allowance
/// starts over.
#[derive(Debug, Clone)]
pub struct Normalizer {
    headers_remaining: usize,
    skipped_headers: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            headers_remaining: HEADER_ROWS,
            skipped_headers: 0,
        }
    }

    /// Rows silently skipped as headers so far.
    pub fn skipped_headers(&self) -> usize {
        self.skipped_headers
    }

    /// Normalizes one row.
    ///
    /// Returns `Ok(None)` for a tolerated header row and an error for rows that
    /// have to be reported and skipped. Rows that match a layout never count
    /// against the header allowance, even when rejected.
    pub fn normalize(&mut self, row: &RawRow) -> Result<Option<Feedback>, RowError> {
        let feedback = match RowSchema::detect(row) {
            Some(RowSchema::Wide) => wide_feedback(row),
            Some(RowSchema::Narrow) => narrow_feedback(row)?,
            None => None,
        };
        if let Some(feedback) = feedback {
            if feedback.to.is_empty() || feedback.from.is_empty() {
                return Err(RowError::EmptyName {
                    line: row.line,
                    row: row.dump(),
                });
            }
            return Ok(Some(feedback));
        }

        if self.headers_remaining > 0 {
            self.headers_remaining -= 1;
            self.skipped_headers += 1;
            return Ok(None);
        }
        Err(RowError::SchemaMismatch {
            line: row.line,
            row: mismatch_diagnostic(row),
        })
    }
}

fn wide_feedback(row: &RawRow) -> Option<Feedback> {
    Some(Feedback {
        to: row.text(0).trim().to_string(),
        from: row.text(5).trim().to_string(),
        date: row.date(2)?,
        question: row.text(7),
        response: row.optional_text(8),
        confidential: parse_confidential(&row.text(9)),
    })
}

fn narrow_feedback(row: &RawRow) -> Result<Option<Feedback>, RowError> {
    let action_text = row.text(0);
    let Some(action) = parse_action(&action_text) else {
        return Err(RowError::ActionUnparsed {
            line: row.line,
            action: action_text,
        });
    };
    Ok(row.date(1).map(|date| Feedback {
        to: action.receiver.trim().to_string(),
        from: action.giver.trim().to_string(),
        date,
        question: row.text(3),
        response: row.optional_text(4),
        confidential: parse_confidential(&row.text(5)),
    }))
}

/// Six-field rows only get the field count and action text; every other row
/// is dumped in full.
fn mismatch_diagnostic(row: &RawRow) -> String {
    if row.field_count() == NARROW_FIELD_COUNT {
        format!(
            "{} fields, action '{}' (type: {})",
            row.field_count(),
            row.text(0),
            row.kind(0)
        )
    } else {
        row.dump()
    }
}
