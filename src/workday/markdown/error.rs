use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error type covering the failures that stop a run, or stop the processing of
/// a single workbook when a whole directory is converted.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Errors bubbled up from the spreadsheet reader while opening or
    /// iterating a workbook.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Raised when a workbook has no worksheet to read rows from.
    #[error("workbook {} has no worksheet", .0.display())]
    EmptyWorkbook(PathBuf),

    /// Raised when the Markdown report cannot be written.
    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),

    /// Wrapper for other IO failures such as listing an input directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Problems with a single spreadsheet row. These never abort a file: the row
/// is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row matches neither known layout and the header allowance is spent.
    #[error("unexpected bad schema row at line {line}: {row}")]
    SchemaMismatch { line: usize, row: String },

    /// The compound action column of a narrow row could not be split into
    /// receiver and giver.
    #[error("unparsable feedback action at line {line}: {action}")]
    ActionUnparsed { line: usize, action: String },

    /// Recipient or giver is blank once surrounding whitespace is removed.
    #[error("feedback without recipient or giver at line {line}: {row}")]
    EmptyName { line: usize, row: String },
}

impl RowError {
    /// One-based sheet line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            RowError::SchemaMismatch { line, .. }
            | RowError::ActionUnparsed { line, .. }
            | RowError::EmptyName { line, .. } => *line,
        }
    }
}
