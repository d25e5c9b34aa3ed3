use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, error, info, instrument, warn};

use crate::workday::markdown::aggregate::group_by_recipient;
use crate::workday::markdown::error::Result;
use crate::workday::markdown::io::excel_read::read_rows;
use crate::workday::markdown::io::markdown_write::write_report;
use crate::workday::markdown::io::sources::enumerate_sources;
use crate::workday::markdown::model::{Feedback, RawRow};
use crate::workday::markdown::normalize::Normalizer;

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Workbook, or directory of workbooks, to read.
    pub input: PathBuf,
    /// Feedback dated before this day is left out.
    pub since: NaiveDate,
    /// Report destination; a temporary file is created when absent.
    pub output: Option<PathBuf>,
}

/// Converts the configured input into a Markdown report and returns the path
/// of the written file.
pub fn convert(options: &ConvertOptions) -> Result<PathBuf> {
    convert_at(options, Local::now().naive_local())
}

/// Same as [`convert`] with an explicit "generated on" timestamp.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %options.input.display(), since = %options.since)
)]
pub fn convert_at(options: &ConvertOptions, generated_at: NaiveDateTime) -> Result<PathBuf> {
    info!(cutoff = %options.since, "cutoff date");

    let sources = enumerate_sources(&options.input)?;
    let feedback = collect_feedback(&sources, options.input.is_dir())?;
    let report = group_by_recipient(feedback, options.since);

    let path = write_report(&report, generated_at, options.output.as_deref())?;
    info!(
        recipients = report.recipient_count(),
        records = report.record_count(),
        path = %path.display(),
        "markdown file written"
    );
    Ok(path)
}

/// Reads every source in order and concatenates their feedback.
///
/// With `skip_unreadable`, a workbook that fails to open is logged and the
/// remaining sources are still read; otherwise the first failure is returned.
pub fn collect_feedback(sources: &[PathBuf], skip_unreadable: bool) -> Result<Vec<Feedback>> {
    let mut feedback = Vec::new();
    for source in sources {
        match read_feedback_file(source) {
            Ok(entries) => feedback.extend(entries),
            Err(err) if skip_unreadable => {
                error!(path = %source.display(), error = %err, "skipping unreadable feedback file");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(feedback)
}

/// Reads and normalizes the feedback of a single workbook.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_feedback_file(path: &Path) -> Result<Vec<Feedback>> {
    info!(path = %path.display(), "reading feedback file");
    let rows = read_rows(path)?;
    Ok(normalize_rows(path, rows))
}

/// Runs a fresh normalizer over `rows`, logging and skipping bad rows.
pub fn normalize_rows<I>(path: &Path, rows: I) -> Vec<Feedback>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut normalizer = Normalizer::new();
    let mut feedback = Vec::new();
    for row in rows {
        match normalizer.normalize(&row) {
            Ok(Some(entry)) => feedback.push(entry),
            Ok(None) => {}
            Err(err) => warn!(path = %path.display(), line = err.line(), "{err}"),
        }
    }
    debug!(
        records = feedback.len(),
        headers = normalizer.skipped_headers(),
        "normalized feedback file"
    );
    feedback
}
