use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tempfile::Builder;

use crate::workday::markdown::error::{ConvertError, Result};
use crate::workday::markdown::model::{Feedback, Report};

pub const REPORT_TITLE: &str = "Peer feedback";
pub const CONFIDENTIAL_MARKER: &str = " 🔒";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TEMP_PREFIX: &str = "peer-feedback-";
const TEMP_SUFFIX: &str = ".md";

/// Quotes `text` as a Markdown block quote. Absent text yields an empty line.
pub fn markdown_quote(text: Option<&str>) -> String {
    match text {
        Some(text) => format!("> {}", text.trim().replace('\n', "\n> ")),
        None => String::new(),
    }
}

/// Writes the report as Markdown in a single pass.
pub fn render_report<W: Write>(
    report: &Report,
    generated_at: NaiveDateTime,
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "# {REPORT_TITLE}")?;
    writeln!(writer)?;
    writeln!(writer, "Generated on {}", generated_at.format(TIMESTAMP_FORMAT))?;
    writeln!(writer)?;

    for (recipient, feedback) in &report.groups {
        writeln!(writer, "## {recipient}")?;
        writeln!(writer)?;
        render_group(feedback, writer)?;
    }
    Ok(())
}

fn render_group<W: Write>(feedback: &[Feedback], writer: &mut W) -> std::io::Result<()> {
    let mut previous: Option<&Feedback> = None;
    for entry in feedback {
        let same_heading = previous
            .map(|last| last.from == entry.from && last.date == entry.date)
            .unwrap_or(false);
        if !same_heading {
            let marker = if entry.confidential {
                CONFIDENTIAL_MARKER
            } else {
                ""
            };
            writeln!(
                writer,
                "### {}, {}{marker}",
                entry.from,
                entry.date.format("%Y-%m-%d")
            )?;
            writeln!(writer)?;
        }

        writeln!(writer, "{}", entry.question)?;
        writeln!(writer, "{}", markdown_quote(entry.response.as_deref()))?;
        writeln!(writer)?;
        previous = Some(entry);
    }
    Ok(())
}

/// Renders the report into `destination`, or into a fresh temporary file when
/// no destination is given. The file is closed before its path is returned.
pub fn write_report(
    report: &Report,
    generated_at: NaiveDateTime,
    destination: Option<&Path>,
) -> Result<PathBuf> {
    match destination {
        Some(path) => {
            let file = File::create(path).map_err(ConvertError::Output)?;
            write_to(report, generated_at, file)?;
            Ok(path.to_path_buf())
        }
        None => {
            let mut temp = Builder::new()
                .prefix(TEMP_PREFIX)
                .suffix(TEMP_SUFFIX)
                .tempfile()
                .map_err(ConvertError::Output)?;
            write_to(report, generated_at, temp.as_file_mut())?;
            let (_file, path) = temp
                .keep()
                .map_err(|error| ConvertError::Output(error.error))?;
            Ok(path)
        }
    }
}

fn write_to<W: Write>(report: &Report, generated_at: NaiveDateTime, output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    render_report(report, generated_at, &mut writer).map_err(ConvertError::Output)?;
    writer.flush().map_err(ConvertError::Output)
}
