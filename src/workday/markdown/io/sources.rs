use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::workday::markdown::error::{ConvertError, Result};

/// Extension of the workbooks picked up when a directory is enumerated.
pub const SPREADSHEET_EXTENSION: &str = "xlsx";

/// Prefix Office gives to owner files of workbooks that are open elsewhere.
const LOCK_FILE_PREFIX: &str = "~$";

/// Resolves the `--file` argument into the list of workbooks to read.
///
/// A regular file is returned as is, whatever its extension. A directory yields
/// its spreadsheet files (not recursively), sorted by file name.
pub fn enumerate_sources(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let candidate = entry.path();
        if !candidate.is_file() || !is_spreadsheet(&candidate) {
            debug!(path = %candidate.display(), "skipping directory entry");
            continue;
        }
        sources.push(candidate);
    }
    sources.sort_by(|lhs, rhs| lhs.file_name().cmp(&rhs.file_name()));
    Ok(sources)
}

/// True when the file name carries the spreadsheet extension (any case) and is
/// not an Office lock file.
pub fn is_spreadsheet(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    if name.starts_with(LOCK_FILE_PREFIX) {
        return false;
    }
    path.extension()
        .map(|extension| extension.eq_ignore_ascii_case(SPREADSHEET_EXTENSION))
        .unwrap_or(false)
}
