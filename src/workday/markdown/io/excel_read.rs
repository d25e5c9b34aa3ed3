use std::path::{Path, PathBuf};

use calamine::{DataType, Range, Reader, open_workbook_auto};

use crate::workday::markdown::error::{ConvertError, Result};
use crate::workday::markdown::model::{Cell, RawRow};

/// Forward-only cursor over the rows of the first worksheet of a workbook.
///
/// Header rows are not special here; every row of the used range is surfaced,
/// in sheet order.
#[derive(Debug)]
pub struct SheetRows {
    range: Range<DataType>,
    first_line: usize,
    leading_columns: usize,
    height: usize,
    width: usize,
    next: usize,
}

impl SheetRows {
    fn new(range: Range<DataType>) -> Self {
        let (first_line, leading_columns) = range
            .start()
            .map(|(row, col)| (row as usize + 1, col as usize))
            .unwrap_or((1, 0));
        let (height, width) = range.get_size();
        Self {
            range,
            first_line,
            leading_columns,
            height,
            width,
            next: 0,
        }
    }
}

impl Iterator for SheetRows {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        if self.next >= self.height {
            return None;
        }
        let row = self.next;
        self.next += 1;

        let mut cells = Vec::with_capacity(self.leading_columns + self.width);
        cells.resize(self.leading_columns, Cell::Empty);
        cells.extend((0..self.width).map(|col| {
            self.range
                .get((row, col))
                .map_or(Cell::Empty, convert_cell)
        }));
        Some(RawRow::new(self.first_line + row, cells))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.height.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

/// Opens the workbook at `path` and returns a cursor over its first sheet.
///
/// The file handle is released before this function returns; the cursor owns
/// only the decoded cell range.
pub fn read_rows(path: &Path) -> Result<SheetRows> {
    let mut workbook = open_workbook_auto(path).map_err(|source| read_error(path, source))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(|source| read_error(path, source))?;
    Ok(SheetRows::new(range))
}

fn read_error(path: &Path, source: calamine::Error) -> ConvertError {
    ConvertError::Read {
        path: PathBuf::from(path),
        source,
    }
}

/// Maps a decoded cell onto the text/date/other classification used by the
/// schema detector.
pub fn convert_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::DateTime(_) | DataType::DateTimeIso(_) => match cell.as_datetime() {
            Some(datetime) => Cell::Date(datetime),
            None => Cell::Other(cell.to_string()),
        },
        DataType::Empty => Cell::Empty,
        other => Cell::Other(other.to_string()),
    }
}
