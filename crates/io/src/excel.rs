// Workbook import (xlsx, xls, xlsb, ods)
//
// One-way conversion: the first sheet's used range becomes a grid of raw
// cell values. No formulas, no formatting, no other sheets.

use std::io::Cursor;

use calamine::{Data, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use log::debug;
use sheetlens_engine::cell::CellValue;

use crate::{DecodeError, Grid, SheetFormat, MAX_CELLS, MAX_COLS, MAX_ROWS};

/// Decode workbook bytes into the first sheet's grid.
pub fn decode(bytes: &[u8], format: SheetFormat) -> Result<Grid, DecodeError> {
    let range = match format {
        SheetFormat::Xlsx => first_sheet_range::<Xlsx<_>>(bytes)?,
        SheetFormat::Xls => first_sheet_range::<Xls<_>>(bytes)?,
        SheetFormat::Xlsb => first_sheet_range::<Xlsb<_>>(bytes)?,
        SheetFormat::Ods => first_sheet_range::<Ods<_>>(bytes)?,
        // Delimited formats are routed to the csv module by the top-level
        // decode; reaching here means the caller bypassed it.
        SheetFormat::Csv | SheetFormat::Tsv => {
            return Err(DecodeError::Unsupported("delimited text".to_string()));
        }
    };

    grid_from_range(&range)
}

/// Open a workbook from in-memory bytes and read its first sheet's range.
fn first_sheet_range<'a, R>(bytes: &'a [u8]) -> Result<Range<Data>, DecodeError>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(Cursor::new(bytes))
        .map_err(|e| DecodeError::Parse(format!("{}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err(DecodeError::NoSheets);
    };
    debug!("decoding sheet '{}' ({} in workbook)", first, sheet_names.len());

    workbook
        .worksheet_range(first)
        .map_err(|e| DecodeError::Parse(format!("{}", e)))
}

fn grid_from_range(range: &Range<Data>) -> Result<Grid, DecodeError> {
    let (height, width) = range.get_size();

    if height == 0 || width == 0 {
        return Ok(Grid::new());
    }
    if height > MAX_ROWS || width > MAX_COLS {
        return Err(DecodeError::TooLarge(format!(
            "sheet is {}x{}, limit is {}x{}",
            height, width, MAX_ROWS, MAX_COLS
        )));
    }
    if height * width > MAX_CELLS {
        return Err(DecodeError::TooLarge(format!(
            "sheet has {} cells, limit is {}",
            height * width,
            MAX_CELLS
        )));
    }

    let grid = range
        .rows()
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(cell_value).collect();
            // calamine's range is dense; drop trailing blanks so short rows
            // read as short (missing trailing cells are absent, not empty)
            while cells.last().map_or(false, |c| c.is_empty()) {
                cells.pop();
            }
            cells
        })
        .collect();

    Ok(grid)
}

/// Convert a calamine cell to the model's value type.
///
/// Date/time cells keep their serial number; ISO date/duration strings and
/// cell errors keep their text form.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
