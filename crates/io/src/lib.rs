// File decoding - workbook formats, CSV

pub mod csv;
pub mod excel;

use sheetlens_engine::cell::CellValue;

/// A decoded sheet: rows of raw cell values. Row 0 is the header row.
/// Rows may have different lengths; trailing empty cells are dropped.
pub type Grid = Vec<Vec<CellValue>>;

/// Maximum number of data rows to decode (fail fast on oversized input)
pub(crate) const MAX_ROWS: usize = 65536;

/// Maximum number of columns per row
pub(crate) const MAX_COLS: usize = 256;

/// Maximum total cells in a sheet
pub(crate) const MAX_CELLS: usize = 5_000_000;

/// Spreadsheet format, asserted by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xls,
    Xlsb,
    Ods,
    Csv,
    Tsv,
}

impl SheetFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(SheetFormat::Xlsx),
            "xls" => Some(SheetFormat::Xls),
            "xlsb" => Some(SheetFormat::Xlsb),
            "ods" => Some(SheetFormat::Ods),
            "csv" => Some(SheetFormat::Csv),
            "tsv" | "tab" => Some(SheetFormat::Tsv),
            _ => None,
        }
    }
}

/// Error type for decode operations.
#[derive(Debug)]
pub enum DecodeError {
    /// Extension is not a supported spreadsheet format
    Unsupported(String),
    /// Content could not be parsed as the claimed format
    Parse(String),
    /// Workbook parsed but contains zero sheets
    NoSheets,
    /// Sheet exceeds the row/column/cell caps
    TooLarge(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Unsupported(ext) => write!(f, "Unsupported file type: .{}", ext),
            DecodeError::Parse(msg) => write!(f, "Failed to parse file: {}", msg),
            DecodeError::NoSheets => write!(f, "Workbook contains no sheets"),
            DecodeError::TooLarge(msg) => write!(f, "File too large: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode raw file bytes into the first sheet's grid.
///
/// Pure function of its input: no filesystem or network access. A sheet
/// with zero rows decodes to an empty grid, not an error.
pub fn decode(bytes: &[u8], format: SheetFormat) -> Result<Grid, DecodeError> {
    match format {
        SheetFormat::Csv => csv::decode(bytes, None),
        SheetFormat::Tsv => csv::decode(bytes, Some(b'\t')),
        SheetFormat::Xlsx | SheetFormat::Xls | SheetFormat::Xlsb | SheetFormat::Ods => {
            excel::decode(bytes, format)
        }
    }
}
