// CSV/TSV decoding

use log::warn;
use sheetlens_engine::cell::CellValue;

use crate::{DecodeError, Grid, MAX_ROWS};

/// Decode delimited-text bytes into a grid.
///
/// With no explicit `delimiter` the most likely one is sniffed from the
/// first few lines. Fields parse through `CellValue::from_input`, so
/// numeric-looking text becomes a number.
pub fn decode(bytes: &[u8], delimiter: Option<u8>) -> Result<Grid, DecodeError> {
    let content = bytes_as_utf8(bytes);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    decode_str(&content, delimiter)
}

/// Decode bytes as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs).
fn bytes_as_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            warn!("input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; higher field counts break ties.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| fields_in_line(line, delim))
            .collect();

        // Must split the first line into >1 field to be viable
        let target = counts[0];
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Field count of a single line under a candidate delimiter, quote-aware.
fn fields_in_line(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

fn decode_str(content: &str, delimiter: u8) -> Result<Grid, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Grid::new();
    for result in reader.records() {
        let record = result.map_err(|e| DecodeError::Parse(e.to_string()))?;
        if grid.len() > MAX_ROWS {
            return Err(DecodeError::TooLarge(format!(
                "more than {} rows",
                MAX_ROWS
            )));
        }

        let mut row: Vec<CellValue> = record.iter().map(CellValue::from_input).collect();
        while row.last().map_or(false, |c| c.is_empty()) {
            row.pop();
        }
        grid.push(row);
    }

    // an all-blank trailing line decodes as an empty row; drop it
    while grid.last().map_or(false, |r| r.is_empty()) {
        grid.pop();
    }

    Ok(grid)
}
