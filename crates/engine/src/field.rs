use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// A column identity derived from a header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier: the header text with all whitespace removed.
    pub id: String,
    /// The raw header text, as displayed.
    pub display_name: String,
}

/// Derive a stable field identifier from header text.
///
/// Removes every whitespace character, so "First Name" and "First  Name"
/// both map to "FirstName". Idempotent.
pub fn field_id(display_name: &str) -> String {
    display_name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Map the header row to an ordered field list, one per column.
///
/// Header cells are coerced to text first, so a numeric header still gets
/// a usable id. Two headers that collapse to the same id both appear here;
/// the row-building step resolves the collision with last-column-wins.
pub fn normalize_headers(header: &[CellValue]) -> Vec<Field> {
    header
        .iter()
        .map(|cell| {
            let display_name = cell.display_text();
            Field {
                id: field_id(&display_name),
                display_name,
            }
        })
        .collect()
}
