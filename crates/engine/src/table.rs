use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::field::{self, Field};

static EMPTY: CellValue = CellValue::Empty;

/// One data row's values, keyed by field identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Zero-based index among the data rows, assigned once at build time.
    pub id: usize,
    /// Field id -> cell value. Absent cells have no entry.
    pub values: FxHashMap<String, CellValue>,
}

impl Row {
    /// Value for a field, treating absent cells as empty.
    pub fn value(&self, field_id: &str) -> &CellValue {
        self.values.get(field_id).unwrap_or(&EMPTY)
    }
}

/// The base model: column descriptors plus the row collection.
///
/// Rebuilt wholesale on every successful load and never mutated in place,
/// so consumers can't observe a partially built model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableModel {
    pub columns: Vec<Field>,
    pub rows: Vec<Row>,
}

impl TableModel {
    /// Build the model from a decoded grid. Row 0 is the header row.
    ///
    /// Total: an empty grid yields an empty model. Rows shorter than the
    /// header leave their trailing fields unset. When two header columns
    /// share a field id, the later column's cell overwrites the earlier
    /// one's, row by row. No collision is detected or reported.
    pub fn build(grid: &[Vec<CellValue>]) -> Self {
        let Some((header, data_rows)) = grid.split_first() else {
            return Self::default();
        };

        let columns = field::normalize_headers(header);

        let rows = data_rows
            .iter()
            .enumerate()
            .map(|(idx, data_row)| {
                let mut values = FxHashMap::default();
                for (col, field) in columns.iter().enumerate() {
                    if let Some(cell) = data_row.get(col) {
                        values.insert(field.id.clone(), cell.clone());
                    }
                }
                Row { id: idx, values }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// All row ids, in file order.
    pub fn row_ids(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.id).collect()
    }
}
