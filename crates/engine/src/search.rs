//! Free-text row filtering.
//!
//! The filter is a pure derived view: it never reorders, caches, or
//! fabricates rows, and it is recomputed from scratch on every call.

use crate::table::{Row, TableModel};

/// Rows matching `query`, in model order.
///
/// The empty query is the no-filter sentinel and returns every row.
pub fn filter_rows<'a>(model: &'a TableModel, query: &str) -> Vec<&'a Row> {
    if query.is_empty() {
        return model.rows.iter().collect();
    }

    let needle = query.to_lowercase();
    model
        .rows
        .iter()
        .filter(|row| row_matches(row, model, &needle))
        .collect()
}

/// Case-insensitive substring match over a row's field values.
///
/// `needle` must already be lowercased. Only declared columns participate;
/// absent cells read as the empty string and never match a non-empty
/// needle.
pub fn row_matches(row: &Row, model: &TableModel, needle: &str) -> bool {
    model.columns.iter().any(|field| {
        row.value(&field.id)
            .display_text()
            .to_lowercase()
            .contains(needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn jon_snow_model() -> TableModel {
        TableModel::build(&[
            vec![text("First Name"), text("Last Name")],
            vec![text("Jon"), text("Snow")],
            vec![text("Arya"), text("Stark")],
            vec![text("Cersei"), text("Lannister")],
        ])
    }

    #[test]
    fn test_empty_query_returns_all_rows_in_order() {
        let model = jon_snow_model();
        let rows = filter_rows(&model, "");
        let ids: Vec<usize> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let model = jon_snow_model();
        let rows = filter_rows(&model, "snow");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 0);

        let rows = filter_rows(&model, "SNOW");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_non_matching_query_excludes_rows() {
        let model = jon_snow_model();
        let rows = filter_rows(&model, "stark");
        let ids: Vec<usize> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_filter_preserves_file_order() {
        let model = jon_snow_model();
        let ids: Vec<usize> = filter_rows(&model, "ar").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        let ids: Vec<usize> = filter_rows(&model, "s").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_numbers_match_by_text_form() {
        let model = TableModel::build(&[
            vec![text("Age")],
            vec![CellValue::Number(14.0)],
            vec![CellValue::Number(31.0)],
        ]);
        let rows = filter_rows(&model, "14");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 0);
    }

    #[test]
    fn test_absent_cells_never_match() {
        let model = TableModel::build(&[
            vec![text("A"), text("B")],
            vec![text("x")],
        ]);
        assert!(filter_rows(&model, "anything").is_empty());
        // but the absent cell doesn't stop the row from matching on A
        assert_eq!(filter_rows(&model, "x").len(), 1);
    }
}
