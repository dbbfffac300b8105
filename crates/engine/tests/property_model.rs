// Property-based tests for the table model pipeline.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use sheetlens_engine::cell::CellValue;
use sheetlens_engine::field;
use sheetlens_engine::search;
use sheetlens_engine::selection::{SelectAllState, Selection};
use sheetlens_engine::table::TableModel;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary cell text: mostly words, sometimes numeric, sometimes empty.
fn arb_cell_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[a-zA-Z0-9 ]{0,12}",
        1 => r"-?[0-9]{1,6}",
        1 => Just(String::new()),
    ]
}

/// Arbitrary grid: a header row of width 1..6 plus 0..12 data rows whose
/// lengths may undershoot or overshoot the header.
fn arb_grid() -> impl Strategy<Value = Vec<Vec<CellValue>>> {
    (1usize..6).prop_flat_map(|width| {
        let header = prop::collection::vec(r"[A-Za-z ]{1,10}", width..=width);
        let rows = prop::collection::vec(
            prop::collection::vec(arb_cell_text(), 0..(width + 2)),
            0..12,
        );
        (header, rows).prop_map(|(header, rows)| {
            let mut grid: Vec<Vec<CellValue>> =
                vec![header.into_iter().map(CellValue::Text).collect()];
            for row in rows {
                grid.push(row.iter().map(|s| CellValue::from_input(s)).collect());
            }
            grid
        })
    })
}

fn selection_from(ids: &[usize]) -> Selection {
    let mut sel = Selection::new();
    for id in ids {
        if !sel.contains(*id) {
            sel.toggle_row(*id);
        }
    }
    sel
}

fn sorted_ids(sel: &Selection) -> Vec<usize> {
    let mut ids: Vec<usize> = sel.ids().collect();
    ids.sort_unstable();
    ids
}

// ---------------------------------------------------------------------------
// Builder properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_build_shape_matches_grid(grid in arb_grid()) {
        let model = TableModel::build(&grid);
        prop_assert_eq!(model.columns.len(), grid[0].len());
        prop_assert_eq!(model.rows.len(), grid.len() - 1);
    }

    #[test]
    fn prop_row_ids_are_contiguous(grid in arb_grid()) {
        let model = TableModel::build(&grid);
        for (i, row) in model.rows.iter().enumerate() {
            prop_assert_eq!(row.id, i);
        }
    }

    #[test]
    fn prop_field_id_is_idempotent(s in r"[ \ta-zA-Z0-9]{0,20}") {
        let once = field::field_id(&s);
        let twice = field::field_id(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_field_ids_contain_no_whitespace(s in r"[ \ta-zA-Z0-9]{0,20}") {
        prop_assert!(!field::field_id(&s).chars().any(char::is_whitespace));
    }
}

// ---------------------------------------------------------------------------
// Filter properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_empty_query_is_identity(grid in arb_grid()) {
        let model = TableModel::build(&grid);
        let ids: Vec<usize> = search::filter_rows(&model, "")
            .iter()
            .map(|r| r.id)
            .collect();
        prop_assert_eq!(ids, model.row_ids());
    }

    #[test]
    fn prop_filter_is_a_stable_subsequence(
        grid in arb_grid(),
        query in r"[a-z0-9]{0,3}",
    ) {
        let model = TableModel::build(&grid);
        let filtered = search::filter_rows(&model, &query);

        // order preserved, no duplicates, no fabricated rows
        let ids: Vec<usize> = filtered.iter().map(|r| r.id).collect();
        for pair in ids.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for id in &ids {
            prop_assert!(*id < model.rows.len());
        }
    }

    #[test]
    fn prop_filter_agrees_with_row_predicate(
        grid in arb_grid(),
        query in r"[a-z0-9]{1,3}",
    ) {
        let model = TableModel::build(&grid);
        let needle = query.to_lowercase();
        let expected: Vec<usize> = model
            .rows
            .iter()
            .filter(|r| search::row_matches(r, &model, &needle))
            .map(|r| r.id)
            .collect();
        let actual: Vec<usize> = search::filter_rows(&model, &query)
            .iter()
            .map(|r| r.id)
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

// ---------------------------------------------------------------------------
// Selection properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_toggle_row_is_an_involution(
        initial in prop::collection::vec(0usize..50, 0..20),
        id in 0usize..50,
    ) {
        let mut sel = selection_from(&initial);
        let before = sorted_ids(&sel);
        sel.toggle_row(id);
        sel.toggle_row(id);
        prop_assert_eq!(sorted_ids(&sel), before);
    }

    #[test]
    fn prop_toggle_all_full_clears_otherwise_selects_universe(
        n in 0usize..30,
        initial in prop::collection::vec(0usize..30, 0..20),
    ) {
        let universe: Vec<usize> = (0..n).collect();
        let initial: Vec<usize> = initial.into_iter().filter(|id| *id < n).collect();
        let mut sel = selection_from(&initial);

        let was_all = sel.state(n) == SelectAllState::All;
        sel.toggle_all(&universe);

        if was_all {
            prop_assert!(sel.is_empty());
        } else {
            prop_assert_eq!(sorted_ids(&sel), universe);
        }
    }
}
