//! Appending generated rows to an uploaded dataset

use crate::conditions;
use crate::normalize::NormalizedRow;
use crate::schema::CONDITIONS_COLUMN;
use crate::table::Table;

/// Append `rows` to `base`, reindexed to the base table's columns.
///
/// Base rows keep their position and values; new rows follow in generation
/// order. Row columns the base lacks are dropped, base columns a row lacks are
/// left empty. When the base carries a conditions column, the whole merged
/// column is cleaned afterwards.
pub fn merge_rows(mut base: Table, rows: &[NormalizedRow]) -> Table {
    for row in rows {
        let cells = base.columns.iter().map(|column| row.cell(column)).collect();
        base.rows.push(cells);
    }

    if let Some(idx) = base.column_index(CONDITIONS_COLUMN) {
        for row in &mut base.rows {
            if let Some(cell) = row.get_mut(idx) {
                *cell = Some(conditions::clean_cell(cell.as_deref()));
            }
        }
    }

    base
}
