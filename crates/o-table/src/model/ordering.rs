//! Row ordering by a single column.

use o_table_core::logging::targets;
use o_table_core::{Error, Result};

use super::compare::{Collator, compare};
use super::formatter::SortFormatter;
use super::table::Table;
use super::value::{SortOrder, SortValue};

/// Stable-sort every row by one column.
///
/// Each row's cell is formatted with the column's declared type (memoizing
/// the sort value on the cell) and the rows are re-sorted in full. Ties keep
/// their previous relative order. A row without a cell in the column sorts as
/// an empty text value. The sorted header is marked and all others cleared.
pub fn reorder(
    table: &mut Table,
    column: usize,
    order: SortOrder,
    formatter: &SortFormatter,
    collator: &Collator,
) -> Result<()> {
    let column_type = table
        .header(column)
        .ok_or_else(|| Error::missing_header(column))?
        .data_type()
        .clone();

    let mut keyed: Vec<(SortValue, _)> = table
        .take_rows()
        .into_iter()
        .map(|mut row| {
            let key = match row.cell_mut(column) {
                Some(cell) => formatter.format_cell(cell, &column_type),
                None => SortValue::Text(String::new()),
            };
            (key, row)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b, order, collator));

    tracing::debug!(
        target: targets::SORT,
        column,
        %order,
        column_type = %column_type,
        rows = keyed.len(),
        "reordered rows"
    );

    table.replace_rows(keyed.into_iter().map(|(_, row)| row).collect());
    table.mark_sorted(column, order);
    Ok(())
}
