//! Table, rows and column headers.

use std::collections::HashMap;
use std::fmt;

use super::cell::Cell;
use super::value::{ColumnType, SortOrder};

/// A stable row identity.
///
/// Row IDs never change when rows are sorted, filtered or collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u64);

impl RowId {
    /// Get the raw u64 value of this row ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// A column header.
#[derive(Debug, Clone, Default)]
pub struct ColumnHeader {
    label: String,
    data_type: ColumnType,
    sort_disabled: bool,
    sort_order: Option<SortOrder>,
}

impl ColumnHeader {
    /// Create a sortable text column.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the declared data type.
    pub fn with_type(mut self, data_type: impl Into<ColumnType>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Opt the column out of sorting.
    pub fn with_sort_disabled(mut self, disabled: bool) -> Self {
        self.sort_disabled = disabled;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn data_type(&self) -> &ColumnType {
        &self.data_type
    }

    pub fn set_data_type(&mut self, data_type: ColumnType) {
        self.data_type = data_type;
    }

    pub fn is_sort_disabled(&self) -> bool {
        self.sort_disabled
    }

    /// Current sort direction, `None` when the column is not sorted.
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    /// The `aria-sort` value for this header.
    pub fn aria_sort(&self) -> &'static str {
        self.sort_order.map_or("none", SortOrder::as_str)
    }
}

/// A table row.
#[derive(Debug, Clone)]
pub struct Row {
    id: RowId,
    cells: Vec<Cell>,
    filtered_out: bool,
    hidden_by_collapse: bool,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell in a column, if the row has one.
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    /// Whether the active filter hides this row.
    pub fn is_filtered_out(&self) -> bool {
        self.filtered_out
    }

    /// Whether a contracted table hides this row.
    pub fn is_hidden_by_collapse(&self) -> bool {
        self.hidden_by_collapse
    }

    /// Hidden for any reason.
    pub fn is_hidden(&self) -> bool {
        self.filtered_out || self.hidden_by_collapse
    }

    /// The `aria-hidden` value for this row.
    pub fn aria_hidden(&self) -> &'static str {
        if self.is_hidden() { "true" } else { "false" }
    }

    pub(crate) fn set_filtered_out(&mut self, filtered_out: bool) {
        self.filtered_out = filtered_out;
    }

    pub(crate) fn set_hidden_by_collapse(&mut self, hidden: bool) {
        self.hidden_by_collapse = hidden;
    }
}

/// A table: ordered column headers and rows.
///
/// Rows are kept in sorted order. Rows hidden by filtering or collapsing stay
/// in place here; moving them after visible rows is a display concern handled
/// by the visibility engine.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<ColumnHeader>,
    rows: Vec<Row>,
    next_row_id: u64,
}

impl Table {
    /// Create a table with the given headers and no rows.
    pub fn new(headers: Vec<ColumnHeader>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            next_row_id: 0,
        }
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row(mut self, cells: Vec<Cell>) -> Self {
        self.push_row(cells);
        self
    }

    /// Append a row, returning its ID.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.rows.push(Row {
            id,
            cells,
            filtered_out: false,
            hidden_by_collapse: false,
        });
        id
    }

    /// Remove a row by ID.
    pub fn remove_row(&mut self, id: RowId) -> Option<Row> {
        let position = self.rows.iter().position(|row| row.id == id)?;
        Some(self.rows.remove(position))
    }

    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    pub fn header(&self, column: usize) -> Option<&ColumnHeader> {
        self.headers.get(column)
    }

    pub fn header_mut(&mut self, column: usize) -> Option<&mut ColumnHeader> {
        self.headers.get_mut(column)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Rows in current sort order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Row IDs in current sort order.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(Row::id).collect()
    }

    /// Drop computed sort values in one column.
    pub fn invalidate_column(&mut self, column: usize) {
        for row in &mut self.rows {
            if let Some(cell) = row.cell_mut(column) {
                cell.invalidate_sort_value();
            }
        }
    }

    /// Mark one header sorted and every other header unsorted.
    pub(crate) fn mark_sorted(&mut self, column: usize, order: SortOrder) {
        for (index, header) in self.headers.iter_mut().enumerate() {
            header.sort_order = (index == column).then_some(order);
        }
    }

    /// Reorder rows to match `ids`. Rows missing from `ids` keep their
    /// relative order after the listed ones.
    pub(crate) fn reorder_by_ids(&mut self, ids: &[RowId]) {
        let mut slots: Vec<Option<Row>> = std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        let positions: HashMap<RowId, usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(position, row)| row.as_ref().map(|row| (row.id, position)))
            .collect();

        let mut ordered = Vec::with_capacity(slots.len());
        for id in ids {
            if let Some(row) = positions.get(id).and_then(|&position| slots[position].take()) {
                ordered.push(row);
            }
        }
        ordered.extend(slots.into_iter().flatten());
        self.rows = ordered;
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub(crate) fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }
}
