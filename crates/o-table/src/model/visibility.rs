//! Row visibility: filtering, collapsing and display order.

use std::collections::HashSet;

use o_table_core::logging::targets;

use super::filter::FilterState;
use super::table::{RowId, Table};

/// Whether a table collapses rows beyond a minimum count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandState {
    /// The table never collapses rows.
    NotExpandable,
    /// All rows are shown.
    Expanded,
    /// Only the first `minimum_row_count` unfiltered rows are shown.
    Contracted { minimum_row_count: usize },
}

impl ExpandState {
    /// The `aria-expanded` value, if the table is expandable.
    pub fn aria_expanded(self) -> Option<&'static str> {
        match self {
            Self::NotExpandable => None,
            Self::Expanded => Some("true"),
            Self::Contracted { .. } => Some("false"),
        }
    }
}

/// Result of a visibility pass.
///
/// Only [`compute_visibility`] builds one, so `hidden_rows` is always the
/// tail of `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    order: Vec<RowId>,
    hidden_rows: Vec<RowId>,
    hidden: HashSet<RowId>,
}

impl Visibility {
    /// Display order: visible rows, then hidden rows, each group in sorted
    /// order. Keeping hidden rows last keeps zebra striping contiguous.
    pub fn order(&self) -> &[RowId] {
        &self.order
    }

    /// Rows hidden by the filter or by collapsing, in sorted order.
    pub fn hidden_rows(&self) -> &[RowId] {
        &self.hidden_rows
    }

    pub fn is_hidden(&self, id: RowId) -> bool {
        self.hidden.contains(&id)
    }

    /// Number of rows shown.
    pub fn visible_count(&self) -> usize {
        self.order.len().saturating_sub(self.hidden_rows.len())
    }

    /// Visible rows in display order.
    pub fn visible_rows(&self) -> &[RowId] {
        &self.order[..self.visible_count()]
    }
}

/// Recompute row flags and the display order.
///
/// A row whose filter column has no cell is never filtered out. When
/// contracted, rows beyond `minimum_row_count` among rows that passed the
/// filter are hidden by collapse.
pub fn compute_visibility(
    table: &mut Table,
    filter: Option<&FilterState>,
    expand: ExpandState,
) -> Visibility {
    let mut shown = 0usize;
    let mut visible = Vec::new();
    let mut hidden = Vec::new();

    for row in table.rows_mut() {
        let filtered_out = match filter {
            Some(state) => row
                .cell(state.column)
                .is_some_and(|cell| !state.filter.matches(cell)),
            None => false,
        };
        row.set_filtered_out(filtered_out);

        let collapsed = match expand {
            ExpandState::Contracted { minimum_row_count } => {
                !filtered_out && shown >= minimum_row_count
            }
            ExpandState::Expanded | ExpandState::NotExpandable => false,
        };
        row.set_hidden_by_collapse(collapsed);

        if row.is_hidden() {
            hidden.push(row.id());
        } else {
            shown += 1;
            visible.push(row.id());
        }
    }

    tracing::debug!(
        target: targets::VISIBILITY,
        visible = visible.len(),
        hidden = hidden.len(),
        ?expand,
        "computed row visibility"
    );

    let mut order = visible;
    order.extend_from_slice(&hidden);
    Visibility {
        order,
        hidden: hidden.iter().copied().collect(),
        hidden_rows: hidden,
    }
}
