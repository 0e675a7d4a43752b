//! Scroll presentation: the table transposed so columns become rows.

use super::{Layout, Presentation, placements};
use crate::config::ResponsiveType;
use crate::model::{CellMarkup, ExpandState, RowId, Table, Visibility};

/// A column shown as a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRow {
    /// The column label, used as row heading.
    pub heading: String,
    pub cells: Vec<ScrollCell>,
}

/// A cell of a transposed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCell {
    pub row: RowId,
    pub text: String,
    /// Set when the filter hides the cell's row.
    pub filtered: bool,
}

/// Transposes the table so that each column becomes a row.
///
/// Transposed cells follow the sort order of their rows. Only the filter
/// hides them; collapsing does not apply to the transposed view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollPresentation;

impl Presentation for ScrollPresentation {
    fn responsive_type(&self) -> ResponsiveType {
        ResponsiveType::Scroll
    }

    fn layout(&self, table: &Table, visibility: &Visibility, _expand: ExpandState) -> Layout {
        let transposed = table
            .headers()
            .iter()
            .enumerate()
            .map(|(column, header)| ScrollRow {
                heading: header.label().to_string(),
                cells: table
                    .rows()
                    .iter()
                    .filter_map(|row| {
                        row.cell(column).map(|cell| ScrollCell {
                            row: row.id(),
                            text: cell.text_content().trim().to_string(),
                            filtered: row.is_filtered_out(),
                        })
                    })
                    .collect(),
            })
            .collect();

        Layout::Scroll {
            rows: placements(visibility),
            transposed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::visibility::compute_visibility;
    use crate::model::{Cell, ColumnHeader, Filter, FilterState};

    #[test]
    fn test_columns_become_rows() {
        let mut table = Table::new(vec![ColumnHeader::new("Cheese"), ColumnHeader::new("Price")])
            .with_row(vec![Cell::from_text("cheddar"), Cell::from_text("£4")])
            .with_row(vec![Cell::from_text("stilton"), Cell::from_text("£6")])
            .with_row(vec![Cell::from_text("brie")]);
        let ids = table.row_ids();
        let state = FilterState {
            column: 0,
            filter: Filter::text("stil"),
        };
        let visibility = compute_visibility(
            &mut table,
            Some(&state),
            ExpandState::Contracted { minimum_row_count: 1 },
        );

        let Layout::Scroll { transposed, .. } =
            ScrollPresentation.layout(&table, &visibility, ExpandState::NotExpandable)
        else {
            panic!("expected a scroll layout");
        };
        assert_eq!(transposed.len(), 2);
        assert_eq!(transposed[0].heading, "Cheese");
        assert_eq!(transposed[0].cells.len(), 3);
        assert_eq!(transposed[1].cells.len(), 2);

        let stilton = &transposed[0].cells[1];
        assert_eq!(stilton.row, ids[1]);
        assert!(!stilton.filtered);
        assert!(transposed[0].cells[0].filtered);
    }
}
