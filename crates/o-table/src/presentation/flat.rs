//! Flat presentation: one heading/value group per row.

use std::collections::HashMap;

use o_table_core::logging::targets;

use super::{Layout, Presentation, placements};
use crate::config::ResponsiveType;
use crate::model::{CellMarkup, ExpandState, Row, RowId, Table, Visibility};

/// One row shown as a group of heading/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub row: RowId,
    /// Group heading, `"Item N"` counting from 1 in display order.
    pub title: String,
    /// Column label and cell text for every column the row has a cell in.
    pub pairs: Vec<(String, String)>,
    pub hidden: bool,
}

/// Shows each row as its own group of heading/value pairs.
///
/// Requires column headers; a table without any falls back to the basic
/// presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPresentation;

impl Presentation for FlatPresentation {
    fn responsive_type(&self) -> ResponsiveType {
        ResponsiveType::Flat
    }

    fn attach(&self, table: &Table) -> bool {
        if table.column_count() == 0 {
            tracing::warn!(
                target: targets::PRESENTATION,
                "could not create a flat table as no headers were found; using the basic presentation"
            );
            return false;
        }
        true
    }

    fn layout(&self, table: &Table, visibility: &Visibility, _expand: ExpandState) -> Layout {
        let rows = placements(visibility);
        let by_id: HashMap<RowId, &Row> = table.rows().iter().map(|row| (row.id(), row)).collect();
        let items = rows
            .iter()
            .enumerate()
            .filter_map(|(position, placement)| {
                let row = by_id.get(&placement.id)?;
                let pairs = table
                    .headers()
                    .iter()
                    .zip(row.cells())
                    .map(|(header, cell)| {
                        (header.label().to_string(), cell.text_content().trim().to_string())
                    })
                    .collect();
                Some(FlatItem {
                    row: placement.id,
                    title: format!("Item {}", position + 1),
                    pairs,
                    hidden: placement.hidden,
                })
            })
            .collect();

        Layout::Flat { rows, items }
    }
}
