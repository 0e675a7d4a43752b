//! Overflow presentation: rows plus a show more/fewer expander.

use super::{Layout, Presentation, placements};
use crate::config::ResponsiveType;
use crate::model::{ExpandState, Table, Visibility};

/// The show more/fewer control of an expandable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    pub label: &'static str,
    pub aria_expanded: &'static str,
    /// Rows hidden by collapsing.
    pub collapsed_rows: usize,
}

impl Expander {
    pub const SHOW_MORE: &'static str = "Show more";
    pub const SHOW_FEWER: &'static str = "Show fewer";
}

/// A sideways-scrolling table that can collapse rows beyond a minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverflowPresentation;

impl Presentation for OverflowPresentation {
    fn responsive_type(&self) -> ResponsiveType {
        ResponsiveType::Overflow
    }

    fn layout(&self, table: &Table, visibility: &Visibility, expand: ExpandState) -> Layout {
        let collapsed_rows = table.rows().iter().filter(|row| row.is_hidden_by_collapse()).count();
        let expander = match expand {
            ExpandState::NotExpandable => None,
            ExpandState::Expanded => Some(Expander {
                label: Expander::SHOW_FEWER,
                aria_expanded: "true",
                collapsed_rows,
            }),
            ExpandState::Contracted { .. } => Some(Expander {
                label: Expander::SHOW_MORE,
                aria_expanded: "false",
                collapsed_rows,
            }),
        };

        Layout::Overflow {
            rows: placements(visibility),
            expander,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::visibility::compute_visibility;
    use crate::model::{Cell, ColumnHeader};

    fn table() -> Table {
        let mut table = Table::new(vec![ColumnHeader::new("N")]);
        for n in 0..5 {
            table.push_row(vec![Cell::from_text(n.to_string())]);
        }
        table
    }

    #[test]
    fn test_expander_labels() {
        let mut t = table();
        let contracted = ExpandState::Contracted { minimum_row_count: 2 };
        let visibility = compute_visibility(&mut t, None, contracted);
        let Layout::Overflow { expander, rows } = OverflowPresentation.layout(&t, &visibility, contracted) else {
            panic!("expected an overflow layout");
        };
        let expander = expander.unwrap();
        assert_eq!(expander.label, "Show more");
        assert_eq!(expander.aria_expanded, "false");
        assert_eq!(expander.collapsed_rows, 3);
        assert_eq!(rows.iter().filter(|row| row.hidden).count(), 3);

        let visibility = compute_visibility(&mut t, None, ExpandState::Expanded);
        let Layout::Overflow { expander, .. } = OverflowPresentation.layout(&t, &visibility, ExpandState::Expanded)
        else {
            panic!("expected an overflow layout");
        };
        assert_eq!(expander.unwrap().label, "Show fewer");
    }

    #[test]
    fn test_no_expander_when_not_expandable() {
        let mut t = table();
        let visibility = compute_visibility(&mut t, None, ExpandState::NotExpandable);
        let layout = OverflowPresentation.layout(&t, &visibility, ExpandState::NotExpandable);
        assert!(matches!(layout, Layout::Overflow { expander: None, .. }));
    }
}
