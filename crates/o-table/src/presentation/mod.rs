//! Responsive presentations.
//!
//! A presentation turns the table's sorted rows and the latest
//! [`Visibility`] into a [`Layout`] a renderer can draw. Presentations never
//! decide which rows are hidden; they only arrange what the visibility engine
//! computed.
//!
//! | Responsive type | Presentation |
//! |---|---|
//! | `none` | [`BasicPresentation`]: rows in display order |
//! | `flat` | [`FlatPresentation`]: one heading/value group per row |
//! | `scroll` | [`ScrollPresentation`]: columns become rows |
//! | `overflow` | [`OverflowPresentation`]: rows plus a show more/fewer expander |

mod flat;
mod overflow;
mod scroll;

pub use flat::{FlatItem, FlatPresentation};
pub use overflow::{Expander, OverflowPresentation};
pub use scroll::{ScrollCell, ScrollPresentation, ScrollRow};

use crate::config::ResponsiveType;
use crate::model::{ExpandState, RowId, Table, Visibility};

/// A row in display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlacement {
    pub id: RowId,
    pub hidden: bool,
}

/// What a presentation produced for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// Rows in display order.
    Basic { rows: Vec<RowPlacement> },
    /// Rows in display order, each repeated as a heading/value group.
    Flat {
        rows: Vec<RowPlacement>,
        items: Vec<FlatItem>,
    },
    /// Rows in display order plus one transposed row per column.
    Scroll {
        rows: Vec<RowPlacement>,
        transposed: Vec<ScrollRow>,
    },
    /// Rows in display order plus the expander control, if any.
    Overflow {
        rows: Vec<RowPlacement>,
        expander: Option<Expander>,
    },
}

impl Layout {
    /// Row placements common to every layout.
    pub fn rows(&self) -> &[RowPlacement] {
        match self {
            Self::Basic { rows }
            | Self::Flat { rows, .. }
            | Self::Scroll { rows, .. }
            | Self::Overflow { rows, .. } => rows,
        }
    }

    /// IDs of visible rows in display order.
    pub fn visible_row_ids(&self) -> Vec<RowId> {
        self.rows()
            .iter()
            .filter(|placement| !placement.hidden)
            .map(|placement| placement.id)
            .collect()
    }
}

/// Arranges a table for display.
pub trait Presentation: Send + Sync {
    /// The responsive type this presentation implements.
    fn responsive_type(&self) -> ResponsiveType;

    /// Build the layout for the current state.
    fn layout(&self, table: &Table, visibility: &Visibility, expand: ExpandState) -> Layout;

    /// Called once when the table is created, before the first layout.
    ///
    /// Returns `false` when the presentation cannot be used for this table,
    /// in which case the table falls back to the basic presentation.
    fn attach(&self, _table: &Table) -> bool {
        true
    }
}

/// Rows in display order with no responsive behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPresentation;

impl Presentation for BasicPresentation {
    fn responsive_type(&self) -> ResponsiveType {
        ResponsiveType::None
    }

    fn layout(&self, _table: &Table, visibility: &Visibility, _expand: ExpandState) -> Layout {
        Layout::Basic {
            rows: placements(visibility),
        }
    }
}

/// The presentation for a responsive type.
pub fn for_type(responsive_type: ResponsiveType) -> Box<dyn Presentation> {
    match responsive_type {
        ResponsiveType::None => Box::new(BasicPresentation),
        ResponsiveType::Flat => Box::new(FlatPresentation),
        ResponsiveType::Scroll => Box::new(ScrollPresentation),
        ResponsiveType::Overflow => Box::new(OverflowPresentation),
    }
}

/// Placements in display order. Hidden rows are the tail of the order.
pub(crate) fn placements(visibility: &Visibility) -> Vec<RowPlacement> {
    let visible = visibility.visible_count();
    visibility
        .order()
        .iter()
        .enumerate()
        .map(|(position, &id)| RowPlacement {
            id,
            hidden: position >= visible,
        })
        .collect()
}
