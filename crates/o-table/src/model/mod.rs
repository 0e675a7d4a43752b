//! The table model and its sort and visibility engines.
//!
//! Data flows leaf first:
//!
//! - [`extract`](extract::extract) turns a cell's markup into a text token
//! - [`coerce`](coerce::coerce) turns a token into a number or text for the
//!   column's declared type
//! - [`SortFormatter`] combines the two, runs custom formatters and memoizes
//!   the result on the cell
//! - [`compare`](compare::compare) orders mixed sort values
//! - [`reorder`](ordering::reorder) stable-sorts the rows of a [`Table`]
//! - [`compute_visibility`](visibility::compute_visibility) applies the
//!   filter and collapse policy and yields the display order

pub mod cell;
pub mod coerce;
pub mod compare;
pub mod extract;
pub mod filter;
pub mod formatter;
pub mod ordering;
pub mod table;
pub mod value;
pub mod visibility;

pub use cell::{Cell, CellContent, CellMarkup, CellNode, Element};
pub use compare::Collator;
pub use filter::{Filter, FilterState, PredicateFn};
pub use formatter::{FormatFn, SortFormatter};
pub use table::{ColumnHeader, Row, RowId, Table};
pub use value::{ColumnType, SortOrder, SortValue};
pub use visibility::{ExpandState, Visibility};
