//! Prelude module for o-table.
//!
//! ```
//! use o_table::prelude::*;
//! ```
//!
//! This provides access to:
//! - The controller (`OTable`) and its signals
//! - The table model (`Table`, `Row`, `Cell`, `ColumnHeader`)
//! - Sort and filter types (`SortOrder`, `SortValue`, `Filter`)
//! - Options (`TableOptions`, `ResponsiveType`)

// ============================================================================
// Controller
// ============================================================================

pub use crate::controller::{OTable, SortOutcome, SortRequest, TableSignals};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    Cell, CellContent, CellMarkup, CellNode, ColumnHeader, ColumnType, Element, ExpandState, Filter,
    Row, RowId, SortFormatter, SortOrder, SortValue, Table, Visibility,
};

// ============================================================================
// Configuration and presentation
// ============================================================================

pub use crate::config::{ResponsiveType, TableOptions};
pub use crate::presentation::{Layout, Presentation};

// ============================================================================
// Signals and errors
// ============================================================================

pub use o_table_core::{Cancelled, Proceed, Signal, VetoSignal};
pub use crate::{Result, TableError};
