//! o-table: sortable, filterable and collapsible data tables.
//!
//! The crate turns table markup (or a table built in code) into a model that
//! can be sorted by any column, filtered and collapsed behind a
//! "show more" control. Sorting understands the content people put in
//! tables: numbers with thousands separators and currency symbols,
//! abbreviations such as `"£3.5bn"`, FT-style dates, times and icons.
//!
//! # Example
//!
//! ```
//! use o_table::prelude::*;
//!
//! let mut table = OTable::from_html(r#"
//!     <table>
//!         <thead><tr><th data-o-table-data-type="currency">Price</th></tr></thead>
//!         <tbody>
//!             <tr><td>$140</td></tr>
//!             <tr><td>£4</td></tr>
//!             <tr><td>Rmb100bn</td></tr>
//!             <tr><td>HK$12</td></tr>
//!         </tbody>
//!     </table>
//! "#)?;
//!
//! table.sort_rows_by_column(0, SortOrder::Ascending)?;
//! let prices: Vec<String> = table
//!     .table()
//!     .rows()
//!     .iter()
//!     .map(|row| row.cell(0).unwrap().text_content())
//!     .collect();
//! assert_eq!(prices, ["£4", "HK$12", "$140", "Rmb100bn"]);
//! # Ok::<(), o_table::TableError>(())
//! ```
//!
//! # Features
//!
//! - `localization` (default): compare text with an ICU collator for the
//!   system locale or the configured `locale`.

pub mod config;
pub mod controller;
pub mod markup;
pub mod model;
pub mod prelude;
pub mod presentation;

pub use o_table_core::{Error as TableError, Result, logging, signal, task};

pub use config::{ResponsiveType, TableOptions};
pub use controller::{OTable, SortOutcome, SortRequest, TableSignals};
