//! Sort formatting: from a cell to its memoized sort value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use o_table_core::logging::targets;

use super::cell::Cell;
use super::coerce::{coerce, current_year};
use super::extract::extract;
use super::value::{ColumnType, SortValue};

/// A custom cell formatter.
///
/// Receives the raw cell and returns its sort value. Registered formatters
/// bypass extraction and the numeric and date heuristics entirely.
pub type FormatFn = Arc<dyn Fn(&Cell) -> SortValue + Send + Sync>;

/// Formats cells into sort values and holds custom type formatters.
///
/// A formatter is shared between tables through an `Arc`; registering a type
/// is visible to every table using it.
///
/// # Example
///
/// ```
/// use o_table::model::{Cell, ColumnType, SortFormatter, SortValue};
///
/// let formatter = SortFormatter::new();
/// formatter.set_formatter("emoji-time", |cell| {
///     let text = cell.content().nodes().len();
///     SortValue::Number(text as f64)
/// });
///
/// let mut cell = Cell::from_text("🌑");
/// let value = formatter.format_cell(&mut cell, &ColumnType::parse("emoji-time"));
/// assert_eq!(value, SortValue::Number(1.0));
/// ```
pub struct SortFormatter {
    formatters: RwLock<HashMap<String, FormatFn>>,
    /// Year assumed for dates without one. `None` means the current year.
    reference_year: Option<i32>,
}

impl SortFormatter {
    pub fn new() -> Self {
        Self {
            formatters: RwLock::new(HashMap::new()),
            reference_year: None,
        }
    }

    /// Fix the year assumed for dates that only name a month and day.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Register a formatter for a type name, replacing any previous one.
    ///
    /// Built-in type names can be overridden too.
    pub fn set_formatter<F>(&self, type_name: impl Into<String>, format: F)
    where
        F: Fn(&Cell) -> SortValue + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        tracing::debug!(target: targets::FORMAT, type_name = %type_name, "registered sort formatter");
        self.formatters.write().insert(type_name, Arc::new(format));
    }

    /// Whether a custom formatter is registered for a type name.
    pub fn has_formatter(&self, type_name: &str) -> bool {
        self.formatters.read().contains_key(type_name)
    }

    /// The sort value of a cell for a column type.
    ///
    /// A value already on the cell (memoized or overridden) is returned as-is.
    /// Otherwise it is computed, normalized and memoized on the cell.
    pub fn format_cell(&self, cell: &mut Cell, column_type: &ColumnType) -> SortValue {
        if let Some(value) = cell.sort_value() {
            return value.clone();
        }
        let value = self.compute(cell, column_type);
        cell.memoize(value).clone()
    }

    /// Compute a sort value without consulting or filling the memo.
    pub fn compute(&self, cell: &Cell, column_type: &ColumnType) -> SortValue {
        let custom = self.formatters.read().get(column_type.as_str()).cloned();
        let value = match custom {
            Some(format) => format(cell),
            None => {
                if let ColumnType::Custom(name) = column_type {
                    tracing::trace!(target: targets::FORMAT, type_name = %name, "no formatter registered, sorting as text");
                }
                let text = extract(cell);
                let year = self.reference_year.unwrap_or_else(current_year);
                coerce(&text, column_type, year)
            }
        };
        value.normalized()
    }
}

impl Default for SortFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SortFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.formatters.read().keys().cloned().collect();
        types.sort();
        f.debug_struct("SortFormatter")
            .field("custom_types", &types)
            .field("reference_year", &self.reference_year)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cell::{CellMarkup, CellNode, CellContent, Element};

    #[test]
    fn test_text_column_promotes_numbers() {
        let formatter = SortFormatter::new();
        let mut cell = Cell::from_text(" 42 ");
        assert_eq!(formatter.format_cell(&mut cell, &ColumnType::Text), SortValue::Number(42.0));
        let mut word = Cell::from_text("Brie*");
        assert_eq!(formatter.format_cell(&mut word, &ColumnType::Text), SortValue::Text("Brie".into()));
    }

    #[test]
    fn test_value_is_memoized() {
        let formatter = SortFormatter::new();
        let mut cell = Cell::from_text("£1,200");
        assert_eq!(cell.sort_value(), None);
        formatter.format_cell(&mut cell, &ColumnType::Currency);
        assert_eq!(cell.sort_value(), Some(&SortValue::Number(1200.0)));
        assert!(!cell.has_override());
    }

    #[test]
    fn test_override_wins() {
        let formatter = SortFormatter::new();
        let mut cell = Cell::from_text("£1,200").with_sort_value("7");
        assert_eq!(formatter.format_cell(&mut cell, &ColumnType::Currency), SortValue::Number(7.0));
    }

    #[test]
    fn test_time_element_sorts_as_number_in_any_column() {
        let formatter = SortFormatter::new();
        let mut cell = Cell::new(CellContent::new(vec![
            Element::new("time").attr("datetime", "1970-01-01T00:00:01Z").text("just now").into(),
        ]));
        assert_eq!(formatter.format_cell(&mut cell, &ColumnType::Date), SortValue::Number(1000.0));
    }

    #[test]
    fn test_custom_formatter_receives_raw_cell() {
        let formatter = SortFormatter::new();
        formatter.set_formatter("flag", |cell: &Cell| {
            let labels = cell.inline_labels();
            SortValue::Text(labels.join("|"))
        });
        assert!(formatter.has_formatter("flag"));

        let mut cell = Cell::new(CellContent::new(vec![
            CellNode::text(""),
            Element::new("span").attr("title", "UK").into(),
        ]));
        assert_eq!(
            formatter.format_cell(&mut cell, &ColumnType::parse("flag")),
            SortValue::Text("UK".into())
        );
    }

    #[test]
    fn test_unregistered_custom_type_sorts_as_text() {
        let formatter = SortFormatter::new();
        let mut cell = Cell::from_text("£4");
        assert_eq!(
            formatter.format_cell(&mut cell, &ColumnType::parse("mystery")),
            SortValue::Text("£4".into())
        );
    }

    #[test]
    fn test_reference_year() {
        let formatter = SortFormatter::new().with_reference_year(1970);
        let mut cell = Cell::from_text("January 2");
        assert_eq!(formatter.format_cell(&mut cell, &ColumnType::Date), SortValue::Number(86_400_000.0));
    }
}
