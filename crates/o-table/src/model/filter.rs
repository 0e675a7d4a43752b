//! Row filters.

use std::fmt;
use std::sync::Arc;

use o_table_core::{Error, Result};

use super::cell::Cell;
use super::extract::extract;

/// Type alias for a filter predicate.
///
/// Returns `true` if the row should be shown, `false` to filter it out.
pub type PredicateFn = Arc<dyn Fn(&Cell) -> bool + Send + Sync>;

/// How a column is filtered.
#[derive(Clone)]
pub enum Filter {
    /// Keep rows whose cell text contains the needle, ignoring case,
    /// whitespace and punctuation. An empty needle keeps every row.
    Text(String),
    /// Keep rows for which the predicate returns `true`.
    Predicate(PredicateFn),
}

impl Filter {
    /// A text filter.
    pub fn text(needle: impl Into<String>) -> Self {
        Self::Text(needle.into())
    }

    /// A predicate filter.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Cell) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Build a filter from a loosely typed value, such as the value of a
    /// filter input read from configuration. Strings filter by text and
    /// `null` clears the filter; anything else is rejected.
    pub fn from_json(column: usize, value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(needle) => Ok(Self::text(needle.clone())),
            serde_json::Value::Null => Ok(Self::text(String::new())),
            serde_json::Value::Number(number) => Ok(Self::text(number.to_string())),
            other => Err(Error::invalid_filter(
                column,
                format!("expected a string, got {}", json_kind(other)),
            )),
        }
    }

    /// Whether this filter keeps every row.
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::Text(needle) if normalize(needle).is_empty())
    }

    /// Whether a cell passes the filter.
    pub fn matches(&self, cell: &Cell) -> bool {
        match self {
            Self::Text(needle) => {
                let needle = normalize(needle);
                needle.is_empty() || normalize(&extract(cell)).contains(&needle)
            }
            Self::Predicate(predicate) => predicate(cell),
        }
    }
}

impl From<&str> for Filter {
    fn from(needle: &str) -> Self {
        Self::text(needle)
    }
}

impl From<String> for Filter {
    fn from(needle: String) -> Self {
        Self::Text(needle)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(needle) => f.debug_tuple("Text").field(needle).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The active filter of a table.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub column: usize,
    pub filter: Filter,
}

/// Lowercase and keep only alphanumerics and dots.
fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || *c == '.')
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
