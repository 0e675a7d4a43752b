//! Sort values and column types.

use std::fmt;
use std::str::FromStr;

use o_table_core::{Error, Result};

/// The comparable representation of a cell used only for ordering.
///
/// Distinct from what the cell displays: a cell showing `"£4bn"` in a
/// currency column sorts as `Number(4000000000.0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// A finite number.
    Number(f64),
    /// Text compared with collation.
    Text(String),
}

impl SortValue {
    /// Build a sort value from formatter output.
    ///
    /// Non-empty text that reads as a finite number becomes a number, so a
    /// cached `"12"` and a computed `12.0` sort identically.
    pub fn normalize(text: impl Into<String>) -> Self {
        let text = text.into();
        match parse_strict_number(&text) {
            Some(number) => Self::Number(number),
            None => Self::Text(text),
        }
    }

    /// Re-apply numeric promotion to an existing value.
    pub fn normalized(self) -> Self {
        match self {
            Self::Text(text) => Self::normalize(text),
            Self::Number(n) if n.is_finite() => Self::Number(n),
            Self::Number(n) => Self::Text(n.to_string()),
        }
    }

    /// The number, if this value is one or is text that reads as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => parse_strict_number(text),
        }
    }

    /// The text, if this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Whether this value is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::normalize(value)
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Parse text that is entirely a finite number, ignoring surrounding
/// whitespace. Empty text is not a number.
pub fn parse_strict_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Rust accepts "inf" and "NaN"; neither is a sortable number.
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Direction of a sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// The value written to a header's `aria-sort` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            other => Err(Error::invalid_sort_direction(other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared data type of a column, read from `data-o-table-data-type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    /// Plain text (the default).
    #[default]
    Text,
    Number,
    Numeric,
    Percent,
    Currency,
    /// FT-style written dates and 12-hour times.
    Date,
    /// A type handled by a registered formatter.
    Custom(String),
}

impl ColumnType {
    /// Parse a declared type. Empty means text; unknown names are custom.
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "" | "text" => Self::Text,
            "number" => Self::Number,
            "numeric" => Self::Numeric,
            "percent" => Self::Percent,
            "currency" => Self::Currency,
            "date" => Self::Date,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The type name used for formatter registration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Numeric => "numeric",
            Self::Percent => "percent",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Custom(name) => name,
        }
    }

    /// Whether values of this type go through numeric extraction.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number | Self::Numeric | Self::Percent | Self::Currency
        )
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_promotes_numeric_text() {
        assert_eq!(SortValue::normalize("12.03"), SortValue::Number(12.03));
        assert_eq!(SortValue::normalize(" 7 "), SortValue::Number(7.0));
        assert_eq!(SortValue::normalize(""), SortValue::Text(String::new()));
        assert_eq!(SortValue::normalize("12–20"), SortValue::Text("12–20".into()));
        assert_eq!(SortValue::normalize("NaN"), SortValue::Text("NaN".into()));
        assert_eq!(SortValue::normalize("inf"), SortValue::Text("inf".into()));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ascending".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("descending".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        let err = "ASC".parse::<SortOrder>().unwrap_err();
        assert!(matches!(err, Error::InvalidSortDirection(ref s) if s == "ASC"));
    }

    #[test]
    fn test_column_type_parse() {
        assert_eq!(ColumnType::parse(""), ColumnType::Text);
        assert_eq!(ColumnType::parse("currency"), ColumnType::Currency);
        assert!(ColumnType::parse("percent").is_numeric());
        assert!(!ColumnType::parse("date").is_numeric());
        assert_eq!(
            ColumnType::parse("emoji-time"),
            ColumnType::Custom("emoji-time".into())
        );
        assert_eq!(ColumnType::parse("emoji-time").as_str(), "emoji-time");
    }
}
