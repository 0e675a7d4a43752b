//! Table options.
//!
//! Options can be written as TOML or JSON, or read from the `data-o-table-*`
//! attributes of a table element:
//!
//! ```
//! use o_table::config::{ResponsiveType, TableOptions};
//!
//! let options = TableOptions::from_toml_str(r#"
//!     expanded = false
//!     minimumRowCount = 5
//!     responsiveType = "overflow"
//! "#).unwrap();
//! assert_eq!(options.expanded, Some(false));
//! assert_eq!(options.minimum_row_count, 5);
//! assert_eq!(options.responsive_type, ResponsiveType::Overflow);
//! assert!(options.sortable);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use o_table_core::{Error, Result};

/// Rows kept visible when a table is contracted, unless configured.
pub const DEFAULT_MINIMUM_ROW_COUNT: usize = 20;

/// How a table adapts to small viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsiveType {
    /// No responsive behavior.
    #[default]
    None,
    /// Each row becomes a group of heading/value pairs.
    Flat,
    /// Rows and columns are transposed.
    Scroll,
    /// The table scrolls sideways and may collapse rows.
    Overflow,
}

impl ResponsiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Flat => "flat",
            Self::Scroll => "scroll",
            Self::Overflow => "overflow",
        }
    }
}

impl FromStr for ResponsiveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "none" | "basic" => Ok(Self::None),
            "flat" => Ok(Self::Flat),
            "scroll" => Ok(Self::Scroll),
            "overflow" => Ok(Self::Overflow),
            other => Err(Error::UnknownPresentation(other.to_string())),
        }
    }
}

impl fmt::Display for ResponsiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    /// Whether column headers can be used to sort.
    pub sortable: bool,
    /// `None` for a table that never collapses rows, otherwise whether it
    /// starts expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Rows kept visible when contracted.
    pub minimum_row_count: usize,
    /// Responsive presentation.
    pub responsive_type: ResponsiveType,
    /// BCP 47 locale used to collate text. `None` uses the system locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sortable: true,
            expanded: None,
            minimum_row_count: DEFAULT_MINIMUM_ROW_COUNT,
            responsive_type: ResponsiveType::None,
            locale: None,
        }
    }
}

impl TableOptions {
    /// Parse options from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::config(format!("invalid TOML options: {e}")))
    }

    /// Parse options from JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| Error::config(format!("invalid JSON options: {e}")))
    }

    /// Load options from a `.toml` or `.json` file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read '{}': {e}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(Error::config(format!(
                "unsupported options file '{}': expected .toml or .json",
                path.display()
            ))),
        }
    }

    /// Serialize options as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(format!("failed to write TOML options: {e}")))
    }

    /// Read options from `data-o-table-*` attributes.
    ///
    /// - `data-o-table-sortable="false"` disables sorting
    /// - `data-o-table-expanded` makes the table expandable; any value other
    ///   than `"false"` starts it expanded
    /// - `data-o-table-minimum-row-count` falls back to the default when it
    ///   does not start with digits
    /// - `data-o-table-responsive` names the responsive type
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (name, value) in attributes {
            match name {
                "data-o-table-sortable" => options.sortable = value != "false",
                "data-o-table-expanded" => options.expanded = Some(value != "false"),
                "data-o-table-minimum-row-count" => {
                    options.minimum_row_count =
                        parse_leading_count(value).unwrap_or(DEFAULT_MINIMUM_ROW_COUNT);
                }
                "data-o-table-responsive" => options.responsive_type = value.parse()?,
                "data-o-table-locale" => options.locale = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(options)
    }
}

/// Leading decimal digits of an attribute value, e.g. `"5 rows"` is 5.
fn parse_leading_count(value: &str) -> Option<usize> {
    let value = value.trim_start();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
