//! Error types for o-table.
//!
//! Only configuration errors are represented here: a request that names a
//! column without a header, an unknown sort direction, a filter that cannot be
//! applied. Malformed cell content never produces an error; it degrades to
//! "keep the original text" during sorting and "treat as absent" during
//! filtering.

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving a table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No header exists for the requested column.
    #[error("Could not find header for column index \"{column}\".")]
    MissingHeader { column: usize },

    /// A sort direction other than ascending or descending was requested.
    #[error("Sort order \"{0}\" is not supported. Must be \"ascending\" or \"descending\".")]
    InvalidSortDirection(String),

    /// The column header opted out of sorting.
    #[error("Sorting is disabled for column index \"{column}\".")]
    SortDisabled { column: usize },

    /// The table was configured with sorting turned off.
    #[error("Table is not sortable.")]
    NotSortable,

    /// Expand or contract was requested on a table that cannot collapse rows.
    #[error("Table cannot be expanded or contracted.")]
    NotExpandable,

    /// The filter argument could not be applied to the column.
    #[error("Invalid filter for column index \"{column}\": {reason}")]
    InvalidFilter { column: usize, reason: String },

    /// An unknown responsive presentation was named.
    #[error("Unknown responsive type \"{0}\".")]
    UnknownPresentation(String),

    /// Table markup could not be read.
    #[error("Markup error: {0}")]
    Markup(String),

    /// Table options could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a missing header error.
    pub fn missing_header(column: usize) -> Self {
        Self::MissingHeader { column }
    }

    /// Create an invalid direction error.
    pub fn invalid_sort_direction(direction: impl Into<String>) -> Self {
        Self::InvalidSortDirection(direction.into())
    }

    /// Create an invalid filter error.
    pub fn invalid_filter(column: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            column,
            reason: reason.into(),
        }
    }

    /// Create a markup error.
    pub fn markup(message: impl Into<String>) -> Self {
        Self::Markup(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error reports a caller mistake about a column.
    pub fn is_column_error(&self) -> bool {
        matches!(
            self,
            Self::MissingHeader { .. } | Self::SortDisabled { .. } | Self::InvalidFilter { .. }
        )
    }
}
