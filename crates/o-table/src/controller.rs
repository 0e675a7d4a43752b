//! The table controller.
//!
//! [`OTable`] owns a [`Table`] and drives it through sort, filter and
//! expand/contract requests. Every request runs synchronously: by the time a
//! method returns, rows are reordered, row flags are updated and the display
//! order is known. Only drawing is deferred, through a [`FrameQueue`] the host
//! flushes on its next paint.
//!
//! # Signals
//!
//! | Signal | Payload | Emitted |
//! |---|---|---|
//! | `sorting` | [`SortRequest`] | before a sort; any slot may cancel it |
//! | `sorted` | [`SortRequest`] | after rows are reordered and visibility recomputed |
//! | `filtered` | [`Visibility`] | after a filter is applied or cleared |
//! | `visibility_changed` | [`Visibility`] | after any transition recomputed row visibility |
//! | `expanded_changed` | `bool` | after expand or contract |
//! | `ready` | `()` | once, when the first frame is flushed |
//!
//! # Example
//!
//! ```
//! use o_table::prelude::*;
//!
//! let mut table = OTable::from_html(r#"
//!     <table data-o-table-expanded="false" data-o-table-minimum-row-count="1">
//!         <thead><tr><th data-o-table-data-type="number">Rank</th></tr></thead>
//!         <tbody><tr><td>3</td></tr><tr><td>1</td></tr><tr><td>2</td></tr></tbody>
//!     </table>
//! "#).unwrap();
//!
//! table.sort_rows_by_column(0, SortOrder::Ascending).unwrap();
//! assert_eq!(table.visibility().visible_count(), 1);
//!
//! table.expand().unwrap();
//! assert_eq!(table.visibility().visible_count(), 3);
//! ```

use std::sync::Arc;

use o_table_core::logging::{span_names, targets};
use o_table_core::{Error, FrameQueue, PerfSpan, Result, Signal, VetoSignal, otable_debug, otable_warn};

use crate::config::TableOptions;
use crate::markup;
use crate::model::ordering::reorder;
use crate::model::visibility::compute_visibility;
use crate::model::{
    Cell, Collator, ExpandState, Filter, FilterState, RowId, SortFormatter, SortOrder, SortValue, Table,
    Visibility,
};
use crate::presentation::{self, BasicPresentation, Layout, Presentation};

/// A sort of one column in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortRequest {
    pub column: usize,
    pub order: SortOrder,
}

/// What happened to a sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    /// Rows were reordered.
    Applied,
    /// A `sorting` slot cancelled the default sort. The canceller is expected
    /// to reorder rows itself and call [`OTable::mark_sorted`].
    Cancelled,
}

/// Why a frame was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReason {
    Initial,
    Sorted(SortRequest),
    Filtered,
    ExpandChanged,
    RowsUpdated,
}

/// Signals emitted by an [`OTable`].
pub struct TableSignals {
    /// Emitted before the default sort. Any slot returning `Err(Cancelled)`
    /// prevents it.
    pub sorting: VetoSignal<SortRequest>,
    /// Emitted after a sort is applied or marked.
    pub sorted: Signal<SortRequest>,
    /// Emitted after the filter changed. Carries the new visibility.
    pub filtered: Signal<Visibility>,
    /// Emitted whenever a sort, filter, expand, contract or row update
    /// recomputed visibility. Carries the new visibility.
    pub visibility_changed: Signal<Visibility>,
    /// Emitted after the table expanded (`true`) or contracted (`false`).
    pub expanded_changed: Signal<bool>,
    /// Emitted once, when the first frame is flushed.
    pub ready: Signal<()>,
}

impl Default for TableSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSignals {
    pub fn new() -> Self {
        Self {
            sorting: VetoSignal::new(),
            sorted: Signal::new(),
            filtered: Signal::new(),
            visibility_changed: Signal::new(),
            expanded_changed: Signal::new(),
            ready: Signal::new(),
        }
    }
}

/// An interactive table.
pub struct OTable {
    table: Table,
    options: TableOptions,
    formatter: Arc<SortFormatter>,
    collator: Collator,
    presentation: Box<dyn Presentation>,
    signals: TableSignals,
    current_sort: Option<SortRequest>,
    current_filter: Option<FilterState>,
    expand: ExpandState,
    visibility: Visibility,
    frames: FrameQueue<FrameReason>,
    ready: bool,
}

impl OTable {
    /// Create a controller with its own sort formatter.
    pub fn new(table: Table, options: TableOptions) -> Self {
        Self::with_formatter(table, options, Arc::new(SortFormatter::new()))
    }

    /// Create a controller sharing a sort formatter with other tables.
    pub fn with_formatter(mut table: Table, options: TableOptions, formatter: Arc<SortFormatter>) -> Self {
        let collator = match options.locale.as_deref() {
            Some(locale) => Collator::for_locale(locale),
            None => Collator::system(),
        };

        let mut presentation = presentation::for_type(options.responsive_type);
        if !presentation.attach(&table) {
            presentation = Box::new(BasicPresentation);
        }

        let expand = initial_expand_state(&table, &options);
        let visibility = compute_visibility(&mut table, None, expand);
        let current_sort = table
            .headers()
            .iter()
            .enumerate()
            .find_map(|(column, header)| header.sort_order().map(|order| SortRequest { column, order }));

        let mut frames = FrameQueue::new();
        frames.schedule(FrameReason::Initial);

        tracing::debug!(
            target: targets::CORE,
            columns = table.column_count(),
            rows = table.row_count(),
            responsive_type = %presentation.responsive_type(),
            ?expand,
            "created table"
        );

        Self {
            table,
            options,
            formatter,
            collator,
            presentation,
            signals: TableSignals::new(),
            current_sort,
            current_filter: None,
            expand,
            visibility,
            frames,
            ready: false,
        }
    }

    /// Create a controller from `<table>` markup.
    pub fn from_html(html: &str) -> Result<Self> {
        let parsed = markup::parse_table(html)?;
        Ok(Self::new(parsed.table, parsed.options))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn signals(&self) -> &TableSignals {
        &self.signals
    }

    /// The shared sort formatter.
    pub fn formatter(&self) -> &Arc<SortFormatter> {
        &self.formatter
    }

    /// The most recent sort applied or marked.
    pub fn current_sort(&self) -> Option<SortRequest> {
        self.current_sort
    }

    pub fn current_filter(&self) -> Option<&FilterState> {
        self.current_filter.as_ref()
    }

    pub fn expand_state(&self) -> ExpandState {
        self.expand
    }

    /// The `aria-expanded` value of the table, if it is expandable.
    pub fn aria_expanded(&self) -> Option<&'static str> {
        self.expand.aria_expanded()
    }

    /// The latest visibility pass.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Row IDs hidden by the filter or by collapsing.
    pub fn hidden_rows(&self) -> &[RowId] {
        self.visibility.hidden_rows()
    }

    /// Sort the table by a column.
    ///
    /// Emits `sorting` first; if any slot cancels, rows are left untouched and
    /// [`SortOutcome::Cancelled`] is returned. Otherwise rows are reordered,
    /// visibility is recomputed and `sorted` is emitted.
    pub fn sort_rows_by_column(&mut self, column: usize, order: SortOrder) -> Result<SortOutcome> {
        let _perf = PerfSpan::new(span_names::SORT);
        if self.table.header(column).is_none() {
            return Err(Error::missing_header(column));
        }

        let request = SortRequest { column, order };
        if self.signals.sorting.emit(&request).is_err() {
            otable_debug!(column, %order, "default sort cancelled");
            return Ok(SortOutcome::Cancelled);
        }

        reorder(&mut self.table, column, order, &self.formatter, &self.collator)?;
        self.finish_sort(request);
        Ok(SortOutcome::Applied)
    }

    /// Sort by a column with the direction given by name, `"ascending"` or
    /// `"descending"`.
    pub fn sort_rows_by_direction(&mut self, column: usize, direction: &str) -> Result<SortOutcome> {
        let order = direction.parse()?;
        self.sort_rows_by_column(column, order)
    }

    /// Sort a column the way its header button does: ascending unless it is
    /// already sorted ascending.
    pub fn toggle_sort(&mut self, column: usize) -> Result<SortOutcome> {
        if !self.options.sortable {
            return Err(Error::NotSortable);
        }
        let header = self.table.header(column).ok_or_else(|| Error::missing_header(column))?;
        if header.is_sort_disabled() {
            return Err(Error::SortDisabled { column });
        }
        let order = match header.sort_order() {
            Some(SortOrder::Ascending) => SortOrder::Descending,
            Some(SortOrder::Descending) | None => SortOrder::Ascending,
        };
        self.sort_rows_by_column(column, order)
    }

    /// Move rows into the given order.
    ///
    /// Used by custom sorts after cancelling `sorting`. Rows not listed keep
    /// their relative order after the listed ones.
    pub fn set_row_order(&mut self, ids: &[RowId]) {
        self.table.reorder_by_ids(ids);
    }

    /// Record a sort that was performed outside the controller.
    ///
    /// Updates header sort state, recomputes visibility and emits `sorted`.
    pub fn mark_sorted(&mut self, column: usize, order: SortOrder) -> Result<()> {
        if self.table.header(column).is_none() {
            return Err(Error::missing_header(column));
        }
        self.table.mark_sorted(column, order);
        self.finish_sort(SortRequest { column, order });
        Ok(())
    }

    fn finish_sort(&mut self, request: SortRequest) {
        self.current_sort = Some(request);
        self.refresh_visibility();
        self.frames.schedule(FrameReason::Sorted(request));
        self.signals.sorted.emit(request);
    }

    /// Filter rows by a column.
    ///
    /// Replaces any previous filter. The current sort order is kept.
    pub fn filter(&mut self, column: usize, filter: impl Into<Filter>) -> Result<()> {
        let _perf = PerfSpan::new(span_names::FILTER);
        if self.table.header(column).is_none() {
            return Err(Error::missing_header(column));
        }

        let filter = filter.into();
        tracing::debug!(target: targets::FILTER, column, ?filter, "applying filter");
        self.current_filter = Some(FilterState { column, filter });
        self.finish_filter();
        Ok(())
    }

    /// Filter with a loosely typed value; see [`Filter::from_json`].
    pub fn filter_json(&mut self, column: usize, value: &serde_json::Value) -> Result<()> {
        let filter = Filter::from_json(column, value)?;
        self.filter(column, filter)
    }

    /// Remove the filter.
    pub fn clear_filter(&mut self) {
        let _perf = PerfSpan::new(span_names::FILTER);
        self.current_filter = None;
        self.finish_filter();
    }

    fn finish_filter(&mut self) {
        self.refresh_visibility();
        self.frames.schedule(FrameReason::Filtered);
        self.signals.filtered.emit(self.visibility.clone());
    }

    /// Whether the table can collapse rows: it was declared expandable and
    /// has more rows than its minimum row count.
    pub fn can_expand(&self) -> bool {
        self.options.expanded.is_some() && self.options.minimum_row_count < self.table.row_count()
    }

    /// Show every row.
    pub fn expand(&mut self) -> Result<()> {
        self.set_expanded(true)
    }

    /// Hide rows beyond the minimum row count.
    pub fn contract(&mut self) -> Result<()> {
        self.set_expanded(false)
    }

    /// Expand a contracted table or contract an expanded one.
    pub fn toggle_expanded(&mut self) -> Result<()> {
        let expanded = matches!(self.expand, ExpandState::Expanded);
        self.set_expanded(!expanded)
    }

    fn set_expanded(&mut self, expanded: bool) -> Result<()> {
        let _perf = PerfSpan::new(span_names::VISIBILITY);
        if !self.can_expand() {
            return Err(Error::NotExpandable);
        }
        self.expand = if expanded {
            ExpandState::Expanded
        } else {
            ExpandState::Contracted {
                minimum_row_count: self.options.minimum_row_count,
            }
        };
        self.refresh_visibility();
        self.frames.schedule(FrameReason::ExpandChanged);
        self.signals.expanded_changed.emit(expanded);
        Ok(())
    }

    /// Edit rows, then re-apply the current sort, filter and collapse.
    ///
    /// Rows may be added, removed or have their content replaced. Replaced
    /// content drops memoized sort values, except caller overrides.
    pub fn update_rows<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Table),
    {
        edit(&mut self.table);

        self.expand = match (self.can_expand(), self.expand) {
            (false, _) => ExpandState::NotExpandable,
            (true, ExpandState::NotExpandable) => initial_expand_state(&self.table, &self.options),
            (true, ExpandState::Contracted { .. }) => ExpandState::Contracted {
                minimum_row_count: self.options.minimum_row_count,
            },
            (true, ExpandState::Expanded) => ExpandState::Expanded,
        };

        if let Some(SortRequest { column, order }) = self.current_sort {
            reorder(&mut self.table, column, order, &self.formatter, &self.collator)?;
        }
        self.refresh_visibility();
        self.frames.schedule(FrameReason::RowsUpdated);
        Ok(())
    }

    /// Register a formatter for a column type.
    ///
    /// Computed sort values in columns of that type are dropped so the next
    /// sort uses the new formatter. Other tables sharing the formatter keep
    /// their memoized values until their own content changes.
    pub fn set_sort_formatter_for_type<F>(&mut self, type_name: &str, format: F)
    where
        F: Fn(&Cell) -> SortValue + Send + Sync + 'static,
    {
        self.formatter.set_formatter(type_name, format);
        let columns: Vec<usize> = self
            .table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, header)| header.data_type().as_str() == type_name)
            .map(|(column, _)| column)
            .collect();
        for column in columns {
            self.table.invalidate_column(column);
        }
    }

    /// Whether a frame is waiting to be drawn.
    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    /// Build the layout for the latest pending frame.
    ///
    /// Requests made since the last flush are coalesced into one frame. The
    /// first flush emits `ready`. Returns `None` if nothing changed.
    pub fn flush_frame(&mut self) -> Option<Layout> {
        let _perf = PerfSpan::new(span_names::FRAME);
        let (id, reason) = self.frames.take()?;
        let layout = self.presentation.layout(&self.table, &self.visibility, self.expand);
        tracing::trace!(
            target: targets::PRESENTATION,
            frame = id.as_u64(),
            ?reason,
            coalesced = self.frames.coalesced_count(),
            "flushed frame"
        );

        if !self.ready {
            self.ready = true;
            self.signals.ready.emit(());
        }
        Some(layout)
    }

    fn refresh_visibility(&mut self) {
        self.visibility = compute_visibility(&mut self.table, self.current_filter.as_ref(), self.expand);
        self.signals.visibility_changed.emit(self.visibility.clone());
    }
}

fn initial_expand_state(table: &Table, options: &TableOptions) -> ExpandState {
    let Some(expanded) = options.expanded else {
        return ExpandState::NotExpandable;
    };
    if options.minimum_row_count >= table.row_count() {
        otable_warn!(
            minimum_row_count = options.minimum_row_count,
            rows = table.row_count(),
            "table is declared expandable but has too few rows to collapse"
        );
        return ExpandState::NotExpandable;
    }
    if expanded {
        ExpandState::Expanded
    } else {
        ExpandState::Contracted {
            minimum_row_count: options.minimum_row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::config::ResponsiveType;
    use crate::model::ColumnHeader;
    use o_table_core::{Cancelled, Proceed};

    fn numbers(values: &[&str], options: TableOptions) -> OTable {
        let mut table = Table::new(vec![
            ColumnHeader::new("N").with_type("number"),
            ColumnHeader::new("Note").with_sort_disabled(true),
        ]);
        for value in values {
            table.push_row(vec![Cell::from_text(*value), Cell::from_text("-")]);
        }
        OTable::new(table, options)
    }

    #[test]
    fn test_sort_emits_sorting_then_sorted() {
        let mut otable = numbers(&["3", "1", "2"], TableOptions::default());
        let log = Arc::new(Mutex::new(Vec::new()));

        let sorting_log = log.clone();
        otable.signals().sorting.connect(move |request: &SortRequest| {
            sorting_log.lock().push(format!("sorting {}", request.order));
            Ok(Proceed)
        });
        let sorted_log = log.clone();
        otable.signals().sorted.connect(move |request: &SortRequest| {
            sorted_log.lock().push(format!("sorted {}", request.order));
        });

        let outcome = otable.sort_rows_by_column(0, SortOrder::Descending).unwrap();
        assert_eq!(outcome, SortOutcome::Applied);
        assert_eq!(*log.lock(), vec!["sorting descending", "sorted descending"]);
        assert_eq!(
            otable.current_sort(),
            Some(SortRequest { column: 0, order: SortOrder::Descending })
        );
    }

    #[test]
    fn test_sort_errors() {
        let mut otable = numbers(&["1"], TableOptions::default());
        assert!(matches!(
            otable.sort_rows_by_column(5, SortOrder::Ascending),
            Err(Error::MissingHeader { column: 5 })
        ));
        assert!(matches!(
            otable.sort_rows_by_direction(0, "sideways"),
            Err(Error::InvalidSortDirection(_))
        ));
        assert!(matches!(otable.toggle_sort(1), Err(Error::SortDisabled { column: 1 })));

        let mut unsortable = numbers(&["1"], TableOptions { sortable: false, ..TableOptions::default() });
        assert!(matches!(unsortable.toggle_sort(0), Err(Error::NotSortable)));
    }

    #[test]
    fn test_toggle_sort_two_states() {
        let mut otable = numbers(&["2", "1"], TableOptions::default());
        otable.toggle_sort(0).unwrap();
        assert_eq!(otable.table().header(0).unwrap().aria_sort(), "ascending");
        otable.toggle_sort(0).unwrap();
        assert_eq!(otable.table().header(0).unwrap().aria_sort(), "descending");
        otable.toggle_sort(0).unwrap();
        assert_eq!(otable.table().header(0).unwrap().aria_sort(), "ascending");
    }

    #[test]
    fn test_not_expandable() {
        let mut otable = numbers(&["1", "2"], TableOptions::default());
        assert!(!otable.can_expand());
        assert_eq!(otable.aria_expanded(), None);
        assert!(matches!(otable.expand(), Err(Error::NotExpandable)));

        let options = TableOptions {
            expanded: Some(false),
            minimum_row_count: 2,
            ..TableOptions::default()
        };
        let mut small = numbers(&["1", "2"], options);
        assert!(!small.can_expand());
        assert!(matches!(small.contract(), Err(Error::NotExpandable)));
    }

    #[test]
    fn test_toggle_expanded() {
        let options = TableOptions {
            expanded: Some(true),
            minimum_row_count: 1,
            ..TableOptions::default()
        };
        let mut otable = numbers(&["1", "2", "3"], options);
        assert_eq!(otable.aria_expanded(), Some("true"));
        otable.toggle_expanded().unwrap();
        assert_eq!(otable.aria_expanded(), Some("false"));
        assert_eq!(otable.hidden_rows().len(), 2);
        otable.toggle_expanded().unwrap();
        assert!(otable.hidden_rows().is_empty());
    }

    #[test]
    fn test_expand_and_contract_publish_hidden_rows() {
        let options = TableOptions {
            expanded: Some(false),
            minimum_row_count: 1,
            ..TableOptions::default()
        };
        let mut otable = numbers(&["3", "1", "2"], options);
        let hidden = Arc::new(Mutex::new(Vec::new()));
        let hidden_log = hidden.clone();
        otable.signals().visibility_changed.connect(move |visibility: &Visibility| {
            hidden_log.lock().push(visibility.hidden_rows().to_vec());
        });

        otable.expand().unwrap();
        otable.contract().unwrap();
        otable.filter(0, "3").unwrap();

        let ids = otable.table().row_ids();
        assert_eq!(
            *hidden.lock(),
            vec![Vec::new(), vec![ids[1], ids[2]], vec![ids[1], ids[2]]]
        );
        assert_eq!(otable.hidden_rows(), &[ids[1], ids[2]]);
    }

    #[test]
    fn test_frames_coalesce_and_ready_once() {
        let options = TableOptions {
            responsive_type: ResponsiveType::Overflow,
            ..TableOptions::default()
        };
        let mut otable = numbers(&["3", "1", "2"], options);
        let ready = Arc::new(AtomicUsize::new(0));
        let ready_count = ready.clone();
        otable.signals().ready.connect(move |_| {
            ready_count.fetch_add(1, Ordering::SeqCst);
        });

        otable.sort_rows_by_column(0, SortOrder::Ascending).unwrap();
        otable.filter(0, "2").unwrap();
        let layout = otable.flush_frame().unwrap();
        assert!(matches!(layout, Layout::Overflow { expander: None, .. }));
        assert_eq!(layout.visible_row_ids().len(), 1);
        assert!(otable.flush_frame().is_none());

        otable.clear_filter();
        assert!(otable.has_pending_frame());
        assert_eq!(otable.flush_frame().unwrap().visible_row_ids().len(), 3);
        assert_eq!(ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_update_rows_reapplies_sort() {
        let mut otable = numbers(&["3", "1"], TableOptions::default());
        otable.sort_rows_by_column(0, SortOrder::Ascending).unwrap();
        let added = Arc::new(Mutex::new(None));
        let added_id = added.clone();
        otable
            .update_rows(|table| {
                *added_id.lock() = Some(table.push_row(vec![Cell::from_text("0")]));
            })
            .unwrap();
        let added = added.lock().expect("row was added");
        assert_eq!(otable.table().row_ids()[0], added);
    }

    #[test]
    fn test_filter_missing_header() {
        let mut otable = numbers(&["1"], TableOptions::default());
        assert!(matches!(otable.filter(9, "x"), Err(Error::MissingHeader { column: 9 })));
        assert!(matches!(
            otable.filter_json(0, &serde_json::json!({"needle": "x"})),
            Err(Error::InvalidFilter { column: 0, .. })
        ));
        assert!(otable.current_filter().is_none());
    }

    #[test]
    fn test_cancelled_sort_leaves_rows() {
        let mut otable = numbers(&["3", "1", "2"], TableOptions::default());
        let before = otable.table().row_ids();
        otable.signals().sorting.connect(|_| Err(Cancelled));
        let outcome = otable.sort_rows_by_column(0, SortOrder::Ascending).unwrap();
        assert_eq!(outcome, SortOutcome::Cancelled);
        assert_eq!(otable.table().row_ids(), before);
        assert_eq!(otable.current_sort(), None);
        assert_eq!(otable.table().header(0).unwrap().aria_sort(), "none");
    }
}
