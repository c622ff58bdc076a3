//! Generic data table engine
//!
//! Presents any in-memory slice of rows through a list of
//! [`ColumnDescriptor`]s: sorting, global and per-column filtering, column
//! visibility and pagination. The engine is pure; views render the
//! [`TableView`] it computes and feed user actions back as [`TableEvent`]s.
//!
//! State can be owned by the table or by the caller. In controlled mode the
//! table proposes the next state through a callback and keeps computing
//! from whatever state the caller provides.

use crate::record::Record;
use crate::resource::ResourceKind;
use atelier_core::{AppError, AppResult, CellValue, PAGE_SIZES};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;
type Renderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

// ============================================================================
// Column Descriptor
// ============================================================================

/// How a column takes part in filtering
pub enum ColumnFilter<T> {
    /// Case-insensitive substring match on the displayed value
    Contains,
    /// Case-insensitive equality on the displayed value
    Exact,
    /// Caller-supplied predicate `(row, query) -> matches`
    Custom(Predicate<T>),
    /// Never matched by filters
    Disabled,
}

impl<T> Clone for ColumnFilter<T> {
    fn clone(&self) -> Self {
        match self {
            ColumnFilter::Contains => ColumnFilter::Contains,
            ColumnFilter::Exact => ColumnFilter::Exact,
            ColumnFilter::Custom(f) => ColumnFilter::Custom(Arc::clone(f)),
            ColumnFilter::Disabled => ColumnFilter::Disabled,
        }
    }
}

/// One table column
pub struct ColumnDescriptor<T> {
    /// Stable identifier
    pub key: String,
    /// Header text
    pub header: String,
    /// Whether clicking the header sorts
    pub sortable: bool,
    /// Whether the user may hide the column
    pub hideable: bool,
    /// Filtering behaviour
    pub filter: ColumnFilter<T>,
    accessor: Accessor<T>,
    renderer: Option<Renderer<T>>,
    comparator: Option<Comparator<T>>,
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            sortable: self.sortable,
            hideable: self.hideable,
            filter: self.filter.clone(),
            accessor: Arc::clone(&self.accessor),
            renderer: self.renderer.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish_non_exhaustive()
    }
}

impl<T> ColumnDescriptor<T> {
    /// Create a sortable, filterable column reading cells through `accessor`
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&T) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: true,
            hideable: true,
            filter: ColumnFilter::Contains,
            accessor: Arc::new(accessor),
            renderer: None,
            comparator: None,
        }
    }

    /// Set a custom cell renderer
    pub fn with_renderer(mut self, renderer: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Set a custom sort comparator (ascending order)
    pub fn with_comparator(
        mut self,
        comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Set the filtering behaviour
    pub fn with_filter(mut self, filter: ColumnFilter<T>) -> Self {
        self.filter = filter;
        self
    }

    /// Match filters by equality
    pub fn exact(self) -> Self {
        self.with_filter(ColumnFilter::Exact)
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Typed cell value
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    /// Displayed cell text
    pub fn render(&self, row: &T) -> String {
        match &self.renderer {
            Some(render) => render(row),
            None => self.value(row).display(),
        }
    }

    /// Ascending comparison of two rows
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => self.value(a).compare(&self.value(b)),
        }
    }

    /// Whether the column takes part in filtering
    pub fn is_filterable(&self) -> bool {
        !matches!(self.filter, ColumnFilter::Disabled)
    }

    /// Whether `row` matches an already-lowercased, non-empty query
    pub fn matches(&self, row: &T, query_lower: &str) -> bool {
        match &self.filter {
            ColumnFilter::Contains => self.render(row).to_lowercase().contains(query_lower),
            ColumnFilter::Exact => self.render(row).to_lowercase() == query_lower,
            ColumnFilter::Custom(predicate) => predicate(row, query_lower),
            ColumnFilter::Disabled => false,
        }
    }
}

/// Columns for a resource's generic records, one per listed field
pub fn record_columns(kind: ResourceKind) -> Vec<ColumnDescriptor<Record>> {
    kind.fields()
        .into_iter()
        .filter(|f| f.show_in_list)
        .map(|field| {
            let is_key = field.is_key;
            let header = field.display_label();
            let column = ColumnDescriptor::new(field.name, header, move |r: &Record| {
                field.cell(r.get(field.name))
            });
            if is_key { column.always_visible() } else { column }
        })
        .collect()
}

// ============================================================================
// Table State
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Next sort after clicking `column`: ascending, descending, then none
pub fn cycle_sort(current: Option<&SortState>, column: &str) -> Option<SortState> {
    match current {
        Some(s) if s.column == column => match s.direction {
            SortDirection::Ascending => Some(SortState::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortState::ascending(column)),
    }
}

/// Everything the user can change about a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub sort: Option<SortState>,
    pub global_filter: String,
    pub column_filters: BTreeMap<String, String>,
    pub hidden: BTreeSet<String>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sort: None,
            global_filter: String::new(),
            column_filters: BTreeMap::new(),
            hidden: BTreeSet::new(),
            page_index: 0,
            page_size: PAGE_SIZES[0],
        }
    }
}

impl TableState {
    /// State with a given page size, checked against the selectable sizes
    pub fn with_page_size(page_size: usize) -> AppResult<Self> {
        let mut state = Self::default();
        state.set_page_size(page_size)?;
        Ok(state)
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.contains(column)
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = cycle_sort(self.sort.as_ref(), column);
    }

    pub fn set_global_filter(&mut self, query: impl Into<String>) {
        self.global_filter = query.into();
        self.page_index = 0;
    }

    /// Set one column's filter; a blank value removes it
    pub fn set_column_filter(&mut self, column: impl Into<String>, query: impl Into<String>) {
        let column = column.into();
        let query = query.into();
        if query.trim().is_empty() {
            self.column_filters.remove(&column);
        } else {
            self.column_filters.insert(column, query);
        }
        self.page_index = 0;
    }

    /// Show or hide a column; hiding also drops its column filter
    pub fn set_visible(&mut self, column: &str, visible: bool) {
        if visible {
            self.hidden.remove(column);
        } else {
            self.hidden.insert(column.to_string());
            if self.column_filters.remove(column).is_some() {
                self.page_index = 0;
            }
        }
    }

    pub fn toggle_visibility(&mut self, column: &str) {
        let hidden = self.is_hidden(column);
        self.set_visible(column, hidden);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> AppResult<()> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(AppError::validation(format!(
                "Page size must be one of {:?}",
                PAGE_SIZES
            )));
        }
        self.page_size = page_size;
        self.page_index = 0;
        Ok(())
    }

    /// Apply a navigation action given the current page count
    pub fn navigate(&mut self, action: PageAction, page_count: usize) {
        let last = page_count.saturating_sub(1);
        let current = self.page_index.min(last);
        self.page_index = match action {
            PageAction::First => 0,
            PageAction::Previous => current.saturating_sub(1),
            PageAction::Next => (current + 1).min(last),
            PageAction::Last => last,
            PageAction::Go(index) => index.min(last),
        };
    }

    /// Apply one user event
    pub fn apply(&mut self, event: &TableEvent, page_count: usize) -> AppResult<()> {
        match event {
            TableEvent::ToggleSort(column) => self.toggle_sort(column),
            TableEvent::SetSort(sort) => self.sort = sort.clone(),
            TableEvent::GlobalFilter(query) => self.set_global_filter(query.clone()),
            TableEvent::ColumnFilter { column, query } => {
                self.set_column_filter(column.clone(), query.clone())
            }
            TableEvent::ToggleColumn(column) => self.toggle_visibility(column),
            TableEvent::PageSize(size) => self.set_page_size(*size)?,
            TableEvent::Page(action) => self.navigate(*action, page_count),
        }
        Ok(())
    }
}

/// Page navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    First,
    Previous,
    Next,
    Last,
    /// Jump to a zero-based page index
    Go(usize),
}

/// A user action on the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    ToggleSort(String),
    SetSort(Option<SortState>),
    GlobalFilter(String),
    ColumnFilter { column: String, query: String },
    ToggleColumn(String),
    PageSize(usize),
    Page(PageAction),
}

impl TableEvent {
    fn touches_sort(&self) -> bool {
        matches!(self, TableEvent::ToggleSort(_) | TableEvent::SetSort(_))
    }

    fn touches_filter(&self) -> bool {
        matches!(self, TableEvent::GlobalFilter(_) | TableEvent::ColumnFilter { .. })
    }
}

// ============================================================================
// Computed View
// ============================================================================

/// The rows and columns to render for a given state
#[derive(Debug)]
pub struct TableView<'a, T> {
    /// Visible columns, in declaration order
    pub columns: Vec<&'a ColumnDescriptor<T>>,
    /// Rows of the current page
    pub rows: Vec<&'a T>,
    /// Rows before filtering
    pub total_count: usize,
    /// Rows after filtering
    pub filtered_count: usize,
    /// Effective (clamped) page index
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
}

impl<T> TableView<'_, T> {
    /// Whether the placeholder should be shown
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// One-based range of rows on this page, e.g. `11-20 of 25`
    pub fn range_label(&self) -> String {
        if self.filtered_count == 0 {
            return "0 of 0".to_string();
        }
        let start = self.page_index * self.page_size + 1;
        let end = start + self.rows.len() - 1;
        format!("{}-{} of {}", start, end, self.filtered_count)
    }
}

/// Number of pages needed for `rows` rows; zero rows need zero pages
pub fn page_count(rows: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { rows.div_ceil(page_size) }
}

/// Filter, sort and paginate `rows`
pub fn compute<'a, T>(
    columns: &'a [ColumnDescriptor<T>],
    rows: &'a [T],
    state: &TableState,
) -> TableView<'a, T> {
    let visible: Vec<&ColumnDescriptor<T>> = columns
        .iter()
        .filter(|c| !c.hideable || !state.is_hidden(&c.key))
        .collect();

    let global = state.global_filter.trim().to_lowercase();
    let column_filters: Vec<(&ColumnDescriptor<T>, String)> = state
        .column_filters
        .iter()
        .filter_map(|(key, query)| {
            let column = visible
                .iter()
                .copied()
                .find(|c| &c.key == key && c.is_filterable())?;
            let query = query.trim().to_lowercase();
            (!query.is_empty()).then_some((column, query))
        })
        .collect();

    let mut filtered: Vec<&T> = rows
        .iter()
        .filter(|row| {
            let global_ok = global.is_empty()
                || visible
                    .iter()
                    .any(|c| c.is_filterable() && c.matches(row, &global));
            global_ok && column_filters.iter().all(|(c, q)| c.matches(row, q))
        })
        .collect();

    if let Some(sort) = &state.sort {
        if let Some(column) = columns.iter().find(|c| c.key == sort.column && c.sortable) {
            filtered.sort_by(|a, b| {
                let ord = column.compare(a, b);
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
    }

    let filtered_count = filtered.len();
    let page_size = state.page_size.max(1);
    let pages = page_count(filtered_count, page_size);
    let page_index = state.page_index.min(pages.saturating_sub(1));
    let start = page_index * page_size;
    let rows_on_page = filtered.into_iter().skip(start).take(page_size).collect();

    TableView {
        columns: visible,
        rows: rows_on_page,
        total_count: rows.len(),
        filtered_count,
        page_index,
        page_count: pages,
        page_size,
    }
}

// ============================================================================
// Stateful Table
// ============================================================================

/// Caller-owned parts of the table state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlledState {
    /// `Some` when the caller owns sorting
    pub sort: Option<Option<SortState>>,
    /// `Some` when the caller owns the global filter
    pub global_filter: Option<String>,
}

impl ControlledState {
    /// Internal state with caller-owned parts substituted
    pub fn overlay(&self, internal: &TableState) -> TableState {
        let mut state = internal.clone();
        if let Some(sort) = &self.sort {
            state.sort = sort.clone();
        }
        if let Some(filter) = &self.global_filter {
            state.global_filter = filter.clone();
        }
        state
    }
}

type Listener<A> = Box<dyn FnMut(A) + Send>;

/// A table owning its columns, its internal state and change listeners
pub struct DataTable<T> {
    columns: Vec<ColumnDescriptor<T>>,
    state: TableState,
    controlled: ControlledState,
    on_sort_change: Option<Listener<Option<SortState>>>,
    on_filter_change: Option<Listener<String>>,
    on_visibility_change: Option<Listener<BTreeSet<String>>>,
}

impl<T> DataTable<T> {
    pub fn new(columns: Vec<ColumnDescriptor<T>>) -> Self {
        Self {
            columns,
            state: TableState::default(),
            controlled: ControlledState::default(),
            on_sort_change: None,
            on_filter_change: None,
            on_visibility_change: None,
        }
    }

    pub fn with_state(mut self, state: TableState) -> Self {
        self.state = state;
        self
    }

    /// Hand sorting over to the caller
    pub fn controlled_sort(mut self, sort: Option<SortState>) -> Self {
        self.controlled.sort = Some(sort);
        self
    }

    /// Hand the global filter over to the caller
    pub fn controlled_filter(mut self, filter: impl Into<String>) -> Self {
        self.controlled.global_filter = Some(filter.into());
        self
    }

    pub fn on_sort_change(mut self, f: impl FnMut(Option<SortState>) + Send + 'static) -> Self {
        self.on_sort_change = Some(Box::new(f));
        self
    }

    pub fn on_filter_change(mut self, f: impl FnMut(String) + Send + 'static) -> Self {
        self.on_filter_change = Some(Box::new(f));
        self
    }

    pub fn on_visibility_change(
        mut self,
        f: impl FnMut(BTreeSet<String>) + Send + 'static,
    ) -> Self {
        self.on_visibility_change = Some(Box::new(f));
        self
    }

    /// Update the caller-owned sort after the caller accepted a proposal
    pub fn set_controlled_sort(&mut self, sort: Option<SortState>) {
        if self.controlled.sort.is_some() {
            self.controlled.sort = Some(sort);
        }
    }

    /// Update the caller-owned filter after the caller accepted a proposal
    pub fn set_controlled_filter(&mut self, filter: impl Into<String>) {
        if self.controlled.global_filter.is_some() {
            self.controlled.global_filter = Some(filter.into());
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    /// State the table currently renders from
    pub fn state(&self) -> TableState {
        self.controlled.overlay(&self.state)
    }

    /// Compute the view over `rows`
    pub fn view<'a>(&'a self, rows: &'a [T]) -> TableView<'a, T> {
        compute(&self.columns, rows, &self.state())
    }

    /// Handle a user event
    ///
    /// Listeners are told about sort, filter and visibility changes. Parts
    /// of the state owned by the caller are proposed, not applied.
    pub fn dispatch(&mut self, event: TableEvent, rows: &[T]) -> AppResult<()> {
        if let TableEvent::ToggleColumn(column) = &event {
            if self.columns.iter().any(|c| &c.key == column && !c.hideable) {
                return Err(AppError::validation(format!(
                    "Column '{}' cannot be hidden",
                    column
                )));
            }
        }

        let current = self.state();
        let pages = self.view(rows).page_count;

        let mut next = current.clone();
        next.apply(&event, pages)?;

        if event.touches_sort() && next.sort != current.sort {
            if let Some(listener) = self.on_sort_change.as_mut() {
                listener(next.sort.clone());
            }
            if self.controlled.sort.is_none() {
                self.state.sort = next.sort.clone();
            }
        }

        if event.touches_filter() {
            if next.global_filter != current.global_filter {
                if let Some(listener) = self.on_filter_change.as_mut() {
                    listener(next.global_filter.clone());
                }
                if self.controlled.global_filter.is_none() {
                    self.state.global_filter = next.global_filter.clone();
                }
            }
            self.state.column_filters = next.column_filters.clone();
        }

        if next.hidden != current.hidden {
            if let Some(listener) = self.on_visibility_change.as_mut() {
                listener(next.hidden.clone());
            }
            self.state.hidden = next.hidden;
            self.state.column_filters = next.column_filters;
        }

        self.state.page_size = next.page_size;
        self.state.page_index = next.page_index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        code: String,
        name: String,
        qty: Option<f64>,
    }

    fn row(code: &str, name: &str, qty: Option<f64>) -> Row {
        Row {
            code: code.to_string(),
            name: name.to_string(),
            qty,
        }
    }

    fn columns() -> Vec<ColumnDescriptor<Row>> {
        vec![
            ColumnDescriptor::new("code", "Code", |r: &Row| CellValue::text(r.code.clone())),
            ColumnDescriptor::new("name", "Name", |r: &Row| CellValue::text(r.name.clone())),
            ColumnDescriptor::new("qty", "Qty", |r: &Row| r.qty.into()),
        ]
    }

    fn codes<'a>(view: &TableView<'a, Row>) -> Vec<&'a str> {
        view.rows.iter().map(|r| r.code.as_str()).collect()
    }

    fn many(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| row(&format!("R{:02}", i), "Item", Some(i as f64)))
            .collect()
    }

    #[test]
    fn test_global_filter_is_case_insensitive() {
        let rows = vec![row("A1", "Alpha", None), row("B2", "Beta", None)];
        let cols = columns();
        let mut state = TableState::default();
        state.set_global_filter("alpha");

        let view = compute(&cols, &rows, &state);
        assert_eq!(codes(&view), vec!["A1"]);
        assert_eq!(view.filtered_count, 1);
        assert_eq!(view.total_count, 2);
    }

    #[test]
    fn test_pagination_partitions_rows() {
        let rows = many(25);
        let cols = columns();
        let mut state = TableState::default();

        let view = compute(&cols, &rows, &state);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.range_label(), "1-10 of 25");

        state.navigate(PageAction::Last, view.page_count);
        let view = compute(&cols, &rows, &state);
        assert_eq!(view.page_index, 2);
        assert_eq!(view.rows.len(), 5);
        assert!(!view.has_next());

        let mut seen = Vec::new();
        for page in 0..3 {
            state.navigate(PageAction::Go(page), 3);
            seen.extend(codes(&compute(&cols, &rows, &state)));
        }
        let all: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn test_empty_set_has_no_pages() {
        let rows: Vec<Row> = Vec::new();
        let cols = columns();
        let view = compute(&cols, &rows, &TableState::default());
        assert!(view.is_empty());
        assert_eq!(view.page_count, 0);
        assert_eq!(view.page_index, 0);
        assert_eq!(view.range_label(), "0 of 0");
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let rows = many(12);
        let cols = columns();
        let state = TableState {
            page_index: 9,
            ..TableState::default()
        };
        let view = compute(&cols, &rows, &state);
        assert_eq!(view.page_index, 1);
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn test_filter_and_page_size_reset_page() {
        let mut state = TableState {
            page_index: 2,
            ..TableState::default()
        };
        state.set_global_filter("x");
        assert_eq!(state.page_index, 0);

        state.page_index = 1;
        state.set_page_size(20).unwrap();
        assert_eq!(state.page_index, 0);
        assert!(state.set_page_size(15).is_err());
        assert_eq!(state.page_size, 20);
    }

    #[test]
    fn test_sort_cycle() {
        let mut state = TableState::default();
        state.toggle_sort("name");
        assert_eq!(state.sort, Some(SortState::ascending("name")));
        state.toggle_sort("name");
        assert_eq!(state.sort, Some(SortState::descending("name")));
        state.toggle_sort("name");
        assert_eq!(state.sort, None);

        state.toggle_sort("name");
        state.toggle_sort("code");
        assert_eq!(state.sort, Some(SortState::ascending("code")));
    }

    #[test]
    fn test_sort_is_stable_and_reversible() {
        let rows = vec![
            row("1", "b", Some(2.0)),
            row("2", "a", Some(1.0)),
            row("3", "b", Some(3.0)),
            row("4", "a", None),
        ];
        let cols = columns();

        let mut state = TableState::default();
        state.toggle_sort("name");
        let asc = compute(&cols, &rows, &state);
        assert_eq!(codes(&asc), vec!["2", "4", "1", "3"]);

        state.toggle_sort("name");
        let desc = compute(&cols, &rows, &state);
        assert_eq!(codes(&desc), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_numeric_sort_puts_empty_last() {
        let rows = vec![
            row("a", "x", Some(10.0)),
            row("b", "x", None),
            row("c", "x", Some(2.0)),
        ];
        let cols = columns();
        let mut state = TableState::default();
        state.toggle_sort("qty");
        assert_eq!(codes(&compute(&cols, &rows, &state)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_custom_comparator() {
        let rows = vec![row("a", "short", None), row("b", "much longer", None)];
        let cols = vec![
            ColumnDescriptor::new("code", "Code", |r: &Row| CellValue::text(r.code.clone())),
            ColumnDescriptor::new("name", "Name", |r: &Row| CellValue::text(r.name.clone()))
                .with_comparator(|a: &Row, b: &Row| b.name.len().cmp(&a.name.len())),
        ];
        let state = TableState {
            sort: Some(SortState::ascending("name")),
            ..TableState::default()
        };
        assert_eq!(codes(&compute(&cols, &rows, &state)), vec!["b", "a"]);
    }

    #[test]
    fn test_hidden_columns_are_not_rendered_or_matched() {
        let rows = vec![row("A1", "Alpha", None), row("B2", "Beta", None)];
        let cols = columns();
        let mut state = TableState::default();
        state.set_global_filter("alpha");
        state.set_visible("name", false);

        let view = compute(&cols, &rows, &state);
        assert!(view.columns.iter().all(|c| c.key != "name"));
        assert!(view.is_empty());

        state.toggle_visibility("name");
        let view = compute(&cols, &rows, &state);
        assert_eq!(codes(&view), vec!["A1"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_always_visible_column_stays_rendered() {
        let rows = many(3);
        let cols = vec![
            ColumnDescriptor::new("code", "Code", |r: &Row| CellValue::text(r.code.clone()))
                .always_visible(),
            ColumnDescriptor::new("name", "Name", |r: &Row| CellValue::text(r.name.clone())),
        ];

        let mut state = TableState::default();
        state.set_visible("code", false);
        state.set_visible("name", false);
        let view = compute(&cols, &rows, &state);
        let keys: Vec<&str> = view.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["code"]);

        let mut table = DataTable::new(cols);
        let err = table
            .dispatch(TableEvent::ToggleColumn("code".to_string()), &rows)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(table.state().hidden.is_empty());
    }

    #[test]
    fn test_hiding_a_column_drops_its_filter() {
        let rows = vec![row("A1", "Alpha", None), row("B2", "Beta", None)];
        let mut table = DataTable::new(columns());
        table
            .dispatch(
                TableEvent::ColumnFilter {
                    column: "name".to_string(),
                    query: "alp".to_string(),
                },
                &rows,
            )
            .unwrap();
        assert_eq!(codes(&table.view(&rows)), vec!["A1"]);

        table
            .dispatch(TableEvent::ToggleColumn("name".to_string()), &rows)
            .unwrap();
        assert!(table.state().column_filters.is_empty());
        assert_eq!(codes(&table.view(&rows)), vec!["A1", "B2"]);

        // A filter on a hidden column set directly is not applied either
        let cols = columns();
        let mut state = TableState::default();
        state.set_visible("name", false);
        state.column_filters.insert("name".to_string(), "alp".to_string());
        assert_eq!(compute(&cols, &rows, &state).filtered_count, 2);
    }

    #[test]
    fn test_exact_and_custom_filters() {
        let rows = vec![row("A1", "Alpha", None), row("A10", "Alpha", None)];
        let cols = vec![
            ColumnDescriptor::new("code", "Code", |r: &Row| CellValue::text(r.code.clone())).exact(),
            ColumnDescriptor::new("name", "Name", |r: &Row| CellValue::text(r.name.clone()))
                .with_filter(ColumnFilter::Custom(Arc::new(|r: &Row, q: &str| {
                    r.name.to_lowercase().starts_with(q)
                }))),
        ];

        let mut state = TableState::default();
        state.set_column_filter("code", "a1");
        assert_eq!(codes(&compute(&cols, &rows, &state)), vec!["A1"]);

        state.set_column_filter("code", "");
        state.set_column_filter("name", "alp");
        assert_eq!(codes(&compute(&cols, &rows, &state)).len(), 2);

        state.set_column_filter("name", "pha");
        assert!(compute(&cols, &rows, &state).is_empty());
    }

    #[test]
    fn test_disabled_column_is_ignored_by_global_filter() {
        let rows = vec![row("A1", "Alpha", None)];
        let cols = vec![
            ColumnDescriptor::new("code", "Code", |r: &Row| CellValue::text(r.code.clone())),
            ColumnDescriptor::new("name", "Name", |r: &Row| CellValue::text(r.name.clone()))
                .with_filter(ColumnFilter::Disabled),
        ];
        let mut state = TableState::default();
        state.set_global_filter("alpha");
        assert!(compute(&cols, &rows, &state).is_empty());
    }

    #[test]
    fn test_renderer_drives_display_and_filtering() {
        let rows = vec![row("A1", "Alpha", Some(3.0))];
        let cols = vec![ColumnDescriptor::new("qty", "Qty", |r: &Row| r.qty.into())
            .with_renderer(|r: &Row| format!("{} pcs", r.qty.unwrap_or_default()))];
        let mut state = TableState::default();
        state.set_global_filter("PCS");

        let view = compute(&cols, &rows, &state);
        assert_eq!(view.columns[0].render(view.rows[0]), "3 pcs");
        assert_eq!(view.filtered_count, 1);
    }

    #[test]
    fn test_internal_state_table() {
        let rows = many(25);
        let mut table = DataTable::new(columns());

        table.dispatch(TableEvent::Page(PageAction::Next), &rows).unwrap();
        assert_eq!(table.view(&rows).page_index, 1);

        table
            .dispatch(TableEvent::GlobalFilter("R2".to_string()), &rows)
            .unwrap();
        let view = table.view(&rows);
        assert_eq!(view.page_index, 0);
        assert_eq!(view.filtered_count, 5);
    }

    #[test]
    fn test_controlled_sort_only_proposes() {
        let rows = vec![row("b", "x", None), row("a", "x", None)];
        let proposals = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&proposals);

        let mut table = DataTable::new(columns())
            .controlled_sort(None)
            .on_sort_change(move |sort| sink.lock().unwrap().push(sort));

        table
            .dispatch(TableEvent::ToggleSort("code".to_string()), &rows)
            .unwrap();
        assert_eq!(
            *proposals.lock().unwrap(),
            vec![Some(SortState::ascending("code"))]
        );
        assert_eq!(table.state().sort, None);
        assert_eq!(codes(&table.view(&rows)), vec!["b", "a"]);

        table.set_controlled_sort(Some(SortState::ascending("code")));
        assert_eq!(codes(&table.view(&rows)), vec!["a", "b"]);
    }

    #[test]
    fn test_visibility_listener() {
        let rows = many(3);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let mut table = DataTable::new(columns())
            .on_visibility_change(move |hidden| sink.lock().unwrap().push(hidden.len()));

        table
            .dispatch(TableEvent::ToggleColumn("qty".to_string()), &rows)
            .unwrap();
        table
            .dispatch(TableEvent::ToggleColumn("qty".to_string()), &rows)
            .unwrap();
        assert_eq!(*changes.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_record_columns() {
        let cols = record_columns(ResourceKind::Repair);
        let keys: Vec<&str> = cols.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["code_reparation", "codeMachine", "matricule", "date_reparation", "duree_minutes"]
        );
        assert!(!cols[0].hideable);
        assert_eq!(cols[4].header, "Durée (min)");
    }
}
