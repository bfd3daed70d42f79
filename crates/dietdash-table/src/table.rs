//! The controlled table component: pure rendering plus gesture translation.

use std::fmt;
use std::path::Path;

use crate::export::{self, ExportOutcome};
use crate::{Cell, Column, SortOrder, SortSpec, TableEvent, TableQuery};

/// A generic data table over rows of `T`.
///
/// Holds column definitions and behaviour flags only — never row data, never
/// view state. Rendering is a pure function of the inputs, and every user
/// gesture is translated into a [`TableEvent`] for the caller.
pub struct DataTable<T> {
    columns: Vec<Column<T>>,
    searchable: bool,
    sortable: bool,
    paginated: bool,
    export_stem: String,
}

impl<T> DataTable<T> {
    /// Create a table with search, sort, and pagination enabled.
    #[must_use]
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            searchable: true,
            sortable: true,
            paginated: true,
            export_stem: "export".to_owned(),
        }
    }

    /// File stem for exported files (`<stem>.csv` and friends).
    #[must_use]
    pub fn with_export_stem(mut self, stem: impl Into<String>) -> Self {
        self.export_stem = stem.into();
        self
    }

    /// Disable the search field.
    #[must_use]
    pub fn without_search(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Disable sorting entirely.
    #[must_use]
    pub fn without_sort(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Disable pagination controls.
    #[must_use]
    pub fn without_pagination(mut self) -> Self {
        self.paginated = false;
        self
    }

    /// The column definitions.
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Render the current page slice under the caller's view state.
    ///
    /// Pure: the same inputs always produce the same view. `rows` is the
    /// already-fetched page of data, `total` the full result-set size the
    /// server reported. Zero rows render an empty body.
    #[must_use]
    pub fn view(&self, rows: &[T], total: usize, query: &TableQuery) -> TableView {
        let headers = self.columns.iter().map(|c| c.header().to_owned()).collect();
        let body = rows
            .iter()
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect();
        let page_count = total.div_ceil(query.limit.max(1));

        TableView {
            headers,
            rows: body,
            total,
            page: query.page,
            page_count,
            shows_pagination: self.paginated && page_count > 1,
            shows_search: self.searchable,
            sort: query.sort.clone(),
        }
    }

    /// The search field now holds `text`.
    ///
    /// Emits [`TableEvent::SearchChanged`] carrying exactly the text, or
    /// nothing when search is disabled.
    #[must_use]
    pub fn search_edited(&self, text: &str) -> Option<TableEvent> {
        self.searchable
            .then(|| TableEvent::SearchChanged(text.to_owned()))
    }

    /// The user turned to a (1-based) page.
    #[must_use]
    pub fn page_turned(&self, page: usize) -> Option<TableEvent> {
        self.paginated.then(|| TableEvent::PageChanged(page.max(1)))
    }

    /// The user picked a new page size.
    #[must_use]
    pub fn limit_selected(&self, limit: usize) -> Option<TableEvent> {
        self.paginated
            .then(|| TableEvent::LimitChanged(limit.max(1)))
    }

    /// The user clicked a column header.
    ///
    /// First click sorts ascending; clicking the already-sorted column flips
    /// the direction. Gestures on unknown or unsortable columns emit nothing.
    #[must_use]
    pub fn sort_toggled(&self, key: &str, current: Option<&SortSpec>) -> Option<TableEvent> {
        if !self.sortable {
            return None;
        }
        let column = self.columns.iter().find(|c| c.key() == key)?;
        if !column.is_sortable() {
            return None;
        }
        let order = match current {
            Some(spec) if spec.key == key => spec.order.toggled(),
            _ => SortOrder::Asc,
        };
        Some(TableEvent::SortChanged {
            key: key.to_owned(),
            order,
        })
    }

    /// Run all three exports over the given page slice, into `dir`.
    ///
    /// Each export is independent; one failing does not stop the others.
    pub fn export_page(&self, rows: &[T], dir: &Path) -> Vec<ExportOutcome> {
        export::export_all(&self.columns, rows, dir, &self.export_stem)
    }
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("searchable", &self.searchable)
            .field("sortable", &self.sortable)
            .field("paginated", &self.paginated)
            .field("export_stem", &self.export_stem)
            .finish()
    }
}

/// The pure render product of [`DataTable::view`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Header texts, one per column.
    pub headers: Vec<String>,
    /// Rendered cells for the current page slice, row-major.
    pub rows: Vec<Vec<Cell>>,
    /// Full result-set size as reported by the server.
    pub total: usize,
    /// Current 1-based page.
    pub page: usize,
    /// Number of pages at the current limit.
    pub page_count: usize,
    /// Whether pagination controls render (more than one page).
    pub shows_pagination: bool,
    /// Whether the search field renders.
    pub shows_search: bool,
    /// The sort the view was rendered under.
    pub sort: Option<SortSpec>,
}
