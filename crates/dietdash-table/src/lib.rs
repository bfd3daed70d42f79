//! Generic controlled data-table model for `DietDash`.
//!
//! The table never owns row data or view state. The caller owns a
//! [`TableQuery`] (page, limit, search, sort), fetches the matching page of
//! rows itself, and asks the table for a pure [`table::TableView`] of that
//! slice. User gestures come back as [`TableEvent`]s for the caller to fold
//! into its query — the controlled-component contract.
//!
//! # Example
//!
//! ```rust
//! use dietdash_table::{Column, DataTable, TableQuery};
//!
//! struct Row { name: String, calories: f64 }
//!
//! let table = DataTable::new(vec![
//!     Column::new("name", "Name", |r: &Row| r.name.as_str().into()),
//!     Column::new("calories", "Calories", |r: &Row| r.calories.into()),
//! ]);
//!
//! let rows = vec![Row { name: "Oats".into(), calories: 250.0 }];
//! let query = TableQuery::default();
//! let view = table.view(&rows, 1, &query);
//! assert_eq!(view.rows.len(), 1);
//! assert!(!view.shows_pagination);
//! ```

mod table;

pub mod export;

pub use export::{ExportError, ExportFormat, ExportOutcome};
pub use table::{DataTable, TableView};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default rows per page, matching the dashboard pages.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// A typed cell value produced by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

/// A column definition: key, header text, and a row accessor.
pub struct Column<T> {
    key: String,
    header: String,
    accessor: Box<dyn Fn(&T) -> Cell + Send + Sync>,
    sortable: bool,
}

impl<T> Column<T> {
    /// Create a sortable column.
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&T) -> Cell + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            accessor: Box::new(accessor),
            sortable: true,
        }
    }

    /// Mark the column as not sortable (e.g. an actions column).
    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Stable key used for sort requests and server-side ordering.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Header text.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Whether sort gestures on this column produce events.
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Render the cell for one row.
    #[must_use]
    pub fn cell(&self, row: &T) -> Cell {
        (self.accessor)(row)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// The wire value (`asc` / `desc`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active sort: column key plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub order: SortOrder,
}

/// Caller-owned table view state: current page, page size, search term, and
/// sort. The table only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
    /// Search term (empty means unfiltered).
    pub search: String,
    /// Active sort, if any.
    pub sort: Option<SortSpec>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: String::new(),
            sort: None,
        }
    }
}

impl TableQuery {
    /// A query for `page` 1 with the given page size.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Request parameters in the shape the REST endpoints expect:
    /// `page`, `limit`, `search`, and `sortBy`/`order` when a sort is active.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_owned(), self.page.to_string()),
            ("limit".to_owned(), self.limit.to_string()),
            ("search".to_owned(), self.search.clone()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy".to_owned(), sort.key.clone()));
            pairs.push(("order".to_owned(), sort.order.as_str().to_owned()));
        }
        pairs
    }

    /// Fold a table event into this query.
    ///
    /// Limit and search changes reset the page to 1, which is the caller's
    /// job in the controlled-component contract — the table itself never
    /// touches state.
    pub fn apply(&mut self, event: TableEvent) {
        match event {
            TableEvent::PageChanged(page) => self.page = page.max(1),
            TableEvent::LimitChanged(limit) => {
                self.limit = limit.max(1);
                self.page = 1;
            }
            TableEvent::SearchChanged(search) => {
                self.search = search;
                self.page = 1;
            }
            TableEvent::SortChanged { key, order } => {
                self.sort = Some(SortSpec { key, order });
            }
        }
    }
}

/// A state change requested by a user gesture, emitted by the table for the
/// caller to fold into its [`TableQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// Turn to a 1-based page.
    PageChanged(usize),
    /// Change the page size.
    LimitChanged(usize),
    /// The search field now holds exactly this text.
    SearchChanged(String),
    /// Sort by a column in a direction.
    SortChanged { key: String, order: SortOrder },
}
