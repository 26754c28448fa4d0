//! Query state and its mutators.

use serde::Deserialize;
use serde::Serialize;

use super::DEFAULT_PAGE_SIZE;
use super::Direction;
use super::Filter;
use super::OrderBy;
use super::last_page;
use crate::error::Error;
use crate::rison;

/// Everything that decides which rows a list call returns.
///
/// Mutators return `true` when the state actually changed, which is the
/// caller's cue to fetch again. Mutators that narrow or widen the result set
/// (filters, page size) move back to the first page.
///
/// Equality ignores filter order: two states with the same filters applied
/// in a different sequence list the same rows.
///
/// # Example
///
/// ```
/// use crudtable_lib::api::query::{Direction, QueryState};
///
/// let mut query = QueryState::default();
/// assert!(query.toggle_order("name"));
/// assert!(query.toggle_order("name"));
/// assert_eq!(query.order().unwrap().direction, Direction::Desc);
///
/// let q = query.to_query_param();
/// assert_eq!(QueryState::from_query_param(&q).unwrap(), query);
/// ```
#[derive(Debug, Clone)]
pub struct QueryState {
    filters: Vec<Filter>,
    order: Option<OrderBy>,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PartialEq for QueryState {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.page == other.page
            && self.page_size == other.page_size
            && self.sorted_filters() == other.sorted_filters()
    }
}

impl Eq for QueryState {}

impl QueryState {
    /// Creates a default query with the given page size.
    ///
    /// A zero page size falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            ..Default::default()
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active filters, in the order they were added.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the active filter on a column, if any.
    pub fn filter(&self, col: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.col == col)
    }

    /// Returns `true` if a filter is active on the column.
    pub fn has_filter(&self, col: &str) -> bool {
        self.filter(col).is_some()
    }

    /// The active sort, if any.
    pub fn order(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    /// Returns the sort direction if `col` is the active sort column.
    pub fn direction_of(&self, col: &str) -> Option<Direction> {
        self.order
            .as_ref()
            .filter(|o| o.column == col)
            .map(|o| o.direction)
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page, always greater than zero.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn sorted_filters(&self) -> Vec<&Filter> {
        let mut filters: Vec<&Filter> = self.filters.iter().collect();
        filters.sort();
        filters
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Sorts by `col`: ascending on a new column, flipped on the active one.
    pub fn toggle_order(&mut self, col: &str) -> bool {
        match &mut self.order {
            Some(order) if order.column == col => {
                order.direction = order.direction.flipped();
            }
            _ => self.order = Some(OrderBy::asc(col)),
        }
        true
    }

    /// Moves to page `page`, clamped into `[0, last_page(count, page_size)]`.
    ///
    /// Takes a signed index so "previous" on the first page can be passed
    /// through as `-1`. Returns `false` when the clamped page is the current
    /// one.
    pub fn change_page(&mut self, page: i64, count: usize) -> bool {
        let last = last_page(count, self.page_size);
        let clamped = page.clamp(0, last as i64) as usize;
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        true
    }

    /// Sets the page size and returns to the first page.
    ///
    /// A zero size is ignored.
    pub fn change_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            return false;
        }
        let changed = page_size != self.page_size || self.page != 0;
        self.page_size = page_size;
        self.page = 0;
        changed
    }

    /// Adds a filter on a column that has none yet and returns to the first
    /// page.
    ///
    /// One active filter per column: adding to an already filtered column is
    /// a no-op.
    pub fn add_filter(&mut self, col: &str, opr: &str, value: &str) -> bool {
        if self.has_filter(col) {
            return false;
        }
        self.filters.push(Filter::new(col, opr, value));
        self.page = 0;
        true
    }

    /// Removes the filter on a column and returns to the first page.
    ///
    /// Removing a filter that is not active is a no-op.
    pub fn remove_filter(&mut self, col: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.col != col);
        if self.filters.len() == before {
            return false;
        }
        self.page = 0;
        true
    }

    /// Edits the value of an active filter in place. The page is kept.
    pub fn change_filter_value(&mut self, col: &str, value: &str) -> bool {
        match self.filters.iter_mut().find(|f| f.col == col) {
            Some(filter) if filter.value != value => {
                filter.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Edits the operator of an active filter in place. The page is kept.
    pub fn change_filter_operator(&mut self, col: &str, opr: &str) -> bool {
        match self.filters.iter_mut().find(|f| f.col == col) {
            Some(filter) if filter.opr != opr => {
                filter.opr = opr.to_string();
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Wire encoding
    // =========================================================================

    /// Encodes the query as the rison value of the `q` parameter.
    ///
    /// ```text
    /// (filters:!((col:name,opr:sw,value:Ad)),order_column:name,order_direction:asc,page:0,page_size:20)
    /// ```
    pub fn to_query_param(&self) -> String {
        let wire = WireQuery {
            filters: self.filters.clone(),
            order_column: self.order.as_ref().map(|o| o.column.clone()),
            order_direction: self.order.as_ref().map(|o| o.direction),
            page: self.page,
            page_size: self.page_size,
        };
        // WireQuery only holds strings, integers and enums.
        rison::encode(&wire).unwrap_or_default()
    }

    /// Decodes a `q` parameter produced by [`to_query_param`](Self::to_query_param).
    pub fn from_query_param(q: &str) -> Result<Self, Error> {
        let wire: WireQuery = rison::decode(q)?;
        if wire.page_size == 0 {
            return Err(Error::decode("page_size must be greater than zero", 0));
        }
        let order = match (wire.order_column, wire.order_direction) {
            (Some(column), direction) => Some(OrderBy {
                column,
                direction: direction.unwrap_or(Direction::Asc),
            }),
            (None, _) => None,
        };
        Ok(Self {
            filters: wire.filters,
            order,
            page: wire.page,
            page_size: wire.page_size,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_direction: Option<Direction>,
    #[serde(default)]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryState {
        let mut query = QueryState::default();
        query.add_filter("name", "sw", "Ad");
        query.add_filter("notes", "ct", "it's a 'quote' (really)!");
        query.toggle_order("birthday");
        query.toggle_order("birthday");
        query.change_page(3, 500);
        query
    }

    #[test]
    fn test_defaults() {
        let query = QueryState::default();
        assert_eq!(query.page(), 0);
        assert_eq!(query.page_size(), 20);
        assert!(query.order().is_none());
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_toggle_order_cycle() {
        let mut query = QueryState::default();
        query.toggle_order("name");
        assert_eq!(query.direction_of("name"), Some(Direction::Asc));
        query.toggle_order("name");
        assert_eq!(query.direction_of("name"), Some(Direction::Desc));
        query.toggle_order("name");
        assert_eq!(query.direction_of("name"), Some(Direction::Asc));

        query.toggle_order("age");
        assert_eq!(query.direction_of("age"), Some(Direction::Asc));
        assert_eq!(query.direction_of("name"), None);
    }

    #[test]
    fn test_change_page_clamps() {
        let mut query = QueryState::default();
        assert!(query.change_page(5, 95));
        assert_eq!(query.page(), 4);
        assert!(!query.change_page(9, 95));
        assert!(query.change_page(-1, 95));
        assert_eq!(query.page(), 0);
        assert!(!query.change_page(-1, 95));
    }

    #[test]
    fn test_change_page_with_no_rows() {
        let mut query = QueryState::default();
        assert!(!query.change_page(1, 0));
        assert_eq!(query.page(), 0);
    }

    #[test]
    fn test_change_page_size_resets_page() {
        let mut query = QueryState::default();
        query.change_page(3, 200);
        assert!(query.change_page_size(50));
        assert_eq!(query.page(), 0);
        assert_eq!(query.page_size(), 50);
        assert!(!query.change_page_size(50));
        assert!(!query.change_page_size(0));
        assert_eq!(query.page_size(), 50);
    }

    #[test]
    fn test_add_filter_once_per_column() {
        let mut query = QueryState::default();
        query.change_page(2, 100);
        assert!(query.add_filter("name", "sw", "A"));
        assert_eq!(query.page(), 0);
        assert!(!query.add_filter("name", "eq", "B"));
        assert_eq!(query.filters(), &[Filter::new("name", "sw", "A")]);
    }

    #[test]
    fn test_remove_unknown_filter_is_noop() {
        let mut query = QueryState::default();
        query.add_filter("name", "sw", "A");
        query.change_page(2, 100);
        let before = query.clone();
        assert!(!query.remove_filter("age"));
        assert_eq!(query, before);
        assert_eq!(query.page(), 2);

        assert!(query.remove_filter("name"));
        assert_eq!(query.page(), 0);
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_change_filter_value_keeps_page() {
        let mut query = QueryState::default();
        query.add_filter("name", "sw", "A");
        query.change_page(2, 100);
        assert!(query.change_filter_value("name", "Ad"));
        assert_eq!(query.page(), 2);
        assert_eq!(query.filter("name").unwrap().value, "Ad");
        assert!(!query.change_filter_value("name", "Ad"));
        assert!(!query.change_filter_value("age", "3"));
        assert!(query.change_filter_operator("name", "eq"));
        assert_eq!(query.filter("name").unwrap().opr, "eq");
    }

    #[test]
    fn test_equality_ignores_filter_order() {
        let mut a = QueryState::default();
        a.add_filter("name", "sw", "A");
        a.add_filter("age", "gt", "3");
        let mut b = QueryState::default();
        b.add_filter("age", "gt", "3");
        b.add_filter("name", "sw", "A");
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_param_format() {
        let mut query = QueryState::default();
        query.add_filter("name", "sw", "Ad");
        query.toggle_order("name");
        assert_eq!(
            query.to_query_param(),
            "(filters:!((col:name,opr:sw,value:Ad)),order_column:name,order_direction:asc,page:0,page_size:20)"
        );
        assert_eq!(QueryState::default().to_query_param(), "(page:0,page_size:20)");
    }

    #[test]
    fn test_query_param_roundtrip() {
        let query = sample();
        let decoded = QueryState::from_query_param(&query.to_query_param()).unwrap();
        assert_eq!(decoded, query);
        assert_eq!(decoded.filters(), query.filters());

        let plain = QueryState::with_page_size(50);
        assert_eq!(QueryState::from_query_param(&plain.to_query_param()).unwrap(), plain);
    }

    #[test]
    fn test_from_query_param_rejects_zero_page_size() {
        assert!(QueryState::from_query_param("(page:0,page_size:0)").is_err());
        assert!(QueryState::from_query_param("(page:0").is_err());
    }
}
