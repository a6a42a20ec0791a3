//! List query types

mod order;
mod page;

pub use order::*;
pub use page::*;

use std::collections::HashMap;

/// Query parameter names reserved for paging and sorting.
///
/// Filter keys never use these names; [`ListQuery::filter`] silently drops
/// them so a caller-supplied filter cannot clobber the paging contract.
pub const RESERVED_KEYS: [&str; 4] = ["current", "pageSize", "sortBy", "sortOrder"];

/// A list request: paging window, optional single-key sort, and per-field
/// substring filters.
///
/// Every operation set receives the same query shape. The in-memory source
/// interprets it directly; the remote source encodes it into URL query
/// parameters using the reserved names above.
///
/// # Example
///
/// ```
/// use crudgrid_lib::query::ListQuery;
///
/// let query = ListQuery::new(1, 10)
///     .sort_desc("age")
///     .filter("name", "smith");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u64,
    /// Maximum number of records per page.
    pub page_size: u64,
    /// Field to sort by; no sort is applied when absent.
    pub sort_by: Option<String>,
    /// Sort direction, meaningful only when `sort_by` is set.
    pub direction: Direction,
    /// Per-field case-insensitive substring filters.
    pub filters: HashMap<String, String>,
}

impl ListQuery {
    /// Creates a query for the given page window.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page,
            page_size,
            sort_by: None,
            direction: Direction::Asc,
            filters: HashMap::new(),
        }
    }

    /// Sorts ascending by the given field.
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self.direction = Direction::Asc;
        self
    }

    /// Sorts descending by the given field.
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self.direction = Direction::Desc;
        self
    }

    /// Adds a substring filter on a field.
    ///
    /// Reserved paging/sorting keys and empty filter values are dropped.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        if !RESERVED_KEYS.contains(&field.as_str()) && !value.is_empty() {
            self.filters.insert(field, value);
        }
        self
    }

    /// Returns the slice offset for this page window: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }

    /// Encodes the query as URL query pairs.
    ///
    /// Paging and sorting use the reserved names; filters follow in key
    /// order so the produced URL is deterministic.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("current".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];

        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
            pairs.push(("sortOrder".to_string(), self.direction.as_str().to_string()));
        }

        let mut filters: Vec<_> = self.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in filters {
            pairs.push((key.clone(), value.clone()));
        }

        pairs
    }

    /// Encodes the query as a URL-encoded query string.
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(ListQuery::new(1, 5).offset(), 0);
        assert_eq!(ListQuery::new(3, 5).offset(), 10);
        assert_eq!(ListQuery::new(0, 5).offset(), 0);
    }

    #[test]
    fn test_reserved_filter_keys_dropped() {
        let query = ListQuery::new(1, 10)
            .filter("pageSize", "999")
            .filter("name", "smith")
            .filter("status", "");

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters.get("name").map(String::as_str), Some("smith"));
    }

    #[test]
    fn test_query_string() {
        let query = ListQuery::new(2, 5).sort_desc("age").filter("name", "jane smith");
        assert_eq!(
            query.to_query_string(),
            "current=2&pageSize=5&sortBy=age&sortOrder=desc&name=jane%20smith"
        );
    }

    #[test]
    fn test_query_string_without_sort() {
        let query = ListQuery::new(1, 10);
        assert_eq!(query.to_query_string(), "current=1&pageSize=10");
    }
}
