//! Page type for list results.

use crate::model::Record;

/// One page of list results.
///
/// `total` counts every record that matched the query's filters, before the
/// paging window was applied, so callers can derive the page count without a
/// second request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    total: u64,
}

impl Page {
    /// Creates a new page.
    pub fn new(records: Vec<Record>, total: u64) -> Self {
        Self { records, total }
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the post-filter, pre-pagination total.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
