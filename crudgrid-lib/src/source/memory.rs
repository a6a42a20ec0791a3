//! In-memory operation set

use std::sync::Mutex;

use async_trait::async_trait;

use super::Operations;
use crate::error::Error;
use crate::model::Record;
use crate::model::Value;
use crate::query::Direction;
use crate::query::ListQuery;
use crate::query::Page;

/// A zero-persistence operation set backed by an ordered record vector.
///
/// This is the simplest source: records live in process memory in encounter
/// order and are lost when the process exits. Identity keys are integers
/// assigned as `max(existing keys) + 1` on create. The lock guards single
/// operations only; interleaving of whole operations from concurrent callers
/// is not coordinated, matching the single-threaded cooperative access the
/// collection model assumes.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::Record;
/// use crudgrid_lib::source::MemorySource;
///
/// let source = MemorySource::with_records(
///     "id",
///     vec![Record::new().set("id", 1).set("name", "Jane Smith")],
/// );
/// ```
pub struct MemorySource {
    key_field: String,
    inner: Mutex<MemoryInner>,
}

struct MemoryInner {
    records: Vec<Record>,
    next_key: i64,
}

impl MemorySource {
    /// Creates an empty source keyed by the given field.
    pub fn new(key_field: impl Into<String>) -> Self {
        Self::with_records(key_field, Vec::new())
    }

    /// Creates a source seeded with records.
    ///
    /// The key counter starts past the largest integer key already present.
    pub fn with_records(key_field: impl Into<String>, records: Vec<Record>) -> Self {
        let key_field = key_field.into();
        let next_key = records
            .iter()
            .filter_map(|r| match r.get(&key_field) {
                Some(Value::Int(n)) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            key_field,
            inner: Mutex::new(MemoryInner { records, next_key }),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Operations for MemorySource {
    async fn list(&self, query: &ListQuery) -> Result<Page, Error> {
        let mut matched: Vec<Record> = {
            let inner = self.lock();
            inner
                .records
                .iter()
                .filter(|record| {
                    query.filters.iter().all(|(field, needle)| {
                        record.get(field).is_some_and(|v| v.matches_ci(needle))
                    })
                })
                .cloned()
                .collect()
        };

        // Stable sort: records comparing equal keep encounter order.
        if let Some(sort_by) = &query.sort_by {
            matched.sort_by(|a, b| {
                let av = a.get(sort_by).unwrap_or(&Value::Null);
                let bv = b.get(sort_by).unwrap_or(&Value::Null);
                match query.direction {
                    Direction::Asc => av.sort_cmp(bv),
                    Direction::Desc => bv.sort_cmp(av),
                }
            });
        }

        let total = matched.len() as u64;
        let records: Vec<Record> = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();

        Ok(Page::new(records, total))
    }

    async fn create(&self, mut record: Record) -> Result<Record, Error> {
        let mut inner = self.lock();

        let key = match record.get(&self.key_field) {
            Some(Value::Int(n)) => {
                let n = *n;
                inner.next_key = inner.next_key.max(n + 1);
                n
            }
            _ => {
                let n = inner.next_key;
                inner.next_key += 1;
                n
            }
        };

        record.insert(self.key_field.as_str(), Value::Int(key));
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, key: &Value, mut patch: Record) -> Result<Record, Error> {
        // The identity key is immutable post-creation.
        patch.remove(&self.key_field);

        let mut inner = self.lock();
        let key_field = self.key_field.as_str();
        match inner
            .records
            .iter_mut()
            .find(|r| r.get(key_field) == Some(key))
        {
            Some(existing) => {
                existing.merge(patch);
                Ok(existing.clone())
            }
            None => Err(Error::not_found(key)),
        }
    }

    async fn delete(&self, key: &Value) -> Result<(), Error> {
        let mut inner = self.lock();
        match inner
            .records
            .iter()
            .position(|r| r.get(&self.key_field) == Some(key))
        {
            Some(index) => {
                inner.records.remove(index);
                Ok(())
            }
            None => Err(Error::not_found(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemorySource {
        let records = (1..=12)
            .map(|n| {
                Record::new()
                    .set("id", n)
                    .set("name", format!("Jane Smith {}", n))
                    .set("age", 20 + n)
            })
            .collect();
        MemorySource::with_records("id", records)
    }

    #[tokio::test]
    async fn test_pagination() {
        let source = seeded();

        let page = source.list(&ListQuery::new(1, 5)).await.unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total(), 12);
        assert_eq!(page.records()[0].get_long("id").unwrap(), Some(1));
        assert_eq!(page.records()[4].get_long("id").unwrap(), Some(5));

        let page = source.list(&ListQuery::new(3, 5)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.total(), 12);
    }

    #[tokio::test]
    async fn test_filter_case_insensitive() {
        let source = seeded();

        let page = source
            .list(&ListQuery::new(1, 10).filter("name", "smith 3"))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.total(), 1);
        assert_eq!(
            page.records()[0].get_string("name").unwrap(),
            Some("Jane Smith 3")
        );
    }

    #[tokio::test]
    async fn test_filter_total_is_pre_pagination() {
        let source = seeded();

        let page = source
            .list(&ListQuery::new(1, 5).filter("name", "jane"))
            .await
            .unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total(), 12);
    }

    #[tokio::test]
    async fn test_sort_desc() {
        let source = seeded();

        let page = source
            .list(&ListQuery::new(1, 3).sort_desc("age"))
            .await
            .unwrap();
        let ages: Vec<i64> = page
            .records()
            .iter()
            .map(|r| r.get_long("age").unwrap().unwrap())
            .collect();
        assert_eq!(ages, vec![32, 31, 30]);
    }

    #[tokio::test]
    async fn test_sort_ties_keep_encounter_order() {
        let records = vec![
            Record::new().set("id", 1).set("group", "b"),
            Record::new().set("id", 2).set("group", "a"),
            Record::new().set("id", 3).set("group", "b"),
        ];
        let source = MemorySource::with_records("id", records);

        let page = source
            .list(&ListQuery::new(1, 10).sort_asc("group"))
            .await
            .unwrap();
        let ids: Vec<i64> = page
            .records()
            .iter()
            .map(|r| r.get_long("id").unwrap().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_create_assigns_max_plus_one() {
        let source = seeded();

        let created = source
            .create(Record::new().set("name", "New User"))
            .await
            .unwrap();
        assert_eq!(created.get_long("id").unwrap(), Some(13));

        let next = source.create(Record::new().set("name", "Another")).await.unwrap();
        assert_eq!(next.get_long("id").unwrap(), Some(14));
    }

    #[tokio::test]
    async fn test_create_with_explicit_key_advances_counter() {
        let source = MemorySource::new("id");

        let first = source
            .create(Record::new().set("id", 40).set("name", "Seeded"))
            .await
            .unwrap();
        assert_eq!(first.get_long("id").unwrap(), Some(40));

        let second = source.create(Record::new().set("name", "Next")).await.unwrap();
        assert_eq!(second.get_long("id").unwrap(), Some(41));
    }

    #[tokio::test]
    async fn test_update_miss_is_not_found() {
        let source = seeded();

        let err = source
            .update(&Value::Int(999), Record::new().set("name", "Ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.len(), 12);
    }

    #[tokio::test]
    async fn test_update_cannot_change_identity_key() {
        let source = seeded();

        let updated = source
            .update(&Value::Int(3), Record::new().set("id", 99).set("age", 50))
            .await
            .unwrap();
        assert_eq!(updated.get_long("id").unwrap(), Some(3));
        assert_eq!(updated.get_long("age").unwrap(), Some(50));
    }

    #[tokio::test]
    async fn test_delete_then_miss() {
        let source = seeded();

        source.delete(&Value::Int(5)).await.unwrap();
        assert_eq!(source.len(), 11);

        let err = source.delete(&Value::Int(5)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
