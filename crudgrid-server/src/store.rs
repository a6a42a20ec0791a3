//! In-memory user collection

use std::sync::Mutex;
use std::sync::MutexGuard;

use crudgrid_lib::model::Record;
use crudgrid_lib::model::Value;

/// The demo server's whole "database": a seeded record vector behind a
/// lock. Nothing survives a restart.
///
/// Identity keys are integers assigned as `max(existing ids) + 1`, the same
/// policy the library's in-memory source uses, so ids stay deterministic
/// across both.
pub struct UserStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    users: Vec<Record>,
    next_id: i64,
}

impl UserStore {
    /// Creates the store with the demo seed record.
    pub fn seeded() -> Self {
        Self::with_users(vec![
            Record::new()
                .set("id", 1)
                .set("name", "Jane Smith 1")
                .set("age", 30)
                .set("createdAt", "2023-01-01")
                .set("status", "active")
                .set("isAdmin", true),
        ])
    }

    /// Creates the store with the given records.
    pub fn with_users(users: Vec<Record>) -> Self {
        let next_id = users
            .iter()
            .filter_map(|u| match u.get("id") {
                Some(Value::Int(n)) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            inner: Mutex::new(StoreInner { users, next_id }),
        }
    }

    /// Returns the full collection.
    pub fn list(&self) -> Vec<Record> {
        self.lock().users.clone()
    }

    /// Returns the user with the given id, if any.
    pub fn find(&self, id: i64) -> Option<Record> {
        self.lock().users.iter().find(|u| has_id(u, id)).cloned()
    }

    /// Creates a user from a partial record and returns it with its id.
    ///
    /// An explicit integer id in the partial is honored and the counter
    /// advances past it; otherwise the next id is assigned.
    pub fn create(&self, mut partial: Record) -> Record {
        let mut inner = self.lock();

        let id = match partial.get("id") {
            Some(Value::Int(n)) => {
                let n = *n;
                inner.next_id = inner.next_id.max(n + 1);
                n
            }
            _ => {
                let n = inner.next_id;
                inner.next_id += 1;
                n
            }
        };

        partial.insert("id", Value::Int(id));
        inner.users.push(partial.clone());
        partial
    }

    /// Merges a partial into the user with the given id and returns the
    /// merged record, or `None` if no such user exists. The id itself is
    /// immutable.
    pub fn update(&self, id: i64, patch: Record) -> Option<Record> {
        let mut inner = self.lock();
        let user = inner.users.iter_mut().find(|u| has_id(u, id))?;
        user.merge(patch);
        user.insert("id", Value::Int(id));
        Some(user.clone())
    }

    /// Removes and returns the user with the given id, if any.
    pub fn remove(&self, id: i64) -> Option<Record> {
        let mut inner = self.lock();
        let index = inner.users.iter().position(|u| has_id(u, id))?;
        Some(inner.users.remove(index))
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn has_id(user: &Record, id: i64) -> bool {
    user.get("id") == Some(&Value::Int(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = UserStore::seeded();

        let created = store.create(Record::new().set("name", "Jane Smith 2"));
        assert_eq!(created.get_long("id").unwrap(), Some(2));

        let created = store.create(Record::new().set("name", "Jane Smith 3"));
        assert_eq!(created.get_long("id").unwrap(), Some(3));
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_update_keeps_id_immutable() {
        let store = UserStore::seeded();

        let updated = store
            .update(1, Record::new().set("id", 42).set("age", 31))
            .unwrap();
        assert_eq!(updated.get_long("id").unwrap(), Some(1));
        assert_eq!(updated.get_long("age").unwrap(), Some(31));
    }

    #[test]
    fn test_remove_returns_deleted_record() {
        let store = UserStore::seeded();

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.get_string("name").unwrap(), Some("Jane Smith 1"));
        assert!(store.remove(1).is_none());
        assert!(store.list().is_empty());
    }
}
