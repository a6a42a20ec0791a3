//! The CRUD controller

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::error::Error;
use crate::model::Record;
use crate::model::Value;
use crate::query::ListQuery;
use crate::source::OperationKind;
use crate::source::Operations;
use crate::source::SourceConfig;

// =============================================================================
// Collection state
// =============================================================================

/// The client-visible state of the controlled collection.
///
/// `items` holds at most one page of records when paging is server-driven,
/// and `total` counts the whole (filtered) collection, so
/// `total >= items.len()` always holds.
#[derive(Debug, Clone)]
pub struct CollectionState {
    /// The current page of records, in source order.
    pub items: Vec<Record>,
    /// Post-filter, pre-pagination record count.
    pub total: u64,
    /// 1-based page number the next refresh will request.
    pub current_page: u64,
    /// Page window size.
    pub page_size: u64,
    /// Whether an operation is in flight.
    pub loading: bool,
    /// Message of the most recent failure, cleared when a refresh starts.
    pub last_error: Option<String>,
}

impl CollectionState {
    fn new(page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current_page: 1,
            page_size,
            loading: false,
            last_error: None,
        }
    }
}

// =============================================================================
// Event sink
// =============================================================================

/// A successful controller operation, carrying its result.
#[derive(Debug, Clone)]
pub enum CrudEvent {
    /// A refresh completed.
    Fetched {
        /// The new collection total.
        total: u64,
    },
    /// A record was created.
    Created(Record),
    /// A record was updated.
    Updated(Record),
    /// The record with this identity key was deleted.
    Deleted(Value),
}

impl CrudEvent {
    /// Returns the operation that produced this event.
    pub fn kind(&self) -> OperationKind {
        match self {
            CrudEvent::Fetched { .. } => OperationKind::Fetch,
            CrudEvent::Created(_) => OperationKind::Create,
            CrudEvent::Updated(_) => OperationKind::Update,
            CrudEvent::Deleted(_) => OperationKind::Delete,
        }
    }
}

/// Receives operation outcomes, decoupling the controller from any UI
/// notification mechanism (toasts, status bars, logs).
///
/// Both methods default to no-ops so sinks implement only what they need.
pub trait EventSink: Send + Sync {
    /// Called after an operation succeeds.
    fn on_success(&self, event: &CrudEvent) {
        let _ = event;
    }

    /// Called after an operation fails, with its stringified error.
    fn on_error(&self, kind: OperationKind, message: &str) {
        let _ = (kind, message);
    }
}

// =============================================================================
// Controller
// =============================================================================

/// The data hook: a stateful mediator between a declaratively configured
/// data source and a uniform CRUD action surface.
///
/// The controller is cheap to clone (uses `Arc` internally) so presentation
/// code can hold it wherever actions are wired up. Failures never propagate:
/// each operation stringifies its error into [`CollectionState::last_error`]
/// and the [`EventSink`], then resolves to a sentinel (`None`/`false`), so
/// callers check return values instead of catching errors.
///
/// Overlapping calls are not serialized: two racing refreshes resolve in
/// whatever order the source answers, and the last one to complete wins the
/// state.
///
/// # Example
///
/// ```ignore
/// use crudgrid_lib::controller::CrudController;
/// use crudgrid_lib::model::Record;
/// use crudgrid_lib::source::SourceConfig;
///
/// let controller = CrudController::builder(
///     "id",
///     SourceConfig::static_records(vec![Record::new().set("id", 1)]),
/// )
/// .page_size(5)
/// .optimistic()
/// .build()?;
///
/// controller.refresh().await;
/// let created = controller.create(Record::new().set("name", "Jane")).await;
/// ```
#[derive(Clone)]
pub struct CrudController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    key_field: String,
    operations: Arc<dyn Operations>,
    optimistic: bool,
    sink: Option<Arc<dyn EventSink>>,
    state: Mutex<CollectionState>,
}

impl CrudController {
    /// Creates a builder for a controller keyed by `key_field` over the
    /// given source.
    pub fn builder(key_field: impl Into<String>, source: SourceConfig) -> CrudControllerBuilder {
        CrudControllerBuilder {
            key_field: key_field.into(),
            source,
            page_size: 10,
            optimistic: false,
            sink: None,
        }
    }

    /// Returns the identity-key field name.
    pub fn key_field(&self) -> &str {
        &self.inner.key_field
    }

    /// Returns a snapshot of the collection state.
    pub fn state(&self) -> CollectionState {
        self.lock_state().clone()
    }

    /// Sets the page the next refresh will request.
    pub fn set_page(&self, page: u64) {
        self.lock_state().current_page = page.max(1);
    }

    /// Sets the page size and resets to the first page.
    pub fn set_page_size(&self, size: u64) {
        let mut state = self.lock_state();
        state.page_size = size.max(1);
        state.current_page = 1;
    }

    /// Reloads the current page from the source.
    ///
    /// On success the page replaces `items`/`total` and clears
    /// `last_error`; on failure the previous items stay visible
    /// (stale-but-valid) and only the error message changes.
    pub async fn refresh(&self) {
        let query = {
            let mut state = self.lock_state();
            state.loading = true;
            state.last_error = None;
            ListQuery::new(state.current_page, state.page_size)
        };

        match self.inner.operations.list(&query).await {
            Ok(page) => {
                let total = page.total();
                {
                    let mut state = self.lock_state();
                    state.total = total;
                    state.items = page.into_records();
                    state.loading = false;
                }
                self.notify_success(&CrudEvent::Fetched { total });
            }
            Err(err) => self.record_failure(OperationKind::Fetch, &err),
        }
    }

    /// Creates a record from a partial.
    ///
    /// Optimistic mode appends the created record locally; otherwise the
    /// whole page is refreshed. Returns `None` on failure.
    pub async fn create(&self, partial: Record) -> Option<Record> {
        self.begin();

        match self.inner.operations.create(partial).await {
            Ok(record) => {
                if self.inner.optimistic {
                    let mut state = self.lock_state();
                    state.items.push(record.clone());
                    state.total += 1;
                    state.loading = false;
                } else {
                    self.refresh().await;
                }
                self.notify_success(&CrudEvent::Created(record.clone()));
                Some(record)
            }
            Err(err) => {
                self.record_failure(OperationKind::Create, &err);
                None
            }
        }
    }

    /// Patches the record with the given identity key.
    ///
    /// Optimistic mode merges the result into the matching local record;
    /// otherwise the whole page is refreshed. Returns `None` on failure.
    pub async fn update(&self, key: &Value, patch: Record) -> Option<Record> {
        self.begin();

        match self.inner.operations.update(key, patch).await {
            Ok(record) => {
                if self.inner.optimistic {
                    let mut state = self.lock_state();
                    if let Some(item) = state
                        .items
                        .iter_mut()
                        .find(|r| r.get(&self.inner.key_field) == Some(key))
                    {
                        item.merge(record.clone());
                    }
                    state.loading = false;
                } else {
                    self.refresh().await;
                }
                self.notify_success(&CrudEvent::Updated(record.clone()));
                Some(record)
            }
            Err(err) => {
                self.record_failure(OperationKind::Update, &err);
                None
            }
        }
    }

    /// Deletes the record with the given identity key.
    ///
    /// Optimistic mode removes the matching local record; otherwise the
    /// whole page is refreshed. Returns `false` on failure.
    pub async fn delete(&self, key: &Value) -> bool {
        self.begin();

        match self.inner.operations.delete(key).await {
            Ok(()) => {
                if self.inner.optimistic {
                    let mut state = self.lock_state();
                    state
                        .items
                        .retain(|r| r.get(&self.inner.key_field) != Some(key));
                    state.total = state.total.saturating_sub(1);
                    state.loading = false;
                } else {
                    self.refresh().await;
                }
                self.notify_success(&CrudEvent::Deleted(key.clone()));
                true
            }
            Err(err) => {
                self.record_failure(OperationKind::Delete, &err);
                false
            }
        }
    }

    /// Deletes every record in a selection, sequentially.
    ///
    /// Returns the number of successful deletions; failures are reported
    /// per record through the usual failure path.
    pub async fn bulk_delete(&self, keys: &[Value]) -> usize {
        let mut deleted = 0;
        for key in keys {
            if self.delete(key).await {
                deleted += 1;
            }
        }
        deleted
    }

    fn lock_state(&self) -> MutexGuard<'_, CollectionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) {
        self.lock_state().loading = true;
    }

    fn record_failure(&self, kind: OperationKind, err: &Error) {
        let message = err.to_string();
        {
            let mut state = self.lock_state();
            state.loading = false;
            state.last_error = Some(message.clone());
        }
        if let Some(sink) = &self.inner.sink {
            sink.on_error(kind, &message);
        }
    }

    fn notify_success(&self, event: &CrudEvent) {
        if let Some(sink) = &self.inner.sink {
            sink.on_success(event);
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for a [`CrudController`].
pub struct CrudControllerBuilder {
    key_field: String,
    source: SourceConfig,
    page_size: u64,
    optimistic: bool,
    sink: Option<Arc<dyn EventSink>>,
}

impl CrudControllerBuilder {
    /// Sets the page size (default 10).
    pub fn page_size(mut self, size: u64) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Applies mutations to local state directly instead of refreshing
    /// after every create/update/delete.
    pub fn optimistic(mut self) -> Self {
        self.optimistic = true;
        self
    }

    /// Sets the event sink notified of operation outcomes.
    pub fn event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Resolves the source and builds the controller.
    pub fn build(self) -> Result<CrudController, Error> {
        let operations = self.source.resolve(&self.key_field)?;

        Ok(CrudController {
            inner: Arc::new(ControllerInner {
                key_field: self.key_field,
                operations,
                optimistic: self.optimistic,
                sink: self.sink,
                state: Mutex::new(CollectionState::new(self.page_size)),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CrudController {
        CrudController::builder("id", SourceConfig::static_records(Vec::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let state = controller().state();
        assert_eq!(state.page_size, 10);
        assert_eq!(state.current_page, 1);
        assert!(!state.loading);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let controller = controller();
        controller.set_page(4);
        assert_eq!(controller.state().current_page, 4);

        controller.set_page_size(25);
        let state = controller.state();
        assert_eq!(state.page_size, 25);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_page_floor() {
        let controller = controller();
        controller.set_page(0);
        assert_eq!(controller.state().current_page, 1);
    }
}
