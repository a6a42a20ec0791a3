//! Operation-set sources
//!
//! An operation set is the four-capability surface (`list`, `create`,
//! `update`, `delete`) the controller drives. Exactly one concrete source
//! provides it: a static in-memory collection, a remote HTTP API, or
//! operations supplied directly by the caller. The source is chosen through
//! [`SourceConfig`] and resolved once at controller construction.

mod api;
mod memory;

pub use api::*;
pub use memory::*;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Error;
use crate::model::Record;
use crate::model::Value;
use crate::query::ListQuery;
use crate::query::Page;

// =============================================================================
// Operation kinds
// =============================================================================

/// The four operations a data source can support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Listing a page of records.
    Fetch,
    /// Creating a record.
    Create,
    /// Updating a record by identity key.
    Update,
    /// Deleting a record by identity key.
    Delete,
}

impl OperationKind {
    /// Returns the lowercase name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Fetch => "fetch",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Operations trait
// =============================================================================

/// The capability surface of a data source.
///
/// Every method has a default implementation that rejects the call as
/// unsupported without contacting anything, so a partial implementor models
/// an operation set with that capability absent. [`MemorySource`] and
/// [`ApiSource`] implement all four; caller-supplied sets implement the
/// subset they can serve (or use [`CustomOperations`] to wire closures).
#[async_trait]
pub trait Operations: Send + Sync {
    /// Returns one page of records matching the query.
    async fn list(&self, _query: &ListQuery) -> Result<Page, Error> {
        Err(Error::unsupported(OperationKind::Fetch))
    }

    /// Creates a record from a partial and returns the stored record.
    async fn create(&self, _record: Record) -> Result<Record, Error> {
        Err(Error::unsupported(OperationKind::Create))
    }

    /// Patches the record with the given identity key and returns it.
    async fn update(&self, _key: &Value, _patch: Record) -> Result<Record, Error> {
        Err(Error::unsupported(OperationKind::Update))
    }

    /// Deletes the record with the given identity key.
    async fn delete(&self, _key: &Value) -> Result<(), Error> {
        Err(Error::unsupported(OperationKind::Delete))
    }
}

// =============================================================================
// Source configuration
// =============================================================================

/// Declarative choice of data source, one variant per kind.
///
/// Resolved exactly once when the controller is built; switching sources
/// requires building a fresh controller.
pub enum SourceConfig {
    /// A fixed in-memory collection seeded with these records.
    Static {
        /// The initial records.
        records: Vec<Record>,
    },
    /// A remote HTTP endpoint description.
    Api(ApiConfig),
    /// Operations supplied directly by the caller.
    Custom(Arc<dyn Operations>),
}

impl SourceConfig {
    /// Configures a static in-memory source.
    pub fn static_records(records: Vec<Record>) -> Self {
        Self::Static { records }
    }

    /// Configures a remote API source.
    pub fn api(config: ApiConfig) -> Self {
        Self::Api(config)
    }

    /// Configures a caller-supplied operation set.
    pub fn custom(operations: impl Operations + 'static) -> Self {
        Self::Custom(Arc::new(operations))
    }

    pub(crate) fn resolve(self, key_field: &str) -> Result<Arc<dyn Operations>, Error> {
        match self {
            Self::Static { records } => Ok(Arc::new(MemorySource::with_records(key_field, records))),
            Self::Api(config) => Ok(Arc::new(ApiSource::new(config)?)),
            Self::Custom(operations) => Ok(operations),
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static { records } => f
                .debug_struct("Static")
                .field("records", &records.len())
                .finish(),
            Self::Api(config) => f.debug_tuple("Api").field(config).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish(),
        }
    }
}

// =============================================================================
// Caller-supplied operations
// =============================================================================

type ListFn = Box<dyn Fn(ListQuery) -> BoxFuture<'static, Result<Page, Error>> + Send + Sync>;
type CreateFn = Box<dyn Fn(Record) -> BoxFuture<'static, Result<Record, Error>> + Send + Sync>;
type UpdateFn = Box<dyn Fn(Value, Record) -> BoxFuture<'static, Result<Record, Error>> + Send + Sync>;
type DeleteFn = Box<dyn Fn(Value) -> BoxFuture<'static, Result<(), Error>> + Send + Sync>;

/// A caller-supplied operation set built from closures.
///
/// Any capability left unset is rejected as unsupported, so a source that
/// can only list, or only list and create, is expressed by wiring just
/// those closures.
///
/// # Example
///
/// ```ignore
/// let operations = CustomOperations::new()
///     .on_list(|query| async move { my_backend.page(query).await });
/// let config = SourceConfig::custom(operations);
/// ```
#[derive(Default)]
pub struct CustomOperations {
    list: Option<ListFn>,
    create: Option<CreateFn>,
    update: Option<UpdateFn>,
    delete: Option<DeleteFn>,
}

impl CustomOperations {
    /// Creates an operation set with no capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the list capability.
    pub fn on_list<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ListQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page, Error>> + Send + 'static,
    {
        self.list = Some(Box::new(move |query| Box::pin(f(query))));
        self
    }

    /// Supplies the create capability.
    pub fn on_create<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Record, Error>> + Send + 'static,
    {
        self.create = Some(Box::new(move |record| Box::pin(f(record))));
        self
    }

    /// Supplies the update capability.
    pub fn on_update<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value, Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Record, Error>> + Send + 'static,
    {
        self.update = Some(Box::new(move |key, patch| Box::pin(f(key, patch))));
        self
    }

    /// Supplies the delete capability.
    pub fn on_delete<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.delete = Some(Box::new(move |key| Box::pin(f(key))));
        self
    }
}

#[async_trait]
impl Operations for CustomOperations {
    async fn list(&self, query: &ListQuery) -> Result<Page, Error> {
        match &self.list {
            Some(f) => f(query.clone()).await,
            None => Err(Error::unsupported(OperationKind::Fetch)),
        }
    }

    async fn create(&self, record: Record) -> Result<Record, Error> {
        match &self.create {
            Some(f) => f(record).await,
            None => Err(Error::unsupported(OperationKind::Create)),
        }
    }

    async fn update(&self, key: &Value, patch: Record) -> Result<Record, Error> {
        match &self.update {
            Some(f) => f(key.clone(), patch).await,
            None => Err(Error::unsupported(OperationKind::Update)),
        }
    }

    async fn delete(&self, key: &Value) -> Result<(), Error> {
        match &self.delete {
            Some(f) => f(key.clone()).await,
            None => Err(Error::unsupported(OperationKind::Delete)),
        }
    }
}
