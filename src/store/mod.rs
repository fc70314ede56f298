//! Store Backend Layer
//!
//! Trait-based abstraction over the remote key-value table store. The adapter
//! only issues logical operations (create-table, delete-table, scan,
//! batch-put) and trusts each backend's own transport, retry, and durability
//! model.

pub mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// One stored item: attribute name to attribute value.
pub type Item = Map<String, Value>;

/// Universal result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Structured classification of store failures.
///
/// The adapter branches on these kinds (idempotent create, tolerated
/// delete-miss in the save path) instead of matching error-message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The table already exists (create on a preexisting table).
    ResourceInUse,
    /// The table does not exist.
    ResourceNotFound,
    /// Transport-level failure reaching the store.
    Connection,
    /// Any other store-side failure.
    Internal,
}

/// A failure reported by a store backend.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn resource_in_use(table: &str) -> Self {
        Self::new(
            StoreErrorKind::ResourceInUse,
            format!("cannot create preexisting table: {table}"),
        )
    }

    pub fn resource_not_found(table: &str) -> Self {
        Self::new(
            StoreErrorKind::ResourceNotFound,
            format!("table not found: {table}"),
        )
    }
}

/// Key schema and capacity settings for table creation.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Table name.
    pub name: String,
    /// Single string hash-key attribute name.
    pub hash_key: String,
    /// Provisioned read capacity units.
    pub read_capacity: u64,
    /// Provisioned write capacity units.
    pub write_capacity: u64,
}

/// Core store backend trait — all backends implement this.
///
/// Operations are synchronous and blocking; the adapter adds no concurrency,
/// timeouts, or retries of its own.
pub trait TableStore: Send + Sync {
    /// Create a table with the given key schema and capacity.
    /// Fails `ResourceInUse` if the table already exists.
    fn create_table(&self, spec: &TableSpec) -> StoreResult<()>;

    /// Delete a table. Fails `ResourceNotFound` if it does not exist.
    fn delete_table(&self, table: &str) -> StoreResult<()>;

    /// Read every item in a table. Order is backend-dependent and
    /// unspecified; callers must not rely on it.
    fn scan_all(&self, table: &str) -> StoreResult<Vec<Item>>;

    /// Write all given items in one batched put. Partial-failure semantics
    /// are whatever the backend's batch API provides.
    fn batch_put(&self, table: &str, items: Vec<Item>) -> StoreResult<()>;
}

/// Lets multiple adapters share one backend handle.
impl<S: TableStore + ?Sized> TableStore for Arc<S> {
    fn create_table(&self, spec: &TableSpec) -> StoreResult<()> {
        (**self).create_table(spec)
    }

    fn delete_table(&self, table: &str) -> StoreResult<()> {
        (**self).delete_table(table)
    }

    fn scan_all(&self, table: &str) -> StoreResult<Vec<Item>> {
        (**self).scan_all(table)
    }

    fn batch_put(&self, table: &str, items: Vec<Item>) -> StoreResult<()> {
        (**self).batch_put(table, items)
    }
}
