//! Dynamo Adapter - policy rule persistence for a key-value table store
//!
//! Stores an access-control engine's rule set as items in a single
//! hash-keyed table instead of a flat file. The adapter is self-provisioning
//! (it creates and deletes its own table) and persists whole rule sets only:
//! load is a full scan, save is a delete-recreate-rewrite of the table, and
//! the incremental mutators are unsupported by design.

pub mod adapter;
pub mod error;
pub mod model;
pub mod record;
pub mod store;

pub use adapter::{AdapterConfig, DynamoAdapter, PolicyAdapter};
pub use error::{AdapterError, Result};
pub use model::Model;
pub use record::PolicyRecord;
pub use store::{MemoryStore, StoreError, StoreErrorKind, TableStore};
