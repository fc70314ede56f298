//! Policy Persistence Adapter
//!
//! Table lifecycle and bulk I/O against a `TableStore` backend: full-table
//! load into a `Model`, full-table replace on save, and self-provisioning
//! create/delete of the backing table.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AdapterError, Result};
use crate::model::Model;
use crate::record::PolicyRecord;
use crate::store::{StoreErrorKind, TableSpec, TableStore};

/// Attribute name of the table's string hash key.
pub const HASH_KEY: &str = "id";

fn default_capacity() -> u64 {
    10
}

/// Store connection parameters and table settings.
///
/// `endpoint` and `region` are carried for backends that dial a remote
/// store; the in-memory backend ignores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub table_name: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_capacity")]
    pub read_capacity: u64,
    #[serde(default = "default_capacity")]
    pub write_capacity: u64,
}

impl AdapterConfig {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            endpoint: None,
            region: None,
            read_capacity: default_capacity(),
            write_capacity: default_capacity(),
        }
    }
}

/// The capability surface the policy engine consumes.
///
/// This adapter only supports whole-set persistence; the three incremental
/// mutators always fail and callers must fall back to `save_policy` with the
/// updated rule set.
pub trait PolicyAdapter {
    /// Populate the model with every stored rule.
    fn load_policy(&self, model: &mut Model) -> Result<()>;

    /// Replace all stored rules with the model's current rule set.
    fn save_policy(&self, model: &mut Model) -> Result<()>;

    /// Unsupported; always fails.
    fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Unsupported; always fails.
    fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Unsupported; always fails.
    fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Result<()>;
}

/// Policy adapter over a key-value table store.
pub struct DynamoAdapter<S: TableStore> {
    store: S,
    config: AdapterConfig,
}

impl<S: TableStore> DynamoAdapter<S> {
    /// Construct an adapter. Never fails, even if the table does not exist
    /// yet; the table is provisioned on first save or explicit create.
    pub fn new(store: S, config: AdapterConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn table_spec(&self) -> TableSpec {
        TableSpec {
            name: self.config.table_name.clone(),
            hash_key: HASH_KEY.to_string(),
            read_capacity: self.config.read_capacity,
            write_capacity: self.config.write_capacity,
        }
    }

    /// Create the backing table. A table that already exists is treated as
    /// success (idempotent create); every other store failure propagates.
    pub fn create_table(&self) -> Result<()> {
        debug!(table = %self.config.table_name, "creating table");
        match self.store.create_table(&self.table_spec()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind == StoreErrorKind::ResourceInUse => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete the backing table. Deleting a nonexistent table is a failure,
    /// asymmetric with `create_table`'s idempotency.
    pub fn delete_table(&self) -> Result<()> {
        debug!(table = %self.config.table_name, "deleting table");
        self.store.delete_table(&self.config.table_name)?;
        Ok(())
    }

    /// Read every stored record. Order is store-dependent and unspecified.
    pub fn scan_all(&self) -> Result<Vec<PolicyRecord>> {
        let items = self.store.scan_all(&self.config.table_name)?;
        items
            .into_iter()
            .map(|item| PolicyRecord::from_item(item).map_err(AdapterError::from))
            .collect()
    }

    /// Write all records in one batched put.
    pub fn batch_put(&self, records: &[PolicyRecord]) -> Result<()> {
        debug!(
            table = %self.config.table_name,
            count = records.len(),
            "batch writing records"
        );
        let items = records.iter().map(PolicyRecord::to_item).collect();
        self.store.batch_put(&self.config.table_name, items)?;
        Ok(())
    }

    fn encode_model(model: &Model) -> Vec<PolicyRecord> {
        let mut records = Vec::new();
        for sec in ["p", "g"] {
            for (ptype, assertion) in model.section(sec) {
                for rule in &assertion.policy {
                    records.push(PolicyRecord::from_rule(ptype, rule));
                }
            }
        }
        records
    }
}

impl<S: TableStore> PolicyAdapter for DynamoAdapter<S> {
    fn load_policy(&self, model: &mut Model) -> Result<()> {
        let records = self.scan_all()?;
        let count = records.len();
        for record in records {
            model.add_policy_line(&record.to_line());
        }
        info!(table = %self.config.table_name, rules = count, "policy loaded");
        Ok(())
    }

    fn save_policy(&self, model: &mut Model) -> Result<()> {
        // Full-table replace: drop, recreate, rewrite. Not atomic — the
        // table is empty or absent for the duration of the rewrite, and
        // concurrent saves can interleave destructively.
        match self.store.delete_table(&self.config.table_name) {
            Ok(()) => {}
            // First save against a fresh store has no table to drop.
            Err(err) if err.kind == StoreErrorKind::ResourceNotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.create_table()?;

        let records = Self::encode_model(model);
        self.batch_put(&records)?;
        info!(
            table = %self.config.table_name,
            rules = records.len(),
            "policy saved"
        );

        // Resynchronize the in-memory model with what was actually
        // persisted; a failure here is returned as the save's own error.
        model.clear_policy();
        self.load_policy(model)
    }

    fn add_policy(&self, _sec: &str, _ptype: &str, _rule: &[String]) -> Result<()> {
        Err(AdapterError::Unsupported("add_policy"))
    }

    fn remove_policy(&self, _sec: &str, _ptype: &str, _rule: &[String]) -> Result<()> {
        Err(AdapterError::Unsupported("remove_policy"))
    }

    fn remove_filtered_policy(
        &self,
        _sec: &str,
        _ptype: &str,
        _field_index: usize,
        _field_values: &[String],
    ) -> Result<()> {
        Err(AdapterError::Unsupported("remove_filtered_policy"))
    }
}
