//! In-Memory Store Backend
//!
//! Process-local `TableStore` implementation for tests and local development.
//! Items are keyed by the table's hash-key attribute; batch puts upsert.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{Item, StoreError, StoreErrorKind, StoreResult, TableSpec, TableStore};

struct Table {
    hash_key: String,
    items: HashMap<String, Item>,
}

/// In-memory multi-table store behind a single mutex.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently stored in a table.
    pub fn item_count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.tables.lock().unwrap();
        tables
            .get(table)
            .map(|t| t.items.len())
            .ok_or_else(|| StoreError::resource_not_found(table))
    }
}

impl TableStore for MemoryStore {
    fn create_table(&self, spec: &TableSpec) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if tables.contains_key(&spec.name) {
            return Err(StoreError::resource_in_use(&spec.name));
        }
        tables.insert(
            spec.name.clone(),
            Table {
                hash_key: spec.hash_key.clone(),
                items: HashMap::new(),
            },
        );
        Ok(())
    }

    fn delete_table(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| StoreError::resource_not_found(table))
    }

    fn scan_all(&self, table: &str) -> StoreResult<Vec<Item>> {
        let tables = self.tables.lock().unwrap();
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::resource_not_found(table))?;
        Ok(table.items.values().cloned().collect())
    }

    fn batch_put(&self, table: &str, items: Vec<Item>) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let table_name = table;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::resource_not_found(table))?;

        for item in items {
            let key = match item.get(&table.hash_key) {
                Some(Value::String(key)) if !key.is_empty() => key.clone(),
                _ => {
                    return Err(StoreError::new(
                        StoreErrorKind::Internal,
                        format!(
                            "item missing string hash key '{}' for table {}",
                            table.hash_key, table_name
                        ),
                    ))
                }
            };
            table.items.insert(key, item);
        }
        Ok(())
    }
}
