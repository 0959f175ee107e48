//! [`StorageManager`]: the named-table catalog.

use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{Result, StorageError};
use crate::table::Table;

/// A registry mapping table names to table handles.
///
/// Conceptually a process-wide singleton — [`StorageManager::instance`]
/// hands out a shared, lazily-initialized default registry — but the type
/// itself carries no global state, so tests that want an isolated catalog
/// can just call [`StorageManager::new`] directly instead of fighting over
/// the shared one.
#[derive(Debug, Default)]
pub struct StorageManager {
    tables: RwLock<AHashMap<String, Arc<Table>>>,
}

impl StorageManager {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(AHashMap::new()),
        }
    }

    /// The process-wide default catalog.
    pub fn instance() -> Arc<StorageManager> {
        static INSTANCE: OnceLock<Arc<StorageManager>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| Arc::new(StorageManager::new())))
    }

    pub fn add_table(&self, name: impl Into<String>, table: Arc<Table>) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(StorageError::Duplicate { name });
        }
        tracing::debug!(table = %name, "registering table");
        tables.insert(name, table);
        Ok(())
    }

    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.remove(name).is_none() {
            return Err(StorageError::NoSuchTable { name: name.to_string() });
        }
        tracing::debug!(table = name, "dropped table");
        Ok(())
    }

    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NoSuchTable { name: name.to_string() })
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Drops every registered table.
    pub fn reset(&self) {
        self.tables.write().clear();
    }
}
