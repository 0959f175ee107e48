use std::sync::Arc;

use crate::catalog::StorageManager;
use crate::error::Result;
use crate::table::Table;

use super::{ExecutionState, Operator};

/// A leaf operator that looks up a table by name in a catalog.
#[derive(Debug)]
pub struct GetTable {
    name: String,
    manager: Arc<StorageManager>,
    state: ExecutionState,
}

impl GetTable {
    /// Looks the table up in the process-wide default catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_manager(name, StorageManager::instance())
    }

    /// Looks the table up in a specific catalog, e.g. an isolated one built
    /// for a test.
    pub fn from_manager(name: impl Into<String>, manager: Arc<StorageManager>) -> Self {
        Self {
            name: name.into(),
            manager,
            state: ExecutionState::new(),
        }
    }
}

impl Operator for GetTable {
    fn execute(&self) -> Result<()> {
        self.state.run_once(|| self.manager.get_table(&self.name))
    }

    fn get_output(&self) -> Option<Arc<Table>> {
        self.state.output()
    }
}
