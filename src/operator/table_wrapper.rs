use std::sync::Arc;

use crate::error::Result;
use crate::table::Table;

use super::{ExecutionState, Operator};

/// Wraps an already-built table as a leaf operator, so a pre-built table
/// (e.g. one assembled directly in a test) can feed into an operator DAG
/// without going through [`super::GetTable`] and a catalog.
#[derive(Debug)]
pub struct TableWrapper {
    table: Arc<Table>,
    state: ExecutionState,
}

impl TableWrapper {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            state: ExecutionState::new(),
        }
    }
}

impl Operator for TableWrapper {
    fn execute(&self) -> Result<()> {
        let table = Arc::clone(&self.table);
        self.state.run_once(|| Ok(table))
    }

    fn get_output(&self) -> Option<Arc<Table>> {
        self.state.output()
    }
}
