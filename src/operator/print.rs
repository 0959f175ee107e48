use std::io::Write as _;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, StorageError};
use crate::ids::{ChunkId, ChunkOffset, ColumnId};
use crate::table::Table;

use super::{ExecutionState, Operator};

/// A pass-through operator that writes a human-readable rendering of its
/// input table to a sink, then returns that same table unchanged.
///
/// Peripheral I/O glue, not part of the storage core proper — included
/// because every other operator in this module needs somewhere to land
/// when run end to end.
pub struct Print<W> {
    input: Arc<dyn Operator>,
    sink: Mutex<W>,
    state: ExecutionState,
}

impl<W> std::fmt::Debug for Print<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Print").field("input", &self.input).finish()
    }
}

impl<W: std::io::Write + Send> Print<W> {
    pub fn new(input: Arc<dyn Operator>, sink: W) -> Self {
        Self {
            input,
            sink: Mutex::new(sink),
            state: ExecutionState::new(),
        }
    }

    fn render(&self, table: &Table) -> Result<()> {
        let mut sink = self.sink.lock();
        let column_count = table.column_count();

        let header: Vec<String> = (0..column_count)
            .map(|i| -> Result<String> {
                let column_id = ColumnId::from(i);
                Ok(format!("{} ({})", table.column_name(column_id)?, table.column_type(column_id)?))
            })
            .collect::<Result<Vec<String>>>()?;
        writeln!(sink, "{}", header.join(" | ")).map_err(io_error)?;

        for chunk_index in 0..table.chunk_count() {
            let chunk_id = ChunkId::from(chunk_index);
            let chunk = table.get_chunk(chunk_id)?;
            writeln!(sink, "-- chunk {chunk_id} ({} rows) --", chunk.size()).map_err(io_error)?;
            for offset in 0..chunk.size() {
                let offset = ChunkOffset::from(offset);
                let cells: Vec<String> = (0..column_count)
                    .map(|i| Ok(chunk.get_cell(ColumnId::from(i), offset)?.to_string()))
                    .collect::<Result<_>>()?;
                writeln!(sink, "{}", cells.join(" | ")).map_err(io_error)?;
            }
        }
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::PreconditionViolated {
        reason: format!("failed writing to print sink: {err}"),
    }
}

impl<W: std::io::Write + Send> Operator for Print<W> {
    fn execute(&self) -> Result<()> {
        self.state.run_once(|| {
            let table = self.input.get_output().ok_or_else(|| StorageError::PreconditionViolated {
                reason: "Print's input has not executed".to_string(),
            })?;
            self.render(&table)?;
            Ok(table)
        })
    }

    fn get_output(&self) -> Option<Arc<Table>> {
        self.state.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{Operator, TableWrapper};
    use crate::variant::{DataType, Variant};

    #[test]
    fn prints_header_and_rows() {
        let table = Table::new(4).unwrap();
        table.add_column("a", DataType::Int32).unwrap();
        table.add_column("b", DataType::String).unwrap();
        table.append(vec![Variant::Int32(4), Variant::String("Hello,".into())]).unwrap();

        let input = Arc::new(TableWrapper::new(Arc::new(table)));
        input.execute().unwrap();

        let mut buffer = Vec::new();
        {
            let print = Print::new(input, &mut buffer);
            print.execute().unwrap();
            assert!(print.get_output().is_some());
        }

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("a (int) | b (string)"));
        assert!(output.contains("4 | Hello,"));
    }
}
