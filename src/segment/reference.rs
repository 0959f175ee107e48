use std::any::Any;
use std::sync::Arc;

use crate::error::{Result, StorageError};
use crate::ids::{ChunkOffset, ColumnId, PosList};
use crate::table::Table;
use crate::variant::{DataType, Variant};

use super::Segment;

/// An immutable, zero-copy view over a column of a referenced table.
///
/// Defined by `(referenced_table, referenced_column_id, pos_list)`. Per
/// §4.4, reference segments never nest: `referenced_table` is guaranteed by
/// construction (see [`crate::TableScan`]) to contain no reference segments
/// of its own.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    pos_list: Arc<PosList>,
}

impl ReferenceSegment {
    pub fn new(referenced_table: Arc<Table>, referenced_column_id: ColumnId, pos_list: Arc<PosList>) -> Self {
        Self {
            referenced_table,
            referenced_column_id,
            pos_list,
        }
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.pos_list
    }
}

impl Segment for ReferenceSegment {
    fn data_type(&self) -> DataType {
        self.referenced_table
            .column_type(self.referenced_column_id)
            .expect("a ReferenceSegment always points at a valid column")
    }

    fn size(&self) -> usize {
        self.pos_list.len()
    }

    fn get(&self, offset: ChunkOffset) -> Result<Variant> {
        let index = offset.as_usize();
        let row_id = *self
            .pos_list
            .get(index)
            .ok_or(StorageError::OutOfBounds { index, len: self.pos_list.len() })?;
        self.referenced_table
            .get_cell(row_id.chunk_id, self.referenced_column_id, row_id.chunk_offset)
    }

    fn append(&mut self, _value: Variant) -> Result<()> {
        Err(StorageError::Immutable)
    }

    fn estimate_memory_usage(&self) -> usize {
        // The pos list is the only data this segment owns; the referenced
        // table's storage is shared, not counted here.
        self.pos_list.len() * std::mem::size_of::<crate::ids::RowId>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
