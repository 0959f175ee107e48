//! [`Table`]: a sequence of chunks plus a schema, with append semantics and
//! chunk rollover.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::chunk::Chunk;
use crate::error::{Result, StorageError};
use crate::ids::{ChunkId, ChunkOffset, ColumnId};
use crate::segment::{DictionarySegment, Segment, ValueSegment};
use crate::type_dispatch::ScalarType;
use crate::variant::{DataType, Variant};
use crate::with_scalar_type;

struct TableInner {
    column_names: Vec<String>,
    column_types: Vec<DataType>,
    chunks: Vec<Arc<Chunk>>,
}

/// A table: an ordered sequence of chunks, a schema (column names/types),
/// and a target chunk size.
///
/// Only the last chunk is ever mutable; every earlier chunk is full
/// (`size() == target_chunk_size`). The column count is fixed the moment
/// the first row is appended.
#[derive(Debug)]
pub struct Table {
    target_chunk_size: usize,
    inner: RwLock<TableInner>,
}

impl std::fmt::Debug for TableInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableInner")
            .field("column_names", &self.column_names)
            .field("column_types", &self.column_types)
            .field("chunk_count", &self.chunks.len())
            .finish()
    }
}

impl Table {
    /// Creates an empty table (zero columns, zero chunks) with the given
    /// target chunk size. The first chunk is allocated lazily by the first
    /// `append` — this is what lets a freshly built result table (e.g. the
    /// output of [`crate::TableScan`] over an empty match set) report
    /// `chunk_count() == 0` rather than carry a spurious empty chunk ahead
    /// of whatever `emplace_chunk` adds.
    pub fn new(target_chunk_size: usize) -> Result<Self> {
        if target_chunk_size == 0 {
            return Err(StorageError::PreconditionViolated {
                reason: "target_chunk_size must be > 0".to_string(),
            });
        }
        Ok(Self {
            target_chunk_size,
            inner: RwLock::new(TableInner {
                column_names: Vec::new(),
                column_types: Vec::new(),
                chunks: Vec::new(),
            }),
        })
    }

    pub fn target_chunk_size(&self) -> usize {
        self.target_chunk_size
    }

    /// Adds a column to the schema. Fails with [`StorageError::SchemaLocked`]
    /// if the table already has rows — columns may only be added while the
    /// table is empty (§4.6).
    pub fn add_column(&self, name: impl Into<String>, data_type: DataType) -> Result<()> {
        let mut inner = self.inner.write();
        let row_count = Self::row_count_locked(&inner, self.target_chunk_size);
        if row_count > 0 {
            return Err(StorageError::SchemaLocked { row_count });
        }

        inner.column_names.push(name.into());
        inner.column_types.push(data_type);

        for chunk in &inner.chunks {
            let segment: Box<dyn Segment> =
                with_scalar_type!(data_type, |T| Box::new(ValueSegment::<T>::new()));
            chunk.add_segment(segment);
        }
        Ok(())
    }

    /// Appends one row. Rolls the tail chunk over to a fresh one first if
    /// the current tail is already full.
    pub fn append(&self, values: Vec<Variant>) -> Result<()> {
        let inner = self.inner.upgradable_read();
        let needs_new_chunk = inner
            .chunks
            .last()
            .map_or(true, |chunk| chunk.size() >= self.target_chunk_size);

        if needs_new_chunk {
            let chunk = Chunk::new();
            for &column_type in &inner.column_types {
                let segment: Box<dyn Segment> =
                    with_scalar_type!(column_type, |T| Box::new(ValueSegment::<T>::new()));
                chunk.add_segment(segment);
            }

            // Append into the new chunk *before* it's published into
            // `inner.chunks`. If this fails (ArityMismatch, TypeMismatch),
            // the chunk is simply dropped and the table is left exactly as
            // it was — no partial append (§7).
            chunk.append(values)?;
            chunk.sanity_check();

            let mut inner = parking_lot::RwLockUpgradableReadGuard::upgrade(inner);
            let chunk_id = ChunkId::from(inner.chunks.len());
            inner.chunks.push(Arc::new(chunk));
            tracing::debug!(chunk = %chunk_id, target_chunk_size = self.target_chunk_size, "rolled over to new chunk");
        } else {
            let tail = Arc::clone(inner.chunks.last().expect("checked above"));
            drop(inner);
            tail.append(values)?;
            tail.sanity_check();
        }
        Ok(())
    }

    fn row_count_locked(inner: &TableInner, target_chunk_size: usize) -> usize {
        match inner.chunks.len() {
            0 => 0,
            n => (n - 1) * target_chunk_size + inner.chunks[n - 1].size(),
        }
    }

    pub fn row_count(&self) -> usize {
        let inner = self.inner.read();
        Self::row_count_locked(&inner, self.target_chunk_size)
    }

    pub fn chunk_count(&self) -> usize {
        self.inner.read().chunks.len()
    }

    pub fn column_count(&self) -> usize {
        self.inner.read().column_names.len()
    }

    pub fn column_name(&self, column_id: ColumnId) -> Result<String> {
        let inner = self.inner.read();
        inner
            .column_names
            .get(column_id.as_usize())
            .cloned()
            .ok_or_else(|| StorageError::NoSuchColumn {
                column: column_id.to_string(),
            })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.inner.read().column_names.clone()
    }

    pub fn column_type(&self, column_id: ColumnId) -> Result<DataType> {
        let inner = self.inner.read();
        inner
            .column_types
            .get(column_id.as_usize())
            .copied()
            .ok_or_else(|| StorageError::NoSuchColumn {
                column: column_id.to_string(),
            })
    }

    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId> {
        let inner = self.inner.read();
        inner
            .column_names
            .iter()
            .position(|n| n == name)
            .map(ColumnId::from)
            .ok_or_else(|| StorageError::NoSuchColumn { column: name.to_string() })
    }

    /// Returns a shared handle to the chunk at `chunk_id`.
    pub fn get_chunk(&self, chunk_id: ChunkId) -> Result<Arc<Chunk>> {
        let inner = self.inner.read();
        let index = chunk_id.as_usize();
        let len = inner.chunks.len();
        inner
            .chunks
            .get(index)
            .cloned()
            .ok_or(StorageError::OutOfBounds { index, len })
    }

    /// Appends a pre-built chunk as a new tail chunk. Used by
    /// result-producing operators (e.g. [`crate::TableScan`]) rather than by
    /// ordinary row-at-a-time writers.
    pub fn emplace_chunk(&self, chunk: Chunk) {
        self.inner.write().chunks.push(Arc::new(chunk));
    }

    /// Reads the cell at `(chunk_id, column_id, offset)`.
    pub fn get_cell(&self, chunk_id: ChunkId, column_id: ColumnId, offset: ChunkOffset) -> Result<Variant> {
        self.get_chunk(chunk_id)?.get_cell(column_id, offset)
    }

    /// Compresses the chunk at `chunk_id` in place, replacing every
    /// `ValueSegment` with an equivalent `DictionarySegment`.
    ///
    /// Precondition: the chunk must be full (`size() == target_chunk_size`)
    /// — fails with [`StorageError::PreconditionViolated`] otherwise. Spawns
    /// one worker thread per column (§5's compression protocol), builds the
    /// replacement chunk off to the side, and only then swaps it in, so
    /// concurrent readers of the old chunk handle are never exposed to a
    /// half-compressed state.
    pub fn compress_chunk(&self, chunk_id: ChunkId) -> Result<()> {
        let source = self.get_chunk(chunk_id)?;
        if source.size() != self.target_chunk_size {
            return Err(StorageError::PreconditionViolated {
                reason: format!(
                    "chunk {chunk_id} has {} row(s), expected a full chunk of {}",
                    source.size(),
                    self.target_chunk_size
                ),
            });
        }

        let column_types = self.inner.read().column_types.clone();
        tracing::debug!(chunk = %chunk_id, columns = column_types.len(), "compressing chunk");

        // Pre-size the destination chunk with one placeholder segment per
        // column (§4.5: "constructed empty or with a pre-sized segment slot
        // vector"), then have each worker overwrite its own slot via
        // `Chunk::replace_segment` once its `DictionarySegment` is built.
        let destination = Chunk::with_placeholder_segments(&column_types);

        std::thread::scope(|scope| {
            let handles: Vec<_> = column_types
                .iter()
                .enumerate()
                .map(|(i, &data_type)| {
                    let source = &source;
                    let destination = &destination;
                    let column_id = ColumnId::from(i);
                    tracing::debug!(chunk = %chunk_id, column = %column_id, "compression worker spawned");
                    scope.spawn(move || {
                        let compressed = source
                            .with_segment(column_id, |segment| compress_segment(data_type, segment))
                            .expect("column index was derived from the table's own schema");
                        destination
                            .replace_segment(column_id, compressed)
                            .expect("destination chunk was pre-sized to match column_types");
                    })
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                handle.join().expect("compression worker panicked");
                tracing::debug!(chunk = %chunk_id, column = %ColumnId::from(i), "compression worker joined");
            }
        });

        destination.sanity_check();

        let mut inner = self.inner.write();
        let index = chunk_id.as_usize();
        inner.chunks[index] = Arc::new(destination);
        Ok(())
    }
}

/// Type-dispatches to the concrete `ValueSegment<T>` behind `segment` and
/// builds its `DictionarySegment<T>` replacement.
fn compress_segment(data_type: DataType, segment: &dyn Segment) -> Box<dyn Segment> {
    with_scalar_type!(data_type, |T| {
        let value_segment = segment
            .as_any()
            .downcast_ref::<ValueSegment<T>>()
            .expect("a chunk awaiting compression only ever holds ValueSegments");
        Box::new(DictionarySegment::<T>::from_value_segment(value_segment)) as Box<dyn Segment>
    })
}
