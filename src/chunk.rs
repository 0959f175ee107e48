//! [`Chunk`]: an ordered collection of one segment per column, fixed in
//! column count once sealed.

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::error::{Result, StorageError};
use crate::ids::{ChunkOffset, ColumnId};
use crate::segment::{Segment, ValueSegment};
use crate::variant::{DataType, Variant};
use crate::with_scalar_type;

/// Most tables have a modest number of columns; `SmallVec` avoids a heap
/// allocation for the common case while still growing for wide tables.
type Segments = SmallVec<[Box<dyn Segment>; 8]>;

/// One horizontal partition of a table: exactly one segment per column.
///
/// Segments are guarded by a mutex (per §5: "`Chunk`'s `add_segment`
/// variants are guarded by a mutex when the chunk participates in
/// concurrent compression") rather than exposed as long-lived borrows, so
/// that [`Table::compress_chunk`](crate::Table::compress_chunk) can replace
/// every segment from worker threads while readers only ever observe a
/// fully-built chunk or its predecessor, never a half-replaced one.
#[derive(Debug)]
pub struct Chunk {
    segments: Mutex<Segments>,
}

impl Chunk {
    /// An empty chunk with no segments yet (columns are added one at a time
    /// as `Table::add_column` walks every existing chunk).
    pub fn new() -> Self {
        Self {
            segments: Mutex::new(SmallVec::new()),
        }
    }

    /// Builds a chunk directly from a complete, ordered set of segments —
    /// used when assembling the output of an operator like [`crate::TableScan`].
    pub fn from_segments(segments: Vec<Box<dyn Segment>>) -> Self {
        Self {
            segments: Mutex::new(Segments::from_vec(segments)),
        }
    }

    /// Builds a chunk pre-sized with one placeholder, empty `ValueSegment<T>`
    /// per column — the "pre-sized segment slot vector" construction mode
    /// from §4.5. [`Table::compress_chunk`](crate::Table::compress_chunk)
    /// uses this to build a destination chunk whose slots its per-column
    /// workers then overwrite concurrently via [`Self::replace_segment`].
    pub fn with_placeholder_segments(column_types: &[DataType]) -> Self {
        let segments: Segments = column_types
            .iter()
            .map(|&data_type| {
                with_scalar_type!(data_type, |T| Box::new(ValueSegment::<T>::new()) as Box<dyn Segment>)
            })
            .collect();
        Self {
            segments: Mutex::new(segments),
        }
    }

    /// Appends a new segment as the next column.
    pub fn add_segment(&self, segment: Box<dyn Segment>) {
        self.segments.lock().push(segment);
    }

    /// Overwrites the segment at `column_id`, used by chunk compression to
    /// swap a placeholder `ValueSegment` for its `DictionarySegment`
    /// replacement.
    pub fn replace_segment(&self, column_id: ColumnId, segment: Box<dyn Segment>) -> Result<()> {
        let mut segments = self.segments.lock();
        let index = column_id.as_usize();
        let len = segments.len();
        let slot = segments.get_mut(index).ok_or(StorageError::OutOfBounds { index, len })?;
        *slot = segment;
        Ok(())
    }

    /// Number of columns this chunk carries a segment for.
    pub fn column_count(&self) -> usize {
        self.segments.lock().len()
    }

    /// The chunk's row count: the size of its first segment, or 0 if the
    /// chunk has no segments yet. Every segment in a filled chunk has the
    /// same size (checked in debug builds — see [`Self::sanity_check`]).
    pub fn size(&self) -> usize {
        let segments = self.segments.lock();
        segments.first().map_or(0, |s| s.size())
    }

    /// Reads the cell at `(column_id, offset)`.
    pub fn get_cell(&self, column_id: ColumnId, offset: ChunkOffset) -> Result<Variant> {
        let segments = self.segments.lock();
        let index = column_id.as_usize();
        let len = segments.len();
        let segment = segments.get(index).ok_or(StorageError::OutOfBounds { index, len })?;
        segment.get(offset)
    }

    /// Forwards one value per column to the matching segment's `append`.
    /// Fails with [`StorageError::ArityMismatch`] before touching any
    /// segment if `values.len()` doesn't match [`Self::column_count`], so a
    /// failed append leaves every segment untouched.
    pub fn append(&self, values: Vec<Variant>) -> Result<()> {
        let mut segments = self.segments.lock();
        if values.len() != segments.len() {
            return Err(StorageError::ArityMismatch {
                expected: segments.len(),
                got: values.len(),
            });
        }
        for (segment, value) in segments.iter_mut().zip(values) {
            segment.append(value)?;
        }
        Ok(())
    }

    /// Runs `f` against the segment at `column_id` while the chunk's
    /// segment lock is held — the hook [`crate::TableScan`] uses to recover
    /// a concrete, typed segment via `Segment::as_any` and take a
    /// specialized scan path.
    pub fn with_segment<R>(&self, column_id: ColumnId, f: impl FnOnce(&dyn Segment) -> R) -> Result<R> {
        let segments = self.segments.lock();
        let index = column_id.as_usize();
        let len = segments.len();
        let segment = segments.get(index).ok_or(StorageError::OutOfBounds { index, len })?;
        Ok(f(segment.as_ref()))
    }

    /// Debug-only invariant check: every segment in a non-empty chunk must
    /// report the same size (§8, invariant 2). Costly enough (locks +
    /// iterates every segment) that it's skipped in release builds, the way
    /// `re_chunk::Chunk::sanity_check` only runs its cache-consistency
    /// checks under `cfg!(debug_assertions)`.
    pub fn sanity_check(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let segments = self.segments.lock();
        if let Some(first) = segments.first() {
            let expected = first.size();
            for segment in segments.iter() {
                debug_assert_eq!(
                    segment.size(),
                    expected,
                    "all segments in a chunk must have equal size"
                );
            }
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::DictionarySegment;

    #[test]
    fn empty_chunk_reports_zero_size() {
        let chunk = Chunk::new();
        assert_eq!(chunk.size(), 0);
        assert_eq!(chunk.column_count(), 0);
    }

    #[test]
    fn append_forwards_to_every_segment() {
        let chunk = Chunk::new();
        chunk.add_segment(Box::new(ValueSegment::<i32>::new()));
        chunk.add_segment(Box::new(ValueSegment::<String>::new()));

        chunk
            .append(vec![Variant::Int32(4), Variant::String("Hello,".into())])
            .unwrap();

        assert_eq!(chunk.size(), 1);
        assert_eq!(chunk.get_cell(ColumnId(0), ChunkOffset(0)).unwrap(), Variant::Int32(4));
        assert_eq!(
            chunk.get_cell(ColumnId(1), ChunkOffset(0)).unwrap(),
            Variant::String("Hello,".into())
        );
    }

    #[test]
    fn append_arity_mismatch_fails_and_leaves_chunk_unchanged() {
        let chunk = Chunk::new();
        chunk.add_segment(Box::new(ValueSegment::<i32>::new()));

        let err = chunk.append(vec![Variant::Int32(1), Variant::Int32(2)]).unwrap_err();
        assert!(matches!(err, StorageError::ArityMismatch { expected: 1, got: 2 }));
        assert_eq!(chunk.size(), 0);
    }

    #[test]
    fn with_placeholder_segments_matches_column_types() {
        let chunk = Chunk::with_placeholder_segments(&[DataType::Int32, DataType::String]);
        assert_eq!(chunk.column_count(), 2);
        assert_eq!(chunk.size(), 0);
    }

    #[test]
    fn replace_segment_overwrites_the_named_slot() {
        let chunk = Chunk::with_placeholder_segments(&[DataType::Int32]);

        let mut source: ValueSegment<i32> = ValueSegment::new();
        for v in [1, 2, 1] {
            source.append(Variant::Int32(v)).unwrap();
        }
        let dictionary = DictionarySegment::from_value_segment(&source);
        chunk.replace_segment(ColumnId(0), Box::new(dictionary)).unwrap();

        assert_eq!(chunk.size(), 3);
        assert_eq!(chunk.get_cell(ColumnId(0), ChunkOffset(1)).unwrap(), Variant::Int32(2));
    }

    #[test]
    fn replace_segment_out_of_bounds_fails() {
        let chunk = Chunk::with_placeholder_segments(&[DataType::Int32]);
        let err = chunk
            .replace_segment(ColumnId(1), Box::new(ValueSegment::<i32>::new()))
            .unwrap_err();
        assert!(matches!(err, StorageError::OutOfBounds { index: 1, len: 1 }));
    }
}
