//! The segment hierarchy: a column's data for a single chunk, in one of
//! three flavors — [`ValueSegment`] (mutable, append-only), [`DictionarySegment`]
//! (immutable, dictionary-compressed), and [`ReferenceSegment`] (immutable,
//! a zero-copy view into another table).
//!
//! All three are reached through the [`Segment`] trait object, the Rust
//! stand-in for the reference implementation's `BaseSegment` virtual
//! interface (see the design notes in spec.md §9: "a vtable-like interface
//! with typed inner storage hidden behind a trait/interface").

mod dictionary;
mod reference;
mod value;

pub use dictionary::DictionarySegment;
pub use reference::ReferenceSegment;
pub use value::ValueSegment;

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::ids::ChunkOffset;
use crate::variant::{DataType, Variant};

/// The type-erased capability set every segment kind implements.
///
/// `get`/`append` take and return [`Variant`]s rather than a generic `T`,
/// the same way `BaseSegment::operator[]` returns an `AllTypeVariant` in the
/// reference implementation — type erasure is the seam that lets [`crate::Chunk`]
/// hold one segment per column without itself being generic.
pub trait Segment: fmt::Debug + Send + Sync {
    /// The scalar type this segment stores.
    fn data_type(&self) -> DataType;

    /// Number of rows stored in this segment.
    fn size(&self) -> usize;

    /// Reads the value at `offset`, wrapped as a [`Variant`].
    fn get(&self, offset: ChunkOffset) -> Result<Variant>;

    /// Appends a value. Fails with [`crate::StorageError::Immutable`] on
    /// dictionary and reference segments, and with
    /// [`crate::StorageError::TypeMismatch`] if `value`'s tag doesn't match
    /// [`Self::data_type`].
    fn append(&mut self, value: Variant) -> Result<()>;

    /// A rough estimate of this segment's heap footprint, in bytes.
    fn estimate_memory_usage(&self) -> usize;

    /// Downcasting hook so operators (chiefly [`crate::TableScan`]) can
    /// recover the concrete, typed segment behind this trait object and
    /// take a fast, monomorphized path instead of going through
    /// [`Segment::get`] cell by cell.
    fn as_any(&self) -> &dyn Any;
}
