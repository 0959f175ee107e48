use std::any::Any;
use std::marker::PhantomData;

use crate::error::{Result, StorageError};
use crate::ids::ChunkOffset;
use crate::type_dispatch::ScalarType;
use crate::variant::{DataType, Variant};

use super::Segment;

/// A typed, append-only column fragment.
///
/// Holds a plain `Vec<T>`. This is the only segment kind that ever gets
/// mutated in place after creation — it backs the tail chunk of a
/// [`crate::Table`] while rows are still being appended.
#[derive(Debug, Clone)]
pub struct ValueSegment<T> {
    values: Vec<T>,
    _marker: PhantomData<T>,
}

impl<T: ScalarType> ValueSegment<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// A borrow of the underlying values, for efficient typed scanning.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn get_typed(&self, offset: ChunkOffset) -> Result<&T> {
        let index = offset.as_usize();
        self.values.get(index).ok_or(StorageError::OutOfBounds {
            index,
            len: self.values.len(),
        })
    }

    pub fn append_typed(&mut self, value: T) {
        self.values.push(value);
    }
}

impl<T: ScalarType> Default for ValueSegment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarType> Segment for ValueSegment<T> {
    fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn get(&self, offset: ChunkOffset) -> Result<Variant> {
        self.get_typed(offset).map(|v| v.clone().into_variant())
    }

    fn append(&mut self, value: Variant) -> Result<()> {
        let got = value.data_type();
        let typed = T::from_variant(&value).ok_or(StorageError::TypeMismatch {
            expected: T::DATA_TYPE,
            got,
        })?;
        self.append_typed(typed);
        Ok(())
    }

    fn estimate_memory_usage(&self) -> usize {
        self.values.capacity() * std::mem::size_of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
