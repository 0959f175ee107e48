use std::any::Any;
use std::cmp::Ordering;

use crate::attribute_vector::{AttributeVector, AttributeVectorWidth};
use crate::error::{Result, StorageError};
use crate::ids::{ChunkOffset, ValueId, INVALID_VALUE_ID};
use crate::type_dispatch::ScalarType;
use crate::variant::{DataType, Variant};

use super::{Segment, ValueSegment};

/// An immutable, dictionary-compressed column: a sorted-unique dictionary
/// of distinct values plus a width-packed [`AttributeVector`] of value-ids,
/// one per row.
#[derive(Debug, Clone)]
pub struct DictionarySegment<T> {
    dictionary: Vec<T>,
    attribute_vector: AttributeVector,
}

impl<T: ScalarType> DictionarySegment<T> {
    /// Builds a dictionary segment from a value segment's worth of data, in
    /// one pass: sort-and-dedup to get the dictionary, then binary-search
    /// every original value back into its dictionary index.
    ///
    /// Because every value is by construction present in the dictionary,
    /// `lower_bound` always finds an exact match here — see §4.3.
    pub fn from_value_segment(source: &ValueSegment<T>) -> Self {
        let values = source.values();

        let mut dictionary: Vec<T> = values.to_vec();
        dictionary.sort_by(|a, b| a.cmp_total(b));
        dictionary.dedup_by(|a, b| a.cmp_total(b) == Ordering::Equal);

        let width = AttributeVectorWidth::select_for_cardinality(dictionary.len());
        let mut attribute_vector = AttributeVector::with_capacity(width, values.len());

        for (i, value) in values.iter().enumerate() {
            let index = dictionary
                .as_slice()
                .partition_point(|candidate| candidate.cmp_total(value) == Ordering::Less);
            debug_assert!(
                index < dictionary.len() && dictionary[index].cmp_total(value) == Ordering::Equal,
                "every source value must be present in its own dictionary"
            );
            attribute_vector
                .set(i, ValueId::from(index as u32))
                .expect("attribute vector was sized to match the source values");
        }

        Self {
            dictionary,
            attribute_vector,
        }
    }

    /// Looks up the value a dictionary entry represents.
    pub fn value_by_value_id(&self, id: ValueId) -> Result<&T> {
        let index = id.as_usize();
        self.dictionary.get(index).ok_or(StorageError::OutOfBounds {
            index,
            len: self.dictionary.len(),
        })
    }

    pub fn get_typed(&self, offset: ChunkOffset) -> Result<&T> {
        let id = self.attribute_vector.get(offset.as_usize())?;
        self.value_by_value_id(id)
    }

    /// The smallest value-id `id` with `dictionary[id] >= value`, or
    /// [`INVALID_VALUE_ID`] if every entry is smaller. Binary search, O(log
    /// |dictionary|).
    pub fn lower_bound(&self, value: &T) -> ValueId {
        let index = self
            .dictionary
            .as_slice()
            .partition_point(|candidate| candidate.cmp_total(value) == Ordering::Less);
        if index == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId::from(index as u32)
        }
    }

    /// The smallest value-id `id` with `dictionary[id] > value`, or
    /// [`INVALID_VALUE_ID`] if no entry is larger. Binary search, O(log
    /// |dictionary|).
    pub fn upper_bound(&self, value: &T) -> ValueId {
        let index = self
            .dictionary
            .as_slice()
            .partition_point(|candidate| candidate.cmp_total(value) != Ordering::Greater);
        if index == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId::from(index as u32)
        }
    }

    pub fn unique_values_count(&self) -> usize {
        self.dictionary.len()
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }
}

impl<T: ScalarType> Segment for DictionarySegment<T> {
    fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn size(&self) -> usize {
        self.attribute_vector.size()
    }

    fn get(&self, offset: ChunkOffset) -> Result<Variant> {
        self.get_typed(offset).map(|v| v.clone().into_variant())
    }

    fn append(&mut self, _value: Variant) -> Result<()> {
        Err(StorageError::Immutable)
    }

    fn estimate_memory_usage(&self) -> usize {
        self.dictionary.len() * std::mem::size_of::<T>()
            + self.attribute_vector.size() * self.attribute_vector.width().bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[&str]) -> (ValueSegment<String>, DictionarySegment<String>) {
        let mut source: ValueSegment<String> = ValueSegment::new();
        for v in values {
            source.append_typed((*v).to_string());
        }
        let dict = DictionarySegment::from_value_segment(&source);
        (source, dict)
    }

    #[test]
    fn dictionary_is_sorted_unique_and_preserves_values() {
        let (source, dict) = build(&["Bill", "Steve", "Alexander", "Steve", "Hasso", "Bill"]);

        let expected: Vec<String> = ["Alexander", "Bill", "Hasso", "Steve"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dict.dictionary(), expected.as_slice());
        assert_eq!(dict.unique_values_count(), 4);
        assert_eq!(dict.size(), 6);

        for i in 0..source.size() {
            assert_eq!(
                dict.get_typed(ChunkOffset(i as u32)).unwrap(),
                source.get_typed(ChunkOffset(i as u32)).unwrap()
            );
        }

        assert_eq!(dict.get_typed(ChunkOffset(0)).unwrap().as_str(), "Bill");
        assert_eq!(dict.get_typed(ChunkOffset(2)).unwrap().as_str(), "Alexander");
    }

    #[test]
    fn bounds_on_even_integers() {
        let mut source: ValueSegment<i32> = ValueSegment::new();
        for v in [0, 2, 4, 6, 8, 10] {
            source.append_typed(v);
        }
        let dict = DictionarySegment::from_value_segment(&source);

        assert_eq!(dict.lower_bound(&4), ValueId(2));
        assert_eq!(dict.upper_bound(&4), ValueId(3));
        assert_eq!(dict.lower_bound(&5), ValueId(3));
        assert_eq!(dict.upper_bound(&5), ValueId(3));
        assert_eq!(dict.lower_bound(&15), INVALID_VALUE_ID);
        assert_eq!(dict.upper_bound(&15), INVALID_VALUE_ID);
    }

    #[test]
    fn width_and_memory_track_cardinality_not_value_count() {
        let mut source: ValueSegment<i32> = ValueSegment::new();
        for v in 0..10 {
            source.append_typed(v);
        }
        let dict = DictionarySegment::from_value_segment(&source);
        assert_eq!(dict.attribute_vector().width(), AttributeVectorWidth::W8);
        assert_eq!(dict.estimate_memory_usage(), 10 * 4 + 10 * 1);

        for _ in 0..10 {
            source.append_typed(1);
        }
        let dict = DictionarySegment::from_value_segment(&source);
        assert_eq!(dict.unique_values_count(), 11);
        assert_eq!(dict.attribute_vector().width(), AttributeVectorWidth::W8);
        assert_eq!(dict.estimate_memory_usage(), 11 * 4 + 20 * 1);
    }

    #[test]
    fn append_fails_immutable() {
        let (_source, mut dict) = build(&["a"]);
        assert!(matches!(dict.append(Variant::String("b".into())), Err(StorageError::Immutable)));
    }
}
