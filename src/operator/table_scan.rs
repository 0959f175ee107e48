use std::sync::Arc;

use crate::chunk::Chunk;
use crate::error::{Result, StorageError};
use crate::ids::{ChunkId, ChunkOffset, ColumnId, PosList, RowId};
use crate::segment::{DictionarySegment, ReferenceSegment, Segment, ValueSegment};
use crate::table::Table;
use crate::type_dispatch::ScalarType;
use crate::variant::Variant;
use crate::with_scalar_type;

use super::{ExecutionState, Operator};

/// The six relational comparators a scan predicate can use (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ScanType {
    fn matches<T: ScalarType>(self, value: &T, search: &T) -> bool {
        use std::cmp::Ordering::*;
        match (self, value.cmp_total(search)) {
            (ScanType::Equal, ord) => ord == Equal,
            (ScanType::NotEqual, ord) => ord != Equal,
            (ScanType::Less, ord) => ord == Less,
            (ScanType::LessEqual, ord) => ord != Greater,
            (ScanType::Greater, ord) => ord == Greater,
            (ScanType::GreaterEqual, ord) => ord != Less,
        }
    }
}

/// A predicate scan: `column_id <scan_type> search_value`.
///
/// Produces a table with the same schema as its input, whose chunk(s)
/// contain only [`ReferenceSegment`]s over the underlying data-bearing
/// table. Matches scenarios S5/S6 of the append/scan/compose walkthrough:
/// scanning a value- or dictionary-backed table yields references into
/// that table directly, and scanning the output of an earlier scan
/// "sees through" it to the same original table rather than nesting
/// references.
#[derive(Debug)]
pub struct TableScan {
    input: Arc<dyn Operator>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: Variant,
    state: ExecutionState,
}

impl TableScan {
    pub fn new(input: Arc<dyn Operator>, column_id: ColumnId, scan_type: ScanType, search_value: Variant) -> Self {
        Self {
            input,
            column_id,
            scan_type,
            search_value,
            state: ExecutionState::new(),
        }
    }

    fn run(&self) -> Result<Arc<Table>> {
        let input_table = self.input.get_output().ok_or_else(|| StorageError::PreconditionViolated {
            reason: "TableScan's input has not executed".to_string(),
        })?;

        let column_type = input_table.column_type(self.column_id)?;
        let search_type = self.search_value.data_type();
        if search_type != column_type {
            return Err(StorageError::TypeMismatch {
                expected: column_type,
                got: search_type,
            });
        }

        tracing::trace!(
            column = %self.column_id,
            scan_type = ?self.scan_type,
            search_value = %self.search_value,
            rows_in = input_table.row_count(),
            "table scan starting"
        );

        let (pos_list, underlying_table) = with_scalar_type!(column_type, |T| scan_column::<T>(
            &input_table,
            self.column_id,
            self.scan_type,
            &self.search_value,
        ))?;

        tracing::trace!(
            column = %self.column_id,
            rows_out = pos_list.len(),
            "table scan matched rows"
        );

        let output = Table::new(input_table.target_chunk_size())?;
        for i in 0..input_table.column_count() {
            let column_id = ColumnId::from(i);
            output.add_column(input_table.column_name(column_id)?, input_table.column_type(column_id)?)?;
        }

        // An empty match set emits zero output chunks rather than one empty
        // chunk (§9 open question) — there is no row to anchor a PosList or
        // an underlying table to, and a result table with no rows and no
        // chunks is a cleaner signal than a chunk whose segments are
        // technically valid but vacuous.
        if !pos_list.is_empty() {
            let pos_list = Arc::new(pos_list);
            let segments: Vec<Box<dyn Segment>> = (0..output.column_count())
                .map(|i| {
                    Box::new(ReferenceSegment::new(
                        Arc::clone(&underlying_table),
                        ColumnId::from(i),
                        Arc::clone(&pos_list),
                    )) as Box<dyn Segment>
                })
                .collect();
            output.emplace_chunk(Chunk::from_segments(segments));
        }

        Ok(Arc::new(output))
    }
}

impl Operator for TableScan {
    fn execute(&self) -> Result<()> {
        self.state.run_once(|| self.run())
    }

    fn get_output(&self) -> Option<Arc<Table>> {
        self.state.output()
    }
}

/// Scans every chunk of `input_table`'s `column_id`, type-dispatched to the
/// concrete scalar type `T`. Returns the matching rows (already resolved to
/// positions in the data-bearing table) and a handle to that table.
fn scan_column<T: ScalarType>(
    input_table: &Arc<Table>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: &Variant,
) -> Result<(PosList, Arc<Table>)> {
    let search_typed =
        T::from_variant(search_value).expect("caller already checked search_value's tag against the column type");

    let mut pos_list = PosList::new();
    let mut underlying_table: Option<Arc<Table>> = None;

    for chunk_index in 0..input_table.chunk_count() {
        let chunk_id = ChunkId::from(chunk_index);
        let chunk = input_table.get_chunk(chunk_id)?;

        let rows = chunk.with_segment(column_id, |segment| -> Result<Vec<RowId>> {
            if let Some(reference) = segment.as_any().downcast_ref::<ReferenceSegment>() {
                if underlying_table.is_none() {
                    underlying_table = Some(Arc::clone(reference.referenced_table()));
                }
                scan_reference_segment::<T>(reference, scan_type, &search_typed)
            } else if let Some(dictionary) = segment.as_any().downcast_ref::<DictionarySegment<T>>() {
                underlying_table.get_or_insert_with(|| Arc::clone(input_table));
                Ok(scan_dictionary_segment(dictionary, chunk_id, scan_type, &search_typed))
            } else if let Some(value) = segment.as_any().downcast_ref::<ValueSegment<T>>() {
                underlying_table.get_or_insert_with(|| Arc::clone(input_table));
                Ok(scan_value_segment(value, chunk_id, scan_type, &search_typed))
            } else {
                unreachable!("a column's data type determines a unique concrete segment kind for that type")
            }
        })??;
        pos_list.extend(rows);
    }

    let underlying_table = underlying_table.unwrap_or_else(|| Arc::clone(input_table));
    Ok((pos_list, underlying_table))
}

fn scan_value_segment<T: ScalarType>(segment: &ValueSegment<T>, chunk_id: ChunkId, scan_type: ScanType, search: &T) -> Vec<RowId> {
    segment
        .values()
        .iter()
        .enumerate()
        .filter_map(|(i, value)| scan_type.matches(value, search).then(|| RowId::new(chunk_id, ChunkOffset::from(i))))
        .collect()
}

/// Resolves the predicate to a value-id range via the dictionary's own
/// `lower_bound`/`upper_bound` and then tests only the attribute vector,
/// avoiding a per-row typed comparison (§4.9: "a high-quality implementation
/// uses bounds to reduce per-row work to a single id comparison").
///
/// The sentinel `INVALID_VALUE_ID` is `u32::MAX`, strictly larger than any
/// real dictionary index, so every branch below reads correctly even when
/// `lower`/`upper` come back invalid — e.g. `id >= lower` is false for every
/// real id when `lower` is the sentinel, which is exactly "search_value is
/// greater than everything in the dictionary, so nothing is `>= it`".
fn scan_dictionary_segment<T: ScalarType>(
    segment: &DictionarySegment<T>,
    chunk_id: ChunkId,
    scan_type: ScanType,
    search: &T,
) -> Vec<RowId> {
    let lower = segment.lower_bound(search);
    let upper = segment.upper_bound(search);
    let attribute_vector = segment.attribute_vector();

    (0..segment.size())
        .filter_map(|i| {
            let id = attribute_vector.get(i).expect("index within segment size is always valid");
            let matched = match scan_type {
                ScanType::Equal => id >= lower && id < upper,
                ScanType::NotEqual => !(id >= lower && id < upper),
                ScanType::Less => id < lower,
                ScanType::LessEqual => id < upper,
                ScanType::Greater => id >= upper,
                ScanType::GreaterEqual => id >= lower,
            };
            matched.then(|| RowId::new(chunk_id, ChunkOffset::from(i)))
        })
        .collect()
}

fn scan_reference_segment<T: ScalarType>(segment: &ReferenceSegment, scan_type: ScanType, search: &T) -> Result<Vec<RowId>> {
    let referenced_table = segment.referenced_table();
    let referenced_column_id = segment.referenced_column_id();
    let mut rows = Vec::new();
    for &row_id in segment.pos_list().iter() {
        let cell = referenced_table.get_cell(row_id.chunk_id, referenced_column_id, row_id.chunk_offset)?;
        let typed = T::from_variant(&cell).expect("a reference segment's referenced column always matches T");
        if scan_type.matches(&typed, search) {
            rows.push(row_id);
        }
    }
    Ok(rows)
}
