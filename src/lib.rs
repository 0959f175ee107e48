//! A columnar, chunked, in-memory relational storage engine with a
//! minimal query-operator pipeline.
//!
//! Tables are partitioned into fixed-size [`Chunk`]s; each chunk holds one
//! [`Segment`] per column, either an append-only [`ValueSegment`], a
//! dictionary-compressed [`DictionarySegment`], or a zero-copy
//! [`ReferenceSegment`] into another table. [`TableScan`] is the one
//! operator in the core query pipeline: it reads any of the three segment
//! kinds uniformly and always emits reference segments.

mod attribute_vector;
mod catalog;
mod chunk;
mod error;
mod ids;
mod operator;
mod segment;
mod table;
mod type_dispatch;
mod variant;

pub use attribute_vector::{AttributeVector, AttributeVectorWidth};
pub use catalog::StorageManager;
pub use chunk::Chunk;
pub use error::{Result, StorageError};
pub use ids::{ChunkId, ChunkOffset, ColumnId, RowId, ValueId, INVALID_VALUE_ID, PosList};
pub use operator::{GetTable, Operator, Print, ScanType, TableScan, TableWrapper};
pub use segment::{DictionarySegment, ReferenceSegment, Segment, ValueSegment};
pub use table::Table;
pub use type_dispatch::ScalarType;
pub use variant::{DataType, Variant};
