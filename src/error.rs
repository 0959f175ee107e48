//! The crate-wide error taxonomy.
//!
//! Every fallible operation in `colstore` returns [`Result<T>`], an alias
//! around [`StorageError`]. There is no retry or recovery policy: failures
//! are surfaced to the caller immediately, and a failed call leaves whatever
//! it touched unchanged from the caller's point of view.

/// The closed set of failure modes this crate can produce.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// A [`crate::Variant`]'s tag didn't match the column/segment it was used with.
    #[error("type mismatch: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        expected: crate::DataType,
        got: crate::DataType,
    },

    /// `add_column` was called after the table already had rows.
    #[error("schema is locked: table already has {row_count} row(s)")]
    SchemaLocked { row_count: usize },

    /// A row passed to `append` didn't have one value per column.
    #[error("arity mismatch: row has {got} value(s), table has {expected} column(s)")]
    ArityMismatch { expected: usize, got: usize },

    /// An index exceeded the size of the thing it indexed into.
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },

    /// `append` was called on a segment kind that doesn't support it.
    #[error("segment is immutable")]
    Immutable,

    /// A named table was looked up and isn't in the catalog.
    #[error("no such table: {name:?}")]
    NoSuchTable { name: String },

    /// A column id or name was looked up and doesn't exist on the table.
    #[error("no such column: {column:?}")]
    NoSuchColumn { column: String },

    /// `add_table` was called with a name that's already taken.
    #[error("table already exists: {name:?}")]
    Duplicate { name: String },

    /// An operator's `execute` was called a second time.
    #[error("operator already executed")]
    AlreadyExecuted,

    /// A precondition for the operation did not hold (e.g. compressing a
    /// chunk that isn't full yet).
    #[error("precondition violated: {reason}")]
    PreconditionViolated { reason: String },
}

/// Shorthand for `std::result::Result<T, StorageError>`, used everywhere in
/// this crate the way `ChunkResult`/`WriteResult` are used in the teacher.
pub type Result<T> = std::result::Result<T, StorageError>;
