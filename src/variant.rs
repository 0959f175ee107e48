//! [`DataType`] is the closed set of scalar kinds this engine understands;
//! [`Variant`] is a tagged union holding exactly one such value.

use std::cmp::Ordering;
use std::fmt;

/// The closed set of scalar column types.
///
/// Maps 1:1 onto the canonical type-tag strings from §6 of the spec
/// (`"int"`, `"long"`, `"float"`, `"double"`, `"string"`); see
/// [`DataType::tag`] / [`DataType::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl DataType {
    /// The canonical external type-tag string for this type (§6).
    pub fn tag(self) -> &'static str {
        match self {
            DataType::Int32 => "int",
            DataType::Int64 => "long",
            DataType::Float32 => "float",
            DataType::Float64 => "double",
            DataType::String => "string",
        }
    }

    /// Parses a canonical type-tag string. Returns `None` for anything else
    /// — callers at the API boundary turn that into [`crate::StorageError::TypeMismatch`]
    /// or a panic, depending on whether the tag came from outside or from
    /// the engine's own bookkeeping.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(DataType::Int32),
            "long" => Some(DataType::Int64),
            "float" => Some(DataType::Float32),
            "double" => Some(DataType::Float64),
            "string" => Some(DataType::String),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A tagged union holding one scalar of any [`DataType`].
///
/// Equality and ordering are only meaningful when both operands carry the
/// same tag. Comparing mismatched tags is a contract violation — per the
/// design notes, we make that an explicit panic rather than an implicit
/// coercion, since a silently-wrong ordering on mixed types would be far
/// worse than a loud one.
#[derive(Debug, Clone)]
pub enum Variant {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
}

impl Variant {
    pub fn data_type(&self) -> DataType {
        match self {
            Variant::Int32(_) => DataType::Int32,
            Variant::Int64(_) => DataType::Int64,
            Variant::Float32(_) => DataType::Float32,
            Variant::Float64(_) => DataType::Float64,
            Variant::String(_) => DataType::String,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Variant::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Variant::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Variant::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Int32(v) => write!(f, "{v}"),
            Variant::Int64(v) => write!(f, "{v}"),
            Variant::Float32(v) => write!(f, "{v}"),
            Variant::Float64(v) => write!(f, "{v}"),
            Variant::String(v) => write!(f, "{v}"),
        }
    }
}

impl PartialEq for Variant {
    /// Equality is only defined for operands of matching type. Mismatched
    /// tags panic — see the type-level docs above.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Int32(a), Variant::Int32(b)) => a == b,
            (Variant::Int64(a), Variant::Int64(b)) => a == b,
            (Variant::Float32(a), Variant::Float32(b)) => a == b,
            (Variant::Float64(a), Variant::Float64(b)) => a == b,
            (Variant::String(a), Variant::String(b)) => a == b,
            _ => panic!(
                "Variant equality is undefined across mismatched types ({:?} vs {:?})",
                self.data_type(),
                other.data_type()
            ),
        }
    }
}

impl PartialOrd for Variant {
    /// Ordering is only defined for operands of matching type: strict
    /// IEEE-754 comparison for floats, lexicographic byte order for
    /// strings. Mismatched tags panic — see the type-level docs above.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Variant::Int32(a), Variant::Int32(b)) => a.partial_cmp(b),
            (Variant::Int64(a), Variant::Int64(b)) => a.partial_cmp(b),
            (Variant::Float32(a), Variant::Float32(b)) => a.partial_cmp(b),
            (Variant::Float64(a), Variant::Float64(b)) => a.partial_cmp(b),
            (Variant::String(a), Variant::String(b)) => a.partial_cmp(b),
            _ => panic!(
                "Variant ordering is undefined across mismatched types ({:?} vs {:?})",
                self.data_type(),
                other.data_type()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for ty in [
            DataType::Int32,
            DataType::Int64,
            DataType::Float32,
            DataType::Float64,
            DataType::String,
        ] {
            assert_eq!(DataType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(DataType::from_tag("bogus"), None);
    }

    #[test]
    fn same_type_ordering() {
        assert!(Variant::Int32(3) < Variant::Int32(5));
        assert!(Variant::String("a".into()) < Variant::String("b".into()));
        assert_eq!(Variant::Float64(1.5), Variant::Float64(1.5));
    }

    #[test]
    #[should_panic(expected = "mismatched types")]
    fn mismatched_comparison_panics() {
        let _ = Variant::Int32(1) == Variant::String("1".into());
    }
}
