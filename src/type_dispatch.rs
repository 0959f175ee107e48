//! Maps a runtime [`DataType`] tag to a monomorphized typed branch.
//!
//! The spec's reference implementation leans on a template + higher-order
//! "resolve data type" helper to get from a runtime type tag to compiled
//! code for that type. Rust has no direct equivalent (no function that
//! returns "a type"), so this crate uses the idiomatic substitute: a closed
//! [`ScalarType`] trait implemented once per supported scalar, plus
//! [`with_scalar_type`], a macro that expands a callback across all five
//! arms. Call sites look almost exactly like the reference's
//! `resolve_data_type(type, |type| { ... })` callback.

use std::cmp::Ordering;

use crate::variant::{DataType, Variant};

/// A scalar type this engine knows how to store in a column.
///
/// Implemented exactly once per member of the closed scalar set
/// (`i32`, `i64`, `f32`, `f64`, `String`). [`Self::cmp_total`] stands in for
/// `Ord` (which `f32`/`f64` don't implement): ints and strings delegate to
/// their natural `Ord`, floats use strict IEEE-754 `partial_cmp`. As with
/// the rest of this crate, NaN payloads are out of scope (see the NULLs
/// non-goal) — `cmp_total` panics on an incomparable pair rather than
/// silently picking an ordering.
pub trait ScalarType: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    const DATA_TYPE: DataType;

    fn from_variant(value: &Variant) -> Option<Self>;
    fn into_variant(self) -> Variant;
    fn cmp_total(&self, other: &Self) -> Ordering;
}

impl ScalarType for i32 {
    const DATA_TYPE: DataType = DataType::Int32;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_i32()
    }

    fn into_variant(self) -> Variant {
        Variant::Int32(self)
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl ScalarType for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_i64()
    }

    fn into_variant(self) -> Variant {
        Variant::Int64(self)
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl ScalarType for f32 {
    const DATA_TYPE: DataType = DataType::Float32;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_f32()
    }

    fn into_variant(self) -> Variant {
        Variant::Float32(self)
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .expect("NaN values are not supported by this storage engine")
    }
}

impl ScalarType for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_f64()
    }

    fn into_variant(self) -> Variant {
        Variant::Float64(self)
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .expect("NaN values are not supported by this storage engine")
    }
}

impl ScalarType for String {
    const DATA_TYPE: DataType = DataType::String;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn into_variant(self) -> Variant {
        Variant::String(self)
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        // Lexicographic byte order, per spec.
        self.as_bytes().cmp(other.as_bytes())
    }
}

/// Expands `$body` once per supported scalar type, binding `$ty` to the
/// concrete Rust type (`i32`, `i64`, `f32`, `f64`, `String`) for that arm.
///
/// Mirrors the reference's `resolve_data_type(type, |type| { ... })`
/// pattern: callers write generic code once and this macro compiles it
/// against whichever concrete type matches `$data_type` at runtime.
#[macro_export]
macro_rules! with_scalar_type {
    ($data_type:expr, |$ty:ident| $body:expr) => {
        match $data_type {
            $crate::DataType::Int32 => {
                type $ty = i32;
                $body
            }
            $crate::DataType::Int64 => {
                type $ty = i64;
                $body
            }
            $crate::DataType::Float32 => {
                type $ty = f32;
                $body
            }
            $crate::DataType::Float64 => {
                type $ty = f64;
                $body
            }
            $crate::DataType::String => {
                type $ty = String;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrip_through_variant() {
        assert_eq!(i32::from_variant(&Variant::Int32(5)), Some(5));
        assert_eq!(Variant::Int32(5).as_i32().map(i32::into_variant), Some(Variant::Int32(5)));
    }

    #[test]
    fn with_scalar_type_dispatches() {
        let n = with_scalar_type!(DataType::Int64, |T| std::mem::size_of::<T>());
        assert_eq!(n, 8);
    }

    #[test]
    fn string_ordering_is_lexicographic_by_byte() {
        assert_eq!("Bill".to_string().cmp_total(&"Steve".to_string()), Ordering::Less);
    }
}
