//! Element types supported by attribute arrays.
//!
//! ## Purpose
//!
//! This module defines the [`DataType`] tag and the [`Scalar`] trait that ties
//! each tag to a Rust primitive. Pair construction switches on the tag once;
//! after that every transfer operation is monomorphized over concrete types.
//!
//! ## Design notes
//!
//! * Conversions use `as` semantics via `num_traits::AsPrimitive`: float to
//!   integer truncates toward zero and saturates at the type bounds, NaN
//!   becomes zero, and integer to float rounds to nearest.
//! * `f64` is the accumulation type for every operation.
//!
//! ## Invariants
//!
//! * `T::DATA_TYPE` round-trips through [`Scalar::wrap`] and
//!   [`Scalar::downcast`] for every implementing type.

use core::fmt;
use std::sync::Arc;

use num_traits::AsPrimitive;

use crate::primitives::array::{AnyArray, DataArray};

// ============================================================================
// Type Tag
// ============================================================================

/// Runtime tag for the element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl DataType {
    /// Whether values of this type are floating point.
    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Whether values of this type are integers.
    pub fn is_integral(self) -> bool {
        !self.is_float()
    }

    /// Size of one value in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }

    /// Short lowercase name, matching the Rust primitive.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int8 => "i8",
            DataType::UInt8 => "u8",
            DataType::Int16 => "i16",
            DataType::UInt16 => "u16",
            DataType::Int32 => "i32",
            DataType::UInt32 => "u32",
            DataType::Int64 => "i64",
            DataType::UInt64 => "u64",
            DataType::Float32 => "f32",
            DataType::Float64 => "f64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Scalar Trait
// ============================================================================

/// A primitive numeric type that can be stored in a [`DataArray`].
///
/// The `AsPrimitive<f32>` and `AsPrimitive<f64>` bounds let any scalar feed a
/// promoted float output without extra where-clauses at call sites.
pub trait Scalar:
    Copy
    + Default
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + 'static
    + AsPrimitive<f64>
    + AsPrimitive<f32>
{
    /// Tag of this type.
    const DATA_TYPE: DataType;

    /// Widen to the accumulation type.
    fn to_f64(self) -> f64;

    /// Narrow an accumulated value back to storage.
    fn from_f64(v: f64) -> Self;

    /// Erase the element type of a shared array.
    fn wrap(array: Arc<DataArray<Self>>) -> AnyArray;

    /// Recover the typed array if `array` stores this type.
    fn downcast(array: &AnyArray) -> Option<&Arc<DataArray<Self>>>;

    /// Owned variant of [`Scalar::downcast`]; gives the handle back on mismatch.
    fn downcast_owned(array: AnyArray) -> Result<Arc<DataArray<Self>>, AnyArray>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                #[inline(always)]
                fn to_f64(self) -> f64 {
                    <Self as AsPrimitive<f64>>::as_(self)
                }

                #[inline(always)]
                fn from_f64(v: f64) -> Self {
                    <f64 as AsPrimitive<Self>>::as_(v)
                }

                fn wrap(array: Arc<DataArray<Self>>) -> AnyArray {
                    AnyArray::$variant(array)
                }

                fn downcast(array: &AnyArray) -> Option<&Arc<DataArray<Self>>> {
                    match array {
                        AnyArray::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn downcast_owned(array: AnyArray) -> Result<Arc<DataArray<Self>>, AnyArray> {
                    match array {
                        AnyArray::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_scalar!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);
