//! Attribute arrays: typed storage and the type-erased shared handle.
//!
//! ## Purpose
//!
//! This module provides [`DataArray`], a named tuple-major buffer of one
//! element type, and [`AnyArray`], a cheaply clonable handle that erases the
//! element type behind a [`DataType`] tag. Input arrays are shared through
//! `AnyArray` handles; pairs read them without copying.
//!
//! ## Key concepts
//!
//! ### Layout
//!
//! Values are stored tuple-major:
//! ```text
//! [ t0c0 t0c1 .. t0cC | t1c0 t1c1 .. t1cC | ... ]
//! ```
//! so component `j` of tuple `i` lives at `i * num_components + j`.
//!
//! ### Identity
//!
//! Two handles are "the same array" when they share one `Arc` allocation.
//! Exclusion is decided by identity, never by name or contents.
//!
//! ## Invariants
//!
//! * `values.len()` is always a multiple of `num_components`.
//! * `num_components >= 1`.

use std::sync::Arc;

use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::{DataType, Scalar};

// ============================================================================
// Typed Array
// ============================================================================

/// A named, tuple-major array of `T` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray<T> {
    name: String,
    num_components: usize,
    values: Vec<T>,
}

impl<T: Scalar> DataArray<T> {
    /// Create an empty array. A component count of zero is raised to one.
    pub fn new(name: impl Into<String>, num_components: usize) -> Self {
        Self {
            name: name.into(),
            num_components: num_components.max(1),
            values: Vec::new(),
        }
    }

    /// Build an array from flat tuple-major values.
    pub fn from_vec(
        name: impl Into<String>,
        num_components: usize,
        values: Vec<T>,
    ) -> Result<Self, ArrayListError> {
        if num_components == 0 || values.len() % num_components != 0 {
            return Err(ArrayListError::InvalidValueCount {
                len: values.len(),
                num_components,
            });
        }
        Ok(Self {
            name: name.into(),
            num_components,
            values,
        })
    }

    /// Assemble from parts already known to form whole tuples.
    pub(crate) fn from_parts(name: String, num_components: usize, values: Vec<T>) -> Self {
        debug_assert!(num_components > 0 && values.len() % num_components == 0);
        Self {
            name,
            num_components,
            values,
        }
    }

    /// Build an array of `num_tuples` tuples, every component set to `value`.
    pub fn filled(
        name: impl Into<String>,
        num_components: usize,
        num_tuples: usize,
        value: T,
    ) -> Self {
        let num_components = num_components.max(1);
        Self {
            name: name.into(),
            num_components,
            values: vec![value; num_tuples * num_components],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Number of tuples (records).
    pub fn num_tuples(&self) -> usize {
        self.values.len() / self.num_components
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All components of tuple `i`.
    pub fn tuple(&self, i: usize) -> &[T] {
        let start = i * self.num_components;
        &self.values[start..start + self.num_components]
    }

    /// Component `j` of tuple `i`.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> T {
        self.values[i * self.num_components + j]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Append one tuple. Only full tuples are accepted.
    pub fn push_tuple(&mut self, tuple: &[T]) -> Result<(), ArrayListError> {
        if tuple.len() != self.num_components {
            return Err(ArrayListError::InvalidValueCount {
                len: tuple.len(),
                num_components: self.num_components,
            });
        }
        self.values.extend_from_slice(tuple);
        Ok(())
    }

    /// Wrap in a shared, type-erased handle.
    pub fn into_any(self) -> AnyArray {
        T::wrap(Arc::new(self))
    }
}

// ============================================================================
// Type-Erased Handle
// ============================================================================

/// Identity of an array allocation, used for exclusion bookkeeping and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(usize);

/// A shared array of any supported element type.
#[derive(Debug, Clone)]
pub enum AnyArray {
    Int8(Arc<DataArray<i8>>),
    UInt8(Arc<DataArray<u8>>),
    Int16(Arc<DataArray<i16>>),
    UInt16(Arc<DataArray<u16>>),
    Int32(Arc<DataArray<i32>>),
    UInt32(Arc<DataArray<u32>>),
    Int64(Arc<DataArray<i64>>),
    UInt64(Arc<DataArray<u64>>),
    Float32(Arc<DataArray<f32>>),
    Float64(Arc<DataArray<f64>>),
}

/// Run `$body` with `$arr` bound to the typed `Arc<DataArray<T>>` inside an
/// [`AnyArray`]. Within `$body`, `T` is not nameable; generic helpers infer it.
#[macro_export]
macro_rules! with_array {
    ($any:expr, $arr:ident => $body:expr) => {
        match $any {
            $crate::primitives::array::AnyArray::Int8($arr) => $body,
            $crate::primitives::array::AnyArray::UInt8($arr) => $body,
            $crate::primitives::array::AnyArray::Int16($arr) => $body,
            $crate::primitives::array::AnyArray::UInt16($arr) => $body,
            $crate::primitives::array::AnyArray::Int32($arr) => $body,
            $crate::primitives::array::AnyArray::UInt32($arr) => $body,
            $crate::primitives::array::AnyArray::Int64($arr) => $body,
            $crate::primitives::array::AnyArray::UInt64($arr) => $body,
            $crate::primitives::array::AnyArray::Float32($arr) => $body,
            $crate::primitives::array::AnyArray::Float64($arr) => $body,
        }
    };
}

impl AnyArray {
    pub fn data_type(&self) -> DataType {
        match self {
            AnyArray::Int8(_) => DataType::Int8,
            AnyArray::UInt8(_) => DataType::UInt8,
            AnyArray::Int16(_) => DataType::Int16,
            AnyArray::UInt16(_) => DataType::UInt16,
            AnyArray::Int32(_) => DataType::Int32,
            AnyArray::UInt32(_) => DataType::UInt32,
            AnyArray::Int64(_) => DataType::Int64,
            AnyArray::UInt64(_) => DataType::UInt64,
            AnyArray::Float32(_) => DataType::Float32,
            AnyArray::Float64(_) => DataType::Float64,
        }
    }

    pub fn name(&self) -> &str {
        with_array!(self, a => a.name())
    }

    pub fn num_components(&self) -> usize {
        with_array!(self, a => a.num_components())
    }

    pub fn num_tuples(&self) -> usize {
        with_array!(self, a => a.num_tuples())
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> ArrayId {
        with_array!(self, a => ArrayId(Arc::as_ptr(a) as *const () as usize))
    }

    /// Whether both handles refer to the same allocation.
    pub fn ptr_eq(&self, other: &AnyArray) -> bool {
        self.id() == other.id()
    }

    /// Typed view, if this array stores `T`.
    pub fn downcast<T: Scalar>(&self) -> Option<&Arc<DataArray<T>>> {
        T::downcast(self)
    }

    /// Component `j` of tuple `i`, widened to `f64`.
    pub fn component_f64(&self, i: usize, j: usize) -> f64 {
        with_array!(self, a => a.value(i, j).to_f64())
    }
}

impl<T: Scalar> From<DataArray<T>> for AnyArray {
    fn from(array: DataArray<T>) -> Self {
        array.into_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_partial_tuples() {
        let err = DataArray::from_vec("v", 3, vec![1.0f32, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ArrayListError::InvalidValueCount {
                len: 2,
                num_components: 3
            }
        );
    }

    #[test]
    fn identity_is_by_allocation() {
        let a = DataArray::from_vec("s", 1, vec![1i32, 2, 3]).unwrap();
        let b = a.clone();
        let a = a.into_any();
        let b = b.into_any();
        let a2 = a.clone();

        assert!(a.ptr_eq(&a2));
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.num_tuples(), 3);
        assert_eq!(a.data_type(), DataType::Int32);
        assert!(a.downcast::<i32>().is_some());
        assert!(a.downcast::<f32>().is_none());
    }

    #[test]
    fn tuple_access() {
        let a = DataArray::from_vec("v", 2, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(a.tuple(1), &[3, 4]);
        assert_eq!(a.value(2, 1), 6);
        assert_eq!(a.clone().into_any().component_f64(0, 1), 2.0);
    }
}
