//! Input abstraction for attribute data.
//!
//! This module defines the `ArrayInput` trait which lets host data (slices,
//! vectors, and ndarray matrices) become a [`DataArray`] with a checked shape.

use ndarray::{ArrayBase, Data, Ix1, Ix2};

use crate::primitives::array::DataArray;
use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::Scalar;

/// Types that can be turned into a tuple-major attribute array.
pub trait ArrayInput<T: Scalar> {
    /// Copy into a named array of `num_components`-wide tuples.
    fn to_data_array(
        &self,
        name: &str,
        num_components: usize,
    ) -> Result<DataArray<T>, ArrayListError>;
}

impl<T: Scalar> ArrayInput<T> for [T] {
    fn to_data_array(
        &self,
        name: &str,
        num_components: usize,
    ) -> Result<DataArray<T>, ArrayListError> {
        DataArray::from_vec(name, num_components, self.to_vec())
    }
}

impl<T: Scalar> ArrayInput<T> for Vec<T> {
    fn to_data_array(
        &self,
        name: &str,
        num_components: usize,
    ) -> Result<DataArray<T>, ArrayListError> {
        self.as_slice().to_data_array(name, num_components)
    }
}

impl<T: Scalar, S> ArrayInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn to_data_array(
        &self,
        name: &str,
        num_components: usize,
    ) -> Result<DataArray<T>, ArrayListError> {
        DataArray::from_vec(name, num_components, self.iter().copied().collect())
    }
}

/// Rows are tuples, columns are components. `num_components` must match the
/// column count.
impl<T: Scalar, S> ArrayInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn to_data_array(
        &self,
        name: &str,
        num_components: usize,
    ) -> Result<DataArray<T>, ArrayListError> {
        let (rows, cols) = self.dim();
        if cols != num_components {
            return Err(ArrayListError::InvalidInput(format!(
                "matrix for '{name}' has {cols} columns, expected {num_components} components"
            )));
        }
        // `iter` walks in logical row-major order even for non-contiguous views.
        let mut values = Vec::with_capacity(rows * cols);
        values.extend(self.iter().copied());
        DataArray::from_vec(name, num_components, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn matrix_rows_become_tuples() {
        let m = array![[1.0f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let arr = m.to_data_array("vec", 2).unwrap();
        assert_eq!(arr.num_tuples(), 3);
        assert_eq!(arr.tuple(1), &[3.0, 4.0]);

        let transposed = m.t();
        let arr = transposed.to_data_array("t", 3).unwrap();
        assert_eq!(arr.tuple(0), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn column_mismatch_is_rejected() {
        let m = array![[1i32, 2, 3]];
        assert!(m.to_data_array("x", 2).is_err());
        assert!(vec![1u8, 2, 3].to_data_array("y", 2).is_err());
    }
}
