//! Same-type pairs.
//!
//! ## Purpose
//!
//! [`TypedPair`] binds an input and an output of one element type `T`. It is
//! the pair used when an attribute keeps its type end to end.
//!
//! ## Design notes
//!
//! * `copy` moves values without going through `f64`, so 64-bit integers
//!   are transferred bit-exactly.
//! * Every arithmetic operation accumulates in `f64` and narrows to `T` once.
//!   For narrow integer types the result is truncated toward zero; use a
//!   [`PromotedPair`](crate::algorithms::promoted::PromotedPair) to keep the
//!   fractional part.
//! * A self-interpolating pair has no separate input: every operation reads
//!   the output records, including ones written earlier in the session. In a
//!   parallel pass those reads follow the `interpolate_output` rules.

use std::sync::Arc;

use crate::algorithms::pair::{ArrayPair, Binding, RecordSlot};
use crate::engine::validator::Validator;
use crate::primitives::array::{AnyArray, DataArray};
use crate::primitives::buffer::OutputBuffer;
use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::{DataType, Scalar};

/// Pair whose input and output share element type `T`.
#[derive(Debug)]
pub struct TypedPair<T: Scalar> {
    binding: Binding<T, T>,
}

impl<T: Scalar> TypedPair<T> {
    /// Bind `input` to a new output named `name` holding `num_out` records,
    /// each initialized to `null_value`.
    pub fn allocate(
        input: Arc<DataArray<T>>,
        name: impl Into<String>,
        num_out: usize,
        null_value: T,
    ) -> Self {
        let output = OutputBuffer::new(name, input.num_components(), num_out, null_value);
        Self {
            binding: Binding::new(input, output, num_out, null_value),
        }
    }

    /// Bind `input` to a caller-supplied output, grown to `num_out` records if
    /// it is smaller. Existing output values are kept.
    pub fn with_output(
        input: Arc<DataArray<T>>,
        output: DataArray<T>,
        num_out: usize,
        null_value: T,
    ) -> Result<Self, ArrayListError> {
        Validator::validate_components(
            output.name(),
            input.num_components(),
            output.num_components(),
        )?;
        let output = OutputBuffer::from_data_array(output);
        Ok(Self {
            binding: Binding::new(input, output, num_out, null_value),
        })
    }

    /// Pair that interpolates an array from its own values. The output starts
    /// as a copy of `input` grown to `num_out` records, and all operations
    /// read from it.
    pub fn self_interpolating(input: Arc<DataArray<T>>, num_out: usize, null_value: T) -> Self {
        let output = OutputBuffer::from_data_array((*input).clone());
        Self {
            binding: Binding::new(input, output, num_out, null_value).reading_output(),
        }
    }

    /// Whether operands come from the output records.
    pub fn is_self_interpolating(&self) -> bool {
        self.binding.reads_output()
    }

    #[inline(always)]
    fn fetch(&self, out: &RecordSlot, id: usize, j: usize) -> T {
        if self.binding.reads_output() {
            self.binding.output_value(out, id, j)
        } else {
            self.binding.input_value(id, j)
        }
    }
}

impl<T: Scalar> ArrayPair for TypedPair<T> {
    fn num_tuples(&self) -> usize {
        self.binding.num_tuples()
    }

    fn num_components(&self) -> usize {
        self.binding.num_components()
    }

    fn input_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn output_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn output_name(&self) -> &str {
        self.binding.output_name()
    }

    fn output_tuples(&self) -> usize {
        self.binding.output_tuples()
    }

    fn copy(&self, in_id: usize, out: &RecordSlot) {
        self.binding.copy_with(in_id, out, |id, j| self.fetch(out, id, j));
    }

    fn interpolate(&self, ids: &[usize], weights: &[f64], out: &RecordSlot) {
        self.binding.interpolate(ids, weights, out);
    }

    fn interpolate_output(&self, ids: &[usize], weights: &[f64], out: &RecordSlot) {
        self.binding.interpolate_output(ids, weights, out);
    }

    fn average(&self, ids: &[usize], out: &RecordSlot) {
        self.binding.average(ids, out);
    }

    fn weighted_average(&self, ids: &[usize], weights: &[f64], out: &RecordSlot) {
        self.binding.interpolate(ids, weights, out);
    }

    fn interpolate_edge(&self, v0: usize, v1: usize, t: f64, out: &RecordSlot) {
        self.binding
            .interpolate_edge(v0, v1, t, out, |id, j| self.fetch(out, id, j));
    }

    fn assign_null_value(&self, out: &RecordSlot) {
        self.binding.assign_null_value(out);
    }

    fn realloc(&mut self, num_tuples: usize) {
        self.binding.realloc(num_tuples);
    }

    fn output_array(&mut self) -> AnyArray {
        self.binding.output_array()
    }

    fn into_output(self: Box<Self>) -> AnyArray {
        self.binding.into_output()
    }
}
