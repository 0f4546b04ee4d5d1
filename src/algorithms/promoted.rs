//! Cross-type pairs with a wider output.
//!
//! ## Purpose
//!
//! [`PromotedPair`] binds an input of element type `I` to an output of a
//! different type `O`, typically `f32` or `f64` receiving integer data. The
//! output keeps the fractional part of every interpolated or averaged value
//! instead of truncating it back into the input type.
//!
//! ## Design notes
//!
//! * `copy` casts each value with `as` semantics (`I as O`).
//! * All arithmetic accumulates in `f64` and narrows to `O` once.
//! * The null value is expressed in the output type.

use std::sync::Arc;

use num_traits::AsPrimitive;

use crate::algorithms::pair::{ArrayPair, Binding, RecordSlot};
use crate::engine::validator::Validator;
use crate::primitives::array::{AnyArray, DataArray};
use crate::primitives::buffer::OutputBuffer;
use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::{DataType, Scalar};

// ============================================================================
// Promotion Policy
// ============================================================================

/// Output type choice for integral inputs when the coordinator allocates
/// outputs. Float inputs always keep their type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Promotion {
    /// Keep the input type.
    None,

    /// Promote integral inputs to `f32`.
    #[default]
    Float32,

    /// Promote integral inputs to `f64`.
    Float64,
}

impl Promotion {
    /// Output type to allocate for an input of type `input`, if it differs.
    pub fn target_for(self, input: DataType) -> Option<DataType> {
        if input.is_float() {
            return None;
        }
        match self {
            Promotion::None => None,
            Promotion::Float32 => Some(DataType::Float32),
            Promotion::Float64 => Some(DataType::Float64),
        }
    }

    /// Whether any promotion is requested.
    pub fn is_enabled(self) -> bool {
        self != Promotion::None
    }
}

// ============================================================================
// Promoted Pair
// ============================================================================

/// Pair reading `I` values and writing `O` values.
#[derive(Debug)]
pub struct PromotedPair<I: Scalar, O: Scalar> {
    binding: Binding<I, O>,
}

impl<I, O> PromotedPair<I, O>
where
    I: Scalar + AsPrimitive<O>,
    O: Scalar,
{
    /// Bind `input` to a new `O` output named `name` holding `num_out`
    /// records, each initialized to `null_value`.
    pub fn allocate(
        input: Arc<DataArray<I>>,
        name: impl Into<String>,
        num_out: usize,
        null_value: O,
    ) -> Self {
        let output = OutputBuffer::new(name, input.num_components(), num_out, null_value);
        Self {
            binding: Binding::new(input, output, num_out, null_value),
        }
    }

    /// Bind `input` to a caller-supplied `O` output, grown to `num_out`
    /// records if it is smaller.
    pub fn with_output(
        input: Arc<DataArray<I>>,
        output: DataArray<O>,
        num_out: usize,
        null_value: O,
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

    #[inline(always)]
    fn cast(v: I) -> O {
        <I as AsPrimitive<O>>::as_(v)
    }
}

impl<I, O> ArrayPair for PromotedPair<I, O>
where
    I: Scalar + AsPrimitive<O>,
    O: Scalar,
{
    fn num_tuples(&self) -> usize {
        self.binding.num_tuples()
    }

    fn num_components(&self) -> usize {
        self.binding.num_components()
    }

    fn input_type(&self) -> DataType {
        I::DATA_TYPE
    }

    fn output_type(&self) -> DataType {
        O::DATA_TYPE
    }

    fn output_name(&self) -> &str {
        self.binding.output_name()
    }

    fn output_tuples(&self) -> usize {
        self.binding.output_tuples()
    }

    fn copy(&self, in_id: usize, out: &RecordSlot) {
        self.binding
            .copy_with(in_id, out, |id, j| Self::cast(self.binding.input_value(id, j)));
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
        self.binding.interpolate_edge(v0, v1, t, out, |id, j| {
            Self::cast(self.binding.input_value(id, j))
        });
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: Vec<i32>) -> Arc<DataArray<i32>> {
        Arc::new(DataArray::from_vec("in", 1, values).unwrap())
    }

    #[test]
    fn average_keeps_fraction() {
        let mut pair: PromotedPair<i32, f64> = PromotedPair::allocate(ints(vec![1, 2, 4]), "out", 2, 0.0);
        pair.average(&[0, 1, 2], &RecordSlot::exclusive(0));
        pair.interpolate_edge(0, 1, 0.25, &RecordSlot::exclusive(1));

        let out = pair.output_array();
        let values = out.downcast::<f64>().unwrap().values().to_vec();
        assert!((values[0] - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(values[1], 1.25);
        assert_eq!(pair.input_type(), DataType::Int32);
        assert_eq!(pair.output_type(), DataType::Float64);
    }

    #[test]
    fn promotion_targets() {
        assert_eq!(Promotion::Float64.target_for(DataType::Int16), Some(DataType::Float64));
        assert_eq!(Promotion::Float32.target_for(DataType::Float64), None);
        assert_eq!(Promotion::None.target_for(DataType::UInt8), None);
        assert_eq!(Promotion::default(), Promotion::Float32);
    }

    #[test]
    fn unsigned_edge_does_not_wrap() {
        let input = Arc::new(DataArray::from_vec("u", 1, vec![200u8, 100]).unwrap());
        let mut pair: PromotedPair<u8, f32> = PromotedPair::allocate(input, "out", 1, 0.0);
        pair.interpolate_edge(0, 1, 0.5, &RecordSlot::exclusive(0));
        let out = pair.output_array();
        assert_eq!(out.downcast::<f32>().unwrap().values(), &[150.0]);
    }
}
