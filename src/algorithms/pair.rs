//! The pair interface and the shared input/output binding.
//!
//! ## Purpose
//!
//! This module defines [`ArrayPair`], the capability set every pair exposes
//! regardless of its element types, and `Binding`, the input/output state
//! and arithmetic that [`TypedPair`](crate::algorithms::typed::TypedPair) and
//! [`PromotedPair`](crate::algorithms::promoted::PromotedPair) share.
//!
//! ## Design notes
//!
//! * Transfer operations take `&self` plus a [`RecordSlot`]; the slot is the
//!   only way to write an output record, so concurrent calls on disjoint
//!   records need no locks.
//! * `realloc`, snapshots and ownership transfer take `&mut self` or `self`
//!   and therefore cannot overlap a transfer call.
//! * Element types are fixed when a pair is built. Call sites only ever see
//!   `dyn ArrayPair`.
//!
//! ## Key concepts
//!
//! ### Operations
//!
//! | operation            | per component `j`                              |
//! |----------------------|------------------------------------------------|
//! | `copy`               | `out[j] = in[in_id][j]`                        |
//! | `interpolate`        | `out[j] = sum_i w_i * in[ids_i][j]`            |
//! | `interpolate_output` | `out[j] = sum_i w_i * out[ids_i][j]`           |
//! | `average`            | `out[j] = mean_i in[ids_i][j]`                 |
//! | `weighted_average`   | `out[j] = sum_i w_i * in[ids_i][j]`            |
//! | `interpolate_edge`   | `out[j] = in[v0][j] + t * (in[v1][j] - in[v0][j])` |
//! | `assign_null_value`  | `out[j] = null`                                |
//!
//! ## Invariants
//!
//! * Input and output share one component count for the pair's lifetime.
//! * Input reads satisfy `id < num_tuples()`; writes satisfy
//!   `out_id < output_tuples()`. Violations panic on the indexing.
//! * The output never shrinks.
//! * A self-interpolating binding reads every operand from its output, under
//!   the same slot guard as `interpolate_output`.

use core::fmt::Debug;
use std::sync::Arc;

use crate::math::accumulate::{lerp, mean, weighted_sum};
use crate::primitives::array::{AnyArray, DataArray};
pub use crate::primitives::buffer::RecordSlot;
use crate::primitives::buffer::OutputBuffer;
use crate::primitives::scalar::{DataType, Scalar};

// ============================================================================
// Pair Interface
// ============================================================================

/// Type-erased transfer operations on one input/output array pair.
///
/// The element count of `ids` is the number of contributions; `weights` must
/// be at least as long.
pub trait ArrayPair: Send + Sync + Debug {
    /// Number of input records (N).
    fn num_tuples(&self) -> usize;

    /// Components per record (C).
    fn num_components(&self) -> usize;

    fn input_type(&self) -> DataType;

    fn output_type(&self) -> DataType;

    fn output_name(&self) -> &str;

    /// Current output capacity in records.
    fn output_tuples(&self) -> usize;

    /// Copy input record `in_id` into the slot's record, cast to the output type.
    fn copy(&self, in_id: usize, out: &RecordSlot);

    /// Weighted sum of input records.
    fn interpolate(&self, ids: &[usize], weights: &[f64], out: &RecordSlot);

    /// Weighted sum of already written output records.
    ///
    /// # Panics
    ///
    /// Panics if an id names a record that the current pass may be writing.
    fn interpolate_output(&self, ids: &[usize], weights: &[f64], out: &RecordSlot);

    /// Unweighted mean of input records.
    fn average(&self, ids: &[usize], out: &RecordSlot);

    /// Weighted sum of input records whose weights should sum to one.
    /// The weights are used as given.
    fn weighted_average(&self, ids: &[usize], weights: &[f64], out: &RecordSlot);

    /// Linear interpolation between input records `v0` and `v1`.
    fn interpolate_edge(&self, v0: usize, v1: usize, t: f64, out: &RecordSlot);

    /// Fill the slot's record with the pair's null value.
    fn assign_null_value(&self, out: &RecordSlot);

    /// Grow the output to `num_tuples` records. Smaller requests are ignored.
    fn realloc(&mut self, num_tuples: usize);

    /// Snapshot of the output as it stands.
    fn output_array(&mut self) -> AnyArray;

    /// Surrender the output.
    fn into_output(self: Box<Self>) -> AnyArray;
}

// ============================================================================
// Shared Binding
// ============================================================================

/// Input view, output storage and null value shared by the concrete pairs.
#[derive(Debug)]
pub(crate) struct Binding<I, O> {
    input: Arc<DataArray<I>>,
    output: OutputBuffer<O>,
    num_components: usize,
    null_value: O,
    reads_output: bool,
}

impl<I: Scalar, O: Scalar> Binding<I, O> {
    /// Bind `input` to `output`, growing the output to `num_out` records.
    /// Component counts must already agree.
    pub(crate) fn new(
        input: Arc<DataArray<I>>,
        mut output: OutputBuffer<O>,
        num_out: usize,
        null_value: O,
    ) -> Self {
        debug_assert_eq!(input.num_components(), output.num_components());
        output.grow(num_out, null_value);
        Self {
            num_components: input.num_components(),
            input,
            output,
            null_value,
            reads_output: false,
        }
    }

    /// Take every operand from the output instead of the input.
    pub(crate) fn reading_output(mut self) -> Self {
        self.reads_output = true;
        self
    }

    pub(crate) fn reads_output(&self) -> bool {
        self.reads_output
    }

    pub(crate) fn num_tuples(&self) -> usize {
        self.input.num_tuples()
    }

    pub(crate) fn num_components(&self) -> usize {
        self.num_components
    }

    pub(crate) fn output_name(&self) -> &str {
        self.output.name()
    }

    pub(crate) fn output_tuples(&self) -> usize {
        self.output.num_tuples()
    }

    #[inline(always)]
    fn load(&self, out: &RecordSlot, id: usize, j: usize) -> f64 {
        if self.reads_output {
            self.output.read(out, id, j).to_f64()
        } else {
            self.input.value(id, j).to_f64()
        }
    }

    #[inline(always)]
    pub(crate) fn input_value(&self, id: usize, j: usize) -> I {
        self.input.value(id, j)
    }

    #[inline(always)]
    pub(crate) fn output_value(&self, out: &RecordSlot, id: usize, j: usize) -> O {
        self.output.read(out, id, j)
    }

    /// Write `fetch(in_id, j)` into every component of the slot's record.
    #[inline]
    pub(crate) fn copy_with<F>(&self, in_id: usize, out: &RecordSlot, fetch: F)
    where
        F: Fn(usize, usize) -> O,
    {
        for j in 0..self.num_components {
            self.output.write(out, j, fetch(in_id, j));
        }
    }

    #[inline]
    pub(crate) fn interpolate(&self, ids: &[usize], weights: &[f64], out: &RecordSlot) {
        for j in 0..self.num_components {
            let v = weighted_sum(ids, weights, |id| self.load(out, id, j));
            self.output.write(out, j, O::from_f64(v));
        }
    }

    #[inline]
    pub(crate) fn interpolate_output(&self, ids: &[usize], weights: &[f64], out: &RecordSlot) {
        for j in 0..self.num_components {
            let v = weighted_sum(ids, weights, |id| self.output.read(out, id, j).to_f64());
            self.output.write(out, j, O::from_f64(v));
        }
    }

    #[inline]
    pub(crate) fn average(&self, ids: &[usize], out: &RecordSlot) {
        for j in 0..self.num_components {
            let v = mean(ids, |id| self.load(out, id, j));
            self.output.write(out, j, O::from_f64(v));
        }
    }

    #[inline]
    pub(crate) fn interpolate_edge<F>(&self, v0: usize, v1: usize, t: f64, out: &RecordSlot, fetch: F)
    where
        F: Fn(usize, usize) -> O,
    {
        // Endpoints are copies, so no element type loses precision there.
        if t == 0.0 {
            return self.copy_with(v0, out, fetch);
        }
        if t == 1.0 {
            return self.copy_with(v1, out, fetch);
        }
        for j in 0..self.num_components {
            let v = lerp(self.load(out, v0, j), self.load(out, v1, j), t);
            self.output.write(out, j, O::from_f64(v));
        }
    }

    #[inline]
    pub(crate) fn assign_null_value(&self, out: &RecordSlot) {
        for j in 0..self.num_components {
            self.output.write(out, j, self.null_value);
        }
    }

    pub(crate) fn realloc(&mut self, num_tuples: usize) {
        let before = self.output.num_tuples();
        if self.output.grow(num_tuples, self.null_value) {
            log::debug!(
                "grew '{}' from {} to {} records",
                self.output.name(),
                before,
                num_tuples
            );
        }
    }

    pub(crate) fn output_array(&mut self) -> AnyArray {
        self.output.to_data_array().into_any()
    }

    pub(crate) fn into_output(self) -> AnyArray {
        self.output.into_data_array().into_any()
    }
}
