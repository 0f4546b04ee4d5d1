//! The array list: owner and fan-out point for every pair.
//!
//! ## Purpose
//!
//! This module provides [`ArrayList`], which owns the pairs taking part in
//! one attribute transfer session together with the arrays excluded from it.
//! Geometry algorithms call one operation per output record and the list
//! applies it to every pair in insertion order.
//!
//! ## Design notes
//!
//! * Registration, growth and sequential transfers take `&mut self`. Parallel
//!   passes (see [`executor`](crate::engine::executor)) also take `&mut self`
//!   and share `&self` with their workers internally, so growth can never
//!   overlap a pass.
//! * Exclusion compares array identity, not names or contents, and is only
//!   consulted at registration time.
//! * The list owns its pairs; dropping it drops them all.
//!
//! ## Key concepts
//!
//! ### Session phases
//!
//! ```text
//! setup (single thread)    add_* / exclude_array / realloc
//!         ↓
//! processing (any threads) copy / interpolate / ... via records
//!         ↓
//! results                  outputs / into_outputs / into_attribute_set
//! ```
//!
//! ### Exclusion
//!
//! An excluded input produces no pair. Registration reports this as
//! `Ok(None)`, meaning "this attribute is not transferred".
//!
//! ## Invariants
//!
//! * Pairs are never removed or reordered once added.
//! * Every pair output holds at least as many records as the last `realloc`.
//!
//! ## Non-goals
//!
//! * This module does not decide which attributes a dataset carries.
//! * This module does not check id ranges per record; slice indexing does.

use core::marker::PhantomData;
use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;

use crate::algorithms::pair::{ArrayPair, RecordSlot};
use crate::algorithms::promoted::{PromotedPair, Promotion};
use crate::algorithms::typed::TypedPair;
use crate::engine::validator::Validator;
use crate::primitives::array::{AnyArray, ArrayId, DataArray};
use crate::primitives::attributes::AttributeSet;
use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::{DataType, Scalar};
use crate::with_array;

// ============================================================================
// Identifiers
// ============================================================================

/// Position of a pair in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub(crate) usize);

impl PairId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Array List
// ============================================================================

/// Owning collection of array pairs with fan-out transfer operations.
#[derive(Debug)]
pub struct ArrayList {
    arrays: Vec<Box<dyn ArrayPair>>,
    excluded: HashMap<ArrayId, AnyArray>,
    null_value: f64,
    promotion: Promotion,
    parallel: bool,
}

impl Default for ArrayList {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayList {
    /// Create an empty list: null value 0, `Promotion::Float32`, parallel passes.
    pub fn new() -> Self {
        Self::with_settings(0.0, Promotion::default(), true)
    }

    pub(crate) fn with_settings(null_value: f64, promotion: Promotion, parallel: bool) -> Self {
        Self {
            arrays: Vec::new(),
            excluded: HashMap::new(),
            null_value,
            promotion,
            parallel,
        }
    }

    /// Null value used by [`ArrayList::add_arrays`] and
    /// [`ArrayList::add_self_interpolating_arrays`].
    pub fn null_value(&self) -> f64 {
        self.null_value
    }

    /// Promotion policy used by [`ArrayList::add_arrays`].
    pub fn promotion(&self) -> Promotion {
        self.promotion
    }

    /// Whether `par_*` passes fan out to the thread pool.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    // ========================================================================
    // Exclusion
    // ========================================================================

    /// Keep `array` out of every later registration call.
    pub fn exclude_array(&mut self, array: &AnyArray) {
        // The stored handle keeps the allocation, and so the id, alive.
        if let Entry::Vacant(slot) = self.excluded.entry(array.id()) {
            log::debug!("excluding array '{}' ({:?})", array.name(), array.id());
            slot.insert(array.clone());
        }
    }

    /// Whether `array` (by identity) has been excluded.
    pub fn is_excluded(&self, array: &AnyArray) -> bool {
        self.excluded.contains_key(&array.id())
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Pair `input` with a newly allocated output of `num_tuples` records
    /// named `out_name`.
    ///
    /// Integral inputs are promoted per `promotion`; float inputs keep their
    /// type. `null_value` is narrowed to the output type. Returns `Ok(None)`
    /// when `input` is excluded.
    pub fn add_array_pair(
        &mut self,
        num_tuples: usize,
        input: &AnyArray,
        out_name: &str,
        null_value: f64,
        promotion: Promotion,
    ) -> Result<Option<PairId>, ArrayListError> {
        if self.skip_excluded(input) {
            return Ok(None);
        }
        let pair = allocate_pair(input, out_name, num_tuples, null_value, promotion);
        Ok(Some(self.push(pair)))
    }

    /// Pair `input` with a caller-supplied output array, grown to
    /// `num_tuples` records if it is smaller.
    ///
    /// Equal element types produce a [`TypedPair`]; a float output of another
    /// type produces a [`PromotedPair`]. The output array is taken over by the
    /// pair; if other handles to it exist its values are copied.
    pub fn add_pair_with_output(
        &mut self,
        num_tuples: usize,
        input: &AnyArray,
        output: AnyArray,
        null_value: f64,
    ) -> Result<Option<PairId>, ArrayListError> {
        if self.skip_excluded(input) {
            return Ok(None);
        }
        let pair = bind_pair(input, output, num_tuples, null_value)?;
        Ok(Some(self.push(pair)))
    }

    /// Add a pair of any type.
    pub fn add_pair(&mut self, pair: Box<dyn ArrayPair>) -> PairId {
        self.push(pair)
    }

    /// Pair every output template in `output` with the same-named array in
    /// `input`, allocating `num_out` records per output.
    ///
    /// Templates or inputs that are excluded, missing, or disagree on
    /// components are skipped. With promotion enabled, non-float templates
    /// become float outputs. Returns the number of pairs added.
    pub fn add_arrays(
        &mut self,
        num_out: usize,
        input: &AttributeSet,
        output: &AttributeSet,
    ) -> usize {
        let mut added = 0;
        for template in output.iter() {
            if self.is_excluded(template) {
                continue;
            }
            let Some(source) = input.get(template.name()) else {
                log::debug!("no input array named '{}', skipping", template.name());
                continue;
            };
            if self.skip_excluded(source) {
                continue;
            }
            if source.num_components() != template.num_components() {
                log::warn!(
                    "skipping '{}': input has {} components, output has {}",
                    template.name(),
                    source.num_components(),
                    template.num_components()
                );
                continue;
            }

            let out_type = match self.promotion.target_for(template.data_type()) {
                Some(promoted) => promoted,
                None => template.data_type(),
            };
            let pair = if out_type == source.data_type() {
                allocate_pair(source, template.name(), num_out, self.null_value, Promotion::None)
            } else if out_type.is_float() {
                allocate_promoted(source, template.name(), num_out, self.null_value, out_type)
            } else {
                log::warn!(
                    "skipping '{}': cannot write {} input into {} output",
                    template.name(),
                    source.data_type(),
                    out_type
                );
                continue;
            };
            self.push(pair);
            added += 1;
        }
        added
    }

    /// Add a pair for every array in `attributes` that interpolates from its
    /// own values into an output grown to `num_out` records.
    pub fn add_self_interpolating_arrays(
        &mut self,
        num_out: usize,
        attributes: &AttributeSet,
    ) -> usize {
        let mut added = 0;
        for array in attributes.iter() {
            if self.skip_excluded(array) {
                continue;
            }
            let null_value = self.null_value;
            let pair = with_array!(array, a => boxed(TypedPair::self_interpolating(
                Arc::clone(a),
                num_out,
                Scalar::from_f64(null_value),
            )));
            self.push(pair);
            added += 1;
        }
        added
    }

    fn skip_excluded(&self, input: &AnyArray) -> bool {
        if self.is_excluded(input) {
            log::debug!("array '{}' is excluded, no pair created", input.name());
            return true;
        }
        false
    }

    fn push(&mut self, pair: Box<dyn ArrayPair>) -> PairId {
        log::debug!(
            "pair #{}: {} -> '{}' ({}), {} components, {} output records",
            self.arrays.len(),
            pair.input_type(),
            pair.output_name(),
            pair.output_type(),
            pair.num_components(),
            pair.output_tuples()
        );
        self.arrays.push(pair);
        PairId(self.arrays.len() - 1)
    }

    // ========================================================================
    // Sequential Transfers
    // ========================================================================

    /// Record handle for `out_id`. Holding it keeps the list borrowed.
    pub fn record(&mut self, out_id: usize) -> Record<'_> {
        Record::new(&self.arrays, RecordSlot::exclusive(out_id))
    }

    pub fn copy(&mut self, in_id: usize, out_id: usize) {
        self.record(out_id).copy(in_id);
    }

    pub fn interpolate(&mut self, ids: &[usize], weights: &[f64], out_id: usize) {
        self.record(out_id).interpolate(ids, weights);
    }

    pub fn interpolate_output(&mut self, ids: &[usize], weights: &[f64], out_id: usize) {
        self.record(out_id).interpolate_output(ids, weights);
    }

    pub fn average(&mut self, ids: &[usize], out_id: usize) {
        self.record(out_id).average(ids);
    }

    /// Weights should sum to one; they are applied as given.
    pub fn weighted_average(&mut self, ids: &[usize], weights: &[f64], out_id: usize) {
        self.record(out_id).weighted_average(ids, weights);
    }

    pub fn interpolate_edge(&mut self, v0: usize, v1: usize, t: f64, out_id: usize) {
        self.record(out_id).interpolate_edge(v0, v1, t);
    }

    pub fn assign_null_value(&mut self, out_id: usize) {
        self.record(out_id).assign_null_value();
    }

    /// Grow every output to `num_tuples` records. New records hold the null
    /// value; smaller sizes are ignored.
    pub fn realloc(&mut self, num_tuples: usize) {
        log::debug!("realloc {} pairs to {} records", self.arrays.len(), num_tuples);
        for array in &mut self.arrays {
            array.realloc(num_tuples);
        }
    }

    // ========================================================================
    // Queries and Results
    // ========================================================================

    /// Number of pairs.
    pub fn number_of_arrays(&self) -> usize {
        self.arrays.len()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn pair(&self, id: PairId) -> Option<&dyn ArrayPair> {
        self.arrays.get(id.0).map(|p| p.as_ref())
    }

    pub fn pairs(&self) -> impl Iterator<Item = &dyn ArrayPair> {
        self.arrays.iter().map(|p| p.as_ref())
    }

    /// Records every output can hold; `None` when the list is empty.
    pub fn output_capacity(&self) -> Option<usize> {
        self.arrays.iter().map(|p| p.output_tuples()).min()
    }

    /// Snapshot of one pair's output.
    pub fn output(&mut self, id: PairId) -> Option<AnyArray> {
        self.arrays.get_mut(id.0).map(|p| p.output_array())
    }

    /// Snapshots of every output, in insertion order.
    pub fn outputs(&mut self) -> Vec<AnyArray> {
        self.arrays.iter_mut().map(|p| p.output_array()).collect()
    }

    /// End the session and take every output, in insertion order.
    pub fn into_outputs(self) -> Vec<AnyArray> {
        self.arrays.into_iter().map(|p| p.into_output()).collect()
    }

    /// End the session and collect the outputs by name.
    pub fn into_attribute_set(self) -> AttributeSet {
        self.into_outputs().into_iter().collect()
    }

    pub(crate) fn arrays(&self) -> &[Box<dyn ArrayPair>] {
        &self.arrays
    }
}

// ============================================================================
// Records
// ============================================================================

/// One output record across every pair of a list.
///
/// Records are handed out by [`ArrayList::record`] and by the record passes;
/// each operation is applied to all pairs in insertion order. A record stays
/// on the thread it was handed to.
#[derive(Debug)]
pub struct Record<'a> {
    arrays: &'a [Box<dyn ArrayPair>],
    slot: RecordSlot,
    _thread_bound: PhantomData<*const ()>,
}

impl<'a> Record<'a> {
    pub(crate) fn new(arrays: &'a [Box<dyn ArrayPair>], slot: RecordSlot) -> Self {
        Self {
            arrays,
            slot,
            _thread_bound: PhantomData,
        }
    }

    /// Output record id.
    #[inline]
    pub fn out_id(&self) -> usize {
        self.slot.out_id()
    }

    #[inline]
    pub fn copy(&self, in_id: usize) {
        for array in self.arrays {
            array.copy(in_id, &self.slot);
        }
    }

    #[inline]
    pub fn interpolate(&self, ids: &[usize], weights: &[f64]) {
        for array in self.arrays {
            array.interpolate(ids, weights, &self.slot);
        }
    }

    /// # Panics
    ///
    /// Panics if an id names a record of the pass currently running.
    #[inline]
    pub fn interpolate_output(&self, ids: &[usize], weights: &[f64]) {
        for array in self.arrays {
            array.interpolate_output(ids, weights, &self.slot);
        }
    }

    #[inline]
    pub fn average(&self, ids: &[usize]) {
        for array in self.arrays {
            array.average(ids, &self.slot);
        }
    }

    #[inline]
    pub fn weighted_average(&self, ids: &[usize], weights: &[f64]) {
        for array in self.arrays {
            array.weighted_average(ids, weights, &self.slot);
        }
    }

    #[inline]
    pub fn interpolate_edge(&self, v0: usize, v1: usize, t: f64) {
        for array in self.arrays {
            array.interpolate_edge(v0, v1, t, &self.slot);
        }
    }

    #[inline]
    pub fn assign_null_value(&self) {
        for array in self.arrays {
            array.assign_null_value(&self.slot);
        }
    }
}

// ============================================================================
// Pair Construction
// ============================================================================

fn boxed<P: ArrayPair + 'static>(pair: P) -> Box<dyn ArrayPair> {
    Box::new(pair)
}

/// Build the pair for `input` with a fresh output, applying `promotion`.
fn allocate_pair(
    input: &AnyArray,
    name: &str,
    num_out: usize,
    null_value: f64,
    promotion: Promotion,
) -> Box<dyn ArrayPair> {
    match promotion.target_for(input.data_type()) {
        Some(target) => allocate_promoted(input, name, num_out, null_value, target),
        None => with_array!(input, a => boxed(TypedPair::allocate(
            Arc::clone(a),
            name,
            num_out,
            Scalar::from_f64(null_value),
        ))),
    }
}

/// Build a promoted pair writing `target` values. `target` must be a float
/// type; anything else falls back to `f32`.
fn allocate_promoted(
    input: &AnyArray,
    name: &str,
    num_out: usize,
    null_value: f64,
    target: DataType,
) -> Box<dyn ArrayPair> {
    debug_assert!(target.is_float());
    if target == DataType::Float64 {
        with_array!(input, a => boxed(PromotedPair::<_, f64>::allocate(
            Arc::clone(a),
            name,
            num_out,
            null_value,
        )))
    } else {
        with_array!(input, a => boxed(PromotedPair::<_, f32>::allocate(
            Arc::clone(a),
            name,
            num_out,
            null_value as f32,
        )))
    }
}

/// Take an output array's values, copying only if the handle is shared.
fn take_values<T: Scalar>(array: Arc<DataArray<T>>) -> DataArray<T> {
    Arc::try_unwrap(array).unwrap_or_else(|shared| (*shared).clone())
}

/// Build the pair binding `input` to a caller-supplied `output`.
fn bind_pair(
    input: &AnyArray,
    output: AnyArray,
    num_out: usize,
    null_value: f64,
) -> Result<Box<dyn ArrayPair>, ArrayListError> {
    let (from, to) = (input.data_type(), output.data_type());
    Validator::validate_promotion(from, to)?;

    if from == to {
        return with_array!(input, a => bind_typed(a, output, num_out, null_value));
    }
    match output {
        AnyArray::Float32(out) => with_array!(input, a => PromotedPair::<_, f32>::with_output(
            Arc::clone(a),
            take_values(out),
            num_out,
            null_value as f32,
        )
        .map(boxed)),
        AnyArray::Float64(out) => with_array!(input, a => PromotedPair::<_, f64>::with_output(
            Arc::clone(a),
            take_values(out),
            num_out,
            null_value,
        )
        .map(boxed)),
        _ => Err(ArrayListError::UnsupportedPromotion { from, to }),
    }
}

fn bind_typed<T: Scalar>(
    input: &Arc<DataArray<T>>,
    output: AnyArray,
    num_out: usize,
    null_value: f64,
) -> Result<Box<dyn ArrayPair>, ArrayListError> {
    let to = output.data_type();
    let output = T::downcast_owned(output).map_err(|_| ArrayListError::UnsupportedPromotion {
        from: T::DATA_TYPE,
        to,
    })?;
    TypedPair::with_output(
        Arc::clone(input),
        take_values(output),
        num_out,
        T::from_f64(null_value),
    )
    .map(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(name: &str, values: Vec<i32>) -> AnyArray {
        DataArray::from_vec(name, 1, values).unwrap().into_any()
    }

    #[test]
    fn excluded_input_creates_no_pair() {
        let input = ints("id", vec![1, 2, 3]);
        let mut list = ArrayList::new();
        list.exclude_array(&input);
        list.exclude_array(&input.clone());
        assert_eq!(list.excluded.len(), 1);

        let added = list
            .add_array_pair(3, &input, "out", 0.0, Promotion::None)
            .unwrap();
        assert!(added.is_none());
        assert!(list.is_empty());
        assert!(list.is_excluded(&input));

        // Same contents, different allocation: not excluded.
        let twin = ints("id", vec![1, 2, 3]);
        assert!(!list.is_excluded(&twin));
    }

    #[test]
    fn promotion_picks_output_type() {
        let input = ints("s", vec![1, 2]);
        let mut list = ArrayList::new();
        let typed = list
            .add_array_pair(2, &input, "a", 0.0, Promotion::None)
            .unwrap()
            .unwrap();
        let promoted = list
            .add_array_pair(2, &input, "b", 0.0, Promotion::Float64)
            .unwrap()
            .unwrap();

        assert_eq!(list.pair(typed).unwrap().output_type(), DataType::Int32);
        assert_eq!(list.pair(promoted).unwrap().output_type(), DataType::Float64);
        assert_eq!(list.number_of_arrays(), 2);
    }

    #[test]
    fn supplied_output_rules() {
        let input = ints("s", vec![4, 8]);
        let mut list = ArrayList::new();

        let out = DataArray::filled("o", 1, 1, 0.0f32).into_any();
        let id = list
            .add_pair_with_output(2, &input, out, -1.0)
            .unwrap()
            .unwrap();
        list.average(&[0, 1], 1);
        let result = list.output(id).unwrap();
        assert_eq!(result.downcast::<f32>().unwrap().values(), &[0.0, 6.0]);

        let bad = DataArray::filled("o", 1, 2, 0i16).into_any();
        assert!(matches!(
            list.add_pair_with_output(2, &input, bad, 0.0),
            Err(ArrayListError::UnsupportedPromotion { .. })
        ));
    }

    #[test]
    fn add_arrays_matches_by_name() {
        let mut input = AttributeSet::new();
        input.add_array(ints("temperature", vec![10, 20]));
        input.add_array(DataArray::filled("normals", 3, 2, 1.0f32));
        input.add_array(DataArray::filled("mask", 1, 2, 1u8));

        let mut templates = AttributeSet::new();
        templates.add_array(DataArray::<i32>::new("temperature", 1));
        templates.add_array(DataArray::<f32>::new("normals", 2));
        templates.add_array(DataArray::<u8>::new("missing", 1));
        templates.add_array(DataArray::<u8>::new("mask", 1));

        let mut list = ArrayList::new();
        list.exclude_array(input.get("mask").unwrap());
        let added = list.add_arrays(4, &input, &templates);

        // normals: component mismatch, missing: no input, mask: excluded
        assert_eq!(added, 1);
        let pair = list.pairs().next().unwrap();
        assert_eq!(pair.output_name(), "temperature");
        assert_eq!(pair.output_type(), DataType::Float32);
        assert_eq!(pair.output_tuples(), 4);
    }

    #[test]
    fn self_interpolating_grows_in_place() {
        let mut attrs = AttributeSet::new();
        attrs.add_array(ints("level", vec![2, 4]));
        let mut list = ArrayList::builder().null_value(-1.0).build().unwrap();

        assert_eq!(list.add_self_interpolating_arrays(4, &attrs), 1);
        list.interpolate_output(&[0, 1], &[0.5, 0.5], 2);

        let out = list.into_attribute_set();
        let level = out.get("level").unwrap().downcast::<i32>().unwrap();
        assert_eq!(level.values(), &[2, 4, 3, -1]);
    }
}
