//! Record passes over an array list.
//!
//! ## Purpose
//!
//! This module runs a caller-supplied closure once per output record of a
//! range, handing it a [`Record`] that fans every operation out to all pairs.
//! With the `cpu` feature the records of a pass are distributed across the
//! rayon thread pool.
//!
//! ## Design notes
//!
//! * **Parallelism**: Uses `rayon` for data-parallel execution across CPU cores.
//! * **Checks**: The range is validated once per pass, never per record.
//! * **Scratch state**: `par_for_each_record_init` builds one state value per
//!   worker split, reused across its records.
//! * **Partitions**: `par_for_each_range` hands each worker a caller-chosen
//!   run of records, such as the output records one input cell generates.
//! * **Fallback**: A list built with `parallel(false)` runs the `par_*` passes
//!   on the calling thread with identical results.
//!
//! ## Key concepts
//!
//! A parallel pass marks its whole range as busy. Inside the pass,
//! `interpolate_output` may read any record outside the range plus the
//! record being written; reading another record of the range panics, since
//! its value would depend on scheduling.
//!
//! A partitioned pass marks the span from its lowest to its highest record
//! as busy, gaps between partitions included.
//!
//! [`Record`] and [`Partition`] values are neither `Send` nor `Sync`: a
//! worker cannot pass them on to another thread.
//!
//! ## Invariants
//!
//! * Each output record in the range is visited exactly once.
//! * Partitions of one pass never share an output record.
//! * No pair is grown or snapshotted while a pass runs (`&mut self`).
//!
//! ## Non-goals
//!
//! * This module does not choose record ranges or weights.
//! * This module does not order writes between records of one pass.

#[cfg(feature = "cpu")]
use core::marker::PhantomData;
use core::ops::Range;

#[cfg(feature = "cpu")]
use rayon::prelude::*;

#[cfg(feature = "cpu")]
use crate::algorithms::pair::ArrayPair;
use crate::engine::coordinator::{ArrayList, Record};
use crate::engine::validator::Validator;
use crate::primitives::buffer::RecordSlot;
use crate::primitives::errors::ArrayListError;

impl ArrayList {
    fn validate_pass(&self, range: &Range<usize>) -> Result<(), ArrayListError> {
        match self.output_capacity() {
            Some(capacity) => Validator::validate_range(range, capacity),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Sequential Pass
    // ========================================================================

    /// Visit every output record of `range` in order on the calling thread.
    ///
    /// Records are written one after another, so `interpolate_output` may read
    /// any record, including earlier ones of the same pass.
    pub fn for_each_record<F>(&mut self, range: Range<usize>, mut f: F) -> Result<(), ArrayListError>
    where
        F: FnMut(&Record<'_>),
    {
        self.validate_pass(&range)?;
        let arrays = self.arrays();
        for out_id in range {
            f(&Record::new(arrays, RecordSlot::exclusive(out_id)));
        }
        Ok(())
    }

    // ========================================================================
    // Parallel Passes
    // ========================================================================

    /// Visit every output record of `range`, possibly concurrently.
    #[cfg(feature = "cpu")]
    pub fn par_for_each_record<F>(&mut self, range: Range<usize>, f: F) -> Result<(), ArrayListError>
    where
        F: Fn(&Record<'_>) + Send + Sync,
    {
        self.par_for_each_record_init(range, || (), |_, record| f(record))
    }

    /// Like [`ArrayList::par_for_each_record`], with per-worker scratch state
    /// built by `init`.
    #[cfg(feature = "cpu")]
    pub fn par_for_each_record_init<S, INIT, F>(
        &mut self,
        range: Range<usize>,
        init: INIT,
        f: F,
    ) -> Result<(), ArrayListError>
    where
        INIT: Fn() -> S + Send + Sync,
        F: Fn(&mut S, &Record<'_>) + Send + Sync,
    {
        self.validate_pass(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        log::debug!(
            "pass over records {}..{} on {} pairs (parallel: {})",
            range.start,
            range.end,
            self.number_of_arrays(),
            self.is_parallel()
        );

        let arrays = self.arrays();
        let busy = range.clone();

        if !self.is_parallel() {
            let mut state = init();
            for out_id in range {
                let slot = RecordSlot::within(out_id, busy.clone());
                f(&mut state, &Record::new(arrays, slot));
            }
            return Ok(());
        }

        range.into_par_iter().for_each_init(init, |state, out_id| {
            let slot = RecordSlot::within(out_id, busy.clone());
            f(state, &Record::new(arrays, slot));
        });
        Ok(())
    }

    /// Run `f` once per range of `ranges`, possibly concurrently. Each call
    /// may write exactly the records of its own range.
    ///
    /// Ranges must be pairwise disjoint and fit the output capacity; they need
    /// not be sorted, contiguous or of equal length.
    #[cfg(feature = "cpu")]
    pub fn par_for_each_range<F>(
        &mut self,
        ranges: &[Range<usize>],
        f: F,
    ) -> Result<(), ArrayListError>
    where
        F: Fn(&Partition<'_>) + Send + Sync,
    {
        Validator::validate_disjoint(ranges)?;
        let busy = span(ranges);
        self.validate_pass(&busy)?;
        log::debug!(
            "partitioned pass: {} ranges over records {}..{} on {} pairs (parallel: {})",
            ranges.len(),
            busy.start,
            busy.end,
            self.number_of_arrays(),
            self.is_parallel()
        );

        let arrays = self.arrays();
        let run = |(index, range): (usize, &Range<usize>)| {
            f(&Partition::new(arrays, index, range.clone(), busy.clone()));
        };
        if self.is_parallel() {
            ranges.par_iter().enumerate().for_each(run);
        } else {
            ranges.iter().enumerate().for_each(run);
        }
        Ok(())
    }
}

/// Smallest range covering every non-empty range.
#[cfg(feature = "cpu")]
fn span(ranges: &[Range<usize>]) -> Range<usize> {
    let mut non_empty = ranges.iter().filter(|r| !r.is_empty());
    match non_empty.next() {
        Some(first) => non_empty.fold(first.clone(), |acc, r| {
            acc.start.min(r.start)..acc.end.max(r.end)
        }),
        None => 0..0,
    }
}

// ============================================================================
// Partitions
// ============================================================================

/// A caller-chosen run of output records owned by one call of
/// [`ArrayList::par_for_each_range`].
#[cfg(feature = "cpu")]
#[derive(Debug)]
pub struct Partition<'a> {
    arrays: &'a [Box<dyn ArrayPair>],
    index: usize,
    range: Range<usize>,
    busy: Range<usize>,
    _thread_bound: PhantomData<*const ()>,
}

#[cfg(feature = "cpu")]
impl<'a> Partition<'a> {
    fn new(
        arrays: &'a [Box<dyn ArrayPair>],
        index: usize,
        range: Range<usize>,
        busy: Range<usize>,
    ) -> Self {
        Self {
            arrays,
            index,
            range,
            busy,
            _thread_bound: PhantomData,
        }
    }

    /// Position of this partition's range in the slice passed to the pass.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Output records this partition owns.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Record handle for `out_id`.
    ///
    /// # Panics
    ///
    /// Panics if `out_id` lies outside this partition's range.
    pub fn record(&self, out_id: usize) -> Record<'a> {
        assert!(
            self.range.contains(&out_id),
            "output record {out_id} is outside partition {} ({:?})",
            self.index,
            self.range
        );
        Record::new(self.arrays, RecordSlot::within(out_id, self.busy.clone()))
    }

    /// Record handles for the whole range, in order.
    pub fn records(&self) -> impl Iterator<Item = Record<'a>> + '_ {
        self.range
            .clone()
            .map(move |out_id| Record::new(self.arrays, RecordSlot::within(out_id, self.busy.clone())))
    }
}
