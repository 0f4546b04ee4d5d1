//! Growable output storage with record-granular shared writes.
//!
//! ## Purpose
//!
//! This module provides [`OutputBuffer`], the storage a pair writes its
//! results into, and [`RecordSlot`], the capability that authorizes writing
//! one output record. Worker threads share an `&OutputBuffer` and each writes
//! only the record its slot names, so no locking is needed.
//!
//! ## Design notes
//!
//! * Cells are `UnsafeCell<T>`; writes through `&self` are sound because a
//!   `RecordSlot` can only be minted by the owning `ArrayList`, which hands
//!   out each record id at most once per pass while holding `&mut self`.
//! * Reads of other records (iterative blending) are allowed only outside the
//!   range being written by the current pass.
//! * Growth and snapshots take `&mut self` and never touch the unsafe paths.
//!
//! ## Invariants
//!
//! * `cells.len()` is a multiple of `num_components`.
//! * Storage never shrinks.

use core::cell::UnsafeCell;
use core::ops::Range;

use crate::primitives::array::DataArray;
use crate::primitives::scalar::Scalar;

// ============================================================================
// Record Slot
// ============================================================================

/// Exclusive right to write one output record during a transfer call.
///
/// Slots are created by the coordinator only. `busy` holds the records that
/// other workers may be writing at the same time; it is empty for
/// sequential calls.
#[derive(Debug)]
pub struct RecordSlot {
    out_id: usize,
    busy: Range<usize>,
}

impl RecordSlot {
    /// Slot for a sequential call: nothing else is being written.
    pub(crate) fn exclusive(out_id: usize) -> Self {
        Self {
            out_id,
            busy: 0..0,
        }
    }

    /// Slot for one record of a parallel pass over `busy`.
    pub(crate) fn within(out_id: usize, busy: Range<usize>) -> Self {
        debug_assert!(busy.contains(&out_id));
        Self { out_id, busy }
    }

    /// Output record this slot writes.
    #[inline]
    pub fn out_id(&self) -> usize {
        self.out_id
    }

    /// Whether output record `id` may be read while this slot is live.
    #[inline]
    pub fn can_read(&self, id: usize) -> bool {
        id == self.out_id || !self.busy.contains(&id)
    }
}

// ============================================================================
// Output Buffer
// ============================================================================

/// Tuple-major output storage shared by worker threads.
#[derive(Debug)]
pub struct OutputBuffer<T> {
    name: String,
    num_components: usize,
    cells: Vec<UnsafeCell<T>>,
}

// SAFETY: shared access only writes through `write`, which is gated by a
// `RecordSlot`. The coordinator never hands the same record to two threads,
// and `read` refuses records that may be under concurrent write.
unsafe impl<T: Send + Sync> Sync for OutputBuffer<T> {}

impl<T: Scalar> OutputBuffer<T> {
    /// Allocate `num_tuples` records, every component set to `fill`.
    pub fn new(name: impl Into<String>, num_components: usize, num_tuples: usize, fill: T) -> Self {
        let num_components = num_components.max(1);
        let mut cells = Vec::with_capacity(num_tuples * num_components);
        cells.resize_with(num_tuples * num_components, || UnsafeCell::new(fill));
        Self {
            name: name.into(),
            num_components,
            cells,
        }
    }

    /// Take ownership of an existing array's values.
    pub fn from_data_array(array: DataArray<T>) -> Self {
        let name = array.name().to_string();
        let num_components = array.num_components();
        let cells = array.into_values().into_iter().map(UnsafeCell::new).collect();
        Self {
            name,
            num_components,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn num_tuples(&self) -> usize {
        self.cells.len() / self.num_components
    }

    /// Grow to `num_tuples` records, filling new components with `fill`.
    /// Requests at or below the current size leave the buffer untouched.
    pub fn grow(&mut self, num_tuples: usize, fill: T) -> bool {
        let target = num_tuples * self.num_components;
        if target <= self.cells.len() {
            return false;
        }
        self.cells.resize_with(target, || UnsafeCell::new(fill));
        true
    }

    /// Write component `j` of the slot's record.
    #[inline]
    pub(crate) fn write(&self, slot: &RecordSlot, j: usize, value: T) {
        let cell = &self.cells[slot.out_id() * self.num_components + j];
        // SAFETY: the slot grants exclusive access to this record.
        unsafe { *cell.get() = value }
    }

    /// Read component `j` of output record `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` may be written concurrently under `slot`.
    #[inline]
    pub(crate) fn read(&self, slot: &RecordSlot, id: usize, j: usize) -> T {
        assert!(
            slot.can_read(id),
            "output record {id} is being written by the current pass"
        );
        let cell = &self.cells[id * self.num_components + j];
        // SAFETY: no other thread writes `id` while `slot` is live.
        unsafe { *cell.get() }
    }

    /// Copy the current contents out.
    pub fn to_data_array(&mut self) -> DataArray<T> {
        let values = self.cells.iter_mut().map(|c| *c.get_mut()).collect();
        DataArray::from_parts(self.name.clone(), self.num_components, values)
    }

    /// Consume the buffer into a plain array.
    pub fn into_data_array(self) -> DataArray<T> {
        let values = self.cells.into_iter().map(UnsafeCell::into_inner).collect();
        DataArray::from_parts(self.name, self.num_components, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_preserves_and_fills() {
        let mut buf = OutputBuffer::new("b", 2, 2, 0i16);
        buf.write(&RecordSlot::exclusive(1), 1, 7);
        assert!(buf.grow(4, -1));
        assert!(!buf.grow(3, 9));

        let arr = buf.to_data_array();
        assert_eq!(arr.values(), &[0, 0, 0, 7, -1, -1, -1, -1]);
    }

    #[test]
    fn slot_read_rules() {
        let slot = RecordSlot::within(5, 4..8);
        assert!(slot.can_read(5));
        assert!(slot.can_read(3));
        assert!(slot.can_read(8));
        assert!(!slot.can_read(6));

        let seq = RecordSlot::exclusive(2);
        assert!(seq.can_read(0));
        assert!(seq.can_read(2));
    }

    #[test]
    #[should_panic(expected = "being written")]
    fn busy_read_panics() {
        let buf = OutputBuffer::new("b", 1, 8, 0.0f32);
        let slot = RecordSlot::within(5, 4..8);
        buf.read(&slot, 6, 0);
    }
}
