//! Error types for attribute transfer setup.
//!
//! ## Purpose
//!
//! This module defines [`ArrayListError`], the single error type returned by
//! every fallible operation in the crate. Errors only arise while pairs are
//! being registered, validated, or when a record pass is launched; the
//! per-record transfer operations never return errors.
//!
//! ## Design notes
//!
//! * Variants carry the offending values so messages are self-explanatory.
//! * An excluded input array is not an error: registration returns `Ok(None)`.
//!
//! ## Visibility
//!
//! [`ArrayListError`] is part of the public API.

use core::ops::Range;

use thiserror::Error;

use crate::primitives::scalar::DataType;

/// Errors raised while building or driving an [`ArrayList`](crate::engine::coordinator::ArrayList).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayListError {
    /// Input and output arrays disagree on the number of components per tuple.
    #[error("component mismatch for '{name}': input has {input}, output has {output}")]
    ComponentMismatch {
        name: String,
        input: usize,
        output: usize,
    },

    /// An output of a different type than its input must be a float type.
    #[error("cannot promote {from} to {to}: promotion target must be a float type")]
    UnsupportedPromotion { from: DataType, to: DataType },

    /// A flat value buffer is not a whole number of tuples.
    #[error("{len} values do not form whole tuples of {num_components} components")]
    InvalidValueCount { len: usize, num_components: usize },

    /// A record pass reaches past the allocated output records.
    #[error("record range ends at {end}, but outputs only hold {capacity} records")]
    OutOfCapacity { end: usize, capacity: usize },

    /// Two record ranges of a partitioned pass share output records.
    #[error("record ranges {first:?} and {second:?} overlap")]
    OverlappingRanges {
        first: Range<usize>,
        second: Range<usize>,
    },

    /// A builder parameter was set more than once.
    #[error("parameter '{parameter}' was set multiple times")]
    DuplicateParameter { parameter: &'static str },

    /// Any other malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
