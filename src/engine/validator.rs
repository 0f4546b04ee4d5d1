//! Validation for pair registration and record passes.
//!
//! ## Purpose
//!
//! This module gathers the checks that run while pairs are being set up and
//! once at the start of each record pass. Nothing here runs per record.
//!
//! ## Design notes
//!
//! * Validation is fail-fast: the first violation is returned.
//! * Error values carry the offending names and sizes.
//!
//! ## Validated parameters
//!
//! * **Components**: input and output agree on tuple width
//! * **Promotion**: a cross-type output is a float type
//! * **Pass range**: stays within the allocated output records
//! * **Partitions**: caller-chosen ranges are pairwise disjoint
//! * **Builder**: no parameter set twice
//!
//! ## Visibility
//!
//! This module is an internal implementation detail used by the coordinator
//! and builders. It may change without notice.

use core::ops::Range;

use crate::primitives::errors::ArrayListError;
use crate::primitives::scalar::DataType;

/// Validation utility for registration and passes.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Registration
    // ========================================================================

    /// Input and output must share a component count.
    pub fn validate_components(
        name: &str,
        input: usize,
        output: usize,
    ) -> Result<(), ArrayListError> {
        if input != output {
            return Err(ArrayListError::ComponentMismatch {
                name: name.to_string(),
                input,
                output,
            });
        }
        Ok(())
    }

    /// An output whose type differs from its input must be a float type.
    pub fn validate_promotion(from: DataType, to: DataType) -> Result<(), ArrayListError> {
        if from != to && !to.is_float() {
            return Err(ArrayListError::UnsupportedPromotion { from, to });
        }
        Ok(())
    }

    // ========================================================================
    // Passes
    // ========================================================================

    /// A record pass must stay inside the allocated output records.
    pub fn validate_range(range: &Range<usize>, capacity: usize) -> Result<(), ArrayListError> {
        if range.end > capacity && !range.is_empty() {
            return Err(ArrayListError::OutOfCapacity {
                end: range.end,
                capacity,
            });
        }
        Ok(())
    }

    /// Ranges of a partitioned pass must not share records. Empty ranges
    /// never overlap anything.
    pub fn validate_disjoint(ranges: &[Range<usize>]) -> Result<(), ArrayListError> {
        let mut sorted: Vec<&Range<usize>> = ranges.iter().filter(|r| !r.is_empty()).collect();
        sorted.sort_by_key(|r| r.start);
        for pair in sorted.windows(2) {
            if pair[0].end > pair[1].start {
                return Err(ArrayListError::OverlappingRanges {
                    first: pair[0].clone(),
                    second: pair[1].clone(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Validate that no parameters were set multiple times in a builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), ArrayListError> {
        if let Some(param) = duplicate_param {
            return Err(ArrayListError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rules() {
        assert!(Validator::validate_promotion(DataType::Int32, DataType::Float32).is_ok());
        assert!(Validator::validate_promotion(DataType::Int32, DataType::Int32).is_ok());
        assert_eq!(
            Validator::validate_promotion(DataType::Float32, DataType::Int16),
            Err(ArrayListError::UnsupportedPromotion {
                from: DataType::Float32,
                to: DataType::Int16
            })
        );
    }

    #[test]
    fn range_rules() {
        assert!(Validator::validate_range(&(0..4), 4).is_ok());
        assert!(Validator::validate_range(&(9..9), 4).is_ok());
        assert!(Validator::validate_range(&(2..5), 4).is_err());
    }

    #[test]
    fn partition_rules() {
        assert!(Validator::validate_disjoint(&[4..6, 0..1, 1..4, 3..3]).is_ok());
        assert_eq!(
            Validator::validate_disjoint(&[5..9, 0..2, 1..3]),
            Err(ArrayListError::OverlappingRanges {
                first: 0..2,
                second: 1..3
            })
        );
    }
}
