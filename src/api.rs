//! High-level API for attribute transfer.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: a fluent builder for
//! [`ArrayList`] sessions and [`PairRequest`], an explicit description of
//! one input/output pair.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builders with defaults for every parameter.
//! * **Validated**: Parameters set twice are reported by `build()` or
//!   `add_request()`, not silently overwritten.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create an [`ArrayListBuilder`] via `ArrayList::builder()`.
//! 2. Chain configuration methods (`.null_value()`, `.promotion()`, etc.).
//! 3. Call `.build()`, then register pairs and run transfers.
//!
//! ## Visibility
//!
//! This is the primary public API. Types re-exported here are considered stable.

use core::result;

use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::algorithms::pair::{ArrayPair, RecordSlot};
pub use crate::algorithms::promoted::{PromotedPair, Promotion};
pub use crate::algorithms::typed::TypedPair;
pub use crate::engine::coordinator::{ArrayList, PairId, Record};
#[cfg(feature = "cpu")]
pub use crate::engine::executor::Partition;
pub use crate::primitives::array::{AnyArray, ArrayId, DataArray};
pub use crate::primitives::attributes::AttributeSet;
pub use crate::primitives::errors::ArrayListError;
pub use crate::primitives::input::ArrayInput;
pub use crate::primitives::scalar::{DataType, Scalar};

/// Result type alias for attribute transfer operations.
pub type Result<T> = result::Result<T, ArrayListError>;

// ============================================================================
// Array List Builder
// ============================================================================

/// Fluent builder for configuring an [`ArrayList`].
#[derive(Debug, Clone, Default)]
pub struct ArrayListBuilder {
    /// Null value for bulk registration (default: 0).
    pub null_value: Option<f64>,

    /// Promotion policy for bulk registration (default: `Float32`).
    pub promotion: Option<Promotion>,

    /// Whether `par_*` passes use the thread pool (default: true).
    pub parallel: Option<bool>,

    /// Arrays excluded from the start.
    pub excluded: Vec<AnyArray>,

    /// Tracks if any parameter was set multiple times (for validation).
    pub(crate) duplicate_param: Option<&'static str>,
}

impl ArrayListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value written by `assign_null_value` and into grown records.
    pub fn null_value(mut self, value: f64) -> Self {
        if self.null_value.is_some() {
            self.duplicate_param = Some("null_value");
        }
        self.null_value = Some(value);
        self
    }

    /// Set the output type policy for integral inputs.
    pub fn promotion(mut self, promotion: Promotion) -> Self {
        if self.promotion.is_some() {
            self.duplicate_param = Some("promotion");
        }
        self.promotion = Some(promotion);
        self
    }

    /// Enable or disable the thread pool for `par_*` passes.
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Exclude `array` from every registration. May be called repeatedly.
    pub fn exclude(mut self, array: &AnyArray) -> Self {
        self.excluded.push(array.clone());
        self
    }

    /// Validate the configuration and create the list.
    pub fn build(self) -> Result<ArrayList> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let mut list = ArrayList::with_settings(
            self.null_value.unwrap_or(0.0),
            self.promotion.unwrap_or_default(),
            self.parallel.unwrap_or(true),
        );
        for array in &self.excluded {
            list.exclude_array(array);
        }
        Ok(list)
    }
}

// ============================================================================
// Pair Requests
// ============================================================================

#[derive(Debug, Clone)]
enum RequestedOutput {
    Named(String),
    Supplied(AnyArray),
}

/// Description of one input/output pair for [`ArrayList::add_request`].
///
/// Unless set otherwise, the output is named after the input, holds as many
/// records as the input, uses null value 0 and the list's promotion policy.
#[derive(Debug, Clone)]
pub struct PairRequest {
    input: AnyArray,
    output: Option<RequestedOutput>,
    num_tuples: Option<usize>,
    null_value: Option<f64>,
    promotion: Option<Promotion>,
    duplicate_param: Option<&'static str>,
}

impl PairRequest {
    pub fn new(input: &AnyArray) -> Self {
        Self {
            input: input.clone(),
            output: None,
            num_tuples: None,
            null_value: None,
            promotion: None,
            duplicate_param: None,
        }
    }

    fn set_output(&mut self, output: RequestedOutput) {
        if self.output.is_some() {
            self.duplicate_param = Some("output");
        }
        self.output = Some(output);
    }

    /// Allocate a new output with this name.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.set_output(RequestedOutput::Named(name.into()));
        self
    }

    /// Write into this array instead of allocating one.
    pub fn output(mut self, output: AnyArray) -> Self {
        self.set_output(RequestedOutput::Supplied(output));
        self
    }

    /// Number of output records to allocate or grow to.
    pub fn num_tuples(mut self, num_tuples: usize) -> Self {
        if self.num_tuples.is_some() {
            self.duplicate_param = Some("num_tuples");
        }
        self.num_tuples = Some(num_tuples);
        self
    }

    pub fn null_value(mut self, value: f64) -> Self {
        if self.null_value.is_some() {
            self.duplicate_param = Some("null_value");
        }
        self.null_value = Some(value);
        self
    }

    /// Output type policy for an allocated output.
    pub fn promotion(mut self, promotion: Promotion) -> Self {
        if self.promotion.is_some() {
            self.duplicate_param = Some("promotion");
        }
        self.promotion = Some(promotion);
        self
    }
}

impl ArrayList {
    /// Start configuring a list.
    pub fn builder() -> ArrayListBuilder {
        ArrayListBuilder::new()
    }

    /// Register the pair described by `request`.
    ///
    /// An excluded input yields `Ok(None)` before the request itself is
    /// checked.
    pub fn add_request(&mut self, request: PairRequest) -> Result<Option<PairId>> {
        if self.is_excluded(&request.input) {
            log::debug!("array '{}' is excluded, request ignored", request.input.name());
            return Ok(None);
        }
        Validator::validate_no_duplicates(request.duplicate_param)?;

        let num_tuples = request.num_tuples.unwrap_or_else(|| request.input.num_tuples());
        let null_value = request.null_value.unwrap_or(0.0);

        match request.output {
            Some(RequestedOutput::Supplied(output)) => {
                if request.promotion.is_some() {
                    return Err(ArrayListError::InvalidInput(format!(
                        "promotion cannot apply to the supplied output '{}'",
                        output.name()
                    )));
                }
                self.add_pair_with_output(num_tuples, &request.input, output, null_value)
            }
            Some(RequestedOutput::Named(name)) => {
                let promotion = request.promotion.unwrap_or(self.promotion());
                self.add_array_pair(num_tuples, &request.input, &name, null_value, promotion)
            }
            None => {
                let promotion = request.promotion.unwrap_or(self.promotion());
                let name = request.input.name().to_string();
                self.add_array_pair(num_tuples, &request.input, &name, null_value, promotion)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let list = ArrayList::builder().build().unwrap();
        assert_eq!(list.null_value(), 0.0);
        assert_eq!(list.promotion(), Promotion::Float32);
        assert!(list.is_parallel());
        assert!(list.is_empty());
    }

    #[test]
    fn builder_rejects_duplicates() {
        let err = ArrayList::builder()
            .null_value(1.0)
            .null_value(2.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ArrayListError::DuplicateParameter {
                parameter: "null_value"
            }
        );
    }

    #[test]
    fn builder_exclusions_apply() {
        let ids = DataArray::from_vec("ids", 1, vec![7u32, 9]).unwrap().into_any();
        let mut list = ArrayList::builder().exclude(&ids).build().unwrap();
        assert!(list.is_excluded(&ids));
        assert_eq!(list.add_request(PairRequest::new(&ids)).unwrap(), None);
    }

    #[test]
    fn excluded_request_is_not_an_error() {
        let input = DataArray::from_vec("h", 1, vec![1i32]).unwrap().into_any();
        let output = DataArray::<f64>::new("o", 1).into_any();
        let mut list = ArrayList::builder().exclude(&input).build().unwrap();

        let conflicting = PairRequest::new(&input)
            .output(output)
            .promotion(Promotion::Float64);
        assert_eq!(list.add_request(conflicting).unwrap(), None);

        let repeated = PairRequest::new(&input).num_tuples(1).num_tuples(2);
        assert_eq!(list.add_request(repeated).unwrap(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn request_defaults_to_input_shape() {
        let input = DataArray::from_vec("h", 2, vec![1i16, 2, 3, 4, 5, 6])
            .unwrap()
            .into_any();
        let mut list = ArrayList::builder()
            .promotion(Promotion::None)
            .build()
            .unwrap();
        let id = list.add_request(PairRequest::new(&input)).unwrap().unwrap();

        let pair = list.pair(id).unwrap();
        assert_eq!(pair.output_name(), "h");
        assert_eq!(pair.output_type(), DataType::Int16);
        assert_eq!(pair.output_tuples(), 3);
        assert_eq!(pair.num_components(), 2);
    }

    #[test]
    fn request_rejects_promotion_with_supplied_output() {
        let input = DataArray::from_vec("h", 1, vec![1i32]).unwrap().into_any();
        let output = DataArray::<f64>::new("o", 1).into_any();
        let request = PairRequest::new(&input)
            .output(output)
            .promotion(Promotion::Float64);

        let mut list = ArrayList::new();
        assert!(matches!(
            list.add_request(request),
            Err(ArrayListError::InvalidInput(_))
        ));
    }
}
