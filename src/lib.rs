//! # attr-transfer: typed attribute transfer for mesh and dataset processing
//!
//! Geometry algorithms that build a new point set or cell set from an old
//! one (clipping, contouring, decimation, resampling) must carry every
//! per-record attribute along: copy it, blend it with weights, average it,
//! or interpolate it along an edge. This crate does that for every attribute
//! of a dataset at once, whatever each attribute's element type.
//!
//! ## What is an array pair?
//!
//! A pair binds one input attribute array to one output array of the same
//! name and component count. The caller computes ids and weights once per
//! output record; the [`ArrayList`](api::ArrayList) applies them to every
//! pair in turn.
//!
//! ## Quick Start
//!
//! ```rust
//! use attr_transfer::prelude::*;
//!
//! let temperature = DataArray::from_vec("temperature", 1, vec![10i32, 20, 30])?.into_any();
//!
//! let mut list = ArrayList::builder().promotion(Promotion::None).build()?;
//! let id = list
//!     .add_array_pair(2, &temperature, "temperature", 0.0, Promotion::None)?
//!     .expect("input is not excluded");
//!
//! list.copy(2, 0);
//! list.interpolate(&[0, 1], &[0.5, 0.5], 1);
//!
//! let out = list.output(id).expect("pair exists");
//! assert_eq!(out.downcast::<i32>().unwrap().values(), &[30, 15]);
//! # Ok::<(), ArrayListError>(())
//! ```
//!
//! ## Parallel passes
//!
//! With the default `cpu` feature, a whole range of records can be written
//! across the rayon thread pool:
//!
//! ```rust
//! # #[cfg(feature = "cpu")] {
//! use attr_transfer::prelude::*;
//!
//! let height = DataArray::from_vec("height", 1, vec![0.0f64, 1.0, 2.0, 3.0])?.into_any();
//! let mut list = ArrayList::new();
//! list.add_array_pair(3, &height, "height", 0.0, Promotion::None)?;
//!
//! // Midpoint of each consecutive edge.
//! list.par_for_each_record(0..3, |record| {
//!     let v0 = record.out_id();
//!     record.interpolate_edge(v0, v0 + 1, 0.5);
//! })?;
//!
//! let out = list.into_outputs();
//! assert_eq!(out[0].downcast::<f64>().unwrap().values(), &[0.5, 1.5, 2.5]);
//! # }
//! # Ok::<(), attr_transfer::prelude::ArrayListError>(())
//! ```
//!
//! When each worker owns a run of records of its own choosing, for instance
//! the output points generated by one input cell, hand the runs to
//! `par_for_each_range`:
//!
//! ```rust
//! # #[cfg(feature = "cpu")] {
//! use attr_transfer::prelude::*;
//!
//! let level = DataArray::from_vec("level", 1, vec![0.0f64, 10.0, 20.0])?.into_any();
//! let mut list = ArrayList::new();
//! list.add_array_pair(5, &level, "level", 0.0, Promotion::None)?;
//!
//! // Cell 0 emits three records, cell 1 emits two.
//! let runs = [0..3, 3..5];
//! list.par_for_each_range(&runs, |cell| {
//!     let c = cell.index();
//!     let n = cell.len() as f64;
//!     for (k, record) in cell.records().enumerate() {
//!         record.interpolate_edge(c, c + 1, k as f64 / n);
//!     }
//! })?;
//! # }
//! # Ok::<(), attr_transfer::prelude::ArrayListError>(())
//! ```
//!
//! ## Operations
//!
//! | operation            | result per component                            |
//! |----------------------|-------------------------------------------------|
//! | `copy`               | input value, cast to the output type            |
//! | `interpolate`        | weighted sum of input records                   |
//! | `interpolate_output` | weighted sum of already written output records  |
//! | `average`            | mean of input records                           |
//! | `weighted_average`   | weighted sum, weights used as given             |
//! | `interpolate_edge`   | `v0 + t * (v1 - v0)`, exact copies at `t` = 0, 1 |
//! | `assign_null_value`  | the pair's null value                           |
//!
//! All arithmetic accumulates in `f64` and narrows to the output type once,
//! with `as` semantics (truncation toward zero, saturation, NaN to zero).
//!
//! ## Element types and promotion
//!
//! Arrays may hold any of `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`,
//! `u64`, `f32` or `f64`. Integral inputs can be *promoted* to a float output
//! (see [`Promotion`](api::Promotion)) so interpolated values keep their
//! fractional part.
//!
//! ## Threading
//!
//! Setup (registration, exclusion, growth) and result extraction take
//! `&mut ArrayList`; record operations on distinct output records may run
//! concurrently inside a pass. Reading, inside a parallel pass, an output
//! record that the same pass may be writing panics.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade:
//! pair creation, exclusions, output growth and pass starts at `debug`, and
//! arrays skipped by bulk registration at `warn`. Nothing is logged per
//! record.
//!
//! ## Feature flags
//!
//! * `cpu` (default): parallel record passes on `rayon`.

// Layer 1: Primitives - element types, arrays, errors.
pub mod primitives;

// Layer 2: Math - numeric kernels.
pub mod math;

// Layer 3: Algorithms - array pairs.
pub mod algorithms;

// Layer 4: Engine - coordination and record passes.
pub mod engine;

// Layer 5: API - builders and re-exports.
pub mod api;

/// Standard attr-transfer prelude.
pub mod prelude {
    pub use crate::api::{
        AnyArray, ArrayId, ArrayInput, ArrayList, ArrayListBuilder, ArrayListError, ArrayPair,
        AttributeSet, DataArray, DataType, PairId, PairRequest, PromotedPair, Promotion, Record,
        RecordSlot, Result, Scalar, TypedPair,
    };

    #[cfg(feature = "cpu")]
    pub use crate::api::Partition;
}
