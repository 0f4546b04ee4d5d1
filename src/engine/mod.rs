//! Layer 4: Engine
//!
//! Orchestration of array pairs.
//!
//! This layer owns the pairs of a transfer session, applies each operation
//! to all of them, and runs record passes on one thread or across the rayon
//! pool. Setup checks live here too.
//!
//! # Module Organization
//!
//! - **coordinator**: The `ArrayList` and its per-record fan-out
//! - **executor**: Sequential and parallel record passes
//! - **validator**: Registration and pass checks
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms (pair, typed, promoted)
//!   ↓
//! Layer 2: Math (accumulate)
//!   ↓
//! Layer 1: Primitives (errors, scalar, array, buffer)
//! ```

/// Pair collection.
///
/// Provides:
/// - Registration with exclusion and promotion
/// - Fan-out of every transfer operation
/// - Output growth and result extraction
pub mod coordinator;

/// Record passes.
///
/// Provides:
/// - `for_each_record` on the calling thread
/// - `par_for_each_record` and `par_for_each_record_init` on rayon
pub mod executor;

/// Validation utilities.
pub mod validator;
