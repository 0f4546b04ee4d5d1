//! Layer 2: Math
//!
//! Pure numeric kernels.
//!
//! This layer provides the `f64` accumulation routines every pair type
//! relies on. They carry no knowledge of arrays or element types.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine (coordinator, executor, validator)
//!   ↓
//! Layer 3: Algorithms (pair, typed, promoted)
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives (errors, scalar, array, buffer)
//! ```

/// Accumulation kernels.
///
/// Provides:
/// - Weighted sums
/// - Unweighted means
/// - Edge interpolation
pub mod accumulate;
