//! Layer 3: Algorithms
//!
//! Array pair implementations.
//!
//! This layer implements the transfer operations for one attribute: the
//! type-erased [`pair::ArrayPair`] interface, the same-type
//! [`typed::TypedPair`], and the cross-type [`promoted::PromotedPair`].
//! Pairs are orchestrated by the engine layer.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine (coordinator, executor, validator)
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math (accumulate)
//!   ↓
//! Layer 1: Primitives (errors, scalar, array, buffer)
//! ```

/// Pair interface.
///
/// Provides:
/// - The `ArrayPair` trait
/// - Shared input/output binding and arithmetic
pub mod pair;

/// Same-type pairs.
///
/// Provides:
/// - Bit-exact copies
/// - Allocating, supplied-output and self-interpolating constructors
pub mod typed;

/// Promoted pairs.
///
/// Provides:
/// - Integer to float transfer without intermediate truncation
pub mod promoted;
