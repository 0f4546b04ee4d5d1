//! Layer 1: Primitives
//!
//! Core building blocks and types.
//!
//! This layer provides element types, array storage, and error types used
//! throughout the crate. It has no dependencies on higher layers.
//!
//! # Module Organization
//!
//! - **errors**: Shared error type (ArrayListError)
//! - **scalar**: Element type tags and the `Scalar` trait
//! - **array**: Typed arrays and the type-erased `AnyArray` handle
//! - **buffer**: Shared output storage and record slots
//! - **attributes**: Named array collections
//! - **input**: Conversions from host data
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
//! Layer 2: Math (accumulate)
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
///
/// Provides:
/// - Unified `ArrayListError` enum
/// - Context-carrying variants for setup failures
pub mod errors;

/// Element types.
///
/// Provides:
/// - The `DataType` tag
/// - The `Scalar` trait with `as`-semantics conversions
pub mod scalar;

/// Attribute arrays.
///
/// Provides:
/// - Typed `DataArray<T>` storage
/// - Type-erased, identity-comparable `AnyArray` handles
/// - The `with_array!` dispatch macro
pub mod array;

/// Output storage.
///
/// Provides:
/// - Growable `OutputBuffer<T>` with shared record writes
/// - `RecordSlot` write capability
pub mod buffer;

/// Attribute collections.
pub mod attributes;

/// Host data conversion.
pub mod input;
