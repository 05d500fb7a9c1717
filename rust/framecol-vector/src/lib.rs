//! Batch destinations and scalar values produced by frame column readers.
//!
//! # Main Components
//!
//! - [`crate::value::Value`]: a single decoded cell, as returned by positional reads.
//! - [`crate::column_vector::ColumnVector`]: a reusable, typed destination for
//!   vectorized batch reads, with one variant per decoder family.
//! - [`crate::presence::Presence`]: null tracking for the values in a vector.
//! - [`crate::offsets::Offsets`]: offsets for variable-length values.
//!
//! Vectors are cleared and refilled by every batch read, so a single instance can be
//! reused across batches without reallocating.

pub mod column_vector;
pub mod complex_vector;
pub mod numeric_vector;
pub mod offsets;
pub mod presence;
pub mod string_vector;
pub mod value;

pub use column_vector::ColumnVector;
pub use value::{ComplexValue, Value};
