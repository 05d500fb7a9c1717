//! Test utilities for the framecol crates.
//!
//! - [`frame_builder`]: assembles serialized columnar frames from in-memory column data
//! - [`data_gen`]: seeded generators of nullable column data
//!
//! Frame writing is not part of the library surface; this crate exists so that
//! readers can be tested against byte-exact frames.

pub mod data_gen;
pub mod frame_builder;

pub use frame_builder::FrameBuilder;
