//! Aggregation: pure summary statistics over a record sequence.

pub mod summary;

pub use summary::*;
