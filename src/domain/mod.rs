//! Domain model for the adherence analytics pipeline.

pub mod types;

pub use types::*;
