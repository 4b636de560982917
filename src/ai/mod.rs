//! Hosted-model integration for analysis suggestions.

pub mod suggest;

pub use suggest::*;
