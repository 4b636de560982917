//! `adherence-insights` library crate.
//!
//! The binary (`adhx`) is a thin wrapper around this library so that:
//!
//! - core logic (ingest, aggregation) is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod ai;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod session;
pub mod stats;
