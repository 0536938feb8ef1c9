//! `sales-report` library crate.
//!
//! The binary (`salesrep`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future dashboard, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod narrative;
pub mod plot;
pub mod report;
