//! Shared domain types.
//!
//! This module defines the data model everything else agrees on:
//! `SalesRecord`/`SalesTable` on the input side and `MetricsBundle` (with its
//! typed metric groups) on the output side.

mod types;

pub use types::*;
