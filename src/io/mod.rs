//! File input/output: CSV ingest, artifact export, and sample generation.

pub mod export;
pub mod ingest;
pub mod sample;
