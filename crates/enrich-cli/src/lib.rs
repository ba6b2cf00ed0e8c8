//! Library components of the race event enrichment pipeline.
//!
//! [`pipeline::run_pipeline`] is the entry point: it loads the country
//! reference once, fans input files out to a [`engine::Engine`] worker pool,
//! and fans the surviving records back into a single `.jsonl` artifact.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;
