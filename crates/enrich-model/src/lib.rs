//! Domain types shared by the enrichment pipeline crates.
//!
//! - [`CountryRecord`] and [`ReferenceMapping`] hold the reference metadata
//!   loaded once per run and shared read-only by every worker.
//! - [`InputEvent`], [`OutputEvent`] and [`TransformOutcome`] describe one
//!   record's trip through the transformer.
//! - [`fields`] names the event fields the pipeline reads or writes.

pub mod country;
pub mod error;
pub mod event;
pub mod fields;

pub use country::{CountryRecord, ReferenceMapping};
pub use error::{ModelError, Result};
pub use event::{InputEvent, OutputEvent, RejectReason, TransformOutcome};
