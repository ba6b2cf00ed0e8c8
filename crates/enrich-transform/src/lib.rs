//! Per-record transformation for the enrichment pipeline.
//!
//! Both entry points are pure: the same inputs always give the same output,
//! so records can be processed on any worker in any order.

pub mod normalize;
pub mod record;

pub use normalize::{normalize_race_id, normalize_race_id_opt};
pub use record::transform_record;
