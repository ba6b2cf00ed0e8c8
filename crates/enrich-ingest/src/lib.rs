//! Data ingestion for the enrichment pipeline.
//!
//! # Features
//!
//! - **Reference Loading**: Read the country CSV into an immutable
//!   [`ReferenceMapping`](enrich_model::ReferenceMapping), sniffing its
//!   delimiter and tolerating a UTF-8 BOM
//! - **Input Discovery**: Resolve a glob pattern to the set of event files
//! - **Line Sources**: Read plain or gzip-compressed newline-delimited JSON
//!
//! # Example
//!
//! ```ignore
//! use enrich_ingest::{load_reference, resolve_input_pattern, source_lines};
//!
//! let reference = load_reference("./data/country_data_v2.csv")?;
//! for path in resolve_input_pattern("./data/*.json")? {
//!     for line in source_lines(&path)? {
//!         let line = line?;
//!     }
//! }
//! ```

mod error;
mod input;
mod location;
mod reference;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reference Data ===
pub use reference::{
    Dialect, DialectSource, LoadReport, LoadedReference, SNIFF_SAMPLE_CHARS, SniffError,
    load_reference, parse_reference, sniff_dialect,
};

// === Input Sources ===
pub use input::{SourceLine, SourceLines, open_source, resolve_input_pattern, source_lines};

// === Locations ===
pub use location::resolve_local_path;
