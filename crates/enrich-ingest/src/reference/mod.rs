//! Country reference data: dialect sniffing, header resolution and loading.

mod dialect;
mod header;
mod loader;

pub use dialect::{Dialect, SNIFF_SAMPLE_CHARS, SniffError, sniff_dialect};
pub use loader::{DialectSource, LoadReport, LoadedReference, load_reference, parse_reference};
