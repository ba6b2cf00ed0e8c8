//! Event input discovery and line reading.

mod discovery;
mod source;

pub use discovery::resolve_input_pattern;
pub use source::{SourceLine, SourceLines, open_source, source_lines};
