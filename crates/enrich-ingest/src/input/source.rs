//! Line-oriented reading of event files.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{IngestError, Result};

/// One line of an input file, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number within the file.
    pub number: usize,
    pub text: String,
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens an input file for buffered reading, decompressing `.gz` files.
pub fn open_source(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Streaming, numbered lines of one input file.
///
/// `\r\n` terminators are accepted and the final terminator is optional.
/// Every other line, empty or not, is yielded. Invalid UTF-8 is a read
/// error.
pub struct SourceLines {
    path: PathBuf,
    lines: Lines<Box<dyn BufRead + Send>>,
    number: usize,
}

impl SourceLines {
    /// Reads up to `max` further lines. An empty batch means end of file.
    pub fn next_batch(&mut self, max: usize) -> Result<Vec<SourceLine>> {
        let mut batch = Vec::with_capacity(max.min(1024));
        while batch.len() < max {
            match self.next() {
                Some(line) => batch.push(line?),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl Iterator for SourceLines {
    type Item = Result<SourceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let line_result = self.lines.next()?;
        self.number += 1;
        Some(
            line_result
                .map(|text| SourceLine {
                    number: self.number,
                    text,
                })
                .map_err(|e| IngestError::FileRead {
                    path: self.path.clone(),
                    source: e,
                }),
        )
    }
}

/// Opens `path` as a stream of lines.
pub fn source_lines(path: &Path) -> Result<SourceLines> {
    Ok(SourceLines {
        path: path.to_path_buf(),
        lines: open_source(path)?.lines(),
        number: 0,
    })
}
