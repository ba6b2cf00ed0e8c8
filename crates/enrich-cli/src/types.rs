use std::path::PathBuf;

use enrich_ingest::LoadReport;

/// Record counts for one partition (or a whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionCounts {
    /// Input lines, each one JSON record.
    pub lines_read: usize,
    pub rejected: usize,
    pub written: usize,
    /// Written records whose `LocationData` is null.
    pub lookup_misses: usize,
}

impl PartitionCounts {
    pub fn absorb(&mut self, other: &PartitionCounts) {
        self.lines_read += other.lines_read;
        self.rejected += other.rejected;
        self.written += other.written;
        self.lookup_misses += other.lookup_misses;
    }
}

#[derive(Debug, Clone)]
pub struct PartitionSummary {
    pub source: PathBuf,
    pub counts: PartitionCounts,
    pub attempts: usize,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub reference: LoadReport,
    pub reference_countries: usize,
    pub workers: usize,
    pub partitions: Vec<PartitionSummary>,
}

impl RunReport {
    pub fn totals(&self) -> PartitionCounts {
        let mut totals = PartitionCounts::default();
        for partition in &self.partitions {
            totals.absorb(&partition.counts);
        }
        totals
    }
}
