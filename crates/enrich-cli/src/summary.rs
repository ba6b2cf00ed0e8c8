use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use enrich_cli::types::{PartitionCounts, RunReport};
use enrich_ingest::DialectSource;

pub fn print_summary(report: &RunReport) {
    println!("Output: {}", report.output_path.display());
    println!(
        "Reference: {} ({} countries, delimiter {}, {})",
        report.reference.source.display(),
        report.reference_countries,
        delimiter_label(report.reference.dialect.delimiter),
        match report.reference.dialect_source {
            DialectSource::Sniffed => "sniffed",
            DialectSource::Fallback => "fallback",
        }
    );
    if report.reference.skipped_rows > 0 || report.reference.duplicate_rows > 0 {
        println!(
            "Reference rows skipped: {}, duplicates replaced: {}",
            report.reference.skipped_rows, report.reference.duplicate_rows
        );
    }
    println!("Workers: {}", report.workers);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Records"),
        header_cell("Rejected"),
        header_cell("Written"),
        header_cell("No location"),
        header_cell("Attempts"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for partition in &report.partitions {
        let counts = &partition.counts;
        table.add_row(vec![
            Cell::new(partition.source.display()),
            Cell::new(counts.lines_read),
            count_cell(counts.rejected, Color::Yellow),
            Cell::new(counts.written),
            count_cell(counts.lookup_misses, Color::Yellow),
            attempts_cell(partition.attempts),
        ]);
    }
    let totals = report.totals();
    table.add_row(total_row(&totals, report.partitions.len()));
    println!("{table}");
}

fn total_row(totals: &PartitionCounts, files: usize) -> Vec<Cell> {
    vec![
        Cell::new(format!("TOTAL ({files} files)"))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.lines_read).add_attribute(Attribute::Bold),
        count_cell(totals.rejected, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(totals.written).add_attribute(Attribute::Bold),
        count_cell(totals.lookup_misses, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]
}

fn delimiter_label(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "TAB".to_string(),
        other => format!("'{}'", char::from(other)),
    }
}

fn attempts_cell(attempts: usize) -> Cell {
    if attempts > 1 {
        Cell::new(attempts)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(attempts)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_label() {
        assert_eq!(delimiter_label(b','), "','");
        assert_eq!(delimiter_label(b'\t'), "TAB");
    }

    #[test]
    fn test_total_row_width() {
        let totals = PartitionCounts {
            lines_read: 4,
            rejected: 1,
            written: 3,
            lookup_misses: 0,
        };
        assert_eq!(total_row(&totals, 2).len(), 6);
    }
}
