//! Reference CSV header resolution.

use csv::StringRecord;

/// Column holding the country name (the mapping key).
pub const COUNTRY_COLUMN: &str = "Country";
pub const CAPITAL_COLUMN: &str = "Capital";
pub const CONTINENT_COLUMN: &str = "Continent";
/// May list several languages separated by commas.
pub const LANGUAGE_COLUMN: &str = "Main_Official_Language";
pub const CURRENCY_COLUMN: &str = "Currency";

/// Positions of the known reference columns within a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceColumns {
    pub country: Option<usize>,
    pub capital: Option<usize>,
    pub continent: Option<usize>,
    pub language: Option<usize>,
    pub currency: Option<usize>,
}

impl ReferenceColumns {
    /// Locates the known columns after trimming every header name.
    ///
    /// When a name repeats, the rightmost column is used.
    pub fn resolve(headers: &StringRecord) -> Self {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |wanted: &str| names.iter().rposition(|name| name == wanted);
        Self {
            country: find(COUNTRY_COLUMN),
            capital: find(CAPITAL_COLUMN),
            continent: find(CONTINENT_COLUMN),
            language: find(LANGUAGE_COLUMN),
            currency: find(CURRENCY_COLUMN),
        }
    }
}

/// Normalizes a header value by trimming whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim().to_string()
}

/// Returns the trimmed cell at `index`, or `None` when the column is unknown
/// or the row is too short.
pub fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index.and_then(|idx| record.get(idx)).map(str::trim)
}
