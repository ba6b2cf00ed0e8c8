//! Country reference data loading.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use enrich_model::{CountryRecord, ReferenceMapping};

use super::dialect::{Dialect, leading_sample, sniff_dialect};
use super::header::{ReferenceColumns, cell};
use crate::error::{IngestError, Result};
use crate::location::resolve_local_path;

/// Country whose official language is always reported as [`OVERRIDE_LANGUAGE`].
const OVERRIDE_COUNTRY: &str = "South Africa";
const OVERRIDE_LANGUAGE: &str = "English";

/// How the dialect used to parse the reference file was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectSource {
    Sniffed,
    Fallback,
}

/// Counts and settings from one reference load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: PathBuf,
    pub dialect: Dialect,
    pub dialect_source: DialectSource,
    /// Rows inserted into the mapping, duplicates included.
    pub loaded_rows: usize,
    /// Rows without a country name, or that could not be tokenized.
    pub skipped_rows: usize,
    /// Rows that replaced an earlier row for the same country.
    pub duplicate_rows: usize,
}

/// A built mapping together with its load report.
#[derive(Debug, Clone)]
pub struct LoadedReference {
    pub mapping: ReferenceMapping,
    pub report: LoadReport,
}

/// Loads the country reference file at `location` (a path or `file://` URI).
///
/// Only an unreadable resource is an error; individual bad rows are skipped.
pub fn load_reference(location: &str) -> Result<LoadedReference> {
    let path = resolve_local_path(location)?;
    let bytes = std::fs::read(&path).map_err(|e| IngestError::from_io(&path, e))?;
    let text = decode_utf8(&bytes, &path)?;
    parse_reference(&text, &path)
}

/// Decodes UTF-8 bytes, dropping a leading byte-order mark.
fn decode_utf8<'a>(bytes: &'a [u8], path: &Path) -> Result<Cow<'a, str>> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(IngestError::InvalidEncoding {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

/// Parses already-decoded reference CSV text into a mapping.
///
/// `source` is only used for error messages and the report.
pub fn parse_reference(text: &str, source: &Path) -> Result<LoadedReference> {
    let (dialect, dialect_source) = resolve_dialect(text, source);

    let mut reader = dialect.reader_builder().from_reader(text.as_bytes());
    // The text is already valid UTF-8, so the header row always decodes; an
    // empty file yields an empty header.
    let headers = reader.headers().cloned().unwrap_or_default();
    let columns = ReferenceColumns::resolve(&headers);
    if columns.country.is_none() {
        tracing::warn!(
            path = %source.display(),
            "reference file has no Country column; every row will be skipped"
        );
    }

    let mut countries: HashMap<String, CountryRecord> = HashMap::new();
    let mut loaded_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut duplicate_rows = 0usize;

    for (index, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                skipped_rows += 1;
                tracing::debug!(path = %source.display(), line, %error, "skipping unreadable row");
                continue;
            }
        };

        let Some(record) = country_from_row(&row, &columns) else {
            skipped_rows += 1;
            tracing::debug!(path = %source.display(), line, "skipping row without country");
            continue;
        };

        loaded_rows += 1;
        if let Some(previous) = countries.insert(record.country.clone(), record) {
            duplicate_rows += 1;
            tracing::debug!(
                path = %source.display(),
                line,
                country = %previous.country,
                "duplicate country replaces earlier row"
            );
        }
    }

    let mapping = ReferenceMapping::new(countries);
    tracing::info!(
        path = %source.display(),
        countries = mapping.len(),
        skipped_rows,
        duplicate_rows,
        "reference data loaded"
    );

    Ok(LoadedReference {
        mapping,
        report: LoadReport {
            source: source.to_path_buf(),
            dialect,
            dialect_source,
            loaded_rows,
            skipped_rows,
            duplicate_rows,
        },
    })
}

/// Sniffs the dialect from the leading sample, falling back to the default.
fn resolve_dialect(text: &str, source: &Path) -> (Dialect, DialectSource) {
    let (sample, truncated) = leading_sample(text);
    match sniff_dialect(sample, truncated) {
        Ok(dialect) => {
            tracing::debug!(
                path = %source.display(),
                delimiter = %char::from(dialect.delimiter).escape_default(),
                quote = %char::from(dialect.quote),
                "sniffed reference dialect"
            );
            (dialect, DialectSource::Sniffed)
        }
        Err(error) => {
            tracing::warn!(
                path = %source.display(),
                %error,
                "could not detect reference dialect; using comma-separated default"
            );
            (Dialect::default(), DialectSource::Fallback)
        }
    }
}

/// Builds a record from one data row, or `None` when the country is missing.
fn country_from_row(row: &csv::StringRecord, columns: &ReferenceColumns) -> Option<CountryRecord> {
    let country = cell(row, columns.country).filter(|name| !name.is_empty())?;

    let official_language = if country == OVERRIDE_COUNTRY {
        Some(OVERRIDE_LANGUAGE.to_string())
    } else {
        primary_language(cell(row, columns.language))
    };

    Some(CountryRecord {
        country: country.to_string(),
        capital: cell(row, columns.capital).map(str::to_string),
        continent: cell(row, columns.continent).map(str::to_string),
        official_language,
        currency: cell(row, columns.currency).map(str::to_string),
    })
}

/// First entry of a comma-separated language list; `None` when blank.
fn primary_language(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|value| !value.is_empty())?;
    raw.split(',').next().map(|first| first.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Country,Capital,Continent,Main_Official_Language,Currency\n";

    fn parse(text: &str) -> LoadedReference {
        parse_reference(text, Path::new("countries.csv")).unwrap()
    }

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(
            primary_language(Some("English, Afrikaans")),
            Some("English".to_string())
        );
        assert_eq!(primary_language(Some("French")), Some("French".to_string()));
        assert_eq!(primary_language(Some("")), None);
        assert_eq!(primary_language(None), None);
    }

    #[test]
    fn test_first_language_kept() {
        let loaded = parse(&format!(
            "{HEADER}Namibia,Windhoek,Africa,\"English, Afrikaans\",Namibian dollar\n"
        ));
        let namibia = loaded.mapping.get("Namibia").unwrap();
        assert_eq!(namibia.official_language.as_deref(), Some("English"));
        assert_eq!(namibia.currency.as_deref(), Some("Namibian dollar"));
    }

    #[test]
    fn test_south_africa_override() {
        let loaded = parse(&format!(
            "{HEADER}South Africa,Pretoria,Africa,\"Zulu, Xhosa\",Rand\n"
        ));
        let record = loaded.mapping.get("South Africa").unwrap();
        assert_eq!(record.official_language.as_deref(), Some("English"));
    }

    #[test]
    fn test_override_creates_no_entry() {
        let loaded = parse(&format!("{HEADER}France,Paris,Europe,French,Euro\n"));
        assert!(loaded.mapping.get("South Africa").is_none());
        assert_eq!(loaded.mapping.len(), 1);
    }

    #[test]
    fn test_values_and_headers_trimmed() {
        let loaded = parse(
            " Country , Capital ,Continent,Main_Official_Language, Currency\n  France ,  Paris , Europe , French , Euro \n",
        );
        let france = loaded.mapping.get("France").unwrap();
        assert_eq!(france.capital.as_deref(), Some("Paris"));
        assert_eq!(france.continent.as_deref(), Some("Europe"));
        assert_eq!(france.currency.as_deref(), Some("Euro"));
    }

    #[test]
    fn test_rows_without_country_skipped() {
        let loaded = parse(&format!(
            "{HEADER},Nowhere,Europe,None,None\n   ,X,Y,Z,W\nPeru,Lima,South America,Spanish,Sol\n"
        ));
        assert_eq!(loaded.mapping.len(), 1);
        assert_eq!(loaded.report.skipped_rows, 2);
        assert_eq!(loaded.report.loaded_rows, 1);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let loaded = parse(&format!(
            "{HEADER}Peru,Cusco,South America,Quechua,Sol\nPeru,Lima,South America,Spanish,Sol\n"
        ));
        let peru = loaded.mapping.get("Peru").unwrap();
        assert_eq!(peru.capital.as_deref(), Some("Lima"));
        assert_eq!(loaded.report.duplicate_rows, 1);
    }

    #[test]
    fn test_missing_columns_are_none() {
        let loaded = parse("Country,Capital\nFrance,Paris\n");
        let france = loaded.mapping.get("France").unwrap();
        assert_eq!(france.capital.as_deref(), Some("Paris"));
        assert_eq!(france.continent, None);
        assert_eq!(france.official_language, None);
    }

    #[test]
    fn test_short_row_missing_cells() {
        let loaded = parse(&format!("{HEADER}France,Paris\n"));
        let france = loaded.mapping.get("France").unwrap();
        assert_eq!(france.currency, None);
    }

    #[test]
    fn test_semicolon_dialect_sniffed() {
        let loaded = parse(
            "Country;Capital;Continent;Main_Official_Language;Currency\nBelgium;Brussels;Europe;Dutch, French;Euro\n",
        );
        assert_eq!(loaded.report.dialect.delimiter, b';');
        assert_eq!(loaded.report.dialect_source, DialectSource::Sniffed);
        assert_eq!(
            loaded.mapping.get("Belgium").unwrap().official_language.as_deref(),
            Some("Dutch")
        );
    }

    #[test]
    fn test_fallback_dialect_still_loads() {
        // Ragged rows defeat sniffing; the comma default matches the layout.
        let loaded = parse(&format!(
            "{HEADER}France,Paris,Europe,French,Euro,,\nPeru,Lima,South America,Spanish,Sol\n"
        ));
        assert_eq!(loaded.report.dialect_source, DialectSource::Fallback);
        assert_eq!(loaded.report.dialect, Dialect::default());
        assert_eq!(loaded.mapping.len(), 2);
    }

    #[test]
    fn test_no_country_column() {
        let loaded = parse("Nation,Capital\nFrance,Paris\n");
        assert!(loaded.mapping.is_empty());
        assert_eq!(loaded.report.skipped_rows, 1);
    }

    #[test]
    fn test_empty_text() {
        let loaded = parse("");
        assert!(loaded.mapping.is_empty());
        assert_eq!(loaded.report.dialect_source, DialectSource::Fallback);
    }

    #[test]
    fn test_load_reference_with_bom() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(format!("{HEADER}France,Paris,Europe,French,Euro\n").as_bytes());
        let file = create_temp_csv(&content);

        let loaded = load_reference(file.path().to_str().unwrap()).unwrap();
        assert!(loaded.mapping.contains("France"));
    }

    #[test]
    fn test_load_reference_file_uri() {
        let file = create_temp_csv(format!("{HEADER}France,Paris,Europe,French,Euro\n").as_bytes());
        let uri = format!("file://{}", file.path().display());

        let loaded = load_reference(&uri).unwrap();
        assert_eq!(loaded.mapping.len(), 1);
    }

    #[test]
    fn test_load_reference_missing_file() {
        let result = load_reference("/definitely/not/here/countries.csv");
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_reference_invalid_utf8() {
        let file = create_temp_csv(b"Country\n\xC3\x28\n");
        let result = load_reference(file.path().to_str().unwrap());
        assert!(matches!(result, Err(IngestError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_load_reference_utf16_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'C', 0]);
        let result = load_reference(file.path().to_str().unwrap());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding { encoding: "UTF-16 LE", .. })
        ));
    }
}
