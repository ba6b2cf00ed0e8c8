//! Integration tests for reference data loading.

use std::io::Write;

use tempfile::NamedTempFile;

use enrich_ingest::{DialectSource, IngestError, load_reference};

fn write_reference(content: &str, bom: bool) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    if bom {
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
    }
    file.write_all(content.as_bytes()).unwrap();
    file
}

const COUNTRIES: &str = "\
Country,Capital,Continent,Main_Official_Language,Currency
France,Paris,Europe,French,Euro
South Africa,Pretoria,Africa,\"Zulu, Xhosa\",South African rand
Namibia,Windhoek,Africa,\"English, Afrikaans\",Namibian dollar
Japan,Tokyo,Asia,Japanese,Yen
";

#[test]
fn loads_country_table_with_bom() {
    let file = write_reference(COUNTRIES, true);
    let loaded = load_reference(file.path().to_str().unwrap()).unwrap();

    assert_eq!(loaded.mapping.len(), 4);
    assert_eq!(loaded.report.dialect_source, DialectSource::Sniffed);

    let france = loaded.mapping.get("France").unwrap();
    assert_eq!(france.country, "France");
    assert_eq!(france.capital.as_deref(), Some("Paris"));
    assert_eq!(france.continent.as_deref(), Some("Europe"));
    assert_eq!(france.official_language.as_deref(), Some("French"));
    assert_eq!(france.currency.as_deref(), Some("Euro"));
}

#[test]
fn south_africa_reports_english() {
    let file = write_reference(COUNTRIES, false);
    let loaded = load_reference(file.path().to_str().unwrap()).unwrap();

    let record = loaded.mapping.get("South Africa").unwrap();
    assert_eq!(record.official_language.as_deref(), Some("English"));
}

#[test]
fn language_list_keeps_first_entry() {
    let file = write_reference(COUNTRIES, false);
    let loaded = load_reference(file.path().to_str().unwrap()).unwrap();

    let record = loaded.mapping.get("Namibia").unwrap();
    assert_eq!(record.official_language.as_deref(), Some("English"));
}

#[test]
fn pipe_delimited_reference() {
    let file = write_reference(
        "Country|Capital|Continent|Main_Official_Language|Currency\nChile|Santiago|South America|Spanish|Peso\n",
        false,
    );
    let loaded = load_reference(file.path().to_str().unwrap()).unwrap();

    assert_eq!(loaded.report.dialect.delimiter, b'|');
    assert_eq!(
        loaded.mapping.get("Chile").unwrap().capital.as_deref(),
        Some("Santiago")
    );
}

#[test]
fn unsniffable_reference_uses_comma_fallback() {
    let file = write_reference(
        "Country,Capital,Continent,Main_Official_Language,Currency\nFrance,Paris,Europe,French,Euro,\nPeru,Lima\n",
        false,
    );
    let loaded = load_reference(file.path().to_str().unwrap()).unwrap();

    assert_eq!(loaded.report.dialect_source, DialectSource::Fallback);
    assert!(!loaded.mapping.is_empty());
    assert_eq!(loaded.mapping.len(), 2);
}

#[test]
fn remote_reference_rejected() {
    let result = load_reference("https://example.com/countries.csv");
    assert!(matches!(result, Err(IngestError::UnsupportedScheme { .. })));
}
