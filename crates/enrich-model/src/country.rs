//! Country reference metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Reference metadata for one country, as attached to enriched events.
///
/// Columns absent from the reference file stay `None` and serialize as
/// `null`; present but blank columns are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub country: String,
    pub capital: Option<String>,
    pub continent: Option<String>,
    pub official_language: Option<String>,
    pub currency: Option<String>,
}

impl CountryRecord {
    /// Creates a record carrying only the country name.
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            capital: None,
            continent: None,
            official_language: None,
            currency: None,
        }
    }

    /// Renders the record as the `LocationData` JSON object.
    pub fn to_value(&self) -> Value {
        json!({
            "country": self.country,
            "capital": self.capital,
            "continent": self.continent,
            "official_language": self.official_language,
            "currency": self.currency,
        })
    }
}

/// Country name to metadata lookup, built once per run.
///
/// There is no mutable access once constructed; workers share it behind an
/// `Arc` and only ever read from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMapping {
    countries: HashMap<String, CountryRecord>,
}

impl ReferenceMapping {
    /// Wraps a fully built map.
    pub fn new(countries: HashMap<String, CountryRecord>) -> Self {
        Self { countries }
    }

    /// Looks up a country by its exact, case-sensitive name.
    pub fn get(&self, country: &str) -> Option<&CountryRecord> {
        self.countries.get(country)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Later records with the same country name replace earlier ones.
impl FromIterator<CountryRecord> for ReferenceMapping {
    fn from_iter<I: IntoIterator<Item = CountryRecord>>(iter: I) -> Self {
        let countries = iter
            .into_iter()
            .map(|record| (record.country.clone(), record))
            .collect();
        Self { countries }
    }
}
