//! Per-record event types.

use serde_json::{Map, Value};

use crate::country::CountryRecord;
use crate::error::Result;
use crate::fields::LOCATION_DATA;

/// A parsed input line. Only a handful of fields are interpreted; the rest
/// are carried through verbatim.
pub type InputEvent = Map<String, Value>;

/// An enriched event ready to be written.
///
/// Always carries a `LocationData` entry, `null` when the viewer country had
/// no reference match.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEvent {
    fields: Map<String, Value>,
}

impl OutputEvent {
    /// Builds an output event from already-filtered fields, appending
    /// `LocationData`.
    pub fn new(mut fields: Map<String, Value>, location: Option<&CountryRecord>) -> Self {
        let location = location.map_or(Value::Null, CountryRecord::to_value);
        fields.insert(LOCATION_DATA.to_string(), location);
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// True when `LocationData` holds a country record.
    pub fn has_location(&self) -> bool {
        self.fields
            .get(LOCATION_DATA)
            .is_some_and(|value| !value.is_null())
    }

    /// Serializes the event as a single line of JSON (no trailing newline).
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}

/// Why a record produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `DeviceType` was `"Other"`.
    OtherDevice,
}

/// Result of transforming one record.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutcome {
    Kept(OutputEvent),
    Rejected(RejectReason),
}

impl TransformOutcome {
    pub fn kept(self) -> Option<OutputEvent> {
        match self {
            Self::Kept(event) => Some(event),
            Self::Rejected(_) => None,
        }
    }
}
