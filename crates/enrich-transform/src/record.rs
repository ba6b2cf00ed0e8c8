//! Filter and enrich a single event.

use serde_json::{Map, Value};

use enrich_model::fields::{
    DEVICE_TYPE, RACE_ID, REJECTED_DEVICE_TYPE, VIEWER_LOCATION_COUNTRY,
};
use enrich_model::{InputEvent, OutputEvent, ReferenceMapping, RejectReason, TransformOutcome};

use crate::normalize::normalize_race_id_opt;

/// Transforms one input event against the shared reference mapping.
///
/// - `DeviceType == "Other"` rejects the event.
/// - A string `RaceID` is normalized; other `RaceID` values pass through.
/// - `ViewerLocationCountry` is dropped and replaced by `LocationData`,
///   which is `null` unless the country is in `reference`.
///
/// The input is left untouched; a new field map is built for the output.
pub fn transform_record(record: &InputEvent, reference: &ReferenceMapping) -> TransformOutcome {
    if record.get(DEVICE_TYPE).and_then(Value::as_str) == Some(REJECTED_DEVICE_TYPE) {
        return TransformOutcome::Rejected(RejectReason::OtherDevice);
    }

    let mut fields = Map::new();
    let mut viewer_country = None;
    for (key, value) in record {
        match key.as_str() {
            VIEWER_LOCATION_COUNTRY => viewer_country = Some(value),
            RACE_ID => {
                fields.insert(key.clone(), normalized_race_value(value));
            }
            _ => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }

    let location = viewer_country
        .and_then(Value::as_str)
        .and_then(|country| reference.get(country));
    TransformOutcome::Kept(OutputEvent::new(fields, location))
}

fn normalized_race_value(value: &Value) -> Value {
    normalize_race_id_opt(value.as_str()).map_or_else(|| value.clone(), Value::String)
}
