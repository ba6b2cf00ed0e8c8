//! Names of the event fields the pipeline contracts on.
//!
//! Every other field of an input event passes through untouched.

/// Device classification of the viewer.
pub const DEVICE_TYPE: &str = "DeviceType";

/// Free-form race identifier, normalized on output.
pub const RACE_ID: &str = "RaceID";

/// Country of the viewer; consumed by enrichment and never emitted.
pub const VIEWER_LOCATION_COUNTRY: &str = "ViewerLocationCountry";

/// Enrichment field added to every output event.
pub const LOCATION_DATA: &str = "LocationData";

/// `DeviceType` value whose events are dropped.
pub const REJECTED_DEVICE_TYPE: &str = "Other";
