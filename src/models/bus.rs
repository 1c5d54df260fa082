use serde::{Deserialize, Serialize};

/// One reported bus position from the Warsaw open-data feed.
///
/// Records are values: every successful fetch replaces the whole set, no
/// identity is carried across responses. `vehicle_number` is the key used to
/// correlate a record with its map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Line label (e.g. "123" or "N61")
    #[serde(rename = "Lines", default)]
    pub lines: String,
    /// Longitude; 0.0 together with lat 0.0 means "no fix"
    #[serde(rename = "Lon")]
    pub lon: f64,
    /// Latitude; 0.0 together with lon 0.0 means "no fix"
    #[serde(rename = "Lat")]
    pub lat: f64,
    /// Free-form departure-time text from the source, not parsed
    #[serde(rename = "Time", default)]
    pub time: String,
    /// Vehicle identifier, unique-ish per physical vehicle
    #[serde(rename = "VehicleNumber", default)]
    pub vehicle_number: String,
    /// Brigade assignment
    #[serde(rename = "Brigade", default)]
    pub brigade: String,
}

impl Bus {
    /// The feed reports (0,0) for vehicles without a GPS fix.
    pub fn has_fix(&self) -> bool {
        self.lat != 0.0 || self.lon != 0.0
    }
}

/// Top-level response wrapper of the `busestrams_get` endpoint.
///
/// An absent or empty `result` is a valid "no data right now" state, not an
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub result: Vec<Bus>,
}

impl ApiEnvelope {
    /// Records fit for display: a usable fix and a non-empty vehicle number.
    /// Everything downstream (bounds filter, renderer) relies on both.
    pub fn into_displayable(self) -> Vec<Bus> {
        self.result
            .into_iter()
            .filter(|b| b.has_fix() && !b.vehicle_number.is_empty())
            .collect()
    }
}
