use crate::error::{AmedasError, Result};
use crate::record::RawValue;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Label used when an upstream record carries no usable name.
pub const UNNAMED_STATION: &str = "地点";

/// Static metadata for an AMeDAS station, as listed in `amedastable.json`.
///
/// See: <https://www.jma.go.jp/bosai/amedas/const/amedastable.json>
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationInfo {
    /// Station code; the table key, copied in on load
    #[serde(skip)]
    pub code: String,
    /// Station class ("A" staffed, "B"/"C" automated, ...)
    #[serde(default, rename = "type")]
    pub station_type: String,
    /// Element availability bitmap
    #[serde(default)]
    pub elems: String,
    /// Latitude as `[degrees, minutes]`
    pub lat: [f64; 2],
    /// Longitude as `[degrees, minutes]`
    pub lon: [f64; 2],
    /// Altitude in meters
    #[serde(default)]
    pub alt: f64,
    /// Name in kanji
    #[serde(default)]
    pub kj_name: String,
    /// Name in katakana
    #[serde(default)]
    pub kn_name: String,
    /// Name in romaji
    #[serde(default)]
    pub en_name: String,
}

/// Convert a `[degrees, minutes]` pair to decimal degrees.
pub fn to_decimal_degrees(pair: [f64; 2]) -> f64 {
    pair[0] + pair[1] / 60.0
}

impl StationInfo {
    pub fn latitude(&self) -> f64 {
        to_decimal_degrees(self.lat)
    }

    pub fn longitude(&self) -> f64 {
        to_decimal_degrees(self.lon)
    }

    /// Kanji name, or the placeholder when the table has none.
    pub fn display_name(&self) -> &str {
        if self.kj_name.is_empty() {
            UNNAMED_STATION
        } else {
            &self.kj_name
        }
    }
}

/// All known stations, keyed by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    stations: HashMap<String, StationInfo>,
}

impl StationTable {
    /// Parse the body of `amedastable.json`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, StationInfo> = serde_json::from_str(json)
            .map_err(|e| AmedasError::MalformedSnapshot(format!("station table: {}", e)))?;
        Ok(Self::from_stations(raw.into_iter().map(|(code, mut station)| {
            station.code = code;
            station
        })))
    }

    pub fn from_stations<I: IntoIterator<Item = StationInfo>>(stations: I) -> Self {
        Self {
            stations: stations
                .into_iter()
                .map(|s| (s.code.clone(), s))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&StationInfo> {
        self.stations.get(code)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Readings for one station inside a map file, keyed by element name.
pub type StationValues = BTreeMap<String, RawValue>;

/// Per-station readings from a ten-minute map file
/// (`/bosai/amedas/data/map/YYYYMMDDHHmm00.json`), in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, StationValues)>,
}

impl ValueMap {
    /// Parse the body of a map file.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build from an already-parsed JSON document. The top level must be an
    /// object; stations whose readings are not an object are skipped.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            AmedasError::MalformedSnapshot("map data is not a JSON object".to_string())
        })?;
        let mut entries = Vec::with_capacity(object.len());
        let mut skipped = 0usize;
        for (code, readings) in object {
            let Some(readings) = readings.as_object() else {
                skipped += 1;
                continue;
            };
            let values = readings
                .iter()
                .map(|(field, raw)| (field.clone(), RawValue::from(raw)))
                .collect();
            entries.push((code.clone(), values));
        }
        if skipped > 0 {
            debug!("{} map entries have no readings object", skipped);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<(String, StationValues)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StationValues)> {
        self.entries.iter().map(|(code, values)| (code.as_str(), values))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
