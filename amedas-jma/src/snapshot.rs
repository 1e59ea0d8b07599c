//! Normalization of upstream payloads into a canonical [`Snapshot`].
//!
//! JMA serves the same kind of data in two shapes: ten-minute map files that
//! must be joined against the station table, and GeoJSON feature collections
//! that already carry coordinates. Both become a list of [`PointRecord`]s in
//! input order.

use crate::error::{AmedasError, Result};
use crate::feature::{Feature, FeatureCollection};
use crate::record::{PointRecord, RawValue};
use crate::station::{StationTable, ValueMap, UNNAMED_STATION};
use amedas_utils::dates::format_utc_to_jst;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Property names that may hold a feature's display name, most preferred first.
pub const NAME_FIELDS: [&str; 3] = ["nameJP", "kjName", "name"];

/// One of the two payload shapes the upstream fetcher can hand over.
#[derive(Debug, Clone)]
pub enum UpstreamPayload {
    /// Station table joined with a per-code map file
    Table {
        stations: Arc<StationTable>,
        values: ValueMap,
    },
    /// Pre-built point features
    Features(FeatureCollection),
}

/// Observation instant as reported upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationTime {
    /// Already a local (JST) display string
    Local(String),
    /// Compact UTC string, `YYYYMMDDHHmmss`
    UtcCompact(String),
}

impl ObservationTime {
    pub fn display(&self) -> String {
        match self {
            ObservationTime::Local(text) => text.clone(),
            ObservationTime::UtcCompact(text) => format_utc_to_jst(text),
        }
    }
}

/// Every record for one observation instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Display string for the observation time
    pub observed_at: String,
    pub records: Vec<PointRecord>,
}

impl Snapshot {
    /// Normalize `payload` into a complete snapshot. Nothing is returned
    /// unless every record was built.
    pub fn build(payload: &UpstreamPayload, time: &ObservationTime) -> Result<Snapshot> {
        Ok(Snapshot {
            observed_at: time.display(),
            records: normalize(payload)?,
        })
    }

    pub fn empty() -> Snapshot {
        Snapshot {
            observed_at: String::new(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&PointRecord> {
        self.records.iter().find(|r| r.code == code)
    }
}

/// Convert either payload shape into canonical records, in input order.
pub fn normalize(payload: &UpstreamPayload) -> Result<Vec<PointRecord>> {
    match payload {
        UpstreamPayload::Table { stations, values } => Ok(normalize_table(stations, values)),
        UpstreamPayload::Features(collection) => normalize_features(collection),
    }
}

/// Join a map file against the station table. Codes missing from either side
/// produce no record.
fn normalize_table(stations: &StationTable, values: &ValueMap) -> Vec<PointRecord> {
    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0usize;
    for (code, readings) in values.iter() {
        let Some(station) = stations.get(code) else {
            skipped += 1;
            continue;
        };
        records.push(PointRecord {
            code: code.to_string(),
            name: station.display_name().to_string(),
            lat: station.latitude(),
            lon: station.longitude(),
            values: readings.clone(),
        });
    }
    if skipped > 0 {
        debug!("{} map entries have no station table entry", skipped);
    }
    records
}

/// Features without a station code are skipped. A feature without a point
/// geometry fails the whole collection.
fn normalize_features(collection: &FeatureCollection) -> Result<Vec<PointRecord>> {
    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;
    for (index, feature) in collection.features.iter().enumerate() {
        let Some(code) = feature.code() else {
            skipped += 1;
            continue;
        };
        let record = feature_to_record(feature, code).map_err(|e| match e {
            AmedasError::MalformedSnapshot(msg) => {
                AmedasError::MalformedSnapshot(format!("feature {}: {}", index, msg))
            }
            other => other,
        })?;
        records.push(record);
    }
    if skipped > 0 {
        debug!("{} features have no station code", skipped);
    }
    Ok(records)
}

fn feature_to_record(feature: &Feature, code: String) -> Result<PointRecord> {
    let (lon, lat) = feature.point()?;
    let values = feature
        .properties
        .iter()
        .map(|(field, raw)| (field.clone(), RawValue::from(raw)))
        .collect();
    Ok(PointRecord {
        code,
        name: resolve_name(feature),
        lat,
        lon,
        values,
    })
}

fn resolve_name(feature: &Feature) -> String {
    NAME_FIELDS
        .iter()
        .find_map(|field| match feature.properties.get(*field) {
            Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNNAMED_STATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "44132": {"type":"A","lat":[35,41.5],"lon":[139,45.0],"alt":25,"kjName":"東京","enName":"Tokyo"},
        "62078": {"type":"A","lat":[34,40.9],"lon":[135,31.1],"alt":23,"kjName":"大阪","enName":"Osaka"},
        "57066": {"type":"A","lat":[36,42.5],"lon":[137,12.1],"alt":9,"kjName":"富山","enName":"Toyama"}
    }"#;

    const MAP: &str = r#"{
        "62078": {"temp":[11.3,0],"humidity":[52,0]},
        "99999": {"temp":[30.0,0]},
        "44132": {"temp":[12.0,0],"wind":[2.8,0],"precipitation1h":[null,5]}
    }"#;

    fn table_payload() -> UpstreamPayload {
        UpstreamPayload::Table {
            stations: Arc::new(StationTable::from_json(TABLE).unwrap()),
            values: ValueMap::from_json(MAP).unwrap(),
        }
    }

    #[test]
    fn test_table_shape_joins_on_code() {
        let records = normalize(&table_payload()).unwrap();
        let codes: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
        // 99999 has no station entry, 57066 has no readings
        assert_eq!(codes, vec!["62078", "44132"]);

        let tokyo = &records[1];
        assert_eq!(tokyo.name, "東京");
        assert!((tokyo.lat - 35.691_666_666_666_67).abs() < 1e-9);
        assert!((tokyo.lon - 139.75).abs() < 1e-9);
        assert_eq!(tokyo.get("temp").and_then(RawValue::as_number), Some(12.0));
        assert_eq!(tokyo.get("precipitation1h").and_then(RawValue::as_number), None);
        // readings absent upstream stay absent
        assert!(tokyo.get("humidity").is_none());
        assert!(records[0].get("wind").is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let payload = table_payload();
        assert_eq!(normalize(&payload).unwrap(), normalize(&payload).unwrap());
    }

    #[test]
    fn test_feature_shape_passes_through() {
        let json = r#"{"features":[
            {"geometry":{"coordinates":[142.3717,43.7567]},"properties":{"code":"12442","kjName":"旭川","nameJP":"旭川（あさひかわ）","snowd":82}},
            {"geometry":{"coordinates":[141.935,45.52]},"properties":{"code":11001,"snowd":5}},
            {"geometry":{"coordinates":[139.05,37.89]},"properties":{"code":"54232","name":"Niigata","kjName":""}}
        ]}"#;
        let payload = UpstreamPayload::Features(FeatureCollection::from_json(json).unwrap());
        let records = normalize(&payload).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "旭川（あさひかわ）");
        assert_eq!((records[0].lon, records[0].lat), (142.3717, 43.7567));
        assert_eq!(records[0].get("snowd"), Some(&RawValue::Number(82.0)));
        assert_eq!(records[1].code, "11001");
        assert_eq!(records[1].name, UNNAMED_STATION);
        assert_eq!(records[2].name, "Niigata");
    }

    #[test]
    fn test_feature_without_code_is_skipped() {
        let json = r#"{"features":[
            {"geometry":{"coordinates":[142.3717,43.7567]},"properties":{"code":"12442","snowd":82}},
            {"geometry":{"coordinates":[141.9,45.5]},"properties":{"snowd":5}},
            {"geometry":{"coordinates":[139.05,37.89]},"properties":{"code":"","snowd":10}},
            {"geometry":{"coordinates":[140.77,40.82]},"properties":{"code":"31312","snowd":120}}
        ]}"#;
        let payload = UpstreamPayload::Features(FeatureCollection::from_json(json).unwrap());
        let records = normalize(&payload).unwrap();
        let codes: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["12442", "31312"]);
    }

    #[test]
    fn test_feature_without_point_is_malformed() {
        let json = r#"{"features":[{"geometry":{"coordinates":[]},"properties":{"code":"12442"}}]}"#;
        let payload = UpstreamPayload::Features(FeatureCollection::from_json(json).unwrap());
        assert!(normalize(&payload).is_err());
    }

    #[test]
    fn test_build_snapshot_times() {
        let snapshot = Snapshot::build(
            &table_payload(),
            &ObservationTime::Local("2025/01/15 12:00".to_string()),
        )
        .unwrap();
        assert_eq!(snapshot.observed_at, "2025/01/15 12:00");
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.find("44132").is_some());

        let utc = ObservationTime::UtcCompact("20250115030000".to_string());
        assert_eq!(utc.display(), "2025/01/15 12:00");
        let short = ObservationTime::UtcCompact("2025".to_string());
        assert_eq!(short.display(), "--/-- --:--");
    }

    #[test]
    fn test_empty_inputs() {
        let payload = UpstreamPayload::Features(FeatureCollection::default());
        assert!(normalize(&payload).unwrap().is_empty());
        assert!(Snapshot::empty().is_empty());
    }
}
