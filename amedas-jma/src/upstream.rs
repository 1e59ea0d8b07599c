//! Assembling snapshot payloads from upstream documents.
//!
//! These helpers turn raw response bodies into an [`UpstreamPayload`] plus its
//! observation time. They are shared by the HTTP client and by anything that
//! serves the same documents from disk.

use crate::error::{AmedasError, Result};
use crate::feature::FeatureCollection;
use crate::snapshot::{ObservationTime, Snapshot, UpstreamPayload};
use crate::station::{StationTable, ValueMap};
use amedas_utils::dates::{format_jst, map_file_stamp, parse_latest_time};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Element name marking a snow-depth tile set in `targetTimes.json`.
pub const SNOW_DEPTH_ELEMENT: &str = "amds_snowd";

/// A payload and the observation time it belongs to.
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    pub payload: UpstreamPayload,
    pub time: ObservationTime,
}

impl FetchedSnapshot {
    pub fn build(&self) -> Result<Snapshot> {
        Snapshot::build(&self.payload, &self.time)
    }
}

/// One entry of the snow tile `targetTimes.json` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowTimeData {
    pub basetime: String,
    pub validtime: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(rename = "obstimeJST", default, skip_serializing_if = "Option::is_none")]
    pub obstime_jst: Option<String>,
}

impl SnowTimeData {
    pub fn has_snow_depth(&self) -> bool {
        self.elements.iter().any(|e| e == SNOW_DEPTH_ELEMENT)
    }

    /// Prefer the local time JMA supplies; otherwise convert `validtime`.
    pub fn observation_time(&self) -> ObservationTime {
        match &self.obstime_jst {
            Some(local) if !local.is_empty() => ObservationTime::Local(local.clone()),
            _ => ObservationTime::UtcCompact(self.validtime.clone()),
        }
    }

    /// Path of the GeoJSON document below the snow tile base URL.
    pub fn geojson_path(&self) -> String {
        format!(
            "{}/none/{}/surf/{}/data.geojson",
            self.basetime, self.validtime, SNOW_DEPTH_ELEMENT
        )
    }
}

/// Parse `targetTimes.json`.
pub fn parse_target_times(json: &str) -> Result<Vec<SnowTimeData>> {
    serde_json::from_str(json)
        .map_err(|e| AmedasError::Retrieval(format!("targetTimes is not a list: {}", e)))
}

/// The newest entry that carries snow depth. Listings are newest-first.
pub fn latest_snow_time(times: &[SnowTimeData]) -> Result<&SnowTimeData> {
    times.iter().find(|t| t.has_snow_depth()).ok_or_else(|| {
        AmedasError::Retrieval(format!(
            "valid snow data ({}) not found in targetTimes",
            SNOW_DEPTH_ELEMENT
        ))
    })
}

/// Parse the body of `latest_time.txt`.
pub fn parse_latest(text: &str) -> Result<DateTime<FixedOffset>> {
    parse_latest_time(text)
        .map_err(|e| AmedasError::Retrieval(format!("latest_time: {}", e)))
}

/// File name of the ten-minute map covering `latest`.
pub fn map_file_name(latest: &DateTime<FixedOffset>) -> String {
    format!("{}.json", map_file_stamp(latest))
}

/// Table-shape payload from the station table and a map file body.
pub fn table_snapshot(
    stations: Arc<StationTable>,
    map_json: &str,
    latest: &DateTime<FixedOffset>,
) -> Result<FetchedSnapshot> {
    Ok(FetchedSnapshot {
        payload: UpstreamPayload::Table {
            stations,
            values: ValueMap::from_json(map_json)?,
        },
        time: ObservationTime::Local(format_jst(latest)),
    })
}

/// Feature-shape payload from a GeoJSON body.
pub fn feature_snapshot(geojson: &str, time: &SnowTimeData) -> Result<FetchedSnapshot> {
    Ok(FetchedSnapshot {
        payload: UpstreamPayload::Features(FeatureCollection::from_json(geojson)?),
        time: time.observation_time(),
    })
}
