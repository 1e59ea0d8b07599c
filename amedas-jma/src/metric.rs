use crate::error::{AmedasError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Identifier of an observed quantity, spelled the way JMA spells the
/// element in its map files (`temp`, `precipitation1h`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    Temp,
    Wind,
    Precipitation10m,
    Precipitation1h,
    Precipitation3h,
    Precipitation24h,
    /// Snow depth
    Snow,
    Snow6h,
    Snow12h,
    Snow24h,
    Humidity,
    Sun1h,
}

impl MetricId {
    /// Every identifier, in catalog display order.
    pub const ALL: [MetricId; 12] = [
        MetricId::Temp,
        MetricId::Precipitation10m,
        MetricId::Precipitation1h,
        MetricId::Precipitation3h,
        MetricId::Precipitation24h,
        MetricId::Wind,
        MetricId::Snow,
        MetricId::Snow6h,
        MetricId::Snow12h,
        MetricId::Snow24h,
        MetricId::Humidity,
        MetricId::Sun1h,
    ];

    /// The upstream field name for this metric.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricId::Temp => "temp",
            MetricId::Wind => "wind",
            MetricId::Precipitation10m => "precipitation10m",
            MetricId::Precipitation1h => "precipitation1h",
            MetricId::Precipitation3h => "precipitation3h",
            MetricId::Precipitation24h => "precipitation24h",
            MetricId::Snow => "snow",
            MetricId::Snow6h => "snow6h",
            MetricId::Snow12h => "snow12h",
            MetricId::Snow24h => "snow24h",
            MetricId::Humidity => "humidity",
            MetricId::Sun1h => "sun1h",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = AmedasError;

    fn from_str(s: &str) -> Result<Self> {
        MetricId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AmedasError::UnknownMetric(s.to_string()))
    }
}

/// One classification band: values at or above `minimum` (and below the next
/// band up) are drawn in `color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBucket {
    pub minimum: f64,
    pub color: String,
    pub label: String,
}

impl ColorBucket {
    pub fn new(minimum: f64, color: &str, label: &str) -> Self {
        Self {
            minimum,
            color: color.to_string(),
            label: label.to_string(),
        }
    }
}

/// Display and classification metadata for a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: MetricId,
    /// Human-readable name (Japanese, as shown on the map legend)
    pub name: String,
    pub unit: String,
    pub icon: String,
    /// JMA element code used when requesting tiles for this metric
    pub elem_code: String,
    /// Buckets sorted descending by `minimum`
    pub buckets: Vec<ColorBucket>,
    /// Rank highest values first
    pub sort_descending: bool,
}

impl Metric {
    /// Check that the bucket list is non-empty and strictly descending.
    pub fn validate(&self) -> Result<()> {
        if self.buckets.is_empty() {
            return Err(AmedasError::InvalidCatalog(format!(
                "metric '{}' has no color buckets",
                self.id
            )));
        }
        for pair in self.buckets.windows(2) {
            if pair[0].minimum.partial_cmp(&pair[1].minimum) != Some(Ordering::Greater) {
                return Err(AmedasError::InvalidCatalog(format!(
                    "metric '{}' buckets not strictly descending at {} / {}",
                    self.id, pair[0].minimum, pair[1].minimum
                )));
            }
        }
        Ok(())
    }

    /// The bucket with the smallest `minimum`.
    pub fn lowest_bucket(&self) -> Option<&ColorBucket> {
        self.buckets.last()
    }
}
