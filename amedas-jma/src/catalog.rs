//! Registry of known metrics and their color scales.
//!
//! Two editions ship with the crate: `standard` (the five metrics shown on
//! the original map) and `extended` (all twelve AMeDAS elements). Downstream
//! code only ever asks the catalog for a metric by [`MetricId`], so a catalog
//! loaded from JSON can replace either edition.

use crate::error::{AmedasError, Result};
use crate::metric::{ColorBucket, Metric, MetricId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lowest bucket floor used by the built-in editions so that every finite
/// value lands in some bucket.
pub const UNBOUNDED_BELOW: f64 = f64::MIN;

/// An immutable set of metric definitions, looked up by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCatalog {
    metrics: Vec<Metric>,
}

fn buckets(rows: &[(f64, &str, &str)]) -> Vec<ColorBucket> {
    rows.iter()
        .map(|(minimum, color, label)| ColorBucket::new(*minimum, color, label))
        .collect()
}

fn metric(id: MetricId, name: &str, unit: &str, icon: &str, rows: &[(f64, &str, &str)]) -> Metric {
    Metric {
        id,
        name: name.to_string(),
        unit: unit.to_string(),
        icon: icon.to_string(),
        elem_code: id.as_str().to_string(),
        buckets: buckets(rows),
        sort_descending: true,
    }
}

fn temp() -> Metric {
    metric(
        MetricId::Temp,
        "気温",
        "℃",
        "🌡️",
        &[
            (35.0, "#960018", "35℃ ～"),
            (30.0, "#ff2800", "30℃ ～"),
            (25.0, "#ff9900", "25℃ ～"),
            (20.0, "#f2f200", "20℃ ～"),
            (15.0, "#00ff00", "15℃ ～"),
            (10.0, "#00cfff", "10℃ ～"),
            (5.0, "#0041ff", "5℃ ～"),
            (0.0, "#218cff", "0℃ ～"),
            (UNBOUNDED_BELOW, "#a0d2ff", "0℃ 未満"),
        ],
    )
}

fn precipitation1h() -> Metric {
    metric(
        MetricId::Precipitation1h,
        "降水量（1時間）",
        "mm",
        "🌧️",
        &[
            (80.0, "#b40068", "80mm ～"),
            (50.0, "#ff2800", "50mm ～"),
            (30.0, "#ff9900", "30mm ～"),
            (20.0, "#f2f200", "20mm ～"),
            (10.0, "#218cff", "10mm ～"),
            (5.0, "#0041ff", "5mm ～"),
            (1.0, "#a0d2ff", "1mm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0mm"),
        ],
    )
}

fn wind() -> Metric {
    metric(
        MetricId::Wind,
        "風速",
        "m/s",
        "💨",
        &[
            (25.0, "#ff0000", "25m/s ～"),
            (20.0, "#ff5500", "20m/s ～"),
            (15.0, "#ff9900", "15m/s ～"),
            (10.0, "#f2f200", "10m/s ～"),
            (5.0, "#00cf00", "5m/s ～"),
            (3.0, "#00ff7f", "3m/s ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0m/s ～"),
        ],
    )
}

fn snow() -> Metric {
    metric(
        MetricId::Snow,
        "積雪深",
        "cm",
        "⛄",
        &[
            (200.0, "#e600ab", "200cm ～"),
            (150.0, "#ff2800", "150cm ～"),
            (100.0, "#ff9900", "100cm ～"),
            (50.0, "#f2f200", "50cm ～"),
            (20.0, "#0041ff", "20cm ～"),
            (5.0, "#218cff", "5cm ～"),
            (1.0, "#a0d2ff", "1cm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0cm"),
        ],
    )
}

fn humidity() -> Metric {
    metric(
        MetricId::Humidity,
        "湿度",
        "%",
        "💧",
        &[
            (90.0, "#0041ff", "90% ～"),
            (70.0, "#00cfff", "70% ～"),
            (50.0, "#00ff00", "50% ～"),
            (30.0, "#f2f200", "30% ～"),
            (UNBOUNDED_BELOW, "#ff9900", "0% ～"),
        ],
    )
}

fn precipitation10m() -> Metric {
    metric(
        MetricId::Precipitation10m,
        "降水量（10分間）",
        "mm",
        "🌧️",
        &[
            (30.0, "#b40068", "30mm ～"),
            (20.0, "#ff2800", "20mm ～"),
            (10.0, "#ff9900", "10mm ～"),
            (5.0, "#f2f200", "5mm ～"),
            (3.0, "#218cff", "3mm ～"),
            (1.0, "#0041ff", "1mm ～"),
            (0.5, "#a0d2ff", "0.5mm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0mm"),
        ],
    )
}

fn precipitation3h() -> Metric {
    metric(
        MetricId::Precipitation3h,
        "降水量（3時間）",
        "mm",
        "🌧️",
        &[
            (150.0, "#b40068", "150mm ～"),
            (100.0, "#ff2800", "100mm ～"),
            (80.0, "#ff9900", "80mm ～"),
            (50.0, "#f2f200", "50mm ～"),
            (30.0, "#218cff", "30mm ～"),
            (10.0, "#0041ff", "10mm ～"),
            (1.0, "#a0d2ff", "1mm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0mm"),
        ],
    )
}

fn precipitation24h() -> Metric {
    metric(
        MetricId::Precipitation24h,
        "降水量（24時間）",
        "mm",
        "🌧️",
        &[
            (300.0, "#b40068", "300mm ～"),
            (250.0, "#ff2800", "250mm ～"),
            (200.0, "#ff9900", "200mm ～"),
            (150.0, "#f2f200", "150mm ～"),
            (100.0, "#218cff", "100mm ～"),
            (50.0, "#0041ff", "50mm ～"),
            (1.0, "#a0d2ff", "1mm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0mm"),
        ],
    )
}

fn snowfall(id: MetricId, name: &str, rows: &[(f64, &str, &str)]) -> Metric {
    metric(id, name, "cm", "❄️", rows)
}

fn snow6h() -> Metric {
    snowfall(
        MetricId::Snow6h,
        "降雪量（6時間）",
        &[
            (30.0, "#e600ab", "30cm ～"),
            (20.0, "#ff2800", "20cm ～"),
            (10.0, "#ff9900", "10cm ～"),
            (5.0, "#0041ff", "5cm ～"),
            (1.0, "#a0d2ff", "1cm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0cm"),
        ],
    )
}

fn snow12h() -> Metric {
    snowfall(
        MetricId::Snow12h,
        "降雪量（12時間）",
        &[
            (40.0, "#e600ab", "40cm ～"),
            (30.0, "#ff2800", "30cm ～"),
            (20.0, "#ff9900", "20cm ～"),
            (10.0, "#f2f200", "10cm ～"),
            (5.0, "#0041ff", "5cm ～"),
            (1.0, "#a0d2ff", "1cm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0cm"),
        ],
    )
}

fn snow24h() -> Metric {
    snowfall(
        MetricId::Snow24h,
        "降雪量（24時間）",
        &[
            (50.0, "#e600ab", "50cm ～"),
            (40.0, "#ff2800", "40cm ～"),
            (30.0, "#ff9900", "30cm ～"),
            (20.0, "#f2f200", "20cm ～"),
            (10.0, "#218cff", "10cm ～"),
            (5.0, "#0041ff", "5cm ～"),
            (1.0, "#a0d2ff", "1cm ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0cm"),
        ],
    )
}

fn sun1h() -> Metric {
    metric(
        MetricId::Sun1h,
        "日照時間（1時間）",
        "h",
        "☀️",
        &[
            (1.0, "#ff9900", "60分"),
            (0.5, "#f2f200", "30分 ～"),
            (0.1, "#ffffa0", "6分 ～"),
            (UNBOUNDED_BELOW, "#cccccc", "0分"),
        ],
    )
}

impl MetricCatalog {
    /// Build a catalog, validating every metric and rejecting duplicate ids.
    pub fn new(metrics: Vec<Metric>) -> Result<Self> {
        let mut seen = HashSet::new();
        for metric in &metrics {
            metric.validate()?;
            if !seen.insert(metric.id) {
                return Err(AmedasError::InvalidCatalog(format!(
                    "metric '{}' defined more than once",
                    metric.id
                )));
            }
        }
        Ok(Self { metrics })
    }

    /// The five-metric edition: temperature, 1h precipitation, wind,
    /// snow depth and humidity.
    pub fn standard() -> Self {
        Self {
            metrics: vec![temp(), precipitation1h(), wind(), snow(), humidity()],
        }
    }

    /// All twelve AMeDAS elements.
    pub fn extended() -> Self {
        Self {
            metrics: vec![
                temp(),
                precipitation10m(),
                precipitation1h(),
                precipitation3h(),
                precipitation24h(),
                wind(),
                snow(),
                snow6h(),
                snow12h(),
                snow24h(),
                humidity(),
                sun1h(),
            ],
        }
    }

    /// Load a catalog from a JSON document of the form `{"metrics": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: MetricCatalog = serde_json::from_str(json)
            .map_err(|e| AmedasError::InvalidCatalog(e.to_string()))?;
        Self::new(raw.metrics)
    }

    /// Look up a metric by identifier.
    pub fn lookup(&self, id: MetricId) -> Result<&Metric> {
        self.metrics
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| AmedasError::UnknownMetric(id.to_string()))
    }

    /// Look up a metric by its wire name (e.g. "precipitation1h").
    pub fn lookup_name(&self, name: &str) -> Result<&Metric> {
        self.lookup(name.parse()?)
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn contains(&self, id: MetricId) -> bool {
        self.metrics.iter().any(|m| m.id == id)
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_editions_are_valid() {
        for catalog in [MetricCatalog::standard(), MetricCatalog::extended()] {
            let rebuilt = MetricCatalog::new(catalog.metrics().to_vec()).unwrap();
            assert_eq!(rebuilt, catalog);
        }
    }

    #[test]
    fn test_edition_sizes() {
        assert_eq!(MetricCatalog::standard().metrics().len(), 5);
        assert_eq!(MetricCatalog::extended().metrics().len(), 12);
        for id in MetricId::ALL {
            assert!(MetricCatalog::extended().contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_lowest_bucket_is_unbounded() {
        for metric in MetricCatalog::extended().metrics() {
            let lowest = metric.lowest_bucket().unwrap();
            assert_eq!(lowest.minimum, UNBOUNDED_BELOW, "metric {}", metric.id);
        }
    }

    #[test]
    fn test_lookup_unregistered_metric() {
        let catalog = MetricCatalog::standard();
        assert!(catalog.lookup(MetricId::Temp).is_ok());
        let err = catalog.lookup(MetricId::Sun1h).unwrap_err();
        assert!(matches!(err, AmedasError::UnknownMetric(ref s) if s == "sun1h"));
        assert!(matches!(
            catalog.lookup_name("visibility"),
            Err(AmedasError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_standard_temperature_scale() {
        let catalog = MetricCatalog::standard();
        let temp = catalog.lookup_name("temp").unwrap();
        assert!(temp.sort_descending);
        assert_eq!(temp.unit, "℃");
        assert_eq!(temp.buckets.len(), 9);
        assert_eq!(temp.buckets[5].color, "#00cfff");
        assert_eq!(temp.buckets[5].label, "10℃ ～");
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let catalog = MetricCatalog::extended();
        let json = serde_json::to_string(&catalog).unwrap();
        let loaded = MetricCatalog::from_json(&json).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let temp = serde_json::to_value(temp()).unwrap();
        let json = serde_json::json!({ "metrics": [temp.clone(), temp] }).to_string();
        assert!(matches!(
            MetricCatalog::from_json(&json),
            Err(AmedasError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_from_json_custom_single_metric() {
        let json = r##"{"metrics":[{"id":"wind","name":"風速","unit":"m/s","icon":"💨",
            "elem_code":"wind","sort_descending":false,
            "buckets":[{"minimum":10,"color":"#f00","label":"強"},
                       {"minimum":0,"color":"#0f0","label":"弱"}]}]}"##;
        let catalog = MetricCatalog::from_json(json).unwrap();
        let wind = catalog.lookup(MetricId::Wind).unwrap();
        assert!(!wind.sort_descending);
        assert!(catalog.lookup(MetricId::Temp).is_err());
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(MetricCatalog::from_json("{\"metrics\": 3}").is_err());
    }
}
