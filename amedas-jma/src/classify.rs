//! Threshold classification of readings into map colors.

use crate::metric::{ColorBucket, Metric};

/// Color for stations with no usable reading.
pub const NEUTRAL_COLOR: &str = "#ccc";

/// The color (and legend label, when a bucket matched) for one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification<'a> {
    pub color: &'a str,
    pub label: Option<&'a str>,
}

impl<'a> Classification<'a> {
    pub const NEUTRAL: Classification<'static> = Classification {
        color: NEUTRAL_COLOR,
        label: None,
    };

    fn from_bucket(bucket: &'a ColorBucket) -> Self {
        Classification {
            color: &bucket.color,
            label: Some(&bucket.label),
        }
    }
}

/// The bucket a value falls into: the first, scanning descending, whose
/// `minimum` is at or below `value`. Values under every minimum fall into the
/// lowest bucket.
pub fn bucket_for(value: f64, metric: &Metric) -> Option<&ColorBucket> {
    if value.is_nan() {
        return None;
    }
    metric
        .buckets
        .iter()
        .find(|bucket| bucket.minimum <= value)
        .or_else(|| metric.lowest_bucket())
}

/// Classify a reading; absent readings get [`Classification::NEUTRAL`].
pub fn classify<'a>(value: Option<f64>, metric: &'a Metric) -> Classification<'a> {
    value
        .and_then(|v| bucket_for(v, metric))
        .map(Classification::from_bucket)
        .unwrap_or(Classification::NEUTRAL)
}
