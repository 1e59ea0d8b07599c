use serde_json::Value;
use std::collections::BTreeMap;

/// A reading as it arrived from upstream, before numeric coercion.
///
/// Map files encode readings as `[value, qualityFlag]`; GeoJSON properties
/// carry bare numbers (or occasionally strings).
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Pair {
        value: Box<RawValue>,
        flag: Option<i64>,
    },
    /// Present but empty: `null`, `[]`, booleans and objects
    Missing,
}

impl RawValue {
    /// Coerce to a finite number. Never fails; anything unusable is `None`.
    ///
    /// The quality flag of a pair is ignored.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            RawValue::Pair { value, .. } => value.as_number(),
            RawValue::Missing => None,
        }
    }

    pub fn flag(&self) -> Option<i64> {
        match self {
            RawValue::Pair { flag, .. } => *flag,
            _ => None,
        }
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Array(items) => match items.first() {
                Some(first) => RawValue::Pair {
                    value: Box::new(RawValue::from(first)),
                    flag: items.get(1).and_then(Value::as_i64),
                },
                None => RawValue::Missing,
            },
            Value::Null | Value::Bool(_) | Value::Object(_) => RawValue::Missing,
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One station's readings within a single snapshot, in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// AMeDAS station code (e.g. "44132" for Tokyo)
    pub code: String,
    /// Resolved display name
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Readings keyed by upstream field name. Fields that were absent
    /// upstream are absent here.
    pub values: BTreeMap<String, RawValue>,
}

impl PointRecord {
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.values.get(field)
    }
}
