//! GeoJSON point features, as served by the snow-depth tile API
//! (`/bosai/jmatile/data/snow/.../amds_snowd/data.geojson`).

use crate::error::{AmedasError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// `[lon, lat]` in decimal degrees
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// `(lon, lat)` of the point.
    pub fn point(&self) -> Result<(f64, f64)> {
        match self.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(AmedasError::MalformedSnapshot(format!(
                "point geometry needs two coordinates, found {}",
                self.geometry.coordinates.len()
            ))),
        }
    }

    /// The station code, accepting either a string or a number upstream.
    pub fn code(&self) -> Option<String> {
        match self.properties.get("code")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AmedasError::MalformedSnapshot(format!("feature collection: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[142.3717,43.7567]},
             "properties":{"code":12442,"nameJP":"旭川","snowd":82}}]}"#;
        let collection = FeatureCollection::from_json(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.point().unwrap(), (142.3717, 43.7567));
        assert_eq!(feature.code().as_deref(), Some("12442"));
    }

    #[test]
    fn test_missing_geometry_is_malformed() {
        let json = r#"{"features":[{"properties":{"code":"12442"}}]}"#;
        assert!(matches!(
            FeatureCollection::from_json(json),
            Err(AmedasError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_missing_features_is_malformed() {
        assert!(FeatureCollection::from_json(r#"{"type":"FeatureCollection"}"#).is_err());
    }

    #[test]
    fn test_short_coordinates() {
        let json = r#"{"features":[{"geometry":{"coordinates":[142.3]},"properties":{}}]}"#;
        let collection = FeatureCollection::from_json(json).unwrap();
        assert!(collection.features[0].point().is_err());
        assert_eq!(collection.features[0].code(), None);
    }
}
