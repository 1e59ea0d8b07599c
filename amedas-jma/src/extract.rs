//! Resolving a metric's numeric value from a canonical record.

use crate::metric::MetricId;
use crate::record::PointRecord;
use log::debug;
use std::collections::HashMap;

/// Per-metric list of record fields to try, in order. Metrics without an
/// entry are looked up under their own wire name.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueExtractor {
    aliases: HashMap<MetricId, Vec<String>>,
}

impl Default for ValueExtractor {
    /// Snow depth arrives as `snowd` in GeoJSON, `snow` in map files and
    /// occasionally as a bare `val`.
    fn default() -> Self {
        Self::new().with_aliases(MetricId::Snow, &["snowd", "snow", "val"])
    }
}

impl ValueExtractor {
    /// An extractor with no aliases at all.
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    pub fn with_aliases(mut self, metric: MetricId, fields: &[&str]) -> Self {
        self.aliases
            .insert(metric, fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Fields consulted for `metric`, in order.
    pub fn fields(&self, metric: MetricId) -> Vec<&str> {
        match self.aliases.get(&metric) {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => vec![metric.as_str()],
        }
    }

    /// The value of `metric` for `record`, or `None` if absent or unusable.
    ///
    /// The first field that is present wins, even if its value then fails to
    /// coerce. `[value, flag]` pairs yield their first element.
    pub fn extract(&self, record: &PointRecord, metric: MetricId) -> Option<f64> {
        let fields = self.fields(metric);
        let raw = fields.iter().find_map(|field| record.get(field))?;
        let value = raw.as_number();
        if value.is_none() {
            debug!(
                "station {}: unusable {} value {:?}",
                record.code, metric, raw
            );
        }
        value
    }
}
