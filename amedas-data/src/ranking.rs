//! Visible-set filtering and ranking for the selected metric.

use crate::favorites::FavoriteSet;
use crate::state::ViewState;
use amedas_jma::catalog::MetricCatalog;
use amedas_jma::classify::classify;
use amedas_jma::error::Result;
use amedas_jma::extract::ValueExtractor;
use amedas_jma::metric::{Metric, MetricId};
use amedas_jma::record::PointRecord;
use amedas_jma::snapshot::Snapshot;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;

/// Length of the ranking outside favorites mode
pub const RANKING_LIMIT: usize = 10;

/// Snow depth JMA reports for stations that have no reading
pub const SNOW_DEPTH_MISSING: f64 = 32767.0;

/// One row of the ranking list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingItem {
    pub code: String,
    pub name: String,
    pub value: f64,
    pub lat: f64,
    pub lon: f64,
}

/// A record that survives filtering, with its value and map color.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRecord<'a> {
    pub record: &'a PointRecord,
    pub value: f64,
    pub color: &'a str,
    pub label: Option<&'a str>,
}

impl VisibleRecord<'_> {
    pub fn to_ranking_item(&self) -> RankingItem {
        RankingItem {
            code: self.record.code.clone(),
            name: self.record.name.clone(),
            value: self.value,
            lat: self.record.lat,
            lon: self.record.lon,
        }
    }
}

/// Derives the visible set and the ranking list. Both are recomputed on
/// every call from the snapshot passed in.
#[derive(Debug, Clone)]
pub struct RankingEngine<'c> {
    catalog: &'c MetricCatalog,
    extractor: ValueExtractor,
}

impl<'c> RankingEngine<'c> {
    pub fn new(catalog: &'c MetricCatalog) -> Self {
        Self::with_extractor(catalog, ValueExtractor::default())
    }

    pub fn with_extractor(catalog: &'c MetricCatalog, extractor: ValueExtractor) -> Self {
        Self { catalog, extractor }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        self.catalog
    }

    /// Records with a usable value for the selected metric, in snapshot
    /// order. In favorites mode only favorite codes are kept.
    pub fn visible<'s, F>(
        &'s self,
        snapshot: &'s Snapshot,
        state: &ViewState,
        favorites: &F,
    ) -> Result<Vec<VisibleRecord<'s>>>
    where
        F: FavoriteSet + ?Sized,
    {
        let metric = self.catalog.lookup(state.metric)?;
        let visible: Vec<_> = self
            .valued(snapshot, metric)
            .filter(|(record, _)| !state.favorites_mode || favorites.contains(&record.code))
            .map(|(record, value)| {
                let classification = classify(Some(value), metric);
                VisibleRecord {
                    record,
                    value,
                    color: classification.color,
                    label: classification.label,
                }
            })
            .collect();
        debug!(
            "{} of {} records visible for {}",
            visible.len(),
            snapshot.len(),
            state.metric
        );
        Ok(visible)
    }

    /// Sorted ranking for the selected metric. Ties keep snapshot order.
    /// Capped at [`RANKING_LIMIT`] unless favorites mode is on.
    pub fn ranking<F>(
        &self,
        snapshot: &Snapshot,
        state: &ViewState,
        favorites: &F,
    ) -> Result<Vec<RankingItem>>
    where
        F: FavoriteSet + ?Sized,
    {
        let metric = self.catalog.lookup(state.metric)?;
        let mut rows: Vec<(&PointRecord, f64)> = self
            .valued(snapshot, metric)
            .filter(|(record, _)| !state.favorites_mode || favorites.contains(&record.code))
            .collect();

        // sort_by is stable; values are finite and -0.0 ties with 0.0
        if metric.sort_descending {
            rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        } else {
            rows.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        }
        if !state.favorites_mode {
            rows.truncate(RANKING_LIMIT);
        }

        Ok(rows
            .into_iter()
            .map(|(record, value)| RankingItem {
                code: record.code.clone(),
                name: record.name.clone(),
                value,
                lat: record.lat,
                lon: record.lon,
            })
            .collect())
    }

    /// Records paired with their value, excluding absent readings and the
    /// snow depth sentinel.
    fn valued<'s>(
        &'s self,
        snapshot: &'s Snapshot,
        metric: &'s Metric,
    ) -> impl Iterator<Item = (&'s PointRecord, f64)> + 's {
        snapshot.records.iter().filter_map(move |record| {
            let value = self.extractor.extract(record, metric.id)?;
            if metric.id == MetricId::Snow && value == SNOW_DEPTH_MISSING {
                return None;
            }
            Some((record, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::Favorites;
    use amedas_jma::error::AmedasError;
    use amedas_jma::record::RawValue;
    use std::collections::{BTreeMap, HashSet};

    fn record(code: &str, field: &str, value: RawValue) -> PointRecord {
        let mut values = BTreeMap::new();
        values.insert(field.to_string(), value);
        PointRecord {
            code: code.to_string(),
            name: format!("station {}", code),
            lat: 35.0,
            lon: 139.0,
            values,
        }
    }

    fn snapshot(records: Vec<PointRecord>) -> Snapshot {
        Snapshot {
            observed_at: "2025/01/15 12:00".to_string(),
            records,
        }
    }

    fn codes(items: &[RankingItem]) -> Vec<&str> {
        items.iter().map(|i| i.code.as_str()).collect()
    }

    fn no_favorites() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("A", "temp", RawValue::Number(30.0)),
            record("C", "temp", RawValue::Number(10.0)),
            record("B", "temp", RawValue::Number(30.0)),
        ]);
        let ranking = engine
            .ranking(&snap, &ViewState::default(), &no_favorites())
            .unwrap();
        assert_eq!(codes(&ranking), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_signed_zero_ties_keep_snapshot_order() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("A", "temp", RawValue::Number(-0.0)),
            record("B", "temp", RawValue::Number(0.0)),
            record("C", "temp", RawValue::Number(-0.0)),
        ]);
        let ranking = engine
            .ranking(&snap, &ViewState::default(), &no_favorites())
            .unwrap();
        assert_eq!(codes(&ranking), vec!["A", "B", "C"]);

        let mut metric = catalog.lookup(MetricId::Temp).unwrap().clone();
        metric.sort_descending = false;
        let ascending = MetricCatalog::new(vec![metric]).unwrap();
        let ranking = RankingEngine::new(&ascending)
            .ranking(&snap, &ViewState::default(), &no_favorites())
            .unwrap();
        assert_eq!(codes(&ranking), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_ascending_metric() {
        let mut metric = MetricCatalog::standard().lookup(MetricId::Temp).unwrap().clone();
        metric.sort_descending = false;
        let catalog = MetricCatalog::new(vec![metric]).unwrap();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("A", "temp", RawValue::Number(3.0)),
            record("B", "temp", RawValue::Number(-1.0)),
            record("C", "temp", RawValue::Number(3.0)),
        ]);
        let ranking = engine
            .ranking(&snap, &ViewState::default(), &no_favorites())
            .unwrap();
        assert_eq!(codes(&ranking), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_top_n_cap_only_outside_favorites_mode() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let records: Vec<_> = (0..15)
            .map(|i| record(&format!("{:05}", i), "temp", RawValue::Number(i as f64)))
            .collect();
        let snap = snapshot(records);

        let ranking = engine
            .ranking(&snap, &ViewState::default(), &no_favorites())
            .unwrap();
        assert_eq!(ranking.len(), RANKING_LIMIT);
        assert_eq!(ranking[0].value, 14.0);
        assert_eq!(ranking[9].value, 5.0);

        let all: Favorites = Favorites::from_codes((0..15).map(|i| format!("{:05}", i)));
        let state = ViewState::new(MetricId::Temp, true);
        assert_eq!(engine.ranking(&snap, &state, &all).unwrap().len(), 15);
        assert_eq!(engine.visible(&snap, &state, &all).unwrap().len(), 15);
    }

    #[test]
    fn test_favorites_mode_filters() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("11001", "temp", RawValue::Number(-2.3)),
            record("44132", "temp", RawValue::Number(12.0)),
        ]);
        let favorites = Favorites::from_codes(["11001"]);
        let state = ViewState::new(MetricId::Temp, true);

        let visible = engine.visible(&snap, &state, &favorites).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].record.code, "11001");
        assert_eq!(codes(&engine.ranking(&snap, &state, &favorites).unwrap()), vec!["11001"]);

        // favorites are ignored when the mode is off
        let visible = engine.visible(&snap, &ViewState::default(), &favorites).unwrap();
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_snow_sentinel_excluded() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("A", "snowd", RawValue::Number(32767.0)),
            record("B", "snowd", RawValue::Number(40.0)),
            record("C", "snow", RawValue::Number(0.0)),
        ]);
        let state = ViewState::new(MetricId::Snow, false);
        let visible = engine.visible(&snap, &state, &no_favorites()).unwrap();
        let visible_codes: Vec<_> = visible.iter().map(|v| v.record.code.as_str()).collect();
        assert_eq!(visible_codes, vec!["B", "C"]);
        assert_eq!(
            codes(&engine.ranking(&snap, &state, &no_favorites()).unwrap()),
            vec!["B", "C"]
        );
    }

    #[test]
    fn test_sentinel_only_applies_to_snow() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![record("A", "humidity", RawValue::Number(32767.0))]);
        let state = ViewState::new(MetricId::Humidity, false);
        assert_eq!(engine.ranking(&snap, &state, &no_favorites()).unwrap().len(), 1);
    }

    #[test]
    fn test_absent_values_excluded() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![
            record("A", "temp", RawValue::Missing),
            record("B", "wind", RawValue::Number(3.0)),
            record("C", "temp", RawValue::Text("n/a".to_string())),
        ]);
        let state = ViewState::default();
        assert!(engine.visible(&snap, &state, &no_favorites()).unwrap().is_empty());
        assert!(engine.ranking(&snap, &state, &no_favorites()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_snapshot_is_not_an_error() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = Snapshot::empty();
        assert!(engine.visible(&snap, &ViewState::default(), &no_favorites()).unwrap().is_empty());
        assert!(engine.ranking(&snap, &ViewState::default(), &no_favorites()).unwrap().is_empty());
    }

    #[test]
    fn test_metric_missing_from_catalog() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let state = ViewState::new(MetricId::Sun1h, false);
        let err = engine
            .ranking(&Snapshot::empty(), &state, &no_favorites())
            .unwrap_err();
        assert!(matches!(err, AmedasError::UnknownMetric(_)));
    }

    #[test]
    fn test_visible_carries_classification() {
        let catalog = MetricCatalog::standard();
        let engine = RankingEngine::new(&catalog);
        let snap = snapshot(vec![record("44132", "temp", RawValue::Number(12.0))]);
        let visible = engine.visible(&snap, &ViewState::default(), &no_favorites()).unwrap();
        assert_eq!(visible[0].color, "#00cfff");
        assert_eq!(visible[0].label, Some("10℃ ～"));
        let item = visible[0].to_ranking_item();
        assert_eq!(item.value, 12.0);
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"code":"44132","name":"station 44132","value":12.0,"lat":35.0,"lon":139.0}"#
        );
    }
}
