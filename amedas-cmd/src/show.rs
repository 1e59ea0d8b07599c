//! Loading a snapshot and printing the ranking for one metric.

use crate::favorites_store::FileFavoritesStore;
use crate::source::Source;
use amedas_data::{RankingEngine, RankingItem, SnapshotStore, ViewState};
use amedas_jma::catalog::MetricCatalog;
use amedas_jma::jma::{FetchConfig, DEFAULT_PROXY};
use amedas_jma::metric::{Metric, MetricId};
use anyhow::Context;
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogEdition {
    /// Temperature, 1h precipitation, wind, snow depth and humidity
    Standard,
    /// All twelve metrics
    Extended,
}

/// Built-in catalog for `edition`, or the catalog in `file` when given.
pub fn load_catalog(edition: CatalogEdition, file: Option<&Path>) -> anyhow::Result<MetricCatalog> {
    if let Some(path) = file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = MetricCatalog::from_json(&json)
            .with_context(|| format!("Invalid catalog {}", path.display()))?;
        info!("Loaded {} metrics from {}", catalog.metrics().len(), path.display());
        return Ok(catalog);
    }
    Ok(match edition {
        CatalogEdition::Standard => MetricCatalog::standard(),
        CatalogEdition::Extended => MetricCatalog::extended(),
    })
}

/// Options of the `show` command.
pub struct ShowOptions {
    pub metric: MetricId,
    pub favorites_mode: bool,
    pub fixtures: Option<PathBuf>,
    pub proxy: Option<String>,
    pub favorites_file: PathBuf,
    pub catalog: CatalogEdition,
    pub catalog_file: Option<PathBuf>,
    pub json: bool,
}

#[derive(Serialize)]
struct RankingReport<'a> {
    metric: MetricId,
    name: &'a str,
    unit: &'a str,
    observed_at: &'a str,
    favorites_mode: bool,
    visible: usize,
    ranking: &'a [RankingItem],
}

pub async fn run_show(options: ShowOptions) -> anyhow::Result<()> {
    let catalog = load_catalog(options.catalog, options.catalog_file.as_deref())?;
    let metric = catalog.lookup(options.metric)?;

    let config = FetchConfig {
        proxy: options.proxy.map(|p| {
            if p.is_empty() {
                DEFAULT_PROXY.to_string()
            } else {
                p
            }
        }),
        ..FetchConfig::default()
    };
    let source = Source::new(options.fixtures, config)?;

    let store = SnapshotStore::new();
    let fetched = source.fetch(options.metric).await;
    let snapshot = store
        .replace(fetched.and_then(|f| f.build()))
        .with_context(|| format!("Failed to load {} snapshot", options.metric))?;

    let favorites = FileFavoritesStore::new(&options.favorites_file).load();
    let state = ViewState::new(options.metric, options.favorites_mode);
    let engine = RankingEngine::new(&catalog);
    let visible = engine.visible(&snapshot, &state, &favorites)?;
    let ranking = engine.ranking(&snapshot, &state, &favorites)?;

    if options.json {
        let report = RankingReport {
            metric: options.metric,
            name: &metric.name,
            unit: &metric.unit,
            observed_at: &snapshot.observed_at,
            favorites_mode: state.favorites_mode,
            visible: visible.len(),
            ranking: &ranking,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_ranking(metric, &snapshot.observed_at, &state, visible.len(), &ranking);
    Ok(())
}

fn print_ranking(
    metric: &Metric,
    observed_at: &str,
    state: &ViewState,
    visible: usize,
    ranking: &[RankingItem],
) {
    let title = if state.favorites_mode {
        "お気に入り"
    } else {
        "ランキング"
    };
    println!("{} {} {} ({})", metric.icon, metric.name, title, observed_at);
    println!("{} stations with data", visible);
    if ranking.is_empty() {
        println!("  (no stations)");
        return;
    }
    for (rank, item) in ranking.iter().enumerate() {
        println!(
            "{:>3}. {:<12} {:>5} {:>8.1}{}",
            rank + 1,
            item.name,
            item.code,
            item.value,
            metric.unit
        );
    }
}

/// Print every metric in the selected catalog.
pub fn run_metrics(edition: CatalogEdition, file: Option<&Path>, buckets: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(edition, file)?;
    for metric in catalog.metrics() {
        let order = if metric.sort_descending { "desc" } else { "asc" };
        println!(
            "{:<17} {} {} [{}] sort {}",
            metric.id.as_str(),
            metric.icon,
            metric.name,
            metric.unit,
            order
        );
        if buckets {
            for bucket in &metric.buckets {
                println!("    {:<8} {}", bucket.color, bucket.label);
            }
        }
    }
    Ok(())
}
