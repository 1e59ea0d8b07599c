//! Where snapshots come from: the live JMA API or a directory of recorded
//! documents laid out like `fixtures/`.

use amedas_jma::error::{AmedasError, Result};
use amedas_jma::jma::{FetchConfig, JmaClient};
use amedas_jma::metric::MetricId;
use amedas_jma::station::StationTable;
use amedas_jma::upstream::{
    feature_snapshot, latest_snow_time, parse_latest, parse_target_times, table_snapshot,
    FetchedSnapshot,
};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const STATION_TABLE_FILE: &str = "amedastable.json";
pub const MAP_DATA_FILE: &str = "map_data.json";
pub const LATEST_TIME_FILE: &str = "latest_time.txt";
pub const TARGET_TIMES_FILE: &str = "targetTimes.json";
pub const SNOW_DATA_FILE: &str = "snow_data.geojson";

pub enum Source {
    Live(JmaClient),
    Fixtures(PathBuf),
}

impl Source {
    /// Recorded documents when `fixtures` is given, the live API otherwise.
    pub fn new(fixtures: Option<PathBuf>, config: FetchConfig) -> Result<Self> {
        match fixtures {
            Some(dir) => {
                info!("Reading snapshots from {}", dir.display());
                Ok(Source::Fixtures(dir))
            }
            None => Ok(Source::Live(JmaClient::new(config)?)),
        }
    }

    pub async fn fetch(&self, metric: MetricId) -> Result<FetchedSnapshot> {
        match self {
            Source::Live(client) => client.fetch(metric).await,
            Source::Fixtures(dir) => read_fixtures(dir, metric),
        }
    }
}

fn read_fixtures(dir: &Path, metric: MetricId) -> Result<FetchedSnapshot> {
    if metric == MetricId::Snow {
        let times = parse_target_times(&read(dir, TARGET_TIMES_FILE)?)?;
        let latest = latest_snow_time(&times)?;
        return feature_snapshot(&read(dir, SNOW_DATA_FILE)?, latest);
    }
    let stations = Arc::new(StationTable::from_json(&read(dir, STATION_TABLE_FILE)?)?);
    let latest = parse_latest(&read(dir, LATEST_TIME_FILE)?)?;
    table_snapshot(stations, &read(dir, MAP_DATA_FILE)?, &latest)
}

fn read(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    std::fs::read_to_string(&path)
        .map_err(|e| AmedasError::Retrieval(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    #[tokio::test]
    async fn test_fixture_source_map_and_snow() {
        let source = Source::new(Some(fixtures_dir()), FetchConfig::default()).unwrap();

        let temp = source.fetch(MetricId::Temp).await.unwrap().build().unwrap();
        assert_eq!(temp.len(), 11);
        assert_eq!(temp.observed_at, "2025/01/15 12:00");

        let snow = source.fetch(MetricId::Snow).await.unwrap().build().unwrap();
        assert_eq!(snow.len(), 8);
    }

    #[tokio::test]
    async fn test_missing_fixture_dir_is_retrieval_failure() {
        let source = Source::Fixtures(PathBuf::from("/nonexistent/amedas"));
        match source.fetch(MetricId::Wind).await {
            Err(AmedasError::Retrieval(msg)) => assert!(msg.contains(STATION_TABLE_FILE)),
            other => panic!("expected retrieval failure, got {:?}", other.map(|_| ())),
        }
    }
}
