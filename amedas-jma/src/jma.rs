//! HTTP client for the JMA bosai API.
//!
//! Every request goes through the optional CORS proxy first and then the
//! direct URL, each with exponential backoff.

use crate::error::{AmedasError, Result};
use crate::metric::MetricId;
use crate::station::StationTable;
use crate::upstream::{
    feature_snapshot, latest_snow_time, map_file_name, parse_latest, parse_target_times,
    table_snapshot, FetchedSnapshot,
};
use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Base URL of the AMeDAS JSON API
pub const AMEDAS_BASE_URL: &str = "https://www.jma.go.jp/bosai/amedas";

/// Base URL of the snow tile API
pub const SNOW_TILE_BASE_URL: &str = "https://www.jma.go.jp/bosai/jmatile/data/snow";

/// Public CORS proxy used by the browser build
pub const DEFAULT_PROXY: &str = "https://corsproxy.io/?";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub amedas_base: String,
    pub snow_tile_base: String,
    /// Prefix prepended to the URL-encoded target, tried before the direct URL
    pub proxy: Option<String>,
    pub max_tries: u32,
    pub initial_backoff: Duration,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            amedas_base: AMEDAS_BASE_URL.to_string(),
            snow_tile_base: SNOW_TILE_BASE_URL.to_string(),
            proxy: None,
            max_tries: 3,
            initial_backoff: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
        }
    }
}

impl FetchConfig {
    /// URLs to try for `url`, in order.
    pub fn candidates(&self, url: &str) -> Vec<String> {
        let mut urls = Vec::with_capacity(2);
        if let Some(proxy) = &self.proxy {
            urls.push(format!("{}{}", proxy, urlencoding::encode(url)));
        }
        urls.push(url.to_string());
        urls
    }

    pub fn station_table_url(&self) -> String {
        format!("{}/const/amedastable.json", self.amedas_base)
    }

    pub fn latest_time_url(&self) -> String {
        format!("{}/data/latest_time.txt", self.amedas_base)
    }

    pub fn map_url(&self, file_name: &str) -> String {
        format!("{}/data/map/{}", self.amedas_base, file_name)
    }

    pub fn target_times_url(&self) -> String {
        format!("{}/targetTimes.json", self.snow_tile_base)
    }

    pub fn snow_url(&self, path: &str) -> String {
        format!("{}/{}", self.snow_tile_base, path)
    }
}

/// Fetches upstream payloads. The station table is fetched once per client.
pub struct JmaClient {
    client: Client,
    config: FetchConfig,
    stations: OnceCell<Arc<StationTable>>,
}

impl JmaClient {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            stations: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch the payload needed to display `metric`: the snow-depth GeoJSON
    /// for snow depth, the latest map file for everything else.
    pub async fn fetch(&self, metric: MetricId) -> Result<FetchedSnapshot> {
        match metric {
            MetricId::Snow => self.fetch_snow_depth().await,
            _ => self.fetch_map().await,
        }
    }

    pub async fn stations(&self) -> Result<Arc<StationTable>> {
        self.stations
            .get_or_try_init(|| async {
                let body = self.get_text(&self.config.station_table_url()).await?;
                let table = StationTable::from_json(&body)?;
                info!("Loaded {} stations", table.len());
                Ok::<_, AmedasError>(Arc::new(table))
            })
            .await
            .cloned()
    }

    async fn fetch_map(&self) -> Result<FetchedSnapshot> {
        let stations = self.stations().await?;
        let latest = parse_latest(&self.get_text(&self.config.latest_time_url()).await?)?;
        let url = self.config.map_url(&map_file_name(&latest));
        let body = self.get_text(&url).await?;
        table_snapshot(stations, &body, &latest)
    }

    async fn fetch_snow_depth(&self) -> Result<FetchedSnapshot> {
        let listing = self.get_text(&self.config.target_times_url()).await?;
        let times = parse_target_times(&listing)?;
        let latest = latest_snow_time(&times)?;
        let body = self
            .get_text(&self.config.snow_url(&latest.geojson_path()))
            .await?;
        feature_snapshot(&body, latest)
    }

    /// GET `url` as text, via the proxy first when one is configured.
    async fn get_text(&self, url: &str) -> Result<String> {
        for candidate in self.config.candidates(url) {
            if let Some(body) = self.get_with_retry(&candidate).await {
                return Ok(body);
            }
        }
        Err(AmedasError::Retrieval(format!(
            "all attempts failed for {}",
            url
        )))
    }

    async fn get_with_retry(&self, url: &str) -> Option<String> {
        let max_tries = self.config.max_tries.max(1);
        let mut backoff = self.config.initial_backoff;

        for attempt in 1..=max_tries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    if !response.status().is_success() {
                        warn!(
                            "Attempt {}/{}: Bad response status for {}: {}",
                            attempt,
                            max_tries,
                            url,
                            response.status()
                        );
                    } else {
                        match response.text().await {
                            Ok(body) => return Some(body),
                            Err(e) => {
                                warn!(
                                    "Attempt {}/{}: Failed to read response body for {}: {}",
                                    attempt, max_tries, url, e
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, max_tries, url, e
                    );
                }
            }

            if attempt < max_tries {
                info!(
                    "Sleeping for {} milliseconds before retry for {}",
                    backoff.as_millis(),
                    url
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        warn!("All attempts failed for {}", url);
        None
    }
}
