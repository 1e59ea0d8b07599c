//! Favorites persisted in a small JSON file.
//!
//! The file is a JSON object; favorites live under [`FAVORITES_KEY`] as an
//! array of station codes. Other keys are left untouched on save.

use amedas_data::Favorites;
use anyhow::Context;
use log::{info, warn};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const FAVORITES_KEY: &str = "amedas_favorites";

pub const DEFAULT_FAVORITES_FILE: &str = "amedas_favorites.json";

pub struct FileFavoritesStore {
    path: PathBuf,
}

impl FileFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved favorites. A missing file is an empty list, and so is one that
    /// cannot be read or decoded.
    pub fn load(&self) -> Favorites {
        if !self.path.exists() {
            return Favorites::new();
        }
        match self.read_object().and_then(|object| decode(&object)) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!(
                    "Ignoring unreadable favorites file {}: {:#}",
                    self.path.display(),
                    e
                );
                Favorites::new()
            }
        }
    }

    pub fn save(&self, favorites: &Favorites) -> anyhow::Result<()> {
        let mut object = if self.path.exists() {
            self.read_object().unwrap_or_default()
        } else {
            Map::new()
        };
        object.insert(
            FAVORITES_KEY.to_string(),
            Value::from(favorites.list().to_vec()),
        );
        let body = serde_json::to_string_pretty(&Value::Object(object))?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!(
            "Saved {} favorites to {}",
            favorites.len(),
            self.path.display()
        );
        Ok(())
    }

    fn read_object(&self) -> anyhow::Result<Map<String, Value>> {
        let body = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        match serde_json::from_str(&body)? {
            Value::Object(object) => Ok(object),
            _ => anyhow::bail!("not a JSON object"),
        }
    }
}

fn decode(object: &Map<String, Value>) -> anyhow::Result<Favorites> {
    match object.get(FAVORITES_KEY) {
        Some(codes) => Ok(Favorites::from_json(&codes.to_string())?),
        None => Ok(Favorites::new()),
    }
}
