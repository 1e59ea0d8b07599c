//! The currently displayed snapshot.
//!
//! Readers always see a complete snapshot. A failed acquisition leaves the
//! previous one in place and records the error.

use amedas_jma::error::Result;
use amedas_jma::snapshot::Snapshot;
use log::{info, warn};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
struct StoreState {
    current: Option<Arc<Snapshot>>,
    last_error: Option<String>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.read(|state| state.current.clone())
    }

    /// Message of the most recent failed replacement, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.read(|state| state.last_error.clone())
    }

    /// Number of successful replacements so far.
    pub fn generation(&self) -> u64 {
        self.read(|state| state.generation)
    }

    /// Install `result` if it holds a snapshot; otherwise keep the current one
    /// and hand the error back. Concurrent callers are serialized, the last
    /// writer wins.
    pub fn replace(&self, result: Result<Snapshot>) -> Result<Arc<Snapshot>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                state.current = Some(Arc::clone(&snapshot));
                state.last_error = None;
                state.generation += 1;
                info!(
                    "Snapshot {} installed: {} records observed at {}",
                    state.generation,
                    snapshot.len(),
                    snapshot.observed_at
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Keeping previous snapshot: {}", e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Build a snapshot with `build` and install it.
    pub fn load<F>(&self, build: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        self.replace(build())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}
