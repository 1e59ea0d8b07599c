//! Viewer selections that drive filtering and ranking.

use amedas_jma::metric::MetricId;

/// The metric being shown and whether only favorites are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub metric: MetricId,
    pub favorites_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            metric: MetricId::Temp,
            favorites_mode: false,
        }
    }
}

impl ViewState {
    pub fn new(metric: MetricId, favorites_mode: bool) -> Self {
        Self {
            metric,
            favorites_mode,
        }
    }

    pub fn set_metric(&mut self, metric: MetricId) {
        self.metric = metric;
    }

    pub fn toggle_mode(&mut self) {
        self.favorites_mode = !self.favorites_mode;
    }

    pub fn set_mode(&mut self, favorites_mode: bool) {
        self.favorites_mode = favorites_mode;
    }
}
