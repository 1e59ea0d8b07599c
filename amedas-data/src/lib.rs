//! View layer over AMeDAS snapshots: favorites, the current view selection,
//! filtering and ranking, and the atomically replaced current snapshot.

pub mod favorites;
pub mod ranking;
pub mod state;
pub mod store;

pub use favorites::{FavoriteSet, Favorites};
pub use ranking::{RankingEngine, RankingItem, VisibleRecord, RANKING_LIMIT};
pub use state::ViewState;
pub use store::SnapshotStore;
