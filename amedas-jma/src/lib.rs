//! Core types for JMA AMeDAS observation snapshots.
//!
//! Upstream payloads (map files joined with the station table, or GeoJSON
//! features) are normalized into [`snapshot::Snapshot`]s of
//! [`record::PointRecord`]s. Values are pulled out per metric with
//! [`extract::ValueExtractor`] and colored with [`classify::classify`]
//! against a [`catalog::MetricCatalog`].
//!
//! The `api` feature adds [`jma::JmaClient`] for fetching live data.

pub mod catalog;
pub mod classify;
pub mod error;
pub mod extract;
pub mod feature;
#[cfg(feature = "api")]
pub mod jma;
pub mod metric;
pub mod record;
pub mod snapshot;
pub mod station;
pub mod upstream;
