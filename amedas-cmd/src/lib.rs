//! Command implementations for the AMeDAS CLI.
//!
//! Shows the ranking for a metric from the live JMA API or a directory of
//! recorded documents, and manages the favorites file.

use amedas_jma::metric::MetricId;
use clap::Subcommand;
use favorites_store::{FileFavoritesStore, DEFAULT_FAVORITES_FILE};
use show::{CatalogEdition, ShowOptions};
use std::path::PathBuf;

pub mod favorites_store;
pub mod show;
pub mod source;

#[derive(Subcommand)]
pub enum Command {
    /// Show the station ranking for one metric
    Show {
        /// Metric to rank (temp, precipitation1h, wind, snow, humidity, ...)
        #[arg(short, long, default_value = "temp")]
        metric: MetricId,

        /// Only list favorite stations, without the top-10 cap
        #[arg(short = 'f', long)]
        favorites_mode: bool,

        /// Read recorded documents from this directory instead of the JMA API
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Try requests through a CORS proxy prefix first (corsproxy.io if no value)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        proxy: Option<String>,

        /// Favorites file
        #[arg(long, default_value = DEFAULT_FAVORITES_FILE)]
        favorites_file: PathBuf,

        /// Built-in metric catalog
        #[arg(long, value_enum, default_value_t = CatalogEdition::Standard)]
        catalog: CatalogEdition,

        /// Load the metric catalog from a JSON file instead
        #[arg(long)]
        catalog_file: Option<PathBuf>,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a station to the favorites, or remove it if already there
    Favorite {
        /// Station code, e.g. 44132
        code: String,

        /// Favorites file
        #[arg(long, default_value = DEFAULT_FAVORITES_FILE)]
        favorites_file: PathBuf,
    },

    /// List favorite station codes
    Favorites {
        /// Favorites file
        #[arg(long, default_value = DEFAULT_FAVORITES_FILE)]
        favorites_file: PathBuf,
    },

    /// List the metrics of a catalog
    Metrics {
        /// Built-in metric catalog
        #[arg(long, value_enum, default_value_t = CatalogEdition::Standard)]
        catalog: CatalogEdition,

        /// Load the metric catalog from a JSON file instead
        #[arg(long)]
        catalog_file: Option<PathBuf>,

        /// Also print each metric's color buckets
        #[arg(long)]
        buckets: bool,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Show {
            metric,
            favorites_mode,
            fixtures,
            proxy,
            favorites_file,
            catalog,
            catalog_file,
            json,
        } => {
            show::run_show(ShowOptions {
                metric,
                favorites_mode,
                fixtures,
                proxy,
                favorites_file,
                catalog,
                catalog_file,
                json,
            })
            .await
        }
        Command::Favorite {
            code,
            favorites_file,
        } => {
            let store = FileFavoritesStore::new(favorites_file);
            let mut favorites = store.load();
            let added = favorites.toggle(&code);
            store.save(&favorites)?;
            if added {
                println!("★ {} added to favorites", code);
            } else {
                println!("☆ {} removed from favorites", code);
            }
            Ok(())
        }
        Command::Favorites { favorites_file } => {
            let favorites = FileFavoritesStore::new(favorites_file).load();
            if favorites.is_empty() {
                println!("No favorites");
            }
            for code in favorites.list() {
                println!("{}", code);
            }
            Ok(())
        }
        Command::Metrics {
            catalog,
            catalog_file,
            buckets,
        } => show::run_metrics(catalog, catalog_file.as_deref(), buckets),
    }
}
