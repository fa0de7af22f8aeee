//! Fieldmap Ingest Library
//!
//! Normalizes heterogeneous sales exports and territory boundary documents
//! into a canonical, deduplicated PostGIS store.
//!
//! # Supported Inputs
//!
//! - **Arcadia**: portal CSV export (address-only records, no coordinates)
//! - **Viper legacy**: historic CSV export (coordinate-bearing records)
//! - **Boundary documents**: GeoJSON feature collections, one zone
//!   classification per document
//!
//! # Example
//!
//! ```no_run
//! use fieldmap_ingest::adapters::SourceSpec;
//! use fieldmap_ingest::config::{self, Config};
//! use fieldmap_ingest::pipeline::SalesPipeline;
//! use fieldmap_ingest::store::IngestStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = config::create_pool(&config.database).await?;
//!     let store = IngestStore::new(pool);
//!
//!     let spec: SourceSpec = "arcadia=./exports/arcadia.csv".parse()?;
//!     let report = SalesPipeline::new(store).run(&[spec]).await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod geometry;
pub mod leaderboard;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod zones;
