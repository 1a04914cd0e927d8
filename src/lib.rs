//! Converts an OpenStreetMap XML extract into the five CSV tables of the
//! relational OSM schema: nodes, node tags, ways, way node references and
//! way tags.
//!
//! Elements are streamed one at a time: parsed, shaped into rows, optionally
//! validated, then written before the next one is read.

pub mod config;
pub mod data;
pub mod errors;
pub mod etl;

pub use config::{load_user_config, UserConfig};
pub use errors::{Error, Result};
pub use etl::osm_to_csv::{ExportSummary, OsmToCsvEtl};
pub use etl::Etl;

/// Runs the export described by `config`, returning `None` if the tables
/// already existed and `force` was not set.
pub fn run(config: &UserConfig) -> Result<Option<ExportSummary>> {
    let mut etl = OsmToCsvEtl::new(config)?;
    etl.process(&config.dest_path, config.force)
}
