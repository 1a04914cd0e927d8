use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::info;

use super::parse_osm::{open_osm_reader, OsmElements};
use super::shape::shape;
use super::tables::{table_paths, CsvTables};
use super::validate::{RecordValidator, SchemaValidator};
use super::Etl;
use crate::config::UserConfig;
use crate::data::{ShapedRecord, SourceElement};
use crate::errors::Result;

pub const ETL_NAME: &str = "osm_to_csv";

/// Row counts of a finished export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub points: u64,
    pub point_tags: u64,
    pub ways: u64,
    pub way_nodes: u64,
    pub way_tags: u64,
    pub rejected_tags: u64,
}

impl ExportSummary {
    fn record(&mut self, element: &SourceElement, shaped: &ShapedRecord) {
        self.rejected_tags += (element.tags.len() - shaped.tags().len()) as u64;
        match shaped {
            ShapedRecord::Point { point_tags, .. } => {
                self.points += 1;
                self.point_tags += point_tags.len() as u64;
            }
            ShapedRecord::Way {
                way_nodes,
                way_tags,
                ..
            } => {
                self.ways += 1;
                self.way_nodes += way_nodes.len() as u64;
                self.way_tags += way_tags.len() as u64;
            }
        }
    }
}

pub type OsmSource = OsmElements<Box<dyn BufRead + Send>>;

/// Streams an .osm extract into the five relational CSV tables.
pub struct OsmToCsvEtl {
    data_path: PathBuf,
    validator: Option<Box<dyn RecordValidator>>,
    progress: bool,
}

impl OsmToCsvEtl {
    pub fn new(config: &UserConfig) -> Result<OsmToCsvEtl> {
        let validator: Option<Box<dyn RecordValidator>> = if config.validate {
            Some(Box::new(SchemaValidator::new()?))
        } else {
            None
        };
        Ok(OsmToCsvEtl {
            data_path: config.data_path.clone(),
            validator,
            progress: config.progress,
        })
    }

    pub fn with_validator(mut self, validator: Box<dyn RecordValidator>) -> OsmToCsvEtl {
        self.validator = Some(validator);
        self
    }

    fn elements(&self, input: OsmSource) -> Box<dyn Iterator<Item = Result<SourceElement>>> {
        if self.progress {
            Box::new(tqdm::tqdm(input))
        } else {
            Box::new(input)
        }
    }
}

impl Etl for OsmToCsvEtl {
    type Input = OsmSource;
    type Output = ExportSummary;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        for path in table_paths(dir) {
            if !path.try_exists()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        for path in table_paths(dir) {
            if path.try_exists()? {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        open_osm_reader(&self.data_path)
    }

    fn transform_and_load(&mut self, dir: &Path, input: Self::Input) -> Result<Self::Output> {
        fs::create_dir_all(dir)?;
        let mut tables = CsvTables::create(dir)?;
        let mut summary = ExportSummary::default();

        for element in self.elements(input) {
            let element = element?;
            let Some(shaped) = shape(&element)? else {
                continue;
            };
            if let Some(validator) = &self.validator {
                validator.validate(&shaped)?;
            }
            tables.write(&shaped)?;
            summary.record(&element, &shaped);
        }
        tables.flush()?;

        info!(
            etl_name = ETL_NAME,
            points = summary.points,
            point_tags = summary.point_tags,
            ways = summary.ways,
            way_nodes = summary.way_nodes,
            way_tags = summary.way_tags,
            rejected_tags = summary.rejected_tags;
            "Wrote CSV tables"
        );
        Ok(summary)
    }
}
