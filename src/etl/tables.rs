use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::data::records::{NODE_FIELDS, NODE_TAGS_FIELDS, WAY_FIELDS, WAY_NODES_FIELDS, WAY_TAGS_FIELDS};
use crate::data::ShapedRecord;
use crate::errors::Result;

pub const NODES_FILE_NAME: &str = "nodes.csv";
pub const NODE_TAGS_FILE_NAME: &str = "nodes_tags.csv";
pub const WAYS_FILE_NAME: &str = "ways.csv";
pub const WAY_NODES_FILE_NAME: &str = "ways_nodes.csv";
pub const WAY_TAGS_FILE_NAME: &str = "ways_tags.csv";

pub const TABLE_FILE_NAMES: [&str; 5] = [
    NODES_FILE_NAME,
    NODE_TAGS_FILE_NAME,
    WAYS_FILE_NAME,
    WAY_NODES_FILE_NAME,
    WAY_TAGS_FILE_NAME,
];

pub fn table_paths(dir: &Path) -> Vec<PathBuf> {
    TABLE_FILE_NAMES.iter().map(|name| dir.join(name)).collect()
}

/// The five CSV destinations. Files are flushed and closed when dropped.
pub struct CsvTables {
    nodes: Writer<File>,
    node_tags: Writer<File>,
    ways: Writer<File>,
    way_nodes: Writer<File>,
    way_tags: Writer<File>,
}

impl CsvTables {
    /// Creates (or truncates) all five files in `dir` and writes their headers.
    pub fn create(dir: &Path) -> Result<CsvTables> {
        Ok(CsvTables {
            nodes: Self::create_table(dir, NODES_FILE_NAME, &NODE_FIELDS)?,
            node_tags: Self::create_table(dir, NODE_TAGS_FILE_NAME, &NODE_TAGS_FIELDS)?,
            ways: Self::create_table(dir, WAYS_FILE_NAME, &WAY_FIELDS)?,
            way_nodes: Self::create_table(dir, WAY_NODES_FILE_NAME, &WAY_NODES_FIELDS)?,
            way_tags: Self::create_table(dir, WAY_TAGS_FILE_NAME, &WAY_TAGS_FIELDS)?,
        })
    }

    // Headers are written explicitly so that empty tables still carry them.
    fn create_table(dir: &Path, file_name: &str, header: &[&str]) -> Result<Writer<File>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join(file_name))?;
        writer.write_record(header)?;
        Ok(writer)
    }

    fn write_rows<T: Serialize>(writer: &mut Writer<File>, rows: &[T]) -> Result<()> {
        for row in rows {
            writer.serialize(row)?;
        }
        Ok(())
    }

    pub fn write(&mut self, record: &ShapedRecord) -> Result<()> {
        match record {
            ShapedRecord::Point { point, point_tags } => {
                self.nodes.serialize(point)?;
                Self::write_rows(&mut self.node_tags, point_tags)?;
            }
            ShapedRecord::Way {
                way,
                way_nodes,
                way_tags,
            } => {
                self.ways.serialize(way)?;
                Self::write_rows(&mut self.way_nodes, way_nodes)?;
                Self::write_rows(&mut self.way_tags, way_tags)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.nodes.flush()?;
        self.node_tags.flush()?;
        self.ways.flush()?;
        self.way_nodes.flush()?;
        self.way_tags.flush()?;
        Ok(())
    }
}
