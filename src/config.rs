use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{Error, Result};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// The .osm (or .osm.xz) extract to convert.
    pub data_path: PathBuf,
    /// Directory receiving the five CSV tables.
    pub dest_path: PathBuf,
    /// Check every shaped record against the table schema before writing.
    #[serde(default)]
    pub validate: bool,
    #[serde(default)]
    pub progress: bool,
    /// Rewrite the tables even when all of them already exist.
    #[serde(default)]
    pub force: bool,
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let config_error = |message: String| Error::Config {
        path: path.to_path_buf(),
        message,
    };
    let file = File::open(path).map_err(|err| config_error(err.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| config_error(err.to_string()))
}
