pub mod normalize;
pub mod osm_to_csv;
pub mod parse_osm;
pub mod shape;
pub mod tables;
pub mod tags;
pub mod validate;

use std::path::Path;

use log::{error, info};

use crate::errors::Result;

pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn is_cached(&self, dir: &Path) -> Result<bool>;
    fn clean(&self, dir: &Path) -> Result<()>;

    fn extract(&mut self, dir: &Path) -> Result<Self::Input>;
    /// Transforms the extracted input and loads it into `dir` in a single pass.
    fn transform_and_load(&mut self, dir: &Path, input: Self::Input) -> Result<Self::Output>;

    /// Runs the whole ETL. Returns `None` when cached output was reused.
    /// Output left behind by a failed run is removed before the error is returned.
    fn process(&mut self, dir: &Path, force: bool) -> Result<Option<Self::Output>> {
        info!(etl_name = self.etl_name(); "Starting ETL process");
        if !force && self.is_cached(dir)? {
            info!(etl_name = self.etl_name(); "Using cached value");
            return Ok(None);
        }

        info!(etl_name = self.etl_name(); "Extracting");
        let input = match self.extract(dir) {
            Ok(input) => input,
            Err(err) => {
                let message = err.to_string();
                error!(etl_name = self.etl_name(), err = message.as_str(); "Extraction failed with error");
                return Err(err);
            }
        };

        info!(etl_name = self.etl_name(); "Transforming and loading");
        let output = match self.transform_and_load(dir, input) {
            Ok(output) => output,
            Err(err) => {
                let message = err.to_string();
                error!(etl_name = self.etl_name(), err = message.as_str(); "Transformation failed with error");
                if let Err(clean_err) = self.clean(dir) {
                    let clean_message = clean_err.to_string();
                    error!(etl_name = self.etl_name(), err = clean_message.as_str(); "Could not remove partial output");
                }
                return Err(err);
            }
        };

        info!(etl_name = self.etl_name(); "Process finished");
        Ok(Some(output))
    }
}
