use std::{io, path::PathBuf, str::Utf8Error};

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be parsed as well-formed markup.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// A point, way or one of their children lacks a required attribute.
    #[error("<{element}> element is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// A shaped record failed the structural schema check.
    #[error("{message}")]
    SchemaValidation { message: String, fields: Vec<String> },

    /// The bundled record schema could not be compiled.
    #[error("invalid record schema: {message}")]
    InvalidSchema { message: String },

    #[error("could not load config {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }

    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::malformed(value.to_string())
    }
}

impl From<AttrError> for Error {
    fn from(value: AttrError) -> Self {
        Error::malformed(value.to_string())
    }
}

impl From<Utf8Error> for Error {
    fn from(value: Utf8Error) -> Self {
        Error::malformed(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn parse(text: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(text)?)
        }
        assert!(matches!(parse("{"), Err(Error::Json(_))));
        assert!(parse("{}").is_ok());
    }
}
