use crate::lenient::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before any link is checked
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("The file '{}' was not found.", .path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file: {}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors locating data blocks in a document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not find {} arrays in the HTML file.", quoted(.names))]
    NoDataBlocks { names: Vec<String> },

    #[error("No data block names configured")]
    NoBlockNames,

    #[error("Invalid data block pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A located block that could not be parsed; its records are skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not parse the '{name}' array (starting on line {line}): {source}")]
pub struct BlockError {
    pub name: String,
    pub line: usize,
    #[source]
    pub source: ParseError,
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" or ")
}
