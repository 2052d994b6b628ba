//! # Error Definitions
//!
//! Every failure the export can hit. Field-level anomalies on a row are not
//! errors: the mapper always resolves them to a default.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("Missing required configuration value: {0}")]
    MissingConfig(String),
    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
    #[error("Failed to fetch from Notion API: {0}")]
    Fetch(String),
    #[error("Notion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to serialize export bundle: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write export file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        NotionError::Fetch(err.to_string())
    }
}
