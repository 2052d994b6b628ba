//! # Export Configuration
//!
//! `ExportConfig` is built once at startup and handed by reference to the
//! client and the exporter. The environment variable names are shared with
//! the CLI, which is the only place that reads them.

use crate::errors::NotionError;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_DATABASE_ID: &str = "NOTION_DB_ID";
pub const ENV_NOTION_VERSION: &str = "NOTION_VERSION";
pub const ENV_API_BASE_URL: &str = "NOTION_API_BASE_URL";

pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Integration token sent as a bearer credential.
    pub api_key: String,
    /// The Notion database to export.
    pub database_id: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Scheme and host of the API, without a trailing slash.
    pub api_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Directory the export file is written into.
    pub output_dir: PathBuf,
}

impl ExportConfig {
    /// Creates a configuration with defaults for everything but the credential
    /// and the database id.
    ///
    /// Blank values are rejected here so that a misconfigured run stops before
    /// the first network call.
    pub fn new(
        api_key: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, NotionError> {
        let api_key = required(ENV_API_KEY, api_key.into())?;
        let database_id = required(ENV_DATABASE_ID, database_id.into())?;

        Ok(Self {
            api_key,
            database_id,
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_dir: PathBuf::from("."),
        })
    }

    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

fn required(name: &str, value: String) -> Result<String, NotionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NotionError::MissingConfig(name.to_string()));
    }
    Ok(trimmed.to_string())
}
