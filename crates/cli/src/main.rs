//! # techdocs-export
//!
//! Command-line entry point: exports one Notion database to
//! `Notion_TechDocs_Index_<date>.json`.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use techdocs_notion::config::{
    DEFAULT_API_BASE_URL, DEFAULT_NOTION_VERSION, DEFAULT_TIMEOUT_SECS, ENV_API_BASE_URL,
    ENV_API_KEY, ENV_DATABASE_ID, ENV_NOTION_VERSION,
};
use techdocs_notion::{run_export, ExportConfig, NotionClient, NotionError};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about = "Export a Notion technical docs database to JSON", long_about = None)]
struct Cli {
    /// Notion integration token
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,
    /// ID of the database to export
    #[arg(long, env = ENV_DATABASE_ID)]
    database_id: Option<String>,
    /// Value sent in the `Notion-Version` header
    #[arg(long, env = ENV_NOTION_VERSION, default_value = DEFAULT_NOTION_VERSION)]
    notion_version: String,
    /// Base URL of the Notion API
    #[arg(long, env = ENV_API_BASE_URL, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Directory to write the export file into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    fn into_config(self) -> Result<ExportConfig, NotionError> {
        let api_key = self
            .api_key
            .ok_or_else(|| NotionError::MissingConfig(ENV_API_KEY.into()))?;
        let database_id = self
            .database_id
            .ok_or_else(|| NotionError::MissingConfig(ENV_DATABASE_ID.into()))?;

        Ok(ExportConfig::new(api_key, database_id)?
            .with_notion_version(self.notion_version)
            .with_api_base_url(self.api_base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_output_dir(self.output_dir))
    }
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the summary line.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();
    let config = Cli::parse().into_config()?;
    info!(
        "Exporting database {} into {}",
        config.database_id,
        config.output_dir.display()
    );

    let client = NotionClient::new(&config)?;
    let summary = run_export(&client, &config).await?;

    println!(
        "Exported {} docs -> {}",
        summary.documents,
        display_path(&summary.path).display()
    );
    Ok(())
}

/// Drops a leading `./` so a run in the current directory reports the bare
/// file name.
fn display_path(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}
