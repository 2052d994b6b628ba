//! # `techdocs-notion`: Notion Technical Docs Export
//!
//! Pulls every row of a Notion database, projects each page onto a fixed
//! `DocumentRecord` shape with per-field defaults, and writes the collection
//! to a date-stamped JSON file.
//!
//! The pipeline is strictly sequential: `client` fetches, `mapper` normalizes,
//! `export` assembles and writes.

pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod mapper;
pub mod property;
pub mod types;

pub use client::{NotionClient, RowSource};
pub use config::ExportConfig;
pub use errors::NotionError;
pub use export::{run_export, ExportSummary};
pub use mapper::map_row;
pub use types::{DocumentRecord, ExportBundle, RawRow};
