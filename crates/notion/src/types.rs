//! # Data Types
//!
//! The raw row shape returned by the Notion query endpoint and the normalized
//! records written to the export file.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The `object` discriminator carried by exportable rows.
pub const PAGE_OBJECT: &str = "page";

/// One result object from a database query.
///
/// Properties stay untyped here; `crate::property` reads them through typed
/// accessors that never fail. Missing keys fall back to empty values so a
/// single odd row cannot abort decoding of a whole page.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl RawRow {
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }

    /// A page with a native id. The id is the last-resort `doc_id`, so rows
    /// without one cannot produce a complete record.
    pub fn is_exportable(&self) -> bool {
        self.is_page() && !self.id.trim().is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Body of `POST /v1/databases/{id}/query`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<RawRow>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// A normalized, fully-defaulted entry of the export.
///
/// Field order here is the key order in the output file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub title: String,
    pub version: String,
    pub area: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub owner: String,
    pub tags: Vec<String>,
    pub confidentiality: String,
    pub last_updated: String,
    pub drive_link: String,
    pub notion_page_url: String,
    pub summary: String,
}

/// The top-level artifact written to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub schema_version: String,
    pub exported_at: String,
    pub source: String,
    pub documents: Vec<DocumentRecord>,
}
