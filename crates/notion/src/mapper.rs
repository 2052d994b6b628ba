//! # Row Mapper
//!
//! Projects a `RawRow` onto the fixed `DocumentRecord` field set. Extraction
//! goes through `crate::property`; defaults are applied here and nowhere else.

use crate::property;
use crate::types::{DocumentRecord, RawRow};

pub const DEFAULT_TITLE: &str = "Sin título";
pub const DEFAULT_VERSION: &str = "v1.0";
pub const DEFAULT_AREA: &str = "Sin área";
pub const DEFAULT_TYPE: &str = "Documento";
pub const DEFAULT_CONFIDENTIALITY: &str = "Interno";

/// Names of the database properties read by the mapper.
pub mod columns {
    pub const DOC_ID: &str = "DocId";
    pub const TITLE: &str = "Title";
    pub const VERSION: &str = "Version";
    pub const AREA: &str = "Area";
    pub const TYPE: &str = "Type";
    pub const OWNER: &str = "Owner";
    pub const TAGS: &str = "Tags";
    pub const CONFIDENTIALITY: &str = "Confidentiality";
    pub const LAST_UPDATED: &str = "LastUpdated";
    pub const DRIVE_LINK: &str = "DriveLink";
    pub const SUMMARY: &str = "Summary";
}

/// Maps one row. Never fails: every missing or malformed property resolves to
/// the field's default. `doc_id` falls back to the row id, so it is only
/// guaranteed non-empty for rows passing `RawRow::is_exportable`.
pub fn map_row(row: &RawRow) -> DocumentRecord {
    let text = |name: &str| extract(row, name, property::text);
    let select = |name: &str| extract(row, name, property::select);

    DocumentRecord {
        doc_id: or_default(text(columns::DOC_ID), &row.id),
        title: or_default(text(columns::TITLE), DEFAULT_TITLE),
        version: or_default(text(columns::VERSION), DEFAULT_VERSION),
        area: or_default(select(columns::AREA), DEFAULT_AREA),
        doc_type: or_default(select(columns::TYPE), DEFAULT_TYPE),
        owner: or_default(text(columns::OWNER), ""),
        tags: extract(row, columns::TAGS, property::multi_select).unwrap_or_default(),
        confidentiality: or_default(select(columns::CONFIDENTIALITY), DEFAULT_CONFIDENTIALITY),
        last_updated: or_default(extract(row, columns::LAST_UPDATED, property::date), ""),
        drive_link: or_default(extract(row, columns::DRIVE_LINK, property::url), ""),
        notion_page_url: row.url.clone().unwrap_or_default(),
        summary: or_default(text(columns::SUMMARY), ""),
    }
}

fn extract<T>(
    row: &RawRow,
    name: &str,
    accessor: fn(&serde_json::Value) -> Option<T>,
) -> Option<T> {
    row.property(name).and_then(accessor)
}

/// Absent and empty values both take the default.
fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
