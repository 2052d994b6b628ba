//! # Export Driver
//!
//! Runs the whole pipeline: fetch every row, keep the pages, map them, wrap
//! them in an `ExportBundle` and write it to a date-stamped JSON file.

use crate::client::RowSource;
use crate::config::ExportConfig;
use crate::errors::NotionError;
use crate::mapper::map_row;
use crate::types::{ExportBundle, RawRow};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const SCHEMA_VERSION: &str = "1.0";
pub const FILE_PREFIX: &str = "Notion_TechDocs_Index_";

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub documents: usize,
    pub path: PathBuf,
}

/// `Notion_TechDocs_Index_<YYYY-MM-DD>.json` for the given calendar date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

pub fn source_descriptor(database_id: &str) -> String {
    format!("Notion DB {database_id}")
}

/// Filters `rows` down to pages that carry an id and maps them, keeping
/// fetch order.
pub fn build_bundle(
    database_id: &str,
    rows: &[RawRow],
    exported_at: DateTime<FixedOffset>,
) -> ExportBundle {
    let documents: Vec<_> = rows
        .iter()
        .filter(|r| r.is_exportable())
        .map(map_row)
        .collect();
    let skipped = rows.len() - documents.len();
    if skipped > 0 {
        info!("Skipped {} non-page or id-less objects", skipped);
    }

    ExportBundle {
        schema_version: SCHEMA_VERSION.to_string(),
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Micros, false),
        source: source_descriptor(database_id),
        documents,
    }
}

/// Serializes `bundle` and writes it into `output_dir`, replacing any file of
/// the same name.
pub fn write_bundle(
    bundle: &ExportBundle,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, NotionError> {
    let json = serde_json::to_string_pretty(bundle)?;
    let path = replace_file(output_dir, &export_file_name(date), |file| {
        file.write_all(json.as_bytes())
    })?;

    info!("Wrote {} documents to {}", bundle.documents.len(), path.display());
    Ok(path)
}

/// Writes through a temp file in `output_dir` that is renamed over
/// `file_name` only once `write` succeeds. On failure the temp file is
/// removed and any previous file of that name is left as it was.
fn replace_file<F>(output_dir: &Path, file_name: &str, write: F) -> Result<PathBuf, NotionError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = output_dir.join(file_name);
    let io_error = |source: io::Error| NotionError::Io {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(output_dir).map_err(io_error)?;
    write(tmp.as_file_mut()).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(&path).map_err(|e| io_error(e.error))?;
    Ok(path)
}

/// Fetches, maps and writes the configured database. A fetch failure returns
/// before any file is created.
pub async fn run_export<S>(source: &S, config: &ExportConfig) -> Result<ExportSummary, NotionError>
where
    S: RowSource + Sync + ?Sized,
{
    info!("Starting export for Notion database: {}", config.database_id);
    let rows = source.fetch_rows(&config.database_id).await?;

    let now = Local::now();
    let bundle = build_bundle(&config.database_id, &rows, now.fixed_offset());
    let path = write_bundle(&bundle, &config.output_dir, now.date_naive())?;

    Ok(ExportSummary {
        documents: bundle.documents.len(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticRows(Vec<RawRow>);

    #[async_trait]
    impl RowSource for StaticRows {
        async fn fetch_rows(&self, _table_id: &str) -> Result<Vec<RawRow>, NotionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RowSource for FailingSource {
        async fn fetch_rows(&self, _table_id: &str) -> Result<Vec<RawRow>, NotionError> {
            Err(NotionError::Api {
                status: 401,
                body: "unauthorized".into(),
            })
        }
    }

    fn raw(value: serde_json::Value) -> RawRow {
        serde_json::from_value(value).unwrap()
    }

    fn fixed_time() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-15T09:30:00.250+01:00").unwrap()
    }

    #[test]
    fn file_name_embeds_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(export_file_name(date), "Notion_TechDocs_Index_2024-03-15.json");
    }

    #[test]
    fn bundle_keeps_only_pages_in_order() {
        let rows = vec![
            raw(json!({ "object": "page", "id": "a" })),
            raw(json!({ "object": "database", "id": "db" })),
            raw(json!({ "object": "page", "id": "b" })),
        ];
        let bundle = build_bundle("db-1", &rows, fixed_time());

        let ids: Vec<_> = bundle.documents.iter().map(|d| d.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(bundle.schema_version, "1.0");
        assert_eq!(bundle.source, "Notion DB db-1");
        assert_eq!(bundle.exported_at, "2024-03-15T09:30:00.250000+01:00");
    }

    #[test]
    fn written_file_is_pretty_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![raw(json!({ "object": "page", "id": "a" }))];
        let bundle = build_bundle("db-1", &rows, fixed_time());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let path = write_bundle(&bundle, dir.path(), date).unwrap();
        assert_eq!(path, dir.path().join("Notion_TechDocs_Index_2024-03-15.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"title\": \"Sin título\""));
        assert!(text.contains("\n  \"documents\": ["));
        assert!(text.starts_with("{\n  \"schema_version\": \"1.0\""));
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        std::fs::write(dir.path().join(export_file_name(date)), "stale").unwrap();

        let bundle = build_bundle("db-1", &[], fixed_time());
        let path = write_bundle(&bundle, dir.path(), date).unwrap();

        let written: ExportBundle =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, bundle);
    }

    #[test]
    fn missing_output_dir_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = build_bundle("db-1", &[], fixed_time());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let err = write_bundle(&bundle, &dir.path().join("missing"), date).unwrap_err();
        assert!(matches!(err, NotionError::Io { .. }));
    }

    #[test]
    fn failed_write_keeps_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let name = export_file_name(date);
        let previous = dir.path().join(&name);
        std::fs::write(&previous, "{\"schema_version\": \"1.0\"}").unwrap();

        let err = replace_file(dir.path(), &name, |file| {
            file.write_all(b"{\"schema_version\": \"1.")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, NotionError::Io { ref path, .. } if *path == previous));
        assert_eq!(
            std::fs::read_to_string(&previous).unwrap(),
            "{\"schema_version\": \"1.0\"}"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_first_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();

        replace_file(dir.path(), "export.json", |file| {
            file.write_all(b"{")?;
            Err(io::Error::other("quota exceeded"))
        })
        .unwrap_err();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rows_without_an_id_are_not_exported() {
        let rows = vec![
            raw(json!({ "object": "page", "properties": {} })),
            raw(json!({ "object": "page", "id": "", "properties": {} })),
            raw(json!({ "object": "page", "id": "kept" })),
        ];
        let bundle = build_bundle("db-1", &rows, fixed_time());

        assert_eq!(bundle.documents.len(), 1);
        assert_eq!(bundle.documents[0].doc_id, "kept");
        assert!(bundle.documents.iter().all(|d| !d.doc_id.is_empty()));
    }

    #[tokio::test]
    async fn run_export_writes_mapped_documents() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("secret", "db-1")
            .unwrap()
            .with_output_dir(dir.path());
        let source = StaticRows(vec![
            raw(json!({ "object": "page", "id": "a" })),
            raw(json!({ "object": "database", "id": "x" })),
        ]);

        let summary = run_export(&source, &config).await.unwrap();
        assert_eq!(summary.documents, 1);
        assert_eq!(
            summary.path,
            dir.path().join(export_file_name(Local::now().date_naive()))
        );
        assert!(summary.path.exists());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("secret", "db-1")
            .unwrap()
            .with_output_dir(dir.path());

        let err = run_export(&FailingSource, &config).await.unwrap_err();
        assert!(matches!(err, NotionError::Api { status: 401, .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
