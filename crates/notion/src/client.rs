//! # Notion Query Client
//!
//! Fetches every row of a database by following the query endpoint's cursor
//! pagination. Requests are issued one at a time; the first failure aborts the
//! whole fetch and nothing fetched so far is returned.

use crate::config::ExportConfig;
use crate::errors::NotionError;
use crate::types::{QueryRequest, QueryResponse, RawRow};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{info, warn};

/// Page size hint sent with every query.
pub const PAGE_SIZE: u32 = 100;

/// Anything that can produce the full, ordered row set of a table.
#[async_trait]
pub trait RowSource {
    async fn fetch_rows(&self, table_id: &str) -> Result<Vec<RawRow>, NotionError>;
}

/// A client for the Notion database query API.
pub struct NotionClient {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
}

impl NotionClient {
    /// Creates a new `NotionClient` with the credential, API version and
    /// timeout taken from `config`.
    pub fn new(config: &ExportConfig) -> Result<Self, NotionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let headers = construct_headers(&config.api_key, &config.notion_version)?;

        Ok(Self {
            client,
            headers,
            base_url: config.api_base_url.clone(),
        })
    }

    async fn query_page(
        &self,
        url: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, NotionError> {
        let body = QueryRequest {
            page_size: PAGE_SIZE,
            start_cursor,
        };
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| e.into())
    }
}

#[async_trait]
impl RowSource for NotionClient {
    async fn fetch_rows(&self, table_id: &str) -> Result<Vec<RawRow>, NotionError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, table_id);
        let mut all_rows = Vec::new();
        let mut next_cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            let mut response = self.query_page(&url, next_cursor.as_deref()).await?;
            page_count += 1;
            info!(
                page = page_count,
                rows = response.results.len(),
                "Fetched query page"
            );
            all_rows.append(&mut response.results);

            if !response.has_more {
                break;
            }
            match response.next_cursor {
                Some(cursor) => next_cursor = Some(cursor),
                None => {
                    warn!("Notion reported more results without a cursor; stopping pagination.");
                    break;
                }
            }
        }

        info!(
            "Fetched {} rows in {} pages from database {}",
            all_rows.len(),
            page_count,
            table_id
        );
        Ok(all_rows)
    }
}

fn construct_headers(token: &str, version: &str) -> Result<HeaderMap, NotionError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| NotionError::InvalidHeader(format!("Invalid token: {e}")))?,
    );
    headers.insert(
        "Notion-Version",
        HeaderValue::from_str(version)
            .map_err(|e| NotionError::InvalidHeader(format!("Invalid version: {e}")))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
