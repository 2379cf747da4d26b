//! Google Sheets v4 worksheet over `reqwest`.
//!
//! Reads, clears and range updates are idempotent and go through the
//! [`RetryPolicy`]. Appends are sent once: repeating one after an ambiguous
//! failure could duplicate rows.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use workwear_inventory::Grid;

use super::{RetryPolicy, SheetError, Workbook, Worksheet};
use crate::config::{SheetNames, SheetsConfig};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct GoogleWorksheet {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    title: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl GoogleWorksheet {
    /// Worksheet `title` of the configured spreadsheet behind `base_url`
    /// (normally [`DEFAULT_BASE_URL`]).
    pub fn with_base_url(
        client: Client,
        base_url: &str,
        config: &SheetsConfig,
        title: impl Into<String>,
    ) -> Result<Self, SheetError> {
        let title = title.into();
        let base_url = Url::parse(base_url).map_err(|e| SheetError::Transport {
            sheet: title.clone(),
            operation: "configure",
            message: format!("invalid base url {base_url}: {e}"),
        })?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            title,
            token: config.token.clone(),
            retry: RetryPolicy {
                max_attempts: config.max_retries,
                ..RetryPolicy::default()
            },
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The stock, report and people worksheets of one spreadsheet.
    pub fn workbook(
        client: Client,
        base_url: &str,
        config: &SheetsConfig,
        names: &SheetNames,
    ) -> Result<Workbook<Arc<GoogleWorksheet>>, SheetError> {
        let sheet = |title: &str| Self::with_base_url(client.clone(), base_url, config, title).map(Arc::new);
        Ok(Workbook::new(
            sheet(&names.stock)?,
            sheet(&names.report)?,
            sheet(&names.people)?,
        ))
    }

    /// `'Title'` or `'Title'!A1`; quotes inside titles are doubled.
    fn range(&self, cell: Option<&str>) -> String {
        let quoted = format!("'{}'", self.title.replace('\'', "''"));
        match cell {
            Some(cell) => format!("{quoted}!{cell}"),
            None => quoted,
        }
    }

    fn values_url(&self, range: &str, suffix: &str, operation: &'static str) -> Result<Url, SheetError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::Transport {
                sheet: self.title.clone(),
                operation,
                message: format!("base url {} cannot hold a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values"])
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<reqwest::Response, SheetError> {
        let response = builder.send().await.map_err(|e| SheetError::Transport {
            sheet: self.title.clone(),
            operation,
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(SheetError::Status {
            sheet: self.title.clone(),
            operation,
            status: status.as_u16(),
            message,
        })
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    #[instrument(skip(self), fields(sheet = %self.title), err)]
    async fn get_all_values(&self) -> Result<Grid, SheetError> {
        let url = &self.values_url(&self.range(None), "", "get")?;
        let body: ValueRange = self
            .retry
            .run("get", move || async move {
                let response = self.send("get", self.request(Method::GET, url.clone())).await?;
                response.json().await.map_err(|e| SheetError::Decode {
                    sheet: self.title.clone(),
                    operation: "get",
                    message: e.to_string(),
                })
            })
            .await?;

        let grid: Grid = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        debug!(rows = grid.len(), "worksheet read");
        Ok(grid)
    }

    #[instrument(skip(self), fields(sheet = %self.title), err)]
    async fn clear(&self) -> Result<(), SheetError> {
        let url = &self.values_url(&self.range(None), ":clear", "clear")?;
        self.retry
            .run("clear", move || async move {
                self.send("clear", self.request(Method::POST, url.clone()).json(&json!({})))
                    .await
                    .map(drop)
            })
            .await
    }

    #[instrument(skip(self, rows), fields(sheet = %self.title, rows = rows.len()), err)]
    async fn append_rows(&self, rows: Grid) -> Result<(), SheetError> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut url = self.values_url(&self.range(Some("A1")), ":append", "append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "majorDimension": "ROWS", "values": rows });
        self.send("append", self.request(Method::POST, url).json(&body))
            .await
            .map(drop)
    }

    #[instrument(skip(self, rows), fields(sheet = %self.title, rows = rows.len()), err)]
    async fn update_range(&self, start: &str, rows: Grid) -> Result<(), SheetError> {
        let range = self.range(Some(start));
        let mut url = self.values_url(&range, "", "update")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let url = &url;
        let body = &json!({ "range": range, "majorDimension": "ROWS", "values": rows });
        self.retry
            .run("update", move || async move {
                self.send("update", self.request(Method::PUT, url.clone()).json(body))
                    .await
                    .map(drop)
            })
            .await
    }
}
