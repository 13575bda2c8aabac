//! Google Sheets mirror of the financial records.
//!
//! Values are written with `valueInputOption=RAW`. Appended rows get their
//! column number formats through a follow-up `batchUpdate`, which is
//! best-effort: a row whose formatting failed is still a stored row.

mod token;
mod values;

pub use token::{ServiceAccountKey, TokenProvider};

use std::collections::HashMap;

use async_trait::async_trait;
use hornero_core::records::{CellValue, ColumnFormat, SpreadsheetClient};
use hornero_shared::config::SheetsConfig;
use hornero_shared::{AppError, AppResult};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use values::{AppendResponse, LAST_COLUMN, SpreadsheetMeta, first_row, format_requests, row_body};

/// [`SpreadsheetClient`] over the Sheets v4 REST API.
#[derive(Debug)]
pub struct GoogleSheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    tokens: TokenProvider,
    sheet_ids: RwLock<HashMap<String, i64>>,
}

impl GoogleSheetsClient {
    /// Creates a client from configuration.
    ///
    /// A fixed `access_token` wins over `credentials_file`; one of them is required.
    pub fn new(config: &SheetsConfig) -> AppResult<Self> {
        let tokens = if !config.access_token.is_empty() {
            TokenProvider::fixed(config.access_token.clone())
        } else if !config.credentials_file.is_empty() {
            TokenProvider::from_key_file(&config.credentials_file)?
        } else {
            return Err(AppError::Internal(
                "no Sheets credentials configured".to_string(),
            ));
        };
        Self::with_tokens(config, tokens)
    }

    /// Creates a client with an explicit token source.
    pub fn with_tokens(config: &SheetsConfig, tokens: TokenProvider) -> AppResult<Self> {
        if config.spreadsheet_id.is_empty() {
            return Err(AppError::Internal("no spreadsheet id configured".to_string()));
        }
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            tokens,
            sheet_ids: RwLock::new(HashMap::new()),
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/values/{range}", self.spreadsheet_url())
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> AppResult<Response> {
        let token = self.tokens.bearer(&self.client).await?;
        request.bearer_auth(token).send().await.map_err(|e| {
            warn!(operation, error = %e, "Sheets request failed");
            AppError::ExternalService(format!("Sheets {operation} failed: {e}"))
        })
    }

    /// Whether the API acknowledged a write; logs the body of a refusal.
    async fn acknowledged(response: Response, operation: &str) -> bool {
        let status = response.status();
        if status.is_success() {
            return true;
        }
        let body = response.text().await.unwrap_or_default();
        warn!(operation, %status, %body, "Sheets refused the write");
        false
    }

    async fn sheet_id(&self, sheet: &str) -> AppResult<i64> {
        if let Some(id) = self.sheet_ids.read().await.get(sheet) {
            return Ok(*id);
        }

        let request = self
            .client
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties")]);
        let response = self.send(request, "metadata").await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Sheets metadata returned {}",
                response.status()
            )));
        }
        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid Sheets metadata: {e}")))?;

        let mut ids = self.sheet_ids.write().await;
        for entry in meta.sheets {
            ids.insert(entry.properties.title, entry.properties.sheet_id);
        }
        ids.get(sheet)
            .copied()
            .ok_or_else(|| AppError::ExternalService(format!("no sheet named {sheet}")))
    }

    async fn apply_formats(
        &self,
        sheet: &str,
        row: u32,
        formats: &[ColumnFormat],
    ) -> AppResult<()> {
        let sheet_id = self.sheet_id(sheet).await?;
        let body = json!({ "requests": format_requests(sheet_id, row, formats) });
        let request = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .json(&body);
        let response = self.send(request, "format").await?;
        if Self::acknowledged(response, "format").await {
            Ok(())
        } else {
            Err(AppError::ExternalService("Sheets rejected the formats".to_string()))
        }
    }
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    async fn append_row(
        &self,
        sheet: &str,
        values: &[CellValue],
        formats: &[ColumnFormat],
    ) -> AppResult<Option<u32>> {
        let request = self
            .client
            .post(format!("{}:append", self.values_url(sheet)))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&row_body(values));
        let response = self.send(request, "append").await?;
        if !response.status().is_success() {
            Self::acknowledged(response, "append").await;
            return Ok(None);
        }
        let body: AppendResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid append response: {e}")))?;

        let Some(row) = body
            .updates
            .and_then(|u| u.updated_range)
            .as_deref()
            .and_then(first_row)
        else {
            warn!(sheet, "Sheets append did not report a row");
            return Ok(None);
        };
        info!(sheet, row, "Appended sheet row");

        if !formats.is_empty()
            && let Err(e) = self.apply_formats(sheet, row, formats).await
        {
            warn!(sheet, row, error = %e, "Could not format appended row");
        }
        Ok(Some(row))
    }

    async fn overwrite_row(&self, sheet: &str, row: u32, values: &[CellValue]) -> AppResult<bool> {
        let request = self
            .client
            .put(self.values_url(&format!("{sheet}!A{row}")))
            .query(&[("valueInputOption", "RAW")])
            .json(&row_body(values));
        let response = self.send(request, "overwrite").await?;
        let ok = Self::acknowledged(response, "overwrite").await;
        debug!(sheet, row, ok, "Overwrote sheet row");
        Ok(ok)
    }

    async fn patch_cell(
        &self,
        sheet: &str,
        row: u32,
        column: char,
        value: CellValue,
    ) -> AppResult<bool> {
        let request = self
            .client
            .put(self.values_url(&format!("{sheet}!{column}{row}")))
            .query(&[("valueInputOption", "RAW")])
            .json(&row_body(std::slice::from_ref(&value)));
        let response = self.send(request, "patch").await?;
        let ok = Self::acknowledged(response, "patch").await;
        debug!(sheet, row, %column, ok, "Patched sheet cell");
        Ok(ok)
    }

    async fn erase_row(&self, sheet: &str, row: u32) -> AppResult<bool> {
        let request = self
            .client
            .post(format!(
                "{}:clear",
                self.values_url(&format!("{sheet}!A{row}:{LAST_COLUMN}{row}"))
            ))
            .json(&json!({}));
        let response = self.send(request, "clear").await?;
        let ok = Self::acknowledged(response, "clear").await;
        debug!(sheet, row, ok, "Cleared sheet row");
        Ok(ok)
    }
}
