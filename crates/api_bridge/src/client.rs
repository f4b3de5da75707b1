//! Parser backend HTTP API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reconcile_core::{ParseResponse, SlotStore, Transport, UploadFile, CREDENTIAL_SLOT};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::debug;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "DRAWPARSE_API_URL";

/// Environment variable setting a request timeout in seconds
pub const TIMEOUT_ENV: &str = "DRAWPARSE_TIMEOUT_SECS";

/// Configuration for the backend client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL for the backend (default: http://localhost:8000)
    pub base_url: String,
    /// Request timeout in seconds (default: none)
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.base_url = url;
        }
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs = secs
                .parse()
                .with_context(|| format!("{TIMEOUT_ENV} must be a number of seconds"))?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    /// Full URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Backend API client
pub struct ApiClient {
    config: ApiConfig,
    client: reqwest::Client,
    credentials: Arc<dyn SlotStore>,
}

impl ApiClient {
    /// Create a new client reading its API key from `credentials`
    pub fn new(config: ApiConfig, credentials: Arc<dyn SlotStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            client,
            credentials,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Check that the backend answers on its health endpoint
    pub async fn health(&self) -> Result<bool> {
        let url = self.config.endpoint("/health");
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    fn api_key(&self) -> Result<String> {
        match self.credentials.get(CREDENTIAL_SLOT)? {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => anyhow::bail!("API key not configured"),
        }
    }
}

fn file_part(file: &UploadFile) -> Part {
    Part::bytes(file.bytes.clone()).file_name(file.name.clone())
}

/// Multipart body of the parse request
fn parse_form(pdf: &UploadFile, bom: &UploadFile, manager: &UploadFile, bom_sheet_index: u32) -> Form {
    Form::new()
        .part("pdf_file", file_part(pdf))
        .part("excel_bom", file_part(bom))
        .part("excel_manager", file_part(manager))
        .text("bom_sheet_index", bom_sheet_index.to_string())
}

#[async_trait]
impl Transport for ApiClient {
    async fn parse(
        &self,
        pdf: &UploadFile,
        bom: &UploadFile,
        manager: &UploadFile,
        bom_sheet_index: u32,
    ) -> Result<ParseResponse> {
        let api_key = self.api_key()?;
        let url = self.config.endpoint("/api/parse-pdf");
        debug!(%url, pdf = %pdf.name, bom = %bom.name, manager = %manager.name, bom_sheet_index, "submitting drawing");

        let response = self
            .client
            .post(&url)
            .header("X-API-Key", api_key)
            .multipart(parse_form(pdf, bom, manager, bom_sheet_index))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error! status: {}", response.status().as_u16());
        }

        let parse_response: ParseResponse = response.json().await?;
        Ok(parse_response)
    }

    async fn export(&self, payload: &ParseResponse) -> Result<Vec<u8>> {
        let url = self.config.endpoint("/api/export-excel");
        debug!(%url, "requesting spreadsheet export");

        let response = self.client.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error! status: {}", response.status().as_u16());
        }

        Ok(response.bytes().await?.to_vec())
    }
}
