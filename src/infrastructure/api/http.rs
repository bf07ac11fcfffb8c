//! reqwest-backed implementation of [`WalletApi`]

use std::error::Error as _;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;

use super::{ApiError, WalletApi};
use crate::domain::{parse_analysis, WalletAnalysis};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the `/alive` and `/analyze` paths are appended to
    pub backend_url: String,
    /// Base URL of the ML service (`/health`), if it should be probed
    pub ml_service_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080/api/v1".to_string(),
            ml_service_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    address: &'a str,
}

pub struct HttpWalletApi {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpWalletApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    fn backend_endpoint(&self, path: &str) -> String {
        join_url(&self.config.backend_url, path)
    }

    async fn probe(&self, url: String) -> bool {
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(%url, status = %response.status(), "liveness probe failed");
                false
            }
            Err(err) => {
                tracing::debug!(%url, error = %describe(&err), "liveness probe unreachable");
                false
            }
        }
    }
}

#[async_trait]
impl WalletApi for HttpWalletApi {
    async fn check_liveness(&self) -> bool {
        self.probe(self.backend_endpoint("alive")).await
    }

    async fn check_ml_liveness(&self) -> Option<bool> {
        let base = self.config.ml_service_url.as_deref()?;
        Some(self.probe(join_url(base, "health")).await)
    }

    async fn fetch_analysis(&self, address: &str) -> Result<WalletAnalysis, ApiError> {
        let url = self.backend_endpoint("analyze");
        tracing::debug!(%url, address, "requesting wallet analysis");

        let response = self
            .http
            .post(&url)
            .json(&AnalyzeRequest { address })
            .send()
            .await
            .map_err(|err| ApiError::Network(describe(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(describe(&err)))?;

        if !status.is_success() {
            return Err(ApiError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_analysis(&body)?)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// reqwest's top-level Display hides the cause; walk the source chain.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "request timed out".to_string();
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
