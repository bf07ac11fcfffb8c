//! Wallet analysis backend client
//!
//! [`WalletApi`] is the seam between the store and the network: the binary
//! uses [`HttpWalletApi`], tests substitute their own implementation.

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SchemaError, WalletAnalysis};

pub use http::{ApiConfig, HttpWalletApi};

#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Probe `GET /alive`. Never fails: any error means "not alive".
    async fn check_liveness(&self) -> bool;

    /// Probe the ML service health endpoint, `None` when none is configured
    async fn check_ml_liveness(&self) -> Option<bool> {
        None
    }

    /// `POST /analyze` for `address`
    async fn fetch_analysis(&self, address: &str) -> Result<WalletAnalysis, ApiError>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response; `body` is the raw response text
    #[error("backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Backend,
    Schema,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Backend { .. } => ErrorKind::Backend,
            ApiError::Schema(_) => ErrorKind::Schema,
        }
    }

    /// Text kept as the search error. A backend body is passed through
    /// unchanged; only a blank body is replaced.
    pub fn message(&self) -> String {
        match self {
            ApiError::Backend { status, body } if body.trim().is_empty() => {
                format!("Backend returned HTTP {status}")
            }
            ApiError::Backend { body, .. } => body.clone(),
            ApiError::Network(reason) => format!("Network error: {reason}"),
            ApiError::Schema(err) => format!("Unexpected response: {err}"),
        }
    }
}
