//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The reqwest client for the wallet analysis backend
//! - The liveness probes for the backend and the ML service

pub mod api;

pub use api::{ApiConfig, ApiError, ErrorKind, HttpWalletApi, WalletApi};
