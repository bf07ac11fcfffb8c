//! Smart Wallet: a terminal client for the wallet analysis backend.
//!
//! Enter an Ethereum address, the backend classifies it with its ML
//! service and returns recent transactions plus similar wallets.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;
pub mod telemetry;
pub mod ui;
