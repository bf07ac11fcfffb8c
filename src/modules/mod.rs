//! Feature modules driven from the results screen
//!
//! - export: CSV and JSON export of the current analysis

pub mod export;
