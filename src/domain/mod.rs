//! Domain layer - wallet analysis model and display formatting
//!
//! Nothing here touches the network or the terminal.

pub mod analysis;
pub mod format;

pub use analysis::{
    parse_analysis, MlResult, SchemaError, SimilarWallet, Transaction, WalletAnalysis,
};
