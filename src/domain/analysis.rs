//! Wallet analysis payload returned by the backend
//!
//! The backend marshals with `omitempty`, so almost every field is optional
//! on the wire. Parsing goes through [`parse_analysis`], which rejects bodies
//! that deserialize but make no sense (confidence outside `[0, 1]`,
//! transactions without a hash).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Receipt status string the backend uses for a successful transaction
pub const RECEIPT_SUCCESS: &str = "1";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed analysis payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("transaction #{index} has no hash")]
    MissingHash { index: usize },
    #[error("similar wallet #{index} has no address")]
    MissingSimilarAddress { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAnalysis {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub ml_result: Option<MlResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub transaction_index: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub from_address_label: Option<String>,
    #[serde(default)]
    pub to_address: String,
    #[serde(default)]
    pub to_address_label: Option<String>,
    /// Wei, decimal string
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas: String,
    /// Wei, decimal string
    #[serde(default)]
    pub gas_price: String,
    #[serde(default)]
    pub receipt_status: String,
    #[serde(default)]
    pub block_timestamp: String,
    #[serde(default)]
    pub block_number: String,
    #[serde(default)]
    pub block_hash: String,
    /// Ether, already formatted by the backend
    #[serde(default)]
    pub transaction_fee: String,
}

impl Transaction {
    pub fn succeeded(&self) -> bool {
        self.receipt_status == RECEIPT_SUCCESS
    }

    /// Backend-provided label, ignoring blanks
    pub fn from_label(&self) -> Option<&str> {
        non_empty(self.from_address_label.as_deref())
    }

    pub fn to_label(&self) -> Option<&str> {
        non_empty(self.to_address_label.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlResult {
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub predicted_class: String,
    #[serde(default)]
    pub similar_wallets: Option<Vec<SimilarWallet>>,
    /// Set instead of a classification when the ML service failed; the
    /// transactions in the same response are still valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MlResult {
    pub fn similar(&self) -> &[SimilarWallet] {
        self.similar_wallets.as_deref().unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }
}

/// A wallet the ML service considers close to the analyzed one.
///
/// Older services send bare address strings, newer ones send objects with a
/// label and transaction count; both deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SimilarWalletWire")]
pub struct SimilarWallet {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
}

impl SimilarWallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: None,
            transaction_count: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SimilarWalletWire {
    Address(String),
    Detailed {
        #[serde(default)]
        address: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        transaction_count: Option<u64>,
    },
}

impl From<SimilarWalletWire> for SimilarWallet {
    fn from(wire: SimilarWalletWire) -> Self {
        match wire {
            SimilarWalletWire::Address(address) => SimilarWallet::new(address),
            SimilarWalletWire::Detailed {
                address,
                label,
                transaction_count,
            } => SimilarWallet {
                address,
                label,
                transaction_count,
            },
        }
    }
}

/// Parse and validate an analysis response body
pub fn parse_analysis(body: &str) -> Result<WalletAnalysis, SchemaError> {
    let analysis: WalletAnalysis = serde_json::from_str(body)?;
    analysis.validate()?;
    Ok(analysis)
}

impl WalletAnalysis {
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(ml) = &self.ml_result {
            let in_range = ml.confidence.is_finite() && (0.0..=1.0).contains(&ml.confidence);
            if ml.error().is_none() && !in_range {
                return Err(SchemaError::ConfidenceOutOfRange(ml.confidence));
            }
            if let Some(index) = ml.similar().iter().position(|w| w.address.trim().is_empty()) {
                return Err(SchemaError::MissingSimilarAddress { index });
            }
        }
        if let Some(index) = self
            .transactions
            .iter()
            .position(|tx| tx.hash.trim().is_empty())
        {
            return Err(SchemaError::MissingHash { index });
        }
        Ok(())
    }

    pub fn predicted_class(&self) -> Option<&str> {
        self.ml_result
            .as_ref()
            .and_then(|ml| non_empty(Some(ml.predicted_class.as_str())))
    }

    /// Model confidence; 0 when the ML service reported an error
    pub fn confidence(&self) -> Option<f64> {
        self.ml_result.as_ref().map(|ml| {
            if ml.error().is_some() || !ml.confidence.is_finite() {
                0.0
            } else {
                ml.confidence
            }
        })
    }

    /// Error text from the ML service, if classification failed
    pub fn ml_error(&self) -> Option<&str> {
        self.ml_result.as_ref().and_then(MlResult::error)
    }

    pub fn similar_wallets(&self) -> &[SimilarWallet] {
        self.ml_result.as_ref().map(MlResult::similar).unwrap_or(&[])
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
