//! JSON Export
//!
//! Writes a whole wallet analysis to a JSON file.

use crate::domain::WalletAnalysis;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Analysis plus the address it was requested for
#[derive(Serialize)]
struct ExportableAnalysis<'a> {
    address: &'a str,
    exported_at: String,
    #[serde(flatten)]
    analysis: &'a WalletAnalysis,
}

/// Write an analysis to JSON file, returning the number of transactions
pub fn write_analysis(
    path: &Path,
    address: &str,
    analysis: &WalletAnalysis,
) -> Result<usize, Box<dyn std::error::Error>> {
    let exportable = ExportableAnalysis {
        address,
        exported_at: chrono::Utc::now().to_rfc3339(),
        analysis,
    };

    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(analysis.transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_analysis;

    #[test]
    fn test_write_analysis() {
        let analysis = parse_analysis(
            r#"{"status":"ok","transactions":[{"hash":"0x01"}],
                "ml_result":{"confidence":0.9,"predicted_class":"Exchange",
                "similar_wallets":["0xabc",{"address":"0xdef","label":"Kraken"}]}}"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");

        let count = write_analysis(&path, "0xwallet", &analysis).unwrap();
        assert_eq!(count, 1);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["address"], "0xwallet");
        assert_eq!(value["status"], "ok");
        assert_eq!(value["transactions"][0]["hash"], "0x01");
        assert_eq!(value["ml_result"]["predicted_class"], "Exchange");
        assert_eq!(value["ml_result"]["similar_wallets"][0]["address"], "0xabc");
        assert_eq!(value["ml_result"]["similar_wallets"][1]["label"], "Kraken");
    }
}
