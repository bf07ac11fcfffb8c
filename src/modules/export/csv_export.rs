//! CSV Export
//!
//! Writes analysed transactions to CSV files.

use crate::domain::Transaction;
use std::path::Path;

/// Write transactions to CSV file
pub fn write_transactions(
    path: &Path,
    txs: &[Transaction],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    // Write header
    wtr.write_record([
        "hash",
        "block_number",
        "block_timestamp",
        "from",
        "from_label",
        "to",
        "to_label",
        "value_wei",
        "gas",
        "gas_price_wei",
        "transaction_fee_eth",
        "status",
    ])?;

    // Write data rows
    for tx in txs {
        let status = if tx.succeeded() { "success" } else { "failed" };

        wtr.write_record([
            tx.hash.as_str(),
            tx.block_number.as_str(),
            tx.block_timestamp.as_str(),
            tx.from_address.as_str(),
            tx.from_label().unwrap_or(""),
            tx.to_address.as_str(),
            tx.to_label().unwrap_or(""),
            tx.value.as_str(),
            tx.gas.as_str(),
            tx.gas_price.as_str(),
            tx.transaction_fee.as_str(),
            status,
        ])?;
    }

    wtr.flush()?;
    Ok(txs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_analysis;

    #[test]
    fn test_write_transactions() {
        let analysis = parse_analysis(
            r#"{"status":"ok","transactions":[
                {"hash":"0x01","from_address":"0xa","from_address_label":"Binance 14","to_address":"0xb","value":"1","receipt_status":"1"},
                {"hash":"0x02","from_address":"0xb","to_address":"0xa","receipt_status":"0"}
            ]}"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txs.csv");

        let count = write_transactions(&path, &analysis.transactions).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("hash,block_number"));
        assert!(lines[1].starts_with("0x01,"));
        assert!(lines[1].contains("Binance 14"));
        assert!(lines[1].ends_with(",success"));
        assert!(lines[2].ends_with(",failed"));
    }
}
