//! CSV Export
//!
//! Writes contract rows to a CSV file.

use std::path::Path;

use super::ExportRecord;

/// Write contract rows to CSV file
pub fn write_contracts(
    path: &Path,
    records: &[ExportRecord],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    // Write header
    wtr.write_record(["name", "type", "chain", "chain_id", "address", "route"])?;

    // Write data rows
    for record in records {
        wtr.write_record([
            record.name.clone(),
            record.contract_type.clone(),
            record.chain.slug().to_string(),
            record.chain.id().to_string(),
            record.address.clone(),
            record.route.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Chain;

    #[test]
    fn test_write_contracts_round_trip() {
        let records = vec![
            ExportRecord {
                name: "My Drop".to_string(),
                contract_type: "NFT Drop".to_string(),
                chain: Chain::Polygon,
                address: "0x1111111111111111111111111111111111111111".to_string(),
                route: "/0xabc/polygon/nft-drop/0x1111111111111111111111111111111111111111"
                    .to_string(),
            },
            ExportRecord {
                name: "Loading ...".to_string(),
                contract_type: "Token".to_string(),
                chain: Chain::Mainnet,
                address: "0x2222222222222222222222222222222222222222".to_string(),
                route: "/0xabc/ethereum/token/0x2222222222222222222222222222222222222222"
                    .to_string(),
            },
        ];

        let path = std::env::temp_dir().join(format!("scry_export_{}.csv", std::process::id()));
        let count = write_contracts(&path, &records).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,type,chain,chain_id,address,route"
        );
        let first = lines.next().unwrap();
        assert!(first.contains("My Drop"));
        assert!(first.contains("polygon,137"));

        std::fs::remove_file(&path).ok();
    }
}
