//! Persistent cache for resolved contract metadata

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::domain::metadata::ContractMetadata;

/// One cached metadata row
#[derive(Debug, Clone)]
pub struct CachedMetadata {
    pub chain_id: u64,
    pub address: String, // lowercase hex with 0x prefix
    pub uri: Option<String>,
    pub metadata: ContractMetadata,
}

/// SQLite-backed metadata cache
#[derive(Debug)]
pub struct MetadataStore {
    conn: Connection,
}

impl MetadataStore {
    /// Open or create the cache database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Contract metadata cache (gateway lookups)
            CREATE TABLE IF NOT EXISTS contract_metadata (
                chain_id    INTEGER NOT NULL,
                address     TEXT NOT NULL,
                name        TEXT,
                description TEXT,
                image       TEXT,
                uri         TEXT,
                fetched_at  INTEGER DEFAULT (strftime('%s', 'now')),
                PRIMARY KEY (chain_id, address)
            );

            CREATE INDEX IF NOT EXISTS idx_metadata_fetched ON contract_metadata(fetched_at);
            ",
        )?;
        Ok(())
    }

    /// Save resolved metadata for a contract
    pub fn save(
        &self,
        chain_id: u64,
        address: &str,
        uri: Option<&str>,
        metadata: &ContractMetadata,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO contract_metadata(chain_id, address, name, description, image, uri)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(chain_id, address) DO UPDATE SET
                name=excluded.name,
                description=excluded.description,
                image=excluded.image,
                uri=excluded.uri,
                fetched_at=strftime('%s', 'now')",
            params![
                chain_id,
                address.to_lowercase(),
                metadata.name,
                metadata.description,
                metadata.image,
                uri,
            ],
        )?;
        Ok(())
    }

    /// Get cached metadata for a contract
    pub fn get(&self, chain_id: u64, address: &str) -> Result<Option<CachedMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT chain_id, address, name, description, image, uri FROM contract_metadata
             WHERE chain_id = ?1 AND address = ?2",
        )?;

        let mut rows = stmt.query(params![chain_id, address.to_lowercase()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(CachedMetadata {
                chain_id: row.get(0)?,
                address: row.get(1)?,
                metadata: ContractMetadata {
                    name: row.get(2)?,
                    description: row.get(3)?,
                    image: row.get(4)?,
                },
                uri: row.get(5)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Get all cached rows (for preloading at startup)
    pub fn load_all(&self) -> Result<Vec<CachedMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT chain_id, address, name, description, image, uri FROM contract_metadata
             ORDER BY chain_id, address",
        )?;

        let mut rows = stmt.query([])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            results.push(CachedMetadata {
                chain_id: row.get(0)?,
                address: row.get(1)?,
                metadata: ContractMetadata {
                    name: row.get(2)?,
                    description: row.get(3)?,
                    image: row.get(4)?,
                },
                uri: row.get(5)?,
            });
        }
        Ok(results)
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contract_metadata", [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }

    /// Clean entries older than the given age
    pub fn cleanup_old_entries(&self, max_age_days: u32) -> Result<usize> {
        let cutoff = max_age_days as i64 * 24 * 60 * 60;
        let deleted: usize = self.conn.execute(
            "DELETE FROM contract_metadata WHERE fetched_at < (strftime('%s', 'now') - ?1)",
            params![cutoff],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_db(label: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("scry_test_{}_{}.db", label, std::process::id()));
        path
    }

    #[test]
    fn test_metadata_round_trip() {
        let path = temp_db("roundtrip");
        let store = MetadataStore::open(&path).unwrap();

        let meta = ContractMetadata {
            name: Some("My Drop".into()),
            description: Some("First collection".into()),
            image: None,
        };
        store
            .save(1, "0xAbCd000000000000000000000000000000000000", Some("ipfs://QmX"), &meta)
            .unwrap();

        // Lookup is case-insensitive on the address.
        let cached = store
            .get(1, "0xABCD000000000000000000000000000000000000")
            .unwrap();
        assert!(cached.is_some());
        let cached = cached.unwrap();
        assert_eq!(cached.metadata.name, Some("My Drop".to_string()));
        assert_eq!(cached.uri, Some("ipfs://QmX".to_string()));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rows_are_chain_scoped() {
        let path = temp_db("chains");
        let store = MetadataStore::open(&path).unwrap();
        let addr = "0x1111111111111111111111111111111111111111";

        store
            .save(1, addr, None, &ContractMetadata::named("On Mainnet"))
            .unwrap();
        store
            .save(137, addr, None, &ContractMetadata::named("On Polygon"))
            .unwrap();

        let mainnet = store.get(1, addr).unwrap().unwrap();
        let polygon = store.get(137, addr).unwrap().unwrap();
        assert_eq!(mainnet.metadata.name, Some("On Mainnet".to_string()));
        assert_eq!(polygon.metadata.name, Some("On Polygon".to_string()));
        assert_eq!(store.stats().unwrap(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_overwrites_existing_row() {
        let path = temp_db("upsert");
        let store = MetadataStore::open(&path).unwrap();
        let addr = "0x2222222222222222222222222222222222222222";

        store
            .save(5, addr, None, &ContractMetadata::named("Before"))
            .unwrap();
        store
            .save(5, addr, Some("ipfs://QmY"), &ContractMetadata::named("After"))
            .unwrap();

        let cached = store.get(5, addr).unwrap().unwrap();
        assert_eq!(cached.metadata.name, Some("After".to_string()));
        assert_eq!(store.stats().unwrap(), 1);

        std::fs::remove_file(path).ok();
    }
}
