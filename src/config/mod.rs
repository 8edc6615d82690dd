use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::chain::Chain;

/// Registry contract shared by every supported chain unless a
/// per-chain override is configured.
pub const DEFAULT_REGISTRY: &str = "0x7c487845f98938Bb955B1D5AD069d9a30e4131fd";

/// Gateway used to materialize ipfs:// metadata documents.
pub const DEFAULT_GATEWAY: &str = "https://ipfs.io/ipfs/";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainConfig {
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
    pub registry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySpec {
    pub chain: Chain,
    pub address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Wallet the "dashboard" placeholder resolves to.
    #[serde(default)]
    pub wallet: Option<String>,

    /// Base URL for resolving ipfs:// metadata URIs.
    #[serde(default)]
    pub gateway: Option<String>,

    /// Per-chain endpoint and registry overrides, keyed by slug.
    #[serde(default)]
    pub chains: BTreeMap<Chain, ChainConfig>,

    /// Extra currencies for the currency picker.
    #[serde(default)]
    pub currencies: Vec<CurrencySpec>,
}

impl Config {
    pub fn chain(&self, chain: Chain) -> Option<&ChainConfig> {
        self.chains.get(&chain)
    }

    pub fn registry_for(&self, chain: Chain) -> String {
        self.chain(chain)
            .and_then(|c| c.registry.clone())
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
    }

    pub fn gateway(&self) -> String {
        self.gateway
            .clone()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY.to_string())
    }
}

impl CurrencySpec {
    pub fn normalized_address(&self) -> String {
        normalize_address(&self.address)
    }

    pub fn display_symbol(&self) -> String {
        self.symbol
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| short_addr(&self.address))
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_path(&path)
}

/// Load a specific config file; missing or malformed files fall back
/// to the defaults rather than failing startup.
pub fn load_path(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SCRY_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("scry").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("scry").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "scry", "scry")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("scry"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("scry"));
    }
    directories::ProjectDirs::from("io", "scry", "scry").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn metadata_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("metadata.sqlite3"))
}

pub fn export_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("exports"))
}

fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", payload.to_lowercase())
}

fn short_addr(value: &str) -> String {
    let value = value.trim();
    if value.len() <= 10 {
        return value.to_string();
    }
    let start: String = value.chars().take(6).collect();
    let end: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}..{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_keyed_config() {
        let toml = r#"
            wallet = "0x1111111111111111111111111111111111111111"

            [chains.ethereum]
            rpc = "https://eth.example"

            [chains.mumbai]
            ws = "wss://mumbai.example"
            registry = "0x2222222222222222222222222222222222222222"

            [[currencies]]
            chain = "polygon"
            address = "0x3333333333333333333333333333333333333333"
            symbol = "TST"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.chain(Chain::Mainnet).unwrap().rpc.as_deref(),
            Some("https://eth.example")
        );
        assert_eq!(
            config.registry_for(Chain::Mumbai),
            "0x2222222222222222222222222222222222222222"
        );
        assert_eq!(config.registry_for(Chain::Polygon), DEFAULT_REGISTRY);
        assert_eq!(config.currencies.len(), 1);
        assert_eq!(config.currencies[0].chain, Chain::Polygon);
        assert_eq!(config.gateway(), DEFAULT_GATEWAY);
    }
}
