use serde::{Deserialize, Serialize};

/// Chain ids of local development networks (Ganache UI, Ganache CLI/Truffle, Hardhat/Anvil).
pub const LOCAL_CHAIN_IDS: [u64; 3] = [1337, 5777, 31337];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Deployed marketplace contract. Empty means "not configured".
    pub contract_address: String,
    /// JSON-RPC endpoint acting as the wallet provider. `None` means no wallet is available.
    pub rpc_url: Option<String>,
    /// Account to act as; the first account the provider exposes when unset.
    pub account: Option<String>,
    pub expected_chain_ids: Vec<u64>,
    pub confirmation_poll_ms: u64,
    pub confirmation_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Entries kept in the in-process read cache in front of the side store.
    pub cache_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Fallback polling interval for submitted-work views.
    pub work_poll_secs: u64,
    /// Fallback polling interval for profile views.
    pub profile_poll_secs: u64,
    /// How often other instances' writes are picked up from the change log.
    pub storage_watch_ms: u64,
    pub bus_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig {
                contract_address: String::new(),
                rpc_url: None,
                account: None,
                expected_chain_ids: LOCAL_CHAIN_IDS.to_vec(),
                confirmation_poll_ms: 1000,
                confirmation_timeout_secs: 120,
                request_timeout_secs: 30,
            },
            storage: StorageConfig {
                database_url: default_database_url(),
                max_connections: 5,
                cache_size: 256,
            },
            sync: SyncConfig {
                work_poll_secs: 10,
                profile_poll_secs: 3,
                storage_watch_ms: 1000,
                bus_capacity: 256,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CHAINWORK_CONTRACT_ADDRESS") {
            cfg.chain.contract_address = v.trim().to_string();
        }
        if let Ok(v) = std::env::var("CHAINWORK_RPC_URL") {
            let v = v.trim();
            cfg.chain.rpc_url = if v.is_empty() { None } else { Some(v.to_string()) };
        }
        if let Ok(v) = std::env::var("CHAINWORK_ACCOUNT") {
            let v = v.trim();
            cfg.chain.account = if v.is_empty() { None } else { Some(v.to_string()) };
        }
        if let Ok(v) = std::env::var("CHAINWORK_EXPECTED_CHAIN_IDS") {
            let ids: Vec<u64> = v.split(',').filter_map(parse_u64).collect();
            if !ids.is_empty() {
                cfg.chain.expected_chain_ids = ids;
            }
        }
        if let Some(value) = env_u64("CHAINWORK_CONFIRMATION_POLL_MS") {
            cfg.chain.confirmation_poll_ms = value.max(1);
        }
        if let Some(value) = env_u64("CHAINWORK_CONFIRMATION_TIMEOUT_SECS") {
            cfg.chain.confirmation_timeout_secs = value.max(1);
        }
        if let Some(value) = env_u64("CHAINWORK_REQUEST_TIMEOUT_SECS") {
            cfg.chain.request_timeout_secs = value.max(1);
        }

        if let Ok(v) = std::env::var("CHAINWORK_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.storage.database_url = v.trim().to_string();
            }
        }
        if let Some(value) = env_u64("CHAINWORK_CACHE_SIZE") {
            cfg.storage.cache_size = value as usize;
        }

        if let Some(value) = env_u64("CHAINWORK_WORK_POLL_SECS") {
            cfg.sync.work_poll_secs = value;
        }
        if let Some(value) = env_u64("CHAINWORK_PROFILE_POLL_SECS") {
            cfg.sync.profile_poll_secs = value;
        }
        if let Some(value) = env_u64("CHAINWORK_STORAGE_WATCH_MS") {
            cfg.sync.storage_watch_ms = value.max(1);
        }

        cfg
    }

    /// An empty contract address is accepted here: it is reported per operation as
    /// "not configured" instead of refusing to start.
    pub fn validate(&self) -> Result<(), String> {
        if self.storage.max_connections == 0 {
            return Err("Storage max_connections must be greater than 0".to_string());
        }
        if self.storage.cache_size == 0 {
            return Err("Storage cache_size must be greater than 0".to_string());
        }
        if self.sync.bus_capacity == 0 {
            return Err("Sync bus_capacity must be greater than 0".to_string());
        }
        if self.chain.confirmation_poll_ms == 0 {
            return Err("Chain confirmation_poll_ms must be greater than 0".to_string());
        }
        if let Some(url) = &self.chain.rpc_url {
            if url::Url::parse(url).is_err() {
                return Err(format!("Chain rpc_url is not a valid URL: {url}"));
            }
        }
        Ok(())
    }

    pub fn is_contract_configured(&self) -> bool {
        !self.chain.contract_address.trim().is_empty()
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_local_dir()
        .map(|d| d.join("chainwork"))
        .unwrap_or_else(|| std::path::PathBuf::from("./data"));
    format!("sqlite://{}?mode=rwc", dir.join("local_store.db").display())
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| parse_u64(&v))
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_but_unconfigured() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(!cfg.is_contract_configured());
        assert_eq!(cfg.sync.work_poll_secs, 10);
        assert_eq!(cfg.sync.profile_poll_secs, 3);
        assert_eq!(cfg.chain.expected_chain_ids, vec![1337, 5777, 31337]);
    }

    #[test]
    fn validate_rejects_bad_rpc_url() {
        let mut cfg = AppConfig::default();
        cfg.chain.rpc_url = Some("not a url".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn whitespace_contract_address_is_unconfigured() {
        let mut cfg = AppConfig::default();
        cfg.chain.contract_address = "   ".into();
        assert!(!cfg.is_contract_configured());
    }
}
