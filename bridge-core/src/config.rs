//! Configuration for the bridge ledger

use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// Bridge owner identity (immutable after construction)
    pub owner: AccountId,

    /// The bridge's own operating identity
    ///
    /// Transfers addressed to this account or to the owner are rejected:
    /// neither has a corresponding off-chain recipient.
    pub bridge_account: AccountId,

    /// Bridge protocol parameters
    pub bridge: BridgeParams,

    /// RocksDB configuration
    pub rocksdb: RocksDbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/bridge"),
            service_name: "bridge-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            owner: AccountId::new("bridge-owner"),
            bridge_account: AccountId::new("bridge-operator"),
            bridge: BridgeParams::default(),
            rocksdb: RocksDbConfig::default(),
        }
    }
}

/// Bridge protocol parameters
///
/// These seed the durable configuration cells on first open. After that the
/// stored cells are authoritative; fee rate and oracle price are owner-mutable
/// at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Minimum transfer amount (micro-units)
    pub min_transfer_amount: u64,

    /// Maximum transfer amount (micro-units)
    pub max_transfer_amount: u64,

    /// Initial fee rate (basis points)
    pub initial_fee_rate_bps: u64,

    /// Initial oracle price (fixed-point, 1_000_000 = 1.0)
    pub initial_oracle_price: u64,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            min_transfer_amount: 100_000,              // 0.1 unit
            max_transfer_amount: 1_000_000_000_000,    // 1M units
            initial_fee_rate_bps: 25,                  // 0.25%
            initial_oracle_price: crate::types::PRICE_BASE,
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,

    /// Enable statistics
    pub enable_statistics: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            max_background_jobs: 4,
            enable_statistics: false,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("BRIDGE_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(addr) = std::env::var("BRIDGE_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(owner) = std::env::var("BRIDGE_OWNER") {
            config.owner = AccountId::new(owner);
        }

        if let Ok(operator) = std::env::var("BRIDGE_OPERATOR") {
            config.bridge_account = AccountId::new(operator);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check parameter consistency
    pub fn validate(&self) -> crate::Result<()> {
        if self.bridge.min_transfer_amount > self.bridge.max_transfer_amount {
            return Err(crate::Error::Config(
                "min_transfer_amount exceeds max_transfer_amount".to_string(),
            ));
        }
        if self.bridge.initial_fee_rate_bps > crate::types::MAX_FEE_RATE_BPS {
            return Err(crate::Error::Config(format!(
                "initial_fee_rate_bps {} exceeds maximum {}",
                self.bridge.initial_fee_rate_bps,
                crate::types::MAX_FEE_RATE_BPS
            )));
        }
        if self.owner == self.bridge_account {
            return Err(crate::Error::Config(
                "owner and bridge_account must be distinct identities".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "bridge-core");
        assert_eq!(config.bridge.min_transfer_amount, 100_000);
        assert_eq!(config.bridge.max_transfer_amount, 1_000_000_000_000);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let mut config = Config::default();
        config.bridge.min_transfer_amount = 10;
        config.bridge.max_transfer_amount = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_fee() {
        let mut config = Config::default();
        config.bridge.initial_fee_rate_bps = 1_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.bridge.initial_fee_rate_bps, config.bridge.initial_fee_rate_bps);
        assert_eq!(parsed.owner, config.owner);
    }
}
