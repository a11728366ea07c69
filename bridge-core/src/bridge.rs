//! Main bridge orchestration layer
//!
//! This module ties together storage, the single-writer actor, and metrics
//! into a high-level API for bridge operations.
//!
//! # Example
//!
//! ```no_run
//! use bridge_core::{AccountId, Bridge, ChainId, Config};
//!
//! #[tokio::main]
//! async fn main() -> bridge_core::Result<()> {
//!     let bridge = Bridge::open(Config::default()).await?;
//!
//!     let alice = AccountId::new("alice");
//!     bridge.deposit(&alice, 1_000_000).await?;
//!     bridge.add_liquidity(&alice, 500_000).await?;
//!
//!     let id = bridge
//!         .initiate_transfer(&alice, &AccountId::new("bob"), 200_000, ChainId::Ethereum, 0)
//!         .await?;
//!     println!("transfer {id} pending");
//!
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_bridge_actor, BridgeHandle},
    metrics::Metrics,
    types::{AccountId, ChainId, TransferRecord},
    Config, Error, Result, Storage,
};
use std::sync::Arc;

/// Main bridge interface
pub struct Bridge {
    /// Actor handle for mutations
    handle: BridgeHandle,

    /// Direct storage access (for reads)
    storage: Arc<Storage>,

    /// Metrics collector
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl Bridge {
    /// Open bridge with configuration
    pub async fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(Storage::open(&config)?);
        let metrics = Metrics::new()
            .map_err(|e| Error::Config(format!("Failed to create metrics: {}", e)))?;

        let handle = spawn_bridge_actor(storage.clone(), metrics.clone());

        Ok(Self {
            handle,
            storage,
            metrics,
            config,
        })
    }

    /// Authorization gate for owner-restricted operations
    fn require_owner(&self, caller: &AccountId) -> Result<()> {
        if caller != &self.config.owner {
            return Err(Error::OwnerOnly);
        }
        Ok(())
    }

    // Caller-facing mutations

    /// Credit an account's free balance (funding from the token layer)
    pub async fn deposit(&self, account: &AccountId, amount: u64) -> Result<()> {
        self.handle.deposit(account.clone(), amount).await
    }

    /// Move the caller's free balance into their liquidity pool
    pub async fn add_liquidity(&self, caller: &AccountId, amount: u64) -> Result<()> {
        self.handle.add_liquidity(caller.clone(), amount).await
    }

    /// Register a cross-chain transfer intent, returning the allocated ID
    pub async fn initiate_transfer(
        &self,
        caller: &AccountId,
        recipient: &AccountId,
        amount: u64,
        target_chain: ChainId,
        max_slippage: u64,
    ) -> Result<u64> {
        self.handle
            .initiate_transfer(
                caller.clone(),
                recipient.clone(),
                amount,
                target_chain,
                max_slippage,
            )
            .await
    }

    /// Mark a transfer complete and credit the recipient
    ///
    /// Restricted to the owner: completion attests that the destination-chain
    /// event was observed, and the core trusts a single privileged caller for
    /// that role.
    pub async fn complete_transfer(&self, caller: &AccountId, transfer_id: u64) -> Result<()> {
        self.require_owner(caller)?;
        self.handle.complete_transfer(transfer_id).await
    }

    // Admin control surface

    /// Pause the bridge (idempotent)
    pub async fn pause(&self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        self.handle.set_paused(true).await
    }

    /// Resume the bridge (idempotent)
    pub async fn resume(&self, caller: &AccountId) -> Result<()> {
        self.require_owner(caller)?;
        self.handle.set_paused(false).await
    }

    /// Replace the fee rate; takes effect on the next fee calculation
    pub async fn update_fee_rate(&self, caller: &AccountId, rate_bps: u64) -> Result<()> {
        self.require_owner(caller)?;
        self.handle.update_fee_rate(rate_bps).await
    }

    /// Replace the oracle price; affects subsequent slippage checks only
    pub async fn update_oracle_price(&self, caller: &AccountId, price: u64) -> Result<()> {
        self.require_owner(caller)?;
        self.handle.update_oracle_price(price).await
    }

    // Read path

    /// Free balance, 0 for untouched accounts
    pub fn get_balance(&self, account: &AccountId) -> Result<u64> {
        self.storage.get_balance(account)
    }

    /// Pool balance, 0 for accounts with no entry
    pub fn get_pool_balance(&self, account: &AccountId) -> Result<u64> {
        self.storage.get_pool_balance(account)
    }

    /// Cumulative lifetime deposits, 0 for accounts with no entry
    pub fn get_total_supplied(&self, account: &AccountId) -> Result<u64> {
        self.storage.get_total_supplied(account)
    }

    /// Transfer record by ID, if one exists
    pub fn get_transfer(&self, transfer_id: u64) -> Result<Option<TransferRecord>> {
        self.storage.get_transfer(transfer_id)
    }

    /// Pause flag
    pub fn is_paused(&self) -> Result<bool> {
        self.storage.is_paused()
    }

    /// Current fee rate in basis points
    pub fn fee_rate_bps(&self) -> Result<u64> {
        self.storage.fee_rate_bps()
    }

    /// Current oracle price
    pub fn oracle_price(&self) -> Result<u64> {
        self.storage.oracle_price()
    }

    /// Next transfer ID to allocate
    pub fn nonce(&self) -> Result<u64> {
        self.storage.nonce()
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shutdown bridge
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}
