//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `balances` - Free account balances (key: account)
//! - `pools` - Liquidity pool entries (key: account)
//! - `transfers` - Transfer records (key: big-endian transfer_id)
//! - `meta` - Configuration cells, nonce and operation height
//!
//! Every mutating operation is a single read-validate-commit unit: all reads
//! observe one consistent snapshot, all writes go through one `WriteBatch`,
//! and a failed validation commits nothing. Mutating methods must only be
//! invoked from the single-writer actor (see `actor.rs`); concurrent callers
//! would otherwise race between the read and the commit.

use crate::{
    config::Config,
    error::{Error, Result},
    fees,
    types::{AccountId, ChainId, PoolEntry, TransferRecord, TransferStatus},
    validation,
};
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, DB};
use std::sync::Arc;

/// Column family names
const CF_BALANCES: &str = "balances";
const CF_POOLS: &str = "pools";
const CF_TRANSFERS: &str = "transfers";
const CF_META: &str = "meta";

/// Meta cell keys
const META_NONCE: &[u8] = b"nonce";
const META_HEIGHT: &[u8] = b"height";
const META_PAUSED: &[u8] = b"paused";
const META_MIN_AMOUNT: &[u8] = b"min_transfer_amount";
const META_MAX_AMOUNT: &[u8] = b"max_transfer_amount";
const META_FEE_RATE: &[u8] = b"fee_rate_bps";
const META_ORACLE_PRICE: &[u8] = b"oracle_price";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,

    /// Owner identity (immutable after construction)
    owner: AccountId,

    /// The bridge's own operating identity
    bridge_account: AccountId,
}

impl Storage {
    /// Open or create database, seeding configuration cells on first open
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_BALANCES, Self::cf_options_point_lookup()),
            ColumnFamilyDescriptor::new(CF_POOLS, Self::cf_options_point_lookup()),
            ColumnFamilyDescriptor::new(CF_TRANSFERS, Self::cf_options_transfers()),
            ColumnFamilyDescriptor::new(CF_META, Self::cf_options_point_lookup()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        let storage = Self {
            db: Arc::new(db),
            owner: config.owner.clone(),
            bridge_account: config.bridge_account.clone(),
        };

        storage.seed_meta_cells(config)?;

        tracing::info!(path = %path.display(), "Opened bridge storage");

        Ok(storage)
    }

    fn cf_options_point_lookup() -> Options {
        let mut opts = Options::default();
        // Hot, small values; favor read speed over compression ratio
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_transfers() -> Options {
        let mut opts = Options::default();
        // Append-mostly history, compress harder
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    /// Write initial values for any missing configuration cell
    ///
    /// Cells already present win over the config file: durable state is
    /// authoritative across restarts, config seeds only the first open.
    fn seed_meta_cells(&self, config: &Config) -> Result<()> {
        let cf = self.cf_handle(CF_META)?;
        let mut batch = WriteBatch::default();
        let mut seeded = false;

        let defaults: [(&[u8], u64); 6] = [
            (META_NONCE, 0),
            (META_HEIGHT, 0),
            (META_MIN_AMOUNT, config.bridge.min_transfer_amount),
            (META_MAX_AMOUNT, config.bridge.max_transfer_amount),
            (META_FEE_RATE, config.bridge.initial_fee_rate_bps),
            (META_ORACLE_PRICE, config.bridge.initial_oracle_price),
        ];

        for (key, value) in defaults {
            if self.db.get_cf(cf, key)?.is_none() {
                batch.put_cf(cf, key, bincode::serialize(&value)?);
                seeded = true;
            }
        }

        if self.db.get_cf(cf, META_PAUSED)?.is_none() {
            batch.put_cf(cf, META_PAUSED, bincode::serialize(&false)?);
            seeded = true;
        }

        if seeded {
            self.db.write(batch)?;
            tracing::info!("Seeded bridge configuration cells");
        }

        Ok(())
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    // Meta cell accessors

    fn get_meta_u64(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf_handle(CF_META)?;
        let value = self
            .db
            .get_cf(cf, key)?
            .ok_or_else(|| Error::Storage(format!("Missing meta cell {}", String::from_utf8_lossy(key))))?;
        Ok(bincode::deserialize(&value)?)
    }

    /// Next transfer ID to allocate
    pub fn nonce(&self) -> Result<u64> {
        self.get_meta_u64(META_NONCE)
    }

    /// Current operation height (bumped by every committed mutation)
    pub fn height(&self) -> Result<u64> {
        self.get_meta_u64(META_HEIGHT)
    }

    /// Pause flag
    pub fn is_paused(&self) -> Result<bool> {
        let cf = self.cf_handle(CF_META)?;
        let value = self
            .db
            .get_cf(cf, META_PAUSED)?
            .ok_or_else(|| Error::Storage("Missing meta cell paused".to_string()))?;
        Ok(bincode::deserialize(&value)?)
    }

    /// Current fee rate in basis points
    pub fn fee_rate_bps(&self) -> Result<u64> {
        self.get_meta_u64(META_FEE_RATE)
    }

    /// Current oracle price (fixed-point, 1_000_000 = 1.0)
    pub fn oracle_price(&self) -> Result<u64> {
        self.get_meta_u64(META_ORACLE_PRICE)
    }

    /// Configured transfer amount bounds
    pub fn amount_bounds(&self) -> Result<(u64, u64)> {
        Ok((
            self.get_meta_u64(META_MIN_AMOUNT)?,
            self.get_meta_u64(META_MAX_AMOUNT)?,
        ))
    }

    // Read path (point reads, zero allocation on missing keys)

    /// Free balance for an account, 0 if never touched
    pub fn get_balance(&self, account: &AccountId) -> Result<u64> {
        let cf = self.cf_handle(CF_BALANCES)?;
        match self.db.get_cf(cf, account.as_str().as_bytes())? {
            Some(value) => Ok(bincode::deserialize(&value)?),
            None => Ok(0),
        }
    }

    /// Pool entry for an account, if one exists
    pub fn get_pool(&self, account: &AccountId) -> Result<Option<PoolEntry>> {
        let cf = self.cf_handle(CF_POOLS)?;
        match self.db.get_cf(cf, account.as_str().as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Pool balance, 0 for accounts with no entry
    pub fn get_pool_balance(&self, account: &AccountId) -> Result<u64> {
        Ok(self.get_pool(account)?.map(|p| p.balance).unwrap_or(0))
    }

    /// Cumulative lifetime deposits, 0 for accounts with no entry
    pub fn get_total_supplied(&self, account: &AccountId) -> Result<u64> {
        Ok(self
            .get_pool(account)?
            .map(|p| p.total_supplied)
            .unwrap_or(0))
    }

    /// Transfer record by ID, if one exists
    pub fn get_transfer(&self, transfer_id: u64) -> Result<Option<TransferRecord>> {
        let cf = self.cf_handle(CF_TRANSFERS)?;
        match self.db.get_cf(cf, transfer_id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    // Write path (single-writer only)

    /// Credit an account's free balance
    ///
    /// This is the funding surface for the external token layer; it is not a
    /// bridge operation and is deliberately not gated by the pause flag.
    pub fn deposit(&self, account: &AccountId, amount: u64) -> Result<()> {
        let balance = self.get_balance(account)?;
        let new_balance = balance
            .checked_add(amount)
            .ok_or_else(|| Error::Storage("Balance overflow".to_string()))?;

        let cf_balances = self.cf_handle(CF_BALANCES)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_balances,
            account.as_str().as_bytes(),
            bincode::serialize(&new_balance)?,
        );
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::debug!(account = %account, amount, new_balance, "Balance credited");

        Ok(())
    }

    /// Move free balance into the caller's liquidity pool
    pub fn add_liquidity(&self, account: &AccountId, amount: u64) -> Result<()> {
        if self.is_paused()? {
            return Err(Error::BridgePaused);
        }

        let balance = self.get_balance(account)?;
        if balance < amount {
            return Err(Error::InsufficientBalance {
                available: balance,
                required: amount,
            });
        }

        let mut pool = self.get_pool(account)?.unwrap_or_default();
        let height = self.height()? + 1;
        pool.balance = pool
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::Storage("Pool balance overflow".to_string()))?;
        pool.total_supplied = pool
            .total_supplied
            .checked_add(amount)
            .ok_or_else(|| Error::Storage("Pool total overflow".to_string()))?;
        pool.last_update_height = height;

        // Debit and credit commit together or not at all
        let cf_balances = self.cf_handle(CF_BALANCES)?;
        let cf_pools = self.cf_handle(CF_POOLS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_balances,
            account.as_str().as_bytes(),
            bincode::serialize(&(balance - amount))?,
        );
        batch.put_cf(
            cf_pools,
            account.as_str().as_bytes(),
            bincode::serialize(&pool)?,
        );
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::debug!(
            account = %account,
            amount,
            pool_balance = pool.balance,
            "Liquidity added"
        );

        Ok(())
    }

    /// Record a pending cross-chain transfer, returning the allocated ID
    ///
    /// All validation precedes the nonce increment and record write; the two
    /// commit in one batch, so the nonce never advances without a record and
    /// every record's ID equals the nonce at its allocation time.
    pub fn initiate_transfer(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: u64,
        target_chain: ChainId,
        max_slippage: u64,
    ) -> Result<u64> {
        validation::check_recipient(recipient, &self.owner, &self.bridge_account)?;

        if self.is_paused()? {
            return Err(Error::BridgePaused);
        }

        let (min, max) = self.amount_bounds()?;
        validation::check_amount_bounds(amount, min, max)?;

        fees::check_slippage(self.oracle_price()?, max_slippage)?;

        let rate = self.fee_rate_bps()?;
        let net = fees::net_amount(amount, rate);

        let transfer_id = self.nonce()?;
        let height = self.height()? + 1;
        let record = TransferRecord {
            transfer_id,
            sender: sender.clone(),
            recipient: recipient.clone(),
            amount: net,
            target_chain,
            status: TransferStatus::Pending,
            created_at_height: height,
            created_at: Utc::now(),
        };

        let cf_transfers = self.cf_handle(CF_TRANSFERS)?;
        let cf_meta = self.cf_handle(CF_META)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_transfers,
            transfer_id.to_be_bytes(),
            bincode::serialize(&record)?,
        );
        batch.put_cf(cf_meta, META_NONCE, bincode::serialize(&(transfer_id + 1))?);
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::info!(
            transfer_id,
            sender = %sender,
            recipient = %recipient,
            net_amount = net,
            chain = %target_chain,
            "Transfer initiated"
        );

        Ok(transfer_id)
    }

    /// Complete a pending transfer and credit the recipient
    ///
    /// Completing an already-completed transfer is an idempotent no-op: the
    /// relay may resubmit a confirmation without risking a double credit.
    pub fn complete_transfer(&self, transfer_id: u64) -> Result<()> {
        validation::check_transfer_id(transfer_id, self.nonce()?)?;

        let mut record = self
            .get_transfer(transfer_id)?
            .ok_or(Error::InvalidPool(transfer_id))?;

        if self.is_paused()? {
            return Err(Error::BridgePaused);
        }

        // Re-validated at completion time: the admin identities could have
        // changed between initiation and completion via a config rollover
        validation::check_recipient(&record.recipient, &self.owner, &self.bridge_account)?;

        if record.is_completed() {
            tracing::debug!(transfer_id, "Transfer already completed, no-op");
            return Ok(());
        }

        let balance = self.get_balance(&record.recipient)?;
        let new_balance = balance
            .checked_add(record.amount)
            .ok_or_else(|| Error::Storage("Balance overflow".to_string()))?;
        record.status = TransferStatus::Completed;

        let cf_transfers = self.cf_handle(CF_TRANSFERS)?;
        let cf_balances = self.cf_handle(CF_BALANCES)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_transfers,
            transfer_id.to_be_bytes(),
            bincode::serialize(&record)?,
        );
        batch.put_cf(
            cf_balances,
            record.recipient.as_str().as_bytes(),
            bincode::serialize(&new_balance)?,
        );
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::info!(
            transfer_id,
            recipient = %record.recipient,
            amount = record.amount,
            "Transfer completed"
        );

        Ok(())
    }

    /// Set or clear the pause flag (idempotent)
    pub fn set_paused(&self, paused: bool) -> Result<()> {
        let cf = self.cf_handle(CF_META)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, META_PAUSED, bincode::serialize(&paused)?);
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::info!(paused, "Bridge pause flag updated");

        Ok(())
    }

    /// Replace the fee rate; applies to subsequent fee calculations only
    pub fn update_fee_rate(&self, rate_bps: u64) -> Result<()> {
        validation::check_fee_rate(rate_bps)?;

        let cf = self.cf_handle(CF_META)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, META_FEE_RATE, bincode::serialize(&rate_bps)?);
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::info!(rate_bps, "Fee rate updated");

        Ok(())
    }

    /// Replace the oracle price; affects subsequent slippage checks only
    pub fn update_oracle_price(&self, price: u64) -> Result<()> {
        validation::check_price(price)?;

        let cf = self.cf_handle(CF_META)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, META_ORACLE_PRICE, bincode::serialize(&price)?);
        self.bump_height(&mut batch)?;
        self.db.write(batch)?;

        tracing::info!(price, "Oracle price updated");

        Ok(())
    }

    fn bump_height(&self, batch: &mut WriteBatch) -> Result<()> {
        let cf = self.cf_handle(CF_META)?;
        let next = self.height()? + 1;
        batch.put_cf(cf, META_HEIGHT, bincode::serialize(&next)?);
        Ok(())
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("Bridge storage closed");
        Ok(())
    }
}
