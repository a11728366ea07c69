//! ChainSpan Bridge Core
//!
//! Cross-chain token bridge combined with a per-account liquidity ledger.
//!
//! # Architecture
//!
//! - **Validation Gate**: pure predicates run before any mutation commits
//! - **Single Writer**: one actor task serializes all mutations
//! - **Atomic Commits**: every operation is one RocksDB WriteBatch
//! - **Durable Cells**: balances, pools, transfers and configuration survive restarts
//!
//! # Invariants
//!
//! - Transfer IDs are a dense nonce sequence: the nonce never advances
//!   without a record, and no ID is ever reused
//! - Transfer status only moves `Pending` -> `Completed`
//! - A failed operation mutates nothing
//! - Pool balances only grow (no withdrawal path exists)

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod bridge;
pub mod config;
pub mod error;
pub mod fees;
pub mod metrics;
pub mod storage;
pub mod types;
pub mod validation;

// Re-exports
pub use bridge::Bridge;
pub use config::Config;
pub use error::{Error, Result};
pub use storage::Storage;
pub use types::{AccountId, ChainId, PoolEntry, TransferRecord, TransferStatus};
