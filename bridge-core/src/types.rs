//! Core types for the bridge ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (unsigned micro-units, u128 intermediates)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee denominator: rates are expressed in basis points (1 bps = 0.01%)
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Maximum configurable fee rate (1000 bps = 10%)
pub const MAX_FEE_RATE_BPS: u64 = 1_000;

/// Oracle price fixed-point base: 1_000_000 represents 1.0
pub const PRICE_BASE: u64 = 1_000_000;

/// Maximum accepted oracle price
pub const MAX_ORACLE_PRICE: u64 = 1_000_000_000_000;

/// Account identifier (chain address, account number, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported destination chain
///
/// The set is closed: an unsupported chain is unrepresentable, which replaces
/// runtime string membership checks at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChainId {
    /// Ethereum mainnet
    Ethereum = 1,
    /// Bitcoin
    Bitcoin = 2,
    /// BNB Smart Chain
    Bsc = 3,
    /// Polygon PoS
    Polygon = 4,
}

impl ChainId {
    /// Canonical lowercase tag
    pub fn tag(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Bitcoin => "bitcoin",
            ChainId::Bsc => "bsc",
            ChainId::Polygon => "polygon",
        }
    }

    /// Parse from tag
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "ethereum" => Some(ChainId::Ethereum),
            "bitcoin" => Some(ChainId::Bitcoin),
            "bsc" => Some(ChainId::Bsc),
            "polygon" => Some(ChainId::Polygon),
            _ => None,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Transfer lifecycle status
///
/// The only legal transition is `Pending` -> `Completed`. There is no
/// cancellation or expiry state: once recorded, a transfer can only complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransferStatus {
    /// Recorded, awaiting completion by the bridge operator
    Pending = 1,
    /// Recipient credited (terminal)
    Completed = 2,
}

/// Cross-chain transfer record
///
/// Keyed by `transfer_id`, a dense nonce sequence. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Allocated transfer ID (equals the nonce at initiation time)
    pub transfer_id: u64,

    /// Sender account
    pub sender: AccountId,

    /// Recipient account (credited on completion)
    pub recipient: AccountId,

    /// Net amount in micro-units, after fee deduction
    pub amount: u64,

    /// Destination chain
    pub target_chain: ChainId,

    /// Lifecycle status
    pub status: TransferStatus,

    /// Operation height at which the record was created
    pub created_at_height: u64,

    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Check if the transfer reached its terminal state
    pub fn is_completed(&self) -> bool {
        self.status == TransferStatus::Completed
    }
}

/// Per-account liquidity pool entry
///
/// `balance` and `total_supplied` only grow: no withdrawal path exists in
/// the core, so the two fields diverge only if a withdrawal op is ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Currently supplied accounting balance
    pub balance: u64,

    /// Cumulative lifetime deposits (monotonically non-decreasing)
    pub total_supplied: u64,

    /// Operation height of the last mutation
    pub last_update_height: u64,
}
