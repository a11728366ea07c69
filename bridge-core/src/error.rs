//! Error types for the bridge ledger

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge errors
///
/// Every domain failure is a normal, recoverable outcome for a single
/// operation: a failed operation mutates nothing and the ledger stays usable.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller is not the bridge owner
    #[error("Operation restricted to the bridge owner")]
    OwnerOnly,

    /// Free balance too low for the requested debit
    #[error("Insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        /// Current free balance
        available: u64,
        /// Amount the operation tried to debit
        required: u64,
    },

    /// Transfer amount outside the configured bounds
    #[error("Invalid amount: {0} outside configured transfer bounds")]
    InvalidAmount(u64),

    /// Bridge is paused
    #[error("Bridge is paused")]
    BridgePaused,

    /// Oracle price exceeds the caller's slippage tolerance
    #[error("Slippage exceeded: oracle price {price} above tolerance {tolerance}")]
    SlippageExceeded {
        /// Current oracle price
        price: u64,
        /// Caller's absolute acceptance bound
        tolerance: u64,
    },

    /// Allocated transfer ID with no backing record
    #[error("Invalid pool: no record for allocated transfer {0}")]
    InvalidPool(u64),

    /// Recipient is an administrative identity
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Unsupported destination chain
    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    /// Transfer ID was never allocated
    #[error("Invalid transfer ID: {0}")]
    InvalidTransferId(u64),

    /// Oracle price outside the accepted range
    #[error("Invalid price: {0}")]
    InvalidPrice(u64),

    /// Fee rate above the protocol maximum
    #[error("Invalid fee rate: {0} bps")]
    InvalidFeeRate(u64),

    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
