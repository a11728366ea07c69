//! Validation gate: pure predicates run before any mutation commits
//!
//! Every caller-facing operation evaluates the subset of these checks
//! relevant to it, short-circuiting on the first failure. No predicate
//! touches state; stateful lookups (pause flag, nonce, balances) happen in
//! the storage layer, which calls into this module with the values it read.

use crate::types::{AccountId, MAX_FEE_RATE_BPS, MAX_ORACLE_PRICE};
use crate::{Error, Result};

/// Reject transfers addressed to an administrative identity
///
/// Funds sent to the owner or to the bridge's own operating account have no
/// off-chain recipient and would be locked or recycled; both are refused.
pub fn check_recipient(
    recipient: &AccountId,
    owner: &AccountId,
    bridge_account: &AccountId,
) -> Result<()> {
    if recipient == owner || recipient == bridge_account {
        return Err(Error::InvalidRecipient(recipient.to_string()));
    }
    Ok(())
}

/// Amount must lie within the configured bounds, inclusive on both ends
pub fn check_amount_bounds(amount: u64, min: u64, max: u64) -> Result<()> {
    if amount < min || amount > max {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

/// Fee rate may not exceed the protocol maximum (1000 bps = 10%)
pub fn check_fee_rate(rate_bps: u64) -> Result<()> {
    if rate_bps > MAX_FEE_RATE_BPS {
        return Err(Error::InvalidFeeRate(rate_bps));
    }
    Ok(())
}

/// Oracle price must be positive and within the accepted range
pub fn check_price(price: u64) -> Result<()> {
    if price == 0 || price > MAX_ORACLE_PRICE {
        return Err(Error::InvalidPrice(price));
    }
    Ok(())
}

/// A transfer ID is valid only if it was already allocated by the nonce
pub fn check_transfer_id(transfer_id: u64, nonce: u64) -> Result<()> {
    if transfer_id >= nonce {
        return Err(Error::InvalidTransferId(transfer_id));
    }
    Ok(())
}
