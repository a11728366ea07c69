//! Fee and slippage calculator
//!
//! Pure integer arithmetic. Products are widened to u128 so that
//! `amount * rate` and price comparisons cannot overflow for any
//! representable amount.

use crate::types::{FEE_DENOMINATOR, PRICE_BASE};
use crate::{Error, Result};

/// Protocol fee: `floor(amount * rate_bps / 10_000)`
///
/// The floor remainder is retained nowhere: the fee is subtracted from the
/// transferable amount but not credited to any pool or treasury account.
pub fn calculate_fee(amount: u64, rate_bps: u64) -> u64 {
    let fee = (amount as u128) * (rate_bps as u128) / (FEE_DENOMINATOR as u128);
    // rate_bps <= 10_000 so the quotient always fits back into u64
    fee as u64
}

/// Net transferable amount after fee deduction
pub fn net_amount(amount: u64, rate_bps: u64) -> u64 {
    amount - calculate_fee(amount, rate_bps)
}

/// Slippage acceptance check
///
/// The full form compares `amount * oracle_price` against
/// `amount * (PRICE_BASE + max_slippage)`; for any positive amount the
/// factor cancels, leaving `oracle_price <= PRICE_BASE + max_slippage`.
/// Amount-bounds validation guarantees amount > 0 before this runs.
pub fn check_slippage(oracle_price: u64, max_slippage: u64) -> Result<()> {
    let tolerance = (PRICE_BASE as u128) + (max_slippage as u128);
    if (oracle_price as u128) > tolerance {
        return Err(Error::SlippageExceeded {
            price: oracle_price,
            tolerance: tolerance.min(u64::MAX as u128) as u64,
        });
    }
    Ok(())
}
