//! Property-based tests for bridge invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Fee arithmetic: exact floor division, fee + net == amount
//! - Nonce density: IDs allocated strictly in sequence, one per acceptance
//! - Amount bounds and slippage acceptance regions
//! - Pool conservation: pool balance equals the sum of accepted additions

use bridge_core::{
    fees,
    types::{ChainId, TransferStatus, FEE_DENOMINATOR, PRICE_BASE},
    AccountId, Bridge, Config, Error, Storage,
};
use proptest::prelude::*;

/// Strategy for amounts within the default transfer bounds
fn valid_amount_strategy() -> impl Strategy<Value = u64> {
    100_000u64..=1_000_000_000_000u64
}

/// Strategy for fee rates within the protocol maximum
fn fee_rate_strategy() -> impl Strategy<Value = u64> {
    0u64..=1_000u64
}

/// Strategy for target chains
fn chain_strategy() -> impl Strategy<Value = ChainId> {
    prop_oneof![
        Just(ChainId::Ethereum),
        Just(ChainId::Bitcoin),
        Just(ChainId::Bsc),
        Just(ChainId::Polygon),
    ]
}

/// Storage with a temp dir, default parameters
fn test_storage() -> (Storage, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();
    (Storage::open(&config).unwrap(), temp_dir)
}

async fn create_test_bridge() -> (Bridge, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();
    (Bridge::open(config).await.unwrap(), temp_dir)
}

fn acct(s: &str) -> AccountId {
    AccountId::new(s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: fee is exact floor division and never exceeds the amount
    #[test]
    fn prop_fee_floor_division(amount in any::<u64>(), rate in fee_rate_strategy()) {
        let fee = fees::calculate_fee(amount, rate);
        let expected = (amount as u128) * (rate as u128) / (FEE_DENOMINATOR as u128);
        prop_assert_eq!(fee as u128, expected);
        prop_assert!(fee <= amount);
        prop_assert_eq!(fees::net_amount(amount, rate) as u128, amount as u128 - fee as u128);
    }

    /// Property: slippage acceptance region is exactly price <= base + tolerance
    #[test]
    fn prop_slippage_acceptance_region(
        price in 1u64..=2_000_000u64,
        tolerance in 0u64..=1_000_000u64,
    ) {
        let accepted = fees::check_slippage(price, tolerance).is_ok();
        prop_assert_eq!(accepted, price <= PRICE_BASE + tolerance);
    }

    /// Property: accepted initiations allocate a dense, strictly increasing
    /// ID sequence starting at the pre-call nonce
    #[test]
    fn prop_nonce_allocates_densely(
        amounts in prop::collection::vec(valid_amount_strategy(), 1..20),
        chain in chain_strategy(),
    ) {
        let (storage, _temp) = test_storage();

        for (i, amount) in amounts.iter().enumerate() {
            let before = storage.nonce().unwrap();
            let id = storage
                .initiate_transfer(&acct("alice"), &acct("bob"), *amount, chain, 0)
                .unwrap();
            prop_assert_eq!(id, before);
            prop_assert_eq!(id, i as u64);
            prop_assert_eq!(storage.nonce().unwrap(), before + 1);
            prop_assert!(storage.get_transfer(id).unwrap().is_some());
        }
    }

    /// Property: amount acceptance matches the configured bounds exactly
    #[test]
    fn prop_amount_bounds_acceptance(amount in 0u64..=2_000_000_000_000u64) {
        let (storage, _temp) = test_storage();

        let result = storage.initiate_transfer(
            &acct("alice"),
            &acct("bob"),
            amount,
            ChainId::Ethereum,
            0,
        );

        if (100_000..=1_000_000_000_000).contains(&amount) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(Error::InvalidAmount(_))));
            // Rejected initiation must not advance the nonce
            prop_assert_eq!(storage.nonce().unwrap(), 0);
        }
    }

    /// Property: pool balance equals the sum of accepted liquidity additions
    /// and free balance plus pool balance equals total deposits
    #[test]
    fn prop_pool_conservation(
        deposits in prop::collection::vec(1u64..1_000_000u64, 1..10),
        adds in prop::collection::vec(1u64..2_000_000u64, 1..10),
    ) {
        let (storage, _temp) = test_storage();
        let alice = acct("alice");

        let mut deposited = 0u64;
        for amount in &deposits {
            storage.deposit(&alice, *amount).unwrap();
            deposited += amount;
        }

        let mut accepted = 0u64;
        for amount in &adds {
            match storage.add_liquidity(&alice, *amount) {
                Ok(()) => accepted += amount,
                Err(Error::InsufficientBalance { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }

        prop_assert_eq!(storage.get_pool_balance(&alice).unwrap(), accepted);
        prop_assert_eq!(storage.get_total_supplied(&alice).unwrap(), accepted);
        prop_assert_eq!(
            storage.get_balance(&alice).unwrap() + accepted,
            deposited
        );
    }

    /// Property: completion credits the stored net amount exactly once,
    /// no matter how often it is resubmitted
    #[test]
    fn prop_completion_credits_once(
        amount in valid_amount_strategy(),
        rate in fee_rate_strategy(),
        resubmits in 1usize..5,
    ) {
        let (storage, _temp) = test_storage();
        let bob = acct("bob");

        storage.update_fee_rate(rate).unwrap();
        let id = storage
            .initiate_transfer(&acct("alice"), &bob, amount, ChainId::Polygon, 0)
            .unwrap();
        let net = fees::net_amount(amount, rate);

        for _ in 0..resubmits {
            storage.complete_transfer(id).unwrap();
        }

        prop_assert_eq!(storage.get_balance(&bob).unwrap(), net);
        let record = storage.get_transfer(id).unwrap().unwrap();
        prop_assert_eq!(record.status, TransferStatus::Completed);
        prop_assert_eq!(record.amount, net);
    }
}

mod integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_end_to_end_liquidity_flow() {
        let (bridge, _temp) = create_test_bridge().await;
        let alice = acct("alice");

        // Balance 0 < amount: rejected with zero mutation
        let err = bridge.add_liquidity(&alice, 50_000).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientBalance {
                available: 0,
                required: 50_000
            }
        ));

        bridge.deposit(&alice, 60_000).await.unwrap();
        bridge.add_liquidity(&alice, 50_000).await.unwrap();

        assert_eq!(bridge.get_pool_balance(&alice).unwrap(), 50_000);
        assert_eq!(bridge.get_balance(&alice).unwrap(), 10_000);

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_transfer_boundary_amounts() {
        let (bridge, _temp) = create_test_bridge().await;
        let alice = acct("alice");
        let bob = acct("bob");

        // Exactly min and exactly max are accepted
        bridge
            .initiate_transfer(&alice, &bob, 100_000, ChainId::Ethereum, 0)
            .await
            .unwrap();
        bridge
            .initiate_transfer(&alice, &bob, 1_000_000_000_000, ChainId::Ethereum, 0)
            .await
            .unwrap();

        // One below min, one above max are rejected
        assert!(matches!(
            bridge
                .initiate_transfer(&alice, &bob, 99_999, ChainId::Ethereum, 0)
                .await
                .unwrap_err(),
            Error::InvalidAmount(99_999)
        ));
        assert!(matches!(
            bridge
                .initiate_transfer(&alice, &bob, 1_000_000_000_001, ChainId::Ethereum, 0)
                .await
                .unwrap_err(),
            Error::InvalidAmount(_)
        ));

        assert_eq!(bridge.nonce().unwrap(), 2);

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_slippage_boundary() {
        let (bridge, _temp) = create_test_bridge().await;
        let owner = bridge.config().owner.clone();

        // Price exactly at the base with zero tolerance is accepted
        bridge
            .initiate_transfer(&acct("alice"), &acct("bob"), 100_000, ChainId::Bsc, 0)
            .await
            .unwrap();

        // One above the base with zero tolerance is rejected
        bridge.update_oracle_price(&owner, 1_000_001).await.unwrap();
        let err = bridge
            .initiate_transfer(&acct("alice"), &acct("bob"), 100_000, ChainId::Bsc, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SlippageExceeded { .. }));

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_unknown_transfer_mutates_nothing() {
        let (bridge, _temp) = create_test_bridge().await;
        let owner = bridge.config().owner.clone();

        let err = bridge.complete_transfer(&owner, 42).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransferId(42)));
        assert_eq!(bridge.get_balance(&acct("bob")).unwrap(), 0);
        assert!(bridge.get_transfer(42).unwrap().is_none());

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_recipient_eligibility_rechecked_at_completion() {
        let (bridge, _temp) = create_test_bridge().await;
        let config = bridge.config().clone();

        // Administrative identities are never valid recipients
        for admin in [&config.owner, &config.bridge_account] {
            let err = bridge
                .initiate_transfer(&acct("alice"), admin, 100_000, ChainId::Ethereum, 0)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidRecipient(_)));
        }

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        let owner = config.owner.clone();

        let transfer_id = {
            let bridge = Bridge::open(config.clone()).await.unwrap();
            bridge.deposit(&acct("alice"), 500_000).await.unwrap();
            bridge.add_liquidity(&acct("alice"), 200_000).await.unwrap();
            let id = bridge
                .initiate_transfer(&acct("alice"), &acct("bob"), 100_000, ChainId::Bitcoin, 0)
                .await
                .unwrap();
            bridge.update_fee_rate(&owner, 500).await.unwrap();
            bridge.shutdown().await.unwrap();
            id
        };

        let bridge = Bridge::open(config).await.unwrap();

        assert_eq!(bridge.get_balance(&acct("alice")).unwrap(), 300_000);
        assert_eq!(bridge.get_pool_balance(&acct("alice")).unwrap(), 200_000);
        assert_eq!(bridge.fee_rate_bps().unwrap(), 500);
        assert_eq!(bridge.nonce().unwrap(), 1);

        // The pending transfer is still completable after restart
        bridge.complete_transfer(&owner, transfer_id).await.unwrap();
        assert_eq!(bridge.get_balance(&acct("bob")).unwrap(), 99_750);

        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_never_reverts() {
        let (bridge, _temp) = create_test_bridge().await;
        let owner = bridge.config().owner.clone();

        let id = bridge
            .initiate_transfer(&acct("alice"), &acct("bob"), 100_000, ChainId::Ethereum, 0)
            .await
            .unwrap();
        bridge.complete_transfer(&owner, id).await.unwrap();

        // Resubmission neither reverts the status nor credits again
        bridge.complete_transfer(&owner, id).await.unwrap();
        let record = bridge.get_transfer(id).unwrap().unwrap();
        assert_eq!(record.status, TransferStatus::Completed);
        assert_eq!(bridge.get_balance(&acct("bob")).unwrap(), 99_750);

        bridge.shutdown().await.unwrap();
    }
}
