//! Actor-based concurrency for the bridge ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One logical writer task processes mutations strictly in sequence
//! - Each operation is one indivisible read-validate-commit unit
//! - Async message passing with backpressure (bounded mailbox)
//!
//! Reads bypass the actor and hit storage directly; mutations must flow
//! through the mailbox so no two operations ever interleave between their
//! validation reads and their commit.

use crate::metrics::Metrics;
use crate::types::{AccountId, ChainId};
use crate::{Error, Result, Storage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the bridge actor
pub enum BridgeMessage {
    /// Credit an account's free balance (token-layer funding)
    Deposit {
        account: AccountId,
        amount: u64,
        response: oneshot::Sender<Result<()>>,
    },

    /// Move free balance into the caller's liquidity pool
    AddLiquidity {
        account: AccountId,
        amount: u64,
        response: oneshot::Sender<Result<()>>,
    },

    /// Record a pending cross-chain transfer
    InitiateTransfer {
        sender: AccountId,
        recipient: AccountId,
        amount: u64,
        target_chain: ChainId,
        max_slippage: u64,
        response: oneshot::Sender<Result<u64>>,
    },

    /// Complete a pending transfer and credit the recipient
    CompleteTransfer {
        transfer_id: u64,
        response: oneshot::Sender<Result<()>>,
    },

    /// Set or clear the pause flag
    SetPaused {
        paused: bool,
        response: oneshot::Sender<Result<()>>,
    },

    /// Replace the fee rate
    UpdateFeeRate {
        rate_bps: u64,
        response: oneshot::Sender<Result<()>>,
    },

    /// Replace the oracle price
    UpdateOraclePrice {
        price: u64,
        response: oneshot::Sender<Result<()>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes bridge mutations sequentially
pub struct BridgeActor {
    /// Storage backend
    storage: Arc<Storage>,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<BridgeMessage>,

    /// Metrics collector
    metrics: Metrics,
}

impl BridgeActor {
    /// Create new actor
    pub fn new(
        storage: Arc<Storage>,
        mailbox: mpsc::Receiver<BridgeMessage>,
        metrics: Metrics,
    ) -> Self {
        Self {
            storage,
            mailbox,
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                BridgeMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }
        tracing::info!("Bridge actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: BridgeMessage) {
        let timer = self.metrics.operation_duration.start_timer();

        match msg {
            BridgeMessage::Deposit {
                account,
                amount,
                response,
            } => {
                let result = self.storage.deposit(&account, amount);
                self.record(&result, |m| m.deposits_total.inc());
                let _ = response.send(result);
            }

            BridgeMessage::AddLiquidity {
                account,
                amount,
                response,
            } => {
                let result = self.storage.add_liquidity(&account, amount);
                self.record(&result, |m| m.liquidity_adds_total.inc());
                let _ = response.send(result);
            }

            BridgeMessage::InitiateTransfer {
                sender,
                recipient,
                amount,
                target_chain,
                max_slippage,
                response,
            } => {
                let result = self.storage.initiate_transfer(
                    &sender,
                    &recipient,
                    amount,
                    target_chain,
                    max_slippage,
                );
                self.record(&result, |m| m.transfers_initiated_total.inc());
                let _ = response.send(result);
            }

            BridgeMessage::CompleteTransfer {
                transfer_id,
                response,
            } => {
                let result = self.storage.complete_transfer(transfer_id);
                self.record(&result, |m| m.transfers_completed_total.inc());
                let _ = response.send(result);
            }

            BridgeMessage::SetPaused { paused, response } => {
                let result = self.storage.set_paused(paused);
                if result.is_ok() {
                    self.metrics.paused.set(paused as i64);
                }
                let _ = response.send(result);
            }

            BridgeMessage::UpdateFeeRate { rate_bps, response } => {
                let result = self.storage.update_fee_rate(rate_bps);
                self.record(&result, |_| {});
                let _ = response.send(result);
            }

            BridgeMessage::UpdateOraclePrice { price, response } => {
                let result = self.storage.update_oracle_price(price);
                self.record(&result, |_| {});
                let _ = response.send(result);
            }

            BridgeMessage::Shutdown => {
                // Handled in main loop
            }
        }

        timer.observe_duration();
    }

    fn record<T>(&self, result: &Result<T>, on_ok: impl FnOnce(&Metrics)) {
        match result {
            Ok(_) => on_ok(&self.metrics),
            Err(e) => {
                self.metrics.operations_rejected_total.inc();
                tracing::debug!(error = %e, "Operation rejected");
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct BridgeHandle {
    sender: mpsc::Sender<BridgeMessage>,
}

impl BridgeHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<BridgeMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> BridgeMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Credit an account's free balance
    pub async fn deposit(&self, account: AccountId, amount: u64) -> Result<()> {
        self.request(|response| BridgeMessage::Deposit {
            account,
            amount,
            response,
        })
        .await
    }

    /// Move free balance into the liquidity pool
    pub async fn add_liquidity(&self, account: AccountId, amount: u64) -> Result<()> {
        self.request(|response| BridgeMessage::AddLiquidity {
            account,
            amount,
            response,
        })
        .await
    }

    /// Record a pending transfer, returning the allocated ID
    pub async fn initiate_transfer(
        &self,
        sender: AccountId,
        recipient: AccountId,
        amount: u64,
        target_chain: ChainId,
        max_slippage: u64,
    ) -> Result<u64> {
        self.request(|response| BridgeMessage::InitiateTransfer {
            sender,
            recipient,
            amount,
            target_chain,
            max_slippage,
            response,
        })
        .await
    }

    /// Complete a pending transfer
    pub async fn complete_transfer(&self, transfer_id: u64) -> Result<()> {
        self.request(|response| BridgeMessage::CompleteTransfer {
            transfer_id,
            response,
        })
        .await
    }

    /// Set or clear the pause flag
    pub async fn set_paused(&self, paused: bool) -> Result<()> {
        self.request(|response| BridgeMessage::SetPaused { paused, response })
            .await
    }

    /// Replace the fee rate
    pub async fn update_fee_rate(&self, rate_bps: u64) -> Result<()> {
        self.request(|response| BridgeMessage::UpdateFeeRate { rate_bps, response })
            .await
    }

    /// Replace the oracle price
    pub async fn update_oracle_price(&self, price: u64) -> Result<()> {
        self.request(|response| BridgeMessage::UpdateOraclePrice { price, response })
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(BridgeMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the bridge actor
pub fn spawn_bridge_actor(storage: Arc<Storage>, metrics: Metrics) -> BridgeHandle {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let actor = BridgeActor::new(storage, rx, metrics);

    tokio::spawn(async move {
        actor.run().await;
    });

    BridgeHandle::new(tx)
}
