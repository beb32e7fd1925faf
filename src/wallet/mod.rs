//! Wallet session state and the wallet provider capability.
//!
//! The connector itself is external; this crate only needs to request
//! accounts, read the chain id, send a prepared transaction, ask for a network
//! switch and wait on a receipt.

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, TxHash, transaction::eip2718::TypedTransaction};
use serde::Serialize;
use tracing::{info, warn};

pub mod local;
#[cfg(test)]
pub mod mock;

pub use local::LocalWalletProvider;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    async fn chain_id(&self) -> Result<u64>;

    /// Sign and broadcast; returns as soon as the node accepted the transaction.
    async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash>;

    /// Ask the wallet to move to `chain_id`. May be rejected.
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;

    /// Wait until the transaction is mined. `None` if it was dropped.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>>;
}

/// Connection, account and network as last reported by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSession {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub connected: bool,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub async fn connect(wallet: &dyn WalletProvider) -> Result<Self> {
        let accounts = wallet.request_accounts().await?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| AppError::Wallet("wallet returned no accounts".into()))?;
        let chain_id = wallet.chain_id().await?;
        info!(?address, chain_id, "[WALLET] connected");
        Ok(Self {
            address: Some(address),
            chain_id: Some(chain_id),
            connected: true,
        })
    }

    pub fn chain_ok(&self, expected_chain_id: u64) -> bool {
        self.connected && self.chain_id == Some(expected_chain_id)
    }

    /// Request a switch to `expected_chain_id` when on another network, then
    /// refresh the stored chain id. A rejected switch leaves the session as is.
    pub async fn ensure_network(
        &mut self,
        wallet: &dyn WalletProvider,
        expected_chain_id: u64,
    ) -> Result<()> {
        if !self.connected {
            return Err(AppError::Wallet("wallet not connected".into()));
        }
        if self.chain_ok(expected_chain_id) {
            return Ok(());
        }
        warn!(
            current = ?self.chain_id,
            expected_chain_id,
            "[WALLET] wrong network; requesting switch"
        );
        wallet
            .switch_chain(expected_chain_id)
            .await
            .map_err(|e| AppError::Wallet(format!("Switch failed: {e}")))?;
        self.chain_id = Some(wallet.chain_id().await?);
        info!(chain_id = ?self.chain_id, "[WALLET] network switch requested");
        Ok(())
    }
}
