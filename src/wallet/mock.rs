//! Scripted `WalletProvider` for tests.

use super::WalletProvider;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use ethers::types::{
    Address, TransactionReceipt, TxHash, U64, transaction::eip2718::TypedTransaction,
};
use std::sync::Mutex;

pub struct MockWallet {
    pub address: Address,
    pub accounts: Vec<Address>,
    pub reject_switch: bool,
    pub reject_send: bool,
    chain_id: Mutex<u64>,
    sent: Mutex<Vec<TypedTransaction>>,
    switches: Mutex<Vec<u64>>,
}

impl MockWallet {
    pub fn new(chain_id: u64) -> Self {
        let address = Address::from_low_u64_be(0xbeef);
        Self {
            address,
            accounts: vec![address],
            reject_switch: false,
            reject_send: false,
            chain_id: Mutex::new(chain_id),
            sent: Mutex::new(Vec::new()),
            switches: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<TypedTransaction> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.switches.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(*self.chain_id.lock().unwrap_or_else(|e| e.into_inner()))
    }

    async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash> {
        if self.reject_send {
            return Err(AppError::Wallet("user rejected transaction".into()));
        }
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.push(tx);
        Ok(TxHash::from_low_u64_be(sent.len() as u64))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        self.switches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(chain_id);
        if self.reject_switch {
            return Err(AppError::Wallet("user rejected the request".into()));
        }
        *self.chain_id.lock().unwrap_or_else(|e| e.into_inner()) = chain_id;
        Ok(())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        Ok(Some(TransactionReceipt {
            transaction_hash: tx_hash,
            status: Some(U64::from(1)),
            ..TransactionReceipt::default()
        }))
    }
}
