use super::WalletProvider;
use crate::dex::{ChainReader, ReadClient};
use crate::errors::{AppError, Result};
use crate::utils::with_timeout;
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionReceipt, TxHash, transaction::eip2718::TypedTransaction},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Wallet backed by a local private key and an HTTP node.
pub struct LocalWalletProvider {
    client: Arc<SignerClient>,
    reader: ReadClient<SignerClient>,
}

impl LocalWalletProvider {
    /// Build the signer. The key is bound to the chain id the node reports so
    /// signing works even before a network switch.
    pub async fn connect(rpc_url: &str, private_key: &str, timeout: Duration) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let chain_id = with_timeout(timeout, async {
            provider.get_chainid().await.map_err(AppError::from)
        })
        .await?;
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id.as_u64());
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let reader = ReadClient::new(client.clone(), "wallet", timeout);
        Ok(Self { client, reader })
    }

    /// Read access through the wallet's own connection.
    pub fn reader(&self) -> &ReadClient<SignerClient> {
        &self.reader
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.client.address()])
    }

    async fn chain_id(&self) -> Result<u64> {
        self.reader.chain_id().await
    }

    async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash> {
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| AppError::Wallet(e.to_string()))?;
        Ok(pending.tx_hash())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let params = [json!({ "chainId": format!("0x{chain_id:x}") })];
        self.client
            .provider()
            .request::<_, serde_json::Value>("wallet_switchEthereumChain", params)
            .await?;
        Ok(())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider()).await?;
        Ok(receipt)
    }
}
