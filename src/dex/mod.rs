//! On-chain read access to the swap contract, its TP token and the
//! UniswapV2-style pair/router/factory behind it.

use crate::errors::Result;
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod state;

pub use client::{PublicRpcClient, ReadClient};
pub use state::PairState;

/// ERC20 metadata used for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub decimals: u8,
    pub symbol: String,
}

/// Typed read calls against one connection (wallet-provided or public RPC).
///
/// Every method is a single read; implementations convert transport and
/// revert failures into [`crate::errors::AppError`] and never retry.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Short name used in log lines ("wallet", "public-rpc").
    fn label(&self) -> &str;

    async fn chain_id(&self) -> Result<u64>;

    /// Deployed bytecode at `address`; empty when nothing is deployed.
    async fn code_at(&self, address: Address) -> Result<Bytes>;

    /// `quoteTPForCRO(amountIn)` on the swap contract.
    async fn quote_tp_for_native(&self, contract: Address, amount_in: U256) -> Result<U256>;

    /// `getReserves()` on the pair, timestamp dropped.
    async fn pair_reserves(&self, pair: Address) -> Result<PairState>;

    /// `token0()` and `token1()` on the pair.
    async fn pair_tokens(&self, pair: Address) -> Result<(Address, Address)>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    async fn native_balance(&self, owner: Address) -> Result<U256>;

    async fn token_metadata(&self, token: Address) -> Result<TokenMetadata>;

    /// `router()` configured on the swap contract.
    async fn router_of(&self, contract: Address) -> Result<Address>;

    async fn router_weth(&self, router: Address) -> Result<Address>;

    async fn router_factory(&self, router: Address) -> Result<Address>;

    async fn factory_pair(&self, factory: Address, token_a: Address, token_b: Address)
    -> Result<Address>;

    async fn amounts_out(&self, router: Address, amount_in: U256, path: Vec<Address>)
    -> Result<Vec<U256>>;
}
