//! Scripted `ChainReader` for tests. `None` fields fail the matching call.

use super::{ChainReader, PairState, TokenMetadata};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use std::sync::Mutex;

pub fn revert() -> AppError {
    AppError::Call {
        message: "execution reverted".into(),
        revert_data: Some(Bytes::from(vec![0x08, 0xc3, 0x79, 0xa0])),
    }
}

#[derive(Default)]
pub struct MockReader {
    pub label: &'static str,
    pub chain_id: Option<u64>,
    pub code: Option<Bytes>,
    pub quote: Option<U256>,
    pub reserves: Option<PairState>,
    pub pair_tokens: Option<(Address, Address)>,
    pub token_balance: Option<U256>,
    pub native_balance: Option<U256>,
    pub metadata: Option<TokenMetadata>,
    pub router: Option<Address>,
    pub weth: Option<Address>,
    pub factory: Option<Address>,
    pub factory_pair: Option<Address>,
    pub amounts_out: Option<Vec<U256>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockReader {
    /// Healthy connection: deployed contract, matching chain, liquid pair.
    pub fn healthy(label: &'static str, chain_id: u64) -> Self {
        Self {
            label,
            chain_id: Some(chain_id),
            code: Some(Bytes::from(vec![0x60, 0x80, 0x60, 0x40, 0x52])),
            quote: Some(U256::exp10(18) * 100),
            reserves: Some(PairState::new(5_000, 7_000)),
            ..Self::default()
        }
    }

    pub fn calls(&self, name: &str) -> usize {
        self.record_lock().iter().filter(|c| **c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.record_lock().len()
    }

    fn record_lock(&self) -> std::sync::MutexGuard<'_, Vec<&'static str>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record<T: Clone>(&self, name: &'static str, value: &Option<T>) -> Result<T> {
        self.record_lock().push(name);
        value.clone().ok_or_else(revert)
    }
}

#[async_trait]
impl ChainReader for MockReader {
    fn label(&self) -> &str {
        self.label
    }

    async fn chain_id(&self) -> Result<u64> {
        self.record("chain_id", &self.chain_id)
    }

    async fn code_at(&self, _address: Address) -> Result<Bytes> {
        self.record("code_at", &self.code)
    }

    async fn quote_tp_for_native(&self, _contract: Address, _amount_in: U256) -> Result<U256> {
        self.record("quote", &self.quote)
    }

    async fn pair_reserves(&self, _pair: Address) -> Result<PairState> {
        self.record("pair_reserves", &self.reserves)
    }

    async fn pair_tokens(&self, _pair: Address) -> Result<(Address, Address)> {
        self.record("pair_tokens", &self.pair_tokens)
    }

    async fn token_balance(&self, _token: Address, _owner: Address) -> Result<U256> {
        self.record("token_balance", &self.token_balance)
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256> {
        self.record("native_balance", &self.native_balance)
    }

    async fn token_metadata(&self, _token: Address) -> Result<TokenMetadata> {
        self.record("token_metadata", &self.metadata)
    }

    async fn router_of(&self, _contract: Address) -> Result<Address> {
        self.record("router_of", &self.router)
    }

    async fn router_weth(&self, _router: Address) -> Result<Address> {
        self.record("router_weth", &self.weth)
    }

    async fn router_factory(&self, _router: Address) -> Result<Address> {
        self.record("router_factory", &self.factory)
    }

    async fn factory_pair(
        &self,
        _factory: Address,
        _token_a: Address,
        _token_b: Address,
    ) -> Result<Address> {
        self.record("factory_pair", &self.factory_pair)
    }

    async fn amounts_out(
        &self,
        _router: Address,
        _amount_in: U256,
        _path: Vec<Address>,
    ) -> Result<Vec<U256>> {
        self.record("amounts_out", &self.amounts_out)
    }
}
