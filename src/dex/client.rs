use super::{ChainReader, PairState, TokenMetadata};
use crate::errors::{AppError, Result};
use crate::utils::with_timeout;
use async_trait::async_trait;
use ethers::{
    contract::{ContractError, abigen},
    providers::{Http, Middleware, Provider, ProviderError},
    types::{Address, Bytes, U256},
};
use std::sync::Arc;
use std::time::Duration;

abigen!(
    Freequidity,
    r"[
        function quoteTPForCRO(uint256 amountIn) view returns (uint256)
        function router() view returns (address)
    ]",
);

abigen!(
    Erc20Token,
    r"[
        function balanceOf(address owner) view returns (uint256)
        function decimals() view returns (uint8)
        function symbol() view returns (string)
    ]",
);

abigen!(
    LiquidityPair,
    r"[
        function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        function token0() view returns (address)
        function token1() view returns (address)
    ]",
);

abigen!(
    SwapRouter,
    r"[
        function WETH() view returns (address)
        function factory() view returns (address)
        function getAmountsOut(uint256 amountIn, address[] path) view returns (uint256[])
    ]",
);

abigen!(
    PairFactory,
    r"[
        function getPair(address tokenA, address tokenB) view returns (address)
    ]",
);

/// Read-only connection to the public RPC endpoint.
pub type PublicRpcClient = ReadClient<Provider<Http>>;

/// Read handle over a single connection. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct ReadClient<M> {
    client: Arc<M>,
    label: String,
    timeout: Duration,
}

impl PublicRpcClient {
    /// Read-only connection to a public RPC endpoint. No request is sent until
    /// the first call.
    pub fn connect(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let provider = Arc::new(Provider::<Http>::try_from(rpc_url)?);
        Ok(Self::new(provider, "public-rpc", timeout))
    }
}

impl<M: Middleware + 'static> ReadClient<M> {
    pub fn new(client: Arc<M>, label: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            label: label.into(),
            timeout,
        }
    }

    pub fn client(&self) -> Arc<M> {
        self.client.clone()
    }
}

/// Keep the revert payload so diagnostics can show it.
fn call_error<M: Middleware>(err: ContractError<M>) -> AppError {
    AppError::Call {
        revert_data: err.as_revert().cloned(),
        message: err.to_string(),
    }
}

fn middleware_error<E: std::error::Error>(err: E) -> AppError {
    AppError::Provider(ProviderError::CustomError(err.to_string()))
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for ReadClient<M> {
    fn label(&self) -> &str {
        &self.label
    }

    async fn chain_id(&self) -> Result<u64> {
        with_timeout(self.timeout, async {
            let id = self.client.get_chainid().await.map_err(middleware_error)?;
            Ok(id.as_u64())
        })
        .await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        with_timeout(self.timeout, async {
            self.client
                .get_code(address, None)
                .await
                .map_err(middleware_error)
        })
        .await
    }

    async fn quote_tp_for_native(&self, contract: Address, amount_in: U256) -> Result<U256> {
        let swap = Freequidity::new(contract, self.client.clone());
        with_timeout(self.timeout, async {
            swap.quote_tp_for_cro(amount_in).call().await.map_err(call_error)
        })
        .await
    }

    async fn pair_reserves(&self, pair: Address) -> Result<PairState> {
        let pair = LiquidityPair::new(pair, self.client.clone());
        with_timeout(self.timeout, async {
            let (reserve0, reserve1, _block_timestamp_last) =
                pair.get_reserves().call().await.map_err(call_error)?;
            Ok(PairState::new(reserve0, reserve1))
        })
        .await
    }

    async fn pair_tokens(&self, pair: Address) -> Result<(Address, Address)> {
        let pair = LiquidityPair::new(pair, self.client.clone());
        with_timeout(self.timeout, async {
            let token0 = pair.token_0().call().await.map_err(call_error)?;
            let token1 = pair.token_1().call().await.map_err(call_error)?;
            Ok((token0, token1))
        })
        .await
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let token = Erc20Token::new(token, self.client.clone());
        with_timeout(self.timeout, async {
            token.balance_of(owner).call().await.map_err(call_error)
        })
        .await
    }

    async fn native_balance(&self, owner: Address) -> Result<U256> {
        with_timeout(self.timeout, async {
            self.client
                .get_balance(owner, None)
                .await
                .map_err(middleware_error)
        })
        .await
    }

    async fn token_metadata(&self, token: Address) -> Result<TokenMetadata> {
        let token = Erc20Token::new(token, self.client.clone());
        with_timeout(self.timeout, async {
            let decimals = token.decimals().call().await.map_err(call_error)?;
            let symbol = token.symbol().call().await.map_err(call_error)?;
            Ok(TokenMetadata { decimals, symbol })
        })
        .await
    }

    async fn router_of(&self, contract: Address) -> Result<Address> {
        let swap = Freequidity::new(contract, self.client.clone());
        with_timeout(self.timeout, async {
            swap.router().call().await.map_err(call_error)
        })
        .await
    }

    async fn router_weth(&self, router: Address) -> Result<Address> {
        let router = SwapRouter::new(router, self.client.clone());
        with_timeout(self.timeout, async {
            router.weth().call().await.map_err(call_error)
        })
        .await
    }

    async fn router_factory(&self, router: Address) -> Result<Address> {
        let router = SwapRouter::new(router, self.client.clone());
        with_timeout(self.timeout, async {
            router.factory().call().await.map_err(call_error)
        })
        .await
    }

    async fn factory_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address> {
        let factory = PairFactory::new(factory, self.client.clone());
        with_timeout(self.timeout, async {
            factory
                .get_pair(token_a, token_b)
                .call()
                .await
                .map_err(call_error)
        })
        .await
    }

    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>> {
        let router = SwapRouter::new(router, self.client.clone());
        with_timeout(self.timeout, async {
            router
                .get_amounts_out(amount_in, path)
                .call()
                .await
                .map_err(call_error)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{Token, encode};
    use ethers::providers::{JsonRpcError, MockProvider, MockResponse};
    use serde_json::json;

    fn mocked() -> (ReadClient<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        (ReadClient::new(Arc::new(provider), "mocked", Duration::from_secs(1)), mock)
    }

    fn revert_response(data: &str) -> MockResponse {
        MockResponse::Error(JsonRpcError {
            code: 3,
            message: "execution reverted".into(),
            data: Some(json!(data)),
        })
    }

    #[test]
    fn connect_rejects_malformed_url() {
        assert!(matches!(
            PublicRpcClient::connect("not a url", Duration::from_secs(1)),
            Err(AppError::UrlParse(_))
        ));
    }

    #[test]
    fn connect_is_lazy_and_labelled() {
        let client = PublicRpcClient::connect("http://127.0.0.1:1", Duration::from_secs(1))
            .expect("valid url should build a provider");
        assert_eq!(client.label(), "public-rpc");
    }

    #[tokio::test]
    async fn reverted_call_keeps_revert_payload() {
        let (client, mock) = mocked();
        mock.push_response(revert_response("0x08c379a0"));

        let err = client
            .quote_tp_for_native(Address::zero(), U256::exp10(18))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Call { .. }));
        assert_eq!(
            err.revert_data(),
            Some(&Bytes::from(vec![0x08, 0xc3, 0x79, 0xa0]))
        );
    }

    #[tokio::test]
    async fn quote_decodes_uint_result() {
        let (client, mock) = mocked();
        let raw = U256::exp10(18) * U256::from(100);
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(raw)])))
            .unwrap();

        let quote = client
            .quote_tp_for_native(Address::zero(), U256::exp10(18))
            .await
            .unwrap();
        assert_eq!(quote, raw);
    }

    #[tokio::test]
    async fn reserves_drop_the_timestamp() {
        let (client, mock) = mocked();
        let encoded = encode(&[
            Token::Uint(U256::from(5_000u64)),
            Token::Uint(U256::from(7_000u64)),
            Token::Uint(U256::from(1_700_000_000u64)),
        ]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        let state = client.pair_reserves(Address::zero()).await.unwrap();
        assert_eq!(state, PairState::new(5_000, 7_000));
    }

    #[tokio::test]
    async fn empty_code_is_returned_as_is() {
        let (client, mock) = mocked();
        mock.push::<Bytes, _>(Bytes::default()).unwrap();

        let code = client.code_at(Address::zero()).await.unwrap();
        assert!(code.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_provider_error() {
        let (client, _mock) = mocked();
        let err = client.code_at(Address::zero()).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
        assert!(err.revert_data().is_none());
    }
}
