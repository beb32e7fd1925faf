//! Best-effort on-chain inspection for troubleshooting quotes.
//!
//! Every probe appends a line whether it succeeds or not; nothing here fails
//! outward. Lines carry no timestamps, so unchanged chain state yields an
//! identical report.

use crate::config::{AppConfig, ContractAddresses};
use crate::dex::ChainReader;
use crate::errors::AppError;
use crate::models::DiagnosticReport;
use crate::utils::{NATIVE_DECIMALS, code_prefix, parse_amount, to_decimal, to_hex, to_plain_string};
use ethers::types::{Address, U256};
use tracing::{debug, info};

pub struct DiagnosticsCollector<'a> {
    contracts: &'a ContractAddresses,
    token_decimals: u8,
}

impl<'a> DiagnosticsCollector<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self::with_parts(&config.contracts, config.token_decimals)
    }

    pub fn with_parts(contracts: &'a ContractAddresses, token_decimals: u8) -> Self {
        Self {
            contracts,
            token_decimals,
        }
    }

    /// Run every probe in order through `reader` (normally the public RPC).
    pub async fn run(&self, amount_in: &str, reader: &dyn ChainReader) -> DiagnosticReport {
        let mut report = DiagnosticReport::new();
        let amount = self.amount_or_default(amount_in, &mut report);

        self.probe_router(reader, amount, &mut report).await;
        self.probe_quote(reader, amount, &mut report).await;
        self.probe_pair(reader, &mut report).await;
        self.probe_token(reader, &mut report).await;
        self.probe_code(reader, &mut report).await;

        info!(lines = report.len(), source = reader.label(), "[DIAG] diagnostics complete");
        report
    }

    fn amount_or_default(&self, amount_in: &str, report: &mut DiagnosticReport) -> U256 {
        let raw = if amount_in.trim().is_empty() { "1" } else { amount_in };
        match parse_amount(raw, NATIVE_DECIMALS) {
            Ok(v) => v,
            Err(e) => {
                report.push(format!("Amount {raw:?} unusable ({e}); probing with 1"));
                U256::exp10(usize::from(NATIVE_DECIMALS))
            }
        }
    }

    async fn probe_router(&self, reader: &dyn ChainReader, amount: U256, report: &mut DiagnosticReport) {
        let router = match reader.router_of(self.contracts.swap_contract).await {
            Ok(router) => router,
            Err(e) => {
                report.push(format!("Reading router from contract failed: {e}"));
                return;
            }
        };
        report.push(format!("Router address (from contract): {router:?}"));

        let weth = match self.probe_factory(reader, router, report).await {
            Ok(weth) => weth,
            Err(e) => {
                report.push(format!("router calls failed: {e}"));
                return;
            }
        };

        let path = vec![weth, self.contracts.liquidity_token];
        match reader.amounts_out(router, amount, path).await {
            Ok(amounts) => {
                // First element is the native input, the rest are TP amounts.
                let rendered: Vec<String> = amounts
                    .iter()
                    .enumerate()
                    .map(|(i, a)| {
                        let decimals = if i == 0 { NATIVE_DECIMALS } else { self.token_decimals };
                        to_plain_string(&to_decimal(*a, decimals))
                    })
                    .collect();
                report.push(format!("router.getAmountsOut success: {}", rendered.join(" / ")));
            }
            Err(e) => {
                report.push(format!("router.getAmountsOut failed: {e}"));
                push_revert_data(report, "getAmountsOut error data", &e);
            }
        }
    }

    /// Reads WETH and factory from the router, then checks the factory's pair
    /// against the configured one. Returns the wrapped-native address.
    async fn probe_factory(
        &self,
        reader: &dyn ChainReader,
        router: Address,
        report: &mut DiagnosticReport,
    ) -> crate::errors::Result<Address> {
        let weth = reader.router_weth(router).await?;
        report.push(format!("router.WETH(): {weth:?}"));
        let factory = reader.router_factory(router).await?;
        report.push(format!("router.factory(): {factory:?}"));
        let pair = reader
            .factory_pair(factory, weth, self.contracts.liquidity_token)
            .await?;
        let expected = self.contracts.liquidity_pair;
        let verdict = if pair == expected { "matches" } else { "MISMATCH" };
        report.push(format!(
            "factory.getPair(weth, TP_TOKEN): {pair:?} (expected {expected:?}, {verdict})"
        ));
        Ok(weth)
    }

    async fn probe_quote(&self, reader: &dyn ChainReader, amount: U256, report: &mut DiagnosticReport) {
        match reader
            .quote_tp_for_native(self.contracts.swap_contract, amount)
            .await
        {
            Ok(raw) => report.push(format!(
                "Public RPC quote: {}",
                to_plain_string(&to_decimal(raw, self.token_decimals))
            )),
            Err(e) => {
                report.push(format!("Public RPC quote failed: {e}"));
                push_revert_data(report, "Error data", &e);
            }
        }
    }

    async fn probe_pair(&self, reader: &dyn ChainReader, report: &mut DiagnosticReport) {
        let pair = self.contracts.liquidity_pair;
        let res = async {
            let (token0, token1) = reader.pair_tokens(pair).await?;
            report.push(format!("Pair tokens: token0={token0:?} token1={token1:?}"));
            let state = reader.pair_reserves(pair).await?;
            report.push(format!(
                "Pair reserves raw: {} / {}",
                state.reserve0, state.reserve1
            ));
            Ok::<_, AppError>(())
        }
        .await;
        if let Err(e) = res {
            report.push(format!("Pair read failed: {e}"));
        }
    }

    async fn probe_token(&self, reader: &dyn ChainReader, report: &mut DiagnosticReport) {
        match reader.token_metadata(self.contracts.liquidity_token).await {
            Ok(meta) => report.push(format!(
                "TP token: symbol={} decimals={}",
                meta.symbol, meta.decimals
            )),
            Err(e) => report.push(format!("TP token metadata failed: {e}")),
        }
    }

    async fn probe_code(&self, reader: &dyn ChainReader, report: &mut DiagnosticReport) {
        match reader.code_at(self.contracts.swap_contract).await {
            Ok(code) => {
                report.push(format!("Contract code length: {} bytes", code.len()));
                report.push(format!("Contract code prefix: {}", code_prefix(&code)));
            }
            Err(e) => report.push(format!("getCode failed: {e}")),
        }
        match reader.code_at(self.contracts.liquidity_pair).await {
            Ok(code) => {
                report.push(format!("Pair code length: {} bytes", code.len()));
                report.push(format!("Pair code prefix: {}", code_prefix(&code)));
            }
            Err(e) => report.push(format!("getCode(pair) failed: {e}")),
        }
    }
}

fn push_revert_data(report: &mut DiagnosticReport, label: &str, err: &AppError) {
    if let Some(data) = err.revert_data() {
        debug!(data = %to_hex(data), "[DIAG] revert payload");
        report.push(format!("{label}: {}", to_hex(data)));
    }
}
