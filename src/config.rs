//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use ethers::types::Address;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_CONTRACT: &str = "0xfdfcdec2fa7164adc587ffd3e7603afca6f982fe";
const DEFAULT_TP_TOKEN: &str = "0x421465f546763c5114Dff5beC0ff953b3d51D0B2";
const DEFAULT_LIQUIDITY_PAIR: &str = "0x4A1c18A37706AC24f8183C1F83b7F672B59CE6c7";
const DEFAULT_CHAIN_ID: u64 = 338; // Cronos testnet
const DEFAULT_RPC_URL: &str = "https://evm-t3.cronos.org";
const DEFAULT_EXPLORER_TX_URL: &str = "https://cronoscan.com/tx/";

/// Network the deployment lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub chain_id: u64,
    pub chain_name: String,
    /// Public RPC endpoint used for read-only fallbacks.
    pub rpc_url: String,
    /// Native token symbol (TCRO on testnet, CRO on mainnet).
    pub native_symbol: String,
    /// Prefix the transaction hash is appended to.
    pub explorer_tx_url: String,
}

impl NetworkTarget {
    pub fn explorer_link(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_url, tx_hash)
    }
}

/// Fixed contract addresses for the swap deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    /// The Freequidity swap contract.
    pub swap_contract: Address,
    /// The TP token handed out by the swap contract.
    pub liquidity_token: Address,
    /// UniswapV2-style TP/wrapped-native pair.
    pub liquidity_pair: Address,
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network: NetworkTarget,
    pub contracts: ContractAddresses,
    /// True when the swap contract address came from the environment.
    pub contract_from_env: bool,
    /// Decimals of the TP token.
    pub token_decimals: u8,
    /// Upper bound on every single network probe.
    pub probe_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub deadline_offset_secs: u64,
    /// RPC endpoint the wallet signer talks to.
    pub wallet_rpc_url: String,
    pub private_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let contract_raw = get("FREEQUIDITY_ADDRESS");
        let contract_from_env = contract_raw.is_some();
        let swap_contract =
            parse_address("FREEQUIDITY_ADDRESS", contract_raw.as_deref().unwrap_or(DEFAULT_CONTRACT))?;
        let liquidity_token = parse_address(
            "TP_TOKEN_ADDRESS",
            get("TP_TOKEN_ADDRESS").as_deref().unwrap_or(DEFAULT_TP_TOKEN),
        )?;
        let liquidity_pair = parse_address(
            "LIQUIDITY_PAIR_ADDRESS",
            get("LIQUIDITY_PAIR_ADDRESS")
                .as_deref()
                .unwrap_or(DEFAULT_LIQUIDITY_PAIR),
        )?;

        let chain_id = parse_number("CHAIN_ID", get("CHAIN_ID"), DEFAULT_CHAIN_ID)?;
        let chain_name = get("CHAIN_NAME").unwrap_or_else(|| default_chain_name(chain_id));
        let native_symbol =
            get("NATIVE_SYMBOL").unwrap_or_else(|| default_native_symbol(chain_id).to_string());

        let rpc_url = get("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.into());
        Url::parse(&rpc_url)?;
        let wallet_rpc_url = get("WALLET_RPC_URL").unwrap_or_else(|| rpc_url.clone());
        Url::parse(&wallet_rpc_url)?;
        let explorer_tx_url =
            get("EXPLORER_TX_URL").unwrap_or_else(|| DEFAULT_EXPLORER_TX_URL.into());

        let token_decimals = parse_number("TOKEN_DECIMALS", get("TOKEN_DECIMALS"), 18u8)?;
        let probe_timeout_secs = parse_number("PROBE_TIMEOUT_SECS", get("PROBE_TIMEOUT_SECS"), 15u64)?;
        let confirmation_timeout_secs = parse_number(
            "CONFIRMATION_TIMEOUT_SECS",
            get("CONFIRMATION_TIMEOUT_SECS"),
            180u64,
        )?;
        let deadline_offset_secs =
            parse_number("DEADLINE_OFFSET_SECS", get("DEADLINE_OFFSET_SECS"), 1200u64)?;

        Ok(Self {
            network: NetworkTarget {
                chain_id,
                chain_name,
                rpc_url,
                native_symbol,
                explorer_tx_url,
            },
            contracts: ContractAddresses {
                swap_contract,
                liquidity_token,
                liquidity_pair,
            },
            contract_from_env,
            token_decimals,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            confirmation_timeout: Duration::from_secs(confirmation_timeout_secs),
            deadline_offset_secs,
            wallet_rpc_url,
            private_key: get("PRIVATE_KEY"),
        })
    }
}

/// Runner switches read from the environment by the binary.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub quote_amount: String,
    pub slippage_percent: String,
    pub run_diagnostics: bool,
    pub submit_swap: bool,
    pub json_output: bool,
}

/// Load runner switches from environment variables
pub fn load_run_options() -> RunOptions {
    let flag = |key: &str| std::env::var(key).map(|v| v == "1").unwrap_or(false);
    RunOptions {
        quote_amount: std::env::var("QUOTE_AMOUNT").unwrap_or_else(|_| "1".into()),
        slippage_percent: std::env::var("SLIPPAGE_PERCENT").unwrap_or_else(|_| "1".into()),
        run_diagnostics: flag("RUN_DIAGNOSTICS"),
        submit_swap: flag("SUBMIT_SWAP"),
        json_output: std::env::var("OUTPUT").map(|v| v == "json").unwrap_or(false),
    }
}

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    Address::from_str(raw.trim())
        .map_err(|e| AppError::Config(format!("{key} is not a valid address ({raw}): {e}")))
}

fn parse_number<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a number ({v}): {e}"))),
        None => Ok(default),
    }
}

fn default_chain_name(chain_id: u64) -> String {
    match chain_id {
        25 => "Cronos Mainnet".into(),
        338 => "Cronos Testnet (Chapel)".into(),
        other => format!("Cronos {other}"),
    }
}

fn default_native_symbol(chain_id: u64) -> &'static str {
    if chain_id == 338 { "TCRO" } else { "CRO" }
}
