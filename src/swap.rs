//! Building and submitting `swapCROForTPAndBurnLP`.
//!
//! Submission is the one path that surfaces raw failures: a payment-bearing
//! transaction is never retried on the user's behalf.

use crate::config::{AppConfig, ContractAddresses, NetworkTarget};
use crate::errors::{AppError, Result};
use crate::models::QuoteResult;
use crate::utils::{NATIVE_DECIMALS, format_fixed, parse_amount, with_timeout};
use crate::wallet::{WalletProvider, WalletSession};
use bigdecimal::BigDecimal;
use ethers::abi::{Token, encode};
use ethers::types::{
    Address, Bytes, TransactionReceipt, TransactionRequest, TxHash, U256,
    transaction::eip2718::TypedTransaction,
};
use num_traits::Signed;
use serde::Serialize;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub const SWAP_SIGNATURE: &str = "swapCROForTPAndBurnLP(uint256,uint256)";
pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

/// Convert a slippage percentage ("1" = 1%) to basis points, rounding half up.
pub fn slippage_percent_to_bps(input: &str) -> Result<u16> {
    let trimmed = input.trim();
    let percent = BigDecimal::from_str(trimmed)
        .map_err(|e| AppError::Config(format!("invalid slippage {trimmed:?}: {e}")))?;
    if percent.is_negative() {
        return Err(AppError::Config(format!("slippage must not be negative: {trimmed}")));
    }
    let bps = format_fixed(&(percent * BigDecimal::from(100)), 0)
        .parse::<u32>()
        .ok()
        .filter(|bps| *bps <= u32::from(MAX_SLIPPAGE_BPS))
        .ok_or_else(|| AppError::Config(format!("slippage {trimmed}% exceeds 100%")))?;
    Ok(bps as u16)
}

/// Unix deadline `offset_secs` after `now_secs`.
pub fn deadline_at(now_secs: u64, offset_secs: u64) -> U256 {
    U256::from(now_secs) + U256::from(offset_secs)
}

pub fn deadline_from_now(offset_secs: u64) -> Result<U256> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Other(format!("system clock before epoch: {e}")))?;
    Ok(deadline_at(now.as_secs(), offset_secs))
}

/// Calldata: 4-byte selector followed by the two ABI-encoded words.
pub fn encode_swap_call(slippage_bps: u16, deadline: U256) -> Bytes {
    let mut data = ethers::utils::id(SWAP_SIGNATURE).to_vec();
    data.extend(encode(&[
        Token::Uint(U256::from(slippage_bps)),
        Token::Uint(deadline),
    ]));
    Bytes::from(data)
}

/// Submitted transaction; confirmation is awaited separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxHandle {
    pub hash: TxHash,
    pub explorer_url: String,
}

pub struct SwapSubmitter<'a> {
    network: &'a NetworkTarget,
    contracts: &'a ContractAddresses,
}

impl<'a> SwapSubmitter<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self::with_parts(&config.network, &config.contracts)
    }

    pub fn with_parts(network: &'a NetworkTarget, contracts: &'a ContractAddresses) -> Self {
        Self { network, contracts }
    }

    pub fn build_transaction(
        &self,
        from: Address,
        value: U256,
        slippage_bps: u16,
        deadline: U256,
    ) -> TypedTransaction {
        TransactionRequest::new()
            .from(from)
            .to(self.contracts.swap_contract)
            .value(value)
            .data(encode_swap_call(slippage_bps, deadline))
            .into()
    }

    /// Send the swap with `amount_in` native units attached. Requires a
    /// connected session on the configured chain and a successful quote.
    pub async fn submit(
        &self,
        wallet: &dyn WalletProvider,
        session: &WalletSession,
        quote: &QuoteResult,
        amount_in: &str,
        slippage_bps: u16,
        deadline_offset_secs: u64,
    ) -> Result<TxHandle> {
        let from = match session.address {
            Some(address) if session.connected => address,
            _ => return Err(AppError::Wallet("Connect and enter amount".into())),
        };
        if !session.chain_ok(self.network.chain_id) {
            return Err(AppError::Wallet(format!(
                "Wrong network: switch to {} ({})",
                self.network.chain_name, self.network.chain_id
            )));
        }
        if quote.quote().is_none() {
            return Err(AppError::Wallet("Fetch a quote before swapping".into()));
        }
        if slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(AppError::Config(format!(
                "slippage {slippage_bps} bps is above {MAX_SLIPPAGE_BPS}"
            )));
        }

        let value = parse_amount(amount_in, NATIVE_DECIMALS)?;
        let deadline = deadline_from_now(deadline_offset_secs)?;
        let tx = self.build_transaction(from, value, slippage_bps, deadline);

        let hash = wallet.send_transaction(tx).await.map_err(|e| {
            warn!(error = %e, "[SWAP] submission failed");
            AppError::Wallet(format!("Swap failed: {e}"))
        })?;
        let explorer_url = self.network.explorer_link(&format!("{hash:?}"));
        info!(tx = ?hash, %explorer_url, slippage_bps, "[SWAP] tx submitted");
        Ok(TxHandle { hash, explorer_url })
    }
}

/// Wait for the receipt of a submitted swap. Dropping the future cancels the wait.
pub async fn await_confirmation(
    wallet: &dyn WalletProvider,
    handle: &TxHandle,
    timeout: Duration,
) -> Result<Option<TransactionReceipt>> {
    let receipt = with_timeout(timeout, wallet.wait_for_receipt(handle.hash)).await?;
    match &receipt {
        Some(r) if r.status == Some(1u64.into()) => info!(tx = ?handle.hash, "[SWAP] confirmed"),
        Some(_) => warn!(tx = ?handle.hash, "[SWAP] transaction reverted on-chain"),
        None => warn!(tx = ?handle.hash, "[SWAP] transaction dropped"),
    }
    Ok(receipt)
}
