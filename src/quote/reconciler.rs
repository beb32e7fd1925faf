//! Primary/fallback quote reads and the diagnosis of failed quotes.
//!
//! Order is fixed and short-circuiting:
//! 1. bytecode presence (primary, else fallback)
//! 2. primary chain id against the configured network
//! 3. quote through the primary connection
//! 4. quote through the public RPC fallback
//! 5. pair reserves, to tell a missing pair from an empty one from a revert
//!
//! Read failures never escape; they end up as a [`ReasonCode`].

use super::types::{CodeProbe, PairProbe, PriceResult};
use crate::config::{AppConfig, ContractAddresses, NetworkTarget};
use crate::dex::ChainReader;
use crate::errors::Result;
use crate::models::{Quote, QuotePath, QuoteResult, ReasonCode};
use crate::utils::{NATIVE_DECIMALS, parse_amount, to_decimal};
use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_traits::Zero;
use tracing::{info, warn};

/// Verdict of steps 1–2. `primary_chain_id` is `None` when there is no
/// primary connection or its chain id could not be read.
pub fn precheck(
    code: CodeProbe,
    primary_chain_id: Option<u64>,
    expected_chain_id: u64,
) -> Option<ReasonCode> {
    match code {
        CodeProbe::Empty => return Some(ReasonCode::ContractNotDeployed),
        CodeProbe::Unreadable => return Some(ReasonCode::Unknown),
        CodeProbe::Deployed => {}
    }
    match primary_chain_id {
        Some(id) if id != expected_chain_id => Some(ReasonCode::WrongNetwork),
        _ => None,
    }
}

/// Verdict of step 5, once both quote paths have failed.
pub fn classify_failure(pair: &PairProbe) -> ReasonCode {
    match pair {
        PairProbe::Failed => ReasonCode::PairMissing,
        PairProbe::Reserves(state) if !state.has_liquidity() => ReasonCode::NoLiquidity,
        PairProbe::Reserves(_) => ReasonCode::CallReverted,
    }
}

/// Produces quotes for the configured swap contract.
#[derive(Debug, Clone, Copy)]
pub struct QuoteReconciler<'a> {
    network: &'a NetworkTarget,
    contracts: &'a ContractAddresses,
    token_decimals: u8,
}

impl<'a> QuoteReconciler<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self::with_parts(&config.network, &config.contracts, config.token_decimals)
    }

    pub fn with_parts(
        network: &'a NetworkTarget,
        contracts: &'a ContractAddresses,
        token_decimals: u8,
    ) -> Self {
        Self {
            network,
            contracts,
            token_decimals,
        }
    }

    /// Quote `amount_in` native units (decimal string) for TP.
    ///
    /// Fails only on unusable input; every chain-side failure is reported
    /// through [`QuoteResult::Unavailable`].
    pub async fn get_quote(
        &self,
        amount_in: &str,
        primary: Option<&dyn ChainReader>,
        fallback: Option<&dyn ChainReader>,
    ) -> Result<QuoteResult> {
        let amount = parse_amount(amount_in, NATIVE_DECIMALS)?;
        Ok(self.quote_raw(amount, primary, fallback).await)
    }

    /// Price of one TP in native units, from a quote of exactly one native unit.
    pub async fn get_price(
        &self,
        primary: Option<&dyn ChainReader>,
        fallback: Option<&dyn ChainReader>,
    ) -> PriceResult {
        let one = U256::exp10(usize::from(NATIVE_DECIMALS));
        match self.quote_raw(one, primary, fallback).await {
            QuoteResult::Ok(quote) if quote.amount.is_zero() => {
                info!("[PRICE] quote for one native unit is zero");
                PriceResult::Unavailable {
                    reason: ReasonCode::NoLiquidity,
                }
            }
            QuoteResult::Ok(quote) => PriceResult::Ok {
                native_per_token: BigDecimal::from(1) / quote.amount.clone(),
                path: quote.path,
            },
            QuoteResult::Unavailable { reason } => PriceResult::Unavailable { reason },
        }
    }

    /// Steps 1–5 for an already scaled amount.
    pub async fn quote_raw(
        &self,
        amount_in: U256,
        primary: Option<&dyn ChainReader>,
        fallback: Option<&dyn ChainReader>,
    ) -> QuoteResult {
        if primary.is_none() && fallback.is_none() {
            info!("[QUOTE] no wallet connection and no public RPC configured");
            return QuoteResult::unavailable(ReasonCode::NoProvider);
        }

        let code = self.probe_code(primary, fallback).await;
        let primary_chain_id = match primary {
            Some(reader) => match reader.chain_id().await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "[QUOTE] could not read wallet chain id; continuing");
                    None
                }
            },
            None => None,
        };
        if let Some(reason) = precheck(code, primary_chain_id, self.network.chain_id) {
            info!(
                ?reason,
                expected_chain_id = self.network.chain_id,
                primary_chain_id,
                "[QUOTE] precheck failed"
            );
            return QuoteResult::unavailable(reason);
        }

        let contract = self.contracts.swap_contract;

        if let Some(reader) = primary {
            match reader.quote_tp_for_native(contract, amount_in).await {
                Ok(raw) => return QuoteResult::Ok(self.build_quote(raw, QuotePath::Primary, None)),
                Err(e) => {
                    warn!(error = %e, source = reader.label(), "[QUOTE] primary quote failed; trying public RPC");
                }
            }
        }

        if let Some(reader) = fallback {
            match reader.quote_tp_for_native(contract, amount_in).await {
                Ok(raw) => {
                    // Pair state is informational here; the quote stands without it.
                    let pair = match reader.pair_reserves(self.contracts.liquidity_pair).await {
                        Ok(state) => Some(state),
                        Err(e) => {
                            warn!(error = %e, "[QUOTE] pair refresh after fallback quote failed");
                            None
                        }
                    };
                    info!("[QUOTE] quote fetched via public RPC (read-only)");
                    return QuoteResult::Ok(self.build_quote(raw, QuotePath::Fallback, pair));
                }
                Err(e) => {
                    warn!(error = %e, source = reader.label(), "[QUOTE] fallback quote failed");
                }
            }
        }

        let Some(reader) = fallback.or(primary) else {
            return QuoteResult::unavailable(ReasonCode::NoProvider);
        };
        let probe = match reader.pair_reserves(self.contracts.liquidity_pair).await {
            Ok(state) => PairProbe::Reserves(state),
            Err(e) => {
                warn!(error = %e, "[QUOTE] pair lookup failed");
                PairProbe::Failed
            }
        };
        let reason = classify_failure(&probe);
        info!(?reason, ?probe, "[QUOTE] quote unavailable");
        QuoteResult::unavailable(reason)
    }

    async fn probe_code(
        &self,
        primary: Option<&dyn ChainReader>,
        fallback: Option<&dyn ChainReader>,
    ) -> CodeProbe {
        let contract = self.contracts.swap_contract;
        for reader in [primary, fallback].into_iter().flatten() {
            match reader.code_at(contract).await {
                Ok(code) if code.is_empty() => return CodeProbe::Empty,
                Ok(_) => return CodeProbe::Deployed,
                Err(e) => {
                    warn!(error = %e, source = reader.label(), %contract, "[QUOTE] getCode failed");
                }
            }
        }
        CodeProbe::Unreadable
    }

    fn build_quote(&self, raw: U256, path: QuotePath, pair: Option<crate::dex::PairState>) -> Quote {
        Quote {
            raw,
            amount: to_decimal(raw, self.token_decimals),
            path,
            pair,
        }
    }
}
