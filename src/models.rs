//! Shared data structures used throughout the application.

use crate::dex::PairState;
use bigdecimal::BigDecimal;
use ethers::types::U256;
use serde::Serialize;
use std::fmt;

/// Why a quote could not be produced. Exactly one applies per failed quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ContractNotDeployed,
    WrongNetwork,
    NoProvider,
    PairMissing,
    NoLiquidity,
    CallReverted,
    Unknown,
}

impl ReasonCode {
    /// User-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            ReasonCode::ContractNotDeployed => {
                "Contract not deployed at the configured address; update the address or deploy the contract."
            }
            ReasonCode::WrongNetwork => "Wrong network: switch to the configured chain to see prices.",
            ReasonCode::NoProvider => "No provider: connect a wallet or configure a public RPC.",
            ReasonCode::PairMissing => "Quote unavailable: liquidity pair not found on-chain.",
            ReasonCode::NoLiquidity => {
                "Quote unavailable: pair exists but reserves appear to be zero (no liquidity)."
            }
            ReasonCode::CallReverted => {
                "Quote unavailable: contract read reverted although the pair has liquidity."
            }
            ReasonCode::Unknown => "Quote unavailable: unexpected error while reading the chain.",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Which connection produced a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotePath {
    Primary,
    Fallback,
}

/// Successful on-chain quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Raw fixed-point output as returned by the contract.
    #[serde(serialize_with = "serialize_u256")]
    pub raw: U256,
    /// Output scaled by the token's decimals.
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: BigDecimal,
    pub path: QuotePath,
    /// Best-effort pair snapshot taken after a fallback success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairState>,
}

impl Quote {
    /// Output rounded to 2 places for display.
    pub fn display(&self) -> String {
        crate::utils::format_fixed(&self.amount, 2)
    }
}

/// Outcome of a single quote request. Not persisted; each new request
/// supersedes the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteResult {
    Ok(Quote),
    Unavailable { reason: ReasonCode },
}

impl QuoteResult {
    pub fn unavailable(reason: ReasonCode) -> Self {
        QuoteResult::Unavailable { reason }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteResult::Ok(q) => Some(q),
            QuoteResult::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            QuoteResult::Ok(_) => None,
            QuoteResult::Unavailable { reason } => Some(*reason),
        }
    }
}

/// Ordered probe results of one diagnostics run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    lines: Vec<String>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

fn serialize_u256<S: serde::Serializer>(v: &U256, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&v.to_string())
}

fn serialize_decimal<S: serde::Serializer>(v: &BigDecimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&crate::utils::to_plain_string(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_serialize_snake_case() {
        let json = serde_json::to_string(&QuoteResult::unavailable(ReasonCode::NoLiquidity)).unwrap();
        assert_eq!(json, r#"{"status":"unavailable","reason":"no_liquidity"}"#);
    }

    #[test]
    fn ok_quote_serializes_amount_as_string() {
        let result = QuoteResult::Ok(Quote {
            raw: U256::exp10(18) * 100,
            amount: BigDecimal::from(100),
            path: QuotePath::Fallback,
            pair: None,
        });
        let value: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["raw"], "100000000000000000000");
        assert_eq!(value["amount"], "100");
        assert_eq!(value["path"], "fallback");
        assert!(value.get("pair").is_none());
        assert!(result.reason().is_none());
        assert!(result.quote().is_some());
    }

    #[test]
    fn report_renders_one_line_per_probe() {
        let mut report = DiagnosticReport::new();
        assert!(report.is_empty());
        report.push("a");
        report.push(String::from("b"));
        assert_eq!(report.len(), 2);
        assert_eq!(report.to_string(), "a\nb");
    }
}
