use crate::dex::PairState;
use crate::models::{QuotePath, ReasonCode};
use bigdecimal::BigDecimal;
use serde::Serialize;

/// What the bytecode presence check saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeProbe {
    Deployed,
    Empty,
    /// Every available connection failed to return code.
    Unreadable,
}

/// What the pair-liquidity check saw after both quote paths failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairProbe {
    Failed,
    Reserves(PairState),
}

/// Native-per-token price derived from a quote of one native unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceResult {
    Ok {
        #[serde(serialize_with = "serialize_price")]
        native_per_token: BigDecimal,
        path: QuotePath,
    },
    Unavailable {
        reason: ReasonCode,
    },
}

impl PriceResult {
    /// Price rounded to 6 places for display.
    pub fn display(&self) -> Option<String> {
        match self {
            PriceResult::Ok {
                native_per_token, ..
            } => Some(crate::utils::format_fixed(native_per_token, 6)),
            PriceResult::Unavailable { .. } => None,
        }
    }
}

fn serialize_price<S: serde::Serializer>(v: &BigDecimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&crate::utils::format_fixed(v, 6))
}
