use serde::Serialize;

/// Reserve snapshot of a UniswapV2-style liquidity pair, raw uint112 values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PairState {
    pub reserve0: u128,
    pub reserve1: u128,
}

impl PairState {
    pub fn new(reserve0: u128, reserve1: u128) -> Self {
        Self { reserve0, reserve1 }
    }

    /// A pair can price a swap only when both sides hold something.
    pub fn has_liquidity(&self) -> bool {
        self.reserve0 > 0 && self.reserve1 > 0
    }
}
