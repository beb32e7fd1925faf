//! Wallet and contract balances shown next to the quote.

use crate::config::ContractAddresses;
use crate::dex::ChainReader;
use crate::errors::Result;
use crate::utils::{NATIVE_DECIMALS, format_fixed, to_decimal};
use ethers::types::{Address, U256};

/// Native balance of `owner`, 4 places.
pub async fn wallet_native_balance(reader: &dyn ChainReader, owner: Address) -> Result<String> {
    let raw = reader.native_balance(owner).await?;
    Ok(format_fixed(&to_decimal(raw, NATIVE_DECIMALS), 4))
}

/// TP the swap contract can still hand out: half of its TP balance, 2 places.
pub async fn contract_available_tp(
    reader: &dyn ChainReader,
    contracts: &ContractAddresses,
    token_decimals: u8,
) -> Result<String> {
    let raw = reader
        .token_balance(contracts.liquidity_token, contracts.swap_contract)
        .await?;
    let available = raw / U256::from(2);
    Ok(format_fixed(&to_decimal(available, token_decimals), 2))
}
