use std::time::Duration;

use ethers::types::Bytes;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    /// A contract call failed. `revert_data` holds the raw revert payload when
    /// the node returned one.
    #[error("Contract call failed: {message}")]
    Call {
        message: String,
        revert_data: Option<Bytes>,
    },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Signer error: {0}")]
    Signer(#[from] ethers::signers::WalletError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Other: {0}")]
    Other(String),
}

impl AppError {
    /// Raw revert payload, if the failure carried one.
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            AppError::Call { revert_data, .. } => revert_data.as_ref(),
            _ => None,
        }
    }
}
