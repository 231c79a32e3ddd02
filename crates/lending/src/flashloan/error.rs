use models::{FlashloanProvider, Network, ProviderIndex};
use thiserror::Error;

/// 闪电贷来源选择错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid asset reference on {network}: {asset}")]
    InvalidAssetReference { network: Network, asset: String },

    #[error("Missing provider contract on {network}: {contract}")]
    MissingProviderContract {
        network: Network,
        contract: &'static str,
    },

    #[error("Provider registry mismatch at index {index}: expected {expected}, found {found}")]
    RegistryMismatch {
        index: ProviderIndex,
        expected: String,
        found: String,
    },

    #[error("Invalid provider registry entry: {0}")]
    InvalidRegistryEntry(String),

    #[error("Provider {0} is not registered in the deployed registry")]
    ProviderNotRegistered(FlashloanProvider),
}
