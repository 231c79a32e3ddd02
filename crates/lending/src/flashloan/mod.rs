pub mod error;
pub mod registry;
pub mod selector;

pub use error::SelectorError;
pub use registry::ProviderRegistry;
pub use selector::{
    select_flashloan_provider, select_liquidation_provider, FlashloanRequest, FlashloanSelection,
    FlashloanSelector, FlashloanSelectorConfig, RuleSet, SelectionRule, UnknownNetworkPolicy,
};
