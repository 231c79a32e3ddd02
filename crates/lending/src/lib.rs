pub mod flashloan;
pub mod vault;

/// 选择器日志使用的 target，日志系统据此单独输出 flashloan.log
pub const SELECTOR_TARGET: &str = "flashloan_selector";

pub use flashloan::{
    select_flashloan_provider, select_liquidation_provider, FlashloanRequest, FlashloanSelection,
    FlashloanSelector, FlashloanSelectorConfig, ProviderRegistry, RuleSet, SelectionRule,
    SelectorError, UnknownNetworkPolicy,
};
pub use vault::{ContractVaultReader, VaultStateSource};
