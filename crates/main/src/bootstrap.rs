//! 应用启动引导模块
//!
//! 配置 -> 选择器，以及 panic hook

use anyhow::{anyhow, Context, Result};
use config_crate::{AppConfig, ProviderContractsConfig, RuleSetMode, UnknownNetworkMode};
use ethers::types::Address;
use lending::{
    FlashloanSelector, FlashloanSelectorConfig, ProviderRegistry, RuleSet, UnknownNetworkPolicy,
};
use models::{FlashloanProvider, Network, ProviderContracts};
use std::str::FromStr;
use tracing::{error, info};

fn parse_address(value: Option<&str>, key: &str) -> Result<Option<Address>> {
    value
        .map(|raw| Address::from_str(raw).with_context(|| format!("Invalid {}: {}", key, raw)))
        .transpose()
}

/// 把配置中的地址字符串转换为规则使用的合约地址
pub fn provider_contracts(config: &ProviderContractsConfig) -> Result<ProviderContracts> {
    Ok(ProviderContracts {
        aave: parse_address(config.aave.as_deref(), "aave")?,
        iron_bank: parse_address(config.iron_bank.as_deref(), "iron_bank")?,
        cream: parse_address(config.cream.as_deref(), "cream")?,
        dydx: parse_address(config.dydx.as_deref(), "dydx")?,
    })
}

/// 校验注册表并构建选择器
pub fn build_selector(config: &AppConfig) -> Result<FlashloanSelector> {
    let listing = ProviderRegistry::parse_listing(&config.flashloan.provider_registry)
        .context("解析 FLASHLOAN_PROVIDER_REGISTRY 失败")?;
    let registry =
        ProviderRegistry::from_deployed(&listing).context("provider 注册表与合约序号不一致")?;

    let unknown_network = match config.flashloan.unknown_network {
        UnknownNetworkMode::Fallback => {
            let provider = FlashloanProvider::from_key(&config.flashloan.fallback_provider)
                .ok_or_else(|| {
                    anyhow!(
                        "Invalid FLASHLOAN_FALLBACK_PROVIDER: {}",
                        config.flashloan.fallback_provider
                    )
                })?;
            UnknownNetworkPolicy::Fallback(provider)
        }
        UnknownNetworkMode::Reject => UnknownNetworkPolicy::Reject,
    };

    let rule_set = match config.flashloan.rule_set {
        RuleSetMode::Current => RuleSet::Current,
        RuleSetMode::Legacy => RuleSet::Legacy,
    };

    let mut selector = FlashloanSelector::new(
        FlashloanSelectorConfig {
            unknown_network,
            rule_set,
        },
        registry,
    );

    for network in Network::ALL {
        if let Some(contracts) = config.contracts_for(network.name()) {
            let contracts = provider_contracts(contracts)
                .with_context(|| format!("[{}] provider 合约地址无效", network))?;
            selector = selector.with_contracts(network, contracts);
        }
    }

    log_selector(&selector);
    Ok(selector)
}

fn log_selector(selector: &FlashloanSelector) {
    info!("========================================");
    info!("未知网络策略: {:?}", selector.config().unknown_network);
    info!("规则集: {:?}", selector.config().rule_set);
    for (index, provider) in selector.registry().iter() {
        info!("  flashnum {} => {}", index, provider);
    }
    info!("========================================");
}

/// 设置 panic hook
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("!!! 系统发生 PANIC !!!");
        error!("Panic 信息: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            error!(
                "发生位置: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
    }));
}
