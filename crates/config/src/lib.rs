use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// 默认部署的 provider 注册表 (序号:名称)
pub const DEFAULT_PROVIDER_REGISTRY: &str = "0:aave,1:dydx,2:cream,3:balancer,4:aavev3";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 默认网络名称 (命令行可覆盖)
    pub network: String,
    pub rpc_url: Option<String>,
    pub flashloan: FlashloanConfig,
    /// 网络名称 -> provider 合约地址
    pub provider_contracts: HashMap<String, ProviderContractsConfig>,
    pub log: LogConfig,
}

/// 未知网络处理方式
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum UnknownNetworkMode {
    #[default]
    Fallback,
    Reject,
}

/// 规则集
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum RuleSetMode {
    #[default]
    Current,
    Legacy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashloanConfig {
    pub unknown_network: UnknownNetworkMode,
    /// 未知网络回退使用的来源名称
    pub fallback_provider: String,
    pub rule_set: RuleSetMode,
    /// 部署方的 provider 注册表，格式 `0:aave,1:dydx`
    pub provider_registry: String,
}

/// 规则比对用的 vault 侧 provider 合约地址 (十六进制字符串)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProviderContractsConfig {
    pub aave: Option<String>,
    pub iron_bank: Option<String>,
    pub cream: Option<String>,
    pub dydx: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // 加载 .env 文件
        dotenv::dotenv().ok();

        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// 从变量表构建配置
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let network = non_empty(vars, "NETWORK").unwrap_or_else(|| "ethereum".to_string());
        let rpc_url = non_empty(vars, "RPC_URL");

        // 闪电贷配置
        let unknown_network = match non_empty(vars, "FLASHLOAN_UNKNOWN_NETWORK")
            .unwrap_or_else(|| "fallback".to_string())
            .to_lowercase()
            .as_str()
        {
            "fallback" => UnknownNetworkMode::Fallback,
            "reject" => UnknownNetworkMode::Reject,
            other => bail!("Invalid FLASHLOAN_UNKNOWN_NETWORK: {}", other),
        };

        let rule_set = match non_empty(vars, "FLASHLOAN_RULESET")
            .unwrap_or_else(|| "current".to_string())
            .to_lowercase()
            .as_str()
        {
            "current" => RuleSetMode::Current,
            "legacy" => RuleSetMode::Legacy,
            other => bail!("Invalid FLASHLOAN_RULESET: {}", other),
        };

        let flashloan = FlashloanConfig {
            unknown_network,
            fallback_provider: non_empty(vars, "FLASHLOAN_FALLBACK_PROVIDER")
                .unwrap_or_else(|| "balancer".to_string()),
            rule_set,
            provider_registry: non_empty(vars, "FLASHLOAN_PROVIDER_REGISTRY")
                .unwrap_or_else(|| DEFAULT_PROVIDER_REGISTRY.to_string()),
        };

        // provider 合约地址 (只有 Ethereum 和 Fantom 的规则需要)
        let mut provider_contracts = HashMap::new();
        provider_contracts.insert(
            "ethereum".to_string(),
            ProviderContractsConfig {
                aave: non_empty(vars, "ETH_PROVIDER_AAVE"),
                iron_bank: non_empty(vars, "ETH_PROVIDER_IRONBANK"),
                cream: None,
                dydx: non_empty(vars, "ETH_PROVIDER_DYDX"),
            },
        );
        provider_contracts.insert(
            "fantom".to_string(),
            ProviderContractsConfig {
                aave: non_empty(vars, "FANTOM_PROVIDER_GEIST"),
                iron_bank: None,
                cream: non_empty(vars, "FANTOM_PROVIDER_CREAM"),
                dydx: None,
            },
        );

        // 日志配置
        let log = LogConfig {
            level: non_empty(vars, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
            dir: non_empty(vars, "LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        Ok(Self {
            network,
            rpc_url,
            flashloan,
            provider_contracts,
            log,
        })
    }

    /// 获取网络的 provider 合约配置
    pub fn contracts_for(&self, network: &str) -> Option<&ProviderContractsConfig> {
        self.provider_contracts.get(&network.to_lowercase())
    }
}
