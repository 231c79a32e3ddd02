use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 支持闪电贷调度的网络
///
/// 新增网络时，选择器中的 `match` 会在编译期要求补全规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Fantom,
    Polygon,
    Arbitrum,
}

/// 网络名称无法识别
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown network: {0}")]
pub struct ParseNetworkError(pub String);

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Ethereum,
        Network::Fantom,
        Network::Polygon,
        Network::Arbitrum,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Fantom => 250,
            Network::Polygon => 137,
            Network::Arbitrum => 42161,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(Network::Ethereum),
            250 => Some(Network::Fantom),
            137 => Some(Network::Polygon),
            42161 => Some(Network::Arbitrum),
            _ => None,
        }
    }

    /// 配置和命令行中使用的小写名称
    pub fn name(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Fantom => "fantom",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
        }
    }

    /// 按名称或 chain id 解析 (大小写不敏感)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "ethereum" | "mainnet" | "eth" => Some(Network::Ethereum),
            "fantom" | "ftm" => Some(Network::Fantom),
            "polygon" | "matic" => Some(Network::Polygon),
            "arbitrum" | "arbitrum-one" => Some(Network::Arbitrum),
            other => other.parse::<u64>().ok().and_then(Self::from_chain_id),
        }
    }
}

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseNetworkError(s.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
