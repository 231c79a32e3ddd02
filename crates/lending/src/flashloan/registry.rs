//! 闪电贷 provider 注册表
//!
//! 链上 Flasher 按序号区分闪电贷来源，序号表只在这里维护。
//! 启动时用部署方提供的列表校验，任何不一致都拒绝继续选择。

use models::{FlashloanProvider, ProviderIndex};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::error::SelectorError;
use crate::SELECTOR_TARGET;

/// 序号 -> 闪电贷来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRegistry {
    entries: BTreeMap<ProviderIndex, FlashloanProvider>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ProviderRegistry {
    /// 完整序号表: 0=Aave, 1=dYdX, 2=Cream, 3=Balancer, 4=AaveV3
    pub fn canonical() -> Self {
        let entries = FlashloanProvider::ALL
            .into_iter()
            .map(|provider| (provider.index(), provider))
            .collect();
        Self { entries }
    }

    /// 解析 `0:aave,1:dydx,2:cream` 格式的部署列表
    pub fn parse_listing(listing: &str) -> Result<Vec<(u8, String)>, SelectorError> {
        listing
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let (index, name) = item
                    .split_once(':')
                    .ok_or_else(|| SelectorError::InvalidRegistryEntry(item.to_string()))?;
                let index = index
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| SelectorError::InvalidRegistryEntry(item.to_string()))?;
                Ok((index, name.trim().to_string()))
            })
            .collect()
    }

    /// 按部署列表构建注册表，序号必须与完整表一致
    ///
    /// 部署列表可以只包含部分来源 (例如某条链没有部署 Balancer)
    pub fn from_deployed(listing: &[(u8, String)]) -> Result<Self, SelectorError> {
        let mut entries = BTreeMap::new();

        for (raw_index, name) in listing {
            let index = ProviderIndex(*raw_index);
            let expected = FlashloanProvider::from_index(index);
            let found = FlashloanProvider::from_key(name);

            match (expected, found) {
                (Some(expected), Some(found)) if expected == found => {
                    if entries.insert(index, found).is_some() {
                        return Err(SelectorError::InvalidRegistryEntry(format!(
                            "duplicate index {}",
                            index
                        )));
                    }
                }
                (expected, _) => {
                    warn!(
                        target: SELECTOR_TARGET,
                        "注册表序号不一致: index={}, 期望={:?}, 部署={}",
                        index, expected, name
                    );
                    return Err(SelectorError::RegistryMismatch {
                        index,
                        expected: expected
                            .map(|p| p.key().to_string())
                            .unwrap_or_else(|| "<none>".to_string()),
                        found: name.clone(),
                    });
                }
            }
        }

        if entries.is_empty() {
            return Err(SelectorError::InvalidRegistryEntry("empty listing".to_string()));
        }

        info!(
            target: SELECTOR_TARGET,
            "注册表校验通过: {} 个闪电贷来源",
            entries.len()
        );
        Ok(Self { entries })
    }

    pub fn provider_at(&self, index: ProviderIndex) -> Option<FlashloanProvider> {
        self.entries.get(&index).copied()
    }

    /// 获取来源的链上序号，未注册时报错
    pub fn index_of(&self, provider: FlashloanProvider) -> Result<ProviderIndex, SelectorError> {
        let index = provider.index();
        match self.entries.get(&index) {
            Some(registered) if *registered == provider => Ok(index),
            _ => Err(SelectorError::ProviderNotRegistered(provider)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderIndex, FlashloanProvider)> + '_ {
        self.entries.iter().map(|(index, provider)| (*index, *provider))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
