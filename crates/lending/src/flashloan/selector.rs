//! 闪电贷来源选择器
//!
//! 为 refinance / flash close 选择 Flasher 使用的闪电贷来源。
//!
//! 选择规则:
//! 1. Ethereum: 借入 DAI/USDC 使用 dYdX；否则 Iron Bank 存在且不是当前 provider 时使用 Cream；否则 Aave
//! 2. Fantom: 当前 provider 是 Cream 时使用 Aave (Geist 槽位)；否则 Cream
//! 3. Polygon / Arbitrum: Balancer
//! 4. 未知网络: 按配置回退到 Balancer 或直接拒绝
//!
//! 当前 provider 由调用方读取后传入，选择函数本身不访问链上状态。

use anyhow::{Context, Result};
use ethers::types::Address;
use models::{
    Asset, AssetRef, FlashOperation, FlashloanProvider, Network, ProviderContracts, ProviderIndex,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::error::SelectorError;
use super::registry::ProviderRegistry;
use crate::vault::VaultStateSource;
use crate::SELECTOR_TARGET;

/// 命中的规则分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Ethereum 借入 DAI/USDC
    StablecoinDydx,
    /// Ethereum Iron Bank 可用且不是当前 provider
    IronBankCream,
    /// Ethereum 其他情况
    EthereumAave,
    /// Fantom 当前 provider 是 Cream
    FantomGeist,
    /// Fantom 其他情况
    FantomCream,
    /// Polygon / Arbitrum
    LayerTwoBalancer,
    /// 未知网络回退
    UnknownNetworkFallback,
    /// 旧版 flash close: DAI/USDC 且当前 provider 不是 dYdX
    LegacyDydx,
    /// 旧版 flash close 其他情况
    LegacyAave,
}

impl SelectionRule {
    pub fn description(&self) -> &'static str {
        match self {
            SelectionRule::StablecoinDydx => "borrowed DAI/USDC on ethereum",
            SelectionRule::IronBankCream => "iron bank available and not active",
            SelectionRule::EthereumAave => "ethereum default",
            SelectionRule::FantomGeist => "active provider is cream on fantom",
            SelectionRule::FantomCream => "fantom default",
            SelectionRule::LayerTwoBalancer => "balancer on polygon/arbitrum",
            SelectionRule::UnknownNetworkFallback => "unknown network fallback",
            SelectionRule::LegacyDydx => "legacy: DAI/USDC and dydx not active",
            SelectionRule::LegacyAave => "legacy default",
        }
    }
}

/// 未知网络的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownNetworkPolicy {
    /// 回退到指定来源
    Fallback(FlashloanProvider),
    /// 返回 `UnsupportedNetwork`
    Reject,
}

impl Default for UnknownNetworkPolicy {
    fn default() -> Self {
        UnknownNetworkPolicy::Fallback(FlashloanProvider::Balancer)
    }
}

/// 规则集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    /// 多链规则
    #[default]
    Current,
    /// 旧版 flash close 规则，只支持 Ethereum
    Legacy,
}

/// 选择器配置
#[derive(Debug, Clone, Default)]
pub struct FlashloanSelectorConfig {
    pub unknown_network: UnknownNetworkPolicy,
    pub rule_set: RuleSet,
}

/// 选择请求
#[derive(Debug, Clone)]
pub struct FlashloanRequest {
    /// 原始网络名称，未知名称按 `UnknownNetworkPolicy` 处理
    pub network: String,
    pub operation: FlashOperation,
    pub borrow_asset: AssetRef,
    pub active_provider: Address,
}

/// 选择结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashloanSelection {
    pub network: String,
    pub operation: FlashOperation,
    pub provider: FlashloanProvider,
    /// 传给 Flasher 的 flashnum
    pub index: ProviderIndex,
    pub rule: SelectionRule,
    /// 选出的来源就是 vault 当前的 provider (规则优先，只做标记)
    pub self_loan: bool,
}

/// 未收录的借入资产 (`None`) 不是 DAI/USDC
fn is_flash_stablecoin(asset: Option<&Asset>) -> bool {
    asset.map_or(false, |asset| asset.is_symbol("DAI") || asset.is_symbol("USDC"))
}

fn apply_rules(
    network: Network,
    borrow_asset: Option<&Asset>,
    active_provider: Address,
    contracts: &ProviderContracts,
) -> Result<(FlashloanProvider, SelectionRule), SelectorError> {
    let selected = match network {
        Network::Ethereum => {
            if is_flash_stablecoin(borrow_asset) {
                (FlashloanProvider::Dydx, SelectionRule::StablecoinDydx)
            } else if contracts
                .iron_bank
                .map_or(false, |iron_bank| iron_bank != active_provider)
            {
                (FlashloanProvider::Cream, SelectionRule::IronBankCream)
            } else {
                (FlashloanProvider::Aave, SelectionRule::EthereumAave)
            }
        }
        Network::Fantom => {
            let cream = contracts
                .cream
                .ok_or(SelectorError::MissingProviderContract {
                    network,
                    contract: "ProviderCream",
                })?;
            if cream == active_provider {
                (FlashloanProvider::Aave, SelectionRule::FantomGeist)
            } else {
                (FlashloanProvider::Cream, SelectionRule::FantomCream)
            }
        }
        Network::Polygon | Network::Arbitrum => {
            (FlashloanProvider::Balancer, SelectionRule::LayerTwoBalancer)
        }
    };
    Ok(selected)
}

fn apply_legacy_rules(
    network: Network,
    borrow_asset: Option<&Asset>,
    active_provider: Address,
    contracts: &ProviderContracts,
) -> Result<(FlashloanProvider, SelectionRule), SelectorError> {
    match network {
        Network::Ethereum => {
            let dydx = contracts
                .dydx
                .ok_or(SelectorError::MissingProviderContract {
                    network,
                    contract: "ProviderDYDX",
                })?;
            if is_flash_stablecoin(borrow_asset) && active_provider != dydx {
                Ok((FlashloanProvider::Dydx, SelectionRule::LegacyDydx))
            } else {
                Ok((FlashloanProvider::Aave, SelectionRule::LegacyAave))
            }
        }
        Network::Fantom | Network::Polygon | Network::Arbitrum => {
            Err(SelectorError::UnsupportedNetwork(network.name().to_string()))
        }
    }
}

/// 解析借入资产
///
/// 只有 Ethereum 的规则区分资产: 无法识别的符号视为输入错误，
/// 未收录的合约地址按非 DAI/USDC 处理。其他网络不校验资产。
fn resolve_borrow_asset(
    network: Network,
    asset: &AssetRef,
) -> Result<Option<&'static Asset>, SelectorError> {
    let resolved = asset.resolve(network);
    match (network, asset) {
        (Network::Ethereum, AssetRef::Symbol(_)) if resolved.is_none() => {
            Err(SelectorError::InvalidAssetReference {
                network,
                asset: asset.to_string(),
            })
        }
        _ => Ok(resolved),
    }
}

/// 按多链规则选择闪电贷来源 (纯函数)
pub fn select_flashloan_provider(
    network: Network,
    borrow_asset: &Asset,
    active_provider: Address,
    contracts: &ProviderContracts,
) -> Result<FlashloanProvider, SelectorError> {
    apply_rules(network, Some(borrow_asset), active_provider, contracts)
        .map(|(provider, _)| provider)
}

/// 按旧版 flash close 规则选择闪电贷来源 (纯函数)
pub fn select_liquidation_provider(
    network: Network,
    borrow_asset: &Asset,
    active_provider: Address,
    contracts: &ProviderContracts,
) -> Result<FlashloanProvider, SelectorError> {
    apply_legacy_rules(network, Some(borrow_asset), active_provider, contracts)
        .map(|(provider, _)| provider)
}

/// 闪电贷来源选择器
///
/// 不持有可变状态，可以通过 `Arc` 在多个任务间共享
#[derive(Debug, Clone, Default)]
pub struct FlashloanSelector {
    config: FlashloanSelectorConfig,
    registry: ProviderRegistry,
    contracts: HashMap<Network, ProviderContracts>,
}

impl FlashloanSelector {
    pub fn new(config: FlashloanSelectorConfig, registry: ProviderRegistry) -> Self {
        Self {
            config,
            registry,
            contracts: HashMap::new(),
        }
    }

    /// 设置某条链的 provider 合约地址
    pub fn with_contracts(mut self, network: Network, contracts: ProviderContracts) -> Self {
        self.contracts.insert(network, contracts);
        self
    }

    pub fn config(&self) -> &FlashloanSelectorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn contracts(&self, network: Network) -> ProviderContracts {
        self.contracts.get(&network).cloned().unwrap_or_default()
    }

    /// 选择闪电贷来源
    pub fn select(&self, request: &FlashloanRequest) -> Result<FlashloanSelection, SelectorError> {
        let network = match Network::from_name(&request.network) {
            Some(network) => network,
            None => return self.select_unknown(request),
        };

        let borrow_asset = resolve_borrow_asset(network, &request.borrow_asset)?;

        let contracts = self.contracts(network);
        let (provider, rule) = match self.config.rule_set {
            RuleSet::Current => {
                apply_rules(network, borrow_asset, request.active_provider, &contracts)?
            }
            RuleSet::Legacy => {
                apply_legacy_rules(network, borrow_asset, request.active_provider, &contracts)?
            }
        };

        let self_loan = contracts.address_of(provider) == Some(request.active_provider);
        if self_loan {
            warn!(
                target: SELECTOR_TARGET,
                "[{}] 闪电贷来源 {} 与当前 provider 相同: {:?}",
                network, provider.label_on(network), request.active_provider
            );
        }

        let index = self.registry.index_of(provider)?;

        debug!(
            target: SELECTOR_TARGET,
            "[{}] {} borrow={} active={:?} -> {} ({})",
            network,
            request.operation,
            borrow_asset.map_or_else(|| request.borrow_asset.to_string(), |a| a.symbol.clone()),
            request.active_provider,
            provider.label_on(network),
            rule.description()
        );

        Ok(FlashloanSelection {
            network: network.name().to_string(),
            operation: request.operation,
            provider,
            index,
            rule,
            self_loan,
        })
    }

    fn select_unknown(
        &self,
        request: &FlashloanRequest,
    ) -> Result<FlashloanSelection, SelectorError> {
        match self.config.unknown_network {
            UnknownNetworkPolicy::Fallback(provider) => {
                let index = self.registry.index_of(provider)?;
                warn!(
                    target: SELECTOR_TARGET,
                    "未知网络 {}，回退到 {}",
                    request.network, provider
                );
                Ok(FlashloanSelection {
                    network: request.network.clone(),
                    operation: request.operation,
                    provider,
                    index,
                    rule: SelectionRule::UnknownNetworkFallback,
                    self_loan: false,
                })
            }
            UnknownNetworkPolicy::Reject => {
                Err(SelectorError::UnsupportedNetwork(request.network.clone()))
            }
        }
    }

    /// 读取 vault 状态后选择闪电贷来源
    pub async fn select_for_vault<S>(
        &self,
        source: &S,
        network: &str,
        vault: Address,
        operation: FlashOperation,
    ) -> Result<FlashloanSelection>
    where
        S: VaultStateSource + ?Sized,
    {
        let snapshot = source
            .snapshot(vault)
            .await
            .with_context(|| format!("读取 vault 状态失败: {:?}", vault))?;

        let request = FlashloanRequest {
            network: network.to_string(),
            operation,
            borrow_asset: AssetRef::Address(snapshot.borrow_asset),
            active_provider: snapshot.active_provider,
        };
        let selection = self.select(&request)?;

        info!(
            target: SELECTOR_TARGET,
            "vault {:?}: {} 使用闪电贷来源 {} (index={})",
            vault, operation, selection.provider, selection.index
        );
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use models::VaultSnapshot;
    use std::str::FromStr;

    fn address(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    fn aave_provider() -> Address {
        address("0x0000000000000000000000000000000000000a0e")
    }

    fn dydx_provider() -> Address {
        address("0x0000000000000000000000000000000000000d1d")
    }

    fn iron_bank_provider() -> Address {
        address("0x00000000000000000000000000000000001b4a4c")
    }

    fn cream_provider() -> Address {
        address("0x000000000000000000000000000000000000c4ea")
    }

    fn asset(network: Network, symbol: &str) -> &'static Asset {
        AssetRef::Symbol(symbol.to_string()).resolve(network).unwrap()
    }

    fn eth_contracts() -> ProviderContracts {
        ProviderContracts::default()
            .with_iron_bank(iron_bank_provider())
            .with_dydx(dydx_provider())
    }

    fn fantom_contracts() -> ProviderContracts {
        ProviderContracts::default().with_cream(cream_provider())
    }

    fn selector() -> FlashloanSelector {
        FlashloanSelector::default()
            .with_contracts(Network::Ethereum, eth_contracts())
            .with_contracts(Network::Fantom, fantom_contracts())
    }

    fn request(network: &str, asset: &str, active: Address) -> FlashloanRequest {
        FlashloanRequest {
            network: network.to_string(),
            operation: FlashOperation::Refinance,
            borrow_asset: asset.parse().unwrap(),
            active_provider: active,
        }
    }

    #[test]
    fn test_ethereum_stablecoins_use_dydx() {
        for symbol in ["DAI", "USDC"] {
            for active in [aave_provider(), dydx_provider(), iron_bank_provider()] {
                let provider = select_flashloan_provider(
                    Network::Ethereum,
                    asset(Network::Ethereum, symbol),
                    active,
                    &eth_contracts(),
                )
                .unwrap();
                assert_eq!(provider, FlashloanProvider::Dydx);
            }
        }
    }

    #[test]
    fn test_ethereum_iron_bank_rule() {
        let wbtc = asset(Network::Ethereum, "WBTC");

        let provider =
            select_flashloan_provider(Network::Ethereum, wbtc, aave_provider(), &eth_contracts())
                .unwrap();
        assert_eq!(provider, FlashloanProvider::Cream);

        // Iron Bank 就是当前 provider 时不能从自身借
        let provider = select_flashloan_provider(
            Network::Ethereum,
            wbtc,
            iron_bank_provider(),
            &eth_contracts(),
        )
        .unwrap();
        assert_eq!(provider, FlashloanProvider::Aave);

        // 未部署 Iron Bank
        let provider = select_flashloan_provider(
            Network::Ethereum,
            wbtc,
            aave_provider(),
            &ProviderContracts::default(),
        )
        .unwrap();
        assert_eq!(provider, FlashloanProvider::Aave);
    }

    #[test]
    fn test_fantom_rule() {
        let dai = asset(Network::Fantom, "DAI");

        let provider =
            select_flashloan_provider(Network::Fantom, dai, cream_provider(), &fantom_contracts())
                .unwrap();
        assert_eq!(provider, FlashloanProvider::Aave);

        let provider =
            select_flashloan_provider(Network::Fantom, dai, aave_provider(), &fantom_contracts())
                .unwrap();
        assert_eq!(provider, FlashloanProvider::Cream);
    }

    #[test]
    fn test_fantom_requires_cream_contract() {
        let err = select_flashloan_provider(
            Network::Fantom,
            asset(Network::Fantom, "USDC"),
            aave_provider(),
            &ProviderContracts::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SelectorError::MissingProviderContract {
                network: Network::Fantom,
                contract: "ProviderCream",
            }
        );
    }

    #[test]
    fn test_layer_two_use_balancer() {
        for network in [Network::Polygon, Network::Arbitrum] {
            for candidate in models::assets_for(network) {
                let provider = select_flashloan_provider(
                    network,
                    candidate,
                    aave_provider(),
                    &ProviderContracts::default(),
                )
                .unwrap();
                assert_eq!(provider, FlashloanProvider::Balancer);
            }
        }
    }

    #[test]
    fn test_no_self_loan_on_cream_branches() {
        // Cream 分支从不在当前 provider 即 Cream 时返回 Cream
        let wbtc = asset(Network::Ethereum, "WBTC");
        let eth = asset(Network::Ethereum, "ETH");
        for borrow in [wbtc, eth] {
            let provider = select_flashloan_provider(
                Network::Ethereum,
                borrow,
                iron_bank_provider(),
                &eth_contracts(),
            )
            .unwrap();
            assert_ne!(provider, FlashloanProvider::Cream);
        }
        for borrow in models::assets_for(Network::Fantom) {
            let provider = select_flashloan_provider(
                Network::Fantom,
                borrow,
                cream_provider(),
                &fantom_contracts(),
            )
            .unwrap();
            assert_ne!(provider, FlashloanProvider::Cream);
        }
    }

    #[test]
    fn test_concrete_scenarios() {
        let selector = selector();

        let selection = selector
            .select(&request("ethereum", "DAI", dydx_provider()))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(1));
        assert_eq!(selection.rule, SelectionRule::StablecoinDydx);

        let selection = selector
            .select(&request("ethereum", "WBTC", aave_provider()))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(2));

        let selection = selector
            .select(&request("fantom", "DAI", cream_provider()))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(0));
        assert_eq!(selection.rule, SelectionRule::FantomGeist);

        let selection = selector
            .select(&request("polygon", "WETH", aave_provider()))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(3));
    }

    #[test]
    fn test_borrow_asset_by_address() {
        let selection = selector()
            .select(&request(
                "ethereum",
                "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                aave_provider(),
            ))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Dydx);
    }

    #[test]
    fn test_invalid_asset_reference() {
        let err = selector()
            .select(&request("ethereum", "DOGE", aave_provider()))
            .unwrap_err();
        assert_eq!(
            err,
            SelectorError::InvalidAssetReference {
                network: Network::Ethereum,
                asset: "DOGE".to_string(),
            }
        );
    }

    #[test]
    fn test_unlisted_asset_outside_ethereum() {
        let selector = selector();

        let selection = selector
            .select(&request("polygon", "USDT", aave_provider()))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(3));

        let selection = selector
            .select(&request(
                "arbitrum",
                "0x00000000000000000000000000000000000b0b0b",
                aave_provider(),
            ))
            .unwrap();
        assert_eq!(selection.index, ProviderIndex(3));

        let selection = selector
            .select(&request("fantom", "BOO", aave_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Cream);
    }

    #[test]
    fn test_ethereum_unlisted_address_is_not_stablecoin() {
        let selector = selector();

        // FEI (Fuse vault)
        let selection = selector
            .select(&request(
                "ethereum",
                "0x956F47F50A910163D8BF957Cf5846D573E7f87CA",
                aave_provider(),
            ))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Cream);
        assert_eq!(selection.index, ProviderIndex(2));

        // 资产表之外的地址
        let unlisted = "0x00000000000000000000000000000000000b0b0b";
        let selection = selector
            .select(&request("ethereum", unlisted, aave_provider()))
            .unwrap();
        assert_eq!(selection.rule, SelectionRule::IronBankCream);

        let selection = selector
            .select(&request("ethereum", unlisted, iron_bank_provider()))
            .unwrap();
        assert_eq!(selection.rule, SelectionRule::EthereumAave);
    }

    #[test]
    fn test_self_loan_flagged() {
        // 未配置 Iron Bank 时，当前 provider 为 Aave 的 vault 只能回到 Aave
        let selector = FlashloanSelector::default().with_contracts(
            Network::Ethereum,
            ProviderContracts::default()
                .with_aave(aave_provider())
                .with_dydx(dydx_provider()),
        );

        let selection = selector
            .select(&request("ethereum", "WBTC", aave_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Aave);
        assert_eq!(selection.rule, SelectionRule::EthereumAave);
        assert!(selection.self_loan);

        let selection = selector
            .select(&request("ethereum", "DAI", dydx_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Dydx);
        assert!(selection.self_loan);

        let selection = selector
            .select(&request("ethereum", "WBTC", iron_bank_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Aave);
        assert!(!selection.self_loan);
    }

    #[test]
    fn test_unknown_network_fallback() {
        for name in ["avalanche", "bsc", "optimism", ""] {
            let selection = selector()
                .select(&request(name, "DAI", aave_provider()))
                .unwrap();
            assert_eq!(selection.provider, FlashloanProvider::Balancer);
            assert_eq!(selection.index, ProviderIndex(3));
            assert_eq!(selection.rule, SelectionRule::UnknownNetworkFallback);
        }
    }

    #[test]
    fn test_unknown_network_reject() {
        let config = FlashloanSelectorConfig {
            unknown_network: UnknownNetworkPolicy::Reject,
            ..Default::default()
        };
        let selector = FlashloanSelector::new(config, ProviderRegistry::canonical());
        let err = selector
            .select(&request("avalanche", "DAI", aave_provider()))
            .unwrap_err();
        assert_eq!(err, SelectorError::UnsupportedNetwork("avalanche".to_string()));

        // 已知网络不受影响
        let selection = selector
            .select(&request("arbitrum", "USDC", aave_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Balancer);
    }

    #[test]
    fn test_unregistered_provider_rejected() {
        let listing = ProviderRegistry::parse_listing("0:aave,1:dydx,2:cream").unwrap();
        let registry = ProviderRegistry::from_deployed(&listing).unwrap();
        let selector = FlashloanSelector::new(FlashloanSelectorConfig::default(), registry);

        let err = selector
            .select(&request("polygon", "DAI", aave_provider()))
            .unwrap_err();
        assert_eq!(
            err,
            SelectorError::ProviderNotRegistered(FlashloanProvider::Balancer)
        );
    }

    #[test]
    fn test_legacy_rules() {
        let config = FlashloanSelectorConfig {
            rule_set: RuleSet::Legacy,
            ..Default::default()
        };
        let selector = FlashloanSelector::new(config, ProviderRegistry::canonical())
            .with_contracts(Network::Ethereum, eth_contracts());

        let selection = selector
            .select(&request("ethereum", "USDC", aave_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Dydx);
        assert_eq!(selection.rule, SelectionRule::LegacyDydx);

        // dYdX 已是当前 provider
        let selection = selector
            .select(&request("ethereum", "USDC", dydx_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Aave);

        let selection = selector
            .select(&request("ethereum", "ETH", aave_provider()))
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Aave);

        let err = selector
            .select(&request("fantom", "DAI", aave_provider()))
            .unwrap_err();
        assert_eq!(err, SelectorError::UnsupportedNetwork("fantom".to_string()));
    }

    #[test]
    fn test_legacy_requires_dydx_contract() {
        let err = select_liquidation_provider(
            Network::Ethereum,
            asset(Network::Ethereum, "DAI"),
            aave_provider(),
            &ProviderContracts::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SelectorError::MissingProviderContract { .. }));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let selector = selector();
        let req = request("ethereum", "WBTC", iron_bank_provider());
        let first = selector.select(&req).unwrap();
        let second = selector.select(&req).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_json() {
        let selection = selector()
            .select(&request("fantom", "USDC", aave_provider()))
            .unwrap();
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["index"], 2);
        assert_eq!(json["provider"], "Cream");
        assert_eq!(json["rule"], "fantom_cream");
        assert_eq!(json["operation"], "refinance");
        assert_eq!(json["self_loan"], false);
    }

    struct MockVaultSource {
        snapshots: HashMap<Address, VaultSnapshot>,
    }

    #[async_trait]
    impl VaultStateSource for MockVaultSource {
        async fn snapshot(&self, vault: Address) -> Result<VaultSnapshot> {
            self.snapshots
                .get(&vault)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("vault not found"))
        }
    }

    #[tokio::test]
    async fn test_select_for_vault() {
        let vault = address("0x00000000000000000000000000000000000000f1");
        let snapshot = VaultSnapshot {
            vault,
            collateral_asset: asset(Network::Fantom, "FTM").address,
            borrow_asset: asset(Network::Fantom, "DAI").address,
            active_provider: cream_provider(),
        };
        let source = MockVaultSource {
            snapshots: HashMap::from([(vault, snapshot)]),
        };

        let selection = selector()
            .select_for_vault(&source, "fantom", vault, FlashOperation::FlashClose)
            .await
            .unwrap();
        assert_eq!(selection.provider, FlashloanProvider::Aave);
        assert_eq!(selection.operation, FlashOperation::FlashClose);

        let missing = address("0x00000000000000000000000000000000000000f2");
        assert!(selector()
            .select_for_vault(&source, "fantom", missing, FlashOperation::FlashClose)
            .await
            .is_err());
    }
}
