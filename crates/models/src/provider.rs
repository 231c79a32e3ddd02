use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::network::Network;

/// 闪电贷来源
///
/// 判别值即链上 Flasher 合约使用的 flashnum，顺序必须与部署合约一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlashloanProvider {
    /// Aave V2 (Fantom 上对应 Geist)
    Aave = 0,
    Dydx = 1,
    /// Cream (Ethereum 上对应 Iron Bank)
    Cream = 2,
    Balancer = 3,
    AaveV3 = 4,
}

impl FlashloanProvider {
    pub const ALL: [FlashloanProvider; 5] = [
        FlashloanProvider::Aave,
        FlashloanProvider::Dydx,
        FlashloanProvider::Cream,
        FlashloanProvider::Balancer,
        FlashloanProvider::AaveV3,
    ];

    pub fn index(&self) -> ProviderIndex {
        ProviderIndex(*self as u8)
    }

    /// 完整序号表中的来源
    pub fn from_index(index: ProviderIndex) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.index() == index)
    }

    /// 注册表中使用的标识
    pub fn key(&self) -> &'static str {
        match self {
            FlashloanProvider::Aave => "aave",
            FlashloanProvider::Dydx => "dydx",
            FlashloanProvider::Cream => "cream",
            FlashloanProvider::Balancer => "balancer",
            FlashloanProvider::AaveV3 => "aavev3",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key
            .trim()
            .to_lowercase()
            .replace(|c: char| c == '_' || c == '-' || c.is_whitespace(), "");
        match normalized.as_str() {
            "aave" | "aavev2" | "geist" => Some(FlashloanProvider::Aave),
            "dydx" => Some(FlashloanProvider::Dydx),
            "cream" | "ironbank" => Some(FlashloanProvider::Cream),
            "balancer" => Some(FlashloanProvider::Balancer),
            "aavev3" => Some(FlashloanProvider::AaveV3),
            _ => None,
        }
    }

    /// 同一槽位在不同网络上对应的协议名称
    pub fn label_on(&self, network: Network) -> &'static str {
        match (self, network) {
            (FlashloanProvider::Aave, Network::Fantom) => "Geist",
            (FlashloanProvider::Aave, _) => "Aave",
            (FlashloanProvider::Dydx, _) => "dYdX",
            (FlashloanProvider::Cream, Network::Ethereum) => "Iron Bank",
            (FlashloanProvider::Cream, _) => "Cream",
            (FlashloanProvider::Balancer, _) => "Balancer",
            (FlashloanProvider::AaveV3, _) => "Aave V3",
        }
    }
}

impl fmt::Display for FlashloanProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 链上 provider 注册表序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderIndex(pub u8);

impl fmt::Display for ProviderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 规则需要比对的 vault 侧 provider 合约地址
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContracts {
    /// ProviderAave (Ethereum) / ProviderGeist (Fantom)
    pub aave: Option<Address>,
    /// ProviderIronBank (Ethereum)
    pub iron_bank: Option<Address>,
    /// ProviderCream (Fantom)
    pub cream: Option<Address>,
    /// ProviderDYDX (Ethereum, 旧版 flash close 规则使用)
    pub dydx: Option<Address>,
}

impl ProviderContracts {
    pub fn with_aave(mut self, address: Address) -> Self {
        self.aave = Some(address);
        self
    }

    pub fn with_iron_bank(mut self, address: Address) -> Self {
        self.iron_bank = Some(address);
        self
    }

    pub fn with_cream(mut self, address: Address) -> Self {
        self.cream = Some(address);
        self
    }

    pub fn with_dydx(mut self, address: Address) -> Self {
        self.dydx = Some(address);
        self
    }

    /// 返回与闪电贷来源对应的 vault 侧合约地址 (如已配置)
    pub fn address_of(&self, provider: FlashloanProvider) -> Option<Address> {
        match provider {
            FlashloanProvider::Aave => self.aave,
            FlashloanProvider::Cream => self.iron_bank.or(self.cream),
            FlashloanProvider::Dydx => self.dydx,
            _ => None,
        }
    }
}
