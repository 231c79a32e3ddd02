use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::network::Network;

/// 资产信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
    /// 原生代币 (ETH/FTM/MATIC) 在合约中以占位地址表示
    pub is_native: bool,
}

impl Asset {
    pub fn new(symbol: &str, decimals: u8, address: Address, is_native: bool) -> Self {
        Self {
            symbol: symbol.to_string(),
            decimals,
            address,
            is_native,
        }
    }

    /// 按符号比较 (大小写不敏感)
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol)
    }
}

/// 调用方传入的资产引用: 符号或合约地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetRef {
    Symbol(String),
    Address(Address),
}

impl AssetRef {
    /// 在指定网络的资产表中解析
    pub fn resolve(&self, network: Network) -> Option<&'static Asset> {
        let assets = assets_for(network);
        match self {
            AssetRef::Symbol(symbol) => assets.iter().find(|a| a.is_symbol(symbol)),
            AssetRef::Address(address) => assets.iter().find(|a| a.address == *address),
        }
    }
}

impl FromStr for AssetRef {
    type Err = std::convert::Infallible;

    /// `0x` 开头且能解析为地址的按地址处理，其余按符号处理
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") {
            if let Ok(address) = Address::from_str(trimmed) {
                return Ok(AssetRef::Address(address));
            }
        }
        Ok(AssetRef::Symbol(trimmed.to_string()))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Symbol(symbol) => f.write_str(symbol),
            AssetRef::Address(address) => write!(f, "{:?}", address),
        }
    }
}

/// 获取网络的资产表
pub fn assets_for(network: Network) -> &'static [Asset] {
    match network {
        Network::Ethereum => eth_assets::ALL.as_slice(),
        Network::Fantom => fantom_assets::ALL.as_slice(),
        Network::Polygon => polygon_assets::ALL.as_slice(),
        Network::Arbitrum => arbitrum_assets::ALL.as_slice(),
    }
}

fn addr(s: &str) -> Address {
    Address::from_str(s).expect("static asset address")
}

/// Ethereum Mainnet 资产
pub mod eth_assets {
    use super::{addr, Asset};

    lazy_static::lazy_static! {
        pub static ref ALL: Vec<Asset> = vec![
            Asset::new("DAI", 18, addr("0x6B175474E89094C44Da98b954EedeAC495271d0F"), false),
            Asset::new("USDC", 6, addr("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), false),
            Asset::new("USDT", 6, addr("0xdAC17F958D2ee523a2206206994597C13D831ec7"), false),
            Asset::new("ETH", 18, addr("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"), true),
            Asset::new("WBTC", 8, addr("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"), false),
            Asset::new("FEI", 18, addr("0x956F47F50A910163D8BF957Cf5846D573E7f87CA"), false),
        ];
    }
}

/// Fantom Opera 资产
pub mod fantom_assets {
    use super::{addr, Asset};

    lazy_static::lazy_static! {
        pub static ref ALL: Vec<Asset> = vec![
            Asset::new("DAI", 18, addr("0x8D11eC38a3EB5E956B052f67Da8Bdc9bef8Abf3E"), false),
            Asset::new("USDC", 6, addr("0x04068DA6C83AFCFA0e13ba15A6696662335D5B75"), false),
            Asset::new("FTM", 18, addr("0xFFfFfFffFFfffFFfFFfFFFFFffFFFffffFfFFFfF"), true),
            Asset::new("BTC", 8, addr("0x321162Cd933E2Be498Cd2267a90534A804051b11"), false),
            Asset::new("ETH", 18, addr("0x74b23882a30290451A17c44f4F05243b6b58C76d"), false),
        ];
    }
}

/// Polygon PoS 资产
pub mod polygon_assets {
    use super::{addr, Asset};

    lazy_static::lazy_static! {
        pub static ref ALL: Vec<Asset> = vec![
            Asset::new("DAI", 18, addr("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"), false),
            Asset::new("USDC", 6, addr("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), false),
            Asset::new("MATIC", 18, addr("0xFFfFfFffFFfffFFfFFfFFFFFffFFFffffFfFFFfF"), true),
            Asset::new("WETH", 18, addr("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"), false),
            Asset::new("WBTC", 8, addr("0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6"), false),
        ];
    }
}

/// Arbitrum One 资产
pub mod arbitrum_assets {
    use super::{addr, Asset};

    lazy_static::lazy_static! {
        pub static ref ALL: Vec<Asset> = vec![
            Asset::new("DAI", 18, addr("0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), false),
            Asset::new("USDC", 6, addr("0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"), false),
            Asset::new("ETH", 18, addr("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"), true),
            Asset::new("WBTC", 8, addr("0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f"), false),
        ];
    }
}
