use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 需要闪电贷的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashOperation {
    /// 通过闪电贷把债务迁移到另一个 provider
    Refinance,
    /// 卖出部分抵押品偿还债务
    FlashClose,
}

impl FlashOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashOperation::Refinance => "refinance",
            FlashOperation::FlashClose => "flash_close",
        }
    }
}

impl FromStr for FlashOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "refinance" => Ok(FlashOperation::Refinance),
            "flash_close" | "flashclose" => Ok(FlashOperation::FlashClose),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

impl fmt::Display for FlashOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vault 状态快照，由调用方在选择前读取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub vault: Address,
    pub collateral_asset: Address,
    pub borrow_asset: Address,
    /// 当前持有抵押品和债务的 provider 合约
    pub active_provider: Address,
}
