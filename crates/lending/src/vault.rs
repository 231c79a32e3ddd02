//! Vault 状态读取
//!
//! 选择器只接收快照，链上读取集中在这里

use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::types::Address;
use models::VaultSnapshot;
use std::sync::Arc;
use tracing::debug;

use crate::SELECTOR_TARGET;

// Fuji Vault ABI (只包含选择器需要的读取方法)
abigen!(
    IFujiVault,
    r#"[
        function activeProvider() external view returns (address)
        function vAssets() external view returns (address collateralAsset, address borrowAsset, uint64 collateralID, uint64 borrowID)
    ]"#
);

/// Vault 状态来源
#[async_trait]
pub trait VaultStateSource: Send + Sync {
    async fn snapshot(&self, vault: Address) -> Result<VaultSnapshot>;
}

/// 通过合约调用读取 vault 状态
pub struct ContractVaultReader<M: Middleware> {
    provider: Arc<M>,
}

impl<M: Middleware + 'static> ContractVaultReader<M> {
    pub fn new(provider: Arc<M>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<M: Middleware + 'static> VaultStateSource for ContractVaultReader<M> {
    async fn snapshot(&self, vault: Address) -> Result<VaultSnapshot> {
        let contract = IFujiVault::new(vault, self.provider.clone());

        // 分开调用避免生命周期问题
        let active_call = contract.active_provider();
        let assets_call = contract.v_assets();

        let (active_provider, (collateral_asset, borrow_asset, _, _)) =
            tokio::try_join!(active_call.call(), assets_call.call())?;

        debug!(
            target: SELECTOR_TARGET,
            "vault {:?}: active={:?}, borrow={:?}",
            vault, active_provider, borrow_asset
        );

        Ok(VaultSnapshot {
            vault,
            collateral_asset,
            borrow_asset,
            active_provider,
        })
    }
}
