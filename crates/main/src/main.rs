//! 闪电贷来源选择工具
//!
//! 使用方法:
//!   # 按参数选择
//!   fuji_flashloan select --network ethereum --asset WBTC --active-provider 0x...
//!
//!   # 读取 vault 状态后选择
//!   fuji_flashloan vault --vault 0x... --operation flash-close
//!
//!   # 查看并校验 provider 注册表
//!   fuji_flashloan registry

mod bootstrap;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config_crate::AppConfig;
use ethers::providers::{Http, Provider};
use ethers::types::Address;
use lending::{ContractVaultReader, FlashloanRequest, FlashloanSelection, FlashloanSelector};
use models::{AssetRef, FlashOperation, Network};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use utils::LoggerManager;

use crate::bootstrap::{build_selector, setup_panic_hook};

#[derive(Parser)]
#[command(name = "fuji_flashloan")]
#[command(about = "为 refinance / flash close 选择闪电贷来源")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 按给定的 vault 状态选择
    Select {
        /// 网络名称 (默认使用 NETWORK)
        #[arg(short, long)]
        network: Option<String>,

        /// 借入资产符号或地址
        #[arg(short, long)]
        asset: String,

        /// 当前 provider 合约地址
        #[arg(long)]
        active_provider: String,

        /// 覆盖 ProviderAave / ProviderGeist 地址
        #[arg(long)]
        aave: Option<String>,

        /// 覆盖 ProviderIronBank 地址
        #[arg(long)]
        iron_bank: Option<String>,

        /// 覆盖 ProviderCream 地址
        #[arg(long)]
        cream: Option<String>,

        /// 覆盖 ProviderDYDX 地址
        #[arg(long)]
        dydx: Option<String>,

        /// refinance 或 flash-close
        #[arg(short, long, default_value = "refinance")]
        operation: String,

        /// 以 JSON 输出
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 通过 RPC 读取 vault 状态后选择
    Vault {
        /// Vault 合约地址
        #[arg(long)]
        vault: String,

        /// 网络名称 (默认使用 NETWORK)
        #[arg(short, long)]
        network: Option<String>,

        /// RPC 地址 (默认使用 RPC_URL)
        #[arg(long)]
        rpc_url: Option<String>,

        /// refinance 或 flash-close
        #[arg(short, long, default_value = "refinance")]
        operation: String,

        /// 以 JSON 输出
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 显示并校验 provider 注册表
    Registry,
}

fn parse_address(raw: &str, what: &str) -> Result<Address> {
    Address::from_str(raw.trim()).with_context(|| format!("Invalid {} address: {}", what, raw))
}

fn parse_operation(raw: &str) -> Result<FlashOperation> {
    raw.parse::<FlashOperation>().map_err(|e| anyhow!(e))
}

fn print_selection(selection: &FlashloanSelection, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(selection)?);
    } else {
        let label = Network::from_name(&selection.network)
            .map(|network| selection.provider.label_on(network))
            .unwrap_or_else(|| selection.provider.key());
        println!(
            "{} ({}) - {}",
            selection.index,
            label,
            selection.rule.description()
        );
        if selection.self_loan {
            println!("警告: 闪电贷来源与当前 provider 相同");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_select(
    selector: FlashloanSelector,
    network: String,
    asset: &str,
    active_provider: &str,
    aave: Option<&str>,
    iron_bank: Option<&str>,
    cream: Option<&str>,
    dydx: Option<&str>,
    operation: &str,
    json: bool,
) -> Result<()> {
    let mut selector = selector;

    // 命令行覆盖的合约地址只作用于指定网络
    if let Some(known) = Network::from_name(&network) {
        let mut contracts = selector.contracts(known);
        if let Some(raw) = aave {
            contracts.aave = Some(parse_address(raw, "aave")?);
        }
        if let Some(raw) = iron_bank {
            contracts.iron_bank = Some(parse_address(raw, "iron bank")?);
        }
        if let Some(raw) = cream {
            contracts.cream = Some(parse_address(raw, "cream")?);
        }
        if let Some(raw) = dydx {
            contracts.dydx = Some(parse_address(raw, "dydx")?);
        }
        selector = selector.with_contracts(known, contracts);
    }

    let request = FlashloanRequest {
        network,
        operation: parse_operation(operation)?,
        borrow_asset: AssetRef::from_str(asset)?,
        active_provider: parse_address(active_provider, "active provider")?,
    };

    let selection = selector.select(&request)?;
    print_selection(&selection, json)
}

async fn run_vault(
    selector: &FlashloanSelector,
    network: &str,
    vault: &str,
    rpc_url: &str,
    operation: &str,
    json: bool,
) -> Result<()> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .with_context(|| format!("Provider 创建失败: {}", rpc_url))?;
    let reader = ContractVaultReader::new(Arc::new(provider));

    let selection = selector
        .select_for_vault(
            &reader,
            network,
            parse_address(vault, "vault")?,
            parse_operation(operation)?,
        )
        .await?;
    print_selection(&selection, json)
}

fn run_registry(selector: &FlashloanSelector) {
    for (index, provider) in selector.registry().iter() {
        let labels: Vec<String> = Network::ALL
            .iter()
            .map(|network| format!("{}={}", network, provider.label_on(*network)))
            .collect();
        println!("{}  {:<9} {}", index, provider.key(), labels.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 加载配置
    let config = AppConfig::load()?;

    // 初始化日志系统
    let _logger = LoggerManager::init(&config.log.dir, &config.log.level);
    setup_panic_hook();

    info!("默认网络: {}", config.network);
    let selector = build_selector(&config)?;

    match cli.command {
        Commands::Select {
            network,
            asset,
            active_provider,
            aave,
            iron_bank,
            cream,
            dydx,
            operation,
            json,
        } => run_select(
            selector,
            network.unwrap_or_else(|| config.network.clone()),
            &asset,
            &active_provider,
            aave.as_deref(),
            iron_bank.as_deref(),
            cream.as_deref(),
            dydx.as_deref(),
            &operation,
            json,
        ),
        Commands::Vault {
            vault,
            network,
            rpc_url,
            operation,
            json,
        } => {
            let rpc_url = rpc_url
                .or_else(|| config.rpc_url.clone())
                .ok_or_else(|| anyhow!("RPC_URL not set"))?;
            let network = network.unwrap_or_else(|| config.network.clone());
            run_vault(&selector, &network, &vault, &rpc_url, &operation, json).await
        }
        Commands::Registry => {
            run_registry(&selector);
            Ok(())
        }
    }
}
