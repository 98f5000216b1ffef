// apps/gw_cli/src/commands/exchange.rs

//! 嵌套网格交换构建命令

use anyhow::{Context, Result};
use clap::Args;
use gw_topology::exchange::NestedExchangeBuilder;
use std::path::PathBuf;
use tracing::info;

use super::Model;

/// 交换命令参数
#[derive(Args)]
pub struct ExchangeArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行交换命令
pub fn execute(args: ExchangeArgs) -> Result<()> {
    info!("=== 嵌套网格交换 ===");
    let model = Model::load(&args.config, args.output)?;
    let exchange = model.config.exchange.as_ref().context("配置中没有 exchange 部分")?;
    let dis = model.config.discretization();

    let builder = NestedExchangeBuilder::new(
        model.config.grid.nlay,
        dis.delr,
        dis.delc,
        exchange.child_delr,
        exchange.child_delc,
        exchange.placement,
    );

    let records = builder.build()?;
    info!("子网格 {:?}, {} 条交换记录", builder.child_shape(), records.len());
    model.write("exchange.json", &records)?;

    if exchange.deactivate_footprint {
        let mut idomain = model.idomain()?;
        let n = builder.deactivate_child_footprint(&mut idomain)?;
        info!("关闭外层网格 {} 个被替代单元", n);
        model.write("idomain_outer.json", &idomain)?;
    }

    Ok(())
}
