// apps/gw_cli/src/commands/well.rs

//! 多含水层井连接构建命令

use anyhow::{bail, Result};
use clap::Args;
use gw_topology::well::build_well_connections;
use std::path::PathBuf;
use tracing::info;

use super::Model;

/// 井命令参数
#[derive(Args)]
pub struct WellArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行井命令
pub fn execute(args: WellArgs) -> Result<()> {
    info!("=== 多含水层井 ===");
    let model = Model::load(&args.config, args.output)?;
    if model.config.wells.is_empty() {
        bail!("配置中没有 wells");
    }

    let idomain = model.idomain()?;
    let out = build_well_connections(&model.config.wells, model.config.grid.shape(), Some(&idomain))?;
    info!("{} 口井, {} 条连接", out.package_data.len(), out.connections.len());

    model.write("maw_packagedata.json", &out.package_data)?;
    model.write("maw_connectiondata.json", &out.connections)?;
    Ok(())
}
