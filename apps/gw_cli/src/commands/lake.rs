// apps/gw_cli/src/commands/lake.rs

//! 湖泊连接构建命令

use anyhow::{Context, Result};
use clap::Args;
use gw_topology::lake::{deactivate_lake_cells, lake_package_data, LakeConnectivityBuilder};
use std::path::PathBuf;
use tracing::{info, warn};

use super::Model;

/// 湖泊命令参数
#[derive(Args)]
pub struct LakeArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行湖泊命令
pub fn execute(args: LakeArgs) -> Result<()> {
    info!("=== 湖泊连接 ===");
    let model = Model::load(&args.config, args.output)?;
    let lake = model.config.lake.as_ref().context("配置中没有 lake 部分")?;
    let grid = &model.config.grid;

    let lake_path = model.input(&lake.lake_file);
    let lakes = gw_io::load_int_array_2d(&lake_path)
        .with_context(|| format!("无法读取湖泊网格 {}", lake_path.display()))?;
    let mut idomain = model.idomain()?;

    let delr = grid.delr.uniform().context("湖泊连接要求均匀列宽")?;
    let delc = grid.delc.uniform().context("湖泊连接要求均匀行宽")?;
    let mut builder = LakeConnectivityBuilder::new(delr, delc)
        .with_leakance(lake.leakance)
        .with_lake_layer(lake.lake_layer);
    if !lake.stages.is_empty() {
        builder = builder.with_lake_count(lake.stages.len());
    }

    let conns = builder.build(&lakes, &idomain)?;
    info!("{} 个湖泊, {} 条连接, 每湖 {:?}", conns.n_lakes(), conns.len(), conns.counts);
    model.write("lake_connections.json", &conns.records)?;

    if lake.stages.is_empty() {
        warn!("未给出 lake.stages，跳过湖泊包数据");
    } else {
        let names: Vec<String> = (0..conns.n_lakes()).map(|l| lake.boundname(l)).collect();
        let package_data = lake_package_data(&conns, &lake.stages, &names)?;
        model.write("lake_packagedata.json", &package_data)?;
    }

    if lake.deactivate_cells {
        let n = deactivate_lake_cells(&mut idomain, &lakes, lake.lake_layer)?;
        info!("关闭第 {} 层 {} 个湖泊单元", lake.lake_layer, n);
        model.write("idomain.json", &idomain)?;
    }

    Ok(())
}
