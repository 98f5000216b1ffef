// apps/gw_cli/src/commands/stream.rs

//! 河流网络构建命令

use anyhow::{Context, Result};
use clap::Args;
use gw_topology::stream::StreamNetworkBuilder;
use std::path::PathBuf;
use tracing::info;

use super::Model;

/// 河流命令参数
#[derive(Args)]
pub struct StreamArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 连接数据同时以正负号编码写出
    #[arg(long)]
    pub signed: bool,
}

/// 执行河流命令
pub fn execute(args: StreamArgs) -> Result<()> {
    info!("=== 河流网络 ===");
    let model = Model::load(&args.config, args.output)?;
    let stream = model.config.stream.as_ref().context("配置中没有 stream 部分")?;

    let reach_path = model.input(&stream.reach_file);
    let table = gw_io::load_reach_table(&reach_path)
        .with_context(|| format!("无法读取河段表 {}", reach_path.display()))?;

    let network = StreamNetworkBuilder::new(stream.segments.clone())
        .with_junctions(stream.junctions.clone())
        .with_channel(stream.channel)
        .with_grid_shape(model.config.grid.shape())
        .build(&table)?;

    let conn = &network.connectivity;
    info!(
        "{} 个河段, {} 个 segment, {} 条自动连接, {} 个汇流点",
        conn.n_reaches(),
        table.segment_spans().len(),
        conn.automatic_links(),
        stream.junctions.len()
    );

    model.write("sfr_packagedata.json", &network.package_data)?;
    model.write("sfr_connectiondata.json", conn.links())?;
    if args.signed {
        let rows = conn.to_signed_rows().context("连接数据无法用正负号编码")?;
        model.write("sfr_connectiondata_signed.json", &rows)?;
    }

    Ok(())
}
