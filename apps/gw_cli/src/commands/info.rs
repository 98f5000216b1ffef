// apps/gw_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示模型配置摘要或默认参数。

use anyhow::Result;
use clap::Args;
use gw_topology::lake::LakeConnectivityBuilder;
use gw_topology::stream::ChannelParams;
use std::path::PathBuf;
use tracing::info;

use super::Model;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示默认参数
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== GwLink 信息 ===");
    println!("GwLink CLI 版本: {}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.config {
        let model = Model::load(path, None)?;
        print_model_summary(&model);
    }

    if args.defaults || args.config.is_none() {
        println!();
        print_defaults();
    }

    Ok(())
}

fn print_model_summary(model: &Model) {
    let config = &model.config;
    let dis = config.discretization();
    let (nlay, nrow, ncol) = dis.shape();

    println!("\n=== 模型 {} ===", config.name);
    println!("网格: {} 层 x {} 行 x {} 列", nlay, nrow, ncol);
    for k in 0..nlay {
        if let Some(top) = dis.layer_top(k) {
            println!("  第 {} 层: 顶 {} 底 {}", k, top, dis.botm[k]);
        }
    }
    println!("输出目录: {}", model.output("").display());

    if let Some(lake) = &config.lake {
        println!(
            "湖泊: {} (第 {} 层, 渗漏系数 {})",
            lake.lake_file.display(),
            lake.lake_layer,
            lake.leakance
        );
    }
    if let Some(stream) = &config.stream {
        println!(
            "河流: {} ({} 个 segment, {} 个汇流点)",
            stream.reach_file.display(),
            stream.segments.len(),
            stream.junctions.len()
        );
    }
    if let Some(exchange) = &config.exchange {
        let p = &exchange.placement;
        println!(
            "嵌套子网格: 行 [{}, {}) 列 [{}, {}) 细化比 {}",
            p.row_offset,
            p.row_end(),
            p.col_offset,
            p.col_end(),
            p.refinement
        );
    }
    if !config.wells.is_empty() {
        println!("多含水层井: {} 口", config.wells.len());
    }
}

fn print_defaults() {
    println!("=== 默认参数 ===");
    println!("湖床渗漏系数: {}", LakeConnectivityBuilder::DEFAULT_LEAKANCE);

    let c = ChannelParams::default();
    println!("\n河道参数:");
    println!("  河宽: {}", c.width);
    println!("  河床厚度: {}", c.bed_thickness);
    println!("  河床渗透系数: {}", c.bed_k);
    println!("  Manning 糙率: {}", c.manning);
    println!("  上游入流比例: {}", c.upstream_fraction);
    println!("  分流数: {}", c.n_diversions);
}
