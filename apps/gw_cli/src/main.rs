// apps/gw_cli/src/main.rs

//! GwLink 命令行界面
//!
//! 从 JSON 模型配置和表格输入构建湖泊、河流、嵌套网格交换和
//! 多含水层井的包配置记录，并以 JSON 写出。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// GwLink 地下水模型拓扑构建工具
#[derive(Parser)]
#[command(name = "gw_cli")]
#[command(author = "GwLink Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "GwLink connectivity builders for structured groundwater models", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 构建湖泊连接
    Lake(commands::lake::LakeArgs),
    /// 构建河流网络
    Stream(commands::stream::StreamArgs),
    /// 构建嵌套网格交换
    Exchange(commands::exchange::ExchangeArgs),
    /// 构建多含水层井连接
    Well(commands::well::WellArgs),
    /// 验证配置和输入
    Validate(commands::validate::ValidateArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {}", e))?;

    // 执行命令
    match cli.command {
        Commands::Lake(args) => commands::lake::execute(args),
        Commands::Stream(args) => commands::stream::execute(args),
        Commands::Exchange(args) => commands::exchange::execute(args),
        Commands::Well(args) => commands::well::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
