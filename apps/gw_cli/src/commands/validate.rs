// apps/gw_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 读取配置及其引用的输入文件，运行各构建器的验证但不写出任何记录。

use anyhow::{bail, Result};
use clap::Args;
use gw_foundation::ValidationReport;
use gw_topology::exchange::NestedExchangeBuilder;
use gw_topology::lake::LakeConnectivityBuilder;
use gw_topology::stream::StreamNetworkBuilder;
use gw_topology::well::validate_wells;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::Model;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_report(&mut self, section: &str, report: &ValidationReport) {
        for e in &report.errors {
            self.errors.push(format!("[{}] {}", section, e));
        }
        for w in &report.warnings {
            self.warnings.push(format!("[{}] {}", section, w));
        }
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== GwLink 配置验证 ===");
    println!("\n检查配置文件: {}", args.config.display());

    let model = match Model::load(&args.config, None) {
        Ok(m) => m,
        Err(e) => {
            println!("  ✗ {:#}", e);
            bail!("验证失败：配置无效");
        }
    };
    println!("  ✓ 配置文件格式有效");

    let mut result = ValidationResult::default();
    validate_lake(&model, &mut result);
    validate_stream(&model, &mut result);
    validate_exchange(&model, &mut result);
    if !model.config.wells.is_empty() {
        match model.idomain() {
            Ok(idomain) => {
                let report = validate_wells(&model.config.wells, model.config.grid.shape(), Some(&idomain));
                result.add_report("wells", &report);
            }
            Err(e) => result.add_error(format!("[wells] {:#}", e)),
        }
    }

    print_validation_result(&result, args.strict)
}

fn validate_lake(model: &Model, result: &mut ValidationResult) {
    let Some(lake) = &model.config.lake else {
        return;
    };
    println!("\n检查湖泊: {}", lake.lake_file.display());

    let lakes = match gw_io::load_int_array_2d(&model.input(&lake.lake_file)) {
        Ok(g) => g,
        Err(e) => return result.add_error(format!("[lake] {}", e)),
    };
    let idomain = match model.idomain() {
        Ok(d) => d,
        Err(e) => return result.add_error(format!("[lake] {:#}", e)),
    };
    let (Some(delr), Some(delc)) = (model.config.grid.delr.uniform(), model.config.grid.delc.uniform()) else {
        return result.add_error("[lake] 湖泊连接要求均匀行列间距");
    };

    let mut builder = LakeConnectivityBuilder::new(delr, delc)
        .with_leakance(lake.leakance)
        .with_lake_layer(lake.lake_layer);
    if !lake.stages.is_empty() {
        builder = builder.with_lake_count(lake.stages.len());
    }
    match builder.validate(&lakes, &idomain) {
        Ok(n) => println!("  ✓ {} 个湖泊", n),
        Err(e) => result.add_error(format!("[lake] {}", e)),
    }
}

fn validate_stream(model: &Model, result: &mut ValidationResult) {
    let Some(stream) = &model.config.stream else {
        return;
    };
    println!("\n检查河段表: {}", stream.reach_file.display());

    let table = match gw_io::load_reach_table(&model.input(&stream.reach_file)) {
        Ok(t) => t,
        Err(e) => return result.add_error(format!("[stream] {}", e)),
    };
    let report = StreamNetworkBuilder::new(stream.segments.clone())
        .with_junctions(stream.junctions.clone())
        .with_channel(stream.channel)
        .with_grid_shape(model.config.grid.shape())
        .validate(&table);
    if report.is_valid() {
        println!("  ✓ {} 个河段, {} 个 segment", table.len(), table.segment_spans().len());
    }
    result.add_report("stream", &report);
}

fn validate_exchange(model: &Model, result: &mut ValidationResult) {
    let Some(exchange) = &model.config.exchange else {
        return;
    };
    println!("\n检查嵌套子网格");

    let dis = model.config.discretization();
    let builder = NestedExchangeBuilder::new(
        model.config.grid.nlay,
        dis.delr,
        dis.delc,
        exchange.child_delr,
        exchange.child_delc,
        exchange.placement,
    );
    let report = builder.validate();
    if report.is_valid() {
        println!("  ✓ 子网格 {:?}", builder.child_shape());
    }
    result.add_report("exchange", &report);
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
