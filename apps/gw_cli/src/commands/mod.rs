// apps/gw_cli/src/commands/mod.rs

//! 子命令实现

pub mod exchange;
pub mod info;
pub mod lake;
pub mod stream;
pub mod validate;
pub mod well;

use anyhow::{Context, Result};
use gw_config::ModelConfig;
use gw_topology::grid::IDomain;
use std::path::{Path, PathBuf};
use tracing::info;

/// 已加载的模型配置，相对路径按配置文件所在目录解析
pub struct Model {
    /// 配置
    pub config: ModelConfig,
    base_dir: PathBuf,
    output_dir: PathBuf,
}

impl Model {
    /// 加载并验证配置；`output` 覆盖配置中的输出目录
    pub fn load(path: &Path, output: Option<PathBuf>) -> Result<Self> {
        let config = ModelConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let output_dir = output.unwrap_or_else(|| base_dir.join(&config.output.directory));
        info!("模型: {} ({:?})", config.name, config.grid.shape());
        Ok(Self {
            config,
            base_dir,
            output_dir,
        })
    }

    /// 解析输入文件路径
    pub fn input(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// 输出文件路径
    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// 活动域：配置了文件时读取，否则全部活动
    pub fn idomain(&self) -> Result<IDomain> {
        let shape = self.config.grid.shape();
        match &self.config.grid.idomain_file {
            Some(file) => {
                let path = self.input(file);
                gw_io::load_idomain(&path, shape)
                    .with_context(|| format!("无法读取活动域 {}", path.display()))
            }
            None => Ok(IDomain::all_active(shape.0, shape.1, shape.2)),
        }
    }

    /// 写出 JSON
    pub fn write<T: serde::Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.output(file_name);
        gw_io::write_json(&path, value, self.config.output.pretty)
            .with_context(|| format!("无法写出 {}", path.display()))?;
        info!("已写出 {}", path.display());
        Ok(path)
    }
}
