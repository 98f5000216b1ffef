// crates/gw_config/src/model_config.rs

//! ModelConfig - 模型拓扑构建配置
//!
//! 描述一个结构化地下水模型的网格，以及需要构建的湖泊、河流、
//! 嵌套网格交换和多含水层井。各部分可选，缺省时不构建对应记录。
//! 文件路径相对于配置文件所在目录解析。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gw_topology::exchange::ChildPlacement;
use gw_topology::grid::Discretization;
use gw_topology::stream::{ChannelParams, Junction, SegmentElevation};
use gw_topology::well::WellSpec;

use crate::error::ConfigError;

/// 模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 模型名称
    #[serde(default = "default_name")]
    pub name: String,

    /// 网格
    pub grid: GridConfig,

    /// 湖泊
    #[serde(default)]
    pub lake: Option<LakeConfig>,

    /// 河流
    #[serde(default)]
    pub stream: Option<StreamConfig>,

    /// 嵌套子网格
    #[serde(default)]
    pub exchange: Option<ExchangeConfig>,

    /// 多含水层井
    #[serde(default)]
    pub wells: Vec<WellSpec>,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String { "model".to_string() }

/// 行列间距：标量表示均匀间距
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    /// 均匀间距
    Uniform(f64),
    /// 逐行/逐列间距
    Varying(Vec<f64>),
}

impl Spacing {
    /// 展开为长度 `n` 的数组
    pub fn values(&self, n: usize) -> Vec<f64> {
        match self {
            Self::Uniform(d) => vec![*d; n],
            Self::Varying(v) => v.clone(),
        }
    }

    /// 均匀间距值；逐项给出但全部相等时同样返回
    pub fn uniform(&self) -> Option<f64> {
        match self {
            Self::Uniform(d) => Some(*d),
            Self::Varying(v) => {
                let first = *v.first()?;
                v.iter().all(|&d| d == first).then_some(first)
            }
        }
    }

    fn check(&self, key: &str, n: usize) -> Result<(), ConfigError> {
        if let Self::Varying(v) = self {
            if v.len() != n {
                return Err(ConfigError::invalid(
                    key,
                    v.len(),
                    format!("间距个数必须等于 {}", n),
                ));
            }
        }
        for d in self.values(n) {
            if !(d > 0.0 && d.is_finite()) {
                return Err(ConfigError::invalid(key, d, "间距必须为有限正数"));
            }
        }
        Ok(())
    }
}

/// 网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// 层数
    pub nlay: usize,
    /// 行数
    pub nrow: usize,
    /// 列数
    pub ncol: usize,
    /// 列宽
    pub delr: Spacing,
    /// 行宽
    pub delc: Spacing,
    /// 模型顶面高程
    pub top: f64,
    /// 各层底面高程
    pub botm: Vec<f64>,
    /// 活动域文件（一个二维整数数组，各层相同）
    #[serde(default)]
    pub idomain_file: Option<PathBuf>,
}

impl GridConfig {
    /// 网格形状 (nlay, nrow, ncol)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nlay, self.nrow, self.ncol)
    }
}

/// 湖泊配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LakeConfig {
    /// 湖泊归属网格文件
    pub lake_file: PathBuf,

    /// 湖床渗漏系数
    #[serde(default = "default_leakance")]
    pub leakance: f64,

    /// 湖泊所在层
    #[serde(default)]
    pub lake_layer: usize,

    /// 各湖泊初始水位
    #[serde(default)]
    pub stages: Vec<f64>,

    /// 各湖泊边界名，缺省时为 `lake1`、`lake2`...
    #[serde(default)]
    pub names: Vec<String>,

    /// 是否关闭湖泊所在层的湖泊单元
    #[serde(default = "default_true")]
    pub deactivate_cells: bool,
}

fn default_leakance() -> f64 { 1.0 }
fn default_true() -> bool { true }

impl LakeConfig {
    /// 第 `lake` 个湖泊的边界名
    pub fn boundname(&self, lake: usize) -> String {
        self.names
            .get(lake)
            .cloned()
            .unwrap_or_else(|| format!("lake{}", lake + 1))
    }
}

/// 河流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// 河段表 CSV 文件
    pub reach_file: PathBuf,

    /// segment 端点高程
    pub segments: Vec<SegmentElevation>,

    /// 汇流点（零基河段序号）
    #[serde(default)]
    pub junctions: Vec<Junction>,

    /// 河道参数
    #[serde(default)]
    pub channel: ChannelParams,
}

/// 嵌套子网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// 子网格位置
    pub placement: ChildPlacement,
    /// 子网格列宽
    pub child_delr: f64,
    /// 子网格行宽
    pub child_delc: f64,
    /// 是否关闭外层网格中被替代的块
    #[serde(default = "default_true")]
    pub deactivate_footprint: bool,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 是否美化 JSON
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            pretty: true,
        }
    }
}

impl ModelConfig {
    /// 以网格配置创建，其余部分为空
    pub fn new(grid: GridConfig) -> Self {
        Self {
            name: default_name(),
            grid,
            lake: None,
            stream: None,
            exchange: None,
            wells: Vec::new(),
            output: OutputConfig::default(),
        }
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: ModelConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 离散信息
    pub fn discretization(&self) -> Discretization {
        let g = &self.grid;
        Discretization {
            delr: g.delr.values(g.ncol),
            delc: g.delc.values(g.nrow),
            top: g.top,
            botm: g.botm.clone(),
        }
    }

    /// 验证配置有效性
    ///
    /// 只检查配置本身；湖泊网格、河段表等外部数据由构建器验证。
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_grid()?;

        if let Some(lake) = &self.lake {
            self.validate_lake(lake)?;
        }
        if let Some(stream) = &self.stream {
            if stream.segments.is_empty() {
                return Err(ConfigError::Missing("stream.segments".to_string()));
            }
        }
        if let Some(exchange) = &self.exchange {
            if exchange.placement.refinement == 0 {
                return Err(ConfigError::invalid(
                    "exchange.placement.refinement",
                    0,
                    "细化比必须大于 0",
                ));
            }
        }
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.nlay == 0 || g.nrow == 0 || g.ncol == 0 {
            return Err(ConfigError::invalid(
                "grid",
                format!("{}x{}x{}", g.nlay, g.nrow, g.ncol),
                "层数、行数、列数都必须大于 0",
            ));
        }
        g.delr.check("grid.delr", g.ncol)?;
        g.delc.check("grid.delc", g.nrow)?;

        if g.botm.len() != g.nlay {
            return Err(ConfigError::invalid(
                "grid.botm",
                g.botm.len(),
                format!("层底高程个数必须等于层数 {}", g.nlay),
            ));
        }
        let mut above = g.top;
        for (k, &b) in g.botm.iter().enumerate() {
            if !(b < above) {
                return Err(ConfigError::invalid(
                    format!("grid.botm[{}]", k),
                    b,
                    format!("必须低于上方高程 {}", above),
                ));
            }
            above = b;
        }
        Ok(())
    }

    fn validate_lake(&self, lake: &LakeConfig) -> Result<(), ConfigError> {
        let g = &self.grid;
        if !(lake.leakance >= 0.0 && lake.leakance.is_finite()) {
            return Err(ConfigError::invalid("lake.leakance", lake.leakance, "必须为有限非负数"));
        }
        if lake.lake_layer + 1 >= g.nlay {
            return Err(ConfigError::invalid(
                "lake.lake_layer",
                lake.lake_layer,
                format!("湖泊层下方必须还有一层 (nlay = {})", g.nlay),
            ));
        }
        if g.delr.uniform().is_none() || g.delc.uniform().is_none() {
            return Err(ConfigError::invalid(
                "grid.delr/delc",
                "varying",
                "湖泊连接几何要求均匀行列间距",
            ));
        }
        if !lake.names.is_empty() && !lake.stages.is_empty() && lake.names.len() != lake.stages.len() {
            return Err(ConfigError::invalid(
                "lake.names",
                lake.names.len(),
                format!("个数与 lake.stages ({}) 不一致", lake.stages.len()),
            ));
        }
        Ok(())
    }
}
