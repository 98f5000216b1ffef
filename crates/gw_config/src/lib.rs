// crates/gw_config/src/lib.rs

//! GwLink Config Layer
//!
//! 配置层：用 JSON 描述模型网格以及需要构建的拓扑部分。
//!
//! # 模块概览
//!
//! - [`model_config`]: ModelConfig 及各部分配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! gw_cli        ─> uses ModelConfig
//! gw_config     ─> ModelConfig (本层)
//! gw_topology   ─> 构建器
//! gw_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod model_config;

pub use error::ConfigError;
pub use model_config::{
    ExchangeConfig, GridConfig, LakeConfig, ModelConfig, OutputConfig, Spacing, StreamConfig,
};
