// crates/gw_foundation/src/lib.rs

//! GwLink Foundation Layer
//!
//! 基础层，提供整个项目共享的错误类型、验证报告和单元索引。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型与 `ensure!`/`require!` 宏
//! - [`validation`]: 验证报告、错误和警告
//! - [`index`]: 结构化网格单元索引 `CellId`
//!
//! # 设计原则
//!
//! 1. **最少依赖**: 仅依赖 serde 和 thiserror
//! 2. **先验证后输出**: 所有输入问题在构建记录之前报告
//!
//! # 示例
//!
//! ```
//! use gw_foundation::prelude::*;
//!
//! let cell = CellId::new(0, 1, 2);
//! let err = GwError::validation(format!("单元 {} 不可用", cell));
//! assert!(err.is_validation());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod validation;

// 重导出常用类型
pub use error::{GwError, GwResult};
pub use index::CellId;
pub use validation::{ValidationError, ValidationReport, ValidationWarning};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{GwError, GwResult};
    pub use crate::index::CellId;
    pub use crate::validation::{ValidationError, ValidationReport, ValidationWarning};
    pub use crate::{ensure, require};
}
