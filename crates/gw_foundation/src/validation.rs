// crates/gw_foundation/src/validation.rs

//! 运行时验证工具
//!
//! 构建器在输出任何记录之前先把输入的全部问题收集到 [`ValidationReport`]，
//! 再统一折叠为 `GwError::Validation`，避免只报告第一处错误。
//!
//! # 示例
//!
//! ```
//! use gw_foundation::validation::{ValidationReport, ValidationError};
//!
//! let length = -1.0f64;
//! let mut report = ValidationReport::new();
//! if length < 0.0 {
//!     report.add_error(ValidationError::OutOfRange {
//!         field: "length",
//!         element_id: 3,
//!         value: length,
//!         min: 0.0,
//!         max: f64::MAX,
//!     });
//! }
//! assert!(report.has_errors());
//! assert!(report.into_result().is_err());
//! ```

use std::fmt;

use crate::error::GwResult;
use crate::index::CellId;

/// 验证报告
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 警告列表
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告数量
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 合并另一个报告
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// 无错误时返回警告列表，否则折叠为 `GwError::Validation`
    pub fn into_result(self) -> GwResult<Vec<ValidationWarning>> {
        if self.has_errors() {
            Err(self.into())
        } else {
            Ok(self.warnings)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.error_count())?;
        writeln!(f, "  警告: {} 个", self.warning_count())?;

        if self.has_errors() {
            writeln!(f, "\n错误详情:")?;
            for (i, err) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, err)?;
            }
        }

        if self.has_warnings() {
            writeln!(f, "\n警告详情:")?;
            for (i, warn) in self.warnings.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, warn)?;
            }
        }

        Ok(())
    }
}

/// 验证错误类型
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// 非有限值
    NonFinite {
        /// 字段名称
        field: &'static str,
        /// 所在元素 ID（单元、河段、井等）
        element_id: usize,
        /// 非有限的数值
        value: f64,
    },
    /// 数据超出范围
    OutOfRange {
        /// 字段名称
        field: &'static str,
        /// 所在元素 ID
        element_id: usize,
        /// 实际值
        value: f64,
        /// 下界
        min: f64,
        /// 上界
        max: f64,
    },
    /// 单元坐标落在网格之外
    CellOutsideGrid {
        /// 引用该单元的对象
        owner: &'static str,
        /// 对象 ID
        element_id: usize,
        /// 越界的单元
        cell: CellId,
        /// 网格形状 (nlay, nrow, ncol)
        shape: (usize, usize, usize),
    },
    /// 拓扑错误
    TopologyError {
        /// 错误描述
        message: String,
        /// 可选的元素 ID
        element_id: Option<usize>,
    },
    /// 一致性错误
    ConsistencyError {
        /// 错误描述
        message: String,
    },
    /// 自定义错误
    Custom {
        /// 自定义消息
        message: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite {
                field,
                element_id,
                value,
            } => {
                write!(f, "元素{}: 字段{}={} (非有限值)", element_id, field, value)
            }
            Self::OutOfRange {
                field,
                element_id,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "元素{}: 字段{}={} 超出范围[{}, {}]",
                    element_id, field, value, min, max
                )
            }
            Self::CellOutsideGrid {
                owner,
                element_id,
                cell,
                shape,
            } => {
                write!(
                    f,
                    "{}{}: 单元{} 超出网格 {}x{}x{}",
                    owner, element_id, cell, shape.0, shape.1, shape.2
                )
            }
            Self::TopologyError { message, element_id } => {
                if let Some(id) = element_id {
                    write!(f, "元素{}: 拓扑错误: {}", id, message)
                } else {
                    write!(f, "拓扑错误: {}", message)
                }
            }
            Self::ConsistencyError { message } => {
                write!(f, "一致性错误: {}", message)
            }
            Self::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 验证警告类型
#[derive(Debug, Clone)]
pub enum ValidationWarning {
    /// 拓扑上合法但可疑的输入
    Suspicious {
        /// 警告描述
        message: String,
        /// 可选的元素 ID
        element_id: Option<usize>,
    },
    /// 自定义警告
    Custom {
        /// 自定义消息
        message: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suspicious { message, element_id } => {
                if let Some(id) = element_id {
                    write!(f, "元素{}: {}", id, message)
                } else {
                    write!(f, "{}", message)
                }
            }
            Self::Custom { message } => write!(f, "{}", message),
        }
    }
}

// ============================================================================
// 验证辅助函数
// ============================================================================

/// 检查值是否有限
pub fn check_finite(
    report: &mut ValidationReport,
    field: &'static str,
    element_id: usize,
    value: f64,
) -> bool {
    if !value.is_finite() {
        report.add_error(ValidationError::NonFinite {
            field,
            element_id,
            value,
        });
        false
    } else {
        true
    }
}

/// 检查值是否在范围内（非有限值同时记为错误）
pub fn check_range(
    report: &mut ValidationReport,
    field: &'static str,
    element_id: usize,
    value: f64,
    min: f64,
    max: f64,
) -> bool {
    if !check_finite(report, field, element_id, value) {
        return false;
    }
    if value < min || value > max {
        report.add_error(ValidationError::OutOfRange {
            field,
            element_id,
            value,
            min,
            max,
        });
        false
    } else {
        true
    }
}

/// 检查值是否为严格正的有限数
pub fn check_positive(
    report: &mut ValidationReport,
    field: &'static str,
    element_id: usize,
    value: f64,
) -> bool {
    if !check_finite(report, field, element_id, value) {
        return false;
    }
    if value <= 0.0 {
        report.add_error(ValidationError::OutOfRange {
            field,
            element_id,
            value,
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        });
        false
    } else {
        true
    }
}
