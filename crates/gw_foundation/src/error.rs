// crates/gw_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GwError` 枚举和 `GwResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，配置相关错误在 gw_config 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **先验证后输出**: 构建器在产生任何记录之前返回 `Validation`
//!
//! # 示例
//!
//! ```
//! use gw_foundation::error::{GwError, GwResult};
//!
//! fn check_cells(expected: usize, actual: usize) -> GwResult<()> {
//!     GwError::check_size("idomain", expected, actual)
//! }
//! assert!(matches!(check_cells(4, 3), Err(GwError::SizeMismatch { .. })));
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// 统一结果类型
pub type GwResult<T> = Result<T, GwError>;

/// GwLink 错误类型
#[derive(Error, Debug)]
pub enum GwError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 文件解析错误
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    ParseError {
        /// 文件路径
        file: PathBuf,
        /// 行号
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 输入数据错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 验证失败
    #[error("验证失败: {0}")]
    Validation(String),

    // ========================================================================
    // 配置错误
    // ========================================================================

    /// 缺少配置项
    #[error("缺少必需的配置项: {key}")]
    MissingConfig {
        /// 配置键名
        key: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl GwError {
    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 解析错误
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 验证失败
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 是否为验证错误
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl GwError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> GwResult<()> {
        if expected != actual {
            Err(Self::SizeMismatch {
                name,
                expected,
                actual,
            })
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> GwResult<()> {
        if index >= len {
            Err(Self::IndexOutOfBounds {
                index_type,
                index,
                len,
            })
        } else {
            Ok(())
        }
    }
}

impl From<ValidationReport> for GwError {
    /// 将带错误的验证报告折叠为单个 `Validation` 错误
    fn from(report: ValidationReport) -> Self {
        let details: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        Self::Validation(details.join("; "))
    }
}

// ========================================================================
// 宏
// ========================================================================

/// 条件不满足时提前返回错误
///
/// ```
/// use gw_foundation::{ensure, GwError, GwResult};
///
/// fn positive(v: f64) -> GwResult<f64> {
///     ensure!(v > 0.0, GwError::validation("必须为正"));
///     Ok(v)
/// }
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

/// 解包 `Option`，为 `None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr $(,)?) => {
        match $opt {
            Some(v) => v,
            None => return Err($err.into()),
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_error_display() {
        let err = GwError::parse("stream.csv", 3, "seg 超出范围");
        let text = err.to_string();
        assert!(text.contains("stream.csv") && text.contains("第3行"));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = GwError::check_index("Reach", 10, 5).unwrap_err();
        assert!(err.to_string().contains("Reach"));
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_check_size() {
        assert!(GwError::check_size("test", 10, 10).is_ok());
        assert!(GwError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_index() {
        assert!(GwError::check_index("Cell", 5, 10).is_ok());
        assert!(GwError::check_index("Cell", 10, 10).is_err());
    }

    #[test]
    fn test_report_into_validation_error() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationError::Custom {
            message: "第一条".into(),
        });
        report.add_error(ValidationError::Custom {
            message: "第二条".into(),
        });
        let err: GwError = report.into();
        assert!(err.is_validation());
        let text = err.to_string();
        assert!(text.contains("第一条") && text.contains("第二条"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> GwResult<()> {
            ensure!(value > 0, GwError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> GwResult<i32> {
            let v = require!(opt, GwError::validation("value"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
