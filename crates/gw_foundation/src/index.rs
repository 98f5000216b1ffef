// crates/gw_foundation/src/index.rs

//! 结构化网格单元索引
//!
//! `CellId` 是零基的 (layer, row, column) 三元组。序列化时写成
//! `[layer, row, column]` 数组，与模拟器配置层接受的单元元组格式一致。
//!
//! # 示例
//!
//! ```
//! use gw_foundation::index::CellId;
//!
//! let cell = CellId::new(0, 3, 4);
//! assert!(cell.in_shape((2, 5, 5)));
//! assert_eq!(cell.to_one_based(), (1, 4, 5));
//! assert_eq!(CellId::from_one_based(1, 4, 5), Some(cell));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 结构化网格单元 (layer, row, column)，零基
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize, usize)", into = "(usize, usize, usize)")]
pub struct CellId {
    /// 层号
    pub layer: usize,
    /// 行号
    pub row: usize,
    /// 列号
    pub col: usize,
}

impl CellId {
    /// 创建单元索引
    #[inline]
    pub const fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }

    /// 从一基坐标创建；任一分量为 0 时返回 `None`
    pub fn from_one_based(layer: usize, row: usize, col: usize) -> Option<Self> {
        Some(Self::new(
            layer.checked_sub(1)?,
            row.checked_sub(1)?,
            col.checked_sub(1)?,
        ))
    }

    /// 转换为一基坐标
    #[inline]
    pub fn to_one_based(self) -> (usize, usize, usize) {
        (self.layer + 1, self.row + 1, self.col + 1)
    }

    /// 是否位于形状为 (nlay, nrow, ncol) 的网格内
    #[inline]
    pub fn in_shape(self, shape: (usize, usize, usize)) -> bool {
        self.layer < shape.0 && self.row < shape.1 && self.col < shape.2
    }

    /// 同一平面位置、指定层的单元
    #[inline]
    pub fn with_layer(self, layer: usize) -> Self {
        Self { layer, ..self }
    }

    /// 行主序线性索引
    #[inline]
    pub fn linear(self, nrow: usize, ncol: usize) -> usize {
        (self.layer * nrow + self.row) * ncol + self.col
    }
}

impl From<(usize, usize, usize)> for CellId {
    fn from((layer, row, col): (usize, usize, usize)) -> Self {
        Self::new(layer, row, col)
    }
}

impl From<CellId> for (usize, usize, usize) {
    fn from(cell: CellId) -> Self {
        (cell.layer, cell.row, cell.col)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.layer, self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_zero_component() {
        assert_eq!(CellId::from_one_based(0, 1, 1), None);
        assert_eq!(CellId::from_one_based(1, 1, 1), Some(CellId::new(0, 0, 0)));
    }

    #[test]
    fn test_in_shape() {
        let shape = (2, 3, 4);
        assert!(CellId::new(1, 2, 3).in_shape(shape));
        assert!(!CellId::new(2, 0, 0).in_shape(shape));
        assert!(!CellId::new(0, 3, 0).in_shape(shape));
        assert!(!CellId::new(0, 0, 4).in_shape(shape));
    }

    #[test]
    fn test_linear_index() {
        // 2 层 3 行 4 列
        assert_eq!(CellId::new(0, 0, 0).linear(3, 4), 0);
        assert_eq!(CellId::new(0, 1, 2).linear(3, 4), 6);
        assert_eq!(CellId::new(1, 0, 0).linear(3, 4), 12);
    }

    #[test]
    fn test_display_and_with_layer() {
        let cell = CellId::new(0, 5, 7).with_layer(1);
        assert_eq!(cell.to_string(), "(1, 5, 7)");
    }
}
