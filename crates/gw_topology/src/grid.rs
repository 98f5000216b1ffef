// crates/gw_topology/src/grid.rs

//! 结构化网格数组
//!
//! - [`Grid2`]: 行主序二维数组，用于湖泊归属网格等平面数据
//! - [`IDomain`]: (layer, row, column) 活动域数组，非零为活动单元
//! - [`Discretization`]: 层数、行列间距与层底高程
//!
//! 数组由 `ndarray` 存储，按行主序索引。

use gw_foundation::{CellId, GwError, GwResult};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// 湖泊归属网格：0 表示非湖泊，正整数 `L` 表示属于湖泊 `L-1`
pub type LakeGrid = Grid2<i32>;

/// 行主序二维数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid2<T> {
    data: Array2<T>,
}

impl<T: Copy> Grid2<T> {
    /// 创建填充为 `fill` 的数组
    pub fn filled(nrow: usize, ncol: usize, fill: T) -> Self {
        Self {
            data: Array2::from_elem((nrow, ncol), fill),
        }
    }

    /// 从行主序数据创建
    pub fn from_vec(nrow: usize, ncol: usize, data: Vec<T>) -> GwResult<Self> {
        GwError::check_size("grid2", nrow * ncol, data.len())?;
        let data = Array2::from_shape_vec((nrow, ncol), data)
            .map_err(|e| GwError::invalid_input(format!("grid2: {}", e)))?;
        Ok(Self { data })
    }

    /// 从行列表创建，所有行必须等长
    pub fn from_rows(rows: Vec<Vec<T>>) -> GwResult<Self> {
        let nrow = rows.len();
        let ncol = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrow * ncol);
        for row in rows {
            GwError::check_size("grid2 row", ncol, row.len())?;
            data.extend(row);
        }
        Self::from_vec(nrow, ncol, data)
    }

    /// 行数
    #[inline]
    pub fn nrow(&self) -> usize {
        self.data.nrows()
    }

    /// 列数
    #[inline]
    pub fn ncol(&self) -> usize {
        self.data.ncols()
    }

    /// 形状 (nrow, ncol)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// 读取 (row, col)，越界返回 `None`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.data.get((row, col)).copied()
    }

    /// 写入 (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> GwResult<()> {
        GwError::check_index("row", row, self.nrow())?;
        GwError::check_index("col", col, self.ncol())?;
        self.data[(row, col)] = value;
        Ok(())
    }

    /// 行主序迭代 ((row, col), value)
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        self.data.indexed_iter().map(|(rc, &v)| (rc, v))
    }

    /// 行主序迭代所有值
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// 底层数组
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }
}

/// 活动域数组 (layer, row, column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IDomain {
    data: Array3<i32>,
}

impl IDomain {
    /// 全部活动
    pub fn all_active(nlay: usize, nrow: usize, ncol: usize) -> Self {
        Self {
            data: Array3::ones((nlay, nrow, ncol)),
        }
    }

    /// 每层复制同一平面数组
    pub fn repeat_layer(nlay: usize, layer: &Grid2<i32>) -> Self {
        let (nrow, ncol) = layer.shape();
        let mut data = Array3::zeros((nlay, nrow, ncol));
        for mut slab in data.outer_iter_mut() {
            slab.assign(&layer.view());
        }
        Self { data }
    }

    /// 从逐层平面数组创建，所有层形状必须一致
    pub fn from_layers(layers: &[Grid2<i32>]) -> GwResult<Self> {
        let (nrow, ncol) = layers.first().map_or((0, 0), Grid2::shape);
        let mut data = Array3::zeros((layers.len(), nrow, ncol));
        for (k, layer) in layers.iter().enumerate() {
            if layer.shape() != (nrow, ncol) {
                return Err(GwError::invalid_input(format!(
                    "idomain 第 {} 层形状不一致: {:?} != {:?}",
                    k,
                    layer.shape(),
                    (nrow, ncol)
                )));
            }
            data.index_axis_mut(Axis(0), k).assign(&layer.view());
        }
        Ok(Self { data })
    }

    /// 形状 (nlay, nrow, ncol)
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// 层数
    #[inline]
    pub fn nlay(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// 读取单元值，越界返回 `None`
    #[inline]
    pub fn get(&self, cell: CellId) -> Option<i32> {
        self.data.get((cell.layer, cell.row, cell.col)).copied()
    }

    /// 单元是否活动；越界视为不活动
    #[inline]
    pub fn is_active(&self, cell: CellId) -> bool {
        self.get(cell).is_some_and(|v| v != 0)
    }

    /// 写入单元值
    pub fn set(&mut self, cell: CellId, value: i32) -> GwResult<()> {
        let shape = self.shape();
        match self.data.get_mut((cell.layer, cell.row, cell.col)) {
            Some(v) => {
                *v = value;
                Ok(())
            }
            None => Err(GwError::invalid_input(format!(
                "单元 {} 超出 idomain 形状 {:?}",
                cell, shape
            ))),
        }
    }

    /// 活动单元数量
    pub fn count_active(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// 结构化离散：行列间距与层底高程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discretization {
    /// 列宽，长度 ncol
    pub delr: Vec<f64>,
    /// 行宽，长度 nrow
    pub delc: Vec<f64>,
    /// 模型顶面高程
    pub top: f64,
    /// 各层底面高程，长度 nlay
    pub botm: Vec<f64>,
}

impl Discretization {
    /// 均匀间距
    pub fn uniform(nrow: usize, ncol: usize, delr: f64, delc: f64, top: f64, botm: Vec<f64>) -> Self {
        Self {
            delr: vec![delr; ncol],
            delc: vec![delc; nrow],
            top,
            botm,
        }
    }

    /// 形状 (nlay, nrow, ncol)
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.botm.len(), self.delc.len(), self.delr.len())
    }

    /// 指定层的顶面高程
    pub fn layer_top(&self, layer: usize) -> Option<f64> {
        match layer {
            0 => Some(self.top),
            k if k < self.botm.len() => Some(self.botm[k - 1]),
            _ => None,
        }
    }
}
