// crates/gw_topology/src/exchange.rs

//! 嵌套网格交换构建
//!
//! 外层结构化网格中一个矩形单元块被子网格替代，子网格与外层在块边界上
//! 通过水平交换相连。构建器沿子网格四周生成交换记录，顺序为
//! 西侧（逐层、逐子网格行）、东侧、北侧（逐层、逐子网格列）、南侧。
//!
//! 每个子网格边界单元与块外紧邻的外层单元相连：
//!
//! | 外层单元位置 | cl1 | cl2 | hwva | angldegx |
//! |-------------|-----|-----|------|----------|
//! | 西 | delr[c0-1]/2 | child_delr/2 | child_delc | 0 |
//! | 东 | delr[c1]/2 | child_delr/2 | child_delc | 180 |
//! | 北 | delc[r0-1]/2 | child_delc/2 | child_delr | 270 |
//! | 南 | delc[r1]/2 | child_delc/2 | child_delr | 90 |
//!
//! `cdist = cl1 + cl2`，`ihc = 1`。
//!
//! 细化比 `r` 表示每个外层单元在行、列方向各对应 `r` 个子网格单元。

use gw_foundation::validation::check_positive;
use gw_foundation::{ensure, CellId, GwError, GwResult, ValidationError, ValidationReport};
use serde::{Deserialize, Serialize};

use crate::grid::IDomain;

/// 子网格间距与外层块间距的比较容差
const SPACING_TOLERANCE: f64 = 1e-6;

/// 外层单元相对子网格的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeSide {
    /// 子网格西侧
    West,
    /// 子网格东侧
    East,
    /// 子网格北侧
    North,
    /// 子网格南侧
    South,
}

impl ExchangeSide {
    /// 生成顺序
    pub const ORDER: [ExchangeSide; 4] = [Self::West, Self::East, Self::North, Self::South];

    /// 从外层单元指向子网格单元的方向与 x 轴夹角（度）
    pub fn angle_degrees(self) -> f64 {
        match self {
            Self::West => 0.0,
            Self::East => 180.0,
            Self::North => 270.0,
            Self::South => 90.0,
        }
    }
}

/// 交换记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// 外层网格单元
    pub outer: CellId,
    /// 子网格单元
    pub child: CellId,
    /// 1 为水平连接
    pub ihc: u8,
    /// 外层单元中心到交换面的距离
    pub cl1: f64,
    /// 子网格单元中心到交换面的距离
    pub cl2: f64,
    /// 交换面宽度
    pub hwva: f64,
    /// 连接方向角（辅助变量 ANGLDEGX）
    pub angldegx: f64,
    /// 单元中心距（辅助变量 CDIST）
    pub cdist: f64,
    /// 外层单元位置
    pub side: ExchangeSide,
}

/// 子网格在外层网格中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPlacement {
    /// 被替代块的起始行
    pub row_offset: usize,
    /// 被替代块的起始列
    pub col_offset: usize,
    /// 被替代块的外层行数
    pub nrow_parent: usize,
    /// 被替代块的外层列数
    pub ncol_parent: usize,
    /// 细化比
    pub refinement: usize,
}

impl ChildPlacement {
    /// 子网格行数
    #[inline]
    pub fn nrow_child(&self) -> usize {
        self.nrow_parent * self.refinement
    }

    /// 子网格列数
    #[inline]
    pub fn ncol_child(&self) -> usize {
        self.ncol_parent * self.refinement
    }

    /// 被替代块的结束行（不含）
    #[inline]
    pub fn row_end(&self) -> usize {
        self.row_offset + self.nrow_parent
    }

    /// 被替代块的结束列（不含）
    #[inline]
    pub fn col_end(&self) -> usize {
        self.col_offset + self.ncol_parent
    }
}

/// 嵌套网格交换构建器
#[derive(Debug, Clone)]
pub struct NestedExchangeBuilder {
    nlay: usize,
    outer_delr: Vec<f64>,
    outer_delc: Vec<f64>,
    child_delr: f64,
    child_delc: f64,
    placement: ChildPlacement,
}

impl NestedExchangeBuilder {
    /// 创建构建器
    pub fn new(
        nlay: usize,
        outer_delr: Vec<f64>,
        outer_delc: Vec<f64>,
        child_delr: f64,
        child_delc: f64,
        placement: ChildPlacement,
    ) -> Self {
        Self {
            nlay,
            outer_delr,
            outer_delc,
            child_delr,
            child_delc,
            placement,
        }
    }

    /// 子网格形状 (nlay, nrow, ncol)
    pub fn child_shape(&self) -> (usize, usize, usize) {
        (self.nlay, self.placement.nrow_child(), self.placement.ncol_child())
    }

    /// 外层网格形状 (nlay, nrow, ncol)
    pub fn outer_shape(&self) -> (usize, usize, usize) {
        (self.nlay, self.outer_delc.len(), self.outer_delr.len())
    }

    /// 验证子网格位置和间距
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let p = &self.placement;
        let (_, nrow, ncol) = self.outer_shape();

        if self.nlay == 0 {
            report.add_error(ValidationError::Custom {
                message: "层数必须大于 0".into(),
            });
        }
        if p.refinement == 0 || p.nrow_parent == 0 || p.ncol_parent == 0 {
            report.add_error(ValidationError::Custom {
                message: format!("子网格块尺寸或细化比为 0: {:?}", p),
            });
        }
        if p.row_offset == 0 || p.col_offset == 0 || p.row_end() >= nrow || p.col_end() >= ncol {
            report.add_error(ValidationError::TopologyError {
                message: format!(
                    "子网格块 行[{}, {}) 列[{}, {}) 四周必须保留外层单元 (外层 {}x{})",
                    p.row_offset,
                    p.row_end(),
                    p.col_offset,
                    p.col_end(),
                    nrow,
                    ncol
                ),
                element_id: None,
            });
        }

        for (j, &d) in self.outer_delr.iter().enumerate() {
            check_positive(&mut report, "outer_delr", j, d);
        }
        for (i, &d) in self.outer_delc.iter().enumerate() {
            check_positive(&mut report, "outer_delc", i, d);
        }
        check_positive(&mut report, "child_delr", 0, self.child_delr);
        check_positive(&mut report, "child_delc", 0, self.child_delc);

        if report.is_valid() {
            self.check_block_spacing(&mut report);
        }
        report
    }

    /// 块内外层间距应等于子网格间距乘以细化比，不一致时只给出警告
    fn check_block_spacing(&self, report: &mut ValidationReport) {
        let p = &self.placement;
        let r = p.refinement as f64;
        let delr_block = &self.outer_delr[p.col_offset..p.col_end()];
        let delc_block = &self.outer_delc[p.row_offset..p.row_end()];

        let mismatch_r = delr_block
            .iter()
            .any(|&d| (d - self.child_delr * r).abs() > SPACING_TOLERANCE * d);
        let mismatch_c = delc_block
            .iter()
            .any(|&d| (d - self.child_delc * r).abs() > SPACING_TOLERANCE * d);

        if mismatch_r || mismatch_c {
            let message = format!(
                "子网格间距 ({}, {}) x {} 与被替代块的外层间距不一致",
                self.child_delr, self.child_delc, p.refinement
            );
            log::warn!("{}", message);
            report.add_warning(gw_foundation::ValidationWarning::Suspicious {
                message,
                element_id: None,
            });
        }
    }

    /// 构建交换记录
    pub fn build(&self) -> GwResult<Vec<ExchangeRecord>> {
        self.validate().into_result()?;

        let p = &self.placement;
        let (nlay, nrow_child, ncol_child) = self.child_shape();
        let r = p.refinement;
        let mut records = Vec::with_capacity(2 * nlay * (nrow_child + ncol_child));

        for side in ExchangeSide::ORDER {
            let along = match side {
                ExchangeSide::West | ExchangeSide::East => nrow_child,
                ExchangeSide::North | ExchangeSide::South => ncol_child,
            };
            for layer in 0..nlay {
                for k in 0..along {
                    records.push(self.record(side, layer, k, r, nrow_child, ncol_child));
                }
            }
        }

        log::debug!("嵌套网格交换: {} 条记录", records.len());
        Ok(records)
    }

    fn record(
        &self,
        side: ExchangeSide,
        layer: usize,
        k: usize,
        r: usize,
        nrow_child: usize,
        ncol_child: usize,
    ) -> ExchangeRecord {
        let p = &self.placement;
        let (outer, child, cl1, cl2, hwva) = match side {
            ExchangeSide::West => {
                let col = p.col_offset - 1;
                (
                    CellId::new(layer, p.row_offset + k / r, col),
                    CellId::new(layer, k, 0),
                    self.outer_delr[col] / 2.0,
                    self.child_delr / 2.0,
                    self.child_delc,
                )
            }
            ExchangeSide::East => {
                let col = p.col_end();
                (
                    CellId::new(layer, p.row_offset + k / r, col),
                    CellId::new(layer, k, ncol_child - 1),
                    self.outer_delr[col] / 2.0,
                    self.child_delr / 2.0,
                    self.child_delc,
                )
            }
            ExchangeSide::North => {
                let row = p.row_offset - 1;
                (
                    CellId::new(layer, row, p.col_offset + k / r),
                    CellId::new(layer, 0, k),
                    self.outer_delc[row] / 2.0,
                    self.child_delc / 2.0,
                    self.child_delr,
                )
            }
            ExchangeSide::South => {
                let row = p.row_end();
                (
                    CellId::new(layer, row, p.col_offset + k / r),
                    CellId::new(layer, nrow_child - 1, k),
                    self.outer_delc[row] / 2.0,
                    self.child_delc / 2.0,
                    self.child_delr,
                )
            }
        };
        ExchangeRecord {
            outer,
            child,
            ihc: 1,
            cl1,
            cl2,
            hwva,
            angldegx: side.angle_degrees(),
            cdist: cl1 + cl2,
            side,
        }
    }

    /// 将外层网格中被子网格替代的块设为不活动，返回被关闭的单元数
    pub fn deactivate_child_footprint(&self, idomain: &mut IDomain) -> GwResult<usize> {
        ensure!(
            idomain.shape() == self.outer_shape(),
            GwError::validation(format!(
                "idomain 形状 {:?} 与外层网格 {:?} 不一致",
                idomain.shape(),
                self.outer_shape()
            ))
        );
        let p = &self.placement;
        let mut n = 0;
        for layer in 0..self.nlay {
            for row in p.row_offset..p.row_end() {
                for col in p.col_offset..p.col_end() {
                    idomain.set(CellId::new(layer, row, col), 0)?;
                    n += 1;
                }
            }
        }
        Ok(n)
    }
}
