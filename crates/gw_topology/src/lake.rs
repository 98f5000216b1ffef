// crates/gw_topology/src/lake.rs

//! 湖泊-含水层连接构建
//!
//! 扫描湖泊归属网格，为每个湖泊单元生成指向相邻含水层单元的连接记录：
//!
//! - 按行主序扫描单元；对每个湖泊单元按固定顺序 北、西、东、南 检查平面邻居
//! - 邻居在网格内、不是湖泊单元、且在湖泊所在层活动时，生成一条水平连接
//! - 随后无条件生成一条指向下一层同位置单元的垂直连接
//!
//! 每个湖泊的连接序号由局部计数器分配，从 0 开始连续递增。
//!
//! 水平连接的几何字段：
//!
//! | 方向 | connlen | connwidth |
//! |------|---------|-----------|
//! | 北/南 | delc / 2 | delr |
//! | 西/东 | delr / 2 | delc |
//!
//! # 示例
//!
//! ```
//! use gw_topology::grid::{Grid2, IDomain};
//! use gw_topology::lake::LakeConnectivityBuilder;
//!
//! let lakes = Grid2::from_rows(vec![vec![0, 1], vec![1, 1]]).unwrap();
//! let idomain = IDomain::all_active(2, 2, 2);
//! let conns = LakeConnectivityBuilder::new(10.0, 20.0)
//!     .build(&lakes, &idomain)
//!     .unwrap();
//! assert_eq!(conns.counts, vec![5]);
//! ```

use gw_foundation::validation::{check_finite, check_positive, check_range};
use gw_foundation::{ensure, CellId, GwError, GwResult, ValidationError, ValidationReport};
use serde::{Deserialize, Serialize};

use crate::grid::{IDomain, LakeGrid};

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// 水平连接（湖泊侧面）
    Horizontal,
    /// 垂直连接（湖底）
    Vertical,
}

impl ClaimType {
    /// 配置层使用的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// 平面邻居方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// row - 1
    North,
    /// col - 1
    West,
    /// col + 1
    East,
    /// row + 1
    South,
}

impl Direction {
    /// 扫描顺序
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];

    /// 邻居 (row, col)，越界返回 `None`
    #[inline]
    pub fn neighbor(self, row: usize, col: usize, nrow: usize, ncol: usize) -> Option<(usize, usize)> {
        match self {
            Self::North => row.checked_sub(1).map(|r| (r, col)),
            Self::West => col.checked_sub(1).map(|c| (row, c)),
            Self::East => (col + 1 < ncol).then_some((row, col + 1)),
            Self::South => (row + 1 < nrow).then_some((row + 1, col)),
        }
    }

    /// 是否穿过行方向的面（北/南）
    #[inline]
    pub fn crosses_row(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// 湖泊连接记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LakeConnection {
    /// 湖泊序号（零基）
    pub lake: usize,
    /// 湖内连接序号（零基，连续）
    pub iconn: usize,
    /// 相连的含水层单元
    pub cell: CellId,
    /// 连接类型
    pub claimtype: ClaimType,
    /// 湖床渗漏系数
    pub bedleak: f64,
    /// 保留几何字段，恒为 0
    pub belev: f64,
    /// 保留几何字段，恒为 0
    pub telev: f64,
    /// 垂直于连接面的长度
    pub connlen: f64,
    /// 连接面宽度
    pub connwidth: f64,
}

/// 湖泊连接构建结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LakeConnections {
    /// 按扫描顺序排列的连接记录
    pub records: Vec<LakeConnection>,
    /// 每个湖泊的连接数
    pub counts: Vec<usize>,
}

impl LakeConnections {
    /// 湖泊数量
    #[inline]
    pub fn n_lakes(&self) -> usize {
        self.counts.len()
    }

    /// 连接总数
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否没有任何连接
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 指定湖泊的连接
    pub fn for_lake(&self, lake: usize) -> impl Iterator<Item = &LakeConnection> + '_ {
        self.records.iter().filter(move |r| r.lake == lake)
    }
}

/// 湖泊包数据记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LakePackageData {
    /// 湖泊序号
    pub lake: usize,
    /// 初始水位
    pub strt: f64,
    /// 连接数
    pub nlakeconn: usize,
    /// 边界名
    pub boundname: String,
}

/// 湖泊连接构建器
#[derive(Debug, Clone)]
pub struct LakeConnectivityBuilder {
    delr: f64,
    delc: f64,
    leakance: f64,
    lake_layer: usize,
    lake_count: Option<usize>,
}

impl LakeConnectivityBuilder {
    /// 默认湖床渗漏系数
    pub const DEFAULT_LEAKANCE: f64 = 1.0;

    /// 以列宽 `delr`、行宽 `delc` 创建
    pub fn new(delr: f64, delc: f64) -> Self {
        Self {
            delr,
            delc,
            leakance: Self::DEFAULT_LEAKANCE,
            lake_layer: 0,
            lake_count: None,
        }
    }

    /// 设置湖床渗漏系数
    pub fn with_leakance(mut self, leakance: f64) -> Self {
        self.leakance = leakance;
        self
    }

    /// 设置湖泊所在层（垂直连接指向下一层）
    pub fn with_lake_layer(mut self, layer: usize) -> Self {
        self.lake_layer = layer;
        self
    }

    /// 声明湖泊数量，网格中超过该数量的湖泊编号视为错误
    pub fn with_lake_count(mut self, n: usize) -> Self {
        self.lake_count = Some(n);
        self
    }

    /// 验证输入，返回湖泊数量
    pub fn validate(&self, lakes: &LakeGrid, idomain: &IDomain) -> GwResult<usize> {
        let mut report = ValidationReport::new();
        let (nlay, nrow, ncol) = idomain.shape();

        check_positive(&mut report, "delr", 0, self.delr);
        check_positive(&mut report, "delc", 0, self.delc);
        check_range(&mut report, "leakance", 0, self.leakance, 0.0, f64::MAX);

        if lakes.shape() != (nrow, ncol) {
            report.add_error(ValidationError::ConsistencyError {
                message: format!(
                    "湖泊网格形状 {:?} 与 idomain 平面形状 {:?} 不一致",
                    lakes.shape(),
                    (nrow, ncol)
                ),
            });
        }
        if self.lake_layer + 1 >= nlay {
            report.add_error(ValidationError::ConsistencyError {
                message: format!(
                    "湖泊位于第 {} 层，但 idomain 只有 {} 层，垂直连接没有下层单元",
                    self.lake_layer, nlay
                ),
            });
        }

        let mut max_id = 0i32;
        let mut lake_cells = 0usize;
        for ((row, col), id) in lakes.indexed_iter() {
            if id < 0 {
                report.add_error(ValidationError::OutOfRange {
                    field: "lake_id",
                    element_id: row * lakes.ncol() + col,
                    value: f64::from(id),
                    min: 0.0,
                    max: f64::from(i32::MAX),
                });
            } else if id > 0 {
                lake_cells += 1;
            }
            max_id = max_id.max(id);
        }
        let n_lakes = max_id as usize;

        if let Some(declared) = self.lake_count {
            if n_lakes > declared {
                report.add_error(ValidationError::TopologyError {
                    message: format!("湖泊编号 {} 超出声明的湖泊数量 {}", n_lakes, declared),
                    element_id: None,
                });
                std::mem::take(&mut report).into_result()?;
            }
        }

        // 编号连续时最大编号不超过湖泊单元数
        if n_lakes > lake_cells {
            report.add_error(ValidationError::TopologyError {
                message: format!(
                    "湖泊编号不连续: 最大编号 {}，但只有 {} 个湖泊单元",
                    n_lakes, lake_cells
                ),
                element_id: None,
            });
            std::mem::take(&mut report).into_result()?;
        }

        let mut cell_counts = vec![0usize; n_lakes];
        for (_, id) in lakes.indexed_iter() {
            if id > 0 {
                cell_counts[id as usize - 1] += 1;
            }
        }
        let empty: Vec<usize> = cell_counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n == 0)
            .map(|(lake, _)| lake + 1)
            .collect();
        if let Some(&first) = empty.first() {
            report.add_error(ValidationError::TopologyError {
                message: format!(
                    "湖泊编号不连续: {} 个编号没有任何单元 {:?}",
                    empty.len(),
                    &empty[..empty.len().min(10)]
                ),
                element_id: Some(first - 1),
            });
        }

        report.into_result()?;
        Ok(self.lake_count.unwrap_or(n_lakes).max(n_lakes))
    }

    /// 构建湖泊连接
    pub fn build(&self, lakes: &LakeGrid, idomain: &IDomain) -> GwResult<LakeConnections> {
        let n_lakes = self.validate(lakes, idomain)?;
        let (nrow, ncol) = lakes.shape();
        let below = self.lake_layer + 1;

        let mut counts = vec![0usize; n_lakes];
        let mut horizontal = vec![0usize; n_lakes];
        let mut records = Vec::new();

        for ((row, col), id) in lakes.indexed_iter() {
            if id == 0 {
                continue;
            }
            let lake = id as usize - 1;

            for dir in Direction::SCAN_ORDER {
                let Some((nr, nc)) = dir.neighbor(row, col, nrow, ncol) else {
                    continue;
                };
                let is_lake = lakes.get(nr, nc).is_some_and(|v| v != 0);
                let target = CellId::new(self.lake_layer, nr, nc);
                if is_lake || !idomain.is_active(target) {
                    continue;
                }
                let (connlen, connwidth) = if dir.crosses_row() {
                    (self.delc / 2.0, self.delr)
                } else {
                    (self.delr / 2.0, self.delc)
                };
                records.push(self.record(lake, counts[lake], target, ClaimType::Horizontal, connlen, connwidth));
                counts[lake] += 1;
                horizontal[lake] += 1;
            }

            let target = CellId::new(below, row, col);
            records.push(self.record(lake, counts[lake], target, ClaimType::Vertical, 0.0, 0.0));
            counts[lake] += 1;
        }

        for (lake, &n) in horizontal.iter().enumerate() {
            if n == 0 && counts[lake] > 0 {
                log::warn!("湖泊 {} 没有任何水平连接，只与下层单元相连", lake);
            }
        }

        log::debug!(
            "湖泊连接构建完成: {} 个湖泊, {} 条连接, 每湖 {:?}",
            n_lakes,
            records.len(),
            counts
        );

        Ok(LakeConnections { records, counts })
    }

    fn record(
        &self,
        lake: usize,
        iconn: usize,
        cell: CellId,
        claimtype: ClaimType,
        connlen: f64,
        connwidth: f64,
    ) -> LakeConnection {
        LakeConnection {
            lake,
            iconn,
            cell,
            claimtype,
            bedleak: self.leakance,
            belev: 0.0,
            telev: 0.0,
            connlen,
            connwidth,
        }
    }
}

/// 将湖泊所在层的湖泊单元设为不活动，返回被关闭的单元数
pub fn deactivate_lake_cells(idomain: &mut IDomain, lakes: &LakeGrid, layer: usize) -> GwResult<usize> {
    let (nlay, nrow, ncol) = idomain.shape();
    ensure!(
        lakes.shape() == (nrow, ncol),
        GwError::validation(format!(
            "湖泊网格形状 {:?} 与 idomain 平面形状 {:?} 不一致",
            lakes.shape(),
            (nrow, ncol)
        ))
    );
    GwError::check_index("layer", layer, nlay)?;

    let mut n = 0;
    for ((row, col), id) in lakes.indexed_iter() {
        if id > 0 {
            idomain.set(CellId::new(layer, row, col), 0)?;
            n += 1;
        }
    }
    Ok(n)
}

/// 组装湖泊包数据
pub fn lake_package_data(
    connections: &LakeConnections,
    stages: &[f64],
    names: &[String],
) -> GwResult<Vec<LakePackageData>> {
    let n = connections.n_lakes();
    GwError::check_size("lake stages", n, stages.len())?;
    GwError::check_size("lake names", n, names.len())?;

    let mut report = ValidationReport::new();
    for (lake, &stage) in stages.iter().enumerate() {
        check_finite(&mut report, "strt", lake, stage);
    }
    report.into_result()?;

    Ok(connections
        .counts
        .iter()
        .enumerate()
        .map(|(lake, &nlakeconn)| LakePackageData {
            lake,
            strt: stages[lake],
            nlakeconn,
            boundname: names[lake].clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid2;

    fn lakes(rows: Vec<Vec<i32>>) -> LakeGrid {
        Grid2::from_rows(rows).unwrap()
    }

    #[test]
    fn test_direction_neighbors_at_corner() {
        assert_eq!(Direction::North.neighbor(0, 0, 3, 3), None);
        assert_eq!(Direction::West.neighbor(0, 0, 3, 3), None);
        assert_eq!(Direction::East.neighbor(0, 0, 3, 3), Some((0, 1)));
        assert_eq!(Direction::South.neighbor(0, 0, 3, 3), Some((1, 0)));
        assert_eq!(Direction::East.neighbor(2, 2, 3, 3), None);
        assert_eq!(Direction::South.neighbor(2, 2, 3, 3), None);
    }

    #[test]
    fn test_single_interior_cell_five_records() {
        let grid = lakes(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let idomain = IDomain::all_active(2, 3, 3);
        let conns = LakeConnectivityBuilder::new(10.0, 20.0).build(&grid, &idomain).unwrap();

        assert_eq!(conns.len(), 5);
        let cells: Vec<_> = conns.records.iter().map(|r| r.cell).collect();
        assert_eq!(
            cells,
            vec![
                CellId::new(0, 0, 1),
                CellId::new(0, 1, 0),
                CellId::new(0, 1, 2),
                CellId::new(0, 2, 1),
                CellId::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_horizontal_geometry_per_direction() {
        let grid = lakes(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let idomain = IDomain::all_active(2, 3, 3);
        let conns = LakeConnectivityBuilder::new(10.0, 20.0).build(&grid, &idomain).unwrap();
        let r = &conns.records;

        // 北/南: (delc/2, delr)
        assert_eq!((r[0].connlen, r[0].connwidth), (10.0, 10.0));
        assert_eq!((r[3].connlen, r[3].connwidth), (10.0, 10.0));
        // 西/东: (delr/2, delc)
        assert_eq!((r[1].connlen, r[1].connwidth), (5.0, 20.0));
        assert_eq!((r[2].connlen, r[2].connwidth), (5.0, 20.0));
        // 垂直
        assert_eq!(r[4].claimtype, ClaimType::Vertical);
        assert_eq!((r[4].connlen, r[4].connwidth), (0.0, 0.0));
        assert!(r.iter().all(|c| c.belev == 0.0 && c.telev == 0.0));
    }

    #[test]
    fn test_inactive_neighbors_skip_horizontal_only() {
        let grid = lakes(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let mut idomain = IDomain::all_active(2, 3, 3);
        for (r, c) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
            idomain.set(CellId::new(0, r, c), 0).unwrap();
        }
        // 下层也关闭：垂直连接仍然生成
        idomain.set(CellId::new(1, 1, 1), 0).unwrap();

        let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
        assert_eq!(conns.len(), 1);
        assert_eq!(conns.records[0].claimtype, ClaimType::Vertical);
        assert_eq!(conns.records[0].cell, CellId::new(1, 1, 1));
    }

    #[test]
    fn test_lake_neighbors_are_not_connected() {
        let grid = lakes(vec![vec![1, 1]]);
        let idomain = IDomain::all_active(2, 1, 2);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
        assert_eq!(conns.counts, vec![2]);
        assert!(conns.records.iter().all(|r| r.claimtype == ClaimType::Vertical));
    }

    #[test]
    fn test_two_lakes_contiguous_indices() {
        let grid = lakes(vec![vec![1, 0, 2], vec![1, 0, 2]]);
        let idomain = IDomain::all_active(2, 2, 3);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();

        assert_eq!(conns.n_lakes(), 2);
        for lake in 0..2 {
            let idx: Vec<_> = conns.for_lake(lake).map(|r| r.iconn).collect();
            assert_eq!(idx, (0..conns.counts[lake]).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_leakance_and_layer_applied() {
        let grid = lakes(vec![vec![1]]);
        let idomain = IDomain::all_active(3, 1, 1);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0)
            .with_leakance(0.25)
            .with_lake_layer(1)
            .build(&grid, &idomain)
            .unwrap();
        assert_eq!(conns.records[0].cell, CellId::new(2, 0, 0));
        assert_eq!(conns.records[0].bedleak, 0.25);
    }

    #[test]
    fn test_negative_value_rejected() {
        let grid = lakes(vec![vec![0, -1]]);
        let idomain = IDomain::all_active(2, 1, 2);
        let err = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_lake_id_beyond_declared_count_rejected() {
        let grid = lakes(vec![vec![1, 2]]);
        let idomain = IDomain::all_active(2, 1, 2);
        let err = LakeConnectivityBuilder::new(1.0, 1.0)
            .with_lake_count(1)
            .build(&grid, &idomain)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_declared_count_reserves_trailing_slots() {
        // 声明数量大于网格最大编号时保留空计数槽
        let grid = lakes(vec![vec![1, 0]]);
        let idomain = IDomain::all_active(2, 1, 2);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0)
            .with_lake_count(2)
            .build(&grid, &idomain)
            .unwrap();
        assert_eq!(conns.counts, vec![2, 0]);
    }

    #[test]
    fn test_gap_in_lake_ids_rejected() {
        let grid = lakes(vec![vec![1, 3]]);
        let idomain = IDomain::all_active(2, 1, 2);
        assert!(LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).is_err());
    }

    #[test]
    fn test_huge_lake_id_rejected_without_allocation() {
        let grid = lakes(vec![vec![i32::MAX]]);
        let idomain = IDomain::all_active(2, 1, 1);
        let err = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().len() < 512);

        let err = LakeConnectivityBuilder::new(1.0, 1.0)
            .with_lake_count(1)
            .build(&grid, &idomain)
            .unwrap_err();
        assert!(err.to_string().contains("超出声明的湖泊数量"));
    }

    #[test]
    fn test_interior_gap_reported_once() {
        let grid = lakes(vec![vec![1, 1, 1, 4]]);
        let idomain = IDomain::all_active(2, 1, 4);
        let err = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap_err();
        let message = err.to_string();
        assert_eq!(message.matches("湖泊编号不连续").count(), 1);
        assert!(message.contains("[2, 3]"));
    }

    #[test]
    fn test_missing_lower_layer_rejected() {
        let grid = lakes(vec![vec![1]]);
        let idomain = IDomain::all_active(1, 1, 1);
        assert!(LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).is_err());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let grid = lakes(vec![vec![1, 0]]);
        let idomain = IDomain::all_active(2, 2, 2);
        assert!(LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).is_err());
    }

    #[test]
    fn test_no_lakes_yields_empty() {
        let grid = lakes(vec![vec![0, 0]]);
        let idomain = IDomain::all_active(2, 1, 2);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
        assert!(conns.is_empty());
        assert_eq!(conns.n_lakes(), 0);
    }

    #[test]
    fn test_deactivate_lake_cells() {
        let grid = lakes(vec![vec![0, 1], vec![1, 1]]);
        let mut idomain = IDomain::all_active(2, 2, 2);
        let n = deactivate_lake_cells(&mut idomain, &grid, 0).unwrap();
        assert_eq!(n, 3);
        assert!(idomain.is_active(CellId::new(0, 0, 0)));
        assert!(!idomain.is_active(CellId::new(0, 1, 1)));
        assert!(idomain.is_active(CellId::new(1, 1, 1)));
    }

    #[test]
    fn test_lake_package_data() {
        let grid = lakes(vec![vec![1, 0, 2]]);
        let idomain = IDomain::all_active(2, 1, 3);
        let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
        let names = vec!["lake1".to_string(), "lake2".to_string()];
        let data = lake_package_data(&conns, &[44.0, 35.2], &names).unwrap();
        assert_eq!(data[0].nlakeconn, 2);
        assert_eq!(data[1].boundname, "lake2");
        assert!(lake_package_data(&conns, &[44.0], &names).is_err());
    }

    #[test]
    fn test_claim_type_serializes_lowercase() {
        let json = serde_json::to_string(&ClaimType::Horizontal).unwrap();
        assert_eq!(json, "\"horizontal\"");
    }
}
