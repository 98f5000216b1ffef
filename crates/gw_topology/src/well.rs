// crates/gw_topology/src/well.rs

//! 多含水层井连接构建
//!
//! 每口井位于一个平面单元，对其筛管穿过的每一层生成一条连接记录，
//! 井内连接序号从 0 连续递增；同时返回每口井的连接数作为包数据的
//! `ngwfnodes`。

use gw_foundation::validation::{check_finite, check_positive};
use gw_foundation::{CellId, GwResult, ValidationError, ValidationReport};
use serde::{Deserialize, Serialize};

use crate::grid::IDomain;

/// 井-含水层传导方程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConductanceEquation {
    /// 直接给定
    #[default]
    Specified,
    /// Thiem 方程
    Thiem,
    /// 考虑井皮
    Skin,
    /// Thiem 与井皮串联
    Cumulative,
    /// 均值
    Mean,
}

/// 井定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellSpec {
    /// 井所在行
    pub row: usize,
    /// 井所在列
    pub col: usize,
    /// 筛管穿过的层，严格递增
    pub layers: Vec<usize>,
    /// 井半径
    pub radius: f64,
    /// 井底高程
    pub bottom: f64,
    /// 初始水头
    pub strt: f64,
    /// 传导方程
    #[serde(default)]
    pub condeqn: ConductanceEquation,
    /// 筛管顶高程
    pub screen_top: f64,
    /// 筛管底高程
    pub screen_bottom: f64,
    /// 井皮渗透系数：长度为 1 时所有连接共用，否则与 `layers` 一一对应
    pub skin_k: Vec<f64>,
    /// 井皮半径
    pub skin_radius: f64,
    /// 边界名
    #[serde(default)]
    pub boundname: Option<String>,
}

/// 井连接记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellConnection {
    /// 井序号
    pub well: usize,
    /// 井内连接序号
    pub icon: usize,
    /// 连接的含水层单元
    pub cell: CellId,
    /// 筛管顶高程
    pub scrn_top: f64,
    /// 筛管底高程
    pub scrn_bot: f64,
    /// 井皮渗透系数
    pub hk_skin: f64,
    /// 井皮半径
    pub radius_skin: f64,
}

/// 井包数据记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellPackageData {
    /// 井序号
    pub well: usize,
    /// 井半径
    pub radius: f64,
    /// 井底高程
    pub bottom: f64,
    /// 初始水头
    pub strt: f64,
    /// 传导方程
    pub condeqn: ConductanceEquation,
    /// 连接数
    pub ngwfnodes: usize,
    /// 边界名
    pub boundname: Option<String>,
}

/// 井连接构建结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellConnections {
    /// 包数据
    pub package_data: Vec<WellPackageData>,
    /// 连接记录
    pub connections: Vec<WellConnection>,
}

/// 构建多含水层井连接
///
/// 提供 `idomain` 时，连接到不活动单元视为错误。
pub fn build_well_connections(
    wells: &[WellSpec],
    shape: (usize, usize, usize),
    idomain: Option<&IDomain>,
) -> GwResult<WellConnections> {
    validate_wells(wells, shape, idomain).into_result()?;

    let mut out = WellConnections::default();
    for (well, spec) in wells.iter().enumerate() {
        for (icon, &layer) in spec.layers.iter().enumerate() {
            let hk_skin = if spec.skin_k.len() == 1 {
                spec.skin_k[0]
            } else {
                spec.skin_k[icon]
            };
            out.connections.push(WellConnection {
                well,
                icon,
                cell: CellId::new(layer, spec.row, spec.col),
                scrn_top: spec.screen_top,
                scrn_bot: spec.screen_bottom,
                hk_skin,
                radius_skin: spec.skin_radius,
            });
        }
        out.package_data.push(WellPackageData {
            well,
            radius: spec.radius,
            bottom: spec.bottom,
            strt: spec.strt,
            condeqn: spec.condeqn,
            ngwfnodes: spec.layers.len(),
            boundname: spec.boundname.clone(),
        });
    }

    log::debug!(
        "井连接: {} 口井, {} 条连接",
        out.package_data.len(),
        out.connections.len()
    );
    Ok(out)
}

/// 验证井定义
pub fn validate_wells(
    wells: &[WellSpec],
    shape: (usize, usize, usize),
    idomain: Option<&IDomain>,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (w, spec) in wells.iter().enumerate() {
        if spec.layers.is_empty() {
            report.add_error(ValidationError::TopologyError {
                message: "井没有任何筛管层".into(),
                element_id: Some(w),
            });
        }
        if spec.layers.windows(2).any(|p| p[0] >= p[1]) {
            report.add_error(ValidationError::TopologyError {
                message: format!("筛管层必须严格递增: {:?}", spec.layers),
                element_id: Some(w),
            });
        }
        for &layer in &spec.layers {
            let cell = CellId::new(layer, spec.row, spec.col);
            if !cell.in_shape(shape) {
                report.add_error(ValidationError::CellOutsideGrid {
                    owner: "井",
                    element_id: w,
                    cell,
                    shape,
                });
            } else if idomain.is_some_and(|d| !d.is_active(cell)) {
                report.add_error(ValidationError::TopologyError {
                    message: format!("井连接到不活动单元 {}", cell),
                    element_id: Some(w),
                });
            }
        }
        if spec.skin_k.len() != 1 && spec.skin_k.len() != spec.layers.len() {
            report.add_error(ValidationError::ConsistencyError {
                message: format!(
                    "井{}: skin_k 长度 {} 既不是 1 也不等于筛管层数 {}",
                    w,
                    spec.skin_k.len(),
                    spec.layers.len()
                ),
            });
        }

        check_positive(&mut report, "radius", w, spec.radius);
        check_finite(&mut report, "bottom", w, spec.bottom);
        check_finite(&mut report, "strt", w, spec.strt);
        check_finite(&mut report, "skin_radius", w, spec.skin_radius);
        for &k in &spec.skin_k {
            check_finite(&mut report, "skin_k", w, k);
        }
        if check_finite(&mut report, "screen_top", w, spec.screen_top)
            && check_finite(&mut report, "screen_bottom", w, spec.screen_bottom)
            && spec.screen_top <= spec.screen_bottom
        {
            report.add_error(ValidationError::ConsistencyError {
                message: format!(
                    "井{}: 筛管顶 {} 不高于筛管底 {}",
                    w, spec.screen_top, spec.screen_bottom
                ),
            });
        }
    }

    report
}
