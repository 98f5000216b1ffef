// crates/gw_topology/src/stream.rs

//! 河流网络构建
//!
//! 输入为按文件顺序排列的河段表（每个河段属于一个 segment 并位于一个网格单元），
//! 输出为：
//!
//! 1. 河段之间的上下游连接（显式方向标记，不使用正负号编码）
//! 2. 每个河段的河床坡度、沿程距离和河道顶高程
//! 3. 汇总后的河段包数据记录
//!
//! # 连接规则
//!
//! 顺序遍历河段表，若当前河段与前一河段属于同一 segment，则当前河段获得上游邻居
//! `i-1`，前一河段获得下游邻居 `i`；segment 变化时不自动连接。自动连接数恒等于
//! 河段数减 segment 数。segment 之间的汇流由调用方以 [`Junction`] 显式给出。
//!
//! # 几何规则
//!
//! 对每个 segment：总长度为其河段长度之和，坡度为 `(top - bottom) / total`；
//! 沿程距离为河段中点的累积位置（第一个河段为 `L0/2`，之后每个河段累加
//! `L_prev/2 + L_cur/2`）；河道顶高程为 `top - distance / total * (top - bottom)`。

use std::collections::{HashMap, HashSet};

use gw_foundation::validation::{check_finite, check_range};
use gw_foundation::{CellId, GwError, GwResult, ValidationError, ValidationReport};
use serde::{Deserialize, Serialize};

/// Segment 编号
pub type SegmentId = u32;

/// 河段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reach {
    /// 所属 segment
    pub segment: SegmentId,
    /// 所在网格单元
    pub cell: CellId,
    /// 河段物理长度
    pub length: f64,
}

impl Reach {
    /// 创建河段
    pub fn new(segment: SegmentId, cell: CellId, length: f64) -> Self {
        Self { segment, cell, length }
    }
}

/// 一个 segment 在河段表中占据的连续区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    /// segment 编号
    pub segment: SegmentId,
    /// 起始河段（含）
    pub start: usize,
    /// 结束河段（不含）
    pub end: usize,
}

impl SegmentSpan {
    /// 河段数
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// 有序河段表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachTable {
    reaches: Vec<Reach>,
}

impl ReachTable {
    /// 从河段列表创建（顺序即下游顺序）
    pub fn new(reaches: Vec<Reach>) -> Self {
        Self { reaches }
    }

    /// 河段数
    #[inline]
    pub fn len(&self) -> usize {
        self.reaches.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reaches.is_empty()
    }

    /// 全部河段
    #[inline]
    pub fn reaches(&self) -> &[Reach] {
        &self.reaches
    }

    /// 按表顺序划分 segment 区间（相邻且编号相同的河段归为一组）
    pub fn segment_spans(&self) -> Vec<SegmentSpan> {
        let mut spans: Vec<SegmentSpan> = Vec::new();
        for (i, reach) in self.reaches.iter().enumerate() {
            match spans.last_mut() {
                Some(span) if span.segment == reach.segment => span.end = i + 1,
                _ => spans.push(SegmentSpan {
                    segment: reach.segment,
                    start: i,
                    end: i + 1,
                }),
            }
        }
        spans
    }

    /// 验证河段表本身：segment 连续、长度有限非负、单元位于网格内
    pub fn validate(&self, grid_shape: Option<(usize, usize, usize)>) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut seen = HashSet::new();
        for span in self.segment_spans() {
            if !seen.insert(span.segment) {
                report.add_error(ValidationError::TopologyError {
                    message: format!("segment {} 的河段在表中不连续", span.segment),
                    element_id: Some(span.start),
                });
            }
        }

        for (i, reach) in self.reaches.iter().enumerate() {
            check_range(&mut report, "length", i, reach.length, 0.0, f64::MAX);
            if let Some(shape) = grid_shape {
                if !reach.cell.in_shape(shape) {
                    report.add_error(ValidationError::CellOutsideGrid {
                        owner: "河段",
                        element_id: i,
                        cell: reach.cell,
                        shape,
                    });
                }
            }
        }

        report
    }
}

impl FromIterator<Reach> for ReachTable {
    fn from_iter<I: IntoIterator<Item = Reach>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 邻居相对于本河段的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// 邻居位于上游，向本河段供水
    Upstream,
    /// 邻居位于下游，接收本河段出流
    Downstream,
}

/// 河段连接（带方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReachLink {
    /// 邻居河段序号
    pub reach: usize,
    /// 邻居方向
    pub direction: FlowDirection,
}

impl ReachLink {
    /// 上游邻居
    #[inline]
    pub fn upstream(reach: usize) -> Self {
        Self {
            reach,
            direction: FlowDirection::Upstream,
        }
    }

    /// 下游邻居
    #[inline]
    pub fn downstream(reach: usize) -> Self {
        Self {
            reach,
            direction: FlowDirection::Downstream,
        }
    }
}

/// 汇流点：`upstream` 河段的出流进入 `downstream` 河段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Junction {
    /// 上游河段序号
    pub upstream: usize,
    /// 下游河段序号
    pub downstream: usize,
}

impl Junction {
    /// 创建汇流点
    pub fn new(upstream: usize, downstream: usize) -> Self {
        Self { upstream, downstream }
    }
}

/// 河段连接图
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachConnectivity {
    links: Vec<Vec<ReachLink>>,
    automatic_links: usize,
}

impl ReachConnectivity {
    /// 河段数
    #[inline]
    pub fn n_reaches(&self) -> usize {
        self.links.len()
    }

    /// 指定河段的邻居，按加入顺序
    #[inline]
    pub fn neighbors(&self, reach: usize) -> &[ReachLink] {
        &self.links[reach]
    }

    /// 指定河段的邻居数量
    #[inline]
    pub fn n_connections(&self, reach: usize) -> usize {
        self.links[reach].len()
    }

    /// 由 segment 顺序自动生成的连接数（每条连接计一次）
    #[inline]
    pub fn automatic_links(&self) -> usize {
        self.automatic_links
    }

    /// 全部邻接表
    #[inline]
    pub fn links(&self) -> &[Vec<ReachLink>] {
        &self.links
    }

    /// 导出为正负号编码的行：`[reach, neighbor...]`，下游邻居取负号
    ///
    /// 序号 0 的负数仍为 0，因此河段 0 作为下游邻居时无法表达，返回验证错误。
    pub fn to_signed_rows(&self) -> GwResult<Vec<Vec<i64>>> {
        let mut rows = Vec::with_capacity(self.links.len());
        for (reach, links) in self.links.iter().enumerate() {
            let mut row = Vec::with_capacity(links.len() + 1);
            row.push(reach as i64);
            for link in links {
                let idx = link.reach as i64;
                match link.direction {
                    FlowDirection::Upstream => row.push(idx),
                    FlowDirection::Downstream if idx == 0 => {
                        return Err(GwError::validation(format!(
                            "河段 {} 的下游邻居为河段 0，正负号编码无法表示",
                            reach
                        )));
                    }
                    FlowDirection::Downstream => row.push(-idx),
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// 按表顺序生成河段连接，并追加汇流点
pub fn build_connectivity(table: &ReachTable, junctions: &[Junction]) -> GwResult<ReachConnectivity> {
    let mut report = table.validate(None);
    validate_junctions(&mut report, table.len(), junctions);
    report.into_result()?;

    let reaches = table.reaches();
    let mut links: Vec<Vec<ReachLink>> = vec![Vec::new(); reaches.len()];
    let mut automatic_links = 0;
    let mut previous: Option<SegmentId> = None;

    for (i, reach) in reaches.iter().enumerate() {
        if previous == Some(reach.segment) {
            links[i].push(ReachLink::upstream(i - 1));
            links[i - 1].push(ReachLink::downstream(i));
            automatic_links += 1;
        }
        previous = Some(reach.segment);
    }

    for junction in junctions {
        links[junction.upstream].push(ReachLink::downstream(junction.downstream));
        links[junction.downstream].push(ReachLink::upstream(junction.upstream));
    }

    log::debug!(
        "河段连接: {} 个河段, {} 条自动连接, {} 个汇流点",
        reaches.len(),
        automatic_links,
        junctions.len()
    );

    Ok(ReachConnectivity {
        links,
        automatic_links,
    })
}

fn validate_junctions(report: &mut ValidationReport, n_reaches: usize, junctions: &[Junction]) {
    for (k, junction) in junctions.iter().enumerate() {
        for idx in [junction.upstream, junction.downstream] {
            if idx >= n_reaches {
                report.add_error(ValidationError::TopologyError {
                    message: format!("汇流点引用的河段 {} 超出范围 0..{}", idx, n_reaches),
                    element_id: Some(k),
                });
            }
        }
        if junction.upstream == junction.downstream {
            report.add_error(ValidationError::TopologyError {
                message: format!("汇流点不能连接河段 {} 自身", junction.upstream),
                element_id: Some(k),
            });
        }
    }
}

/// Segment 端点高程
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentElevation {
    /// segment 编号
    pub segment: SegmentId,
    /// 上游端（顶部）高程
    pub top: f64,
    /// 下游端（底部）高程
    pub bottom: f64,
}

impl SegmentElevation {
    /// 创建 segment 高程
    pub fn new(segment: SegmentId, top: f64, bottom: f64) -> Self {
        Self { segment, top, bottom }
    }
}

/// 河段几何
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachGeometry {
    /// 所属 segment
    pub segment: SegmentId,
    /// segment 总长度
    pub segment_length: f64,
    /// 河床坡度（整个 segment 相同）
    pub slope: f64,
    /// 河段中点距 segment 上游端的距离
    pub distance: f64,
    /// 河道顶高程
    pub top_elevation: f64,
}

/// 计算每个河段的坡度和河道顶高程
pub fn segment_geometry(table: &ReachTable, elevations: &[SegmentElevation]) -> GwResult<Vec<ReachGeometry>> {
    let mut report = table.validate(None);
    let lookup = elevation_lookup(&mut report, elevations);
    let spans = table.segment_spans();
    validate_spans(&mut report, table, &spans, &lookup);
    report.into_result()?;

    let reaches = table.reaches();
    let mut geometry = Vec::with_capacity(reaches.len());

    for span in &spans {
        let elev = lookup[&span.segment];
        let members = &reaches[span.start..span.end];
        let total: f64 = members.iter().map(|r| r.length).sum();
        let drop = elev.top - elev.bottom;
        let slope = drop / total;
        if slope < 0.0 {
            log::warn!(
                "segment {} 顶高程 {} 低于底高程 {}，坡度为负",
                span.segment,
                elev.top,
                elev.bottom
            );
        }

        let mut distance = 0.0;
        for (k, reach) in members.iter().enumerate() {
            distance = if k == 0 {
                0.5 * reach.length
            } else {
                distance + 0.5 * members[k - 1].length + 0.5 * reach.length
            };
            geometry.push(ReachGeometry {
                segment: span.segment,
                segment_length: total,
                slope,
                distance,
                top_elevation: elev.top - distance / total * drop,
            });
        }
    }

    Ok(geometry)
}

fn elevation_lookup(
    report: &mut ValidationReport,
    elevations: &[SegmentElevation],
) -> HashMap<SegmentId, SegmentElevation> {
    let mut lookup = HashMap::with_capacity(elevations.len());
    for (k, elev) in elevations.iter().enumerate() {
        check_finite(report, "segment_top", k, elev.top);
        check_finite(report, "segment_bottom", k, elev.bottom);
        if lookup.insert(elev.segment, *elev).is_some() {
            report.add_error(ValidationError::ConsistencyError {
                message: format!("segment {} 的端点高程重复定义", elev.segment),
            });
        }
    }
    lookup
}

fn validate_spans(
    report: &mut ValidationReport,
    table: &ReachTable,
    spans: &[SegmentSpan],
    lookup: &HashMap<SegmentId, SegmentElevation>,
) {
    let reaches = table.reaches();
    for span in spans {
        match lookup.get(&span.segment) {
            None => report.add_error(ValidationError::ConsistencyError {
                message: format!("segment {} 缺少端点高程", span.segment),
            }),
            Some(elev) if !(elev.top - elev.bottom).is_finite() => {
                report.add_error(ValidationError::ConsistencyError {
                    message: format!("segment {} 的高程差溢出", span.segment),
                })
            }
            Some(_) => {}
        }
        let total: f64 = reaches[span.start..span.end].iter().map(|r| r.length).sum();
        if !(total > 0.0 && total.is_finite()) {
            report.add_error(ValidationError::TopologyError {
                message: format!("segment {} 总长度为 {}，无法计算坡度", span.segment, total),
                element_id: Some(span.start),
            });
        }
    }
}

/// 河道参数（对所有河段相同）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// 河宽
    pub width: f64,
    /// 河床厚度
    pub bed_thickness: f64,
    /// 河床渗透系数
    pub bed_k: f64,
    /// Manning 糙率
    pub manning: f64,
    /// 上游来水比例
    pub upstream_fraction: f64,
    /// 分流数
    pub n_diversions: usize,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            width: 5.0,
            bed_thickness: 1.0,
            bed_k: 100.0,
            manning: 0.03,
            upstream_fraction: 1.0,
            n_diversions: 0,
        }
    }
}

/// 河段包数据记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachPackageData {
    /// 河段序号
    pub reach: usize,
    /// 所在单元
    pub cell: CellId,
    /// 河段长度
    pub length: f64,
    /// 河宽
    pub width: f64,
    /// 河床坡度
    pub slope: f64,
    /// 河道顶高程
    pub top_elevation: f64,
    /// 河床厚度
    pub bed_thickness: f64,
    /// 河床渗透系数
    pub bed_k: f64,
    /// Manning 糙率
    pub manning: f64,
    /// 邻居数量
    pub n_connections: usize,
    /// 上游来水比例
    pub upstream_fraction: f64,
    /// 分流数
    pub n_diversions: usize,
    /// 边界名
    pub boundname: String,
}

/// 河流网络构建结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamNetwork {
    /// 每个河段的包数据
    pub package_data: Vec<ReachPackageData>,
    /// 连接图
    pub connectivity: ReachConnectivity,
}

/// 河流网络构建器
#[derive(Debug, Clone)]
pub struct StreamNetworkBuilder {
    segments: Vec<SegmentElevation>,
    junctions: Vec<Junction>,
    channel: ChannelParams,
    grid_shape: Option<(usize, usize, usize)>,
}

impl StreamNetworkBuilder {
    /// 以 segment 端点高程创建
    pub fn new(segments: Vec<SegmentElevation>) -> Self {
        Self {
            segments,
            junctions: Vec::new(),
            channel: ChannelParams::default(),
            grid_shape: None,
        }
    }

    /// 设置汇流点
    pub fn with_junctions(mut self, junctions: Vec<Junction>) -> Self {
        self.junctions = junctions;
        self
    }

    /// 设置河道参数
    pub fn with_channel(mut self, channel: ChannelParams) -> Self {
        self.channel = channel;
        self
    }

    /// 设置网格形状，用于检查河段单元是否越界
    pub fn with_grid_shape(mut self, shape: (usize, usize, usize)) -> Self {
        self.grid_shape = Some(shape);
        self
    }

    /// 只构建连接图
    pub fn build_connectivity(&self, table: &ReachTable) -> GwResult<ReachConnectivity> {
        build_connectivity(table, &self.junctions)
    }

    /// 只计算几何
    pub fn segment_geometry(&self, table: &ReachTable) -> GwResult<Vec<ReachGeometry>> {
        segment_geometry(table, &self.segments)
    }

    /// 验证全部输入，收集所有问题
    pub fn validate(&self, table: &ReachTable) -> ValidationReport {
        let mut report = table.validate(self.grid_shape);
        validate_junctions(&mut report, table.len(), &self.junctions);
        let lookup = elevation_lookup(&mut report, &self.segments);
        validate_spans(&mut report, table, &table.segment_spans(), &lookup);

        let c = &self.channel;
        check_range(&mut report, "width", 0, c.width, 0.0, f64::MAX);
        check_range(&mut report, "bed_thickness", 0, c.bed_thickness, 0.0, f64::MAX);
        check_range(&mut report, "bed_k", 0, c.bed_k, 0.0, f64::MAX);
        check_range(&mut report, "manning", 0, c.manning, 0.0, f64::MAX);
        check_range(&mut report, "upstream_fraction", 0, c.upstream_fraction, 0.0, 1.0);
        report
    }

    /// 构建完整河流网络
    pub fn build(&self, table: &ReachTable) -> GwResult<StreamNetwork> {
        self.validate(table).into_result()?;

        let connectivity = self.build_connectivity(table)?;
        let geometry = self.segment_geometry(table)?;
        let c = self.channel;

        let package_data = table
            .reaches()
            .iter()
            .zip(&geometry)
            .enumerate()
            .map(|(i, (reach, geom))| ReachPackageData {
                reach: i,
                cell: reach.cell,
                length: reach.length,
                width: c.width,
                slope: geom.slope,
                top_elevation: geom.top_elevation,
                bed_thickness: c.bed_thickness,
                bed_k: c.bed_k,
                manning: c.manning,
                n_connections: connectivity.n_connections(i),
                upstream_fraction: c.upstream_fraction,
                n_diversions: c.n_diversions,
                boundname: format!("SEG{}", reach.segment),
            })
            .collect();

        Ok(StreamNetwork {
            package_data,
            connectivity,
        })
    }
}
