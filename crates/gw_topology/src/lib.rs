// crates/gw_topology/src/lib.rs

//! GwLink 拓扑构建层
//!
//! 将结构化网格数组和表格数据转换为模拟器的包配置记录。
//! 所有构建器都是无状态纯函数：先完整验证输入，再单遍扫描生成记录。
//!
//! # 模块概览
//!
//! - [`grid`]: 二维数组、活动域数组与离散信息
//! - [`lake`]: 湖泊-含水层连接
//! - [`stream`]: 河段连接图与河段几何
//! - [`exchange`]: 嵌套子网格交换
//! - [`well`]: 多含水层井连接
//!
//! # 示例
//!
//! ```
//! use gw_foundation::CellId;
//! use gw_topology::stream::{Reach, ReachTable, SegmentElevation, StreamNetworkBuilder};
//!
//! let table = ReachTable::new(vec![
//!     Reach::new(1, CellId::new(0, 0, 0), 10.0),
//!     Reach::new(1, CellId::new(0, 0, 1), 20.0),
//!     Reach::new(1, CellId::new(0, 0, 2), 30.0),
//! ]);
//! let network = StreamNetworkBuilder::new(vec![SegmentElevation::new(1, 60.0, 0.0)])
//!     .build(&table)
//!     .unwrap();
//! assert_eq!(network.package_data[1].n_connections, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod exchange;
pub mod grid;
pub mod lake;
pub mod stream;
pub mod well;

pub use exchange::{ChildPlacement, ExchangeRecord, ExchangeSide, NestedExchangeBuilder};
pub use grid::{Discretization, Grid2, IDomain, LakeGrid};
pub use lake::{
    deactivate_lake_cells, lake_package_data, ClaimType, LakeConnection, LakeConnections,
    LakeConnectivityBuilder, LakePackageData,
};
pub use stream::{
    build_connectivity, segment_geometry, ChannelParams, FlowDirection, Junction, Reach,
    ReachConnectivity, ReachGeometry, ReachLink, ReachPackageData, ReachTable, SegmentElevation,
    SegmentId, StreamNetwork, StreamNetworkBuilder,
};
pub use well::{
    build_well_connections, ConductanceEquation, WellConnection, WellConnections,
    WellPackageData, WellSpec,
};
