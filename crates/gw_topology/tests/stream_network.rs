// crates/gw_topology/tests/stream_network.rs

//! 河流网络测试：三条 segment，两条支流在第三条的首个河段汇合

use gw_foundation::CellId;
use gw_topology::stream::{
    FlowDirection, Junction, Reach, ReachLink, ReachTable, SegmentElevation, StreamNetworkBuilder,
};

/// segment 1: 河段 0..18，segment 2: 河段 18..31，segment 3: 河段 31..36
fn branching_table() -> ReachTable {
    let mut reaches = Vec::new();
    for i in 0..18 {
        reaches.push(Reach::new(1, CellId::new(0, i, 3), 400.0));
    }
    for i in 0..13 {
        reaches.push(Reach::new(2, CellId::new(0, 5 + i, 10), 300.0 + 10.0 * i as f64));
    }
    for i in 0..5 {
        reaches.push(Reach::new(3, CellId::new(0, 18 + i, 6), 250.0));
    }
    ReachTable::new(reaches)
}

fn builder() -> StreamNetworkBuilder {
    StreamNetworkBuilder::new(vec![
        SegmentElevation::new(1, 49.0, 45.0),
        SegmentElevation::new(2, 44.5, 34.0),
        SegmentElevation::new(3, 41.5, 34.0),
    ])
    .with_junctions(vec![Junction::new(17, 31), Junction::new(30, 31)])
    .with_grid_shape((1, 25, 15))
}

#[test]
fn test_confluence_neighbors() {
    let network = builder().build(&branching_table()).unwrap();
    let conn = &network.connectivity;

    assert_eq!(
        conn.neighbors(31),
        &[ReachLink::downstream(32), ReachLink::upstream(17), ReachLink::upstream(30)]
    );
    assert_eq!(conn.neighbors(17), &[ReachLink::upstream(16), ReachLink::downstream(31)]);
    assert_eq!(conn.neighbors(30), &[ReachLink::upstream(29), ReachLink::downstream(31)]);

    // 各 segment 首河段没有上游（汇流点除外）、末河段没有下游
    assert_eq!(conn.neighbors(0), &[ReachLink::downstream(1)]);
    assert_eq!(conn.neighbors(18), &[ReachLink::downstream(19)]);
    assert_eq!(conn.neighbors(35), &[ReachLink::upstream(34)]);
}

#[test]
fn test_links_are_symmetric() {
    let network = builder().build(&branching_table()).unwrap();
    let conn = &network.connectivity;

    for (i, links) in conn.links().iter().enumerate() {
        for link in links {
            let mirrored = match link.direction {
                FlowDirection::Downstream => ReachLink::upstream(i),
                FlowDirection::Upstream => ReachLink::downstream(i),
            };
            assert!(
                conn.neighbors(link.reach).contains(&mirrored),
                "河段 {} -> {:?} 缺少反向连接",
                i,
                link
            );
        }
    }
}

#[test]
fn test_connection_count_totals() {
    let table = branching_table();
    let network = builder().build(&table).unwrap();
    let conn = &network.connectivity;

    // 每个 segment 内 n-1 条自动连接
    assert_eq!(conn.automatic_links(), 17 + 12 + 4);

    let total: usize = network.package_data.iter().map(|r| r.n_connections).sum();
    assert_eq!(total, 2 * (conn.automatic_links() + 2));
}

#[test]
fn test_geometry_decreases_along_segment() {
    let table = branching_table();
    let b = builder();
    let geometry = b.segment_geometry(&table).unwrap();
    let spans = table.segment_spans();
    let elevations = [(49.0, 45.0), (44.5, 34.0), (41.5, 34.0)];

    for (span, (top, bottom)) in spans.iter().zip(elevations) {
        let g = &geometry[span.start..span.end];
        let total: f64 = table.reaches()[span.start..span.end].iter().map(|r| r.length).sum();

        assert!(g.windows(2).all(|w| w[1].distance > w[0].distance));
        assert!(g.windows(2).all(|w| w[1].top_elevation < w[0].top_elevation));
        assert!(g.iter().all(|r| r.top_elevation < top && r.top_elevation > bottom));
        assert!(g.iter().all(|r| (r.slope - (top - bottom) / total).abs() < 1e-12));
        assert!(g.iter().all(|r| (r.segment_length - total).abs() < 1e-9));

        // 末河段中点到 segment 末端的距离为其半长
        let last_len = table.reaches()[span.end - 1].length;
        assert!((g[g.len() - 1].distance - (total - 0.5 * last_len)).abs() < 1e-9);
    }
}

#[test]
fn test_package_data_defaults_and_boundnames() {
    let network = builder().build(&branching_table()).unwrap();
    let pd = &network.package_data;

    assert_eq!(pd.len(), 36);
    assert_eq!(pd[17].boundname, "SEG1");
    assert_eq!(pd[18].boundname, "SEG2");
    assert_eq!(pd[35].boundname, "SEG3");
    assert_eq!(pd[31].n_connections, 3);
    for r in pd {
        assert_eq!(r.width, 5.0);
        assert_eq!(r.bed_thickness, 1.0);
        assert_eq!(r.bed_k, 100.0);
        assert_eq!(r.manning, 0.03);
        assert_eq!(r.upstream_fraction, 1.0);
        assert_eq!(r.n_diversions, 0);
    }
}

#[test]
fn test_signed_rows_for_confluence() {
    let network = builder().build(&branching_table()).unwrap();
    let rows = network.connectivity.to_signed_rows().unwrap();
    assert_eq!(rows[31], vec![31, -32, 17, 30]);
    assert_eq!(rows[0], vec![0, -1]);
}

#[test]
fn test_validate_collects_all_problems() {
    let table = ReachTable::new(vec![
        Reach::new(1, CellId::new(0, 0, 0), 1.0),
        Reach::new(2, CellId::new(0, 0, 40), 1.0),
        Reach::new(1, CellId::new(0, 0, 2), 1.0),
    ]);
    let report = StreamNetworkBuilder::new(vec![SegmentElevation::new(1, 1.0, 0.0)])
        .with_junctions(vec![Junction::new(0, 9)])
        .with_grid_shape((1, 1, 10))
        .validate(&table);

    // 不连续 segment、越界单元、无效汇流点、segment 2 缺少高程
    assert_eq!(report.error_count(), 4);
}
