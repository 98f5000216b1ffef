// crates/gw_topology/tests/lake_topology.rs

//! 湖泊连接拓扑测试
//!
//! 对所有 3x3 的单湖/双湖归属网格穷举验证连接序号连续性和每单元记录数。

use gw_foundation::CellId;
use gw_topology::grid::{Grid2, IDomain, LakeGrid};
use gw_topology::lake::{deactivate_lake_cells, ClaimType, LakeConnectivityBuilder};

const N: usize = 3;

/// 由位掩码生成 3x3 网格，置位单元属于 `lake_of(k)`
fn grid_from_mask(mask: u32, lake_of: impl Fn(usize) -> i32) -> LakeGrid {
    let data = (0..N * N)
        .map(|k| if mask & (1 << k) != 0 { lake_of(k) } else { 0 })
        .collect();
    Grid2::from_vec(N, N, data).unwrap()
}

/// 湖泊编号必须从 1 连续，否则跳过该网格
fn ids_are_dense(grid: &LakeGrid) -> bool {
    let max = grid.iter().max().unwrap_or(0);
    (1..=max).all(|id| grid.iter().any(|v| v == id))
}

fn expected_records_for_cell(grid: &LakeGrid, idomain: &IDomain, row: usize, col: usize) -> usize {
    let mut n = 1;
    let neighbors = [
        (row.wrapping_sub(1), col),
        (row, col.wrapping_sub(1)),
        (row, col + 1),
        (row + 1, col),
    ];
    for (r, c) in neighbors {
        if let Some(v) = grid.get(r, c) {
            if v == 0 && idomain.is_active(CellId::new(0, r, c)) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_exhaustive_indices_contiguous() {
    let idomain = IDomain::all_active(2, N, N);
    let builder = LakeConnectivityBuilder::new(405.665, 403.717);

    for mask in 0..(1u32 << (N * N)) {
        for two_lakes in [false, true] {
            let grid = grid_from_mask(mask, |k| if two_lakes && k % N >= 2 { 2 } else { 1 });
            if !ids_are_dense(&grid) {
                continue;
            }
            let conns = builder.build(&grid, &idomain).unwrap();

            for lake in 0..conns.n_lakes() {
                let idx: Vec<usize> = conns.for_lake(lake).map(|r| r.iconn).collect();
                assert_eq!(idx, (0..conns.counts[lake]).collect::<Vec<_>>(), "mask={mask:#b}");
            }
            assert_eq!(conns.counts.iter().sum::<usize>(), conns.len());

            let lake_cells = grid.iter().filter(|&v| v > 0).count();
            let vertical = conns
                .records
                .iter()
                .filter(|r| r.claimtype == ClaimType::Vertical)
                .count();
            assert_eq!(vertical, lake_cells);
        }
    }
}

#[test]
fn test_exhaustive_records_per_cell() {
    // 第一层随机关闭若干单元
    let mut idomain = IDomain::all_active(2, N, N);
    idomain.set(CellId::new(0, 0, 2), 0).unwrap();
    idomain.set(CellId::new(0, 2, 0), 0).unwrap();
    let builder = LakeConnectivityBuilder::new(1.0, 1.0);

    for mask in 1..(1u32 << (N * N)) {
        let grid = grid_from_mask(mask, |_| 1);
        let conns = builder.build(&grid, &idomain).unwrap();

        let mut expected = 0;
        for ((row, col), v) in grid.indexed_iter() {
            if v > 0 {
                expected += expected_records_for_cell(&grid, &idomain, row, col);
            }
        }
        assert_eq!(conns.len(), expected, "mask={mask:#b}");
    }
}

#[test]
fn test_isolated_cell_only_vertical() {
    let grid = Grid2::from_rows(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
    let layer0 = Grid2::from_rows(vec![vec![1, 0, 1], vec![0, 1, 0], vec![1, 0, 1]]).unwrap();
    let layer1 = Grid2::filled(3, 3, 1);
    let idomain = IDomain::from_layers(&[layer0, layer1]).unwrap();

    let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
    assert_eq!(conns.len(), 1);
    assert_eq!(conns.records[0].claimtype, ClaimType::Vertical);
}

#[test]
fn test_fully_surrounded_cell_five_records() {
    let grid = Grid2::from_rows(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
    let idomain = IDomain::all_active(2, 3, 3);
    let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
    assert_eq!(conns.len(), 5);
    assert_eq!(
        conns
            .records
            .iter()
            .filter(|r| r.claimtype == ClaimType::Horizontal)
            .count(),
        4
    );
}

#[test]
fn test_l_shaped_lake_scenario() {
    // [[0,1],[1,1]]，全部活动
    let grid = Grid2::from_rows(vec![vec![0, 1], vec![1, 1]]).unwrap();
    let idomain = IDomain::all_active(2, 2, 2);
    let conns = LakeConnectivityBuilder::new(10.0, 20.0).build(&grid, &idomain).unwrap();

    let summary: Vec<(usize, CellId, ClaimType)> = conns
        .records
        .iter()
        .map(|r| (r.iconn, r.cell, r.claimtype))
        .collect();
    assert_eq!(
        summary,
        vec![
            // 单元 (0,1)：西邻 (0,0) 非湖泊
            (0, CellId::new(0, 0, 0), ClaimType::Horizontal),
            (1, CellId::new(1, 0, 1), ClaimType::Vertical),
            // 单元 (1,0)：北邻 (0,0) 非湖泊
            (2, CellId::new(0, 0, 0), ClaimType::Horizontal),
            (3, CellId::new(1, 1, 0), ClaimType::Vertical),
            // 单元 (1,1)：北、西均为湖泊
            (4, CellId::new(1, 1, 1), ClaimType::Vertical),
        ]
    );
    assert_eq!(conns.counts, vec![5]);

    // 西向连接: (delr/2, delc)；北向连接: (delc/2, delr)
    assert_eq!((conns.records[0].connlen, conns.records[0].connwidth), (5.0, 20.0));
    assert_eq!((conns.records[2].connlen, conns.records[2].connwidth), (10.0, 10.0));
}

#[test]
fn test_build_then_deactivate_keeps_records() {
    let grid = Grid2::from_rows(vec![vec![0, 1], vec![1, 1]]).unwrap();
    let mut idomain = IDomain::all_active(2, 2, 2);
    let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();

    deactivate_lake_cells(&mut idomain, &grid, 0).unwrap();
    assert_eq!(idomain.count_active(), 5);

    // 关闭湖泊单元后重新构建结果不变：湖泊单元本身从不作为水平连接目标
    let again = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
    assert_eq!(conns, again);
}

#[test]
fn test_records_serialize_as_flat_rows() {
    let grid = Grid2::from_rows(vec![vec![1]]).unwrap();
    let idomain = IDomain::all_active(2, 1, 1);
    let conns = LakeConnectivityBuilder::new(1.0, 1.0).build(&grid, &idomain).unwrap();
    let json = serde_json::to_value(&conns.records[0]).unwrap();
    assert_eq!(json["cell"], serde_json::json!([1, 0, 0]));
    assert_eq!(json["claimtype"], "vertical");
}
