// crates/gw_config/tests/demo_model.rs

//! 用 demos/lake_stream 的配置和输入文件走完整个构建流程

use std::path::PathBuf;

use gw_config::ModelConfig;
use gw_foundation::CellId;
use gw_topology::lake::{lake_package_data, ClaimType, LakeConnectivityBuilder};
use gw_topology::stream::StreamNetworkBuilder;
use gw_topology::well::build_well_connections;

fn demo_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/lake_stream")
}

fn load() -> ModelConfig {
    ModelConfig::from_file(demo_dir().join("model.json")).unwrap()
}

#[test]
fn test_demo_lake() {
    let config = load();
    let lake = config.lake.as_ref().unwrap();
    let lakes = gw_io::load_int_array_2d(&demo_dir().join(&lake.lake_file)).unwrap();
    let idomain = gw_io::load_idomain(
        &demo_dir().join(config.grid.idomain_file.as_ref().unwrap()),
        config.grid.shape(),
    )
    .unwrap();

    let conns = LakeConnectivityBuilder::new(
        config.grid.delr.uniform().unwrap(),
        config.grid.delc.uniform().unwrap(),
    )
    .with_leakance(lake.leakance)
    .with_lake_count(lake.stages.len())
    .build(&lakes, &idomain)
    .unwrap();

    // 5 个湖泊单元各一条垂直连接；湖泊周边 10 条水平连接
    let vertical = conns
        .records
        .iter()
        .filter(|r| r.claimtype == ClaimType::Vertical)
        .count();
    assert_eq!(vertical, 5);
    assert_eq!(conns.counts, vec![15]);
    assert_eq!(conns.records[0].cell, CellId::new(0, 0, 1));

    let pd = lake_package_data(&conns, &lake.stages, &lake.names).unwrap();
    assert_eq!(pd[0].nlakeconn, 15);
    assert_eq!(pd[0].boundname, "lake1");
}

#[test]
fn test_demo_stream() {
    let config = load();
    let stream = config.stream.as_ref().unwrap();
    let table = gw_io::load_reach_table(&demo_dir().join(&stream.reach_file)).unwrap();

    let network = StreamNetworkBuilder::new(stream.segments.clone())
        .with_junctions(stream.junctions.clone())
        .with_channel(stream.channel)
        .with_grid_shape(config.grid.shape())
        .build(&table)
        .unwrap();

    let n: Vec<usize> = network.package_data.iter().map(|r| r.n_connections).collect();
    assert_eq!(n, vec![1, 2, 2, 2, 2, 1]);
    assert_eq!(network.package_data[3].boundname, "SEG2");
}

#[test]
fn test_demo_wells() {
    let config = load();
    let out = build_well_connections(&config.wells, config.grid.shape(), None).unwrap();
    assert_eq!(out.package_data[0].ngwfnodes, 2);
    assert_eq!(out.connections[1].cell, CellId::new(2, 4, 4));
    assert!(out.connections.iter().all(|c| c.hk_skin == 100.0));
}
