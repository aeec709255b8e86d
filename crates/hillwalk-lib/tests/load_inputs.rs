//! End-to-end tests decoding HGT and map-entity files from disk.

use std::fs;

use hillwalk_lib::{
    build_graph, load_entities, plan_route, BuildOptions, CostModel, ElevationGrid, Error,
    PlanOutcome, RouteRequest,
};
use tempfile::TempDir;

/// 4x4 tile written north row first, as SRTM stores it.
fn write_tile(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let rows: [[i16; 4]; 4] = [
        [40, 40, 40, 40], // north
        [30, 30, 30, 30],
        [20, 20, 20, 20],
        [10, 10, 10, 10], // south
    ];
    let bytes: Vec<u8> = rows
        .iter()
        .flatten()
        .flat_map(|value| value.to_be_bytes())
        .collect();
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write tile");
    path
}

const MAP: &str = r#"{
  "points": [
    { "id": 1, "lat": 43.10, "lon": -78.90 },
    { "id": 2, "lat": 43.35, "lon": -78.90 },
    { "id": 3, "lat": 43.60, "lon": -78.90 },
    { "id": 4, "lat": 43.60, "lon": -78.60 }
  ],
  "ways": [
    { "id": 10, "refs": [1, 2, 3], "tags": { "highway": "footway", "name": "Ridge Trail" } },
    { "id": 11, "refs": [3, 4], "tags": { "highway": "steps" } },
    { "id": 12, "refs": [1, 4], "tags": { "landuse": "park" } }
  ]
}"#;

#[test]
fn loads_tile_bounds_from_file_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let tile = write_tile(&dir, "N43W079.hgt");

    let grid = ElevationGrid::load_hgt(&tile).expect("tile loads");
    assert_eq!(grid.dim(), 4);
    assert_eq!(grid.bounds().south, 43.0);
    assert_eq!(grid.bounds().west, -79.0);
    assert_eq!(grid.lookup(43.1, -78.9), Ok(10));
    assert_eq!(grid.lookup(43.9, -78.9), Ok(40));
}

#[test]
fn rejects_tile_without_srtm_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let tile = write_tile(&dir, "terrain.hgt");

    let err = ElevationGrid::load_hgt(&tile).unwrap_err();
    assert!(matches!(err, Error::InvalidTileName { .. }));
}

#[test]
fn builds_and_plans_from_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let tile = write_tile(&dir, "N43W079.hgt");
    let map = dir.path().join("map.json");
    fs::write(&map, MAP).expect("write map");

    let grid = ElevationGrid::load_hgt(&tile).unwrap();
    let entities = load_entities(&map).unwrap();
    let cost = CostModel::default();
    let (graph, report) = build_graph(&grid, &entities, &cost, BuildOptions::default()).unwrap();

    assert_eq!(report.nodes, 4);
    assert_eq!(report.ways, 2);
    assert_eq!(report.ignored_ways, 1);
    assert_eq!(graph.node(1).unwrap().elevation, 10);
    assert_eq!(graph.node(3).unwrap().elevation, 30);
    assert_eq!(graph.node(3).unwrap().label(), "Ridge Trail unnamed");

    let PlanOutcome::Found(plan) = plan_route(&graph, &RouteRequest::nodes(1, 4)).unwrap()
    else {
        panic!("route exists");
    };
    assert_eq!(plan.steps, vec![1, 2, 3, 4]);
    let legs: Vec<_> = plan.legs().into_iter().map(|leg| leg.way_name).collect();
    assert_eq!(legs, vec!["Ridge Trail", "unnamed"]);
}

#[test]
fn missing_map_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_entities(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
