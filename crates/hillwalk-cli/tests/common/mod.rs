//! Fixtures shared by the CLI integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

/// Map over the N43W079 tile: a trail climbing north, stairs heading east,
/// and a separate lane nothing else connects to.
pub const MAP: &str = r#"{
  "points": [
    { "id": 1, "lat": 43.10, "lon": -78.90 },
    { "id": 2, "lat": 43.35, "lon": -78.90 },
    { "id": 3, "lat": 43.60, "lon": -78.90 },
    { "id": 4, "lat": 43.60, "lon": -78.60 },
    { "id": 5, "lat": 43.10, "lon": -78.20 },
    { "id": 6, "lat": 43.35, "lon": -78.20 }
  ],
  "ways": [
    { "id": 10, "refs": [1, 2, 3], "tags": { "highway": "footway", "name": "Ridge Trail" } },
    { "id": 11, "refs": [3, 4], "tags": { "highway": "steps" } },
    { "id": 12, "refs": [5, 6], "tags": { "highway": "path", "name": "Far Lane" } },
    { "id": 13, "refs": [6], "tags": { "highway": "path" } }
  ]
}"#;

pub struct Fixture {
    pub dir: TempDir,
    pub tile: PathBuf,
    pub map: PathBuf,
}

/// Write a 4x4 tile (10 m at the south row up to 40 m at the north row) and
/// the map above into a temporary directory.
pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("create temp dir");
    let rows: [[i16; 4]; 4] = [
        [40, 40, 40, 40],
        [30, 30, 30, 30],
        [20, 20, 20, 20],
        [10, 10, 10, 10],
    ];
    let bytes: Vec<u8> = rows
        .iter()
        .flatten()
        .flat_map(|value| value.to_be_bytes())
        .collect();
    let tile = dir.path().join("N43W079.hgt");
    fs::write(&tile, bytes).expect("write tile");

    let map = dir.path().join("map.json");
    fs::write(&map, MAP).expect("write map");
    Fixture { dir, tile, map }
}

/// `hillwalk` with both inputs set through the environment and color off.
pub fn cli(fixture: &Fixture) -> Command {
    let mut cmd = cargo_bin_cmd!("hillwalk");
    cmd.env("HILLWALK_ELEVATION", &fixture.tile)
        .env("HILLWALK_MAP", &fixture.map)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error");
    cmd
}
