//! Common test utilities and synthetic graph fixtures.
//!
//! Integration tests build small graphs from in-memory entities instead of
//! map files, so every fixture is visible in the test that uses it.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hillwalk_lib::{
    build_graph, BoundingBox, BuildOptions, CostModel, ElevationGrid, Graph, MapEntity, NodeId,
    PointEntity, WayEntity, WayId, WayTags, METERS_PER_DEGREE_LAT,
};

/// Side length, in degrees, of one cell of [`banded_grid`].
pub const CELL_DEGREES: f64 = 0.001;

/// Latitude offset in degrees covering `meters` of northward travel.
pub fn north_of(lat: f64, meters: f64) -> f64 {
    lat + meters / METERS_PER_DEGREE_LAT
}

/// Square grid anchored at (0, 0) whose rows (south first) carry the given
/// elevations across every column.
pub fn banded_grid(rows: &[i16]) -> ElevationGrid {
    let dim = rows.len();
    let samples = rows
        .iter()
        .flat_map(|elevation| std::iter::repeat(*elevation).take(dim))
        .collect();
    let span = dim as f64 * CELL_DEGREES;
    let bounds = BoundingBox {
        south: 0.0,
        west: 0.0,
        north: span,
        east: span,
    };
    ElevationGrid::new(samples, bounds).expect("square grid")
}

pub fn point(id: NodeId, lat: f64, lon: f64) -> MapEntity {
    MapEntity::Point(PointEntity { id, lat, lon })
}

/// Way entity whose tags go through the same extraction as decoded files.
pub fn way(id: WayId, refs: &[NodeId], tags: &[(&str, &str)]) -> MapEntity {
    MapEntity::Way(WayEntity {
        id,
        refs: refs.to_vec(),
        tags: WayTags::extract(tags.iter().copied()),
    })
}

pub fn footway(id: WayId, name: &str, refs: &[NodeId]) -> MapEntity {
    way(id, refs, &[("highway", "footway"), ("name", name)])
}

pub fn build(grid: &ElevationGrid, entities: &[MapEntity]) -> Graph {
    build_with(grid, entities, &CostModel::default())
}

pub fn build_with(grid: &ElevationGrid, entities: &[MapEntity], cost: &CostModel) -> Graph {
    build_graph(grid, entities, cost, BuildOptions::default())
        .expect("graph builds")
        .0
}

/// The A(0 m) - B(10 m) - C(0 m) street: 100 m between consecutive nodes,
/// B on a 10 m rise.
pub fn hill_street() -> (ElevationGrid, Vec<MapEntity>) {
    let grid = banded_grid(&[0, 10, 0]);
    let lon = 0.0005;
    let a = 0.0005;
    let b = north_of(a, 100.0);
    let c = north_of(b, 100.0);
    let entities = vec![
        point(1, a, lon),
        point(2, b, lon),
        point(3, c, lon),
        footway(100, "Hill Street", &[1, 2, 3]),
    ];
    (grid, entities)
}

/// Random hilly network: `nodes` points scattered over a 10x10 grid of
/// random elevations, joined by `ways` short ways with mixed one-way and
/// stairs tags.
pub fn random_network(seed: u64, nodes: i64, ways: i64) -> (ElevationGrid, Vec<MapEntity>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let dim = 10;
    let rows: Vec<i16> = (0..dim).map(|_| rng.gen_range(0..60)).collect();
    let grid = banded_grid(&rows);
    let span = dim as f64 * CELL_DEGREES;

    let mut entities: Vec<MapEntity> = (0..nodes)
        .map(|id| point(id, rng.gen::<f64>() * span, rng.gen::<f64>() * span))
        .collect();

    for way_id in 0..ways {
        let len = rng.gen_range(2..5);
        let refs: Vec<NodeId> = (0..len).map(|_| rng.gen_range(0..nodes)).collect();
        let highway = if rng.gen_range(0..5) == 0 { "steps" } else { "footway" };
        let oneway = if rng.gen_range(0..4) == 0 { "yes" } else { "no" };
        let name = format!("way-{way_id}");
        entities.push(way(
            1_000 + way_id,
            &refs,
            &[("highway", highway), ("oneway", oneway), ("name", name.as_str())],
        ));
    }

    (grid, entities)
}

/// Exhaustive shortest-path costs from `start` by repeated relaxation of
/// every edge until nothing improves.
pub fn brute_force_costs(graph: &Graph, start: NodeId) -> std::collections::HashMap<NodeId, f64> {
    let mut best = std::collections::HashMap::from([(start, 0.0)]);
    loop {
        let mut changed = false;
        for node in graph.nodes() {
            let Some(&base) = best.get(&node.id) else {
                continue;
            };
            for edge in node.edges() {
                let candidate = base + edge.cost;
                let current = best.get(&edge.target).copied().unwrap_or(f64::INFINITY);
                if candidate < current - 1e-9 {
                    best.insert(edge.target, candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            return best;
        }
    }
}
