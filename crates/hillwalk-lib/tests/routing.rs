mod common;

use std::sync::Arc;

use common::{
    banded_grid, brute_force_costs, build, build_with, footway, hill_street, north_of, point,
    random_network,
};
use hillwalk_lib::{
    find_route_a_star, find_route_dijkstra, plan_route, CostModel, Error, Graph, NodeIndex,
    PlanOutcome, Route, RouteAlgorithm, RouteOutcome, RouteRequest,
};

fn a_star(graph: &Graph, start: i64, goal: i64) -> RouteOutcome {
    find_route_a_star(graph, start, goal).expect("endpoints exist")
}

fn assert_route_is_consistent(graph: &Graph, route: &Route, start: i64, goal: i64) {
    assert_eq!(route.nodes.first(), Some(&start));
    assert_eq!(route.nodes.last(), Some(&goal));
    assert_eq!(route.ways.len(), route.nodes.len() - 1);
    assert_eq!(route.way_names.len(), route.ways.len());

    let mut total = 0.0;
    for (hop, pair) in route.nodes.windows(2).enumerate() {
        let edge = graph
            .neighbours(pair[0])
            .iter()
            .find(|edge| {
                edge.target == pair[1]
                    && edge.way == route.ways[hop]
                    && (edge.cost - route.hop_costs[hop]).abs() < 1e-9
            })
            .unwrap_or_else(|| panic!("hop {} -> {} is not an edge", pair[0], pair[1]));
        assert_eq!(route.way_names[hop], graph.way_name(edge.way));
        total += edge.cost;
    }
    assert!((total - route.total_cost).abs() < 1e-6);
}

#[test]
fn climbing_costs_more_than_descending() {
    let (grid, entities) = hill_street();
    let graph = build(&grid, &entities);
    let penalty = CostModel::default().uphill_penalty;

    let forward = a_star(&graph, 1, 3).into_route().expect("route exists");
    assert_eq!(forward.nodes, vec![1, 2, 3]);
    assert_eq!(forward.way_names, vec!["Hill Street", "Hill Street"]);
    assert!((forward.total_cost - (100.0 + 100.0 + 10.0 * penalty)).abs() < 1e-6);

    let backward = a_star(&graph, 3, 1).into_route().expect("route exists");
    assert_eq!(backward.nodes, vec![3, 2, 1]);
    assert!((backward.total_cost - 200.0).abs() < 1e-6);
}

#[test]
fn disconnected_components_are_unreachable() {
    let grid = banded_grid(&[0, 0, 0]);
    let entities = vec![
        point(1, 0.0005, 0.0005),
        point(2, north_of(0.0005, 80.0), 0.0005),
        point(3, 0.0005, 0.0025),
        point(4, north_of(0.0005, 80.0), 0.0025),
        footway(1, "West Walk", &[1, 2]),
        footway(2, "East Walk", &[3, 4]),
    ];
    let graph = build(&grid, &entities);

    assert_eq!(a_star(&graph, 1, 4), RouteOutcome::Unreachable);
    assert_eq!(
        find_route_dijkstra(&graph, 1, 4).unwrap(),
        RouteOutcome::Unreachable
    );
}

#[test]
fn oneway_street_cannot_be_walked_backwards() {
    let grid = banded_grid(&[0, 0, 0]);
    let entities = vec![
        point(1, 0.0005, 0.0005),
        point(2, north_of(0.0005, 100.0), 0.0005),
        common::way(5, &[1, 2], &[("highway", "footway"), ("oneway", "yes")]),
    ];
    let graph = build(&grid, &entities);

    assert!(a_star(&graph, 1, 2).route().is_some());
    assert!(a_star(&graph, 2, 1).is_unreachable());
}

#[test]
fn start_equal_to_goal_is_a_single_node_route() {
    let (grid, entities) = hill_street();
    let graph = build(&grid, &entities);

    let route = a_star(&graph, 2, 2).into_route().unwrap();
    assert_eq!(route.nodes, vec![2]);
    assert!(route.ways.is_empty());
    assert_eq!(route.total_cost, 0.0);
}

#[test]
fn unknown_endpoints_are_errors() {
    let (grid, entities) = hill_street();
    let graph = build(&grid, &entities);

    let err = find_route_a_star(&graph, 42, 1).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { id: 42 }));

    let err = plan_route(&graph, &RouteRequest::nodes(1, 77)).unwrap_err();
    assert!(format!("{err}").contains("unknown node identifier: 77"));
}

#[test]
fn a_star_matches_brute_force_optimum() {
    for seed in 1..=12 {
        let (grid, entities) = random_network(seed, 30, 45);
        let graph = build(&grid, &entities);

        for start in [0, 7, 13] {
            let oracle = brute_force_costs(&graph, start);
            for goal in 0..30 {
                let outcome = a_star(&graph, start, goal);
                match (oracle.get(&goal), outcome) {
                    (Some(best), RouteOutcome::Found(route)) => {
                        assert!(
                            (route.total_cost - best).abs() < 1e-6,
                            "seed {seed}: {start}->{goal} cost {} but optimum is {best}",
                            route.total_cost
                        );
                        assert_route_is_consistent(&graph, &route, start, goal);
                    }
                    (None, RouteOutcome::Unreachable) => {}
                    (expected, actual) => panic!(
                        "seed {seed}: {start}->{goal} reachability mismatch: {expected:?} vs {actual:?}"
                    ),
                }
            }
        }
    }
}

#[test]
fn a_star_stays_optimal_with_custom_cost_models() {
    let models = [
        CostModel {
            reference_latitude: 0.0,
            ..CostModel::default()
        },
        CostModel {
            reference_latitude: 60.0,
            uphill_penalty: 6.0,
            stairs_factor: 3.0,
        },
    ];
    for cost in models {
        for seed in 20..=25 {
            let (grid, entities) = random_network(seed, 30, 45);
            let graph = build_with(&grid, &entities, &cost);
            assert_eq!(graph.cost_model(), &cost);

            for start in [0, 11] {
                let oracle = brute_force_costs(&graph, start);
                for goal in 0..30 {
                    let found = a_star(&graph, start, goal).route().map(|r| r.total_cost);
                    match (oracle.get(&goal), found) {
                        (Some(best), Some(total)) => assert!(
                            (total - best).abs() < 1e-6,
                            "seed {seed}, {cost:?}: {start}->{goal} cost {total} but optimum is {best}"
                        ),
                        (None, None) => {}
                        (expected, actual) => panic!(
                            "seed {seed}: {start}->{goal} reachability mismatch: {expected:?} vs {actual:?}"
                        ),
                    }
                }
            }
        }
    }
}

#[test]
fn dijkstra_and_a_star_agree_on_cost() {
    let (grid, entities) = random_network(99, 50, 90);
    let graph = build(&grid, &entities);

    for goal in 1..50 {
        let a = a_star(&graph, 0, goal);
        let d = find_route_dijkstra(&graph, 0, goal).unwrap();
        match (a.route(), d.route()) {
            (Some(a), Some(d)) => assert!((a.total_cost - d.total_cost).abs() < 1e-6),
            (None, None) => {}
            _ => panic!("planners disagree on reachability of {goal}"),
        }
    }
}

#[test]
fn repeated_searches_are_identical() {
    let (grid, entities) = random_network(7, 60, 120);
    let graph = build(&grid, &entities);

    for goal in [5, 17, 33, 59] {
        let first = a_star(&graph, 0, goal);
        for _ in 0..5 {
            assert_eq!(a_star(&graph, 0, goal), first);
        }
    }
}

#[test]
fn plan_route_reports_plan_or_unreachable() {
    let (grid, entities) = hill_street();
    let graph = build(&grid, &entities);

    let request = RouteRequest::nodes(1, 3).with_algorithm(RouteAlgorithm::Dijkstra);
    let PlanOutcome::Found(plan) = plan_route(&graph, &request).unwrap() else {
        panic!("route exists");
    };
    assert_eq!(plan.algorithm, RouteAlgorithm::Dijkstra);
    assert_eq!(plan.steps, vec![1, 2, 3]);
    assert_eq!(plan.hop_count(), 2);
    assert_eq!(plan.legs().len(), 1);
    assert_eq!(plan.legs()[0].way_name, "Hill Street");
    assert!((plan.estimated_minutes() - plan.total_cost * 60.0 / 5000.0).abs() < 1e-12);
}

#[test]
fn coordinate_requests_snap_to_nearest_nodes() {
    let (grid, entities) = hill_street();
    let graph = build(&grid, &entities);

    // Slightly off node 1 and node 3.
    let request = RouteRequest::coordinates((0.00049, 0.00052), (0.00232, 0.0005));
    let plan = plan_route(&graph, &request).unwrap();
    assert_eq!(plan.plan().map(|p| (p.start, p.goal)), Some((1, 3)));

    let index = Arc::new(NodeIndex::build(&graph));
    let request = RouteRequest::coordinates((0.0014, 0.0005), (0.0005, 0.0005))
        .with_node_index(index);
    let plan = plan_route(&graph, &request).unwrap();
    assert_eq!(plan.plan().map(|p| p.steps.clone()), Some(vec![2, 1]));
}
