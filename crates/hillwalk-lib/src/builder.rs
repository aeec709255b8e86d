//! Graph construction from decoded map entities and an elevation grid.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cost::CostModel;
use crate::elevation::ElevationGrid;
use crate::entity::{MapEntity, PointEntity, WayEntity};
use crate::error::{Error, Result};
use crate::graph::{Edge, GeoPoint, Graph, Node, NodeId, Way, WayId, WayKind};

/// Options controlling how the batch builder treats bad entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Abort the whole build on the first malformed entity instead of
    /// skipping it.
    pub strict: bool,
}

/// Counters and rejections collected while building a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub nodes: usize,
    pub ways: usize,
    pub edges: usize,
    /// Ways dropped because they carry no path-type tag.
    pub ignored_ways: usize,
    /// Nodes whose coordinate fell off the elevation grid.
    pub elevation_fallbacks: usize,
    /// Messages for entities rejected as malformed.
    pub rejected: Vec<String>,
}

/// Incremental graph builder.
///
/// Points must be added before the ways that reference them.
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    grid: &'a ElevationGrid,
    cost: CostModel,
    nodes: HashMap<NodeId, Node>,
    ways: HashMap<WayId, Way>,
    report: BuildReport,
}

impl<'a> GraphBuilder<'a> {
    /// Fails if `cost` is not a valid cost model.
    pub fn new(grid: &'a ElevationGrid, cost: CostModel) -> Result<Self> {
        cost.validate()?;
        Ok(Self {
            grid,
            cost,
            nodes: HashMap::new(),
            ways: HashMap::new(),
            report: BuildReport::default(),
        })
    }

    /// Create a node for a point entity, sampling its elevation once.
    pub fn add_point(&mut self, point: &PointEntity) -> Result<()> {
        if self.nodes.contains_key(&point.id) {
            return Err(Error::DuplicateNode { id: point.id });
        }

        let (elevation, fell_back) = self.grid.elevation_or_fallback(point.lat, point.lon);
        if fell_back {
            debug!(node = point.id, "node elevation fell back");
            self.report.elevation_fallbacks += 1;
        }

        let node = Node::new(point.id, GeoPoint::new(point.lat, point.lon), elevation);
        self.nodes.insert(point.id, node);
        self.report.nodes += 1;
        Ok(())
    }

    /// Add a way and synthesize its edges.
    ///
    /// Returns `Ok(false)` when the way is not a traversable path. A
    /// malformed way is rejected before any edge is added.
    pub fn add_way(&mut self, entity: &WayEntity) -> Result<bool> {
        let Some(tags) = entity.tags.as_ref() else {
            debug!(way = entity.id, "ignoring way without path type");
            self.report.ignored_ways += 1;
            return Ok(false);
        };

        self.validate_way(entity)?;

        let way_id = entity.id;
        let refs = &entity.refs;

        let mut added = 0;
        for pair in refs.windows(2) {
            added += self.push_edge(pair[0], pair[1], way_id, &tags.kind);
        }
        if !tags.oneway {
            for pair in refs.windows(2).rev() {
                added += self.push_edge(pair[1], pair[0], way_id, &tags.kind);
            }
        }

        debug!(
            way = way_id,
            name = %tags.name,
            kind = %tags.kind,
            oneway = tags.oneway,
            edges = added,
            "added way"
        );

        self.ways.insert(
            way_id,
            Way {
                id: way_id,
                name: tags.name.clone(),
                kind: tags.kind.clone(),
                nodes: refs.clone(),
            },
        );
        self.report.ways += 1;
        self.report.edges += added;
        Ok(true)
    }

    fn validate_way(&self, entity: &WayEntity) -> Result<()> {
        if entity.refs.len() < 2 {
            return Err(Error::MalformedWay {
                way: entity.id,
                reason: format!(
                    "references {} point(s); at least 2 are required",
                    entity.refs.len()
                ),
            });
        }
        if self.ways.contains_key(&entity.id) {
            return Err(Error::MalformedWay {
                way: entity.id,
                reason: "duplicate way identifier".to_string(),
            });
        }
        if let Some(missing) = entity.refs.iter().find(|id| !self.nodes.contains_key(*id)) {
            return Err(Error::MalformedWay {
                way: entity.id,
                reason: format!("references unknown point {missing}"),
            });
        }
        Ok(())
    }

    fn push_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        way: WayId,
        kind: &WayKind,
    ) -> usize {
        let cost = match (self.nodes.get(&source), self.nodes.get(&target)) {
            (Some(src), Some(dest)) => self.cost.edge_cost(src, dest, kind),
            _ => return 0,
        };
        if let Some(src) = self.nodes.get_mut(&source) {
            src.edges.push(Edge { target, way, cost });
            1
        } else {
            0
        }
    }

    /// Finalize the graph, computing each node's label from the ways that
    /// touch it.
    pub fn finish(mut self) -> (Graph, BuildReport) {
        let mut names: HashMap<NodeId, BTreeSet<&str>> = HashMap::new();
        for way in self.ways.values() {
            for id in &way.nodes {
                names.entry(*id).or_default().insert(way.name.as_str());
            }
        }

        let labels: HashMap<NodeId, String> = names
            .into_iter()
            .map(|(id, set)| (id, set.into_iter().collect::<Vec<_>>().join(" ")))
            .collect();

        for (id, label) in labels {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.label = label;
            }
        }

        (Graph::from_parts(self.nodes, self.ways, self.cost), self.report)
    }
}

/// Build a graph from a batch of entities.
///
/// Points are inserted before ways regardless of input order. Malformed
/// entities are logged and recorded in the report, or abort the build when
/// `options.strict` is set.
pub fn build_graph(
    grid: &ElevationGrid,
    entities: &[MapEntity],
    cost: &CostModel,
    options: BuildOptions,
) -> Result<(Graph, BuildReport)> {
    let mut builder = GraphBuilder::new(grid, *cost)?;

    for entity in entities {
        if let MapEntity::Point(point) = entity {
            let outcome = builder.add_point(point);
            builder.absorb(outcome, options)?;
        }
    }
    for entity in entities {
        if let MapEntity::Way(way) = entity {
            let outcome = builder.add_way(way).map(|_| ());
            builder.absorb(outcome, options)?;
        }
    }

    let (graph, report) = builder.finish();
    info!(
        nodes = report.nodes,
        ways = report.ways,
        edges = report.edges,
        ignored_ways = report.ignored_ways,
        rejected = report.rejected.len(),
        elevation_fallbacks = report.elevation_fallbacks,
        "built walking graph"
    );
    Ok((graph, report))
}

impl GraphBuilder<'_> {
    fn absorb(&mut self, outcome: Result<()>, options: BuildOptions) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) if options.strict => Err(err),
            Err(err) => {
                warn!(error = %err, "skipping malformed entity");
                self.report.rejected.push(err.to_string());
                Ok(())
            }
        }
    }
}
