//! Decoded map entities.
//!
//! Tags are reduced to a fixed-shape [`WayTags`] record while decoding, so
//! the graph builder never inspects free-form attributes.
//!
//! The on-disk format is a JSON document:
//!
//! ```json
//! {
//!   "points": [{ "id": 1, "lat": 43.90, "lon": -78.86 }],
//!   "ways": [{ "id": 10, "refs": [1, 2], "tags": { "highway": "footway", "name": "Main St" } }]
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::graph::{NodeId, WayId, WayKind};

/// Display name used for ways without a `name` tag.
pub const UNNAMED_WAY: &str = "unnamed";

/// Tag key marking a way as a traversable path.
const PATH_TYPE_KEY: &str = "highway";
const NAME_KEY: &str = "name";
const ONEWAY_KEY: &str = "oneway";

/// Point entity: a position that becomes a graph node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointEntity {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

/// Attributes of a traversable way.
#[derive(Debug, Clone, PartialEq)]
pub struct WayTags {
    pub name: String,
    pub kind: WayKind,
    pub oneway: bool,
}

impl WayTags {
    /// Extract path attributes from raw key/value tags.
    ///
    /// Returns `None` when no path-type tag is present (buildings,
    /// boundaries, and other non-traversable ways).
    pub fn extract<'a, I>(tags: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut kind = None;
        let mut name = None;
        let mut oneway = false;

        for (key, value) in tags {
            match key {
                PATH_TYPE_KEY => kind = Some(WayKind::from_tag(value)),
                NAME_KEY if !value.is_empty() => name = Some(value.to_string()),
                ONEWAY_KEY => oneway = is_truthy(value),
                _ => {}
            }
        }

        Some(Self {
            name: name.unwrap_or_else(|| UNNAMED_WAY.to_string()),
            kind: kind?,
            oneway,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "1")
}

/// Way entity: ordered point references plus extracted tags.
#[derive(Debug, Clone, PartialEq)]
pub struct WayEntity {
    pub id: WayId,
    pub refs: Vec<NodeId>,
    /// `None` when the way is not a traversable path.
    pub tags: Option<WayTags>,
}

/// A decoded map entity.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntity {
    Point(PointEntity),
    Way(WayEntity),
}

#[derive(Debug, Deserialize)]
struct RawWay {
    id: WayId,
    #[serde(default)]
    refs: Vec<NodeId>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl From<RawWay> for WayEntity {
    fn from(raw: RawWay) -> Self {
        let tags = WayTags::extract(
            raw.tags
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );
        WayEntity {
            id: raw.id,
            refs: raw.refs,
            tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    points: Vec<PointEntity>,
    #[serde(default)]
    ways: Vec<RawWay>,
}

impl RawDocument {
    fn into_entities(self) -> Vec<MapEntity> {
        let mut entities = Vec::with_capacity(self.points.len() + self.ways.len());
        entities.extend(self.points.into_iter().map(MapEntity::Point));
        entities.extend(
            self.ways
                .into_iter()
                .map(|raw| MapEntity::Way(WayEntity::from(raw))),
        );
        entities
    }
}

/// Decode entities from a JSON string.
pub fn parse_entities(json: &str) -> Result<Vec<MapEntity>> {
    let document: RawDocument = serde_json::from_str(json)?;
    Ok(document.into_entities())
}

/// Decode entities from any reader.
pub fn read_entities<R: Read>(reader: R) -> Result<Vec<MapEntity>> {
    let document: RawDocument = serde_json::from_reader(reader)?;
    Ok(document.into_entities())
}

/// Load entities from a JSON file.
pub fn load_entities(path: &Path) -> Result<Vec<MapEntity>> {
    let file = File::open(path)?;
    let entities = read_entities(BufReader::new(file))?;
    debug!(path = %path.display(), count = entities.len(), "loaded map entities");
    Ok(entities)
}
