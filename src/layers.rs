use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{Connection, Graph, Node};

/// Location category, doubling as the visibility-filter tag. One closed set,
/// no open extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapLayer {
    Landmark,
    Relic,
    Signal,
    Passage,
    Other,
}

impl MapLayer {
    pub const ALL: [MapLayer; 5] = [
        MapLayer::Landmark,
        MapLayer::Relic,
        MapLayer::Signal,
        MapLayer::Passage,
        MapLayer::Other,
    ];

    /// Stable integer code used by the persisted preference encoding.
    pub fn code(self) -> u8 {
        match self {
            MapLayer::Landmark => 0,
            MapLayer::Relic => 1,
            MapLayer::Signal => 2,
            MapLayer::Passage => 3,
            MapLayer::Other => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MapLayer::Landmark),
            1 => Some(MapLayer::Relic),
            2 => Some(MapLayer::Signal),
            3 => Some(MapLayer::Passage),
            4 => Some(MapLayer::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapLayer::Landmark => "landmark",
            MapLayer::Relic => "relic",
            MapLayer::Signal => "signal",
            MapLayer::Passage => "passage",
            MapLayer::Other => "other",
        }
    }
}

pub fn node_visible(node: &Node, visible: &BTreeSet<MapLayer>) -> bool {
    visible.contains(&node.curiosity)
}

/// A connection renders only when both endpoints are visible; edges dangling
/// into a hidden or unknown node are excluded.
pub fn connection_visible(
    graph: &Graph,
    connection: &Connection,
    visible: &BTreeSet<MapLayer>,
) -> bool {
    let Some(from) = graph.node(&connection.from) else {
        return false;
    };
    let Some(to) = graph.node(&connection.to) else {
        return false;
    };
    node_visible(from, visible) && node_visible(to, visible)
}

/// Symmetric difference on a single layer: present gets removed, absent gets
/// added. Returns a fresh set so dependents can detect the change by value.
pub fn toggle_layer(visible: &BTreeSet<MapLayer>, layer: MapLayer) -> BTreeSet<MapLayer> {
    let mut next = visible.clone();
    if !next.remove(&layer) {
        next.insert(layer);
    }
    next
}
