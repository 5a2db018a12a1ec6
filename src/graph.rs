use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::geometry::Point;
use crate::layers::MapLayer;

/// A directed, texted relation between two locations. `source_id` names the
/// endpoint whose perspective the text represents; a pair of nodes may carry
/// connections in both directions with different text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub source_id: String,
    pub text: String,
}

/// A map location. Immutable once the snapshot is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub curiosity: MapLayer,
    pub location: Point,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid map snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate node id `{id}` in map snapshot")]
    DuplicateId { id: String },
}

/// The immutable input graph: an ordered node sequence plus an id index.
/// Shared read-only; every consumer sees the same snapshot.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Arc<[Node]>,
    index: BTreeMap<String, usize>,
}

impl Graph {
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, GraphError> {
        let mut index = BTreeMap::new();
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateId {
                    id: node.id.clone(),
                });
            }
        }
        Ok(Self {
            nodes: nodes.into(),
            index,
        })
    }

    pub fn from_json(input: &str) -> Result<Self, GraphError> {
        let nodes: Vec<Node> = serde_json::from_str(input)?;
        Self::from_nodes(nodes)
    }

    pub fn nodes(&self) -> &Arc<[Node]> {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Flips the snapshot's Y-up convention into the rendering surface's Y-down
/// convention. Pure; the source nodes are left untouched.
pub fn normalized(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            let mut flipped = node.clone();
            flipped.location.y = -flipped.location.y;
            flipped
        })
        .collect()
}

/// Memoized normalization keyed on snapshot identity. Recomputes only when
/// handed a different `Arc`, so render ticks over an unchanged snapshot reuse
/// the cached flip.
#[derive(Debug, Default)]
pub struct NormalizedNodes {
    source: Option<Arc<[Node]>>,
    flipped: Vec<Node>,
}

impl NormalizedNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, snapshot: &Arc<[Node]>) -> &[Node] {
        let stale = match &self.source {
            Some(cached) => !Arc::ptr_eq(cached, snapshot),
            None => true,
        };
        if stale {
            self.flipped = normalized(snapshot);
            self.source = Some(Arc::clone(snapshot));
        }
        &self.flipped
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn node_at(id: &str, curiosity: MapLayer, x: f32, y: f32) -> Node {
        Node {
            id: id.to_string(),
            name: id.to_uppercase(),
            curiosity,
            location: Point { x, y },
            logs: Vec::new(),
            connections: Vec::new(),
            image: String::new(),
        }
    }

    pub fn connection(from: &str, to: &str, source_id: &str, text: &str) -> Connection {
        Connection {
            from: from.to_string(),
            to: to.to_string(),
            source_id: source_id.to_string(),
            text: text.to_string(),
        }
    }
}
