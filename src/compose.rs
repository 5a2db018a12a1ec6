use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{BoundingBox, GeometryError, Point};
use crate::graph::{Connection, Node};
use crate::layers::node_visible;
use crate::prefs::Preferences;
use crate::selection::{Selection, SelectionState};
use crate::theme::{self, CardTheme};

pub const CARD_WIDTH: f32 = 110.0;
pub const CARD_HEIGHT: f32 = CARD_WIDTH * 1.4;
pub const MAP_PADDING: f32 = 150.0;
/// Click slop around a connection line, in canvas units.
pub const LINK_HIT_TOLERANCE: f32 = 6.0;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("map snapshot contains no nodes")]
    EmptyMap(#[from] GeometryError),
}

/// One rendered location card, positioned in canvas space.
#[derive(Debug, Clone)]
pub struct CardLayout {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub theme: CardTheme,
    pub selected: bool,
    /// Suppressed in spoiler-free mode.
    pub image: Option<String>,
    /// Present only when log counts are enabled.
    pub log_count: Option<usize>,
}

impl CardLayout {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// One rendered connection line between two card centers. Carries the
/// connection it was composed from so a click can be routed back into the
/// selection state machine.
#[derive(Debug, Clone)]
pub struct LinkLayout {
    pub connection: Connection,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub selected: bool,
}

impl LinkLayout {
    fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let length_sq = dx * dx + dy * dy;
        if length_sq == 0.0 {
            return ((x - self.x1).powi(2) + (y - self.y1).powi(2)).sqrt();
        }
        let t = (((x - self.x1) * dx + (y - self.y1) * dy) / length_sq).clamp(0.0, 1.0);
        let px = self.x1 + t * dx;
        let py = self.y1 + t * dy;
        ((x - px).powi(2) + (y - py).powi(2)).sqrt()
    }
}

#[derive(Debug)]
pub enum SceneEntity<'a> {
    Card(&'a CardLayout),
    Link(&'a LinkLayout),
}

/// The composed scene graph: canvas dimensions, cards, connection lines and
/// the log detail panel.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub cards: Vec<CardLayout>,
    pub links: Vec<LinkLayout>,
    /// Present exactly while something is selected; holds the displayed
    /// logs, possibly none.
    pub log_panel: Option<Vec<String>>,
}

impl Scene {
    /// Hit test in canvas coordinates. Cards are drawn above links and win
    /// ties.
    pub fn entity_at(&self, x: f32, y: f32) -> Option<SceneEntity<'_>> {
        if let Some(card) = self.cards.iter().find(|card| card.contains(x, y)) {
            return Some(SceneEntity::Card(card));
        }
        self.links
            .iter()
            .find(|link| link.distance_to(x, y) <= LINK_HIT_TOLERANCE)
            .map(SceneEntity::Link)
    }
}

/// Composes normalized nodes, their padded bounding box, the layer filter
/// and the selection into the rendered scene. The canvas is sized by the
/// whole snapshot so toggling layers never reflows surviving cards.
pub fn compose_scene(
    normalized: &[Node],
    prefs: &Preferences,
    selection: &SelectionState,
) -> Result<Scene, ComposeError> {
    let points: Vec<Point> = normalized.iter().map(|node| node.location).collect();
    let mut bounds = BoundingBox::from_points(&points)?;
    bounds.set_padding(MAP_PADDING);
    let origin = bounds.origin();
    let size = bounds.size();

    let by_id: BTreeMap<&str, &Node> = normalized
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    let center = |node: &Node| -> (f32, f32) {
        (node.location.x - origin.x, node.location.y - origin.y)
    };

    let mut cards = Vec::new();
    for node in normalized {
        if !node_visible(node, &prefs.visible_layers) {
            continue;
        }
        let (cx, cy) = center(node);
        let selected =
            matches!(selection.selection(), Selection::Node { id } if *id == node.id);
        cards.push(CardLayout {
            id: node.id.clone(),
            name: node.name.clone(),
            x: cx - CARD_WIDTH / 2.0,
            y: cy - CARD_HEIGHT / 2.0,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            theme: theme::card_theme(node.curiosity, selected),
            selected,
            image: (!prefs.spoiler_free_mode && !node.image.is_empty())
                .then(|| node.image.clone()),
            log_count: prefs.show_log_counts.then(|| node.logs.len()),
        });
    }

    let mut links = Vec::new();
    let mut seen_pairs: BTreeSet<(String, String)> = BTreeSet::new();
    for node in normalized {
        for connection in &node.connections {
            let Some(&from) = by_id.get(connection.from.as_str()) else {
                continue;
            };
            let Some(&to) = by_id.get(connection.to.as_str()) else {
                continue;
            };
            if !node_visible(from, &prefs.visible_layers)
                || !node_visible(to, &prefs.visible_layers)
            {
                continue;
            }
            // One line per visual edge; both directions share it.
            let pair = if connection.from <= connection.to {
                (connection.from.clone(), connection.to.clone())
            } else {
                (connection.to.clone(), connection.from.clone())
            };
            if !seen_pairs.insert(pair) {
                continue;
            }
            let (x1, y1) = center(from);
            let (x2, y2) = center(to);
            let selected = matches!(
                selection.selection(),
                Selection::Connection { from: sel_from, to: sel_to }
                    if (*sel_from == connection.from && *sel_to == connection.to)
                        || (*sel_from == connection.to && *sel_to == connection.from)
            );
            links.push(LinkLayout {
                connection: connection.clone(),
                x1,
                y1,
                x2,
                y2,
                selected,
            });
        }
    }

    Ok(Scene {
        width: size.width,
        height: size.height,
        cards,
        links,
        log_panel: (!selection.is_empty()).then(|| selection.logs().to_vec()),
    })
}
