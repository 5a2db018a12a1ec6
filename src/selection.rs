use crate::graph::{Connection, Graph, Node};

/// At most one highlighted entity. Drives the log detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Node {
        id: String,
    },
    Connection {
        from: String,
        to: String,
    },
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

/// Owner of the selection and its derived log list. All transitions happen
/// through the click operations; a repeat click of the selected entity clears
/// it, any other click replaces it outright.
#[derive(Debug, Default)]
pub struct SelectionState {
    selection: Selection,
    logs: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The log entries for the detail panel, in display order. Empty while
    /// nothing is selected.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn click_node(&mut self, node: &Node) {
        if matches!(&self.selection, Selection::Node { id } if *id == node.id) {
            self.clear();
            return;
        }
        self.selection = Selection::Node {
            id: node.id.clone(),
        };
        self.logs = node.logs.clone();
    }

    pub fn click_connection(&mut self, graph: &Graph, connection: &Connection) {
        let same = matches!(
            &self.selection,
            Selection::Connection { from, to }
                if *from == connection.from && *to == connection.to
        );
        if same {
            self.clear();
            return;
        }
        self.selection = Selection::Connection {
            from: connection.from.clone(),
            to: connection.to.clone(),
        };
        self.logs = connection_logs(graph, connection);
    }

    pub fn clear(&mut self) {
        self.selection = Selection::Empty;
        self.logs.clear();
    }
}

/// Collects the text for a visual edge from both perspectives: entries listed
/// on the `from` endpoint sourced from `to`, then entries listed on the `to`
/// endpoint sourced from `from`. The second group surfaces reverse-specific
/// text for the same edge.
pub fn connection_logs(graph: &Graph, connection: &Connection) -> Vec<String> {
    let mut logs = Vec::new();
    if let Some(from) = graph.node(&connection.from) {
        logs.extend(
            from.connections
                .iter()
                .filter(|candidate| candidate.source_id == connection.to)
                .map(|candidate| candidate.text.clone()),
        );
    }
    if let Some(to) = graph.node(&connection.to) {
        logs.extend(
            to.connections
                .iter()
                .filter(|candidate| candidate.source_id == connection.from)
                .map(|candidate| candidate.text.clone()),
        );
    }
    logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{connection, node_at};
    use crate::layers::MapLayer;

    fn two_node_graph() -> Graph {
        let mut a = node_at("a", MapLayer::Landmark, 0.0, 0.0);
        a.logs = vec!["first".to_string(), "second".to_string()];
        let mut b = node_at("b", MapLayer::Relic, 50.0, 20.0);
        b.connections.push(connection("a", "b", "a", "t1"));
        b.connections.push(connection("b", "a", "a", "t2"));
        Graph::from_nodes(vec![a, b]).unwrap()
    }

    #[test]
    fn clicking_a_node_selects_it_and_shows_its_logs_in_order() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        state.click_node(graph.node("a").unwrap());
        assert_eq!(
            state.selection(),
            &Selection::Node { id: "a".to_string() }
        );
        assert_eq!(state.logs(), ["first", "second"]);
    }

    #[test]
    fn clicking_the_same_node_again_clears_the_selection() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        let a = graph.node("a").unwrap();
        state.click_node(a);
        state.click_node(a);
        assert!(state.is_empty());
        assert!(state.logs().is_empty());
    }

    #[test]
    fn clicking_a_different_node_replaces_the_selection() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        state.click_node(graph.node("a").unwrap());
        state.click_node(graph.node("b").unwrap());
        assert_eq!(
            state.selection(),
            &Selection::Node { id: "b".to_string() }
        );
    }

    #[test]
    fn selecting_an_edge_collects_forward_then_reverse_text() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        let clicked = connection("a", "b", "a", "t1");
        state.click_connection(&graph, &clicked);
        assert_eq!(state.logs(), ["t1", "t2"]);
        assert_eq!(
            state.selection(),
            &Selection::Connection {
                from: "a".to_string(),
                to: "b".to_string()
            }
        );
    }

    #[test]
    fn clicking_the_selected_connection_again_clears_it() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        let clicked = connection("a", "b", "a", "t1");
        state.click_connection(&graph, &clicked);
        state.click_connection(&graph, &clicked);
        assert!(state.is_empty());
        assert!(state.logs().is_empty());
    }

    #[test]
    fn a_node_click_replaces_a_connection_selection_without_passing_through_empty() {
        let graph = two_node_graph();
        let mut state = SelectionState::new();
        state.click_connection(&graph, &connection("a", "b", "a", "t1"));
        state.click_node(graph.node("a").unwrap());
        assert_eq!(
            state.selection(),
            &Selection::Node { id: "a".to_string() }
        );
        assert_eq!(state.logs(), ["first", "second"]);
    }
}
