// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::hints::{self, HINT_ACTIVATE_SOURCE, HINT_DEACTIVATE, HINT_STYLE, STYLE_DASHED};
use super::node::{Connection, Node, NodeId};
use crate::activation;

/// The type of diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Flowchart-style boxes; connection order is cosmetic.
    #[default]
    Box,
    /// Participants with chronologically ordered messages.
    Sequence,
}

impl DiagramKind {
    pub fn toggled(self) -> Self {
        match self {
            Self::Box => Self::Sequence,
            Self::Sequence => Self::Box,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Sequence => "sequence",
        }
    }
}

/// Nodes and connections in display/chronological order.
///
/// Mutations are bounds-checked and report whether anything happened instead of failing:
/// removing a node that does not exist, or connecting to one, is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(rename = "type", default)]
    kind: DiagramKind,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl Diagram {
    pub fn new(kind: DiagramKind) -> Self {
        Self { kind, nodes: Vec::new(), connections: Vec::new() }
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: DiagramKind) {
        self.kind = kind;
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == DiagramKind::Sequence
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    pub fn connection_mut(&mut self, index: usize) -> Option<&mut Connection> {
        self.connections.get_mut(index)
    }

    /// Smallest node id greater than every id currently in the diagram (at least 1).
    pub fn next_node_id(&self) -> NodeId {
        self.nodes.iter().map(Node::id).max().map_or(1, |max| max.saturating_add(1))
    }

    fn next_connection_id(&self) -> i32 {
        self.connections.iter().map(Connection::id).max().map_or(1, |max| max.saturating_add(1))
    }

    /// Appends `node`. Returns `false` (and drops the node) if its id is already taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains_node(node.id()) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Removes a node together with every connection that starts or ends at it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|node| node.id() == id)?;
        let node = self.nodes.remove(index);
        self.connections.retain(|connection| !connection.touches(id));
        Some(node)
    }

    /// Returns `true` if a box diagram already holds an edge with the same ordered endpoints.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.connections.iter().any(|connection| connection.from() == from && connection.to() == to)
    }

    /// Appends a connection. See [`Diagram::insert_connection`].
    pub fn add_connection(
        &mut self,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
    ) -> Option<usize> {
        self.insert_connection(self.connections.len(), from, to, label)
    }

    /// Inserts a connection at `index` (clamped to the end) and returns its final index.
    ///
    /// Returns `None` without mutating if either endpoint is missing, or if this is a box diagram
    /// that already has an `from -> to` edge. Sequence diagrams allow repeated messages and run the
    /// activation inference over the messages that precede the insertion point.
    pub fn insert_connection(
        &mut self,
        index: usize,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
    ) -> Option<usize> {
        if !self.contains_node(from) || !self.contains_node(to) {
            return None;
        }
        if self.kind == DiagramKind::Box && self.has_edge(from, to) {
            return None;
        }

        let index = index.min(self.connections.len());
        let mut connection = Connection::new(self.next_connection_id(), from, to, label);

        if self.kind == DiagramKind::Sequence {
            let first_participant = self.nodes.first().map(Node::id);
            let inference =
                activation::infer(&self.connections[..index], first_participant, from, to);
            if inference.reply {
                hints::set_value(connection.hints_mut(), HINT_STYLE, Some(STYLE_DASHED));
            }
            if inference.deactivate {
                hints::set_flag(connection.hints_mut(), HINT_DEACTIVATE, true);
            }
            if let Some(earlier) = inference.activate_source {
                if let Some(earlier) = self.connections.get_mut(earlier) {
                    hints::set_flag(earlier.hints_mut(), HINT_ACTIVATE_SOURCE, true);
                }
            }
        }

        self.connections.insert(index, connection);
        Some(index)
    }

    pub fn remove_connection(&mut self, index: usize) -> Option<Connection> {
        if index >= self.connections.len() {
            return None;
        }
        Some(self.connections.remove(index))
    }

    /// Replaces a node's text. Returns `true` if the node exists and its text changed.
    pub fn set_node_text(&mut self, id: NodeId, text: Vec<String>) -> bool {
        self.node_mut(id).is_some_and(|node| node.set_text(text))
    }

    /// Replaces a connection label. Returns `true` if the connection exists and the label changed.
    pub fn set_connection_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        self.connection_mut(index).is_some_and(|connection| connection.set_label(label))
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagram, DiagramKind};
    use crate::model::{Node, HINT_ACTIVATE_SOURCE};

    fn diagram_with_nodes(kind: DiagramKind, count: i32) -> Diagram {
        let mut diagram = Diagram::new(kind);
        for id in 1..=count {
            assert!(diagram.add_node(Node::new(id, vec![format!("N{id}")])));
        }
        diagram
    }

    #[test]
    fn remove_node_cascades_connections() {
        let mut diagram = diagram_with_nodes(DiagramKind::Box, 3);
        diagram.add_connection(1, 2, "").expect("1->2");
        diagram.add_connection(2, 3, "").expect("2->3");
        diagram.add_connection(3, 1, "").expect("3->1");

        let removed = diagram.remove_node(2).expect("node 2");
        assert_eq!(removed.id(), 2);
        let pairs = diagram.connections().iter().map(|c| (c.from(), c.to())).collect::<Vec<_>>();
        assert_eq!(pairs, vec![(3, 1)]);

        assert!(diagram.remove_node(2).is_none());
    }

    #[test]
    fn box_diagram_rejects_duplicate_ordered_pairs() {
        let mut diagram = diagram_with_nodes(DiagramKind::Box, 2);
        assert_eq!(diagram.add_connection(1, 2, ""), Some(0));
        assert_eq!(diagram.add_connection(1, 2, ""), None);
        assert_eq!(diagram.connections().len(), 1);

        assert_eq!(diagram.add_connection(2, 1, ""), Some(1));
        assert_eq!(diagram.connections().len(), 2);
    }

    #[test]
    fn sequence_diagram_allows_repeated_messages() {
        let mut diagram = diagram_with_nodes(DiagramKind::Sequence, 2);
        diagram.add_connection(1, 2, "").expect("first");
        diagram.add_connection(1, 2, "").expect("second");
        assert_eq!(diagram.connections().len(), 2);
    }

    #[test]
    fn connections_to_missing_nodes_are_ignored() {
        let mut diagram = diagram_with_nodes(DiagramKind::Box, 1);
        assert_eq!(diagram.add_connection(1, 9, ""), None);
        assert!(diagram.connections().is_empty());
    }

    #[test]
    fn insert_connection_clamps_index() {
        let mut diagram = diagram_with_nodes(DiagramKind::Sequence, 3);
        diagram.add_connection(1, 2, "a").expect("a");
        assert_eq!(diagram.insert_connection(99, 2, 3, "b"), Some(1));
        assert_eq!(diagram.insert_connection(0, 3, 1, "c"), Some(0));
        let labels = diagram.connections().iter().map(|c| c.label()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }

    #[test]
    fn sequence_insertion_marks_orchestrating_call() {
        let mut diagram = diagram_with_nodes(DiagramKind::Sequence, 4);
        diagram.add_connection(1, 2, "request").expect("request");
        diagram.add_connection(2, 3, "lookup").expect("lookup");
        diagram.add_connection(2, 4, "store").expect("store");

        assert!(diagram.connections()[1].has_flag(HINT_ACTIVATE_SOURCE));
        assert!(!diagram.connections()[2].has_flag(HINT_ACTIVATE_SOURCE));
    }

    #[test]
    fn box_diagram_never_infers_hints() {
        let mut diagram = diagram_with_nodes(DiagramKind::Box, 2);
        diagram.add_connection(1, 2, "").expect("1->2");
        diagram.add_connection(2, 1, "").expect("2->1");
        assert!(diagram.connections().iter().all(|c| c.hints().is_empty()));
    }

    #[test]
    fn next_node_id_follows_max_id() {
        let mut diagram = Diagram::default();
        assert_eq!(diagram.next_node_id(), 1);
        diagram.add_node(Node::new(5, Vec::new()));
        diagram.add_node(Node::new(2, Vec::new()));
        assert_eq!(diagram.next_node_id(), 6);
        assert!(!diagram.add_node(Node::new(5, Vec::new())));
    }

    #[test]
    fn json_uses_type_tag() {
        let mut diagram = diagram_with_nodes(DiagramKind::Sequence, 1);
        diagram.set_node_text(1, vec!["Client".to_owned()]);
        let json = serde_json::to_value(&diagram).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "sequence",
                "nodes": [{ "id": 1, "text": ["Client"] }],
                "connections": [],
            })
        );

        let decoded: Diagram = serde_json::from_value(json).expect("deserialize");
        assert_eq!(decoded, diagram);
    }

    #[test]
    fn empty_json_object_is_an_empty_box_diagram() {
        let decoded: Diagram = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(decoded, Diagram::new(DiagramKind::Box));
    }
}
