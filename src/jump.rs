// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Jump labels: single keystroke targets for visible nodes, connections and insertion points.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::activation;
use crate::model::{Diagram, NodeId};

/// Home row first, then the remaining rows, then shifted and numeric keys.
pub const DEFAULT_ALPHABET: &str =
    "asdfghjklqwertyuiopzxcvbnmASDFGHJKLQWERTYUIOPZXCVBNM1234567890";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    Empty,
    Duplicate(char),
}

impl fmt::Display for AlphabetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("label alphabet must not be empty"),
            Self::Duplicate(ch) => write!(f, "label alphabet repeats {ch:?}"),
        }
    }
}

impl std::error::Error for AlphabetError {}

/// Ordered, duplicate-free label characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAlphabet {
    chars: Vec<char>,
}

impl LabelAlphabet {
    pub fn new(chars: &str) -> Result<Self, AlphabetError> {
        let chars = chars.chars().collect::<Vec<_>>();
        if chars.is_empty() {
            return Err(AlphabetError::Empty);
        }
        let mut seen = HashSet::with_capacity(chars.len());
        for &ch in &chars {
            if !seen.insert(ch) {
                return Err(AlphabetError::Duplicate(ch));
            }
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl Default for LabelAlphabet {
    fn default() -> Self {
        Self { chars: DEFAULT_ALPHABET.chars().collect() }
    }
}

/// Where a two-step activation selection started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationStart {
    pub connection: usize,
    pub participant: NodeId,
}

/// What selecting a label does in the current jump session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpAction {
    Select,
    Edit,
    Delete,
    Hint,
    ConnectFrom { insert_at: Option<usize> },
    ConnectTo { source: NodeId, insert_at: Option<usize> },
    InsertAt,
    Activation { start: Option<ActivationStart> },
    DeleteActivation,
}

impl JumpAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Hint => "hint",
            Self::ConnectFrom { .. } => "connect from",
            Self::ConnectTo { .. } => "connect to",
            Self::InsertAt => "insert at",
            Self::Activation { start: None } => "activation start",
            Self::Activation { start: Some(_) } => "activation end",
            Self::DeleteActivation => "delete activation",
        }
    }

    /// Whether picking a node label does anything under this action.
    pub fn acts_on_nodes(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Edit
                | Self::Delete
                | Self::Hint
                | Self::ConnectFrom { .. }
                | Self::ConnectTo { .. }
        )
    }

    fn labels_connections(&self) -> bool {
        matches!(self, Self::Delete | Self::Edit | Self::Hint | Self::Activation { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Node(NodeId),
    Connection(usize),
    /// Position in the connection list a new connection would take.
    Insertion(usize),
}

/// Answers whether an element is currently on screen.
pub trait Visibility {
    fn node_visible(&self, node_id: NodeId) -> bool;
    fn connection_visible(&self, index: usize) -> bool;
}

/// Treats every element as visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVisible;

impl Visibility for AllVisible {
    fn node_visible(&self, _node_id: NodeId) -> bool {
        true
    }

    fn connection_visible(&self, _index: usize) -> bool {
        true
    }
}

/// Label mappings for one jump session. Every character maps to at most one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpLabels {
    nodes: BTreeMap<NodeId, char>,
    connections: BTreeMap<usize, char>,
    insertions: BTreeMap<usize, char>,
}

impl JumpLabels {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty() && self.insertions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.connections.len() + self.insertions.len()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, char> {
        &self.nodes
    }

    pub fn connections(&self) -> &BTreeMap<usize, char> {
        &self.connections
    }

    pub fn insertions(&self) -> &BTreeMap<usize, char> {
        &self.insertions
    }

    pub fn node_label(&self, node_id: NodeId) -> Option<char> {
        self.nodes.get(&node_id).copied()
    }

    pub fn connection_label(&self, index: usize) -> Option<char> {
        self.connections.get(&index).copied()
    }

    pub fn insertion_label(&self, position: usize) -> Option<char> {
        self.insertions.get(&position).copied()
    }

    /// Whether any label would do something when picked under `action`.
    pub fn offers(&self, action: &JumpAction) -> bool {
        (action.acts_on_nodes() && !self.nodes.is_empty())
            || !self.connections.is_empty()
            || !self.insertions.is_empty()
    }

    pub fn target_for(&self, ch: char) -> Option<JumpTarget> {
        key_for(&self.nodes, ch)
            .map(JumpTarget::Node)
            .or_else(|| key_for(&self.connections, ch).map(JumpTarget::Connection))
            .or_else(|| key_for(&self.insertions, ch).map(JumpTarget::Insertion))
    }
}

fn key_for<K: Copy>(map: &BTreeMap<K, char>, ch: char) -> Option<K> {
    map.iter().find(|(_, label)| **label == ch).map(|(key, _)| *key)
}

/// Assigns labels for `action` to visible elements, in diagram order.
///
/// Visible nodes are always labelled first, whatever the action; connections and insertion
/// points follow only for the actions that use them. All three mappings draw from one pool, so
/// labels are unique across them. Elements beyond the alphabet stay unlabelled.
pub fn allocate(
    alphabet: &LabelAlphabet,
    diagram: &Diagram,
    action: &JumpAction,
    visibility: &dyn Visibility,
) -> JumpLabels {
    let mut pool = alphabet.chars().iter().copied();
    let mut labels = JumpLabels::default();

    for node in diagram.nodes() {
        if !visibility.node_visible(node.id()) {
            continue;
        }
        let Some(ch) = pool.next() else { break };
        labels.nodes.insert(node.id(), ch);
    }

    if action.labels_connections() {
        for (index, connection) in diagram.connections().iter().enumerate() {
            if let JumpAction::Activation { start: Some(start) } = action {
                if index <= start.connection || connection.from() != start.participant {
                    continue;
                }
            }
            if !visibility.connection_visible(index) {
                continue;
            }
            let Some(ch) = pool.next() else { break };
            labels.connections.insert(index, ch);
        }
    }

    match action {
        JumpAction::InsertAt => {
            if let Some(ch) = pool.next() {
                labels.insertions.insert(0, ch);
            }
            for index in 0..diagram.connections().len() {
                if !visibility.connection_visible(index) {
                    continue;
                }
                let Some(ch) = pool.next() else { break };
                labels.insertions.insert(index + 1, ch);
            }
        }
        JumpAction::DeleteActivation => {
            for (_, index) in activation::activated_participants(diagram) {
                if !visibility.connection_visible(index) {
                    continue;
                }
                let Some(ch) = pool.next() else { break };
                labels.connections.insert(index, ch);
            }
        }
        _ => {}
    }

    tracing::trace!(action = action.name(), labels = labels.len(), "allocated jump labels");
    labels
}
