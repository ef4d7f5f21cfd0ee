// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::hints::{self, Hints, HINT_STYLE, STYLE_DASHED};

/// Node identifier. Allocated monotonically by the editor and never reused within a session.
pub type NodeId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(default)]
    text: Vec<String>,
    #[serde(default, skip_serializing_if = "Hints::is_empty")]
    hints: Hints,
}

impl Node {
    pub fn new(id: NodeId, text: Vec<String>) -> Self {
        Self { id, text, hints: Hints::new() }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    /// Replaces the text lines. Returns `true` if the text changed.
    pub fn set_text(&mut self, text: Vec<String>) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text;
        true
    }

    /// Single-line summary used in status messages.
    pub fn title(&self) -> String {
        let title = self.text.join(" ");
        let title = title.trim();
        if title.is_empty() {
            format!("#{}", self.id)
        } else {
            title.to_owned()
        }
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut Hints {
        &mut self.hints
    }
}

fn default_arrow() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    id: i32,
    from: NodeId,
    to: NodeId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    label: String,
    #[serde(default = "default_arrow", skip_serializing_if = "is_true")]
    arrow: bool,
    #[serde(default, skip_serializing_if = "Hints::is_empty")]
    hints: Hints,
}

impl Connection {
    pub fn new(id: i32, from: NodeId, to: NodeId, label: impl Into<String>) -> Self {
        Self { id, from, to, label: label.into(), arrow: true, hints: Hints::new() }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from == node_id || self.to == node_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the label. Returns `true` if it changed.
    pub fn set_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.label == label {
            return false;
        }
        self.label = label;
        true
    }

    pub fn arrow(&self) -> bool {
        self.arrow
    }

    pub fn set_arrow(&mut self, arrow: bool) {
        self.arrow = arrow;
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut Hints {
        &mut self.hints
    }

    pub fn has_flag(&self, key: &str) -> bool {
        hints::flag(&self.hints, key)
    }

    pub fn is_dashed(&self) -> bool {
        self.hints.get(HINT_STYLE).map(String::as_str) == Some(STYLE_DASHED)
    }
}
