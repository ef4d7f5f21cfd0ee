// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer contract.
//!
//! Layout and drawing are owned by a [`Renderer`]. The editor only consumes the rendered text and
//! the per-node / per-connection coordinates to decide what is visible and where jump labels go.

use std::collections::BTreeMap;

use crate::model::{Diagram, NodeId};

mod canvas;
pub mod outline;
mod text;

pub use canvas::Canvas;
pub use outline::OutlineRenderer;
pub(crate) use text::text_len;

/// Glyph a renderer must use for the first row of sequence lifelines; everything up to and
/// including that row is treated as the participant header.
pub const LIFELINE_GLYPH: char = '┊';

/// Glyph for a lifeline segment while its participant is activated.
pub const ACTIVE_LIFELINE_GLYPH: char = '┃';

/// A cell rectangle in rendered-text coordinates (`y` is the line index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// First line below the rectangle.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Screen positions reported by a renderer, keyed by node id and connection index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    nodes: BTreeMap<NodeId, Rect>,
    connection_paths: BTreeMap<usize, Vec<Point>>,
}

impl Layout {
    pub fn insert_node(&mut self, node_id: NodeId, rect: Rect) {
        self.nodes.insert(node_id, rect);
    }

    pub fn insert_connection_path(&mut self, index: usize, path: Vec<Point>) {
        if !path.is_empty() {
            self.connection_paths.insert(index, path);
        }
    }

    pub fn node(&self, node_id: NodeId) -> Option<Rect> {
        self.nodes.get(&node_id).copied()
    }

    pub fn connection_path(&self, index: usize) -> Option<&[Point]> {
        self.connection_paths.get(&index).map(Vec::as_slice)
    }

    /// The middle cell of a connection's path, where its label sits.
    pub fn connection_midpoint(&self, index: usize) -> Option<Point> {
        let path = self.connection_paths.get(&index)?;
        path.get(path.len() / 2).copied()
    }

    /// Drops cached connection paths; connection indices shift whenever connections change.
    pub fn forget_connection_paths(&mut self) {
        self.connection_paths.clear();
    }

    pub fn has_connection_paths(&self) -> bool {
        !self.connection_paths.is_empty()
    }
}

/// Text output plus layout for one diagram state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub layout: Layout,
}

pub trait Renderer {
    fn render(&self, diagram: &Diagram) -> Rendered;
}
