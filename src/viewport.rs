// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Vertical scrolling over rendered diagram text.
//!
//! Sequence diagrams keep their participant header pinned once the view scrolls past it.

use crate::jump::Visibility;
use crate::model::{Diagram, DiagramKind, NodeId};
use crate::render::{Layout, Rect, LIFELINE_GLYPH};

/// Drawn between a pinned header and the scrolled body.
pub const HEADER_SEPARATOR: &str = "┄┄┄┄";

/// Line range of the rendered text that is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Lines `0..header` are pinned above the body.
    pub header: usize,
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// Whether any line in `top..bottom` falls inside the window.
    pub fn intersects(&self, top: usize, bottom: usize) -> bool {
        top < self.end && bottom > self.start
    }
}

/// Lines to draw for one frame, plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportFrame {
    pub lines: Vec<String>,
    pub window: Window,
    pub hidden_above: usize,
    pub hidden_below: usize,
}

impl ViewportFrame {
    /// Human-readable notes about clipped content, empty when nothing is hidden.
    pub fn clip_indicators(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.hidden_above > 0 {
            out.push(format!("{} more lines above", self.hidden_above));
        }
        if self.hidden_below > 0 {
            out.push(format!("{} more lines below", self.hidden_below));
        }
        out
    }

    /// Screen row within `lines` where rendered line `line` is drawn.
    pub fn row_for_line(&self, line: usize) -> Option<usize> {
        let header = self.window.header;
        if line < header {
            return Some(line);
        }
        if !self.window.contains_line(line) {
            return None;
        }
        let pinned = if header > 0 { header + 1 } else { 0 };
        Some(pinned + line - self.window.start)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    scroll_offset: usize,
    visible_lines: usize,
    total_lines: usize,
    header_lines: usize,
    content_changed: bool,
    window: Option<Window>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_lines)
    }

    /// The window of the last frame, or `None` before anything was rendered.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Scrolls by `delta` lines, clamped to `[0, max_offset]`.
    pub fn scroll_by(&mut self, delta: i64) {
        let current = i64::try_from(self.scroll_offset).unwrap_or(i64::MAX);
        let target = current.saturating_add(delta).max(0);
        let target = usize::try_from(target).unwrap_or(usize::MAX);
        self.scroll_offset = target.min(self.max_offset());
        self.refresh_window();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.refresh_window();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_offset();
        self.refresh_window();
    }

    /// Moves the window along with the offset so visibility is current before the next frame.
    fn refresh_window(&mut self) {
        if self.window.is_some() {
            self.window = Some(self.compute_window());
        }
    }

    fn compute_window(&self) -> Window {
        let end = self.total_lines.min(self.scroll_offset + self.visible_lines);
        let sticky = self.scroll_offset > 0
            && self.header_lines > 0
            && self.header_lines + 1 < self.visible_lines;
        if sticky {
            Window {
                header: self.header_lines,
                start: (self.scroll_offset + self.header_lines + 1).min(end),
                end,
            }
        } else {
            Window { header: 0, start: self.scroll_offset, end }
        }
    }

    /// Requests a jump to the newest content on the next frame if it overflows.
    pub fn mark_content_changed(&mut self) {
        self.content_changed = true;
    }

    /// Lays out `text` for a screen area `height` lines tall.
    pub fn frame(&mut self, text: &str, kind: DiagramKind, height: usize) -> ViewportFrame {
        let all_lines = if text.is_empty() {
            Vec::new()
        } else {
            text.lines().map(str::to_owned).collect::<Vec<_>>()
        };
        self.total_lines = all_lines.len();
        self.visible_lines = height;
        self.header_lines = match kind {
            DiagramKind::Sequence => header_len(&all_lines),
            DiagramKind::Box => 0,
        };

        if self.content_changed && self.total_lines > height {
            self.scroll_offset = self.max_offset();
        }
        self.content_changed = false;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());

        let window = self.compute_window();
        let sticky = window.header > 0;
        self.window = Some(window);

        let mut lines = Vec::with_capacity(height);
        if sticky {
            lines.extend(all_lines[..window.header].iter().cloned());
            lines.push(HEADER_SEPARATOR.to_owned());
        }
        lines.extend(all_lines[window.start..window.end].iter().cloned());

        tracing::trace!(
            offset = self.scroll_offset,
            total = self.total_lines,
            visible = self.visible_lines,
            sticky,
            "viewport frame"
        );

        ViewportFrame {
            lines,
            window,
            hidden_above: if sticky { window.start - window.header } else { self.scroll_offset },
            hidden_below: self.total_lines - window.end,
        }
    }

    /// Visibility of diagram elements under the last frame.
    pub fn visibility<'a>(&self, diagram: &'a Diagram, layout: Option<&'a Layout>) -> Visible<'a> {
        Visible { diagram, layout, window: self.window }
    }
}

/// Lines up to and including the first lifeline row.
fn header_len(lines: &[String]) -> usize {
    lines
        .iter()
        .position(|line| line.contains(LIFELINE_GLYPH))
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// Element visibility for one diagram against one viewport window.
#[derive(Debug, Clone, Copy)]
pub struct Visible<'a> {
    diagram: &'a Diagram,
    layout: Option<&'a Layout>,
    window: Option<Window>,
}

impl Visible<'_> {
    fn rect_visible(window: &Window, rect: Rect) -> bool {
        window.intersects(rect.y, rect.bottom())
    }
}

impl Visibility for Visible<'_> {
    fn node_visible(&self, node_id: NodeId) -> bool {
        let Some(window) = self.window else {
            return true;
        };
        if self.diagram.is_sequence() {
            return !window.is_empty();
        }
        match self.layout.and_then(|layout| layout.node(node_id)) {
            Some(rect) => Self::rect_visible(&window, rect),
            None => true,
        }
    }

    fn connection_visible(&self, index: usize) -> bool {
        let Some(window) = self.window else {
            return true;
        };
        if let Some(point) = self.layout.and_then(|layout| layout.connection_midpoint(index)) {
            return window.contains_line(point.y);
        }
        let Some(connection) = self.diagram.connection(index) else {
            return false;
        };
        self.node_visible(connection.from()) || self.node_visible(connection.to())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Viewport, Window, HEADER_SEPARATOR};
    use crate::jump::Visibility;
    use crate::model::{Diagram, DiagramKind, Node};
    use crate::render::{Layout, OutlineRenderer, Point, Rect, Renderer, LIFELINE_GLYPH};

    fn numbered(count: usize) -> String {
        (0..count).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    fn sequence_text(header: usize, body: usize) -> String {
        let mut lines = (0..header).map(|i| format!("head {i}")).collect::<Vec<_>>();
        lines.push(format!("  {LIFELINE_GLYPH}"));
        lines.extend((0..body).map(|i| format!("body {i}")));
        lines.join("\n")
    }

    #[rstest]
    #[case(1_000_000, 90)]
    #[case(-1_000_000, 0)]
    #[case(i64::MAX, 90)]
    #[case(i64::MIN, 0)]
    fn scroll_is_clamped(#[case] delta: i64, #[case] expected: usize) {
        let mut viewport = Viewport::new();
        viewport.frame(&numbered(100), DiagramKind::Box, 10);
        viewport.scroll_by(delta);
        assert_eq!(viewport.scroll_offset(), expected);
    }

    #[test]
    fn scrolling_moves_the_window_before_the_next_frame() {
        let mut viewport = Viewport::new();
        viewport.frame(&numbered(40), DiagramKind::Box, 10);
        viewport.scroll_by(4);
        assert_eq!(viewport.window(), Some(Window { header: 0, start: 4, end: 14 }));
        viewport.scroll_to_bottom();
        assert_eq!(viewport.window(), Some(Window { header: 0, start: 30, end: 40 }));
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut viewport = Viewport::new();
        viewport.frame(&numbered(3), DiagramKind::Box, 10);
        viewport.scroll_by(5);
        assert_eq!(viewport.scroll_offset(), 0);
        assert_eq!(viewport.max_offset(), 0);
    }

    #[test]
    fn content_change_jumps_to_bottom_once() {
        let mut viewport = Viewport::new();
        viewport.mark_content_changed();
        let frame = viewport.frame(&numbered(30), DiagramKind::Box, 10);
        assert_eq!(viewport.scroll_offset(), 20);
        assert_eq!(frame.lines.first().map(String::as_str), Some("line 20"));
        assert_eq!(frame.clip_indicators(), vec!["20 more lines above".to_owned()]);

        viewport.scroll_by(-5);
        viewport.frame(&numbered(30), DiagramKind::Box, 10);
        assert_eq!(viewport.scroll_offset(), 15);
    }

    #[test]
    fn offset_shrinks_with_content() {
        let mut viewport = Viewport::new();
        viewport.frame(&numbered(30), DiagramKind::Box, 10);
        viewport.scroll_to_bottom();
        let frame = viewport.frame(&numbered(12), DiagramKind::Box, 10);
        assert_eq!(viewport.scroll_offset(), 2);
        assert_eq!(frame.hidden_below, 0);
    }

    #[test]
    fn sequence_header_sticks_after_scrolling() {
        let text = sequence_text(3, 40);
        let mut viewport = Viewport::new();
        let top = viewport.frame(&text, DiagramKind::Sequence, 12);
        assert_eq!(top.window, Window { header: 0, start: 0, end: 12 });

        viewport.scroll_by(10);
        let frame = viewport.frame(&text, DiagramKind::Sequence, 12);
        assert_eq!(frame.window, Window { header: 4, start: 15, end: 22 });
        assert_eq!(frame.lines[0], "head 0");
        assert_eq!(frame.lines[4], HEADER_SEPARATOR);
        assert_eq!(frame.lines[5], "body 11");
        assert_eq!(frame.lines.len(), 12);
        assert_eq!(frame.row_for_line(1), Some(1));
        assert_eq!(frame.row_for_line(15), Some(5));
        assert_eq!(frame.row_for_line(14), None);
        assert_eq!(frame.hidden_above, 11);
        assert_eq!(frame.hidden_below, 22);
        assert_eq!(frame.clip_indicators()[0], "11 more lines above");
    }

    #[test]
    fn scrolled_sequence_keeps_participants_and_tracks_message_midpoints() {
        let mut diagram = Diagram::new(DiagramKind::Sequence);
        for id in 1..=3 {
            diagram.add_node(Node::new(id, vec![format!("P{id}")]));
        }
        for index in 0..20 {
            let (from, to) = if index % 2 == 0 { (1, 3) } else { (3, 2) };
            diagram.add_connection(from, to, "").expect("message");
        }
        let rendered = OutlineRenderer.render(&diagram);

        let mut viewport = Viewport::new();
        viewport.frame(&rendered.text, DiagramKind::Sequence, 12);
        viewport.scroll_by(20);
        let frame = viewport.frame(&rendered.text, DiagramKind::Sequence, 12);
        assert!(frame.window.header > 0);

        let visible = viewport.visibility(&diagram, Some(&rendered.layout));
        for id in 1..=3 {
            assert!(visible.node_visible(id), "participant {id} hidden");
        }

        let mut shown = 0;
        for index in 0..20 {
            let midpoint = rendered.layout.connection_midpoint(index).expect("path");
            let in_window = frame.window.contains_line(midpoint.y);
            assert_eq!(visible.connection_visible(index), in_window, "message {index}");
            if in_window {
                let row = frame.row_for_line(midpoint.y).expect("row");
                assert!(row > frame.window.header);
                shown += 1;
            }
        }
        assert!(shown > 0 && shown < 20);
    }

    #[test]
    fn header_is_not_pinned_when_it_would_fill_the_screen() {
        let text = sequence_text(3, 40);
        let mut viewport = Viewport::new();
        viewport.frame(&text, DiagramKind::Sequence, 5);
        viewport.scroll_by(10);
        let frame = viewport.frame(&text, DiagramKind::Sequence, 5);
        assert_eq!(frame.window.header, 0);
        assert_eq!(frame.window.start, 10);
    }

    #[test]
    fn everything_is_visible_before_the_first_frame() {
        let mut diagram = Diagram::new(DiagramKind::Box);
        diagram.add_node(Node::new(1, vec!["A".to_owned()]));
        let viewport = Viewport::new();
        let visible = viewport.visibility(&diagram, None);
        assert!(visible.node_visible(1));
        assert!(visible.connection_visible(0));
    }

    #[test]
    fn box_visibility_follows_layout() {
        let mut diagram = Diagram::new(DiagramKind::Box);
        diagram.add_node(Node::new(1, vec!["A".to_owned()]));
        diagram.add_node(Node::new(2, vec!["B".to_owned()]));
        diagram.add_node(Node::new(3, vec!["C".to_owned()]));
        diagram.add_connection(1, 2, "").expect("edge");
        diagram.add_connection(2, 3, "").expect("edge");
        let mut layout = Layout::default();
        layout.insert_node(1, Rect::new(1, 0, 5, 3));
        layout.insert_node(2, Rect::new(1, 20, 5, 3));
        layout.insert_node(3, Rect::new(1, 40, 5, 3));
        layout.insert_connection_path(1, vec![Point::new(3, 30)]);

        let mut viewport = Viewport::new();
        viewport.frame(&numbered(50), DiagramKind::Box, 10);
        let visible = viewport.visibility(&diagram, Some(&layout));
        assert!(visible.node_visible(1));
        assert!(!visible.node_visible(2));
        // no path for connection 0, so its endpoints decide
        assert!(visible.connection_visible(0));
        assert!(!visible.connection_visible(1));
        assert!(!visible.connection_visible(7));
    }
}
