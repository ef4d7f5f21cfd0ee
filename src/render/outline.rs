// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in outline renderer.
//!
//! Box diagrams stack their nodes vertically followed by one line per connection. Sequence
//! diagrams draw participant boxes in a row, a lifeline row, then a label row and an arrow row
//! per message.

use std::collections::BTreeSet;

use super::canvas::{BoxGlyphs, Canvas};
use super::text::{max_line_len, text_len};
use super::{Layout, Point, Rect, Renderer, Rendered, ACTIVE_LIFELINE_GLYPH, LIFELINE_GLYPH};
use crate::model::{
    Connection, Diagram, DiagramKind, Node, NodeId, HINT_ACTIVATE, HINT_ACTIVATE_SOURCE,
    HINT_DEACTIVATE, HINT_STYLE,
};

const LEFT_MARGIN: usize = 1;
const BOX_PADDING: usize = 2;
const PARTICIPANT_GAP: usize = 4;
const SOLID: char = '─';
const DASHED: char = '╌';

#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, diagram: &Diagram) -> Rendered {
        match diagram.kind() {
            DiagramKind::Box => render_box(diagram),
            DiagramKind::Sequence => render_sequence(diagram),
        }
    }
}

fn node_lines(node: &Node) -> Vec<String> {
    if node.text().is_empty() {
        vec![String::new()]
    } else {
        node.text().to_vec()
    }
}

fn box_width(lines: &[String]) -> usize {
    max_line_len(lines).max(1) + BOX_PADDING * 2
}

fn glyphs_for(node: &Node) -> BoxGlyphs {
    BoxGlyphs::for_style(node.hints().get(HINT_STYLE).map(String::as_str))
}

fn stroke_for(connection: &Connection) -> char {
    if connection.is_dashed() {
        DASHED
    } else {
        SOLID
    }
}

fn render_box(diagram: &Diagram) -> Rendered {
    let mut layout = Layout::default();
    let mut boxes = Vec::<(&Node, Vec<String>, Rect)>::new();
    let mut y = 0;
    for node in diagram.nodes() {
        let lines = node_lines(node);
        let rect = Rect::new(LEFT_MARGIN, y, box_width(&lines), lines.len() + 2);
        y = rect.bottom() + 1;
        layout.insert_node(node.id(), rect);
        boxes.push((node, lines, rect));
    }

    let edge_lines = diagram
        .connections()
        .iter()
        .map(|connection| {
            let from = diagram.node(connection.from()).map(Node::title).unwrap_or_default();
            let to = diagram.node(connection.to()).map(Node::title).unwrap_or_default();
            let stroke = stroke_for(connection);
            let head = if connection.arrow() { '▶' } else { stroke };
            let arrow = format!(" {stroke}{stroke}{head} ");
            let label = if connection.label().is_empty() {
                String::new()
            } else {
                format!(" : {}", connection.label())
            };
            (from, arrow, to, label)
        })
        .collect::<Vec<_>>();

    let width = boxes
        .iter()
        .map(|(_, _, rect)| rect.x + rect.width)
        .chain(edge_lines.iter().map(|(from, arrow, to, label)| {
            LEFT_MARGIN + text_len(from) + text_len(arrow) + text_len(to) + text_len(label)
        }))
        .max()
        .unwrap_or(0)
        + 1;
    let height = y + edge_lines.len();
    let mut canvas = Canvas::new(width, height);

    for (node, lines, rect) in &boxes {
        canvas.draw_box(
            rect.x,
            rect.y,
            rect.x + rect.width - 1,
            rect.bottom() - 1,
            glyphs_for(node),
        );
        for (offset, line) in lines.iter().enumerate() {
            canvas.write_str(rect.x + BOX_PADDING, rect.y + 1 + offset, line);
        }
    }

    for (index, (from, arrow, to, label)) in edge_lines.iter().enumerate() {
        let row = y + index;
        let arrow_x = LEFT_MARGIN + text_len(from);
        canvas.write_str(LEFT_MARGIN, row, from);
        canvas.write_str(arrow_x, row, arrow);
        let to_x = arrow_x + text_len(arrow);
        canvas.write_str(to_x, row, to);
        canvas.write_str(to_x + text_len(to), row, label);

        let path = (arrow_x..to_x).map(|x| Point::new(x, row)).collect::<Vec<_>>();
        layout.insert_connection_path(index, path);
    }

    Rendered { text: canvas.to_trimmed_string(), layout }
}

struct Participant {
    id: NodeId,
    lines: Vec<String>,
    glyphs: BoxGlyphs,
    x: usize,
    width: usize,
}

impl Participant {
    fn center(&self) -> usize {
        self.x + self.width / 2
    }
}

fn render_sequence(diagram: &Diagram) -> Rendered {
    let mut layout = Layout::default();
    let mut participants = Vec::<Participant>::new();
    let mut x = LEFT_MARGIN;
    for node in diagram.nodes() {
        let lines = node_lines(node);
        let width = box_width(&lines);
        participants.push(Participant { id: node.id(), lines, glyphs: glyphs_for(node), x, width });
        x += width + PARTICIPANT_GAP;
    }
    if participants.is_empty() {
        return Rendered::default();
    }

    let header_height = participants.iter().map(|p| p.lines.len()).max().unwrap_or(1) + 2;
    let lifeline_row = header_height;
    let center_of = |id: NodeId| participants.iter().find(|p| p.id == id).map(Participant::center);

    let label_end = diagram
        .connections()
        .iter()
        .filter_map(|connection| {
            let from = center_of(connection.from())?;
            let to = center_of(connection.to())?;
            Some(from.min(to) + 2 + text_len(connection.label()) + 3)
        })
        .max()
        .unwrap_or(0);
    let width = x.max(label_end) + 1;
    let height = lifeline_row + 2 + diagram.connections().len() * 2;
    let mut canvas = Canvas::new(width, height);

    for participant in &participants {
        let right = participant.x + participant.width - 1;
        canvas.draw_box(participant.x, 0, right, header_height - 1, participant.glyphs);
        for (offset, line) in participant.lines.iter().enumerate() {
            canvas.write_str(participant.x + BOX_PADDING, 1 + offset, line);
        }
        canvas.set(participant.center(), header_height - 1, '┬');
        canvas.set(participant.center(), lifeline_row, LIFELINE_GLYPH);
        layout.insert_node(
            participant.id,
            Rect::new(participant.x, 0, participant.width, header_height),
        );
    }

    let mut active = BTreeSet::<NodeId>::new();
    for (index, connection) in diagram.connections().iter().enumerate() {
        let label_row = lifeline_row + 1 + index * 2;
        let arrow_row = label_row + 1;

        if connection.has_flag(HINT_ACTIVATE_SOURCE) {
            active.insert(connection.from());
        }
        if connection.has_flag(HINT_ACTIVATE) {
            active.insert(connection.to());
        }
        for participant in &participants {
            let glyph = if active.contains(&participant.id) {
                ACTIVE_LIFELINE_GLYPH
            } else {
                LIFELINE_GLYPH
            };
            canvas.set(participant.center(), label_row, glyph);
            canvas.set(participant.center(), arrow_row, glyph);
        }
        if connection.has_flag(HINT_DEACTIVATE) {
            active.remove(&connection.from());
        }

        let (Some(from), Some(to)) = (center_of(connection.from()), center_of(connection.to()))
        else {
            continue;
        };
        let stroke = stroke_for(connection);
        let mut path = Vec::<Point>::new();

        if from == to {
            canvas.write_str(from + 1, label_row, &format!("{stroke}┐ {}", connection.label()));
            let head = if connection.arrow() { '◀' } else { stroke };
            canvas.set(from + 1, arrow_row, head);
            canvas.set(from + 2, arrow_row, '┘');
            path.extend([
                Point::new(from + 1, label_row),
                Point::new(from + 2, label_row),
                Point::new(from + 2, arrow_row),
                Point::new(from + 1, arrow_row),
            ]);
        } else {
            let (left, right) = (from.min(to), from.max(to));
            canvas.draw_hline(left + 1, right - 1, arrow_row, stroke);
            if connection.arrow() {
                if to > from {
                    canvas.set(right - 1, arrow_row, '▶');
                } else {
                    canvas.set(left + 1, arrow_row, '◀');
                }
            }
            canvas.write_str(left + 2, label_row, connection.label());
            path.extend((left + 1..right).map(|x| Point::new(x, arrow_row)));
        }
        layout.insert_connection_path(index, path);
    }

    let last_row = height - 1;
    for participant in &participants {
        canvas.set(participant.center(), last_row, LIFELINE_GLYPH);
    }

    Rendered { text: canvas.to_trimmed_string(), layout }
}
