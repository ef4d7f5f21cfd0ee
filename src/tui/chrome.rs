// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Footer, help overlay and jump-label overlay helpers.

use ratatui::prelude::*;

use crate::editor::{Editor, Mode, Selection, Target};
use crate::jump::JumpLabels;
use crate::render::Layout as DiagramLayout;
use crate::viewport::ViewportFrame;

const FOOTER_LABEL_COLOR: Color = Color::DarkGray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const JUMP_LABEL_COLOR: Color = Color::Yellow;
const MODE_COLOR: Color = Color::Green;

fn jump_label_style() -> Style {
    Style::default().fg(Color::Black).bg(JUMP_LABEL_COLOR).add_modifier(Modifier::BOLD)
}

fn help_key_style() -> Style {
    Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub(super) fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

/// Bottom slice of `area` tall enough for `lines` lines plus a border.
pub(super) fn bottom_rect(area: Rect, lines: usize) -> Rect {
    let height = u16::try_from(lines.saturating_add(2)).unwrap_or(u16::MAX).min(area.height);
    Rect { x: area.x, y: area.y + area.height - height, width: area.width, height }
}

fn help_kv(key: &str, desc: &str, key_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), help_key_style()),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Normal",
        &[
            ("a", "Add node"),
            ("c / C", "Connect (C keeps connecting)"),
            ("d / D", "Delete (D keeps deleting)"),
            ("e", "Edit node text or connection label"),
            ("f", "Select"),
            ("H", "Edit hints"),
            ("i / I", "Insert message at position (sequence)"),
            ("v / V", "Mark / remove activation (sequence)"),
            ("t", "Toggle box / sequence"),
            ("u / U, Ctrl-r", "Undo / redo"),
            ("j k, ↑ ↓", "Scroll one line"),
            ("Ctrl-d Ctrl-u", "Scroll half a page"),
            ("g / G", "Top / bottom"),
            ("J", "JSON view"),
            (":", "Command line"),
            ("Esc", "Back to the last jump"),
        ],
    ),
    (
        "Jump",
        &[
            ("label", "Pick target"),
            ("↑ ↓ PgUp PgDn", "Scroll and relabel"),
            ("V", "Switch to activation removal"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "Text",
        &[
            ("Enter", "Commit (next connection when editing labels)"),
            ("Tab / Shift-Tab", "Previous / next connection label"),
            ("Ctrl-j, Alt-Enter", "New line"),
            ("Ctrl-a Ctrl-e", "Line start / end"),
            ("Ctrl-w Ctrl-u Ctrl-k", "Delete word / to start / to end"),
            ("Esc", "Commit and go back"),
        ],
    ),
    (
        "Hints",
        &[
            ("1 2 3 0", "Rounded / double / thick / plain box"),
            ("d", "Dashed connection"),
            ("a", "Arrow head"),
            ("b", "Bold"),
            ("c", "Cycle color"),
            ("Enter", "Done"),
        ],
    ),
    (
        "Commands",
        &[
            (":w [file]", "Save"),
            (":wq", "Save and quit"),
            (":q, :q!", "Quit, discarding with !"),
            (":export <fmt> [file]", "Export json or txt"),
        ],
    ),
];

pub(super) fn help_lines() -> Vec<Line<'static>> {
    let key_width = HELP_SECTIONS
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (index, (title, entries)) in HELP_SECTIONS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(format!("--- {title} ---"), help_header_style())));
        lines.extend(entries.iter().map(|(key, desc)| help_kv(key, desc, key_width)));
    }
    lines
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(format!("{label}:"), Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(value.to_owned(), help_key_style()));
}

fn selection_text(selection: Selection) -> Option<String> {
    match selection {
        Selection::None => None,
        Selection::Node(node_id) => Some(format!("node #{node_id}")),
        Selection::Connection(index) => Some(format!("connection {}", index + 1)),
    }
}

pub(super) fn footer_line(
    editor: &Editor,
    frame: Option<&ViewportFrame>,
    toast: Option<&str>,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", editor.mode().name()),
        Style::default().fg(Color::Black).bg(MODE_COLOR).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    let mut entries = Vec::<Span<'static>>::new();
    match editor.mode() {
        Mode::Command { line } => {
            spans.push(Span::raw(format!(":{}", line.text())));
            return Line::from(spans);
        }
        Mode::Jump(session) => {
            let mut action = session.action().name().to_owned();
            if session.is_continuous() {
                action.push_str(" (continuous)");
            }
            push_footer_entry(&mut entries, "Jump", &action);
        }
        Mode::HintMenu(Target::Node(_)) => {
            push_footer_entry(&mut entries, "Keys", "1 2 3 0 style, b bold, c color, Enter done");
        }
        Mode::HintMenu(Target::Connection(_)) => {
            push_footer_entry(
                &mut entries,
                "Keys",
                "d dashed, a arrow, b bold, c color, Enter done",
            );
        }
        _ => {}
    }

    push_footer_entry(&mut entries, "Type", editor.diagram().kind().as_str());
    push_footer_entry(&mut entries, "History", &editor.history_stats().to_string());
    if editor.is_dirty() {
        push_footer_entry(&mut entries, "File", "modified");
    }
    if let Some(selected) = selection_text(editor.selection()) {
        push_footer_entry(&mut entries, "Selected", &selected);
    }
    if let Some(frame) = frame {
        for indicator in frame.clip_indicators() {
            push_footer_entry(&mut entries, "View", &indicator);
        }
    }
    spans.extend(entries);
    if let Some(toast) = toast {
        spans.push(Span::styled(format!("  {toast}"), Style::default().fg(Color::White)));
    }
    Line::from(spans)
}

/// Screen cells `(row, column, label)` for every jump label in the frame.
pub(super) fn label_positions(
    frame: &ViewportFrame,
    labels: &JumpLabels,
    layout: Option<&DiagramLayout>,
    connection_count: usize,
) -> Vec<(usize, usize, char)> {
    let Some(layout) = layout else {
        return Vec::new();
    };
    let mut out = Vec::new();

    for (node_id, ch) in labels.nodes() {
        let Some(rect) = layout.node(*node_id) else { continue };
        if let Some(row) = (rect.y..rect.bottom()).find_map(|line| frame.row_for_line(line)) {
            out.push((row, rect.x + 1, *ch));
        }
    }

    for (index, ch) in labels.connections() {
        let Some(point) = layout.connection_midpoint(*index) else { continue };
        if let Some(row) = frame.row_for_line(point.y) {
            out.push((row, point.x, *ch));
        }
    }

    for (position, ch) in labels.insertions() {
        let line = if *position < connection_count {
            layout.connection_midpoint(*position).map(|point| point.y.saturating_sub(1))
        } else {
            position
                .checked_sub(1)
                .and_then(|last| layout.connection_midpoint(last))
                .map(|point| point.y + 1)
        };
        if let Some(row) = line.and_then(|line| frame.row_for_line(line)) {
            out.push((row, 0, *ch));
        }
    }
    out
}

/// `text` with the given cells replaced by highlighted labels.
pub(super) fn overlay_line(text: &str, marks: &[(usize, char)]) -> Line<'static> {
    if marks.is_empty() {
        return Line::raw(text.to_owned());
    }
    let mut chars = text.chars().collect::<Vec<_>>();
    let mut labelled = vec![false; chars.len()];
    for (col, ch) in marks {
        if *col >= chars.len() {
            chars.resize(*col + 1, ' ');
            labelled.resize(*col + 1, false);
        }
        chars[*col] = *ch;
        labelled[*col] = true;
    }

    let mut spans = Vec::new();
    let mut run = String::new();
    for (ch, is_label) in chars.into_iter().zip(labelled) {
        if is_label {
            if !run.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut run)));
            }
            spans.push(Span::styled(ch.to_string(), jump_label_style()));
        } else {
            run.push(ch);
        }
    }
    if !run.is_empty() {
        spans.push(Span::raw(run));
    }
    Line::from(spans)
}
