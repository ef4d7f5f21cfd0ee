// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::KeyCode;
use tessel::editor::{Editor, Mode, Selection};
use tessel::model::{Diagram, DiagramKind};
use tessel::render::OutlineRenderer;
use tessel::store;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_file(name: &str) -> PathBuf {
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("tessel-it-{}-{counter}-{name}", std::process::id()))
}

fn keys(editor: &mut Editor, keys: &str) {
    for ch in keys.chars() {
        editor.handle_key_code(KeyCode::Char(ch));
    }
}

fn add_node(editor: &mut Editor, text: &str) {
    keys(editor, "a");
    keys(editor, text);
    editor.handle_key_code(KeyCode::Enter);
}

#[test]
fn builds_a_sequence_diagram_from_keystrokes() {
    let mut editor = Editor::new(Diagram::new(DiagramKind::Sequence));
    add_node(&mut editor, "Client");
    add_node(&mut editor, "Server");
    assert!(matches!(editor.mode(), Mode::Normal));

    // participants are labelled in diagram order: a, s
    keys(&mut editor, "cas");
    keys(&mut editor, "csa");
    let diagram = editor.diagram();
    assert_eq!(diagram.connections().len(), 2);
    assert_eq!(diagram.connections()[0].from(), 1);
    assert_eq!(diagram.connections()[1].from(), 2);
    assert!(editor.is_dirty());

    keys(&mut editor, "u");
    assert_eq!(editor.diagram().connections().len(), 1);
    assert_eq!(editor.selection(), Selection::None);
    keys(&mut editor, "U");
    assert_eq!(editor.diagram().connections().len(), 2);

    let frame = editor.render(&OutlineRenderer, 40);
    assert!(frame.lines[1].contains("Client"));
    assert!(frame.lines[1].contains("Server"));
    assert_eq!(frame.hidden_below, 0);
}

#[test]
fn saved_diagram_reloads_identically() {
    let path = temp_file("roundtrip.json");
    let mut editor = Editor::new(Diagram::new(DiagramKind::Box));
    add_node(&mut editor, "A");
    add_node(&mut editor, "B");
    keys(&mut editor, "cas");

    store::save_diagram(&path, editor.diagram()).expect("save");
    let loaded = store::load_diagram(&path).expect("load");
    let _ = std::fs::remove_file(&path);
    assert_eq!(&loaded, editor.diagram());
}

#[test]
fn box_diagram_refuses_duplicate_edges() {
    let mut editor = Editor::new(Diagram::new(DiagramKind::Box));
    add_node(&mut editor, "A");
    add_node(&mut editor, "B");
    keys(&mut editor, "cas");
    let before = editor.history_stats();
    keys(&mut editor, "cas");

    assert_eq!(editor.diagram().connections().len(), 1);
    assert_eq!(editor.history_stats(), before);
    assert_eq!(editor.message(), Some("connection not added"));
}

#[test]
fn missing_file_starts_a_new_diagram() {
    let path = temp_file("missing.json");
    let diagram = store::load_or_new(&path, DiagramKind::Sequence).expect("new diagram");
    assert!(diagram.is_sequence());
    assert!(diagram.is_empty());
}
