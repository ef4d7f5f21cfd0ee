// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modal editor state machine.
//!
//! [`Editor`] owns the diagram and consumes one key event at a time. Every mode carries its own
//! payload in [`Mode`], so a jump session, a pending connection source or a text buffer only
//! exist while the mode that needs them is active.

pub mod command;
mod text;


use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::activation;
use crate::history::{History, HistoryError, HistoryStats, DEFAULT_CAPACITY};
use crate::jump::{self, ActivationStart, JumpAction, JumpLabels, JumpTarget, LabelAlphabet};
use crate::model::hints::{self, HINT_BOLD, HINT_COLOR, HINT_STYLE, STYLE_DASHED};
use crate::model::{Diagram, Node, NodeId};
use crate::render::{Layout, Renderer};
use crate::viewport::{Viewport, ViewportFrame};

pub use command::{parse_command, Command, CommandError, ExportRequest, SaveRequest};
pub use text::TextBuffer;

/// Values cycled by the `c` hint key. The cycle ends back at "no color".
pub const HINT_COLORS: [&str; 6] = ["red", "green", "yellow", "blue", "magenta", "cyan"];

const DEFAULT_SCROLL_PAGE: usize = 10;

#[derive(Debug, Clone)]
pub struct EditorConfig {
    history_capacity: usize,
    label_alphabet: LabelAlphabet,
    scroll_page: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            label_alphabet: LabelAlphabet::default(),
            scroll_page: DEFAULT_SCROLL_PAGE,
        }
    }
}

impl EditorConfig {
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_label_alphabet(mut self, alphabet: LabelAlphabet) -> Self {
        self.label_alphabet = alphabet;
        self
    }

    /// Lines moved by a page scroll before the first frame reports the real height.
    pub fn with_scroll_page(mut self, lines: usize) -> Self {
        self.scroll_page = lines.max(1);
        self
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    pub fn label_alphabet(&self) -> &LabelAlphabet {
        &self.label_alphabet
    }

    pub fn scroll_page(&self) -> usize {
        self.scroll_page
    }
}

/// A node or a connection, by id or index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    Connection(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Connection(usize),
}

impl From<Target> for Selection {
    fn from(target: Target) -> Self {
        match target {
            Target::Node(node_id) => Self::Node(node_id),
            Target::Connection(index) => Self::Connection(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpSession {
    action: JumpAction,
    continuous: bool,
    labels: JumpLabels,
}

impl JumpSession {
    pub fn action(&self) -> JumpAction {
        self.action
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn labels(&self) -> &JumpLabels {
        &self.labels
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing the text of a freshly added node.
    Insert { node: NodeId, buffer: TextBuffer },
    Edit { target: Target, buffer: TextBuffer },
    Command { line: TextBuffer },
    Jump(JumpSession),
    JsonView,
    HintMenu(Target),
    Help,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert { .. } => "INSERT",
            Self::Edit { .. } => "EDIT",
            Self::Command { .. } => "COMMAND",
            Self::Jump(_) => "JUMP",
            Self::JsonView => "JSON",
            Self::HintMenu(_) => "HINT",
            Self::Help => "HELP",
        }
    }
}

pub struct Editor {
    diagram: Diagram,
    mode: Mode,
    selection: Selection,
    resume_jump: Option<JumpAction>,
    history: History,
    viewport: Viewport,
    layout: Option<Layout>,
    alphabet: LabelAlphabet,
    scroll_page: usize,
    next_node_id: NodeId,
    dirty: bool,
    message: Option<String>,
    save_request: Option<SaveRequest>,
    export_request: Option<ExportRequest>,
    quit_requested: bool,
}

impl Editor {
    pub fn new(diagram: Diagram) -> Self {
        Self::with_config(diagram, EditorConfig::default())
    }

    /// Wraps `diagram` and records it as the first history entry.
    pub fn with_config(diagram: Diagram, config: EditorConfig) -> Self {
        let next_node_id = diagram.next_node_id();
        let mut editor = Self {
            diagram,
            mode: Mode::Normal,
            selection: Selection::None,
            resume_jump: None,
            history: History::new(config.history_capacity),
            viewport: Viewport::new(),
            layout: None,
            alphabet: config.label_alphabet,
            scroll_page: config.scroll_page,
            next_node_id,
            dirty: false,
            message: None,
            save_request: None,
            export_request: None,
            quit_requested: false,
        };
        editor.save_history();
        editor
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Labels of the active jump session.
    pub fn labels(&self) -> Option<&JumpLabels> {
        match &self.mode {
            Mode::Jump(session) => Some(&session.labels),
            _ => None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Layout reported by the renderer for the last frame.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn take_save_request(&mut self) -> Option<SaveRequest> {
        self.save_request.take()
    }

    pub fn take_export_request(&mut self) -> Option<ExportRequest> {
        self.export_request.take()
    }

    pub fn take_quit_request(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }

    /// Pretty JSON of the current diagram, as shown by the JSON view.
    pub fn json_text(&self) -> String {
        serde_json::to_string_pretty(&self.diagram)
            .unwrap_or_else(|err| format!("failed to encode diagram: {err}"))
    }

    /// Text of the buffer being edited in Insert, Edit or Command mode.
    pub fn buffer(&self) -> Option<&TextBuffer> {
        match &self.mode {
            Mode::Insert { buffer, .. } | Mode::Edit { buffer, .. } => Some(buffer),
            Mode::Command { line } => Some(line),
            _ => None,
        }
    }

    // ---- mutations ----

    /// Appends a node with a fresh id. Ids are never handed out twice in one session, even
    /// after undo.
    pub fn add_node(&mut self, text: Vec<String>) -> NodeId {
        let node_id = self.next_node_id.max(self.diagram.next_node_id());
        self.diagram.add_node(Node::new(node_id, text));
        self.next_node_id = node_id + 1;
        self.viewport.mark_content_changed();
        self.persist();
        node_id
    }

    /// Removes a node and every connection touching it as one history step.
    pub fn delete_node(&mut self, node_id: NodeId) -> bool {
        if self.diagram.remove_node(node_id).is_none() {
            return false;
        }
        self.selection = Selection::None;
        self.persist();
        true
    }

    pub fn add_connection(&mut self, from: NodeId, to: NodeId, label: &str) -> Option<usize> {
        let index = self.diagram.add_connection(from, to, label)?;
        self.viewport.mark_content_changed();
        self.persist();
        Some(index)
    }

    pub fn insert_connection(
        &mut self,
        position: usize,
        from: NodeId,
        to: NodeId,
        label: &str,
    ) -> Option<usize> {
        let index = self.diagram.insert_connection(position, from, to, label)?;
        self.viewport.mark_content_changed();
        self.persist();
        Some(index)
    }

    pub fn delete_connection(&mut self, index: usize) -> bool {
        if self.diagram.remove_connection(index).is_none() {
            return false;
        }
        self.selection = Selection::None;
        self.persist();
        true
    }

    pub fn toggle_diagram_kind(&mut self) {
        let kind = self.diagram.kind().toggled();
        self.diagram.set_kind(kind);
        self.set_message(format!("diagram type: {}", kind.as_str()));
        self.persist();
    }

    // ---- history ----

    /// Snapshots the current diagram. Failures become the status message.
    pub fn save_history(&mut self) {
        if let Err(err) = self.history.save(&self.diagram) {
            tracing::warn!(error = %err, "history snapshot failed");
            self.set_message(err.to_string());
        }
    }

    pub fn undo(&mut self) -> bool {
        let result = self.history.undo();
        self.restore(result, "nothing to undo")
    }

    pub fn redo(&mut self) -> bool {
        let result = self.history.redo();
        self.restore(result, "nothing to redo")
    }

    fn restore(
        &mut self,
        result: Result<Option<Diagram>, HistoryError>,
        boundary: &str,
    ) -> bool {
        match result {
            Ok(Some(diagram)) => {
                self.diagram = diagram;
                self.selection = Selection::None;
                self.dirty = true;
                self.forget_connection_paths();
                self.set_message(format!("history {}", self.history.stats()));
                tracing::debug!(stats = %self.history.stats(), "history restored");
                true
            }
            Ok(None) => {
                self.set_message(boundary);
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "history restore failed");
                self.set_message(err.to_string());
                false
            }
        }
    }

    fn persist(&mut self) {
        self.dirty = true;
        self.forget_connection_paths();
        self.save_history();
    }

    fn forget_connection_paths(&mut self) {
        if let Some(layout) = self.layout.as_mut() {
            layout.forget_connection_paths();
        }
    }

    // ---- viewport ----

    pub fn scroll_diagram(&mut self, delta: i64) {
        self.viewport.scroll_by(delta);
    }

    fn half_page(&self) -> i64 {
        let visible = self.viewport.visible_lines();
        let lines = if visible == 0 { self.scroll_page } else { (visible / 2).max(1) };
        i64::try_from(lines).unwrap_or(i64::MAX)
    }

    /// Renders the diagram into a frame `height` lines tall and caches the layout. An active
    /// jump session is relabelled when the visible window moved.
    pub fn render(&mut self, renderer: &dyn Renderer, height: usize) -> ViewportFrame {
        let rendered = renderer.render(&self.diagram);
        let before = self.viewport.window();
        let frame = self.viewport.frame(&rendered.text, self.diagram.kind(), height);
        self.layout = Some(rendered.layout);
        if before != Some(frame.window) {
            self.relabel();
        }
        frame
    }

    fn relabel(&mut self) {
        if let Mode::Jump(session) = &mut self.mode {
            let visibility = self.viewport.visibility(&self.diagram, self.layout.as_ref());
            session.labels =
                jump::allocate(&self.alphabet, &self.diagram, &session.action, &visibility);
        }
    }

    // ---- jump sessions ----

    fn allocate_labels(&self, action: &JumpAction) -> JumpLabels {
        let visibility = self.viewport.visibility(&self.diagram, self.layout.as_ref());
        jump::allocate(&self.alphabet, &self.diagram, action, &visibility)
    }

    /// Enters a jump session unless no label on screen would do anything.
    fn start_jump(&mut self, action: JumpAction, continuous: bool) {
        let labels = self.allocate_labels(&action);
        if !labels.offers(&action) {
            self.set_message(format!("nothing to {}", action.name()));
            self.mode = Mode::Normal;
            return;
        }
        self.mode = Mode::Jump(JumpSession { action, continuous, labels });
    }

    fn enter_jump(&mut self, action: JumpAction, continuous: bool) {
        let labels = self.allocate_labels(&action);
        self.mode = Mode::Jump(JumpSession { action, continuous, labels });
    }

    fn reset_to_normal(&mut self) {
        self.mode = Mode::Normal;
        self.selection = Selection::None;
        self.resume_jump = None;
    }

    /// Leaves a sub-mode, going back to the jump it came from if one is remembered.
    fn resume_or_normal(&mut self) {
        match self.resume_jump.take() {
            Some(action) => self.start_jump(action, false),
            None => self.mode = Mode::Normal,
        }
    }

    // ---- key handling ----

    pub fn handle_key_code(&mut self, code: KeyCode) {
        self.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = std::mem::take(&mut self.mode);
        let before = mode.name();
        match mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Insert { node, buffer } => {
                self.handle_text_key(Target::Node(node), buffer, key, true)
            }
            Mode::Edit { target, buffer } => self.handle_text_key(target, buffer, key, false),
            Mode::Command { line } => self.handle_command_key(line, key),
            Mode::Jump(session) => self.handle_jump_key(session, key),
            Mode::JsonView => self.mode = Mode::Normal,
            Mode::HintMenu(target) => self.handle_hint_key(target, key),
            Mode::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => self.mode = Mode::Normal,
                _ => self.mode = Mode::Help,
            },
        }
        let after = self.mode.name();
        if before != after {
            tracing::debug!(from = before, to = after, "mode change");
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') => {
                    self.redo();
                }
                KeyCode::Char('d') => self.scroll_diagram(self.half_page()),
                KeyCode::Char('u') => self.scroll_diagram(-self.half_page()),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.resume_or_normal(),
            KeyCode::Char('a') => {
                let node_id = self.add_node(Vec::new());
                self.selection = Selection::Node(node_id);
                self.mode = Mode::Insert { node: node_id, buffer: TextBuffer::multi_line(&[]) };
            }
            KeyCode::Char(ch @ ('c' | 'C')) => {
                if self.diagram.nodes().len() < 2 {
                    self.set_message("need at least two nodes to connect");
                    return;
                }
                self.selection = Selection::None;
                self.start_jump(JumpAction::ConnectFrom { insert_at: None }, ch == 'C');
            }
            KeyCode::Char(ch @ ('d' | 'D')) => self.start_jump(JumpAction::Delete, ch == 'D'),
            KeyCode::Char('e') => self.start_jump(JumpAction::Edit, false),
            KeyCode::Char('f') => self.start_jump(JumpAction::Select, false),
            KeyCode::Char('H') => self.start_jump(JumpAction::Hint, false),
            KeyCode::Char(ch @ ('i' | 'I')) => {
                if !self.diagram.is_sequence() || self.diagram.nodes().len() < 2 {
                    self.set_message("insert needs a sequence diagram with two participants");
                    return;
                }
                self.selection = Selection::None;
                self.start_jump(JumpAction::InsertAt, ch == 'I');
            }
            KeyCode::Char('v') => {
                if !self.diagram.is_sequence() || self.diagram.connections().is_empty() {
                    self.set_message("activation needs a sequence diagram with messages");
                    return;
                }
                self.start_jump(JumpAction::Activation { start: None }, false);
            }
            KeyCode::Char('V') => {
                if !self.diagram.is_sequence() {
                    self.set_message("activation needs a sequence diagram");
                    return;
                }
                self.start_jump(JumpAction::DeleteActivation, false);
            }
            KeyCode::Char('u') => {
                self.undo();
            }
            KeyCode::Char('U') => {
                self.redo();
            }
            KeyCode::Char('t') => self.toggle_diagram_kind(),
            KeyCode::Char('J') => self.mode = Mode::JsonView,
            KeyCode::Char('?') => self.mode = Mode::Help,
            KeyCode::Char(':') => self.mode = Mode::Command { line: TextBuffer::single_line("") },
            KeyCode::Char('j') | KeyCode::Down => self.scroll_diagram(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_diagram(-1),
            KeyCode::PageDown => self.scroll_diagram(self.half_page()),
            KeyCode::PageUp => self.scroll_diagram(-self.half_page()),
            KeyCode::Char('g') => self.viewport.scroll_to_top(),
            KeyCode::Char('G') => self.viewport.scroll_to_bottom(),
            _ => {}
        }
    }

    fn handle_jump_key(&mut self, session: JumpSession, key: KeyEvent) {
        let scroll = match key.code {
            KeyCode::Up => Some(-1),
            KeyCode::Down => Some(1),
            KeyCode::PageUp => Some(-self.half_page()),
            KeyCode::PageDown => Some(self.half_page()),
            _ => None,
        };
        if let Some(delta) = scroll {
            self.scroll_diagram(delta);
            self.mode = Mode::Jump(session);
            self.relabel();
            return;
        }

        match key.code {
            KeyCode::Esc => self.reset_to_normal(),
            KeyCode::Char('V')
                if matches!(session.action, JumpAction::Activation { start: Some(_) }) =>
            {
                self.selection = Selection::None;
                self.enter_jump(JumpAction::DeleteActivation, session.continuous);
            }
            KeyCode::Char(ch) => match session.labels.target_for(ch) {
                Some(target) => self.dispatch_jump(session.action, session.continuous, target),
                None if session.continuous => self.mode = Mode::Jump(session),
                None => self.reset_to_normal(),
            },
            _ if session.continuous => self.mode = Mode::Jump(session),
            _ => self.reset_to_normal(),
        }
    }

    fn dispatch_jump(&mut self, action: JumpAction, continuous: bool, target: JumpTarget) {
        tracing::debug!(action = action.name(), ?target, continuous, "jump dispatch");
        match (action, target) {
            (JumpAction::Select, JumpTarget::Node(node_id)) => {
                self.selection = Selection::Node(node_id);
                self.mode = Mode::Normal;
            }
            (JumpAction::Edit, JumpTarget::Node(node_id)) => {
                let text = self.diagram.node(node_id).map(|node| node.text().to_vec());
                self.selection = Selection::Node(node_id);
                self.mode = Mode::Edit {
                    target: Target::Node(node_id),
                    buffer: TextBuffer::multi_line(&text.unwrap_or_default()),
                };
            }
            (JumpAction::Edit, JumpTarget::Connection(index)) => {
                self.resume_jump = Some(JumpAction::Edit);
                self.begin_connection_edit(index);
            }
            (JumpAction::Delete, JumpTarget::Node(node_id)) => {
                self.delete_node(node_id);
                self.continue_delete(continuous);
            }
            (JumpAction::Delete, JumpTarget::Connection(index)) => {
                self.delete_connection(index);
                self.continue_delete(continuous);
            }
            (JumpAction::ConnectFrom { insert_at }, JumpTarget::Node(node_id)) => {
                self.selection = Selection::Node(node_id);
                self.enter_jump(JumpAction::ConnectTo { source: node_id, insert_at }, continuous);
            }
            (JumpAction::ConnectTo { source, insert_at }, JumpTarget::Node(node_id)) => {
                self.connect(source, node_id, insert_at, continuous);
            }
            (JumpAction::Hint, JumpTarget::Node(node_id)) => {
                self.open_hint_menu(Target::Node(node_id));
            }
            (JumpAction::Hint, JumpTarget::Connection(index)) => {
                self.open_hint_menu(Target::Connection(index));
            }
            (JumpAction::InsertAt, JumpTarget::Insertion(position)) => {
                self.selection = Selection::None;
                self.enter_jump(JumpAction::ConnectFrom { insert_at: Some(position) }, continuous);
            }
            (JumpAction::Activation { start: None }, JumpTarget::Connection(index)) => {
                let Some(connection) = self.diagram.connection(index) else {
                    self.reset_to_normal();
                    return;
                };
                let start = ActivationStart { connection: index, participant: connection.from() };
                self.selection = Selection::Connection(index);
                self.enter_jump(JumpAction::Activation { start: Some(start) }, continuous);
            }
            (JumpAction::Activation { start: Some(start) }, JumpTarget::Connection(index)) => {
                if activation::mark_span(&mut self.diagram, start.connection, index) {
                    self.persist();
                }
                self.reset_to_normal();
            }
            (JumpAction::DeleteActivation, JumpTarget::Connection(index)) => {
                let participant = activation::activated_participants(&self.diagram)
                    .into_iter()
                    .find(|(_, first)| *first == index)
                    .map(|(participant, _)| participant);
                if let Some(participant) = participant {
                    if activation::clear_participant(&mut self.diagram, participant) {
                        self.persist();
                    }
                }
                self.reset_to_normal();
            }
            _ => self.reset_to_normal(),
        }
    }

    fn continue_delete(&mut self, continuous: bool) {
        if continuous && !self.diagram.is_empty() {
            self.enter_jump(JumpAction::Delete, true);
        } else {
            self.reset_to_normal();
        }
    }

    fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        insert_at: Option<usize>,
        continuous: bool,
    ) {
        let created = match insert_at {
            Some(position) => self.insert_connection(position, source, target, ""),
            None => self.add_connection(source, target, ""),
        };
        if created.is_none() {
            self.set_message("connection not added");
        }

        if continuous && self.diagram.is_sequence() {
            // The next message continues from the node just reached, right after this one.
            let insert_at = match (insert_at, created) {
                (Some(_), Some(index)) => Some(index + 1),
                (insert_at, _) => insert_at,
            };
            self.selection = Selection::Node(target);
            self.enter_jump(JumpAction::ConnectTo { source: target, insert_at }, true);
        } else if continuous {
            self.selection = Selection::None;
            self.enter_jump(JumpAction::ConnectFrom { insert_at }, true);
        } else {
            self.reset_to_normal();
        }
    }

    fn open_hint_menu(&mut self, target: Target) {
        self.selection = target.into();
        self.resume_jump = Some(JumpAction::Hint);
        self.mode = Mode::HintMenu(target);
    }

    fn begin_connection_edit(&mut self, index: usize) {
        match self.diagram.connection(index) {
            Some(connection) => {
                let buffer = TextBuffer::single_line(connection.label());
                self.selection = Selection::Connection(index);
                self.mode = Mode::Edit { target: Target::Connection(index), buffer };
            }
            None => self.reset_to_normal(),
        }
    }

    // ---- text editing ----

    fn handle_text_key(
        &mut self,
        target: Target,
        mut buffer: TextBuffer,
        key: KeyEvent,
        insert: bool,
    ) {
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => {
                self.commit_text(target, &buffer);
                self.resume_or_normal();
            }
            KeyCode::Enter if !alt => {
                self.commit_text(target, &buffer);
                match target {
                    Target::Connection(index) if index + 1 < self.diagram.connections().len() => {
                        self.begin_connection_edit(index + 1);
                    }
                    Target::Connection(_) => {
                        self.resume_jump = None;
                        self.mode = Mode::Normal;
                    }
                    Target::Node(_) => self.mode = Mode::Normal,
                }
            }
            KeyCode::Tab | KeyCode::BackTab if matches!(target, Target::Connection(_)) => {
                self.commit_text(target, &buffer);
                let count = self.diagram.connections().len();
                let Target::Connection(index) = target else { return };
                if count == 0 {
                    self.reset_to_normal();
                    return;
                }
                let next = if key.code == KeyCode::Tab {
                    (index + 1) % count
                } else {
                    (index + count - 1) % count
                };
                self.begin_connection_edit(next);
            }
            _ => {
                buffer.handle_key(key);
                self.mode = match (insert, target) {
                    (true, Target::Node(node)) => Mode::Insert { node, buffer },
                    _ => Mode::Edit { target, buffer },
                };
            }
        }
    }

    /// Writes the buffer back to its target and snapshots history if anything changed.
    fn commit_text(&mut self, target: Target, buffer: &TextBuffer) {
        let changed = match target {
            Target::Node(node_id) => {
                let text = if buffer.is_empty() { Vec::new() } else { buffer.lines() };
                self.diagram.set_node_text(node_id, text)
            }
            Target::Connection(index) => self.diagram.set_connection_label(index, buffer.text()),
        };
        if changed {
            self.persist();
        }
    }

    // ---- hint menu ----

    fn handle_hint_key(&mut self, target: Target, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.resume_or_normal();
                return;
            }
            KeyCode::Enter => {
                self.resume_jump = None;
                self.mode = Mode::Normal;
                return;
            }
            _ => {}
        }
        self.mode = Mode::HintMenu(target);

        let KeyCode::Char(ch) = key.code else { return };
        let changed = match target {
            Target::Node(node_id) => {
                let Some(node) = self.diagram.node_mut(node_id) else { return };
                let node_hints = node.hints_mut();
                match ch {
                    '1' => hints::set_value(node_hints, HINT_STYLE, Some("rounded")),
                    '2' => hints::set_value(node_hints, HINT_STYLE, Some("double")),
                    '3' => hints::set_value(node_hints, HINT_STYLE, Some("thick")),
                    '0' => hints::set_value(node_hints, HINT_STYLE, None),
                    'b' => toggle_flag(node_hints, HINT_BOLD),
                    'c' => cycle_color(node_hints),
                    _ => false,
                }
            }
            Target::Connection(index) => {
                let Some(connection) = self.diagram.connection_mut(index) else { return };
                match ch {
                    'd' => {
                        let style = if connection.is_dashed() { None } else { Some(STYLE_DASHED) };
                        hints::set_value(connection.hints_mut(), HINT_STYLE, style)
                    }
                    'a' => {
                        connection.set_arrow(!connection.arrow());
                        true
                    }
                    'b' => toggle_flag(connection.hints_mut(), HINT_BOLD),
                    'c' => cycle_color(connection.hints_mut()),
                    _ => false,
                }
            }
        };
        if changed {
            self.persist();
        }
    }

    // ---- command line ----

    fn handle_command_key(&mut self, mut line: TextBuffer, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace if line.is_empty() => self.mode = Mode::Normal,
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.execute_command(&line.text());
            }
            _ => {
                line.handle_key(key);
                self.mode = Mode::Command { line };
            }
        }
    }

    fn execute_command(&mut self, line: &str) {
        tracing::debug!(line, "command");
        match parse_command(line) {
            Ok(Command::Write(path)) => self.save_request = Some(SaveRequest { path }),
            Ok(Command::WriteQuit(path)) => {
                self.save_request = Some(SaveRequest { path });
                self.quit_requested = true;
            }
            Ok(Command::Quit { force }) => {
                if self.dirty && !force {
                    self.set_message("unsaved changes (add ! to override)");
                } else {
                    self.quit_requested = true;
                }
            }
            Ok(Command::Export { format, path }) => {
                self.export_request = Some(ExportRequest { format, path });
            }
            Err(CommandError::Empty) => {}
            Err(err) => self.set_message(err.to_string()),
        }
    }
}

fn toggle_flag(node_hints: &mut hints::Hints, key: &str) -> bool {
    let value = !hints::flag(node_hints, key);
    hints::set_flag(node_hints, key, value)
}

fn cycle_color(node_hints: &mut hints::Hints) -> bool {
    let current = node_hints.get(HINT_COLOR).map(String::as_str);
    let next = match current.and_then(|color| HINT_COLORS.iter().position(|c| *c == color)) {
        Some(index) => HINT_COLORS.get(index + 1).copied(),
        None if current.is_some() => None,
        None => HINT_COLORS.first().copied(),
    };
    hints::set_value(node_hints, HINT_COLOR, next)
}
