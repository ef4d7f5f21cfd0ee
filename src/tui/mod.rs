// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal host loop.
//!
//! Owns the terminal (crossterm raw mode + alternate screen), feeds key presses to the
//! [`Editor`], draws each frame with ratatui and carries out the save/export/quit requests the
//! editor queues.

mod chrome;


use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::editor::{Editor, ExportRequest, Mode};
use crate::render::OutlineRenderer;
use crate::store::{self, ExportFormat};

use chrome::{
    bottom_rect, centered_rect, footer_line, help_lines, label_positions, overlay_line,
};

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Runs the editor until it requests to quit. `file` is where `:w` saves by default.
pub fn run(editor: Editor, file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(editor, file);
    tracing::info!(file = ?app.file, "editor session started");
    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    tracing::info!("editor session finished");
    Ok(())
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    editor: Editor,
    file: Option<PathBuf>,
    renderer: OutlineRenderer,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(editor: Editor, file: Option<PathBuf>) -> Self {
        Self { editor, file, renderer: OutlineRenderer, toast: None, should_quit: false }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.editor.handle_key(key);
        self.process_requests();
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast =
            Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_DURATION });
    }

    fn toast_text(&mut self) -> Option<String> {
        match &self.toast {
            Some(toast) if toast.expires_at > Instant::now() => Some(toast.message.clone()),
            Some(_) => {
                self.toast = None;
                None
            }
            None => None,
        }
    }

    /// Performs whatever the last key queued. A failed save cancels a pending quit.
    fn process_requests(&mut self) {
        if let Some(message) = self.editor.take_message() {
            self.set_toast(message);
        }

        let mut save_failed = false;
        if let Some(request) = self.editor.take_save_request() {
            match self.save(request.path) {
                Ok(path) => self.set_toast(format!("wrote {}", path.display())),
                Err(err) => {
                    tracing::warn!(error = %err, "save failed");
                    self.set_toast(err);
                    save_failed = true;
                }
            }
        }

        if let Some(request) = self.editor.take_export_request() {
            match self.export(request) {
                Ok(path) => self.set_toast(format!("exported {}", path.display())),
                Err(err) => {
                    tracing::warn!(error = %err, "export failed");
                    self.set_toast(err);
                }
            }
        }

        if self.editor.take_quit_request() && !save_failed {
            self.should_quit = true;
        }
    }

    fn save(&mut self, path: Option<PathBuf>) -> Result<PathBuf, String> {
        let Some(path) = path.or_else(|| self.file.clone()) else {
            return Err("no file name (use :w <file>)".to_owned());
        };
        store::save_diagram(&path, self.editor.diagram()).map_err(|err| err.to_string())?;
        if self.file.is_none() {
            self.file = Some(path.clone());
        }
        self.editor.mark_saved();
        Ok(path)
    }

    fn export(&self, request: ExportRequest) -> Result<PathBuf, String> {
        let format = request.format.parse::<ExportFormat>().map_err(|err| err.to_string())?;
        let path = request
            .path
            .unwrap_or_else(|| store::default_export_path(self.file.as_deref(), format));
        store::export_diagram(&path, self.editor.diagram(), format, &self.renderer)
            .map_err(|err| err.to_string())?;
        Ok(path)
    }

    fn title(&self) -> String {
        let name = self
            .file
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "[no file]".to_owned());
        let marker = if self.editor.is_dirty() { " *" } else { "" };
        format!(" tessel: {name}{marker} ")
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];
    let block = Block::default().borders(Borders::ALL).title(app.title());

    if matches!(app.editor.mode(), Mode::JsonView) {
        let json = Paragraph::new(app.editor.json_text()).block(block);
        frame.render_widget(json, main_area);
        let toast = app.toast_text();
        let footer = footer_line(&app.editor, None, toast.as_deref());
        frame.render_widget(Paragraph::new(footer), status_area);
        return;
    }

    let inner = block.inner(main_area);
    let viewport = app.editor.render(&app.renderer, usize::from(inner.height));

    let marks = match app.editor.labels() {
        Some(labels) => label_positions(
            &viewport,
            labels,
            app.editor.layout(),
            app.editor.diagram().connections().len(),
        ),
        None => Vec::new(),
    };
    let lines = viewport
        .lines
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let row_marks = marks
                .iter()
                .filter(|(mark_row, _, _)| *mark_row == row)
                .map(|(_, col, ch)| (*col, *ch))
                .collect::<Vec<_>>();
            overlay_line(text, &row_marks)
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), main_area);

    let editing = matches!(app.editor.mode(), Mode::Insert { .. } | Mode::Edit { .. });
    if let Some(buffer) = app.editor.buffer().filter(|_| editing) {
        let buffer_lines = buffer.lines();
        let area = bottom_rect(inner, buffer_lines.len());
        let title = match app.editor.mode() {
            Mode::Insert { .. } => " new node ",
            _ => " edit ",
        };
        frame.render_widget(Clear, area);
        let popup = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(Paragraph::new(buffer.text()).block(popup), area);
        let (line, col) = buffer.cursor_line_col();
        frame.set_cursor(
            area.x.saturating_add(1).saturating_add(u16::try_from(col).unwrap_or(u16::MAX)),
            area.y.saturating_add(1).saturating_add(u16::try_from(line).unwrap_or(u16::MAX)),
        );
    }

    let toast = app.toast_text();
    let footer = footer_line(&app.editor, Some(&viewport), toast.as_deref());
    frame.render_widget(Paragraph::new(footer), status_area);

    match app.editor.mode() {
        Mode::Command { line } => {
            let offset = app.editor.mode().name().chars().count() + 4 + line.cursor();
            let x = status_area.x.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
            frame.set_cursor(x.min(status_area.right().saturating_sub(1)), status_area.y);
        }
        Mode::Help => {
            let area = centered_rect(70, 84, main_area);
            frame.render_widget(Clear, area);
            let help = Paragraph::new(help_lines())
                .block(Block::default().borders(Borders::ALL).title(" Help "))
                .wrap(Wrap { trim: false });
            frame.render_widget(help, area);
        }
        _ => {}
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
