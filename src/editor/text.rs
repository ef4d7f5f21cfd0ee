// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cursor-addressed text buffer used by Insert, Edit and Command modes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Flat character buffer with `\n` separated lines and an absolute cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    cursor: usize,
    single_line: bool,
}

impl TextBuffer {
    /// A multi-line buffer holding `lines`, cursor at the end.
    pub fn multi_line(lines: &[String]) -> Self {
        let chars = lines.join("\n").chars().collect::<Vec<_>>();
        let cursor = chars.len();
        Self { chars, cursor, single_line: false }
    }

    /// A buffer that never holds a newline. Embedded newlines become spaces.
    pub fn single_line(text: &str) -> Self {
        let chars = text.chars().map(|ch| if ch == '\n' { ' ' } else { ch }).collect::<Vec<_>>();
        let cursor = chars.len();
        Self { chars, cursor, single_line: true }
    }

    pub fn is_single_line(&self) -> bool {
        self.single_line
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().split('\n').map(str::to_owned).collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Zero-based `(line, column)` of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.chars[..self.cursor];
        let line = before.iter().filter(|ch| **ch == '\n').count();
        let col = self.cursor - self.line_start();
        (line, col)
    }

    fn line_start(&self) -> usize {
        self.chars[..self.cursor].iter().rposition(|ch| *ch == '\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.chars[self.cursor..]
            .iter()
            .position(|ch| *ch == '\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.chars.len())
    }

    pub fn move_line_start(&mut self) {
        self.cursor = self.line_start();
    }

    pub fn move_line_end(&mut self) {
        self.cursor = self.line_end();
    }

    pub fn move_forward(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_backward(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves one line up, clamping the column to that line's length.
    pub fn move_up(&mut self) {
        let start = self.line_start();
        if start == 0 {
            return;
        }
        let col = self.cursor - start;
        let prev_end = start - 1;
        let prev_start =
            self.chars[..prev_end].iter().rposition(|ch| *ch == '\n').map(|i| i + 1).unwrap_or(0);
        self.cursor = prev_start + col.min(prev_end - prev_start);
    }

    /// Moves one line down, clamping the column to that line's length.
    pub fn move_down(&mut self) {
        let end = self.line_end();
        if end == self.chars.len() {
            return;
        }
        let col = self.cursor - self.line_start();
        let next_start = end + 1;
        let next_end = self.chars[next_start..]
            .iter()
            .position(|ch| *ch == '\n')
            .map(|i| next_start + i)
            .unwrap_or(self.chars.len());
        self.cursor = next_start + col.min(next_end - next_start);
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        if self.single_line {
            return;
        }
        self.chars.insert(self.cursor, '\n');
        self.cursor += 1;
    }

    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    /// Deletes trailing spaces before the cursor, then the word before them. Stops at the
    /// start of the line.
    pub fn delete_word_backward(&mut self) {
        let start = self.line_start();
        let mut from = self.cursor;
        while from > start && self.chars[from - 1] == ' ' {
            from -= 1;
        }
        while from > start && self.chars[from - 1] != ' ' {
            from -= 1;
        }
        self.chars.drain(from..self.cursor);
        self.cursor = from;
    }

    pub fn delete_to_line_start(&mut self) {
        let start = self.line_start();
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn delete_to_line_end(&mut self) {
        let end = self.line_end();
        self.chars.drain(self.cursor..end);
    }

    /// Applies an editing key. Returns `false` for keys the buffer does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(ch) if ctrl => match ch {
                'a' => self.move_line_start(),
                'e' => self.move_line_end(),
                'f' => self.move_forward(),
                'b' => self.move_backward(),
                'p' => self.move_up(),
                'n' => self.move_down(),
                'w' => self.delete_word_backward(),
                'u' => self.delete_to_line_start(),
                'k' => self.delete_to_line_end(),
                'j' => self.insert_newline(),
                _ => return false,
            },
            KeyCode::Enter if alt => self.insert_newline(),
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Left => self.move_backward(),
            KeyCode::Right => self.move_forward(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rstest::rstest;

    use super::TextBuffer;

    fn buffer(text: &str, cursor: usize) -> TextBuffer {
        let lines = text.split('\n').map(str::to_owned).collect::<Vec<_>>();
        let mut buffer = TextBuffer::multi_line(&lines);
        buffer.cursor = cursor;
        buffer
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn new_buffers_put_the_cursor_at_the_end() {
        let buffer = TextBuffer::multi_line(&["ab".to_owned(), "cde".to_owned()]);
        assert_eq!(buffer.text(), "ab\ncde");
        assert_eq!(buffer.cursor_line_col(), (1, 3));
    }

    #[test]
    fn single_line_buffers_flatten_and_refuse_newlines() {
        let mut buffer = TextBuffer::single_line("a\nb");
        assert_eq!(buffer.text(), "a b");
        buffer.insert_newline();
        buffer.insert_char('\n');
        assert!(buffer.handle_key(ctrl('j')));
        assert_eq!(buffer.text(), "a b");
    }

    #[rstest]
    #[case("hello\nworld", 8, 'a', 6)]
    #[case("hello\nworld", 8, 'e', 11)]
    #[case("hello\nworld", 5, 'f', 6)]
    #[case("hello\nworld", 6, 'b', 5)]
    #[case("hello\nworld", 0, 'b', 0)]
    #[case("hello\nworld", 11, 'f', 11)]
    fn line_and_char_motions(
        #[case] text: &str,
        #[case] cursor: usize,
        #[case] key: char,
        #[case] expected: usize,
    ) {
        let mut buffer = buffer(text, cursor);
        assert!(buffer.handle_key(ctrl(key)));
        assert_eq!(buffer.cursor(), expected);
    }

    #[test]
    fn vertical_motion_clamps_the_column_without_remembering_it() {
        let mut buffer = buffer("long line\nab\nlonger line", 7);
        buffer.move_down();
        assert_eq!(buffer.cursor_line_col(), (1, 2));
        buffer.move_down();
        assert_eq!(buffer.cursor_line_col(), (2, 2));
        buffer.move_up();
        buffer.move_up();
        assert_eq!(buffer.cursor_line_col(), (0, 2));
    }

    #[test]
    fn vertical_motion_stops_at_the_edges() {
        let mut buffer = buffer("one\ntwo", 1);
        buffer.move_up();
        assert_eq!(buffer.cursor(), 1);
        buffer.move_down();
        buffer.move_down();
        assert_eq!(buffer.cursor_line_col(), (1, 1));
    }

    #[rstest]
    #[case("foo bar  ", 9, "foo ", 4)]
    #[case("foo bar", 7, "foo ", 4)]
    #[case("foo\nbar", 4, "foo\nbar", 4)]
    #[case("foo\n  bar", 9, "foo\n  ", 6)]
    #[case("foo bar", 5, "foo ar", 4)]
    fn delete_word_backward_skips_spaces_then_the_word(
        #[case] text: &str,
        #[case] cursor: usize,
        #[case] expected: &str,
        #[case] expected_cursor: usize,
    ) {
        let mut buffer = buffer(text, cursor);
        buffer.delete_word_backward();
        assert_eq!(buffer.text(), expected);
        assert_eq!(buffer.cursor(), expected_cursor);
    }

    #[test]
    fn line_kills_stay_on_the_current_line() {
        let mut buffer = buffer("ab\ncdef\ngh", 5);
        buffer.delete_to_line_end();
        assert_eq!(buffer.text(), "ab\ncd\ngh");
        buffer.delete_to_line_end();
        assert_eq!(buffer.text(), "ab\ncd\ngh");
        buffer.delete_to_line_start();
        assert_eq!(buffer.text(), "ab\n\ngh");
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn typing_and_deleting() {
        let mut buffer = TextBuffer::multi_line(&[]);
        for ch in "hi".chars() {
            buffer.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        buffer.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        buffer.insert_char('x');
        assert_eq!(buffer.lines(), vec!["hi".to_owned(), "x".to_owned()]);
        buffer.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        buffer.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        buffer.move_line_start();
        buffer.handle_key(KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE));
        assert_eq!(buffer.text(), "i");
        assert!(!buffer.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
