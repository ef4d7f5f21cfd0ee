// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Corner and edge glyphs for one box style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGlyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl BoxGlyphs {
    pub const SINGLE: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
    };
    pub const ROUNDED: Self =
        Self { top_left: '╭', top_right: '╮', bottom_left: '╰', bottom_right: '╯', ..Self::SINGLE };
    pub const DOUBLE: Self = Self {
        horizontal: '═',
        vertical: '║',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
    };
    pub const THICK: Self = Self {
        horizontal: '━',
        vertical: '┃',
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
    };

    /// Glyphs for a `style` hint value; unknown styles fall back to single lines.
    pub fn for_style(style: Option<&str>) -> Self {
        match style {
            Some("rounded") => Self::ROUNDED,
            Some("double") => Self::DOUBLE,
            Some("thick") => Self::THICK,
            _ => Self::SINGLE,
        }
    }
}

/// A fixed-size character grid. Writes outside the grid are clipped; the last writer wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![' '; width.saturating_mul(height)] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.index_of(x, y).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = ch;
        }
    }

    /// Writes `text` left-to-right from `(x, y)`, returning the cells actually written.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> usize {
        let mut written = 0;
        for (offset, ch) in text.chars().enumerate() {
            if x + offset >= self.width || y >= self.height {
                break;
            }
            self.set(x + offset, y, ch);
            written += 1;
        }
        written
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize, ch: char) {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in min_x..=max_x {
            self.set(x, y, ch);
        }
    }

    pub fn draw_box(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, glyphs: BoxGlyphs) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        self.draw_hline(x0 + 1, x1 - 1, y0, glyphs.horizontal);
        self.draw_hline(x0 + 1, x1 - 1, y1, glyphs.horizontal);
        for y in (y0 + 1)..y1 {
            self.set(x0, y, glyphs.vertical);
            self.set(x1, y, glyphs.vertical);
        }
        self.set(x0, y0, glyphs.top_left);
        self.set(x1, y0, glyphs.top_right);
        self.set(x0, y1, glyphs.bottom_left);
        self.set(x1, y1, glyphs.bottom_right);
    }

    /// Rows with trailing blanks removed; trailing empty rows are dropped.
    pub fn to_trimmed_string(&self) -> String {
        let mut lines = (0..self.height)
            .map(|y| {
                let row = &self.cells[y * self.width..(y + 1) * self.width];
                row.iter().collect::<String>().trim_end_matches(' ').to_owned()
            })
            .collect::<Vec<_>>();
        while matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_trimmed_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxGlyphs, Canvas};

    #[test]
    fn writes_outside_the_grid_are_clipped() {
        let mut canvas = Canvas::new(4, 1);
        assert_eq!(canvas.write_str(2, 0, "abcdef"), 2);
        canvas.set(9, 9, 'x');
        assert_eq!(canvas.to_string(), "  ab");
        assert_eq!(canvas.get(9, 9), None);
    }

    #[test]
    fn draw_box_uses_style_glyphs() {
        let mut canvas = Canvas::new(4, 3);
        canvas.draw_box(0, 0, 3, 2, BoxGlyphs::for_style(Some("rounded")));
        assert_eq!(canvas.to_string(), "╭──╮\n│  │\n╰──╯");
    }

    #[test]
    fn trailing_blank_rows_are_dropped() {
        let mut canvas = Canvas::new(3, 3);
        canvas.set(0, 0, 'x');
        assert_eq!(canvas.to_trimmed_string(), "x");
    }
}
