// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Widest line of `lines`, in characters.
pub(crate) fn max_line_len(lines: &[String]) -> usize {
    lines.iter().map(|line| text_len(line)).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{max_line_len, text_len};

    #[test]
    fn text_len_counts_chars_not_bytes() {
        assert_eq!(text_len("αβγ"), 3);
    }

    #[test]
    fn max_line_len_handles_empty_input() {
        assert_eq!(max_line_len(&[]), 0);
        assert_eq!(max_line_len(&["ab".to_owned(), "αβγ".to_owned()]), 3);
    }
}
