// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Open-ended string hints attached to nodes and connections.
//!
//! Style hints (`style`, `bold`, `color`) are consumed by renderers. Semantic markers
//! (`activate_source`, `activate`, `deactivate`, `style=dashed`) are produced by the activation
//! inference and the activation toggle.

use std::collections::BTreeMap;

pub type Hints = BTreeMap<String, String>;

pub const HINT_STYLE: &str = "style";
pub const HINT_BOLD: &str = "bold";
pub const HINT_COLOR: &str = "color";
pub const HINT_ACTIVATE_SOURCE: &str = "activate_source";
pub const HINT_ACTIVATE: &str = "activate";
pub const HINT_DEACTIVATE: &str = "deactivate";

pub const STYLE_DASHED: &str = "dashed";

const FLAG_TRUE: &str = "true";

/// Returns `true` if `key` is set to `"true"`.
pub fn flag(hints: &Hints, key: &str) -> bool {
    hints.get(key).map(String::as_str) == Some(FLAG_TRUE)
}

/// Sets or clears a boolean hint. Cleared flags are removed rather than stored as `"false"`.
///
/// Returns `true` if the mapping changed.
pub fn set_flag(hints: &mut Hints, key: &str, value: bool) -> bool {
    if value {
        if flag(hints, key) {
            return false;
        }
        hints.insert(key.to_owned(), FLAG_TRUE.to_owned());
        true
    } else {
        hints.remove(key).is_some()
    }
}

/// Sets a string hint, or removes it when `value` is `None`. Returns `true` if the mapping changed.
pub fn set_value(hints: &mut Hints, key: &str, value: Option<&str>) -> bool {
    match value {
        Some(value) => {
            if hints.get(key).map(String::as_str) == Some(value) {
                return false;
            }
            hints.insert(key.to_owned(), value.to_owned());
            true
        }
        None => hints.remove(key).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::{flag, set_flag, set_value, Hints, HINT_BOLD, HINT_STYLE};

    #[test]
    fn set_flag_reports_changes_and_removes_false() {
        let mut hints = Hints::new();
        assert!(set_flag(&mut hints, HINT_BOLD, true));
        assert!(!set_flag(&mut hints, HINT_BOLD, true));
        assert!(flag(&hints, HINT_BOLD));

        assert!(set_flag(&mut hints, HINT_BOLD, false));
        assert!(hints.is_empty());
        assert!(!set_flag(&mut hints, HINT_BOLD, false));
    }

    #[test]
    fn flag_requires_literal_true() {
        let mut hints = Hints::new();
        hints.insert(HINT_BOLD.to_owned(), "yes".to_owned());
        assert!(!flag(&hints, HINT_BOLD));
    }

    #[test]
    fn set_value_replaces_and_clears() {
        let mut hints = Hints::new();
        assert!(set_value(&mut hints, HINT_STYLE, Some("double")));
        assert!(!set_value(&mut hints, HINT_STYLE, Some("double")));
        assert!(set_value(&mut hints, HINT_STYLE, Some("rounded")));
        assert_eq!(hints.get(HINT_STYLE).map(String::as_str), Some("rounded"));
        assert!(set_value(&mut hints, HINT_STYLE, None));
        assert!(hints.is_empty());
    }
}
