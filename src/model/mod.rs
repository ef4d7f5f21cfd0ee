// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core diagram model.
//!
//! A diagram is a flat, ordered list of nodes plus an ordered list of connections. For sequence
//! diagrams the connection order is the chronological message order.

pub mod diagram;
pub mod hints;
pub mod node;

pub use diagram::{Diagram, DiagramKind};
pub use hints::{
    Hints, HINT_ACTIVATE, HINT_ACTIVATE_SOURCE, HINT_BOLD, HINT_COLOR, HINT_DEACTIVATE,
    HINT_STYLE, STYLE_DASHED,
};
pub use node::{Connection, Node, NodeId};
