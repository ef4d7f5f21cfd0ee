// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tessel: a modal, keystroke-driven terminal editor for box and sequence diagrams.
//!
//! The interactive core lives in [`editor`]: a mode/jump state machine over a [`model::Diagram`]
//! backed by snapshot [`history`], a sticky-header [`viewport`] and a [`jump`] label allocator.
//! [`tui`] wires it to a terminal.

pub mod activation;
pub mod editor;
pub mod history;
pub mod jump;
pub mod model;
pub mod render;
pub mod store;
pub mod tui;
pub mod viewport;
