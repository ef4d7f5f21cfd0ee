// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Snapshot-based undo/redo.
//!
//! Snapshots are stored serialized, so the live diagram never aliases a stored state and every
//! undo/redo hands back a fresh copy.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::model::Diagram;

/// Capacity used for ordinary editing sessions.
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug)]
pub enum HistoryError {
    Encode(serde_json::Error),
    Decode { position: usize, source: serde_json::Error },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(source) => write!(f, "failed to snapshot diagram: {source}"),
            Self::Decode { position, source } => {
                write!(f, "failed to restore snapshot {position}: {source}")
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(source) => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// 1-based position of the current snapshot and the number of stored snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub position: usize,
    pub total: usize,
}

impl fmt::Display for HistoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<String>,
    current: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Creates an empty history holding at most `capacity` snapshots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { snapshots: VecDeque::with_capacity(capacity.min(64)), current: None, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Records `diagram` as the newest state.
    ///
    /// Anything after the current position (the redo branch) is discarded first; the oldest
    /// snapshot is evicted once capacity is exceeded.
    pub fn save(&mut self, diagram: &Diagram) -> Result<(), HistoryError> {
        let snapshot = serde_json::to_string(diagram).map_err(HistoryError::Encode)?;

        if let Some(current) = self.current {
            self.snapshots.truncate(current + 1);
        }
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.current = Some(self.snapshots.len() - 1);

        debug!(position = self.snapshots.len(), capacity = self.capacity, "history saved");
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|current| current > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|current| current + 1 < self.snapshots.len())
    }

    /// Steps back one snapshot and returns a copy of it, or `None` at the oldest snapshot.
    ///
    /// On a decode error the position is left unchanged.
    pub fn undo(&mut self) -> Result<Option<Diagram>, HistoryError> {
        let Some(current) = self.current.filter(|current| *current > 0) else {
            return Ok(None);
        };
        let diagram = self.decode(current - 1)?;
        self.current = Some(current - 1);
        debug!(position = current, "history undo");
        Ok(Some(diagram))
    }

    /// Steps forward one snapshot and returns a copy of it, or `None` at the newest snapshot.
    pub fn redo(&mut self) -> Result<Option<Diagram>, HistoryError> {
        let Some(current) = self.current.filter(|current| current + 1 < self.snapshots.len())
        else {
            return Ok(None);
        };
        let diagram = self.decode(current + 1)?;
        self.current = Some(current + 1);
        debug!(position = current + 2, "history redo");
        Ok(Some(diagram))
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            position: self.current.map_or(0, |current| current + 1),
            total: self.snapshots.len(),
        }
    }

    fn decode(&self, index: usize) -> Result<Diagram, HistoryError> {
        let snapshot = self.snapshots.get(index).map(String::as_str).unwrap_or_default();
        serde_json::from_str(snapshot)
            .map_err(|source| HistoryError::Decode { position: index + 1, source })
    }
}
