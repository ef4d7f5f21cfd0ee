// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Call/return and activation-bar inference for sequence diagrams.
//!
//! The inference is a best-effort heuristic over the linear message history. It only looks at
//! the most recent open request into the sender and the calls made since then; deeper nesting
//! and overlapping calls are not modelled.

use tracing::trace;

use crate::model::hints::{self, HINT_ACTIVATE, HINT_ACTIVATE_SOURCE, HINT_DEACTIVATE};
use crate::model::{Connection, Diagram, NodeId};

/// Hints derived for a message about to be added after `history`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inference {
    /// The message answers an open call in the opposite direction and should render dashed.
    pub reply: bool,
    /// The message closes an orchestration and ends the sender's activation.
    pub deactivate: bool,
    /// Index into `history` of an earlier call that, in hindsight, started an activation.
    pub activate_source: Option<usize>,
}

/// Infers hints for a new `from -> to` message appended to `history`.
///
/// `first_participant` is always treated as a requester, never as someone answering.
pub fn infer(
    history: &[Connection],
    first_participant: Option<NodeId>,
    from: NodeId,
    to: NodeId,
) -> Inference {
    let mut inference = Inference { reply: is_reply(history, from, to), ..Inference::default() };

    let Some(request) = open_request(history, first_participant, from) else {
        trace!(from, to, reply = inference.reply, "no open request into sender");
        return inference;
    };
    let caller = history[request].from();

    let downstream = history
        .iter()
        .enumerate()
        .skip(request + 1)
        .filter(|(_, c)| c.from() == from && c.to() != caller && c.to() != from && !c.is_dashed())
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    if to == caller {
        inference.deactivate = downstream.len() >= 2;
    } else if to != from && !inference.reply && downstream.len() == 1 {
        inference.activate_source = Some(downstream[0]);
    }

    trace!(
        from,
        to,
        request,
        downstream = downstream.len(),
        reply = inference.reply,
        deactivate = inference.deactivate,
        activate_source = ?inference.activate_source,
        "inferred message hints"
    );
    inference
}

/// A message is a reply if any earlier undashed message went the other way between the pair.
fn is_reply(history: &[Connection], from: NodeId, to: NodeId) -> bool {
    from != to
        && history.iter().any(|connection| {
            connection.from() == to && connection.to() == from && !connection.is_dashed()
        })
}

/// Finds the newest unanswered call into `participant` that looks like a request.
fn open_request(
    history: &[Connection],
    first_participant: Option<NodeId>,
    participant: NodeId,
) -> Option<usize> {
    for (index, connection) in history.iter().enumerate().rev() {
        if connection.to() != participant || connection.from() == participant {
            continue;
        }
        if connection.is_dashed() {
            continue;
        }
        let caller = connection.from();

        let answered = history[index + 1..]
            .iter()
            .any(|later| later.from() == participant && later.to() == caller);
        if answered {
            continue;
        }

        if Some(caller) != first_participant
            && answers_outstanding_call(&history[..index], participant, caller)
        {
            continue;
        }
        return Some(index);
    }
    None
}

/// Returns `true` if `participant` has called `caller` more often than `caller` has answered,
/// meaning an incoming message from `caller` is a response rather than a new request.
fn answers_outstanding_call(history: &[Connection], participant: NodeId, caller: NodeId) -> bool {
    let calls = history
        .iter()
        .filter(|c| c.from() == participant && c.to() == caller && !c.is_dashed())
        .count();
    let responses = history
        .iter()
        .filter(|c| c.from() == caller && c.to() == participant && c.is_dashed())
        .count();
    calls > responses
}

/// Participants that currently carry an activation, each with the index of the first message
/// that activates it, in message order.
pub fn activated_participants(diagram: &Diagram) -> Vec<(NodeId, usize)> {
    let mut out = Vec::<(NodeId, usize)>::new();
    for (index, connection) in diagram.connections().iter().enumerate() {
        let participant = if connection.has_flag(HINT_ACTIVATE_SOURCE) {
            connection.from()
        } else if connection.has_flag(HINT_ACTIVATE) {
            connection.to()
        } else {
            continue;
        };
        if !out.iter().any(|(existing, _)| *existing == participant) {
            out.push((participant, index));
        }
    }
    out
}

/// Marks an activation span on the sender of `start`, closed by message `end`.
///
/// Both messages must exist, `end` must come after `start`, and both must be sent by the same
/// participant. Returns `true` if any hint changed.
pub fn mark_span(diagram: &mut Diagram, start: usize, end: usize) -> bool {
    let (Some(first), Some(last)) = (diagram.connection(start), diagram.connection(end)) else {
        return false;
    };
    if end <= start || first.from() != last.from() {
        return false;
    }

    let mut changed = false;
    if let Some(connection) = diagram.connection_mut(start) {
        changed |= hints::set_flag(connection.hints_mut(), HINT_ACTIVATE_SOURCE, true);
    }
    if let Some(connection) = diagram.connection_mut(end) {
        changed |= hints::set_flag(connection.hints_mut(), HINT_DEACTIVATE, true);
    }
    changed
}

/// Removes every activation marker that belongs to `participant`.
pub fn clear_participant(diagram: &mut Diagram, participant: NodeId) -> bool {
    let mut changed = false;
    for index in 0..diagram.connections().len() {
        let Some(connection) = diagram.connection_mut(index) else {
            continue;
        };
        if connection.from() == participant {
            changed |= hints::set_flag(connection.hints_mut(), HINT_ACTIVATE_SOURCE, false);
            changed |= hints::set_flag(connection.hints_mut(), HINT_DEACTIVATE, false);
        }
        if connection.to() == participant {
            changed |= hints::set_flag(connection.hints_mut(), HINT_ACTIVATE, false);
        }
    }
    changed
}
