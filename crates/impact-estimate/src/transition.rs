//! Action transitions.
//!
//! A planned change is projected into signed before/after states:
//!
//! - `delete` with a `before` state removes it (-1)
//! - `create` with an `after` state adds it (+1)
//! - a replace (`delete` + `create`) yields both
//! - `update`, when neither of the above applied, yields the old state as a
//!   removal and the new state as an addition, so the rows net to the
//!   difference between the two rates
//!
//! Each transition carries a copy of the change holding only the selected
//! side's attributes; plan-level locality defaults are kept.

use impact_core::{ChangeAction, ResourceChange};
use std::fmt;

/// Label reported on rows produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    Create,
    Delete,
    Update,
}

impl TransitionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionAction::Create => "create",
            TransitionAction::Delete => "delete",
            TransitionAction::Update => "update",
        }
    }
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signed projection of a change.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub change: ResourceChange,
    pub action: TransitionAction,
    /// +1 for additions, -1 for removals.
    pub sign: f64,
}

/// Derive the transitions of a change. Empty when nothing qualifies.
pub fn transitions(change: &ResourceChange) -> Vec<Transition> {
    let mut out = Vec::with_capacity(2);

    if change.has_action(ChangeAction::Delete) && !change.before.is_empty() {
        out.push(Transition {
            change: change.before_view(),
            action: TransitionAction::Delete,
            sign: -1.0,
        });
    }

    if change.has_action(ChangeAction::Create) && !change.after.is_empty() {
        out.push(Transition {
            change: change.after_view(),
            action: TransitionAction::Create,
            sign: 1.0,
        });
    }

    if !out.is_empty() || !change.has_action(ChangeAction::Update) {
        return out;
    }

    if !change.before.is_empty() {
        out.push(Transition {
            change: change.before_view(),
            action: TransitionAction::Update,
            sign: -1.0,
        });
    }

    if !change.after.is_empty() {
        out.push(Transition {
            change: change.after_view(),
            action: TransitionAction::Update,
            sign: 1.0,
        });
    }

    out
}
