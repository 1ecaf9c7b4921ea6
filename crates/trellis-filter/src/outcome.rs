//! Plan and commit outcome types.

use trellis_core::Diagnostic;

use crate::action::Action;

/// Result of the planning phase: a validity flag, the ordered action
/// list commit will apply, and any diagnostics.
///
/// An invalid plan always carries an empty action list and at least
/// one diagnostic. Planning never mutates the store, so replanning
/// against an unchanged store reproduces the identical outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanOutcome {
    /// Whether commit may proceed from this plan.
    pub valid: bool,
    /// Pending structural mutations, in application order.
    pub actions: Vec<Action>,
    /// Problems found during validation and planning.
    pub diagnostics: Vec<Diagnostic>,
}

impl PlanOutcome {
    /// A valid plan with the given action list.
    pub fn valid(actions: Vec<Action>) -> Self {
        Self {
            valid: true,
            actions,
            diagnostics: Vec::new(),
        }
    }

    /// An invalid plan carrying its diagnostics.
    pub fn invalid(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            valid: false,
            actions: Vec::new(),
            diagnostics,
        }
    }

    /// An invalid plan carrying one diagnostic.
    pub fn reject(diagnostic: Diagnostic) -> Self {
        Self::invalid(vec![diagnostic])
    }
}

/// Terminal status of one commit invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStatus {
    /// The computation ran to completion.
    Succeeded,
    /// Validation or computation failed; see the diagnostics.
    Failed,
    /// The cancellation token was observed; the run stopped early and
    /// is not a partial success.
    Cancelled,
}

/// Result of the commit phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    /// How the invocation ended.
    pub status: CommitStatus,
    /// Problems reported along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl CommitOutcome {
    /// A clean success.
    pub fn succeeded() -> Self {
        Self {
            status: CommitStatus::Succeeded,
            diagnostics: Vec::new(),
        }
    }

    /// A failure carrying its diagnostics.
    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            status: CommitStatus::Failed,
            diagnostics,
        }
    }

    /// A cooperative cancellation.
    pub fn cancelled() -> Self {
        Self {
            status: CommitStatus::Cancelled,
            diagnostics: Vec::new(),
        }
    }
}
