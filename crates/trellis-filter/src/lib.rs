//! Parameter schemas, action planning, and the two-phase `Filter`
//! protocol for Trellis.
//!
//! Every transformation follows the same state machine per
//! invocation:
//!
//! ```text
//! Unvalidated ──plan──▶ Planned{valid | invalid}
//!                          │
//!                        commit (re-plans internally)
//!                          ▼
//!               Committed{success | failure | cancelled}
//! ```
//!
//! Planning validates arguments against the declared
//! [`ParameterSchema`] and the current store, then derives an
//! explicit, inspectable [`Action`] list without touching the store.
//! Commit re-plans, applies the fresh action list, and runs the
//! per-element computation under a cooperative [`CancelToken`]
//! (re-exported from `trellis-core`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod filter;
pub mod outcome;
pub mod param;

pub use action::{apply_actions, Action, CODE_ACTION_FAILED};
pub use filter::{Filter, CANCEL_CHECK_INTERVAL};
pub use outcome::{CommitOutcome, CommitStatus, PlanOutcome};
pub use param::{Arguments, ParamKind, ParamSpec, ParamValue, ParameterSchema};

pub use trellis_core::{CancelToken, Diagnostic};
pub use uuid::Uuid;
