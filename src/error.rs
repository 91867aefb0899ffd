//! Top-level error type.
//!
//! Aggregates every component's own error enum behind one type so an
//! embedder driving [`crate::engine::Engine`] has a single `Result` to
//! match on, the way `wrldbldr-*`/`prospector-*` roll per-module
//! `thiserror` enums up into one crate-level error via `#[from]`, rather
//! than a handful of unrelated top-level error types (`NewGameError`,
//! `StartGameError`) that never need to compose because they belong to a
//! single function that runs start to finish.

use crate::plan::PlanError;
use crate::types::StepId;
use crate::validator::RejectReason;

/// Every way a call into the engine can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// An inbound message was rejected by the validator.
    #[error(transparent)]
    Rejected(#[from] RejectReason),
    /// The night plan could not be built from the current seating.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// An operation that requires the night to be over was attempted
    /// before it ended.
    #[error("the night has not ended yet")]
    NightNotEnded,
    /// An operation that requires an open step was attempted while the
    /// flow controller is gated (e.g. on a pending reveal acknowledgement
    /// or a blocking audio cue).
    #[error("flow is gated on {reason}")]
    FlowGated {
        /// Human-readable description of the gate.
        reason: &'static str,
    },
    /// A step was expected to exist in the plan but did not.
    #[error("step {step:?} is not part of this night's plan")]
    StepNotInPlan {
        /// The missing step.
        step: StepId,
    },
}
