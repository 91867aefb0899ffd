//! Progression Evaluator.
//!
//! No direct precedent in `run_with_roles`, whose whole-game loop decides
//! what to do next by matching on `State<P>` itself. This engine's flow
//! has more ways to be blocked (pending reveal acknowledgements, a playing
//! audio cue, a still-open wolf vote) than fit comfortably in a `match` at
//! the call site, so they are pulled out into one pure predicate returning
//! a closed [`Decision`] enum, shaped like `game/types.rs`'s own small
//! outcome enums rather than a boolean or an `Option`.

use crate::plan::NightStep;
use crate::state::{GameState, Status};
use crate::types::{SchemaKind, StepId, Timestamp};

/// What the flow controller should do next, given the current state and plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to do yet, for the given reason.
    Wait(WaitReason),
    /// Open the named step next.
    Advance(StepId),
    /// Every step in the plan is complete; the night is over.
    EndNight,
}

/// Why `evaluate` parked on [`Decision::Wait`], mirroring the closed
/// `none(reason)` set a caller can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitReason {
    /// The caller making this advance request is not the room's host.
    NotHost,
    /// The game has not been started (or has already ended).
    NotOngoing,
    /// A blocking audio cue is currently playing.
    AudioPlaying,
    /// At least one reveal acknowledgement is still outstanding.
    PendingRevealAcks,
    /// The open step's schema has not yet been satisfied.
    StepNotComplete,
    /// Learning the hunter is gated on the moderator clearing the viewer ack.
    WolfrobotHunterStatusNotViewed,
    /// This exact revision has already been processed by the given tracker.
    AlreadyProcessed,
}

/// Evaluates what should happen next given `state` and the frozen `plan`.
///
/// `is_host` reflects whether the caller driving this tick is the room's
/// host; advancement (as opposed to answering an open step) is
/// host-authoritative. `tracker`, if given, de-duplicates repeated calls for
/// a revision already processed so a retried request can't double-advance.
///
/// Blocked unconditionally while any reveal acknowledgement is outstanding
/// or a blocking audio cue is playing, regardless of which step is open.
pub fn evaluate(
    state: &GameState,
    plan: &[NightStep],
    now: Timestamp,
    is_host: bool,
    tracker: Option<&mut ProcessedTracker>,
) -> Decision {
    if !is_host {
        return Decision::Wait(WaitReason::NotHost);
    }
    if state.status != Status::Ongoing {
        return Decision::Wait(WaitReason::NotOngoing);
    }
    if state.is_audio_playing {
        return Decision::Wait(WaitReason::AudioPlaying);
    }
    if !state.pending_reveal_acks.is_empty() {
        return Decision::Wait(WaitReason::PendingRevealAcks);
    }
    let decision = evaluate_step_position(state, plan, now);
    if let Some(tracker) = tracker {
        if !matches!(decision, Decision::Wait(_)) && !tracker.should_process(state.revision) {
            return Decision::Wait(WaitReason::AlreadyProcessed);
        }
    }
    decision
}

fn evaluate_step_position(state: &GameState, plan: &[NightStep], now: Timestamp) -> Decision {
    let Some(current) = state.current_step_id else {
        return plan.first().map(|s| Decision::Advance(s.step_id)).unwrap_or(Decision::EndNight);
    };
    let Some((idx, step)) = plan.iter().enumerate().find(|(_, s)| s.step_id == current) else {
        return Decision::EndNight;
    };
    if !step_is_done(state, step, now) {
        let reason = if step.step_id == StepId::WolfRobotLearn && state.action_for(step.step_id).is_some() {
            WaitReason::WolfrobotHunterStatusNotViewed
        } else {
            WaitReason::StepNotComplete
        };
        return Decision::Wait(reason);
    }
    match plan.get(idx + 1) {
        Some(next) => Decision::Advance(next.step_id),
        None => Decision::EndNight,
    }
}

fn step_is_done(state: &GameState, step: &NightStep, now: Timestamp) -> bool {
    match step.schema {
        SchemaKind::WolfVote => {
            state.current_night_results.wolf_vote_resolved
                || state.current_night_results.wolf_kill_disabled
                || state.wolf_vote_deadline.is_some_and(|deadline| now >= deadline)
        }
        SchemaKind::GroupConfirm => true,
        SchemaKind::ChooseSeat | SchemaKind::Compound | SchemaKind::Swap | SchemaKind::Confirm | SchemaKind::MultiChooseSeat => {
            let action_recorded = state.action_for(step.step_id).is_some();
            if step.step_id == StepId::WolfRobotLearn {
                // Learning the hunter blocks progression until the
                // moderator clears the viewer-ack gate, independent of the
                // recorded action itself.
                action_recorded && state.wolf_robot_hunter_status_viewed
            } else {
                action_recorded
            }
        }
    }
}

/// Guards repeated calls to `advance`/`end_night` against re-running their
/// side effects for a revision already processed, the way a message
/// consumer de-duplicates an at-least-once delivery by offset. Embedders
/// that retry a host-advance request on a timeout need this to avoid
/// double-emitting broadcasts for the same transition.
#[derive(Debug, Default)]
pub struct ProcessedTracker {
    last_processed_revision: Option<u64>,
}

impl ProcessedTracker {
    /// Creates a tracker that has not yet processed anything.
    pub fn new() -> ProcessedTracker {
        ProcessedTracker::default()
    }

    /// Returns `true` (and records `revision`) the first time `revision` is
    /// seen; returns `false` on every subsequent call with the same value.
    pub fn should_process(&mut self, revision: u64) -> bool {
        if self.last_processed_revision == Some(revision) {
            false
        } else {
            self.last_processed_revision = Some(revision);
            true
        }
    }
}
