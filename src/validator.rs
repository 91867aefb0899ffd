//! Action Validator.
//!
//! Checks one inbound [`PlayerMessage`] against the current [`GameState`]
//! and the frozen night plan, producing either an [`AcceptedAction`] ready
//! for the reducer or a [`RejectReason`]. Shaped after
//! `Signups::start`/`StartGameError`: validate against the whole world
//! first, construct the result only once every check has passed, and give
//! every rejection its own named variant carrying the offending data.

use crate::catalog;
use crate::plan::NightStep;
use crate::protocol::{ActionExtra, PlayerMessage};
use crate::state::GameState;
use crate::types::{Constraint, SchemaKind, Seat, StepId};

/// A message that has passed every check and is ready to be folded into
/// state by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptedAction {
    /// A validated answer to the open step.
    Action {
        /// The acting seat.
        actor_seat: Seat,
        /// The answered step.
        step_id: StepId,
        /// The chosen single target, if any.
        target_seat: Option<Seat>,
        /// The schema-specific extra payload, if any.
        extra: Option<ActionExtra>,
    },
    /// A validated individual wolf ballot.
    WolfVote {
        /// The voting seat.
        actor_seat: Seat,
        /// The chosen target, or `None` for "no kill".
        target_seat: Option<Seat>,
    },
    /// A validated reveal acknowledgement.
    RevealAck {
        /// The acknowledging seat.
        actor_seat: Seat,
        /// The acknowledged step.
        step_id: StepId,
    },
    /// A validated wolf-robot hunter-status viewer acknowledgement.
    WolfRobotHunterStatusViewed {
        /// The wolf-robot's seat.
        actor_seat: Seat,
    },
    /// A validated host request to advance past a `groupConfirm`/deadline step.
    HostAdvance,
}

/// Why an inbound message was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// No night step is currently open.
    #[error("no step is currently open")]
    NoOpenStep,
    /// The message named a step other than the currently open one.
    #[error("step {given:?} does not match the open step {expected:?}")]
    StepMismatch {
        /// The step the message named.
        given: StepId,
        /// The step actually open.
        expected: StepId,
    },
    /// The acting seat is not seated at all.
    #[error("seat {seat} is not seated")]
    UnknownSeat {
        /// The offending seat.
        seat: Seat,
    },
    /// The acting seat does not hold the role bound to the open step.
    #[error("seat {seat} does not hold the role for this step")]
    WrongActor {
        /// The offending seat.
        seat: Seat,
    },
    /// An action has already been accepted for this step this night.
    #[error("step {step:?} already has an accepted action this night")]
    DuplicateWithinStep {
        /// The already-answered step.
        step: StepId,
    },
    /// The chosen target seat does not exist.
    #[error("target seat {seat} is not seated")]
    UnknownTarget {
        /// The offending seat.
        seat: Seat,
    },
    /// The chosen target violates [`Constraint::NotSelf`].
    #[error("seat {seat} may not target itself on this step")]
    TargetIsSelf {
        /// The offending seat.
        seat: Seat,
    },
    /// The chosen target violates [`Constraint::AliveTarget`].
    #[error("target seat {seat} is not alive")]
    TargetNotAlive {
        /// The offending seat.
        seat: Seat,
    },
    /// The chosen target violates [`Constraint::NotImmuneToCheck`].
    #[error("target seat {seat} is immune to the wolf kill")]
    TargetImmune {
        /// The offending seat.
        seat: Seat,
    },
    /// The acting seat does not participate in the wolf vote
    /// ([`Constraint::WolfTeamOnly`]).
    #[error("seat {seat} does not participate in the wolf vote")]
    NotAWolfVoter {
        /// The offending seat.
        seat: Seat,
    },
    /// The message's payload shape did not match the step's schema.
    #[error("step {step:?} expects a {expected:?} payload")]
    SchemaMismatch {
        /// The offending step.
        step: StepId,
        /// The schema the step expects.
        expected: crate::types::SchemaKind,
    },
    /// A `REVEAL_ACK` named a step that has no reveal currently pending.
    #[error("step {step:?} has no reveal pending acknowledgement")]
    NoPendingReveal {
        /// The offending step.
        step: StepId,
    },
    /// A host-only message did not come from the room's host.
    #[error("uid {uid} is not the host of this room")]
    NotHost {
        /// The offending uid.
        uid: String,
    },
    /// The acting seat was blocked by the nightmare this night and the
    /// message is not a skip.
    #[error("seat {seat} is blocked by the nightmare this night")]
    NightmareBlocked {
        /// The blocked seat.
        seat: Seat,
    },
}

/// Validates one inbound message against the current state and the step
/// it is currently positioned at within the frozen plan.
pub fn validate(
    state: &GameState,
    current_step: Option<&NightStep>,
    msg: &PlayerMessage,
) -> Result<AcceptedAction, RejectReason> {
    match msg {
        PlayerMessage::Action { actor_seat, step_id, target_seat, extra } => {
            validate_action(state, current_step, *actor_seat, *step_id, *target_seat, extra.clone())
        }
        PlayerMessage::WolfVote { actor_seat, target_seat } => {
            validate_wolf_vote(state, *actor_seat, *target_seat)
        }
        PlayerMessage::RevealAck { actor_seat, step_id } => {
            validate_reveal_ack(state, *actor_seat, *step_id)
        }
        PlayerMessage::WolfRobotHunterStatusViewed { actor_seat } => {
            require_seated(state, *actor_seat)?;
            Ok(AcceptedAction::WolfRobotHunterStatusViewed { actor_seat: *actor_seat })
        }
        PlayerMessage::HostAdvance { host_uid } => {
            if host_uid != &state.host_uid {
                return Err(RejectReason::NotHost { uid: host_uid.clone() });
            }
            Ok(AcceptedAction::HostAdvance)
        }
    }
}

fn require_seated(state: &GameState, seat: Seat) -> Result<(), RejectReason> {
    if state.players.contains_key(&seat) {
        Ok(())
    } else {
        Err(RejectReason::UnknownSeat { seat })
    }
}

fn validate_action(
    state: &GameState,
    current_step: Option<&NightStep>,
    actor_seat: Seat,
    step_id: StepId,
    target_seat: Option<Seat>,
    extra: Option<ActionExtra>,
) -> Result<AcceptedAction, RejectReason> {
    let step = current_step.ok_or(RejectReason::NoOpenStep)?;
    if step.step_id != step_id {
        return Err(RejectReason::StepMismatch { given: step_id, expected: step.step_id });
    }
    require_seated(state, actor_seat)?;
    if state.role_of(actor_seat) != Some(step.role_id) {
        return Err(RejectReason::WrongActor { seat: actor_seat });
    }
    if state.action_for(step_id).is_some() {
        return Err(RejectReason::DuplicateWithinStep { step: step_id });
    }
    check_schema_shape(step, target_seat, &extra)?;
    if let Some(target) = target_seat {
        check_constraints(state, step, actor_seat, target)?;
    }
    for pair_target in extra_targets(&extra) {
        check_constraints(state, step, actor_seat, pair_target)?;
    }
    if state.current_night_results.blocked_seat == Some(actor_seat) && !is_skip(target_seat, &extra) {
        return Err(RejectReason::NightmareBlocked { seat: actor_seat });
    }
    Ok(AcceptedAction::Action { actor_seat, step_id, target_seat, extra })
}

/// A "skip" is a no-op answer to the open step: no single target and no
/// non-empty extra payload. Skips are always accepted, even from a seat the
/// nightmare has blocked: they carry no effect to suppress.
fn is_skip(target_seat: Option<Seat>, extra: &Option<ActionExtra>) -> bool {
    if target_seat.is_some() {
        return false;
    }
    match extra {
        None => true,
        Some(ActionExtra::SwapPair { seats }) => seats.is_empty(),
        Some(ActionExtra::SeatSet { seats }) => seats.is_empty(),
        Some(ActionExtra::WitchChoice { save, poison_seat }) => !save && poison_seat.is_none(),
    }
}

fn extra_targets(extra: &Option<ActionExtra>) -> Vec<Seat> {
    match extra {
        Some(ActionExtra::WitchChoice { poison_seat, .. }) => poison_seat.into_iter().copied().collect(),
        Some(ActionExtra::SwapPair { seats }) => seats.clone(),
        Some(ActionExtra::SeatSet { seats }) => seats.clone(),
        None => Vec::new(),
    }
}

/// Rejects an `ACTION` whose `(target_seat, extra)` shape doesn't match the
/// open step's schema — a `SwapPair` answering a `ChooseSeat` step, say, or
/// a `MagicianSwap` naming the same seat twice. `WolfVote`-schema steps are
/// never answered through `ACTION` at all; those arrive as a dedicated
/// `PlayerMessage::WolfVote`.
fn check_schema_shape(step: &NightStep, target_seat: Option<Seat>, extra: &Option<ActionExtra>) -> Result<(), RejectReason> {
    let shape_ok = match step.schema {
        SchemaKind::ChooseSeat => extra.is_none(),
        SchemaKind::WolfVote => false,
        SchemaKind::Compound => target_seat.is_none() && matches!(extra, None | Some(ActionExtra::WitchChoice { .. })),
        SchemaKind::Swap => {
            target_seat.is_none()
                && match extra {
                    None => true,
                    Some(ActionExtra::SwapPair { seats }) => seats.is_empty() || (seats.len() == 2 && seats[0] != seats[1]),
                    _ => false,
                }
        }
        SchemaKind::Confirm | SchemaKind::GroupConfirm => target_seat.is_none() && extra.is_none(),
        SchemaKind::MultiChooseSeat => target_seat.is_none() && matches!(extra, None | Some(ActionExtra::SeatSet { .. })),
    };
    if shape_ok {
        Ok(())
    } else {
        Err(RejectReason::SchemaMismatch { step: step.step_id, expected: step.schema })
    }
}

fn check_constraints(state: &GameState, step: &NightStep, actor_seat: Seat, target: Seat) -> Result<(), RejectReason> {
    if !state.players.contains_key(&target) {
        return Err(RejectReason::UnknownTarget { seat: target });
    }
    for constraint in step.constraints {
        match constraint {
            Constraint::NotSelf if target == actor_seat => return Err(RejectReason::TargetIsSelf { seat: target }),
            Constraint::AliveTarget if !state.is_alive(target) => {
                return Err(RejectReason::TargetNotAlive { seat: target })
            }
            Constraint::NotImmuneToCheck => {
                if let Some(role) = state.role_of(target) {
                    if catalog::is_immune_to_wolf_kill(role) {
                        return Err(RejectReason::TargetImmune { seat: target });
                    }
                }
            }
            Constraint::WolfTeamOnly if !catalog::does_role_participate_in_wolf_vote(
                state.role_of(actor_seat).unwrap_or(crate::types::RoleId::Villager),
            ) => {
                return Err(RejectReason::NotAWolfVoter { seat: actor_seat });
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_wolf_vote(state: &GameState, actor_seat: Seat, target_seat: Option<Seat>) -> Result<AcceptedAction, RejectReason> {
    if state.current_step_id != Some(StepId::WolfKill) {
        return Err(RejectReason::NoOpenStep);
    }
    require_seated(state, actor_seat)?;
    let role = state.role_of(actor_seat).unwrap_or(crate::types::RoleId::Villager);
    if !catalog::does_role_participate_in_wolf_vote(role) {
        return Err(RejectReason::NotAWolfVoter { seat: actor_seat });
    }
    if let Some(target) = target_seat {
        if !state.players.contains_key(&target) {
            return Err(RejectReason::UnknownTarget { seat: target });
        }
        if !state.is_alive(target) {
            return Err(RejectReason::TargetNotAlive { seat: target });
        }
        if let Some(target_role) = state.role_of(target) {
            if catalog::is_immune_to_wolf_kill(target_role) {
                return Err(RejectReason::TargetImmune { seat: target });
            }
        }
    }
    Ok(AcceptedAction::WolfVote { actor_seat, target_seat })
}

fn validate_reveal_ack(state: &GameState, actor_seat: Seat, step_id: StepId) -> Result<AcceptedAction, RejectReason> {
    require_seated(state, actor_seat)?;
    if !state.pending_reveal_acks.contains(&step_id) {
        return Err(RejectReason::NoPendingReveal { step: step_id });
    }
    Ok(AcceptedAction::RevealAck { actor_seat, step_id })
}
