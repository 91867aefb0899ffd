//! Reducer.
//!
//! Pure `(GameState, AcceptedAction) -> GameState` fold, shaped after
//! `Night::resolve_tar`/`Day::lynch`/`Day::no_lynch`: consume the
//! old state by value, return a wholly new one, never mutate through a
//! shared reference. The reducer only records facts and updates the
//! current step's scratch; it never decides whether the night is over or
//! who died — that is the flow controller and death calculator.

use crate::catalog;
use crate::state::{ActionRecord, GameState};
use crate::types::{RoleId, StepId};
use crate::validator::AcceptedAction;

/// Folds one accepted action into state, returning the new state.
///
/// Bumps `revision` unconditionally on any accepted action (the data
/// model's "strictly increases on every accepted reducer application"
/// invariant), records the action where the schema calls for one, and
/// updates the per-step scratch fields consumed later by the resolver and
/// death calculator.
pub fn reduce(mut state: GameState, action: AcceptedAction) -> GameState {
    state.revision += 1;
    match action {
        AcceptedAction::Action { actor_seat, step_id, target_seat, extra } => {
            apply_step_scratch(&mut state, step_id, target_seat, &extra);
            state.actions.push(ActionRecord { actor_seat, schema_id: step_id, target_seat, extra });
        }
        AcceptedAction::WolfVote { actor_seat, target_seat } => {
            state.current_night_results.wolf_votes_by_seat.insert(actor_seat, target_seat);
        }
        AcceptedAction::RevealAck { step_id, .. } => {
            state.pending_reveal_acks.retain(|&s| s != step_id);
        }
        AcceptedAction::WolfRobotHunterStatusViewed { .. } => {
            state.wolf_robot_hunter_status_viewed = true;
        }
        AcceptedAction::HostAdvance => {}
    }
    state
}

fn apply_step_scratch(
    state: &mut GameState,
    step_id: StepId,
    target_seat: Option<crate::types::Seat>,
    extra: &Option<crate::protocol::ActionExtra>,
) {
    use crate::protocol::ActionExtra;
    match step_id {
        StepId::NightmareBlock => {
            state.current_night_results.blocked_seat = target_seat;
            if let Some(target) = target_seat {
                if state.team_of(target) == Some(crate::types::Team::Wolf) {
                    state.current_night_results.wolf_kill_disabled = true;
                }
            }
        }
        StepId::GuardProtect => {
            state.current_night_results.guarded_seat = target_seat;
        }
        StepId::DreamcatcherDream => {
            state.current_night_results.dreamcatcher_dream_seat = target_seat;
        }
        StepId::WolfQueenCharm => {
            state.current_night_results.wolf_queen_charm_seat = target_seat;
        }
        StepId::CelebrityDream => {
            state.current_night_results.celebrity_dream_seat = target_seat;
        }
        StepId::WitchAction => {
            state.witch_context.killed_seat = state.current_night_results.wolf_kill_target;
            if let Some(ActionExtra::WitchChoice { save, poison_seat }) = extra {
                if *save {
                    state.current_night_results.saved_seat = state.current_night_results.wolf_kill_target;
                    state.witch_context.save_potion_available = false;
                }
                if let Some(poisoned) = poison_seat {
                    state.current_night_results.poisoned_seat = Some(*poisoned);
                    state.witch_context.poison_potion_available = false;
                }
            }
        }
        StepId::MagicianSwap => {
            if let Some(ActionExtra::SwapPair { seats }) = extra {
                if let [a, b] = seats.as_slice() {
                    state.current_night_results.swapped_seats = Some((*a, *b));
                }
            }
        }
        StepId::PiperHypnotize => {
            if let Some(ActionExtra::SeatSet { seats }) = extra {
                state.current_night_results.hypnotized_seats_this_night = seats.clone();
                for seat in seats {
                    if !state.hypnotized_seats.contains(seat) {
                        state.hypnotized_seats.push(*seat);
                    }
                }
            }
        }
        StepId::WolfRobotLearn => {
            state.wolf_robot_context.learned_seat = target_seat;
            if let Some(target) = target_seat {
                if let Some(role) = state.role_of(target) {
                    if catalog::meta(role).disguisable {
                        state.wolf_robot_context.disguised_role = Some(role);
                    }
                    // Learning the hunter reopens the viewer-ack gate; any
                    // other role leaves nothing to acknowledge.
                    state.wolf_robot_hunter_status_viewed = !catalog::meta(role).hunter_gated_on_learn;
                }
            }
        }
        StepId::SpiritKnightConfirm => {
            state.confirm_status = Some(crate::state::ConfirmStatus { role: RoleId::SpiritKnight, status: true });
        }
        StepId::PiperCharmReveal => {}
        StepId::WolfWitchCheck
        | StepId::SeerCheck
        | StepId::GargoyleCheck
        | StepId::PsychicCheck
        | StepId::MirrorSeerCheck
        | StepId::DrunkSeerCheck
        | StepId::PureWhiteCheck
        | StepId::WolfKill => {}
    }
}
