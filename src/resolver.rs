//! Resolver Layer.
//!
//! Everything that turns an accepted action into an effect visible outside
//! the state struct: private identity-check reveals, the wolf pack's vote
//! tally, and the piper's auto-completing charm confirmation. Shaped after
//! the closures threaded through `Night::resolve_tar`
//! (`choose_heal_target`, `choose_investigation_target`,
//! `choose_werewolf_kill_target`): the pure core never owns randomness or a
//! socket, it calls out through the injected [`crate::ports::Random`] and
//! [`crate::ports::PrivateSink`] traits.

use std::collections::BTreeMap;

use crate::catalog;
use crate::plan::NightStep;
use crate::ports::{PrivateSink, Random};
use crate::protocol::{OutboundEvent, PrivateEffectPayload};
use crate::state::{ConfirmStatus, GameState, Reveal};
use crate::types::{RevealKind, RevealResult, RoleId, Seat, StepId, Team};
use crate::validator::AcceptedAction;

/// The role a seat presents when checked, honoring the magician's swap
/// (scoped to the night it was cast, since `swapped_seats` lives on the
/// per-night scratch) and the wolf-robot's persistent disguise.
pub fn resolve_role_for_checks(state: &GameState, seat: Seat) -> RoleId {
    let effective_seat = match state.current_night_results.swapped_seats {
        Some((a, b)) if seat == a => b,
        Some((a, b)) if seat == b => a,
        _ => seat,
    };
    let role = state.role_of(effective_seat).unwrap_or(RoleId::Villager);
    if role == RoleId::WolfRobot {
        if let Some(disguise) = state.wolf_robot_context.disguised_role {
            return disguise;
        }
    }
    role
}

fn reveal_result_for(kind: RevealKind, role: RoleId, rng: &mut dyn Random) -> RevealResult {
    match kind {
        RevealKind::GargoyleReveal
        | RevealKind::PsychicReveal
        | RevealKind::PureWhiteReveal
        | RevealKind::WolfWitchReveal
        | RevealKind::WolfRobotReveal => RevealResult::Role(role),
        RevealKind::SeerReveal => RevealResult::Team(catalog::team_of(role).chinese_label().to_string()),
        RevealKind::MirrorSeerReveal => RevealResult::Team(catalog::team_of(role).inverted().chinese_label().to_string()),
        RevealKind::DrunkSeerReveal => {
            let team: Team = catalog::team_of(role);
            let revealed = if rng.unit() < catalog::DRUNK_SEER_THRESHOLD { team } else { team.inverted() };
            RevealResult::Team(revealed.chinese_label().to_string())
        }
    }
}

fn store_reveal(state: &mut GameState, kind: RevealKind, reveal: Reveal) {
    let slot = match kind {
        RevealKind::SeerReveal => &mut state.seer_reveal,
        RevealKind::MirrorSeerReveal => &mut state.mirror_seer_reveal,
        RevealKind::DrunkSeerReveal => &mut state.drunk_seer_reveal,
        RevealKind::GargoyleReveal => &mut state.gargoyle_reveal,
        RevealKind::PsychicReveal => &mut state.psychic_reveal,
        RevealKind::WolfRobotReveal => &mut state.wolf_robot_reveal,
        RevealKind::PureWhiteReveal => &mut state.pure_white_reveal,
        RevealKind::WolfWitchReveal => &mut state.wolf_witch_reveal,
    };
    *slot = Some(reveal);
}

/// Resolves the effects of one just-reduced action: for identity-check
/// steps, computes and stores the reveal, queues it for acknowledgement,
/// and sends it privately to the acting seat.
pub fn resolve_after_action(
    state: &mut GameState,
    step: &NightStep,
    accepted: &AcceptedAction,
    rng: &mut dyn Random,
    sink: &mut dyn PrivateSink,
) {
    match accepted {
        AcceptedAction::Action { actor_seat, target_seat: Some(target), .. } => {
            if let Some(kind) = catalog::reveal_kind_for(step.step_id) {
                let role = resolve_role_for_checks(state, *target);
                let result = reveal_result_for(kind, role, rng);
                let reveal = Reveal { target_seat: *target, result, revision: state.revision };
                store_reveal(state, kind, reveal.clone());
                state.pending_reveal_acks.push(step.step_id);
                sink.send_private(*actor_seat, OutboundEvent::PrivateEffect {
                    seat: *actor_seat,
                    payload: PrivateEffectPayload::Reveal { reveal_kind: kind, reveal },
                });
            }
        }
        AcceptedAction::Action { actor_seat, .. } if step.step_id == StepId::SpiritKnightConfirm => {
            let status = ConfirmStatus { role: RoleId::SpiritKnight, status: true };
            sink.send_private(*actor_seat, OutboundEvent::PrivateEffect {
                seat: *actor_seat,
                payload: PrivateEffectPayload::Confirm(status),
            });
        }
        _ => {}
    }
}

/// Auto-resolves a `groupConfirm`-schema step with no player input: the
/// piper's charm confirmation, sent to every currently hypnotized seat.
pub fn auto_resolve_group_confirm(state: &GameState, sink: &mut dyn PrivateSink) {
    for &seat in &state.hypnotized_seats {
        sink.send_private(seat, OutboundEvent::PrivateEffect {
            seat,
            payload: PrivateEffectPayload::CharmConfirmation { hypnotized_seats: state.hypnotized_seats.clone() },
        });
    }
}

/// Attempts to complete the wolf vote: once every living wolf-vote
/// participant has cast a ballot (including an explicit no-kill ballot),
/// tallies the result (plurality; ties between two actual seats break
/// toward the lowest seat number, and a tie between a seat and an explicit
/// no-kill ballot breaks toward the seat) and returns it. Returns `None`
/// while ballots are still outstanding.
pub fn try_complete_wolf_vote(state: &GameState, wolf_voters: &[Seat]) -> Option<Option<Seat>> {
    let living_voters: Vec<Seat> = wolf_voters.iter().copied().filter(|&s| state.is_alive(s)).collect();
    if living_voters.is_empty() {
        return Some(None);
    }
    if !living_voters.iter().all(|s| state.current_night_results.wolf_votes_by_seat.contains_key(s)) {
        return None;
    }
    let mut tally: BTreeMap<Option<Seat>, u32> = BTreeMap::new();
    for voter in &living_voters {
        let target = state.current_night_results.wolf_votes_by_seat[voter];
        *tally.entry(target).or_default() += 1;
    }
    let winner = tally
        .into_iter()
        .max_by(|(target_a, count_a), (target_b, count_b)| {
            count_a.cmp(count_b).then_with(|| match (target_a, target_b) {
                (Some(a), Some(b)) => b.cmp(a),
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (None, None) => std::cmp::Ordering::Equal,
            })
        })
        .map(|(target, _)| target);
    Some(winner.unwrap_or(None))
}
