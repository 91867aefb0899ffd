//! Night Flow Controller.
//!
//! Wires the validator, reducer, resolver, death calculator, and
//! progression evaluator into the advance/gate machine one night actually
//! runs through. Grounded on `game/mod.rs::run_with_roles`'s
//! `loop { game_state = match game_state { ... } }` shape, narrowed from a
//! whole-game loop to a single night: the caller drives it message by
//! message and tick by tick, exactly the way `run_with_roles`'s loop is
//! driven by the injected `Handler`/`Player` each iteration.

use std::collections::BTreeMap;

use crate::catalog;
use crate::death;
use crate::error::EngineError;
use crate::plan::{self, NightStep, PlanError};
use crate::ports::{PrivateSink, Random};
use crate::progression::{self, Decision, ProcessedTracker, WaitReason};
use crate::protocol::PlayerMessage;
use crate::reducer;
use crate::resolver;
use crate::state::{GameState, Player, Status};
use crate::types::{SchemaKind, Seat, Timestamp};
use crate::validator::{self, AcceptedAction, RejectReason};

/// Owns one night's frozen plan and drives [`GameState`] through it.
#[derive(Debug, Clone)]
pub struct NightFlowController {
    plan: Vec<NightStep>,
    wolf_voters: Vec<Seat>,
}

impl NightFlowController {
    /// Builds a controller for the given seating. Fails the same way
    /// [`plan::build_plan`] does, on a duplicated role assignment.
    pub fn new(players: &BTreeMap<Seat, Player>) -> Result<NightFlowController, PlanError> {
        let plan = plan::build_plan(players)?;
        let wolf_voters = players
            .values()
            .filter(|p| p.role.is_some_and(catalog::does_role_participate_in_wolf_vote))
            .map(|p| p.seat)
            .collect();
        Ok(NightFlowController { plan, wolf_voters })
    }

    /// The frozen plan this controller drives.
    pub fn plan(&self) -> &[NightStep] {
        &self.plan
    }

    fn current_step(&self, state: &GameState) -> Option<&NightStep> {
        let current = state.current_step_id?;
        self.plan.iter().find(|s| s.step_id == current)
    }

    /// Resets per-night scratch and marks the game ongoing. Call once
    /// before the first `advance`.
    pub fn start_night(&self, mut state: GameState) -> GameState {
        state.reset_for_new_night();
        state.status = Status::Ongoing;
        state
    }

    /// Sets the audio-playing gate. Audio playback is an external
    /// collaborator this core never owns — the host transport layer calls
    /// this directly when a cue starts or finishes, rather than through a
    /// `PlayerMessage`, and the progression evaluator blocks advancement
    /// unconditionally while it is set.
    pub fn set_audio_playing(&self, mut state: GameState, playing: bool) -> GameState {
        if state.is_audio_playing != playing {
            state.is_audio_playing = playing;
            state.revision += 1;
        }
        state
    }

    /// Validates, reduces, and resolves one inbound message against the
    /// step it is currently positioned at.
    pub fn apply_message(
        &self,
        state: GameState,
        msg: &PlayerMessage,
        rng: &mut dyn Random,
        sink: &mut dyn PrivateSink,
    ) -> Result<GameState, EngineError> {
        let current_step = self.current_step(&state).copied();
        let accepted = validator::validate(&state, current_step.as_ref(), msg)?;
        let mut state = reducer::reduce(state, accepted.clone());
        if let Some(step) = current_step.as_ref() {
            resolver::resolve_after_action(&mut state, step, &accepted, rng, sink);
        }
        if matches!(accepted, AcceptedAction::WolfVote { .. }) {
            if let Some(tally) = resolver::try_complete_wolf_vote(&state, &self.wolf_voters) {
                state.current_night_results.wolf_kill_target = tally;
                state.current_night_results.wolf_vote_resolved = true;
            }
        }
        Ok(state)
    }

    /// Advances the flow by one tick: opens the next step if the current
    /// one is done and nothing is gating progress, or ends the night if
    /// the plan is exhausted. Advancing is host-authoritative: a caller
    /// whose uid does not match [`GameState::host_uid`] is rejected outright
    /// rather than silently parked. `tracker` de-duplicates a retried
    /// request for a revision this controller has already advanced past. A
    /// no-op (`Ok` with unchanged state) while still waiting on input or an
    /// acknowledgement, or on a repeat call the tracker has already seen.
    pub fn advance(
        &self,
        state: GameState,
        now: Timestamp,
        caller_uid: &str,
        tracker: &mut ProcessedTracker,
        sink: &mut dyn PrivateSink,
    ) -> Result<GameState, EngineError> {
        let is_host = caller_uid == state.host_uid;
        match progression::evaluate(&state, &self.plan, now, is_host, Some(tracker)) {
            Decision::Wait(WaitReason::NotHost) => Err(RejectReason::NotHost { uid: caller_uid.to_string() }.into()),
            Decision::Wait(_) => Ok(state),
            Decision::Advance(step_id) => {
                let mut state = state;
                state.current_step_id = Some(step_id);
                state.revision += 1;
                let step = self
                    .plan
                    .iter()
                    .find(|s| s.step_id == step_id)
                    .ok_or(EngineError::StepNotInPlan { step: step_id })?;
                if step.schema == SchemaKind::GroupConfirm {
                    resolver::auto_resolve_group_confirm(&state, sink);
                }
                Ok(state)
            }
            Decision::EndNight => self.end_night(state),
        }
    }

    /// Forces the night to end regardless of plan position, computing and
    /// applying the death list. Idempotent: calling it again on an already
    /// ended state (`current_step_id` is `None`) just recomputes the same
    /// death list from unchanged scratch.
    pub fn end_night(&self, mut state: GameState) -> Result<GameState, EngineError> {
        let deaths = death::calculate_deaths(&state);
        for &seat in &deaths {
            if let Some(player) = state.players.get_mut(&seat) {
                player.alive = false;
            }
        }
        state.last_night_deaths = deaths;
        state.current_step_id = None;
        state.revision += 1;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::test_support::{FakeRandom, RecordingSink};
    use crate::types::{RoleId, StepId};

    fn seating() -> BTreeMap<Seat, Player> {
        let mut players = BTreeMap::new();
        players.insert(0, Player { seat: 0, uid: "u0".into(), display_name: "p0".into(), role: Some(RoleId::Wolf), alive: true });
        players.insert(1, Player { seat: 1, uid: "u1".into(), display_name: "p1".into(), role: Some(RoleId::Seer), alive: true });
        players.insert(2, Player { seat: 2, uid: "u2".into(), display_name: "p2".into(), role: Some(RoleId::Villager), alive: true });
        players
    }

    #[test]
    fn a_full_night_runs_wolf_kill_then_seer_check_then_ends() {
        let controller = NightFlowController::new(&seating()).expect("valid seating");
        let state = GameState::new("R".into(), "host".into(), seating());
        let state = controller.start_night(state);
        let mut rng = FakeRandom::new(vec![0.1]);
        let mut sink = RecordingSink::default();
        let mut tracker = ProcessedTracker::new();

        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance");
        assert_eq!(state.current_step_id, Some(StepId::WolfKill));

        let state = controller
            .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: Some(2) }, &mut rng, &mut sink)
            .expect("wolf vote accepted");
        assert_eq!(state.current_night_results.wolf_kill_target, Some(2));

        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance");
        assert_eq!(state.current_step_id, Some(StepId::SeerCheck));

        let state = controller
            .apply_message(
                state,
                &PlayerMessage::Action { actor_seat: 1, step_id: StepId::SeerCheck, target_seat: Some(0), extra: None },
                &mut rng,
                &mut sink,
            )
            .expect("seer check accepted");
        assert_eq!(state.pending_reveal_acks, vec![StepId::SeerCheck]);

        let state = controller
            .apply_message(state, &PlayerMessage::RevealAck { actor_seat: 1, step_id: StepId::SeerCheck }, &mut rng, &mut sink)
            .expect("ack accepted");

        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");
        assert_eq!(state.current_step_id, None);
        assert_eq!(state.last_night_deaths, vec![2]);
        assert!(!state.players[&2].alive);
    }

    #[test]
    fn audio_playing_blocks_advance_regardless_of_step_completion() {
        let controller = NightFlowController::new(&seating()).expect("valid seating");
        let state = GameState::new("R".into(), "host".into(), seating());
        let state = controller.start_night(state);
        let mut sink = RecordingSink::default();
        let mut tracker = ProcessedTracker::new();

        let state = controller.set_audio_playing(state, true);
        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance while audio plays");
        assert_eq!(state.current_step_id, None, "nothing has opened yet, so the gate can't be observed via step position");
        assert!(state.is_audio_playing);

        let blocked_revision = state.revision;
        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance stays parked");
        assert_eq!(state.revision, blocked_revision, "a second advance while still playing makes no progress");

        let state = controller.set_audio_playing(state, false);
        let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance once audio clears");
        assert_eq!(state.current_step_id, Some(StepId::WolfKill));
    }

    #[test]
    fn a_caller_whose_uid_is_not_the_host_is_rejected() {
        let controller = NightFlowController::new(&seating()).expect("valid seating");
        let state = GameState::new("R".into(), "host".into(), seating());
        let state = controller.start_night(state);
        let mut sink = RecordingSink::default();
        let mut tracker = ProcessedTracker::new();

        let err = controller
            .advance(state, 0, "u1", &mut tracker, &mut sink)
            .expect_err("a non-host caller cannot drive the flow forward");
        assert!(matches!(err, EngineError::Rejected(RejectReason::NotHost { .. })));
    }

    #[test]
    fn a_tracker_shared_across_calls_suppresses_a_repeated_advance_at_the_same_revision() {
        let controller = NightFlowController::new(&seating()).expect("valid seating");
        let state = GameState::new("R".into(), "host".into(), seating());
        let state = controller.start_night(state);
        let mut sink = RecordingSink::default();
        let mut tracker = ProcessedTracker::new();

        let advanced = controller.advance(state.clone(), 0, "host", &mut tracker, &mut sink).expect("first advance opens the first step");
        assert_eq!(advanced.current_step_id, Some(StepId::WolfKill));

        // A retried request carrying the same (pre-advance) revision is a
        // no-op once the tracker has already processed it, instead of
        // re-running the same transition's side effects.
        let replayed = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("replay is a no-op, not an error");
        assert_eq!(replayed.current_step_id, None, "the tracker suppressed the repeat, leaving the input state untouched");
    }

    #[test]
    fn setting_audio_playing_to_its_current_value_does_not_bump_revision() {
        let state = GameState::new("R".into(), "host".into(), seating());
        let controller = NightFlowController::new(&seating()).expect("valid seating");
        let revision = state.revision;
        let state = controller.set_audio_playing(state, false);
        assert_eq!(state.revision, revision);
    }
}
