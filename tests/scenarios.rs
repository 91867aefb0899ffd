//! Concrete end-to-end scenarios exercising one full night through
//! [`night_phase_engine::controller::NightFlowController`], described as
//! whole-night walkthroughs rather than single-function unit checks.
//! Shaped after `groblegark-coop`'s `tests/` integration-test convention.

use std::collections::BTreeMap;

use night_phase_engine::controller::NightFlowController;
use night_phase_engine::progression::ProcessedTracker;
use night_phase_engine::ports::test_support::{FakeRandom, RecordingSink};
use night_phase_engine::protocol::{ActionExtra, PlayerMessage};
use night_phase_engine::state::{GameState, Player};
use night_phase_engine::types::{RoleId, Seat, StepId};

fn seat(seat: Seat, role: RoleId) -> Player {
    Player { seat, uid: format!("u{seat}"), display_name: format!("p{seat}"), role: Some(role), alive: true }
}

fn run_to_step(controller: &NightFlowController, mut state: GameState, step: StepId, sink: &mut RecordingSink) -> GameState {
    state = controller.start_night(state);
    let mut tracker = ProcessedTracker::new();
    loop {
        state = controller.advance(state, 0, "host", &mut tracker, sink).expect("advance");
        if state.current_step_id == Some(step) || state.current_step_id.is_none() {
            break;
        }
    }
    state
}

/// A guarded target survives the wolf pack's kill.
#[test]
fn guard_protects_its_target_from_the_wolf_kill() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Guard));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::GuardProtect, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 1, step_id: StepId::GuardProtect, target_seat: Some(2), extra: None }, &mut rng, &mut sink)
        .expect("guard action accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance");
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: Some(2) }, &mut rng, &mut sink)
        .expect("wolf vote accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, Vec::<Seat>::new());
    assert!(state.players[&2].alive);
}

/// The witch's save potion spares the wolf kill's target.
#[test]
fn witch_save_spares_the_wolf_kill_target() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Witch));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::WolfKill, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: Some(2) }, &mut rng, &mut sink)
        .expect("wolf vote accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to witch");
    assert_eq!(state.current_step_id, Some(StepId::WitchAction));
    let state = controller
        .apply_message(
            state,
            &PlayerMessage::Action {
                actor_seat: 1,
                step_id: StepId::WitchAction,
                target_seat: None,
                extra: Some(ActionExtra::WitchChoice { save: true, poison_seat: None }),
            },
            &mut rng,
            &mut sink,
        )
        .expect("witch save accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, Vec::<Seat>::new());
    assert!(!state.witch_context.save_potion_available);
}

/// A target both guarded and witch-saved on the same night dies anyway
/// ("same-guard-same-save").
#[test]
fn a_target_both_guarded_and_saved_dies_anyway() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Guard));
    players.insert(2, seat(2, RoleId::Witch));
    players.insert(3, seat(3, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::GuardProtect, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 1, step_id: StepId::GuardProtect, target_seat: Some(3), extra: None }, &mut rng, &mut sink)
        .expect("guard action accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to wolf kill");
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: Some(3) }, &mut rng, &mut sink)
        .expect("wolf vote accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to witch");
    let state = controller
        .apply_message(
            state,
            &PlayerMessage::Action {
                actor_seat: 2,
                step_id: StepId::WitchAction,
                target_seat: None,
                extra: Some(ActionExtra::WitchChoice { save: true, poison_seat: None }),
            },
            &mut rng,
            &mut sink,
        )
        .expect("witch save accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, vec![3], "guarded AND saved still dies");
    assert!(!state.players[&3].alive);
}

/// The witch's poison kills its target independent of the wolf kill.
#[test]
fn witch_poison_kills_independently_of_the_wolf_kill() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Witch));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::WolfKill, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: None }, &mut rng, &mut sink)
        .expect("wolf no-kill ballot accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to witch");
    let state = controller
        .apply_message(
            state,
            &PlayerMessage::Action {
                actor_seat: 1,
                step_id: StepId::WitchAction,
                target_seat: None,
                extra: Some(ActionExtra::WitchChoice { save: false, poison_seat: Some(2) }),
            },
            &mut rng,
            &mut sink,
        )
        .expect("witch poison accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, vec![2]);
}

/// The witch poisoning herself is a no-op; the witcher is immune to her own potion.
#[test]
fn witch_poisoning_herself_is_immune() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Witch));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::WolfKill, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: None }, &mut rng, &mut sink)
        .expect("wolf no-kill ballot accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to witch");
    let state = controller
        .apply_message(
            state,
            &PlayerMessage::Action {
                actor_seat: 1,
                step_id: StepId::WitchAction,
                target_seat: None,
                extra: Some(ActionExtra::WitchChoice { save: false, poison_seat: Some(1) }),
            },
            &mut rng,
            &mut sink,
        )
        .expect("witch poisons herself, still accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, Vec::<Seat>::new());
    assert!(state.players[&1].alive);
}

/// Blocking a wolf-team seat disables the wolf kill entirely for the night.
#[test]
fn nightmare_blocking_a_wolf_disables_the_kill_for_the_night() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Nightmare));
    players.insert(1, seat(1, RoleId::Wolf));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::NightmareBlock, &mut sink);
    let mut state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 0, step_id: StepId::NightmareBlock, target_seat: Some(1), extra: None }, &mut rng, &mut sink)
        .expect("block accepted");
    assert!(state.current_night_results.wolf_kill_disabled);
    // the disabled wolf kill needs no ballot to be considered resolved, so a
    // plain advance loop runs the rest of the plan to completion on its own.
    while state.current_step_id.is_some() {
        state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");
    }

    assert_eq!(state.last_night_deaths, Vec::<Seat>::new());
}

/// The nightmare blocks the guard's protection; its non-skip action is
/// Rejected outright, but the guard's follow-up skip still advances the flow.
#[test]
fn nightmare_blocking_the_guard_rejects_its_protection_but_allows_a_skip() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Nightmare));
    players.insert(1, seat(1, RoleId::Guard));
    players.insert(2, seat(2, RoleId::Wolf));
    players.insert(3, seat(3, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::NightmareBlock, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 0, step_id: StepId::NightmareBlock, target_seat: Some(1), extra: None }, &mut rng, &mut sink)
        .expect("block accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to guard");
    assert_eq!(state.current_step_id, Some(StepId::GuardProtect));

    let rejected = controller.apply_message(
        state.clone(),
        &PlayerMessage::Action { actor_seat: 1, step_id: StepId::GuardProtect, target_seat: Some(3), extra: None },
        &mut rng,
        &mut sink,
    );
    assert!(rejected.is_err(), "a blocked seat's non-skip action must be rejected");
    assert_eq!(state.current_night_results.guarded_seat, None, "rejection must not mutate state");

    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 1, step_id: StepId::GuardProtect, target_seat: None, extra: None }, &mut rng, &mut sink)
        .expect("the blocked seat's skip is still accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to wolf kill");
    assert_eq!(state.current_step_id, Some(StepId::WolfKill));

    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 2, target_seat: Some(3) }, &mut rng, &mut sink)
        .expect("wolf vote accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, vec![3]);
}

/// The magician's swap exchanges which of its two seats dies.
#[test]
fn magician_swap_exchanges_the_death_between_its_two_seats() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Wolf));
    players.insert(1, seat(1, RoleId::Magician));
    players.insert(2, seat(2, RoleId::Villager));
    players.insert(3, seat(3, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::WolfKill, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::WolfVote { actor_seat: 0, target_seat: Some(2) }, &mut rng, &mut sink)
        .expect("wolf vote accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to magician");
    assert_eq!(state.current_step_id, Some(StepId::MagicianSwap));
    let state = controller
        .apply_message(
            state,
            &PlayerMessage::Action { actor_seat: 1, step_id: StepId::MagicianSwap, target_seat: None, extra: Some(ActionExtra::SwapPair { seats: vec![2, 3] }) },
            &mut rng,
            &mut sink,
        )
        .expect("swap accepted");
    let state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance to end");

    assert_eq!(state.last_night_deaths, vec![3]);
    assert!(state.players[&2].alive);
}

/// A seer check queues a reveal that blocks progression until acknowledged.
#[test]
fn a_seer_check_blocks_progression_until_its_reveal_is_acknowledged() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Seer));
    players.insert(1, seat(1, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::SeerCheck, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 0, step_id: StepId::SeerCheck, target_seat: Some(1), extra: None }, &mut rng, &mut sink)
        .expect("seer check accepted");

    let blocked = controller.advance(state.clone(), 0, "host", &mut tracker, &mut sink).expect("advance while blocked");
    assert_eq!(blocked.current_step_id, Some(StepId::SeerCheck), "progression must not skip an unacknowledged reveal");

    let acked = controller
        .apply_message(state, &PlayerMessage::RevealAck { actor_seat: 0, step_id: StepId::SeerCheck }, &mut rng, &mut sink)
        .expect("ack accepted");
    let ended = controller.advance(acked, 0, "host", &mut tracker, &mut sink).expect("advance to end");
    assert_eq!(ended.current_step_id, None);
}

/// Learning the hunter's role blocks the flow past `wolfRobotLearn` until
/// The moderator clears the viewer-ack gate.
#[test]
fn wolf_robot_learning_the_hunter_blocks_until_the_viewer_gate_clears() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::WolfRobot));
    players.insert(1, seat(1, RoleId::Hunter));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::WolfRobotLearn, &mut sink);
    let state = controller
        .apply_message(state, &PlayerMessage::Action { actor_seat: 0, step_id: StepId::WolfRobotLearn, target_seat: Some(1), extra: None }, &mut rng, &mut sink)
        .expect("learn accepted");
    assert!(!state.wolf_robot_hunter_status_viewed);

    let blocked = controller.advance(state.clone(), 0, "host", &mut tracker, &mut sink).expect("advance while gated");
    assert_eq!(blocked.current_step_id, Some(StepId::WolfRobotLearn), "must not advance past an unviewed hunter learn");

    let viewed = controller
        .apply_message(state, &PlayerMessage::WolfRobotHunterStatusViewed { actor_seat: 0 }, &mut rng, &mut sink)
        .expect("viewed-ack accepted");
    assert!(viewed.wolf_robot_hunter_status_viewed);
    let ended = controller.advance(viewed, 0, "host", &mut tracker, &mut sink).expect("advance to end");
    assert_eq!(ended.current_step_id, None);
}

/// The piper's hypnotized set receives an auto-completing charm confirmation.
#[test]
fn piper_hypnotize_auto_resolves_its_charm_confirmation() {
    let mut players = BTreeMap::new();
    players.insert(0, seat(0, RoleId::Piper));
    players.insert(1, seat(1, RoleId::Villager));
    players.insert(2, seat(2, RoleId::Villager));
    let controller = NightFlowController::new(&players).expect("valid seating");
    let mut sink = RecordingSink::default();
    let mut tracker = ProcessedTracker::new();
    let mut rng = FakeRandom::new(vec![0.1]);
    let state = GameState::new("R".into(), "host".into(), players);

    let state = run_to_step(&controller, state, StepId::PiperHypnotize, &mut sink);
    let mut state = controller
        .apply_message(
            state,
            &PlayerMessage::Action { actor_seat: 0, step_id: StepId::PiperHypnotize, target_seat: None, extra: Some(ActionExtra::SeatSet { seats: vec![1, 2] }) },
            &mut rng,
            &mut sink,
        )
        .expect("hypnotize accepted");
    assert_eq!(state.hypnotized_seats, vec![1, 2]);
    // one advance opens the auto-confirming charm-reveal step (sending the
    // confirmation to each hypnotized seat); the next ends the night, since
    // nothing else remains in this seating's plan.
    while state.current_step_id.is_some() {
        state = controller.advance(state, 0, "host", &mut tracker, &mut sink).expect("advance through the auto-confirming reveal step");
    }
    assert_eq!(state.current_step_id, None, "an all-good seating with no further steps ends the night here");
    assert_eq!(sink.private.len(), 2, "both hypnotized seats receive the charm confirmation");
}
