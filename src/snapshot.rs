//! Snapshot & Normalizer.
//!
//! Derives the canonical transport shape from the authoritative
//! [`GameState`]: every field survives the trip — `GameState` already is
//! the broadcast snapshot, not a narrower view of it — with every
//! seat-keyed map's keys canonicalized to string form for serialization.
//! Grounded on the other pack's `Room` wire struct
//! (`other_examples/.../signal-fish-server__src-protocol-room_state.rs`):
//! a `serde`-derived, deterministically ordered struct distinct from the
//! server's own internal state type, kept in its own module so the
//! transport shape can evolve independently of `GameState`'s field layout.
//! `BTreeMap`, not `HashMap`, throughout, so two calls to [`normalize`]
//! against equal states serialize byte-for-byte identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{ActionRecord, ConfirmStatus, GameState, NightResults, Player, Reveal, Status, WitchContext, WolfRobotContext};
use crate::types::{Seat, StepId, Timestamp};

/// [`NightResults`] with its seat-keyed map canonicalized to string keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightResultsSnapshot {
    /// Individual wolf ballots, canonicalized to string-keyed seats.
    pub wolf_votes_by_seat: BTreeMap<String, Option<Seat>>,
    /// Set when the nightmare has blocked a wolf-team seat, disabling the kill entirely.
    pub wolf_kill_disabled: bool,
    /// The seat the nightmare has blocked this night, if any.
    pub blocked_seat: Option<Seat>,
    /// The seat the guard has protected this night, if any.
    pub guarded_seat: Option<Seat>,
    /// The seat the witch has saved this night, if any.
    pub saved_seat: Option<Seat>,
    /// The seat the witch has poisoned this night, if any.
    pub poisoned_seat: Option<Seat>,
    /// The pair of seats swapped by the magician this night, if any.
    pub swapped_seats: Option<(Seat, Seat)>,
    /// The seats the piper has hypnotized this night.
    pub hypnotized_seats_this_night: Vec<Seat>,
    /// See [`NightResults::silenced_seat`].
    pub silenced_seat: Option<Seat>,
    /// See [`NightResults::votebanned_seat`].
    pub votebanned_seat: Option<Seat>,
    /// The seat the dreamcatcher has linked its fate to this night, if any.
    pub dreamcatcher_dream_seat: Option<Seat>,
    /// The seat the wolf-queen has charmed this night, if any.
    pub wolf_queen_charm_seat: Option<Seat>,
    /// The seat the celebrity has dreamed of this night, if any.
    pub celebrity_dream_seat: Option<Seat>,
    /// The seat the wolf pack has chosen to kill this night, if any.
    pub wolf_kill_target: Option<Seat>,
    /// Whether the wolf vote has been tallied this night.
    pub wolf_vote_resolved: bool,
}

impl From<&NightResults> for NightResultsSnapshot {
    fn from(results: &NightResults) -> NightResultsSnapshot {
        NightResultsSnapshot {
            wolf_votes_by_seat: results.wolf_votes_by_seat.iter().map(|(seat, target)| (seat.to_string(), *target)).collect(),
            wolf_kill_disabled: results.wolf_kill_disabled,
            blocked_seat: results.blocked_seat,
            guarded_seat: results.guarded_seat,
            saved_seat: results.saved_seat,
            poisoned_seat: results.poisoned_seat,
            swapped_seats: results.swapped_seats,
            hypnotized_seats_this_night: results.hypnotized_seats_this_night.clone(),
            silenced_seat: results.silenced_seat,
            votebanned_seat: results.votebanned_seat,
            dreamcatcher_dream_seat: results.dreamcatcher_dream_seat,
            wolf_queen_charm_seat: results.wolf_queen_charm_seat,
            celebrity_dream_seat: results.celebrity_dream_seat,
            wolf_kill_target: results.wolf_kill_target,
            wolf_vote_resolved: results.wolf_vote_resolved,
        }
    }
}

/// The canonical, string-keyed transport shape of a [`GameState`]. Carries
/// every field the authoritative state does — normalization canonicalizes
/// how fields are keyed, never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastGameState {
    /// The room's join code.
    pub room_code: String,
    /// The uid of the host/moderator.
    pub host_uid: String,
    /// The game's lifecycle status.
    pub status: Status,
    /// Monotonic revision.
    pub revision: u64,
    /// Seated players, keyed by string-canonical seat.
    pub players: BTreeMap<String, Player>,
    /// The step currently awaiting action, if any.
    pub current_step_id: Option<StepId>,
    /// Whether a blocking audio cue is currently playing.
    pub is_audio_playing: bool,
    /// Steps whose reveal is still awaiting acknowledgement.
    pub pending_reveal_acks: Vec<StepId>,
    /// An optional deadline after which the wolf vote auto-advances.
    pub wolf_vote_deadline: Option<Timestamp>,
    /// This night's append-only action log.
    pub actions: Vec<ActionRecord>,
    /// Scratch state for the step currently in progress / just completed.
    pub current_night_results: NightResultsSnapshot,
    /// Latest seer reveal.
    pub seer_reveal: Option<Reveal>,
    /// Latest mirror-seer reveal.
    pub mirror_seer_reveal: Option<Reveal>,
    /// Latest drunk-seer reveal.
    pub drunk_seer_reveal: Option<Reveal>,
    /// Latest gargoyle reveal.
    pub gargoyle_reveal: Option<Reveal>,
    /// Latest psychic reveal.
    pub psychic_reveal: Option<Reveal>,
    /// Latest wolf-robot reveal.
    pub wolf_robot_reveal: Option<Reveal>,
    /// Latest pure-white reveal.
    pub pure_white_reveal: Option<Reveal>,
    /// Latest wolf-witch reveal.
    pub wolf_witch_reveal: Option<Reveal>,
    /// Witch's persistent context.
    pub witch_context: WitchContext,
    /// Wolf-robot's persistent context.
    pub wolf_robot_context: WolfRobotContext,
    /// Whether the wolf-robot-learns-hunter viewer gate has been cleared.
    pub wolf_robot_hunter_status_viewed: bool,
    /// The most recent pure-acknowledgement status, if any step of that kind has run.
    pub confirm_status: Option<ConfirmStatus>,
    /// The sorted death list, set exactly once per night at end-night.
    pub last_night_deaths: Vec<Seat>,
    /// Seats hypnotized by the piper; persists across nights.
    pub hypnotized_seats: Vec<Seat>,
}

/// Derives the canonical transport shape from the authoritative state:
/// every field carried over, seat-keyed maps rekeyed to their string form.
/// Pure and idempotent — equal `GameState`s always produce byte-identical
/// serialized output, since every field here is either `Copy`, a
/// deterministically ordered `BTreeMap`, or a plain clone.
pub fn normalize(state: &GameState) -> BroadcastGameState {
    BroadcastGameState {
        room_code: state.room_code.clone(),
        host_uid: state.host_uid.clone(),
        status: state.status,
        revision: state.revision,
        players: state.players.iter().map(|(&seat, p)| (seat.to_string(), p.clone())).collect(),
        current_step_id: state.current_step_id,
        is_audio_playing: state.is_audio_playing,
        pending_reveal_acks: state.pending_reveal_acks.clone(),
        wolf_vote_deadline: state.wolf_vote_deadline,
        actions: state.actions.clone(),
        current_night_results: NightResultsSnapshot::from(&state.current_night_results),
        seer_reveal: state.seer_reveal.clone(),
        mirror_seer_reveal: state.mirror_seer_reveal.clone(),
        drunk_seer_reveal: state.drunk_seer_reveal.clone(),
        gargoyle_reveal: state.gargoyle_reveal.clone(),
        psychic_reveal: state.psychic_reveal.clone(),
        wolf_robot_reveal: state.wolf_robot_reveal.clone(),
        pure_white_reveal: state.pure_white_reveal.clone(),
        wolf_witch_reveal: state.wolf_witch_reveal.clone(),
        witch_context: state.witch_context,
        wolf_robot_context: state.wolf_robot_context,
        wolf_robot_hunter_status_viewed: state.wolf_robot_hunter_status_viewed,
        confirm_status: state.confirm_status,
        last_night_deaths: state.last_night_deaths.clone(),
        hypnotized_seats: state.hypnotized_seats.clone(),
    }
}
