//! Game state representation.
//!
//! `GameState` is the single broadcast snapshot shape this engine is built
//! around — not a compile-time-distinguished phase type like
//! `game::state::State<P>`, since here one struct with a `status` field
//! covers every lifecycle stage rather than several structurally different
//! ones. The per-night sub-machine (plan position, gates, scratch) still
//! lives here as small nested structs, the way `State<P>` nests
//! `last_heals`/`multiverse` inside its own phase structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::protocol::ActionExtra;
use crate::types::{RevealResult, RoleId, Seat, StepId, Team, Timestamp};

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The seat number.
    pub seat: Seat,
    /// The stable external identifier for the occupying account.
    pub uid: String,
    /// The display name shown to other players.
    pub display_name: String,
    /// The assigned role, `None` before seating.
    pub role: Option<RoleId>,
    /// Whether this seat is currently alive.
    pub alive: bool,
}

/// The lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not yet started; seats may still be filled.
    Lobby,
    /// A night (or, out of scope here, a day) is in progress.
    Ongoing,
    /// The game has concluded.
    Ended,
}

/// One recorded action, append-only per night, at most one per `schema_id`
/// (the step it answers) per the data-model invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that submitted the action.
    pub actor_seat: Seat,
    /// The step this action answers.
    pub schema_id: StepId,
    /// The chosen single target, if the schema carries one.
    pub target_seat: Option<Seat>,
    /// The schema-specific extra payload, if any.
    pub extra: Option<ActionExtra>,
}

/// Per-step scratch state, reset at the start of each night.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NightResults {
    /// Individual wolf ballots, last-write-per-seat. `None` is an
    /// explicit no-kill ballot (the `-1` wire sentinel), distinct from a
    /// seat that has not voted yet at all (absent from the map).
    pub wolf_votes_by_seat: BTreeMap<Seat, Option<Seat>>,
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
    /// Carried in the data model for roles not otherwise specified by this engine; see `DESIGN.md`.
    pub silenced_seat: Option<Seat>,
    /// Carried in the data model for roles not otherwise specified by this engine; see `DESIGN.md`.
    pub votebanned_seat: Option<Seat>,
    /// The seat the dreamcatcher has linked its fate to this night, if any.
    pub dreamcatcher_dream_seat: Option<Seat>,
    /// The seat the wolf-queen has charmed this night, if any.
    pub wolf_queen_charm_seat: Option<Seat>,
    /// The seat the celebrity has dreamed of this night, if any.
    pub celebrity_dream_seat: Option<Seat>,
    /// The seat the wolf pack has chosen to kill this night, if any.
    pub wolf_kill_target: Option<Seat>,
    /// Set once the wolf vote has been tallied (by full ballot or by
    /// deadline), distinguishing a completed no-kill result from a vote
    /// still in progress — both otherwise look like `wolf_kill_target:
    /// None`.
    pub wolf_vote_resolved: bool,
}

/// A private identity-check reveal, latest per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    /// The seat that was checked.
    pub target_seat: Seat,
    /// The checked result.
    pub result: RevealResult,
    /// The revision at which this reveal was produced.
    pub revision: u64,
}

/// Witch-specific persistent context (potions are single-use across the whole game).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WitchContext {
    /// This night's wolf-kill target, as seen by the witch (before save/poison resolution).
    pub killed_seat: Option<Seat>,
    /// Whether the witch still has her save potion.
    pub save_potion_available: bool,
    /// Whether the witch still has her poison potion.
    pub poison_potion_available: bool,
}

impl Default for WitchContext {
    fn default() -> Self {
        WitchContext { killed_seat: None, save_potion_available: true, poison_potion_available: true }
    }
}

/// Wolf-robot-specific persistent context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WolfRobotContext {
    /// The seat the wolf-robot has learned the role of, if it has acted.
    pub learned_seat: Option<Seat>,
    /// The role the wolf-robot is now disguised as, for check purposes.
    pub disguised_role: Option<RoleId>,
}

/// The status of a pure-acknowledgement (`confirm`) step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfirmStatus {
    /// The role that confirmed.
    pub role: RoleId,
    /// The confirmed value.
    pub status: bool,
}

/// The authoritative broadcast snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The room's join code.
    pub room_code: String,
    /// The uid of the host/moderator.
    pub host_uid: String,
    /// The game's lifecycle status.
    pub status: Status,
    /// Monotonic revision, strictly increasing on every accepted reducer application.
    pub revision: u64,
    /// Seated players, keyed by seat.
    pub players: BTreeMap<Seat, Player>,
    /// The step currently awaiting action, or `None` if not started / finished.
    pub current_step_id: Option<StepId>,
    /// Whether a blocking audio cue is currently playing.
    pub is_audio_playing: bool,
    /// Steps whose reveal is still awaiting a `REVEAL_ACK`.
    pub pending_reveal_acks: Vec<StepId>,
    /// An optional deadline after which the wolf vote auto-advances.
    pub wolf_vote_deadline: Option<Timestamp>,
    /// Append-only action log for the current night.
    pub actions: Vec<ActionRecord>,
    /// Scratch state for the step currently in progress / just completed.
    pub current_night_results: NightResults,
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

impl GameState {
    /// Returns a fresh, unstarted state for the given room/host and seating.
    pub fn new(room_code: String, host_uid: String, players: BTreeMap<Seat, Player>) -> GameState {
        GameState {
            room_code,
            host_uid,
            status: Status::Lobby,
            revision: 0,
            players,
            current_step_id: None,
            is_audio_playing: false,
            pending_reveal_acks: Vec::new(),
            wolf_vote_deadline: None,
            actions: Vec::new(),
            current_night_results: NightResults::default(),
            seer_reveal: None,
            mirror_seer_reveal: None,
            drunk_seer_reveal: None,
            gargoyle_reveal: None,
            psychic_reveal: None,
            wolf_robot_reveal: None,
            pure_white_reveal: None,
            wolf_witch_reveal: None,
            witch_context: WitchContext::default(),
            wolf_robot_context: WolfRobotContext::default(),
            wolf_robot_hunter_status_viewed: false,
            confirm_status: None,
            last_night_deaths: Vec::new(),
            hypnotized_seats: Vec::new(),
        }
    }

    /// The role assigned to a seat, if any.
    pub fn role_of(&self, seat: Seat) -> Option<RoleId> {
        self.players.get(&seat).and_then(|p| p.role)
    }

    /// Whether a seat is currently alive. Unknown seats are treated as dead.
    pub fn is_alive(&self, seat: Seat) -> bool {
        self.players.get(&seat).map_or(false, |p| p.alive)
    }

    /// The team of a seat's role, if seated.
    pub fn team_of(&self, seat: Seat) -> Option<Team> {
        self.role_of(seat).map(crate::catalog::team_of)
    }

    /// Resets per-night scratch, called once when a new night starts.
    pub fn reset_for_new_night(&mut self) {
        self.actions.clear();
        self.current_night_results = NightResults::default();
        self.pending_reveal_acks.clear();
        self.is_audio_playing = false;
        self.wolf_vote_deadline = None;
        self.last_night_deaths.clear();
    }

    /// The action record for a given step, if one has been accepted this night.
    pub fn action_for(&self, step: StepId) -> Option<&ActionRecord> {
        self.actions.iter().find(|a| a.schema_id == step)
    }
}
