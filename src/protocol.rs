//! Action Message Protocol.
//!
//! Inbound and outbound wire shapes. Grounded on the other pack's
//! `room_state.rs`, which represents every lobby/room transition as a single
//! tagged-union enum carrying only the fields that transition needs, rather
//! than one wide struct with optional fields for every variant.

use serde::{Deserialize, Serialize};

use crate::state::{ConfirmStatus, Reveal};
use crate::types::{RevealKind, RoleId, Seat, StepId};

/// The schema-specific extra payload carried by an inbound action, beyond a
/// plain single target seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionExtra {
    /// Witch's compound save/poison choice.
    WitchChoice {
        /// Whether the witch used her save potion on this night's kill target.
        save: bool,
        /// The seat the witch poisoned, if any.
        poison_seat: Option<Seat>,
    },
    /// Magician's ordered pair of seats to swap, or an empty pair to skip.
    SwapPair {
        /// The two seats to swap, in submission order.
        seats: Vec<Seat>,
    },
    /// Piper's chosen set of seats to hypnotize.
    SeatSet {
        /// The seats hypnotized this night.
        seats: Vec<Seat>,
    },
}

/// One inbound player message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerMessage {
    /// A seated player's answer to the currently open step.
    Action {
        /// The acting seat.
        actor_seat: Seat,
        /// The step this answers; must equal the state's `current_step_id`.
        step_id: StepId,
        /// A single chosen target, if the schema carries one.
        target_seat: Option<Seat>,
        /// The schema-specific extra payload, if any.
        extra: Option<ActionExtra>,
    },
    /// One wolf's individual ballot during the `wolfKill` step. Distinct
    /// from [`PlayerMessage::Action`]: resubmission overwrites the seat's
    /// prior ballot rather than being rejected as a duplicate.
    WolfVote {
        /// The voting wolf's seat.
        actor_seat: Seat,
        /// The target seat, or `None` for a "no kill" ballot (wire sentinel `-1`).
        #[serde(with = "wolf_vote_target")]
        target_seat: Option<Seat>,
    },
    /// A seated player's acknowledgement of a delivered private reveal,
    /// unblocking the flow controller's pending-ack gate.
    RevealAck {
        /// The acknowledging seat.
        actor_seat: Seat,
        /// The step whose reveal is being acknowledged.
        step_id: StepId,
    },
    /// The wolf-robot's moderator-gated acknowledgement that its viewer has
    /// seen the learned hunter-status prompt.
    WolfRobotHunterStatusViewed {
        /// The wolf-robot's seat.
        actor_seat: Seat,
    },
    /// Host-issued request to advance past a step with no further input
    /// expected (used for `groupConfirm` steps and deadline-driven skips).
    HostAdvance {
        /// The host's uid, checked against `GameState::host_uid`.
        host_uid: String,
    },
}

/// `-1` on the wire means "no kill"; any other value is a literal seat.
mod wolf_vote_target {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Seat;

    pub fn serialize<S: Serializer>(value: &Option<Seat>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(seat) => (*seat as i16).serialize(serializer),
            None => (-1i16).serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Seat>, D::Error> {
        let raw = i16::deserialize(deserializer)?;
        if raw < 0 {
            Ok(None)
        } else {
            Ok(Some(raw as Seat))
        }
    }
}

/// A private payload delivered only to the acting seat(s) after a resolved
/// identity-check or compound step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PrivateEffectPayload {
    /// An identity-check result.
    Reveal {
        /// The kind of reveal.
        reveal_kind: RevealKind,
        /// The reveal's content.
        reveal: Reveal,
    },
    /// The piper's charmed-set confirmation, delivered to every hypnotized seat.
    CharmConfirmation {
        /// The seats currently hypnotized.
        hypnotized_seats: Vec<Seat>,
    },
    /// A role's pure acknowledgement status, e.g. the spirit-knight's immunity confirmation.
    Confirm(ConfirmStatus),
}

/// One outbound event, either broadcast to the room or sent privately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundEvent {
    /// The full normalized state snapshot, broadcast on every accepted transition.
    StateUpdate {
        /// The new revision.
        revision: u64,
    },
    /// A private effect delivered to exactly one seat.
    PrivateEffect {
        /// The recipient seat.
        seat: Seat,
        /// The delivered payload.
        payload: PrivateEffectPayload,
    },
    /// The night has ended; carries the computed death list.
    NightEnded {
        /// Seats that died this night, sorted ascending.
        deaths: Vec<Seat>,
    },
    /// A role's night-one action was skipped because the role has none.
    StepSkipped {
        /// The skipped step.
        step_id: StepId,
        /// The role that was skipped.
        role_id: RoleId,
    },
}
