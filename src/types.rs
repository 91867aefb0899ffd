//! Fundamental types shared across the engine's components.
//!
//! Mirrors the shape of `game/types.rs`: small closed enums with
//! `match`-based metadata, kept together so every other module can
//! `use types::*;` instead of juggling imports from ten places.

use serde::{Deserialize, Serialize};

/// A seat number. Seats are small (at most a few dozen), so `u8` suffices.
pub type Seat = u8;

/// A monotonically increasing state revision. Strictly increases on every
/// accepted reducer application (invariant from the data model).
pub type Revision = u64;

/// Milliseconds since the Unix epoch, as returned by a [`crate::ports::Clock`].
pub type Timestamp = u64;

/// The faction a role belongs to. Determines wolf-kill participation and
/// the team label shown by seer-family identity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Wins when every wolf-team seat is dead.
    Good,
    /// Wins when no good-team seat survives the game.
    Wolf,
}

impl Team {
    /// The team label shown to a seer-family identity check.
    pub fn chinese_label(&self) -> &'static str {
        match self {
            Team::Good => "好人",
            Team::Wolf => "狼人",
        }
    }

    /// The opposite team, used by the mirror-seer (which always inverts).
    pub fn inverted(&self) -> Team {
        match self {
            Team::Good => Team::Wolf,
            Team::Wolf => Team::Good,
        }
    }
}

/// Closed enumeration of role identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleId {
    /// No night action, good team.
    Villager,
    /// Wolf-team rank and file; participates in the nightly wolf vote.
    Wolf,
    /// Blocks one seat's night action each night.
    Nightmare,
    /// Protects one seat from the wolf kill each night.
    Guard,
    /// Has one save and one poison potion across the whole game.
    Witch,
    /// Checks a seat's team each night.
    Seer,
    /// No night action; relevant only to day-phase triggers (out of scope here).
    Hunter,
    /// Swaps two seats' roles for identity-check purposes.
    Magician,
    /// Links its own fate to a chosen seat.
    Dreamcatcher,
    /// Charms a seat; their fates become linked.
    WolfQueen,
    /// Dreams of a seat; their fates become linked.
    Celebrity,
    /// Reflects seer checks and witch poison back onto their source.
    SpiritKnight,
    /// Learns and can disguise as another seat's role after checking them.
    WolfRobot,
    /// Checks a seat's exact role each night.
    Gargoyle,
    /// Checks a seat's exact role each night.
    Psychic,
    /// Checks a seat's team each night, always inverted.
    MirrorSeer,
    /// Checks a seat's team each night, correct with probability one half.
    DrunkSeer,
    /// Checks a seat's exact role each night.
    PureWhite,
    /// Wolf-team role with its own exact-role check each night.
    WolfWitch,
    /// Hypnotizes a set of seats each night.
    Piper,
}

/// Metadata describing how a role participates in the wolf meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WolfMeeting {
    /// Whether this role can see who the other wolves are.
    pub can_see_wolves: bool,
    /// Whether this role casts a ballot during the `wolfKill` step.
    pub participates_in_wolf_vote: bool,
}

/// Per-role metadata, as exposed by [`crate::catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMeta {
    /// The role this metadata describes.
    pub role: RoleId,
    /// The role's faction.
    pub team: Team,
    /// Wolf-meeting participation, or `None` for roles outside the wolf team's meeting.
    pub wolf_meeting: Option<WolfMeeting>,
    /// Whether this role has a night-one action at all.
    pub has_night1_action: bool,
    /// Whether this role is immune to the wolf kill.
    pub immune_to_wolf_kill: bool,
    /// Whether this role can be disguised as (wolf-robot target).
    pub disguisable: bool,
    /// Whether learning this role (wolf-robot) gates flow on a viewer ack.
    pub hunter_gated_on_learn: bool,
}

/// The payload shape governing a step's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
    /// One target or skip.
    ChooseSeat,
    /// The wolf leader submits the tallied target; ballots arrive separately.
    WolfVote,
    /// Multiple named sub-results (witch save + poison).
    Compound,
    /// An ordered pair of distinct seats, or empty for skip.
    Swap,
    /// Pure acknowledgement, no payload.
    Confirm,
    /// A set of seats.
    MultiChooseSeat,
    /// Auto-completes; no player input required.
    GroupConfirm,
}

/// One step of the frozen night plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    /// Nightmare blocks a seat's action.
    NightmareBlock,
    /// Guard protects a seat.
    GuardProtect,
    /// Dreamcatcher links its fate to a seat.
    DreamcatcherDream,
    /// Wolf-queen charms a seat.
    WolfQueenCharm,
    /// The wolf pack's kill vote.
    WolfKill,
    /// Wolf-robot learns (and may later disguise as) a seat's role.
    WolfRobotLearn,
    /// Witch's save/poison compound action.
    WitchAction,
    /// Celebrity dreams of a seat.
    CelebrityDream,
    /// Magician swaps two seats' identities for checks.
    MagicianSwap,
    /// Wolf-witch's exact-role check.
    WolfWitchCheck,
    /// Seer's team check.
    SeerCheck,
    /// Gargoyle's exact-role check.
    GargoyleCheck,
    /// Psychic's exact-role check.
    PsychicCheck,
    /// Mirror-seer's inverted team check.
    MirrorSeerCheck,
    /// Drunk-seer's probabilistic team check.
    DrunkSeerCheck,
    /// Pure-white's exact-role check.
    PureWhiteCheck,
    /// Piper hypnotizes a set of seats.
    PiperHypnotize,
    /// Auto-completing reveal of charmed status to the hypnotized set.
    PiperCharmReveal,
    /// Spirit-knight's pure acknowledgement (no action, immune by nature).
    SpiritKnightConfirm,
}

/// A constraint token attached to a `chooseSeat`-kind schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// The target must not be the acting seat.
    NotSelf,
    /// The target must be alive.
    AliveTarget,
    /// The acting seat must be a wolf-vote participant (wolf-kill family only).
    WolfTeamOnly,
    /// The target must not be immune to the wolf kill (wolf-kill family only).
    NotImmuneToCheck,
}

/// The kind of private reveal delivered to an acting seat after an identity-check step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevealKind {
    /// Seer's team reveal.
    SeerReveal,
    /// Mirror-seer's inverted team reveal.
    MirrorSeerReveal,
    /// Drunk-seer's probabilistic team reveal.
    DrunkSeerReveal,
    /// Gargoyle's exact-role reveal.
    GargoyleReveal,
    /// Psychic's exact-role reveal.
    PsychicReveal,
    /// Wolf-robot's learned-role reveal.
    WolfRobotReveal,
    /// Pure-white's exact-role reveal.
    PureWhiteReveal,
    /// Wolf-witch's exact-role reveal.
    WolfWitchReveal,
}

/// The result of an identity check: either a team label (seer family) or an exact role
/// (gargoyle/psychic/pure-white/wolf-witch family).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RevealResult {
    /// A team label in the game's in-universe language (`Team::chinese_label`),
    /// e.g. from the seer or mirror-seer.
    Team(String),
    /// An exact role id, e.g. from the gargoyle or psychic.
    Role(RoleId),
}
