//! Role Catalog & Schema Registry.
//!
//! Single source of truth for which roles exist, their team, wolf-meeting
//! behavior, and per-step schema/constraint bindings. Every query here is a
//! pure `match` over a closed enum, the way
//! `Role::default_faction`/`FromStr`/`Display` are: no runtime table
//! construction, no `HashMap` lookup for data this small and this static.

use crate::types::{Constraint, RevealKind, RoleId, SchemaKind, StepId, Team, WolfMeeting};

/// Metadata for a single role. Returned by value since it is a handful of
/// small `Copy` fields.
pub fn meta(role: RoleId) -> RoleMeta {
    use RoleId::*;
    let (team, wolf_meeting, has_night1_action, immune_to_wolf_kill, disguisable, hunter_gated_on_learn) = match role {
        Villager => (Team::Good, None, false, false, true, false),
        Wolf => (Team::Wolf, Some(WolfMeeting { can_see_wolves: true, participates_in_wolf_vote: true }), true, false, true, false),
        Nightmare => (Team::Wolf, Some(WolfMeeting { can_see_wolves: true, participates_in_wolf_vote: false }), true, false, true, false),
        Guard => (Team::Good, None, true, false, true, false),
        Witch => (Team::Good, None, true, false, true, false),
        Seer => (Team::Good, None, true, false, true, false),
        Hunter => (Team::Good, None, false, false, true, true),
        Magician => (Team::Good, None, true, false, true, false),
        Dreamcatcher => (Team::Good, None, true, false, true, false),
        WolfQueen => (Team::Wolf, Some(WolfMeeting { can_see_wolves: true, participates_in_wolf_vote: false }), true, false, true, false),
        Celebrity => (Team::Good, None, true, false, true, false),
        SpiritKnight => (Team::Good, None, true, true, false, false),
        WolfRobot => (Team::Wolf, Some(WolfMeeting { can_see_wolves: true, participates_in_wolf_vote: false }), true, false, true, false),
        Gargoyle => (Team::Good, None, true, false, true, false),
        Psychic => (Team::Good, None, true, false, true, false),
        MirrorSeer => (Team::Good, None, true, false, true, false),
        DrunkSeer => (Team::Good, None, true, false, true, false),
        PureWhite => (Team::Good, None, true, false, true, false),
        WolfWitch => (Team::Wolf, Some(WolfMeeting { can_see_wolves: true, participates_in_wolf_vote: false }), true, false, true, false),
        Piper => (Team::Good, None, true, false, true, false),
    };
    RoleMeta { role, team, wolf_meeting, has_night1_action, immune_to_wolf_kill, disguisable, hunter_gated_on_learn }
}

pub use crate::types::RoleMeta;

/// The role's faction.
pub fn team_of(role: RoleId) -> Team {
    meta(role).team
}

/// Whether this role casts a ballot during the `wolfKill` step.
pub fn does_role_participate_in_wolf_vote(role: RoleId) -> bool {
    meta(role).wolf_meeting.map_or(false, |w| w.participates_in_wolf_vote)
}

/// Whether this role can see the wolf roster (informational; the core does
/// not itself broadcast the roster, that is a transport/UI concern, but the
/// flag is part of the catalog's metadata per the data model).
pub fn can_see_wolves(role: RoleId) -> bool {
    meta(role).wolf_meeting.map_or(false, |w| w.can_see_wolves)
}

/// Whether this role is immune to the wolf kill.
pub fn is_immune_to_wolf_kill(role: RoleId) -> bool {
    meta(role).immune_to_wolf_kill
}

/// The role bound to a given step.
pub fn role_of_step(step: StepId) -> RoleId {
    use StepId::*;
    match step {
        NightmareBlock => RoleId::Nightmare,
        GuardProtect => RoleId::Guard,
        DreamcatcherDream => RoleId::Dreamcatcher,
        WolfQueenCharm => RoleId::WolfQueen,
        WolfKill => RoleId::Wolf,
        WolfRobotLearn => RoleId::WolfRobot,
        WitchAction => RoleId::Witch,
        CelebrityDream => RoleId::Celebrity,
        MagicianSwap => RoleId::Magician,
        WolfWitchCheck => RoleId::WolfWitch,
        SeerCheck => RoleId::Seer,
        GargoyleCheck => RoleId::Gargoyle,
        PsychicCheck => RoleId::Psychic,
        MirrorSeerCheck => RoleId::MirrorSeer,
        DrunkSeerCheck => RoleId::DrunkSeer,
        PureWhiteCheck => RoleId::PureWhite,
        PiperHypnotize | PiperCharmReveal => RoleId::Piper,
        SpiritKnightConfirm => RoleId::SpiritKnight,
    }
}

/// The payload schema a given step requires.
pub fn schema_for(step: StepId) -> SchemaKind {
    use StepId::*;
    match step {
        NightmareBlock | GuardProtect | DreamcatcherDream | WolfQueenCharm | WolfRobotLearn
        | CelebrityDream | WolfWitchCheck | SeerCheck | GargoyleCheck | PsychicCheck
        | MirrorSeerCheck | DrunkSeerCheck | PureWhiteCheck => SchemaKind::ChooseSeat,
        WolfKill => SchemaKind::WolfVote,
        WitchAction => SchemaKind::Compound,
        MagicianSwap => SchemaKind::Swap,
        PiperHypnotize => SchemaKind::MultiChooseSeat,
        PiperCharmReveal => SchemaKind::GroupConfirm,
        SpiritKnightConfirm => SchemaKind::Confirm,
    }
}

/// The constraint tokens a step's target(s) must satisfy, interpreted
/// uniformly by the validator.
pub fn constraints_for(step: StepId) -> &'static [Constraint] {
    use Constraint::*;
    use StepId::*;
    match step {
        NightmareBlock | GuardProtect => &[AliveTarget],
        DreamcatcherDream | WolfQueenCharm | CelebrityDream => &[AliveTarget, NotSelf],
        WolfRobotLearn => &[AliveTarget, NotSelf],
        WolfKill => &[AliveTarget, WolfTeamOnly, NotImmuneToCheck],
        WolfWitchCheck => &[AliveTarget],
        SeerCheck | GargoyleCheck | PsychicCheck | MirrorSeerCheck | DrunkSeerCheck | PureWhiteCheck => {
            &[AliveTarget, NotSelf]
        }
        PiperHypnotize => &[AliveTarget, NotSelf],
        WitchAction | MagicianSwap | PiperCharmReveal | SpiritKnightConfirm => &[],
    }
}

/// The reveal kind emitted by an identity-check step, if any.
pub fn reveal_kind_for(step: StepId) -> Option<RevealKind> {
    use StepId::*;
    match step {
        SeerCheck => Some(RevealKind::SeerReveal),
        MirrorSeerCheck => Some(RevealKind::MirrorSeerReveal),
        DrunkSeerCheck => Some(RevealKind::DrunkSeerReveal),
        GargoyleCheck => Some(RevealKind::GargoyleReveal),
        PsychicCheck => Some(RevealKind::PsychicReveal),
        WolfRobotLearn => Some(RevealKind::WolfRobotReveal),
        PureWhiteCheck => Some(RevealKind::PureWhiteReveal),
        WolfWitchCheck => Some(RevealKind::WolfWitchReveal),
        _ => None,
    }
}

/// The fixed priority used to order the night plan. Lower runs first.
///
/// Encodes the ordering rule: blockers before the blocked, protection
/// before damage, wolf tally before post-wolf auditors, identity swap
/// before identity checks. See `DESIGN.md` for the celebrity/magician
/// ordering decision.
pub fn priority(step: StepId) -> u32 {
    use StepId::*;
    match step {
        NightmareBlock => 0,
        GuardProtect => 10,
        PiperHypnotize => 15,
        PiperCharmReveal => 16,
        DreamcatcherDream => 20,
        WolfQueenCharm => 30,
        WolfKill => 40,
        WolfRobotLearn => 50,
        WitchAction => 60,
        CelebrityDream => 70,
        MagicianSwap => 80,
        WolfWitchCheck => 90,
        SeerCheck => 100,
        GargoyleCheck => 110,
        PsychicCheck => 120,
        MirrorSeerCheck => 130,
        DrunkSeerCheck => 140,
        PureWhiteCheck => 150,
        SpiritKnightConfirm => 160,
    }
}

/// Fixed threshold for the drunk-seer's probabilistic reveal (Open Question
/// decision, see `DESIGN.md`): correct with probability one half.
pub const DRUNK_SEER_THRESHOLD: f64 = 0.5;
