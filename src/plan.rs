//! Night Plan Builder.
//!
//! From a seated template, derives the ordered, immutable list of
//! [`NightStep`]s for one night. Shaped after `Signups::start`, which
//! likewise derives one concrete ordered `Vec<Role>` up front from the
//! signup roster, before the game loop ever runs.

use std::collections::BTreeMap;

use crate::catalog;
use crate::state::Player;
use crate::types::{Constraint, RoleId, SchemaKind, Seat, StepId};

/// One step of the frozen night plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightStep {
    /// Identifies this step within the plan.
    pub step_id: StepId,
    /// The role this step belongs to.
    pub role_id: RoleId,
    /// The payload shape this step's action must satisfy.
    pub schema: SchemaKind,
    /// Constraint tokens applied to the step's target(s).
    pub constraints: &'static [Constraint],
}

/// Every step the catalog knows about, in the `StepId` declaration order.
/// `build_plan` filters this down to the steps whose role is present in the
/// seating, then sorts by [`catalog::priority`].
const ALL_STEPS: &[StepId] = &[
    StepId::NightmareBlock,
    StepId::GuardProtect,
    StepId::PiperHypnotize,
    StepId::PiperCharmReveal,
    StepId::DreamcatcherDream,
    StepId::WolfQueenCharm,
    StepId::WolfKill,
    StepId::WolfRobotLearn,
    StepId::WitchAction,
    StepId::CelebrityDream,
    StepId::MagicianSwap,
    StepId::WolfWitchCheck,
    StepId::SeerCheck,
    StepId::GargoyleCheck,
    StepId::PsychicCheck,
    StepId::MirrorSeerCheck,
    StepId::DrunkSeerCheck,
    StepId::PureWhiteCheck,
    StepId::SpiritKnightConfirm,
];

/// Errors building a night plan from a seating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Two seats were assigned the same role where the catalog requires a singleton
    /// (every role in this engine is a singleton per seating).
    #[error("role {role:?} is assigned to more than one seat: {seats:?}")]
    DuplicateRole { role: RoleId, seats: Vec<Seat> },
}

/// Derives the ordered night plan for the given seating. A role present on
/// more than one living or dead seat is the only rejected shape; the plan
/// simply omits any role absent from the seating, ordered by
/// [`catalog::priority`].
pub fn build_plan(players: &BTreeMap<Seat, Player>) -> Result<Vec<NightStep>, PlanError> {
    let mut seats_by_role: BTreeMap<RoleId, Vec<Seat>> = BTreeMap::new();
    for player in players.values() {
        if let Some(role) = player.role {
            seats_by_role.entry(role).or_default().push(player.seat);
        }
    }
    // `seats_by_role` is a `BTreeMap`, so this scan is deterministic when several roles collide at once.
    if let Some((role, seats)) = seats_by_role.iter().find(|(_, seats)| seats.len() > 1) {
        return Err(PlanError::DuplicateRole { role: *role, seats: seats.clone() });
    }

    let mut steps: Vec<NightStep> = ALL_STEPS
        .iter()
        .copied()
        .filter(|&step| seats_by_role.contains_key(&catalog::role_of_step(step)))
        .map(|step| NightStep {
            step_id: step,
            role_id: catalog::role_of_step(step),
            schema: catalog::schema_for(step),
            constraints: catalog::constraints_for(step),
        })
        .collect();
    steps.sort_by_key(|s| catalog::priority(s.step_id));
    Ok(steps)
}
