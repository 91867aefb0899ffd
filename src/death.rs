//! Death Calculator.
//!
//! Pure, total function from one night's resolved scratch to the sorted
//! list of seats that died, applying the precedence rules in a fixed
//! order. Grounded on `game/types.rs::{Faction::wincon, Universe::game_over}`:
//! a snapshot goes in, a small closed-form answer comes out, with no
//! mutation and no further input needed.

use std::collections::BTreeSet;

use crate::state::GameState;
use crate::types::{RoleId, Seat, StepId};

/// Computes the night's deaths from `state.current_night_results` and the
/// seating, applying these rules in order:
///
/// 1. The wolf kill's target is `None` if the nightmare disabled it, else
///    the tallied wolf-vote winner.
/// 2. A guarded target is spared from the wolf kill.
/// 3. A saved target (witch) is spared from the wolf kill.
/// 4. The witch's poison kills its target outright, unless that target is
///    the spirit-knight (who reflects it back onto the witch) or the witch
///    herself, who is immune to her own poison.
/// 5. If the seer's check this night targeted the spirit-knight, the seer
///    dies; the spirit-knight itself is immune to both reflections.
/// 6. Linked fates (dreamcatcher, wolf-queen, celebrity) propagate: if
///    either half of a link dies, so does the other.
/// 7. The magician's swap exchanges whichever of its two seats was due to
///    die for the other.
/// 8. Only currently alive seats can appear in the result.
pub fn calculate_deaths(state: &GameState) -> Vec<Seat> {
    let results = &state.current_night_results;
    let mut deaths: BTreeSet<Seat> = BTreeSet::new();

    let wolf_kill_target = if results.wolf_kill_disabled { None } else { results.wolf_kill_target };
    if let Some(target) = wolf_kill_target {
        let guarded = results.guarded_seat == Some(target);
        let saved = results.saved_seat == Some(target);
        // Death(k) iff not (guarded XOR saved): neither, or both ("same-guard-same-save"), dies.
        if guarded == saved {
            deaths.insert(target);
        }
    }

    if let Some(poisoned) = results.poisoned_seat {
        match state.role_of(poisoned) {
            Some(RoleId::SpiritKnight) => {
                if let Some(witch_seat) = seat_with_role(state, RoleId::Witch) {
                    deaths.insert(witch_seat);
                }
            }
            Some(RoleId::Witch) => {} // the witcher is immune to her own poison
            _ => {
                deaths.insert(poisoned);
            }
        }
    }

    if let Some(action) = state.action_for(StepId::SeerCheck) {
        if let Some(target) = action.target_seat {
            if state.role_of(target) == Some(RoleId::SpiritKnight) {
                if let Some(seer_seat) = seat_with_role(state, RoleId::Seer) {
                    deaths.insert(seer_seat);
                }
            }
        }
    }

    let links: Vec<(Option<Seat>, Option<Seat>)> = vec![
        (seat_with_role(state, RoleId::Dreamcatcher), results.dreamcatcher_dream_seat),
        (seat_with_role(state, RoleId::WolfQueen), results.wolf_queen_charm_seat),
        (seat_with_role(state, RoleId::Celebrity), results.celebrity_dream_seat),
    ];
    let mut changed = true;
    while changed {
        changed = false;
        for (a, b) in links.iter().copied() {
            if let (Some(a), Some(b)) = (a, b) {
                let a_dies = deaths.contains(&a);
                let b_dies = deaths.contains(&b);
                if a_dies && !b_dies {
                    deaths.insert(b);
                    changed = true;
                } else if b_dies && !a_dies {
                    deaths.insert(a);
                    changed = true;
                }
            }
        }
    }

    if let Some((a, b)) = results.swapped_seats {
        let a_dies = deaths.contains(&a);
        let b_dies = deaths.contains(&b);
        if a_dies != b_dies {
            deaths.remove(&a);
            deaths.remove(&b);
            if a_dies {
                deaths.insert(b);
            } else {
                deaths.insert(a);
            }
        }
    }

    deaths.into_iter().filter(|&seat| state.is_alive(seat)).collect()
}

fn seat_with_role(state: &GameState, role: RoleId) -> Option<Seat> {
    state.players.values().find(|p| p.role == Some(role)).map(|p| p.seat)
}
