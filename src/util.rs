//! Small seating helpers shared by the CLI moderator and test fixtures.
//!
//! Grounded on `util::QwwIteratorExt::rand`: a couple of tiny extension
//! helpers layered over the injected RNG rather than reaching for
//! `rand::thread_rng()` directly from call sites, so the same code runs
//! under `ports::test_support::FakeRandom` in tests.

use itertools::Itertools;

use crate::ports::Random;
use crate::state::Player;
use crate::types::{RoleId, Seat};

/// Picks a uniformly random element of `slice` through the given RNG.
/// Panics if `slice` is empty.
pub fn pick<'a, T>(slice: &'a [T], rng: &mut dyn Random) -> &'a T {
    &slice[rng.index(slice.len())]
}

/// Shuffles `roles` in place via a Fisher-Yates pass driven by the
/// injected RNG, the modern `rand::seq::SliceRandom` equivalent of a
/// stale direct `thread_rng().shuffle` call.
pub fn shuffle_roles(roles: &mut [RoleId], rng: &mut dyn Random) {
    for i in (1..roles.len()).rev() {
        let j = rng.index(i + 1);
        roles.swap(i, j);
    }
}

/// Builds a seating from parallel uid/display-name lists and a role list
/// of the same length, assigning seats in list order. Returns `None` if
/// any two uids collide, the way `Game::new` rejects a signup list with a
/// duplicate name before ever building a `Universe`.
pub fn build_seating(uids: &[String], display_names: &[String], roles: &[RoleId]) -> Option<std::collections::BTreeMap<Seat, Player>> {
    if uids.len() != display_names.len() || uids.len() != roles.len() {
        return None;
    }
    if !uids.iter().all_unique() {
        return None;
    }
    Some(
        uids.iter()
            .zip(display_names)
            .zip(roles)
            .enumerate()
            .map(|(i, ((uid, display_name), role))| {
                let seat = i as Seat;
                (seat, Player { seat, uid: uid.clone(), display_name: display_name.clone(), role: Some(*role), alive: true })
            })
            .collect(),
    )
}
