//! External collaborator ports.
//!
//! Mirrors the `Player`/`Handler` trait pair's shape: the game core never
//! owns a clock, an RNG, or a socket directly, it calls out through a
//! small trait an embedder implements. Kept synchronous rather than async:
//! suspension is a state predicate (`pending_reveal_acks`,
//! `is_audio_playing`), not a future to `.await`.

use crate::protocol::OutboundEvent;
use crate::types::{Seat, Timestamp};

/// Supplies the current time. Injected so tests can hold time still.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> Timestamp;
}

/// Supplies randomness. Injected so tests can make probabilistic outcomes
/// deterministic (the drunk-seer's check in particular).
pub trait Random {
    /// A uniform value in `[0.0, 1.0)`.
    fn unit(&mut self) -> f64;

    /// A uniformly chosen index in `[0, len)`. Panics if `len == 0`.
    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f64) as usize).min(len - 1)
    }
}

/// Delivers a payload visible only to one seat.
pub trait PrivateSink {
    /// Sends `event` to `seat` alone.
    fn send_private(&mut self, seat: Seat, event: OutboundEvent);
}

/// Delivers a payload visible to every seat in the room.
pub trait Broadcast {
    /// Sends `event` to every seated player.
    fn broadcast(&mut self, event: OutboundEvent);
}

/// Default [`Clock`] backed by the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock is after the Unix epoch")
            .as_millis() as Timestamp
    }
}

/// Default [`Random`] backed by [`rand::thread_rng`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRandom;

impl Random for StdRandom {
    fn unit(&mut self) -> f64 {
        rand::Rng::gen(&mut rand::thread_rng())
    }
}

/// Fakes for deterministic tests. Kept in the library (not behind `#[cfg(test)]`)
/// so downstream embedders can use the same fakes in their own integration tests,
/// the way `player::cli`/`handler::cli` sit alongside their trait definitions
/// rather than being hidden reference implementations.
pub mod test_support {
    use std::cell::Cell;

    use super::*;

    /// A [`Clock`] that only advances when told to.
    #[derive(Debug, Default)]
    pub struct FakeClock {
        now: Cell<Timestamp>,
    }

    impl FakeClock {
        /// Creates a clock starting at `now`.
        pub fn new(now: Timestamp) -> FakeClock {
            FakeClock { now: Cell::new(now) }
        }

        /// Advances the clock by `millis`.
        pub fn advance(&self, millis: Timestamp) {
            self.now.set(self.now.get() + millis);
        }
    }

    impl Clock for FakeClock {
        fn now_millis(&self) -> Timestamp {
            self.now.get()
        }
    }

    /// A [`Random`] that replays a fixed sequence of unit values, looping.
    #[derive(Debug, Clone)]
    pub struct FakeRandom {
        values: Vec<f64>,
        cursor: usize,
    }

    impl FakeRandom {
        /// Creates a generator that replays `values` in order, looping once exhausted.
        pub fn new(values: Vec<f64>) -> FakeRandom {
            assert!(!values.is_empty(), "FakeRandom needs at least one value to replay");
            FakeRandom { values, cursor: 0 }
        }
    }

    impl Random for FakeRandom {
        fn unit(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }

    /// A [`PrivateSink`] and [`Broadcast`] that records every event it receives,
    /// for assertions in scenario tests.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        /// Events sent privately, in send order.
        pub private: Vec<(Seat, OutboundEvent)>,
        /// Events broadcast to the room, in send order.
        pub broadcast: Vec<OutboundEvent>,
    }

    impl PrivateSink for RecordingSink {
        fn send_private(&mut self, seat: Seat, event: OutboundEvent) {
            self.private.push((seat, event));
        }
    }

    impl Broadcast for RecordingSink {
        fn broadcast(&mut self, event: OutboundEvent) {
            self.broadcast.push(event);
        }
    }
}
