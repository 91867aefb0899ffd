//! The top-level owned-state entry point.
//!
//! Grounded on `game.rs::Game`: one struct owning the mutable world plus
//! its injected collaborators, exposing a small constructor plus a
//! handful of methods an embedder calls in response to its own I/O loop.
//! Unlike `Game`, which runs a whole game to completion
//! inside `run`, `Engine` exposes one step at a time — message handling
//! and ticking are driven by the embedder, in a single-threaded
//! cooperative model with no internal task or thread of its own.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::error::EngineError;
use crate::plan::PlanError;
use crate::ports::{Broadcast, Clock, PrivateSink, Random};
use crate::progression::ProcessedTracker;
use crate::protocol::{OutboundEvent, PlayerMessage};
use crate::snapshot::{self, BroadcastGameState};
use crate::state::{GameState, Player};
use crate::types::Seat;
use crate::controller::NightFlowController;

/// Owns one room's authoritative state together with its night plan and
/// injected ports.
pub struct Engine<C, R, P, B>
where
    C: Clock,
    R: Random,
    P: PrivateSink,
    B: Broadcast,
{
    state: GameState,
    controller: NightFlowController,
    advance_tracker: ProcessedTracker,
    clock: C,
    random: R,
    private_sink: P,
    broadcast: B,
}

impl<C, R, P, B> Engine<C, R, P, B>
where
    C: Clock,
    R: Random,
    P: PrivateSink,
    B: Broadcast,
{
    /// Builds a new engine for a seated room. Fails if the seating assigns
    /// the same role to more than one seat.
    pub fn new(
        room_code: String,
        host_uid: String,
        players: BTreeMap<Seat, Player>,
        clock: C,
        random: R,
        private_sink: P,
        broadcast: B,
    ) -> Result<Engine<C, R, P, B>, PlanError> {
        let controller = NightFlowController::new(&players)?;
        let state = GameState::new(room_code, host_uid, players);
        Ok(Engine { state, controller, advance_tracker: ProcessedTracker::new(), clock, random, private_sink, broadcast })
    }

    /// The current authoritative state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The canonical, string-keyed snapshot suitable for a room-wide broadcast.
    pub fn snapshot(&self) -> BroadcastGameState {
        snapshot::normalize(&self.state)
    }

    /// Resets per-night scratch and opens the night for play.
    #[instrument(skip(self), fields(room = %self.state.room_code))]
    pub fn start_night(&mut self) {
        self.state = self.controller.start_night(self.state.clone());
        info!(revision = self.state.revision, "night started");
    }

    /// Validates and applies one inbound message, broadcasting the new
    /// revision on success. On rejection the state is left untouched.
    #[instrument(skip(self, msg), fields(room = %self.state.room_code))]
    pub fn apply_message(&mut self, msg: &PlayerMessage) -> Result<(), EngineError> {
        let new_state =
            self.controller.apply_message(self.state.clone(), msg, &mut self.random, &mut self.private_sink)?;
        self.state = new_state;
        self.broadcast.broadcast(OutboundEvent::StateUpdate { revision: self.state.revision });
        debug!(revision = self.state.revision, "message applied");
        Ok(())
    }

    /// Sets whether a blocking audio cue is currently playing. The host
    /// transport layer calls this as playback starts and finishes; the
    /// flow parks at its current step for as long as it is set, regardless
    /// of whether the step itself is otherwise complete.
    #[instrument(skip(self), fields(room = %self.state.room_code))]
    pub fn set_audio_playing(&mut self, playing: bool) {
        let before_revision = self.state.revision;
        self.state = self.controller.set_audio_playing(self.state.clone(), playing);
        if self.state.revision != before_revision {
            self.broadcast.broadcast(OutboundEvent::StateUpdate { revision: self.state.revision });
            debug!(revision = self.state.revision, playing, "audio gate toggled");
        }
    }

    /// Advances the flow by one tick and broadcasts if anything changed.
    /// `caller_uid` identifies who is asking; only the room's host can
    /// actually drive the flow forward.
    #[instrument(skip(self), fields(room = %self.state.room_code))]
    pub fn advance(&mut self, caller_uid: &str) -> Result<(), EngineError> {
        let now = self.clock.now_millis();
        let before_revision = self.state.revision;
        self.state =
            self.controller.advance(self.state.clone(), now, caller_uid, &mut self.advance_tracker, &mut self.private_sink)?;
        if self.state.revision != before_revision {
            self.broadcast.broadcast(OutboundEvent::StateUpdate { revision: self.state.revision });
            if self.state.current_step_id.is_none() {
                self.broadcast.broadcast(OutboundEvent::NightEnded { deaths: self.state.last_night_deaths.clone() });
            }
            info!(revision = self.state.revision, "flow advanced");
        }
        Ok(())
    }
}
