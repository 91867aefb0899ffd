//! Deterministic night-phase runtime for a social-deduction party game.
//!
//! The engine owns one room's authoritative [`state::GameState`], derives
//! an ordered night plan from its seating ([`plan`]), and steps through it
//! message by message via [`controller::NightFlowController`], with all
//! randomness, timing, and delivery pushed out through the [`ports`]
//! traits.

#![cfg_attr(test, deny(warnings))]
#![warn(trivial_casts)]
#![deny(missing_docs)]
#![forbid(unused, unused_extern_crates, unused_import_braces)]

pub mod catalog;
pub mod controller;
pub mod death;
pub mod engine;
pub mod error;
pub mod plan;
pub mod ports;
pub mod progression;
pub mod protocol;
pub mod reducer;
pub mod resolver;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod util;
pub mod validator;

pub use engine::Engine;
pub use error::EngineError;
pub use state::GameState;
