//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (pillars sorted by x, IDs ascending)
//! - No rendering, input or platform dependencies

pub mod collision;
pub mod pillars;
pub mod slots;
pub mod state;
pub mod tick;

pub use collision::{check_collision, has_passed, orb_pillar_collision, out_of_bounds};
pub use pillars::{PillarPool, spawn_pillar};
pub use slots::{PillarInstance, RenderSlots};
pub use state::{
    EndCause, GameEvent, GamePhase, GameState, Orb, OrbSnapshot, Pillar, PillarSnapshot, Snapshot,
};
pub use tick::{FixedStep, TickInput, autopilot_wants_flap, tick};
