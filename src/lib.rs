//! Orb Flap - an endless flap-through-the-gaps arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pillars, collisions, scoring, phases)
//! - `config`: Data-driven engine tuning
//!
//! Rendering, UI overlays and raw input handling live outside this crate and
//! talk to the engine through [`sim::GameState`] commands, drained
//! [`sim::GameEvent`]s and [`sim::Snapshot`]s.

pub mod config;
pub mod sim;

pub use config::EngineConfig;

/// Default tuning constants (world units, seconds)
pub mod consts {
    /// Fixed simulation timestep used by [`crate::sim::FixedStep`] (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the fixed-step driver will accept
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration (negative = down)
    pub const GRAVITY: f32 = -25.0;
    /// Vertical velocity set by a flap (overwrites, never stacks)
    pub const FLAP_VELOCITY: f32 = 8.0;
    /// Scroll speed of the pillars toward the orb
    pub const SCROLL_SPEED: f32 = 5.0;

    /// Orb defaults - the orb never moves horizontally
    pub const ORB_X: f32 = -2.0;
    pub const ORB_START_Y: f32 = 0.0;
    pub const ORB_RADIUS: f32 = 0.5;

    /// Pillar geometry
    pub const PILLAR_WIDTH: f32 = 1.5;
    pub const PILLAR_SPACING: f32 = 6.0;
    pub const GAP_HALF_HEIGHT: f32 = 2.0;
    /// Gap centres are drawn uniformly from [-GAP_BAND/2, GAP_BAND/2]
    pub const GAP_BAND: f32 = 4.0;

    /// Pool management
    pub const INITIAL_PILLARS: usize = 5;
    pub const FIRST_PILLAR_X: f32 = 8.0;
    pub const SPAWN_LOOKAHEAD_X: f32 = 12.0;
    pub const DESPAWN_X: f32 = -15.0;
    /// Upper bound on pillars alive at once; configs needing more are rejected
    pub const MAX_LIVE_PILLARS: usize = 256;

    /// Visible world is [-HALF_WORLD_HEIGHT, HALF_WORLD_HEIGHT] (60° fov at distance 10)
    pub const HALF_WORLD_HEIGHT: f32 = 5.77;
    /// How far past the visible edge the orb may drift before the run ends
    pub const BOUNDS_MARGIN: f32 = 1.0;

    /// Renderer mesh slots for pillars
    pub const RENDER_SLOTS: usize = 10;

    /// Visual tilt per unit of vertical velocity (radians)
    pub const TILT_PER_VELOCITY: f32 = 0.05;
}
