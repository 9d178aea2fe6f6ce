//! Game state and core simulation types
//!
//! The engine owns the orb, the pillar pool and the session phase. Outside
//! code drives it only through [`GameState::start`], [`GameState::flap`] and
//! [`GameState::tick`], and observes it through events and snapshots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pillars::PillarPool;
use crate::config::EngineConfig;
use crate::consts::TILT_PER_VELOCITY;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first run, nothing simulates
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, state frozen until the next start
    Ended,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Orb left the visible world (above or below)
    OutOfBounds,
    /// Orb touched a pillar outside its gap
    HitPillar { pillar_id: u32 },
}

/// Notifications for the UI, drained with [`GameState::drain_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score went up by one
    ScoreChanged { score: u32 },
    /// Fired exactly once per run
    Ended {
        final_score: u32,
        best_score: u32,
        cause: EndCause,
    },
}

/// The player-controlled orb
///
/// `pos.x` is fixed for the whole run; the world scrolls past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec2,
    pub vel_y: f32,
    pub radius: f32,
}

impl Orb {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            pos: Vec2::new(config.orb_x, config.orb_start_y),
            vel_y: 0.0,
            radius: config.orb_radius,
        }
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
    }

    /// Overwrite vertical velocity (repeated flaps never stack)
    pub fn flap(&mut self, flap_velocity: f32) {
        self.vel_y = flap_velocity;
    }

    /// Target visual tilt in radians, for renderers
    #[inline]
    pub fn tilt(&self) -> f32 {
        self.vel_y * TILT_PER_VELOCITY
    }
}

/// A pillar pair with a gap the orb must fly through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: u32,
    /// Horizontal centre, decreases every tick
    pub x: f32,
    /// Gap centre, fixed at spawn
    pub gap_y: f32,
    pub gap_half_height: f32,
    pub width: f32,
    /// Set once the pillar is fully behind the orb
    pub passed: bool,
}

impl Pillar {
    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    /// Trailing edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_y + self.gap_half_height
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y - self.gap_half_height
    }
}

/// Orb data a renderer needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbSnapshot {
    pub y: f32,
    pub vel_y: f32,
    pub tilt: f32,
}

/// Pillar data a renderer needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarSnapshot {
    pub id: u32,
    pub x: f32,
    pub gap_y: f32,
}

/// Read-only view of the engine for rendering/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub orb: OrbSnapshot,
    /// Ordered by x, nearest first
    pub pillars: Vec<PillarSnapshot>,
}

/// Complete engine state
///
/// Generic over the random source so tests can inject a seeded one;
/// production code uses [`GameState::new`] with a [`Pcg32`].
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub(crate) config: EngineConfig,
    pub(crate) rng: R,
    pub(crate) phase: GamePhase,
    pub(crate) score: u32,
    /// Best score of this engine instance (process lifetime only)
    pub(crate) best_score: u32,
    pub(crate) orb: Orb,
    pub(crate) pool: PillarPool,
    pub(crate) events: Vec<GameEvent>,
    /// Runs started so far
    pub(crate) runs: u32,
    /// Simulated seconds of the current run
    pub(crate) elapsed: f32,
}

impl GameState<Pcg32> {
    /// Create an idle engine with a seeded PCG random source
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create an idle engine with the given random source
    ///
    /// Configs built in code skip [`EngineConfig::load`], so they are checked
    /// here too. A failing config is still used; the pillar pool stays capped.
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("Engine config failed validation: {err:#}");
        }
        Self {
            orb: Orb::new(&config),
            config,
            rng,
            phase: GamePhase::Idle,
            score: 0,
            best_score: 0,
            pool: PillarPool::default(),
            events: Vec::new(),
            runs: 0,
            elapsed: 0.0,
        }
    }

    /// Begin a run (Idle -> Running, or restart Ended -> Running)
    ///
    /// Ignored while a run is in progress.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            return;
        }

        self.score = 0;
        self.elapsed = 0.0;
        self.orb = Orb::new(&self.config);
        self.pool.reset(&self.config, &mut self.rng);
        self.runs += 1;
        self.phase = GamePhase::Running;

        log::info!(
            "Run {} started with {} pillars (best so far: {})",
            self.runs,
            self.pool.len(),
            self.best_score
        );
    }

    /// Apply an upward impulse; no-op unless running
    pub fn flap(&mut self) {
        if self.phase == GamePhase::Running {
            self.orb.flap(self.config.flap_velocity);
        }
    }

    /// Count one pass event
    pub(crate) fn award_pass(&mut self) {
        self.score += 1;
        log::debug!("Score: {}", self.score);
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Running -> Ended; the only way a run stops
    pub(crate) fn end(&mut self, cause: EndCause) {
        debug_assert_eq!(self.phase, GamePhase::Running);
        self.phase = GamePhase::Ended;
        self.best_score = self.best_score.max(self.score);
        self.events.push(GameEvent::Ended {
            final_score: self.score,
            best_score: self.best_score,
            cause,
        });
        log::info!(
            "Run {} ended after {:.2}s: {:?}, score {} (best {})",
            self.runs,
            self.elapsed,
            cause,
            self.score,
            self.best_score
        );
    }

    /// Take all queued events in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            best_score: self.best_score,
            orb: OrbSnapshot {
                y: self.orb.pos.y,
                vel_y: self.orb.vel_y,
                tilt: self.orb.tilt(),
            },
            pillars: self
                .pool
                .pillars()
                .iter()
                .map(|p| PillarSnapshot {
                    id: p.id,
                    x: p.x,
                    gap_y: p.gap_y,
                })
                .collect(),
        }
    }
}

impl<R> GameState<R> {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn orb(&self) -> &Orb {
        &self.orb
    }

    /// Live pillars ordered by x, nearest first
    pub fn pillars(&self) -> &[Pillar] {
        self.pool.pillars()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
