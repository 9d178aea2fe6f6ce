//! Per-frame simulation tick
//!
//! Order within a running tick: orb physics, pillar scroll, collision
//! (bounds first), pass detection and scoring, then pruning and spawning.
//! Pillars spawned by the tick are collision-tested before it returns.

use rand::Rng;

use super::collision::{check_collision, has_passed, orb_pillar_collision};
use super::state::{EndCause, GamePhase, GameState};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Commands gathered by the input layer since the last frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start or restart a run (click/tap/space on the overlay)
    pub start: bool,
    /// Flap (space/up/tap while running)
    pub flap: bool,
    /// Demo mode - the engine flaps for the player
    pub autopilot: bool,
}

/// Apply commands, then advance the simulation by `dt` seconds
pub fn tick<R: Rng>(state: &mut GameState<R>, input: &TickInput, dt: f32) {
    apply_commands(state, input);
    if input.autopilot && autopilot_wants_flap(state) {
        state.flap();
    }
    state.tick(dt);
}

fn apply_commands<R: Rng>(state: &mut GameState<R>, input: &TickInput) {
    if input.start {
        state.start();
    }
    if input.flap {
        state.flap();
    }
}

/// Autopilot: keep the orb hovering at the next gap's centre
///
/// Aims at the nearest pillar the orb has not fully cleared, or at the start
/// height when the path ahead is empty. Flaps only when low and not rising.
pub fn autopilot_wants_flap<R>(state: &GameState<R>) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }

    let orb = &state.orb;
    let target_y = state
        .pillars()
        .iter()
        .find(|p| p.right() + orb.radius >= orb.pos.x)
        .map(|p| p.gap_y)
        .unwrap_or(state.config.orb_start_y);

    orb.pos.y < target_y - AUTOPILOT_AIM_BELOW && orb.vel_y <= 0.0
}

/// Autopilot flaps a little under the gap centre so the arc peaks near it
const AUTOPILOT_AIM_BELOW: f32 = 0.25;

impl<R: Rng> GameState<R> {
    /// Advance one frame by `dt` seconds
    ///
    /// No-op unless running, and for zero, negative or non-finite deltas.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid tick delta {dt}");
            return;
        }
        if self.phase != GamePhase::Running || dt == 0.0 {
            return;
        }

        self.elapsed += dt;
        self.orb.integrate(dt, self.config.gravity);
        self.pool.advance(self.config.scroll_speed * dt);

        if let Some(cause) = check_collision(&self.orb, self.pool.pillars(), &self.config) {
            self.end(cause);
            return;
        }

        let orb_x = self.orb.pos.x;
        let mut newly_passed = 0;
        for pillar in self.pool.pillars_mut() {
            if !pillar.passed && has_passed(orb_x, pillar) {
                pillar.passed = true;
                newly_passed += 1;
            }
        }
        for _ in 0..newly_passed {
            self.award_pass();
        }

        // Prune before spawning so an emptied pool is refilled this tick
        self.pool.prune(self.config.despawn_x);
        let added = self.pool.top_up(&self.config, &mut self.rng);

        // A long delta can lay fresh pillars over the orb
        let pillars = self.pool.pillars();
        let fresh = &pillars[pillars.len() - added..];
        let hit = fresh
            .iter()
            .find(|p| orb_pillar_collision(&self.orb, p))
            .map(|p| p.id);
        if let Some(pillar_id) = hit {
            self.end(EndCause::HitPillar { pillar_id });
        }
    }
}

/// Fixed timestep accumulator for variable-rate frame drivers
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one rendered frame; returns how many `SIM_DT` substeps ran
    ///
    /// Commands are applied once, before the first substep, even when the
    /// frame is too short to run one.
    pub fn advance<R: Rng>(&mut self, state: &mut GameState<R>, input: &TickInput, frame_dt: f32) -> u32 {
        apply_commands(state, input);
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return 0;
        }

        self.accumulator += frame_dt.min(MAX_FRAME_DT);
        let substep_input = TickInput {
            autopilot: input.autopilot,
            ..Default::default()
        };

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &substep_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        self.accumulator = self.accumulator.min(SIM_DT);
        substeps
    }
}
