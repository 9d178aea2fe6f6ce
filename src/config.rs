//! Engine tuning and world geometry
//!
//! Every constant the simulation reads lives here so the frame driver can
//! load a JSON file instead of recompiling. Missing fields fall back to
//! [`crate::consts`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Physics ===
    /// Vertical acceleration (must be negative)
    pub gravity: f32,
    /// Velocity a flap sets (must be positive)
    pub flap_velocity: f32,
    /// Pillar scroll speed
    pub scroll_speed: f32,

    // === Orb ===
    pub orb_x: f32,
    pub orb_start_y: f32,
    pub orb_radius: f32,

    // === Pillars ===
    pub pillar_width: f32,
    pub pillar_spacing: f32,
    pub gap_half_height: f32,
    /// Full height of the band gap centres are drawn from
    pub gap_band: f32,
    pub initial_pillars: usize,
    /// X of the first pillar of a run; an empty pool restarts one spacing past it
    pub first_pillar_x: f32,
    /// A new pillar is appended while the furthest one is nearer than this
    pub spawn_lookahead_x: f32,
    /// Pillars are kept while their x is greater than this
    pub despawn_x: f32,

    // === World ===
    pub half_world_height: f32,
    pub bounds_margin: f32,

    // === Rendering handoff ===
    pub render_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            scroll_speed: SCROLL_SPEED,

            orb_x: ORB_X,
            orb_start_y: ORB_START_Y,
            orb_radius: ORB_RADIUS,

            pillar_width: PILLAR_WIDTH,
            pillar_spacing: PILLAR_SPACING,
            gap_half_height: GAP_HALF_HEIGHT,
            gap_band: GAP_BAND,
            initial_pillars: INITIAL_PILLARS,
            first_pillar_x: FIRST_PILLAR_X,
            spawn_lookahead_x: SPAWN_LOOKAHEAD_X,
            despawn_x: DESPAWN_X,

            half_world_height: HALF_WORLD_HEIGHT,
            bounds_margin: BOUNDS_MARGIN,

            render_slots: RENDER_SLOTS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid engine config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&json).with_context(|| format!("in {}", path.display()))?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lowest y the orb may reach before the run ends
    #[inline]
    pub fn floor_y(&self) -> f32 {
        -(self.half_world_height + self.bounds_margin)
    }

    /// Highest y the orb may reach before the run ends
    #[inline]
    pub fn ceiling_y(&self) -> f32 {
        self.half_world_height + self.bounds_margin
    }

    /// Reject configs the simulation cannot run sensibly
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("gravity", self.gravity),
            ("flap_velocity", self.flap_velocity),
            ("scroll_speed", self.scroll_speed),
            ("orb_x", self.orb_x),
            ("orb_start_y", self.orb_start_y),
            ("orb_radius", self.orb_radius),
            ("pillar_width", self.pillar_width),
            ("pillar_spacing", self.pillar_spacing),
            ("gap_half_height", self.gap_half_height),
            ("gap_band", self.gap_band),
            ("first_pillar_x", self.first_pillar_x),
            ("spawn_lookahead_x", self.spawn_lookahead_x),
            ("despawn_x", self.despawn_x),
            ("half_world_height", self.half_world_height),
            ("bounds_margin", self.bounds_margin),
        ];
        for (name, value) in floats {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }

        ensure!(self.gravity < 0.0, "gravity must pull down (negative), got {}", self.gravity);
        ensure!(self.flap_velocity > 0.0, "flap_velocity must be positive");
        ensure!(self.scroll_speed > 0.0, "scroll_speed must be positive");
        ensure!(self.orb_radius >= 0.0, "orb_radius must not be negative");
        ensure!(self.pillar_width > 0.0, "pillar_width must be positive");
        ensure!(self.pillar_spacing > 0.0, "pillar_spacing must be positive");
        ensure!(self.gap_half_height > 0.0, "gap_half_height must be positive");
        ensure!(self.gap_band >= 0.0, "gap_band must not be negative");
        ensure!(self.half_world_height > 0.0, "half_world_height must be positive");
        ensure!(self.bounds_margin >= 0.0, "bounds_margin must not be negative");
        ensure!(
            self.despawn_x < self.orb_x,
            "despawn_x ({}) must lie behind orb_x ({}) or pillars vanish before they are passed",
            self.despawn_x,
            self.orb_x
        );
        ensure!(
            self.spawn_lookahead_x > self.despawn_x,
            "spawn_lookahead_x must be ahead of despawn_x"
        );
        ensure!(
            self.spawn_lookahead_x > self.orb_x + self.orb_radius + self.pillar_width / 2.0,
            "spawn_lookahead_x ({}) must clear the orb, or pillars spawn on top of it",
            self.spawn_lookahead_x
        );

        // Spacing has to survive f32 rounding wherever pillars are placed
        for (name, x) in [
            ("first_pillar_x", self.first_pillar_x),
            ("spawn_lookahead_x", self.spawn_lookahead_x),
            ("despawn_x", self.despawn_x),
        ] {
            ensure!(
                x + self.pillar_spacing > x,
                "pillar_spacing ({}) is lost to rounding at {name} ({x})",
                self.pillar_spacing
            );
        }
        let live = (self.spawn_lookahead_x - self.despawn_x) / self.pillar_spacing + 2.0;
        ensure!(
            live <= MAX_LIVE_PILLARS as f32,
            "look-ahead window would keep about {live:.0} pillars alive (max {MAX_LIVE_PILLARS})"
        );
        ensure!(
            self.initial_pillars <= MAX_LIVE_PILLARS,
            "initial_pillars must be at most {MAX_LIVE_PILLARS}"
        );

        ensure!(self.render_slots >= 1, "render_slots must be at least 1");
        Ok(())
    }
}
