//! Collision detection between the orb, the pillars and the world bounds
//!
//! All checks are strict: touching an edge exactly is not a hit.

use super::state::{EndCause, Orb, Pillar};
use crate::config::EngineConfig;

/// Orb centre has left the visible world plus margin
#[inline]
pub fn out_of_bounds(orb_y: f32, config: &EngineConfig) -> bool {
    orb_y < config.floor_y() || orb_y > config.ceiling_y()
}

/// Orb's horizontal span overlaps the pillar's
#[inline]
pub fn overlaps_horizontally(orb_x: f32, orb_radius: f32, pillar: &Pillar) -> bool {
    orb_x + orb_radius > pillar.left() && orb_x - orb_radius < pillar.right()
}

/// Orb pokes out of the gap vertically (only meaningful when horizontally overlapping)
#[inline]
pub fn outside_gap(orb_y: f32, orb_radius: f32, pillar: &Pillar) -> bool {
    orb_y + orb_radius > pillar.gap_top() || orb_y - orb_radius < pillar.gap_bottom()
}

/// Orb overlaps the solid part of a pillar
pub fn orb_pillar_collision(orb: &Orb, pillar: &Pillar) -> bool {
    overlaps_horizontally(orb.pos.x, orb.radius, pillar) && outside_gap(orb.pos.y, orb.radius, pillar)
}

/// Pillar is fully behind the orb
#[inline]
pub fn has_passed(orb_x: f32, pillar: &Pillar) -> bool {
    pillar.right() < orb_x
}

/// Run all end-of-run checks; bounds take priority over pillars
pub fn check_collision(orb: &Orb, pillars: &[Pillar], config: &EngineConfig) -> Option<EndCause> {
    if out_of_bounds(orb.pos.y, config) {
        return Some(EndCause::OutOfBounds);
    }

    pillars
        .iter()
        .find(|p| orb_pillar_collision(orb, p))
        .map(|p| EndCause::HitPillar { pillar_id: p.id })
}
