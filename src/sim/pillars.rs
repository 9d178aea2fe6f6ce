//! Pillar generation and the live pillar pool
//!
//! Pillars are spaced a fixed distance apart; only the vertical gap
//! placement is random. The pool stays sorted by x (nearest first) because
//! pillars are only ever removed from the front and appended at the back.

use rand::Rng;

use super::state::Pillar;
use crate::config::EngineConfig;
use crate::consts::MAX_LIVE_PILLARS;

/// Build a pillar at `x` with a gap centre drawn uniformly from the band
pub fn spawn_pillar(id: u32, x: f32, config: &EngineConfig, rng: &mut impl Rng) -> Pillar {
    let half_band = config.gap_band / 2.0;
    let gap_y = if half_band > 0.0 {
        rng.random_range(-half_band..=half_band)
    } else {
        0.0
    };

    Pillar {
        id,
        x,
        gap_y,
        gap_half_height: config.gap_half_height,
        width: config.pillar_width,
        passed: false,
    }
}

/// Ordered set of live pillars
#[derive(Debug, Clone, Default)]
pub struct PillarPool {
    pillars: Vec<Pillar>,
    /// Next pillar ID, never reset so IDs stay unique for the engine's lifetime
    next_id: u32,
}

impl PillarPool {
    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    pub(crate) fn pillars_mut(&mut self) -> &mut [Pillar] {
        &mut self.pillars
    }

    pub fn len(&self) -> usize {
        self.pillars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pillars.is_empty()
    }

    /// Furthest pillar (largest x)
    pub fn last(&self) -> Option<&Pillar> {
        self.pillars.last()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_at(&mut self, x: f32, config: &EngineConfig, rng: &mut impl Rng) {
        let id = self.next_id();
        let pillar = spawn_pillar(id, x, config, rng);
        log::debug!("Spawned pillar {} at x={:.2}, gap_y={:.2}", id, x, pillar.gap_y);
        self.pillars.push(pillar);
    }

    /// Append one pillar one spacing past the furthest
    ///
    /// An empty pool leads from `first_pillar_x` as if a pillar stood there.
    pub fn spawn_next(&mut self, config: &EngineConfig, rng: &mut impl Rng) {
        let lead = self.pillars.last().map_or(config.first_pillar_x, |last| last.x);
        self.push_at(lead + config.pillar_spacing, config, rng);
    }

    /// Clear and lay out the opening pillars of a run
    ///
    /// The opening row starts at `first_pillar_x`, then the look-ahead is
    /// filled, so the pool is never empty once this returns.
    pub fn reset(&mut self, config: &EngineConfig, rng: &mut impl Rng) {
        self.pillars.clear();
        for i in 0..config.initial_pillars.min(MAX_LIVE_PILLARS) {
            let x = config.first_pillar_x + i as f32 * config.pillar_spacing;
            self.push_at(x, config, rng);
        }
        self.top_up(config, rng);
    }

    /// Scroll every pillar toward the orb
    pub fn advance(&mut self, dx: f32) {
        for pillar in &mut self.pillars {
            pillar.x -= dx;
        }
    }

    /// Drop pillars that are definitely off-screen; returns how many went
    pub fn prune(&mut self, despawn_x: f32) -> usize {
        let before = self.pillars.len();
        self.pillars.retain(|p| p.x > despawn_x);
        before - self.pillars.len()
    }

    /// Append pillars while the furthest one is inside the look-ahead
    ///
    /// An empty pool always gets a pillar. The pool never grows past
    /// `MAX_LIVE_PILLARS`. Returns how many were added.
    pub fn top_up(&mut self, config: &EngineConfig, rng: &mut impl Rng) -> usize {
        let mut added = 0;
        while self
            .pillars
            .last()
            .is_none_or(|last| last.x < config.spawn_lookahead_x)
        {
            if self.pillars.len() >= MAX_LIVE_PILLARS {
                log::warn!(
                    "Pillar pool full ({} live) before reaching x={}; check pillar_spacing",
                    self.pillars.len(),
                    config.spawn_lookahead_x
                );
                break;
            }
            self.spawn_next(config, rng);
            added += 1;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_reset_lays_out_initial_pillars() {
        let config = EngineConfig::default();
        let mut pool = PillarPool::default();
        pool.reset(&config, &mut rng());

        assert_eq!(pool.len(), 5);
        let xs: Vec<f32> = pool.pillars().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![8.0, 14.0, 20.0, 26.0, 32.0]);
        for (i, p) in pool.pillars().iter().enumerate() {
            assert_eq!(p.id, i as u32);
            assert!(!p.passed);
            assert!(p.gap_y >= -2.0 && p.gap_y <= 2.0);
        }
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let config = EngineConfig::default();
        let mut a = PillarPool::default();
        let mut b = PillarPool::default();
        a.reset(&config, &mut rng());
        b.reset(&config, &mut rng());
        assert_eq!(a.pillars(), b.pillars());
    }

    #[test]
    fn test_zero_band_centres_gaps() {
        let config = EngineConfig {
            gap_band: 0.0,
            ..Default::default()
        };
        let pillar = spawn_pillar(3, 1.0, &config, &mut rng());
        assert_eq!(pillar.gap_y, 0.0);
        assert_eq!(pillar.id, 3);
    }

    #[test]
    fn test_top_up_only_when_inside_lookahead() {
        let config = EngineConfig::default();
        let mut pool = PillarPool::default();
        let mut rng = rng();
        pool.reset(&config, &mut rng);

        // Furthest at 32, far beyond the look-ahead
        assert_eq!(pool.top_up(&config, &mut rng), 0);

        // Bring the furthest to just under the look-ahead
        pool.advance(20.5);
        assert_eq!(pool.top_up(&config, &mut rng), 1);
        let last = pool.last().unwrap();
        assert!((last.x - (11.5 + 6.0)).abs() < 1e-4);
        assert_eq!(last.id, 5);
    }

    #[test]
    fn test_top_up_refills_empty_pool() {
        let config = EngineConfig::default();
        let mut pool = PillarPool::default();
        let mut rng = rng();
        let added = pool.top_up(&config, &mut rng);

        // Leads one spacing past the first pillar slot: 14 already clears the look-ahead
        assert_eq!(added, 1);
        let xs: Vec<f32> = pool.pillars().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![14.0]);
    }

    #[test]
    fn test_reset_without_initial_pillars_fills_lookahead() {
        let config = EngineConfig {
            initial_pillars: 0,
            ..Default::default()
        };
        let mut pool = PillarPool::default();
        pool.reset(&config, &mut rng());

        let xs: Vec<f32> = pool.pillars().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![14.0]);
    }

    #[test]
    fn test_reset_short_row_is_topped_up() {
        let config = EngineConfig {
            initial_pillars: 1,
            spawn_lookahead_x: 20.0,
            ..Default::default()
        };
        let mut pool = PillarPool::default();
        pool.reset(&config, &mut rng());

        let xs: Vec<f32> = pool.pillars().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![8.0, 14.0, 20.0]);
    }

    #[test]
    fn test_top_up_stops_when_spacing_is_lost() {
        // Built by hand, so validation never saw it
        let config = EngineConfig {
            pillar_spacing: 0.0,
            ..Default::default()
        };
        let mut pool = PillarPool::default();
        let mut rng = rng();

        assert_eq!(pool.top_up(&config, &mut rng), MAX_LIVE_PILLARS);
        assert_eq!(pool.top_up(&config, &mut rng), 0);
        assert_eq!(pool.len(), MAX_LIVE_PILLARS);

        let config = EngineConfig {
            pillar_spacing: 1.0e-9,
            ..Default::default()
        };
        let mut pool = PillarPool::default();
        pool.top_up(&config, &mut rng);
        assert_eq!(pool.len(), MAX_LIVE_PILLARS);
    }

    #[test]
    fn test_prune_keeps_order() {
        let config = EngineConfig::default();
        let mut pool = PillarPool::default();
        pool.reset(&config, &mut rng());

        pool.advance(29.0); // xs: -21, -15, -9, -3, 3
        assert_eq!(pool.prune(config.despawn_x), 2);
        let xs: Vec<f32> = pool.pillars().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-9.0, -3.0, 3.0]);
        assert_eq!(pool.pillars()[0].id, 2);
    }

    #[test]
    fn test_ids_keep_increasing_across_resets() {
        let config = EngineConfig::default();
        let mut pool = PillarPool::default();
        let mut rng = rng();
        pool.reset(&config, &mut rng);
        pool.reset(&config, &mut rng);
        let ids: Vec<u32> = pool.pillars().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 6, 7, 8, 9]);
    }
}
