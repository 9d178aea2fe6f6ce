//! Render slot mapping for pillars
//!
//! Renderers keep a fixed set of pillar meshes. Each live pillar is mapped
//! to slot `id % capacity`; because live pillars have consecutive IDs, the
//! mapping is stable for a pillar's whole life and never collides while the
//! pool fits in the slots.

use bytemuck::{Pod, Zeroable};

use super::state::Pillar;

/// Per-pillar instance data, laid out for direct upload to a GPU buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PillarInstance {
    pub x: f32,
    pub gap_y: f32,
    pub gap_half_height: f32,
    pub width: f32,
}

impl PillarInstance {
    pub const fn from_pillar(pillar: &Pillar) -> Self {
        Self {
            x: pillar.x,
            gap_y: pillar.gap_y,
            gap_half_height: pillar.gap_half_height,
            width: pillar.width,
        }
    }
}

/// Fixed-capacity pillar slots
#[derive(Debug, Clone)]
pub struct RenderSlots {
    slots: Vec<Option<PillarInstance>>,
    ids: Vec<Option<u32>>,
}

impl RenderSlots {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            ids: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot_for(&self, id: u32) -> usize {
        id as usize % self.capacity()
    }

    /// Rebuild slots from the live pillars (ordered nearest first)
    pub fn assign(&mut self, pillars: &[Pillar]) -> &[Option<PillarInstance>] {
        self.slots.fill(None);
        self.ids.fill(None);

        for pillar in pillars {
            let slot = self.slot_for(pillar.id);
            if let Some(existing) = self.ids[slot] {
                log::warn!(
                    "Pillar {} dropped: slot {} already holds pillar {} ({} slots)",
                    pillar.id,
                    slot,
                    existing,
                    self.capacity()
                );
                continue;
            }
            self.ids[slot] = Some(pillar.id);
            self.slots[slot] = Some(PillarInstance::from_pillar(pillar));
        }

        &self.slots
    }

    pub fn slots(&self) -> &[Option<PillarInstance>] {
        &self.slots
    }

    /// Pillar ID currently shown in a slot
    pub fn id_in(&self, slot: usize) -> Option<u32> {
        self.ids.get(slot).copied().flatten()
    }

    /// Occupied slots packed in slot order
    pub fn instances(&self) -> Vec<PillarInstance> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Occupied slots as raw bytes for a vertex/instance buffer
    pub fn instance_bytes(&self) -> Vec<u8> {
        let instances = self.instances();
        bytemuck::cast_slice::<PillarInstance, u8>(&instances).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sim::state::GameState;

    fn pillar(id: u32, x: f32) -> Pillar {
        Pillar {
            id,
            x,
            gap_y: 0.5,
            gap_half_height: 2.0,
            width: 1.5,
            passed: false,
        }
    }

    #[test]
    fn test_slots_follow_id() {
        let mut slots = RenderSlots::new(4);
        let pillars = [pillar(6, -3.0), pillar(7, 3.0), pillar(8, 9.0)];
        let assigned = slots.assign(&pillars);

        assert_eq!(assigned[1], None);
        assert_eq!(assigned[2].map(|p| p.x), Some(-3.0));
        assert_eq!(assigned[3].map(|p| p.x), Some(3.0));
        // Pillar 8 wraps to slot 0
        assert_eq!(assigned[0].map(|p| p.x), Some(9.0));
        assert_eq!(slots.id_in(0), Some(8));
        assert_eq!(slots.id_in(1), None);
        assert_eq!(slots.id_in(9), None);

        // Pillar 6 scrolls off; its slot frees up, the others stay put
        let assigned = slots.assign(&pillars[1..]);
        assert_eq!(assigned[2], None);
        assert_eq!(slots.id_in(3), Some(7));
        assert_eq!(slots.id_in(0), Some(8));
    }

    #[test]
    fn test_slot_stable_while_pool_scrolls() {
        let mut state = GameState::new(EngineConfig::default(), 3);
        state.start();
        let mut slots = RenderSlots::new(state.config().render_slots);

        let first_id = state.pillars()[0].id;
        slots.assign(state.pillars());
        let slot = slots.slot_for(first_id);
        assert_eq!(slots.id_in(slot), Some(first_id));

        for _ in 0..60 {
            state.tick(1.0 / 60.0);
            if state.pillars().iter().any(|p| p.id == first_id) {
                slots.assign(state.pillars());
                assert_eq!(slots.id_in(slot), Some(first_id));
            }
        }
    }

    #[test]
    fn test_overflow_keeps_nearer_pillar() {
        let mut slots = RenderSlots::new(2);
        let pillars = [pillar(1, 0.0), pillar(2, 6.0), pillar(3, 12.0)];
        slots.assign(&pillars);
        assert_eq!(slots.id_in(1), Some(1));
        assert_eq!(slots.id_in(0), Some(2));
        assert_eq!(slots.instances().len(), 2);
    }

    #[test]
    fn test_instance_bytes() {
        let mut slots = RenderSlots::new(3);
        slots.assign(&[pillar(0, 1.0), pillar(1, 7.0)]);
        let bytes = slots.instance_bytes();
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<PillarInstance>());
        assert_eq!(std::mem::size_of::<PillarInstance>(), 16);

        let second: PillarInstance = bytemuck::pod_read_unaligned(&bytes[16..32]);
        assert_eq!(second.x, 7.0);
        assert_eq!(second.width, 1.5);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let slots = RenderSlots::new(0);
        assert_eq!(slots.capacity(), 1);
    }
}
