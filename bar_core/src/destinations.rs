use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::actor::ActorId;
use crate::config::DestinationSpec;
use crate::types::Vec3;

/// Stable handle for one destination slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub u32);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DestinationSlot {
    pub id: SlotId,
    pub name: String,
    pub position: Vec3,
}

/// Shared set of destination slots plus the exclusive-occupancy ledger.
///
/// Slots are defined at scenario setup and immutable afterwards; only
/// occupancy changes, and only through the actor state machine. A slot is
/// held by at most one actor and an actor holds at most one slot. No
/// fairness guarantee: free slots are interchangeable, and when every slot
/// is taken callers simply wait.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationPool {
    slots: Vec<DestinationSlot>,
    occupancy: BTreeMap<SlotId, ActorId>,
}

impl DestinationPool {
    pub fn from_specs(specs: &[DestinationSpec]) -> Self {
        let slots = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| DestinationSlot {
                id: SlotId(index as u32),
                name: spec.name.clone(),
                position: spec.position,
            })
            .collect();
        DestinationPool {
            slots,
            occupancy: BTreeMap::new(),
        }
    }

    /// Picks uniformly at random among the currently free slots, marks the
    /// pick as held by `actor`, and returns it. `None` when every slot is
    /// occupied.
    pub fn try_acquire(&mut self, actor: ActorId, rng: &mut impl Rng) -> Option<SlotId> {
        let free: Vec<SlotId> = self
            .slots
            .iter()
            .map(|slot| slot.id)
            .filter(|id| !self.occupancy.contains_key(id))
            .collect();
        if free.is_empty() {
            return None;
        }
        let chosen = free[rng.gen_range(0..free.len())];
        self.occupancy.insert(chosen, actor);
        Some(chosen)
    }

    /// Clears occupancy of `slot` if `actor` holds it. Releasing a free
    /// slot, or one held by a different actor, changes nothing — the
    /// forced-despawn cleanup path may race a normal release and both must
    /// stay harmless.
    pub fn release(&mut self, slot: SlotId, actor: ActorId) {
        if self.occupancy.get(&slot) == Some(&actor) {
            self.occupancy.remove(&slot);
        }
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.occupancy.contains_key(&slot)
    }

    pub fn occupant(&self, slot: SlotId) -> Option<ActorId> {
        self.occupancy.get(&slot).copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn position(&self, slot: SlotId) -> Option<Vec3> {
        self.slots
            .iter()
            .find(|candidate| candidate.id == slot)
            .map(|candidate| candidate.position)
    }

    pub fn name(&self, slot: SlotId) -> Option<&str> {
        self.slots
            .iter()
            .find(|candidate| candidate.id == slot)
            .map(|candidate| candidate.name.as_str())
    }

    pub fn slots(&self) -> &[DestinationSlot] {
        &self.slots
    }
}
