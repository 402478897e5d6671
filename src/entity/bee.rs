//! Forager bee record
//!
//! A bee belongs to exactly one colony roster and is addressed by its
//! `BeeId`. Its position lives in the world state, not here.

use serde::{Deserialize, Serialize};

use crate::core::types::BeeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bee {
    pub id: BeeId,
    pub carrying_pollen: bool,
    pub alive: bool,
    pub attack_power: u32,
}

impl Bee {
    pub fn new(id: BeeId, attack_power: u32) -> Self {
        Self {
            id,
            carrying_pollen: false,
            alive: true,
            attack_power,
        }
    }

    pub fn slot(&self) -> usize {
        self.id.slot
    }

    /// Load pollen. Returns false if the bee is dead.
    pub fn load_pollen(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.carrying_pollen = true;
        true
    }

    /// Unload pollen. Returns true if there was pollen to hand over.
    pub fn unload_pollen(&mut self) -> bool {
        std::mem::replace(&mut self.carrying_pollen, false)
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.carrying_pollen = false;
    }
}
