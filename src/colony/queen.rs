//! Colony economy - the queen's ledger and population control
//!
//! Each tick a live colony eats, checks for collapse, scores its health as
//! food per living bee, and moves a saturating trend counter. A sustained
//! good trend lays a new bee; a sustained bad trend culls one.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::SlotOrder;
use crate::colony::claims::ClaimMap;
use crate::core::config::EconomyConfig;
use crate::core::types::{BeeId, ColonyId, GridPos};
use crate::entity::Bee;

/// What the economy did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyOutcome {
    Steady,
    /// A bee was laid; the caller must register it in the world
    Spawned(BeeId),
    Culled(BeeId),
    Collapsed { casualties: usize },
}

#[derive(Debug, Clone)]
pub struct Colony {
    pub id: ColonyId,
    pub hive: GridPos,
    pub food_stock: f64,
    /// One bit per roster slot, true while the bee is inside the hive
    presence: Vec<bool>,
    alive_bees: usize,
    trend: i32,
    health_score: i64,
    roster: Vec<Bee>,
    pub claims: ClaimMap,
    alive: bool,
    dead_count: usize,
    attack_power: u32,
}

impl Colony {
    /// New colony with `bee_count` bees, all inside the hive
    pub fn new(
        id: ColonyId,
        hive: GridPos,
        bee_count: usize,
        economy: &EconomyConfig,
        attack_power: u32,
        section_size: u32,
    ) -> Self {
        let roster = (0..bee_count)
            .map(|slot| Bee::new(BeeId::new(id, slot), attack_power))
            .collect();
        let food_stock = economy.starting_food_per_bee * bee_count as f64;
        Self {
            id,
            hive,
            food_stock,
            presence: vec![true; bee_count],
            alive_bees: bee_count,
            trend: 0,
            health_score: health_of(food_stock, bee_count),
            roster,
            claims: ClaimMap::new(section_size),
            alive: true,
            dead_count: 0,
            attack_power,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn alive_bees(&self) -> usize {
        self.alive_bees
    }

    pub fn dead_count(&self) -> usize {
        self.dead_count
    }

    pub fn trend(&self) -> i32 {
        self.trend
    }

    pub fn health_score(&self) -> i64 {
        self.health_score
    }

    pub fn roster(&self) -> &[Bee] {
        &self.roster
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    pub fn bee(&self, slot: usize) -> Option<&Bee> {
        self.roster.get(slot)
    }

    pub fn bee_mut(&mut self, slot: usize) -> Option<&mut Bee> {
        self.roster.get_mut(slot)
    }

    pub fn presence(&self) -> &[bool] {
        &self.presence
    }

    pub fn is_present(&self, slot: usize) -> bool {
        self.presence.get(slot).copied().unwrap_or(false)
    }

    pub fn present_count(&self) -> usize {
        self.presence.iter().filter(|&&p| p).count()
    }

    /// Mark a bee as inside the hive
    pub fn welcome(&mut self, slot: usize) {
        if let Some(bit) = self.presence.get_mut(slot) {
            *bit = true;
        }
    }

    /// Queen orders are ANDed with presence: release clears, retain keeps
    pub fn apply_orders(&mut self, orders: &[SlotOrder]) {
        for (bit, order) in self.presence.iter_mut().zip(orders) {
            *bit &= *order == SlotOrder::Retain;
        }
    }

    pub fn receive_pollen(&mut self, economy: &EconomyConfig) {
        self.food_stock += economy.nutrition_per_pollen;
    }

    /// Wasp raid. The stock may go negative; collapse happens on the next tick.
    pub fn receive_damage(&mut self, amount: u32) {
        self.food_stock -= f64::from(amount);
    }

    /// Kill one bee. Returns false if it was already dead.
    pub fn kill_bee(&mut self, slot: usize) -> bool {
        let Some(bee) = self.roster.get_mut(slot) else {
            return false;
        };
        if !bee.alive {
            return false;
        }
        bee.kill();
        if let Some(bit) = self.presence.get_mut(slot) {
            *bit = false;
        }
        self.claims.release_slot(slot);
        self.alive_bees -= 1;
        self.dead_count += 1;
        true
    }

    /// One economy tick
    pub fn tick(&mut self, economy: &EconomyConfig) -> EconomyOutcome {
        if !self.alive {
            return EconomyOutcome::Steady;
        }
        if self.alive_bees == 0 {
            return self.collapse();
        }

        self.food_stock -= economy.consumption_per_bee * self.alive_bees as f64;
        if self.food_stock < 0.0 {
            return self.collapse();
        }

        self.health_score = health_of(self.food_stock, self.alive_bees);
        self.update_trend(economy);

        let threshold = economy.trend_threshold;
        if self.trend >= threshold {
            self.trend = 0;
            return EconomyOutcome::Spawned(self.lay_bee());
        }
        if self.trend <= -threshold {
            self.trend = 0;
            if let Some(victim) = self.cull_victim() {
                self.kill_bee(victim);
                return EconomyOutcome::Culled(BeeId::new(self.id, victim));
            }
        }
        EconomyOutcome::Steady
    }

    fn update_trend(&mut self, economy: &EconomyConfig) {
        let limit = economy.trend_threshold;
        self.trend = if self.health_score > economy.good_health {
            (self.trend.max(0) + 1).min(limit)
        } else if self.health_score < economy.bad_health {
            (self.trend.min(0) - 1).max(-limit)
        } else {
            0
        };
    }

    /// Append a bee in a fresh slot, inside the hive
    fn lay_bee(&mut self) -> BeeId {
        let id = BeeId::new(self.id, self.roster.len());
        self.roster.push(Bee::new(id, self.attack_power));
        self.presence.push(true);
        self.alive_bees += 1;
        id
    }

    /// First living bee inside the hive, else the first living bee
    fn cull_victim(&self) -> Option<usize> {
        let living = || self.roster.iter().filter(|b| b.alive).map(Bee::slot);
        living()
            .find(|&slot| self.is_present(slot))
            .or_else(|| living().next())
    }

    fn collapse(&mut self) -> EconomyOutcome {
        let mut casualties = 0;
        for slot in 0..self.roster.len() {
            if self.kill_bee(slot) {
                casualties += 1;
            }
        }
        self.presence.iter_mut().for_each(|bit| *bit = false);
        self.claims.clear();
        self.alive = false;
        self.health_score = 0;
        self.trend = 0;
        EconomyOutcome::Collapsed { casualties }
    }

    /// Consistency of the living-bee counter with the roster
    pub fn census_is_consistent(&self) -> bool {
        let counted = self.roster.iter().filter(|b| b.alive).count();
        counted == self.alive_bees
            && self.alive_bees <= self.roster.len()
            && self.presence.len() == self.roster.len()
            && self.dead_count + self.alive_bees == self.roster.len()
    }
}

fn health_of(food_stock: f64, alive_bees: usize) -> i64 {
    if alive_bees == 0 {
        return 0;
    }
    (food_stock / alive_bees as f64).floor() as i64
}
