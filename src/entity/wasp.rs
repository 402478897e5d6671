//! Wasp record - the roaming predator
//!
//! Wasps are not owned by any colony. A dead wasp keeps its last position
//! but is no longer targeted or resolved.

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, WaspId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wasp {
    pub id: WaspId,
    pub position: GridPos,
    pub health: u32,
    pub alive: bool,
    pub attack_power: u32,
}

/// Result of a bee striking a wasp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// Damage landed; the attacker is spent
    Wounded { remaining: u32 },
    /// Damage landed and brought health to zero; the attacker is spent
    Killed,
    /// The wasp was already at zero health and has now been finalized.
    /// No damage was dealt, so the attacker survives.
    Finalized,
}

impl Wasp {
    pub fn new(id: WaspId, position: GridPos, health: u32, attack_power: u32) -> Self {
        Self {
            id,
            position,
            health,
            alive: true,
            attack_power,
        }
    }

    /// Apply a bee strike of the given power
    pub fn receive_strike(&mut self, power: u32) -> StrikeOutcome {
        if self.health == 0 {
            self.alive = false;
            return StrikeOutcome::Finalized;
        }
        self.health = self.health.saturating_sub(power);
        if self.health == 0 {
            self.alive = false;
            StrikeOutcome::Killed
        } else {
            StrikeOutcome::Wounded {
                remaining: self.health,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_wounds_then_kills() {
        let mut wasp = Wasp::new(WaspId(0), GridPos::new(1, 1), 2, 1);
        assert_eq!(wasp.receive_strike(1), StrikeOutcome::Wounded { remaining: 1 });
        assert!(wasp.alive);
        assert_eq!(wasp.receive_strike(1), StrikeOutcome::Killed);
        assert!(!wasp.alive);
    }

    #[test]
    fn test_zero_health_wasp_is_finalized() {
        let mut wasp = Wasp::new(WaspId(3), GridPos::new(0, 0), 0, 1);
        assert_eq!(wasp.receive_strike(5), StrikeOutcome::Finalized);
        assert!(!wasp.alive);
    }

    #[test]
    fn test_overkill_saturates() {
        let mut wasp = Wasp::new(WaspId(0), GridPos::new(0, 0), 1, 1);
        assert_eq!(wasp.receive_strike(10), StrikeOutcome::Killed);
        assert_eq!(wasp.health, 0);
    }
}
