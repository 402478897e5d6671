//! Flowers - static pollen sources that regrow after being picked

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flower {
    pub position: GridPos,
    pub has_pollen: bool,
    /// Ticks spent without pollen; always 0 while `has_pollen` is true
    pub idle_ticks: u32,
}

impl Flower {
    pub fn new(position: GridPos) -> Self {
        Self {
            position,
            has_pollen: true,
            idle_ticks: 0,
        }
    }

    /// Take the pollen. Returns false if there was none.
    pub fn collect_pollen(&mut self) -> bool {
        if !self.has_pollen {
            return false;
        }
        self.has_pollen = false;
        self.idle_ticks = 0;
        true
    }

    /// End-of-tick regrowth. Returns true on the tick pollen comes back.
    pub fn regrow(&mut self, regrow_ticks: u32) -> bool {
        if self.has_pollen {
            self.idle_ticks = 0;
            return false;
        }
        if self.idle_ticks >= regrow_ticks {
            self.has_pollen = true;
            self.idle_ticks = 0;
            return true;
        }
        self.idle_ticks += 1;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_only_once() {
        let mut flower = Flower::new(GridPos::new(2, 2));
        assert!(flower.collect_pollen());
        assert!(!flower.collect_pollen());
    }

    #[test]
    fn test_empty_for_exactly_regrow_ticks() {
        let mut flower = Flower::new(GridPos::new(0, 0));
        flower.collect_pollen();

        let mut empty_ticks = 0;
        for _ in 0..20 {
            flower.regrow(4);
            if flower.has_pollen {
                break;
            }
            empty_ticks += 1;
        }
        assert_eq!(empty_ticks, 4);
        assert_eq!(flower.idle_ticks, 0);
    }

    #[test]
    fn test_idle_counter_stays_zero_with_pollen() {
        let mut flower = Flower::new(GridPos::new(0, 0));
        for _ in 0..5 {
            assert!(!flower.regrow(3));
            assert_eq!(flower.idle_ticks, 0);
        }
    }
}
