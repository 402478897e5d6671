//! Action definitions and encodings
//!
//! Bees choose one of 8 actions, wasps one of 6, and each queen issues one
//! release/retain order per roster slot. Raw codes from outside the crate
//! are decoded with `TryFrom<u8>`; an unknown code is fatal.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Discrete action space of one agent class
pub trait ActionSpace: Copy + Eq + std::fmt::Debug + 'static {
    /// Every action, in code order
    const ALL: &'static [Self];
    /// Conventional fallback when nothing else is legal
    const STAY: Self;

    fn code(self) -> u8;
}

/// Bee action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BeeAction {
    Stay = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
    Attack = 5,
    Pick = 6,
    Drop = 7,
}

/// Wasp action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WaspAction {
    Stay = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
    Attack = 5,
}

/// Queen order for a single roster slot
///
/// Orders are applied as a logical AND with the presence bit: a queen can
/// release a bee that is inside, but cannot summon one that is outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SlotOrder {
    Release = 0,
    Retain = 1,
}

/// Grid step for a movement, `None` for non-movement actions
///
/// `Up`/`Down` move along x, `Left`/`Right` along y.
pub fn step_delta(code: u8) -> Option<(i32, i32)> {
    match code {
        1 => Some((-1, 0)),
        2 => Some((1, 0)),
        3 => Some((0, -1)),
        4 => Some((0, 1)),
        _ => None,
    }
}

impl ActionSpace for BeeAction {
    const ALL: &'static [Self] = &[
        BeeAction::Stay,
        BeeAction::Up,
        BeeAction::Down,
        BeeAction::Left,
        BeeAction::Right,
        BeeAction::Attack,
        BeeAction::Pick,
        BeeAction::Drop,
    ];
    const STAY: Self = BeeAction::Stay;

    fn code(self) -> u8 {
        self as u8
    }
}

impl ActionSpace for WaspAction {
    const ALL: &'static [Self] = &[
        WaspAction::Stay,
        WaspAction::Up,
        WaspAction::Down,
        WaspAction::Left,
        WaspAction::Right,
        WaspAction::Attack,
    ];
    const STAY: Self = WaspAction::Stay;

    fn code(self) -> u8 {
        self as u8
    }
}

impl BeeAction {
    pub fn delta(self) -> Option<(i32, i32)> {
        step_delta(self.code())
    }
}

impl WaspAction {
    pub fn delta(self) -> Option<(i32, i32)> {
        step_delta(self.code())
    }
}

impl TryFrom<u8> for BeeAction {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self> {
        BeeAction::ALL
            .get(code as usize)
            .copied()
            .ok_or(SimError::UnknownAction { kind: "bee", code })
    }
}

impl TryFrom<u8> for WaspAction {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self> {
        WaspAction::ALL
            .get(code as usize)
            .copied()
            .ok_or(SimError::UnknownAction { kind: "wasp", code })
    }
}

impl TryFrom<u8> for SlotOrder {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(SlotOrder::Release),
            1 => Ok(SlotOrder::Retain),
            _ => Err(SimError::UnknownAction { kind: "queen", code }),
        }
    }
}

/// One tick's worth of decisions for every agent
///
/// `queens[c]` and `bees[c]` are indexed by roster slot of colony `c` as it
/// stood when the decisions were made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickActions {
    pub queens: Vec<Vec<SlotOrder>>,
    pub bees: Vec<Vec<BeeAction>>,
    pub wasps: Vec<WaspAction>,
}

impl TickActions {
    /// Everyone stays put and every queen retains every bee
    pub fn idle(roster_sizes: &[usize], wasp_count: usize) -> Self {
        Self {
            queens: roster_sizes.iter().map(|&n| vec![SlotOrder::Retain; n]).collect(),
            bees: roster_sizes.iter().map(|&n| vec![BeeAction::Stay; n]).collect(),
            wasps: vec![WaspAction::Stay; wasp_count],
        }
    }

    /// Decode raw action codes; any unknown code aborts the decode
    pub fn from_codes(queens: &[Vec<u8>], bees: &[Vec<u8>], wasps: &[u8]) -> Result<Self> {
        let queens = queens
            .iter()
            .map(|orders| orders.iter().map(|&c| SlotOrder::try_from(c)).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;
        let bees = bees
            .iter()
            .map(|actions| actions.iter().map(|&c| BeeAction::try_from(c)).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;
        let wasps = wasps
            .iter()
            .map(|&c| WaspAction::try_from(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            queens,
            bees,
            wasps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_through_all() {
        for (i, action) in BeeAction::ALL.iter().enumerate() {
            assert_eq!(action.code() as usize, i);
        }
        for (i, action) in WaspAction::ALL.iter().enumerate() {
            assert_eq!(action.code() as usize, i);
        }
    }

    #[test]
    fn test_unknown_codes_are_errors() {
        assert!(matches!(
            BeeAction::try_from(8),
            Err(SimError::UnknownAction { kind: "bee", code: 8 })
        ));
        assert!(WaspAction::try_from(6).is_err());
        assert!(WaspAction::try_from(5).is_ok());
        assert!(SlotOrder::try_from(2).is_err());
    }

    #[test]
    fn test_movement_deltas() {
        assert_eq!(BeeAction::Up.delta(), Some((-1, 0)));
        assert_eq!(BeeAction::Right.delta(), Some((0, 1)));
        assert_eq!(BeeAction::Pick.delta(), None);
        assert_eq!(WaspAction::Down.delta(), Some((1, 0)));
        assert_eq!(WaspAction::Attack.delta(), None);
    }

    #[test]
    fn test_from_codes_rejects_bad_wasp() {
        let result = TickActions::from_codes(&[vec![1, 0]], &[vec![0, 6]], &[9]);
        assert!(matches!(result, Err(SimError::UnknownAction { kind: "wasp", .. })));

        let ok = TickActions::from_codes(&[vec![1, 0]], &[vec![0, 6]], &[5]).unwrap();
        assert_eq!(ok.bees[0][1], BeeAction::Pick);
        assert_eq!(ok.queens[0][1], SlotOrder::Release);
    }
}
