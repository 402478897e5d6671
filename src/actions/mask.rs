//! Legal-action masks

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::actions::catalog::{ActionSpace, SlotOrder};

/// Set of legal actions for one agent, one bit per action code
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ActionMask<A: ActionSpace> {
    bits: u8,
    _space: PhantomData<A>,
}

impl<A: ActionSpace> ActionMask<A> {
    fn from_bits(bits: u8) -> Self {
        Self {
            bits,
            _space: PhantomData,
        }
    }

    /// Every action legal
    pub fn all() -> Self {
        let bits = A::ALL.iter().fold(0u8, |acc, a| acc | (1 << a.code()));
        Self::from_bits(bits)
    }

    /// Nothing legal (dead agents)
    pub fn none() -> Self {
        Self::from_bits(0)
    }

    pub fn only(actions: &[A]) -> Self {
        let bits = actions.iter().fold(0u8, |acc, a| acc | (1 << a.code()));
        Self::from_bits(bits)
    }

    pub fn allows(&self, action: A) -> bool {
        self.bits & (1 << action.code()) != 0
    }

    pub fn forbid(&mut self, action: A) {
        self.bits &= !(1 << action.code());
    }

    /// Keep only the listed actions that are already legal
    pub fn restrict_to(&mut self, actions: &[A]) {
        self.bits &= Self::only(actions).bits;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn legal(&self) -> impl Iterator<Item = A> + '_ {
        A::ALL.iter().copied().filter(move |a| self.allows(*a))
    }

    /// The preferred action if legal, else the first legal action, else STAY
    pub fn resolve(&self, preferred: A) -> A {
        if self.allows(preferred) {
            return preferred;
        }
        self.legal().next().unwrap_or(A::STAY)
    }
}

impl<A: ActionSpace> std::fmt::Debug for ActionMask<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.legal()).finish()
    }
}

/// Queen mask value for one roster slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum QueenSlotMask {
    ForcedRelease = 0,
    ForcedRetain = 1,
    Free = 2,
}

impl QueenSlotMask {
    /// Apply the mask to a requested order
    pub fn apply(self, order: SlotOrder) -> SlotOrder {
        match self {
            QueenSlotMask::ForcedRelease => SlotOrder::Release,
            QueenSlotMask::ForcedRetain => SlotOrder::Retain,
            QueenSlotMask::Free => order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::catalog::{BeeAction, WaspAction};

    #[test]
    fn test_all_and_none() {
        let all = ActionMask::<BeeAction>::all();
        assert_eq!(all.legal().count(), 8);
        assert_eq!(ActionMask::<WaspAction>::all().legal().count(), 6);
        assert!(ActionMask::<BeeAction>::none().is_empty());
    }

    #[test]
    fn test_restrict_is_an_intersection() {
        let mut mask = ActionMask::<BeeAction>::all();
        mask.forbid(BeeAction::Attack);
        mask.restrict_to(&[BeeAction::Stay, BeeAction::Attack]);
        assert_eq!(mask.legal().collect::<Vec<_>>(), vec![BeeAction::Stay]);
    }

    #[test]
    fn test_resolve_falls_back() {
        let mask = ActionMask::only(&[BeeAction::Drop]);
        assert_eq!(mask.resolve(BeeAction::Up), BeeAction::Drop);
        assert_eq!(mask.resolve(BeeAction::Drop), BeeAction::Drop);
        assert_eq!(ActionMask::<BeeAction>::none().resolve(BeeAction::Up), BeeAction::Stay);
    }

    #[test]
    fn test_queen_slot_mask_overrides() {
        assert_eq!(QueenSlotMask::ForcedRelease.apply(SlotOrder::Retain), SlotOrder::Release);
        assert_eq!(QueenSlotMask::ForcedRetain.apply(SlotOrder::Release), SlotOrder::Retain);
        assert_eq!(QueenSlotMask::Free.apply(SlotOrder::Release), SlotOrder::Release);
    }
}
