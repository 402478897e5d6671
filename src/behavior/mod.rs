//! Agent policies
//!
//! Every agent class has a strategy trait with one required method,
//! `decide`, that maps what the agent sees (plus its mask) to an action.
//! Variants are picked per run with the `*Kind` enums and built as boxed
//! trait objects.

pub mod bee;
pub mod queen;
pub mod searching;
pub mod wasp;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actions::catalog::{BeeAction, SlotOrder, WaspAction};
use crate::actions::mask::{ActionMask, QueenSlotMask};
use crate::colony::{ClaimMap, ClaimUpdate, Colony};
use crate::core::config::EconomyConfig;
use crate::core::types::{BeeId, Bounds, GridPos, WaspId};
use crate::simulation::perception::Observation;

pub use searching::{move_away, move_towards, Heading, SearchingGuide};

/// Everything a queen decides from
pub struct QueenView<'a> {
    pub colony: &'a Colony,
    pub observation: &'a Observation,
    pub mask: &'a [QueenSlotMask],
    pub economy: &'a EconomyConfig,
}

impl QueenView<'_> {
    /// Apply the slot mask to a set of orders
    pub fn constrain(&self, orders: Vec<SlotOrder>) -> Vec<SlotOrder> {
        self.mask
            .iter()
            .zip(orders)
            .map(|(mask, order)| mask.apply(order))
            .collect()
    }

    /// Same order for every slot
    pub fn uniform(&self, order: SlotOrder) -> Vec<SlotOrder> {
        self.constrain(vec![order; self.mask.len()])
    }
}

/// Everything a bee decides from
pub struct BeeView<'a> {
    pub id: BeeId,
    pub hive: GridPos,
    pub bounds: Bounds,
    pub carrying_pollen: bool,
    pub observation: &'a Observation,
    pub mask: ActionMask<BeeAction>,
    /// The colony's claims as they stood before this decision phase
    pub claims: &'a ClaimMap,
}

impl BeeView<'_> {
    /// Mask-resolved action
    pub fn act(&self, preferred: BeeAction) -> BeeDecision {
        BeeDecision {
            action: self.mask.resolve(preferred),
            claim: ClaimUpdate::Keep,
        }
    }

    pub fn head(&self, heading: Heading) -> BeeDecision {
        self.act(heading.into())
    }

    /// Step that gets the bee further from its hive without hitting a wall
    pub fn leave_hive(&self, position: GridPos) -> BeeDecision {
        self.head(move_away(position, self.hive, &self.bounds))
    }

    /// Step toward a cell, picking once there
    pub fn approach(&self, position: GridPos, target: GridPos) -> BeeDecision {
        match move_towards(position, target) {
            Some(heading) => self.head(heading),
            None => self.act(BeeAction::Pick),
        }
    }

    /// Shared opening of every forager: strike, hold, or bring pollen home
    pub fn routine(&self) -> Option<BeeDecision> {
        let Some(position) = self.observation.position else {
            return Some(self.act(BeeAction::Stay));
        };
        if self.mask.allows(BeeAction::Attack) {
            return Some(self.act(BeeAction::Attack));
        }
        if self.mask == ActionMask::only(&[BeeAction::Stay]) {
            return Some(self.act(BeeAction::Stay));
        }
        if self.carrying_pollen {
            return Some(match move_towards(position, self.hive) {
                Some(heading) => self.head(heading),
                None => self.act(BeeAction::Drop),
            });
        }
        None
    }
}

/// A bee's action plus what to do with its claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeeDecision {
    pub action: BeeAction,
    pub claim: ClaimUpdate,
}

impl BeeDecision {
    pub fn with_claim(mut self, claim: ClaimUpdate) -> Self {
        self.claim = claim;
        self
    }
}

/// Everything a wasp decides from
pub struct WaspView<'a> {
    pub id: WaspId,
    pub observation: &'a Observation,
    pub mask: ActionMask<WaspAction>,
}

pub trait QueenPolicy: Send {
    fn decide(&mut self, view: &QueenView<'_>, rng: &mut ChaCha8Rng) -> Vec<SlotOrder>;
}

pub trait BeePolicy: Send {
    fn decide(&mut self, view: &BeeView<'_>, rng: &mut ChaCha8Rng) -> BeeDecision;

    /// The claim made this tick was refused; another bee holds `flower`
    fn claim_rejected(&mut self, _flower: GridPos) {}
}

pub trait WaspPolicy: Send {
    fn decide(&mut self, view: &WaspView<'_>, rng: &mut ChaCha8Rng) -> WaspAction;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum QueenKind {
    Greedy,
    Conservative,
    #[default]
    Considerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BeeKind {
    Greedy,
    Respectful,
    #[default]
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WaspKind {
    #[default]
    Greedy,
}

impl QueenKind {
    pub fn build(self) -> Box<dyn QueenPolicy> {
        match self {
            QueenKind::Greedy => Box::new(queen::GreedyQueen),
            QueenKind::Conservative => Box::new(queen::ConservativeQueen),
            QueenKind::Considerate => Box::new(queen::ConsiderateQueen),
        }
    }
}

impl BeeKind {
    pub fn build(self) -> Box<dyn BeePolicy> {
        match self {
            BeeKind::Greedy => Box::new(bee::GreedyBee),
            BeeKind::Respectful => Box::new(bee::RespectfulBee::new()),
            BeeKind::Social => Box::new(bee::SocialBee::new()),
        }
    }
}

impl WaspKind {
    pub fn build(self) -> Box<dyn WaspPolicy> {
        match self {
            WaspKind::Greedy => Box::new(wasp::GreedyWasp::new()),
        }
    }
}
