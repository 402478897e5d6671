//! Flower claims - decentralized coordination between foragers of a colony
//!
//! Bees never talk to each other. Each one looks at what it can see and asks
//! a `ClaimStrategy` for at most one flower to pursue. Two strategies exist:
//!
//! - `DistanceTieBreak`: go for the nearest pollen flower only if no visible
//!   colony-mate is closer to it; exact ties go to the lower roster slot.
//! - `SectionPartition`: the colony keeps a `ClaimMap` of pursued flowers
//!   bucketed by square grid sections; a bee takes the nearest flower nobody
//!   in its colony is pursuing yet.
//!
//! Decisions read a snapshot of the map taken before the tick, and claims are
//! written back afterwards with `ClaimMap::commit`. Under
//! `ClaimCommit::LastWriterWins` two bees can end up chasing the same flower
//! in one tick; the flower's pollen flag decides who actually gets it.

use ahash::AHashMap;

use crate::core::config::ClaimCommit;
use crate::core::types::{BeeId, GridPos};
use crate::simulation::perception::{BeeSighting, FlowerSighting};

/// Flowers pursued by one colony, keyed by section
#[derive(Debug, Clone)]
pub struct ClaimMap {
    section_size: i32,
    /// section -> (flower -> claimant slot)
    sections: AHashMap<(i32, i32), AHashMap<GridPos, usize>>,
    /// claimant slot -> flower
    targets: AHashMap<usize, GridPos>,
}

/// What a bee wants done with its claim after deciding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimUpdate {
    Keep,
    Claim(GridPos),
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimIntent {
    pub slot: usize,
    pub update: ClaimUpdate,
}

/// A claim refused under `ClaimCommit::IntentThenCommit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRejection {
    pub slot: usize,
    pub flower: GridPos,
    pub holder: usize,
}

impl Default for ClaimMap {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ClaimMap {
    pub fn new(section_size: u32) -> Self {
        Self {
            section_size: section_size.max(1) as i32,
            sections: AHashMap::new(),
            targets: AHashMap::new(),
        }
    }

    #[inline]
    pub fn section_of(&self, pos: GridPos) -> (i32, i32) {
        (
            pos.x.div_euclid(self.section_size),
            pos.y.div_euclid(self.section_size),
        )
    }

    pub fn claimant(&self, flower: GridPos) -> Option<usize> {
        self.sections
            .get(&self.section_of(flower))
            .and_then(|section| section.get(&flower))
            .copied()
    }

    pub fn is_pursued(&self, flower: GridPos) -> bool {
        self.claimant(flower).is_some()
    }

    pub fn target_of(&self, slot: usize) -> Option<GridPos> {
        self.targets.get(&slot).copied()
    }

    /// Flowers pursued inside one section
    pub fn pursued_in_section(&self, section: (i32, i32)) -> impl Iterator<Item = GridPos> + '_ {
        self.sections
            .get(&section)
            .into_iter()
            .flat_map(|flowers| flowers.keys().copied())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Claim a flower, overwriting any other claimant
    pub fn claim(&mut self, slot: usize, flower: GridPos) {
        self.release_slot(slot);
        let section = self.section_of(flower);
        if let Some(previous) = self
            .sections
            .entry(section)
            .or_default()
            .insert(flower, slot)
        {
            self.targets.remove(&previous);
        }
        self.targets.insert(slot, flower);
    }

    /// Claim a flower only if no other slot holds it
    pub fn try_claim(&mut self, slot: usize, flower: GridPos) -> Result<(), usize> {
        match self.claimant(flower) {
            Some(holder) if holder != slot => Err(holder),
            _ => {
                self.claim(slot, flower);
                Ok(())
            }
        }
    }

    /// Drop whatever this slot was pursuing
    pub fn release_slot(&mut self, slot: usize) -> Option<GridPos> {
        let flower = self.targets.remove(&slot)?;
        let section = self.section_of(flower);
        if let Some(flowers) = self.sections.get_mut(&section) {
            flowers.remove(&flower);
            if flowers.is_empty() {
                self.sections.remove(&section);
            }
        }
        Some(flower)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.targets.clear();
    }

    /// Write back one decision phase worth of intents, in slot order
    pub fn commit(&mut self, intents: &[ClaimIntent], mode: ClaimCommit) -> Vec<ClaimRejection> {
        let mut ordered: Vec<ClaimIntent> = intents.to_vec();
        ordered.sort_by_key(|intent| intent.slot);

        let mut rejected = Vec::new();
        for intent in ordered {
            match intent.update {
                ClaimUpdate::Keep => {}
                ClaimUpdate::Release => {
                    self.release_slot(intent.slot);
                }
                ClaimUpdate::Claim(flower) => match mode {
                    ClaimCommit::LastWriterWins => self.claim(intent.slot, flower),
                    ClaimCommit::IntentThenCommit => {
                        if let Err(holder) = self.try_claim(intent.slot, flower) {
                            rejected.push(ClaimRejection {
                                slot: intent.slot,
                                flower,
                                holder,
                            });
                        }
                    }
                },
            }
        }
        rejected
    }
}

/// What a bee knows when it looks for a flower
pub struct ClaimRequest<'a> {
    pub observer: BeeId,
    pub position: GridPos,
    pub flowers: &'a [FlowerSighting],
    pub peers: &'a [BeeSighting],
}

impl ClaimRequest<'_> {
    /// Visible pollen flowers, nearest first, ties broken by position
    pub fn pollen_flowers_by_distance(&self) -> Vec<GridPos> {
        let mut flowers: Vec<GridPos> = self
            .flowers
            .iter()
            .filter(|f| f.has_pollen)
            .map(|f| f.position)
            .collect();
        flowers.sort_by_key(|f| (self.position.manhattan(f), *f));
        flowers
    }

    /// Visible live bees of the observer's own colony, observer excluded
    pub fn colony_mates(&self) -> impl Iterator<Item = &BeeSighting> + '_ {
        self.peers
            .iter()
            .filter(move |p| p.id.colony == self.observer.colony && p.id != self.observer)
    }
}

/// Picks at most one flower for a bee to pursue
pub trait ClaimStrategy: Send + Sync {
    fn select(&self, request: &ClaimRequest<'_>, claims: &ClaimMap) -> Option<GridPos>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceTieBreak;

impl ClaimStrategy for DistanceTieBreak {
    fn select(&self, request: &ClaimRequest<'_>, _claims: &ClaimMap) -> Option<GridPos> {
        let nearest = *request.pollen_flowers_by_distance().first()?;
        let mine = request.position.manhattan(&nearest);

        let outranked = request.colony_mates().any(|peer| {
            let theirs = peer.position.manhattan(&nearest);
            theirs < mine || (theirs == mine && peer.id.slot < request.observer.slot)
        });

        (!outranked).then_some(nearest)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionPartition;

impl ClaimStrategy for SectionPartition {
    fn select(&self, request: &ClaimRequest<'_>, claims: &ClaimMap) -> Option<GridPos> {
        request
            .pollen_flowers_by_distance()
            .into_iter()
            .find(|flower| match claims.claimant(*flower) {
                None => true,
                Some(holder) => holder == request.observer.slot,
            })
    }
}
