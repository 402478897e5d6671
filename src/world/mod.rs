//! WorldState - the authoritative registry of positions and resources
//!
//! Holds flowers, hives, bee positions (per colony, indexed by roster slot)
//! and wasps. It has no behavior of its own beyond lookups and mutators; the
//! resolver is the only code that moves things during a tick.

pub mod flower;
pub mod placement;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{BeeId, Bounds, ColonyId, GridPos, WaspId};
use crate::entity::Wasp;
use crate::spatial::Grid;

pub use flower::Flower;
pub use placement::{generate_layout, WorldLayout};

/// A colony's home cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beehive {
    pub position: GridPos,
    pub owner: ColonyId,
}

pub struct WorldState {
    bounds: Bounds,
    pub flowers: Vec<Flower>,
    flower_index: Grid<Option<usize>>,
    pub hives: Vec<Beehive>,
    /// Bee positions per colony, indexed by roster slot
    pub bee_positions: Vec<Vec<GridPos>>,
    pub wasps: Vec<Wasp>,
}

impl WorldState {
    /// Build a world from a layout. Every bee starts at its hive.
    pub fn from_layout(
        bounds: Bounds,
        layout: &WorldLayout,
        bees_per_colony: &[usize],
        wasp_health: u32,
        wasp_attack: u32,
    ) -> Result<Self> {
        if layout.hives.len() != bees_per_colony.len() {
            return Err(SimError::Placement(format!(
                "layout has {} hives for {} colonies",
                layout.hives.len(),
                bees_per_colony.len()
            )));
        }
        let mut all_positions = layout
            .flowers
            .iter()
            .chain(&layout.hives)
            .chain(&layout.wasps);
        if let Some(pos) = all_positions.find(|p| !bounds.contains(**p)) {
            return Err(SimError::Placement(format!("{} is outside the grid", pos)));
        }

        let mut flower_index = Grid::new(bounds);
        let mut flowers = Vec::with_capacity(layout.flowers.len());
        for &pos in &layout.flowers {
            if matches!(flower_index.get(pos), Some(Some(_))) {
                continue;
            }
            flower_index.set(pos, Some(flowers.len()));
            flowers.push(Flower::new(pos));
        }

        let hives: Vec<Beehive> = layout
            .hives
            .iter()
            .enumerate()
            .map(|(i, &position)| Beehive {
                position,
                owner: ColonyId(i),
            })
            .collect();

        let bee_positions = hives
            .iter()
            .zip(bees_per_colony)
            .map(|(hive, &count)| vec![hive.position; count])
            .collect();

        let wasps = layout
            .wasps
            .iter()
            .enumerate()
            .map(|(i, &pos)| Wasp::new(WaspId(i), pos, wasp_health, wasp_attack))
            .collect();

        Ok(Self {
            bounds,
            flowers,
            flower_index,
            hives,
            bee_positions,
            wasps,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn flower_at(&self, pos: GridPos) -> Option<&Flower> {
        let idx = (*self.flower_index.get(pos)?)?;
        self.flowers.get(idx)
    }

    pub fn flower_at_mut(&mut self, pos: GridPos) -> Option<&mut Flower> {
        let idx = (*self.flower_index.get(pos)?)?;
        self.flowers.get_mut(idx)
    }

    pub fn has_flower(&self, pos: GridPos) -> bool {
        self.flower_at(pos).is_some()
    }

    pub fn hive(&self, colony: ColonyId) -> Option<&Beehive> {
        self.hives.get(colony.0)
    }

    /// Colony whose hive sits on this cell
    pub fn hive_at(&self, pos: GridPos) -> Option<ColonyId> {
        self.hives.iter().find(|h| h.position == pos).map(|h| h.owner)
    }

    pub fn bee_position(&self, bee: BeeId) -> Option<GridPos> {
        self.bee_positions.get(bee.colony.0)?.get(bee.slot).copied()
    }

    pub fn set_bee_position(&mut self, bee: BeeId, pos: GridPos) {
        let clamped = self.bounds.clamp(pos);
        if let Some(slot) = self
            .bee_positions
            .get_mut(bee.colony.0)
            .and_then(|colony| colony.get_mut(bee.slot))
        {
            *slot = clamped;
        }
    }

    /// Register a newborn bee at its hive. Returns the slot it was given.
    pub fn register_bee(&mut self, colony: ColonyId) -> Result<usize> {
        let hive = self
            .hive(colony)
            .map(|h| h.position)
            .ok_or(SimError::UnknownColony(colony))?;
        let positions = self
            .bee_positions
            .get_mut(colony.0)
            .ok_or(SimError::UnknownColony(colony))?;
        positions.push(hive);
        Ok(positions.len() - 1)
    }

    /// First live wasp standing on a cell
    pub fn live_wasp_at(&self, pos: GridPos) -> Option<WaspId> {
        self.wasps
            .iter()
            .find(|w| w.alive && w.position == pos)
            .map(|w| w.id)
    }

    pub fn wasp_mut(&mut self, id: WaspId) -> Option<&mut Wasp> {
        self.wasps.get_mut(id.0)
    }

    /// End-of-tick flower regrowth. Returns the cells that regained pollen.
    pub fn regrow_flowers(&mut self, regrow_ticks: u32) -> Vec<GridPos> {
        self.flowers
            .iter_mut()
            .filter_map(|f| f.regrow(regrow_ticks).then_some(f.position))
            .collect()
    }
}
