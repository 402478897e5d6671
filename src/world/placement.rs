//! Reset-time layout generation
//!
//! Produces the static layout of a run: flower cells (uniform or clustered),
//! one hive per colony with a minimum spacing between hives, and wasp spawns
//! kept away from every hive. A layout can also be written by hand (or read
//! from JSON) for scripted scenarios.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Bounds, GridPos};

/// Attempts per hive or wasp before placement gives up
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Static layout of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub flowers: Vec<GridPos>,
    /// One hive per colony, in colony order
    pub hives: Vec<GridPos>,
    pub wasps: Vec<GridPos>,
}

impl WorldLayout {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Generate a random layout for the given configuration
pub fn generate_layout<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Result<WorldLayout> {
    let bounds = config.bounds();
    let flowers = generate_flowers(config, &bounds, rng);

    let mut taken: AHashSet<GridPos> = flowers.iter().copied().collect();
    let mut hives = Vec::with_capacity(config.colony_count());
    for colony in 0..config.colony_count() {
        let spacing = config.colonies.min_hive_spacing;
        let hive = place_with(&bounds, &taken, rng, |pos| {
            hives.iter().all(|h: &GridPos| pos.euclidean(h) >= spacing)
        })
        .ok_or_else(|| {
            SimError::Placement(format!(
                "no cell for hive {} at spacing {}",
                colony, spacing
            ))
        })?;
        taken.insert(hive);
        hives.push(hive);
    }

    let mut wasps = Vec::with_capacity(config.wasps.count);
    for wasp in 0..config.wasps.count {
        let distance = config.wasps.min_hive_distance;
        let spawn = place_with(&bounds, &taken, rng, |pos| {
            hives.iter().all(|h| pos.euclidean(h) >= distance)
        })
        .ok_or_else(|| {
            SimError::Placement(format!(
                "no cell for wasp {} at distance {} from hives",
                wasp, distance
            ))
        })?;
        wasps.push(spawn);
    }

    Ok(WorldLayout {
        flowers,
        hives,
        wasps,
    })
}

fn generate_flowers<R: Rng>(
    config: &SimulationConfig,
    bounds: &Bounds,
    rng: &mut R,
) -> Vec<GridPos> {
    let density = config.flowers.density;

    if config.flowers.clusters == 0 {
        return bounds.cells().filter(|_| rng.gen::<f64>() < density).collect();
    }

    let centers: Vec<GridPos> = (0..config.flowers.clusters)
        .map(|_| random_cell(bounds, rng))
        .collect();
    let spread = config.flowers.cluster_spread;

    bounds
        .cells()
        .filter(|cell| centers.iter().any(|c| cell.euclidean(c) <= spread))
        .filter(|_| rng.gen::<f64>() < density)
        .collect()
}

fn random_cell<R: Rng>(bounds: &Bounds, rng: &mut R) -> GridPos {
    GridPos::new(rng.gen_range(0..bounds.width), rng.gen_range(0..bounds.height))
}

/// Random free cell satisfying `accept`, or None after too many attempts
fn place_with<R: Rng>(
    bounds: &Bounds,
    taken: &AHashSet<GridPos>,
    rng: &mut R,
    accept: impl Fn(GridPos) -> bool,
) -> Option<GridPos> {
    (0..MAX_PLACEMENT_ATTEMPTS)
        .map(|_| random_cell(bounds, rng))
        .find(|pos| !taken.contains(pos) && accept(*pos))
}
