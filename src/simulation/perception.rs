//! Perception - what each agent can see from where it stands
//!
//! Every live agent sees a square window around itself (queens around their
//! hive) whose half-width is the base vision radius times its class
//! multiplier, clipped to the grid. Dead agents see nothing.
//!
//! Snapshot order is stable: flowers by cell (x, then y), bees by colony then
//! slot, wasps by id, hives by colony.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::colony::Colony;
use crate::core::config::VisionConfig;
use crate::core::types::{BeeId, ColonyId, GridPos, WaspId, Window};
use crate::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiveSighting {
    pub colony: ColonyId,
    pub position: GridPos,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerSighting {
    pub position: GridPos,
    pub has_pollen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeSighting {
    pub id: BeeId,
    pub position: GridPos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaspSighting {
    pub id: WaspId,
    pub position: GridPos,
    pub alive: bool,
}

/// One agent's view of the world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// None for a dead agent
    pub position: Option<GridPos>,
    pub hives: Vec<HiveSighting>,
    pub flowers: Vec<FlowerSighting>,
    pub bees: Vec<BeeSighting>,
    pub wasps: Vec<WaspSighting>,
}

impl Observation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
    }

    pub fn live_wasps(&self) -> impl Iterator<Item = &WaspSighting> + '_ {
        self.wasps.iter().filter(|w| w.alive)
    }
}

/// Observations for every agent, indexed like `TickActions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    pub queens: Vec<Observation>,
    pub bees: Vec<Vec<Observation>>,
    pub wasps: Vec<Observation>,
}

/// Snapshot of everything inside a window
pub fn observe_window(
    world: &WorldState,
    colonies: &[Colony],
    center: GridPos,
    half_width: i32,
) -> Observation {
    let window = Window::around(center, half_width, &world.bounds());

    let hives = world
        .hives
        .iter()
        .filter(|h| window.contains(h.position))
        .map(|h| HiveSighting {
            colony: h.owner,
            position: h.position,
            alive: colonies.get(h.owner.0).is_some_and(Colony::is_alive),
        })
        .collect();

    let mut flowers = Vec::new();
    for x in window.min.x..=window.max.x {
        for y in window.min.y..=window.max.y {
            if let Some(flower) = world.flower_at(GridPos::new(x, y)) {
                flowers.push(FlowerSighting {
                    position: flower.position,
                    has_pollen: flower.has_pollen,
                });
            }
        }
    }

    let bees = colonies
        .iter()
        .flat_map(|colony| {
            colony.roster().iter().filter(|b| b.alive).filter_map(move |bee| {
                let position = world.bee_position(bee.id)?;
                window.contains(position).then_some(BeeSighting {
                    id: bee.id,
                    position,
                })
            })
        })
        .collect();

    let wasps = world
        .wasps
        .iter()
        .filter(|w| window.contains(w.position))
        .map(|w| WaspSighting {
            id: w.id,
            position: w.position,
            alive: w.alive,
        })
        .collect();

    Observation {
        position: Some(center),
        hives,
        flowers,
        bees,
        wasps,
    }
}

pub fn observe_queen(
    world: &WorldState,
    colonies: &[Colony],
    vision: &VisionConfig,
    colony: ColonyId,
) -> Observation {
    match colonies.get(colony.0) {
        Some(c) if c.is_alive() => observe_window(
            world,
            colonies,
            c.hive,
            vision.half_width(vision.queen_multiplier),
        ),
        _ => Observation::empty(),
    }
}

pub fn observe_bee(
    world: &WorldState,
    colonies: &[Colony],
    vision: &VisionConfig,
    bee: BeeId,
) -> Observation {
    let alive = colonies
        .get(bee.colony.0)
        .and_then(|c| c.bee(bee.slot))
        .is_some_and(|b| b.alive);
    match world.bee_position(bee) {
        Some(position) if alive => observe_window(
            world,
            colonies,
            position,
            vision.half_width(vision.bee_multiplier),
        ),
        _ => Observation::empty(),
    }
}

pub fn observe_wasp(
    world: &WorldState,
    colonies: &[Colony],
    vision: &VisionConfig,
    wasp: WaspId,
) -> Observation {
    match world.wasps.get(wasp.0) {
        Some(w) if w.alive => observe_window(
            world,
            colonies,
            w.position,
            vision.half_width(vision.wasp_multiplier),
        ),
        _ => Observation::empty(),
    }
}

/// Observations for every agent. Runs in parallel once the agent count
/// reaches `parallel_threshold`.
pub fn observe_all(
    world: &WorldState,
    colonies: &[Colony],
    vision: &VisionConfig,
    parallel_threshold: usize,
) -> Observations {
    let agent_count = colonies.len()
        + colonies.iter().map(Colony::roster_len).sum::<usize>()
        + world.wasps.len();

    let queens = colonies
        .iter()
        .map(|c| observe_queen(world, colonies, vision, c.id))
        .collect();

    let bee_ids: Vec<Vec<BeeId>> = colonies
        .iter()
        .map(|c| c.roster().iter().map(|b| b.id).collect())
        .collect();

    let bees = if agent_count >= parallel_threshold {
        bee_ids
            .par_iter()
            .map(|ids| {
                ids.par_iter()
                    .map(|&id| observe_bee(world, colonies, vision, id))
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        bee_ids
            .iter()
            .map(|ids| {
                ids.iter()
                    .map(|&id| observe_bee(world, colonies, vision, id))
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    let wasps = world
        .wasps
        .iter()
        .map(|w| observe_wasp(world, colonies, vision, w.id))
        .collect();

    Observations {
        queens,
        bees,
        wasps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EconomyConfig;
    use crate::core::types::Bounds;
    use crate::world::WorldLayout;

    fn setup() -> (WorldState, Vec<Colony>, VisionConfig) {
        let layout = WorldLayout {
            flowers: vec![GridPos::new(2, 2), GridPos::new(8, 8)],
            hives: vec![GridPos::new(0, 0), GridPos::new(9, 0)],
            wasps: vec![GridPos::new(3, 3)],
        };
        let world = WorldState::from_layout(Bounds::new(10, 10), &layout, &[2, 1], 3, 1).unwrap();
        let economy = EconomyConfig {
            nutrition_per_pollen: 5.0,
            consumption_per_bee: 0.1,
            starting_food_per_bee: 10.0,
            good_health: 12,
            bad_health: 5,
            trend_threshold: 10,
        };
        let colonies = vec![
            Colony::new(ColonyId(0), GridPos::new(0, 0), 2, &economy, 1, 8),
            Colony::new(ColonyId(1), GridPos::new(9, 0), 1, &economy, 1, 8),
        ];
        let vision = VisionConfig {
            base_radius: 3,
            queen_multiplier: 1.0,
            bee_multiplier: 1.0,
            wasp_multiplier: 2.0,
        };
        (world, colonies, vision)
    }

    #[test]
    fn test_window_filters_entities() {
        let (world, colonies, vision) = setup();
        let obs = observe_queen(&world, &colonies, &vision, ColonyId(0));
        assert_eq!(obs.position, Some(GridPos::new(0, 0)));
        assert_eq!(obs.flowers.len(), 1);
        assert_eq!(obs.flowers[0].position, GridPos::new(2, 2));
        assert_eq!(obs.hives.len(), 1, "far hive is out of view");
        assert_eq!(obs.bees.len(), 2);
        assert_eq!(obs.wasps.len(), 1);
    }

    #[test]
    fn test_wasp_sees_further() {
        let (world, colonies, vision) = setup();
        let obs = observe_wasp(&world, &colonies, &vision, WaspId(0));
        assert_eq!(obs.hives.len(), 2);
        assert_eq!(obs.flowers.len(), 2);
    }

    #[test]
    fn test_dead_agents_see_nothing() {
        let (mut world, mut colonies, vision) = setup();
        colonies[0].kill_bee(1);
        world.wasps[0].alive = false;
        let bee = observe_bee(&world, &colonies, &vision, BeeId::new(ColonyId(0), 1));
        assert!(bee.is_empty());
        assert!(bee.flowers.is_empty());
        assert!(observe_wasp(&world, &colonies, &vision, WaspId(0)).is_empty());

        let queen = observe_queen(&world, &colonies, &vision, ColonyId(0));
        assert_eq!(queen.bees.len(), 1, "dead bees are not listed");
        assert!(!queen.wasps[0].alive);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (world, colonies, vision) = setup();
        let sequential = observe_all(&world, &colonies, &vision, usize::MAX);
        let parallel = observe_all(&world, &colonies, &vision, 0);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.bees[0].len(), 2);
        assert_eq!(parallel.bees[1].len(), 1);
    }
}
