//! Simulation loop - one `step` resolves one tick
//!
//! A tick runs:
//! 1. queens (orders, then economy)
//! 2. bees, in colony and slot order
//! 3. wasps, in id order
//! 4. flower regrowth
//! 5. arrivals flagged present, then observations and masks for the next round
//! 6. the termination check
//!
//! The actions of a tick were decided from the previous tick's observations
//! and masks. Bees born during the tick were not there when those decisions
//! were made and simply stay put.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::actions::catalog::TickActions;
use crate::colony::Colony;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{BeeId, ColonyId, Tick, WaspId};
use crate::simulation::events::SimulationEvent;
use crate::simulation::masks::{compute_masks, flag_arrivals, Masks};
use crate::simulation::output::Telemetry;
use crate::simulation::perception::{observe_all, Observations};
use crate::simulation::resolve::{resolve_bee, resolve_queen, resolve_wasp};
use crate::world::{generate_layout, WorldLayout, WorldState};

/// Result of one step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observations: Observations,
    pub masks: Masks,
    pub done: bool,
    pub info: Telemetry,
}

pub struct Simulation {
    config: SimulationConfig,
    world: WorldState,
    colonies: Vec<Colony>,
    timestep: Tick,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Validate the config and lay out a first world from its seed
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.run.seed);
        let layout = generate_layout(&config, &mut rng)?;
        let (world, colonies) = build(&config, &layout)?;
        Ok(Self {
            config,
            world,
            colonies,
            timestep: 0,
            rng,
        })
    }

    /// Build a simulation on a hand-placed layout
    pub fn with_layout(config: SimulationConfig, layout: &WorldLayout) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.run.seed);
        let (world, colonies) = build(&config, layout)?;
        Ok(Self {
            config,
            world,
            colonies,
            timestep: 0,
            rng,
        })
    }

    /// Regenerate the world from the simulation's random stream
    pub fn reset(&mut self) -> Result<Observations> {
        let layout = generate_layout(&self.config, &mut self.rng)?;
        self.reset_with_layout(&layout)
    }

    pub fn reset_with_layout(&mut self, layout: &WorldLayout) -> Result<Observations> {
        let (world, colonies) = build(&self.config, layout)?;
        self.world = world;
        self.colonies = colonies;
        self.timestep = 0;
        info!(
            colonies = self.colonies.len(),
            flowers = self.world.flowers.len(),
            wasps = self.world.wasps.len(),
            "simulation reset"
        );
        Ok(self.observe())
    }

    pub fn step(&mut self, actions: &TickActions) -> Result<StepOutcome> {
        self.check_shape(actions)?;
        self.timestep += 1;
        let tick = self.timestep;
        let mut events = Vec::new();

        for (c, orders) in actions.queens.iter().enumerate() {
            resolve_queen(
                &mut self.world,
                &mut self.colonies,
                ColonyId(c),
                orders,
                &self.config,
                tick,
                &mut events,
            )?;
        }

        for (c, colony_actions) in actions.bees.iter().enumerate() {
            for (slot, &action) in colony_actions.iter().enumerate() {
                resolve_bee(
                    &mut self.world,
                    &mut self.colonies,
                    BeeId::new(ColonyId(c), slot),
                    action,
                    &self.config,
                    &mut events,
                );
            }
        }

        for (w, &action) in actions.wasps.iter().enumerate() {
            resolve_wasp(
                &mut self.world,
                &mut self.colonies,
                WaspId(w),
                action,
                &mut events,
            );
        }

        for flower in self.world.regrow_flowers(self.config.flowers.regrow_ticks) {
            debug!(%flower, "flower regrown");
            events.push(SimulationEvent::FlowerRegrown { flower });
        }

        let observations = self.observe();
        let masks = compute_masks(&self.world, &self.colonies);
        let done = self.is_done();

        trace!(
            tick,
            events = events.len(),
            alive = self.colonies.iter().map(Colony::alive_bees).sum::<usize>(),
            done,
            "tick resolved"
        );

        Ok(StepOutcome {
            observations,
            masks,
            done,
            info: Telemetry::capture(tick, &self.colonies, events),
        })
    }

    /// Masks for the current state
    pub fn masks(&self) -> Masks {
        compute_masks(&self.world, &self.colonies)
    }

    /// Flags arriving bees, then observes everyone
    pub fn observe(&mut self) -> Observations {
        flag_arrivals(&self.world, &mut self.colonies);
        observe_all(
            &self.world,
            &self.colonies,
            &self.config.vision,
            self.config.run.parallel_threshold,
        )
    }

    /// Run is over past `max_steps` or once every colony has collapsed
    pub fn is_done(&self) -> bool {
        self.timestep > self.config.run.max_steps || self.colonies.iter().all(|c| !c.is_alive())
    }

    /// Roster sizes, one per colony
    pub fn roster_sizes(&self) -> Vec<usize> {
        self.colonies.iter().map(Colony::roster_len).collect()
    }

    /// Actions that keep everyone in place
    pub fn idle_actions(&self) -> TickActions {
        TickActions::idle(&self.roster_sizes(), self.world.wasps.len())
    }

    fn check_shape(&self, actions: &TickActions) -> Result<()> {
        let colonies = self.colonies.len();
        expect_len("queen colonies", colonies, actions.queens.len())?;
        expect_len("bee colonies", colonies, actions.bees.len())?;
        for (colony, (orders, bees)) in self
            .colonies
            .iter()
            .zip(actions.queens.iter().zip(&actions.bees))
        {
            expect_len("queen", colony.roster_len(), orders.len())?;
            expect_len("bee", colony.roster_len(), bees.len())?;
        }
        expect_len("wasp", self.world.wasps.len(), actions.wasps.len())
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony(&self, id: ColonyId) -> Result<&Colony> {
        self.colonies.get(id.0).ok_or(SimError::UnknownColony(id))
    }

    pub fn colony_mut(&mut self, id: ColonyId) -> Result<&mut Colony> {
        self.colonies.get_mut(id.0).ok_or(SimError::UnknownColony(id))
    }

    pub fn timestep(&self) -> Tick {
        self.timestep
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

fn expect_len(kind: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(SimError::ActionShape {
            kind,
            expected,
            got,
        });
    }
    Ok(())
}

fn build(config: &SimulationConfig, layout: &WorldLayout) -> Result<(WorldState, Vec<Colony>)> {
    let world = WorldState::from_layout(
        config.bounds(),
        layout,
        &config.colonies.bees_per_colony,
        config.wasps.health,
        config.wasps.attack_power,
    )?;
    let colonies = world
        .hives
        .iter()
        .zip(&config.colonies.bees_per_colony)
        .map(|(hive, &count)| {
            Colony::new(
                hive.owner,
                hive.position,
                count,
                &config.economy,
                config.bees.attack_power,
                config.claims.section_size,
            )
        })
        .collect();
    Ok((world, colonies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::catalog::{BeeAction, SlotOrder, WaspAction};
    use crate::core::types::GridPos;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.grid.width = 12;
        config.grid.height = 12;
        config.colonies.bees_per_colony = vec![2];
        config.wasps.count = 1;
        config.run.max_steps = 3;
        config
    }

    fn layout() -> WorldLayout {
        WorldLayout {
            flowers: vec![GridPos::new(0, 2)],
            hives: vec![GridPos::new(0, 0)],
            wasps: vec![GridPos::new(11, 11)],
        }
    }

    #[test]
    fn test_new_generates_a_world() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.colonies().len(), 2);
        assert_eq!(sim.world().wasps.len(), 2);
        assert_eq!(sim.timestep(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.colonies.bees_per_colony.clear();
        assert!(matches!(Simulation::new(config), Err(SimError::Config(_))));
    }

    #[test]
    fn test_bad_shape_leaves_state_untouched() {
        let mut sim = Simulation::with_layout(small_config(), &layout()).unwrap();
        let mut actions = sim.idle_actions();
        actions.bees[0].pop();
        let err = sim.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            SimError::ActionShape {
                kind: "bee",
                expected: 2,
                got: 1
            }
        ));
        assert_eq!(sim.timestep(), 0);

        let mut actions = sim.idle_actions();
        actions.wasps.push(WaspAction::Stay);
        assert!(sim.step(&actions).is_err());
    }

    #[test]
    fn test_done_after_max_steps() {
        let mut sim = Simulation::with_layout(small_config(), &layout()).unwrap();
        for _ in 0..3 {
            assert!(!sim.step(&sim.idle_actions()).unwrap().done);
        }
        assert!(sim.step(&sim.idle_actions()).unwrap().done);
    }

    #[test]
    fn test_done_when_every_colony_collapses() {
        let mut config = small_config();
        config.run.max_steps = 100;
        let mut sim = Simulation::with_layout(config, &layout()).unwrap();
        sim.colony_mut(ColonyId(0)).unwrap().food_stock = 0.0;
        let outcome = sim.step(&sim.idle_actions()).unwrap();
        assert!(outcome.done);
        assert!(outcome.observations.queens[0].is_empty());
        assert!(outcome.masks.bees[0].iter().all(|m| m.is_empty()));
    }

    #[test]
    fn test_release_then_forced_departure() {
        let mut sim = Simulation::with_layout(small_config(), &layout()).unwrap();
        let mut actions = sim.idle_actions();
        actions.queens[0] = vec![SlotOrder::Release, SlotOrder::Retain];
        let outcome = sim.step(&actions).unwrap();
        assert!(!outcome.masks.bees[0][0].allows(BeeAction::Stay));
        assert!(outcome.masks.bees[0][1].allows(BeeAction::Stay));
        assert_eq!(outcome.info.colonies[0].present_in_hive, 1);
    }

    #[test]
    fn test_oversized_vision_sees_whole_grid() {
        let mut config = small_config();
        config.vision.base_radius = 3_000_000_000;
        assert!(config.validate().is_ok());
        let mut sim = Simulation::with_layout(config, &layout()).unwrap();
        let observations = sim.observe();
        assert_eq!(observations.wasps[0].hives.len(), 1);
        assert_eq!(observations.bees[0][0].flowers.len(), 1);
        assert_eq!(observations.queens[0].wasps.len(), 1);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = Simulation::with_layout(small_config(), &layout()).unwrap();
        sim.step(&sim.idle_actions()).unwrap();
        let observations = sim.reset_with_layout(&layout()).unwrap();
        assert_eq!(sim.timestep(), 0);
        assert_eq!(observations.bees[0].len(), 2);
        assert_eq!(observations.queens[0].position, Some(GridPos::new(0, 0)));
        assert!(sim.reset().is_ok());
    }
}
