//! Action resolution
//!
//! One call resolves one agent's action against the world. The tick driver
//! calls these in a fixed order: every queen, then every bee, then every
//! wasp. Moves are clamped to the grid; actions whose preconditions fail are
//! no-ops. A bee still held inside its hive cannot fly out until the queen
//! releases it. Dead agents and agents of collapsed colonies are skipped.

use tracing::{debug, info, trace};

use crate::actions::catalog::{BeeAction, SlotOrder, WaspAction};
use crate::colony::{Colony, EconomyOutcome};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{BeeId, ColonyId, Tick, WaspId};
use crate::entity::StrikeOutcome;
use crate::simulation::events::SimulationEvent;
use crate::world::WorldState;

/// Apply a queen's orders, then run her colony's economy tick
pub fn resolve_queen(
    world: &mut WorldState,
    colonies: &mut [Colony],
    colony_id: ColonyId,
    orders: &[SlotOrder],
    config: &SimulationConfig,
    tick: Tick,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let colony = colonies
        .get_mut(colony_id.0)
        .ok_or(SimError::UnknownColony(colony_id))?;
    if !colony.is_alive() {
        return Ok(());
    }

    colony.apply_orders(orders);

    match colony.tick(&config.economy) {
        EconomyOutcome::Steady => {}
        EconomyOutcome::Spawned(bee) => {
            let slot = world.register_bee(colony_id)?;
            debug_assert_eq!(slot, bee.slot, "roster and world slots diverged");
            debug!(?bee, food = colony.food_stock, "bee spawned");
            events.push(SimulationEvent::BeeSpawned { bee });
        }
        EconomyOutcome::Culled(bee) => {
            world.set_bee_position(bee, colony.hive);
            debug!(?bee, food = colony.food_stock, "bee culled");
            events.push(SimulationEvent::BeeCulled { bee });
        }
        EconomyOutcome::Collapsed { casualties } => {
            for slot in 0..colony.roster_len() {
                world.set_bee_position(BeeId::new(colony_id, slot), colony.hive);
            }
            info!(
                colony = colony_id.0,
                tick,
                casualties,
                food = colony.food_stock,
                "colony collapsed"
            );
            events.push(SimulationEvent::ColonyCollapsed {
                colony: colony_id,
                casualties,
                tick,
            });
        }
    }
    Ok(())
}

pub fn resolve_bee(
    world: &mut WorldState,
    colonies: &mut [Colony],
    bee: BeeId,
    action: BeeAction,
    config: &SimulationConfig,
    events: &mut Vec<SimulationEvent>,
) {
    let Some(colony) = colonies.get_mut(bee.colony.0) else {
        return;
    };
    if !colony.is_alive() || !colony.bee(bee.slot).is_some_and(|b| b.alive) {
        return;
    }
    let Some(position) = world.bee_position(bee) else {
        return;
    };

    match action {
        BeeAction::Stay => {}
        BeeAction::Up | BeeAction::Down | BeeAction::Left | BeeAction::Right => {
            if position == colony.hive && colony.is_present(bee.slot) {
                trace!(?bee, "retained bee cannot leave the hive");
                return;
            }
            if let Some((dx, dy)) = action.delta() {
                world.set_bee_position(bee, position.offset(dx, dy));
            }
        }
        BeeAction::Pick => {
            let picked = world
                .flower_at_mut(position)
                .is_some_and(|flower| flower.collect_pollen());
            if picked {
                if let Some(record) = colony.bee_mut(bee.slot) {
                    record.load_pollen();
                }
                events.push(SimulationEvent::PollenPicked {
                    bee,
                    flower: position,
                });
            }
        }
        BeeAction::Drop => {
            if position != colony.hive {
                return;
            }
            let delivered = colony
                .bee_mut(bee.slot)
                .is_some_and(|record| record.unload_pollen());
            if delivered {
                colony.receive_pollen(&config.economy);
                colony.welcome(bee.slot);
                colony.claims.release_slot(bee.slot);
                debug!(?bee, food = colony.food_stock, "pollen delivered");
                events.push(SimulationEvent::PollenDelivered {
                    bee,
                    food_stock: colony.food_stock,
                });
            }
        }
        BeeAction::Attack => {
            let Some(wasp_id) = world.live_wasp_at(position) else {
                return;
            };
            let power = colony.bee(bee.slot).map_or(0, |b| b.attack_power);
            let Some(wasp) = world.wasp_mut(wasp_id) else {
                return;
            };
            let outcome = wasp.receive_strike(power);
            let wasp_health = wasp.health;

            let (spent, killed) = match outcome {
                StrikeOutcome::Wounded { .. } => (true, false),
                StrikeOutcome::Killed => (true, true),
                StrikeOutcome::Finalized => (false, true),
            };
            if spent {
                colony.kill_bee(bee.slot);
                world.set_bee_position(bee, colony.hive);
                debug!(?bee, wasp = wasp_id.0, wasp_health, "kamikaze strike");
                events.push(SimulationEvent::KamikazeStrike {
                    bee,
                    wasp: wasp_id,
                    wasp_health,
                });
            }
            if killed {
                debug!(wasp = wasp_id.0, by = ?bee, "wasp killed");
                events.push(SimulationEvent::WaspKilled {
                    wasp: wasp_id,
                    by: bee,
                });
            }
        }
    }
}

pub fn resolve_wasp(
    world: &mut WorldState,
    colonies: &mut [Colony],
    wasp_id: WaspId,
    action: WaspAction,
    events: &mut Vec<SimulationEvent>,
) {
    let bounds = world.bounds();
    let Some(wasp) = world.wasp_mut(wasp_id).filter(|w| w.alive) else {
        return;
    };

    match action {
        WaspAction::Stay => {}
        WaspAction::Up | WaspAction::Down | WaspAction::Left | WaspAction::Right => {
            if let Some((dx, dy)) = action.delta() {
                wasp.position = bounds.clamp(wasp.position.offset(dx, dy));
            }
        }
        WaspAction::Attack => {
            let (position, damage) = (wasp.position, wasp.attack_power);
            let Some(owner) = world.hive_at(position) else {
                return;
            };
            let Some(colony) = colonies.get_mut(owner.0).filter(|c| c.is_alive()) else {
                return;
            };
            colony.receive_damage(damage);
            debug!(
                wasp = wasp_id.0,
                colony = owner.0,
                damage,
                food = colony.food_stock,
                "hive raided"
            );
            events.push(SimulationEvent::HiveRaided {
                wasp: wasp_id,
                colony: owner,
                damage,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;
    use crate::world::WorldLayout;

    fn setup() -> (WorldState, Vec<Colony>, SimulationConfig) {
        let mut config = SimulationConfig::default();
        config.grid.width = 10;
        config.grid.height = 10;
        config.colonies.bees_per_colony = vec![2];
        let layout = WorldLayout {
            flowers: vec![GridPos::new(0, 1)],
            hives: vec![GridPos::new(0, 0)],
            wasps: vec![GridPos::new(1, 0)],
        };
        let world = WorldState::from_layout(config.bounds(), &layout, &[2], 2, 1).unwrap();
        let colonies = vec![Colony::new(
            ColonyId(0),
            GridPos::new(0, 0),
            2,
            &config.economy,
            1,
            8,
        )];
        (world, colonies, config)
    }

    fn bee(slot: usize) -> BeeId {
        BeeId::new(ColonyId(0), slot)
    }

    #[test]
    fn test_retained_bee_stays_inside() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Down, &config, &mut events);
        assert_eq!(world.bee_position(bee(0)), Some(GridPos::new(0, 0)));
        assert!(colonies[0].is_present(0));

        colonies[0].apply_orders(&[SlotOrder::Release, SlotOrder::Retain]);
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Down, &config, &mut events);
        assert_eq!(world.bee_position(bee(0)), Some(GridPos::new(1, 0)));
        assert_eq!(colonies[0].present_count(), 1);
    }

    #[test]
    fn test_moves_clamp_at_edges() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        colonies[0].apply_orders(&[SlotOrder::Release, SlotOrder::Retain]);
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Up, &config, &mut events);
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Left, &config, &mut events);
        assert_eq!(world.bee_position(bee(0)), Some(GridPos::new(0, 0)));
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Down, &config, &mut events);
        assert_eq!(world.bee_position(bee(0)), Some(GridPos::new(1, 0)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_pick_and_drop() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        let start = colonies[0].food_stock;
        colonies[0].apply_orders(&[SlotOrder::Release, SlotOrder::Retain]);

        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Pick, &config, &mut events);
        assert!(events.is_empty(), "no flower at the hive");

        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Right, &config, &mut events);
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Pick, &config, &mut events);
        assert!(colonies[0].bee(0).unwrap().carrying_pollen);
        assert!(!world.flower_at(GridPos::new(0, 1)).unwrap().has_pollen);

        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Drop, &config, &mut events);
        assert!(colonies[0].bee(0).unwrap().carrying_pollen, "drop away from home is a no-op");

        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Left, &config, &mut events);
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Drop, &config, &mut events);
        assert!(!colonies[0].bee(0).unwrap().carrying_pollen);
        assert_eq!(colonies[0].food_stock, start + config.economy.nutrition_per_pollen);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_second_pick_on_same_flower_fails() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        world.set_bee_position(bee(0), GridPos::new(0, 1));
        world.set_bee_position(bee(1), GridPos::new(0, 1));
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Pick, &config, &mut events);
        resolve_bee(&mut world, &mut colonies, bee(1), BeeAction::Pick, &config, &mut events);
        assert!(colonies[0].bee(0).unwrap().carrying_pollen);
        assert!(!colonies[0].bee(1).unwrap().carrying_pollen);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_kamikaze_wounds_wasp() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        world.set_bee_position(bee(1), GridPos::new(1, 0));
        resolve_bee(&mut world, &mut colonies, bee(1), BeeAction::Attack, &config, &mut events);

        assert_eq!(world.wasps[0].health, 1);
        assert!(world.wasps[0].alive);
        assert!(!colonies[0].bee(1).unwrap().alive);
        assert_eq!(colonies[0].alive_bees(), 1);
        assert_eq!(
            world.bee_position(bee(1)),
            Some(GridPos::new(0, 0)),
            "dead bees rest at the hive"
        );
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SimulationEvent::KamikazeStrike { wasp_health: 1, .. }));
    }

    #[test]
    fn test_zero_health_wasp_is_finalized_without_losing_the_bee() {
        let (mut world, mut colonies, config) = setup();
        let mut events = Vec::new();
        world.wasps[0].health = 0;
        world.set_bee_position(bee(0), GridPos::new(1, 0));
        resolve_bee(&mut world, &mut colonies, bee(0), BeeAction::Attack, &config, &mut events);
        assert!(!world.wasps[0].alive);
        assert!(colonies[0].bee(0).unwrap().alive);
        assert!(matches!(events[..], [SimulationEvent::WaspKilled { .. }]));
    }

    #[test]
    fn test_wasp_raids_hive() {
        let (mut world, mut colonies, _config) = setup();
        let mut events = Vec::new();
        let start = colonies[0].food_stock;
        resolve_wasp(&mut world, &mut colonies, WaspId(0), WaspAction::Attack, &mut events);
        assert!(events.is_empty(), "not on a hive");

        resolve_wasp(&mut world, &mut colonies, WaspId(0), WaspAction::Up, &mut events);
        resolve_wasp(&mut world, &mut colonies, WaspId(0), WaspAction::Attack, &mut events);
        assert_eq!(colonies[0].food_stock, start - 1.0);
        assert_eq!(colonies[0].alive_bees(), 2, "raids cost food, not bees");
    }

    #[test]
    fn test_queen_spawn_registers_bee() {
        let (mut world, mut colonies, mut config) = setup();
        config.economy.trend_threshold = 1;
        colonies[0].food_stock = 1000.0;
        let mut events = Vec::new();
        resolve_queen(
            &mut world,
            &mut colonies,
            ColonyId(0),
            &[SlotOrder::Retain, SlotOrder::Retain],
            &config,
            1,
            &mut events,
        )
        .unwrap();
        assert_eq!(colonies[0].roster_len(), 3);
        assert_eq!(world.bee_positions[0].len(), 3);
        assert_eq!(world.bee_position(bee(2)), Some(GridPos::new(0, 0)));
        assert!(matches!(events[..], [SimulationEvent::BeeSpawned { .. }]));
    }
}
