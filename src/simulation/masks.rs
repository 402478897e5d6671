//! Legal-action masks, recomputed after every resolution pass
//!
//! Bee rules, in order:
//! - dead: nothing legal
//! - `PICK` needs a flower underfoot, `ATTACK` a live wasp on the same cell,
//!   `DROP` the bee's own hive and a load of pollen
//! - at the hive carrying pollen: `DROP` only
//! - at the hive, empty, retained by the queen: `STAY` or `ATTACK`
//! - at the hive, empty, released: anything but `STAY`

use crate::actions::catalog::{BeeAction, WaspAction};
use crate::actions::mask::{ActionMask, QueenSlotMask};
use crate::colony::Colony;
use crate::core::types::{BeeId, WaspId};
use crate::world::WorldState;

/// Masks for every agent, indexed like `TickActions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Masks {
    pub queens: Vec<Vec<QueenSlotMask>>,
    pub bees: Vec<Vec<ActionMask<BeeAction>>>,
    pub wasps: Vec<ActionMask<WaspAction>>,
}

impl Masks {
    pub fn bee(&self, bee: BeeId) -> ActionMask<BeeAction> {
        self.bees
            .get(bee.colony.0)
            .and_then(|colony| colony.get(bee.slot))
            .copied()
            .unwrap_or_else(ActionMask::none)
    }

    pub fn wasp(&self, wasp: WaspId) -> ActionMask<WaspAction> {
        self.wasps
            .get(wasp.0)
            .copied()
            .unwrap_or_else(ActionMask::none)
    }
}

/// Bees standing at their own hive with pollen count as present
pub fn flag_arrivals(world: &WorldState, colonies: &mut [Colony]) {
    for colony in colonies.iter_mut().filter(|c| c.is_alive()) {
        let arrivals: Vec<usize> = colony
            .roster()
            .iter()
            .filter(|b| b.alive && b.carrying_pollen)
            .filter(|b| world.bee_position(b.id) == Some(colony.hive))
            .map(|b| b.slot())
            .collect();
        for slot in arrivals {
            colony.welcome(slot);
        }
    }
}

pub fn bee_mask(world: &WorldState, colony: &Colony, slot: usize) -> ActionMask<BeeAction> {
    let (Some(bee), Some(position)) = (
        colony.bee(slot),
        world.bee_position(BeeId::new(colony.id, slot)),
    ) else {
        return ActionMask::none();
    };
    if !bee.alive {
        return ActionMask::none();
    }

    let mut mask = ActionMask::all();
    if !world.has_flower(position) {
        mask.forbid(BeeAction::Pick);
    }
    if world.live_wasp_at(position).is_none() {
        mask.forbid(BeeAction::Attack);
    }

    let at_home = position == colony.hive;
    if !(at_home && bee.carrying_pollen) {
        mask.forbid(BeeAction::Drop);
    }

    if at_home {
        if bee.carrying_pollen {
            return ActionMask::only(&[BeeAction::Drop]);
        }
        if colony.is_present(slot) {
            mask.restrict_to(&[BeeAction::Stay, BeeAction::Attack]);
        } else {
            mask.forbid(BeeAction::Stay);
        }
    }
    mask
}

pub fn wasp_mask(world: &WorldState, colonies: &[Colony], wasp: WaspId) -> ActionMask<WaspAction> {
    let Some(w) = world.wasps.get(wasp.0).filter(|w| w.alive) else {
        return ActionMask::none();
    };
    let mut mask = ActionMask::all();
    let raidable = world
        .hive_at(w.position)
        .and_then(|owner| colonies.get(owner.0))
        .is_some_and(Colony::is_alive);
    if !raidable {
        mask.forbid(WaspAction::Attack);
    }
    mask
}

/// Per-slot queen mask: absent or dead slots are forced out, bees that just
/// came home with pollen are forced in, everyone else is the queen's call
pub fn queen_mask(colony: &Colony) -> Vec<QueenSlotMask> {
    colony
        .roster()
        .iter()
        .map(|bee| {
            if !colony.is_alive() || !bee.alive || !colony.is_present(bee.slot()) {
                QueenSlotMask::ForcedRelease
            } else if bee.carrying_pollen {
                QueenSlotMask::ForcedRetain
            } else {
                QueenSlotMask::Free
            }
        })
        .collect()
}

pub fn compute_masks(world: &WorldState, colonies: &[Colony]) -> Masks {
    Masks {
        queens: colonies.iter().map(queen_mask).collect(),
        bees: colonies
            .iter()
            .map(|c| (0..c.roster_len()).map(|slot| bee_mask(world, c, slot)).collect())
            .collect(),
        wasps: world
            .wasps
            .iter()
            .map(|w| wasp_mask(world, colonies, w.id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::catalog::SlotOrder;
    use crate::core::config::EconomyConfig;
    use crate::core::types::{Bounds, ColonyId, GridPos};
    use crate::world::WorldLayout;

    fn setup() -> (WorldState, Vec<Colony>) {
        let layout = WorldLayout {
            flowers: vec![GridPos::new(2, 2)],
            hives: vec![GridPos::new(0, 0)],
            wasps: vec![GridPos::new(3, 3)],
        };
        let world = WorldState::from_layout(Bounds::new(10, 10), &layout, &[2], 3, 1).unwrap();
        let economy = EconomyConfig {
            nutrition_per_pollen: 5.0,
            consumption_per_bee: 0.1,
            starting_food_per_bee: 10.0,
            good_health: 12,
            bad_health: 5,
            trend_threshold: 10,
        };
        let colonies = vec![Colony::new(ColonyId(0), GridPos::new(0, 0), 2, &economy, 1, 8)];
        (world, colonies)
    }

    fn bee(slot: usize) -> BeeId {
        BeeId::new(ColonyId(0), slot)
    }

    #[test]
    fn test_retained_bee_cannot_leave() {
        let (world, colonies) = setup();
        let mask = bee_mask(&world, &colonies[0], 0);
        assert_eq!(mask.legal().collect::<Vec<_>>(), vec![BeeAction::Stay]);
    }

    #[test]
    fn test_released_bee_must_leave() {
        let (world, mut colonies) = setup();
        colonies[0].apply_orders(&[SlotOrder::Release, SlotOrder::Retain]);
        let mask = bee_mask(&world, &colonies[0], 0);
        assert!(!mask.allows(BeeAction::Stay));
        assert!(mask.allows(BeeAction::Right));
        assert!(!mask.allows(BeeAction::Pick));
        assert!(!mask.allows(BeeAction::Drop));
    }

    #[test]
    fn test_carrying_at_hive_only_drops() {
        let (world, mut colonies) = setup();
        colonies[0].apply_orders(&[SlotOrder::Release, SlotOrder::Retain]);
        colonies[0].bee_mut(0).unwrap().load_pollen();
        let mask = bee_mask(&world, &colonies[0], 0);
        assert_eq!(mask.legal().collect::<Vec<_>>(), vec![BeeAction::Drop]);

        flag_arrivals(&world, &mut colonies);
        assert!(colonies[0].is_present(0));
        assert_eq!(queen_mask(&colonies[0])[0], QueenSlotMask::ForcedRetain);
    }

    #[test]
    fn test_field_rules() {
        let (mut world, colonies) = setup();
        world.set_bee_position(bee(1), GridPos::new(2, 2));
        let on_flower = bee_mask(&world, &colonies[0], 1);
        assert!(on_flower.allows(BeeAction::Pick));
        assert!(on_flower.allows(BeeAction::Stay));
        assert!(!on_flower.allows(BeeAction::Attack));

        world.set_bee_position(bee(1), GridPos::new(3, 3));
        let on_wasp = bee_mask(&world, &colonies[0], 1);
        assert!(on_wasp.allows(BeeAction::Attack));
        assert!(!on_wasp.allows(BeeAction::Pick));
    }

    #[test]
    fn test_dead_agents_get_empty_masks() {
        let (mut world, mut colonies) = setup();
        colonies[0].kill_bee(1);
        world.wasps[0].alive = false;
        let masks = compute_masks(&world, &colonies);
        assert!(masks.bee(bee(1)).is_empty());
        assert!(masks.wasp(WaspId(0)).is_empty());
        assert_eq!(masks.queens[0], vec![QueenSlotMask::Free, QueenSlotMask::ForcedRelease]);
    }

    #[test]
    fn test_wasp_attacks_only_live_hives() {
        let (mut world, mut colonies) = setup();
        world.wasps[0].position = GridPos::new(0, 0);
        assert!(wasp_mask(&world, &colonies, WaspId(0)).allows(WaspAction::Attack));
        colonies[0].kill_bee(0);
        colonies[0].kill_bee(1);
        let economy = EconomyConfig {
            nutrition_per_pollen: 5.0,
            consumption_per_bee: 0.1,
            starting_food_per_bee: 10.0,
            good_health: 12,
            bad_health: 5,
            trend_threshold: 10,
        };
        colonies[0].tick(&economy);
        assert!(!wasp_mask(&world, &colonies, WaspId(0)).allows(WaspAction::Attack));
    }
}
