//! Queen policies: who leaves the hive this tick

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::SlotOrder;
use crate::behavior::{QueenPolicy, QueenView};

/// Share of present bees a considerate queen releases, by colony health
const GOOD_HEALTH_RELEASE_PERCENT: usize = 10;
const OK_HEALTH_RELEASE_PERCENT: usize = 25;
const BAD_HEALTH_RELEASE_PERCENT: usize = 50;

fn wasp_in_sight(view: &QueenView<'_>) -> bool {
    view.observation.live_wasps().next().is_some()
}

/// Slots currently inside the hive and alive
fn present_slots(view: &QueenView<'_>) -> Vec<usize> {
    view.colony
        .roster()
        .iter()
        .filter(|bee| bee.alive && view.colony.is_present(bee.slot()))
        .map(|bee| bee.slot())
        .collect()
}

/// Everyone out unless a wasp is in sight
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyQueen;

impl QueenPolicy for GreedyQueen {
    fn decide(&mut self, view: &QueenView<'_>, _rng: &mut ChaCha8Rng) -> Vec<SlotOrder> {
        if wasp_in_sight(view) {
            view.uniform(SlotOrder::Retain)
        } else {
            view.uniform(SlotOrder::Release)
        }
    }
}

/// Keep everyone home while a wasp is around or food is plentiful,
/// otherwise send out one bee at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeQueen;

impl QueenPolicy for ConservativeQueen {
    fn decide(&mut self, view: &QueenView<'_>, _rng: &mut ChaCha8Rng) -> Vec<SlotOrder> {
        if wasp_in_sight(view) || view.colony.health_score() > view.economy.good_health {
            return view.uniform(SlotOrder::Retain);
        }
        let mut orders = vec![SlotOrder::Retain; view.mask.len()];
        if let Some(&slot) = present_slots(view).first() {
            orders[slot] = SlotOrder::Release;
        }
        view.constrain(orders)
    }
}

/// Release a share of the bees at home, more when food runs low
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsiderateQueen;

impl QueenPolicy for ConsiderateQueen {
    fn decide(&mut self, view: &QueenView<'_>, rng: &mut ChaCha8Rng) -> Vec<SlotOrder> {
        if wasp_in_sight(view) {
            return view.uniform(SlotOrder::Retain);
        }
        let health = view.colony.health_score();
        let percent = if health > view.economy.good_health {
            GOOD_HEALTH_RELEASE_PERCENT
        } else if health < view.economy.bad_health {
            BAD_HEALTH_RELEASE_PERCENT
        } else {
            OK_HEALTH_RELEASE_PERCENT
        };

        let present = present_slots(view);
        let count = release_count(present.len(), percent);
        let mut orders = vec![SlotOrder::Retain; view.mask.len()];
        for &slot in present.choose_multiple(rng, count) {
            orders[slot] = SlotOrder::Release;
        }
        view.constrain(orders)
    }
}

/// `percent` of `inside`, rounded up, never more than `inside`
fn release_count(inside: usize, percent: usize) -> usize {
    (inside * percent).div_ceil(100).min(inside)
}
