//! Wasp policy

use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::WaspAction;
use crate::behavior::searching::{move_towards, SearchingGuide};
use crate::behavior::{WaspPolicy, WaspView};
use crate::core::types::GridPos;
use crate::simulation::perception::Observation;

/// Steps a wasp keeps its heading while searching
const SEARCH_INTENT: u32 = 5;
/// A flower patch counts as reached within this Manhattan distance
const CLUSTER_REACH: u32 = 2;

/// Raids the nearest live hive in sight. Otherwise it flies to the flower
/// patch in sight, where foragers gather, and roams once there.
#[derive(Debug, Clone)]
pub struct GreedyWasp {
    guide: SearchingGuide,
    /// Centre of the last patch reached
    visited: Option<GridPos>,
}

impl GreedyWasp {
    pub fn new() -> Self {
        Self {
            guide: SearchingGuide::new(SEARCH_INTENT),
            visited: None,
        }
    }

    /// Patch to head for, if one is in sight and not already explored
    fn cluster_target(&mut self, position: GridPos, observation: &Observation) -> Option<GridPos> {
        let centre = flower_centre(observation)?;
        if self
            .visited
            .is_some_and(|seen| seen.manhattan(&centre) <= 2 * CLUSTER_REACH)
        {
            return None;
        }
        if position.manhattan(&centre) <= CLUSTER_REACH {
            self.visited = Some(centre);
            return None;
        }
        Some(centre)
    }
}

/// Mean position of the flowers in sight
fn flower_centre(observation: &Observation) -> Option<GridPos> {
    let count = i32::try_from(observation.flowers.len()).ok().filter(|&n| n > 0)?;
    let (sx, sy) = observation
        .flowers
        .iter()
        .fold((0i64, 0i64), |(sx, sy), f| {
            (sx + i64::from(f.position.x), sy + i64::from(f.position.y))
        });
    let mean = |sum: i64| i32::try_from(sum.div_euclid(i64::from(count))).ok();
    Some(GridPos::new(mean(sx)?, mean(sy)?))
}

impl Default for GreedyWasp {
    fn default() -> Self {
        Self::new()
    }
}

impl WaspPolicy for GreedyWasp {
    fn decide(&mut self, view: &WaspView<'_>, rng: &mut ChaCha8Rng) -> WaspAction {
        let Some(position) = view.observation.position else {
            return view.mask.resolve(WaspAction::Stay);
        };

        let nearest_hive = view
            .observation
            .hives
            .iter()
            .filter(|h| h.alive)
            .min_by_key(|h| (position.manhattan(&h.position), h.colony));

        let preferred = match nearest_hive {
            Some(hive) => match move_towards(position, hive.position) {
                Some(heading) => heading.into(),
                None => WaspAction::Attack,
            },
            None => match self.cluster_target(position, view.observation) {
                Some(centre) => move_towards(position, centre)
                    .map_or(WaspAction::Stay, WaspAction::from),
                None => self.guide.walk(position, rng).into(),
            },
        };
        view.mask.resolve(preferred)
    }
}
