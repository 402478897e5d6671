//! Forager policies

use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::BeeAction;
use crate::behavior::searching::{random_heading, SearchingGuide};
use crate::behavior::{BeeDecision, BeePolicy, BeeView};
use crate::colony::{ClaimRequest, ClaimStrategy, ClaimUpdate, DistanceTieBreak, SectionPartition};
use crate::core::types::GridPos;

/// Steps a respectful bee keeps its heading while searching
const RANDOM_WALK_INTENT: u32 = 3;
/// Social bees search at least this far (Manhattan) from their hive
const KEEP_AWAY_FROM_HIVE: u32 = 5;

fn claim_request<'a>(view: &'a BeeView<'_>, position: GridPos) -> ClaimRequest<'a> {
    ClaimRequest {
        observer: view.id,
        position,
        flowers: &view.observation.flowers,
        peers: &view.observation.bees,
    }
}

/// Goes for the nearest pollen it sees, ignoring colony-mates
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBee;

impl BeePolicy for GreedyBee {
    fn decide(&mut self, view: &BeeView<'_>, _rng: &mut ChaCha8Rng) -> BeeDecision {
        if let Some(decision) = view.routine() {
            return decision;
        }
        let Some(position) = view.observation.position else {
            return view.act(BeeAction::Stay);
        };
        match claim_request(view, position).pollen_flowers_by_distance().first() {
            Some(&flower) => view.approach(position, flower),
            None => view.leave_hive(position),
        }
    }
}

/// Yields a flower to any colony-mate that is closer to it
#[derive(Debug, Clone)]
pub struct RespectfulBee {
    guide: SearchingGuide,
}

impl RespectfulBee {
    pub fn new() -> Self {
        Self {
            guide: SearchingGuide::new(RANDOM_WALK_INTENT),
        }
    }
}

impl Default for RespectfulBee {
    fn default() -> Self {
        Self::new()
    }
}

impl BeePolicy for RespectfulBee {
    fn decide(&mut self, view: &BeeView<'_>, rng: &mut ChaCha8Rng) -> BeeDecision {
        if let Some(decision) = view.routine() {
            return decision;
        }
        let Some(position) = view.observation.position else {
            return view.act(BeeAction::Stay);
        };
        match DistanceTieBreak.select(&claim_request(view, position), view.claims) {
            Some(flower) => view.approach(position, flower),
            None => view.head(self.guide.walk(position, rng)),
        }
    }
}

/// Keeps a personal target registered in the colony's claim map
#[derive(Debug, Clone, Default)]
pub struct SocialBee {
    target: Option<GridPos>,
}

impl SocialBee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<GridPos> {
        self.target
    }

    /// Random walk, but first get clear of the hive
    fn search(&self, view: &BeeView<'_>, position: GridPos, rng: &mut ChaCha8Rng) -> BeeDecision {
        if position.manhattan(&view.hive) < KEEP_AWAY_FROM_HIVE {
            view.leave_hive(position)
        } else {
            view.head(random_heading(rng))
        }
    }
}

impl BeePolicy for SocialBee {
    fn decide(&mut self, view: &BeeView<'_>, rng: &mut ChaCha8Rng) -> BeeDecision {
        if let Some(decision) = view.routine() {
            if decision.action == BeeAction::Drop {
                self.target = None;
                return decision.with_claim(ClaimUpdate::Release);
            }
            return decision;
        }
        let Some(position) = view.observation.position else {
            self.target = None;
            return view.act(BeeAction::Stay);
        };

        let mut released = false;
        if let Some(target) = self.target {
            let emptied = view
                .observation
                .flowers
                .iter()
                .any(|f| f.position == target && !f.has_pollen);
            if !emptied {
                return view.approach(position, target);
            }
            self.target = None;
            released = true;
        }

        match SectionPartition.select(&claim_request(view, position), view.claims) {
            Some(flower) => {
                self.target = Some(flower);
                view.approach(position, flower)
                    .with_claim(ClaimUpdate::Claim(flower))
            }
            None => {
                let decision = self.search(view, position, rng);
                if released {
                    decision.with_claim(ClaimUpdate::Release)
                } else {
                    decision
                }
            }
        }
    }

    fn claim_rejected(&mut self, flower: GridPos) {
        if self.target == Some(flower) {
            self.target = None;
        }
    }
}
