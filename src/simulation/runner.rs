//! Policy driver - observe, decide, commit claims, step
//!
//! `ColonyRunner` owns a `Simulation` and one policy per agent. Bees born by
//! reproduction get a policy of the colony's kind on the tick after they
//! appear. A run keeps stepping for a few ticks after `done` so the final
//! transitions show up in the summary.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actions::catalog::{BeeAction, SlotOrder, TickActions, WaspAction};
use crate::behavior::{
    BeeKind, BeePolicy, BeeView, QueenKind, QueenPolicy, QueenView, WaspKind, WaspPolicy, WaspView,
};
use crate::colony::{ClaimIntent, ClaimUpdate};
use crate::core::error::Result;
use crate::core::types::{BeeId, ColonyId};
use crate::simulation::masks::Masks;
use crate::simulation::output::{RunSummary, Telemetry};
use crate::simulation::perception::{Observation, Observations};
use crate::simulation::tick::Simulation;

/// Ticks still simulated once the run reports done
pub const TICKS_AFTER_DONE: u32 = 5;

/// Policy kinds used for every colony and every wasp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    pub queen: QueenKind,
    pub bee: BeeKind,
    pub wasp: WaspKind,
}

pub struct ColonyRunner {
    sim: Simulation,
    policies: PolicySet,
    queens: Vec<Box<dyn QueenPolicy>>,
    bees: Vec<Vec<Box<dyn BeePolicy>>>,
    wasps: Vec<Box<dyn WaspPolicy>>,
    observations: Observations,
    masks: Masks,
    rng: ChaCha8Rng,
    summary: RunSummary,
    done_for: u32,
}

impl ColonyRunner {
    pub fn new(mut sim: Simulation, policies: PolicySet) -> Self {
        let observations = sim.observe();
        let masks = sim.masks();
        let rng = ChaCha8Rng::seed_from_u64(sim.config().run.seed.wrapping_add(1));
        let queens = sim.colonies().iter().map(|_| policies.queen.build()).collect();
        let bees = sim
            .roster_sizes()
            .into_iter()
            .map(|n| (0..n).map(|_| policies.bee.build()).collect())
            .collect();
        let wasps = sim.world().wasps.iter().map(|_| policies.wasp.build()).collect();
        Self {
            sim,
            policies,
            queens,
            bees,
            wasps,
            observations,
            masks,
            rng,
            summary: RunSummary::new(),
            done_for: 0,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn observations(&self) -> &Observations {
        &self.observations
    }

    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn is_finished(&self) -> bool {
        self.done_for >= TICKS_AFTER_DONE
    }

    /// Every agent decides from the current observations and masks
    pub fn decide(&mut self) -> (TickActions, Vec<Vec<ClaimIntent>>) {
        let empty = Observation::empty();
        let colonies = self.sim.colonies();
        let economy = &self.sim.config().economy;
        let bounds = self.sim.world().bounds();

        let mut queens = Vec::with_capacity(colonies.len());
        for (c, (colony, policy)) in colonies.iter().zip(self.queens.iter_mut()).enumerate() {
            let slot_masks = self.masks.queens.get(c).map(Vec::as_slice).unwrap_or(&[]);
            let view = QueenView {
                colony,
                observation: self.observations.queens.get(c).unwrap_or(&empty),
                mask: slot_masks,
                economy,
            };
            let mut orders = policy.decide(&view, &mut self.rng);
            orders.resize(colony.roster_len(), SlotOrder::Retain);
            queens.push(orders);
        }

        let mut bees = Vec::with_capacity(colonies.len());
        let mut intents = Vec::with_capacity(colonies.len());
        for (c, (colony, policies)) in colonies.iter().zip(self.bees.iter_mut()).enumerate() {
            let mut actions = vec![BeeAction::Stay; colony.roster_len()];
            let mut claims = Vec::new();
            let roster = colony.roster().iter().zip(policies.iter_mut());
            for (slot, (bee, policy)) in roster.enumerate() {
                let view = BeeView {
                    id: BeeId::new(colony.id, slot),
                    hive: colony.hive,
                    bounds,
                    carrying_pollen: bee.carrying_pollen,
                    observation: self
                        .observations
                        .bees
                        .get(c)
                        .and_then(|obs| obs.get(slot))
                        .unwrap_or(&empty),
                    mask: self.masks.bee(bee.id),
                    claims: &colony.claims,
                };
                let decision = policy.decide(&view, &mut self.rng);
                actions[slot] = decision.action;
                if decision.claim != ClaimUpdate::Keep {
                    claims.push(ClaimIntent {
                        slot,
                        update: decision.claim,
                    });
                }
            }
            bees.push(actions);
            intents.push(claims);
        }

        let mut wasps = vec![WaspAction::Stay; self.sim.world().wasps.len()];
        for ((action, wasp), policy) in wasps
            .iter_mut()
            .zip(&self.sim.world().wasps)
            .zip(self.wasps.iter_mut())
        {
            let view = WaspView {
                id: wasp.id,
                observation: self.observations.wasps.get(wasp.id.0).unwrap_or(&empty),
                mask: self.masks.wasp(wasp.id),
            };
            *action = policy.decide(&view, &mut self.rng);
        }

        (TickActions { queens, bees, wasps }, intents)
    }

    /// Write claim intents into each colony's map, telling losers
    fn commit_claims(&mut self, intents: &[Vec<ClaimIntent>]) -> Result<()> {
        let mode = self.sim.config().claims.commit;
        for (c, colony_intents) in intents.iter().enumerate() {
            let colony = self.sim.colony_mut(ColonyId(c))?;
            let rejected = colony.claims.commit(colony_intents, mode);
            if !rejected.is_empty() {
                debug!(colony = c, rejected = rejected.len(), "claims rejected");
            }
            for rejection in rejected {
                if let Some(policy) = self.bees.get_mut(c).and_then(|b| b.get_mut(rejection.slot)) {
                    policy.claim_rejected(rejection.flower);
                }
            }
        }
        Ok(())
    }

    /// Give newborn bees a policy
    fn adopt_newborns(&mut self) {
        for (policies, size) in self.bees.iter_mut().zip(self.sim.roster_sizes()) {
            while policies.len() < size {
                policies.push(self.policies.bee.build());
            }
        }
    }

    /// One full tick
    pub fn run_tick(&mut self) -> Result<Telemetry> {
        let (actions, intents) = self.decide();
        self.commit_claims(&intents)?;
        let outcome = self.sim.step(&actions)?;
        self.adopt_newborns();
        self.observations = outcome.observations;
        self.masks = outcome.masks;
        self.summary.record(&outcome.info);
        if outcome.done {
            self.done_for += 1;
        }
        Ok(outcome.info)
    }

    /// Run until done plus the grace ticks
    pub fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();
        while !self.is_finished() {
            self.run_tick()?;
        }
        self.summary.finish(start.elapsed());
        info!(
            ticks = self.summary.ticks_simulated,
            elapsed_ms = self.summary.simulation_time_ms,
            surviving = self.summary.surviving_colonies(),
            "run finished"
        );
        Ok(self.summary.clone())
    }
}
