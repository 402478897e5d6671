//! Telemetry and run summaries

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::colony::Colony;
use crate::core::types::{ColonyId, Tick};
use crate::simulation::events::{EventKind, SimulationEvent};

/// Per-colony figures reported after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyTelemetry {
    pub colony: ColonyId,
    pub alive: bool,
    pub alive_bees: usize,
    /// Cumulative deaths since reset
    pub dead_bees: usize,
    pub food_stock: f64,
    pub health_score: i64,
    pub trend: i32,
    pub present_in_hive: usize,
}

impl ColonyTelemetry {
    pub fn capture(colony: &Colony) -> Self {
        Self {
            colony: colony.id,
            alive: colony.is_alive(),
            alive_bees: colony.alive_bees(),
            dead_bees: colony.dead_count(),
            food_stock: colony.food_stock,
            health_score: colony.health_score(),
            trend: colony.trend(),
            present_in_hive: colony.present_count(),
        }
    }
}

/// The `info` part of a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub tick: Tick,
    pub colonies: Vec<ColonyTelemetry>,
    pub events: Vec<SimulationEvent>,
}

impl Telemetry {
    pub fn capture(tick: Tick, colonies: &[Colony], events: Vec<SimulationEvent>) -> Self {
        Self {
            tick,
            colonies: colonies.iter().map(ColonyTelemetry::capture).collect(),
            events,
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Whole-run output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks_simulated: Tick,
    pub simulation_time_ms: u64,
    pub colonies: Vec<ColonyTelemetry>,
    pub event_counts: BTreeMap<EventKind, usize>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            ticks_simulated: 0,
            simulation_time_ms: 0,
            colonies: Vec::new(),
            event_counts: BTreeMap::new(),
        }
    }

    /// Fold one tick's telemetry into the summary
    pub fn record(&mut self, info: &Telemetry) {
        self.ticks_simulated = info.tick;
        self.colonies = info.colonies.clone();
        for event in &info.events {
            *self.event_counts.entry(event.kind()).or_insert(0) += 1;
        }
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.simulation_time_ms = elapsed.as_millis() as u64;
    }

    pub fn events_of(&self, kind: EventKind) -> usize {
        self.event_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn surviving_colonies(&self) -> usize {
        self.colonies.iter().filter(|c| c.alive).count()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "Simulated {} ticks in {}ms, {} of {} colonies survive\n{} deliveries, {} births, {} culls, {} kamikaze strikes, {} raids",
            self.ticks_simulated,
            self.simulation_time_ms,
            self.surviving_colonies(),
            self.colonies.len(),
            self.events_of(EventKind::PollenDelivered),
            self.events_of(EventKind::BeeSpawned),
            self.events_of(EventKind::BeeCulled),
            self.events_of(EventKind::KamikazeStrike),
            self.events_of(EventKind::HiveRaided),
        );
        for c in &self.colonies {
            out.push_str(&format!(
                "\n  colony {}: {} alive, {} dead, food {:.1}, health {}",
                c.colony.0, c.alive_bees, c.dead_bees, c.food_stock, c.health_score
            ));
        }
        out
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
