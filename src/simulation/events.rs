//! Events emitted while a tick is resolved

use serde::{Deserialize, Serialize};

use crate::core::types::{BeeId, ColonyId, GridPos, Tick, WaspId};

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    PollenPicked {
        bee: BeeId,
        flower: GridPos,
    },
    PollenDelivered {
        bee: BeeId,
        food_stock: f64,
    },
    BeeSpawned {
        bee: BeeId,
    },
    BeeCulled {
        bee: BeeId,
    },
    /// A bee struck a wasp and died doing it
    KamikazeStrike {
        bee: BeeId,
        wasp: WaspId,
        wasp_health: u32,
    },
    WaspKilled {
        wasp: WaspId,
        by: BeeId,
    },
    HiveRaided {
        wasp: WaspId,
        colony: ColonyId,
        damage: u32,
    },
    ColonyCollapsed {
        colony: ColonyId,
        casualties: usize,
        tick: Tick,
    },
    FlowerRegrown {
        flower: GridPos,
    },
}

/// Event kind without payload, for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    PollenPicked,
    PollenDelivered,
    BeeSpawned,
    BeeCulled,
    KamikazeStrike,
    WaspKilled,
    HiveRaided,
    ColonyCollapsed,
    FlowerRegrown,
}

impl SimulationEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SimulationEvent::PollenPicked { .. } => EventKind::PollenPicked,
            SimulationEvent::PollenDelivered { .. } => EventKind::PollenDelivered,
            SimulationEvent::BeeSpawned { .. } => EventKind::BeeSpawned,
            SimulationEvent::BeeCulled { .. } => EventKind::BeeCulled,
            SimulationEvent::KamikazeStrike { .. } => EventKind::KamikazeStrike,
            SimulationEvent::WaspKilled { .. } => EventKind::WaspKilled,
            SimulationEvent::HiveRaided { .. } => EventKind::HiveRaided,
            SimulationEvent::ColonyCollapsed { .. } => EventKind::ColonyCollapsed,
            SimulationEvent::FlowerRegrown { .. } => EventKind::FlowerRegrown,
        }
    }
}
