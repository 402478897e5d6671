//! Tick loop, perception, masks, resolution and the policy runner

pub mod events;
pub mod masks;
pub mod output;
pub mod perception;
pub mod resolve;
pub mod runner;
pub mod tick;

pub use events::{EventKind, SimulationEvent};
pub use masks::{compute_masks, Masks};
pub use output::{ColonyTelemetry, RunSummary, Telemetry};
pub use perception::{observe_all, Observation, Observations};
pub use runner::{ColonyRunner, PolicySet, TICKS_AFTER_DONE};
pub use tick::{Simulation, StepOutcome};
