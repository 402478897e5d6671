//! Bee Colonies - grid simulation of foraging colonies under wasp predation

pub mod actions;
pub mod behavior;
pub mod colony;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::simulation::{ColonyRunner, PolicySet, RunSummary, Simulation};
