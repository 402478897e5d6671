pub mod bee;
pub mod wasp;

pub use bee::Bee;
pub use wasp::{StrikeOutcome, Wasp};
