//! Colonies: the queen's economy and the foragers' flower claims

pub mod claims;
pub mod queen;

pub use claims::{
    ClaimIntent, ClaimMap, ClaimRejection, ClaimRequest, ClaimStrategy, ClaimUpdate,
    DistanceTieBreak, SectionPartition,
};
pub use queen::{Colony, EconomyOutcome};
