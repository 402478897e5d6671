pub mod catalog;
pub mod mask;

pub use catalog::{ActionSpace, BeeAction, SlotOrder, TickActions, WaspAction};
pub use mask::{ActionMask, QueenSlotMask};
