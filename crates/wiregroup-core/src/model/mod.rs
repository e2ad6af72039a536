pub mod direction;
pub mod document;
pub mod slot;
pub mod version;

pub use direction::Direction;
pub use document::{AliasTable, SpecDocument, VersionCorpus};
pub use slot::{PacketSlot, Slot, SlotRegistry, TypeScope, TypeSlot};
pub use version::{ProtocolVersion, WireId};
