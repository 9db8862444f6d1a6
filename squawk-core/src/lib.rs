//! # Squawk Core
//!
//! Object-model and global-storage primitives shared by every other Squawk crate: header
//! encoding, heap slot accessors, the write-barrier seam GC plug-ins hang off of, and the three
//! process-wide global banks.

pub mod error;
pub mod global;
pub mod oop;
pub mod oop_map;

pub use error::{CoreError, CoreResult, GlobalBank};
pub use global::{ClassId, GlobalBanks, GlobalRef};
pub use oop::{ComponentType, Heap, HeapObject, HeaderTag, NullBarrier, Oop, Slot, WriteBarrier};
pub use oop_map::OopMap;
