//! # Squawk Channel
//!
//! Channel I/O: per-isolate contexts, the wire opcode table, the event queue, and the split I/O
//! server protocol.

pub mod channel;
pub mod context;
pub mod error;
pub mod event;
pub mod opcode;
pub mod server;

pub use channel::{Channel, ChannelKind, OpenResource};
pub use context::ChannelContext;
pub use error::{ChannelError, ChannelResult};
pub use event::EventQueue;
pub use server::{Reply, RequestHeader, RequestObject};
