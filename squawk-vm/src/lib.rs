//! # Squawk VM
//!
//! The bytecode interpreter: per-thread stack chunks, the `java.lang.VM.do_*` implicit-check
//! helpers, the opcode dispatch loop, and exception propagation across frames.

pub mod dispatch;
pub mod error;
pub mod exception;
pub mod helpers;
pub mod stack_chunk;

pub use dispatch::{Interpreter, StepOutcome, Value, VmMetrics};
pub use error::{RuntimeError, VmResult};
pub use exception::{propagate_exception, MonitorReleaser, NoMonitors, UnwindResult};
pub use stack_chunk::{ChunkSlot, Frame, StackChunk, StackOverflow};
