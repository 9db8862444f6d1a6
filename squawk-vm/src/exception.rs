//! Exception propagation across activation frames.
//!
//! When an exception is thrown, the interpreter walks activation frames; for each frame it
//! searches the exception table for an entry whose `[start_ip, end_ip)` covers the current
//! `lastIP` and whose `catch_type` is assignable from the exception's class. If none, the frame
//! is unwound and monitors held by it are released.

use crate::stack_chunk::StackChunk;
use squawk_core::ClassId;
use squawk_suite::MethodBody;

/// Releases any monitors a frame holds during unwind. `squawk-executive` owns the concrete
/// monitor table and implements this trait so `squawk-vm` does not need to depend on it.
pub trait MonitorReleaser {
    fn release_monitors_held_by_frame(&mut self, thread_id: u32, frame_base: usize);
}

/// A no-op releaser for VM configurations with no monitors in play (e.g. the seed-scenario unit
/// tests in this crate).
pub struct NoMonitors;
impl MonitorReleaser for NoMonitors {
    fn release_monitors_held_by_frame(&mut self, _thread_id: u32, _frame_base: usize) {}
}

/// Outcome of searching for a handler across the whole frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwindResult {
    /// A handler was found; resume execution for the current (possibly now-shallower) frame at
    /// the given bytecode offset.
    Caught { handler_ip: u16 },
    /// No handler anywhere in the chunk; the exception is unhandled.
    Unhandled,
}

/// Walks frames from the top of `chunk` downward, searching each frame's method body for a
/// matching exception-table entry before unwinding it: a handler in an outer frame is only
/// consulted after every inner frame has been checked and unwound.
pub fn propagate_exception(
    chunk: &mut StackChunk,
    method_of_frame: impl Fn(usize) -> MethodBody,
    current_ip: impl Fn(usize) -> u16,
    thrown_class: ClassId,
    is_assignable: impl Fn(ClassId, ClassId) -> bool,
    releaser: &mut dyn MonitorReleaser,
    thread_id: u32,
) -> UnwindResult {
    loop {
        let Some(frame) = chunk.current_frame() else {
            return UnwindResult::Unhandled;
        };
        let frame_base = frame.base;
        let method = method_of_frame(frame_base);
        let ip = current_ip(frame_base);
        if let Some(handler_ip) = method.find_handler(ip, thrown_class, &is_assignable) {
            return UnwindResult::Caught { handler_ip };
        }
        releaser.release_monitors_held_by_frame(thread_id, frame_base);
        chunk.pop_frame();
    }
}
