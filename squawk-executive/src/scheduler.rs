//! Cooperative round-robin scheduler.
//!
//! Single-threaded cooperative green threads per VM instance. FIFO runnable queue, ties broken
//! by insertion order. Timers live in a min-heap keyed by wake time; the scheduler wakes
//! expired timers before polling events.

use crate::error::{ExecutiveError, ExecutiveResult};
use crate::thread::{BlockReason, Thread, ThreadState};
use indexmap::IndexMap;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    wake_at_ms: u64,
    thread_id: u32,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert so the earliest wake time sorts
        // first when wrapped in `Reverse` at the call site is unnecessary;
        // keep the natural `Ord` inverted here instead, so callers can use
        // a plain `BinaryHeap<Timer>` as a min-heap directly.
        other.wake_at_ms.cmp(&self.wake_at_ms)
    }
}
impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Scheduler {
    threads: IndexMap<u32, Thread>,
    runnable: VecDeque<u32>,
    timers: BinaryHeap<Timer>,
    next_thread_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            threads: IndexMap::new(),
            runnable: VecDeque::new(),
            timers: BinaryHeap::new(),
            next_thread_id: 1,
        }
    }

    pub fn spawn(&mut self, isolate_id: u32, stack_capacity: usize) -> u32 {
        let id = self.next_thread_id;
        self.next_thread_id += 1;
        self.threads.insert(id, Thread::new(id, isolate_id, stack_capacity));
        self.runnable.push_back(id);
        id
    }

    pub fn thread(&self, thread_id: u32) -> ExecutiveResult<&Thread> {
        self.threads
            .get(&thread_id)
            .ok_or(ExecutiveError::UnknownThread(thread_id))
    }

    pub fn thread_mut(&mut self, thread_id: u32) -> ExecutiveResult<&mut Thread> {
        self.threads
            .get_mut(&thread_id)
            .ok_or(ExecutiveError::UnknownThread(thread_id))
    }

    /// Blocks a thread on a monitor or channel I/O, removing it from the runnable queue.
    pub fn block(&mut self, thread_id: u32, reason: BlockReason) -> ExecutiveResult<()> {
        self.thread_mut(thread_id)?.state = ThreadState::Blocked(reason);
        Ok(())
    }

    /// Puts a thread to sleep until an absolute wake time, per `Thread.sleep(t)`: resumes no
    /// earlier than `t` ms from now.
    pub fn sleep_until(&mut self, thread_id: u32, wake_at_ms: u64) -> ExecutiveResult<()> {
        self.thread_mut(thread_id)?.state = ThreadState::Timed { wake_at_ms };
        self.timers.push(Timer { wake_at_ms, thread_id });
        Ok(())
    }

    /// Makes a blocked or timed thread runnable again, appending to the back of the FIFO queue.
    pub fn wake(&mut self, thread_id: u32) -> ExecutiveResult<()> {
        let thread = self.thread_mut(thread_id)?;
        thread.state = ThreadState::Runnable;
        self.runnable.push_back(thread_id);
        Ok(())
    }

    /// Pops and wakes every timer whose wake time has passed, in wake-time order, ahead of
    /// polling channel events.
    pub fn expire_timers(&mut self, now_ms: u64) {
        while let Some(timer) = self.timers.peek() {
            if timer.wake_at_ms > now_ms {
                break;
            }
            let timer = self.timers.pop().expect("peeked Some");
            if let Ok(thread) = self.thread_mut(timer.thread_id) {
                if matches!(thread.state, ThreadState::Timed { .. }) {
                    trace!(thread_id = timer.thread_id, "timer expired");
                    let _ = self.wake(timer.thread_id);
                }
            }
        }
    }

    /// Dequeues the next runnable thread in FIFO order, or `None` if nothing is runnable (the
    /// VM should then idle until a timer expires or an event arrives).
    pub fn next_runnable(&mut self) -> Option<u32> {
        self.runnable.pop_front()
    }

    /// Re-enqueues a thread after it voluntarily yields mid-quantum (`Thread.yield`), to the
    /// back of the FIFO queue.
    pub fn reschedule(&mut self, thread_id: u32) {
        self.runnable.push_back(thread_id);
    }

    pub fn mark_dead(&mut self, thread_id: u32) -> ExecutiveResult<()> {
        self.thread_mut(thread_id)?.state = ThreadState::Dead;
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.runnable.is_empty()
            && self
                .threads
                .values()
                .all(|t| matches!(t.state, ThreadState::Dead | ThreadState::Hibernating))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runnable_queue_is_fifo() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.spawn(1, 64);
        let b = scheduler.spawn(1, 64);
        assert_eq!(scheduler.next_runnable(), Some(a));
        assert_eq!(scheduler.next_runnable(), Some(b));
        assert_eq!(scheduler.next_runnable(), None);
    }

    #[test]
    fn timers_expire_in_wake_time_order() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.spawn(1, 64);
        let b = scheduler.spawn(1, 64);
        scheduler.next_runnable();
        scheduler.next_runnable();
        scheduler.sleep_until(a, 100).unwrap();
        scheduler.sleep_until(b, 50).unwrap();
        scheduler.expire_timers(40);
        assert_eq!(scheduler.next_runnable(), None, "nothing expired yet");
        scheduler.expire_timers(200);
        assert_eq!(scheduler.next_runnable(), Some(b));
        assert_eq!(scheduler.next_runnable(), Some(a));
    }

    #[test]
    fn blocked_thread_is_not_runnable_until_woken() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.spawn(1, 64);
        scheduler.next_runnable();
        scheduler
            .block(a, BlockReason::Monitor { object_id: 7 })
            .unwrap();
        assert!(!scheduler.thread(a).unwrap().is_runnable());
        scheduler.wake(a).unwrap();
        assert_eq!(scheduler.next_runnable(), Some(a));
    }
}
