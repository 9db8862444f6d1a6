//! Lightweight monitors.
//!
//! With `SMARTMONITORS`, a monitor is allocated lazily on first contention; an uncontended
//! `monitorenter`/`monitorexit` pair is a bit flip with no heap allocation.
//! `GC.monitorExitCount` and `monitorReleaseCount` are process-wide counters surfaced through
//! the globals table.
//!
//! `monitorExitCount` counts every `monitorexit` that actually ran, contended or not;
//! `monitorReleaseCount` counts only releases the scheduler performed on a thread's behalf
//! during unwind or hibernation quiesce, i.e. releases the owning thread never issued itself.
//! A normal `monitorexit` therefore increments the first counter but not the second.

use indexmap::IndexMap;

/// An uncontended monitor's state: just the owning thread and its reentrancy depth, no waiter
/// queue. This is the "bit flip" SMARTMONITORS describes — no table entry, no allocation beyond
/// this map slot every object with a live monitor already needs for `owner`/`depth` bookkeeping.
#[derive(Debug, Clone, Copy)]
struct FastLock {
    owner: u32,
    depth: u32,
}

/// An inflated monitor: an object that a second thread has actually contended for. Only
/// contention creates one of these; an uncontended enter/exit pair never touches `inflated`.
#[derive(Debug, Default)]
struct InflatedMonitor {
    owner: Option<u32>,
    depth: u32,
    waiters: Vec<u32>,
}

#[derive(Debug, Default)]
pub struct MonitorTable {
    /// Owner/depth for objects with no recorded contention. Removed entirely once depth returns
    /// to zero, so an uncontended object never occupies a permanent slot either.
    fast: IndexMap<u32, FastLock>,
    /// Only ever holds objects a second thread has contended for.
    inflated: IndexMap<u32, InflatedMonitor>,
    pub monitor_exit_count: u64,
    pub monitor_release_count: u64,
}

/// Outcome of a `monitorenter` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    Entered,
    /// The calling thread must block on this object until notified.
    Blocked,
}

impl MonitorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to enter the monitor on `object_id` for `thread_id`. Reentrant: a thread that
    /// already owns the monitor just deepens it. Stays in the fast, un-inflated path unless a
    /// second thread is already holding or waiting on the object.
    pub fn enter(&mut self, object_id: u32, thread_id: u32) -> EnterOutcome {
        if let Some(monitor) = self.inflated.get_mut(&object_id) {
            return match monitor.owner {
                None => {
                    monitor.owner = Some(thread_id);
                    monitor.depth = 1;
                    EnterOutcome::Entered
                }
                Some(owner) if owner == thread_id => {
                    monitor.depth += 1;
                    EnterOutcome::Entered
                }
                Some(_) => {
                    if !monitor.waiters.contains(&thread_id) {
                        monitor.waiters.push(thread_id);
                    }
                    EnterOutcome::Blocked
                }
            };
        }

        match self.fast.get_mut(&object_id) {
            None => {
                self.fast.insert(object_id, FastLock { owner: thread_id, depth: 1 });
                EnterOutcome::Entered
            }
            Some(lock) if lock.owner == thread_id => {
                lock.depth += 1;
                EnterOutcome::Entered
            }
            Some(lock) => {
                // Contended for the first time: inflate, carrying over the current owner's
                // depth, and queue the contending thread as a waiter.
                let owner = lock.owner;
                let depth = lock.depth;
                self.fast.shift_remove(&object_id);
                self.inflated.insert(
                    object_id,
                    InflatedMonitor {
                        owner: Some(owner),
                        depth,
                        waiters: vec![thread_id],
                    },
                );
                EnterOutcome::Blocked
            }
        }
    }

    /// Releases one level of ownership for a `monitorexit` the owning thread itself issued;
    /// always counted in `monitor_exit_count`. Returns the next thread to wake, if the monitor
    /// just became free and a waiter was queued.
    pub fn exit(&mut self, object_id: u32, thread_id: u32) -> Option<u32> {
        self.monitor_exit_count += 1;
        self.release(object_id, thread_id, false)
    }

    /// Releases every level of ownership a thread holds on `object_id` without that thread
    /// having issued the `monitorexit` itself: unwind-on-exception or hibernation quiesce.
    /// Counted in `monitor_release_count`, not `monitor_exit_count`.
    pub fn force_release(&mut self, object_id: u32, thread_id: u32) -> Option<u32> {
        self.monitor_release_count += 1;
        self.release(object_id, thread_id, true)
    }

    fn release(&mut self, object_id: u32, thread_id: u32, force: bool) -> Option<u32> {
        if let Some(lock) = self.fast.get_mut(&object_id) {
            if lock.owner != thread_id {
                return None;
            }
            if force {
                lock.depth = 0;
            } else {
                lock.depth = lock.depth.saturating_sub(1);
            }
            if lock.depth == 0 {
                self.fast.shift_remove(&object_id);
            }
            return None;
        }

        let Some(monitor) = self.inflated.get_mut(&object_id) else {
            return None;
        };
        if monitor.owner != Some(thread_id) {
            return None;
        }
        if force {
            monitor.depth = 0;
        } else {
            monitor.depth = monitor.depth.saturating_sub(1);
        }
        if monitor.depth > 0 {
            return None;
        }
        monitor.owner = None;
        if monitor.waiters.is_empty() {
            self.inflated.shift_remove(&object_id);
            return None;
        }
        let next = monitor.waiters.remove(0);
        monitor.owner = Some(next);
        monitor.depth = 1;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncontended_enter_exit_does_not_inflate_permanently() {
        let mut table = MonitorTable::new();
        assert_eq!(table.enter(1, 10), EnterOutcome::Entered);
        assert_eq!(table.exit(1, 10), None);
        assert_eq!(table.monitor_exit_count, 1);
        assert!(table.inflated.is_empty(), "uncontended use must never allocate an inflated entry");
        assert!(table.fast.is_empty());
    }

    #[test]
    fn uncontended_enter_never_touches_the_inflated_table() {
        let mut table = MonitorTable::new();
        table.enter(1, 10);
        table.enter(1, 10); // reentrant
        assert!(table.inflated.is_empty());
        assert_eq!(table.fast.len(), 1);
        table.exit(1, 10);
        table.exit(1, 10);
        assert!(table.fast.is_empty());
    }

    #[test]
    fn contended_enter_blocks_second_thread() {
        let mut table = MonitorTable::new();
        assert_eq!(table.enter(1, 10), EnterOutcome::Entered);
        assert_eq!(table.enter(1, 20), EnterOutcome::Blocked);
        let woken = table.exit(1, 10);
        assert_eq!(woken, Some(20));
    }

    #[test]
    fn force_release_on_abnormal_exit_wakes_a_waiter_and_counts_separately() {
        let mut table = MonitorTable::new();
        table.enter(1, 10);
        table.enter(1, 20);
        let woken = table.force_release(1, 10);
        assert_eq!(woken, Some(20));
        assert_eq!(table.monitor_release_count, 1);
        assert_eq!(table.monitor_exit_count, 0);
    }

    #[test]
    fn reentrant_enter_requires_matching_exits() {
        let mut table = MonitorTable::new();
        table.enter(1, 10);
        table.enter(1, 10);
        assert_eq!(table.exit(1, 10), None, "still held after one exit");
        assert_eq!(table.exit(1, 10), None, "released, no waiters to wake");
    }
}
