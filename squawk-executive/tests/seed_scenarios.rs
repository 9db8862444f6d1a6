//! Integration tests for the executive's seed scenarios.

use squawk_executive::{EnterOutcome, MonitorTable, Scheduler};

/// *Monitor release on abnormal exit.* Thread A enters a monitor on object `m`, then throws;
/// after A terminates, thread B successfully enters `m` without blocking.
#[test]
fn monitor_released_after_abnormal_exit_lets_next_thread_enter_without_blocking() {
    let mut monitors = MonitorTable::new();
    let object = 42;
    let thread_a = 1;
    let thread_b = 2;

    assert_eq!(monitors.enter(object, thread_a), EnterOutcome::Entered);
    // Thread A throws instead of calling monitorexit; the scheduler
    // force-releases on its behalf during unwind.
    monitors.force_release(object, thread_a);

    assert_eq!(monitors.enter(object, thread_b), EnterOutcome::Entered);
    assert_eq!(monitors.monitor_release_count, 1);
    assert_eq!(monitors.monitor_exit_count, 0);
}

/// A thread queued behind the monitor a dying thread held is woken by the forced release rather
/// than left blocked forever.
#[test]
fn waiting_thread_is_woken_by_forced_release_not_left_blocked() {
    let mut monitors = MonitorTable::new();
    let mut scheduler = Scheduler::new();
    let thread_a = scheduler.spawn(1, 64);
    let thread_b = scheduler.spawn(1, 64);
    scheduler.next_runnable();
    scheduler.next_runnable();

    monitors.enter(99, thread_a);
    assert_eq!(monitors.enter(99, thread_b), EnterOutcome::Blocked);
    scheduler
        .block(thread_b, squawk_executive::BlockReason::Monitor { object_id: 99 })
        .unwrap();

    let woken = monitors.force_release(99, thread_a);
    assert_eq!(woken, Some(thread_b));
    scheduler.wake(thread_b).unwrap();
    assert_eq!(scheduler.next_runnable(), Some(thread_b));
}
