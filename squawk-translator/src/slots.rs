//! Slot allocator and operand-stack depth measurement.
//!
//! Locals are live-range colored into reusable slots, respecting JVM-level type buckets:
//! reference slots are never shared with word or doubleword-occupying slots, since the oop-map
//! distinguishes them by slot index alone.

use crate::error::{TranslatorError, TranslatorResult};
use crate::ir::{IfCondition, IrList, IrOp, Primitive};
use squawk_suite::Minfo;

/// The three slot buckets locals are colored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotBucket {
    Reference,
    Word,
    Doubleword,
}

fn bucket_of(kind: Primitive) -> SlotBucket {
    match kind {
        Primitive::Reference => SlotBucket::Reference,
        Primitive::Long | Primitive::Double => SlotBucket::Doubleword,
        _ => SlotBucket::Word,
    }
}

/// A local variable's live range: the IR node indices of its first and last use (inclusive), in
/// program order.
#[derive(Debug, Clone, Copy)]
struct LiveRange {
    original_local: u16,
    bucket: SlotBucket,
    first: usize,
    last: usize,
}

/// Maps each original JVM local index to its assigned Squawk slot and records how many of the
/// low slots need zeroing on frame entry.
#[derive(Debug, Clone, Default)]
pub struct SlotAssignment {
    pub slot_of: Vec<(u16, u16)>,
    pub cleared_slot_count: u16,
    pub local_count: u16,
}

impl SlotAssignment {
    pub fn slot_for(&self, original_local: u16) -> Option<u16> {
        self.slot_of
            .iter()
            .find(|(orig, _)| *orig == original_local)
            .map(|(_, slot)| *slot)
    }
}

/// Greedily colors non-overlapping live ranges within the same bucket into the same slot, a
/// simplified linear-scan allocator appropriate to Squawk's small method bodies.
pub fn allocate_slots(list: &IrList, local_kinds: &[(u16, Primitive)]) -> SlotAssignment {
    let mut ranges = compute_live_ranges(list, local_kinds);
    ranges.sort_by_key(|r| r.first);

    let mut next_slot_in_bucket: [u16; 3] = [0, 0, 0];
    let mut active: Vec<(SlotBucket, u16, usize)> = Vec::new(); // (bucket, slot, last)
    let mut slot_of = Vec::new();

    for range in &ranges {
        active.retain(|(_, _, last)| *last >= range.first);
        let bucket_idx = bucket_index(range.bucket);
        let reusable = active
            .iter()
            .find(|(b, _, last)| *b == range.bucket && *last < range.first)
            .map(|(_, slot, _)| *slot);
        let slot = if let Some(reusable_slot) = reusable {
            active.retain(|(b, s, _)| !(*b == range.bucket && *s == reusable_slot));
            reusable_slot
        } else {
            let s = next_slot_in_bucket[bucket_idx];
            next_slot_in_bucket[bucket_idx] += 1;
            s
        };
        active.push((range.bucket, slot, range.last));
        slot_of.push((range.original_local, slot));
    }

    // Reference slots are placed first so the oop-map's "cleared slot
    // count" need only cover the prefix that holds references.
    let cleared_slot_count = next_slot_in_bucket[bucket_index(SlotBucket::Reference)];
    let local_count: u16 = next_slot_in_bucket.iter().sum();

    SlotAssignment {
        slot_of,
        cleared_slot_count,
        local_count,
    }
}

fn bucket_index(bucket: SlotBucket) -> usize {
    match bucket {
        SlotBucket::Reference => 0,
        SlotBucket::Word => 1,
        SlotBucket::Doubleword => 2,
    }
}

fn compute_live_ranges(list: &IrList, local_kinds: &[(u16, Primitive)]) -> Vec<LiveRange> {
    let mut ranges: Vec<LiveRange> = Vec::new();
    for &(local, kind) in local_kinds {
        let mut first = None;
        let mut last = None;
        for (index, op) in list.iter() {
            let touches = match op {
                IrOp::LoadLocal { slot, .. } | IrOp::StoreLocal { slot } => *slot == local,
                _ => false,
            };
            if touches {
                first.get_or_insert(index);
                last = Some(index);
            }
        }
        if let (Some(first), Some(last)) = (first, last) {
            ranges.push(LiveRange {
                original_local: local,
                bucket: bucket_of(kind),
                first,
                last,
            });
        }
    }
    ranges
}

/// Symbolically executes the IR's operand-stack effect to find the maximum depth, and checks
/// that every branch target agrees on depth with every other predecessor.
pub fn measure_stack_depth(list: &IrList) -> TranslatorResult<u16> {
    let mut depth: i32 = 0;
    let mut max_depth: i32 = 0;
    let mut target_depths: std::collections::HashMap<usize, i32> = std::collections::HashMap::new();

    for (index, op) in list.iter() {
        depth += stack_effect(op);
        if depth < 0 {
            return Err(TranslatorError::VerifyError(format!(
                "operand stack underflow at ir node {index}"
            )));
        }
        max_depth = max_depth.max(depth);

        let mut check_target = |target: usize, depth: i32| -> TranslatorResult<()> {
            if let Some(existing) = target_depths.get(&target) {
                if *existing != depth {
                    return Err(TranslatorError::VerifyError(format!(
                        "branch target {target} reached at depth {depth} but previously at {existing}"
                    )));
                }
            } else {
                target_depths.insert(target, depth);
            }
            Ok(())
        };

        match op {
            IrOp::Goto { target } => check_target(*target, depth)?,
            IrOp::If { target, .. } => check_target(*target, depth)?,
            IrOp::TableSwitch { targets, default, .. } => {
                for t in targets {
                    check_target(*t, depth)?;
                }
                check_target(*default, depth)?;
            }
            IrOp::LookupSwitch { pairs, default } => {
                for (_, t) in pairs {
                    check_target(*t, depth)?;
                }
                check_target(*default, depth)?;
            }
            _ => {}
        }
    }

    Ok(max_depth.max(0) as u16)
}

fn stack_effect(op: &IrOp) -> i32 {
    match op {
        IrOp::LoadLocal { .. } | IrOp::LoadConstant(_) | IrOp::LoadField { .. } | IrOp::LoadStatic { .. } => 1,
        IrOp::StoreLocal { .. } | IrOp::StoreField { .. } | IrOp::StoreStatic { .. } => -1,
        IrOp::ArrayLoad { .. } => -1, // pops array+index, pushes value: net -1
        IrOp::ArrayStore { .. } => -3,
        IrOp::Arithmetic { .. } => -1,
        IrOp::Comparison(_) => -1,
        IrOp::Convert { .. } => 0,
        IrOp::Invoke { .. } => 0, // caller-specific; conservatively neutral here
        IrOp::Return { kind: Some(_) } => -1,
        IrOp::Return { kind: None } => 0,
        IrOp::Goto { .. } => 0,
        IrOp::If {
            condition: IfCondition::Unary { .. },
            ..
        } => -1,
        IrOp::If {
            condition: IfCondition::Binary { .. },
            ..
        } => -2,
        IrOp::TableSwitch { .. } | IrOp::LookupSwitch { .. } => -1,
        IrOp::Throw => -1,
        IrOp::MonitorEnter | IrOp::MonitorExit => -1,
        IrOp::New { .. } => 1,
        IrOp::NewObject { .. } => 1,
        IrOp::NewArray { .. } => 0,
        IrOp::NewDimension { dims } => 1 - *dims as i32,
        IrOp::InstanceOf { .. } => 0,
        IrOp::CheckCast { .. } => 0,
        IrOp::ThisGetField { .. } => 1,
        IrOp::ClassGetStatic { .. } => 1,
    }
}

/// Builds a final [`Minfo`] from a slot assignment and measured stack depth, for a method with
/// `parameter_count` parameters.
pub fn build_minfo(assignment: &SlotAssignment, max_stack: u16, parameter_count: u16) -> Minfo {
    Minfo {
        max_stack,
        local_count: assignment.local_count,
        parameter_count,
        cleared_slot_count: assignment.cleared_slot_count,
    }
}
