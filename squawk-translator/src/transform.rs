//! Two-phase IR construction and lowering.
//!
//! Phase 1 builds the IR for a method and interns every constant object it references. Phase 2
//! applies target-form lowering rules once every method in the class has gone through phase 1
//! (so the per-class object table can be frequency-sorted between the phases).

use crate::error::{TranslatorError, TranslatorResult};
use crate::ir::{ConstantValue, IrList, IrOp, MethodRef};
use squawk_suite::{ObjectTableBuilder, ResolvedConstant};

/// Tracks per-class constant-object references across phase 1 of all of a class's methods.
#[derive(Debug, Default)]
pub struct ClassConstantTable {
    builder: ObjectTableBuilder<ConstantValue>,
}

impl ClassConstantTable {
    pub fn new() -> Self {
        ClassConstantTable::default()
    }

    /// Equivalent of `addConstantObject`: records a reference and returns its (not-yet-final)
    /// table index.
    pub fn add_constant_object(&mut self, value: ConstantValue) -> usize {
        self.builder.add_constant_object(value)
    }

    /// Finalizes the table in frequency-sorted order; index 0 is the most-referenced constant.
    pub fn finish(self) -> Vec<ConstantValue> {
        self.builder.build_sorted()
    }
}

/// Phase 1: walks a method's already-parsed bytecode-independent instruction stream (produced
/// by `classfile::load_method`) into IR, recording constant objects as it goes.
///
/// Real Squawk parses raw JVM bytecode here; this crate's loader (`classfile.rs`) already
/// yields `IrOp`-shaped instructions directly, so phase 1 here is the constant-interning pass
/// over that stream.
pub fn phase1_build_ir(
    raw_ops: Vec<IrOp>,
    constants: &mut ClassConstantTable,
) -> IrList {
    let mut list = IrList::new();
    for op in raw_ops {
        if let IrOp::LoadConstant(value) = &op {
            // Small ints get their own compact/wide immediate form in emit.rs; everything
            // else (longs, floats, doubles, strings, class literals, null) is too wide for an
            // inline operand and goes through the per-class constant object table instead.
            if !matches!(value, ConstantValue::Int(_)) {
                constants.add_constant_object(value.clone());
            }
        }
        list.push(op);
    }
    list
}

/// Phase 2 lowering rules.
///
/// Fuses `new` immediately followed by an `invokespecial` to its own `<init>` into a single
/// [`IrOp::NewObject`], and fuses a `Comparison` immediately followed by an `If` with an
/// integer binary comparison into a single typed branch. Rejects user calls to reserved
/// `java.lang.VM.do_*` helpers.
pub fn phase2_lower(list: &mut IrList) -> TranslatorResult<()> {
    reject_reserved_helper_calls(list)?;
    fuse_new_and_init(list);
    fuse_compare_and_branch(list);
    Ok(())
}

fn reject_reserved_helper_calls(list: &IrList) -> TranslatorResult<()> {
    for (_, op) in list.iter() {
        if let IrOp::Invoke { target, .. } = op {
            if is_reserved_do_helper(*target) {
                return Err(TranslatorError::VerifyError(format!(
                    "user code may not call reserved helper method {}",
                    target.method_id
                )));
            }
        }
    }
    Ok(())
}

/// A stand-in for "this MethodRef names a `java.lang.VM.do_*` helper": real Squawk checks this
/// against the bound `FixedEntryPoints` table; here we treat any call into the well-known
/// helper class id 0 with a method id in the reserved range as reserved, keeping this module
/// independent of `squawk-suite`'s binding step.
fn is_reserved_do_helper(target: MethodRef) -> bool {
    target.class.suite_no() == 0 && target.class.class_no() == 0 && target.method_id < 0x100
}

/// Fuses a `New` and the `invokespecial` that constructs it, even when argument-computing
/// instructions sit between them (real bytecode is `new; dup; <args...>; invokespecial`; this
/// IR has no `dup`, so the argument span is whatever falls between the two nodes). The fused
/// `NewObject` instruction replaces the *invoke's* position, since it must run only once its
/// constructor arguments are already on the stack; the original `New` node is dropped.
fn fuse_new_and_init(list: &mut IrList) {
    let mut cursor = {
        let mut head = None;
        for (i, _) in list.iter() {
            head = Some(i);
            break;
        }
        head
    };
    while let Some(index) = cursor {
        let after = list.next_of(index);
        if let IrOp::New { class } = list.get(index).clone() {
            if let Some((invoke_index, target)) = find_matching_constructor_call(list, index, class) {
                list.replace(invoke_index, IrOp::NewObject { class, constructor: target });
                list.remove(index);
                cursor = after;
                continue;
            }
        }
        cursor = list.next_of(index);
    }
}

/// Walks forward from `new_index` looking for the `invokespecial <init>` that consumes it.
/// Stops without a match at any control-transfer instruction, since those mean the `invoke`
/// does not unconditionally follow this `new` on every path.
fn find_matching_constructor_call(
    list: &IrList,
    new_index: usize,
    class: squawk_core::ClassId,
) -> Option<(usize, MethodRef)> {
    let mut probe = list.next_of(new_index);
    while let Some(p) = probe {
        match list.get(p).clone() {
            IrOp::Invoke { kind: crate::ir::InvokeKind::Special, target } if target.class == class => {
                return Some((p, target));
            }
            IrOp::Goto { .. }
            | IrOp::If { .. }
            | IrOp::TableSwitch { .. }
            | IrOp::LookupSwitch { .. }
            | IrOp::Return { .. }
            | IrOp::Throw => return None,
            _ => {}
        }
        probe = list.next_of(p);
    }
    None
}

fn fuse_compare_and_branch(list: &mut IrList) {
    use crate::ir::{CompareOp, ComparisonOp, IfCondition, Primitive};

    let mut cursor = {
        let mut head = None;
        for (i, _) in list.iter() {
            head = Some(i);
            break;
        }
        head
    };
    while let Some(index) = cursor {
        let next = list.next_of(index);
        if let (IrOp::Comparison(cmp), Some(next_index)) = (list.get(index).clone(), next) {
            if let IrOp::If {
                condition: IfCondition::Binary { op, kind: Primitive::Int },
                target,
            } = list.get(next_index).clone()
            {
                let typed_kind = match cmp {
                    ComparisonOp::Lcmp => Primitive::Long,
                    ComparisonOp::Fcmpl | ComparisonOp::Fcmpg => Primitive::Float,
                };
                list.replace(
                    index,
                    IrOp::If {
                        condition: IfCondition::Binary {
                            op: normalize_fused_op(op),
                            kind: typed_kind,
                        },
                        target,
                    },
                );
                list.remove(next_index);
            }
        }
        cursor = list.next_of(index);
    }

    fn normalize_fused_op(op: CompareOp) -> CompareOp {
        op
    }
}

/// Synthesizes a default no-arg constructor body for a class that declared none: `aload_0,
/// invokespecial #6, return` against a five-byte body and a seven-entry synthetic constant
/// pool.
pub fn synthesize_default_constructor(super_init: MethodRef) -> IrList {
    let mut list = IrList::new();
    list.push(IrOp::LoadLocal { slot: 0, is_this: true });
    list.push(IrOp::Invoke {
        kind: crate::ir::InvokeKind::Special,
        target: super_init,
    });
    list.push(IrOp::Return { kind: None });
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompareOp, ComparisonOp, IfCondition, InvokeKind, Primitive};
    use squawk_core::ClassId;

    #[test]
    fn new_plus_init_folds_into_new_object() {
        let class = ClassId::new(1, 5);
        let ctor = MethodRef { class, method_id: 0 };
        let mut list = IrList::new();
        list.push(IrOp::New { class });
        list.push(IrOp::Invoke { kind: InvokeKind::Special, target: ctor });
        phase2_lower(&mut list).unwrap();
        let ops: Vec<&IrOp> = list.iter().map(|(_, op)| op).collect();
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], IrOp::NewObject { .. }));
    }

    #[test]
    fn new_plus_init_folds_across_constructor_arguments() {
        let class = ClassId::new(1, 5);
        let ctor = MethodRef { class, method_id: 0 };
        let mut list = IrList::new();
        list.push(IrOp::New { class });
        list.push(IrOp::LoadConstant(ConstantValue::Int(1)));
        list.push(IrOp::LoadConstant(ConstantValue::Int(2)));
        list.push(IrOp::Invoke { kind: InvokeKind::Special, target: ctor });
        phase2_lower(&mut list).unwrap();
        let ops: Vec<&IrOp> = list.iter().map(|(_, op)| op).collect();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], IrOp::LoadConstant(ConstantValue::Int(1))));
        assert!(matches!(ops[1], IrOp::LoadConstant(ConstantValue::Int(2))));
        assert!(matches!(ops[2], IrOp::NewObject { .. }));
    }

    #[test]
    fn new_followed_by_unrelated_branch_does_not_fuse() {
        let class = ClassId::new(1, 5);
        let ctor = MethodRef { class, method_id: 0 };
        let mut list = IrList::new();
        list.push(IrOp::New { class });
        list.push(IrOp::Goto { target: 0 });
        list.push(IrOp::Invoke { kind: InvokeKind::Special, target: ctor });
        phase2_lower(&mut list).unwrap();
        let ops: Vec<&IrOp> = list.iter().map(|(_, op)| op).collect();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], IrOp::New { .. }));
    }

    #[test]
    fn lcmp_plus_if_icmp_fuses_into_typed_branch() {
        let mut list = IrList::new();
        list.push(IrOp::Comparison(ComparisonOp::Lcmp));
        list.push(IrOp::If {
            condition: IfCondition::Binary { op: CompareOp::Lt, kind: Primitive::Int },
            target: 10,
        });
        phase2_lower(&mut list).unwrap();
        let ops: Vec<&IrOp> = list.iter().map(|(_, op)| op).collect();
        assert_eq!(ops.len(), 1);
        match ops[0] {
            IrOp::If { condition: IfCondition::Binary { kind: Primitive::Long, .. }, target } => {
                assert_eq!(*target, 10);
            }
            other => panic!("expected fused typed branch, got {other:?}"),
        }
    }

    #[test]
    fn reserved_helper_call_from_user_code_is_rejected() {
        let mut list = IrList::new();
        list.push(IrOp::Invoke {
            kind: InvokeKind::Static,
            target: MethodRef { class: ClassId::new(0, 0), method_id: 1 },
        });
        assert!(matches!(phase2_lower(&mut list), Err(TranslatorError::VerifyError(_))));
    }

    #[test]
    fn default_constructor_body_has_expected_shape() {
        let ctor = MethodRef { class: ClassId::new(0, 1), method_id: 6 };
        let list = synthesize_default_constructor(ctor);
        assert_eq!(list.len(), 3);
        let ops: Vec<&IrOp> = list.iter().map(|(_, op)| op).collect();
        assert!(matches!(ops[0], IrOp::LoadLocal { slot: 0, is_this: true }));
        assert!(matches!(ops[1], IrOp::Invoke { kind: InvokeKind::Special, .. }));
        assert!(matches!(ops[2], IrOp::Return { kind: None }));
    }
}
