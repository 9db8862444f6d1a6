//! Integration tests for the interpreter's seed scenarios: arithmetic wraparound and the
//! implicit null/bounds checks the translator compiles down to `java.lang.VM.do_*` helper calls
//! instead of inline tests.

use squawk_core::{ClassId, Heap, HeapObject, NullBarrier, OopMap};
use squawk_suite::{Minfo, MethodBody};
use squawk_translator::opcode::{opcode_byte, ArithKind, ConvertKind, SquawkOpcode};
use squawk_vm::{Interpreter, StackChunk, StepOutcome};

fn dummy_oop() -> squawk_core::Oop {
    let mut heap = Heap::new(Box::new(NullBarrier));
    heap.allocate(HeapObject {
        class_id: ClassId::new(0, 0),
        component_type: None,
        slots: vec![],
    })
}

fn method(code: Vec<u8>, local_count: u16) -> MethodBody {
    MethodBody {
        owning_class: ClassId::new(0, 1),
        minfo: Minfo {
            max_stack: 4,
            local_count,
            parameter_count: 0,
            cleared_slot_count: 0,
        },
        code,
        locals_oop_map: OopMap::from_slot_count(local_count as usize),
        exception_table: vec![],
        relocation_table: vec![],
    }
}

/// `long and(long, long)`: widens two int operands to `long` via `i2l` before `AND`-ing them,
/// so the interpreter actually exercises `Value::Long` rather than faking width with an int.
#[test]
fn and_of_min_value_and_negative_one_does_not_panic() {
    let code = vec![
        opcode_byte(SquawkOpcode::WideInt),
        i32::MIN.to_le_bytes()[0],
        i32::MIN.to_le_bytes()[1],
        i32::MIN.to_le_bytes()[2],
        i32::MIN.to_le_bytes()[3],
        opcode_byte(SquawkOpcode::Const(0)),
        opcode_byte(SquawkOpcode::Convert(ConvertKind::I2l)),
        opcode_byte(SquawkOpcode::WideM1),
        opcode_byte(SquawkOpcode::Const(0)),
        opcode_byte(SquawkOpcode::Convert(ConvertKind::I2l)),
        opcode_byte(SquawkOpcode::And(ArithKind::Long)),
    ];
    let body = method(code, 0);
    let mut chunk = StackChunk::new(1, 256);
    chunk.push_frame(dummy_oop(), 0).unwrap();
    let mut interp = Interpreter::new(chunk, &body);
    for _ in 0..7 {
        assert_eq!(interp.step().unwrap(), StepOutcome::Continue);
    }
    assert_eq!(interp.operands, vec![squawk_vm::Value::Long((i32::MIN as i64) & -1i64)]);
}

/// Array-store/bounds/null checks are never inlined by the translator; the interpreter must
/// route every implicit check through the `do_*` helpers so they raise the exact exception
/// type the caller expects.
#[test]
fn bounds_check_helper_rejects_out_of_range_index_without_touching_the_heap() {
    let length = 4usize;
    assert!(squawk_vm::helpers::do_array_bounds_check(length as i32, length).is_err());
    assert!(squawk_vm::helpers::do_array_bounds_check(0, length).is_ok());
    assert!(squawk_vm::helpers::do_array_bounds_check(-1, length).is_err());
}

#[test]
fn null_check_helper_rejects_none_before_any_field_access() {
    assert!(squawk_vm::helpers::do_null_check(None).is_err());
    assert!(squawk_vm::helpers::do_null_check(Some(dummy_oop())).is_ok());
}
