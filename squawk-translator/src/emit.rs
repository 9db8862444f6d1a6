//! Squawk bytecode emission and method-header packing.
//!
//! Encodes IR into the compact Squawk opcode table, selecting the narrowest form for each
//! operand, and packs the final on-disk method header in its reverse-growth layout:
//! bytecode first, then (toward lower addresses) owning-class pointer, Minfo, oop-map,
//! exception table, relocation table, and a length word tagged `11`.
//!
//! Emission is two passes. Pass 1 walks the IR once, producing each instruction's bytes with
//! branch targets left as zeroed 4-byte placeholders, and records the final byte offset of
//! every IR node (`Goto`/`If`/switch targets are node indices, not byte offsets). Pass 2
//! resolves every placeholder to a relative offset, matching `squawk-vm`'s `branch_to`
//! convention: relative to the instruction pointer immediately after the 4-byte field.

use crate::error::{TranslatorError, TranslatorResult};
use crate::ir::{ArithmeticOp, ComparisonOp, ConstantValue, IfCondition, IrList, IrOp, MethodRef, Primitive};
use crate::opcode::{opcode_byte, ArithKind, BranchKind, CompactKind, ConvertKind, SquawkOpcode};
use squawk_core::{ClassId, OopMap};
use squawk_suite::{ExceptionTableEntry, Minfo, MethodBody, RelocationEntry, RelocationKind};
use std::collections::HashMap;

/// Build-time flag controlling parameter push order across ABI boundaries. The emitter always
/// pushes parameters in declaration order; native-call sites that need the reverse order reverse
/// them at the call site, never in the interpreter's dispatch loop. `squawk-vm`'s dispatcher is
/// written assuming this.
pub const REVERSE_PARAMETERS: bool = false;

/// One emitted instruction: an opcode byte plus zero or more immediate bytes, with an optional
/// relocation marker for an embedded absolute class reference, and zero or more branch-target
/// placeholders (byte offset within `bytes`, target IR node index) to resolve in pass 2.
struct Emitted {
    bytes: Vec<u8>,
    relocation: Option<(usize, RelocationKind)>,
    branch_patches: Vec<(usize, usize)>,
}

impl Emitted {
    fn simple(bytes: Vec<u8>) -> Self {
        Emitted { bytes, relocation: None, branch_patches: Vec::new() }
    }
}

fn emit_compact_or_wide(kind: CompactKind, operand: i32) -> Emitted {
    if operand >= 0 {
        if let Some(op) = SquawkOpcode::compact_for(kind, operand as u16) {
            return Emitted::simple(vec![opcode_byte(op)]);
        }
    }
    let prefix = SquawkOpcode::wide_prefix_for(operand);
    let mut bytes = vec![opcode_byte(prefix)];
    match prefix {
        SquawkOpcode::WideShort => bytes.push(operand as i8 as u8),
        SquawkOpcode::WideInt => bytes.extend_from_slice(&operand.to_le_bytes()),
        _ => {}
    }
    let base = match kind {
        CompactKind::Load => SquawkOpcode::Load(0),
        CompactKind::Store => SquawkOpcode::Store(0),
        CompactKind::Const => SquawkOpcode::Const(0),
        CompactKind::Object => SquawkOpcode::Object(0),
    };
    bytes.push(opcode_byte(base));
    Emitted::simple(bytes)
}

/// Encodes a class reference as a fixed 4-byte absolute field, tagged for relocation.
fn emit_class_ref(opcode: SquawkOpcode, class: ClassId) -> Emitted {
    let mut bytes = vec![opcode_byte(opcode)];
    bytes.extend_from_slice(&class.raw().to_le_bytes());
    Emitted { bytes, relocation: Some((1, RelocationKind::AbsoluteInt)), branch_patches: Vec::new() }
}

/// Encodes `opcode class field_id`: a class reference followed by a plain 2-byte field id.
fn emit_field_ref(opcode: SquawkOpcode, owner: ClassId, field_id: u16) -> Emitted {
    let mut bytes = vec![opcode_byte(opcode)];
    bytes.extend_from_slice(&owner.raw().to_le_bytes());
    bytes.extend_from_slice(&field_id.to_le_bytes());
    Emitted { bytes, relocation: Some((1, RelocationKind::AbsoluteInt)), branch_patches: Vec::new() }
}

/// Encodes `opcode field_id` with no owning-class operand (implicit `this`).
fn emit_local_field_ref(opcode: SquawkOpcode, field_id: u16) -> Emitted {
    let mut bytes = vec![opcode_byte(opcode)];
    bytes.extend_from_slice(&field_id.to_le_bytes());
    Emitted::simple(bytes)
}

/// Encodes a branch: opcode followed by a 4-byte relative-offset placeholder resolved in pass 2.
fn emit_branch(opcode: SquawkOpcode, target: usize) -> Emitted {
    let mut bytes = vec![opcode_byte(opcode)];
    bytes.extend_from_slice(&0i32.to_le_bytes());
    Emitted { bytes, relocation: None, branch_patches: vec![(1, target)] }
}

fn primitive_tag(kind: Primitive) -> u8 {
    match kind {
        Primitive::Int => 0,
        Primitive::Long => 1,
        Primitive::Float => 2,
        Primitive::Double => 3,
        Primitive::Boolean => 4,
        Primitive::Char => 5,
        Primitive::Short => 6,
        Primitive::Byte => 7,
        Primitive::Reference => 8,
    }
}

fn convert_kind_for(from: Primitive, to: Primitive) -> Option<ConvertKind> {
    use Primitive::*;
    Some(match (from, to) {
        (Int, Long) => ConvertKind::I2l,
        (Int, Float) => ConvertKind::I2f,
        (Int, Double) => ConvertKind::I2d,
        (Long, Int) => ConvertKind::L2i,
        (Long, Float) => ConvertKind::L2f,
        (Long, Double) => ConvertKind::L2d,
        (Float, Int) => ConvertKind::F2i,
        (Float, Long) => ConvertKind::F2l,
        (Float, Double) => ConvertKind::F2d,
        (Double, Int) => ConvertKind::D2i,
        (Double, Long) => ConvertKind::D2l,
        (Double, Float) => ConvertKind::D2f,
        (Int, Byte) => ConvertKind::I2b,
        (Int, Char) => ConvertKind::I2c,
        (Int, Short) => ConvertKind::I2s,
        _ => return None,
    })
}

fn arithmetic_opcode(op: ArithmeticOp, kind: Primitive) -> TranslatorResult<SquawkOpcode> {
    let kind = ArithKind::from_primitive(kind).ok_or_else(|| {
        TranslatorError::EmitError(format!("no base-plane arithmetic opcode for {kind:?} operands"))
    })?;
    Ok(match op {
        ArithmeticOp::Add => SquawkOpcode::Add(kind),
        ArithmeticOp::Sub => SquawkOpcode::Sub(kind),
        ArithmeticOp::Mul => SquawkOpcode::Mul(kind),
        ArithmeticOp::Div => SquawkOpcode::Div(kind),
        ArithmeticOp::Rem => SquawkOpcode::Rem(kind),
        ArithmeticOp::And => SquawkOpcode::And(kind),
        ArithmeticOp::Or => SquawkOpcode::Or(kind),
        ArithmeticOp::Xor => SquawkOpcode::Xor(kind),
        ArithmeticOp::Shl => SquawkOpcode::Shl(kind),
        ArithmeticOp::Shr => SquawkOpcode::Shr(kind),
        ArithmeticOp::Ushr => SquawkOpcode::Ushr(kind),
        ArithmeticOp::Neg => SquawkOpcode::Neg(kind),
    })
}

fn comparison_opcode(op: ComparisonOp) -> SquawkOpcode {
    match op {
        ComparisonOp::Lcmp => SquawkOpcode::Lcmp,
        ComparisonOp::Fcmpl => SquawkOpcode::Fcmpl,
        ComparisonOp::Fcmpg => SquawkOpcode::Fcmpg,
    }
}

fn invoke_opcode(kind: crate::ir::InvokeKind) -> SquawkOpcode {
    use crate::ir::InvokeKind;
    match kind {
        InvokeKind::Virtual => SquawkOpcode::InvokeVirtual,
        InvokeKind::Static => SquawkOpcode::InvokeStatic,
        InvokeKind::Super => SquawkOpcode::InvokeSuper,
        InvokeKind::Special => SquawkOpcode::InvokeSpecial,
        InvokeKind::Interface => SquawkOpcode::InvokeInterface,
        InvokeKind::Native => SquawkOpcode::InvokeNative,
    }
}

fn emit_invoke(kind: crate::ir::InvokeKind, target: MethodRef) -> Emitted {
    let mut bytes = vec![opcode_byte(invoke_opcode(kind))];
    bytes.extend_from_slice(&target.class.raw().to_le_bytes());
    bytes.extend_from_slice(&target.method_id.to_le_bytes());
    Emitted { bytes, relocation: Some((1, RelocationKind::AbsoluteInt)), branch_patches: Vec::new() }
}

/// Finds the index of a non-`Int` constant in the class's finalized object table, used for the
/// `object_n` compact form. `Int` constants never reach here; they are encoded inline instead.
fn object_index_of(object_table: &[ConstantValue], value: &ConstantValue) -> TranslatorResult<usize> {
    object_table
        .iter()
        .position(|entry| entry == value)
        .ok_or_else(|| TranslatorError::EmitError(format!("constant {value:?} missing from object table")))
}

fn branch_kind_of(kind: Primitive) -> BranchKind {
    BranchKind::from_primitive(kind)
}

/// Emits one IR op to bytes. `object_table` is the class's finalized, frequency-sorted constant
/// object table (see `transform::ClassConstantTable::finish`), used to resolve non-`Int`
/// `LoadConstant` values to an `object_n` index.
fn emit_op(op: &IrOp, object_table: &[ConstantValue]) -> TranslatorResult<Emitted> {
    Ok(match op {
        IrOp::LoadLocal { slot, .. } => emit_compact_or_wide(CompactKind::Load, *slot as i32),
        IrOp::StoreLocal { slot } => emit_compact_or_wide(CompactKind::Store, *slot as i32),
        IrOp::LoadConstant(ConstantValue::Int(v)) => emit_compact_or_wide(CompactKind::Const, *v),
        IrOp::LoadConstant(value) => {
            let index = object_index_of(object_table, value)?;
            emit_compact_or_wide(CompactKind::Object, index as i32)
        }
        IrOp::LoadField { owner, field_id } => emit_field_ref(SquawkOpcode::GetField, *owner, *field_id),
        IrOp::StoreField { owner, field_id } => emit_field_ref(SquawkOpcode::PutField, *owner, *field_id),
        IrOp::LoadStatic { owner, field_id } => emit_field_ref(SquawkOpcode::GetStatic, *owner, *field_id),
        IrOp::StoreStatic { owner, field_id } => emit_field_ref(SquawkOpcode::PutStatic, *owner, *field_id),
        IrOp::ThisGetField { field_id } => emit_local_field_ref(SquawkOpcode::ThisGetField, *field_id),
        IrOp::ClassGetStatic { owner, field_id } => {
            emit_field_ref(SquawkOpcode::ClassGetStatic, *owner, *field_id)
        }
        IrOp::ArrayLoad { .. } => Emitted::simple(vec![opcode_byte(SquawkOpcode::ArrayLoad)]),
        IrOp::ArrayStore { .. } => Emitted::simple(vec![opcode_byte(SquawkOpcode::ArrayStore)]),
        IrOp::Arithmetic { op, kind } => {
            Emitted::simple(vec![opcode_byte(arithmetic_opcode(*op, *kind)?)])
        }
        IrOp::Comparison(op) => Emitted::simple(vec![opcode_byte(comparison_opcode(*op))]),
        IrOp::Convert { from, to } => {
            let kind = convert_kind_for(*from, *to).ok_or_else(|| {
                TranslatorError::EmitError(format!("no conversion opcode from {from:?} to {to:?}"))
            })?;
            Emitted::simple(vec![opcode_byte(SquawkOpcode::Convert(kind))])
        }
        IrOp::Invoke { kind, target } => emit_invoke(*kind, *target),
        IrOp::Return { kind: Some(_) } => Emitted::simple(vec![opcode_byte(SquawkOpcode::Return)]),
        IrOp::Return { kind: None } => Emitted::simple(vec![opcode_byte(SquawkOpcode::ReturnVoid)]),
        IrOp::Goto { target } => emit_branch(SquawkOpcode::Goto, *target),
        IrOp::If { condition, target } => {
            let opcode = match *condition {
                IfCondition::Unary { op, kind } => {
                    SquawkOpcode::IfCmp { op, kind: branch_kind_of(kind), binary: false }
                }
                IfCondition::Binary { op, kind } => {
                    SquawkOpcode::IfCmp { op, kind: branch_kind_of(kind), binary: true }
                }
            };
            emit_branch(opcode, *target)
        }
        IrOp::TableSwitch { low, high, targets, default } => {
            emit_table_switch(*low, *high, targets, *default)
        }
        IrOp::LookupSwitch { pairs, default } => emit_lookup_switch(pairs, *default),
        IrOp::Throw => Emitted::simple(vec![opcode_byte(SquawkOpcode::Throw)]),
        IrOp::MonitorEnter => Emitted::simple(vec![opcode_byte(SquawkOpcode::MonitorEnter)]),
        IrOp::MonitorExit => Emitted::simple(vec![opcode_byte(SquawkOpcode::MonitorExit)]),
        IrOp::New { class } => emit_class_ref(SquawkOpcode::New, *class),
        IrOp::NewObject { class, constructor } => {
            let mut bytes = vec![opcode_byte(SquawkOpcode::NewObject)];
            bytes.extend_from_slice(&class.raw().to_le_bytes());
            bytes.extend_from_slice(&constructor.method_id.to_le_bytes());
            Emitted { bytes, relocation: Some((1, RelocationKind::AbsoluteInt)), branch_patches: Vec::new() }
        }
        IrOp::NewArray { component } => {
            Emitted::simple(vec![opcode_byte(SquawkOpcode::NewArray), primitive_tag(*component)])
        }
        IrOp::NewDimension { dims } => Emitted::simple(vec![opcode_byte(SquawkOpcode::NewDimension), *dims]),
        IrOp::InstanceOf { class } => emit_class_ref(SquawkOpcode::InstanceOf, *class),
        IrOp::CheckCast { class } => emit_class_ref(SquawkOpcode::CheckCast, *class),
    })
}

fn emit_table_switch(low: i32, high: i32, targets: &[usize], default: usize) -> Emitted {
    let mut bytes = vec![opcode_byte(SquawkOpcode::TableSwitch)];
    bytes.extend_from_slice(&low.to_le_bytes());
    bytes.extend_from_slice(&high.to_le_bytes());
    let default_offset = bytes.len();
    bytes.extend_from_slice(&0i32.to_le_bytes());
    let mut branch_patches = vec![(default_offset, default)];
    for &target in targets {
        let offset = bytes.len();
        bytes.extend_from_slice(&0i32.to_le_bytes());
        branch_patches.push((offset, target));
    }
    Emitted { bytes, relocation: None, branch_patches }
}

fn emit_lookup_switch(pairs: &[(i32, usize)], default: usize) -> Emitted {
    let mut bytes = vec![opcode_byte(SquawkOpcode::LookupSwitch)];
    bytes.extend_from_slice(&(pairs.len() as i32).to_le_bytes());
    let mut branch_patches = Vec::new();
    for &(key, target) in pairs {
        bytes.extend_from_slice(&key.to_le_bytes());
        let offset = bytes.len();
        bytes.extend_from_slice(&0i32.to_le_bytes());
        branch_patches.push((offset, target));
    }
    let default_offset = bytes.len();
    bytes.extend_from_slice(&0i32.to_le_bytes());
    branch_patches.push((default_offset, default));
    Emitted { bytes, relocation: None, branch_patches }
}

/// Emits a full method body: bytecode plus the reverse-growth header fields, from lowered IR, a
/// slot assignment, a finished oop-map, and the class's finalized constant object table.
pub fn emit_method(
    owning_class: ClassId,
    list: &IrList,
    minfo: Minfo,
    locals_oop_map: OopMap,
    exception_table: Vec<ExceptionTableEntry>,
    object_table: &[ConstantValue],
) -> TranslatorResult<MethodBody> {
    let mut code = Vec::new();
    let mut relocation_table = Vec::new();
    let mut pending_patches: Vec<(usize, usize)> = Vec::new();
    let mut node_offsets: HashMap<usize, usize> = HashMap::new();

    for (index, op) in list.iter() {
        let emitted = emit_op(op, object_table)?;
        let base = code.len();
        node_offsets.insert(index, base);
        if let Some((local_offset, kind)) = emitted.relocation {
            relocation_table.push(RelocationEntry { byte_offset: (base + local_offset) as u32, kind });
        }
        for (local_offset, target) in emitted.branch_patches {
            pending_patches.push((base + local_offset, target));
        }
        code.extend(emitted.bytes);
    }

    for (patch_offset, target_index) in pending_patches {
        let target_offset = *node_offsets.get(&target_index).ok_or_else(|| {
            TranslatorError::EmitError(format!("branch target node {target_index} was never emitted"))
        })?;
        // Matches `squawk-vm::dispatch::Interpreter::branch_to`: relative to the instruction
        // pointer immediately after the 4-byte offset field.
        let relative = target_offset as i64 - (patch_offset as i64 + 4);
        let relative = i32::try_from(relative)
            .map_err(|_| TranslatorError::EmitError(format!("branch offset {relative} out of range")))?;
        code[patch_offset..patch_offset + 4].copy_from_slice(&relative.to_le_bytes());
    }

    Ok(MethodBody {
        owning_class,
        minfo,
        code,
        locals_oop_map,
        exception_table,
        relocation_table,
    })
}

/// Packs a [`MethodBody`] into the reverse-growth on-disk layout: bytecode first at increasing
/// addresses, then, read backward from the end of the returned buffer, owning-class pointer,
/// Minfo, oop-map, exception table, relocation table, and a length word whose low two bits are
/// `11`.
pub fn pack_method_header(method: &MethodBody) -> Vec<u8> {
    let mut tail = Vec::new();
    tail.extend_from_slice(&method.owning_class.raw().to_le_bytes());
    tail.push((method.minfo.max_stack & 0xFF) as u8);
    tail.push((method.minfo.local_count & 0xFF) as u8);
    tail.push((method.minfo.parameter_count & 0xFF) as u8);
    tail.push((method.minfo.cleared_slot_count & 0xFF) as u8);
    let oop_map_bytes = method.locals_oop_map.encode();
    tail.push(oop_map_bytes.len() as u8);
    tail.extend_from_slice(&oop_map_bytes);
    tail.push(method.exception_table.len() as u8);
    for entry in &method.exception_table {
        tail.extend_from_slice(&entry.start_ip.to_le_bytes());
        tail.extend_from_slice(&entry.end_ip.to_le_bytes());
        tail.extend_from_slice(&entry.handler_ip.to_le_bytes());
    }
    tail.push(method.relocation_table.len() as u8);
    for entry in &method.relocation_table {
        tail.extend_from_slice(&entry.byte_offset.to_le_bytes());
    }

    let mut packed = method.code.clone();
    packed.extend(tail);
    let length_word = (packed.len() as u32) << 2 | 0b11;
    packed.extend_from_slice(&length_word.to_le_bytes());
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompareOp, InvokeKind};
    use crate::opcode::decode_opcode;
    use squawk_core::ClassId;

    fn empty_minfo() -> Minfo {
        Minfo { max_stack: 2, local_count: 0, parameter_count: 2, cleared_slot_count: 0 }
    }

    #[test]
    fn small_local_index_emits_compact_form() {
        let emitted = emit_compact_or_wide(CompactKind::Load, 3);
        assert_eq!(emitted.bytes, vec![opcode_byte(SquawkOpcode::Load(3))]);
    }

    #[test]
    fn large_local_index_emits_wide_prefix() {
        let emitted = emit_compact_or_wide(CompactKind::Load, 1000);
        assert_eq!(emitted.bytes[0], opcode_byte(SquawkOpcode::WideInt));
        assert_eq!(emitted.bytes.len(), 1 + 4 + 1);
    }

    #[test]
    fn method_header_packs_with_trailing_length_tag_11() {
        let mut list = IrList::new();
        list.push(IrOp::LoadConstant(ConstantValue::Int(1)));
        list.push(IrOp::LoadConstant(ConstantValue::Int(2)));
        list.push(IrOp::Arithmetic { op: ArithmeticOp::Add, kind: Primitive::Int });
        list.push(IrOp::Return { kind: Some(Primitive::Int) });
        let method = emit_method(
            ClassId::new(0, 1),
            &list,
            empty_minfo(),
            OopMap::from_slot_count(0),
            vec![],
            &[],
        )
        .unwrap();
        let packed = pack_method_header(&method);
        let tag = u32::from_le_bytes(packed[packed.len() - 4..].try_into().unwrap()) & 0b11;
        assert_eq!(tag, 0b11);
    }

    #[test]
    fn forward_goto_resolves_to_positive_relative_offset() {
        let mut list = IrList::new();
        list.push(IrOp::Goto { target: 2 });
        list.push(IrOp::LoadConstant(ConstantValue::Int(1)));
        list.push(IrOp::Return { kind: Some(Primitive::Int) });
        let method =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[])
                .unwrap();
        assert_eq!(method.code[0], opcode_byte(SquawkOpcode::Goto));
        let offset = i32::from_le_bytes(method.code[1..5].try_into().unwrap());
        // ip after reading the offset is 5; target (Return's offset) is 6; relative is 1.
        assert_eq!(offset, 1);
    }

    #[test]
    fn back_branch_resolves_to_negative_relative_offset() {
        let mut list = IrList::new();
        list.push(IrOp::LoadConstant(ConstantValue::Int(0)));
        list.push(IrOp::Goto { target: 0 });
        let method =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[])
                .unwrap();
        let goto_offset = 1; // one byte for Const(0)
        let offset = i32::from_le_bytes(method.code[goto_offset + 1..goto_offset + 5].try_into().unwrap());
        // ip after reading the offset is goto_offset + 5 = 6; target (Const(0)) is at byte 0.
        assert_eq!(offset, -6);
    }

    #[test]
    fn non_int_constant_resolves_through_object_table() {
        let table = vec![ConstantValue::StringLiteral("hi".to_string())];
        let mut list = IrList::new();
        list.push(IrOp::LoadConstant(ConstantValue::StringLiteral("hi".to_string())));
        list.push(IrOp::Return { kind: Some(Primitive::Reference) });
        let method = emit_method(
            ClassId::new(0, 1),
            &list,
            empty_minfo(),
            OopMap::from_slot_count(0),
            vec![],
            &table,
        )
        .unwrap();
        assert_eq!(decode_opcode(method.code[0]), Some(SquawkOpcode::Object(0)));
    }

    #[test]
    fn missing_constant_in_object_table_is_an_emit_error() {
        let mut list = IrList::new();
        list.push(IrOp::LoadConstant(ConstantValue::StringLiteral("missing".to_string())));
        let result =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[]);
        assert!(matches!(result, Err(TranslatorError::EmitError(_))));
    }

    #[test]
    fn typed_branch_round_trips_through_if_cmp() {
        let mut list = IrList::new();
        list.push(IrOp::If {
            condition: IfCondition::Binary { op: CompareOp::Lt, kind: Primitive::Long },
            target: 0,
        });
        let method =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[])
                .unwrap();
        let decoded = decode_opcode(method.code[0]).unwrap();
        assert_eq!(
            decoded,
            SquawkOpcode::IfCmp { op: CompareOp::Lt, kind: BranchKind::Long, binary: true }
        );
    }

    #[test]
    fn invoke_special_carries_class_and_method_id() {
        let target = MethodRef { class: ClassId::new(2, 9), method_id: 42 };
        let mut list = IrList::new();
        list.push(IrOp::Invoke { kind: InvokeKind::Special, target });
        let method =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[])
                .unwrap();
        assert_eq!(decode_opcode(method.code[0]), Some(SquawkOpcode::InvokeSpecial));
        assert_eq!(method.relocation_table.len(), 1);
        let method_id = u16::from_le_bytes(method.code[5..7].try_into().unwrap());
        assert_eq!(method_id, 42);
    }

    #[test]
    fn unsupported_conversion_pair_is_rejected() {
        let mut list = IrList::new();
        list.push(IrOp::Convert { from: Primitive::Boolean, to: Primitive::Reference });
        let result =
            emit_method(ClassId::new(0, 1), &list, empty_minfo(), OopMap::from_slot_count(0), vec![], &[]);
        assert!(matches!(result, Err(TranslatorError::EmitError(_))));
    }
}
