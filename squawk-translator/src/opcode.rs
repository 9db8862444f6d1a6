//! The Squawk bytecode opcode table.
//!
//! Squawk packs common operations into 16-way "compact" forms (`load_0..15`, `store_0..15`,
//! `const_0..15`, `object_0..15`) and widens the operand of the *next* instruction with a one-
//! byte prefix (`wide_m1/wide_0/wide_1/wide_short/wide_int`) rather than encoding a wide
//! operand inline. `escape`/`escape_wide_*` select an extended opcode plane for floating-point
//! operations that do not fit the base byte space.

use crate::ir::{ArithmeticOp, CompareOp, Primitive};

/// Number of compact (inline-operand) slots for load/store/const/object.
pub const COMPACT_SLOTS: u8 = 16;

/// The primitive category a typed branch opcode is specialized for. Narrower stack categories
/// (`boolean`/`char`/`short`/`byte`) are always promoted to `Int` on the operand stack, per JVM
/// stack-map convention, so there is no variant for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

impl BranchKind {
    pub fn from_primitive(kind: Primitive) -> Self {
        match kind {
            Primitive::Long => BranchKind::Long,
            Primitive::Float => BranchKind::Float,
            Primitive::Double => BranchKind::Double,
            Primitive::Reference => BranchKind::Reference,
            Primitive::Int | Primitive::Boolean | Primitive::Char | Primitive::Short | Primitive::Byte => {
                BranchKind::Int
            }
        }
    }

    fn index(self) -> u8 {
        match self {
            BranchKind::Int => 0,
            BranchKind::Long => 1,
            BranchKind::Float => 2,
            BranchKind::Double => 3,
            BranchKind::Reference => 4,
        }
    }

    fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => BranchKind::Int,
            1 => BranchKind::Long,
            2 => BranchKind::Float,
            3 => BranchKind::Double,
            4 => BranchKind::Reference,
            _ => return None,
        })
    }
}

/// The primitive category an arithmetic opcode operates on. Squawk's Int slot already promotes
/// `boolean`/`char`/`short`/`byte`, and the base opcode space (unlike `escape`) only carries
/// integral arithmetic, so this is narrower than [`BranchKind`]: just the two categories the
/// interpreter's `Value` model actually executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithKind {
    Int,
    Long,
}

impl ArithKind {
    /// `None` for `Float`/`Double`/`Reference`, which have no base-plane arithmetic opcode.
    pub fn from_primitive(kind: Primitive) -> Option<Self> {
        match kind {
            Primitive::Int | Primitive::Boolean | Primitive::Char | Primitive::Short | Primitive::Byte => {
                Some(ArithKind::Int)
            }
            Primitive::Long => Some(ArithKind::Long),
            Primitive::Float | Primitive::Double | Primitive::Reference => None,
        }
    }

    fn index(self) -> u8 {
        match self {
            ArithKind::Int => 0,
            ArithKind::Long => 1,
        }
    }

    fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => ArithKind::Int,
            1 => ArithKind::Long,
            _ => return None,
        })
    }
}

fn arith_op_index(op: ArithmeticOp) -> u8 {
    match op {
        ArithmeticOp::Add => 0,
        ArithmeticOp::Sub => 1,
        ArithmeticOp::Mul => 2,
        ArithmeticOp::Div => 3,
        ArithmeticOp::Rem => 4,
        ArithmeticOp::And => 5,
        ArithmeticOp::Or => 6,
        ArithmeticOp::Xor => 7,
        ArithmeticOp::Shl => 8,
        ArithmeticOp::Shr => 9,
        ArithmeticOp::Ushr => 10,
        ArithmeticOp::Neg => 11,
    }
}

fn arith_op_from_index(index: u8) -> Option<ArithmeticOp> {
    Some(match index {
        0 => ArithmeticOp::Add,
        1 => ArithmeticOp::Sub,
        2 => ArithmeticOp::Mul,
        3 => ArithmeticOp::Div,
        4 => ArithmeticOp::Rem,
        5 => ArithmeticOp::And,
        6 => ArithmeticOp::Or,
        7 => ArithmeticOp::Xor,
        8 => ArithmeticOp::Shl,
        9 => ArithmeticOp::Shr,
        10 => ArithmeticOp::Ushr,
        11 => ArithmeticOp::Neg,
        _ => return None,
    })
}

fn compare_op_index(op: CompareOp) -> u8 {
    match op {
        CompareOp::Eq => 0,
        CompareOp::Ne => 1,
        CompareOp::Lt => 2,
        CompareOp::Ge => 3,
        CompareOp::Gt => 4,
        CompareOp::Le => 5,
    }
}

fn compare_op_from_index(index: u8) -> Option<CompareOp> {
    Some(match index {
        0 => CompareOp::Eq,
        1 => CompareOp::Ne,
        2 => CompareOp::Lt,
        3 => CompareOp::Ge,
        4 => CompareOp::Gt,
        5 => CompareOp::Le,
        _ => return None,
    })
}

/// Every JVM-level primitive widening/narrowing conversion the translator may need to lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertKind {
    I2l,
    I2f,
    I2d,
    L2i,
    L2f,
    L2d,
    F2i,
    F2l,
    F2d,
    D2i,
    D2l,
    D2f,
    I2b,
    I2c,
    I2s,
}

const CONVERT_KINDS: [ConvertKind; 15] = [
    ConvertKind::I2l,
    ConvertKind::I2f,
    ConvertKind::I2d,
    ConvertKind::L2i,
    ConvertKind::L2f,
    ConvertKind::L2d,
    ConvertKind::F2i,
    ConvertKind::F2l,
    ConvertKind::F2d,
    ConvertKind::D2i,
    ConvertKind::D2l,
    ConvertKind::D2f,
    ConvertKind::I2b,
    ConvertKind::I2c,
    ConvertKind::I2s,
];

/// A Squawk opcode, grouped the way the emitter and interpreter both read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquawkOpcode {
    /// `load_0..15`: push local `n`.
    Load(u8),
    /// `store_0..15`: pop into local `n`.
    Store(u8),
    /// `const_0..15`: push small integer literal `n`.
    Const(u8),
    /// `object_0..15`: push constant-object-table entry `n`.
    Object(u8),

    /// One-byte operand-width escalation prefixes for the *next* opcode.
    WideM1,
    Wide0,
    Wide1,
    WideShort,
    WideInt,
    /// Selects the extended float/double opcode plane for the next opcode.
    Escape,
    EscapeWideShort,
    EscapeWideInt,

    Add(ArithKind),
    Sub(ArithKind),
    Mul(ArithKind),
    Div(ArithKind),
    Rem(ArithKind),
    And(ArithKind),
    Or(ArithKind),
    Xor(ArithKind),
    Shl(ArithKind),
    Shr(ArithKind),
    Ushr(ArithKind),
    Neg(ArithKind),

    /// Typed comparisons producing -1/0/1 (`lcmp`, `fcmpl`, `fcmpg`, `dcmpl`, `dcmpg`).
    Lcmp,
    Fcmpl,
    Fcmpg,
    Dcmpl,
    Dcmpg,

    Convert(ConvertKind),

    /// Typed conditional branch: `op`/`kind` select the comparison and operand category,
    /// `binary` distinguishes a two-operand compare (`if_cmp{op}_{kind}`) from a one-operand
    /// compare against zero/null (`if_{op}_{kind}`). Fused from an explicit `xcmp` + integer
    /// `if_icmp?` pair when `transform::fuse_compare_and_branch` applies, or emitted directly
    /// for a plain `if`/`if_icmp`/`if_acmp`/`ifnull`/`ifnonnull`.
    IfCmp { op: CompareOp, kind: BranchKind, binary: bool },
    Goto,

    GetField,
    PutField,
    GetStatic,
    PutStatic,
    /// `getfield` against the implicit `this` receiver: no owning-class operand, just a field id.
    ThisGetField,
    /// `getstatic` against an explicit owning class distinct from the current method's class.
    ClassGetStatic,
    ArrayLoad,
    ArrayStore,
    ArrayLength,

    InvokeVirtual,
    InvokeStatic,
    InvokeSuper,
    InvokeSpecial,
    InvokeInterface,
    InvokeNative,

    Return,
    ReturnVoid,
    Throw,
    MonitorEnter,
    MonitorExit,
    New,
    NewObject,
    NewArray,
    NewDimension,
    InstanceOf,
    CheckCast,
    TableSwitch,
    LookupSwitch,

    /// Stack-shuffle opcodes `javac` emits around `new`+`<init>` and duplicate-expression
    /// evaluation that `transform::fuse_new_and_init` does not fuse away.
    Pop,
    Dup,
    Swap,
}

impl SquawkOpcode {
    /// True for the four 16-way compact forms.
    pub fn is_compact(self) -> bool {
        matches!(
            self,
            SquawkOpcode::Load(_)
                | SquawkOpcode::Store(_)
                | SquawkOpcode::Const(_)
                | SquawkOpcode::Object(_)
        )
    }

    /// Selects the narrowest compact form for an operand, or `None` if it must instead be
    /// emitted with a `wide_*` prefix.
    pub fn compact_for(kind: CompactKind, operand: u16) -> Option<SquawkOpcode> {
        if operand >= COMPACT_SLOTS as u16 {
            return None;
        }
        let n = operand as u8;
        Some(match kind {
            CompactKind::Load => SquawkOpcode::Load(n),
            CompactKind::Store => SquawkOpcode::Store(n),
            CompactKind::Const => SquawkOpcode::Const(n),
            CompactKind::Object => SquawkOpcode::Object(n),
        })
    }

    /// Selects the `wide_*` prefix needed to extend an operand that did not fit the compact
    /// form, by value range.
    pub fn wide_prefix_for(operand: i32) -> SquawkOpcode {
        match operand {
            -1 => SquawkOpcode::WideM1,
            0 => SquawkOpcode::Wide0,
            1 => SquawkOpcode::Wide1,
            -128..=127 => SquawkOpcode::WideShort,
            _ => SquawkOpcode::WideInt,
        }
    }
}

/// Which compact-form family an operand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactKind {
    Load,
    Store,
    Const,
    Object,
}

/// `Add(Int)/Add(Long)/Sub(Int)/...`: 12 ops * 2 kinds = 24 contiguous bytes.
const ARITH_BASE: u8 = 0x48;
const CONVERT_BASE: u8 = 0x63;
/// `IfCmp` occupies one contiguous band: 6 comparisons * 5 kinds * {unary, binary} = 60 bytes.
const IFCMP_BASE: u8 = 0x75;

fn arith_index(op: ArithmeticOp, kind: ArithKind) -> u8 {
    arith_op_index(op) * 2 + kind.index()
}

fn arith_from_index(index: u8) -> Option<(ArithmeticOp, ArithKind)> {
    if index >= 24 {
        return None;
    }
    let kind = ArithKind::from_index(index % 2)?;
    let op = arith_op_from_index(index / 2)?;
    Some((op, kind))
}

fn ifcmp_index(op: CompareOp, kind: BranchKind, binary: bool) -> u8 {
    let op_i = compare_op_index(op);
    let kind_i = kind.index();
    let binary_i = if binary { 1 } else { 0 };
    (op_i * 5 + kind_i) * 2 + binary_i
}

fn ifcmp_from_index(index: u8) -> Option<(CompareOp, BranchKind, bool)> {
    if index >= 60 {
        return None;
    }
    let binary = index % 2 == 1;
    let rest = index / 2;
    let kind_i = rest % 5;
    let op_i = rest / 5;
    Some((compare_op_from_index(op_i)?, BranchKind::from_index(kind_i)?, binary))
}

/// Assigns a stable byte value to every [`SquawkOpcode`] variant. Compact forms occupy
/// contiguous 16-entry bands; everything else gets a fixed or computed byte. This is an
/// internal encoding (not a wire contract like the channel opcodes), so stability across builds
/// is not required, but `emit.rs` and `squawk-vm`'s dispatcher must agree, so both go through
/// this one table.
pub fn opcode_byte(op: SquawkOpcode) -> u8 {
    match op {
        SquawkOpcode::Load(n) => 0x00 + n,
        SquawkOpcode::Store(n) => 0x10 + n,
        SquawkOpcode::Const(n) => 0x20 + n,
        SquawkOpcode::Object(n) => 0x30 + n,
        SquawkOpcode::WideM1 => 0x40,
        SquawkOpcode::Wide0 => 0x41,
        SquawkOpcode::Wide1 => 0x42,
        SquawkOpcode::WideShort => 0x43,
        SquawkOpcode::WideInt => 0x44,
        SquawkOpcode::Escape => 0x45,
        SquawkOpcode::EscapeWideShort => 0x46,
        SquawkOpcode::EscapeWideInt => 0x47,
        SquawkOpcode::Add(k) => ARITH_BASE + arith_index(ArithmeticOp::Add, k),
        SquawkOpcode::Sub(k) => ARITH_BASE + arith_index(ArithmeticOp::Sub, k),
        SquawkOpcode::Mul(k) => ARITH_BASE + arith_index(ArithmeticOp::Mul, k),
        SquawkOpcode::Div(k) => ARITH_BASE + arith_index(ArithmeticOp::Div, k),
        SquawkOpcode::Rem(k) => ARITH_BASE + arith_index(ArithmeticOp::Rem, k),
        SquawkOpcode::And(k) => ARITH_BASE + arith_index(ArithmeticOp::And, k),
        SquawkOpcode::Or(k) => ARITH_BASE + arith_index(ArithmeticOp::Or, k),
        SquawkOpcode::Xor(k) => ARITH_BASE + arith_index(ArithmeticOp::Xor, k),
        SquawkOpcode::Shl(k) => ARITH_BASE + arith_index(ArithmeticOp::Shl, k),
        SquawkOpcode::Shr(k) => ARITH_BASE + arith_index(ArithmeticOp::Shr, k),
        SquawkOpcode::Ushr(k) => ARITH_BASE + arith_index(ArithmeticOp::Ushr, k),
        SquawkOpcode::Neg(k) => ARITH_BASE + arith_index(ArithmeticOp::Neg, k),
        SquawkOpcode::Lcmp => 0x60,
        SquawkOpcode::Fcmpl => 0x61,
        SquawkOpcode::Fcmpg => 0x62,
        SquawkOpcode::Convert(kind) => {
            let index = CONVERT_KINDS.iter().position(|k| *k == kind).expect("exhaustive");
            CONVERT_BASE + index as u8
        }
        SquawkOpcode::Dcmpl => CONVERT_BASE + 15,
        SquawkOpcode::Dcmpg => CONVERT_BASE + 16,
        SquawkOpcode::Goto => 0x74,
        SquawkOpcode::IfCmp { op, kind, binary } => IFCMP_BASE + ifcmp_index(op, kind, binary),
        SquawkOpcode::GetField => 0xB1,
        SquawkOpcode::PutField => 0xB2,
        SquawkOpcode::GetStatic => 0xB3,
        SquawkOpcode::PutStatic => 0xB4,
        SquawkOpcode::ArrayLoad => 0xB5,
        SquawkOpcode::ArrayStore => 0xB6,
        SquawkOpcode::InvokeVirtual => 0xB7,
        SquawkOpcode::InvokeStatic => 0xB8,
        SquawkOpcode::InvokeSuper => 0xB9,
        SquawkOpcode::InvokeSpecial => 0xBA,
        SquawkOpcode::InvokeInterface => 0xBB,
        SquawkOpcode::InvokeNative => 0xBC,
        SquawkOpcode::Return => 0xBD,
        SquawkOpcode::ReturnVoid => 0xBE,
        SquawkOpcode::Throw => 0xBF,
        SquawkOpcode::MonitorEnter => 0xC0,
        SquawkOpcode::MonitorExit => 0xC1,
        SquawkOpcode::New => 0xC2,
        SquawkOpcode::NewObject => 0xC3,
        SquawkOpcode::NewArray => 0xC4,
        SquawkOpcode::NewDimension => 0xC5,
        SquawkOpcode::InstanceOf => 0xC6,
        SquawkOpcode::CheckCast => 0xC7,
        SquawkOpcode::TableSwitch => 0xC8,
        SquawkOpcode::LookupSwitch => 0xC9,
        SquawkOpcode::ThisGetField => 0xCA,
        SquawkOpcode::ClassGetStatic => 0xCB,
        SquawkOpcode::ArrayLength => 0xCC,
        SquawkOpcode::Pop => 0xCD,
        SquawkOpcode::Dup => 0xCE,
        SquawkOpcode::Swap => 0xCF,
    }
}

/// Inverse of [`opcode_byte`]. Compact-form bands decode back to their `n` operand; `None` for
/// a byte that names no opcode.
pub fn decode_opcode(byte: u8) -> Option<SquawkOpcode> {
    Some(match byte {
        0x00..=0x0F => SquawkOpcode::Load(byte - 0x00),
        0x10..=0x1F => SquawkOpcode::Store(byte - 0x10),
        0x20..=0x2F => SquawkOpcode::Const(byte - 0x20),
        0x30..=0x3F => SquawkOpcode::Object(byte - 0x30),
        0x40 => SquawkOpcode::WideM1,
        0x41 => SquawkOpcode::Wide0,
        0x42 => SquawkOpcode::Wide1,
        0x43 => SquawkOpcode::WideShort,
        0x44 => SquawkOpcode::WideInt,
        0x45 => SquawkOpcode::Escape,
        0x46 => SquawkOpcode::EscapeWideShort,
        0x47 => SquawkOpcode::EscapeWideInt,
        b @ ARITH_BASE..=0x5F => {
            let (op, kind) = arith_from_index(b - ARITH_BASE)?;
            match op {
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
            }
        }
        0x60 => SquawkOpcode::Lcmp,
        0x61 => SquawkOpcode::Fcmpl,
        0x62 => SquawkOpcode::Fcmpg,
        b @ CONVERT_BASE..=0x71 => SquawkOpcode::Convert(CONVERT_KINDS[(b - CONVERT_BASE) as usize]),
        b if b == CONVERT_BASE + 15 => SquawkOpcode::Dcmpl,
        b if b == CONVERT_BASE + 16 => SquawkOpcode::Dcmpg,
        0x74 => SquawkOpcode::Goto,
        b @ IFCMP_BASE..=0xB0 => {
            let (op, kind, binary) = ifcmp_from_index(b - IFCMP_BASE)?;
            SquawkOpcode::IfCmp { op, kind, binary }
        }
        0xB1 => SquawkOpcode::GetField,
        0xB2 => SquawkOpcode::PutField,
        0xB3 => SquawkOpcode::GetStatic,
        0xB4 => SquawkOpcode::PutStatic,
        0xB5 => SquawkOpcode::ArrayLoad,
        0xB6 => SquawkOpcode::ArrayStore,
        0xB7 => SquawkOpcode::InvokeVirtual,
        0xB8 => SquawkOpcode::InvokeStatic,
        0xB9 => SquawkOpcode::InvokeSuper,
        0xBA => SquawkOpcode::InvokeSpecial,
        0xBB => SquawkOpcode::InvokeInterface,
        0xBC => SquawkOpcode::InvokeNative,
        0xBD => SquawkOpcode::Return,
        0xBE => SquawkOpcode::ReturnVoid,
        0xBF => SquawkOpcode::Throw,
        0xC0 => SquawkOpcode::MonitorEnter,
        0xC1 => SquawkOpcode::MonitorExit,
        0xC2 => SquawkOpcode::New,
        0xC3 => SquawkOpcode::NewObject,
        0xC4 => SquawkOpcode::NewArray,
        0xC5 => SquawkOpcode::NewDimension,
        0xC6 => SquawkOpcode::InstanceOf,
        0xC7 => SquawkOpcode::CheckCast,
        0xC8 => SquawkOpcode::TableSwitch,
        0xC9 => SquawkOpcode::LookupSwitch,
        0xCA => SquawkOpcode::ThisGetField,
        0xCB => SquawkOpcode::ClassGetStatic,
        0xCC => SquawkOpcode::ArrayLength,
        0xCD => SquawkOpcode::Pop,
        0xCE => SquawkOpcode::Dup,
        0xCF => SquawkOpcode::Swap,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_form_selected_within_range() {
        assert_eq!(
            SquawkOpcode::compact_for(CompactKind::Load, 3),
            Some(SquawkOpcode::Load(3))
        );
        assert_eq!(SquawkOpcode::compact_for(CompactKind::Load, 16), None);
    }

    #[test]
    fn wide_prefix_picks_narrowest_bucket() {
        assert_eq!(SquawkOpcode::wide_prefix_for(-1), SquawkOpcode::WideM1);
        assert_eq!(SquawkOpcode::wide_prefix_for(0), SquawkOpcode::Wide0);
        assert_eq!(SquawkOpcode::wide_prefix_for(1), SquawkOpcode::Wide1);
        assert_eq!(SquawkOpcode::wide_prefix_for(100), SquawkOpcode::WideShort);
        assert_eq!(SquawkOpcode::wide_prefix_for(100_000), SquawkOpcode::WideInt);
    }

    #[test]
    fn every_opcode_byte_round_trips_through_decode() {
        let opcodes = [
            SquawkOpcode::Load(5),
            SquawkOpcode::Store(15),
            SquawkOpcode::Const(0),
            SquawkOpcode::Object(9),
            SquawkOpcode::WideInt,
            SquawkOpcode::Add(ArithKind::Int),
            SquawkOpcode::Add(ArithKind::Long),
            SquawkOpcode::Neg(ArithKind::Long),
            SquawkOpcode::Lcmp,
            SquawkOpcode::Dcmpg,
            SquawkOpcode::Convert(ConvertKind::I2l),
            SquawkOpcode::Convert(ConvertKind::I2s),
            SquawkOpcode::IfCmp { op: CompareOp::Lt, kind: BranchKind::Long, binary: true },
            SquawkOpcode::IfCmp { op: CompareOp::Eq, kind: BranchKind::Reference, binary: false },
            SquawkOpcode::InvokeVirtual,
            SquawkOpcode::Return,
            SquawkOpcode::MonitorExit,
            SquawkOpcode::LookupSwitch,
            SquawkOpcode::ThisGetField,
            SquawkOpcode::ClassGetStatic,
            SquawkOpcode::ArrayLength,
            SquawkOpcode::Pop,
            SquawkOpcode::Dup,
            SquawkOpcode::Swap,
            SquawkOpcode::Goto,
        ];
        for op in opcodes {
            assert_eq!(decode_opcode(opcode_byte(op)), Some(op));
        }
    }

    #[test]
    fn goto_and_dcmpl_occupy_distinct_bytes() {
        assert_ne!(opcode_byte(SquawkOpcode::Goto), opcode_byte(SquawkOpcode::Dcmpl));
    }

    #[test]
    fn every_ifcmp_combination_round_trips() {
        for op in [CompareOp::Eq, CompareOp::Ne, CompareOp::Lt, CompareOp::Ge, CompareOp::Gt, CompareOp::Le] {
            for kind in [
                BranchKind::Int,
                BranchKind::Long,
                BranchKind::Float,
                BranchKind::Double,
                BranchKind::Reference,
            ] {
                for binary in [true, false] {
                    let opcode = SquawkOpcode::IfCmp { op, kind, binary };
                    assert_eq!(decode_opcode(opcode_byte(opcode)), Some(opcode));
                }
            }
        }
    }

    #[test]
    fn every_arith_combination_round_trips() {
        for op in [
            ArithmeticOp::Add,
            ArithmeticOp::Sub,
            ArithmeticOp::Mul,
            ArithmeticOp::Div,
            ArithmeticOp::Rem,
            ArithmeticOp::And,
            ArithmeticOp::Or,
            ArithmeticOp::Xor,
            ArithmeticOp::Shl,
            ArithmeticOp::Shr,
            ArithmeticOp::Ushr,
            ArithmeticOp::Neg,
        ] {
            for kind in [ArithKind::Int, ArithKind::Long] {
                let index = arith_index(op, kind);
                assert_eq!(arith_from_index(index), Some((op, kind)));
            }
        }
    }

    #[test]
    fn unassigned_byte_decodes_to_none() {
        assert_eq!(decode_opcode(0xFF), None);
    }
}
