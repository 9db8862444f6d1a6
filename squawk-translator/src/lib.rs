//! # Squawk Translator
//!
//! Class-file loading, IR construction and lowering, slot allocation, and Squawk bytecode
//! emission. Runs either ahead of time in a host tool or inside the VM itself; this crate
//! implements the transformation either caller uses.

pub mod classfile;
pub mod emit;
pub mod error;
pub mod ir;
pub mod opcode;
pub mod slots;
pub mod transform;

pub use classfile::{decode_modified_utf8, load_class_file, ParsedClass};
pub use emit::{emit_method, pack_method_header, REVERSE_PARAMETERS};
pub use error::{TranslatorError, TranslatorResult};
pub use ir::{
    ArithmeticOp, CompareOp, ComparisonOp, ConstantValue, IfCondition, InvokeKind, IrList, IrOp,
    MethodRef, Primitive,
};
pub use opcode::{ArithKind, BranchKind, CompactKind, ConvertKind, SquawkOpcode, COMPACT_SLOTS};
pub use slots::{allocate_slots, build_minfo, measure_stack_depth, SlotAssignment, SlotBucket};
pub use transform::{phase1_build_ir, phase2_lower, synthesize_default_constructor, ClassConstantTable};
