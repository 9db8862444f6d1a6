//! Fixed entry-point symbols shared between the translator and the interpreter.

use squawk_core::ClassId;
use std::collections::HashMap;

/// A fixed VM entry point: bootstrap hooks and the implicit-check helpers the translator emits
/// calls to instead of inlining the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedEntryPoint {
    DoStartup,
    DoYield,
    DoNullCheck,
    DoDivideByZeroCheck,
    DoCheckcast,
    DoArrayBoundsCheck,
    DoArrayStoreCheck,
    DoClassCastCheck,
}

impl FixedEntryPoint {
    pub fn symbol(self) -> &'static str {
        match self {
            FixedEntryPoint::DoStartup => "java.lang.VM.do_startup",
            FixedEntryPoint::DoYield => "java.lang.VM.do_yield",
            FixedEntryPoint::DoNullCheck => "java.lang.VM.do_nullPointerException",
            FixedEntryPoint::DoDivideByZeroCheck => "java.lang.VM.do_arithmeticException",
            FixedEntryPoint::DoCheckcast => "java.lang.VM.do_checkcast",
            FixedEntryPoint::DoArrayBoundsCheck => "java.lang.VM.do_arrayIndexOutOfBoundsException",
            FixedEntryPoint::DoArrayStoreCheck => "java.lang.VM.do_arrayStoreException",
            FixedEntryPoint::DoClassCastCheck => "java.lang.VM.do_classCastException",
        }
    }
}

/// Resolves fixed entry points to `(class, method index)` pairs baked at romize time, and the
/// table of primitive klass ids used when lowering field descriptors. Shared by `squawk-
/// translator` (to emit calls) and `squawk-vm` (to recognize them during dispatch).
#[derive(Debug, Clone, Default)]
pub struct FixedEntryPoints {
    table: HashMap<FixedEntryPoint, (ClassId, u16)>,
}

impl FixedEntryPoints {
    pub fn new() -> Self {
        FixedEntryPoints::default()
    }

    pub fn bind(&mut self, entry: FixedEntryPoint, class: ClassId, method_index: u16) {
        self.table.insert(entry, (class, method_index));
    }

    pub fn resolve(&self, entry: FixedEntryPoint) -> Option<(ClassId, u16)> {
        self.table.get(&entry).copied()
    }
}

/// The fixed primitive klasses field descriptors resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKlass {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    Short,
    Byte,
    Void,
}

impl PrimitiveKlass {
    pub fn from_descriptor_letter(letter: char) -> Option<Self> {
        match letter {
            'I' => Some(PrimitiveKlass::Int),
            'J' => Some(PrimitiveKlass::Long),
            'F' => Some(PrimitiveKlass::Float),
            'D' => Some(PrimitiveKlass::Double),
            'Z' => Some(PrimitiveKlass::Boolean),
            'C' => Some(PrimitiveKlass::Char),
            'S' => Some(PrimitiveKlass::Short),
            'B' => Some(PrimitiveKlass::Byte),
            'V' => Some(PrimitiveKlass::Void),
            _ => None,
        }
    }
}
