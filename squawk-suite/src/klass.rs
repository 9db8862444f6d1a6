//! Klass: the loaded-class descriptor ( "Class (Klass)").

use bitflags::bitflags;
use squawk_core::ClassId;

bitflags! {
    /// Class/field/method modifier bits (subset of the JVM access-flag space that the
    /// translator and interpreter actually consult).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u16 {
        const PUBLIC    = 0x0001;
        const PRIVATE   = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC    = 0x0008;
        const FINAL     = 0x0010;
        const SUPER     = 0x0020;
        const NATIVE    = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT  = 0x0400;
    }
}

/// Lifecycle state of a Klass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KlassState {
    /// Allocated but not yet populated by the translator.
    Loading,
    /// Fully translated; immutable within the suite from this point on.
    Converted,
    /// Translation failed; the klass is unresolved thereafter.
    Error,
}

/// Per-class metadata: names/signatures of fields and methods, the line-number table, and
/// local-variable type info. Kept separate from `Klass` because it is optional and strippable
/// (`-prune:l`, ).
#[derive(Debug, Clone, Default)]
pub struct KlassMetadata {
    pub field_names: Vec<String>,
    pub method_signatures: Vec<String>,
    pub line_number_table: Vec<(u16, u16)>,
    pub local_variable_types: Vec<String>,
}

/// A constant object referenced from a method body, interned per-class and indexed by the
/// frequency-sorted object table.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantObject {
    Utf8(String),
    Class(ClassId),
    StringLiteral(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// A loaded class descriptor. Identified by a 32-bit class-id `(suite_no, class_no)`.
///
/// Invariant: `self_id` and `virtual_methods` occupy the same conceptual offsets in `Klass` and
/// its `ObjectAssociation` companion so the interpreter can fetch a method table from either a
/// class or an association via one offset; see [`ObjectAssociation`].
#[derive(Debug, Clone)]
pub struct Klass {
    pub self_id: ClassId,
    pub name: String,
    /// Component type of array classes; `None` for non-array classes.
    pub component_type: Option<ClassId>,
    pub super_type: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    pub modifiers: Modifiers,
    pub instance_size_words: u32,
    pub constant_objects: Vec<ConstantObject>,
    /// Packed Squawk bytecode bodies, one per declared virtual method.
    pub virtual_methods: Vec<Vec<u8>>,
    /// Packed Squawk bytecode bodies, one per declared static method.
    pub static_methods: Vec<Vec<u8>>,
    pub metadata: KlassMetadata,
    pub state: KlassState,
}

impl Klass {
    pub fn new(self_id: ClassId, name: impl Into<String>) -> Self {
        Klass {
            self_id,
            name: name.into(),
            component_type: None,
            super_type: None,
            interfaces: Vec::new(),
            modifiers: Modifiers::empty(),
            instance_size_words: 0,
            constant_objects: Vec::new(),
            virtual_methods: Vec::new(),
            static_methods: Vec::new(),
            metadata: KlassMetadata::default(),
            state: KlassState::Loading,
        }
    }

    pub fn is_array(&self) -> bool {
        self.component_type.is_some()
    }

    pub fn mark_converted(&mut self) {
        self.state = KlassState::Converted;
    }

    pub fn mark_error(&mut self) {
        self.state = KlassState::Error;
    }
}

/// A per-isolate companion to a bootstrap-suite `Klass`, holding the isolate's view of that
/// class's virtual method table override slot when the isolate has not (yet) needed its own
/// static storage. Shares the prefix layout described in 's Klass invariant: `self_id` and
/// `virtual_methods` sit at the same logical offsets as on `Klass`, so interpreter code that
/// fetches "the method table of this thing" does not need to branch on whether "this thing" is
/// a `Klass` or an `ObjectAssociation`.
#[derive(Debug, Clone)]
pub struct ObjectAssociation {
    pub self_id: ClassId,
    pub virtual_methods: Vec<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klass_starts_loading_and_transitions() {
        let mut k = Klass::new(ClassId::new(0, 1), "java.lang.Object");
        assert_eq!(k.state, KlassState::Loading);
        k.mark_converted();
        assert_eq!(k.state, KlassState::Converted);
    }

    #[test]
    fn error_klass_is_unresolved_but_distinct_state() {
        let mut k = Klass::new(ClassId::new(0, 2), "Bad");
        k.mark_error();
        assert_eq!(k.state, KlassState::Error);
    }

    #[test]
    fn modifiers_are_bit_composable() {
        let m = Modifiers::PUBLIC | Modifiers::FINAL;
        assert!(m.contains(Modifiers::PUBLIC));
        assert!(m.contains(Modifiers::FINAL));
        assert!(!m.contains(Modifiers::ABSTRACT));
    }
}
