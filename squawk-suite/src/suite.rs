//! Suite: an ordered, relocatable collection of classes bound to an optional parent suite.

use crate::error::{SuiteError, SuiteResult};
use crate::klass::Klass;
use crate::symbols::{FixedEntryPoints, PrimitiveKlass};
use serde::{Deserialize, Serialize};
use squawk_core::ClassId;
use std::collections::HashMap;

/// On-disk suite header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteHeader {
    pub magic: u32,
    pub version: u16,
    pub is_64_bit: bool,
    pub parent_suite_url: Option<String>,
    pub class_count: u32,
    pub method_count: u32,
}

pub const SUITE_MAGIC: u32 = 0x5351_5741; // "SQWA"
pub const SUITE_VERSION: u16 = 1;

/// Suite-file strip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StripLevel {
    None,
    /// `-prune:l`: drop `KlassMetadata` line-number/local-variable info.
    Lines,
}

/// The special one-line rename applied at class lookup: `java.lang.Klass` (and its array forms)
/// resolve to `java.lang.Class`. This is the *only* such rewrite the suite performs.
fn apply_klass_rename(name: &str) -> String {
    if let Some(rest) = name.strip_prefix("java.lang.Klass") {
        format!("java.lang.Class{rest}")
    } else {
        name.to_string()
    }
}

/// An ordered collection of classes, optionally bound to a parent suite by URL, with suite-
/// scoped class-id allocation and name interning.
pub struct Suite {
    pub suite_no: u16,
    pub parent_url: Option<String>,
    pub strip_level: StripLevel,
    klasses: Vec<Klass>,
    by_name: HashMap<String, ClassId>,
    pub fixed_entry_points: FixedEntryPoints,
}

impl Suite {
    pub fn new(suite_no: u16, parent_url: Option<String>) -> Self {
        Suite {
            suite_no,
            parent_url,
            strip_level: StripLevel::None,
            klasses: Vec::new(),
            by_name: HashMap::new(),
            fixed_entry_points: FixedEntryPoints::new(),
        }
    }

    pub fn klass(&self, id: ClassId) -> SuiteResult<&Klass> {
        self.klasses
            .iter()
            .find(|k| k.self_id == id)
            .ok_or(SuiteError::UnknownClassId(id))
    }

    pub fn klass_mut(&mut self, id: ClassId) -> SuiteResult<&mut Klass> {
        self.klasses
            .iter_mut()
            .find(|k| k.self_id == id)
            .ok_or(SuiteError::UnknownClassId(id))
    }

    pub fn klasses(&self) -> &[Klass] {
        &self.klasses
    }

    /// Looks up a class by name in this suite only (no parent walk).
    fn lookup_local(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a class by name, walking parent suites when it is not found locally. Ancestor
    /// suites are supplied by the caller since this crate does not itself own suite loading/URL
    /// resolution.
    pub fn lookup(&self, name: &str, ancestors: &[&Suite]) -> Option<ClassId> {
        let renamed = apply_klass_rename(name);
        if let Some(id) = self.lookup_local(&renamed) {
            return Some(id);
        }
        ancestors.iter().find_map(|s| s.lookup_local(&renamed))
    }

    /// Interns a class name: if a class with this name already exists in this suite or an
    /// ancestor, returns it; otherwise allocates a fresh class-id and installs a `Loading`
    /// klass.
    pub fn intern(&mut self, name: &str, ancestors: &[&Suite]) -> ClassId {
        let renamed = apply_klass_rename(name);
        if let Some(id) = self.lookup(&renamed, ancestors) {
            return id;
        }
        let class_no = self.klasses.len() as u16;
        let id = ClassId::new(self.suite_no, class_no);
        self.klasses.push(Klass::new(id, renamed.clone()));
        self.by_name.insert(renamed, id);
        id
    }

    /// Resolves a JVM field descriptor to an interned class-id, handling array dimensions,
    /// `L...;` reference forms, and primitive letters.
    pub fn resolve_field_descriptor(
        &mut self,
        descriptor: &str,
        ancestors: &[&Suite],
    ) -> SuiteResult<ClassId> {
        let mut chars = descriptor.chars().peekable();
        let mut dims = 0usize;
        while chars.peek() == Some(&'[') {
            dims += 1;
            chars.next();
        }
        let rest: String = chars.collect();
        let base_name = if let Some(letter) = rest.chars().next().filter(|c| *c != 'L') {
            if PrimitiveKlass::from_descriptor_letter(letter).is_none() {
                return Err(SuiteError::BadFieldDescriptor(descriptor.to_string()));
            }
            letter.to_string()
        } else if let Some(stripped) = rest.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
            stripped.replace('/', ".")
        } else {
            return Err(SuiteError::BadFieldDescriptor(descriptor.to_string()));
        };

        let mut current = self.intern(&base_name, ancestors);
        for _ in 0..dims {
            let array_name = format!("[{}", self.klass(current)?.name);
            let array_id = self.intern(&array_name, ancestors);
            self.klass_mut(array_id)?.component_type = Some(current);
            current = array_id;
        }
        Ok(current)
    }

    pub fn header(&self) -> SuiteHeader {
        SuiteHeader {
            magic: SUITE_MAGIC,
            version: SUITE_VERSION,
            is_64_bit: cfg!(target_pointer_width = "64"),
            parent_suite_url: self.parent_url.clone(),
            class_count: self.klasses.len() as u32,
            method_count: self
                .klasses
                .iter()
                .map(|k| (k.virtual_methods.len() + k.static_methods.len()) as u32)
                .sum(),
        }
    }

    /// Serializes the suite header for the on-disk suite-file format. The class/method-body
    /// area is written by `squawk-translator`, which owns the packed bytecode encoding.
    pub fn write_header(&self) -> SuiteResult<Vec<u8>> {
        bincode::serialize(&self.header())
            .map_err(|e| SuiteError::MalformedSuiteFile(e.to_string()))
    }

    pub fn read_header(bytes: &[u8]) -> SuiteResult<SuiteHeader> {
        let header: SuiteHeader =
            bincode::deserialize(bytes).map_err(|e| SuiteError::MalformedSuiteFile(e.to_string()))?;
        if header.magic != SUITE_MAGIC {
            return Err(SuiteError::BadMagic);
        }
        if header.version != SUITE_VERSION {
            return Err(SuiteError::UnsupportedVersion {
                found: header.version,
                expected: SUITE_VERSION,
            });
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klass_rename_is_applied_once() {
        assert_eq!(apply_klass_rename("java.lang.Klass"), "java.lang.Class");
        assert_eq!(apply_klass_rename("java.lang.Klass[]"), "java.lang.Class[]");
        assert_eq!(apply_klass_rename("java.lang.String"), "java.lang.String");
    }

    #[test]
    fn interning_returns_existing_class() {
        let mut suite = Suite::new(0, None);
        let a = suite.intern("java.lang.Object", &[]);
        let b = suite.intern("java.lang.Object", &[]);
        assert_eq!(a, b);
        let c = suite.intern("java.lang.String", &[]);
        assert_ne!(a, c);
    }

    #[test]
    fn interning_walks_parent_suites() {
        let mut parent = Suite::new(0, None);
        let parent_class = parent.intern("java.lang.Object", &[]);
        let mut child = Suite::new(1, Some("parent.suite".to_string()));
        let found = child.intern("java.lang.Object", &[&parent]);
        assert_eq!(found, parent_class);
        assert_eq!(child.klasses().len(), 0, "should not duplicate into child");
    }

    #[test]
    fn field_descriptor_arrays_intern_each_dimension() {
        let mut suite = Suite::new(0, None);
        let id = suite.resolve_field_descriptor("[[I", &[]).unwrap();
        let klass = suite.klass(id).unwrap();
        assert_eq!(klass.name, "[[I");
        assert!(klass.is_array());
        let inner = suite.klass(klass.component_type.unwrap()).unwrap();
        assert_eq!(inner.name, "[I");
    }

    #[test]
    fn field_descriptor_reference_form_is_dotted() {
        let mut suite = Suite::new(0, None);
        let id = suite
            .resolve_field_descriptor("Ljava/lang/String;", &[])
            .unwrap();
        assert_eq!(suite.klass(id).unwrap().name, "java.lang.String");
    }

    #[test]
    fn suite_header_round_trips_through_bincode() {
        let suite = Suite::new(0, Some("boot.suite".to_string()));
        let bytes = suite.write_header().unwrap();
        let header = Suite::read_header(&bytes).unwrap();
        assert_eq!(header.parent_suite_url.as_deref(), Some("boot.suite"));
        assert_eq!(header.class_count, 0);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = vec![0u8; 4];
        assert!(matches!(Suite::read_header(&bytes), Err(_)));
    }
}
