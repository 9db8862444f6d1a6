//! Translation-time constant pool and the per-class frequency-sorted object table.

use squawk_core::ClassId;
use std::collections::HashMap;

/// A raw class-file constant-pool entry, as read by the loader, before the translator resolves
/// it to a direct reference.
#[derive(Debug, Clone, PartialEq)]
pub enum RawConstant {
    Utf8(String),
    NameAndType { name_idx: u16, descriptor_idx: u16 },
    Class { name_idx: u16 },
    Methodref { class_idx: u16, name_and_type_idx: u16 },
    Fieldref { class_idx: u16, name_and_type_idx: u16 },
    InterfaceMethodref { class_idx: u16, name_and_type_idx: u16 },
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    StringRef { utf8_idx: u16 },
}

/// A constant-pool entry after the translator has resolved it to a direct reference, replacing
/// the indirection through `RawConstant` indices.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedConstant {
    Klass(ClassId),
    Method { class: ClassId, method_id: u16 },
    Field { class: ClassId, field_id: u16 },
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Split out into the per-class object table; the operand becomes a small integer index.
    ObjectTableIndex(u16),
}

/// Tracks how many times each constant object has been referenced during phase 1 of
/// translation, so phase 1's end can emit a frequency-sorted object table: "the most-referenced
/// constant gets index 0, so the encoded bytecode can use compact `object_0…object_15` forms."
#[derive(Debug, Clone, Default)]
pub struct ObjectTableBuilder<T: Eq + std::hash::Hash + Clone> {
    counts: HashMap<T, u32>,
    order: Vec<T>,
}

impl<T: Eq + std::hash::Hash + Clone> ObjectTableBuilder<T> {
    pub fn new() -> Self {
        ObjectTableBuilder {
            counts: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Records a reference to `object`, interning it on first sight.
    pub fn add_constant_object(&mut self, object: T) -> usize {
        if !self.counts.contains_key(&object) {
            self.order.push(object.clone());
        }
        let count = self.counts.entry(object).or_insert(0);
        *count += 1;
        self.order.len() - 1
    }

    /// Produces the final table, sorted by descending reference count, ties broken by first-
    /// seen order for determinism. Satisfies "Frequency-sorted object indices": index `i` is
    /// referenced no fewer times than index `i+1`.
    pub fn build_sorted(self) -> Vec<T> {
        let counts = self.counts;
        let mut entries: Vec<(usize, T)> = self.order.into_iter().enumerate().collect();
        entries.sort_by(|(ai, a), (bi, b)| {
            let ca = counts[a];
            let cb = counts[b];
            cb.cmp(&ca).then(ai.cmp(bi))
        });
        entries.into_iter().map(|(_, obj)| obj).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_sorted_object_indices_are_non_increasing() {
        let mut builder: ObjectTableBuilder<String> = ObjectTableBuilder::new();
        for _ in 0..5 {
            builder.add_constant_object("hot".to_string());
        }
        builder.add_constant_object("cold".to_string());
        for _ in 0..2 {
            builder.add_constant_object("warm".to_string());
        }
        let sorted = builder.build_sorted();
        assert_eq!(sorted, vec!["hot", "warm", "cold"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut builder: ObjectTableBuilder<&str> = ObjectTableBuilder::new();
        builder.add_constant_object("a");
        builder.add_constant_object("b");
        let sorted = builder.build_sorted();
        assert_eq!(sorted, vec!["a", "b"]);
    }
}
