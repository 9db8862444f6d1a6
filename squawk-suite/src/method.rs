//! Method body layout: Minfo, oop-map, exception table, relocation table.

use squawk_core::{ClassId, OopMap};

/// Per-method metadata header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minfo {
    pub max_stack: u16,
    pub local_count: u16,
    pub parameter_count: u16,
    /// How many locals must be zeroed on frame entry to satisfy the oop-map.
    pub cleared_slot_count: u16,
}

/// One entry of a method's exception table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_ip: u16,
    pub end_ip: u16,
    pub handler_ip: u16,
    pub catch_type: Option<ClassId>,
}

impl ExceptionTableEntry {
    pub fn covers(&self, ip: u16) -> bool {
        ip >= self.start_ip && ip < self.end_ip
    }
}

/// The kind of an address constant embedded in the bytecode, and therefore how the relocation
/// table entry for it must be reapplied after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationKind {
    AbsoluteInt,
    RelativeInt,
}

/// One relocation-table entry: `(byte_offset_in_code, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationEntry {
    pub byte_offset: u32,
    pub kind: RelocationKind,
}

impl RelocationEntry {
    /// Rewrites the 4-byte little-endian value embedded in `code` at this entry's offset after
    /// the suite image moved by `delta`. Relative addresses are left unchanged; only absolute
    /// ones are shifted.
    pub fn apply(&self, code: &mut [u8], delta: i64) {
        if self.kind == RelocationKind::RelativeInt {
            return;
        }
        let offset = self.byte_offset as usize;
        let bytes: [u8; 4] = code[offset..offset + 4].try_into().expect("4-byte slice");
        let value = i32::from_le_bytes(bytes) as i64;
        let relocated = (value + delta) as i32;
        code[offset..offset + 4].copy_from_slice(&relocated.to_le_bytes());
    }
}

/// A translated method body: the output of the translator.
///
/// Real Squawk packs this as bytecode followed (growing toward lower addresses) by owning-class
/// pointer, Minfo, oop-map, exception table, and relocation table, terminated by a length word
/// tagged `11`. This struct keeps the same logical fields without requiring the caller to parse
/// a packed byte layout; `squawk-translator` is responsible for producing one, and the suite
/// file reader/writer in `suite.rs` is responsible for the on-disk packed form.
#[derive(Debug, Clone)]
pub struct MethodBody {
    pub owning_class: ClassId,
    pub minfo: Minfo,
    pub code: Vec<u8>,
    pub locals_oop_map: OopMap,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub relocation_table: Vec<RelocationEntry>,
}

impl MethodBody {
    /// Finds the first exception-table entry that covers `ip` and whose catch type
    /// `is_assignable` accepts the thrown exception's class.
    pub fn find_handler(
        &self,
        ip: u16,
        thrown_class: ClassId,
        is_assignable: impl Fn(ClassId, ClassId) -> bool,
    ) -> Option<u16> {
        self.exception_table.iter().find_map(|entry| {
            if !entry.covers(ip) {
                return None;
            }
            match entry.catch_type {
                None => Some(entry.handler_ip),
                Some(catch_type) if is_assignable(thrown_class, catch_type) => {
                    Some(entry.handler_ip)
                }
                Some(_) => None,
            }
        })
    }

    /// Applies every relocation entry after the suite moved by `delta`.
    pub fn relocate(&mut self, delta: i64) {
        for entry in &self.relocation_table.clone() {
            entry.apply(&mut self.code, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_method() -> MethodBody {
        MethodBody {
            owning_class: ClassId::new(0, 5),
            minfo: Minfo {
                max_stack: 4,
                local_count: 2,
                parameter_count: 1,
                cleared_slot_count: 1,
            },
            code: vec![0, 0, 0, 0],
            locals_oop_map: OopMap::from_slot_count(2),
            exception_table: vec![ExceptionTableEntry {
                start_ip: 0,
                end_ip: 4,
                handler_ip: 2,
                catch_type: Some(ClassId::new(0, 9)),
            }],
            relocation_table: vec![RelocationEntry {
                byte_offset: 0,
                kind: RelocationKind::AbsoluteInt,
            }],
        }
    }

    #[test]
    fn exception_table_matches_assignable_catch_type() {
        let method = sample_method();
        let handler = method.find_handler(1, ClassId::new(0, 9), |a, b| a == b);
        assert_eq!(handler, Some(2));
        let no_match = method.find_handler(1, ClassId::new(0, 1), |a, b| a == b);
        assert_eq!(no_match, None);
    }

    #[test]
    fn relocation_shifts_absolute_addresses_only() {
        let mut method = sample_method();
        method.code = 100i32.to_le_bytes().to_vec();
        method.relocate(50);
        assert_eq!(i32::from_le_bytes(method.code[0..4].try_into().unwrap()), 150);

        let mut relative = sample_method();
        relative.relocation_table[0].kind = RelocationKind::RelativeInt;
        relative.code = 100i32.to_le_bytes().to_vec();
        relative.relocate(50);
        assert_eq!(i32::from_le_bytes(relative.code[0..4].try_into().unwrap()), 100);
    }
}
