//! Object header encoding and heap accessors.
//!
//! Squawk packs an object header into one word (small form) or two words (large form); the low
//! two tag bits of the first header word distinguish the three shapes the interpreter and GC
//! must agree on. This module implements that encoding as pure functions over `u32`, plus a
//! small safe arena (`Heap`) that stores objects by handle rather than raw pointer so the rest
//! of the crate never needs `unsafe`.

use crate::error::{CoreError, CoreResult};
use crate::global::ClassId;

/// Number of header-tag bits.
const TAG_BITS: u32 = 2;
const TAG_MASK: u32 = 0b11;

/// The value a small-form length field takes when the object must instead use the large form.
fn small_length_overflow(length_bits: u32) -> u32 {
    (1u32 << length_bits) - 1
}

/// Classifies the low two bits of a header word.
///
/// Per "Header tag uniqueness": every object's header low bits classify it as exactly one of
/// these three shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTag {
    /// `00`: small-instance or small-array header.
    SmallInstance,
    /// `01`: large-array length word.
    LargeArrayLength,
    /// `11`: method-body or Klass header length word.
    MethodOrKlassLength,
}

impl HeaderTag {
    /// Classifies a header word by its low two bits.
    pub fn decode(word: u32) -> Self {
        match word & TAG_MASK {
            0b00 => HeaderTag::SmallInstance,
            0b01 => HeaderTag::LargeArrayLength,
            0b11 => HeaderTag::MethodOrKlassLength,
            other => unreachable!("low two bits can only be 00/01/11, got {other:#b}"),
        }
    }
}

/// A decoded small-form header: either a plain object (`length == None`) or a small array, plus
/// the class pointer/offset packed into the high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmallHeader {
    pub class_ref: u32,
    pub length: Option<u32>,
}

/// Width, in bits, of the length field packed into a small header word on a `word_bits`-wide
/// machine (the remaining `word_bits - length_bits` hold the class reference, minus the two tag
/// bits).
fn length_field_bits(word_bits: u32) -> u32 {
    // A conservative split: half the non-tag bits go to length, without
    // pinning down a specific n for a specific word width.
    (word_bits - TAG_BITS) / 2
}

/// Packs a small-form header word. Returns `None` (forcing the large form) when `length` does
/// not fit, matching the "reserved length value" overflow rule.
pub fn encode_small_header(class_ref: u32, length: Option<u32>, word_bits: u32) -> Option<u32> {
    let length_bits = length_field_bits(word_bits);
    let overflow = small_length_overflow(length_bits);
    let len = length.unwrap_or(0);
    if len >= overflow {
        return None;
    }
    let class_bits = word_bits - TAG_BITS - length_bits;
    if class_ref >= (1u32 << class_bits) {
        return None;
    }
    Some((len << (TAG_BITS + class_bits)) | (class_ref << TAG_BITS))
}

/// Unpacks a small-form header word produced by [`encode_small_header`].
pub fn decode_small_header(word: u32, word_bits: u32) -> SmallHeader {
    let length_bits = length_field_bits(word_bits);
    let class_bits = word_bits - TAG_BITS - length_bits;
    let class_ref = (word >> TAG_BITS) & ((1u32 << class_bits) - 1);
    let len = word >> (TAG_BITS + class_bits);
    SmallHeader {
        class_ref,
        length: if len == 0 { None } else { Some(len) },
    }
}

/// A handle to a heap object. Opaque outside this crate; stable across GC moves because the
/// `Heap` arena relocates objects in place and keeps handles as indices, not addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oop(pub(crate) u32);

impl Oop {
    /// The handle's raw arena index, stable across this process's GC moves. Exposed so `squawk-
    /// executive` can record a relocatable reference when serializing a hibernating isolate; it
    /// is not reconstructible into a valid `Oop` outside this crate, only comparable/storable.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One object slot: either a raw word (non-pointer) or an optional reference. The oop-map (see
/// `squawk-suite::method`) tells the GC which slots in a given object are of which kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Int(i32),
    Oop(Option<Oop>),
}

impl Slot {
    pub fn as_int(&self) -> CoreResult<i32> {
        match self {
            Slot::Int(v) => Ok(*v),
            Slot::Oop(_) => Err(CoreError::SlotOutOfBounds {
                index: 0,
                length: 0,
            }),
        }
    }
}

/// Component type of an array, used for array-store checks (4.A).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentType {
    Primitive,
    Reference(ClassId),
}

/// A single heap object: a fixed-layout instance or an array.
#[derive(Debug, Clone)]
pub struct HeapObject {
    pub class_id: ClassId,
    pub component_type: Option<ComponentType>,
    pub slots: Vec<Slot>,
}

/// Callback invoked on every reference store into the heap. Concrete GC plug-ins implement
/// this: a Cheney two-space collector's barrier is a no-op, a Lisp2 mark-compact collector's
/// barrier marks a card or bit.
pub trait WriteBarrier: Send + Sync {
    fn on_store(&self, container: Oop, slot_index: usize, new_value: Option<Oop>);
}

/// The trivial barrier used by a copying (Cheney) collector, where no remembered set is needed
/// because the whole heap is scanned every GC.
#[derive(Debug, Default)]
pub struct NullBarrier;

impl WriteBarrier for NullBarrier {
    fn on_store(&self, _container: Oop, _slot_index: usize, _new_value: Option<Oop>) {}
}

/// A safe arena standing in for the Squawk heap. Real Squawk packs objects contiguously with
/// headers growing backward from the payload; here each `HeapObject` instead owns its slots
/// directly, and [`HeaderTag`]/[`encode_small_header`]/[`decode_small_header`] expose the
/// header bit-packing rules in isolation so they remain independently testable against the wire
/// format without requiring raw memory.
pub struct Heap {
    objects: Vec<HeapObject>,
    barrier: Box<dyn WriteBarrier>,
}

impl Heap {
    pub fn new(barrier: Box<dyn WriteBarrier>) -> Self {
        Self {
            objects: Vec::new(),
            barrier,
        }
    }

    pub fn allocate(&mut self, object: HeapObject) -> Oop {
        let handle = Oop(self.objects.len() as u32);
        self.objects.push(object);
        handle
    }

    fn get(&self, oop: Oop) -> &HeapObject {
        &self.objects[oop.0 as usize]
    }

    fn get_mut(&mut self, oop: Oop) -> &mut HeapObject {
        &mut self.objects[oop.0 as usize]
    }

    pub fn klass_of(&self, oop: Oop) -> ClassId {
        self.get(oop).class_id
    }

    pub fn length_of(&self, oop: Oop) -> usize {
        self.get(oop).slots.len()
    }

    pub fn get_slot_i(&self, oop: Oop, index: usize) -> CoreResult<i32> {
        let object = self.get(oop);
        object
            .slots
            .get(index)
            .ok_or(CoreError::SlotOutOfBounds {
                index,
                length: object.slots.len(),
            })?
            .as_int()
    }

    pub fn set_slot_i(&mut self, oop: Oop, index: usize, value: i32) -> CoreResult<()> {
        let length = self.get(oop).slots.len();
        let slot = self
            .get_mut(oop)
            .slots
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfBounds { index, length })?;
        *slot = Slot::Int(value);
        Ok(())
    }

    pub fn get_slot_o(&self, oop: Oop, index: usize) -> CoreResult<Option<Oop>> {
        let object = self.get(oop);
        match object.slots.get(index) {
            Some(Slot::Oop(v)) => Ok(*v),
            Some(Slot::Int(_)) | None => Err(CoreError::SlotOutOfBounds {
                index,
                length: object.slots.len(),
            }),
        }
    }

    /// Stores a reference and runs the write barrier.
    pub fn set_slot_o(&mut self, oop: Oop, index: usize, value: Option<Oop>) -> CoreResult<()> {
        let length = self.get(oop).slots.len();
        let slot = self
            .get_mut(oop)
            .slots
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfBounds { index, length })?;
        *slot = Slot::Oop(value);
        self.barrier.on_store(oop, index, value);
        Ok(())
    }

    /// Like [`Heap::set_slot_o`] but additionally enforces the array's component-type check,
    /// returning `ArrayStoreCheck` instead of throwing `ArrayStoreException`; the VM layer
    /// translates this into the Java exception.
    pub fn set_slot_o_store_check(
        &mut self,
        array: Oop,
        index: usize,
        value: Option<Oop>,
        value_class: Option<ClassId>,
        is_assignable: impl Fn(ClassId, ClassId) -> bool,
    ) -> CoreResult<()> {
        let component = self.get(array).component_type.clone();
        if let (Some(ComponentType::Reference(component_class)), Some(value_class)) =
            (&component, value_class)
        {
            if !is_assignable(value_class, *component_class) {
                return Err(CoreError::ArrayStoreCheck {
                    value_kind: format!("{value_class:?}"),
                    component_kind: format!("{component_class:?}"),
                });
            }
        }
        self.set_slot_o(array, index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_tag_uniqueness() {
        assert_eq!(HeaderTag::decode(0b00), HeaderTag::SmallInstance);
        assert_eq!(HeaderTag::decode(0b01), HeaderTag::LargeArrayLength);
        assert_eq!(HeaderTag::decode(0b11), HeaderTag::MethodOrKlassLength);
        assert_eq!(HeaderTag::decode(0xFFFF_FF00), HeaderTag::SmallInstance);
        assert_eq!(HeaderTag::decode(0xFFFF_FF01), HeaderTag::LargeArrayLength);
        assert_eq!(HeaderTag::decode(0xFFFF_FF11 & 0xFFFF_FFFF), HeaderTag::MethodOrKlassLength);
    }

    #[test]
    fn small_header_round_trip() {
        let word = encode_small_header(42, Some(7), 32).unwrap();
        assert_eq!(HeaderTag::decode(word), HeaderTag::SmallInstance);
        let decoded = decode_small_header(word, 32);
        assert_eq!(decoded.class_ref, 42);
        assert_eq!(decoded.length, Some(7));
    }

    #[test]
    fn small_header_plain_object_has_no_length() {
        let word = encode_small_header(3, None, 32).unwrap();
        let decoded = decode_small_header(word, 32);
        assert_eq!(decoded.length, None);
    }

    #[test]
    fn oversized_length_forces_large_form() {
        let overflow = small_length_overflow(length_field_bits(32));
        assert!(encode_small_header(0, Some(overflow), 32).is_none());
        assert!(encode_small_header(0, Some(overflow - 1), 32).is_some());
    }

    fn heap() -> Heap {
        Heap::new(Box::new(NullBarrier))
    }

    #[test]
    fn slot_accessors_round_trip() {
        let mut heap = heap();
        let oop = heap.allocate(HeapObject {
            class_id: ClassId::new(0, 1),
            component_type: None,
            slots: vec![Slot::Int(0), Slot::Oop(None)],
        });
        heap.set_slot_i(oop, 0, 99).unwrap();
        assert_eq!(heap.get_slot_i(oop, 0).unwrap(), 99);
        assert_eq!(heap.get_slot_o(oop, 1).unwrap(), None);
        assert!(heap.get_slot_i(oop, 5).is_err());
    }

    #[test]
    fn array_store_check_rejects_mismatched_component() {
        let mut heap = heap();
        let string_class = ClassId::new(0, 10);
        let other_class = ClassId::new(0, 11);
        let array = heap.allocate(HeapObject {
            class_id: ClassId::new(0, 20),
            component_type: Some(ComponentType::Reference(string_class)),
            slots: vec![Slot::Oop(None), Slot::Oop(None), Slot::Oop(None)],
        });
        let element = heap.allocate(HeapObject {
            class_id: other_class,
            component_type: None,
            slots: vec![],
        });
        let result = heap.set_slot_o_store_check(
            array,
            1,
            Some(element),
            Some(other_class),
            |a, b| a == b,
        );
        assert!(result.is_err());
        let ok = heap.set_slot_o_store_check(
            array,
            1,
            Some(element),
            Some(string_class),
            |a, b| a == b,
        );
        assert!(ok.is_ok());
    }
}
