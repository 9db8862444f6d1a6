//! Process-wide global storage.
//!
//! Three tag-typed tables of fixed capacity, populated once at romize time and addressed by a
//! tagged offset baked into `FieldOffsets`/`Global` at build time. No entries may be added once
//! the VM is running.

use crate::error::{CoreError, CoreResult, GlobalBank};
use crate::oop::Oop;

/// A class identifier: `(suite_no, class_no)` packed into one 32-bit value "Class (Klass)".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

const CLASS_NO_BITS: u32 = 16;

impl ClassId {
    pub fn new(suite_no: u16, class_no: u16) -> Self {
        ClassId(((suite_no as u32) << CLASS_NO_BITS) | class_no as u32)
    }

    pub fn suite_no(self) -> u16 {
        (self.0 >> CLASS_NO_BITS) as u16
    }

    pub fn class_no(self) -> u16 {
        (self.0 & ((1 << CLASS_NO_BITS) - 1)) as u16
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// High-32-bit tags selecting which bank a tagged global constant encodes, as named in.
const TAG_INT: u32 = 0x8888;
const TAG_ADDR: u32 = 0xAAAA;
const TAG_OOP: u32 = 0x9999;

/// A tagged global reference: high bits select the bank, low 16 bits are the offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRef {
    pub bank: GlobalBank,
    pub offset: u16,
}

impl GlobalRef {
    pub fn decode(tagged: u64) -> CoreResult<Self> {
        let tag = (tagged >> 32) as u32;
        let offset = (tagged & 0xFFFF) as u16;
        let bank = match tag {
            TAG_INT => GlobalBank::Int,
            TAG_ADDR => GlobalBank::Addr,
            TAG_OOP => GlobalBank::Oop,
            other => return Err(CoreError::UnrecognizedGlobalTag(other)),
        };
        Ok(GlobalRef { bank, offset })
    }

    pub fn encode(self) -> u64 {
        let tag = match self.bank {
            GlobalBank::Int => TAG_INT,
            GlobalBank::Addr => TAG_ADDR,
            GlobalBank::Oop => TAG_OOP,
        };
        ((tag as u64) << 32) | self.offset as u64
    }
}

/// One fixed-capacity table within the global banks.
struct Table<T> {
    values: Vec<T>,
    mapped: bool,
}

impl<T: Clone> Table<T> {
    fn unmapped() -> Self {
        Table {
            values: Vec::new(),
            mapped: false,
        }
    }

    fn map(&mut self, capacity: u16, fill: T) {
        self.values = vec![fill; capacity as usize];
        self.mapped = true;
    }

    fn get(&self, bank: GlobalBank, offset: u16) -> CoreResult<&T> {
        if !self.mapped {
            return Err(CoreError::GlobalBankNotMapped(bank));
        }
        self.values
            .get(offset as usize)
            .ok_or(CoreError::GlobalOutOfBounds {
                bank,
                offset,
                capacity: self.values.len() as u16,
            })
    }

    fn set(&mut self, bank: GlobalBank, offset: u16, value: T) -> CoreResult<()> {
        if !self.mapped {
            return Err(CoreError::GlobalBankNotMapped(bank));
        }
        let capacity = self.values.len() as u16;
        let slot = self
            .values
            .get_mut(offset as usize)
            .ok_or(CoreError::GlobalOutOfBounds {
                bank,
                offset,
                capacity,
            })?;
        *slot = value;
        Ok(())
    }
}

/// The process-wide `{int, addr, oop}` global banks.
///
/// `map_*` is called exactly once, at romize/boot time, with the table sizes the suite header
/// declares; after that the table length is fixed for the life of the VM.
pub struct GlobalBanks {
    int: Table<i32>,
    addr: Table<u64>,
    oop: Table<Option<Oop>>,
}

impl Default for GlobalBanks {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalBanks {
    pub fn new() -> Self {
        GlobalBanks {
            int: Table::unmapped(),
            addr: Table::unmapped(),
            oop: Table::unmapped(),
        }
    }

    /// Maps all three banks to their romize-declared capacities. Must be called once before any
    /// access; calling it again simply remaps (used by tests and by VM shutdown/reinit cycles).
    pub fn map(&mut self, int_capacity: u16, addr_capacity: u16, oop_capacity: u16) {
        self.int.map(int_capacity, 0);
        self.addr.map(addr_capacity, 0);
        self.oop.map(oop_capacity, None);
        tracing::debug!(int_capacity, addr_capacity, oop_capacity, "global banks mapped");
    }

    /// Frees all three banks; called on VM shutdown.
    pub fn shutdown(&mut self) {
        self.int = Table::unmapped();
        self.addr = Table::unmapped();
        self.oop = Table::unmapped();
        tracing::debug!("global banks torn down");
    }

    pub fn get_int(&self, offset: u16) -> CoreResult<i32> {
        self.int.get(GlobalBank::Int, offset).copied()
    }

    pub fn set_int(&mut self, offset: u16, value: i32) -> CoreResult<()> {
        self.int.set(GlobalBank::Int, offset, value)
    }

    pub fn get_addr(&self, offset: u16) -> CoreResult<u64> {
        self.addr.get(GlobalBank::Addr, offset).copied()
    }

    pub fn set_addr(&mut self, offset: u16, value: u64) -> CoreResult<()> {
        self.addr.set(GlobalBank::Addr, offset, value)
    }

    pub fn get_oop(&self, offset: u16) -> CoreResult<Option<Oop>> {
        self.oop.get(GlobalBank::Oop, offset).copied()
    }

    pub fn set_oop(&mut self, offset: u16, value: Option<Oop>) -> CoreResult<()> {
        self.oop.set(GlobalBank::Oop, offset, value)
    }
}
