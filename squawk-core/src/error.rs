//! Error types for the Squawk core crate.
//!
//! This module provides error handling for object-model and global-storage operations: header
//! decoding, slot access, and global-bank addressing.

use thiserror::Error;

/// Core object-model and global-storage errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A slot index fell outside an object's payload.
    #[error("slot index {index} out of bounds for object of {length} slots")]
    SlotOutOfBounds { index: usize, length: usize },

    /// An array-store check rejected a value whose runtime type is not assignable to the
    /// array's component type.
    #[error("array store check failed: cannot store {value_kind} into array of {component_kind}")]
    ArrayStoreCheck {
        value_kind: String,
        component_kind: String,
    },

    /// A global offset fell outside the configured table length.
    #[error("global offset {offset} out of bounds for {bank} bank of length {capacity}")]
    GlobalOutOfBounds {
        bank: GlobalBank,
        offset: u16,
        capacity: u16,
    },

    /// A global was addressed before its bank was mapped (romized).
    #[error("global bank {0:?} accessed before it was mapped")]
    GlobalBankNotMapped(GlobalBank),

    /// A tagged global constant did not match any known bank tag.
    #[error("unrecognized global tag {0:#x}")]
    UnrecognizedGlobalTag(u32),
}

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Which of the three global banks a tagged offset selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalBank {
    Int,
    Addr,
    Oop,
}
