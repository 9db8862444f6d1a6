//! Runtime errors raised by the interpreter.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("NullPointerException")]
    NullPointerException,

    #[error("ArrayIndexOutOfBoundsException: index {index}, length {length}")]
    ArrayIndexOutOfBoundsException { index: i32, length: usize },

    #[error("ArithmeticException: {reason}")]
    ArithmeticException { reason: String },

    #[error("ArrayStoreException: {reason}")]
    ArrayStoreException { reason: String },

    #[error("ClassCastException: {reason}")]
    ClassCastException { reason: String },

    #[error("OutOfMemoryError")]
    OutOfMemoryError,

    #[error("StackOverflowError")]
    StackOverflowError,

    #[error("invalid opcode {0:#04x}")]
    InvalidOpcode(u8),

    #[error("opcode {0:#04x} requires heap/executive support this interpreter build does not have")]
    UnsupportedOpcode(u8),

    #[error("uncaught exception propagated past the outermost frame")]
    Unhandled,
}

pub type VmResult<T> = Result<T, RuntimeError>;
