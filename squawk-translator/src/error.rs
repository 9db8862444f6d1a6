//! Translator errors. All are fatal to the klass being loaded, not to the VM: the suite as a
//! whole survives.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    #[error("class format error: {0}")]
    ClassFormatError(String),

    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedClassVersionError { major: u16, minor: u16 },

    #[error("class circularity detected involving {0:?}")]
    ClassCircularityError(String),

    #[error("incompatible class change: {0}")]
    IncompatibleClassChangeError(String),

    #[error("abstract method error: {0}")]
    AbstractMethodError(String),

    #[error("illegal access: {0}")]
    IllegalAccessError(String),

    #[error("no such field: {0}")]
    NoSuchFieldError(String),

    #[error("no such method: {0}")]
    NoSuchMethodError(String),

    #[error("no class definition found: {0:?}")]
    NoClassDefFoundError(String),

    #[error("verify error: {0}")]
    VerifyError(String),

    #[error("bytecode emission error: {0}")]
    EmitError(String),
}

pub type TranslatorResult<T> = Result<T, TranslatorError>;
