//! Error types for suite construction and symbol resolution.

use squawk_core::ClassId;
use thiserror::Error;

/// Errors raised while building or resolving against a suite.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuiteError {
    #[error("class {0:?} not found in this suite or any ancestor")]
    NoClassDefFound(String),

    #[error("circular class definition detected while resolving {0:?}")]
    ClassCircularity(String),

    #[error("class id {0:?} does not exist in suite")]
    UnknownClassId(ClassId),

    #[error("method id {method_id} out of range for class {class_id:?} ({kind})")]
    UnknownMethodId {
        class_id: ClassId,
        method_id: u16,
        kind: &'static str,
    },

    #[error("malformed field descriptor {0:?}")]
    BadFieldDescriptor(String),

    #[error("suite file is malformed: {0}")]
    MalformedSuiteFile(String),

    #[error("suite header magic mismatch")]
    BadMagic,

    #[error("suite version {found} unsupported (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
}

pub type SuiteResult<T> = Result<T, SuiteError>;
