//! # Squawk Suite
//!
//! The suite and symbol model: classes, methods, constant pools, and the on-disk suite-file
//! header. Built on `squawk-core`'s object model.

pub mod constant_pool;
pub mod error;
pub mod klass;
pub mod method;
pub mod suite;
pub mod symbols;

pub use constant_pool::{ObjectTableBuilder, RawConstant, ResolvedConstant};
pub use error::{SuiteError, SuiteResult};
pub use klass::{ConstantObject, Klass, KlassMetadata, KlassState, Modifiers, ObjectAssociation};
pub use method::{ExceptionTableEntry, Minfo, MethodBody, RelocationEntry, RelocationKind};
pub use suite::{StripLevel, Suite, SuiteHeader, SUITE_MAGIC, SUITE_VERSION};
pub use symbols::{FixedEntryPoint, FixedEntryPoints, PrimitiveKlass};
