//! # Squawk Executive
//!
//! Isolate lifecycle, the cooperative green-thread scheduler, monitors, hibernation, and the
//! service thread.

pub mod error;
pub mod hibernate;
pub mod isolate;
pub mod monitor;
pub mod scheduler;
pub mod service_thread;
pub mod thread;

pub use error::{ExecutiveError, ExecutiveResult};
pub use hibernate::{decode, encode, hibernate, unhibernate, HibernatedIsolate};
pub use isolate::{HibernationState, Isolate, StaticArea};
pub use monitor::{EnterOutcome, MonitorTable};
pub use scheduler::Scheduler;
pub use service_thread::{ServiceOperation, ServiceReply, ServiceThreadHandle};
pub use thread::{BlockReason, Thread, ThreadState};
