//! Errors raised by the isolate/thread scheduler.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutiveError {
    #[error("unknown isolate id {0}")]
    UnknownIsolate(u32),

    #[error("unknown thread id {0}")]
    UnknownThread(u32),

    #[error("isolate {0} is not in a hibernatable state")]
    NotHibernatable(u32),

    #[error("hibernation blob is malformed: {0}")]
    MalformedHibernationBlob(String),

    #[error("thread {thread_id}'s hibernated frame needs {locals} locals, which overflows the resized stack chunk")]
    HibernatedFrameDoesNotFit { thread_id: u32, locals: usize },

    #[error("monitor operation on object without an owning thread")]
    MonitorNotOwned,

    #[error("service thread channel disconnected")]
    ServiceThreadDisconnected,
}

pub type ExecutiveResult<T> = Result<T, ExecutiveError>;
