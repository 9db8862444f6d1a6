//! Channel-layer errors. This enum exists for the Rust-side plumbing that builds that result
//! protocol; it never crosses the wire itself.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("unknown context id {0}")]
    UnknownContext(u32),

    #[error("unknown channel id {0} in context {1}")]
    UnknownChannel(i32, u32),

    #[error("channel {0} is not open for this operation")]
    NotOpen(i32),

    #[error("modified-UTF-8 decode failed: {0}")]
    InvalidModifiedUtf8(String),

    #[error("malformed split I/O server request: {0}")]
    MalformedRequest(String),
}

pub type ChannelResult<T> = Result<T, ChannelError>;
