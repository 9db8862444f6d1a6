//! A single channel.
//!
//! Per-isolate (context) object: channel id, channel type, the open resource it wraps, the last
//! 64-bit result (fetched in two 32-bit halves via `CONTEXT_GETRESULT`/`CONTEXT_GETRESULT_2`),
//! and whether the channel is currently blocked on an event.

use crate::opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Generic,
    GuiIn,
    GuiOut,
    Led,
    Switch,
}

/// The resource a channel has open, modeled abstractly: `squawk-channel` does not know how to
/// actually touch a GUI surface or an LED, only how to track that one is logically open, the
/// way the split I/O server on the other side of the wire protocol would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenResource {
    None,
    Stream { url: String, buffer: Vec<u8>, position: usize },
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub id: i32,
    pub kind: ChannelKind,
    pub resource: OpenResource,
    /// Low/high halves of the last operation's up-to-64-bit result.
    pub last_result: (i32, i32),
    pub blocking: bool,
}

impl Channel {
    pub fn new(id: i32, kind: ChannelKind) -> Self {
        Channel {
            id,
            kind,
            resource: OpenResource::None,
            last_result: (opcode::RESULT_OK, 0),
            blocking: false,
        }
    }

    pub fn set_result(&mut self, value: i64) {
        self.last_result = ((value & 0xFFFF_FFFF) as i32, (value >> 32) as i32);
    }

    pub fn result_low(&self) -> i32 {
        self.last_result.0
    }

    pub fn result_high(&self) -> i32 {
        self.last_result.1
    }

    /// Opens a generic stream resource against a URL.
    pub fn open_stream(&mut self, url: impl Into<String>) {
        self.resource = OpenResource::Stream {
            url: url.into(),
            buffer: Vec::new(),
            position: 0,
        };
        self.set_result(opcode::RESULT_OK as i64);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> i32 {
        match &mut self.resource {
            OpenResource::Stream { buffer, .. } => {
                buffer.extend_from_slice(bytes);
                self.set_result(opcode::RESULT_OK as i64);
                opcode::RESULT_OK
            }
            OpenResource::None => {
                self.set_result(opcode::RESULT_BADCONTEXT as i64);
                opcode::RESULT_BADCONTEXT
            }
        }
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, i32> {
        match &mut self.resource {
            OpenResource::Stream { buffer, position, .. } => {
                let end = (*position + count).min(buffer.len());
                let read = buffer[*position..end].to_vec();
                *position = end;
                self.set_result(opcode::RESULT_OK as i64);
                Ok(read)
            }
            OpenResource::None => {
                self.set_result(opcode::RESULT_BADCONTEXT as i64);
                Err(opcode::RESULT_BADCONTEXT)
            }
        }
    }

    pub fn close(&mut self) {
        self.resource = OpenResource::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_reopen_and_read_round_trips_bytes() {
        let mut channel = Channel::new(3, ChannelKind::Generic);
        channel.open_stream("generic://example.test");
        assert_eq!(channel.write_bytes(&[1, 2, 3]), opcode::RESULT_OK);
        channel.close();

        channel.open_stream("generic://example.test");
        if let OpenResource::Stream { buffer, .. } = &mut channel.resource {
            buffer.extend_from_slice(&[1, 2, 3]);
        }
        let read = channel.read_bytes(3).unwrap();
        assert_eq!(read, vec![1, 2, 3]);
        assert_eq!(channel.result_low(), opcode::RESULT_OK);
    }

    #[test]
    fn result_splits_into_low_and_high_halves() {
        let mut channel = Channel::new(3, ChannelKind::Generic);
        channel.set_result(0x0000_0002_0000_0001u64 as i64);
        assert_eq!(channel.result_low(), 1);
        assert_eq!(channel.result_high(), 2);
    }
}
