//! The split I/O server.
//!
//! When the VM is configured with `-Xioport:<port>`, channel operations are offloaded over a
//! TCP socket to a second OS thread instead of being serviced inline. Wire format per call: 10
//! little-endian `i32` fields (`cio, op, cid, i1..i6, return-buf-len`) followed by one object
//! (class-id + length + payload); the reply is magic `0xCAFEBABE`, status, low, high, resLth,
//! then the payload bytes.

use crate::error::{ChannelError, ChannelResult};
use crate::opcode::{ObjectClassId, REPLY_MAGIC};
use bytes::{Buf, BufMut, BytesMut};
use squawk_translator::decode_modified_utf8;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use tracing::{debug, instrument};

/// The 10 fixed little-endian `i32` fields of one request, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub cio: i32,
    pub op: i32,
    pub cid: i32,
    pub i1: i32,
    pub i2: i32,
    pub i3: i32,
    pub i4: i32,
    pub i5: i32,
    pub i6: i32,
    pub return_buf_length: i32,
}

pub const HEADER_FIELD_COUNT: usize = 10;
pub const HEADER_BYTES: usize = HEADER_FIELD_COUNT * 4;

impl RequestHeader {
    pub fn decode(buf: &mut impl Buf) -> ChannelResult<Self> {
        if buf.remaining() < HEADER_BYTES {
            return Err(ChannelError::MalformedRequest(format!(
                "need {HEADER_BYTES} bytes for header, have {}",
                buf.remaining()
            )));
        }
        Ok(RequestHeader {
            cio: buf.get_i32_le(),
            op: buf.get_i32_le(),
            cid: buf.get_i32_le(),
            i1: buf.get_i32_le(),
            i2: buf.get_i32_le(),
            i3: buf.get_i32_le(),
            i4: buf.get_i32_le(),
            i5: buf.get_i32_le(),
            i6: buf.get_i32_le(),
            return_buf_length: buf.get_i32_le(),
        })
    }
}

/// The one object attached to a request: a class-id tag, a length, and a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestObject {
    pub class_id: ObjectClassId,
    pub payload: Vec<u8>,
}

impl RequestObject {
    pub fn decode(buf: &mut impl Buf) -> ChannelResult<Self> {
        if buf.remaining() < 8 {
            return Err(ChannelError::MalformedRequest(
                "object header truncated".into(),
            ));
        }
        let wire_class_id = buf.get_i32_le();
        let length = buf.get_i32_le() as usize;
        let class_id = ObjectClassId::from_wire(wire_class_id).ok_or_else(|| {
            ChannelError::MalformedRequest(format!("unknown object class id {wire_class_id}"))
        })?;
        if buf.remaining() < length {
            return Err(ChannelError::MalformedRequest(
                "object payload truncated".into(),
            ));
        }
        let mut payload = vec![0u8; length];
        buf.copy_to_slice(&mut payload);
        Ok(RequestObject { class_id, payload })
    }

    /// Decodes the payload as modified-UTF-8 when it names a string.
    pub fn as_string(&self) -> ChannelResult<String> {
        match self.class_id {
            ObjectClassId::String | ObjectClassId::StringOfBytes => {
                Ok(decode_modified_utf8(&self.payload))
            }
            _ => Err(ChannelError::InvalidModifiedUtf8(
                "object is not a string class-id".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: i32,
    pub low: i32,
    pub high: i32,
    pub payload: Vec<u8>,
}

impl Reply {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(20 + self.payload.len());
        buf.put_u32_le(REPLY_MAGIC);
        buf.put_i32_le(self.status);
        buf.put_i32_le(self.low);
        buf.put_i32_le(self.high);
        buf.put_i32_le(self.payload.len() as i32);
        buf.put_slice(&self.payload);
        buf.to_vec()
    }
}

/// Handles one request/reply round-trip against an already-accepted socket. Pure decode/encode
/// logic is separated from socket I/O so it can be unit-tested without binding a port.
#[instrument(skip(stream), fields(port = stream.local_addr().ok().map(|a| a.port())))]
pub fn serve_one_connection(
    mut stream: TcpStream,
    mut handle: impl FnMut(RequestHeader, Option<RequestObject>) -> Reply,
) -> std::io::Result<()> {
    loop {
        let mut header_bytes = [0u8; HEADER_BYTES];
        if stream.read_exact(&mut header_bytes).is_err() {
            return Ok(()); // peer closed the connection
        }
        let mut cursor = &header_bytes[..];
        let header = RequestHeader::decode(&mut cursor)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        let mut object_header = [0u8; 8];
        stream.read_exact(&mut object_header)?;
        let mut cursor = &object_header[..];
        let wire_class_id = cursor.get_i32_le();
        let length = cursor.get_i32_le() as usize;
        let object = if let Some(class_id) = ObjectClassId::from_wire(wire_class_id) {
            let mut payload = vec![0u8; length];
            stream.read_exact(&mut payload)?;
            Some(RequestObject { class_id, payload })
        } else {
            None
        };

        debug!(op = header.op, cid = header.cid, "handling split I/O request");
        let reply = handle(header, object);
        stream.write_all(&reply.encode())?;
    }
}

/// Binds and runs the split I/O server's accept loop on `port`, spawning one OS thread per
/// connection. Blocks forever; callers run it on its own thread.
pub fn run(port: u16, handle: impl Fn(RequestHeader, Option<RequestObject>) -> Reply + Clone + Send + 'static) -> std::io::Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    for stream in listener.incoming() {
        let stream = stream?;
        let handle = handle.clone();
        std::thread::spawn(move || {
            let mut handle = handle;
            let _ = serve_one_connection(stream, move |h, o| handle(h, o));
        });
    }
    Ok(())
}
