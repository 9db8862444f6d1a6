//! Channel wire opcodes. These integer values must never be renumbered; callers on both sides
//! of the split I/O server protocol depend on them.

pub const RESULT_OK: i32 = 0;
pub const RESULT_BADCONTEXT: i32 = -1;
pub const RESULT_EXCEPTION: i32 = -2;
pub const RESULT_BADPARAMETER: i32 = -3;

/// Global opcodes 1-5.
pub mod global {
    pub const CREATE_CONTEXT: i32 = 1;
    pub const DELETE_CONTEXT: i32 = 2;
    pub const HIBERNATE_CONTEXT: i32 = 3;
    pub const GETEVENT: i32 = 4;
    pub const WAITFOREVENT: i32 = 5;
}

/// Context opcodes 6-10.
pub mod context {
    pub const GETCHANNEL: i32 = 6;
    pub const FREECHANNEL: i32 = 7;
    pub const GETRESULT: i32 = 8;
    pub const GETRESULT_2: i32 = 9;
    pub const GETERROR: i32 = 10;
}

/// Connection opcodes 11-16.
pub mod connection {
    pub const OPENCONNECTION: i32 = 11;
    pub const OPENINPUT: i32 = 12;
    pub const OPENOUTPUT: i32 = 13;
    pub const ACCEPT: i32 = 14;
    pub const CLOSECONNECTION: i32 = 15;
    pub const CLOSEINPUT: i32 = 16;
}

/// Stream opcodes 17-34: read/write of byte/short/int/long/buf plus mark/reset/available/flush.
pub mod stream {
    pub const READBYTE: i32 = 17;
    pub const READSHORT: i32 = 18;
    pub const READINT: i32 = 19;
    pub const READLONG: i32 = 20;
    pub const READBUF: i32 = 21;
    pub const WRITEBYTE: i32 = 22;
    pub const WRITESHORT: i32 = 23;
    pub const WRITEINT: i32 = 24;
    pub const WRITELONG: i32 = 25;
    pub const WRITEBUF: i32 = 26;
    pub const MARK: i32 = 27;
    pub const RESET: i32 = 28;
    pub const SKIP: i32 = 29;
    pub const AVAILABLE: i32 = 30;
    pub const FLUSH: i32 = 31;
    pub const CLOSEOUTPUT: i32 = 32;
    pub const DELETECONTEXT: i32 = 33;
    pub const SETWINDOWNAME: i32 = 34;
}

/// GUI opcodes 35-71 (graphics primitives); not exhaustively named here, only the range
/// boundary that distinguishes them from stream/internal.
pub const GUI_RANGE: std::ops::RangeInclusive<i32> = 35..=71;

/// Internal VM helper opcodes 1000-1018.
pub mod internal {
    pub const PRINTSTRING: i32 = 1000;
    pub const PRINTCHAR: i32 = 1001;
    pub const PRINTINT: i32 = 1002;
    pub const PRINTLONG: i32 = 1003;
    pub const STOPVM: i32 = 1010;
    pub const COPYBYTES: i32 = 1011;
    pub const GETTIME: i32 = 1012;
}

/// Embedded/flash profile extensions.
pub mod embedded {
    pub const CHANNEL_LED: i32 = 101;
    pub const CHANNEL_SW: i32 = 102;
    pub const LED_OFF: i32 = 201;
    pub const LED_ON: i32 = 202;
    pub const SW_READ: i32 = 203;
    pub const PEEK: i32 = 301;
    pub const POKE: i32 = 302;
}

/// Object class-ids carried alongside the fixed fields in the split I/O server protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClassId {
    ByteArray,
    CharArray,
    IntArray,
    String,
    StringOfBytes,
}

impl ObjectClassId {
    pub fn from_wire(id: i32) -> Option<Self> {
        Some(match id {
            8 => ObjectClassId::ByteArray,
            10 => ObjectClassId::ByteArray,
            9 => ObjectClassId::CharArray,
            11 => ObjectClassId::IntArray,
            12 => ObjectClassId::String,
            13 => ObjectClassId::StringOfBytes,
            _ => return None,
        })
    }
}

/// Fixed channel ids.
pub const CHANNEL_STDIO: i32 = 1;
pub const CHANNEL_GUI_IN: i32 = 2;
pub const CHANNEL_GUI_OUT: i32 = 3;

/// The reply magic the split I/O server always leads with.
pub const REPLY_MAGIC: u32 = 0xCAFE_BABE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_codes_match_the_wire_contract() {
        assert_eq!(RESULT_OK, 0);
        assert_eq!(RESULT_BADCONTEXT, -1);
        assert_eq!(RESULT_EXCEPTION, -2);
        assert_eq!(RESULT_BADPARAMETER, -3);
    }

    #[test]
    fn object_class_id_decodes_known_wire_values() {
        assert_eq!(ObjectClassId::from_wire(8), Some(ObjectClassId::ByteArray));
        assert_eq!(ObjectClassId::from_wire(9), Some(ObjectClassId::CharArray));
        assert_eq!(ObjectClassId::from_wire(11), Some(ObjectClassId::IntArray));
        assert_eq!(ObjectClassId::from_wire(999), None);
    }
}
