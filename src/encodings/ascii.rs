// encodings/ascii.rs - Port of the US-ASCII converter in ucnvlat1.cpp
// US-ASCII: bytes 0x00-0x7F map to themselves, everything else is ill-formed.

use crate::uenc::*;
use crate::utypes::*;

/// ASCII SUB, written for code points ASCII cannot represent.
pub const ASCII_SUBCHAR: UChar32 = 0x1a;

// === ASCII Encoding Struct ===
pub struct AsciiEncoding;

pub static US_ASCII: AsciiEncoding = AsciiEncoding;

impl Encoding for AsciiEncoding {
    fn name(&self) -> &'static str {
        "US-ASCII"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ASCII", "ANSI_X3.4-1968", "iso-ir-6", "cp367", "us", "iso646-us"]
    }

    fn min_char_len(&self) -> usize {
        1
    }

    fn max_char_len(&self) -> usize {
        1
    }

    fn next_char(&self, s: &[u8], _at_end: bool) -> DecodeStep {
        if s[0] < 0x80 {
            DecodeStep::new(Decoded::Scalar(s[0] as UChar32), 1)
        } else {
            DecodeStep::new(Decoded::Illegal, 1)
        }
    }

    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
        if code < 0x80 {
            out.push(code as u8);
            Ok(1)
        } else {
            Err(U_INVALID_CHAR_FOUND)
        }
    }

    fn subchar(&self) -> UChar32 {
        ASCII_SUBCHAR
    }

    fn flag(&self) -> u32 {
        ENC_FLAG_ASCII_COMPATIBLE
    }

    fn is_valid_string(&self, s: &[u8]) -> bool {
        s.is_ascii()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_bytes_are_illegal() {
        assert_eq!(US_ASCII.next_char(b"A", true), DecodeStep::new(Decoded::Scalar(0x41), 1));
        assert_eq!(US_ASCII.next_char(b"\x80", true), DecodeStep::new(Decoded::Illegal, 1));
        assert!(!US_ASCII.is_valid_string(b"caf\xe9"));
    }

    #[test]
    fn unmappable_substitution() {
        let mut out = Vec::new();
        assert_eq!(US_ASCII.encode_char(0xe9, &mut out), Err(U_INVALID_CHAR_FOUND));
        encode_code_point(&US_ASCII, 0xe9, ErrorMode::Substitute, &mut out).unwrap();
        assert_eq!(out, vec![0x1a]);
    }
}
