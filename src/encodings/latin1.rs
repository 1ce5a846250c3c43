// encodings/latin1.rs - Port of the ISO-8859-1 converter in ucnvlat1.cpp
// Every byte maps to the code point of the same value.

use crate::uenc::*;
use crate::utypes::*;

pub struct Latin1Encoding;

pub static ISO_8859_1: Latin1Encoding = Latin1Encoding;

impl Encoding for Latin1Encoding {
    fn name(&self) -> &'static str {
        "ISO-8859-1"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["latin1", "l1", "cp819", "ibm-819", "8859_1", "iso-ir-100"]
    }

    fn min_char_len(&self) -> usize {
        1
    }

    fn max_char_len(&self) -> usize {
        1
    }

    fn next_char(&self, s: &[u8], _at_end: bool) -> DecodeStep {
        DecodeStep::new(Decoded::Scalar(s[0] as UChar32), 1)
    }

    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
        if code <= 0xff {
            out.push(code as u8);
            Ok(1)
        } else {
            Err(U_INVALID_CHAR_FOUND)
        }
    }

    fn subchar(&self) -> UChar32 {
        0x1a
    }

    fn flag(&self) -> u32 {
        ENC_FLAG_ASCII_COMPATIBLE
    }

    fn is_valid_string(&self, _s: &[u8]) -> bool {
        true
    }
}
