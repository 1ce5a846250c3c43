// encodings/utf8.rs - Port of utf8.h / ucnv_u8.cpp
// UTF-8 codec (RFC 3629 range: U+0000 - U+10FFFF).

use crate::uenc::*;
use crate::utypes::*;

// === UTF-8 Helpers ===

#[inline]
pub fn utf8_istail(c: u8) -> bool {
    (c & 0xc0) == 0x80
}

/// Number of bytes needed to encode `code`, or `None` for values UTF-8
/// cannot carry (surrogates, > U+10FFFF).
#[inline]
pub fn utf8_len(code: UChar32) -> Option<usize> {
    match code {
        0..=0x7f => Some(1),
        0x80..=0x7ff => Some(2),
        0xd800..=0xdfff => None,
        0x800..=0xffff => Some(3),
        0x10000..=0x10ffff => Some(4),
        _ => None,
    }
}

// === EncLen_UTF8 Table ===
// Structural sequence length per lead byte; 0 marks bytes that never start
// a sequence. C0/C1 are listed as two-byte leads so that an overlong pair
// is consumed as one ill-formed unit.

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Valid range of the first trail byte (Unicode Table 3-7).
#[inline]
fn first_trail_range(lead: u8) -> (u8, u8) {
    match lead {
        0xe0 => (0xa0, 0xbf),
        0xed => (0x80, 0x9f),
        0xf0 => (0x90, 0xbf),
        0xf4 => (0x80, 0x8f),
        _ => (0x80, 0xbf),
    }
}

/// Decode the character at the front of `s` (non-empty).
///
/// Ill-formed input is consumed one maximal subpart at a time: the longest
/// prefix of a well-formed sequence, or one byte when the lead itself is
/// invalid.
pub fn utf8_next(s: &[u8], at_end: bool) -> DecodeStep {
    let lead = s[0];
    if lead < 0x80 {
        return DecodeStep::new(Decoded::Scalar(lead as UChar32), 1);
    }
    let len = ENC_LEN_UTF8[lead as usize] as usize;
    if len == 0 {
        return DecodeStep::new(Decoded::Illegal, 1);
    }
    if lead < 0xc2 {
        // Overlong two-byte form.
        return match s.get(1) {
            Some(&b) if utf8_istail(b) => DecodeStep::new(Decoded::Illegal, 2),
            Some(_) => DecodeStep::new(Decoded::Illegal, 1),
            None if at_end => DecodeStep::new(Decoded::Illegal, 1),
            None => DecodeStep::new(Decoded::Incomplete, 0),
        };
    }

    let mut code = (lead as UChar32) & (0x7f >> len);
    let (first_lo, first_hi) = first_trail_range(lead);
    for i in 1..len {
        let Some(&b) = s.get(i) else {
            return if at_end {
                DecodeStep::new(Decoded::Truncated, i)
            } else {
                DecodeStep::new(Decoded::Incomplete, 0)
            };
        };
        let (lo, hi) = if i == 1 { (first_lo, first_hi) } else { (0x80, 0xbf) };
        if b < lo || b > hi {
            return DecodeStep::new(Decoded::Illegal, i);
        }
        code = (code << 6) | (b & 0x3f) as UChar32;
    }
    DecodeStep::new(Decoded::Scalar(code), len)
}

/// Append the UTF-8 form of `code`.
pub fn utf8_append(code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
    let len = utf8_len(code).ok_or(U_ILLEGAL_SEQUENCE)?;
    match len {
        1 => out.push(code as u8),
        2 => out.extend_from_slice(&[((code >> 6) & 0x1f) as u8 | 0xc0, (code & 0x3f) as u8 | 0x80]),
        3 => out.extend_from_slice(&[
            ((code >> 12) & 0x0f) as u8 | 0xe0,
            ((code >> 6) & 0x3f) as u8 | 0x80,
            (code & 0x3f) as u8 | 0x80,
        ]),
        _ => out.extend_from_slice(&[
            ((code >> 18) & 0x07) as u8 | 0xf0,
            ((code >> 12) & 0x3f) as u8 | 0x80,
            ((code >> 6) & 0x3f) as u8 | 0x80,
            (code & 0x3f) as u8 | 0x80,
        ]),
    }
    Ok(len)
}

// === UTF-8 Encoding Struct ===

pub struct Utf8Encoding;

pub static UTF8: Utf8Encoding = Utf8Encoding;

impl Encoding for Utf8Encoding {
    fn name(&self) -> &'static str {
        "UTF-8"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["UTF8", "cp65001", "ibm-1208", "x-UTF_8J"]
    }

    fn min_char_len(&self) -> usize {
        1
    }

    fn max_char_len(&self) -> usize {
        4
    }

    fn next_char(&self, s: &[u8], at_end: bool) -> DecodeStep {
        utf8_next(s, at_end)
    }

    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
        utf8_append(code, out)
    }

    fn flag(&self) -> u32 {
        ENC_FLAG_UNICODE | ENC_FLAG_ASCII_COMPATIBLE
    }

    fn is_valid_string(&self, s: &[u8]) -> bool {
        std::str::from_utf8(s).is_ok()
    }
}
