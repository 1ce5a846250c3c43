// encodings/utf16.rs - Port of utf16.h / ucnv_u16.cpp
// UTF-16 code unit helpers and the UTF-16BE / UTF-16LE byte codecs.

use crate::uenc::*;
use crate::utypes::*;

#[inline]
pub fn u16_get_supplementary(lead: UChar, trail: UChar) -> UChar32 {
    (((lead as UChar32) - 0xd800) << 10) + ((trail as UChar32) - 0xdc00) + 0x10000
}

#[inline]
pub fn u16_lead(code: UChar32) -> UChar {
    (((code - 0x10000) >> 10) + 0xd800) as UChar
}

#[inline]
pub fn u16_trail(code: UChar32) -> UChar {
    (((code - 0x10000) & 0x3ff) + 0xdc00) as UChar
}

/// Resolve a code unit and (when available) the unit following it.
#[inline]
fn combine(unit: UChar, next: Option<UChar>) -> (Decoded, usize) {
    let c = unit as UChar32;
    if !u_is_surrogate(c) {
        return (Decoded::Scalar(c), 1);
    }
    if u_is_lead(c) {
        if let Some(trail) = next.filter(|&t| u_is_trail(t as UChar32)) {
            return (Decoded::Scalar(u16_get_supplementary(unit, trail)), 2);
        }
    }
    (Decoded::Surrogate(c), 1)
}

/// Decode the code point at the front of a UTF-16 code unit slice (non-empty).
/// The returned length counts code units.
pub fn u16_next(s: &[UChar]) -> DecodeStep {
    let (value, len) = combine(s[0], s.get(1).copied());
    DecodeStep::new(value, len)
}

/// Append `code` as UTF-16 code units. Surrogate values are written as-is.
pub fn u16_append(code: UChar32, out: &mut Vec<UChar>) -> Result<usize, UErrorCode> {
    match code {
        0..=0xffff => {
            out.push(code as UChar);
            Ok(1)
        }
        0x10000..=UCHAR_MAX_VALUE => {
            out.push(u16_lead(code));
            out.push(u16_trail(code));
            Ok(2)
        }
        _ => Err(U_ILLEGAL_SEQUENCE),
    }
}

/// Decode a whole code unit slice into code points.
pub fn u16_decode(
    src: &[UChar],
    mode: ErrorMode,
    out: &mut Vec<UChar32>,
) -> Result<(), CodecError> {
    let mut p = 0;
    while p < src.len() {
        let step = u16_next(&src[p..]);
        let code = resolve_decoded(step.value, mode).map_err(|code| CodecError {
            code,
            offset: p,
            len: step.len,
        })?;
        out.push(code);
        p += step.len;
    }
    Ok(())
}

/// Encode code points as UTF-16 code units under `mode`.
pub fn u16_encode(
    src: &[UChar32],
    mode: ErrorMode,
    out: &mut Vec<UChar>,
) -> Result<(), CodecError> {
    for (i, &c) in src.iter().enumerate() {
        let bad = c > UCHAR_MAX_VALUE || (u_is_surrogate(c) && mode != ErrorMode::Preserve);
        if !bad {
            u16_append(c, out).map_err(|code| CodecError { code, offset: i, len: 1 })?;
        } else if mode == ErrorMode::Strict {
            return Err(CodecError {
                code: U_ILLEGAL_SEQUENCE,
                offset: i,
                len: 1,
            });
        } else {
            out.push(UCHAR_REPLACEMENT as UChar);
        }
    }
    Ok(())
}

// === Byte-stream codecs ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endian {
    Big,
    Little,
}

pub struct Utf16Encoding {
    endian: Endian,
}

pub static UTF16_BE: Utf16Encoding = Utf16Encoding { endian: Endian::Big };
pub static UTF16_LE: Utf16Encoding = Utf16Encoding { endian: Endian::Little };

impl Utf16Encoding {
    #[inline]
    fn unit_at(&self, s: &[u8], i: usize) -> Option<UChar> {
        let bytes = [*s.get(i)?, *s.get(i + 1)?];
        Some(match self.endian {
            Endian::Big => UChar::from_be_bytes(bytes),
            Endian::Little => UChar::from_le_bytes(bytes),
        })
    }

    #[inline]
    fn push_unit(&self, unit: UChar, out: &mut Vec<u8>) {
        match self.endian {
            Endian::Big => out.extend_from_slice(&unit.to_be_bytes()),
            Endian::Little => out.extend_from_slice(&unit.to_le_bytes()),
        }
    }
}

impl Encoding for Utf16Encoding {
    fn name(&self) -> &'static str {
        match self.endian {
            Endian::Big => "UTF-16BE",
            Endian::Little => "UTF-16LE",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self.endian {
            Endian::Big => &["UnicodeBigUnmarked", "x-utf-16be", "ibm-1200"],
            Endian::Little => &["UnicodeLittleUnmarked", "x-utf-16le", "ibm-1202"],
        }
    }

    fn min_char_len(&self) -> usize {
        2
    }

    fn max_char_len(&self) -> usize {
        4
    }

    fn next_char(&self, s: &[u8], at_end: bool) -> DecodeStep {
        let Some(unit) = self.unit_at(s, 0) else {
            return if at_end {
                DecodeStep::new(Decoded::Truncated, s.len())
            } else {
                DecodeStep::new(Decoded::Incomplete, 0)
            };
        };
        let next = self.unit_at(s, 2);
        if next.is_none() && !at_end && u_is_lead(unit as UChar32) {
            // The trail surrogate may still arrive.
            return DecodeStep::new(Decoded::Incomplete, 0);
        }
        let (value, units) = combine(unit, next);
        DecodeStep::new(value, units * 2)
    }

    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
        match code {
            0..=0xffff => {
                self.push_unit(code as UChar, out);
                Ok(2)
            }
            0x10000..=UCHAR_MAX_VALUE => {
                self.push_unit(u16_lead(code), out);
                self.push_unit(u16_trail(code), out);
                Ok(4)
            }
            _ => Err(U_ILLEGAL_SEQUENCE),
        }
    }

    fn flag(&self) -> u32 {
        ENC_FLAG_UNICODE | ENC_FLAG_SURROGATES
    }
}
