// encodings/utf32.rs - Port of ucnv_u32.cpp
// UTF-32 code unit helpers and the UTF-32BE / UTF-32LE byte codecs.

use crate::uenc::*;
use crate::utypes::*;

/// Classify one UTF-32 code unit.
#[inline]
pub fn u32_classify(unit: u32) -> Decoded {
    if unit > UCHAR_MAX_VALUE {
        Decoded::Illegal
    } else if u_is_surrogate(unit) {
        Decoded::Surrogate(unit)
    } else {
        Decoded::Scalar(unit)
    }
}

/// Decode a UTF-32 code unit slice into code points.
pub fn u32_decode(src: &[u32], mode: ErrorMode, out: &mut Vec<UChar32>) -> Result<(), CodecError> {
    for (i, &unit) in src.iter().enumerate() {
        let code = resolve_decoded(u32_classify(unit), mode).map_err(|code| CodecError {
            code,
            offset: i,
            len: 1,
        })?;
        out.push(code);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endian {
    Big,
    Little,
}

pub struct Utf32Encoding {
    endian: Endian,
}

pub static UTF32_BE: Utf32Encoding = Utf32Encoding { endian: Endian::Big };
pub static UTF32_LE: Utf32Encoding = Utf32Encoding { endian: Endian::Little };

impl Encoding for Utf32Encoding {
    fn name(&self) -> &'static str {
        match self.endian {
            Endian::Big => "UTF-32BE",
            Endian::Little => "UTF-32LE",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self.endian {
            Endian::Big => &["UTF32_BigEndian", "ibm-1232"],
            Endian::Little => &["UTF32_LittleEndian", "ibm-1234"],
        }
    }

    fn min_char_len(&self) -> usize {
        4
    }

    fn max_char_len(&self) -> usize {
        4
    }

    fn next_char(&self, s: &[u8], at_end: bool) -> DecodeStep {
        let Some(bytes) = s.get(..4) else {
            return if at_end {
                DecodeStep::new(Decoded::Truncated, s.len())
            } else {
                DecodeStep::new(Decoded::Incomplete, 0)
            };
        };
        let bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let unit = match self.endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        };
        DecodeStep::new(u32_classify(unit), 4)
    }

    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode> {
        if code > UCHAR_MAX_VALUE {
            return Err(U_ILLEGAL_SEQUENCE);
        }
        match self.endian {
            Endian::Big => out.extend_from_slice(&code.to_be_bytes()),
            Endian::Little => out.extend_from_slice(&code.to_le_bytes()),
        }
        Ok(4)
    }

    // Surrogates decoded from UTF-32 may be preserved, but are never
    // written back: only UTF-16 carries them.
    fn flag(&self) -> u32 {
        ENC_FLAG_UNICODE
    }
}
