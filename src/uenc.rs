// uenc.rs - Encoding trait (from UConverterImpl) and shared codec functions.
//
// Decoding is step-wise: each call resolves one code point from the front of
// a byte slice and reports how many bytes it consumed, so callers can stop
// and resume at any character boundary.

use tracing::trace;

use crate::utypes::*;

// === Encoding type alias ===
pub type UEncoding = &'static dyn Encoding;

// === Encoding flags ===
pub const ENC_FLAG_UNICODE: u32 = 1 << 0;
pub const ENC_FLAG_ASCII_COMPATIBLE: u32 = 1 << 1;
/// Unpaired surrogates are written as-is in `Preserve` mode (UTF-16 only).
pub const ENC_FLAG_SURROGATES: u32 = 1 << 2;

/// Outcome of decoding the character at the front of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// A Unicode scalar value.
    Scalar(UChar32),
    /// An unpaired surrogate code unit (UTF-16) or surrogate value (UTF-32).
    Surrogate(UChar32),
    /// A maximal ill-formed subsequence.
    Illegal,
    /// The input ends inside a character and no more input will follow.
    Truncated,
    /// The input ends inside a character; more input may complete it.
    /// `len` is always 0 for this outcome.
    Incomplete,
}

/// One decoding step: the outcome and the number of bytes it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeStep {
    pub value: Decoded,
    pub len: usize,
}

impl DecodeStep {
    #[inline]
    pub const fn new(value: Decoded, len: usize) -> Self {
        DecodeStep { value, len }
    }
}

// === Encoding Trait ===
pub trait Encoding: Send + Sync {
    /// Canonical charset name (e.g. "UTF-8", "UTF-16LE").
    fn name(&self) -> &'static str;

    /// Alternative names accepted by [`crate::encodings::lookup`].
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Minimum encoded character length in bytes.
    fn min_char_len(&self) -> usize;

    /// Maximum encoded character length in bytes.
    fn max_char_len(&self) -> usize;

    /// Decode the character at the front of `s` (which must not be empty).
    ///
    /// With `at_end == false` an incomplete but so far well-formed prefix
    /// yields [`Decoded::Incomplete`]; with `at_end == true` it yields
    /// [`Decoded::Truncated`] covering the prefix.
    fn next_char(&self, s: &[u8], at_end: bool) -> DecodeStep;

    /// Append the encoded form of `code` to `out` and return its length.
    ///
    /// Fails with `U_INVALID_CHAR_FOUND` when the charset has no mapping
    /// for `code`, or `U_ILLEGAL_SEQUENCE` for values it can never carry.
    fn encode_char(&self, code: UChar32, out: &mut Vec<u8>) -> Result<usize, UErrorCode>;

    /// Code point written in place of unmappable or ill-formed input.
    fn subchar(&self) -> UChar32 {
        UCHAR_REPLACEMENT
    }

    /// Encoding flags.
    fn flag(&self) -> u32;

    /// Is `s` entirely well-formed in this encoding?
    fn is_valid_string(&self, s: &[u8]) -> bool {
        let mut p = 0;
        while p < s.len() {
            let step = self.next_char(&s[p..], true);
            match step.value {
                Decoded::Scalar(_) => p += step.len,
                _ => return false,
            }
        }
        true
    }
}

// === Encoding query helpers ===

#[inline]
pub fn enc_is_unicode(enc: UEncoding) -> bool {
    (enc.flag() & ENC_FLAG_UNICODE) != 0
}

#[inline]
pub fn enc_is_ascii_compatible(enc: UEncoding) -> bool {
    (enc.flag() & ENC_FLAG_ASCII_COMPATIBLE) != 0
}

#[inline]
pub fn enc_carries_surrogates(enc: UEncoding) -> bool {
    (enc.flag() & ENC_FLAG_SURROGATES) != 0
}

/// Resolve a decoding outcome under an error mode.
///
/// `Incomplete` is treated as `Truncated`; callers that can wait for more
/// input must handle it before calling this.
pub fn resolve_decoded(value: Decoded, mode: ErrorMode) -> Result<UChar32, UErrorCode> {
    match value {
        Decoded::Scalar(c) => Ok(c),
        Decoded::Surrogate(c) => match mode {
            ErrorMode::Strict => Err(U_ILLEGAL_SEQUENCE),
            ErrorMode::Substitute => Ok(UCHAR_REPLACEMENT),
            ErrorMode::Preserve => Ok(c),
        },
        Decoded::Illegal => match mode {
            ErrorMode::Strict => Err(U_ILLEGAL_SEQUENCE),
            _ => Ok(UCHAR_REPLACEMENT),
        },
        Decoded::Truncated | Decoded::Incomplete => match mode {
            ErrorMode::Strict => Err(U_TRUNCATED_INPUT),
            _ => Ok(UCHAR_REPLACEMENT),
        },
    }
}

/// Encode one code point under an error mode, appending to `out`.
///
/// Values above U+10FFFF are always ill-formed. Surrogates are written only
/// in `Preserve` mode to encodings that can carry them.
pub fn encode_code_point(
    enc: UEncoding,
    code: UChar32,
    mode: ErrorMode,
    out: &mut Vec<u8>,
) -> Result<usize, UErrorCode> {
    let err = if code > UCHAR_MAX_VALUE {
        U_ILLEGAL_SEQUENCE
    } else if u_is_surrogate(code)
        && !(mode == ErrorMode::Preserve && enc_carries_surrogates(enc))
    {
        U_ILLEGAL_SEQUENCE
    } else {
        match enc.encode_char(code, out) {
            Ok(len) => return Ok(len),
            Err(e) => e,
        }
    };
    if mode == ErrorMode::Strict {
        return Err(err);
    }
    trace!(encoding = enc.name(), code, "substituting unencodable code point");
    enc.encode_char(enc.subchar(), out)
}

// === Bulk decode ===

/// A successfully decoded code point and the bytes it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedChar {
    pub code: UChar32,
    pub offset: usize,
    pub len: usize,
}

/// Position and kind of a codec failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecError {
    pub code: UErrorCode,
    /// Byte offset (decoding) or code point index (encoding) of the failure.
    pub offset: usize,
    /// Number of units that make up the offending sequence.
    pub len: usize,
}

/// Lazy decoder over a complete buffer.
///
/// Yields one item per code point. In `Strict` mode the first ill-formed
/// sequence yields an `Err` and iteration stops; [`Decoder::resume_at`]
/// restarts it at any offset, e.g. just past the error.
#[derive(Clone)]
pub struct Decoder<'a> {
    enc: UEncoding,
    src: &'a [u8],
    pos: usize,
    mode: ErrorMode,
    stopped: bool,
}

/// Decode `src` in encoding `enc`.
pub fn decode(src: &[u8], enc: UEncoding, mode: ErrorMode) -> Decoder<'_> {
    Decoder {
        enc,
        src,
        pos: 0,
        mode,
        stopped: false,
    }
}

impl<'a> Decoder<'a> {
    /// Byte offset of the next character to decode.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Continue decoding from `offset` (clamped to the buffer length).
    pub fn resume_at(&mut self, offset: usize) {
        self.pos = offset.min(self.src.len());
        self.stopped = false;
    }

    pub fn encoding(&self) -> UEncoding {
        self.enc
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<DecodedChar, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.pos >= self.src.len() {
            return None;
        }
        let offset = self.pos;
        let step = self.enc.next_char(&self.src[offset..], true);
        let len = step.len.max(1);
        match resolve_decoded(step.value, self.mode) {
            Ok(code) => {
                self.pos += len;
                Some(Ok(DecodedChar { code, offset, len }))
            }
            Err(code) => {
                self.stopped = true;
                Some(Err(CodecError { code, offset, len }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.src.len() - self.pos.min(self.src.len());
        let max = self.enc.max_char_len();
        (remaining.div_ceil(max), Some(remaining))
    }
}

/// Decode all of `src` into code points.
pub fn decode_to_vec(
    src: &[u8],
    enc: UEncoding,
    mode: ErrorMode,
    out: &mut Vec<UChar32>,
) -> Result<(), CodecError> {
    out.reserve(src.len() / enc.min_char_len());
    for item in decode(src, enc, mode) {
        out.push(item?.code);
    }
    Ok(())
}

/// Encode `src` code points into `enc`, appending to `out`.
/// Returns the number of bytes written.
pub fn encode(
    src: &[UChar32],
    enc: UEncoding,
    mode: ErrorMode,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    let start = out.len();
    for (i, &c) in src.iter().enumerate() {
        encode_code_point(enc, c, mode, out).map_err(|code| CodecError {
            code,
            offset: i,
            len: 1,
        })?;
    }
    Ok(out.len() - start)
}

/// Length of a NUL-terminated byte string in `enc`: the offset of the first
/// all-zero code unit, or the slice length when there is none.
pub fn nul_terminated_len(enc: UEncoding, src: &[u8]) -> usize {
    let unit = enc.min_char_len();
    if unit == 1 {
        return memchr::memchr(0, src).unwrap_or(src.len());
    }
    for pos in memchr::memchr_iter(0, src) {
        let start = pos - pos % unit;
        if start + unit <= src.len() && src[start..start + unit].iter().all(|&b| b == 0) {
            return start;
        }
    }
    src.len() - src.len() % unit
}

/// Resolve an ICU-style length argument (`-1` for NUL-terminated).
pub fn resolve_length(enc: UEncoding, src: &[u8], length: i32) -> Result<usize, UErrorCode> {
    if length == U_NUL_TERMINATED {
        return Ok(nul_terminated_len(enc, src));
    }
    usize::try_from(length)
        .ok()
        .filter(|&len| len <= src.len())
        .ok_or(U_ILLEGAL_ARGUMENT_ERROR)
}
