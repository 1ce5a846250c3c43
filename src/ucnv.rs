// ucnv.rs - Port of ucnv.h / ucnv.cpp
// Streaming charset converter: bytes <-> code points, with a partial
// character carried over between chunks.

use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::encodings::{self, utf16};
use crate::uenc::*;
use crate::utypes::*;

/// A converter for one charset. Decoding is stateful (an incomplete
/// trailing character waits for the next chunk); encoding is not.
#[derive(Clone)]
pub struct UConverter {
    enc: UEncoding,
    mode: ErrorMode,
    /// Bytes of a character that is not complete yet.
    pending: SmallVec<[u8; 4]>,
    /// Stream offset of the first pending byte.
    position: usize,
}

impl fmt::Debug for UConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UConverter")
            .field("encoding", &self.enc.name())
            .field("mode", &self.mode)
            .field("pending", &self.pending.as_slice())
            .field("position", &self.position)
            .finish()
    }
}

/// Open a converter by charset name or alias.
pub fn ucnv_open(name: &str, mode: ErrorMode) -> Result<UConverter, UErrorCode> {
    let enc = encodings::lookup(name).inspect_err(|_| {
        debug!(name, "unsupported encoding");
    })?;
    Ok(UConverter::new(enc, mode))
}

impl UConverter {
    pub fn new(enc: UEncoding, mode: ErrorMode) -> Self {
        debug!(encoding = enc.name(), ?mode, "opening converter");
        UConverter {
            enc,
            mode,
            pending: SmallVec::new(),
            position: 0,
        }
    }

    pub fn encoding(&self) -> UEncoding {
        self.enc
    }

    /// Canonical name of the converter's charset.
    pub fn name(&self) -> &'static str {
        self.enc.name()
    }

    pub fn error_mode(&self) -> ErrorMode {
        self.mode
    }

    /// Does the converter hold part of a character?
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Forget any partial character and restart stream offsets at 0.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.position = 0;
    }

    /// Resolve one decoding step into `out`, advancing the stream offset.
    fn emit(&mut self, step: DecodeStep, out: &mut Vec<UChar32>) -> Result<usize, CodecError> {
        let len = step.len.max(1);
        let offset = self.position;
        self.position += len;
        match resolve_decoded(step.value, self.mode) {
            Ok(code) => {
                if code == UCHAR_REPLACEMENT && !matches!(step.value, Decoded::Scalar(_)) {
                    trace!(encoding = self.enc.name(), offset, len, "substituting ill-formed input");
                }
                out.push(code);
                Ok(len)
            }
            Err(code) => Err(CodecError { code, offset, len }),
        }
    }

    /// Decode a chunk, appending code points to `out`.
    ///
    /// A character cut off at the end of the chunk is kept until the next
    /// call, unless `flush` is set, in which case it is reported as
    /// truncated. Returns the number of code points appended.
    ///
    /// In `Strict` mode the first ill-formed sequence fails the call with
    /// its stream offset; code points before it are already in `out` and
    /// the rest of the chunk is not consumed.
    pub fn to_unicode(
        &mut self,
        src: &[u8],
        flush: bool,
        out: &mut Vec<UChar32>,
    ) -> Result<usize, CodecError> {
        let start = out.len();
        let mut p = 0;

        // Finish the character left over from the previous chunk.
        while !self.pending.is_empty() {
            let take = self.enc.max_char_len().min(src.len() - p);
            let mut window: SmallVec<[u8; 8]> = SmallVec::from_slice(&self.pending);
            window.extend_from_slice(&src[p..p + take]);
            let at_end = flush && p + take == src.len();
            let step = self.enc.next_char(&window, at_end);
            if step.value == Decoded::Incomplete {
                self.pending = SmallVec::from_slice(&window);
                return Ok(out.len() - start);
            }
            let held = self.pending.len();
            let used = self.emit(step, out).inspect_err(|_| self.pending.clear())?;
            if used >= held {
                p += used - held;
                self.pending.clear();
            } else {
                self.pending.drain(..used);
            }
        }

        while p < src.len() {
            let step = self.enc.next_char(&src[p..], flush);
            if step.value == Decoded::Incomplete {
                self.pending.extend_from_slice(&src[p..]);
                break;
            }
            p += self.emit(step, out)?;
        }
        Ok(out.len() - start)
    }

    /// Encode code points, appending bytes to `out`. Returns the number of
    /// bytes written.
    pub fn from_unicode(&self, src: &[UChar32], out: &mut Vec<u8>) -> Result<usize, CodecError> {
        encode(src, self.enc, self.mode, out)
    }
}

/// Length of a UTF-16 argument: `-1` means up to the first NUL unit.
fn uchars_length(src: &[UChar], length: i32) -> Result<usize, UErrorCode> {
    if length == U_NUL_TERMINATED {
        return Ok(src.iter().position(|&u| u == 0).unwrap_or(src.len()));
    }
    usize::try_from(length)
        .ok()
        .filter(|&len| len <= src.len())
        .ok_or(U_ILLEGAL_ARGUMENT_ERROR)
}

fn copy_out<T: Copy>(result: &[T], dest: &mut [T]) -> (usize, UErrorCode) {
    if result.len() > dest.len() {
        return (result.len(), U_BUFFER_TOO_SMALL);
    }
    dest[..result.len()].copy_from_slice(result);
    (result.len(), U_ZERO_ERROR)
}

/// Convert a complete byte string in the converter's charset to UTF-16.
///
/// The converter is reset first and after the call. `length` may be `-1`
/// for NUL-terminated input. Returns the UTF-16 length; when `dest` is too
/// small nothing is written and the status is `U_BUFFER_TOO_SMALL`.
pub fn ucnv_to_uchars(
    cnv: &mut UConverter,
    dest: &mut [UChar],
    src: &[u8],
    length: i32,
) -> (usize, UErrorCode) {
    let len = match resolve_length(cnv.enc, src, length) {
        Ok(len) => len,
        Err(code) => return (0, code),
    };
    cnv.reset();
    let mut code_points = Vec::with_capacity(len);
    let decoded = cnv.to_unicode(&src[..len], true, &mut code_points);
    cnv.reset();
    if let Err(e) = decoded {
        return (0, e.code);
    }
    let mut units = Vec::with_capacity(code_points.len());
    if let Err(e) = utf16::u16_encode(&code_points, ErrorMode::Preserve, &mut units) {
        return (0, e.code);
    }
    copy_out(&units, dest)
}

/// Convert UTF-16 to the converter's charset.
///
/// Unpaired surrogates follow the converter's error mode. `length` may be
/// `-1` for NUL-terminated input. Returns the byte length; when `dest` is
/// too small nothing is written and the status is `U_BUFFER_TOO_SMALL`.
pub fn ucnv_from_uchars(
    cnv: &UConverter,
    dest: &mut [u8],
    src: &[UChar],
    length: i32,
) -> (usize, UErrorCode) {
    let len = match uchars_length(src, length) {
        Ok(len) => len,
        Err(code) => return (0, code),
    };
    let mut code_points = Vec::with_capacity(len);
    if let Err(e) = utf16::u16_decode(&src[..len], cnv.mode, &mut code_points) {
        return (0, e.code);
    }
    let mut bytes = Vec::with_capacity(len * cnv.enc.min_char_len());
    if let Err(e) = cnv.from_unicode(&code_points, &mut bytes) {
        return (0, e.code);
    }
    copy_out(&bytes, dest)
}

/// Convert a byte string from one charset to another in one call
/// (substituting ill-formed and unmappable input).
pub fn ucnv_convert(
    to_name: &str,
    from_name: &str,
    dest: &mut [u8],
    src: &[u8],
    length: i32,
) -> (usize, UErrorCode) {
    let (mut from, to) = match (
        ucnv_open(from_name, ErrorMode::Substitute),
        ucnv_open(to_name, ErrorMode::Substitute),
    ) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(code), _) | (_, Err(code)) => return (0, code),
    };
    let len = match resolve_length(from.enc, src, length) {
        Ok(len) => len,
        Err(code) => return (0, code),
    };
    let mut code_points = Vec::with_capacity(len);
    if let Err(e) = from.to_unicode(&src[..len], true, &mut code_points) {
        return (0, e.code);
    }
    let mut bytes = Vec::with_capacity(len);
    if let Err(e) = to.from_unicode(&code_points, &mut bytes) {
        return (0, e.code);
    }
    copy_out(&bytes, dest)
}
