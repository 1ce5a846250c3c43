// unorm2.rs - Port of unorm2.h / normalizer2.cpp
// Normalizer instances (UNormalizer2), whole-buffer normalization, quick
// check, and the streaming normalizer.

use std::sync::Arc;

use tracing::debug;

use crate::encodings::utf16::{u16_decode, u16_encode};
use crate::normalizer2impl;
use crate::udata::u_init;
use crate::unicode::PropertyTable;
use crate::utypes::*;

/// A normalization form bound to a Property Table. Cheap to clone and
/// safe to share between threads.
#[derive(Clone, Debug)]
pub struct UNormalizer2 {
    table: Arc<PropertyTable>,
    form: NormalizationForm,
}

impl UNormalizer2 {
    pub fn new(table: Arc<PropertyTable>, form: NormalizationForm) -> Self {
        UNormalizer2 { table, form }
    }

    pub fn form(&self) -> NormalizationForm {
        self.form
    }

    pub fn table(&self) -> &Arc<PropertyTable> {
        &self.table
    }
}

/// Get a normalizer for `form` using the process-wide data.
pub fn unorm2_get_instance(form: NormalizationForm) -> Result<UNormalizer2, UErrorCode> {
    let table = u_init().map_err(|e| e.code)?;
    Ok(UNormalizer2::new(table, form))
}

/// Get a normalizer by form name ("NFC", "nfkd", ...).
pub fn unorm2_get_instance_by_name(name: &str) -> Result<UNormalizer2, UErrorCode> {
    unorm2_get_instance(NormalizationForm::from_name(name)?)
}

/// Code points are checked before normalization: values above U+10FFFF are
/// rejected. Surrogates are inert and pass through.
fn check_code_points(src: &[UChar32]) -> Result<(), UErrorCode> {
    if src.iter().any(|&c| c > UCHAR_MAX_VALUE) {
        return Err(U_ILLEGAL_SEQUENCE);
    }
    Ok(())
}

/// Normalize a whole code point sequence.
pub fn unorm2_normalize(norm: &UNormalizer2, src: &[UChar32]) -> Result<Vec<UChar32>, UErrorCode> {
    check_code_points(src)?;
    let mut out = Vec::with_capacity(src.len());
    normalizer2impl::normalize(&norm.table, src, norm.form, &mut out);
    Ok(out)
}

/// Normalize UTF-16 text into a caller-provided buffer.
///
/// Returns the length of the result. If `dest` is too small, nothing is
/// written and the status is `U_BUFFER_TOO_SMALL` with the required length
/// (pass an empty `dest` to preflight). Unpaired surrogates pass through.
pub fn unorm2_normalize_to_buffer(
    norm: &UNormalizer2,
    src: &[UChar],
    dest: &mut [UChar],
) -> (usize, UErrorCode) {
    let mut code_points = Vec::with_capacity(src.len());
    if let Err(e) = u16_decode(src, ErrorMode::Preserve, &mut code_points) {
        return (0, e.code);
    }
    let mut normalized = Vec::with_capacity(code_points.len());
    normalizer2impl::normalize(&norm.table, &code_points, norm.form, &mut normalized);
    let mut units = Vec::with_capacity(normalized.len());
    if let Err(e) = u16_encode(&normalized, ErrorMode::Preserve, &mut units) {
        return (0, e.code);
    }
    if units.len() > dest.len() {
        return (units.len(), U_BUFFER_TOO_SMALL);
    }
    dest[..units.len()].copy_from_slice(&units);
    (units.len(), U_ZERO_ERROR)
}

/// Quick check. `Maybe` is only returned for NFC and NFKC.
pub fn unorm2_quick_check(
    norm: &UNormalizer2,
    src: &[UChar32],
) -> Result<UNormalizationCheckResult, UErrorCode> {
    check_code_points(src)?;
    Ok(normalizer2impl::quick_check(&norm.table, src, norm.form))
}

/// Is `src` normalized? Runs the quick check and normalizes only when it
/// answers `Maybe`.
pub fn unorm2_is_normalized(norm: &UNormalizer2, src: &[UChar32]) -> Result<bool, UErrorCode> {
    match unorm2_quick_check(norm, src)? {
        UNormalizationCheckResult::Yes => Ok(true),
        UNormalizationCheckResult::No => Ok(false),
        UNormalizationCheckResult::Maybe => {
            let mut out = Vec::with_capacity(src.len());
            normalizer2impl::normalize(&norm.table, src, norm.form, &mut out);
            Ok(out == src)
        }
    }
}

// === Streaming normalizer ===

/// State of a streaming normalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing is buffered.
    Idle,
    /// A trailing segment is held back because the next chunk may extend
    /// its combining run.
    BufferingCombiningRun,
    /// `flush` is emitting the held-back segment; the normalizer is back
    /// to `Idle` when it returns.
    Flushing,
}

/// Chunked normalization with output identical to whole-buffer
/// normalization, whatever the chunk sizes.
///
/// Each chunk is appended to the pending segment; everything before the
/// last normalization boundary in it is normalized and emitted, the rest
/// stays pending.
#[derive(Clone, Debug)]
pub struct UNormalizer {
    norm: UNormalizer2,
    pending: Vec<UChar32>,
    state: StreamState,
}

impl UNormalizer {
    pub fn open(norm: UNormalizer2) -> Self {
        debug!(form = %norm.form, "opening streaming normalizer");
        UNormalizer {
            norm,
            pending: Vec::new(),
            state: StreamState::Idle,
        }
    }

    pub fn form(&self) -> NormalizationForm {
        self.norm.form
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Number of code points held back.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feed one chunk, appending stable output to `out`.
    /// Returns the number of code points appended.
    pub fn normalize_incremental(
        &mut self,
        chunk: &[UChar32],
        out: &mut Vec<UChar32>,
    ) -> Result<usize, UErrorCode> {
        check_code_points(chunk)?;
        // `pending` holds no boundary past its start, so only the new
        // code points need scanning.
        let scanned = self.pending.len();
        self.pending.extend_from_slice(chunk);
        let start = out.len();
        let boundary = normalizer2impl::last_boundary_from(
            &self.norm.table,
            &self.pending,
            scanned,
            self.norm.form,
        );
        if boundary > 0 {
            normalizer2impl::normalize(
                &self.norm.table,
                &self.pending[..boundary],
                self.norm.form,
                out,
            );
            self.pending.drain(..boundary);
        }
        self.state = if self.pending.is_empty() {
            StreamState::Idle
        } else {
            StreamState::BufferingCombiningRun
        };
        Ok(out.len() - start)
    }

    /// End of stream: normalize and emit whatever is pending.
    pub fn flush(&mut self, out: &mut Vec<UChar32>) -> usize {
        self.state = StreamState::Flushing;
        let start = out.len();
        normalizer2impl::normalize(&self.norm.table, &self.pending, self.norm.form, out);
        self.pending.clear();
        self.state = StreamState::Idle;
        out.len() - start
    }

    /// Drop any pending input and return to `Idle`.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.state = StreamState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nfc() -> UNormalizer2 {
        unorm2_get_instance(NormalizationForm::Nfc).unwrap()
    }

    #[test]
    fn instance_by_name() {
        assert_eq!(
            unorm2_get_instance_by_name("nfkd").unwrap().form(),
            NormalizationForm::Nfkd
        );
        assert_eq!(
            unorm2_get_instance_by_name("NFQ").unwrap_err(),
            U_ILLEGAL_ARGUMENT_ERROR
        );
    }

    #[test]
    fn rejects_out_of_range() {
        let n = nfc();
        assert_eq!(unorm2_normalize(&n, &[0x61, 0x110000]), Err(U_ILLEGAL_SEQUENCE));
        assert_eq!(unorm2_is_normalized(&n, &[0x110000]), Err(U_ILLEGAL_SEQUENCE));
        // surrogates are inert
        assert_eq!(unorm2_normalize(&n, &[0xd800, 0x301]), Ok(vec![0xd800, 0x301]));
    }

    #[test]
    fn long_combining_run_fed_one_mark_at_a_time() {
        let n = nfc();
        let mut text = vec![0x61];
        text.extend(std::iter::repeat([0x301, 0x323]).take(2000).flatten());
        text.push(0x62);

        let mut stream = UNormalizer::open(n.clone());
        let mut out = Vec::new();
        for &c in &text[..text.len() - 1] {
            assert_eq!(stream.normalize_incremental(&[c], &mut out), Ok(0));
        }
        assert_eq!(stream.pending_len(), text.len() - 1);
        // The base letter ends the run and releases it.
        assert!(stream.normalize_incremental(&[0x62], &mut out).unwrap() > 0);
        assert_eq!(stream.pending_len(), 1);
        stream.flush(&mut out);
        assert_eq!(out, unorm2_normalize(&n, &text).unwrap());
    }

    #[test]
    fn is_normalized() {
        let n = nfc();
        assert_eq!(unorm2_is_normalized(&n, &[0xe9]), Ok(true));
        assert_eq!(unorm2_is_normalized(&n, &[0x65, 0x301]), Ok(false));
        // Maybe, but nothing composes with U+0301 after 'x'.
        assert_eq!(unorm2_quick_check(&n, &[0x78, 0x301]), Ok(UNormalizationCheckResult::Maybe));
        assert_eq!(unorm2_is_normalized(&n, &[0x78, 0x301]), Ok(true));
    }

    #[test]
    fn to_buffer_preflight() {
        let n = unorm2_get_instance(NormalizationForm::Nfd).unwrap();
        let src = [0xe9, 0xd800];
        assert_eq!(unorm2_normalize_to_buffer(&n, &src, &mut []), (3, U_BUFFER_TOO_SMALL));
        let mut dest = [0u16; 2];
        assert_eq!(unorm2_normalize_to_buffer(&n, &src, &mut dest), (3, U_BUFFER_TOO_SMALL));
        assert_eq!(dest, [0, 0]);
        let mut dest = [0u16; 4];
        assert_eq!(unorm2_normalize_to_buffer(&n, &src, &mut dest), (3, U_ZERO_ERROR));
        assert_eq!(&dest[..3], &[0x65, 0x301, 0xd800]);
    }

    #[test]
    fn streaming_states() {
        let mut s = UNormalizer::open(nfc());
        let mut out = Vec::new();
        assert_eq!(s.state(), StreamState::Idle);
        assert_eq!(s.normalize_incremental(&[0x61, 0x62, 0x65], &mut out), Ok(2));
        assert_eq!(out, vec![0x61, 0x62]);
        assert_eq!(s.state(), StreamState::BufferingCombiningRun);
        assert_eq!(s.normalize_incremental(&[0x301], &mut out), Ok(0));
        assert_eq!(s.pending_len(), 2);
        assert_eq!(s.normalize_incremental(&[0x63], &mut out), Ok(1));
        assert_eq!(out, vec![0x61, 0x62, 0xe9]);
        assert_eq!(s.flush(&mut out), 1);
        assert_eq!(out, vec![0x61, 0x62, 0xe9, 0x63]);
        assert_eq!(s.state(), StreamState::Idle);
    }

    #[test]
    fn reset_discards_pending() {
        let mut s = UNormalizer::open(nfc());
        let mut out = Vec::new();
        s.normalize_incremental(&[0x65], &mut out).unwrap();
        s.reset();
        assert_eq!(s.pending_len(), 0);
        s.normalize_incremental(&[0x301], &mut out).unwrap();
        s.flush(&mut out);
        assert_eq!(out, vec![0x301]);
    }

    #[test]
    fn every_split_matches_whole_buffer() {
        let n = nfc();
        // a, dot below, circumflex, Hangul L, V, T, e, acute
        let src = [0x61, 0x302, 0x323, 0x1100, 0x1161, 0x11a8, 0x65, 0x301];
        let whole = unorm2_normalize(&n, &src).unwrap();
        for mask in 0u32..(1 << (src.len() - 1)) {
            let mut s = UNormalizer::open(n.clone());
            let mut out = Vec::new();
            let mut start = 0;
            for i in 1..src.len() {
                if mask & (1 << (i - 1)) != 0 {
                    s.normalize_incremental(&src[start..i], &mut out).unwrap();
                    start = i;
                }
            }
            s.normalize_incremental(&src[start..], &mut out).unwrap();
            s.flush(&mut out);
            assert_eq!(out, whole, "split mask {:b}", mask);
        }
    }
}
