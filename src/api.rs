// api.rs - Idiomatic Rust API for ferricu.
//
// Wraps the C-shaped internals (unorm2_*, ucnv_*) with Rust-native types:
// Normalizer, StreamNormalizer, Converter, ConverterBuilder, Transcoder.

use std::sync::Arc;

use crate::encodings::{self, utf16};
use crate::error::UnicodeError;
use crate::normalizer2impl;
use crate::ucnv::UConverter;
use crate::udata::u_init;
use crate::uenc::{self, Decoder};
use crate::unicode::PropertyTable;
use crate::unorm2::{self, StreamState, UNormalizer, UNormalizer2};
use crate::utypes::*;

fn chars_of(text: &str) -> Vec<UChar32> {
    text.chars().map(|c| c as UChar32).collect()
}

fn push_chars(code_points: &[UChar32], out: &mut String) {
    out.extend(
        code_points
            .iter()
            .map(|&c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

/// A Unicode normalizer for one normalization form.
///
/// # Examples
///
/// ```
/// use ferricu::api::Normalizer;
///
/// let nfd = Normalizer::nfd().unwrap();
/// assert_eq!(nfd.normalize("é"), "e\u{301}");
///
/// let nfc = Normalizer::nfc().unwrap();
/// assert_eq!(nfc.normalize("e\u{301}"), "é");
/// assert!(nfc.is_normalized("é"));
/// ```
#[derive(Clone, Debug)]
pub struct Normalizer {
    inner: UNormalizer2,
}

impl Normalizer {
    /// Create a normalizer over the built-in data.
    pub fn new(form: NormalizationForm) -> Result<Normalizer, UnicodeError> {
        let table = u_init()?;
        Ok(Normalizer::with_table(table, form))
    }

    /// Create a normalizer over an explicitly loaded table.
    pub fn with_table(table: Arc<PropertyTable>, form: NormalizationForm) -> Normalizer {
        Normalizer {
            inner: UNormalizer2::new(table, form),
        }
    }

    pub fn nfc() -> Result<Normalizer, UnicodeError> {
        Self::new(NormalizationForm::Nfc)
    }

    pub fn nfd() -> Result<Normalizer, UnicodeError> {
        Self::new(NormalizationForm::Nfd)
    }

    pub fn nfkc() -> Result<Normalizer, UnicodeError> {
        Self::new(NormalizationForm::Nfkc)
    }

    pub fn nfkd() -> Result<Normalizer, UnicodeError> {
        Self::new(NormalizationForm::Nfkd)
    }

    pub fn form(&self) -> NormalizationForm {
        self.inner.form()
    }

    /// The Property Table, for per-code-point queries.
    pub fn properties(&self) -> &PropertyTable {
        self.inner.table()
    }

    /// Normalize a string.
    pub fn normalize(&self, text: &str) -> String {
        let mut normalized = Vec::with_capacity(text.len());
        normalizer2impl::normalize(self.inner.table(), &chars_of(text), self.form(), &mut normalized);
        let mut out = String::with_capacity(text.len());
        push_chars(&normalized, &mut out);
        out
    }

    /// Normalize UTF-16 text. Unpaired surrogates are kept as they are.
    pub fn normalize_utf16(&self, text: &[u16]) -> Vec<u16> {
        let mut code_points = Vec::with_capacity(text.len());
        // Preserve mode never fails on UTF-16 input.
        let decoded = utf16::u16_decode(text, ErrorMode::Preserve, &mut code_points);
        debug_assert!(decoded.is_ok(), "{:?}", decoded);
        let mut normalized = Vec::with_capacity(code_points.len());
        normalizer2impl::normalize(self.inner.table(), &code_points, self.form(), &mut normalized);
        let mut out = Vec::with_capacity(normalized.len());
        // Normalization only yields code points that were in range.
        let encoded = utf16::u16_encode(&normalized, ErrorMode::Preserve, &mut out);
        debug_assert!(encoded.is_ok(), "{:?}", encoded);
        out
    }

    /// Normalize a code point sequence. Values above U+10FFFF are rejected.
    pub fn normalize_code_points(&self, code_points: &[UChar32]) -> Result<Vec<UChar32>, UnicodeError> {
        Ok(unorm2::unorm2_normalize(&self.inner, code_points)?)
    }

    /// Quick check: `No` and `Yes` are definite, `Maybe` needs
    /// [`Normalizer::is_normalized`].
    pub fn quick_check(&self, text: &str) -> UNormalizationCheckResult {
        normalizer2impl::quick_check(self.inner.table(), &chars_of(text), self.form())
    }

    pub fn is_normalized(&self, text: &str) -> bool {
        let code_points = chars_of(text);
        match normalizer2impl::quick_check(self.inner.table(), &code_points, self.form()) {
            UNormalizationCheckResult::Yes => true,
            UNormalizationCheckResult::No => false,
            UNormalizationCheckResult::Maybe => {
                let mut normalized = Vec::with_capacity(code_points.len());
                normalizer2impl::normalize(
                    self.inner.table(),
                    &code_points,
                    self.form(),
                    &mut normalized,
                );
                normalized == code_points
            }
        }
    }

    /// Start a streaming normalization.
    pub fn stream(&self) -> StreamNormalizer {
        StreamNormalizer {
            inner: UNormalizer::open(self.inner.clone()),
        }
    }

    /// Access the underlying C-shaped normalizer.
    pub fn as_raw(&self) -> &UNormalizer2 {
        &self.inner
    }
}

/// Chunk-by-chunk normalization. The concatenated output equals
/// [`Normalizer::normalize`] of the concatenated input.
///
/// ```
/// use ferricu::api::Normalizer;
///
/// let mut s = Normalizer::nfc().unwrap().stream();
/// let mut out = s.push("cafe");
/// out += &s.push("\u{301} au lait");
/// out += &s.finish();
/// assert_eq!(out, "café au lait");
/// ```
#[derive(Clone, Debug)]
pub struct StreamNormalizer {
    inner: UNormalizer,
}

impl StreamNormalizer {
    /// Feed a chunk; returns the part of the output that is final.
    pub fn push(&mut self, chunk: &str) -> String {
        let mut normalized = Vec::with_capacity(chunk.len());
        // Chars are always in range.
        let pushed = self.inner.normalize_incremental(&chars_of(chunk), &mut normalized);
        debug_assert!(pushed.is_ok(), "{:?}", pushed);
        let mut out = String::with_capacity(chunk.len());
        push_chars(&normalized, &mut out);
        out
    }

    /// Feed code points, appending final output to `out`.
    pub fn push_code_points(
        &mut self,
        chunk: &[UChar32],
        out: &mut Vec<UChar32>,
    ) -> Result<usize, UnicodeError> {
        Ok(self.inner.normalize_incremental(chunk, out)?)
    }

    /// End the stream and return the held-back tail.
    pub fn finish(&mut self) -> String {
        let mut normalized = Vec::new();
        self.inner.flush(&mut normalized);
        let mut out = String::with_capacity(normalized.len());
        push_chars(&normalized, &mut out);
        out
    }

    pub fn finish_code_points(&mut self, out: &mut Vec<UChar32>) -> usize {
        self.inner.flush(out)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn state(&self) -> StreamState {
        self.inner.state()
    }
}

/// A charset converter.
///
/// # Examples
///
/// ```
/// use ferricu::api::Converter;
/// use ferricu::utypes::ErrorMode;
///
/// let mut latin1 = Converter::new("latin1").unwrap();
/// assert_eq!(latin1.decode(b"caf\xe9").unwrap(), "café");
/// assert_eq!(latin1.encode("café").unwrap(), b"caf\xe9");
///
/// let mut strict = Converter::builder("UTF-8")
///     .error_mode(ErrorMode::Strict)
///     .build()
///     .unwrap();
/// assert!(strict.decode(b"\xc0\x80").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Converter {
    inner: UConverter,
}

impl Converter {
    /// Open a converter with the default error mode (substitution).
    pub fn new(encoding: &str) -> Result<Converter, UnicodeError> {
        ConverterBuilder::new(encoding).build()
    }

    pub fn builder(encoding: &str) -> ConverterBuilder {
        ConverterBuilder::new(encoding)
    }

    /// Canonical charset name.
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub fn error_mode(&self) -> ErrorMode {
        self.inner.error_mode()
    }

    /// Lazily decode a complete buffer, one code point at a time.
    pub fn chars<'a>(&self, bytes: &'a [u8]) -> Decoder<'a> {
        uenc::decode(bytes, self.inner.encoding(), self.inner.error_mode())
    }

    /// Decode a complete buffer into a string. Surrogates kept in
    /// `Preserve` mode cannot live in a `String` and become U+FFFD; use
    /// [`Converter::decode_utf16`] to keep them.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String, UnicodeError> {
        let code_points = self.decode_code_points(bytes)?;
        let mut out = String::with_capacity(code_points.len());
        push_chars(&code_points, &mut out);
        Ok(out)
    }

    /// Decode a complete buffer into UTF-16.
    pub fn decode_utf16(&mut self, bytes: &[u8]) -> Result<Vec<u16>, UnicodeError> {
        let code_points = self.decode_code_points(bytes)?;
        let mut out = Vec::with_capacity(code_points.len());
        utf16::u16_encode(&code_points, ErrorMode::Preserve, &mut out)?;
        Ok(out)
    }

    /// Decode a complete buffer into code points.
    pub fn decode_code_points(&mut self, bytes: &[u8]) -> Result<Vec<UChar32>, UnicodeError> {
        self.inner.reset();
        let mut out = Vec::with_capacity(bytes.len());
        let result = self.inner.to_unicode(bytes, true, &mut out);
        self.inner.reset();
        result?;
        Ok(out)
    }

    /// Decode one chunk of a stream; see [`UConverter::to_unicode`].
    pub fn decode_chunk(
        &mut self,
        bytes: &[u8],
        flush: bool,
        out: &mut Vec<UChar32>,
    ) -> Result<usize, UnicodeError> {
        Ok(self.inner.to_unicode(bytes, flush, out)?)
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>, UnicodeError> {
        self.encode_code_points(&chars_of(text))
    }

    /// Encode UTF-16; unpaired surrogates follow the error mode.
    pub fn encode_utf16(&self, text: &[u16]) -> Result<Vec<u8>, UnicodeError> {
        let mut code_points = Vec::with_capacity(text.len());
        utf16::u16_decode(text, self.inner.error_mode(), &mut code_points)?;
        self.encode_code_points(&code_points)
    }

    pub fn encode_code_points(&self, code_points: &[UChar32]) -> Result<Vec<u8>, UnicodeError> {
        let mut out = Vec::with_capacity(code_points.len());
        self.inner.from_unicode(code_points, &mut out)?;
        Ok(out)
    }

    /// Drop a buffered partial character.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Access the underlying C-shaped converter.
    pub fn as_raw(&self) -> &UConverter {
        &self.inner
    }
}

/// Builder for [`Converter`] with custom error handling.
#[derive(Clone, Debug)]
pub struct ConverterBuilder {
    encoding: String,
    mode: ErrorMode,
}

impl ConverterBuilder {
    pub fn new(encoding: &str) -> Self {
        ConverterBuilder {
            encoding: encoding.to_string(),
            mode: ErrorMode::default(),
        }
    }

    /// How ill-formed and unmappable input is handled.
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `error_mode(ErrorMode::Strict)`.
    pub fn strict(self, yes: bool) -> Self {
        let mode = if yes { ErrorMode::Strict } else { ErrorMode::Substitute };
        self.error_mode(mode)
    }

    pub fn build(self) -> Result<Converter, UnicodeError> {
        let enc = encodings::lookup(&self.encoding)?;
        Ok(Converter {
            inner: UConverter::new(enc, self.mode),
        })
    }
}

/// Streaming conversion from one charset to another.
///
/// ```
/// use ferricu::api::Transcoder;
///
/// let bytes = "h\u{e9}".as_bytes();
/// let mut t = Transcoder::new("UTF-8", "UTF-16LE").unwrap();
/// let mut out = t.feed(&bytes[..2]).unwrap();
/// out.extend(t.feed(&bytes[2..]).unwrap());
/// out.extend(t.finish().unwrap());
/// assert_eq!(out, [0x68, 0x00, 0xe9, 0x00]);
/// ```
#[derive(Clone, Debug)]
pub struct Transcoder {
    source: Converter,
    target: Converter,
}

impl Transcoder {
    pub fn new(from: &str, to: &str) -> Result<Transcoder, UnicodeError> {
        Self::with_error_mode(from, to, ErrorMode::default())
    }

    pub fn with_error_mode(from: &str, to: &str, mode: ErrorMode) -> Result<Transcoder, UnicodeError> {
        Ok(Transcoder {
            source: Converter::builder(from).error_mode(mode).build()?,
            target: Converter::builder(to).error_mode(mode).build()?,
        })
    }

    /// Convert a complete buffer.
    pub fn transcode(&mut self, bytes: &[u8]) -> Result<Vec<u8>, UnicodeError> {
        let code_points = self.source.decode_code_points(bytes)?;
        self.target.encode_code_points(&code_points)
    }

    /// Convert one chunk; a character split across chunks is completed
    /// by the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>, UnicodeError> {
        let mut code_points = Vec::with_capacity(chunk.len());
        self.source.decode_chunk(chunk, false, &mut code_points)?;
        self.target.encode_code_points(&code_points)
    }

    /// End the stream.
    pub fn finish(&mut self) -> Result<Vec<u8>, UnicodeError> {
        let mut code_points = Vec::new();
        let result = self.source.decode_chunk(&[], true, &mut code_points);
        self.source.reset();
        result?;
        self.target.encode_code_points(&code_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strings() {
        let nfkc = Normalizer::nfkc().unwrap();
        assert_eq!(nfkc.normalize("ﬁ"), "fi");
        assert_eq!(nfkc.form(), NormalizationForm::Nfkc);
        let nfd = Normalizer::nfd().unwrap();
        assert_eq!(nfd.normalize("한"), "\u{1112}\u{1161}\u{11ab}");
    }

    #[test]
    fn normalize_utf16_keeps_lone_surrogates() {
        let nfc = Normalizer::nfc().unwrap();
        let src = [0x65, 0x301, 0xdc00];
        assert_eq!(nfc.normalize_utf16(&src), vec![0xe9, 0xdc00]);
    }

    #[test]
    fn normalize_utf16_odd_surrogate_layouts() {
        // Runs under debug assertions: none of these may trip them.
        let nfd = Normalizer::nfd().unwrap();
        // reversed pair, lone lead at the end, and a real pair (U+1D15E)
        let src = [0xdc00, 0xd800, 0x61, 0xd834, 0xdd5e, 0xd800];
        assert_eq!(
            nfd.normalize_utf16(&src),
            vec![0xdc00, 0xd800, 0x61, 0xd834, 0xdd57, 0xd834, 0xdd65, 0xd800]
        );
        assert!(nfd.normalize_utf16(&[]).is_empty());
    }

    #[test]
    fn code_points_out_of_range() {
        let nfc = Normalizer::nfc().unwrap();
        let err = nfc.normalize_code_points(&[0x110000]).unwrap_err();
        assert_eq!(err.code(), U_ILLEGAL_SEQUENCE);
    }

    #[test]
    fn stream_matches_whole() {
        let nfc = Normalizer::nfc().unwrap();
        let text = "Ångström e\u{301}\u{323} 가\u{11a8}";
        let whole = nfc.normalize(text);
        let mut s = nfc.stream();
        let mut out = String::new();
        for c in text.chars() {
            out += &s.push(c.encode_utf8(&mut [0; 4]));
        }
        out += &s.finish();
        assert_eq!(out, whole);
        assert_eq!(s.state(), StreamState::Idle);
    }

    #[test]
    fn converter_modes() {
        let mut lenient = Converter::new("UTF-8").unwrap();
        assert_eq!(lenient.decode(b"a\xc0\x80b").unwrap(), "a\u{fffd}b");
        let mut strict = Converter::builder("UTF-8").strict(true).build().unwrap();
        let err = strict.decode(b"a\xc0\x80b").unwrap_err();
        assert_eq!(err, UnicodeError::IllegalSequence { offset: Some(1) });
    }

    #[test]
    fn converter_preserve_round_trip() {
        let mut cnv = Converter::builder("UTF-16LE")
            .error_mode(ErrorMode::Preserve)
            .build()
            .unwrap();
        let bytes = [0x00, 0xd8, 0x41, 0x00];
        let units = cnv.decode_utf16(&bytes).unwrap();
        assert_eq!(units, vec![0xd800, 0x41]);
        assert_eq!(cnv.encode_utf16(&units).unwrap(), bytes.to_vec());
    }

    #[test]
    fn lazy_chars() {
        let cnv = Converter::new("UTF-8").unwrap();
        let offsets: Vec<usize> = cnv
            .chars("aé€".as_bytes())
            .map(|r| r.unwrap().offset)
            .collect();
        assert_eq!(offsets, vec![0, 1, 3]);
    }

    #[test]
    fn unknown_encoding() {
        assert_eq!(
            Converter::new("x-mac-klingon").unwrap_err(),
            UnicodeError::UnsupportedEncoding
        );
    }

    #[test]
    fn transcoder_whole_and_streaming() {
        let mut t = Transcoder::new("UTF-16BE", "UTF-8").unwrap();
        assert_eq!(t.transcode(&[0xd8, 0x3d, 0xde, 0x00]).unwrap(), "😀".as_bytes());
        assert!(t.feed(&[0xd8, 0x3d, 0xde]).unwrap().is_empty());
        assert_eq!(t.feed(&[0x00]).unwrap(), "😀".as_bytes());
        assert!(t.finish().unwrap().is_empty());
    }
}
