// utypes.rs - Port of utypes.h / unorm2.h / ucnv_err.h
// Public types, error codes, normalization forms and converter error modes.

// === Grundtypen ===
/// A code point value. May hold an unpaired surrogate (0xD800..=0xDFFF) when
/// text was decoded in [`ErrorMode::Preserve`].
pub type UChar32 = u32;
/// A UTF-16 code unit.
pub type UChar = u16;
/// Status code: `U_ZERO_ERROR` on success, positive on failure.
pub type UErrorCode = i32;

// === Code point constants ===
pub const UCHAR_MAX_VALUE: UChar32 = 0x10ffff;
pub const UCHAR_REPLACEMENT: UChar32 = 0xfffd;
pub const U_SURROGATE_MIN: UChar32 = 0xd800;
pub const U_LEAD_SURROGATE_MAX: UChar32 = 0xdbff;
pub const U_TRAIL_SURROGATE_MIN: UChar32 = 0xdc00;
pub const U_SURROGATE_MAX: UChar32 = 0xdfff;

/// Length argument meaning "up to the first NUL code unit".
pub const U_NUL_TERMINATED: i32 = -1;

// === Error Codes ===
// Numbering follows ICU where a counterpart exists.
pub const U_ZERO_ERROR: UErrorCode = 0;
pub const U_ILLEGAL_ARGUMENT_ERROR: UErrorCode = 1;
pub const U_INVALID_FORMAT_ERROR: UErrorCode = 3;
pub const U_FILE_ACCESS_ERROR: UErrorCode = 4;
pub const U_INVALID_CHAR_FOUND: UErrorCode = 10;
pub const U_TRUNCATED_INPUT: UErrorCode = 11;
pub const U_ILLEGAL_SEQUENCE: UErrorCode = 12;
pub const U_BUFFER_TOO_SMALL: UErrorCode = 15;
pub const U_UNSUPPORTED_ENCODING: UErrorCode = 16;
pub const U_INCOMPATIBLE_DATA_VERSION: UErrorCode = 17;
pub const U_INVALID_HANDLE: UErrorCode = 27;

pub const U_ERROR_LIMIT: UErrorCode = 28;

#[inline]
pub fn u_success(code: UErrorCode) -> bool {
    code <= U_ZERO_ERROR
}

#[inline]
pub fn u_failure(code: UErrorCode) -> bool {
    code > U_ZERO_ERROR
}

#[inline]
pub fn u_is_surrogate(c: UChar32) -> bool {
    (U_SURROGATE_MIN..=U_SURROGATE_MAX).contains(&c)
}

#[inline]
pub fn u_is_lead(c: UChar32) -> bool {
    (U_SURROGATE_MIN..=U_LEAD_SURROGATE_MAX).contains(&c)
}

#[inline]
pub fn u_is_trail(c: UChar32) -> bool {
    (U_TRAIL_SURROGATE_MIN..=U_SURROGATE_MAX).contains(&c)
}

/// Is `c` a Unicode scalar value (in range and not a surrogate)?
#[inline]
pub fn u_is_scalar(c: UChar32) -> bool {
    c <= UCHAR_MAX_VALUE && !u_is_surrogate(c)
}

// === Normalization Forms ===

/// One of the four Unicode normalization forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NormalizationForm {
    /// Canonical decomposition followed by canonical composition.
    Nfc,
    /// Canonical decomposition.
    Nfd,
    /// Compatibility decomposition followed by canonical composition.
    Nfkc,
    /// Compatibility decomposition.
    Nfkd,
}

impl NormalizationForm {
    pub const ALL: [NormalizationForm; 4] = [
        NormalizationForm::Nfc,
        NormalizationForm::Nfd,
        NormalizationForm::Nfkc,
        NormalizationForm::Nfkd,
    ];

    /// Does this form apply compatibility mappings?
    #[inline]
    pub fn is_compat(self) -> bool {
        matches!(self, NormalizationForm::Nfkc | NormalizationForm::Nfkd)
    }

    /// Does this form recompose after decomposing?
    #[inline]
    pub fn is_composing(self) -> bool {
        matches!(self, NormalizationForm::Nfc | NormalizationForm::Nfkc)
    }

    pub fn name(self) -> &'static str {
        match self {
            NormalizationForm::Nfc => "NFC",
            NormalizationForm::Nfd => "NFD",
            NormalizationForm::Nfkc => "NFKC",
            NormalizationForm::Nfkd => "NFKD",
        }
    }

    /// Parse a form name ("NFC", "nfkd", ...). Unknown names yield
    /// `U_ILLEGAL_ARGUMENT_ERROR`.
    pub fn from_name(name: &str) -> Result<NormalizationForm, UErrorCode> {
        match name.to_ascii_uppercase().as_str() {
            "NFC" => Ok(NormalizationForm::Nfc),
            "NFD" => Ok(NormalizationForm::Nfd),
            "NFKC" => Ok(NormalizationForm::Nfkc),
            "NFKD" => Ok(NormalizationForm::Nfkd),
            _ => Err(U_ILLEGAL_ARGUMENT_ERROR),
        }
    }
}

impl std::fmt::Display for NormalizationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a normalization quick check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UNormalizationCheckResult {
    /// The text is definitely not in the checked form.
    No,
    /// Only full normalization can tell. Never returned for NFD/NFKD.
    Maybe,
    /// The text is definitely in the checked form.
    Yes,
}

// === Converter Error Modes ===

/// How converters and codecs react to ill-formed or unmappable input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Stop at the first ill-formed sequence and report it.
    Strict,
    /// Replace each maximal ill-formed subsequence with the substitution
    /// character and continue.
    #[default]
    Substitute,
    /// Like `Substitute`, but unpaired surrogates from UTF-16/UTF-32 input
    /// pass through unchanged so they can be written back losslessly.
    Preserve,
}
