// error.rs - Idiomatic Rust error type for ferricu.
//
// Groups the C-style i32 status codes into semantic variants while
// preserving the original code for interop.

use std::fmt;

use crate::uenc::CodecError;
use crate::uerror::u_error_message;
use crate::unicode::DataError;
use crate::utypes::*;

/// Error type for conversion, normalization and data loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnicodeError {
    /// Ill-formed code unit sequence (strict mode), or an unpaired
    /// surrogate where a scalar value is required.
    IllegalSequence { offset: Option<usize> },
    /// Input ends inside a character.
    TruncatedInput { offset: Option<usize> },
    /// Code point has no mapping in the target charset (strict mode).
    Unmappable { offset: Option<usize> },
    /// Destination buffer too small; `required` is the needed length.
    BufferTooSmall { required: Option<usize> },
    /// Unknown charset name.
    UnsupportedEncoding,
    /// Invalid argument, such as an unknown normalization form name.
    IllegalArgument,
    /// Property data does not match the version this code expects.
    IncompatibleDataVersion { message: String },
    /// Property data is corrupt.
    InvalidData { message: String },
    /// Property data could not be read.
    DataAccess { message: String },
    /// Handle is closed or was never opened.
    InvalidHandle,
    /// Other error not covered by specific variants.
    Other(i32),
}

impl fmt::Display for UnicodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnicodeError::IllegalSequence { offset } => {
                write!(f, "illegal code unit sequence")?;
                write_offset(f, *offset)
            }
            UnicodeError::TruncatedInput { offset } => {
                write!(f, "truncated character")?;
                write_offset(f, *offset)
            }
            UnicodeError::Unmappable { offset } => {
                write!(f, "unmappable code point")?;
                write_offset(f, *offset)
            }
            UnicodeError::BufferTooSmall { required: Some(n) } => {
                write!(f, "output buffer too small ({} units required)", n)
            }
            UnicodeError::BufferTooSmall { required: None } => write!(f, "output buffer too small"),
            UnicodeError::UnsupportedEncoding => write!(f, "unsupported encoding"),
            UnicodeError::IllegalArgument => write!(f, "illegal argument"),
            UnicodeError::IncompatibleDataVersion { message } => {
                write!(f, "incompatible data version: {}", message)
            }
            UnicodeError::InvalidData { message } => write!(f, "invalid data: {}", message),
            UnicodeError::DataAccess { message } => write!(f, "cannot read data: {}", message),
            UnicodeError::InvalidHandle => write!(f, "invalid handle"),
            UnicodeError::Other(code) => write!(f, "error code {}", code),
        }
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<usize>) -> fmt::Result {
    match offset {
        Some(offset) => write!(f, " at offset {}", offset),
        None => Ok(()),
    }
}

impl std::error::Error for UnicodeError {}

impl From<i32> for UnicodeError {
    fn from(code: i32) -> Self {
        let message = || u_error_message(code).to_string();
        match code {
            U_ILLEGAL_SEQUENCE => UnicodeError::IllegalSequence { offset: None },
            U_TRUNCATED_INPUT => UnicodeError::TruncatedInput { offset: None },
            U_INVALID_CHAR_FOUND => UnicodeError::Unmappable { offset: None },
            U_BUFFER_TOO_SMALL => UnicodeError::BufferTooSmall { required: None },
            U_UNSUPPORTED_ENCODING => UnicodeError::UnsupportedEncoding,
            U_ILLEGAL_ARGUMENT_ERROR => UnicodeError::IllegalArgument,
            U_INCOMPATIBLE_DATA_VERSION => UnicodeError::IncompatibleDataVersion { message: message() },
            U_INVALID_FORMAT_ERROR => UnicodeError::InvalidData { message: message() },
            U_FILE_ACCESS_ERROR => UnicodeError::DataAccess { message: message() },
            U_INVALID_HANDLE => UnicodeError::InvalidHandle,
            _ => UnicodeError::Other(code),
        }
    }
}

impl From<CodecError> for UnicodeError {
    fn from(e: CodecError) -> Self {
        let offset = Some(e.offset);
        match e.code {
            U_ILLEGAL_SEQUENCE => UnicodeError::IllegalSequence { offset },
            U_TRUNCATED_INPUT => UnicodeError::TruncatedInput { offset },
            U_INVALID_CHAR_FOUND => UnicodeError::Unmappable { offset },
            code => UnicodeError::from(code),
        }
    }
}

impl From<DataError> for UnicodeError {
    fn from(e: DataError) -> Self {
        match e.code {
            U_INCOMPATIBLE_DATA_VERSION => UnicodeError::IncompatibleDataVersion { message: e.message },
            U_INVALID_FORMAT_ERROR => UnicodeError::InvalidData { message: e.message },
            U_FILE_ACCESS_ERROR => UnicodeError::DataAccess { message: e.message },
            code => UnicodeError::from(code),
        }
    }
}

impl UnicodeError {
    /// Returns the original C status code.
    pub fn code(&self) -> i32 {
        match self {
            UnicodeError::IllegalSequence { .. } => U_ILLEGAL_SEQUENCE,
            UnicodeError::TruncatedInput { .. } => U_TRUNCATED_INPUT,
            UnicodeError::Unmappable { .. } => U_INVALID_CHAR_FOUND,
            UnicodeError::BufferTooSmall { .. } => U_BUFFER_TOO_SMALL,
            UnicodeError::UnsupportedEncoding => U_UNSUPPORTED_ENCODING,
            UnicodeError::IllegalArgument => U_ILLEGAL_ARGUMENT_ERROR,
            UnicodeError::IncompatibleDataVersion { .. } => U_INCOMPATIBLE_DATA_VERSION,
            UnicodeError::InvalidData { .. } => U_INVALID_FORMAT_ERROR,
            UnicodeError::DataAccess { .. } => U_FILE_ACCESS_ERROR,
            UnicodeError::InvalidHandle => U_INVALID_HANDLE,
            UnicodeError::Other(code) => *code,
        }
    }

    /// Offset of the offending input, for decode and encode errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            UnicodeError::IllegalSequence { offset }
            | UnicodeError::TruncatedInput { offset }
            | UnicodeError::Unmappable { offset } => *offset,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_codes() {
        let err = UnicodeError::from(U_ILLEGAL_SEQUENCE);
        assert!(matches!(err, UnicodeError::IllegalSequence { offset: None }));
        assert_eq!(err.code(), U_ILLEGAL_SEQUENCE);
        assert_eq!(err.to_string(), "illegal code unit sequence");

        assert_eq!(UnicodeError::from(U_INVALID_HANDLE), UnicodeError::InvalidHandle);
        assert_eq!(
            UnicodeError::from(U_UNSUPPORTED_ENCODING).code(),
            U_UNSUPPORTED_ENCODING
        );
    }

    #[test]
    fn from_codec_error_keeps_offset() {
        let err = UnicodeError::from(CodecError {
            code: U_TRUNCATED_INPUT,
            offset: 7,
            len: 2,
        });
        assert_eq!(err.offset(), Some(7));
        assert_eq!(err.to_string(), "truncated character at offset 7");
    }

    #[test]
    fn from_data_error() {
        let err = UnicodeError::from(DataError::new(U_INCOMPATIBLE_DATA_VERSION, "Unicode 9.0"));
        assert_eq!(err.code(), U_INCOMPATIBLE_DATA_VERSION);
        assert_eq!(err.to_string(), "incompatible data version: Unicode 9.0");
    }

    #[test]
    fn from_unknown_code() {
        let err = UnicodeError::from(9999);
        assert!(matches!(err, UnicodeError::Other(9999)));
        assert_eq!(err.code(), 9999);
    }

    #[test]
    fn buffer_display() {
        let err = UnicodeError::BufferTooSmall { required: Some(12) };
        assert_eq!(err.to_string(), "output buffer too small (12 units required)");
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(UnicodeError::UnsupportedEncoding);
        assert_eq!(err.to_string(), "unsupported encoding");
    }
}
