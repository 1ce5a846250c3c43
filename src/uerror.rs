// uerror.rs - Port of u_errorName() from utypes.cpp
// Error code to string conversion.

use crate::utypes::*;

/// Symbolic name of an error code, as in ICU's `u_errorName()`.
pub fn u_error_name(code: UErrorCode) -> &'static str {
    match code {
        U_ZERO_ERROR => "U_ZERO_ERROR",
        U_ILLEGAL_ARGUMENT_ERROR => "U_ILLEGAL_ARGUMENT_ERROR",
        U_INVALID_FORMAT_ERROR => "U_INVALID_FORMAT_ERROR",
        U_FILE_ACCESS_ERROR => "U_FILE_ACCESS_ERROR",
        U_INVALID_CHAR_FOUND => "U_INVALID_CHAR_FOUND",
        U_TRUNCATED_INPUT => "U_TRUNCATED_INPUT",
        U_ILLEGAL_SEQUENCE => "U_ILLEGAL_SEQUENCE",
        U_BUFFER_TOO_SMALL => "U_BUFFER_TOO_SMALL",
        U_UNSUPPORTED_ENCODING => "U_UNSUPPORTED_ENCODING",
        U_INCOMPATIBLE_DATA_VERSION => "U_INCOMPATIBLE_DATA_VERSION",
        U_INVALID_HANDLE => "U_INVALID_HANDLE",
        c if c < 0 => "[BOGUS UWarningCode]",
        _ => "[BOGUS UErrorCode]",
    }
}

/// Human-readable message for an error code.
pub fn u_error_message(code: UErrorCode) -> &'static str {
    match code {
        U_ZERO_ERROR => "no error",
        U_ILLEGAL_ARGUMENT_ERROR => "illegal argument",
        U_INVALID_FORMAT_ERROR => "data file has an invalid format",
        U_FILE_ACCESS_ERROR => "data file could not be read",
        U_INVALID_CHAR_FOUND => "code point is not mappable in the target charset",
        U_TRUNCATED_INPUT => "input ends inside a character",
        U_ILLEGAL_SEQUENCE => "illegal code unit sequence",
        U_BUFFER_TOO_SMALL => "output buffer is too small",
        U_UNSUPPORTED_ENCODING => "unsupported encoding",
        U_INCOMPATIBLE_DATA_VERSION => "data version is incompatible with this library",
        U_INVALID_HANDLE => "handle is closed or was never opened",
        _ => "unknown error",
    }
}
