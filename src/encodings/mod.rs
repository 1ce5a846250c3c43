// encodings/mod.rs - Encoding registry
// Each charset family maps to one Rust module.

pub mod ascii;
pub mod latin1;
pub mod utf16;
pub mod utf32;
pub mod utf8;

pub use ascii::US_ASCII;
pub use latin1::ISO_8859_1;
pub use utf16::{UTF16_BE, UTF16_LE};
pub use utf32::{UTF32_BE, UTF32_LE};
pub use utf8::UTF8;

use crate::uenc::UEncoding;
use crate::utypes::*;

/// Every charset known to the converter, in lookup order.
pub static ALL_ENCODINGS: [UEncoding; 7] = [
    &UTF8,
    &UTF16_BE,
    &UTF16_LE,
    &UTF32_BE,
    &UTF32_LE,
    &US_ASCII,
    &ISO_8859_1,
];

/// Reduce a charset name to its comparison key: ASCII alphanumerics only,
/// lowercased ("UTF-16_LE" and "utf16le" compare equal).
fn name_key(name: &str) -> Option<String> {
    let key: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Find an encoding by canonical name or alias.
/// Unknown names yield `U_UNSUPPORTED_ENCODING`.
pub fn lookup(name: &str) -> Result<UEncoding, UErrorCode> {
    let key = name_key(name).ok_or(U_UNSUPPORTED_ENCODING)?;
    ALL_ENCODINGS
        .iter()
        .copied()
        .find(|enc| {
            std::iter::once(enc.name())
                .chain(enc.aliases().iter().copied())
                .any(|candidate| name_key(candidate).as_deref() == Some(key.as_str()))
        })
        .ok_or(U_UNSUPPORTED_ENCODING)
}
