// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use ferricu::prelude::*;
//!
//! let nfc = Normalizer::new(NormalizationForm::Nfc).unwrap();
//! assert_eq!(nfc.normalize("A\u{30a}"), "\u{c5}");
//! ```

pub use crate::api::{Converter, ConverterBuilder, Normalizer, StreamNormalizer, Transcoder};
pub use crate::error::UnicodeError;
pub use crate::utypes::{ErrorMode, NormalizationForm, UNormalizationCheckResult};
