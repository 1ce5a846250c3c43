//! # Ferricu
//!
//! Pure-Rust Unicode normalization core modeled on
//! [ICU](https://icu.unicode.org/): NFC, NFD, NFKC and NFKD over a compact
//! Property Table, plus UTF-8, UTF-16 and UTF-32 transcoding.
//!
//! The crate keeps ICU's shape (`unorm2_*`, `ucnv_*`, `UErrorCode` status
//! codes, preflighting with `U_BUFFER_TOO_SMALL`) and layers an idiomatic
//! Rust API on top. No bindings, no FFI.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferricu::prelude::*;
//!
//! let nfc = Normalizer::nfc().unwrap();
//! assert_eq!(nfc.normalize("e\u{301}"), "é");
//! assert_eq!(nfc.quick_check("é"), UNormalizationCheckResult::Yes);
//!
//! let nfkd = Normalizer::nfkd().unwrap();
//! assert_eq!(nfkd.normalize("①"), "1");
//! ```
//!
//! Converters use [`ConverterBuilder`](api::ConverterBuilder) for error
//! handling:
//!
//! ```rust
//! use ferricu::prelude::*;
//!
//! let mut utf8 = Converter::builder("UTF-8")
//!     .error_mode(ErrorMode::Substitute)
//!     .build()
//!     .unwrap();
//! assert_eq!(utf8.decode(b"ok\xff").unwrap(), "ok\u{fffd}");
//! ```
//!
//! ## Low-Level C-Style API
//!
//! ```rust
//! use ferricu::unorm2::{unorm2_get_instance, unorm2_normalize_to_buffer};
//! use ferricu::utypes::*;
//!
//! let nfd = unorm2_get_instance(NormalizationForm::Nfd).unwrap();
//! let src: Vec<u16> = "ñ".encode_utf16().collect();
//!
//! // Preflight with an empty buffer, then normalize for real.
//! let (len, status) = unorm2_normalize_to_buffer(&nfd, &src, &mut []);
//! assert_eq!(status, U_BUFFER_TOO_SMALL);
//! let mut dest = vec![0u16; len];
//! let (len, status) = unorm2_normalize_to_buffer(&nfd, &src, &mut dest);
//! assert!(u_success(status));
//! assert_eq!(&dest[..len], &[0x6e, 0x303]);
//! ```
//!
//! Long-lived pipelines are driven through opaque handles:
//!
//! ```rust
//! use ferricu::facade::UContext;
//! use ferricu::utypes::*;
//!
//! let mut ctx = UContext::new().unwrap();
//! let h = ctx
//!     .open_normalizer(NormalizationForm::Nfc, "UTF-8", ErrorMode::Substitute)
//!     .unwrap();
//! let mut out = ctx.process(h, b"cafe\xcc").unwrap();
//! out.extend(ctx.process(h, b"\x81").unwrap());
//! out.extend(ctx.finish(h).unwrap());
//! assert_eq!(out, "café".as_bytes());
//! ctx.close(h).unwrap();
//! ```
//!
//! ## Module Structure
//!
//! Each ICU header or source file maps to one Rust module:
//!
//! | C File | Rust Module | Purpose |
//! |--------|-------------|---------|
//! | `utypes.h` | [`utypes`] | Status codes, forms, error modes |
//! | `uerror.c` | [`uerror`] | Status code names and messages |
//! | `uversion.h` | [`uversion`] | Unicode and data versions |
//! | `ucnv_cnv.h` | [`uenc`] | Encoding trait, lazy decoder |
//! | `ucnv_u8.c` ... | [`encodings`] | UTF-8/16/32, US-ASCII, ISO-8859-1 |
//! | `uchar.c` | [`unicode`] | Property Table and per-code-point queries |
//! | `udata.cpp` | [`udata`] | Data loading and process-wide table |
//! | `normalizer2impl.cpp` | [`normalizer2impl`] | Decomposition, reordering, composition |
//! | `unorm2.h` | [`unorm2`] | Normalizer instances and streaming |
//! | `ucnv.c` | [`ucnv`] | Stateful converters |
//! | `ucnv_bld.cpp` | [`facade`] | Handle registry over converters and normalizers |

// Allow patterns inherent to the C port.
#![allow(dead_code)]
#![allow(clippy::empty_line_after_doc_comments)]
// Enable #[coverage(off)] attribute when running under cargo-llvm-cov on nightly.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod encodings;
pub mod error;
pub mod facade;
pub mod normalizer2impl;
pub mod prelude;
pub mod ucnv;
pub mod udata;
pub mod uenc;
pub mod uerror;
pub mod unicode;
pub mod unorm2;
pub mod utypes;
pub mod uversion;
