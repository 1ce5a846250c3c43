// properties_test.rs - Property-based tests for the normalization and
// transcoding laws.

use proptest::prelude::*;

use ferricu::encodings;
use ferricu::normalizer2impl;
use ferricu::udata::u_init;
use ferricu::uenc::{decode_to_vec, encode};
use ferricu::unorm2::{unorm2_get_instance, UNormalizer};
use ferricu::utypes::*;

const FORMS: [NormalizationForm; 4] = [
    NormalizationForm::Nfc,
    NormalizationForm::Nfd,
    NormalizationForm::Nfkc,
    NormalizationForm::Nfkd,
];

/// Code points weighted towards the interesting parts of the table:
/// starters that compose, combining marks, Hangul and compatibility forms.
fn code_point() -> impl Strategy<Value = UChar32> {
    prop_oneof![
        3 => prop::sample::select(vec![0x41u32, 0x45, 0x61, 0x65, 0x6f, 0x73, 0x3b1, 0x3c9, 0x17f]),
        4 => 0x300u32..0x370,
        1 => prop::sample::select(vec![0x323u32, 0x327, 0x345, 0x5b0, 0x93c, 0x1dc0, 0x302a, 0x1d165]),
        2 => 0xac00u32..0xac40,
        1 => 0x1100u32..0x1176,
        1 => 0x11a8u32..0x11c3,
        1 => prop::sample::select(vec![0xa0u32, 0xbd, 0x1e9b, 0x2126, 0x212b, 0x2460, 0xfb01, 0xff21, 0x1f71]),
        1 => any::<char>().prop_map(|c| c as UChar32),
    ]
}

fn text() -> impl Strategy<Value = Vec<UChar32>> {
    prop::collection::vec(code_point(), 0..24)
}

fn normalize(src: &[UChar32], form: NormalizationForm) -> Vec<UChar32> {
    let table = u_init().unwrap();
    let mut out = Vec::new();
    normalizer2impl::normalize(&table, src, form, &mut out);
    out
}

proptest! {
    #[test]
    fn idempotent(s in text()) {
        for form in FORMS {
            let once = normalize(&s, form);
            prop_assert_eq!(normalize(&once, form), once.clone(), "{}", form);
        }
    }

    #[test]
    fn quick_check_is_sound(s in text()) {
        let table = u_init().unwrap();
        for form in FORMS {
            let unchanged = normalize(&s, form) == s;
            match normalizer2impl::quick_check(&table, &s, form) {
                UNormalizationCheckResult::Yes => prop_assert!(unchanged, "{} Yes on {:04X?}", form, s),
                UNormalizationCheckResult::No => prop_assert!(!unchanged, "{} No on {:04X?}", form, s),
                UNormalizationCheckResult::Maybe => prop_assert!(form.is_composing()),
            }
        }
    }

    #[test]
    fn composed_and_decomposed_agree(s in text()) {
        // NFC(s) == NFC(NFD(s)) and NFD(s) == NFD(NFC(s)), likewise for K.
        let nfd = normalize(&s, NormalizationForm::Nfd);
        let nfc = normalize(&s, NormalizationForm::Nfc);
        prop_assert_eq!(normalize(&nfd, NormalizationForm::Nfc), nfc.clone());
        prop_assert_eq!(normalize(&nfc, NormalizationForm::Nfd), nfd);
        let nfkd = normalize(&s, NormalizationForm::Nfkd);
        prop_assert_eq!(normalize(&nfc, NormalizationForm::Nfkd), nfkd.clone());
        prop_assert_eq!(normalize(&nfkd, NormalizationForm::Nfkc), normalize(&s, NormalizationForm::Nfkc));
    }

    #[test]
    fn chunking_does_not_change_output(
        s in text(),
        cuts in prop::collection::vec(0usize..24, 0..6),
        form_index in 0usize..4,
    ) {
        let form = FORMS[form_index];
        let whole = normalize(&s, form);

        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(s.len())).collect();
        cuts.sort_unstable();
        let mut stream = UNormalizer::open(unorm2_get_instance(form).unwrap());
        let mut out = Vec::new();
        let mut start = 0;
        for cut in cuts {
            stream.normalize_incremental(&s[start..cut], &mut out).unwrap();
            start = cut;
        }
        stream.normalize_incremental(&s[start..], &mut out).unwrap();
        stream.flush(&mut out);
        prop_assert_eq!(out, whole);
    }

    #[test]
    fn well_formed_text_round_trips(s in any::<String>()) {
        let code_points: Vec<UChar32> = s.chars().map(|c| c as UChar32).collect();
        for name in ["UTF-8", "UTF-16LE", "UTF-16BE", "UTF-32LE", "UTF-32BE"] {
            let enc = encodings::lookup(name).unwrap();
            let mut bytes = Vec::new();
            encode(&code_points, enc, ErrorMode::Strict, &mut bytes).unwrap();
            let mut decoded = Vec::new();
            decode_to_vec(&bytes, enc, ErrorMode::Strict, &mut decoded).unwrap();
            prop_assert_eq!(&decoded, &code_points);
            let mut again = Vec::new();
            encode(&decoded, enc, ErrorMode::Strict, &mut again).unwrap();
            prop_assert_eq!(again, bytes);
        }
    }

    #[test]
    fn lenient_utf8_never_fails(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let mut out = Vec::new();
        decode_to_vec(&bytes, encodings::lookup("UTF-8").unwrap(), ErrorMode::Substitute, &mut out).unwrap();
        prop_assert!(out.iter().all(|&c| u_is_scalar(c)));
        prop_assert!(out.len() <= bytes.len());
        // Valid input decodes exactly like std.
        if let Ok(s) = std::str::from_utf8(&bytes) {
            prop_assert_eq!(out, s.chars().map(|c| c as UChar32).collect::<Vec<_>>());
        }
    }
}
