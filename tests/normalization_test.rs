// normalization_test.rs - Conformance tests against tests/data/normalization_vectors.txt
//
// Each line holds five code point sequences, `source;NFC;NFD;NFKC;NFKD;`,
// in the layout of NormalizationTest.txt. For every line:
//   c2 == NFC(c1) == NFC(c2) == NFC(c3)    c4 == NFC(c4) == NFC(c5)
//   c3 == NFD(c1) == NFD(c2) == NFD(c3)    c5 == NFD(c4) == NFD(c5)
//   c4 == NFKC(c1..c5)                     c5 == NFKD(c1..c5)

use ferricu::normalizer2impl;
use ferricu::udata::u_init;
use ferricu::unicode::PropertyTable;
use ferricu::utypes::*;

const VECTORS: &str = include_str!("data/normalization_vectors.txt");

struct Vector {
    line: usize,
    columns: [Vec<UChar32>; 5],
}

fn parse_column(field: &str, line: usize) -> Vec<UChar32> {
    field
        .split_whitespace()
        .map(|hex| {
            u32::from_str_radix(hex, 16)
                .unwrap_or_else(|e| panic!("line {}: bad code point {:?}: {}", line, hex, e))
        })
        .collect()
}

fn vectors() -> Vec<Vector> {
    VECTORS
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'))
        .map(|(i, l)| {
            let line = i + 1;
            let fields: Vec<&str> = l.split(';').collect();
            assert!(fields.len() >= 5, "line {}: expected 5 columns", line);
            Vector {
                line,
                columns: [
                    parse_column(fields[0], line),
                    parse_column(fields[1], line),
                    parse_column(fields[2], line),
                    parse_column(fields[3], line),
                    parse_column(fields[4], line),
                ],
            }
        })
        .collect()
}

fn normalize(table: &PropertyTable, src: &[UChar32], form: NormalizationForm) -> Vec<UChar32> {
    let mut out = Vec::new();
    normalizer2impl::normalize(table, src, form, &mut out);
    out
}

fn check(table: &PropertyTable, v: &Vector, form: NormalizationForm, inputs: &[usize], expected: usize) {
    for &i in inputs {
        let got = normalize(table, &v.columns[i], form);
        assert_eq!(
            got,
            v.columns[expected],
            "line {}: {}(c{}) != c{}",
            v.line,
            form,
            i + 1,
            expected + 1
        );
    }
}

#[test]
fn vectors_are_present() {
    assert!(vectors().len() > 1000);
}

#[test]
fn nfc_conformance() {
    let table = u_init().unwrap();
    for v in vectors() {
        check(&table, &v, NormalizationForm::Nfc, &[0, 1, 2], 1);
        check(&table, &v, NormalizationForm::Nfc, &[3, 4], 3);
    }
}

#[test]
fn nfd_conformance() {
    let table = u_init().unwrap();
    for v in vectors() {
        check(&table, &v, NormalizationForm::Nfd, &[0, 1, 2], 2);
        check(&table, &v, NormalizationForm::Nfd, &[3, 4], 4);
    }
}

#[test]
fn nfkc_conformance() {
    let table = u_init().unwrap();
    for v in vectors() {
        check(&table, &v, NormalizationForm::Nfkc, &[0, 1, 2, 3, 4], 3);
    }
}

#[test]
fn nfkd_conformance() {
    let table = u_init().unwrap();
    for v in vectors() {
        check(&table, &v, NormalizationForm::Nfkd, &[0, 1, 2, 3, 4], 4);
    }
}

/// A definite quick-check answer must agree with full normalization.
#[test]
fn quick_check_never_contradicts_normalization() {
    let table = u_init().unwrap();
    let forms = [
        NormalizationForm::Nfc,
        NormalizationForm::Nfd,
        NormalizationForm::Nfkc,
        NormalizationForm::Nfkd,
    ];
    for v in vectors() {
        for column in &v.columns {
            for form in forms {
                let normalized = normalize(&table, column, form) == *column;
                match normalizer2impl::quick_check(&table, column, form) {
                    UNormalizationCheckResult::Yes => assert!(
                        normalized,
                        "line {}: quick check Yes but {:04X?} is not {}",
                        v.line, column, form
                    ),
                    UNormalizationCheckResult::No => assert!(
                        !normalized,
                        "line {}: quick check No but {:04X?} is {}",
                        v.line, column, form
                    ),
                    UNormalizationCheckResult::Maybe => assert!(form.is_composing()),
                }
            }
        }
    }
}
