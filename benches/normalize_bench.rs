// Criterion benchmark suite: normalization and transcoding throughput
//
// Run: cargo bench
// Specific group: cargo bench -- normalize
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ferricu::encodings;
use ferricu::normalizer2impl;
use ferricu::udata::u_init;
use ferricu::uenc::{decode_to_vec, encode};
use ferricu::unorm2::{unorm2_get_instance, UNormalizer};
use ferricu::utypes::*;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

fn corpus() -> Vec<(&'static str, Vec<UChar32>)> {
    let texts: [(&str, String); 4] = [
        ("ascii", "The quick brown fox jumps over the lazy dog. ".repeat(64)),
        ("latin_nfc", "Ça a été très élégant, naïve façade, Ångström. ".repeat(64)),
        (
            "latin_nfd",
            "C\u{327}a a e\u{301}te\u{301} tre\u{300}s e\u{301}le\u{301}gant. ".repeat(64),
        ),
        ("hangul", "한국어 텍스트는 음절로 구성됩니다. ".repeat(64)),
    ];
    texts
        .into_iter()
        .map(|(name, s)| (name, s.chars().map(|c| c as UChar32).collect()))
        .collect()
}

const FORMS: [NormalizationForm; 4] = [
    NormalizationForm::Nfc,
    NormalizationForm::Nfd,
    NormalizationForm::Nfkc,
    NormalizationForm::Nfkd,
];

// ---------------------------------------------------------------------------
// 1. normalize -- whole-buffer normalization per form
// ---------------------------------------------------------------------------

fn bench_normalize(c: &mut Criterion) {
    let table = u_init().expect("built-in data");
    let mut group = c.benchmark_group("normalize");
    for (name, text) in corpus() {
        group.throughput(Throughput::Elements(text.len() as u64));
        for form in FORMS {
            group.bench_with_input(BenchmarkId::new(form.name(), name), &text, |b, text| {
                let mut out = Vec::with_capacity(text.len() * 2);
                b.iter(|| {
                    out.clear();
                    normalizer2impl::normalize(&table, black_box(text), form, &mut out);
                    black_box(&out);
                });
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. quick_check -- the fast path for already-normalized text
// ---------------------------------------------------------------------------

fn bench_quick_check(c: &mut Criterion) {
    let table = u_init().expect("built-in data");
    let mut group = c.benchmark_group("quick_check");
    for (name, text) in corpus() {
        group.throughput(Throughput::Elements(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("nfc", name), &text, |b, text| {
            b.iter(|| black_box(normalizer2impl::quick_check(&table, black_box(text), NormalizationForm::Nfc)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. streaming -- fixed-size chunks through UNormalizer
// ---------------------------------------------------------------------------

fn bench_streaming(c: &mut Criterion) {
    let nfc = unorm2_get_instance(NormalizationForm::Nfc).expect("built-in data");
    let mut group = c.benchmark_group("streaming");
    for (name, text) in corpus() {
        group.throughput(Throughput::Elements(text.len() as u64));
        for chunk in [7usize, 64, 1024] {
            group.bench_with_input(BenchmarkId::new(format!("nfc/{}", chunk), name), &text, |b, text| {
                b.iter(|| {
                    let mut stream = UNormalizer::open(nfc.clone());
                    let mut out = Vec::with_capacity(text.len());
                    for part in text.chunks(chunk) {
                        stream.normalize_incremental(part, &mut out).expect("in range");
                    }
                    stream.flush(&mut out);
                    black_box(out)
                });
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. transcode -- decode and encode per charset
// ---------------------------------------------------------------------------

fn bench_transcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcode");
    for (name, text) in corpus() {
        for charset in ["UTF-8", "UTF-16LE", "UTF-32BE"] {
            let enc = encodings::lookup(charset).expect("known charset");
            let mut bytes = Vec::new();
            encode(&text, enc, ErrorMode::Strict, &mut bytes).expect("well-formed");
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(BenchmarkId::new(format!("decode/{}", charset), name), &bytes, |b, bytes| {
                let mut out = Vec::with_capacity(text.len());
                b.iter(|| {
                    out.clear();
                    decode_to_vec(black_box(bytes), enc, ErrorMode::Substitute, &mut out).expect("lenient");
                    black_box(&out);
                });
            });
            group.bench_with_input(BenchmarkId::new(format!("encode/{}", charset), name), &text, |b, text| {
                let mut out = Vec::with_capacity(bytes.len());
                b.iter(|| {
                    out.clear();
                    encode(black_box(text), enc, ErrorMode::Substitute, &mut out).expect("lenient");
                    black_box(&out);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_quick_check,
    bench_streaming,
    bench_transcode
);
criterion_main!(benches);
