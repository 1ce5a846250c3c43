// normalizer2impl.rs - Port of normalizer2impl.cpp
// Decomposition with canonical ordering, canonical composition, quick check
// and normalization boundaries over code point buffers.

use crate::unicode::{PropertyFlags, PropertyTable};
use crate::utypes::*;

/// Below this code point nothing decomposes and every combining class is 0.
const MIN_DECOMP_OR_CCC_CP: UChar32 = 0xa0;

/// Appends code points to a buffer, keeping each run of non-starters
/// sorted by combining class (stable insertion sort).
pub struct ReorderingBuffer<'a> {
    table: &'a PropertyTable,
    out: &'a mut Vec<UChar32>,
    /// Everything before this index is fixed.
    reorder_start: usize,
    last_cc: u8,
}

impl<'a> ReorderingBuffer<'a> {
    pub fn new(table: &'a PropertyTable, out: &'a mut Vec<UChar32>) -> Self {
        let reorder_start = out.len();
        ReorderingBuffer {
            table,
            out,
            reorder_start,
            last_cc: 0,
        }
    }

    #[inline]
    fn append_zero_cc(&mut self, c: UChar32) {
        self.out.push(c);
        self.reorder_start = self.out.len();
        self.last_cc = 0;
    }

    pub fn append(&mut self, c: UChar32) {
        let cc = self.table.combining_class(c);
        if cc == 0 {
            self.append_zero_cc(c);
        } else if cc >= self.last_cc {
            self.out.push(c);
            self.last_cc = cc;
        } else {
            let mut i = self.out.len();
            while i > self.reorder_start && self.table.combining_class(self.out[i - 1]) > cc {
                i -= 1;
            }
            self.out.insert(i, c);
        }
    }
}

/// Append the full (canonical or compatibility) decomposition of `src`,
/// canonically ordered.
pub fn decompose(table: &PropertyTable, src: &[UChar32], compat: bool, out: &mut Vec<UChar32>) {
    out.reserve(src.len());
    let mut buffer = ReorderingBuffer::new(table, out);
    for &c in src {
        if c < MIN_DECOMP_OR_CCC_CP {
            buffer.append_zero_cc(c);
        } else {
            table.for_each_decomposed(c, compat, &mut |d| buffer.append(d));
        }
    }
}

/// Canonically compose a decomposed, canonically ordered sequence.
///
/// A mark combines with the last starter unless it is blocked: some
/// character between them has combining class 0 or a class greater than or
/// equal to the mark's own. Two starters combine only when adjacent.
pub fn compose(table: &PropertyTable, src: &[UChar32], out: &mut Vec<UChar32>) {
    out.reserve(src.len());
    let mut starter: Option<usize> = None;
    let mut last_cc: u8 = 0;
    for &c in src {
        let cc = table.combining_class(c);
        if let Some(sp) = starter {
            let adjacent = out.len() - 1 == sp;
            if adjacent || (last_cc != 0 && last_cc < cc) {
                if let Some(composite) = table.compose_pair(out[sp], c) {
                    out[sp] = composite;
                    continue;
                }
            }
        }
        if cc == 0 {
            starter = Some(out.len());
        }
        last_cc = cc;
        out.push(c);
    }
}

/// Append the normalization of `src` under `form`.
pub fn normalize(
    table: &PropertyTable,
    src: &[UChar32],
    form: NormalizationForm,
    out: &mut Vec<UChar32>,
) {
    if form.is_composing() {
        let mut decomposed = Vec::with_capacity(src.len());
        decompose(table, src, form.is_compat(), &mut decomposed);
        compose(table, &decomposed, out);
    } else {
        decompose(table, src, form.is_compat(), out);
    }
}

/// Quick check of a whole sequence: one pass over the quick-check flags
/// and combining classes, stopping at the first definite "No".
pub fn quick_check(
    table: &PropertyTable,
    src: &[UChar32],
    form: NormalizationForm,
) -> UNormalizationCheckResult {
    let no = PropertyFlags::qc_no(form);
    let maybe = PropertyFlags::qc_maybe(form);
    let mut result = UNormalizationCheckResult::Yes;
    let mut last_cc = 0;
    for &c in src {
        if c < MIN_DECOMP_OR_CCC_CP {
            last_cc = 0;
            continue;
        }
        let rec = table.lookup(c);
        if last_cc > rec.ccc && rec.ccc != 0 {
            return UNormalizationCheckResult::No;
        }
        if rec.flags.intersects(no) {
            return UNormalizationCheckResult::No;
        }
        if rec.flags.intersects(maybe) {
            result = UNormalizationCheckResult::Maybe;
        }
        last_cc = rec.ccc;
    }
    result
}

/// Does normalization never interact across a boundary just before `c`?
///
/// Text may be split at such a boundary, each part normalized on its own,
/// and the results concatenated.
pub fn has_boundary_before(table: &PropertyTable, c: UChar32, form: NormalizationForm) -> bool {
    if c < MIN_DECOMP_OR_CCC_CP {
        return true;
    }
    let rec = table.lookup(c);
    if rec.ccc != 0 {
        return false;
    }
    if form.is_composing() {
        !rec
            .flags
            .intersects(PropertyFlags::qc_no(form) | PropertyFlags::qc_maybe(form))
    } else {
        let mut first = None;
        table.for_each_decomposed(c, form.is_compat(), &mut |d| {
            first.get_or_insert(d);
        });
        first.is_some_and(|d| table.combining_class(d) == 0)
    }
}

/// Index of the last boundary in `src` that is not at its start, or 0.
/// Everything before it can be normalized without seeing what follows.
pub fn last_boundary(table: &PropertyTable, src: &[UChar32], form: NormalizationForm) -> usize {
    last_boundary_from(table, src, 1, form)
}

/// Like [`last_boundary`], looking only at indexes from `from` on.
/// Used when `src[..from]` is already known to hold no boundary past 0.
pub fn last_boundary_from(
    table: &PropertyTable,
    src: &[UChar32],
    from: usize,
    form: NormalizationForm,
) -> usize {
    (from.max(1)..src.len())
        .rev()
        .find(|&i| has_boundary_before(table, src[i], form))
        .unwrap_or(0)
}
