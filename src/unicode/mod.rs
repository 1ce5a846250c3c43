// unicode/mod.rs - Port of the property accessors in uchar.c / normalizer2impl.cpp
// Per-code-point normalization properties backed by the Property Table.

pub mod hangul;
mod table;

pub use table::{data_checksum, DataError, PropertyTable, DATA_MAGIC, FORMAT_MAJOR, HEADER_LEN};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::utypes::*;
use crate::uversion::UVersionInfo;

bitflags! {
    /// Quick-check and composition flags stored in each property record.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const NFD_QC_NO = 1 << 0;
        const NFKD_QC_NO = 1 << 1;
        const NFC_QC_NO = 1 << 2;
        const NFC_QC_MAYBE = 1 << 3;
        const NFKC_QC_NO = 1 << 4;
        const NFKC_QC_MAYBE = 1 << 5;
        /// The code point never results from canonical composition
        /// (Full_Composition_Exclusion).
        const COMP_EXCLUSION = 1 << 6;
    }
}

impl PropertyFlags {
    /// The quick-check "No" bit for `form`.
    #[inline]
    pub fn qc_no(form: NormalizationForm) -> PropertyFlags {
        match form {
            NormalizationForm::Nfc => PropertyFlags::NFC_QC_NO,
            NormalizationForm::Nfd => PropertyFlags::NFD_QC_NO,
            NormalizationForm::Nfkc => PropertyFlags::NFKC_QC_NO,
            NormalizationForm::Nfkd => PropertyFlags::NFKD_QC_NO,
        }
    }

    /// The quick-check "Maybe" bit for `form` (empty for decomposed forms).
    #[inline]
    pub fn qc_maybe(form: NormalizationForm) -> PropertyFlags {
        match form {
            NormalizationForm::Nfc => PropertyFlags::NFC_QC_MAYBE,
            NormalizationForm::Nfkc => PropertyFlags::NFKC_QC_MAYBE,
            NormalizationForm::Nfd | NormalizationForm::Nfkd => PropertyFlags::empty(),
        }
    }
}

/// The Unicode `Decomposition_Type` property (UCHAR_DECOMPOSITION_TYPE).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DecompositionType {
    #[default]
    None = 0,
    Canonical = 1,
    Compat = 2,
    Circle = 3,
    Final = 4,
    Font = 5,
    Fraction = 6,
    Initial = 7,
    Isolated = 8,
    Medial = 9,
    Narrow = 10,
    NoBreak = 11,
    Small = 12,
    Square = 13,
    Sub = 14,
    Super = 15,
    Vertical = 16,
    Wide = 17,
}

impl DecompositionType {
    pub fn from_u8(value: u8) -> Option<DecompositionType> {
        use DecompositionType::*;
        const ALL: [DecompositionType; 18] = [
            None, Canonical, Compat, Circle, Final, Font, Fraction, Initial, Isolated, Medial,
            Narrow, NoBreak, Small, Square, Sub, Super, Vertical, Wide,
        ];
        ALL.get(value as usize).copied()
    }

    /// Short property value alias as in PropertyValueAliases.txt.
    pub fn alias(self) -> &'static str {
        use DecompositionType::*;
        match self {
            None => "None",
            Canonical => "Can",
            Compat => "Com",
            Circle => "Enc",
            Final => "Fin",
            Font => "Font",
            Fraction => "Fra",
            Initial => "Init",
            Isolated => "Iso",
            Medial => "Med",
            Narrow => "Nar",
            NoBreak => "Nb",
            Small => "Sml",
            Square => "Sqr",
            Sub => "Sub",
            Super => "Sup",
            Vertical => "Vert",
            Wide => "Wide",
        }
    }
}

/// Normalization properties of one code point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Canonical_Combining_Class.
    pub ccc: u8,
    pub flags: PropertyFlags,
    pub decomposition_type: DecompositionType,
    /// Length of the single-step decomposition mapping, 0 for none.
    pub mapping_len: u8,
    pub mapping_offset: u16,
}

impl PropertyRecord {
    /// The record of unassigned code points and of everything that is
    /// unaffected by normalization.
    pub const DEFAULT: PropertyRecord = PropertyRecord {
        ccc: 0,
        flags: PropertyFlags::empty(),
        decomposition_type: DecompositionType::None,
        mapping_len: 0,
        mapping_offset: 0,
    };

    #[inline]
    pub fn has_canonical_mapping(&self) -> bool {
        self.decomposition_type == DecompositionType::Canonical
    }

    #[inline]
    pub fn has_mapping(&self, compat: bool) -> bool {
        self.mapping_len != 0 && (compat || self.has_canonical_mapping())
    }
}

/// A decomposition result. Almost all mappings fit inline.
pub type Decomposition = SmallVec<[UChar32; 4]>;

impl PropertyTable {
    /// Unicode version of the data.
    pub fn unicode_version(&self) -> UVersionInfo {
        self.version
    }

    #[inline]
    pub fn combining_class(&self, c: UChar32) -> u8 {
        self.lookup(c).ccc
    }

    pub fn decomposition_type(&self, c: UChar32) -> DecompositionType {
        if hangul::is_hangul(c) {
            return DecompositionType::Canonical;
        }
        self.lookup(c).decomposition_type
    }

    /// Per-code-point quick check (NFC_Quick_Check and friends).
    pub fn quick_check(&self, c: UChar32, form: NormalizationForm) -> UNormalizationCheckResult {
        let flags = self.lookup(c).flags;
        if flags.intersects(PropertyFlags::qc_no(form)) {
            UNormalizationCheckResult::No
        } else if flags.intersects(PropertyFlags::qc_maybe(form)) {
            UNormalizationCheckResult::Maybe
        } else {
            UNormalizationCheckResult::Yes
        }
    }

    /// Is `c` excluded from canonical composition?
    #[inline]
    pub fn is_composition_excluded(&self, c: UChar32) -> bool {
        self.lookup(c).flags.contains(PropertyFlags::COMP_EXCLUSION)
    }

    #[inline]
    fn mapping_of(&self, rec: &PropertyRecord) -> &[UChar32] {
        let start = rec.mapping_offset as usize;
        &self.mapping[start..start + rec.mapping_len as usize]
    }

    fn raw_decomposition(&self, c: UChar32, compat: bool) -> Option<Decomposition> {
        if hangul::is_hangul(c) {
            return Some(Decomposition::from_slice(&hangul::raw_decompose(c)));
        }
        let rec = self.lookup(c);
        if rec.has_mapping(compat) {
            Some(Decomposition::from_slice(self.mapping_of(rec)))
        } else {
            None
        }
    }

    /// One step of the canonical decomposition mapping, as listed in
    /// UnicodeData.txt (Hangul: LVT to LV+T, LV to L+V).
    pub fn canonical_decomposition(&self, c: UChar32) -> Option<Decomposition> {
        self.raw_decomposition(c, false)
    }

    /// One step of the compatibility (or canonical) decomposition mapping.
    pub fn compatibility_decomposition(&self, c: UChar32) -> Option<Decomposition> {
        self.raw_decomposition(c, true)
    }

    /// The full canonical decomposition of `c` (recursively expanded, not
    /// reordered). Returns `None` when `c` does not decompose.
    pub fn full_canonical_decomposition(&self, c: UChar32) -> Option<Decomposition> {
        self.full_decomposition(c, false)
    }

    /// The full compatibility decomposition of `c`.
    pub fn full_compatibility_decomposition(&self, c: UChar32) -> Option<Decomposition> {
        self.full_decomposition(c, true)
    }

    fn full_decomposition(&self, c: UChar32, compat: bool) -> Option<Decomposition> {
        if !hangul::is_hangul(c) && !self.lookup(c).has_mapping(compat) {
            return None;
        }
        let mut out = Decomposition::new();
        self.for_each_decomposed(c, compat, &mut |d| out.push(d));
        Some(out)
    }

    /// Feed the full decomposition of `c` to `sink`, or `c` itself when it
    /// does not decompose.
    pub fn for_each_decomposed<F: FnMut(UChar32)>(&self, c: UChar32, compat: bool, sink: &mut F) {
        if hangul::is_hangul(c) {
            let (jamo, n) = hangul::decompose(c);
            jamo[..n].iter().for_each(|&j| sink(j));
            return;
        }
        let rec = self.lookup(c);
        if rec.has_mapping(compat) {
            for &d in self.mapping_of(rec) {
                self.for_each_decomposed(d, compat, sink);
            }
        } else {
            sink(c);
        }
    }

    /// The primary composite of `a` + `b`, if there is one.
    pub fn compose_pair(&self, a: UChar32, b: UChar32) -> Option<UChar32> {
        if let Some(s) = hangul::compose(a, b) {
            return Some(s);
        }
        let i = self
            .compositions
            .binary_search_by(|&(first, second, _)| (first, second).cmp(&(a, b)))
            .ok()?;
        let composite = self.compositions[i].2;
        if self.is_composition_excluded(composite) {
            None
        } else {
            Some(composite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::udata::u_init;

    #[test]
    fn combining_classes() {
        let t = u_init().unwrap();
        assert_eq!(t.combining_class(0x41), 0);
        assert_eq!(t.combining_class(0x301), 230);
        assert_eq!(t.combining_class(0x323), 220);
        assert_eq!(t.combining_class(0x110000), 0);
    }

    #[test]
    fn decomposition_types() {
        let t = u_init().unwrap();
        assert_eq!(t.decomposition_type(0xe9), DecompositionType::Canonical);
        assert_eq!(t.decomposition_type(0xfb01), DecompositionType::Compat);
        assert_eq!(t.decomposition_type(0x2460), DecompositionType::Circle);
        assert_eq!(t.decomposition_type(0xbd), DecompositionType::Fraction);
        assert_eq!(t.decomposition_type(0xac00), DecompositionType::Canonical);
        assert_eq!(t.decomposition_type(0x41), DecompositionType::None);
        assert_eq!(DecompositionType::from_u8(17), Some(DecompositionType::Wide));
        assert_eq!(DecompositionType::from_u8(18), None);
        assert_eq!(DecompositionType::NoBreak.alias(), "Nb");
    }

    #[test]
    fn decompositions() {
        let t = u_init().unwrap();
        // U+1E69 LATIN SMALL LETTER S WITH DOT BELOW AND DOT ABOVE
        assert_eq!(t.canonical_decomposition(0x1e69).as_deref(), Some(&[0x1e63, 0x307][..]));
        assert_eq!(
            t.full_canonical_decomposition(0x1e69).as_deref(),
            Some(&[0x73, 0x323, 0x307][..])
        );
        assert_eq!(t.canonical_decomposition(0xfb01), None);
        assert_eq!(t.compatibility_decomposition(0xfb01).as_deref(), Some(&[0x66, 0x69][..]));
        assert_eq!(t.full_canonical_decomposition(0x41), None);
        assert_eq!(
            t.full_compatibility_decomposition(0xac01).as_deref(),
            Some(&[0x1100, 0x1161, 0x11a8][..])
        );
    }

    #[test]
    fn per_code_point_quick_check() {
        use NormalizationForm::*;
        use UNormalizationCheckResult::*;
        let t = u_init().unwrap();
        assert_eq!(t.quick_check(0xe9, Nfc), Yes);
        assert_eq!(t.quick_check(0xe9, Nfd), No);
        assert_eq!(t.quick_check(0x301, Nfc), Maybe);
        assert_eq!(t.quick_check(0x301, Nfd), Yes);
        assert_eq!(t.quick_check(0xfb01, Nfkc), No);
        assert_eq!(t.quick_check(0xfb01, Nfc), Yes);
        assert_eq!(t.quick_check(0x1161, Nfc), Maybe);
        // U+0958 DEVANAGARI LETTER QA is a composition exclusion.
        assert_eq!(t.quick_check(0x958, Nfc), No);
    }

    #[test]
    fn composition() {
        let t = u_init().unwrap();
        assert_eq!(t.compose_pair(0x65, 0x301), Some(0xe9));
        assert_eq!(t.compose_pair(0x1100, 0x1161), Some(0xac00));
        assert_eq!(t.compose_pair(0xac00, 0x11a8), Some(0xac01));
        // U+0915 U+093C would form the excluded U+0958.
        assert_eq!(t.compose_pair(0x915, 0x93c), None);
        assert_eq!(t.compose_pair(0x41, 0x42), None);
        assert!(t.is_composition_excluded(0x958));
    }

    #[test]
    fn version() {
        assert_eq!(u_init().unwrap().unicode_version().major(), 14);
    }
}
