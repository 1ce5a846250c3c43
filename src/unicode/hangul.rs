// unicode/hangul.rs - Port of the Hangul helpers in normalizer2impl.h
// Precomposed Hangul syllables decompose and compose arithmetically
// (Unicode 3.12 "Conjoining Jamo Behavior") instead of through the table.

use crate::utypes::UChar32;

pub const S_BASE: UChar32 = 0xac00;
pub const L_BASE: UChar32 = 0x1100;
pub const V_BASE: UChar32 = 0x1161;
pub const T_BASE: UChar32 = 0x11a7;

pub const L_COUNT: UChar32 = 19;
pub const V_COUNT: UChar32 = 21;
pub const T_COUNT: UChar32 = 28;
pub const N_COUNT: UChar32 = V_COUNT * T_COUNT;
pub const S_COUNT: UChar32 = L_COUNT * N_COUNT;

pub const S_LIMIT: UChar32 = S_BASE + S_COUNT;

#[inline]
pub fn is_hangul(c: UChar32) -> bool {
    (S_BASE..S_LIMIT).contains(&c)
}

/// Is `c` an LV syllable (no trailing consonant)?
#[inline]
pub fn is_hangul_lv(c: UChar32) -> bool {
    is_hangul(c) && (c - S_BASE) % T_COUNT == 0
}

#[inline]
pub fn is_jamo_l(c: UChar32) -> bool {
    (L_BASE..L_BASE + L_COUNT).contains(&c)
}

#[inline]
pub fn is_jamo_v(c: UChar32) -> bool {
    (V_BASE..V_BASE + V_COUNT).contains(&c)
}

/// Trailing consonants start one past `T_BASE`.
#[inline]
pub fn is_jamo_t(c: UChar32) -> bool {
    (T_BASE + 1..T_BASE + T_COUNT).contains(&c)
}

/// Full decomposition of a syllable into two or three jamo.
/// Returns the jamo and how many of them are used.
pub fn decompose(c: UChar32) -> ([UChar32; 3], usize) {
    let s = c - S_BASE;
    let l = L_BASE + s / N_COUNT;
    let v = V_BASE + (s % N_COUNT) / T_COUNT;
    let t = s % T_COUNT;
    if t == 0 {
        ([l, v, 0], 2)
    } else {
        ([l, v, T_BASE + t], 3)
    }
}

/// One decomposition step: LVT to (LV, T) and LV to (L, V).
pub fn raw_decompose(c: UChar32) -> [UChar32; 2] {
    let s = c - S_BASE;
    let t = s % T_COUNT;
    if t == 0 {
        [L_BASE + s / N_COUNT, V_BASE + (s % N_COUNT) / T_COUNT]
    } else {
        [c - t, T_BASE + t]
    }
}

/// Compose L+V into LV, or LV+T into LVT.
pub fn compose(a: UChar32, b: UChar32) -> Option<UChar32> {
    if is_jamo_l(a) && is_jamo_v(b) {
        return Some(S_BASE + ((a - L_BASE) * N_COUNT + (b - V_BASE) * T_COUNT));
    }
    if is_hangul_lv(a) && is_jamo_t(b) {
        return Some(a + (b - T_BASE));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syllable_round_trip() {
        // U+D4DB HANGUL SYLLABLE PWILH
        let (jamo, n) = decompose(0xd4db);
        assert_eq!(&jamo[..n], &[0x1111, 0x1171, 0x11b6]);
        let lv = compose(jamo[0], jamo[1]).unwrap();
        assert_eq!(lv, 0xd4cc);
        assert_eq!(compose(lv, jamo[2]), Some(0xd4db));
        assert_eq!(raw_decompose(0xd4db), [0xd4cc, 0x11b6]);
        assert_eq!(raw_decompose(0xd4cc), [0x1111, 0x1171]);
    }

    #[test]
    fn boundaries() {
        assert!(is_hangul(0xac00));
        assert!(is_hangul(0xd7a3));
        assert!(!is_hangul(0xd7a4));
        // T_BASE itself is not a trailing consonant.
        assert_eq!(compose(0xac00, T_BASE), None);
        // LVT + T does not compose.
        assert_eq!(compose(0xac01, 0x11a8), None);
        assert_eq!(decompose(0xac00), ([0x1100, 0x1161, 0], 2));
    }
}
