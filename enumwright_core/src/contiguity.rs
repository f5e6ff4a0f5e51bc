//! Contiguity analysis over sorted, de-duplicated value sets.
//!
//! Callers hand in a `BTreeSet` so ordering and uniqueness are guaranteed by
//! the type; duplicate detection itself belongs to validation.

use std::collections::BTreeSet;

/// True when the values form one gap-free ascending run.
pub fn is_contiguous_values(values: &BTreeSet<i128>) -> bool {
    values
        .iter()
        .zip(values.iter().skip(1))
        .all(|(a, b)| b.checked_sub(*a) == Some(1))
}

/// True when the set bits of all flags form one unbroken block starting at
/// the lowest set bit.
pub fn is_contiguous_flags(values: &BTreeSet<i128>) -> bool {
    let mask = used_bits_mask(values);
    if mask == 0 {
        return true;
    }
    let shifted = mask >> mask.trailing_zeros();
    shifted & shifted.wrapping_add(1) == 0
}

/// OR of every flag value.
pub fn used_bits_mask(values: &BTreeSet<i128>) -> u128 {
    values.iter().fold(0u128, |mask, v| mask | (*v as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i128]) -> BTreeSet<i128> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_value_runs() {
        assert!(is_contiguous_values(&set(&[0, 1, 2, 3])));
        assert!(!is_contiguous_values(&set(&[0, 1, 3])));
        assert!(is_contiguous_values(&set(&[5])));
        assert!(is_contiguous_values(&set(&[-2, -1, 0, 1])));
        assert!(!is_contiguous_values(&set(&[i128::MIN, i128::MAX])));
    }

    #[test]
    fn test_flag_runs() {
        assert!(is_contiguous_flags(&set(&[1, 2, 4])));
        assert!(!is_contiguous_flags(&set(&[1, 4])));
        assert!(is_contiguous_flags(&set(&[4, 8, 16])));
        assert!(is_contiguous_flags(&set(&[0])));
        assert!(is_contiguous_flags(&set(&[1, 2, 3])));
        assert!(!is_contiguous_flags(&set(&[1, 2, 32])));
    }

    #[test]
    fn test_flag_run_reaching_top_bit() {
        let top = 1i128 << 126;
        assert!(is_contiguous_flags(&set(&[top >> 1, top])));
    }

    #[test]
    fn test_used_bits_mask() {
        assert_eq!(used_bits_mask(&set(&[1, 4, 16])), 21);
        assert_eq!(used_bits_mask(&set(&[])), 0);
    }
}
