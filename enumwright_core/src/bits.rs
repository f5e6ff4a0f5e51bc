//! Bit-width arithmetic for packed storage and transmission.

use crate::config::SizeType;
use crate::types::EnumKind;

/// Number of bits in the binary representation of `x`; zero needs zero bits.
pub const fn storage_bits_required(x: u128) -> u32 {
    u128::BITS - x.leading_zeros()
}

/// Bits needed to tell every member apart.
///
/// Value enums measure the span `max - min`, flags enums the highest set bit
/// of `max`.
pub fn transmission_bits_required(kind: EnumKind, min: i128, max: i128) -> u32 {
    match kind {
        EnumKind::Value => storage_bits_required(span(min, max)),
        EnumKind::Flags => storage_bits_required(max.max(0) as u128),
    }
}

/// `max - min` without overflowing for the full `i128` range.
fn span(min: i128, max: i128) -> u128 {
    (max as u128).wrapping_sub(min as u128)
}

/// Bits a signed field needs to hold both `min` and `max`.
pub fn signed_storage_bits_required(min: i128, max: i128) -> u32 {
    let positive = if max > 0 {
        let bits = storage_bits_required(max as u128);
        // Largest value (bits - 1) unsigned bits can hold; the sign bit eats the top one.
        let limit = (1u128 << (bits - 1)) - 1;
        if max as u128 > limit { bits + 1 } else { bits }
    } else {
        0
    };

    let negative = if min < 0 {
        // -(min + 1) cannot overflow, even for i128::MIN.
        storage_bits_required((-(min + 1)) as u128) + 1
    } else {
        0
    };

    positive.max(negative)
}

/// Storage bits for a value enum on a storage type of the given signedness.
pub fn value_storage_bits_required(min: i128, max: i128, is_signed: bool) -> u32 {
    if is_signed {
        signed_storage_bits_required(min, max)
    } else {
        storage_bits_required(max.max(0) as u128)
    }
}

/// Inclusive range representable by a storage type.
pub fn size_type_range(size_type: &SizeType) -> (i128, i128) {
    let bits = size_type.bits.clamp(1, 128);
    if size_type.is_signed {
        if bits == 128 {
            (i128::MIN, i128::MAX)
        } else {
            let half = 1i128 << (bits - 1);
            (-half, half - 1)
        }
    } else if bits >= 127 {
        // Values are carried as i128, so 127 and 128 bit unsigned types top out alike.
        (0, i128::MAX)
    } else {
        (0, (1i128 << bits) - 1)
    }
}
