/// Number of fractional bits of a fixed-point position.
pub const FRACTION_BITS: u32 = 12;

/// The value `1.0` in fixed point.
pub const INT_MULTIPLE: i32 = 1 << FRACTION_BITS;

/// Mask selecting the fractional part of a fixed-point position.
pub const FRACTION_MASK: i32 = INT_MULTIPLE - 1;

/// Two fixed-point weights are multiplied together in the bilinear blend,
/// so the result has to be shifted back by twice the fractional bits.
pub const RECOVERY_BITS: u32 = 2 * FRACTION_BITS;

/// Convert a real number to fixed point, truncating toward zero.
#[inline]
pub fn to_fixed(value: f64) -> i32 {
    (value * INT_MULTIPLE as f64) as i32
}

/// Integer part of a fixed-point position, rounding toward negative infinity.
#[inline]
pub fn integer_part(value: i32) -> i32 {
    value >> FRACTION_BITS
}

/// Fractional part of a fixed-point position, in `[0, INT_MULTIPLE)`.
#[inline]
pub fn fraction(value: i32) -> i32 {
    value & FRACTION_MASK
}
