//! Bit-pattern helpers shared by oracles, DUT models and reports.
//!
//! Operands travel through the harness in a `u32` container; these helpers
//! narrow them to register widths and reinterpret them as IEEE-754 values.

/// Returns a mask with the low `width` bits set.
///
/// Widths of 32 or more yield `u32::MAX`.
pub const fn width_mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Returns the most significant bit of a `width`-bit value.
pub const fn msb(value: u32, width: u8) -> bool {
    (value >> (width - 1)) & 1 == 1
}

/// Encodes an `f32` as its IEEE-754 bit pattern.
#[inline]
pub const fn f32_bits(value: f32) -> u32 {
    value.to_bits()
}

/// Decodes an IEEE-754 bit pattern as `f32`.
#[inline]
pub const fn bits_f32(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Formats a value as zero-padded hex sized for a `width`-bit register.
pub fn hex(value: u32, width: u8) -> String {
    let digits = usize::from(width.div_ceil(4)).max(1);
    format!("0x{value:0digits$X}")
}
