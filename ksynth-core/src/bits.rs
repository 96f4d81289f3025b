//! Bit and nybble helpers
//!
//! Every packed byte in the three formats is taken apart and put back
//! together through these functions:
//!
//! - **Flag + value**: bit 7 is a boolean, bits 0-6 a ranged value
//!   ([`split_flag`] / [`join_flag`])
//! - **Nybble pairs**: two 4-bit fields in one byte ([`high_nybble`],
//!   [`low_nybble`], [`nybbles_to_byte`])
//! - **Multi-flag bytes** and **sub-ranges**: single bits ([`is_bit_set`],
//!   [`with_bit`]) and N-bit fields ([`bit_range`], [`set_bit_range`])

/// Bit 7, used as a flag in front of a 7-bit value
pub const FLAG_BIT: u8 = 7;

/// Check whether bit `n` (0 = LSB) is set
#[inline]
pub const fn is_bit_set(byte: u8, n: u8) -> bool {
    byte & (1 << n) != 0
}

/// Set bit `n`
#[inline]
pub const fn set_bit(byte: u8, n: u8) -> u8 {
    byte | (1 << n)
}

/// Clear bit `n`
#[inline]
pub const fn clear_bit(byte: u8, n: u8) -> u8 {
    byte & !(1 << n)
}

/// Set or clear bit `n` depending on `on`
#[inline]
pub const fn with_bit(byte: u8, n: u8, on: bool) -> u8 {
    if on { set_bit(byte, n) } else { clear_bit(byte, n) }
}

/// Upper four bits, shifted down
#[inline]
pub const fn high_nybble(byte: u8) -> u8 {
    byte >> 4
}

/// Lower four bits
#[inline]
pub const fn low_nybble(byte: u8) -> u8 {
    byte & 0x0F
}

/// Combine two nybbles into a byte (both are masked to 4 bits)
#[inline]
pub const fn nybbles_to_byte(high: u8, low: u8) -> u8 {
    ((high & 0x0F) << 4) | (low & 0x0F)
}

#[inline]
const fn field_mask(len: u8) -> u8 {
    if len >= 8 { 0xFF } else { (1u8 << len) - 1 }
}

/// Extract `len` bits starting at bit `start`
#[inline]
pub const fn bit_range(byte: u8, start: u8, len: u8) -> u8 {
    (byte >> start) & field_mask(len)
}

/// Replace `len` bits starting at bit `start` with `value` (masked to `len` bits)
#[inline]
pub const fn set_bit_range(byte: u8, start: u8, len: u8, value: u8) -> u8 {
    let mask = field_mask(len) << start;
    (byte & !mask) | ((value << start) & mask)
}

/// Split a flag byte into (bit 7, bits 0-6)
#[inline]
pub const fn split_flag(byte: u8) -> (bool, u8) {
    (is_bit_set(byte, FLAG_BIT), byte & 0x7F)
}

/// Put a flag into bit 7 of a 7-bit value
#[inline]
pub const fn join_flag(flag: bool, value: u8) -> u8 {
    with_bit(value & 0x7F, FLAG_BIT, flag)
}
