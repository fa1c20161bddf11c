//! Fixed-width bit packing shared by the fixed header and connect flags.
//!
//! Bit positions count from 0 (least significant). A field is `width` bits
//! starting at `shift`.

/// Read a single bit.
pub const fn flag(byte: u8, bit: u8) -> bool {
    byte & (1 << bit) != 0
}

/// Return `byte` with a single bit set or cleared.
pub const fn with_flag(byte: u8, bit: u8, on: bool) -> u8 {
    if on { byte | (1 << bit) } else { byte & !(1 << bit) }
}

const fn mask(width: u8) -> u8 {
    ((1u16 << width) - 1) as u8
}

/// Read a multi-bit field.
pub const fn field(byte: u8, shift: u8, width: u8) -> u8 {
    (byte >> shift) & mask(width)
}

/// Return `byte` with a multi-bit field replaced. Excess value bits are dropped.
pub const fn with_field(byte: u8, shift: u8, width: u8, value: u8) -> u8 {
    let m = mask(width) << shift;
    (byte & !m) | ((value << shift) & m)
}
