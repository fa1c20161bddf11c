//! MQTT primitive encoding/decoding.
//!
//! Readers take any [`Buf`] as the byte source and writers any [`BufMut`] as
//! the sink. Writers check sink capacity before touching it, so a fixed-size
//! sink never panics on overflow.

use bytes::{Buf, BufMut, Bytes};

use crate::error::{Error, Result};

/// Largest value representable by the 4-byte remaining length encoding.
pub const MAX_REMAINING_LENGTH: u32 = 268_435_455;

/// Maximum number of bytes in a remaining length encoding.
pub const MAX_REMAINING_LENGTH_BYTES: usize = 4;

fn ensure_capacity<B: BufMut>(sink: &B, required: usize) -> Result<()> {
    let available = sink.remaining_mut();
    if available < required {
        return Err(Error::BufferTooSmall { required, available });
    }
    Ok(())
}

fn ensure_remaining<B: Buf>(source: &B, needed: usize) -> Result<()> {
    let available = source.remaining();
    if available < needed {
        return Err(Error::TruncatedStream { needed, available });
    }
    Ok(())
}

/// Calculate the number of bytes needed for a remaining length value.
pub const fn remaining_length_len(value: u32) -> usize {
    if value < 128 {
        1
    } else if value < 128 * 128 {
        2
    } else if value < 128 * 128 * 128 {
        3
    } else {
        4
    }
}

/// Write a remaining length as a 1-4 byte variable integer.
pub fn write_remaining_length<B: BufMut>(sink: &mut B, mut value: u32) -> Result<usize> {
    if value > MAX_REMAINING_LENGTH {
        return Err(Error::Encoding(format!(
            "remaining length {} exceeds {}",
            value, MAX_REMAINING_LENGTH
        )));
    }
    let len = remaining_length_len(value);
    ensure_capacity(sink, len)?;

    loop {
        let mut byte = (value % 128) as u8;
        value /= 128;

        if value > 0 {
            byte |= 0x80;
        }

        sink.put_u8(byte);

        if value == 0 {
            break;
        }
    }

    Ok(len)
}

/// Read a remaining length variable integer.
pub fn read_remaining_length<B: Buf>(source: &mut B) -> Result<u32> {
    let mut multiplier = 1u32;
    let mut value = 0u32;

    for _ in 0..MAX_REMAINING_LENGTH_BYTES {
        if !source.has_remaining() {
            return Err(Error::MalformedHeader("remaining length ended early"));
        }
        let byte = source.get_u8();
        value += (byte & 0x7F) as u32 * multiplier;

        if byte & 0x80 == 0 {
            return Ok(value);
        }

        multiplier *= 128;
    }

    Err(Error::MalformedHeader("remaining length exceeds 4 bytes"))
}

/// Write a single byte.
pub fn write_u8<B: BufMut>(sink: &mut B, value: u8) -> Result<()> {
    ensure_capacity(sink, 1)?;
    sink.put_u8(value);
    Ok(())
}

/// Read a single byte.
pub fn read_u8<B: Buf>(source: &mut B) -> Result<u8> {
    ensure_remaining(source, 1)?;
    Ok(source.get_u8())
}

/// Write a 2-byte big-endian u16.
pub fn write_u16<B: BufMut>(sink: &mut B, value: u16) -> Result<()> {
    ensure_capacity(sink, 2)?;
    sink.put_u16(value);
    Ok(())
}

/// Read a 2-byte big-endian u16.
pub fn read_u16<B: Buf>(source: &mut B) -> Result<u16> {
    ensure_remaining(source, 2)?;
    Ok(source.get_u16())
}

/// Encoded size of a length-prefixed string or binary field.
pub const fn prefixed_len(data_len: usize) -> usize {
    2 + data_len
}

/// Write binary data (2-byte length prefix + data).
pub fn write_binary<B: BufMut>(sink: &mut B, data: &[u8]) -> Result<usize> {
    let len = data.len();
    if len > u16::MAX as usize {
        return Err(Error::Encoding(format!(
            "field length {} exceeds {}",
            len,
            u16::MAX
        )));
    }
    ensure_capacity(sink, prefixed_len(len))?;

    sink.put_u16(len as u16);
    sink.put_slice(data);

    Ok(prefixed_len(len))
}

/// Read binary data (2-byte length prefix + data).
pub fn read_binary<B: Buf>(source: &mut B) -> Result<Bytes> {
    let len = read_u16(source)? as usize;
    ensure_remaining(source, len)?;
    Ok(source.copy_to_bytes(len))
}

/// Write a UTF-8 string (2-byte length prefix + data).
pub fn write_string<B: BufMut>(sink: &mut B, s: &str) -> Result<usize> {
    write_binary(sink, s.as_bytes())
}

/// Read a UTF-8 string (2-byte length prefix + data).
pub fn read_string<B: Buf>(source: &mut B) -> Result<String> {
    let raw = read_binary(source)?;
    String::from_utf8(raw.to_vec()).map_err(|_| Error::InvalidUtf8)
}
