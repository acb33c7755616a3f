//! Byte-read primitives
//!
//! These are the only places that touch the buffer. They fail with
//! [`LayoutError::OutOfRange`] instead of panicking on a short buffer.

use crate::error::LayoutError;
use crate::field::{Endian, Scalar};
use crate::value::Value;

/// Read `N` bytes starting at `offset`
fn bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], LayoutError> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(LayoutError::OutOfRange {
            offset,
            width: N,
            len: data.len(),
        })
}

macro_rules! read_number {
    ($ty:ty, $data:expr, $offset:expr, $endian:expr) => {{
        let raw = bytes::<{ size_of::<$ty>() }>($data, $offset)?;
        match $endian {
            Endian::Big => <$ty>::from_be_bytes(raw),
            Endian::Little => <$ty>::from_le_bytes(raw),
        }
    }};
}

/// Read a 16-bit unsigned integer
pub fn read_u16(data: &[u8], offset: usize, endian: Endian) -> Result<u16, LayoutError> {
    Ok(read_number!(u16, data, offset, endian))
}

/// Read a 32-bit unsigned integer
pub fn read_u32(data: &[u8], offset: usize, endian: Endian) -> Result<u32, LayoutError> {
    Ok(read_number!(u32, data, offset, endian))
}

pub(crate) fn scalar(
    data: &[u8],
    offset: usize,
    scalar: Scalar,
    endian: Endian,
) -> Result<Value<'static>, LayoutError> {
    Ok(match scalar {
        Scalar::I8 => Value::I8(read_number!(i8, data, offset, endian)),
        Scalar::U8 => Value::U8(read_number!(u8, data, offset, endian)),
        Scalar::I16 => Value::I16(read_number!(i16, data, offset, endian)),
        Scalar::U16 => Value::U16(read_number!(u16, data, offset, endian)),
        Scalar::I32 => Value::I32(read_number!(i32, data, offset, endian)),
        Scalar::U32 => Value::U32(read_number!(u32, data, offset, endian)),
        Scalar::F32 => Value::F32(read_number!(f32, data, offset, endian)),
        Scalar::F64 => Value::F64(read_number!(f64, data, offset, endian)),
    })
}

/// Fixed-length single-byte string, truncated at the first zero byte.
///
/// Bytes map one-to-one onto chars (Latin-1).
pub(crate) fn string(data: &[u8], offset: usize, len: usize) -> Result<String, LayoutError> {
    let slice = offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(LayoutError::OutOfRange {
            offset,
            width: len,
            len: data.len(),
        })?;

    Ok(slice
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect())
}
