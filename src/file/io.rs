//! Little-endian, bounds-checked reading and writing of primitive values.
//!
//! The persisted container image is a flat little-endian byte stream. Reads go through
//! [`read_le_at`], which advances an offset and returns [`crate::Error::OutOfBounds`] instead of
//! panicking when the buffer runs short. Writes append to a growable buffer, plus the compressed
//! unsigned integer form used for every length and id in the image.
//!
//! # Compressed unsigned integers
//!
//! | Value range              | Encoding                                 |
//! |--------------------------|------------------------------------------|
//! | `0x00 ..= 0x7F`          | `0xxxxxxx`                               |
//! | `0x80 ..= 0x3FFF`        | `10xxxxxx xxxxxxxx`                      |
//! | `0x4000 ..= 0x1FFF_FFFF` | `110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx`    |
//!
//! Multi-byte forms are stored most significant byte first.

use crate::{Error::OutOfBounds, Result};

/// Largest value representable by the compressed unsigned integer encoding.
pub const COMPRESSED_UINT_MAX: u32 = 0x1FFF_FFFF;

/// Trait for primitive types that can be read from and written to a little-endian image.
pub trait ImageIO: Sized {
    /// Fixed-size byte array for this type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_image_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl ImageIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_image_io! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
    f32 => 4,
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing it.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: ImageIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Appends `value` to `buffer` in little-endian byte order.
pub fn write_le<T: ImageIO>(buffer: &mut Vec<u8>, value: T) {
    buffer.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Appends `value` to `buffer` using the compressed unsigned integer encoding.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `value` exceeds [`COMPRESSED_UINT_MAX`].
pub fn write_compressed_uint(buffer: &mut Vec<u8>, value: u32) -> Result<()> {
    if value <= 0x7F {
        buffer.push(value as u8);
    } else if value <= 0x3FFF {
        buffer.push(0x80 | (value >> 8) as u8);
        buffer.push(value as u8);
    } else if value <= COMPRESSED_UINT_MAX {
        buffer.push(0xC0 | (value >> 24) as u8);
        buffer.push((value >> 16) as u8);
        buffer.push((value >> 8) as u8);
        buffer.push(value as u8);
    } else {
        return Err(malformed_error!(
            "Value {:#x} exceeds the compressed uint range",
            value
        ));
    }

    Ok(())
}

/// Appends a `usize` length or index in compressed form.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `value` does not fit the compressed range.
pub fn write_compressed_len(buffer: &mut Vec<u8>, value: usize) -> Result<()> {
    let Ok(value) = u32::try_from(value) else {
        return Err(malformed_error!("Length {} exceeds the compressed uint range", value));
    };
    write_compressed_uint(buffer, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn read_le_sequence() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0xFF];
        let mut offset = 0;

        assert_eq!(read_le_at::<u16>(&data, &mut offset).unwrap(), 1);
        assert_eq!(read_le_at::<u32>(&data, &mut offset).unwrap(), 2);
        assert_eq!(read_le_at::<u8>(&data, &mut offset).unwrap(), 0xFF);
        assert_eq!(offset, 7);
    }

    #[test]
    fn read_le_out_of_bounds() {
        let data = [0x01, 0x02, 0x03];
        let mut offset = 0;
        assert!(matches!(
            read_le_at::<u32>(&data, &mut offset),
            Err(Error::OutOfBounds)
        ));
        assert_eq!(offset, 0);

        let mut offset = usize::MAX;
        assert!(matches!(
            read_le_at::<u8>(&data, &mut offset),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn write_le_values() {
        let mut buffer = Vec::new();
        write_le(&mut buffer, 0x0102_u16);
        write_le(&mut buffer, 1.0_f32);
        assert_eq!(buffer, [0x02, 0x01, 0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn write_compressed() {
        let cases: [(u32, &[u8]); 6] = [
            (0x03, &[0x03]),
            (0x7F, &[0x7F]),
            (0x80, &[0x80, 0x80]),
            (0x3FFF, &[0xBF, 0xFF]),
            (0x4000, &[0xC0, 0x00, 0x40, 0x00]),
            (0x1FFF_FFFF, &[0xDF, 0xFF, 0xFF, 0xFF]),
        ];

        for (value, expected) in cases {
            let mut buffer = Vec::new();
            write_compressed_uint(&mut buffer, value).unwrap();
            assert_eq!(buffer, expected, "value {value:#x}");
        }

        let mut buffer = Vec::new();
        assert!(write_compressed_uint(&mut buffer, 0x2000_0000).is_err());
    }
}
