//! Little-endian primitive reads over byte slices.
//!
//! Debug-symbol blobs and CIL method bodies are both little-endian streams of fixed-width
//! integers interleaved with ECMA-335 compressed values. This module provides the fixed-width
//! half: the [`CilIO`] trait describing how a primitive is assembled from bytes, and
//! [`read_le_at`] which performs a bounds-checked read and advances an offset cursor.

use crate::Result;

/// Primitive integer types that can be read from a little-endian byte stream.
pub trait CilIO: Sized {
    /// Fixed-size byte array backing this type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Assemble `Self` from little-endian bytes.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cilio {
    ($($ty:ty),*) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cilio!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Safely reads a value of type `T` in little-endian byte order at `offset`.
///
/// On success the offset is advanced past the value that was read.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer does not hold `size_of::<T>()` bytes
/// at `offset`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let end = offset
        .checked_add(type_len)
        .ok_or(out_of_bounds_error!())?;
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}
