//! Low-level byte stream parser for debug-symbol blobs and CIL method bodies.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data
//! parser for the two binary inputs the location mapper consumes directly: Portable PDB
//! sequence-point blobs and CIL method bodies. All reads are bounds-checked.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser::read_le`] - Read primitive types (little-endian)
//! - [`crate::file::parser::Parser::read_compressed_uint`] - Read compressed unsigned integers
//! - [`crate::file::parser::Parser::read_compressed_int`] - Read compressed signed integers
//! - [`crate::file::parser::Parser::has_more_data`] / [`crate::file::parser::Parser::remaining`]
//!
//! # Usage Examples
//!
//! ```rust
//! use peeker::Parser;
//!
//! // LocalSignature row 0, then a compressed value of 128
//! let blob = [0x00, 0x80, 0x80];
//! let mut parser = Parser::new(&blob);
//!
//! assert_eq!(parser.read_compressed_uint()?, 0);
//! assert_eq!(parser.read_compressed_uint()?, 128);
//! assert!(!parser.has_more_data());
//! # Ok::<(), peeker::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, CilIO},
    Result,
};

/// A generic binary data parser for reading ECMA-335 encoded data.
///
/// `Parser` maintains an internal position cursor and provides bounds checking to prevent
/// buffer overruns when reading malformed or truncated data.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(out_of_bounds_error!());
        }

        self.position += step;
        Ok(())
    }

    /// Read a value of type `T` in little-endian format and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for an invalid leading byte.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use peeker::Parser;
    ///
    /// let mut parser = Parser::new(&[0xBF, 0xFF]);
    /// assert_eq!(parser.read_compressed_uint()?, 0x3FFF);
    /// # Ok::<(), peeker::Error>(())
    /// ```
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        Ok(self.read_compressed_raw()?.0)
    }

    /// Read a compressed signed integer as defined in ECMA-335 II.23.2.
    ///
    /// The value is stored rotated left by one bit with the sign in the least significant
    /// bit; negative values are sign-extended from the width of the encoding (7, 14 or 29
    /// bits).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for invalid encoding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use peeker::Parser;
    ///
    /// let mut parser = Parser::new(&[0x06, 0x7B]);
    /// assert_eq!(parser.read_compressed_int()?, 3);
    /// assert_eq!(parser.read_compressed_int()?, -3);
    /// # Ok::<(), peeker::Error>(())
    /// ```
    pub fn read_compressed_int(&mut self) -> Result<i32> {
        let (raw, width) = self.read_compressed_raw()?;

        #[allow(clippy::cast_possible_wrap)]
        let magnitude = (raw >> 1) as i32;
        if raw & 1 == 0 {
            return Ok(magnitude);
        }

        let bias: i32 = match width {
            1 => 0x40,
            2 => 0x2000,
            _ => 0x1000_0000,
        };
        Ok(magnitude - bias)
    }

    /// Decodes one compressed value, returning it with the number of bytes it occupied.
    fn read_compressed_raw(&mut self) -> Result<(u32, usize)> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok((u32::from(first_byte), 1));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok((value, 2));
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok((value, 4));
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }
}
