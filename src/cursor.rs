//! Forward-only reader over an immutable byte buffer.
//!
//! [`ByteCursor`] is `Copy`: lookahead that spans more than one value is done
//! by reading from a copy and dropping it, which leaves the original position
//! untouched.
//!
//! ```rust
//! use clausewitz_mesh::ByteCursor;
//!
//! let mut cursor = ByteCursor::new(b"[[mesh\0");
//! assert_eq!(cursor.peek_depth(), 2);
//! assert_eq!(cursor.position(), 0);
//!
//! assert_eq!(cursor.next_char().unwrap(), '[');
//! assert_eq!(cursor.next_char().unwrap(), '[');
//! assert_eq!(cursor.read_null_terminated_string().unwrap(), "mesh");
//! assert!(cursor.is_at_end(0));
//! ```

use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Position-tracking reader over a byte slice.
///
/// All multi-byte values are little-endian. No read ever moves past the end of
/// the buffer; a read that would is reported as [`Error::TruncatedInput`].
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if `position + lookahead` reaches the end of the buffer.
    pub fn is_at_end(&self, lookahead: usize) -> bool {
        self.position + lookahead >= self.data.len()
    }

    fn fixed(&mut self, width: usize, peek: bool) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < width {
            return Err(Error::truncated(self.position, width - remaining));
        }
        let bytes = &self.data[self.position..self.position + width];
        if !peek {
            self.position += width;
        }
        Ok(bytes)
    }

    pub fn next_u8(&mut self) -> Result<u8> {
        Ok(self.fixed(1, false)?[0])
    }

    pub fn peek_u8(&self) -> Result<u8> {
        let mut probe = *self;
        Ok(probe.fixed(1, true)?[0])
    }

    pub fn next_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.fixed(4, false)?))
    }

    pub fn peek_i32(&self) -> Result<i32> {
        let mut probe = *self;
        Ok(LittleEndian::read_i32(probe.fixed(4, true)?))
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.fixed(4, false)?))
    }

    pub fn peek_u32(&self) -> Result<u32> {
        let mut probe = *self;
        Ok(LittleEndian::read_u32(probe.fixed(4, true)?))
    }

    /// Reads an `f32` from its raw bits, so NaN payloads survive untouched.
    pub fn next_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.fixed(4, false)?))
    }

    pub fn peek_f32(&self) -> Result<f32> {
        let mut probe = *self;
        Ok(LittleEndian::read_f32(probe.fixed(4, true)?))
    }

    /// Reads one byte as a Latin-1 character.
    pub fn next_char(&mut self) -> Result<char> {
        self.next_u8().map(char::from)
    }

    pub fn peek_char(&self) -> Result<char> {
        self.peek_u8().map(char::from)
    }

    fn null_terminated(&mut self, peek: bool) -> Result<String> {
        let rest = &self.data[self.position..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(Error::truncated(self.data.len(), 1));
        };
        let value = rest[..len].iter().copied().map(char::from).collect();
        if !peek {
            self.position += len + 1;
        }
        Ok(value)
    }

    /// Reads bytes up to and including the next zero byte.
    ///
    /// The terminator is consumed but not returned. Bytes map to Latin-1
    /// characters one for one.
    pub fn read_null_terminated_string(&mut self) -> Result<String> {
        self.null_terminated(false)
    }

    /// Like [`read_null_terminated_string`](Self::read_null_terminated_string)
    /// but leaves the position where it was.
    pub fn peek_null_terminated_string(&self) -> Result<String> {
        let mut probe = *self;
        probe.null_terminated(true)
    }

    /// Counts the consecutive `[` bytes starting at the current position.
    ///
    /// This is the nesting depth of the object that starts here. The cursor
    /// itself does not move.
    pub fn peek_depth(&self) -> usize {
        let mut probe = *self;
        let mut depth = 0;
        while probe.peek_u8() == Ok(b'[') {
            probe.position += 1;
            depth += 1;
        }
        depth
    }
}
