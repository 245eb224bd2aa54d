//! Error types for `.mesh` decoding and encoding.
//!
//! Every decode error carries the byte offset at which it was detected. The
//! offset is relative to the body of the file, i.e. after the `@@b@` header
//! has been stripped.
//!
//! ## Error Categories
//!
//! - **Truncation**: a fixed-width or null-terminated read ran off the end
//! - **Property errors**: unknown discriminator, inconsistent string lengths
//! - **Object errors**: an object's properties or children do not match the
//!   layout its kind requires
//! - **Resource errors**: nesting deeper than the configured limit
//! - **Encoding errors**: values that cannot be represented on the wire
//!
//! ## Examples
//!
//! ```rust
//! use clausewitz_mesh::{from_slice, Error};
//!
//! // A property marker followed by nothing.
//! let result = from_slice(b"@@b@!");
//! assert!(matches!(result, Err(Error::TruncatedInput { .. })));
//!
//! if let Err(err) = result {
//!     assert_eq!(err.offset(), Some(1));
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while decoding or encoding a `.mesh` file.
///
/// All variants are fatal to the call that produced them; no partial document is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A read needed more bytes than the buffer had left
    #[error("Truncated input at offset {offset}: needed {needed} more byte(s)")]
    TruncatedInput { offset: usize, needed: usize },

    /// Property discriminator is not one of `i`, `f`, `s`
    #[error("Unknown property type {found:?} at offset {offset}")]
    UnknownPropertyType { offset: usize, found: char },

    /// An object's properties or children do not match its kind
    #[error("Malformed object '{object}' at offset {offset}: expected {expected}")]
    MalformedObject {
        offset: usize,
        object: String,
        expected: String,
    },

    /// Nesting deeper than [`MeshOptions::max_depth`](crate::MeshOptions::max_depth)
    #[error("Nesting depth limit of {limit} exceeded at offset {offset}")]
    DepthLimitExceeded { offset: usize, limit: usize },

    /// Neither a marker nor whitespace inside an object body
    #[error("Unexpected byte 0x{found:02x} at offset {offset}")]
    UnexpectedByte { offset: usize, found: u8 },

    /// Declared string header disagrees with the string that follows (strict mode only)
    #[error("String length mismatch at offset {offset}: declared {declared}, actual {actual}")]
    StringLengthMismatch {
        offset: usize,
        declared: u32,
        actual: u32,
    },

    /// Value cannot be written in the binary format
    #[error("Cannot encode: {0}")]
    Unencodable(String),
}

impl Error {
    /// Creates a truncation error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clausewitz_mesh::Error;
    ///
    /// let err = Error::truncated(12, 4);
    /// assert!(err.to_string().contains("offset 12"));
    /// ```
    pub fn truncated(offset: usize, needed: usize) -> Self {
        Error::TruncatedInput { offset, needed }
    }

    pub fn unknown_property_type(offset: usize, found: char) -> Self {
        Error::UnknownPropertyType { offset, found }
    }

    /// Creates a malformed-object error naming the object and the field that was expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clausewitz_mesh::Error;
    ///
    /// let err = Error::malformed(40, "mesh", "float property 'tangents'");
    /// assert!(err.to_string().contains("expected float property 'tangents'"));
    /// ```
    pub fn malformed(offset: usize, object: &str, expected: &str) -> Self {
        Error::MalformedObject {
            offset,
            object: object.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn depth_limit(offset: usize, limit: usize) -> Self {
        Error::DepthLimitExceeded { offset, limit }
    }

    pub fn unexpected_byte(offset: usize, found: u8) -> Self {
        Error::UnexpectedByte { offset, found }
    }

    /// Creates an encoding error.
    pub fn unencodable<T: fmt::Display>(msg: T) -> Self {
        Error::Unencodable(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Byte offset at which a decode error was detected.
    ///
    /// Returns `None` for encode and I/O errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::TruncatedInput { offset, .. }
            | Error::UnknownPropertyType { offset, .. }
            | Error::MalformedObject { offset, .. }
            | Error::DepthLimitExceeded { offset, .. }
            | Error::UnexpectedByte { offset, .. }
            | Error::StringLengthMismatch { offset, .. } => Some(*offset),
            Error::Io(_) | Error::Unencodable(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_accessor() {
        assert_eq!(Error::truncated(7, 1).offset(), Some(7));
        assert_eq!(Error::depth_limit(3, 64).offset(), Some(3));
        assert_eq!(Error::unencodable("too long").offset(), None);
        assert_eq!(Error::io("closed").offset(), None);
    }

    #[test]
    fn test_display_messages() {
        let err = Error::unknown_property_type(9, 'x');
        assert_eq!(err.to_string(), "Unknown property type 'x' at offset 9");

        let err = Error::unexpected_byte(2, 0x7f);
        assert!(err.to_string().contains("0x7f"));
    }
}
