//! Configuration options for `.mesh` decoding and encoding.
//!
//! ## Examples
//!
//! ```rust
//! use clausewitz_mesh::{MeshOptions, from_slice_with_options};
//!
//! // Reject files nested deeper than 16 levels and validate string headers.
//! let options = MeshOptions::new()
//!     .with_max_depth(16)
//!     .with_strict_strings(true);
//!
//! let document = from_slice_with_options(b"@@b@", &options).unwrap();
//! assert!(document.nodes.is_empty());
//! ```

/// Default limit for both bracket depth and object nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for `.mesh` decoding and encoding.
///
/// # Examples
///
/// ```rust
/// use clausewitz_mesh::MeshOptions;
///
/// let options = MeshOptions::new();
/// assert_eq!(options.max_depth, 64);
/// assert!(!options.strict_strings);
/// assert!(!options.write_header);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MeshOptions {
    /// Maximum nesting depth before decoding or encoding fails with
    /// [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded).
    pub max_depth: usize,
    /// Check the declared byte count of string properties.
    pub strict_strings: bool,
    /// Prepend the `@@b@` header when encoding.
    pub write_header: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        MeshOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_strings: false,
            write_header: false,
        }
    }
}

impl MeshOptions {
    /// Creates default options (lenient strings, no header, depth limit 64).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clausewitz_mesh::MeshOptions;
    ///
    /// let options = MeshOptions::new().with_max_depth(8);
    /// assert_eq!(options.max_depth, 8);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables validation of string property headers.
    ///
    /// In strict mode the declared byte count (the second field) must equal the
    /// string length including its terminator. The first field is read but
    /// never checked.
    #[must_use]
    pub fn with_strict_strings(mut self, strict: bool) -> Self {
        self.strict_strings = strict;
        self
    }

    /// Prepends the `@@b@` header to encoded output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clausewitz_mesh::{Document, MeshOptions, to_vec_with_options};
    ///
    /// let options = MeshOptions::new().with_header(true);
    /// let bytes = to_vec_with_options(&Document::default(), &options).unwrap();
    /// assert_eq!(bytes, b"@@b@");
    /// ```
    #[must_use]
    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }
}
