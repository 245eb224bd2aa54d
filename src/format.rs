//! `.mesh` Binary Format
//!
//! This module documents the binary layout as read and written by this
//! library. It contains no code.
//!
//! # Overview
//!
//! A file is the four bytes `@@b@` followed by a body. The body is a flat
//! sequence of records, each starting with a marker byte:
//!
//! | marker | record |
//! |--------|--------|
//! | `!` | property |
//! | `[` | object |
//!
//! All multi-byte numbers are little-endian. Strings are single-byte
//! characters terminated by a zero byte.
//!
//! # Properties
//!
//! ```text
//! '!'  u8 name_len  name[name_len]  type  payload
//! ```
//!
//! | type | payload |
//! |------|---------|
//! | `i` | `u32 count`, `count × i32` |
//! | `f` | `u32 count`, `count × f32` |
//! | `s` | `u32 string_count` (always 1), `u32 byte_len` (including terminator), string, `0` |
//!
//! Property names are short on disk. The library exposes descriptive names
//! instead:
//!
//! | on disk | decoded |
//! |---------|---------|
//! | `p` | `vertices` |
//! | `n` | `normals` |
//! | `ta` | `tangents` |
//! | `u0` | `uv_map` |
//! | `tri` | `faces` |
//!
//! Every other name is kept as is.
//!
//! # Objects
//!
//! ```text
//! '['{depth}  name  0  (property | child object)*
//! ```
//!
//! An object is `depth` consecutive `[` characters, its name, a zero byte,
//! and then its properties and children. There is no count or end marker.
//! When the reader meets another `[` run inside an object it compares the
//! run's length with the current object's depth:
//!
//! - longer: the new object is a child of the current one
//! - equal or shorter: the current object is complete and the new object
//!   belongs to an ancestor
//!
//! # Document layout
//!
//! ```text
//! @@b@
//! !pdxasset i [1, 0]
//! [object
//!   [[hullMeshShape
//!     [[[mesh
//!       !p f ...   !n f ...   !ta f ...   !u0 f ...   !tri i ...
//!       [[[[aabb
//!         !min f [x, y, z]   !max f [x, y, z]
//!       [[[[material
//!         !shader s   !diff s   !n s   !spec s
//! [locator
//!   [[root
//!     !p f [x, y, z]   !q f [x, y, z, w]
//! ```
//!
//! Indentation above is for reading only; the file has no whitespace.
//!
//! # Object kinds
//!
//! The kind of an object follows from its name, and for names that are not
//! keywords, from the kind of its parent:
//!
//! | name / context | kind | properties, in order | children, in order |
//! |---|---|---|---|
//! | `object` | world | none | any |
//! | `mesh` | mesh | `p`, `n`, `ta`, `u0`, `tri`, then extras | `aabb`, `material`, then extras |
//! | `locator` | locator set | none | locators |
//! | `aabb` | bounds | `min`, `max` | none |
//! | `material` | material | `shader`, `diff`, `n`, `spec` | none |
//! | any, inside a locator set | locator | `p`, optional `q` | none |
//! | `*MeshShape`, inside the world | shape | none | one `mesh` |
//! | anything else | generic | any | any |
//!
//! Group widths for mesh arrays: vertices and normals 3, tangents 4,
//! UVs 2, faces 3 indices.
