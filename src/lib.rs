//! # clausewitz_mesh
//!
//! Reader and writer for the binary `.mesh` format of the Clausewitz Engine.
//!
//! ## What is a `.mesh` file?
//!
//! A `.mesh` file stores 3D scene data for Clausewitz games: triangle meshes,
//! their materials and bounding boxes, and named locators used as attachment
//! points. It is a self-describing binary tree with no length fields for
//! nested objects; nesting is expressed by the number of `[` characters in
//! front of each object name. See the [`format`] module for the full layout.
//!
//! ## Key Features
//!
//! - **Typed tree**: files decode to a [`Document`] of [`ObjectNode`]s
//!   (world, shapes, meshes, materials, bounds, locators)
//! - **Lossless**: encoding a decoded document reproduces its bytes, floats
//!   included bit for bit
//! - **Bounded**: nesting depth is capped by [`MeshOptions::max_depth`], so
//!   corrupt input fails with an error instead of overflowing the stack
//! - **No I/O of its own**: works on byte slices; callers own the files
//!
//! ## Quick Start
//!
//! ```rust
//! use clausewitz_mesh::{from_slice, to_vec, Asset, Document, Locator, LocatorSet, Node, ObjectNode};
//!
//! let document = Document::new(vec![
//!     Node::Object(ObjectNode::Asset(Asset::new(vec![1, 0]))),
//!     Node::Object(ObjectNode::LocatorSet(LocatorSet {
//!         locators: vec![
//!             Locator::new("root", [0.0, 0.0, 0.0]),
//!             Locator::new("turret_01", [1.5, 0.0, -2.25]),
//!         ],
//!     })),
//! ]);
//!
//! // Encode to the header-less body
//! let bytes = to_vec(&document).unwrap();
//!
//! // Decode back
//! let decoded = from_slice(&bytes).unwrap();
//! assert_eq!(decoded, document);
//! ```
//!
//! ## Logging
//!
//! Decoding and encoding emit `tracing` events at `debug` and `trace` level.
//! Install a subscriber to see them; nothing is printed otherwise.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Every read is bounds-checked and reports the offset it failed at
//! - Allocation is bounded by the input size, not by counts read from it
//! - No panics in public API

pub mod cursor;
pub mod de;
pub mod error;
pub mod format;
pub mod options;
pub mod property;
pub mod ser;
pub mod value;

pub use cursor::ByteCursor;
pub use de::{Deserializer, RawObject};
pub use error::{Error, Result};
pub use options::MeshOptions;
pub use property::{
    decode_property, normalize_name, read_property, wire_name, write_property, PropertyRecord,
    PropertyValue, RawProperty,
};
pub use ser::Serializer;
pub use value::{
    Asset, Bounds, Document, Generic, Locator, LocatorSet, Material, Mesh, Node, NodeKind, ObjectNode,
    Shape, World,
};

use std::io;

/// Magic bytes at the start of every `.mesh` file.
pub const HEADER: &[u8; 4] = b"@@b@";

/// Removes a leading [`HEADER`], if present.
///
/// ```rust
/// use clausewitz_mesh::strip_header;
///
/// assert_eq!(strip_header(b"@@b@!abc"), b"!abc");
/// assert_eq!(strip_header(b"!abc"), b"!abc");
/// ```
pub fn strip_header(input: &[u8]) -> &[u8] {
    input.strip_prefix(HEADER.as_slice()).unwrap_or(input)
}

/// Decodes a `.mesh` file from bytes.
///
/// The `@@b@` header is optional. Error offsets are relative to the bytes
/// after it.
///
/// # Errors
///
/// Returns an error if the input is truncated, contains an unknown property
/// type, an object whose contents do not match its kind, or nesting deeper
/// than the default limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(input: &[u8]) -> Result<Document> {
    from_slice_with_options(input, &MeshOptions::default())
}

/// Decodes a `.mesh` file from bytes with custom options.
///
/// # Errors
///
/// As [`from_slice`], plus [`Error::StringLengthMismatch`] in strict mode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options(input: &[u8], options: &MeshOptions) -> Result<Document> {
    let mut deserializer = Deserializer::with_options(input, options.clone());
    deserializer.parse_document()
}

/// Reads a whole `.mesh` file from `reader` and decodes it.
///
/// # Examples
///
/// ```rust
/// use clausewitz_mesh::from_reader;
/// use std::io::Cursor;
///
/// let document = from_reader(Cursor::new(b"@@b@".to_vec())).unwrap();
/// assert!(document.nodes.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the bytes do not decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Document>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Encodes a document to bytes, without the `@@b@` header.
///
/// # Errors
///
/// Returns an error if a name or string cannot be represented on disk.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(document: &Document) -> Result<Vec<u8>> {
    to_vec_with_options(document, &MeshOptions::default())
}

/// Encodes a document to bytes with custom options.
///
/// # Errors
///
/// As [`to_vec`], plus [`Error::DepthLimitExceeded`] for trees deeper than
/// the configured limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options(document: &Document, options: &MeshOptions) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(options.clone());
    serializer.serialize_document(document)?;
    Ok(serializer.into_inner())
}

/// Encodes a document into `writer`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, document: &Document) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, document, &MeshOptions::default())
}

/// Encodes a document into `writer` with custom options.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, document: &Document, options: &MeshOptions) -> Result<()>
where
    W: io::Write,
{
    let bytes = to_vec_with_options(document, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Node::Object(ObjectNode::Asset(Asset::new(vec![1, 0]))),
            Node::Object(ObjectNode::World(World {
                objects: vec![ObjectNode::Shape(Shape {
                    name: "cubeMeshShape".to_string(),
                    mesh: Mesh {
                        vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                        normals: vec![[0.0, 0.0, 1.0]; 3],
                        tangents: vec![[1.0, 0.0, 0.0, 1.0]; 3],
                        uv_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                        faces: vec![[0, 1, 2]],
                        bounds: Bounds {
                            min: [0.0, 0.0, 0.0],
                            max: [1.0, 1.0, 0.0],
                        },
                        material: Material {
                            shader: "PdxMeshStandard".to_string(),
                            diffuse: "cube_diffuse.dds".to_string(),
                            normal: "cube_normal.dds".to_string(),
                            specular: "cube_spec.dds".to_string(),
                        },
                        extra_properties: vec![],
                        extra_children: vec![],
                    },
                })],
            })),
        ])
    }

    #[test]
    fn test_roundtrip_document() {
        let document = sample();
        let bytes = to_vec(&document).unwrap();
        assert_eq!(from_slice(&bytes).unwrap(), document);
    }

    #[test]
    fn test_header_option() {
        let document = sample();
        let options = MeshOptions::new().with_header(true);
        let with_header = to_vec_with_options(&document, &options).unwrap();
        let without = to_vec(&document).unwrap();

        assert_eq!(&with_header[..4], HEADER);
        assert_eq!(&with_header[4..], &without[..]);
        assert_eq!(from_slice(&with_header).unwrap(), from_slice(&without).unwrap());
    }

    #[test]
    fn test_writer_and_reader() {
        let document = sample();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &document).unwrap();

        let decoded = from_reader(std::io::Cursor::new(buffer)).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(from_slice(b"").unwrap(), Document::default());
        assert_eq!(from_slice(HEADER).unwrap(), Document::default());
    }
}
