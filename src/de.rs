//! `.mesh` deserialization.
//!
//! This module provides the [`Deserializer`], a recursive-descent reader that
//! turns the body of a `.mesh` file into a [`Document`].
//!
//! ## Overview
//!
//! The format has no length or count fields for nested objects. An object is
//! a run of `[` characters, a null-terminated name, then any number of
//! properties (`!`) and child objects. The number of `[` characters is the
//! object's depth. While reading an object the deserializer peeks at the
//! depth of each `[` it meets: a deeper object is a child, anything else ends
//! the current object and belongs to an ancestor.
//!
//! Each object is read in two steps:
//!
//! 1. Its kind is decided from its name and the kind of its parent
//!    ([`NodeKind::classify`]), then properties and children are collected
//!    into a [`RawObject`].
//! 2. [`RawObject::finish`] converts the raw object into the typed node,
//!    checking that the required properties and children are present and in
//!    order.
//!
//! ## Usage
//!
//! Most users should use [`from_slice`](crate::from_slice):
//!
//! ```rust
//! use clausewitz_mesh::from_slice;
//!
//! let mut bytes = b"@@b@[locator\0[[root\0!\x01pf".to_vec();
//! bytes.extend_from_slice(&3u32.to_le_bytes());
//! for v in [1.0f32, 2.0, 3.0] {
//!     bytes.extend_from_slice(&v.to_le_bytes());
//! }
//!
//! let document = from_slice(&bytes).unwrap();
//! let locator = document.locators().next().unwrap();
//! assert_eq!(locator.name, "root");
//! assert_eq!(locator.position, [1.0, 2.0, 3.0]);
//! ```

use crate::property::{read_property, ASSET_NAME};
use crate::value::{field, BOUNDS_NAME, LOCATOR_SET_NAME, MATERIAL_NAME, MESH_NAME, SHAPE_SUFFIX, WORLD_NAME};
use crate::{
    strip_header, Asset, Bounds, ByteCursor, Document, Error, Generic, Locator, LocatorSet, Material,
    Mesh, MeshOptions, Node, NodeKind, ObjectNode, PropertyRecord, PropertyValue, Result, Shape, World,
};

/// The `.mesh` deserializer.
///
/// Created via [`Deserializer::from_slice`] or [`Deserializer::with_options`].
pub struct Deserializer<'de> {
    cursor: ByteCursor<'de>,
    options: MeshOptions,
    level: usize, // objects currently open
}

impl<'de> Deserializer<'de> {
    /// Creates a deserializer over `input`, stripping a leading `@@b@` header if present.
    pub fn from_slice(input: &'de [u8]) -> Self {
        Self::with_options(input, MeshOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: MeshOptions) -> Self {
        Deserializer {
            cursor: ByteCursor::new(strip_header(input)),
            options,
            level: 0,
        }
    }

    /// Offset into the header-stripped body.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Reads top-level nodes until the end of the buffer.
    ///
    /// Bytes between top-level nodes that are neither `!` nor `[` are skipped.
    pub fn parse_document(&mut self) -> Result<Document> {
        tracing::debug!(len = self.cursor.len(), "decoding document");
        let mut nodes = Vec::new();

        while !self.cursor.is_at_end(0) {
            match self.cursor.peek_u8()? {
                b'!' => {
                    self.cursor.next_u8()?;
                    nodes.push(self.parse_top_level_property()?);
                }
                b'[' => {
                    let object = self.parse_object(0, None)?;
                    nodes.push(Node::Object(object));
                }
                other => {
                    tracing::trace!(offset = self.cursor.position(), byte = other, "skipping byte");
                    self.cursor.next_u8()?;
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "decoded document");
        Ok(Document::new(nodes))
    }

    fn parse_top_level_property(&mut self) -> Result<Node> {
        let raw = read_property(&mut self.cursor, &self.options)?;
        if raw.raw_name != ASSET_NAME {
            return Ok(Node::Property(raw.into_record()));
        }

        match raw.value {
            PropertyValue::Ints(version) => Ok(Node::Object(ObjectNode::Asset(Asset::new(version)))),
            _ => Err(Error::malformed(raw.span.start, ASSET_NAME, "int version property")),
        }
    }

    /// Reads one object starting at its first `[`.
    ///
    /// `depth` counts the brackets consumed so far; callers pass `0`. `parent`
    /// is the kind of the enclosing object, `None` at the top level.
    pub fn parse_object(&mut self, depth: usize, parent: Option<NodeKind>) -> Result<ObjectNode> {
        if self.level >= self.options.max_depth {
            return Err(Error::depth_limit(self.cursor.position(), self.options.max_depth));
        }
        self.level += 1;
        let result = self.parse_object_body(depth, parent);
        self.level -= 1;
        result
    }

    fn parse_object_body(&mut self, mut depth: usize, parent: Option<NodeKind>) -> Result<ObjectNode> {
        let offset = self.cursor.position();

        let mut first = self.cursor.next_char()?;
        while first == '[' {
            depth += 1;
            if depth > self.options.max_depth {
                return Err(Error::depth_limit(self.cursor.position(), self.options.max_depth));
            }
            first = self.cursor.next_char()?;
        }

        let name = if first == '\0' {
            String::new()
        } else {
            let mut name = first.to_string();
            name.push_str(&self.cursor.read_null_terminated_string()?);
            name
        };

        let kind = NodeKind::classify(&name, parent);
        let mut raw = RawObject {
            name,
            offset,
            depth,
            properties: Vec::new(),
            children: Vec::new(),
        };

        while !self.cursor.is_at_end(0) {
            match self.cursor.peek_u8()? {
                b'!' => {
                    self.cursor.next_u8()?;
                    let property = read_property(&mut self.cursor, &self.options)?;
                    raw.properties.push(property.into_record());
                }
                b'[' => {
                    if self.cursor.peek_depth() <= depth {
                        break;
                    }
                    let child = self.parse_object(0, Some(kind))?;
                    raw.children.push(child);
                }
                b if b.is_ascii_whitespace() => {
                    self.cursor.next_u8()?;
                }
                other => return Err(Error::unexpected_byte(self.cursor.position(), other)),
            }
        }

        tracing::debug!(
            name = %raw.name,
            ?kind,
            depth,
            properties = raw.properties.len(),
            children = raw.children.len(),
            "decoded object"
        );
        raw.finish(kind)
    }
}

impl NodeKind {
    /// Decides the kind of an object from its name and its parent's kind.
    ///
    /// Keyword names win regardless of context. Anything else is a locator
    /// inside a locator set, a shape inside the world if its name ends with
    /// `MeshShape`, and generic otherwise.
    ///
    /// ```rust
    /// use clausewitz_mesh::NodeKind;
    ///
    /// assert_eq!(NodeKind::classify("mesh", None), NodeKind::Mesh);
    /// assert_eq!(NodeKind::classify("root", Some(NodeKind::LocatorSet)), NodeKind::Locator);
    /// assert_eq!(NodeKind::classify("root", Some(NodeKind::World)), NodeKind::Generic);
    /// assert_eq!(NodeKind::classify("hullMeshShape", Some(NodeKind::World)), NodeKind::Shape);
    /// assert_eq!(NodeKind::classify("hullMeshShape", None), NodeKind::Generic);
    /// ```
    pub fn classify(name: &str, parent: Option<NodeKind>) -> NodeKind {
        match name {
            WORLD_NAME => NodeKind::World,
            MESH_NAME => NodeKind::Mesh,
            LOCATOR_SET_NAME => NodeKind::LocatorSet,
            BOUNDS_NAME => NodeKind::Bounds,
            MATERIAL_NAME => NodeKind::Material,
            _ if parent == Some(NodeKind::LocatorSet) => NodeKind::Locator,
            _ if parent == Some(NodeKind::World) && name.ends_with(SHAPE_SUFFIX) => NodeKind::Shape,
            _ => NodeKind::Generic,
        }
    }
}

/// An object's name, properties and children before conversion to a typed node.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObject {
    pub name: String,
    /// Offset of the object's first `[`.
    pub offset: usize,
    pub depth: usize,
    pub properties: Vec<PropertyRecord>,
    pub children: Vec<ObjectNode>,
}

impl RawObject {
    /// Converts into the typed node for `kind`.
    ///
    /// Fails with [`Error::MalformedObject`] if a required property or child
    /// is missing, has the wrong type, or is out of order, or if the object
    /// carries something its kind has no place for.
    pub fn finish(self, kind: NodeKind) -> Result<ObjectNode> {
        let mut fields = Fields {
            object: &self.name,
            offset: self.offset,
            properties: self.properties.into_iter(),
            children: self.children.into_iter(),
        };

        let node = match kind {
            NodeKind::World => {
                fields.expect_no_properties()?;
                ObjectNode::World(World {
                    objects: fields.children.by_ref().collect(),
                })
            }
            NodeKind::Mesh => ObjectNode::Mesh(fields.mesh()?),
            NodeKind::LocatorSet => {
                fields.expect_no_properties()?;
                let mut locators = Vec::new();
                while let Some(child) = fields.children.next() {
                    match child {
                        ObjectNode::Locator(locator) => locators.push(locator),
                        other => {
                            return Err(fields.error(&format!("locator child, found '{}'", other.name())))
                        }
                    }
                }
                ObjectNode::LocatorSet(LocatorSet { locators })
            }
            NodeKind::Bounds => {
                let bounds = fields.bounds()?;
                fields.expect_end()?;
                ObjectNode::Bounds(bounds)
            }
            NodeKind::Material => {
                let material = fields.material()?;
                fields.expect_end()?;
                ObjectNode::Material(material)
            }
            NodeKind::Locator => {
                let position = fields.vector::<3>(field::VERTICES)?;
                let has_rotation = fields
                    .properties
                    .as_slice()
                    .first()
                    .map_or(false, |next| next.name == field::ROTATION);
                let rotation = if has_rotation {
                    Some(fields.vector::<4>(field::ROTATION)?)
                } else {
                    None
                };
                fields.expect_end()?;
                ObjectNode::Locator(Locator {
                    name: self.name.clone(),
                    position,
                    rotation,
                })
            }
            NodeKind::Shape => {
                fields.expect_no_properties()?;
                let mesh = match fields.children.next() {
                    Some(ObjectNode::Mesh(mesh)) => mesh,
                    _ => return Err(fields.error("exactly one 'mesh' child")),
                };
                fields.expect_end()?;
                ObjectNode::Shape(Shape {
                    name: self.name.clone(),
                    mesh,
                })
            }
            NodeKind::Generic | NodeKind::Asset => ObjectNode::Generic(Generic {
                name: self.name.clone(),
                properties: fields.properties.by_ref().collect(),
                children: fields.children.by_ref().collect(),
                depth: self.depth,
            }),
        };
        Ok(node)
    }
}

// Positional reader over an object's collected properties and children.
struct Fields<'a> {
    object: &'a str,
    offset: usize,
    properties: std::vec::IntoIter<PropertyRecord>,
    children: std::vec::IntoIter<ObjectNode>,
}

impl Fields<'_> {
    fn error(&self, expected: &str) -> Error {
        Error::malformed(self.offset, self.object, expected)
    }

    fn property(&mut self, name: &str, kind: &str) -> Result<PropertyValue> {
        let expected = format!("{} property '{}'", kind, name);
        match self.properties.next() {
            Some(record) if record.name == name && record.value.kind_name() == kind => Ok(record.value),
            Some(record) => Err(Error::malformed(
                record.span.start,
                self.object,
                &format!("{}, found {} property '{}'", expected, record.value.kind_name(), record.name),
            )),
            None => Err(self.error(&expected)),
        }
    }

    fn floats(&mut self, name: &str) -> Result<Vec<f32>> {
        match self.property(name, "float")? {
            PropertyValue::Floats(values) => Ok(values),
            _ => Err(self.error(name)),
        }
    }

    fn ints(&mut self, name: &str) -> Result<Vec<i32>> {
        match self.property(name, "int")? {
            PropertyValue::Ints(values) => Ok(values),
            _ => Err(self.error(name)),
        }
    }

    fn string(&mut self, name: &str) -> Result<String> {
        match self.property(name, "string")? {
            PropertyValue::String(value) => Ok(value),
            _ => Err(self.error(name)),
        }
    }

    fn vector<const N: usize>(&mut self, name: &str) -> Result<[f32; N]> {
        let values = self.floats(name)?;
        <[f32; N]>::try_from(values.as_slice())
            .map_err(|_| self.error(&format!("{} floats in '{}', found {}", N, name, values.len())))
    }

    fn grouped<T: Copy, const N: usize>(&self, name: &str, flat: Vec<T>) -> Result<Vec<[T; N]>> {
        if flat.len() % N != 0 {
            return Err(self.error(&format!(
                "a multiple of {} values in '{}', found {}",
                N,
                name,
                flat.len()
            )));
        }
        Ok(flat
            .chunks_exact(N)
            .filter_map(|chunk| <[T; N]>::try_from(chunk).ok())
            .collect())
    }

    fn expect_no_properties(&mut self) -> Result<()> {
        match self.properties.next() {
            Some(record) => Err(self.error(&format!("no properties, found '{}'", record.name))),
            None => Ok(()),
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.expect_no_properties()?;
        match self.children.next() {
            Some(child) => Err(self.error(&format!("no child objects, found '{}'", child.name()))),
            None => Ok(()),
        }
    }

    fn mesh(&mut self) -> Result<Mesh> {
        let vertices = self.floats(field::VERTICES)?;
        let normals = self.floats(field::NORMALS)?;
        let tangents = self.floats(field::TANGENTS)?;
        let uv_coords = self.floats(field::UV_MAP)?;
        let faces = self.ints(field::FACES)?;

        let bounds = match self.children.next() {
            Some(ObjectNode::Bounds(bounds)) => bounds,
            _ => return Err(self.error("'aabb' as first child")),
        };
        let material = match self.children.next() {
            Some(ObjectNode::Material(material)) => material,
            _ => return Err(self.error("'material' as second child")),
        };

        Ok(Mesh {
            vertices: self.grouped(field::VERTICES, vertices)?,
            normals: self.grouped(field::NORMALS, normals)?,
            tangents: self.grouped(field::TANGENTS, tangents)?,
            uv_coords: self.grouped(field::UV_MAP, uv_coords)?,
            faces: self.grouped(field::FACES, faces)?,
            bounds,
            material,
            extra_properties: self.properties.by_ref().collect(),
            extra_children: self.children.by_ref().collect(),
        })
    }

    fn bounds(&mut self) -> Result<Bounds> {
        Ok(Bounds {
            min: self.vector::<3>(field::MIN)?,
            max: self.vector::<3>(field::MAX)?,
        })
    }

    fn material(&mut self) -> Result<Material> {
        Ok(Material {
            shader: self.string(field::SHADER)?,
            diffuse: self.string(field::DIFFUSE)?,
            normal: self.string(field::NORMAL_MAP)?,
            specular: self.string(field::SPECULAR)?,
        })
    }
}
