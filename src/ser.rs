//! `.mesh` serialization.
//!
//! This module provides the [`Serializer`], which writes a [`Document`] back
//! to the binary layout [`Deserializer`](crate::Deserializer) reads.
//!
//! ## Overview
//!
//! Each node writes its own bytes:
//!
//! - top-level objects get one `[`, and every child one more than its parent
//! - typed nodes write their properties in the order the deserializer expects,
//!   under their short on-disk names (`p`, `n`, `ta`, `u0`, `tri`)
//! - [`Generic`](crate::Generic) objects write their properties and children
//!   as they were read
//!
//! The `@@b@` header is only written when
//! [`MeshOptions::write_header`](crate::MeshOptions::write_header) is set.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use clausewitz_mesh::{Bounds, MeshOptions, ObjectNode, Serializer};
//!
//! let mut serializer = Serializer::new(MeshOptions::default());
//! let bounds = ObjectNode::Bounds(Bounds { min: [0.0; 3], max: [1.0; 3] });
//! serializer.serialize_object(&bounds, 2).unwrap();
//!
//! let bytes = serializer.into_inner();
//! assert!(bytes.starts_with(b"[[aabb\0!\x03minf"));
//! ```

use crate::property::{latin1_bytes, wire_name, write_named, write_property, ASSET_NAME};
use crate::value::{field, BOUNDS_NAME, LOCATOR_SET_NAME, MATERIAL_NAME, MESH_NAME, WORLD_NAME};
use crate::{
    Document, Error, Locator, Material, Mesh, MeshOptions, Node, ObjectNode, PropertyValue, Result, HEADER,
};

/// The `.mesh` serializer.
///
/// Created via [`Serializer::new`]; the bytes are taken out with
/// [`Serializer::into_inner`].
pub struct Serializer {
    output: Vec<u8>,
    options: MeshOptions,
}

impl Serializer {
    pub fn new(options: MeshOptions) -> Self {
        Serializer {
            output: Vec::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.output
    }

    pub fn serialize_document(&mut self, document: &Document) -> Result<()> {
        if self.options.write_header {
            self.output.extend_from_slice(HEADER);
        }
        for node in &document.nodes {
            match node {
                Node::Property(record) if record.disk_name() == ASSET_NAME => {
                    return Err(Error::unencodable(format!(
                        "top-level property '{}' would decode as the asset marker; use ObjectNode::Asset",
                        ASSET_NAME
                    )));
                }
                Node::Property(record) => write_property(&mut self.output, record)?,
                Node::Object(object) => self.serialize_object(object, 1)?,
            }
        }
        tracing::debug!(bytes = self.output.len(), nodes = document.nodes.len(), "encoded document");
        Ok(())
    }

    /// Writes `object` with `depth` leading brackets, children one deeper.
    ///
    /// An [`Asset`](crate::Asset) is not an object on disk and is written as
    /// the `pdxasset` property regardless of `depth`.
    pub fn serialize_object(&mut self, object: &ObjectNode, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(self.output.len(), self.options.max_depth));
        }

        match object {
            ObjectNode::Asset(asset) => {
                write_named(&mut self.output, ASSET_NAME, &PropertyValue::Ints(asset.version.clone()))?;
            }
            ObjectNode::World(world) => {
                self.write_object_header(depth, WORLD_NAME)?;
                for child in &world.objects {
                    self.serialize_object(child, depth + 1)?;
                }
            }
            ObjectNode::Mesh(mesh) => self.serialize_mesh(mesh, depth)?,
            ObjectNode::Material(material) => self.serialize_material(material, depth)?,
            ObjectNode::Bounds(bounds) => {
                self.write_object_header(depth, BOUNDS_NAME)?;
                self.write_floats(field::MIN, &[bounds.min])?;
                self.write_floats(field::MAX, &[bounds.max])?;
            }
            ObjectNode::LocatorSet(set) => {
                self.write_object_header(depth, LOCATOR_SET_NAME)?;
                for locator in &set.locators {
                    self.serialize_locator(locator, depth + 1)?;
                }
            }
            ObjectNode::Locator(locator) => self.serialize_locator(locator, depth)?,
            ObjectNode::Shape(shape) => {
                self.write_object_header(depth, &shape.name)?;
                self.serialize_mesh(&shape.mesh, depth + 1)?;
            }
            ObjectNode::Generic(generic) => {
                self.write_object_header(depth, &generic.name)?;
                for record in &generic.properties {
                    write_property(&mut self.output, record)?;
                }
                for child in &generic.children {
                    self.serialize_object(child, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn serialize_mesh(&mut self, mesh: &Mesh, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(self.output.len(), self.options.max_depth));
        }
        self.write_object_header(depth, MESH_NAME)?;
        self.write_floats(field::VERTICES, &mesh.vertices)?;
        self.write_floats(field::NORMALS, &mesh.normals)?;
        self.write_floats(field::TANGENTS, &mesh.tangents)?;
        self.write_floats(field::UV_MAP, &mesh.uv_coords)?;
        let faces = mesh.faces.iter().flatten().copied().collect();
        write_named(&mut self.output, wire_name(field::FACES), &PropertyValue::Ints(faces))?;
        for record in &mesh.extra_properties {
            write_property(&mut self.output, record)?;
        }

        self.serialize_object(&ObjectNode::Bounds(mesh.bounds), depth + 1)?;
        self.serialize_material(&mesh.material, depth + 1)?;
        for child in &mesh.extra_children {
            self.serialize_object(child, depth + 1)?;
        }
        Ok(())
    }

    fn serialize_material(&mut self, material: &Material, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(self.output.len(), self.options.max_depth));
        }
        self.write_object_header(depth, MATERIAL_NAME)?;
        self.write_string(field::SHADER, &material.shader)?;
        self.write_string(field::DIFFUSE, &material.diffuse)?;
        self.write_string(field::NORMAL_MAP, &material.normal)?;
        self.write_string(field::SPECULAR, &material.specular)
    }

    fn serialize_locator(&mut self, locator: &Locator, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(self.output.len(), self.options.max_depth));
        }
        self.write_object_header(depth, &locator.name)?;
        self.write_floats(field::VERTICES, &[locator.position])?;
        if let Some(rotation) = locator.rotation {
            self.write_floats(field::ROTATION, &[rotation])?;
        }
        Ok(())
    }

    fn write_object_header(&mut self, depth: usize, name: &str) -> Result<()> {
        if name.starts_with('[') {
            return Err(Error::unencodable(format!("object name {:?} starts with '['", name)));
        }
        let name = latin1_bytes(name)?;
        self.output.extend(std::iter::repeat(b'[').take(depth));
        self.output.extend_from_slice(&name);
        self.output.push(0);
        Ok(())
    }

    fn write_floats<const N: usize>(&mut self, name: &str, values: &[[f32; N]]) -> Result<()> {
        let flat = values.iter().flatten().copied().collect();
        write_named(&mut self.output, wire_name(name), &PropertyValue::Floats(flat))
    }

    fn write_string(&mut self, name: &str, value: &str) -> Result<()> {
        write_named(&mut self.output, wire_name(name), &PropertyValue::String(value.to_string()))
    }
}
