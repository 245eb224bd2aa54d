//! Decoded `.mesh` documents.
//!
//! A [`Document`] is the ordered list of top-level nodes in a file. In practice
//! that is one [`Asset`] marker followed by a [`World`] holding shapes, and
//! optionally a [`LocatorSet`]:
//!
//! ```text
//! Document
//! ├── Asset { version: [1, 0] }
//! ├── World
//! │   └── Shape "shipMeshShape"
//! │       └── Mesh
//! │           ├── Bounds
//! │           └── Material
//! └── LocatorSet
//!     ├── Locator "root"
//!     └── Locator "turret_01"
//! ```
//!
//! Every node is a plain value; the caller owns the tree outright.
//!
//! ## Building documents
//!
//! ```rust
//! use clausewitz_mesh::{Asset, Document, Locator, LocatorSet, Node, ObjectNode};
//!
//! let document = Document::new(vec![
//!     Node::Object(ObjectNode::Asset(Asset::new(vec![1, 0]))),
//!     Node::Object(ObjectNode::LocatorSet(LocatorSet {
//!         locators: vec![Locator::new("root", [0.0, 0.0, 0.0])],
//!     })),
//! ]);
//!
//! assert_eq!(document.asset().map(|a| a.major()), Some(Some(1)));
//! assert_eq!(document.locators().count(), 1);
//! ```

use crate::PropertyRecord;
use serde::{Deserialize, Serialize};

/// Object name of the scene root.
pub const WORLD_NAME: &str = "object";
pub const MESH_NAME: &str = "mesh";
pub const LOCATOR_SET_NAME: &str = "locator";
pub const BOUNDS_NAME: &str = "aabb";
pub const MATERIAL_NAME: &str = "material";
/// Children of the world whose names end with this are shapes.
pub const SHAPE_SUFFIX: &str = "MeshShape";

/// Normalized property names the typed nodes are built from.
pub(crate) mod field {
    pub const VERTICES: &str = "vertices";
    pub const NORMALS: &str = "normals";
    pub const TANGENTS: &str = "tangents";
    pub const UV_MAP: &str = "uv_map";
    pub const FACES: &str = "faces";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const SHADER: &str = "shader";
    pub const DIFFUSE: &str = "diff";
    pub const NORMAL_MAP: &str = "normals";
    pub const SPECULAR: &str = "spec";
    pub const ROTATION: &str = "q";
}

/// A whole decoded file, minus its `@@b@` header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// A top-level entry: a loose property or an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Property(PropertyRecord),
    Object(ObjectNode),
}

/// The kinds of object a `.mesh` file can contain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectNode {
    Asset(Asset),
    World(World),
    Mesh(Mesh),
    Material(Material),
    Bounds(Bounds),
    LocatorSet(LocatorSet),
    Locator(Locator),
    Shape(Shape),
    Generic(Generic),
}

/// Discriminant of [`ObjectNode`].
///
/// The tree builder decides the kind of an object from its name and the kind
/// of its parent before reading its body, and hands it down to the children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Asset,
    World,
    Mesh,
    Material,
    Bounds,
    LocatorSet,
    Locator,
    Shape,
    Generic,
}

/// The `pdxasset` marker that opens every file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Format version, usually `[major, minor]`.
    pub version: Vec<i32>,
}

/// Scene root: every shape in the file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub objects: Vec<ObjectNode>,
}

/// Triangle geometry with its bounding box and material.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 4]>,
    pub uv_coords: Vec<[f32; 2]>,
    /// Vertex indices, one triple per triangle.
    pub faces: Vec<[i32; 3]>,
    pub bounds: Bounds,
    pub material: Material,
    /// Properties after the five geometry arrays (extra UV sets and the like).
    #[serde(default)]
    pub extra_properties: Vec<PropertyRecord>,
    /// Children after bounds and material, such as skinning data.
    #[serde(default)]
    pub extra_children: Vec<ObjectNode>,
}

/// Texture and shader references of a mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub shader: String,
    pub diffuse: String,
    pub normal: String,
    pub specular: String,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocatorSet {
    pub locators: Vec<Locator>,
}

/// Named attachment point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Locator {
    pub name: String,
    pub position: [f32; 3],
    /// Orientation quaternion, when the file carries one.
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
}

/// A named wrapper around one mesh, direct child of the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub mesh: Mesh,
}

/// Any object the typed kinds do not cover, kept as read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Generic {
    pub name: String,
    pub properties: Vec<PropertyRecord>,
    pub children: Vec<ObjectNode>,
    /// Number of `[` characters before the name.
    pub depth: usize,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectNode> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Object(object) => Some(object),
            Node::Property(_) => None,
        })
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.objects().find_map(|object| match object {
            ObjectNode::Asset(asset) => Some(asset),
            _ => None,
        })
    }

    pub fn world(&self) -> Option<&World> {
        self.objects().find_map(|object| match object {
            ObjectNode::World(world) => Some(world),
            _ => None,
        })
    }

    /// All meshes in the document, depth first.
    pub fn meshes(&self) -> Vec<&Mesh> {
        let mut found = Vec::new();
        self.walk(&mut |object| match object {
            ObjectNode::Mesh(mesh) => found.push(mesh),
            ObjectNode::Shape(shape) => found.push(&shape.mesh),
            _ => {}
        });
        found
    }

    /// All locators of every locator set, in file order.
    ///
    /// Locator sets are found at any depth, including inside the world.
    pub fn locators(&self) -> impl Iterator<Item = &Locator> {
        let mut sets = Vec::new();
        self.walk(&mut |object| {
            if let ObjectNode::LocatorSet(set) = object {
                sets.push(set);
            }
        });
        sets.into_iter().flat_map(|set| set.locators.iter())
    }

    /// Calls `visit` on every object in the document, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ObjectNode)) {
        for object in self.objects() {
            object.walk(visit);
        }
    }
}

impl ObjectNode {
    pub const fn kind(&self) -> NodeKind {
        match self {
            ObjectNode::Asset(_) => NodeKind::Asset,
            ObjectNode::World(_) => NodeKind::World,
            ObjectNode::Mesh(_) => NodeKind::Mesh,
            ObjectNode::Material(_) => NodeKind::Material,
            ObjectNode::Bounds(_) => NodeKind::Bounds,
            ObjectNode::LocatorSet(_) => NodeKind::LocatorSet,
            ObjectNode::Locator(_) => NodeKind::Locator,
            ObjectNode::Shape(_) => NodeKind::Shape,
            ObjectNode::Generic(_) => NodeKind::Generic,
        }
    }

    /// The object name as written in the file.
    pub fn name(&self) -> &str {
        match self {
            ObjectNode::Asset(_) => crate::property::ASSET_NAME,
            ObjectNode::World(_) => WORLD_NAME,
            ObjectNode::Mesh(_) => MESH_NAME,
            ObjectNode::Material(_) => MATERIAL_NAME,
            ObjectNode::Bounds(_) => BOUNDS_NAME,
            ObjectNode::LocatorSet(_) => LOCATOR_SET_NAME,
            ObjectNode::Locator(locator) => &locator.name,
            ObjectNode::Shape(shape) => &shape.name,
            ObjectNode::Generic(generic) => &generic.name,
        }
    }

    /// Calls `visit` on this object and then on every object below it.
    ///
    /// A shape's embedded mesh is not an object of its own; its extra children
    /// are visited.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ObjectNode)) {
        visit(self);
        let children: &[ObjectNode] = match self {
            ObjectNode::World(world) => &world.objects,
            ObjectNode::Mesh(mesh) => &mesh.extra_children,
            ObjectNode::Shape(shape) => &shape.mesh.extra_children,
            ObjectNode::Generic(generic) => &generic.children,
            _ => &[],
        };
        for child in children {
            child.walk(visit);
        }
    }
}

impl Asset {
    pub fn new(version: Vec<i32>) -> Self {
        Asset { version }
    }

    pub fn major(&self) -> Option<i32> {
        self.version.first().copied()
    }
}

impl Locator {
    pub fn new(name: impl Into<String>, position: [f32; 3]) -> Self {
        Locator {
            name: name.into(),
            position,
            rotation: None,
        }
    }
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    ///
    /// ```rust
    /// use clausewitz_mesh::Bounds;
    ///
    /// let bounds = Bounds::enclosing(&[[0.0, 1.0, 0.0], [2.0, -1.0, 3.0]]).unwrap();
    /// assert_eq!(bounds.min, [0.0, -1.0, 0.0]);
    /// assert_eq!(bounds.max, [2.0, 1.0, 3.0]);
    /// ```
    pub fn enclosing(points: &[[f32; 3]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for point in rest {
            for i in 0..3 {
                bounds.min[i] = bounds.min[i].min(point[i]);
                bounds.max[i] = bounds.max[i].max(point[i]);
            }
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(name: &str) -> ObjectNode {
        ObjectNode::Shape(Shape {
            name: name.to_string(),
            mesh: Mesh::default(),
        })
    }

    #[test]
    fn test_document_accessors() {
        let document = Document::new(vec![
            Node::Object(ObjectNode::Asset(Asset::new(vec![1, 0]))),
            Node::Object(ObjectNode::World(World {
                objects: vec![shape("hullMeshShape"), shape("turretMeshShape")],
            })),
            Node::Property(PropertyRecord::ints("loose", vec![3])),
        ]);

        assert_eq!(document.asset(), Some(&Asset::new(vec![1, 0])));
        assert_eq!(document.world().map(|w| w.objects.len()), Some(2));
        assert_eq!(document.objects().count(), 2);
        assert_eq!(document.meshes().len(), 2);
        assert_eq!(document.locators().count(), 0);
    }

    #[test]
    fn test_nested_locators_and_meshes_are_found() {
        let set = |name: &str| {
            ObjectNode::LocatorSet(LocatorSet {
                locators: vec![Locator::new(name, [0.0, 0.0, 0.0])],
            })
        };
        let document = Document::new(vec![
            Node::Object(ObjectNode::World(World {
                objects: vec![
                    shape("hullMeshShape"),
                    set("in_world"),
                    ObjectNode::Generic(Generic {
                        name: "rig".to_string(),
                        properties: vec![],
                        children: vec![set("in_generic"), ObjectNode::Mesh(Mesh::default())],
                        depth: 2,
                    }),
                ],
            })),
            Node::Object(set("top_level")),
        ]);

        let names: Vec<&str> = document.locators().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["in_world", "in_generic", "top_level"]);
        assert_eq!(document.meshes().len(), 2);

        let mut kinds = Vec::new();
        document.walk(&mut |object| kinds.push(object.kind()));
        assert_eq!(kinds.len(), 7);
        assert_eq!(kinds[0], NodeKind::World);
    }

    #[test]
    fn test_names_and_kinds() {
        let node = shape("hullMeshShape");
        assert_eq!(node.name(), "hullMeshShape");
        assert_eq!(node.kind(), NodeKind::Shape);

        let node = ObjectNode::Bounds(Bounds::default());
        assert_eq!(node.name(), "aabb");
        assert_eq!(node.kind(), NodeKind::Bounds);

        assert_eq!(ObjectNode::Asset(Asset::new(vec![1])).name(), "pdxasset");
    }

    #[test]
    fn test_enclosing_empty() {
        assert_eq!(Bounds::enclosing(&[]), None);
    }

    #[test]
    fn test_json_shape() {
        let node = ObjectNode::Locator(Locator::new("root", [1.0, 2.0, 3.0]));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "locator");
        assert_eq!(json["name"], "root");

        let back: ObjectNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
