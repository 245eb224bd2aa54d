//! Decode a `.mesh` file, print a summary and check that it re-encodes to
//! the same bytes.
//!
//! Run with: cargo run --example roundtrip -- path/to/model.mesh
//!
//! Without an argument a small generated cube is used.

use clausewitz_mesh::{
    from_slice, to_vec_with_options, Asset, Bounds, Document, Material, Mesh, MeshOptions, Node, ObjectNode,
    Shape, World,
};
use std::error::Error;
use std::{env, fs};

fn cube() -> Document {
    let vertices: Vec<[f32; 3]> = (0..8)
        .map(|i| [(i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32])
        .collect();
    let mesh = Mesh {
        normals: vertices.clone(),
        uv_coords: vertices.iter().map(|v| [v[0], v[1]]).collect(),
        faces: vec![[0, 1, 3], [0, 3, 2], [4, 6, 7], [4, 7, 5]],
        bounds: Bounds::enclosing(&vertices).unwrap_or_default(),
        vertices,
        material: Material {
            shader: "PdxMeshStandard".to_string(),
            diffuse: "cube_diffuse.dds".to_string(),
            normal: "cube_normal.dds".to_string(),
            specular: "cube_spec.dds".to_string(),
        },
        ..Mesh::default()
    };

    Document::new(vec![
        Node::Object(ObjectNode::Asset(Asset::new(vec![1, 0]))),
        Node::Object(ObjectNode::World(World {
            objects: vec![ObjectNode::Shape(Shape {
                name: "cubeMeshShape".to_string(),
                mesh,
            })],
        })),
    ])
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = MeshOptions::new().with_header(true);
    let bytes = match env::args().nth(1) {
        Some(path) => fs::read(path)?,
        None => to_vec_with_options(&cube(), &options)?,
    };

    let document = from_slice(&bytes)?;
    if let Some(asset) = document.asset() {
        println!("pdxasset version {:?}", asset.version);
    }
    for mesh in document.meshes() {
        println!(
            "mesh: {} vertices, {} faces, shader {}, diffuse {}",
            mesh.vertices.len(),
            mesh.faces.len(),
            mesh.material.shader,
            mesh.material.diffuse
        );
    }
    println!("{} locators", document.locators().count());

    let encoded = to_vec_with_options(&document, &options)?;
    if encoded == bytes {
        println!("✓ Re-encoded {} bytes identically", bytes.len());
    } else {
        println!("✗ Re-encoded {} bytes, input had {}", encoded.len(), bytes.len());
    }

    Ok(())
}
