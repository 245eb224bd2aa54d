use clausewitz_mesh::{
    from_slice, from_slice_with_options, to_vec, Asset, Bounds, Document, Error, Generic, Locator,
    LocatorSet, Material, Mesh, MeshOptions, Node, ObjectNode, PropertyRecord, Shape, World,
};

fn triangle_mesh() -> Mesh {
    Mesh {
        vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        tangents: vec![],
        uv_coords: vec![[0.5, 0.25]],
        faces: vec![[0, 1, 2]],
        bounds: Bounds {
            min: [0.0, 0.0, 0.0],
            max: [1.0, 1.0, 0.0],
        },
        material: Material {
            shader: "PdxMeshStandard".to_string(),
            diffuse: "triangle_diffuse.dds".to_string(),
            normal: "triangle_normal.dds".to_string(),
            specular: "triangle_spec.dds".to_string(),
        },
        extra_properties: vec![],
        extra_children: vec![],
    }
}

fn document(objects: Vec<ObjectNode>) -> Document {
    let mut nodes = vec![Node::Object(ObjectNode::Asset(Asset::new(vec![1])))];
    nodes.extend(objects.into_iter().map(Node::Object));
    Document::new(nodes)
}

fn assert_roundtrip(document: &Document) {
    let bytes = to_vec(document).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(&decoded, document);

    // Encoding the decoded tree gives the same bytes again.
    assert_eq!(to_vec(&decoded).unwrap(), bytes);
}

#[test]
fn test_minimal_mesh_document() {
    let original = document(vec![ObjectNode::World(World {
        objects: vec![ObjectNode::Mesh(triangle_mesh())],
    })]);

    let bytes = to_vec(&original).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded, original);

    assert_eq!(decoded.asset().unwrap().version, vec![1]);
    let meshes = decoded.meshes();
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].vertices.len(), 3);
    assert_eq!(meshes[0].normals.len(), 3);
    assert_eq!(meshes[0].faces, vec![[0, 1, 2]]);
    assert_eq!(meshes[0].uv_coords, vec![[0.5, 0.25]]);
    assert!(meshes[0].tangents.is_empty());
    assert_eq!(meshes[0].material.diffuse, "triangle_diffuse.dds");
}

#[test]
fn test_shape_document() {
    let original = document(vec![ObjectNode::World(World {
        objects: vec![
            ObjectNode::Shape(Shape {
                name: "hullMeshShape".to_string(),
                mesh: triangle_mesh(),
            }),
            ObjectNode::Shape(Shape {
                name: "sailMeshShape".to_string(),
                mesh: Mesh {
                    tangents: vec![[1.0, 0.0, 0.0, -1.0]; 3],
                    ..triangle_mesh()
                },
            }),
        ],
    })]);

    assert_roundtrip(&original);
}

#[test]
fn test_locator_set_order_and_positions() {
    let first = Locator::new("root", [0.0, 0.0, 0.0]);
    let second = Locator {
        name: "turret_01".to_string(),
        position: [1.25, -3.5, 1.0e-7],
        rotation: Some([0.0, 0.70710677, 0.0, 0.70710677]),
    };
    let original = document(vec![ObjectNode::LocatorSet(LocatorSet {
        locators: vec![first.clone(), second.clone()],
    })]);

    let decoded = from_slice(&to_vec(&original).unwrap()).unwrap();
    let locators: Vec<&Locator> = decoded.locators().collect();
    assert_eq!(locators, vec![&first, &second]);
    assert_eq!(locators[1].position[2].to_bits(), 1.0e-7f32.to_bits());
}

#[test]
fn test_world_then_locators() {
    // The locator set follows the world at the same depth, so the world must
    // end before it.
    let original = document(vec![
        ObjectNode::World(World {
            objects: vec![ObjectNode::Shape(Shape {
                name: "cubeMeshShape".to_string(),
                mesh: triangle_mesh(),
            })],
        }),
        ObjectNode::LocatorSet(LocatorSet {
            locators: vec![Locator::new("attach", [0.0, 2.0, 0.0])],
        }),
    ]);

    let decoded = from_slice(&to_vec(&original).unwrap()).unwrap();
    assert_eq!(decoded.objects().count(), 3);
    assert_eq!(decoded.world().unwrap().objects.len(), 1);
    assert_eq!(decoded, original);
}

#[test]
fn test_generic_objects_survive() {
    let skin = ObjectNode::Generic(Generic {
        name: "skin".to_string(),
        properties: vec![
            PropertyRecord::ints("bones", vec![4]),
            PropertyRecord::ints("ix", vec![0, 1, 2, 3]),
            PropertyRecord::floats("w", vec![1.0, 0.0, 0.0, 0.0]),
        ],
        children: vec![],
        depth: 4,
    });
    let mesh = Mesh {
        extra_properties: vec![PropertyRecord::floats("u1", vec![0.0, 1.0])],
        extra_children: vec![skin],
        ..triangle_mesh()
    };
    let original = document(vec![
        ObjectNode::World(World {
            objects: vec![ObjectNode::Shape(Shape {
                name: "riggedMeshShape".to_string(),
                mesh,
            })],
        }),
        ObjectNode::Generic(Generic {
            name: "skeleton".to_string(),
            properties: vec![],
            children: vec![ObjectNode::Generic(Generic {
                name: "bone_root".to_string(),
                properties: vec![PropertyRecord::ints("ix", vec![0])],
                children: vec![],
                depth: 2,
            })],
            depth: 1,
        }),
    ]);

    assert_roundtrip(&original);
}

#[test]
fn test_loose_top_level_property() {
    let mut original = document(vec![]);
    original
        .nodes
        .push(Node::Property(PropertyRecord::string("comment", "exported")));

    assert_roundtrip(&original);
}

#[test]
fn test_mesh_with_three_properties_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"[object\0[[mesh\0");
    for name in [&b"p"[..], &b"n"[..], &b"ta"[..]] {
        bytes.push(b'!');
        bytes.push(name.len() as u8);
        bytes.extend_from_slice(name);
        bytes.push(b'f');
        bytes.extend_from_slice(&0u32.to_le_bytes());
    }

    let err = from_slice(&bytes).unwrap_err();
    match err {
        Error::MalformedObject { object, expected, offset } => {
            assert_eq!(object, "mesh");
            assert!(expected.contains("uv_map"), "{}", expected);
            assert_eq!(offset, 8);
        }
        other => panic!("Expected MalformedObject, got {:?}", other),
    }
}

#[test]
fn test_truncation_is_reported() {
    let original = document(vec![ObjectNode::LocatorSet(LocatorSet {
        locators: vec![Locator::new("root", [1.0, 2.0, 3.0])],
    })]);
    let bytes = to_vec(&original).unwrap();

    // The final property is `!`, len, `p`, `f`, count, 3 floats: 20 bytes.
    for cut in 1..20 {
        let err = from_slice(&bytes[..bytes.len() - cut]).unwrap_err();
        assert!(
            matches!(err, Error::TruncatedInput { .. }),
            "cut {} gave {:?}",
            cut,
            err
        );
    }
}

#[test]
fn test_unknown_property_type() {
    let err = from_slice(b"@@b@!\x01xz").unwrap_err();
    assert_eq!(err, Error::UnknownPropertyType { offset: 3, found: 'z' });
}

#[test]
fn test_strict_strings_option() {
    let original = document(vec![ObjectNode::World(World {
        objects: vec![ObjectNode::Mesh(triangle_mesh())],
    })]);
    let bytes = to_vec(&original).unwrap();

    let strict = MeshOptions::new().with_strict_strings(true);
    assert_eq!(from_slice_with_options(&bytes, &strict).unwrap(), original);
}

#[test]
fn test_decoding_under_subscriber() {
    let original = document(vec![ObjectNode::World(World {
        objects: vec![ObjectNode::Mesh(triangle_mesh())],
    })]);
    let bytes = to_vec(&original).unwrap();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let decoded = tracing::subscriber::with_default(subscriber, || from_slice(&bytes)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_json_dump() {
    let original = document(vec![ObjectNode::World(World {
        objects: vec![ObjectNode::Shape(Shape {
            name: "hullMeshShape".to_string(),
            mesh: triangle_mesh(),
        })],
    })]);

    let json = serde_json::to_string(&original).unwrap();
    assert!(json.contains("\"kind\":\"shape\""));
    assert!(json.contains("\"diffuse\":\"triangle_diffuse.dds\""));

    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(back, original);
}
