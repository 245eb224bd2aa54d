//! Build a locator set, write it to bytes and read the positions back.
//!
//! Run with: cargo run --example locators

use clausewitz_mesh::{from_slice, to_vec, Document, Locator, LocatorSet, Node, ObjectNode};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let turret = Locator {
        rotation: Some([0.0, 0.70710677, 0.0, 0.70710677]),
        ..Locator::new("turret_01", [1.5, 0.0, -2.25])
    };
    let document = Document::new(vec![Node::Object(ObjectNode::LocatorSet(LocatorSet {
        locators: vec![
            Locator::new("root", [0.0, 0.0, 0.0]),
            turret,
            Locator::new("exhaust", [0.0, 0.5, -6.0]),
        ],
    }))]);

    let bytes = to_vec(&document)?;
    println!("Encoded {} bytes", bytes.len());

    let decoded = from_slice(&bytes)?;
    for locator in decoded.locators() {
        match locator.rotation {
            Some(q) => println!("{:<10} at {:?}, rotated {:?}", locator.name, locator.position, q),
            None => println!("{:<10} at {:?}", locator.name, locator.position),
        }
    }

    assert_eq!(decoded, document);
    println!("✓ Round-trip successful");

    Ok(())
}
