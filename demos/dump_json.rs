//! Print a `.mesh` file as JSON.
//!
//! Run with: cargo run --example dump_json -- path/to/model.mesh
//!
//! Set `RUST_LOG=trace` to see every record the decoder reads.

use clausewitz_mesh::{from_slice_with_options, MeshOptions};
use std::error::Error;
use std::{env, fs};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .ok_or("usage: dump_json <file.mesh>")?;
    let bytes = fs::read(&path)?;

    let options = MeshOptions::new().with_strict_strings(env::var_os("MESH_STRICT").is_some());
    let document = from_slice_with_options(&bytes, &options)?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
