//! Book export formats.

pub mod gltf;

pub use gltf::export_glb;
