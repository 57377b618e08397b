//! A single page of the book: mesh, rig and materials.
//!
//! Geometry is built once and shared between pages of the same size. The
//! rig is owned per page; after construction only its bone rotations change.

pub mod geometry;
pub mod loader;
pub mod material;
pub mod rig;
pub mod texture;

pub use geometry::{FaceGroup, PageGeometryBuilder, PageMesh, SkinBinding, Vertex};
pub use loader::{FileSource, LoadMode, MemorySource, PendingTexture, TextureLoader, TextureSource};
pub use material::{MaterialSlot, MaterialState, PageMaterial, PageMaterialSet};
pub use rig::{Bone, BoneChainRig};
pub use texture::TextureData;

use crate::config::{PageDimensions, PageSpec};
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// One leaf of the book.
pub struct Page {
    index: usize,
    spec: PageSpec,
    geometry: Arc<PageMesh>,
    rig: BoneChainRig,
    materials: MaterialState,
    depth_offset: f32,
}

impl Page {
    /// Build the page's rig and start loading its images.
    ///
    /// The rig's bind pose is not committed here; the page stays hidden
    /// until [`Page::commit_bind_pose`] has run.
    pub fn new(
        index: usize,
        spec: PageSpec,
        geometry: Arc<PageMesh>,
        dims: &PageDimensions,
        loader: &TextureLoader,
    ) -> Self {
        let materials = MaterialState::request(loader, &spec.front, &spec.back);
        Self {
            index,
            spec,
            geometry,
            rig: BoneChainRig::build(dims),
            materials,
            depth_offset: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn geometry(&self) -> &PageMesh {
        &self.geometry
    }

    pub fn rig(&self) -> &BoneChainRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut BoneChainRig {
        &mut self.rig
    }

    pub fn commit_bind_pose(&mut self) {
        self.rig.commit_bind_pose();
    }

    pub fn materials(&self) -> Option<&PageMaterialSet> {
        self.materials.materials()
    }

    /// Advance image loading. Returns true once materials are ready.
    pub fn poll_materials(&mut self) -> bool {
        self.materials.poll()
    }

    /// Block until both images have resolved.
    pub fn wait_for_materials(&mut self) {
        self.materials.wait();
    }

    /// A page is drawn and animated only once its rig and materials are ready.
    pub fn is_ready(&self) -> bool {
        self.rig.is_committed() && self.materials.is_ready()
    }

    pub fn depth_offset(&self) -> f32 {
        self.depth_offset
    }

    pub(crate) fn set_depth_offset(&mut self, depth_offset: f32) {
        self.depth_offset = depth_offset;
    }

    /// Placement of the page within the book.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.depth_offset))
    }

    /// Vertex positions in page space after linear-blend skinning with the
    /// current pose.
    pub fn skinned_positions(&self) -> Vec<[f32; 3]> {
        let skin = self.rig.skin_matrices();
        self.geometry
            .vertices
            .iter()
            .map(|vertex| {
                let rest = Vec3::from_array(vertex.position);
                let [j0, j1] = vertex.skin.joints;
                let [w0, w1] = vertex.skin.weights;
                let blended = skin[j0 as usize].transform_point3(rest) * w0
                    + skin[j1 as usize].transform_point3(rest) * w1;
                blended.to_array()
            })
            .collect()
    }
}
