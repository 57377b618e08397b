//! Bone chain rig for a single page.
//!
//! The chain runs along the page's long axis: bone 0 sits on the hinge and
//! every following bone is offset by one segment width from its parent.
//! Bones only rotate about the vertical (Y) axis.

use crate::config::PageDimensions;
use glam::{Mat4, Vec3};

/// A rigid joint in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Offset from the parent bone. Zero for the root.
    pub local_position: Vec3,
    /// Rotation about Y in radians. The only field animation changes.
    pub rotation: f32,
    /// Parent bone index. `None` for the root.
    pub parent: Option<usize>,
}

impl Bone {
    /// Transform from this bone's space to its parent's space.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_translation(self.local_position) * Mat4::from_rotation_y(self.rotation)
    }
}

/// A page's bones plus the transforms derived from them.
///
/// World transforms are only ever produced by [`BoneChainRig::commit_pose`],
/// never set directly. A freshly built rig is not usable until
/// [`BoneChainRig::commit_bind_pose`] has run.
#[derive(Debug, Clone)]
pub struct BoneChainRig {
    bones: Vec<Bone>,
    world: Vec<Mat4>,
    inverse_bind: Vec<Mat4>,
    bind_committed: bool,
}

impl BoneChainRig {
    /// Build `segments + 1` bones, each a child of the previous one.
    pub fn build(dims: &PageDimensions) -> Self {
        let bone_count = dims.bone_count();
        let segment_width = dims.segment_width();
        let bones = (0..bone_count)
            .map(|i| {
                if i == 0 {
                    Bone {
                        local_position: Vec3::ZERO,
                        rotation: 0.0,
                        parent: None,
                    }
                } else {
                    Bone {
                        local_position: Vec3::new(segment_width, 0.0, 0.0),
                        rotation: 0.0,
                        parent: Some(i - 1),
                    }
                }
            })
            .collect();

        Self {
            bones,
            world: vec![Mat4::IDENTITY; bone_count],
            inverse_bind: vec![Mat4::IDENTITY; bone_count],
            bind_committed: false,
        }
    }

    /// Compute world transforms for the current rotations and record them as
    /// the bind pose. Runs once after construction.
    pub fn commit_bind_pose(&mut self) {
        self.commit_pose();
        self.inverse_bind = self.world.iter().map(|m| m.inverse()).collect();
        self.bind_committed = true;
    }

    /// Whether the bind pose has been committed.
    pub fn is_committed(&self) -> bool {
        self.bind_committed
    }

    /// Recompute every world transform from the root down.
    ///
    /// Parents always precede their children in the chain, so a single
    /// forward pass sees each parent's freshly updated transform.
    pub fn commit_pose(&mut self) {
        for i in 0..self.bones.len() {
            let local = self.bones[i].local_transform();
            self.world[i] = match self.bones[i].parent {
                Some(parent) => self.world[parent] * local,
                None => local,
            };
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn rotation(&self, index: usize) -> f32 {
        self.bones[index].rotation
    }

    /// Current rotations of every bone, root first.
    pub fn rotations(&self) -> Vec<f32> {
        self.bones.iter().map(|b| b.rotation).collect()
    }

    /// Set a bone's rotation. World transforms update on the next commit.
    pub fn set_rotation(&mut self, index: usize, rotation: f32) {
        self.bones[index].rotation = rotation;
    }

    /// World transform of a bone as of the last commit.
    pub fn world_transform(&self, index: usize) -> Mat4 {
        self.world[index]
    }

    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind
    }

    /// Per-bone skinning matrices: current world times inverse bind.
    pub fn skin_matrices(&self) -> Vec<Mat4> {
        self.world
            .iter()
            .zip(&self.inverse_bind)
            .map(|(world, inverse_bind)| *world * *inverse_bind)
            .collect()
    }
}
