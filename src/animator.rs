//! Per-frame page curl animation.
//!
//! Every frame each page derives a target rotation for every bone from the
//! book's current page, then eases its bones toward those targets and
//! recommits the skeleton.
//!
//! A turned page does not rotate as a rigid plane. Bones in the first half
//! of the chain (near the hinge) follow an "inside" sine curve, bones in the
//! second half follow an "outside" cosine curve that counters it, and the
//! rotations accumulate down the chain into a bow. The outside term is
//! subtracted; that sign asymmetry produces the convex/concave curl.

use crate::config::AnimationConfig;
use crate::page::BoneChainRig;
use log::trace;
use std::f32::consts::FRAC_PI_2;

/// What a page needs to know about the book to pick its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnInputs {
    /// Page the book is showing (0 when closed on the front cover).
    pub current_page: usize,
    /// This page's position in the book.
    pub page_index: usize,
    pub total_pages: usize,
}

impl TurnInputs {
    /// The page has been turned past.
    pub fn opened(&self) -> bool {
        self.current_page > self.page_index
    }

    /// The book is shut on either cover.
    pub fn book_closed(&self) -> bool {
        self.current_page == 0 || self.current_page == self.total_pages
    }
}

/// Which curve a bone follows. The two halves of the chain are disjoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveRegion {
    /// Near the hinge: `sin(i * 0.2 + 0.25)`.
    Inside(f32),
    /// Near the free edge: `cos(i * 0.3 + 0.09)`.
    Outside(f32),
}

impl CurveRegion {
    pub fn for_bone(bone_index: usize, bone_count: usize) -> Self {
        let i = bone_index as f32;
        if bone_index < bone_count / 2 {
            CurveRegion::Inside((i * 0.2 + 0.25).sin())
        } else {
            CurveRegion::Outside((i * 0.3 + 0.09).cos())
        }
    }
}

/// Computes bone targets and eases rigs toward them.
#[derive(Debug, Clone, Copy)]
pub struct PageAnimator {
    config: AnimationConfig,
}

impl PageAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Rotation of the page as a whole, in radians.
    ///
    /// Turned pages head for -90 degrees and unturned ones for +90. While the
    /// book is open each page is nudged by a small per-index offset so the
    /// stacks fan out instead of coinciding.
    pub fn base_target(&self, inputs: &TurnInputs) -> f32 {
        let mut target = if inputs.opened() { -FRAC_PI_2 } else { FRAC_PI_2 };
        if !inputs.book_closed() {
            target += (inputs.page_index as f32 * self.config.stack_offset_degrees).to_radians();
        }
        target
    }

    /// Target rotation of one bone.
    ///
    /// A closed book turns each page rigidly: the root bone takes the whole
    /// base target and every other bone stays straight.
    pub fn bone_target(
        &self,
        bone_index: usize,
        bone_count: usize,
        base_target: f32,
        book_closed: bool,
    ) -> f32 {
        if book_closed {
            return if bone_index == 0 { base_target } else { 0.0 };
        }

        let (inside, outside) = match CurveRegion::for_bone(bone_index, bone_count) {
            CurveRegion::Inside(weight) => (weight, 0.0),
            CurveRegion::Outside(weight) => (0.0, weight),
        };
        self.config.inside_curve_strength * inside * base_target
            - self.config.outside_curve_strength * outside * base_target
    }

    /// Targets for every bone of a chain.
    pub fn targets(&self, bone_count: usize, inputs: &TurnInputs) -> Vec<f32> {
        let base = self.base_target(inputs);
        let closed = inputs.book_closed();
        (0..bone_count)
            .map(|i| self.bone_target(i, bone_count, base, closed))
            .collect()
    }

    /// Ease the rig one frame toward its targets and recommit the skeleton.
    ///
    /// Returns false without touching the rig if its bind pose has not been
    /// committed yet.
    pub fn update(&self, rig: &mut BoneChainRig, inputs: &TurnInputs, dt: f32) -> bool {
        if !rig.is_committed() {
            trace!("page {} rig not committed, skipping frame", inputs.page_index);
            return false;
        }

        let factor = (self.config.easing_rate * dt.max(0.0)).min(1.0);
        let targets = self.targets(rig.bone_count(), inputs);
        for (i, target) in targets.into_iter().enumerate() {
            let current = rig.rotation(i);
            rig.set_rotation(i, current + (target - current) * factor);
        }
        rig.commit_pose();
        true
    }
}

impl Default for PageAnimator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}
