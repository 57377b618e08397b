//! The ordered pages of a book and the loop that animates them.

use crate::animator::{PageAnimator, TurnInputs};
use crate::config::{AnimationConfig, PageDimensions, PageSpec};
use crate::error::{CurlError, Result};
use crate::page::{Page, PageGeometryBuilder, TextureLoader};
use crate::types::BoundingBox;
use log::info;
use std::sync::Arc;

/// Depth of a page in the stack.
///
/// Pages sink by one thickness per index and the whole stack moves forward
/// by one thickness per turned page, keeping the turned pages in front.
pub fn depth_offset(page_index: usize, current_page: usize, thickness: f32) -> f32 {
    -(page_index as f32) * thickness + current_page as f32 * thickness
}

/// Owns every page and drives their animation.
pub struct BookAssembly {
    pages: Vec<Page>,
    dims: PageDimensions,
    animator: PageAnimator,
    display_page: usize,
}

impl BookAssembly {
    /// Build every page once, start loading its images and commit its bind
    /// pose.
    pub fn mount(
        specs: &[PageSpec],
        dims: PageDimensions,
        animation: AnimationConfig,
        loader: &TextureLoader,
    ) -> Result<Self> {
        if specs.is_empty() {
            return Err(CurlError::InvalidBook(
                "a book needs at least one page".to_string(),
            ));
        }
        dims.validate()?;
        animation.validate()?;

        let geometry = Arc::new(PageGeometryBuilder::new(dims).build());
        let pages = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let mut page = Page::new(index, spec.clone(), Arc::clone(&geometry), &dims, loader);
                page.commit_bind_pose();
                page
            })
            .collect();

        info!(
            "mounted {} pages ({} vertices, {} bones each, {:?} texture loading)",
            specs.len(),
            geometry.vertex_count(),
            dims.bone_count(),
            loader.mode()
        );

        let mut assembly = Self {
            pages,
            dims,
            animator: PageAnimator::new(animation),
            display_page: 0,
        };
        assembly.sync(0);
        Ok(assembly)
    }

    /// Forward a new displayed page to every page. Geometry and rigs are
    /// untouched; only stacking depth and animation targets change.
    pub fn sync(&mut self, display_page: usize) {
        self.display_page = display_page;
        let thickness = self.dims.thickness;
        for page in &mut self.pages {
            let offset = depth_offset(page.index(), display_page, thickness);
            page.set_depth_offset(offset);
        }
    }

    /// Advance one frame: poll pending images, then ease every ready page.
    ///
    /// Returns the number of pages animated this frame.
    pub fn tick(&mut self, dt: f32) -> usize {
        let total_pages = self.pages.len();
        let mut animated = 0;
        for page in &mut self.pages {
            page.poll_materials();
            if !page.is_ready() {
                continue;
            }
            let inputs = TurnInputs {
                current_page: self.display_page,
                page_index: page.index(),
                total_pages,
            };
            if self.animator.update(page.rig_mut(), &inputs, dt) {
                animated += 1;
            }
        }
        animated
    }

    /// Block until every page's images have resolved.
    pub fn wait_for_textures(&mut self) {
        for page in &mut self.pages {
            page.wait_for_materials();
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn dimensions(&self) -> &PageDimensions {
        &self.dims
    }

    pub fn animator(&self) -> &PageAnimator {
        &self.animator
    }

    pub fn display_page(&self) -> usize {
        self.display_page
    }

    /// Bounds of every page in book space with the current pose.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.pages.iter().flat_map(|page| {
            let transform = page.transform();
            page.skinned_positions().into_iter().map(move |p| {
                transform
                    .transform_point3(glam::Vec3::from_array(p))
                    .to_array()
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemorySource;

    fn specs(n: usize) -> Vec<PageSpec> {
        (0..n)
            .map(|i| PageSpec::new(format!("{}-front.png", i), format!("{}-back.png", i)))
            .collect()
    }

    fn mount(n: usize) -> BookAssembly {
        let loader = TextureLoader::inline(Arc::new(MemorySource::new()));
        BookAssembly::mount(&specs(n), PageDimensions::default(), AnimationConfig::default(), &loader)
            .unwrap()
    }

    #[test]
    fn test_depth_offset() {
        assert_eq!(depth_offset(0, 0, 0.5), 0.0);
        assert_eq!(depth_offset(2, 0, 0.5), -1.0);
        assert_eq!(depth_offset(2, 3, 0.5), 0.5);
    }

    #[test]
    fn test_mount_requires_pages() {
        let loader = TextureLoader::inline(Arc::new(MemorySource::new()));
        let result = BookAssembly::mount(&[], PageDimensions::default(), AnimationConfig::default(), &loader);
        assert!(matches!(result, Err(CurlError::InvalidBook(_))));
    }

    #[test]
    fn test_pages_share_geometry_and_commit_rigs() {
        let book = mount(4);
        assert_eq!(book.page_count(), 4);
        for (i, page) in book.pages().iter().enumerate() {
            assert_eq!(page.index(), i);
            assert!(page.rig().is_committed());
            assert!(std::ptr::eq(page.geometry(), book.pages()[0].geometry()));
        }
    }

    #[test]
    fn test_sync_restacks_pages() {
        let mut book = mount(4);
        let t = book.dimensions().thickness;
        assert!((book.page(3).unwrap().depth_offset() + 3.0 * t).abs() < 1e-7);

        book.sync(2);
        assert_eq!(book.display_page(), 2);
        assert!((book.page(0).unwrap().depth_offset() - 2.0 * t).abs() < 1e-7);
        assert!((book.page(3).unwrap().depth_offset() + t).abs() < 1e-7);
    }

    #[test]
    fn test_tick_animates_ready_pages() {
        let mut book = mount(3);
        assert_eq!(book.tick(1.0 / 60.0), 3);
        // Closed book: only the root bone moves.
        let rig = book.page(1).unwrap().rig();
        assert!(rig.rotation(0) > 0.0);
        assert_eq!(rig.rotation(1), 0.0);
    }

    #[test]
    fn test_tick_skips_loading_pages() {
        struct Slow;
        impl crate::page::TextureSource for Slow {
            fn fetch(&self, _uri: &str) -> Result<Vec<u8>> {
                std::thread::sleep(std::time::Duration::from_secs(2));
                Err(CurlError::TextureFetch("timeout".to_string()))
            }
        }

        let loader = TextureLoader::new(Arc::new(Slow));
        let mut book =
            BookAssembly::mount(&specs(2), PageDimensions::default(), AnimationConfig::default(), &loader)
                .unwrap();
        assert_eq!(book.tick(0.1), 0);
        assert!(book.pages().iter().all(|p| p.rig().rotations().iter().all(|r| *r == 0.0)));
    }

    #[test]
    fn test_turned_pages_swing_to_other_side() {
        let mut book = mount(4);
        book.sync(2);
        for _ in 0..300 {
            book.tick(1.0 / 60.0);
        }
        // Turned pages curl toward +z, unturned toward -z.
        let tip = |index: usize| {
            let rig = book.page(index).unwrap().rig();
            rig.world_transform(rig.bone_count() - 1)
                .transform_point3(glam::Vec3::ZERO)
        };
        assert!(tip(0).z > 0.0);
        assert!(tip(3).z < 0.0);
    }

    #[test]
    fn test_bounds() {
        let book = mount(2);
        let bounds = book.bounds().unwrap();
        assert!((bounds.max[0] - 1.28).abs() < 1e-4);
        assert!(bounds.min[0].abs() < 1e-4);
    }
}
