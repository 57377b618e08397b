//! Page materials.
//!
//! A page box needs six materials. The four thin faces share a neutral paper
//! colour; the front and back faces carry the page images. Loading is
//! asynchronous, so a page holds a [`MaterialState`] that is polled every
//! frame until both images have resolved.

use super::loader::{PendingTexture, TextureLoader, TextureOutcome};
use super::texture::TextureData;
use log::warn;
use std::sync::Arc;

/// Colour of the page edges.
pub const EDGE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Colour used for a face whose image could not be loaded.
pub const FALLBACK_COLOR: [f32; 4] = [0.96, 0.94, 0.89, 1.0];

/// Material slots of a page box, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    Top,
    Bottom,
    /// Hinge-side edge.
    Left,
    /// Free edge.
    Right,
    Front,
    Back,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 6] = [
        MaterialSlot::Top,
        MaterialSlot::Bottom,
        MaterialSlot::Left,
        MaterialSlot::Right,
        MaterialSlot::Front,
        MaterialSlot::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One renderable material.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMaterial {
    /// Base colour, multiplied with the texture when present.
    pub color: [f32; 4],
    pub texture: Option<Arc<TextureData>>,
    pub roughness: f32,
}

impl PageMaterial {
    pub fn color(color: [f32; 4]) -> Self {
        Self {
            color,
            texture: None,
            roughness: 1.0,
        }
    }

    pub fn textured(texture: Arc<TextureData>) -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            texture: Some(texture),
            roughness: 0.1,
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

/// The six materials of a page, indexed by [`MaterialSlot`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageMaterialSet {
    materials: [PageMaterial; 6],
}

impl PageMaterialSet {
    /// Build the set from the outcomes of the front and back loads.
    ///
    /// A failed load falls back to [`FALLBACK_COLOR`] for that face only.
    pub fn resolve(front: TextureOutcome, back: TextureOutcome) -> Self {
        let edge = PageMaterial::color(EDGE_COLOR);
        Self {
            materials: [
                edge.clone(),
                edge.clone(),
                edge.clone(),
                edge,
                face_material("front", front),
                face_material("back", back),
            ],
        }
    }

    /// A set with no images at all.
    pub fn untextured() -> Self {
        let edge = PageMaterial::color(EDGE_COLOR);
        let face = PageMaterial::color(FALLBACK_COLOR);
        Self {
            materials: [edge.clone(), edge.clone(), edge.clone(), edge, face.clone(), face],
        }
    }

    pub fn get(&self, slot: MaterialSlot) -> &PageMaterial {
        &self.materials[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialSlot, &PageMaterial)> {
        MaterialSlot::ALL.into_iter().zip(self.materials.iter())
    }
}

fn face_material(face: &str, outcome: TextureOutcome) -> PageMaterial {
    match outcome {
        Ok(texture) => PageMaterial::textured(texture),
        Err(e) => {
            warn!("{} image unavailable, using neutral material: {}", face, e);
            PageMaterial::color(FALLBACK_COLOR)
        }
    }
}

/// Loading progress of a page's materials.
pub enum MaterialState {
    Loading(MaterialLoad),
    Ready(PageMaterialSet),
}

impl MaterialState {
    /// Request both page images.
    pub fn request(loader: &TextureLoader, front: &str, back: &str) -> Self {
        MaterialState::Loading(MaterialLoad {
            front: Slot::Pending(loader.request(front)),
            back: Slot::Pending(loader.request(back)),
        })
    }

    /// Advance loading without blocking. Returns true once ready.
    pub fn poll(&mut self) -> bool {
        if let MaterialState::Loading(load) = self {
            if let Some(set) = load.poll(false) {
                *self = MaterialState::Ready(set);
            }
        }
        self.is_ready()
    }

    /// Block until both images have resolved.
    pub fn wait(&mut self) {
        if let MaterialState::Loading(load) = self {
            if let Some(set) = load.poll(true) {
                *self = MaterialState::Ready(set);
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, MaterialState::Ready(_))
    }

    pub fn materials(&self) -> Option<&PageMaterialSet> {
        match self {
            MaterialState::Ready(set) => Some(set),
            MaterialState::Loading(_) => None,
        }
    }
}

enum Slot {
    Pending(PendingTexture),
    Resolved(Option<TextureOutcome>),
}

impl Slot {
    fn advance(&mut self, block: bool) {
        if let Slot::Pending(pending) = self {
            let outcome = if block { pending.wait() } else { pending.poll() };
            if let Some(outcome) = outcome {
                *self = Slot::Resolved(Some(outcome));
            }
        }
    }

    fn take(&mut self) -> Option<TextureOutcome> {
        match self {
            Slot::Resolved(outcome) => outcome.take(),
            Slot::Pending(_) => None,
        }
    }

    fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(Some(_)))
    }
}

/// The two in-flight image requests of a page.
pub struct MaterialLoad {
    front: Slot,
    back: Slot,
}

impl MaterialLoad {
    fn poll(&mut self, block: bool) -> Option<PageMaterialSet> {
        self.front.advance(block);
        self.back.advance(block);
        if !(self.front.is_resolved() && self.back.is_resolved()) {
            return None;
        }
        let front = self.front.take()?;
        let back = self.back.take()?;
        Some(PageMaterialSet::resolve(front, back))
    }
}
