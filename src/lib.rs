//! # Page Curl
//!
//! A procedural page-turning book renderer.
//!
//! ## Overview
//!
//! Every page of a book is a thin box, subdivided along its width and
//! skinned to a chain of bones. Turning a page never moves vertices
//! directly: each frame the bone rotations ease toward targets computed
//! from the page's position relative to the current page, and linear-blend
//! skinning bends the sheet into a curl.
//!
//! ## Quick Start
//!
//! ```ignore
//! use page_curl::{Book, BookConfig, FileSource, export_glb};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // Describe the book and where its page images live
//! let config = BookConfig::load("book.json")?;
//! let mut book = Book::from_source(&config, Arc::new(FileSource::new("pages/")))?;
//!
//! // Drive it like a UI would
//! book.open();
//! for _ in 0..60 {
//!     book.frame(Duration::from_millis(16));
//! }
//!
//! // Export the current pose
//! let glb_bytes = export_glb(book.assembly(), None)?;
//! ```
//!
//! ## Scripted Playback
//!
//! A [`ClipRecorder`] plays a command script on a book and samples every
//! bone, producing an [`AnimationClip`] that exports as a glTF animation:
//!
//! ```ignore
//! use page_curl::{parse_script, ClipRecorder, export_glb};
//!
//! let script = parse_script("open next next wait:500 close")?;
//! let clip = ClipRecorder::new(30.0).record(&mut book, &script);
//! let glb_bytes = export_glb(book.assembly(), Some(&clip))?;
//! ```

pub mod error;
pub mod config;
pub mod types;
pub mod page;
pub mod animator;
pub mod book;
pub mod export;

// Re-export main types for convenience
pub use error::{CurlError, Result};
pub use config::{AnimationConfig, BookConfig, PageDimensions, PageSpec};
pub use types::{BookSize, BoundingBox, Breakpoint, CanvasSize};
pub use page::{
    BoneChainRig, FileSource, MaterialSlot, MemorySource, Page, PageMaterialSet, PageMesh,
    TextureData, TextureLoader, TextureSource,
};
pub use animator::{PageAnimator, TurnInputs};
pub use book::{
    parse_script, AnimationClip, Book, BookAssembly, BookController, BookState, ClipRecorder,
    Command,
};
pub use export::gltf::export_glb;

/// Load a book description from a JSON file.
pub fn load_book_config<P: AsRef<std::path::Path>>(path: P) -> Result<BookConfig> {
    BookConfig::load(path)
}

#[cfg(feature = "wasm")]
pub mod wasm;
