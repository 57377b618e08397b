//! The book: state machine plus page assembly.
//!
//! [`Book`] is what hosts hold. Commands go to the [`BookController`]; after
//! every accepted command the displayed page is forwarded to the
//! [`BookAssembly`]. [`Book::frame`] is the one frame loop: it advances the
//! command lock and then animates every page with the elapsed time.

pub mod assembly;
pub mod controller;
pub mod recorder;

pub use assembly::{depth_offset, BookAssembly};
pub use controller::{parse_script, BookController, BookPhase, BookState, Command};
pub use recorder::{AnimationClip, ClipRecorder};

use crate::config::BookConfig;
use crate::error::Result;
use crate::page::{TextureLoader, TextureSource};
use crate::types::CanvasSize;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// A mounted page-turning book.
pub struct Book {
    title: String,
    controller: BookController,
    assembly: BookAssembly,
}

impl Book {
    /// Mount a book, loading page images through `loader`.
    pub fn new(config: &BookConfig, loader: &TextureLoader) -> Result<Self> {
        config.validate()?;
        let assembly = BookAssembly::mount(&config.pages, config.page, config.animation, loader)?;
        let controller = BookController::new(
            assembly.page_count(),
            config.open,
            config.size,
            &config.animation,
        );
        info!("book \"{}\" ready with {} pages", config.title, assembly.page_count());

        let mut book = Self {
            title: config.title.clone(),
            controller,
            assembly,
        };
        book.sync();
        Ok(book)
    }

    /// Mount a book that loads its images on background threads.
    pub fn from_source(config: &BookConfig, source: Arc<dyn TextureSource>) -> Result<Self> {
        Self::new(config, &TextureLoader::new(source))
    }

    fn sync(&mut self) {
        self.assembly.sync(self.controller.display_page());
    }

    fn after_command(&mut self, accepted: bool) -> bool {
        if accepted {
            self.sync();
        }
        accepted
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> BookState {
        self.controller.state()
    }

    pub fn current_page(&self) -> usize {
        self.controller.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.controller.total_pages()
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    pub fn controller(&self) -> &BookController {
        &self.controller
    }

    pub fn assembly(&self) -> &BookAssembly {
        &self.assembly
    }

    pub fn open(&mut self) -> bool {
        let accepted = self.controller.open();
        self.after_command(accepted)
    }

    pub fn close(&mut self) -> bool {
        let accepted = self.controller.close();
        self.after_command(accepted)
    }

    pub fn next(&mut self) -> bool {
        let accepted = self.controller.next();
        self.after_command(accepted)
    }

    pub fn previous(&mut self) -> bool {
        let accepted = self.controller.previous();
        self.after_command(accepted)
    }

    /// Issue a command. `Wait` runs no frames; see [`ClipRecorder`] for
    /// scripted playback.
    pub fn apply(&mut self, command: Command) -> bool {
        let accepted = self.controller.apply(command);
        self.after_command(accepted)
    }

    /// Advance one frame. Returns the number of pages animated.
    pub fn frame(&mut self, dt: Duration) -> usize {
        self.controller.tick(dt);
        self.assembly.tick(dt.as_secs_f32())
    }

    /// Report a new viewport width and get the canvas size to use.
    pub fn resize(&mut self, viewport_width: u32) -> CanvasSize {
        self.controller.resize(viewport_width)
    }

    pub fn canvas(&self) -> CanvasSize {
        self.controller.canvas()
    }

    /// Block until every page image has resolved.
    pub fn wait_for_textures(&mut self) {
        self.assembly.wait_for_textures();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSpec;
    use crate::page::{MemorySource, TextureData};

    const FRAME: Duration = Duration::from_millis(16);

    fn book(pages: usize, open: bool) -> Book {
        let specs = (0..pages)
            .map(|i| PageSpec::new(format!("p{}f", i), format!("p{}b", i)))
            .collect();
        let config = BookConfig::new("Spring Catalog", specs).with_open(open);
        let loader = TextureLoader::inline(Arc::new(MemorySource::new()));
        Book::new(&config, &loader).unwrap()
    }

    fn run(book: &mut Book, duration: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            book.frame(FRAME);
            elapsed += FRAME;
        }
    }

    #[test]
    fn test_exposed_state() {
        let b = book(5, false);
        assert_eq!(b.title(), "Spring Catalog");
        assert_eq!(
            b.state(),
            BookState {
                current_page: 0,
                total_pages: 5,
                is_open: false,
                is_animating: false,
            }
        );
    }

    #[test]
    fn test_initially_open_book_displays_first_page() {
        let b = book(5, true);
        assert_eq!(b.current_page(), 1);
        assert_eq!(b.assembly().display_page(), 1);
    }

    #[test]
    fn test_commands_forward_display_page() {
        let mut b = book(6, false);
        assert!(b.open());
        assert_eq!(b.assembly().display_page(), 1);
        assert!(!b.next());

        run(&mut b, Duration::from_secs(1));
        assert!(!b.is_animating());
        assert!(b.next());
        assert_eq!(b.assembly().display_page(), 2);

        run(&mut b, Duration::from_secs(1));
        assert!(b.close());
        assert_eq!(b.current_page(), 2);
        assert_eq!(b.assembly().display_page(), 0);
    }

    #[test]
    fn test_frames_ease_pages() {
        let mut b = book(4, false);
        b.open();
        run(&mut b, Duration::from_secs(3));
        // Page 0 is turned: its hinge bone swings negative.
        let turned = b.assembly().page(0).unwrap().rig();
        assert!(turned.rotation(0) < 0.0);
        let waiting = b.assembly().page(2).unwrap().rig();
        assert!(waiting.rotation(0) > 0.0);
    }

    #[test]
    fn test_textures_resolve_through_book() {
        let png = TextureData::solid(2, 2, [5, 6, 7, 255]).to_png().unwrap();
        let source = MemorySource::new()
            .with_image("front.png", png.clone())
            .with_image("back.png", png);
        let config = BookConfig::new("t", vec![PageSpec::new("front.png", "back.png")]);
        let mut b = Book::from_source(&config, Arc::new(source)).unwrap();
        b.wait_for_textures();
        assert_eq!(b.frame(FRAME), 1);
        let materials = b.assembly().page(0).unwrap().materials().unwrap();
        assert!(materials.get(crate::page::MaterialSlot::Front).is_textured());
    }

    #[test]
    fn test_resize() {
        let mut b = book(2, false);
        let canvas = b.resize(800);
        assert_eq!(canvas, crate::types::BookSize::Normal.canvas(crate::types::Breakpoint::Tablet));
        assert_eq!(b.canvas(), canvas);
    }
}
