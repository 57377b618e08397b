//! WASM bindings for page-curl.
//!
//! The browser fetches page images itself and hands the bytes over before
//! mounting; images are then decoded inline since there are no threads.

use crate::book::Book;
use crate::config::BookConfig;
use crate::page::{MemorySource, TextureLoader};
use std::sync::Arc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

/// A page-turning book driven from JavaScript.
#[wasm_bindgen]
pub struct BookHandle {
    config: BookConfig,
    images: MemorySource,
    book: Option<Book>,
}

#[wasm_bindgen]
impl BookHandle {
    /// Parse a JSON book description.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<BookHandle, JsError> {
        let config = BookConfig::from_json(config_json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(BookHandle {
            config,
            images: MemorySource::new(),
            book: None,
        })
    }

    /// Supply the encoded bytes of an image referenced by the book.
    pub fn provide_image(&mut self, uri: &str, data: &[u8]) {
        self.images.insert(uri, data.to_vec());
    }

    /// Build every page. Images not provided by now render untextured.
    pub fn mount(&mut self) -> Result<(), JsError> {
        let loader = TextureLoader::inline(Arc::new(self.images.clone()));
        let book = Book::new(&self.config, &loader).map_err(|e| JsError::new(&e.to_string()))?;
        self.book = Some(book);
        Ok(())
    }

    fn book(&self) -> Result<&Book, JsError> {
        self.book.as_ref().ok_or_else(|| JsError::new("Book is not mounted"))
    }

    fn book_mut(&mut self) -> Result<&mut Book, JsError> {
        self.book.as_mut().ok_or_else(|| JsError::new("Book is not mounted"))
    }

    pub fn open(&mut self) -> Result<bool, JsError> {
        Ok(self.book_mut()?.open())
    }

    pub fn close(&mut self) -> Result<bool, JsError> {
        Ok(self.book_mut()?.close())
    }

    pub fn next(&mut self) -> Result<bool, JsError> {
        Ok(self.book_mut()?.next())
    }

    pub fn previous(&mut self) -> Result<bool, JsError> {
        Ok(self.book_mut()?.previous())
    }

    /// Advance one animation frame. Returns the number of pages animated.
    pub fn frame(&mut self, dt_ms: f64) -> Result<usize, JsError> {
        let dt = Duration::from_secs_f64(dt_ms.max(0.0) / 1000.0);
        Ok(self.book_mut()?.frame(dt))
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.config.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn current_page(&self) -> usize {
        self.book.as_ref().map_or(0, |b| b.current_page())
    }

    #[wasm_bindgen(getter)]
    pub fn total_pages(&self) -> usize {
        self.config.pages.len()
    }

    #[wasm_bindgen(getter)]
    pub fn is_open(&self) -> bool {
        self.book.as_ref().is_some_and(|b| b.is_open())
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.book.as_ref().is_some_and(|b| b.is_animating())
    }

    /// Report the viewport width; returns `[width, height]` of the canvas.
    pub fn resize(&mut self, viewport_width: u32) -> Result<Vec<u32>, JsError> {
        let canvas = self.book_mut()?.resize(viewport_width);
        Ok(vec![canvas.width, canvas.height])
    }

    /// Current bone rotations of one page, in radians.
    pub fn bone_rotations(&self, page: usize) -> Result<Vec<f32>, JsError> {
        let page = self
            .book()?
            .assembly()
            .page(page)
            .ok_or_else(|| JsError::new(&format!("No page {}", page)))?;
        Ok(page.rig().rotations())
    }

    /// Stacking depth of one page.
    pub fn depth_offset(&self, page: usize) -> Result<f32, JsError> {
        let page = self
            .book()?
            .assembly()
            .page(page)
            .ok_or_else(|| JsError::new(&format!("No page {}", page)))?;
        Ok(page.depth_offset())
    }

    /// Export the current pose as GLB bytes.
    pub fn export_glb(&self) -> Result<Vec<u8>, JsError> {
        crate::export_glb(self.book()?.assembly(), None).map_err(|e| JsError::new(&e.to_string()))
    }
}
