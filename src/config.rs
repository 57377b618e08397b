//! Book configuration.
//!
//! A [`BookConfig`] is the construction contract consumed by hosts: a title,
//! the ordered front/back image pairs, the initial open flag and a size
//! keyword. Page dimensions and animation tuning have defaults and can be
//! overridden from the same JSON document.

use crate::error::{CurlError, Result};
use crate::types::BookSize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Physical page dimensions in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDimensions {
    /// Extent along the long (bending) axis, from the hinge at x = 0.
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    /// Number of horizontal segments. The rig has one more bone than this.
    pub segments: usize,
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self {
            width: 1.28,
            height: 1.71,
            thickness: 0.003,
            segments: 30,
        }
    }
}

impl PageDimensions {
    pub fn segment_width(&self) -> f32 {
        self.width / self.segments as f32
    }

    pub fn bone_count(&self) -> usize {
        self.segments + 1
    }

    /// Reject dimensions that cannot produce a mesh.
    pub fn validate(&self) -> Result<()> {
        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        if !finite_positive(self.width)
            || !finite_positive(self.height)
            || !finite_positive(self.thickness)
        {
            return Err(CurlError::InvalidBook(format!(
                "page dimensions must be positive, got {}x{}x{}",
                self.width, self.height, self.thickness
            )));
        }
        if self.segments == 0 {
            return Err(CurlError::InvalidBook(
                "pages need at least one segment".to_string(),
            ));
        }
        // Joint indices are stored as u16, and the last bone is `segments`.
        if self.segments >= u16::MAX as usize {
            return Err(CurlError::InvalidBook(format!(
                "at most {} segments per page, got {}",
                u16::MAX - 1,
                self.segments
            )));
        }
        Ok(())
    }
}

/// Animation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fraction of the remaining distance covered per second of frame time.
    pub easing_rate: f32,
    pub inside_curve_strength: f32,
    pub outside_curve_strength: f32,
    /// Per-page rotation added while the book is open, in degrees.
    pub stack_offset_degrees: f32,
    /// Command lock after open/close.
    pub open_lock_ms: u64,
    /// Command lock after next/previous. Shorter than `open_lock_ms`.
    pub turn_lock_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            easing_rate: 6.0,
            inside_curve_strength: 0.18,
            outside_curve_strength: 0.05,
            stack_offset_degrees: 0.8,
            open_lock_ms: 800,
            turn_lock_ms: 500,
        }
    }
}

impl AnimationConfig {
    pub fn open_lock(&self) -> Duration {
        Duration::from_millis(self.open_lock_ms)
    }

    pub fn turn_lock(&self) -> Duration {
        Duration::from_millis(self.turn_lock_ms)
    }
    /// Reject tuning that would diverge or let turns outlast open/close.
    pub fn validate(&self) -> Result<()> {
        if !self.easing_rate.is_finite() || self.easing_rate < 0.0 {
            return Err(CurlError::InvalidBook(format!(
                "easing rate must be finite and non-negative, got {}",
                self.easing_rate
            )));
        }
        if self.turn_lock_ms >= self.open_lock_ms {
            return Err(CurlError::InvalidBook(format!(
                "turn lock ({}ms) must be shorter than open/close lock ({}ms)",
                self.turn_lock_ms, self.open_lock_ms
            )));
        }
        Ok(())
    }
}

/// Front and back image locations of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub front: String,
    pub back: String,
}

impl PageSpec {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Everything needed to mount a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Display-only title.
    #[serde(default)]
    pub title: String,
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub size: BookSize,
    #[serde(default)]
    pub page: PageDimensions,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl BookConfig {
    /// Create a closed, normal-sized book with default dimensions.
    pub fn new(title: impl Into<String>, pages: Vec<PageSpec>) -> Self {
        Self {
            title: title.into(),
            pages,
            open: false,
            size: BookSize::default(),
            page: PageDimensions::default(),
            animation: AnimationConfig::default(),
        }
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn with_size(mut self, size: BookSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_page_dimensions(mut self, page: PageDimensions) -> Self {
        self.page = page;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Parse and validate a JSON book description.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BookConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON book description from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(CurlError::InvalidBook(
                "a book needs at least one page".to_string(),
            ));
        }
        self.page.validate()?;
        self.animation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_dimensions() {
        let dims = PageDimensions::default();
        assert_eq!(dims.bone_count(), 31);
        assert!((dims.segment_width() * 30.0 - 1.28).abs() < 1e-6);
        assert!(dims.validate().is_ok());
    }

    #[test]
    fn test_from_json_defaults() {
        let config = BookConfig::from_json(
            r#"{ "title": "Lookbook", "pages": [{ "front": "a.png", "back": "b.png" }] }"#,
        )
        .unwrap();
        assert_eq!(config.title, "Lookbook");
        assert_eq!(config.pages.len(), 1);
        assert!(!config.open);
        assert_eq!(config.size, BookSize::Normal);
        assert_eq!(config.page, PageDimensions::default());
    }

    #[test]
    fn test_partial_overrides() {
        let config = BookConfig::from_json(
            r#"{
                "pages": [{ "front": "a.png", "back": "b.png" }],
                "size": "compact",
                "page": { "segments": 8 },
                "animation": { "turn_lock_ms": 250 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.size, BookSize::Compact);
        assert_eq!(config.page.segments, 8);
        assert_eq!(config.page.width, 1.28);
        assert_eq!(config.animation.turn_lock_ms, 250);
        assert_eq!(config.animation.open_lock_ms, 800);
    }

    #[test]
    fn test_empty_book_rejected() {
        let result = BookConfig::from_json(r#"{ "pages": [] }"#);
        assert!(matches!(result, Err(CurlError::InvalidBook(_))));
    }

    #[test]
    fn test_zero_segments_rejected() {
        let config = BookConfig::new("x", vec![PageSpec::new("a", "b")])
            .with_page_dimensions(PageDimensions {
                segments: 0,
                ..Default::default()
            });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_segments_fit_joint_indices() {
        let max = PageDimensions {
            segments: u16::MAX as usize - 1,
            ..Default::default()
        };
        assert!(max.validate().is_ok());

        let too_many = PageDimensions {
            segments: 70_000,
            ..Default::default()
        };
        assert!(matches!(too_many.validate(), Err(CurlError::InvalidBook(_))));
    }

    #[test]
    fn test_negative_easing_rejected() {
        let result = BookConfig::from_json(
            r#"{ "pages": [{ "front": "a", "back": "b" }], "animation": { "easing_rate": -6.0 } }"#,
        );
        assert!(matches!(result, Err(CurlError::InvalidBook(_))));

        let nan = AnimationConfig {
            easing_rate: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
        assert!(AnimationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_turn_lock_must_be_shorter() {
        let result = BookConfig::from_json(
            r#"{ "pages": [{ "front": "a", "back": "b" }], "animation": { "turn_lock_ms": 2000 } }"#,
        );
        assert!(matches!(result, Err(CurlError::InvalidBook(_))));

        let equal = AnimationConfig {
            turn_lock_ms: 800,
            ..Default::default()
        };
        assert!(equal.validate().is_err());

        let defaults = AnimationConfig::default();
        assert!(defaults.turn_lock() < defaults.open_lock());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "title": "Catalog", "open": true, "pages": [{{ "front": "f.jpg", "back": "b.jpg" }}] }}"#
        )
        .unwrap();

        let config = BookConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Catalog");
        assert!(config.open);
    }

    #[test]
    fn test_load_missing_file() {
        let result = BookConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(CurlError::Io(_))));
    }
}
