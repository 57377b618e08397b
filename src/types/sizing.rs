//! Viewport-responsive canvas sizing.

use serde::{Deserialize, Serialize};

/// Size keyword chosen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSize {
    Compact,
    #[default]
    Normal,
}

/// Responsive breakpoint derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// Narrower than 640 px.
    Mobile,
    /// Narrower than 1024 px.
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const TABLET_MIN_WIDTH: u32 = 640;
    pub const DESKTOP_MIN_WIDTH: u32 = 1024;

    /// Classify a viewport width in CSS pixels.
    pub fn from_viewport_width(width: u32) -> Self {
        if width < Self::TABLET_MIN_WIDTH {
            Breakpoint::Mobile
        } else if width < Self::DESKTOP_MIN_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl BookSize {
    /// Fixed canvas size for this keyword at a breakpoint.
    pub fn canvas(self, breakpoint: Breakpoint) -> CanvasSize {
        match (self, breakpoint) {
            (BookSize::Normal, Breakpoint::Mobile) => CanvasSize::new(320, 420),
            (BookSize::Normal, Breakpoint::Tablet) => CanvasSize::new(440, 560),
            (BookSize::Normal, Breakpoint::Desktop) => CanvasSize::new(560, 720),
            (BookSize::Compact, Breakpoint::Mobile) => CanvasSize::new(240, 320),
            (BookSize::Compact, Breakpoint::Tablet) => CanvasSize::new(320, 420),
            (BookSize::Compact, Breakpoint::Desktop) => CanvasSize::new(400, 520),
        }
    }

    /// Canvas size for a viewport width.
    pub fn canvas_for_viewport(self, viewport_width: u32) -> CanvasSize {
        self.canvas(Breakpoint::from_viewport_width(viewport_width))
    }
}
