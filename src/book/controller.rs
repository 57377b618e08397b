//! Book state machine.
//!
//! The controller owns `current_page`, `is_open` and a time-based command
//! lock. Commands issued while the lock is held, or outside their valid
//! state, are ignored: this debounces the host's buttons and is not an
//! error. The lock has no waiters; it simply expires once enough frame time
//! has been fed to [`BookController::tick`].

use crate::config::AnimationConfig;
use crate::error::CurlError;
use crate::types::{BookSize, CanvasSize};
use log::debug;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Resting state of the book. A running transition is reported separately
/// through [`BookState::is_animating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookPhase {
    Closed,
    OpenAtPage(usize),
}

/// Snapshot of the state exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookState {
    pub current_page: usize,
    pub total_pages: usize,
    pub is_open: bool,
    pub is_animating: bool,
}

/// A command a host or script can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Next,
    Previous,
    /// Let time pass without issuing anything.
    Wait(Duration),
}

impl FromStr for Command {
    type Err = CurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "open" => Ok(Command::Open),
            "close" => Ok(Command::Close),
            "next" => Ok(Command::Next),
            "previous" | "prev" => Ok(Command::Previous),
            _ => {
                let ms = token
                    .strip_prefix("wait:")
                    .and_then(|ms| ms.parse::<u64>().ok())
                    .ok_or_else(|| CurlError::InvalidCommand(s.to_string()))?;
                Ok(Command::Wait(Duration::from_millis(ms)))
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Open => write!(f, "open"),
            Command::Close => write!(f, "close"),
            Command::Next => write!(f, "next"),
            Command::Previous => write!(f, "previous"),
            Command::Wait(d) => write!(f, "wait:{}", d.as_millis()),
        }
    }
}

/// Parse a comma- or whitespace-separated command script.
pub fn parse_script(script: &str) -> Result<Vec<Command>, CurlError> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Open/close/turn state machine with a cooperative command lock.
#[derive(Debug, Clone)]
pub struct BookController {
    total_pages: usize,
    current_page: usize,
    is_open: bool,
    lock_remaining: Duration,
    open_lock: Duration,
    turn_lock: Duration,
    size: BookSize,
    canvas: CanvasSize,
}

impl BookController {
    /// Viewport width assumed until the host reports one.
    pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

    pub fn new(total_pages: usize, open: bool, size: BookSize, animation: &AnimationConfig) -> Self {
        Self {
            total_pages,
            current_page: if open { 1 } else { 0 },
            is_open: open,
            lock_remaining: Duration::ZERO,
            open_lock: animation.open_lock(),
            turn_lock: animation.turn_lock(),
            size,
            canvas: size.canvas_for_viewport(Self::DEFAULT_VIEWPORT_WIDTH),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether a transition lock is held.
    pub fn is_animating(&self) -> bool {
        !self.lock_remaining.is_zero()
    }

    pub fn state(&self) -> BookState {
        BookState {
            current_page: self.current_page,
            total_pages: self.total_pages,
            is_open: self.is_open,
            is_animating: self.is_animating(),
        }
    }

    pub fn phase(&self) -> BookPhase {
        if self.is_open {
            BookPhase::OpenAtPage(self.current_page)
        } else {
            BookPhase::Closed
        }
    }

    /// Page the book should display: `current_page` while open, the front
    /// cover while closed.
    pub fn display_page(&self) -> usize {
        if self.is_open {
            self.current_page
        } else {
            0
        }
    }

    /// Last page index `next` may reach. Turning onto it shows the back of
    /// the final content leaf.
    fn last_content_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    fn lock(&mut self, duration: Duration) {
        self.lock_remaining = duration;
    }

    /// Open the book on its first content page.
    pub fn open(&mut self) -> bool {
        if self.is_animating() || self.is_open {
            debug!("open ignored (open={}, animating={})", self.is_open, self.is_animating());
            return false;
        }
        self.is_open = true;
        self.current_page = 1;
        self.lock(self.open_lock);
        debug!("book opened");
        true
    }

    /// Close the book. `current_page` keeps its value.
    pub fn close(&mut self) -> bool {
        if self.is_animating() || !self.is_open {
            debug!("close ignored (open={}, animating={})", self.is_open, self.is_animating());
            return false;
        }
        self.is_open = false;
        self.lock(self.open_lock);
        debug!("book closed at page {}", self.current_page);
        true
    }

    /// Turn forward one page.
    pub fn next(&mut self) -> bool {
        if self.is_animating() || !self.is_open || self.current_page >= self.last_content_page() {
            debug!("next ignored at page {}", self.current_page);
            return false;
        }
        self.current_page += 1;
        self.lock(self.turn_lock);
        debug!("turned to page {}", self.current_page);
        true
    }

    /// Turn back one page.
    pub fn previous(&mut self) -> bool {
        if self.is_animating() || !self.is_open || self.current_page <= 1 {
            debug!("previous ignored at page {}", self.current_page);
            return false;
        }
        self.current_page -= 1;
        self.lock(self.turn_lock);
        debug!("turned back to page {}", self.current_page);
        true
    }

    /// Issue a command. `Wait` only advances the lock timer.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Open => self.open(),
            Command::Close => self.close(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Wait(duration) => {
                self.tick(duration);
                true
            }
        }
    }

    /// Advance the lock timer by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.lock_remaining.is_zero() {
            return;
        }
        self.lock_remaining = self.lock_remaining.saturating_sub(dt);
        if self.lock_remaining.is_zero() {
            debug!("transition lock released");
        }
    }

    pub fn size(&self) -> BookSize {
        self.size
    }

    /// Canvas size for the most recently reported viewport.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Recompute the canvas size for a new viewport width.
    pub fn resize(&mut self, viewport_width: u32) -> CanvasSize {
        self.canvas = self.size.canvas_for_viewport(viewport_width);
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(total_pages: usize) -> BookController {
        BookController::new(total_pages, false, BookSize::Normal, &AnimationConfig::default())
    }

    fn settle(c: &mut BookController) {
        c.tick(Duration::from_secs(5));
        assert!(!c.is_animating());
    }

    #[test]
    fn test_starts_closed() {
        let c = controller(6);
        assert_eq!(c.phase(), BookPhase::Closed);
        assert_eq!(c.current_page(), 0);
        assert!(!c.is_animating());
    }

    #[test]
    fn test_initially_open() {
        let c = BookController::new(6, true, BookSize::Normal, &AnimationConfig::default());
        assert_eq!(c.phase(), BookPhase::OpenAtPage(1));
        assert!(!c.is_animating());
    }

    #[test]
    fn test_open_sets_first_page_and_locks() {
        let mut c = controller(6);
        assert!(c.open());
        assert!(c.is_animating());
        assert_eq!(c.current_page(), 1);
        settle(&mut c);
        assert_eq!(c.state().current_page, 1);
        assert!(c.state().is_open);
    }

    #[test]
    fn test_lock_expires_after_duration() {
        let mut c = controller(6);
        c.open();
        c.tick(Duration::from_millis(799));
        assert!(c.is_animating());
        assert!(!c.next());
        c.tick(Duration::from_millis(1));
        assert!(!c.is_animating());
        assert!(c.next());
    }

    #[test]
    fn test_turn_lock_is_shorter() {
        let mut c = controller(6);
        c.open();
        settle(&mut c);
        c.next();
        c.tick(Duration::from_millis(500));
        assert!(!c.is_animating());
    }

    #[test]
    fn test_commands_ignored_while_closed() {
        let mut c = controller(6);
        assert!(!c.next());
        assert!(!c.previous());
        assert!(!c.close());
        assert_eq!(c.current_page(), 0);
    }

    #[test]
    fn test_open_ignored_while_open() {
        let mut c = controller(6);
        c.open();
        settle(&mut c);
        c.next();
        settle(&mut c);
        assert!(!c.open());
        assert_eq!(c.current_page(), 2);
    }

    #[test]
    fn test_next_stops_at_last_content_page() {
        let total = 7;
        let mut c = controller(total);
        c.open();
        settle(&mut c);
        for _ in 0..total {
            c.next();
            settle(&mut c);
            assert!(c.current_page() >= 1 && c.current_page() <= total - 1);
        }
        assert_eq!(c.current_page(), total - 1);
        assert!(!c.next());
    }

    #[test]
    fn test_previous_stops_at_first_page() {
        let mut c = controller(7);
        c.open();
        settle(&mut c);
        c.next();
        settle(&mut c);
        for _ in 0..5 {
            c.previous();
            settle(&mut c);
            assert!(c.current_page() >= 1);
        }
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_three_page_book() {
        let mut c = controller(3);
        c.open();
        settle(&mut c);
        assert!(c.next());
        assert_eq!(c.current_page(), 2);
        settle(&mut c);
        assert!(!c.next());
        assert_eq!(c.current_page(), 2);
    }

    #[test]
    fn test_last_content_leaf_can_be_turned() {
        let total = 5;
        let mut c = controller(total);
        c.open();
        settle(&mut c);
        while c.next() {
            settle(&mut c);
        }
        let inputs = crate::animator::TurnInputs {
            current_page: c.display_page(),
            page_index: total - 2,
            total_pages: total,
        };
        assert!(inputs.opened());
        assert!(!inputs.book_closed());
    }

    #[test]
    fn test_close_keeps_current_page() {
        let mut c = controller(8);
        c.open();
        settle(&mut c);
        c.next();
        settle(&mut c);
        assert!(c.close());
        assert_eq!(c.phase(), BookPhase::Closed);
        assert_eq!(c.current_page(), 2);
        assert_eq!(c.display_page(), 0);
    }

    #[test]
    fn test_close_twice_is_idempotent() {
        let mut once = controller(8);
        once.open();
        settle(&mut once);
        once.close();
        settle(&mut once);

        let mut twice = controller(8);
        twice.open();
        settle(&mut twice);
        twice.close();
        settle(&mut twice);
        assert!(!twice.close());
        settle(&mut twice);

        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn test_reopen_after_close() {
        let mut c = controller(8);
        c.open();
        settle(&mut c);
        c.next();
        settle(&mut c);
        c.close();
        settle(&mut c);
        assert!(c.open());
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_resize() {
        let mut c = BookController::new(4, false, BookSize::Compact, &AnimationConfig::default());
        assert_eq!(c.canvas(), BookSize::Compact.canvas_for_viewport(1280));
        assert_eq!(c.resize(500), CanvasSize::new(240, 320));
        assert_eq!(c.canvas(), CanvasSize::new(240, 320));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("open".parse::<Command>().unwrap(), Command::Open);
        assert_eq!(" Next ".parse::<Command>().unwrap(), Command::Next);
        assert_eq!("prev".parse::<Command>().unwrap(), Command::Previous);
        assert_eq!(
            "wait:250".parse::<Command>().unwrap(),
            Command::Wait(Duration::from_millis(250))
        );
        assert!(matches!("jump".parse::<Command>(), Err(CurlError::InvalidCommand(_))));
        assert!("wait:soon".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_script() {
        let script = parse_script("open, next next,wait:100 close").unwrap();
        assert_eq!(
            script,
            vec![
                Command::Open,
                Command::Next,
                Command::Next,
                Command::Wait(Duration::from_millis(100)),
                Command::Close,
            ]
        );
        assert_eq!(Command::Wait(Duration::from_millis(100)).to_string(), "wait:100");
    }
}
