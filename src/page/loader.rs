//! Texture sources and non-blocking texture loading.
//!
//! Each page image is fetched once. In background mode the fetch and decode
//! run on a worker thread and the result is handed back through a channel,
//! so the frame loop only ever polls.

use super::texture::{load_texture_from_bytes, TextureData};
use crate::error::{CurlError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Result of loading one texture.
pub type TextureOutcome = Result<Arc<TextureData>>;

/// Something that can supply encoded image bytes for a URI.
pub trait TextureSource: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Reads images from files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for FileSource {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root.join(uri);
        std::fs::read(&path)
            .map_err(|e| CurlError::TextureFetch(format!("{}: {}", path.display(), e)))
    }
}

/// Serves images from memory, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    images: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(uri.into(), bytes);
    }

    pub fn with_image(mut self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl TextureSource for MemorySource {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        self.images
            .get(uri)
            .cloned()
            .ok_or_else(|| CurlError::TextureFetch(format!("no image for {}", uri)))
    }
}

/// How requests are serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// One worker thread per request.
    #[default]
    Background,
    /// Fetch and decode during `request`; the outcome is handed out on the
    /// first poll. For targets without threads.
    Inline,
}

/// Issues texture requests against a source.
#[derive(Clone)]
pub struct TextureLoader {
    source: Arc<dyn TextureSource>,
    mode: LoadMode,
}

impl TextureLoader {
    /// Create a loader that decodes on background threads.
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        Self {
            source,
            mode: LoadMode::Background,
        }
    }

    /// Create a loader that decodes on the calling thread.
    pub fn inline(source: Arc<dyn TextureSource>) -> Self {
        Self {
            source,
            mode: LoadMode::Inline,
        }
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Start loading `uri`.
    pub fn request(&self, uri: &str) -> PendingTexture {
        match self.mode {
            LoadMode::Inline => PendingTexture::ready(uri, fetch_and_decode(&*self.source, uri)),
            LoadMode::Background => {
                let (sender, receiver) = mpsc::channel();
                let source = Arc::clone(&self.source);
                let owned_uri = uri.to_string();
                let spawned = thread::Builder::new()
                    .name("page-texture".to_string())
                    .spawn(move || {
                        // The receiver may already be gone if the book was dropped.
                        let _ = sender.send(fetch_and_decode(&*source, &owned_uri));
                    });
                match spawned {
                    Ok(_) => PendingTexture {
                        uri: uri.to_string(),
                        state: PendingState::Waiting(receiver),
                    },
                    Err(e) => PendingTexture::ready(uri, Err(CurlError::Io(e))),
                }
            }
        }
    }
}

fn fetch_and_decode(source: &dyn TextureSource, uri: &str) -> TextureOutcome {
    let bytes = source.fetch(uri)?;
    let texture = load_texture_from_bytes(&bytes)?;
    Ok(Arc::new(texture))
}

enum PendingState {
    Waiting(Receiver<TextureOutcome>),
    Done(Option<TextureOutcome>),
}

/// A texture request in flight. Its outcome is handed out exactly once.
pub struct PendingTexture {
    uri: String,
    state: PendingState,
}

impl PendingTexture {
    fn ready(uri: &str, outcome: TextureOutcome) -> Self {
        Self {
            uri: uri.to_string(),
            state: PendingState::Done(Some(outcome)),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Take the outcome if it has arrived. Never blocks.
    pub fn poll(&mut self) -> Option<TextureOutcome> {
        let outcome = match &mut self.state {
            PendingState::Done(outcome) => return outcome.take(),
            PendingState::Waiting(receiver) => match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(CurlError::TextureFetch(format!(
                    "loader for {} stopped without a result",
                    self.uri
                ))),
            },
        };
        self.state = PendingState::Done(None);
        Some(outcome)
    }

    /// Block until the outcome arrives. `None` if it was already taken.
    pub fn wait(&mut self) -> Option<TextureOutcome> {
        let outcome = match &mut self.state {
            PendingState::Done(outcome) => return outcome.take(),
            PendingState::Waiting(receiver) => receiver.recv().unwrap_or_else(|_| {
                Err(CurlError::TextureFetch(format!(
                    "loader for {} stopped without a result",
                    self.uri
                )))
            }),
        };
        self.state = PendingState::Done(None);
        Some(outcome)
    }
}
