//! Scripted playback and bone-rotation recording.

use super::{Book, Command};
use log::debug;
use std::time::Duration;

/// Bone rotations sampled at a fixed frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub frame_rate: f32,
    /// Sample times in seconds, starting at 0.
    pub times: Vec<f32>,
    /// Rotations indexed as `[page][bone][frame]`, in radians about Y.
    pub rotations: Vec<Vec<Vec<f32>>>,
}

impl AnimationClip {
    fn new(frame_rate: f32, page_count: usize, bone_count: usize) -> Self {
        Self {
            frame_rate,
            times: Vec::new(),
            rotations: vec![vec![Vec::new(); bone_count]; page_count],
        }
    }

    pub fn frame_count(&self) -> usize {
        self.times.len()
    }

    /// Time of the last sample in seconds.
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn page_count(&self) -> usize {
        self.rotations.len()
    }

    /// Rotation samples of one bone.
    pub fn track(&self, page: usize, bone: usize) -> &[f32] {
        &self.rotations[page][bone]
    }

    fn sample(&mut self, time: f32, book: &Book) {
        self.times.push(time);
        for (page, tracks) in book.assembly().pages().iter().zip(&mut self.rotations) {
            for (bone, track) in page.rig().bones().iter().zip(tracks.iter_mut()) {
                track.push(bone.rotation);
            }
        }
    }
}

/// Drives a book through a command script, recording every frame.
#[derive(Debug, Clone, Copy)]
pub struct ClipRecorder {
    frame_rate: f32,
    settle: Duration,
}

impl ClipRecorder {
    /// Highest sampling rate. Faster rates would shrink the frame time
    /// toward zero and the command lock would never expire.
    pub const MAX_FRAME_RATE: f32 = 1000.0;

    /// Create a recorder sampling at `frame_rate`, clamped to
    /// `1..=MAX_FRAME_RATE`. A NaN rate falls back to 1.
    pub fn new(frame_rate: f32) -> Self {
        Self {
            frame_rate: frame_rate.max(1.0).min(Self::MAX_FRAME_RATE),
            settle: Duration::from_secs(1),
        }
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Extra time recorded after the last command.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.frame_rate)
    }

    /// Play `script` on `book` and return the recorded clip.
    ///
    /// Commands wait for any running lock to expire before they are issued,
    /// so a script describes intent rather than button mashing. Commands the
    /// book rejects for its state are skipped.
    pub fn record(&self, book: &mut Book, script: &[Command]) -> AnimationClip {
        book.wait_for_textures();

        let dims = *book.assembly().dimensions();
        let mut clip = AnimationClip::new(self.frame_rate, book.assembly().page_count(), dims.bone_count());
        let mut frame = 0usize;
        clip.sample(0.0, book);

        for command in script {
            match command {
                Command::Wait(duration) => self.run_for(book, &mut clip, &mut frame, *duration),
                _ => {
                    while book.is_animating() {
                        self.step(book, &mut clip, &mut frame);
                    }
                    if !book.apply(*command) {
                        debug!("script command {} skipped", command);
                    }
                }
            }
        }

        while book.is_animating() {
            self.step(book, &mut clip, &mut frame);
        }
        self.run_for(book, &mut clip, &mut frame, self.settle);
        clip
    }

    fn run_for(&self, book: &mut Book, clip: &mut AnimationClip, frame: &mut usize, duration: Duration) {
        let frames = (duration.as_secs_f32() * self.frame_rate).ceil() as usize;
        for _ in 0..frames {
            self.step(book, clip, frame);
        }
    }

    fn step(&self, book: &mut Book, clip: &mut AnimationClip, frame: &mut usize) {
        book.frame(self.frame_time());
        *frame += 1;
        clip.sample(*frame as f32 / self.frame_rate, book);
    }
}
