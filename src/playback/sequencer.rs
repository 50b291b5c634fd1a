//! Frame sequencing state machine.
//!
//! Owns the frame list, the displayed index and the play/pause intent. Every
//! change goes through one of the operations below; the autoplay timer itself
//! lives in the controller, which reads [`FrameSequencer::mode`] after each
//! operation.

use std::sync::Arc;
use tracing::debug;

use super::control::FrameControl;
use crate::raster::Frame;
use crate::surface::{ImageLayer, ToggleIcon};

/// Coarse playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// No frames loaded
    Idle,
    /// Frames loaded, autoplay off
    Paused,
    /// Frames loaded, autoplay on
    Playing,
}

/// Frames and position owned by the sequencer
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub frames: Vec<Frame>,
    pub current_index: usize,
    pub playing: bool,
}

/// Drives the overlay layer and frame control through the frame list
pub struct FrameSequencer {
    state: PlaybackState,
    control: FrameControl,
    layer: Box<dyn ImageLayer>,
    loaded_once: bool,
}

impl FrameSequencer {
    pub fn new(layer: Box<dyn ImageLayer>, control: FrameControl) -> Self {
        Self {
            state: PlaybackState::default(),
            control,
            layer,
            loaded_once: false,
        }
    }

    /// Replace the frame list and show its first frame.
    ///
    /// The first non-empty batch starts autoplay; later batches keep whatever
    /// play/pause state the user chose.
    pub fn load_frames(&mut self, frames: Vec<Frame>) {
        debug!(frames = frames.len(), "Loading frames");
        self.state.frames = frames;
        self.state.current_index = 0;
        self.control.reset(self.state.frames.len());
        self.set_frame(Some(0));

        if !self.loaded_once && !self.state.frames.is_empty() {
            self.loaded_once = true;
            self.start_autoplay();
        }
    }

    /// Show a frame, clamped into range. `None` uses the slider position.
    pub fn set_frame(&mut self, index: Option<usize>) {
        let len = self.state.frames.len();
        if len == 0 {
            return;
        }

        let index = index.unwrap_or_else(|| self.control.slider_value()).min(len - 1);
        let frame = &self.state.frames[index];

        self.state.current_index = index;
        self.layer.set_source(Arc::clone(&frame.image));
        self.control.show(index, &frame.label);
    }

    /// Manual scrub: stops autoplay before moving
    pub fn scrub(&mut self, index: usize) {
        self.stop_autoplay();
        self.set_frame(Some(index));
    }

    /// Advance by one, wrapping to the first frame after the last
    pub fn next_frame(&mut self) {
        let len = self.state.frames.len();
        if len == 0 {
            return;
        }
        self.set_frame(Some((self.state.current_index + 1) % len));
    }

    pub fn start_autoplay(&mut self) {
        if !self.state.playing {
            self.state.playing = true;
            self.control.set_icon(ToggleIcon::Pause);
        }
    }

    pub fn stop_autoplay(&mut self) {
        if self.state.playing {
            self.state.playing = false;
            self.control.set_icon(ToggleIcon::Play);
        }
    }

    pub fn toggle_autoplay(&mut self) {
        if self.state.playing {
            self.stop_autoplay();
        } else {
            self.start_autoplay();
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        if self.state.frames.is_empty() {
            PlaybackMode::Idle
        } else if self.state.playing {
            PlaybackMode::Playing
        } else {
            PlaybackMode::Paused
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Label of the displayed frame
    pub fn current_label(&self) -> Option<&str> {
        self.state
            .frames
            .get(self.state.current_index)
            .map(|frame| frame.label.as_str())
    }

    pub fn control(&self) -> &FrameControl {
        &self.control
    }
}
