//! Frame playback.
//!
//! [`FrameSequencer`] is the synchronous state machine over the frame list,
//! [`PlaybackController`] runs it on a task together with the autoplay timer
//! and [`PlaybackHandle`] is how everything else talks to it.

pub mod control;
pub mod controller;
pub mod sequencer;

pub use control::FrameControl;
pub use controller::{PlaybackController, PlaybackHandle, PlaybackStatus};
pub use sequencer::{FrameSequencer, PlaybackMode, PlaybackState};
