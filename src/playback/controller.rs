//! Playback controller task.
//!
//! A single task owns the [`FrameSequencer`] and the autoplay interval. User
//! input, refresh results and timer ticks are handled one at a time in the
//! order they arrive, so a scrub and a tick can never interleave.

use std::future::pending;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::sequencer::{FrameSequencer, PlaybackMode};
use crate::error::{RadarError, Result};
use crate::raster::Frame;

/// Snapshot of the controller's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub mode: PlaybackMode,
    pub current_index: usize,
    pub frame_count: usize,
    pub label: Option<String>,
    /// Number of live autoplay timers, 0 or 1
    pub pending_timers: usize,
    /// Refresh generation of the displayed frames
    pub generation: Option<u64>,
}

#[derive(Debug)]
enum Command {
    Load { frames: Vec<Frame>, generation: u64 },
    SetFrame(Option<usize>),
    Scrub(usize),
    Next,
    Play,
    Pause,
    Toggle,
    Status(oneshot::Sender<PlaybackStatus>),
}

/// Task that owns the sequencer and its autoplay timer
pub struct PlaybackController {
    sequencer: FrameSequencer,
    period: Duration,
    autoplay: Option<Interval>,
    discard_stale: bool,
    newest_generation: Option<u64>,
    displayed_generation: Option<u64>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl PlaybackController {
    /// Start the controller on the current runtime
    pub fn spawn(
        sequencer: FrameSequencer,
        period: Duration,
        discard_stale: bool,
    ) -> Result<PlaybackHandle> {
        if period.is_zero() {
            return Err(RadarError::Config {
                message: "Autoplay period must be greater than zero".to_string(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            sequencer,
            period,
            autoplay: None,
            discard_stale,
            newest_generation: None,
            displayed_generation: None,
            commands: rx,
        };

        let task = tokio::spawn(controller.run());
        Ok(PlaybackHandle {
            commands: tx,
            abort: task.abort_handle(),
        })
    }

    async fn run(mut self) {
        debug!(period_ms = self.period.as_millis() as u64, "Playback controller started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = tick(&mut self.autoplay) => self.sequencer.next_frame(),
            }
            self.sync_timer();
        }
        debug!("Playback controller stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Load { frames, generation } => self.load(frames, generation),
            Command::SetFrame(index) => self.sequencer.set_frame(index),
            Command::Scrub(index) => self.sequencer.scrub(index),
            Command::Next => self.sequencer.next_frame(),
            Command::Play => self.sequencer.start_autoplay(),
            Command::Pause => self.sequencer.stop_autoplay(),
            Command::Toggle => self.sequencer.toggle_autoplay(),
            Command::Status(reply) => {
                // The caller may have given up waiting
                let _ = reply.send(self.status());
            }
        }
    }

    fn load(&mut self, frames: Vec<Frame>, generation: u64) {
        if self.discard_stale && self.newest_generation.is_some_and(|newest| generation < newest) {
            warn!(
                generation = generation,
                newest = ?self.newest_generation,
                "Discarding stale refresh result"
            );
            return;
        }

        self.newest_generation = self.newest_generation.max(Some(generation));
        self.displayed_generation = Some(generation);
        info!(generation = generation, frames = frames.len(), "Installing frames");
        self.sequencer.load_frames(frames);

        // Give the first frame of the new batch a full period on screen
        if let Some(timer) = self.autoplay.as_mut() {
            timer.reset();
        }
    }

    /// Start or drop the interval so it runs exactly while playing
    fn sync_timer(&mut self) {
        let should_run = self.sequencer.mode() == PlaybackMode::Playing;
        match (should_run, self.autoplay.is_some()) {
            (true, false) => {
                let mut timer = interval_at(Instant::now() + self.period, self.period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.autoplay = Some(timer);
                debug!("Autoplay timer started");
            }
            (false, true) => {
                self.autoplay = None;
                debug!("Autoplay timer cancelled");
            }
            _ => {}
        }
    }

    fn status(&self) -> PlaybackStatus {
        let state = self.sequencer.state();
        PlaybackStatus {
            mode: self.sequencer.mode(),
            current_index: state.current_index,
            frame_count: state.frames.len(),
            label: self.sequencer.current_label().map(str::to_string),
            pending_timers: usize::from(self.autoplay.is_some()),
            generation: self.displayed_generation,
        }
    }
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => pending::<()>().await,
    }
}

/// Cloneable handle to a running [`PlaybackController`]
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<Command>,
    abort: AbortHandle,
}

impl PlaybackHandle {
    fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).map_err(|_| RadarError::Playback {
            message: "playback controller has stopped".to_string(),
        })
    }

    /// Replace the frame list with a refresh result
    pub fn load_frames(&self, frames: Vec<Frame>, generation: u64) -> Result<()> {
        self.send(Command::Load { frames, generation })
    }

    /// Show a frame; `None` re-shows the slider position
    pub fn set_frame(&self, index: Option<usize>) -> Result<()> {
        self.send(Command::SetFrame(index))
    }

    /// User moved the slider: pause and show the frame
    pub fn scrub(&self, index: usize) -> Result<()> {
        self.send(Command::Scrub(index))
    }

    pub fn next_frame(&self) -> Result<()> {
        self.send(Command::Next)
    }

    pub fn start_autoplay(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn stop_autoplay(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    /// User clicked the play/pause toggle
    pub fn toggle_autoplay(&self) -> Result<()> {
        self.send(Command::Toggle)
    }

    /// Current state, after every previously sent command was applied
    pub async fn status(&self) -> Result<PlaybackStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Status(tx))?;
        rx.await.map_err(|_| RadarError::Playback {
            message: "playback controller stopped before replying".to_string(),
        })
    }

    /// Stop the controller; its timer and state are dropped with the task
    pub fn shutdown(&self) {
        self.abort.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}
