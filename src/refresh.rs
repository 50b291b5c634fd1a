//! Periodic refresh of the radar time series.
//!
//! Every tick spawns an independent cycle: fetch, resolve geometry, build all
//! frames, hand the batch to the playback controller. Cycles are not
//! serialized; whichever finishes last is what ends up on screen unless the
//! controller is told to discard stale generations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info_span, Instrument};

use crate::client::{QueryWindow, RadarSource};
use crate::colormaps::PrecipitationColorizer;
use crate::error::{RadarError, Result};
use crate::geometry;
use crate::logging::{
    generate_cycle_id, log_error, log_operation_end, log_operation_start, log_refresh_stats,
    log_timed_operation,
};
use crate::playback::PlaybackHandle;
use crate::raster::build_frames;

/// Everything one refresh cycle needs
#[derive(Clone)]
pub struct RefreshCycle {
    source: Arc<dyn RadarSource>,
    colorizer: Arc<PrecipitationColorizer>,
    playback: PlaybackHandle,
    forecast_minutes: u32,
    attached: Arc<AtomicBool>,
    generations: Arc<AtomicU64>,
}

impl RefreshCycle {
    pub fn new(
        source: Arc<dyn RadarSource>,
        colorizer: Arc<PrecipitationColorizer>,
        playback: PlaybackHandle,
        forecast_minutes: u32,
    ) -> Self {
        Self {
            source,
            colorizer,
            playback,
            forecast_minutes,
            attached: Arc::new(AtomicBool::new(true)),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run one cycle, absorbing any error.
    ///
    /// Returns the number of frames installed, `None` if the cycle failed or
    /// its result was dropped.
    pub async fn refresh(&self) -> Option<usize> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let cycle_id = generate_cycle_id();
        let span = info_span!("refresh", cycle_id = %cycle_id, generation = generation);

        async {
            log_operation_start("refresh", None);
            let start = Instant::now();
            match self.run(generation, &cycle_id).await {
                Ok(installed) => {
                    log_operation_end("refresh", start, installed.is_some());
                    installed
                }
                Err(e) => {
                    log_error(&e, "refresh cycle aborted, keeping previous frames");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, generation: u64, cycle_id: &str) -> Result<Option<usize>> {
        let window = QueryWindow::from_now(self.forecast_minutes);
        let response = self.source.fetch(&window).await?;
        let geometry = geometry::resolve(&response)?;

        let records = response.radar;
        let record_count = records.len();
        let (width, height) = (geometry.width, geometry.height);
        let colorizer = Arc::clone(&self.colorizer);
        let frames = tokio::task::spawn_blocking(move || {
            log_timed_operation("build_frames", || build_frames(&records, &geometry, &colorizer))
        })
        .await
        .map_err(|e| RadarError::ImageGeneration {
            message: format!("frame building task failed: {}", e),
        })??;

        if !self.is_attached() {
            debug!("Widget detached while refreshing, dropping result");
            return Ok(None);
        }

        let frame_count = frames.len();
        self.playback.load_frames(frames, generation)?;
        log_refresh_stats(cycle_id, generation, record_count, frame_count, width, height);
        Ok(Some(frame_count))
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

/// Runs [`RefreshCycle`]s on a fixed period, the first one immediately
pub struct RefreshScheduler {
    cycle: RefreshCycle,
    ticker: AbortHandle,
}

impl RefreshScheduler {
    /// Start refreshing on the current runtime
    pub fn start(cycle: RefreshCycle, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(RadarError::Config {
                message: "Refresh period must be greater than zero".to_string(),
            });
        }

        let looping = cycle.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let cycle = looping.clone();
                // Detached from the ticker so stopping never cancels a fetch mid-flight
                tokio::spawn(async move {
                    cycle.refresh().await;
                });
            }
        });

        debug!(period_secs = period.as_secs(), "Refresh scheduler started");
        Ok(Self {
            cycle,
            ticker: task.abort_handle(),
        })
    }

    /// Cancel the periodic timer and ignore results of in-flight cycles
    pub fn stop(&self) {
        self.cycle.detach();
        self.ticker.abort();
        debug!("Refresh scheduler stopped");
    }

    /// Number of cycles started so far
    pub fn cycles_started(&self) -> u64 {
        self.cycle.generations.load(Ordering::SeqCst)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
