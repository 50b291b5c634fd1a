//! The rain radar widget.
//!
//! Attaching wires a [`MapSurface`] to a playback controller and a refresh
//! scheduler; detaching tears both timers down again.

use std::sync::Arc;
use tracing::info;

use crate::client::RadarSource;
use crate::colormaps::{get_colormap, PrecipitationColorizer};
use crate::config::Config;
use crate::error::Result;
use crate::playback::{FrameControl, FrameSequencer, PlaybackController, PlaybackHandle};
use crate::projection::from_lon_lat;
use crate::refresh::{RefreshCycle, RefreshScheduler};
use crate::surface::MapSurface;

/// A running radar overlay on one map surface
pub struct RadarWidget {
    playback: PlaybackHandle,
    scheduler: RefreshScheduler,
}

impl RadarWidget {
    /// Attach to a surface and start refreshing immediately.
    ///
    /// Must be called inside a tokio runtime.
    pub fn attach(
        config: &Config,
        source: Arc<dyn RadarSource>,
        surface: &mut dyn MapSurface,
    ) -> Result<Self> {
        config.validate()?;

        let card = &config.card;
        let colormap = get_colormap(&config.colormap)?;
        let colorizer = Arc::new(PrecipitationColorizer::new(colormap.as_ref()));

        surface.set_view(from_lon_lat(card.lon, card.lat), card.zoom);
        let layer = surface.add_image_layer();
        let control = FrameControl::new(surface.add_frame_control());

        let playback = PlaybackController::spawn(
            FrameSequencer::new(layer, control),
            card.autoplay_period(),
            config.discard_stale_refreshes,
        )?;

        let cycle = RefreshCycle::new(source, colorizer, playback.clone(), card.forecast_minutes());
        let scheduler = match RefreshScheduler::start(cycle, config.refresh_interval()) {
            Ok(scheduler) => scheduler,
            Err(e) => {
                playback.shutdown();
                return Err(e);
            }
        };

        info!(
            lat = card.lat,
            lon = card.lon,
            zoom = card.zoom,
            forecast_minutes = card.forecast_minutes(),
            colormap = %config.colormap,
            "Radar widget attached"
        );

        Ok(Self { playback, scheduler })
    }

    /// Handle for driving playback from user input
    pub fn playback(&self) -> &PlaybackHandle {
        &self.playback
    }

    /// Cancel the refresh and autoplay timers.
    ///
    /// Fetches already in flight run to completion but their frames are
    /// never shown.
    pub fn detach(self) {
        self.scheduler.stop();
        self.playback.shutdown();
        info!("Radar widget detached");
    }
}
