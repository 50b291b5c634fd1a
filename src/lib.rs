//! # regenradar
//!
//! An animated rain radar overlay for map widgets.
//!
//! This library fetches the latest 5-minute precipitation grids for a location,
//! turns each one into a colored, geo-referenced image and plays them back as a
//! looping animation with a slider, a time label and a play/pause toggle.
//!
//! ## Key Features
//!
//! - **Grid decoding**: base64 + zlib compressed little-endian `u16` grids
//! - **Perceptual coloring**: turbo by default, with opacity tied to rain intensity
//! - **Native projections**: frames stay in the radar's polar stereographic plane
//! - **Periodic refresh**: new data every 15 minutes without interrupting playback
//!
//! ## Architecture
//!
//! - **Data Layer**: [`client`] fetches responses, [`decoder`] unpacks grids
//! - **Processing**: [`geometry`] places the grid, [`raster`] colors it
//! - **Playback**: [`playback`] sequences frames, [`refresh`] keeps them current
//! - **Presentation**: [`surface`] abstracts the map, [`widget`] ties it together

pub mod client;
pub mod colormaps;
pub mod config;
pub mod decoder;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod playback;
pub mod projection;
pub mod raster;
pub mod refresh;
pub mod surface;
pub mod widget;

pub use client::{BrightSkyClient, QueryWindow, RadarRecord, RadarResponse, RadarSource};
pub use config::{CardConfig, Config};
pub use error::{RadarError, Result};
pub use geometry::{Extent, GridGeometry};
pub use logging::{
    generate_cycle_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_refresh_stats, log_timed_operation,
};
pub use playback::{PlaybackHandle, PlaybackMode, PlaybackStatus};
pub use raster::{Frame, GeoImage};
pub use surface::{FrameWidgets, HeadlessSurface, ImageLayer, MapSurface, ToggleIcon};
pub use widget::RadarWidget;
