//! Raster construction for radar frames.
//!
//! Each record is decoded, colored sample by sample and wrapped into a static
//! image source bound to the grid projection and extent of its refresh batch.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::Array2;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::RadarRecord;
use crate::colormaps::PrecipitationColorizer;
use crate::decoder::decode_grid_2d;
use crate::error::{RadarError, Result};
use crate::geometry::{Extent, GridGeometry};

/// Attribution of the upstream radar data
pub const ATTRIBUTION: &str = "© <a href=\"https://www.dwd.de/\">DWD</a>";

/// A static, geo-referenced image
#[derive(Debug, Clone, PartialEq)]
pub struct GeoImage {
    /// Pixels, one per grid cell, row 0 at the top
    pub image: RgbaImage,
    /// Name of the projection the extent is expressed in
    pub projection: String,
    /// Planar rectangle the image is stretched over
    pub extent: Extent,
    /// Whether the surface should smooth the image when scaling
    pub interpolate: bool,
    /// Data provider attribution
    pub attribution: String,
}

impl GeoImage {
    /// Encode the image as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, image::ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// Encode the image as a `data:` URL
    pub fn to_data_url(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }
}

/// One rendered time step
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// `HH:MM` label shown next to the slider
    pub label: String,
    /// Timestamp of the source record
    pub timestamp: String,
    /// Rendered image
    pub image: Arc<GeoImage>,
}

/// `HH:MM` part of an ISO-8601 timestamp
pub fn frame_label(timestamp: &str) -> String {
    let label: String = timestamp.chars().skip(11).take(5).collect();
    if label.is_empty() {
        timestamp.to_string()
    } else {
        label
    }
}

/// Color every grid cell into an image of the same size
pub fn render_grid(grid: &Array2<u16>, colorizer: &PrecipitationColorizer) -> RgbaImage {
    let (height, width) = grid.dim();
    let mut img: RgbaImage = ImageBuffer::new(width as u32, height as u32);

    for ((row, col), &sample) in grid.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Rgba(colorizer.color(sample)));
    }

    img
}

/// Build the frame for one record
pub fn build_frame(
    record: &RadarRecord,
    geometry: &GridGeometry,
    colorizer: &PrecipitationColorizer,
) -> Result<Frame> {
    image_dimensions(geometry)?;
    let grid = decode_grid_2d(&record.precipitation_5, geometry.width, geometry.height)?;
    let image = GeoImage {
        image: render_grid(&grid, colorizer),
        projection: geometry.projection.clone(),
        extent: geometry.extent,
        interpolate: true,
        attribution: ATTRIBUTION.to_string(),
    };

    Ok(Frame {
        label: frame_label(&record.timestamp),
        timestamp: record.timestamp.clone(),
        image: Arc::new(image),
    })
}

/// Image size for a grid; the shared geometry must fit the image's `u32` axes
fn image_dimensions(geometry: &GridGeometry) -> Result<(u32, u32)> {
    match (u32::try_from(geometry.width), u32::try_from(geometry.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(RadarError::Geometry {
            message: format!(
                "grid of {}x{} is too large for an image",
                geometry.width, geometry.height
            ),
        }),
    }
}

/// Build frames for a whole batch, in record order.
///
/// Records that fail to decode are logged and left out. Any other error
/// affects every record alike and aborts the batch.
pub fn build_frames(
    records: &[RadarRecord],
    geometry: &GridGeometry,
    colorizer: &PrecipitationColorizer,
) -> Result<Vec<Frame>> {
    let mut frames = Vec::with_capacity(records.len());
    for record in records {
        match build_frame(record, geometry, colorizer) {
            Ok(frame) => frames.push(frame),
            Err(e) if e.is_record_local() => {
                warn!(
                    timestamp = %record.timestamp,
                    error = %e,
                    "Skipping radar record"
                );
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        records = records.len(),
        frames = frames.len(),
        colormap = colorizer.colormap_name(),
        "Built frame batch"
    );
    Ok(frames)
}
