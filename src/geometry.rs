//! Geo-referencing of radar grids.
//!
//! Converts the corner polygon and pixel bounding box of a response into the
//! grid dimensions and the planar extent the raster is stretched over.

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::client::RadarResponse;
use crate::error::{RadarError, Result};
use crate::projection::{self, GEOGRAPHIC};

/// Name under which the radar grid projection is registered
pub const GRID_PROJECTION: &str = "DE1200";

/// Polar stereographic definition of the radar grid
pub const GRID_PROJ4: &str = "+proj=stere +lat_0=90 +lat_ts=60 +lon_0=10 +a=6378137 \
    +b=6356752.3142451802 +no_defs +x_0=543196.83521776402 +y_0=3622588.8619310018";

static GRID_PROJECTION_REGISTERED: OnceCell<()> = OnceCell::new();

/// Planar bounding rectangle in the grid projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// `[min_x, min_y, max_x, max_y]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the extent
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ]
    }
}

/// Inclusive pixel bounds of the returned grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub top: i64,
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
}

impl PixelBox {
    /// Parse the service's `[top, left, bottom, right]` array
    pub fn from_slice(bbox: &[i64]) -> Result<Self> {
        match bbox {
            [top, left, bottom, right] => Ok(Self {
                top: *top,
                left: *left,
                bottom: *bottom,
                right: *right,
            }),
            _ => Err(RadarError::Geometry {
                message: format!("bbox must have 4 entries, got {}", bbox.len()),
            }),
        }
    }

    /// Grid width and height in pixels
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        let width = span(self.left, self.right)?;
        let height = span(self.top, self.bottom)?;
        if width <= 0 || height <= 0 {
            return Err(RadarError::Geometry {
                message: format!("bbox resolves to an empty grid ({}x{})", width, height),
            });
        }

        let too_large = |_| RadarError::Geometry {
            message: format!("bbox of {}x{} pixels is too large", width, height),
        };
        Ok((
            usize::try_from(width).map_err(too_large)?,
            usize::try_from(height).map_err(too_large)?,
        ))
    }
}

/// Inclusive pixel count between two bounds
fn span(low: i64, high: i64) -> Result<i64> {
    high.checked_sub(low)
        .and_then(|d| d.checked_add(1))
        .ok_or_else(|| RadarError::Geometry {
            message: format!("bbox bounds {}..={} overflow", low, high),
        })
}

/// Everything the raster builder needs to place a grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub width: usize,
    pub height: usize,
    pub projection: String,
    pub extent: Extent,
}

/// Register the grid projection, once per process
pub fn ensure_grid_projection() -> Result<()> {
    GRID_PROJECTION_REGISTERED
        .get_or_try_init(|| projection::register_proj4(GRID_PROJECTION, GRID_PROJ4).map(|_| ()))
        .map(|_| ())
        .map_err(|e| RadarError::Geometry {
            message: format!("cannot register {}: {}", GRID_PROJECTION, e),
        })
}

fn corner(points: &[Vec<f64>], index: usize) -> Result<[f64; 2]> {
    match points.get(index).map(Vec::as_slice) {
        Some([lon, lat, ..]) if lon.is_finite() && lat.is_finite() => Ok([*lon, *lat]),
        _ => Err(RadarError::Geometry {
            message: format!("corner {} is missing or not a [lon, lat] pair", index),
        }),
    }
}

/// Resolve grid dimensions and extent for a response
pub fn resolve(response: &RadarResponse) -> Result<GridGeometry> {
    ensure_grid_projection()?;

    let geometry = response.geometry.as_ref().ok_or_else(|| RadarError::Geometry {
        message: "response has no geometry".to_string(),
    })?;
    if geometry.coordinates.len() < 4 {
        return Err(RadarError::Geometry {
            message: format!(
                "expected 4 corner points, got {}",
                geometry.coordinates.len()
            ),
        });
    }

    let bbox = response.bbox.as_deref().ok_or_else(|| RadarError::Geometry {
        message: "response has no bbox".to_string(),
    })?;
    let (width, height) = PixelBox::from_slice(bbox)?.dimensions()?;

    let to_grid = |point: [f64; 2]| {
        projection::transform(point, GEOGRAPHIC, GRID_PROJECTION)
            .map(|[x, y]| [x.round(), y.round()])
            .map_err(|e| RadarError::Geometry {
                message: e.to_string(),
            })
    };
    let top_left = to_grid(corner(&geometry.coordinates, 0)?)?;
    let bottom_right = to_grid(corner(&geometry.coordinates, 2)?)?;

    // Grid rows run north to south: the top-left corner carries the larger y
    let extent = Extent {
        min_x: top_left[0],
        min_y: bottom_right[1],
        max_x: bottom_right[0],
        max_y: top_left[1],
    };
    if extent.width() <= 0.0 || extent.height() <= 0.0 {
        return Err(RadarError::Geometry {
            message: format!("degenerate extent {:?}", extent.to_array()),
        });
    }

    Ok(GridGeometry {
        width,
        height,
        projection: GRID_PROJECTION.to_string(),
        extent,
    })
}
