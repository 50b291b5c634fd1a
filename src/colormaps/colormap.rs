//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps.

use crate::error::{RadarError, Result};

/// Names accepted by [`get_colormap`]
pub const COLORMAP_NAMES: [&str; 6] = ["turbo", "viridis", "cividis", "plasma", "inferno", "magma"];

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::sequential::*;

    match name.to_lowercase().as_str() {
        "turbo" => Ok(Box::new(Turbo)),
        "viridis" => Ok(Box::new(Viridis)),
        "cividis" => Ok(Box::new(Cividis)),
        "plasma" => Ok(Box::new(Plasma)),
        "inferno" => Ok(Box::new(Inferno)),
        "magma" => Ok(Box::new(Magma)),
        _ => Err(RadarError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}
