//! Colormap implementations for precipitation rendering.
//!
//! This module provides perceptual sequential colormaps and the rain-specific
//! opacity policy layered on top of them.

pub mod colormap;
pub mod precipitation;
pub mod sequential;

pub use colormap::{get_colormap, Colormap};
pub use precipitation::{precipitation_alpha, precipitation_to_rgba, PrecipitationColorizer, MAX_INTENSITY};

// Re-export commonly used colormaps
pub use sequential::{Cividis, Inferno, Magma, Plasma, Turbo, Viridis};
