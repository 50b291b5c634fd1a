//! Sequential colormaps (low to high progression).
//!
//! Backed by the `colorgrad` presets. All of them are opaque; transparency is
//! decided by the precipitation policy, not by the palette.

use super::colormap::Colormap;

fn sample(gradient: colorgrad::Gradient, value: f32) -> [u8; 4] {
    let [r, g, b, _] = gradient.at(value.clamp(0.0, 1.0) as f64).to_rgba8();
    [r, g, b, 255]
}

/// Turbo colormap - blue to green to yellow to red, high contrast rainbow
pub struct Turbo;

impl Colormap for Turbo {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::turbo(), value)
    }

    fn name(&self) -> &str {
        "turbo"
    }
}

/// Viridis colormap - perceptually uniform, colorblind-friendly
pub struct Viridis;

impl Colormap for Viridis {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::viridis(), value)
    }

    fn name(&self) -> &str {
        "viridis"
    }
}

/// Cividis colormap - optimized for color vision deficiency
pub struct Cividis;

impl Colormap for Cividis {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::cividis(), value)
    }

    fn name(&self) -> &str {
        "cividis"
    }
}

/// Plasma colormap
pub struct Plasma;

impl Colormap for Plasma {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::plasma(), value)
    }

    fn name(&self) -> &str {
        "plasma"
    }
}

/// Inferno colormap
pub struct Inferno;

impl Colormap for Inferno {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::inferno(), value)
    }

    fn name(&self) -> &str {
        "inferno"
    }
}

/// Magma colormap
pub struct Magma;

impl Colormap for Magma {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        sample(colorgrad::magma(), value)
    }

    fn name(&self) -> &str {
        "magma"
    }
}
