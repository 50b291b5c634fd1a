//! Precipitation intensity to RGBA.
//!
//! Samples are hundredths of a millimetre per five minutes. Intensity
//! saturates at 2.5 mm, opacity ramps to 80% within the first tenth of the
//! range and any non-zero reading keeps a visible floor. Zero is always fully
//! transparent so dry areas never tint the basemap.

use super::colormap::Colormap;

/// Intensity at which the color scale saturates
pub const MAX_INTENSITY: u16 = 250;

/// Opacity plateau as a fraction of full opacity
const ALPHA_CAP: f32 = 0.8;

/// How fast opacity ramps relative to normalized intensity
const ALPHA_SCALE: f32 = 10.0;

/// Minimum alpha for any non-zero sample
const ALPHA_FLOOR: u8 = 50;

/// Normalize a sample into [0, 1], clamping at [`MAX_INTENSITY`]
pub fn normalize(sample: u16) -> f32 {
    sample.min(MAX_INTENSITY) as f32 / MAX_INTENSITY as f32
}

/// Alpha channel for a precipitation sample
pub fn precipitation_alpha(sample: u16) -> u8 {
    if sample == 0 {
        return 0;
    }
    let ramp = (normalize(sample) * ALPHA_SCALE).min(ALPHA_CAP);
    ((ramp * 255.0).round() as u8).max(ALPHA_FLOOR)
}

/// Map a precipitation sample to RGBA using the given colormap
pub fn precipitation_to_rgba(sample: u16, colormap: &dyn Colormap) -> [u8; 4] {
    let [r, g, b, _] = colormap.map_normalized(normalize(sample));
    [r, g, b, precipitation_alpha(sample)]
}

/// Lookup table over the whole clamped intensity range.
///
/// Every sample above [`MAX_INTENSITY`] maps to the same color, so a table of
/// `MAX_INTENSITY + 1` entries covers all `u16` inputs.
#[derive(Debug, Clone)]
pub struct PrecipitationColorizer {
    name: String,
    lut: Vec<[u8; 4]>,
}

impl PrecipitationColorizer {
    /// Precompute the table for a colormap
    pub fn new(colormap: &dyn Colormap) -> Self {
        let lut = (0..=MAX_INTENSITY)
            .map(|sample| precipitation_to_rgba(sample, colormap))
            .collect();
        Self {
            name: colormap.name().to_string(),
            lut,
        }
    }

    /// Color for a single sample
    pub fn color(&self, sample: u16) -> [u8; 4] {
        self.lut[sample.min(MAX_INTENSITY) as usize]
    }

    /// Name of the underlying colormap
    pub fn colormap_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::{get_colormap, Turbo};
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_transparent_for_every_colormap() {
        for name in crate::colormaps::colormap::COLORMAP_NAMES {
            let colormap = get_colormap(name).unwrap();
            assert_eq!(precipitation_to_rgba(0, colormap.as_ref())[3], 0, "{}", name);
        }
    }

    #[test]
    fn test_saturation_clamps() {
        assert_eq!(
            precipitation_to_rgba(250, &Turbo),
            precipitation_to_rgba(10_000, &Turbo)
        );
        assert_eq!(precipitation_alpha(250), precipitation_alpha(u16::MAX));
    }

    #[test]
    fn test_alpha_floor_and_plateau() {
        // 1/250 * 10 * 255 rounds to 10, lifted to the floor
        assert_eq!(precipitation_alpha(1), 50);
        // 20/250 * 10 = 0.8 reaches the plateau
        assert_eq!(precipitation_alpha(20), 204);
        assert_eq!(precipitation_alpha(100), 204);
        // In between, the ramp is linear
        assert_eq!(precipitation_alpha(10), 102);
    }

    #[test]
    fn test_alpha_is_monotonic() {
        let mut previous = 0;
        for sample in 0..=1000u16 {
            let alpha = precipitation_alpha(sample);
            assert!(alpha >= previous, "alpha dropped at {}", sample);
            previous = alpha;
        }
    }

    proptest! {
        #[test]
        fn prop_alpha_is_monotonic(a in any::<u16>(), b in any::<u16>()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(precipitation_alpha(low) <= precipitation_alpha(high));
        }

        #[test]
        fn prop_alpha_clamps_above_max(sample in MAX_INTENSITY..=u16::MAX) {
            prop_assert_eq!(precipitation_alpha(sample), precipitation_alpha(MAX_INTENSITY));
            prop_assert_eq!(normalize(sample), 1.0);
        }

        #[test]
        fn prop_rain_is_visible(sample in 1u16..) {
            let alpha = precipitation_alpha(sample);
            prop_assert!((ALPHA_FLOOR..=204).contains(&alpha));
        }

        #[test]
        fn prop_colorizer_clamps(sample in any::<u16>()) {
            let colorizer = PrecipitationColorizer::new(&Turbo);
            prop_assert_eq!(
                colorizer.color(sample),
                precipitation_to_rgba(sample.min(MAX_INTENSITY), &Turbo)
            );
        }
    }

    #[test]
    fn test_colorizer_matches_direct_mapping() {
        let colorizer = PrecipitationColorizer::new(&Turbo);
        assert_eq!(colorizer.colormap_name(), "turbo");
        for sample in [0u16, 1, 19, 20, 125, 250, 251, 4000, u16::MAX] {
            assert_eq!(colorizer.color(sample), precipitation_to_rgba(sample, &Turbo));
        }
    }
}
