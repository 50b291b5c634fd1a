//! Assertion utilities for testing.
//!
//! This module provides helper functions for making assertions in tests,
//! particularly for floating-point comparisons and projected extents.

use regenradar::Extent;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that an extent is a proper rectangle with whole-number corners.
///
/// # Panics
///
/// Panics if the extent is degenerate, inverted or not rounded.
pub fn assert_valid_extent(extent: &Extent) {
    assert!(
        extent.min_x < extent.max_x,
        "Extent has min_x >= max_x: {:?}",
        extent
    );
    assert!(
        extent.min_y < extent.max_y,
        "Extent has min_y >= max_y: {:?}",
        extent
    );

    for value in extent.to_array() {
        assert!(value.is_finite(), "Extent has non-finite corner: {:?}", extent);
        assert_eq!(value, value.round(), "Extent corner is not rounded: {:?}", extent);
    }
}

/// Assert that a value is within expected bounds.
///
/// # Panics
///
/// Panics if `actual` is less than `min` or greater than `max`.
pub fn assert_in_range(actual: f64, min: f64, max: f64) {
    assert!(
        actual >= min && actual <= max,
        "Value not in range: actual = {}, min = {}, max = {}",
        actual,
        min,
        max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0000001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_valid_extent() {
        assert_valid_extent(&Extent {
            min_x: -10.0,
            min_y: 5.0,
            max_x: 20.0,
            max_y: 15.0,
        });
    }

    #[test]
    #[should_panic(expected = "min_x >= max_x")]
    fn test_assert_valid_extent_rejects_inverted() {
        assert_valid_extent(&Extent {
            min_x: 20.0,
            min_y: 5.0,
            max_x: -10.0,
            max_y: 15.0,
        });
    }
}
