//! Spherical web mercator, the basemap's projection.

use std::f64::consts::{FRAC_PI_4, PI};

/// Earth radius used by web mercator tiles
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude beyond which web mercator is undefined in practice
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Geographic (lon, lat) in degrees to web mercator metres
pub fn forward(lon: f64, lat: f64) -> [f64; 2] {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    [x, y]
}

/// Web mercator metres to geographic (lon, lat) in degrees
pub fn inverse(x: f64, y: f64) -> [f64; 2] {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    [lon, lat]
}
