//! Polar stereographic projection on an ellipsoid.
//!
//! Follows the usual PROJ `stere` formulation for polar aspects (Snyder,
//! "Map Projections: A Working Manual", eq. 21-33 onwards). Coordinates are
//! degrees in, metres out.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::{RadarError, Result};

/// Iteration limit for the inverse latitude series
const MAX_ITERATIONS: usize = 15;

/// Convergence tolerance for the inverse latitude, in radians
const TOLERANCE: f64 = 1e-12;

/// Which pole the projection plane touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

/// Polar stereographic projection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographic {
    /// Pole of the projection
    pub pole: Pole,
    /// Central meridian in degrees
    pub lon_0: f64,
    /// Latitude of true scale in degrees
    pub lat_ts: f64,
    /// Semi-major axis in metres
    pub a: f64,
    /// First eccentricity
    pub e: f64,
    /// False easting in metres
    pub x_0: f64,
    /// False northing in metres
    pub y_0: f64,
    /// Scale factor for the unit ellipsoid, derived from `lat_ts`
    akm1: f64,
}

impl PolarStereographic {
    /// Build a projection from ellipsoid axes and origin parameters
    pub fn new(pole: Pole, lon_0: f64, lat_ts: f64, a: f64, b: f64, x_0: f64, y_0: f64) -> Result<Self> {
        if a <= 0.0 || b <= 0.0 || b > a {
            return Err(RadarError::InvalidParameter {
                param: "ellipsoid".to_string(),
                message: format!("invalid axes a={} b={}", a, b),
            });
        }
        if !(-90.0..=90.0).contains(&lat_ts) {
            return Err(RadarError::InvalidParameter {
                param: "lat_ts".to_string(),
                message: format!("latitude of true scale {} out of range", lat_ts),
            });
        }

        let e = (1.0 - (b * b) / (a * a)).sqrt();
        let phits = lat_ts.abs().to_radians();

        let akm1 = if (phits - FRAC_PI_2).abs() < 1e-10 {
            2.0 / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            let sinphits = phits.sin();
            phits.cos() / tsfn(phits, sinphits, e) / (1.0 - (e * sinphits).powi(2)).sqrt()
        };

        Ok(Self {
            pole,
            lon_0,
            lat_ts,
            a,
            e,
            x_0,
            y_0,
            akm1,
        })
    }

    /// Geographic (lon, lat) in degrees to projected (x, y) in metres
    pub fn forward(&self, lon: f64, lat: f64) -> [f64; 2] {
        let lam = (lon - self.lon_0).to_radians();
        let (sinlam, mut coslam) = lam.sin_cos();
        let mut phi = lat.to_radians();

        if self.pole == Pole::South {
            phi = -phi;
            coslam = -coslam;
        }

        let rho = self.akm1 * tsfn(phi, phi.sin(), self.e);
        let x = rho * sinlam;
        let y = -rho * coslam;

        [self.a * x + self.x_0, self.a * y + self.y_0]
    }

    /// Projected (x, y) in metres to geographic (lon, lat) in degrees
    pub fn inverse(&self, x: f64, y: f64) -> [f64; 2] {
        let x = (x - self.x_0) / self.a;
        let mut y = (y - self.y_0) / self.a;
        if self.pole == Pole::North {
            y = -y;
        }

        let rho = x.hypot(y);
        let t = rho / self.akm1;
        let half_e = 0.5 * self.e;

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let esinphi = self.e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - esinphi) / (1.0 + esinphi)).powf(half_e)).atan();
            let done = (next - phi).abs() < TOLERANCE;
            phi = next;
            if done {
                break;
            }
        }

        let lam = if rho == 0.0 { 0.0 } else { x.atan2(y) };

        let (lon, lat) = match self.pole {
            Pole::North => (lam, phi),
            Pole::South => (lam, -phi),
        };
        [normalize_lon(lon.to_degrees() + self.lon_0), lat.to_degrees()]
    }
}

/// Isometric co-latitude function `t` of the ellipsoid
fn tsfn(phi: f64, sinphi: f64, e: f64) -> f64 {
    let esinphi = e * sinphi;
    (FRAC_PI_4 - 0.5 * phi).tan() / ((1.0 - esinphi) / (1.0 + esinphi)).powf(0.5 * e)
}

fn normalize_lon(lon: f64) -> f64 {
    let mut normalized = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if normalized == -180.0 && lon > 0.0 {
        normalized = 180.0;
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: f64 = 6378137.0;
    const B: f64 = 6356752.3142451802;

    fn de1200() -> PolarStereographic {
        PolarStereographic::new(Pole::North, 10.0, 60.0, A, B, 543196.83521776402, 3622588.8619310018)
            .unwrap()
    }

    #[test]
    fn test_pole_maps_to_false_origin() {
        let proj = de1200();
        let [x, y] = proj.forward(10.0, 90.0);
        assert!((x - proj.x_0).abs() < 1e-6);
        assert!((y - proj.y_0).abs() < 1e-6);
    }

    #[test]
    fn test_true_scale_radius() {
        // On the latitude of true scale, rho equals a * m(lat_ts)
        let proj = de1200();
        let phi = 60f64.to_radians();
        let expected = A * phi.cos() / (1.0 - (proj.e * phi.sin()).powi(2)).sqrt();

        let [x, y] = proj.forward(10.0, 60.0);
        assert!((x - proj.x_0).abs() < 1e-6);
        assert!((proj.y_0 - y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_orientation() {
        let proj = de1200();
        let west = proj.forward(6.0, 51.0);
        let east = proj.forward(14.0, 51.0);
        let north = proj.forward(10.0, 54.0);
        let south = proj.forward(10.0, 48.0);
        assert!(west[0] < east[0]);
        assert!(south[1] < north[1]);
    }

    #[test]
    fn test_inverse_round_trip() {
        let proj = de1200();
        for &(lon, lat) in &[(10.0, 51.0), (3.5, 55.8), (16.2, 45.7), (-20.0, 70.0), (10.0, 89.9)] {
            let [x, y] = proj.forward(lon, lat);
            let [lon2, lat2] = proj.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-8, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-8, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_south_pole_round_trip() {
        let proj = PolarStereographic::new(Pole::South, 0.0, -71.0, A, B, 0.0, 0.0).unwrap();
        let [x, y] = proj.forward(45.0, -75.0);
        let [lon, lat] = proj.inverse(x, y);
        assert!((lon - 45.0).abs() < 1e-8);
        assert!((lat + 75.0).abs() < 1e-8);
    }

    #[test]
    fn test_invalid_axes() {
        assert!(PolarStereographic::new(Pole::North, 0.0, 60.0, 1.0, 2.0, 0.0, 0.0).is_err());
        assert!(PolarStereographic::new(Pole::North, 0.0, 95.0, A, B, 0.0, 0.0).is_err());
    }
}
