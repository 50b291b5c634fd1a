//! Map projections and the process-wide projection registry.
//!
//! Radar grids live in a polar stereographic plane while the basemap uses web
//! mercator. Projections are registered under a name once and looked up by
//! name afterwards, all transforms going through geographic coordinates.

pub mod mercator;
pub mod stereographic;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::error::{RadarError, Result};
pub use stereographic::{PolarStereographic, Pole};

/// Geographic longitude/latitude in degrees
pub const GEOGRAPHIC: &str = "EPSG:4326";

/// Spherical web mercator used by tiled basemaps
pub const WEB_MERCATOR: &str = "EPSG:3857";

/// A projection that can convert to and from geographic coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Longitude/latitude in degrees
    Geographic,
    /// Spherical web mercator in metres
    WebMercator,
    /// Polar stereographic on an ellipsoid in metres
    PolarStereographic(PolarStereographic),
}

impl Projection {
    /// Convert projected coordinates to (lon, lat) degrees
    pub fn to_geographic(&self, point: [f64; 2]) -> [f64; 2] {
        match self {
            Projection::Geographic => point,
            Projection::WebMercator => mercator::inverse(point[0], point[1]),
            Projection::PolarStereographic(stere) => stere.inverse(point[0], point[1]),
        }
    }

    /// Convert (lon, lat) degrees to projected coordinates
    pub fn from_geographic(&self, point: [f64; 2]) -> [f64; 2] {
        match self {
            Projection::Geographic => point,
            Projection::WebMercator => mercator::forward(point[0], point[1]),
            Projection::PolarStereographic(stere) => stere.forward(point[0], point[1]),
        }
    }

    /// Parse a PROJ.4 style definition such as `+proj=stere +lat_0=90 ...`
    pub fn from_proj4(definition: &str) -> Result<Self> {
        let mut params: HashMap<&str, &str> = HashMap::new();
        for token in definition.split_whitespace() {
            let token = token.trim_start_matches('+');
            match token.split_once('=') {
                Some((key, value)) => params.insert(key, value),
                None => params.insert(token, ""),
            };
        }

        let number = |key: &str, default: Option<f64>| -> Result<f64> {
            match params.get(key) {
                Some(value) => value.parse::<f64>().map_err(|_| RadarError::InvalidParameter {
                    param: key.to_string(),
                    message: format!("not a number: {}", value),
                }),
                None => default.ok_or_else(|| RadarError::InvalidParameter {
                    param: key.to_string(),
                    message: "required parameter missing".to_string(),
                }),
            }
        };

        match params.get("proj").copied() {
            Some("longlat") | Some("latlong") => Ok(Projection::Geographic),
            Some("stere") => {
                let lat_0 = number("lat_0", None)?;
                let pole = if lat_0 == 90.0 {
                    Pole::North
                } else if lat_0 == -90.0 {
                    Pole::South
                } else {
                    return Err(RadarError::InvalidParameter {
                        param: "lat_0".to_string(),
                        message: format!("only polar aspects are supported, got {}", lat_0),
                    });
                };

                let (a, b) = match (params.get("R"), params.get("ellps").copied()) {
                    (Some(_), _) => {
                        let r = number("R", None)?;
                        (r, r)
                    }
                    (None, Some("WGS84")) => (6378137.0, 6356752.314245179),
                    _ => {
                        let a = number("a", None)?;
                        (a, number("b", Some(a))?)
                    }
                };

                let stere = PolarStereographic::new(
                    pole,
                    number("lon_0", Some(0.0))?,
                    number("lat_ts", Some(lat_0))?,
                    a,
                    b,
                    number("x_0", Some(0.0))?,
                    number("y_0", Some(0.0))?,
                )?;
                Ok(Projection::PolarStereographic(stere))
            }
            other => Err(RadarError::InvalidParameter {
                param: "proj".to_string(),
                message: format!("unsupported projection: {}", other.unwrap_or("<none>")),
            }),
        }
    }
}

impl FromStr for Projection {
    type Err = RadarError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Projection::from_proj4(s)
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, Projection>>> = Lazy::new(|| {
    let mut projections = HashMap::new();
    projections.insert(GEOGRAPHIC.to_string(), Projection::Geographic);
    projections.insert(WEB_MERCATOR.to_string(), Projection::WebMercator);
    RwLock::new(projections)
});

/// Register a projection under a name.
///
/// Returns `false` and keeps the existing entry if the name is already taken.
pub fn register(name: &str, projection: Projection) -> bool {
    let mut registry = REGISTRY.write();
    if registry.contains_key(name) {
        return false;
    }
    debug!(projection = name, "Registering projection");
    registry.insert(name.to_string(), projection);
    true
}

/// Parse and register a PROJ.4 definition
pub fn register_proj4(name: &str, definition: &str) -> Result<bool> {
    if is_registered(name) {
        return Ok(false);
    }
    Ok(register(name, Projection::from_proj4(definition)?))
}

/// Whether a projection name is known
pub fn is_registered(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// Look up a registered projection
pub fn lookup(name: &str) -> Result<Projection> {
    REGISTRY
        .read()
        .get(name)
        .cloned()
        .ok_or_else(|| RadarError::InvalidParameter {
            param: "projection".to_string(),
            message: format!("Unknown projection: {}", name),
        })
}

/// Transform a point between two registered projections
pub fn transform(point: [f64; 2], from: &str, to: &str) -> Result<[f64; 2]> {
    if from == to {
        return Ok(point);
    }
    let source = lookup(from)?;
    let target = lookup(to)?;
    Ok(target.from_geographic(source.to_geographic(point)))
}

/// Web mercator coordinates of a geographic position, for centering the view
pub fn from_lon_lat(lon: f64, lat: f64) -> [f64; 2] {
    mercator::forward(lon, lat)
}
