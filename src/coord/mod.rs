use crate::error::TreeGridError;
use geo::{Distance, Haversine};
use geo_types::Point;

/// Trait for types that can provide WGS84 coordinates.
///
/// Implemented for `(f64, f64)` tuples and `geo_types::Point<f64>`, both in
/// `(longitude, latitude)` order. This allows functions to accept either type.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// Rejects latitudes outside [-90, 90], longitudes outside [-180, 180] and NaN.
pub fn validate_lat_lon(lat: f64, lon: f64) -> Result<(), TreeGridError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(TreeGridError::InvalidCoordinate { lat, lon })
    }
}

/// Great-circle distance between two lat/lon points in meters, on the
/// GRS80 mean-radius sphere.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Haversine.distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}
