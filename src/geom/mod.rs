mod parse;

pub use parse::{parse_geojson, parse_geometry, parse_wkt, tree_point};

use geo_types::Polygon;
use serde::{Deserialize, Serialize};

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

impl GeometryFormat {
    pub fn render(self, polygon: &Polygon<f64>) -> String {
        match self {
            GeometryFormat::Wkt => polygon_to_wkt(polygon),
            GeometryFormat::GeoJson => polygon_to_geojson(polygon),
        }
    }
}

pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}
