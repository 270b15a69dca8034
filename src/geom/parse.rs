use crate::error::TreeGridError;
use geo::Centroid;
use geo_types::{Geometry, Point};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, TreeGridError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, TreeGridError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| TreeGridError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| TreeGridError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| TreeGridError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| TreeGridError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(TreeGridError::GeometryParseError(
            "FeatureCollection not supported, one tree per geometry".to_string(),
        )),
    }
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, TreeGridError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| TreeGridError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        TreeGridError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

/// Reduces a tree geometry to the single point that gets encoded.
///
/// Points are used as-is. Polygons (e.g. a mapped canopy outline) are
/// reduced to their centroid. Lines and collections don't describe one
/// tree and are rejected.
pub fn tree_point(geom: &Geometry<f64>) -> Result<Point<f64>, TreeGridError> {
    let point = match geom {
        Geometry::Point(pt) => Some(*pt),
        Geometry::Polygon(poly) => poly.centroid(),
        Geometry::MultiPolygon(mp) => mp.centroid(),
        Geometry::MultiPoint(mp) if mp.0.len() == 1 => Some(mp.0[0]),
        _ => {
            return Err(TreeGridError::GeometryParseError(
                "Unsupported geometry type for a tree location".to_string(),
            ));
        }
    };

    point.ok_or_else(|| TreeGridError::GeometryParseError("Empty geometry".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geojson_point() -> Result<(), TreeGridError> {
        let json = r#"{"type":"Point","coordinates":[-0.1,51.5]}"#;
        let geom = parse_geometry(json)?;
        match geom {
            Geometry::Point(pt) => {
                assert!((pt.x() - (-0.1)).abs() < 0.001);
                assert!((pt.y() - 51.5).abs() < 0.001);
            }
            _ => panic!("Expected Point"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), TreeGridError> {
        let json = r#"{"type":"Feature","properties":{"species":"oak"},"geometry":{"type":"Point","coordinates":[-0.1,51.5]}}"#;
        let geom = parse_geometry(json)?;
        assert!(matches!(geom, Geometry::Point(_)));
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature_collection_rejected() {
        let json = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(matches!(
            parse_geometry(json),
            Err(TreeGridError::GeometryParseError(_))
        ));
    }

    #[test]
    fn test_parse_wkt_point() -> Result<(), TreeGridError> {
        let wkt = "POINT(-0.1 51.5)";
        let geom = parse_geometry(wkt)?;
        match geom {
            Geometry::Point(pt) => {
                assert!((pt.x() - (-0.1)).abs() < 0.001);
                assert!((pt.y() - 51.5).abs() < 0.001);
            }
            _ => panic!("Expected Point"),
        }
        Ok(())
    }

    #[test]
    fn test_tree_point_from_canopy_polygon() -> Result<(), TreeGridError> {
        let geom = parse_geometry("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))")?;
        let pt = tree_point(&geom)?;
        assert!((pt.x() - 1.0).abs() < 1e-9);
        assert!((pt.y() - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_tree_point_rejects_lines() -> Result<(), TreeGridError> {
        let geom = parse_geometry("LINESTRING(-0.1 51.5, -0.2 51.6)")?;
        assert!(tree_point(&geom).is_err());
        Ok(())
    }
}
