use crate::coord::{Coordinate, validate_lat_lon};
use crate::error::TreeGridError;
use crate::geom::GeometryFormat;
use crate::index::{
    CodeArea, PrecisionLevel, SoilFootprint, decode, encode, format_code, normalize_code, shorten,
    soil_footprint,
};
use crate::io::arrow::GridCellsToArrow;
use arrow_array::RecordBatch;
use geo_types::{Point, Polygon, Rect};
use geoarrow_array::array::{PointArray, PolygonArray};
use geojson::{Feature, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A single cell of the grid: a code together with the area it resolves to.
///
/// # Example
///
/// ```
/// use treegrid_rs::{GridCell, PrecisionLevel};
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// // Create from WGS84 (lon, lat)
/// let cell = GridCell::from_wgs84(&(-2.248, 53.481), PrecisionLevel::Fine)?;
/// println!("Code: {}", cell.display_code());
/// println!("Center: ({}, {})", cell.latitude(), cell.longitude());
///
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Full code without separator
    pub code: String,
    /// Code length
    pub precision: PrecisionLevel,
    /// The rectangle the code resolves to
    pub area: CodeArea,
}

impl GridCell {
    /// Create a GridCell from a full code, with or without separator
    ///
    /// # Example
    /// ```
    /// use treegrid_rs::GridCell;
    ///
    /// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
    /// let cell = GridCell::from_code("GG222222+22")?;
    /// assert_eq!(cell.code, "GG22222222");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(code: &str) -> Result<Self, TreeGridError> {
        let code = normalize_code(code)?;
        let area = decode(&code)?;
        let precision = PrecisionLevel::from_code_length(area.code_length)?;

        Ok(Self {
            code,
            precision,
            area,
        })
    }

    pub fn from_lat_lon(
        lat: f64,
        lon: f64,
        precision: PrecisionLevel,
    ) -> Result<Self, TreeGridError> {
        validate_lat_lon(lat, lon)?;
        let code = encode(lat, lon, precision.code_length())?;
        let area = decode(&code)?;

        Ok(Self {
            code,
            precision,
            area,
        })
    }

    /// Create a GridCell from WGS84 coordinates in (lon, lat) order
    ///
    /// # Example
    /// ```
    /// use treegrid_rs::{GridCell, PrecisionLevel};
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
    /// // From tuple
    /// let cell = GridCell::from_wgs84(&(-2.248, 53.481), PrecisionLevel::Finest)?;
    /// // From Point
    /// let cell = GridCell::from_wgs84(&Point::new(-2.248, 53.481), PrecisionLevel::Finest)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(
        coord: &impl Coordinate,
        precision: PrecisionLevel,
    ) -> Result<Self, TreeGridError> {
        Self::from_lat_lon(coord.y(), coord.x(), precision)
    }

    /// Center of the cell as a (lon, lat) point.
    pub fn center(&self) -> Point<f64> {
        self.area.center()
    }

    pub fn latitude(&self) -> f64 {
        self.area.center_latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.area.center_longitude()
    }

    /// The code with the display separator.
    pub fn display_code(&self) -> String {
        format_code(&self.code).unwrap_or_else(|_| self.code.clone())
    }

    /// Shortened code relative to a reference point.
    pub fn short_code(&self, ref_lat: f64, ref_lon: f64) -> Result<String, TreeGridError> {
        shorten(&self.code, ref_lat, ref_lon)
    }

    /// Ground footprint of this cell at its own center latitude.
    pub fn soil_footprint(&self) -> Result<SoilFootprint, TreeGridError> {
        soil_footprint(self.precision.code_length(), self.latitude())
    }

    /// The cell with `precision`'s code, i.e. the parent or child cell that
    /// contains this cell's center.
    pub fn at_precision(&self, precision: PrecisionLevel) -> Result<Self, TreeGridError> {
        Self::from_lat_lon(self.latitude(), self.longitude(), precision)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        self.area.to_rect()
    }

    /// Converts this cell to a rectangular polygon in (lon, lat) order.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.area.to_polygon()
    }

    /// The cell outline as WKT or GeoJSON text, for map layers.
    ///
    /// # Example
    /// ```
    /// use treegrid_rs::{GeometryFormat, GridCell};
    ///
    /// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
    /// let cell = GridCell::from_code("GG222222+22")?;
    /// assert!(cell.to_geometry_string(GeometryFormat::Wkt).starts_with("POLYGON"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_geometry_string(&self, format: GeometryFormat) -> String {
        format.render(&self.to_polygon())
    }

    /// A GeoJSON feature of the cell outline with code, precision and
    /// footprint as properties.
    pub fn to_geojson_feature(&self) -> Result<Feature, TreeGridError> {
        let footprint = self.soil_footprint()?;

        let mut properties = JsonObject::new();
        properties.insert("code".to_string(), json!(self.code));
        properties.insert("precision".to_string(), json!(self.precision.code_length()));
        properties.insert("soil_area_m2".to_string(), json!(footprint.area_m2));

        Ok(Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::from(&self.to_polygon())),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, TreeGridError> {
        std::slice::from_ref(self).to_record_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wgs84_tuple() -> Result<(), TreeGridError> {
        let cell = GridCell::from_wgs84(&(-2.248, 53.481), PrecisionLevel::Fine)?;

        assert_eq!(cell.precision, PrecisionLevel::Fine);
        assert_eq!(cell.code.len(), 13);
        assert!(cell.area.contains(53.481, -2.248));
        Ok(())
    }

    #[test]
    fn test_from_wgs84_point() -> Result<(), TreeGridError> {
        let point = Point::new(-2.248, 53.481);
        let from_point = GridCell::from_wgs84(&point, PrecisionLevel::Fine)?;
        let from_tuple = GridCell::from_wgs84(&(-2.248, 53.481), PrecisionLevel::Fine)?;

        assert_eq!(from_point, from_tuple);
        Ok(())
    }

    #[test]
    fn test_from_code_round_trip() -> Result<(), TreeGridError> {
        let cell = GridCell::from_lat_lon(-33.8568, 151.2153, PrecisionLevel::Finest)?;
        let restored = GridCell::from_code(&cell.display_code())?;
        assert_eq!(cell, restored);
        Ok(())
    }

    #[test]
    fn test_from_code_invalid() {
        assert!(matches!(
            GridCell::from_code("@@@@@@@@@@"),
            Err(TreeGridError::InvalidCode(_))
        ));
        assert!(GridCell::from_lat_lon(100.0, 0.0, PrecisionLevel::Area).is_err());
    }

    #[test]
    fn test_same_point_same_cell() -> Result<(), TreeGridError> {
        let cell1 = GridCell::from_lat_lon(53.481, -2.248, PrecisionLevel::Coarse)?;
        let cell2 = GridCell::from_lat_lon(53.481, -2.248, PrecisionLevel::Coarse)?;
        assert_eq!(cell1.code, cell2.code);

        // The cell's own center encodes back to the same cell
        let cell3 =
            GridCell::from_lat_lon(cell1.latitude(), cell1.longitude(), PrecisionLevel::Coarse)?;
        assert_eq!(cell1.code, cell3.code);
        Ok(())
    }

    #[test]
    fn test_at_precision() -> Result<(), TreeGridError> {
        let fine = GridCell::from_lat_lon(51.5, -0.12, PrecisionLevel::Finest)?;
        let area = fine.at_precision(PrecisionLevel::Area)?;
        assert_eq!(area.code, &fine.code[..10]);
        Ok(())
    }

    #[test]
    fn test_polygon_and_footprint() -> Result<(), TreeGridError> {
        let cell = GridCell::from_lat_lon(0.0, 0.0, PrecisionLevel::Area)?;
        assert_eq!(cell.to_polygon().exterior().coords().count(), 5);

        let footprint = cell.soil_footprint()?;
        assert!((footprint.area_m2 - 6.26175 * 12.5235).abs() < 0.01);
        Ok(())
    }

    #[test]
    fn test_geometry_string() -> Result<(), TreeGridError> {
        let cell = GridCell::from_lat_lon(51.5, -0.12, PrecisionLevel::Area)?;

        let wkt = cell.to_geometry_string(GeometryFormat::Wkt);
        assert!(wkt.starts_with("POLYGON"));

        let geojson = cell.to_geometry_string(GeometryFormat::GeoJson);
        assert!(geojson.contains("\"Polygon\""));
        Ok(())
    }

    #[test]
    fn test_geojson_feature() -> Result<(), TreeGridError> {
        let cell = GridCell::from_lat_lon(51.5, -0.12, PrecisionLevel::Fine)?;
        let feature = cell.to_geojson_feature()?;

        assert!(feature.geometry.is_some());
        let properties = feature.properties.unwrap_or_default();
        assert_eq!(properties.get("code"), Some(&json!(cell.code)));
        assert_eq!(properties.get("precision"), Some(&json!(13)));
        Ok(())
    }
}
