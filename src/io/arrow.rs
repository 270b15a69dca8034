use crate::cell::GridCell;
use crate::error::TreeGridError;
use arrow_array::{BooleanArray, Float64Array, RecordBatch, StringArray, UInt8Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`GridCell`]s to Arrow arrays.
///
/// Implemented for `[GridCell]` and `Vec<GridCell>`.
pub trait GridCellsToArrow {
    /// Converts cell centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts cells to an Arrow PolygonArray of cell rectangles.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with code, precision, center, spans,
    /// footprint and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, TreeGridError>;
}

impl GridCellsToArrow for [GridCell] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for cell in self {
            builder.push_point(Some(&cell.center()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self.par_iter().map(|c: &GridCell| c.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, TreeGridError> {
        let footprints = self
            .par_iter()
            .map(|c| c.soil_footprint())
            .collect::<Result<Vec<_>, _>>()?;

        let polygon_array = self.to_arrow_polygons();
        let codes: StringArray = self.iter().map(|c| Some(c.code.as_str())).collect();
        let precisions: UInt8Array = self
            .iter()
            .map(|c| Some(c.precision.code_length() as u8))
            .collect();
        let latitudes: Float64Array = self.iter().map(|c| Some(c.latitude())).collect();
        let longitudes: Float64Array = self.iter().map(|c| Some(c.longitude())).collect();
        let lat_spans: Float64Array = self.iter().map(|c| Some(c.area.lat_span)).collect();
        let lon_spans: Float64Array = self.iter().map(|c| Some(c.area.lon_span)).collect();
        let areas: Float64Array = footprints.iter().map(|f| Some(f.area_m2)).collect();
        let degenerate: BooleanArray = footprints.iter().map(|f| Some(f.degenerate)).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("code", DataType::Utf8, false),
            Field::new("precision", DataType::UInt8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("lat_span", DataType::Float64, false),
            Field::new("lon_span", DataType::Float64, false),
            Field::new("soil_area_m2", DataType::Float64, false),
            Field::new("degenerate", DataType::Boolean, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(codes),
                Arc::new(precisions),
                Arc::new(latitudes),
                Arc::new(longitudes),
                Arc::new(lat_spans),
                Arc::new(lon_spans),
                Arc::new(areas),
                Arc::new(degenerate),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| TreeGridError::ArrowError(e.to_string()))
    }
}

impl GridCellsToArrow for Vec<GridCell> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, TreeGridError> {
        self.as_slice().to_record_batch()
    }
}
