use crate::address::{TreeAddress, compose_for_stems};
use crate::cell::GridCell;
use crate::coord::validate_lat_lon;
use crate::error::TreeGridError;
use crate::geom::tree_point;
use crate::index::{GLOBAL_CODE_LENGTH, PrecisionLevel, SoilFootprint, encode, select_precision};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything derived from one tree's position and measurements.
///
/// # Example
///
/// ```
/// use treegrid_rs::TreeLocation;
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// let tree = TreeLocation::builder()
///     .coordinate(53.481, -2.248)
///     .trunk_diameter_cm(32.0)
///     .stem(2, 3)
///     .build()?;
///
/// assert_eq!(tree.cell.code.len(), 13);
/// assert!(tree.address.to_string().ends_with("-S2"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeLocation {
    /// Recorded latitude
    pub latitude: f64,
    /// Recorded longitude
    pub longitude: f64,
    /// Cell at the tree's precision
    pub cell: GridCell,
    /// The 10-character area code of the tree
    pub global_code: String,
    /// Full code shortened against the reference point
    pub short_code: String,
    /// Ground footprint of the tree's cell
    pub footprint: SoilFootprint,
    /// Stored identifier: short code plus stem number for multi-stem trees
    pub address: TreeAddress,
}

impl TreeLocation {
    pub fn builder() -> TreeLocationBuilder {
        TreeLocationBuilder::new()
    }

    pub fn precision(&self) -> PrecisionLevel {
        self.cell.precision
    }

    /// The address another stem of the same tree would get.
    pub fn address_for_stem(&self, stem_index: u32, stem_count: u32) -> TreeAddress {
        compose_for_stems(&self.short_code, stem_index, stem_count)
    }
}

/// Inputs for one tree; serializable so a form's state can be stored as is.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TreeLocationBuilder {
    latitude: Option<f64>,
    longitude: Option<f64>,
    trunk_diameter_cm: Option<f64>,
    precision: Option<PrecisionLevel>,
    stem_index: u32,
    stem_count: u32,
    reference: Option<(f64, f64)>,
}

impl TreeLocationBuilder {
    pub fn new() -> Self {
        Self {
            stem_index: 1,
            stem_count: 1,
            ..Self::default()
        }
    }

    pub fn coordinate(mut self, lat: f64, lon: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lon);
        self
    }

    /// Takes the coordinate from a WGS84 geometry, e.g. a map click or a
    /// mapped canopy outline (reduced to its centroid).
    ///
    /// # Example
    /// ```
    /// use treegrid_rs::{TreeLocation, parse_geometry};
    ///
    /// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
    /// let canopy = parse_geometry(
    ///     "POLYGON((36.8218 -1.2922, 36.8220 -1.2922, 36.8220 -1.2920, 36.8218 -1.2920, 36.8218 -1.2922))",
    /// )?;
    /// let tree = TreeLocation::builder()
    ///     .geometry(&canopy)?
    ///     .trunk_diameter_cm(60.0)
    ///     .build()?;
    /// assert!((tree.latitude + 1.2921).abs() < 1e-9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn geometry(self, geometry: &Geometry<f64>) -> Result<Self, TreeGridError> {
        let point = tree_point(geometry)?;
        Ok(self.coordinate(point.y(), point.x()))
    }

    pub fn trunk_diameter_cm(mut self, diameter: f64) -> Self {
        self.trunk_diameter_cm = Some(diameter);
        self
    }

    /// Use this precision instead of deriving one from the trunk diameter.
    pub fn precision(mut self, precision: PrecisionLevel) -> Self {
        self.precision = Some(precision);
        self
    }

    /// 1-based stem number and total stem count of the tree.
    pub fn stem(mut self, index: u32, count: u32) -> Self {
        self.stem_index = index;
        self.stem_count = count;
        self
    }

    /// Point the short code is made relative to, e.g. the project site.
    ///
    /// Defaults to the center of the tree's own area-code cell.
    pub fn reference(mut self, lat: f64, lon: f64) -> Self {
        self.reference = Some((lat, lon));
        self
    }

    pub fn build(self) -> Result<TreeLocation, TreeGridError> {
        let latitude = self.latitude.ok_or(TreeGridError::MissingField("coordinate"))?;
        let longitude = self.longitude.ok_or(TreeGridError::MissingField("coordinate"))?;
        validate_lat_lon(latitude, longitude)?;

        let precision = match (self.precision, self.trunk_diameter_cm) {
            (Some(precision), _) => precision,
            (None, Some(diameter)) => select_precision(diameter)?,
            (None, None) => return Err(TreeGridError::MissingField("trunk_diameter_cm")),
        };

        let cell = GridCell::from_lat_lon(latitude, longitude, precision)?;
        let global_code = encode(latitude, longitude, GLOBAL_CODE_LENGTH)?;

        let (ref_lat, ref_lon) = match self.reference {
            Some(reference) => reference,
            None => {
                let global = GridCell::from_code(&global_code)?;
                (global.latitude(), global.longitude())
            }
        };
        let short_code = cell.short_code(ref_lat, ref_lon)?;

        let footprint = cell.soil_footprint()?;
        let address = compose_for_stems(&short_code, self.stem_index, self.stem_count);

        debug!(
            code = %cell.code,
            %precision,
            %address,
            area_m2 = footprint.area_m2,
            "located tree"
        );

        Ok(TreeLocation {
            latitude,
            longitude,
            cell,
            global_code,
            short_code,
            footprint,
            address,
        })
    }
}
