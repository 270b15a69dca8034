use crate::error::TreeGridError;
use crate::index::codec::spans_for_length;
use crate::index::constants::METERS_PER_DEGREE_LATITUDE;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Trunk diameter (cm) below which a tree counts as a sapling.
pub const SAPLING_MAX_DIAMETER_CM: f64 = 10.0;

/// Trunk diameter (cm) above which a tree counts as mature.
pub const MATURE_MIN_DIAMETER_CM: f64 = 50.0;

/// Supported code lengths, from the 10-character area code to the finest
/// 15-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PrecisionLevel {
    /// 10 characters, roughly 6 x 12 m at the equator
    Area,
    /// 11 characters, used for mature trees
    Coarse,
    /// 12 characters
    Medium,
    /// 13 characters, used for young trees
    Fine,
    /// 14 characters
    VeryFine,
    /// 15 characters, used for saplings
    Finest,
}

impl PrecisionLevel {
    /// All levels, coarsest first.
    pub const ALL: [PrecisionLevel; 6] = [
        PrecisionLevel::Area,
        PrecisionLevel::Coarse,
        PrecisionLevel::Medium,
        PrecisionLevel::Fine,
        PrecisionLevel::VeryFine,
        PrecisionLevel::Finest,
    ];

    /// Number of code characters at this level.
    pub fn code_length(self) -> usize {
        match self {
            PrecisionLevel::Area => 10,
            PrecisionLevel::Coarse => 11,
            PrecisionLevel::Medium => 12,
            PrecisionLevel::Fine => 13,
            PrecisionLevel::VeryFine => 14,
            PrecisionLevel::Finest => 15,
        }
    }

    pub fn from_code_length(length: usize) -> Result<Self, TreeGridError> {
        Self::ALL
            .into_iter()
            .find(|level| level.code_length() == length)
            .ok_or(TreeGridError::InvalidPrecision(length))
    }

    /// The next longer code length, if any.
    pub fn finer(self) -> Option<Self> {
        Self::from_code_length(self.code_length() + 1).ok()
    }

    /// The next shorter code length, if any.
    pub fn coarser(self) -> Option<Self> {
        Self::from_code_length(self.code_length() - 1).ok()
    }

    /// Latitude and longitude span of a cell at this level, in degrees.
    pub fn cell_spans(self) -> (f64, f64) {
        spans_for_length(self.code_length())
    }
}

impl TryFrom<usize> for PrecisionLevel {
    type Error = TreeGridError;

    fn try_from(length: usize) -> Result<Self, Self::Error> {
        Self::from_code_length(length)
    }
}

impl From<PrecisionLevel> for usize {
    fn from(level: PrecisionLevel) -> usize {
        level.code_length()
    }
}

impl fmt::Display for PrecisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code_length())
    }
}

/// Picks a code length from a trunk diameter in centimeters.
///
/// | diameter       | length |
/// |----------------|--------|
/// | < 10           | 15     |
/// | 10 to 50       | 13     |
/// | > 50           | 11     |
///
/// # Errors
///
/// [`TreeGridError::InvalidMeasurement`] for negative or non-finite input.
pub fn select_precision(trunk_diameter_cm: f64) -> Result<PrecisionLevel, TreeGridError> {
    if !trunk_diameter_cm.is_finite() || trunk_diameter_cm < 0.0 {
        return Err(TreeGridError::InvalidMeasurement(trunk_diameter_cm));
    }

    Ok(if trunk_diameter_cm < SAPLING_MAX_DIAMETER_CM {
        PrecisionLevel::Finest
    } else if trunk_diameter_cm <= MATURE_MIN_DIAMETER_CM {
        PrecisionLevel::Fine
    } else {
        PrecisionLevel::Coarse
    })
}

/// Like [`select_precision`], but falls back to the mature bucket for an
/// invalid measurement instead of failing.
pub fn select_precision_or_mature(trunk_diameter_cm: f64) -> PrecisionLevel {
    select_precision(trunk_diameter_cm).unwrap_or_else(|e| {
        warn!(trunk_diameter_cm, error = %e, "falling back to mature precision");
        PrecisionLevel::Coarse
    })
}

/// Approximate ground footprint of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilFootprint {
    /// Code length the footprint was computed for
    pub precision: PrecisionLevel,
    /// North-south extent in meters
    pub lat_meters: f64,
    /// East-west extent in meters
    pub lon_meters: f64,
    /// Ground area in square meters
    pub area_m2: f64,
    /// Set at the poles, where the east-west extent collapses to zero
    pub degenerate: bool,
}

/// Ground footprint of a cell of `length` characters centered at `center_lat`.
///
/// Degrees are converted with a fixed meters-per-degree of latitude, scaled
/// by `cos(latitude)` for longitude. At `|center_lat| == 90` the area is 0
/// and the footprint is flagged degenerate rather than treated as an error.
///
/// # Errors
///
/// - [`TreeGridError::InvalidPrecision`] - `length` outside 10-15
/// - [`TreeGridError::InvalidCoordinate`] - `center_lat` outside [-90, 90]
pub fn soil_footprint(length: usize, center_lat: f64) -> Result<SoilFootprint, TreeGridError> {
    let precision = PrecisionLevel::from_code_length(length)?;
    if !(-90.0..=90.0).contains(&center_lat) {
        return Err(TreeGridError::InvalidCoordinate {
            lat: center_lat,
            lon: 0.0,
        });
    }

    let (lat_span, lon_span) = precision.cell_spans();
    let lat_meters = lat_span * METERS_PER_DEGREE_LATITUDE;

    if center_lat.abs() == 90.0 {
        return Ok(SoilFootprint {
            precision,
            lat_meters,
            lon_meters: 0.0,
            area_m2: 0.0,
            degenerate: true,
        });
    }

    let lon_meters = lon_span * METERS_PER_DEGREE_LATITUDE * center_lat.to_radians().cos().max(0.0);
    Ok(SoilFootprint {
        precision,
        lat_meters,
        lon_meters,
        area_m2: lat_meters * lon_meters,
        degenerate: false,
    })
}

/// Ground area in square meters of a cell of `length` characters at `center_lat`.
///
/// See [`soil_footprint`] for the degenerate pole case.
pub fn soil_footprint_area(length: usize, center_lat: f64) -> Result<f64, TreeGridError> {
    soil_footprint(length, center_lat).map(|footprint| footprint.area_m2)
}
