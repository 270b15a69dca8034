//! # treegrid-rs
//!
//! Location codes for individual trees: a 20-symbol grid code whose length
//! follows the size of the tree, a short form relative to a nearby point,
//! and the per-tree address and soil area that get stored with a record.
//!
//! There are currently three main entry points.
//!
//! ### 1. Codec functions
//!
//! ```
//! use treegrid_rs::{decode, encode, recover, shorten};
//!
//! # fn main() -> Result<(), treegrid_rs::TreeGridError> {
//! let code = encode(51.5007, -0.1246, 13)?;
//! let area = decode(&code)?;
//! println!("{} -> ({}, {})", code, area.center_latitude(), area.center_longitude());
//!
//! let short = shorten(&code, 51.5007, -0.1246)?;
//! assert_eq!(recover(&short, 51.5007, -0.1246)?, code);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `TreeLocation` - One Tree
//!
//! ```
//! use treegrid_rs::{PrecisionLevel, TreeLocation};
//!
//! # fn main() -> Result<(), treegrid_rs::TreeGridError> {
//! let tree = TreeLocation::builder()
//!     .coordinate(-1.2921, 36.8219)
//!     .trunk_diameter_cm(7.5)
//!     .build()?;
//!
//! assert_eq!(tree.precision(), PrecisionLevel::Finest);
//! println!("{} covers {:.4} m2", tree.address, tree.footprint.area_m2);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `GridCellsToArrow` - Columnar Export
//!
//! Hand a batch of tree cells to Arrow-based storage, or render one cell's
//! outline as WKT or GeoJSON:
//!
//! ```
//! use treegrid_rs::{GeometryFormat, GridCell, GridCellsToArrow, TreeLocation};
//!
//! # fn main() -> Result<(), treegrid_rs::TreeGridError> {
//! let cells: Vec<GridCell> = [(36.8219, 7.5), (36.8231, 42.0)]
//!     .into_iter()
//!     .map(|(lon, dbh)| {
//!         TreeLocation::builder()
//!             .coordinate(-1.2921, lon)
//!             .trunk_diameter_cm(dbh)
//!             .build()
//!             .map(|tree| tree.cell)
//!     })
//!     .collect::<Result<_, _>>()?;
//!
//! let batch = cells.to_record_batch()?;
//! assert_eq!(batch.num_rows(), 2);
//! assert!(cells[0].to_geometry_string(GeometryFormat::Wkt).starts_with("POLYGON"));
//! # Ok(())
//! # }
//! ```
//!

pub mod address;
pub mod cell;
pub mod coord;
pub mod error;
pub mod geom;
pub mod index;
pub mod io;
pub mod tree;

pub use address::{STEM_MARKER, TreeAddress, compose_for_stems, compose_tree_address};
pub use cell::GridCell;
pub use coord::{Coordinate, haversine_distance, validate_lat_lon};
pub use error::TreeGridError;
pub use geom::{GeometryFormat, parse_geometry, tree_point};
pub use index::{
    CODE_ALPHABET, CodeArea, GLOBAL_CODE_LENGTH, MATURE_MIN_DIAMETER_CM, MAX_CODE_LENGTH,
    MIN_CODE_LENGTH, PrecisionLevel, SAPLING_MAX_DIAMETER_CM, SEPARATOR, SoilFootprint,
    cell_spans, decode, encode, format_code, is_valid_full_code, is_valid_short_code,
    normalize_code, recover, select_precision, select_precision_or_mature, shorten,
    soil_footprint, soil_footprint_area,
};
pub use io::GridCellsToArrow;
pub use tree::{TreeLocation, TreeLocationBuilder};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
