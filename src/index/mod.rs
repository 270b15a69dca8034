pub mod constants;
mod codec;
mod locality;
mod precision;

pub use codec::{
    CodeArea, cell_spans, decode, encode, format_code, is_valid_full_code, is_valid_short_code,
    normalize_code,
};
pub use constants::{
    CODE_ALPHABET, GLOBAL_CODE_LENGTH, MAX_CODE_LENGTH, METERS_PER_DEGREE_LATITUDE,
    MIN_CODE_LENGTH, SEPARATOR,
};
pub use locality::{recover, shorten};
pub use precision::{
    MATURE_MIN_DIAMETER_CM, PrecisionLevel, SAPLING_MAX_DIAMETER_CM, SoilFootprint,
    select_precision, select_precision_or_mature, soil_footprint, soil_footprint_area,
};
