/// The 20 code symbols, in index order. Excludes 0/1/O/I/L and vowels.
pub const CODE_ALPHABET: &str = "23456789CFGHJMPQRVWX";

/// Number of symbols in [`CODE_ALPHABET`].
pub const ENCODING_BASE: u64 = 20;

/// Display-only separator, placed after [`SEPARATOR_POSITION`] characters.
pub const SEPARATOR: char = '+';

/// Number of code characters that precede the separator.
pub const SEPARATOR_POSITION: usize = 8;

/// Length of the interleaved latitude/longitude section (the "area code").
pub const PAIR_CODE_LENGTH: usize = 10;

/// Minimum length of a full code.
pub const MIN_CODE_LENGTH: usize = PAIR_CODE_LENGTH;

/// Maximum length of a full code.
pub const MAX_CODE_LENGTH: usize = 15;

/// Reference length used for the coarse "global" code of a tree.
pub const GLOBAL_CODE_LENGTH: usize = PAIR_CODE_LENGTH;

/// Prefix lengths a short code may omit, longest first.
pub const SHORTEN_PREFIX_LENGTHS: [usize; 3] = [6, 4, 2];

/// Shortest possible short code (a 10-character code with 6 removed).
pub const MIN_SHORT_CODE_LENGTH: usize = MIN_CODE_LENGTH - 6;

/// Longest string accepted as a short code.
pub const MAX_SHORT_CODE_LENGTH: usize = MAX_CODE_LENGTH - 1;

/// Rows of the refinement grid (latitude divisions per refinement character).
pub const GRID_ROWS: u64 = 4;

/// Columns of the refinement grid (longitude divisions per refinement character).
pub const GRID_COLUMNS: u64 = 5;

/// Maximum number of refinement characters after the area code.
pub const GRID_CODE_LENGTH: usize = MAX_CODE_LENGTH - PAIR_CODE_LENGTH;

/// Latitude span of the whole grid in degrees.
pub const LATITUDE_SPAN: f64 = 180.0;

/// Longitude span of the whole grid in degrees.
pub const LONGITUDE_SPAN: f64 = 360.0;

/// Latitude steps of the area-code section (20^5).
pub(crate) const PAIR_LAT_STEPS: u64 = 3_200_000;

/// Longitude steps of the area-code section (20^5).
pub(crate) const PAIR_LON_STEPS: u64 = 3_200_000;

/// Approximate ground distance of one degree of latitude, in meters.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;
