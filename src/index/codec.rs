use crate::coord::validate_lat_lon;
use crate::error::TreeGridError;
use crate::index::constants::{
    CODE_ALPHABET, ENCODING_BASE, GRID_CODE_LENGTH, GRID_COLUMNS, GRID_ROWS, LATITUDE_SPAN,
    LONGITUDE_SPAN, MAX_CODE_LENGTH, MAX_SHORT_CODE_LENGTH, MIN_CODE_LENGTH,
    MIN_SHORT_CODE_LENGTH, PAIR_CODE_LENGTH, PAIR_LAT_STEPS, PAIR_LON_STEPS, SEPARATOR,
    SEPARATOR_POSITION, SHORTEN_PREFIX_LENGTHS,
};
use geo_types::{Point, Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

/// The latitude/longitude rectangle a code resolves to.
///
/// The rectangle is closed on all sides; a point on the shared edge of two
/// cells is contained by both, while [`encode`] always picks the cell to
/// the north/east of such an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeArea {
    /// Southern edge in degrees
    pub south: f64,
    /// Western edge in degrees
    pub west: f64,
    /// Height of the cell in degrees of latitude
    pub lat_span: f64,
    /// Width of the cell in degrees of longitude
    pub lon_span: f64,
    /// Number of significant characters the area was decoded from
    pub code_length: usize,
}

impl CodeArea {
    /// Center of the cell as a `(longitude, latitude)` point.
    pub fn center(&self) -> Point<f64> {
        Point::new(self.center_longitude(), self.center_latitude())
    }

    pub fn center_latitude(&self) -> f64 {
        self.south + self.lat_span / 2.0
    }

    pub fn center_longitude(&self) -> f64 {
        self.west + self.lon_span / 2.0
    }

    pub fn north(&self) -> f64 {
        self.south + self.lat_span
    }

    pub fn east(&self) -> f64 {
        self.west + self.lon_span
    }

    /// Returns true if the point lies inside or on the edge of the cell.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north()).contains(&lat) && (self.west..=self.east()).contains(&lon)
    }

    /// The cell as a `geo_types::Rect` in `(longitude, latitude)` order.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east(), y: self.north() },
        )
    }

    /// The cell boundary as a closed five-point polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

/// Encodes a latitude/longitude pair as a code of `length` characters.
///
/// The first ten characters interleave latitude and longitude digits, each
/// splitting the current interval into 20. Every further character picks one
/// cell of a 4 (rows) by 5 (columns) grid over the current cell.
///
/// # Example
/// ```
/// use treegrid_rs::encode;
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// let code = encode(0.0, 0.0, 10)?;
/// assert_eq!(code, "GG22222222");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`TreeGridError::InvalidCoordinate`] - Latitude or longitude out of range
/// - [`TreeGridError::InvalidPrecision`] - Length outside 10-15
pub fn encode(lat: f64, lon: f64, length: usize) -> Result<String, TreeGridError> {
    validate_lat_lon(lat, lon)?;
    check_code_length(length)?;

    Ok(encode_symbols(lat, lon, length))
}

/// Encodes an already validated point at the finest precision.
pub(crate) fn encode_full(lat: f64, lon: f64) -> String {
    encode_symbols(lat, lon, MAX_CODE_LENGTH)
}

/// Encodes an already validated point at a valid `length`.
///
/// The point is located among the cells of that length using the same edge
/// arithmetic as [`decode`], so the decoded cell's southern and western
/// edges never lie past the point.
fn encode_symbols(lat: f64, lon: f64, length: usize) -> String {
    let grid = (length - PAIR_CODE_LENGTH) as u32;
    let lat_grid_steps = GRID_ROWS.pow(grid);
    let lon_grid_steps = GRID_COLUMNS.pow(grid);

    let lat_steps = cell_index(lat, -90.0, LATITUDE_SPAN, PAIR_LAT_STEPS * lat_grid_steps);
    let lon_steps = cell_index(lon, -180.0, LONGITUDE_SPAN, PAIR_LON_STEPS * lon_grid_steps);

    let pairs = PAIR_CODE_LENGTH / 2;
    let mut lat_digits = [0u64; PAIR_CODE_LENGTH / 2];
    let mut lon_digits = [0u64; PAIR_CODE_LENGTH / 2];
    let mut lat_pair = lat_steps / lat_grid_steps;
    let mut lon_pair = lon_steps / lon_grid_steps;
    for i in (0..pairs).rev() {
        lat_digits[i] = lat_pair % ENCODING_BASE;
        lat_pair /= ENCODING_BASE;
        lon_digits[i] = lon_pair % ENCODING_BASE;
        lon_pair /= ENCODING_BASE;
    }

    let grid = grid as usize;
    let mut rows = [0u64; GRID_CODE_LENGTH];
    let mut cols = [0u64; GRID_CODE_LENGTH];
    let mut lat_grid = lat_steps % lat_grid_steps;
    let mut lon_grid = lon_steps % lon_grid_steps;
    for i in (0..grid).rev() {
        rows[i] = lat_grid % GRID_ROWS;
        lat_grid /= GRID_ROWS;
        cols[i] = lon_grid % GRID_COLUMNS;
        lon_grid /= GRID_COLUMNS;
    }

    let mut code = String::with_capacity(length);
    for (lat_digit, lon_digit) in lat_digits.iter().zip(&lon_digits) {
        code.push(symbol(*lat_digit));
        code.push(symbol(*lon_digit));
    }
    for (row, col) in rows[..grid].iter().zip(&cols[..grid]) {
        code.push(symbol(row * GRID_COLUMNS + col));
    }
    code
}

/// Decodes a full code (with or without the separator) into its grid cell.
///
/// # Example
/// ```
/// use treegrid_rs::{decode, encode};
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// let code = encode(53.481, -2.248, 13)?;
/// let area = decode(&code)?;
/// assert!(area.contains(53.481, -2.248));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`TreeGridError::InvalidCode`] - Character outside the alphabet, misplaced
///   separator, or more than 15 characters
/// - [`TreeGridError::CodeTooShort`] - Fewer than 10 significant characters
pub fn decode(code: &str) -> Result<CodeArea, TreeGridError> {
    let normalized = normalize_code(code)?;
    Ok(area_from_symbols(&normalized))
}

/// Strips the separator and upper-cases a full code, validating it.
///
/// # Errors
///
/// Same as [`decode`].
pub fn normalize_code(code: &str) -> Result<String, TreeGridError> {
    let (symbols, separator_at) =
        split_separator(code).ok_or_else(|| TreeGridError::InvalidCode(code.to_string()))?;

    if separator_at.is_some_and(|at| at != SEPARATOR_POSITION) {
        return Err(TreeGridError::InvalidCode(code.to_string()));
    }
    if symbols.len() < MIN_CODE_LENGTH {
        return Err(TreeGridError::CodeTooShort(code.to_string()));
    }
    if symbols.len() > MAX_CODE_LENGTH {
        return Err(TreeGridError::InvalidCode(code.to_string()));
    }
    Ok(symbols)
}

/// Renders a full code with the display separator after the 8th character.
///
/// ```
/// use treegrid_rs::format_code;
///
/// assert_eq!(format_code("gg22222222").unwrap(), "GG222222+22");
/// ```
pub fn format_code(code: &str) -> Result<String, TreeGridError> {
    let symbols = normalize_code(code)?;
    Ok(insert_separator(&symbols, SEPARATOR_POSITION))
}

/// Returns true if `code` decodes as a full code.
pub fn is_valid_full_code(code: &str) -> bool {
    normalize_code(code).is_ok()
}

/// Returns true if `code` has the shape of a short code: 4-14 alphabet
/// characters, with the separator (if any) where a removed 2, 4 or 6
/// character prefix would have left it.
pub fn is_valid_short_code(code: &str) -> bool {
    parse_short_code(code).is_ok()
}

/// Latitude and longitude span, in degrees, of the cell of a code of `length`.
///
/// # Errors
///
/// [`TreeGridError::InvalidPrecision`] if `length` is outside 10-15.
pub fn cell_spans(length: usize) -> Result<(f64, f64), TreeGridError> {
    check_code_length(length)?;
    Ok(spans_for_length(length))
}

pub(crate) fn check_code_length(length: usize) -> Result<(), TreeGridError> {
    if (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(TreeGridError::InvalidPrecision(length))
    }
}

/// A validated short code: its symbols plus the prefix length implied by its
/// separator, when it carries one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedShortCode {
    pub symbols: String,
    pub removed: Option<usize>,
}

pub(crate) fn parse_short_code(code: &str) -> Result<ParsedShortCode, TreeGridError> {
    let invalid = || TreeGridError::InvalidShortCode(code.to_string());
    let (symbols, separator_at) = split_separator(code).ok_or_else(invalid)?;

    if !(MIN_SHORT_CODE_LENGTH..=MAX_SHORT_CODE_LENGTH).contains(&symbols.len()) {
        return Err(invalid());
    }

    let removed = match separator_at {
        Some(at) => {
            let removed = SEPARATOR_POSITION.checked_sub(at).ok_or_else(invalid)?;
            if !SHORTEN_PREFIX_LENGTHS.contains(&removed) {
                return Err(invalid());
            }
            Some(removed)
        }
        None => None,
    };

    Ok(ParsedShortCode { symbols, removed })
}

pub(crate) fn insert_separator(symbols: &str, at: usize) -> String {
    let mut out = String::with_capacity(symbols.len() + 1);
    out.push_str(&symbols[..at]);
    out.push(SEPARATOR);
    out.push_str(&symbols[at..]);
    out
}

/// Decodes any prefix of an already validated code, including prefixes
/// shorter than a full code.
pub(crate) fn area_from_symbols(symbols: &str) -> CodeArea {
    let mut lat_index = 0u64;
    let mut lon_index = 0u64;
    let mut lat_divisions = 1u64;
    let mut lon_divisions = 1u64;

    for (i, value) in symbols.chars().filter_map(symbol_value).enumerate() {
        if i < PAIR_CODE_LENGTH {
            if i % 2 == 0 {
                lat_index = lat_index * ENCODING_BASE + value;
                lat_divisions *= ENCODING_BASE;
            } else {
                lon_index = lon_index * ENCODING_BASE + value;
                lon_divisions *= ENCODING_BASE;
            }
        } else {
            lat_index = lat_index * GRID_ROWS + value / GRID_COLUMNS;
            lat_divisions *= GRID_ROWS;
            lon_index = lon_index * GRID_COLUMNS + value % GRID_COLUMNS;
            lon_divisions *= GRID_COLUMNS;
        }
    }

    let lat_span = LATITUDE_SPAN / lat_divisions as f64;
    let lon_span = LONGITUDE_SPAN / lon_divisions as f64;

    CodeArea {
        south: -90.0 + lat_index as f64 * lat_span,
        west: -180.0 + lon_index as f64 * lon_span,
        lat_span,
        lon_span,
        code_length: symbols.len(),
    }
}

pub(crate) fn spans_for_length(length: usize) -> (f64, f64) {
    let pairs = length.min(PAIR_CODE_LENGTH);
    let grid = length.saturating_sub(PAIR_CODE_LENGTH) as i32;
    let lat_digits = pairs.div_ceil(2) as i32;
    let lon_digits = (pairs / 2) as i32;

    let base = ENCODING_BASE as f64;
    let lat_span = LATITUDE_SPAN / base.powi(lat_digits) / (GRID_ROWS as f64).powi(grid);
    let lon_span = LONGITUDE_SPAN / base.powi(lon_digits) / (GRID_COLUMNS as f64).powi(grid);
    (lat_span, lon_span)
}

/// Splits off an optional single separator, upper-casing the symbols.
/// Returns `None` on any character outside the alphabet or a repeated separator.
fn split_separator(code: &str) -> Option<(String, Option<usize>)> {
    let mut symbols = String::with_capacity(code.len());
    let mut separator_at = None;

    for c in code.chars() {
        if c == SEPARATOR {
            if separator_at.is_some() {
                return None;
            }
            separator_at = Some(symbols.len());
            continue;
        }
        let upper = c.to_ascii_uppercase();
        symbol_value(upper)?;
        symbols.push(upper);
    }

    // A trailing separator would be a code with nothing after the prefix
    if separator_at == Some(symbols.len()) {
        return None;
    }
    Some((symbols, separator_at))
}

/// Index of the cell among `divisions` equal cells of `span` starting at
/// `origin` whose southern (western) edge is the last one at or before
/// `value`. Edges are computed exactly as [`area_from_symbols`] does.
fn cell_index(value: f64, origin: f64, span: f64, divisions: u64) -> u64 {
    let cell = span / divisions as f64;
    let edge = |index: u64| origin + index as f64 * cell;

    let estimate = ((value - origin) / cell).floor().max(0.0) as u64;
    let mut index = estimate.min(divisions - 1);
    while index > 0 && edge(index) > value {
        index -= 1;
    }
    while index + 1 < divisions && edge(index + 1) <= value {
        index += 1;
    }
    index
}

fn symbol(index: u64) -> char {
    CODE_ALPHABET.as_bytes()[index as usize] as char
}

fn symbol_value(c: char) -> Option<u64> {
    CODE_ALPHABET.find(c).map(|i| i as u64)
}
