/// Error type for treegrid-rs operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeGridError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180] (or not finite).
    #[error("Invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    /// Code length outside the supported range (10-15).
    #[error("Invalid precision: {0}")]
    InvalidPrecision(usize),
    /// The code contains a character outside the alphabet or is too long.
    #[error("Invalid code: {0}")]
    InvalidCode(String),
    /// The code has fewer than 10 significant characters.
    #[error("Code too short: {0}")]
    CodeTooShort(String),
    /// The short code cannot be recovered against any prefix.
    #[error("Invalid short code: {0}")]
    InvalidShortCode(String),
    /// Trunk diameter is negative or not finite.
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(f64),
    /// A builder was finished without a required input.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// Building Arrow arrays or record batches failed.
    #[error("Arrow error: {0}")]
    ArrowError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
}
