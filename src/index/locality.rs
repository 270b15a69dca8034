use crate::coord::{haversine_distance, validate_lat_lon};
use crate::error::TreeGridError;
use crate::index::codec::{
    area_from_symbols, encode_full, insert_separator, normalize_code, parse_short_code,
};
use crate::index::constants::{
    MAX_CODE_LENGTH, MIN_CODE_LENGTH, SEPARATOR, SEPARATOR_POSITION, SHORTEN_PREFIX_LENGTHS,
};
use tracing::debug;

/// Shortens a full code relative to a nearby reference point.
///
/// Drops the longest leading prefix (6, 4 or 2 characters) that the
/// reference point's own code shares, i.e. the prefix whose cell provably
/// contains the reference. When not even the first two characters match,
/// the code is returned unchanged.
///
/// A code given with the display separator yields a short code that keeps
/// the separator at its shifted position, which lets [`recover`] restore
/// exactly the number of characters removed. A plain short code is only
/// produced when [`recover`] resolves it back to `code`; otherwise the code
/// is returned whole.
///
/// # Example
/// ```
/// use treegrid_rs::{encode, shorten};
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// let code = encode(53.481, -2.248, 15)?;
/// let short = shorten(&code, 53.481, -2.248)?;
/// assert_eq!(short, &code[6..]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`TreeGridError::InvalidCode`] / [`TreeGridError::CodeTooShort`] - `code` is not a full code
/// - [`TreeGridError::InvalidCoordinate`] - The reference point is out of range
pub fn shorten(code: &str, ref_lat: f64, ref_lon: f64) -> Result<String, TreeGridError> {
    let symbols = normalize_code(code)?;
    validate_lat_lon(ref_lat, ref_lon)?;

    let with_separator = code.contains(SEPARATOR);
    let reference = encode_full(ref_lat, ref_lon);

    let Some(prefix) = shared_prefix(&symbols, &reference) else {
        debug!(code = %symbols, ref_lat, ref_lon, "reference shares no prefix, code kept whole");
        return Ok(if with_separator {
            insert_separator(&symbols, SEPARATOR_POSITION)
        } else {
            symbols
        });
    };

    let suffix = &symbols[prefix..];
    if with_separator {
        debug!(code = %symbols, prefix, "shortened against reference");
        return Ok(insert_separator(suffix, SEPARATOR_POSITION - prefix));
    }

    let recovered = nearest_candidate(suffix, &reference, ref_lat, ref_lon);
    if recovered.as_deref() != Some(symbols.as_str()) {
        debug!(
            code = %symbols,
            prefix,
            ?recovered,
            "plain short code would recover elsewhere, code kept whole"
        );
        return Ok(symbols);
    }

    debug!(code = %symbols, prefix, "shortened against reference");
    Ok(suffix.to_string())
}

/// Longest prefix length in [`SHORTEN_PREFIX_LENGTHS`] on which `symbols`
/// and `reference` agree.
fn shared_prefix(symbols: &str, reference: &str) -> Option<usize> {
    SHORTEN_PREFIX_LENGTHS
        .iter()
        .copied()
        .find(|&prefix| symbols.len() >= prefix && symbols[..prefix] == reference[..prefix])
}

/// Recovers a full code from a short code and a reference point.
///
/// A short code carrying the separator says how many characters were
/// removed, so the reference's own prefix of that length is restored.
/// Without a separator, the reference's 6, 4 and 2 character prefixes are
/// each tried. A candidate is plausible when it has a valid full length and
/// [`shorten`] would have removed exactly that prefix from it; among the
/// plausible candidates the one whose cell center is nearest the reference
/// wins, ties going to the longer prefix.
///
/// The result is formatted like the input: with the separator if and only
/// if the short code had one.
///
/// # Example
/// ```
/// use treegrid_rs::{encode, recover, shorten};
///
/// # fn main() -> Result<(), treegrid_rs::TreeGridError> {
/// let code = encode(-33.8568, 151.2153, 13)?;
/// let short = shorten(&code, -33.8568, 151.2153)?;
/// assert_eq!(recover(&short, -33.8568, 151.2153)?, code);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`TreeGridError::InvalidShortCode`] - Characters outside the alphabet, a
///   length outside 4-14, a misplaced separator, or no plausible candidate
/// - [`TreeGridError::InvalidCoordinate`] - The reference point is out of range
pub fn recover(short_code: &str, ref_lat: f64, ref_lon: f64) -> Result<String, TreeGridError> {
    let parsed = parse_short_code(short_code)?;
    validate_lat_lon(ref_lat, ref_lon)?;

    let reference = encode_full(ref_lat, ref_lon);

    match parsed.removed {
        Some(prefix) => {
            let full = format!("{}{}", &reference[..prefix], parsed.symbols);
            if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&full.len()) {
                return Err(TreeGridError::InvalidShortCode(short_code.to_string()));
            }
            debug!(short_code, prefix, "recovered from separator position");
            Ok(insert_separator(&full, SEPARATOR_POSITION))
        }
        None => nearest_candidate(&parsed.symbols, &reference, ref_lat, ref_lon)
            .ok_or_else(|| TreeGridError::InvalidShortCode(short_code.to_string())),
    }
}

fn nearest_candidate(
    symbols: &str,
    reference: &str,
    ref_lat: f64,
    ref_lon: f64,
) -> Option<String> {
    let mut best: Option<(f64, String)> = None;

    for prefix in SHORTEN_PREFIX_LENGTHS {
        let total = prefix + symbols.len();
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&total) {
            continue;
        }

        let candidate = format!("{}{}", &reference[..prefix], symbols);
        // Sharing a longer prefix, it would have been shortened further
        if shared_prefix(&candidate, reference) != Some(prefix) {
            continue;
        }

        let center = area_from_symbols(&candidate).center();
        let distance = haversine_distance(ref_lat, ref_lon, center.y(), center.x());
        debug!(%candidate, prefix, distance, "recovery candidate");

        // Strictly nearer only, so ties keep the longer prefix tried first
        if best.as_ref().is_none_or(|(nearest, _)| distance < *nearest) {
            best = Some((distance, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::codec::{encode, format_code};

    #[test]
    fn test_shorten_against_own_point() -> Result<(), TreeGridError> {
        let (lat, lon) = (53.48082746, -2.24796995);
        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let code = encode(lat, lon, length)?;
            let short = shorten(&code, lat, lon)?;
            assert_eq!(short, &code[6..]);
            assert!(short.len() + 2 <= code.len());
        }
        Ok(())
    }

    #[test]
    fn test_shorten_keeps_separator() -> Result<(), TreeGridError> {
        assert_eq!(shorten("GG222222+2222222", 0.0, 0.0)?, "22+2222222");
        Ok(())
    }

    #[test]
    fn test_shorten_removes_four_when_only_four_shared() -> Result<(), TreeGridError> {
        // Same 0.45 x 0.9 degree cell, different 0.0225 x 0.045 degree cell
        let code = encode(0.3, 0.3, 15)?;
        assert_eq!(code, "GG22M88MM8C8C8C");

        let short = shorten(&code, 0.1, 0.1)?;
        assert_eq!(short, "M88MM8C8C8C");
        assert_eq!(recover(&short, 0.1, 0.1)?, code);
        Ok(())
    }

    #[test]
    fn test_shorten_keeps_ambiguous_plain_code_whole() -> Result<(), TreeGridError> {
        // Without the first four characters this would read back as the
        // nearer 15-character code GG2264M88MM8C8C
        let code = encode(0.3, 0.3, 13)?;
        assert_eq!(code, "GG22M88MM8C8C");
        assert_eq!(shorten(&code, 0.1, 0.1)?, code);

        let displayed = format_code(&code)?;
        assert_eq!(shorten(&displayed, 0.1, 0.1)?, "M88M+M8C8C");
        Ok(())
    }

    #[test]
    fn test_shorten_far_reference_keeps_code() -> Result<(), TreeGridError> {
        let code = encode(0.0, 0.0, 11)?;
        assert_eq!(shorten(&code, 45.0, 90.0)?, code);
        Ok(())
    }

    #[test]
    fn test_shorten_invalid_inputs() {
        assert!(matches!(
            shorten("@@@@@@@@@@", 0.0, 0.0),
            Err(TreeGridError::InvalidCode(_))
        ));
        assert!(matches!(
            shorten("GG22222222", 95.0, 0.0),
            Err(TreeGridError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_recover_round_trip_plain() -> Result<(), TreeGridError> {
        let (lat, lon) = (-33.8567844, 151.213108);
        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let code = encode(lat, lon, length)?;
            let short = shorten(&code, lat, lon)?;
            assert_eq!(recover(&short, lat, lon)?, code);
        }
        Ok(())
    }

    #[test]
    fn test_recover_plain_with_offset_reference() -> Result<(), TreeGridError> {
        // The reference shares six characters; the four-character candidate
        // 5F4572H6JHJXV lies nearer but shares six characters as well
        let code = "5F457272H6JHJXV";
        let (ref_lat, ref_lon) = (-61.97322, -15.25911);

        let short = shorten(code, ref_lat, ref_lon)?;
        assert_eq!(short, "72H6JHJXV");
        assert_eq!(recover(&short, ref_lat, ref_lon)?, code);
        Ok(())
    }

    #[test]
    fn test_recover_with_separator_is_exact() -> Result<(), TreeGridError> {
        // Only four characters are shared here, which a plain short code
        // cannot express unambiguously
        let code = encode(0.3, 0.3, 13)?;
        let displayed = insert_separator(&code, SEPARATOR_POSITION);

        let short = shorten(&displayed, 0.1, 0.1)?;
        assert_eq!(short.find(SEPARATOR), Some(4));
        assert_eq!(recover(&short, 0.1, 0.1)?, displayed);
        Ok(())
    }

    #[test]
    fn test_recover_minimal_short_code() -> Result<(), TreeGridError> {
        assert_eq!(recover("2222", 0.0, 0.0)?, "GG22222222");
        Ok(())
    }

    #[test]
    fn test_recover_errors() {
        assert!(matches!(
            recover("@@@@", 0.0, 0.0),
            Err(TreeGridError::InvalidShortCode(_))
        ));
        assert!(matches!(
            recover("GG2222222222222", 0.0, 0.0),
            Err(TreeGridError::InvalidShortCode(_))
        ));
        assert!(matches!(
            recover("22", 0.0, 0.0),
            Err(TreeGridError::InvalidShortCode(_))
        ));
        assert!(matches!(
            recover("2222", 0.0, 200.0),
            Err(TreeGridError::InvalidCoordinate { .. })
        ));
    }
}
