use proptest::prelude::*;
use treegrid_rs::{
    MAX_CODE_LENGTH, MIN_CODE_LENGTH, decode, encode, format_code, is_valid_full_code,
    is_valid_short_code, recover, select_precision, shorten, soil_footprint_area,
};

fn latitude() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

fn longitude() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

fn code_length() -> impl Strategy<Value = usize> {
    MIN_CODE_LENGTH..=MAX_CODE_LENGTH
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The decoded center lies within half a cell of the encoded point
    #[test]
    fn prop_round_trip_within_half_cell(
        lat in latitude(),
        lon in longitude(),
        length in code_length()
    ) {
        let code = encode(lat, lon, length).unwrap();
        prop_assert_eq!(code.len(), length);
        prop_assert!(is_valid_full_code(&code));

        let area = decode(&code).unwrap();
        prop_assert!(area.south <= lat && area.west <= lon);
        prop_assert!((area.center_latitude() - lat).abs() <= area.lat_span / 2.0 + 1e-9);
        prop_assert!((area.center_longitude() - lon).abs() <= area.lon_span / 2.0 + 1e-9);
    }

    /// Every extra character strictly shrinks the cell
    #[test]
    fn prop_cell_area_decreases_with_length(lat in latitude(), lon in longitude()) {
        let areas: Vec<f64> = (MIN_CODE_LENGTH..=MAX_CODE_LENGTH)
            .map(|length| {
                let area = decode(&encode(lat, lon, length).unwrap()).unwrap();
                area.lat_span * area.lon_span
            })
            .collect();

        for pair in areas.windows(2) {
            prop_assert!(pair[1] < pair[0], "areas not decreasing: {:?}", areas);
        }
    }

    /// Longer codes refine shorter ones
    #[test]
    fn prop_codes_nest(lat in latitude(), lon in longitude(), length in code_length()) {
        let code = encode(lat, lon, length).unwrap();
        let coarse = encode(lat, lon, MIN_CODE_LENGTH).unwrap();
        prop_assert!(code.starts_with(&coarse));
    }

    /// Shortening at the encoded point always removes a prefix that recovers
    #[test]
    fn prop_shorten_recover_at_point(
        lat in latitude(),
        lon in longitude(),
        length in code_length()
    ) {
        let code = encode(lat, lon, length).unwrap();
        let short = shorten(&code, lat, lon).unwrap();
        prop_assert!(short.len() + 6 == code.len());
        prop_assert!(is_valid_short_code(&short));
        prop_assert_eq!(recover(&short, lat, lon).unwrap(), code.clone());

        let display = format_code(&code).unwrap();
        let short_display = shorten(&display, lat, lon).unwrap();
        prop_assert_eq!(recover(&short_display, lat, lon).unwrap(), display);
    }

    /// A nearby reference inside the same area cell recovers exactly
    #[test]
    fn prop_recover_from_nearby_reference(
        lat in -80.0f64..80.0,
        lon in -170.0f64..170.0,
        length in code_length(),
        dlat in 0.0f64..1.0,
        dlon in 0.0f64..1.0
    ) {
        let display = format_code(&encode(lat, lon, length).unwrap()).unwrap();
        let area = decode(&encode(lat, lon, MIN_CODE_LENGTH).unwrap()).unwrap();

        // Any point of the code's own 10-character cell shares its 6-prefix
        let ref_lat = area.south + dlat * area.lat_span;
        let ref_lon = area.west + dlon * area.lon_span;
        let short = shorten(&display, ref_lat, ref_lon).unwrap();
        prop_assert_eq!(recover(&short, ref_lat, ref_lon).unwrap(), display);
    }

    /// Stored plain short codes recover against a reference in the area cell
    #[test]
    fn prop_plain_recover_from_nearby_reference(
        lat in -80.0f64..80.0,
        lon in -170.0f64..170.0,
        length in code_length(),
        dlat in 0.0f64..1.0,
        dlon in 0.0f64..1.0
    ) {
        let code = encode(lat, lon, length).unwrap();
        let area = decode(&encode(lat, lon, MIN_CODE_LENGTH).unwrap()).unwrap();

        let ref_lat = area.south + dlat * area.lat_span;
        let ref_lon = area.west + dlon * area.lon_span;
        let short = shorten(&code, ref_lat, ref_lon).unwrap();
        prop_assert_eq!(short.len() + 6, code.len());
        prop_assert_eq!(recover(&short, ref_lat, ref_lon).unwrap(), code);
    }

    /// Whatever a plain short code drops, the same reference restores
    #[test]
    fn prop_plain_shorten_recover_inverse(
        lat in -80.0f64..80.0,
        lon in -170.0f64..170.0,
        length in code_length(),
        dlat in -0.5f64..0.5,
        dlon in -1.0f64..1.0
    ) {
        let code = encode(lat, lon, length).unwrap();
        let (ref_lat, ref_lon) = (lat + dlat, lon + dlon);
        let short = shorten(&code, ref_lat, ref_lon).unwrap();
        if short != code {
            prop_assert_eq!(recover(&short, ref_lat, ref_lon).unwrap(), code);
        }
    }

    /// Coarser codes cover more ground at every latitude short of the poles
    #[test]
    fn prop_footprint_decreases_with_length(lat in -89.999f64..89.999) {
        let coarse = soil_footprint_area(11, lat).unwrap();
        let fine = soil_footprint_area(13, lat).unwrap();
        let finest = soil_footprint_area(15, lat).unwrap();
        prop_assert!(coarse > fine && fine > finest);
        prop_assert!(finest > 0.0);
    }

    /// A larger trunk never gets a finer code
    #[test]
    fn prop_precision_monotonic(d1 in 0.0f64..500.0, d2 in 0.0f64..500.0) {
        let (big, small) = if d1 >= d2 { (d1, d2) } else { (d2, d1) };
        let big_length = select_precision(big).unwrap().code_length();
        let small_length = select_precision(small).unwrap().code_length();
        prop_assert!(big_length <= small_length);
    }
}
