//! Human-readable distance strings.

/// Display value for a distance that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a distance in kilometers for display.
///
/// | input          | output            |
/// |----------------|-------------------|
/// | `None`         | `"N/A"`           |
/// | `< 1 km`       | whole meters, `m` |
/// | `1 ..< 10 km`  | one decimal, `km` |
/// | `>= 10 km`     | whole km, `km`    |
///
/// Rounding is half away from zero on the displayed magnitude. The bracket is
/// picked from the raw value, so `0.9996` renders as `"1000m"`. Negative and
/// non-finite inputs are not distances and render as `"N/A"`.
///
/// ```
/// use dealzsta_geo::format_distance;
///
/// assert_eq!(format_distance(Some(0.45)), "450m");
/// assert_eq!(format_distance(Some(3.27)), "3.3km");
/// assert_eq!(format_distance(Some(12.6)), "13km");
/// assert_eq!(format_distance(None), "N/A");
/// ```
pub fn format_distance(km: Option<f64>) -> String {
    match km {
        Some(km) if km.is_finite() && km >= 0.0 => {
            if km < 1.0 {
                format!("{:.0}m", (km * 1000.0).round())
            } else if km < 10.0 {
                format!("{:.1}km", (km * 10.0).round() / 10.0)
            } else {
                format!("{:.0}km", km.round())
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_distance() {
        assert_eq!(format_distance(None), "N/A");
    }

    #[test]
    fn test_meters_bracket() {
        assert_eq!(format_distance(Some(0.0)), "0m");
        assert_eq!(format_distance(Some(0.45)), "450m");
        assert_eq!(format_distance(Some(0.0125)), "13m");
        assert_eq!(format_distance(Some(0.0004)), "0m");
        assert_eq!(format_distance(Some(0.9996)), "1000m");
    }

    #[test]
    fn test_one_decimal_bracket() {
        assert_eq!(format_distance(Some(1.0)), "1.0km");
        assert_eq!(format_distance(Some(3.27)), "3.3km");
        assert_eq!(format_distance(Some(3.25)), "3.3km");
        assert_eq!(format_distance(Some(9.94)), "9.9km");
    }

    #[test]
    fn test_whole_km_bracket() {
        assert_eq!(format_distance(Some(10.0)), "10km");
        assert_eq!(format_distance(Some(12.5)), "13km");
        assert_eq!(format_distance(Some(12.6)), "13km");
        assert_eq!(format_distance(Some(878.4)), "878km");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(format_distance(Some(f64::NAN)), "N/A");
        assert_eq!(format_distance(Some(f64::INFINITY)), "N/A");
        assert_eq!(format_distance(Some(-1.0)), "N/A");
    }

    proptest! {
        #[test]
        fn prop_suffix_follows_bracket(km in 0.0f64..20_000.0) {
            let text = format_distance(Some(km));
            if km < 1.0 {
                prop_assert!(text.ends_with('m') && !text.ends_with("km"));
            } else {
                prop_assert!(text.ends_with("km"));
            }
        }
    }
}
