//! Measurement value formatting.
//!
//! Splits combined numeral+unit strings such as `"12.345ms"` into a rounded
//! value and its unit.

use serde::Serialize;

/// A measurement value ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedValue {
    /// Value rounded to one decimal place, `None` when the input had no numeral.
    pub value: Option<f64>,
    pub unit: String,
    /// `"<value> <unit>"`, e.g. `"12.3 ms"`.
    pub display: String,
}

/// Format an `average` parameter for a cell label.
///
/// The numeral is every ASCII digit plus the first decimal point, the unit
/// is every alphabetic character; both are taken by character class so unit
/// length and position do not matter. A `-` seen before any digit makes the
/// value negative. Input without digits still yields the unit text with an
/// empty numeral.
///
/// Exponent notation is not understood: the `e` of `"1e3ms"` is a letter,
/// so that input formats as `"13 ems"`.
pub fn format_average(raw: Option<&str>) -> Option<FormattedValue> {
    let raw = raw?;

    let mut numeral = String::new();
    let mut seen_point = false;
    let mut unit = String::new();

    for c in raw.chars() {
        if c.is_ascii_digit() {
            numeral.push(c);
        } else if c == '-' && numeral.is_empty() {
            numeral.push(c);
        } else if c == '.' {
            if !seen_point {
                seen_point = true;
                numeral.push(c);
            }
        } else if c.is_alphabetic() {
            unit.push(c);
        }
    }

    let value = numeral.parse::<f64>().ok().map(round_one_decimal);

    let display = match &value {
        Some(v) if unit.is_empty() => format!("{}", v),
        Some(v) => format!("{} {}", v, unit),
        None => unit.clone(),
    };

    Some(FormattedValue {
        value,
        unit,
        display,
    })
}

/// Round half away from zero to one decimal place.
fn round_one_decimal(v: f64) -> f64 {
    let rounded = (v * 10.0).round() / 10.0;
    // Values that round to zero print as "0", never "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(raw: &str) -> String {
        format_average(Some(raw)).unwrap().display
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(display("12.345ms"), "12.3 ms");
        assert_eq!(display("5.06ms"), "5.1 ms");
        assert_eq!(display("0.25ms"), "0.3 ms");
    }

    #[test]
    fn test_whole_numbers_drop_fraction() {
        assert_eq!(display("7s"), "7 s");
        assert_eq!(display("6.98s"), "7 s");
    }

    #[test]
    fn test_absent_input() {
        assert!(format_average(None).is_none());
    }

    #[test]
    fn test_long_and_unicode_units() {
        let v = format_average(Some("941.44Mbps")).unwrap();
        assert_eq!(v.value, Some(941.4));
        assert_eq!(v.unit, "Mbps");
        assert_eq!(display("16.958µs"), "17 µs");
    }

    #[test]
    fn test_unit_before_numeral() {
        assert_eq!(display("ms 3.21"), "3.2 ms");
    }

    #[test]
    fn test_malformed_input_keeps_unit() {
        let v = format_average(Some("n/a")).unwrap();
        assert_eq!(v.value, None);
        assert_eq!(v.unit, "na");
        assert_eq!(v.display, "na");

        let v = format_average(Some("")).unwrap();
        assert_eq!(v.value, None);
        assert_eq!(v.display, "");
    }

    #[test]
    fn test_extra_decimal_points_are_dropped() {
        assert_eq!(display("1.2.5ms"), "1.3 ms");
    }

    #[test]
    fn test_negative_values_keep_sign() {
        assert_eq!(display("-3ms"), "-3 ms");
        assert_eq!(display("-0.25ms"), "-0.3 ms");
        assert_eq!(display("ms -1.04"), "-1 ms");
        assert_eq!(display("-0.01ms"), "0 ms");
        // Only a leading sign counts
        assert_eq!(display("2-1ms"), "21 ms");

        let v = format_average(Some("-ms")).unwrap();
        assert_eq!(v.value, None);
        assert_eq!(v.display, "ms");
    }

    #[test]
    fn test_exponent_is_not_parsed() {
        assert_eq!(display("1e3ms"), "13 ems");
    }

    #[test]
    fn test_missing_unit() {
        assert_eq!(display("42.04"), "42");
    }
}
