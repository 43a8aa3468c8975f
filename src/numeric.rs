//! Culture-invariant number formatting and parsing.
//!
//! Values are always written with `.` as the decimal separator and no group
//! separators, so a file written on one machine reads back identically on
//! any other. Floats use the shortest representation that round-trips.

/// A primitive number that can be written to and read from INI text.
///
/// # Examples
///
/// ```
/// use inimap::numeric::InvariantNumber;
///
/// assert_eq!(1.5_f64.format_invariant(), "1.5");
/// assert_eq!(i32::parse_invariant(" -42 "), Some(-42));
/// assert_eq!(u8::parse_invariant("256"), None);
/// ```
pub trait InvariantNumber: Copy + Default + PartialEq + std::fmt::Debug {
    /// Render the value in invariant form.
    fn format_invariant(self) -> String;

    /// Parse invariant text; surrounding whitespace is ignored.
    fn parse_invariant(text: &str) -> Option<Self>;
}

macro_rules! impl_invariant_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl InvariantNumber for $ty {
                fn format_invariant(self) -> String {
                    self.to_string()
                }

                fn parse_invariant(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )+
    };
}

impl_invariant_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_invariant_float {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl InvariantNumber for $ty {
                fn format_invariant(self) -> String {
                    if self.is_nan() {
                        "NaN".to_string()
                    } else if self.is_infinite() {
                        let text = if self.is_sign_negative() { "-Infinity" } else { "Infinity" };
                        text.to_string()
                    } else {
                        self.to_string()
                    }
                }

                fn parse_invariant(text: &str) -> Option<Self> {
                    let text = text.trim();
                    match text {
                        "NaN" => Some(<$ty>::NAN),
                        "Infinity" | "+Infinity" => Some(<$ty>::INFINITY),
                        "-Infinity" => Some(<$ty>::NEG_INFINITY),
                        // "inf", "nan" and friends are not invariant spellings.
                        _ if text.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => None,
                        _ => text.parse().ok(),
                    }
                }
            }
        )+
    };
}

impl_invariant_float!(f32, f64);

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn integers_round_trip_at_bounds() {
        assert_eq!(i64::parse_invariant(&i64::MIN.format_invariant()), Some(i64::MIN));
        assert_eq!(u64::parse_invariant(&u64::MAX.format_invariant()), Some(u64::MAX));
        assert_eq!(i8::parse_invariant(&i8::MIN.format_invariant()), Some(i8::MIN));
    }

    #[test]
    fn integers_reject_garbage_and_overflow() {
        assert_eq!(i32::parse_invariant("12a"), None);
        assert_eq!(i32::parse_invariant(""), None);
        assert_eq!(u16::parse_invariant("-1"), None);
        assert_eq!(i8::parse_invariant("128"), None);
    }

    #[test]
    fn leading_plus_is_accepted() {
        assert_eq!(i16::parse_invariant("+7"), Some(7));
    }

    #[test]
    fn floats_use_dot_separator_and_shortest_form() {
        assert_eq!(0.1_f64.format_invariant(), "0.1");
        assert_eq!(12345.678_f32.format_invariant(), "12345.678");
        assert_eq!(3.0_f64.format_invariant(), "3");
    }

    #[test]
    fn floats_round_trip_exactly() {
        for v in [0.1_f64, -2.5e-8, 1e21, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(f64::parse_invariant(&v.format_invariant()), Some(v));
        }
        let v = 1.234_567_9_f32;
        assert_eq!(f32::parse_invariant(&v.format_invariant()), Some(v));
    }

    #[test]
    fn floats_parse_exponent_forms() {
        assert_eq!(f64::parse_invariant("1E+21"), Some(1e21));
        assert_eq!(f64::parse_invariant("2.5e-3"), Some(0.0025));
    }

    #[test]
    fn special_float_values() {
        assert_eq!(f64::INFINITY.format_invariant(), "Infinity");
        assert_eq!(f64::NEG_INFINITY.format_invariant(), "-Infinity");
        assert_eq!(f32::NAN.format_invariant(), "NaN");
        assert!(f64::parse_invariant("NaN").unwrap().is_nan());
        assert_eq!(f32::parse_invariant("-Infinity"), Some(f32::NEG_INFINITY));
        assert_eq!(f64::parse_invariant("inf"), None);
    }

    #[test]
    fn decimal_comma_is_rejected() {
        assert_eq!(f64::parse_invariant("1,5"), None);
    }
}
