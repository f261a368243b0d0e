//! Celsius to Fahrenheit conversion.
//!
//! Rounding is half away from zero everywhere (`f64::round`), so 99.5 becomes
//! 100 and -0.5 becomes -1.

/// Converts a whole Celsius value to whole Fahrenheit degrees.
pub fn to_fahrenheit(celsius: i64) -> i64 {
    round_degrees(celsius_to_fahrenheit(celsius as f64))
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn round_degrees(value: f64) -> i64 {
    value.round() as i64
}
