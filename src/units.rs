//! Numeric and length parsing for SVG attribute values.

use std::num::ParseFloatError;

/// Parses a numeric value, tolerating a trailing case-insensitive `px`
/// suffix ("0.26458333", "70px", "7e1PX"). Scientific notation is accepted.
pub fn parse_number(s: &str) -> Result<f64, ParseFloatError> {
    let mut t = s.trim();
    let b = t.as_bytes();
    if b.len() >= 2
        && b[b.len() - 2].eq_ignore_ascii_case(&b'p')
        && b[b.len() - 1].eq_ignore_ascii_case(&b'x')
    {
        t = t[..t.len() - 2].trim_end();
    }
    t.parse::<f64>()
}

/// Parses a pixel length. Plain numbers are treated as px, which is how
/// Inkscape writes root dimensions.
pub fn parse_px_length(s: &str) -> Result<f64, ParseFloatError> {
    parse_number(s)
}

/// Absolute-difference tolerance comparison.
pub fn close_enough(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
