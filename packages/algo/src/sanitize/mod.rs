//! Data Sanitization
//!
//! Input cleaning shared by the matcher and the selector.
//!
//! Functions:
//! - Transcript / target normalization
//! - Score rounding
//! - Numeric validity checks for history records

/// Normalize a spoken target or transcript.
///
/// Uppercases, then drops every character that is neither alphanumeric nor
/// whitespace, then collapses whitespace runs to one space and trims.
/// Filtering after the case mapping keeps the result idempotent: some
/// uppercase forms expand into combining marks (`ǰ` -> `J` + U+030C).
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(kept.len());
    for word in kept.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Round to two decimal places, exact ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// 检查数值是否无效 (NaN 或 Inf)
pub fn is_invalid(value: f64) -> bool {
    value.is_nan() || value.is_infinite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_text("Red!"), "RED");
        assert_eq!(normalize_text("red"), "RED");
        assert_eq!(normalize_text("  i   see\tred,\n now. "), "I SEE RED NOW");
    }

    #[test]
    fn test_normalize_drops_underscore_and_symbols() {
        assert_eq!(normalize_text("snake_case"), "SNAKECASE");
        assert_eq!(normalize_text("it's 5 o'clock!"), "ITS 5 OCLOCK");
    }

    #[test]
    fn test_normalize_empty_inputs() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text("?!..."), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["Hello, World!", "  a  b ", "ÀÉ ß", "x_y-z", "ǰ", "ǰam ŉ ΐ"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(46.153846), 46.15);
        assert_eq!(round2(90.909090), 90.91);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_normalize_drops_marks_from_case_expansion() {
        assert_eq!(normalize_text("ǰ"), "J");
        assert_eq!(normalize_text("ǰam!"), "JAM");
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(3.125), 3.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-3.125), -3.12);
    }

    #[test]
    fn test_invalid_values() {
        assert!(is_invalid(f64::NAN));
        assert!(is_invalid(f64::NEG_INFINITY));
        assert!(!is_invalid(-1.0));
    }
}
