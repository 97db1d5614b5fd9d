//! Intensity normalization and its emoji presentation mapping.

/// Display symbol per intensity level, indexed 0 through 10.
const EMOJIS: [&str; 11] = [
    "😌", "🙂", "😊", "😯", "😕", "😬", "😟", "😫", "😤", "😭", "💥",
];

/// Parse a raw form value into an intensity. Non-numeric input becomes 0;
/// anything outside [0,10] is clamped into range.
pub fn parse_intensity(raw: &str) -> i32 {
    raw.trim().parse::<i64>().map(clamp_intensity).unwrap_or(0)
}

/// Clamp an integer into the valid intensity range [0,10].
pub fn clamp_intensity(value: i64) -> i32 {
    value.clamp(0, 10) as i32
}

/// Emoji for an intensity value. Never fails: input is clamped before lookup
/// and a missing table entry falls back to the mild symbol.
pub fn emoji_for(intensity: i32) -> &'static str {
    let index = clamp_intensity(intensity as i64) as usize;
    EMOJIS.get(index).copied().unwrap_or("🙂")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_in_range_values() {
        assert_eq!(parse_intensity("0"), 0);
        assert_eq!(parse_intensity("7"), 7);
        assert_eq!(parse_intensity("10"), 10);
        assert_eq!(parse_intensity(" 3 "), 3);
    }

    #[test]
    fn parse_clamps_out_of_range() {
        assert_eq!(parse_intensity("15"), 10);
        assert_eq!(parse_intensity("11"), 10);
        assert_eq!(parse_intensity("-1"), 0);
        assert_eq!(parse_intensity("-9999"), 0);
        assert_eq!(parse_intensity("99999999999999999999"), 0); // overflow -> 0
    }

    #[test]
    fn parse_defaults_non_numeric_to_zero() {
        assert_eq!(parse_intensity("abc"), 0);
        assert_eq!(parse_intensity(""), 0);
        assert_eq!(parse_intensity("3.5"), 0);
    }

    #[test]
    fn emoji_lookup_never_fails() {
        assert_eq!(emoji_for(0), "😌");
        assert_eq!(emoji_for(10), "💥");
        assert_eq!(emoji_for(-5), "😌");
        assert_eq!(emoji_for(42), "💥");
    }
}
