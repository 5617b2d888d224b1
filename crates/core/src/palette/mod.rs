//! Camelot key colors.

use crate::style::Color;

/// Used for anything that is not a `1A`..`12B` label.
pub const FALLBACK_KEY_COLOR: Color = Color::Rgb {
    r: 150,
    g: 150,
    b: 150,
};

// Hue wheel position for each Camelot number; A (minor) is the darker ring.
const WHEEL: [(u8, u8, u8); 12] = [
    (86, 241, 218),
    (125, 237, 164),
    (174, 234, 121),
    (237, 218, 114),
    (255, 178, 107),
    (255, 137, 118),
    (255, 115, 159),
    (240, 121, 203),
    (203, 138, 245),
    (160, 156, 255),
    (128, 184, 255),
    (88, 214, 246),
];

/// Parses a Camelot label such as `8A` or ` 12b ` into `(number, is_major)`.
pub fn parse_camelot(key: &str) -> Option<(u8, bool)> {
    let key = key.trim();
    let (split, _) = key.char_indices().last()?;
    let (number, letter) = key.split_at(split);
    let number: u8 = number.parse().ok()?;
    if !(1..=12).contains(&number) {
        return None;
    }
    match letter {
        "A" | "a" => Some((number, false)),
        "B" | "b" => Some((number, true)),
        _ => None,
    }
}

/// Display color for a harmonic key, with a fallback for unknown labels.
pub fn key_color(key: &str) -> Color {
    match parse_camelot(key) {
        Some((number, major)) => {
            let (r, g, b) = WHEEL[usize::from(number - 1)];
            if major {
                Color::Rgb { r, g, b }
            } else {
                Color::Rgb {
                    r: darken(r),
                    g: darken(g),
                    b: darken(b),
                }
            }
        }
        None => FALLBACK_KEY_COLOR,
    }
}

fn darken(channel: u8) -> u8 {
    (u16::from(channel) * 4 / 5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_rings() {
        assert_eq!(parse_camelot("8A"), Some((8, false)));
        assert_eq!(parse_camelot(" 12b "), Some((12, true)));
    }

    #[test]
    fn unknown_keys_use_fallback() {
        for key in ["13A", "0B", "", "A", "8C", "Cmaj", "８A", "8é"] {
            assert_eq!(key_color(key), FALLBACK_KEY_COLOR, "key {key:?}");
        }
    }

    #[test]
    fn rings_get_distinct_colors() {
        assert_ne!(key_color("5A"), key_color("5B"));
        assert_ne!(key_color("5A"), FALLBACK_KEY_COLOR);
    }
}
