/// Parse a `#rrggbb` or `#rgb` hex color into (r, g, b).
pub fn parse_hex(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
            let (r, g, b) = (d(0)?, d(1)?, d(2)?);
            Some((r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// Deterministic fallback color via CRC32 hash of the empire name.
/// Returns (r, g, b) from the first 3 bytes of the hash.
fn hashed_color(name: &str) -> (u8, u8, u8) {
    let hash = crc32fast::hash(name.as_bytes());
    let bytes = hash.to_be_bytes();
    (bytes[0], bytes[1], bytes[2])
}

/// Color for an empire overlay: the backend-provided hex when it parses,
/// otherwise a stable name-derived fallback so a malformed color never
/// blanks the overlay.
pub fn empire_color(name: &str, hex: &str) -> (u8, u8, u8) {
    parse_hex(hex).unwrap_or_else(|| hashed_color(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(parse_hex("#dc2626"), Some((0xdc, 0x26, 0x26)));
        assert_eq!(parse_hex("  #FFffFF "), Some((255, 255, 255)));
    }

    #[test]
    fn parses_three_digit_hex() {
        assert_eq!(parse_hex("#f80"), Some((255, 136, 0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("dc2626"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn empire_color_falls_back_deterministically() {
        let a = empire_color("Maurya Empire", "not-a-color");
        let b = empire_color("Maurya Empire", "");
        assert_eq!(a, b);
        assert_ne!(a, empire_color("Han Dynasty", ""));
    }

    #[test]
    fn empire_color_prefers_valid_hex() {
        assert_eq!(empire_color("Rome", "#102030"), (0x10, 0x20, 0x30));
    }
}
