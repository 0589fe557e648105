/// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` literals.
pub fn parse_hex_rgba(raw: &str) -> Option<[u8; 4]> {
    let bytes = raw.trim().as_bytes();
    if !is_valid_hex(bytes) {
        return None;
    }

    let rgba = match bytes.len() {
        4 => [
            hex_1_to_u8(bytes[1]) * 17,
            hex_1_to_u8(bytes[2]) * 17,
            hex_1_to_u8(bytes[3]) * 17,
            255,
        ],
        5 => [
            hex_1_to_u8(bytes[1]) * 17,
            hex_1_to_u8(bytes[2]) * 17,
            hex_1_to_u8(bytes[3]) * 17,
            hex_1_to_u8(bytes[4]) * 17,
        ],
        7 => [
            hex_2_to_u8(bytes[1], bytes[2]),
            hex_2_to_u8(bytes[3], bytes[4]),
            hex_2_to_u8(bytes[5], bytes[6]),
            255,
        ],
        9 => [
            hex_2_to_u8(bytes[1], bytes[2]),
            hex_2_to_u8(bytes[3], bytes[4]),
            hex_2_to_u8(bytes[5], bytes[6]),
            hex_2_to_u8(bytes[7], bytes[8]),
        ],
        _ => return None,
    };
    Some(rgba)
}

fn is_valid_hex(bytes: &[u8]) -> bool {
    if bytes.first() != Some(&b'#') {
        return false;
    }
    if !matches!(bytes.len(), 4 | 5 | 7 | 9) {
        return false;
    }
    bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

fn hex_1_to_u8(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

fn hex_2_to_u8(high: u8, low: u8) -> u8 {
    hex_1_to_u8(high) * 16 + hex_1_to_u8(low)
}

#[cfg(test)]
mod tests {
    use super::parse_hex_rgba;

    #[test]
    fn short_and_long_forms_expand_to_the_same_channels() {
        assert_eq!(parse_hex_rgba("#fa0"), Some([255, 170, 0, 255]));
        assert_eq!(parse_hex_rgba("#ffaa00"), Some([255, 170, 0, 255]));
        assert_eq!(parse_hex_rgba("#ffaa0080"), Some([255, 170, 0, 128]));
    }

    #[test]
    fn malformed_literals_are_rejected() {
        assert_eq!(parse_hex_rgba("ffaa00"), None);
        assert_eq!(parse_hex_rgba("#ffaa0"), None);
        assert_eq!(parse_hex_rgba("#gg0000"), None);
    }
}
