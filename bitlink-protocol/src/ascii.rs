//! ASCII digit helpers shared by the field codecs

/// Uppercase hex digits used when writing
pub const HEX_DIGITS: [u8; 16] = *b"0123456789ABCDEF";

/// Decode a single hex digit (`0-9`, `a-f`, `A-F`)
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(10 + c - b'a'),
        b'A'..=b'F' => Some(10 + c - b'A'),
        _ => None,
    }
}

/// Decode a single base-36 digit (`0-9`, `a-z`, `A-Z`)
pub fn base36_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'z' => Some(10 + c - b'a'),
        b'A'..=b'Z' => Some(10 + c - b'A'),
        _ => None,
    }
}

/// Encode a byte as two uppercase hex digits
pub fn hex_pair(value: u8) -> [u8; 2] {
    [HEX_DIGITS[(value >> 4) as usize], HEX_DIGITS[(value & 0x0F) as usize]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_value_case_insensitive() {
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'G'), None);
        assert_eq!(hex_value(b'|'), None);
    }

    #[test]
    fn test_base36_value() {
        assert_eq!(base36_value(b'V'), Some(31));
        assert_eq!(base36_value(b'v'), Some(31));
        assert_eq!(base36_value(b'Z'), Some(35));
        assert_eq!(base36_value(b'#'), None);
    }

    #[test]
    fn test_hex_pair_uppercase() {
        assert_eq!(hex_pair(0xAB), *b"AB");
        assert_eq!(hex_pair(0x04), *b"04");
    }
}
