//! Number parsing for addresses and byte values.

use anyhow::{Context, Result, bail};

/// Parse a number written as `$hex`, `0xhex`, `%bin`, `0bbin` or decimal.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_number("$7D4").unwrap(), 0x7D4);
/// assert_eq!(parse_number("%1010").unwrap(), 10);
/// ```
pub fn parse_number(s: &str) -> Result<u32> {
    let s = s.trim();
    let (digits, radix) = if let Some(rest) = s.strip_prefix('$') {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix('%') {
        (rest, 2)
    } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (rest, 2)
    } else {
        (s, 10)
    };
    if digits.is_empty() {
        bail!("Missing digits in number '{}'", s);
    }
    u32::from_str_radix(digits, radix).with_context(|| format!("Invalid number '{}'", s))
}

/// Parse a 16-bit CPU address.
pub fn parse_address(s: &str) -> Result<u16> {
    let n = parse_number(s)?;
    u16::try_from(n).map_err(|_| anyhow::anyhow!("Address out of range: '{}' (max $FFFF)", s))
}

/// Parse an 8-bit value.
pub fn parse_byte(s: &str) -> Result<u8> {
    let n = parse_number(s)?;
    u8::try_from(n).map_err(|_| anyhow::anyhow!("Value out of range: '{}' (max $FF)", s))
}

/// Format an address the way reports show it.
pub fn format_address(addr: u16) -> String {
    format!("${:04X}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_prefixes() {
        assert_eq!(parse_number("$7D4").unwrap(), 0x7D4);
        assert_eq!(parse_number("0x7d4").unwrap(), 0x7D4);
        assert_eq!(parse_number("0X7D4").unwrap(), 0x7D4);
        assert_eq!(parse_number("%1010").unwrap(), 10);
        assert_eq!(parse_number("0b11").unwrap(), 3);
        assert_eq!(parse_number("52").unwrap(), 52);
        assert_eq!(parse_number(" $0D ").unwrap(), 0x0D);
    }

    #[test]
    fn test_parse_number_invalid() {
        assert!(parse_number("$").is_err());
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("%102").is_err());
        assert!(parse_number("twelve").is_err());
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_parse_address_range() {
        assert_eq!(parse_address("$FFFF").unwrap(), 0xFFFF);
        assert!(parse_address("$10000").is_err());
    }

    #[test]
    fn test_parse_byte_range() {
        assert_eq!(parse_byte("255").unwrap(), 0xFF);
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("$100").is_err());
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0x32), "$0032");
        assert_eq!(format_address(0xA03F), "$A03F");
    }
}
