//! Plain text decoding

use crate::ExtractionError;

const UTF8_BOM: &str = "\u{feff}";

/// Decode UTF-8 bytes, stripping a leading byte-order mark
pub fn decode_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::Processing(e.to_string()))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bom() {
        let bytes = "\u{feff}Agreement".as_bytes();
        assert_eq!(decode_plain_text(bytes).unwrap(), "Agreement");
    }

    #[test]
    fn test_devanagari_roundtrip() {
        let hindi = "यह अनुबंध दोनों पक्षों के बीच है";
        assert_eq!(decode_plain_text(hindi.as_bytes()).unwrap(), hindi);
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(decode_plain_text(&[0xc3, 0x28]).is_err());
    }
}
