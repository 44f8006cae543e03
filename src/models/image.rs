use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{InviteError, Result};

/// Guesses the MIME type of an encoded image from its magic bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data.trim()).map_err(|e| {
        InviteError::UpstreamImageGenerationError(format!("invalid base64 image: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_mime_type(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime_type(b"??"), "image/png");
    }

    #[test]
    fn bad_base64_is_image_failure() {
        assert!(decode_base64("not base64!!").is_err());
        assert_eq!(decode_base64(&encode_base64(b"abc")).unwrap(), b"abc");
    }
}
