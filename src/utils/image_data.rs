use base64::{engine::general_purpose::STANDARD, Engine};

use crate::utils::error::AppError;

pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Decoded image payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension derived from the content type ("image/jpeg" -> "jpeg")
    pub fn extension(&self) -> &str {
        self.content_type
            .split('/')
            .nth(1)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("png")
    }
}

/// Decodes either a bare base64 string or a data URL
/// (`data:image/jpeg;base64,....`). Bare base64 is assumed to be PNG.
pub fn decode_image_payload(payload: &str) -> Result<DecodedImage, AppError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(AppError::InvalidInput("Image data is required".to_string()));
    }

    let (content_type, data) = match payload.split_once(',') {
        Some((header, data)) => {
            let content_type = header
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .filter(|ct| !ct.is_empty())
                .unwrap_or(DEFAULT_CONTENT_TYPE);
            (content_type.to_string(), data)
        }
        None => (DEFAULT_CONTENT_TYPE.to_string(), payload),
    };

    if !content_type.starts_with("image/") {
        return Err(AppError::InvalidInput("File must be an image".to_string()));
    }

    let bytes = STANDARD
        .decode(data)
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 image data: {}", e)))?;

    Ok(DecodedImage { content_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_data_url_with_content_type() {
        let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"jpeg-bytes"));
        let image = decode_image_payload(&payload).unwrap();

        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.extension(), "jpeg");
        assert_eq!(image.bytes, b"jpeg-bytes");
    }

    #[test]
    fn test_bare_base64_defaults_to_png() {
        let image = decode_image_payload(&STANDARD.encode(b"png-bytes")).unwrap();

        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, b"png-bytes");
    }

    #[test]
    fn test_rejects_non_image_and_garbage() {
        let text = format!("data:text/plain;base64,{}", STANDARD.encode(b"hello"));
        assert!(matches!(decode_image_payload(&text), Err(AppError::InvalidInput(_))));
        assert!(matches!(decode_image_payload("!!not base64!!"), Err(AppError::InvalidInput(_))));
        assert!(matches!(decode_image_payload("   "), Err(AppError::InvalidInput(_))));
    }
}
