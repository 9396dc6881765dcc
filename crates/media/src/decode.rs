use std::sync::Arc;

use image::{ImageFormat, RgbaImage};

use crate::error::ThumbnailError;
use crate::mp4::{extract_box, MDAT};

/// The single image the preview currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailImage {
    /// Loaded by the host straight from its URI.
    Remote { uri: String },
    /// Fetched and decoded by the pipeline.
    Decoded(Arc<RgbaImage>),
}

impl ThumbnailImage {
    pub fn size(&self) -> Option<(u32, u32)> {
        match self {
            ThumbnailImage::Remote { .. } => None,
            ThumbnailImage::Decoded(img) => Some(img.dimensions()),
        }
    }
}

fn format_for(mime: &str) -> Result<ImageFormat, ThumbnailError> {
    if mime.is_empty() {
        return Ok(ImageFormat::Jpeg);
    }
    ImageFormat::from_mime_type(mime).ok_or_else(|| ThumbnailError::UnsupportedFormat {
        mime: mime.to_owned(),
    })
}

/// Whether this build can turn an image of `mime` into pixels. The host's
/// image loaders share the same decoders, so this also gates direct URIs.
pub fn can_decode(mime: &str) -> bool {
    format_for(&mime.to_ascii_lowercase()).is_ok_and(|format| format.reading_enabled())
}

/// Turns fetched segment bytes into pixels. Multiplexed segments carry a JPEG
/// frame in their `mdat` box; anything else is an image file of `mime`.
pub fn decode_segment(bytes: &[u8], mime: &str, multiplexed: bool) -> Result<RgbaImage, ThumbnailError> {
    let (payload, format) = if multiplexed {
        (extract_box(bytes, MDAT)?, ImageFormat::Jpeg)
    } else {
        (bytes, format_for(&mime.to_ascii_lowercase())?)
    };
    let decoded = image::load_from_memory_with_format(payload, format)?;
    Ok(decoded.to_rgba8())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([200, 10, 10])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[test]
    fn decodes_plain_png_by_mime() {
        let img = decode_segment(&encode(ImageFormat::Png), "image/png", false).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
    }

    #[test]
    fn decodes_jpeg_from_mdat_payload() {
        let jpeg = encode(ImageFormat::Jpeg);
        let mut container = ((jpeg.len() + 8) as u32).to_be_bytes().to_vec();
        container.extend_from_slice(b"mdat");
        container.extend_from_slice(&jpeg);
        let img = decode_segment(&container, "application/mp4", true).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_segment(b"not an image", "image/jpeg", false).unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode(_)));
    }

    #[test]
    fn unknown_mime_is_unsupported() {
        let err = decode_segment(b"<svg/>", "text/x-unknown", false).unwrap_err();
        assert!(matches!(err, ThumbnailError::UnsupportedFormat { .. }));
    }

    #[test]
    fn decodable_types_match_enabled_decoders() {
        assert!(can_decode("image/jpeg"));
        assert!(can_decode("IMAGE/PNG"));
        assert!(can_decode("image/webp"));
        assert!(can_decode(""));
        assert!(!can_decode("image/avif"));
        assert!(!can_decode("image/svg+xml"));
    }
}
