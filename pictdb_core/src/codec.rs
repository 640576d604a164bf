//! Thin boundary over the JPEG codec. Every other module talks to JPEG bytes only
//! through this façade, so the rest of the catalog never touches the `image` crate
//! directly.

use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;

fn decode(buf: &[u8]) -> Result<image::DynamicImage> {
    image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
        .map_err(|e| Error::Codec(format!("decode failed: {e}")))
}

/// Decodes a JPEG buffer and returns its `(width, height)`.
pub fn probe(buf: &[u8]) -> Result<(u32, u32)> {
    Ok(decode(buf)?.dimensions())
}

/// Decodes `buf`, resizes so both dimensions are at most `max_w` x `max_h` (preserving
/// aspect ratio, never enlarging), and re-encodes to JPEG.
pub fn resize_fit(buf: &[u8], max_w: u32, max_h: u32) -> Result<Vec<u8>> {
    let img = decode(buf)?;

    let (w, h) = img.dimensions();
    let resized = if w <= max_w && h <= max_h {
        // Already within bounds: re-encode as-is rather than upscale.
        img
    } else {
        img.resize(max_w, max_h, image::imageops::FilterType::Lanczos3)
    };

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, 85);
    encoder
        .encode_image(&resized)
        .map_err(|e| Error::Codec(format!("encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_jpeg(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb([128, 64, 200]));
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, 90);
        encoder.encode_image(&img).unwrap();
        out
    }

    #[test]
    fn probe_reports_dimensions() {
        let buf = solid_jpeg(64, 48);
        let (w, h) = probe(&buf).unwrap();
        assert_eq!((w, h), (64, 48));
    }

    #[test]
    fn resize_fit_never_enlarges() {
        let buf = solid_jpeg(32, 16);
        let resized = resize_fit(&buf, 256, 256).unwrap();
        let (w, h) = probe(&resized).unwrap();
        assert_eq!((w, h), (32, 16));
    }

    #[test]
    fn resize_fit_shrinks_preserving_aspect() {
        let buf = solid_jpeg(1024, 768);
        let resized = resize_fit(&buf, 64, 64).unwrap();
        let (w, h) = probe(&resized).unwrap();
        assert!(w <= 64 && h <= 64);
        // 1024x768 has a 4:3 aspect ratio; 64x48 is the exact fit.
        assert_eq!((w, h), (64, 48));
    }
}
