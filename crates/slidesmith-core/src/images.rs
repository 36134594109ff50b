//! Image normalization for export.
//!
//! Turns a remote URL (or an inline data URL) into a bounded-size JPEG
//! suitable for embedding in an artifact. Pure async function, no shared
//! state; every failure collapses into [`Unavailable`], which callers must
//! treat as "omit the image", never as a fatal export error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Images wider than this are downscaled, preserving aspect ratio.
pub const MAX_WIDTH: u32 = 1600;

/// JPEG re-encode quality (out of 100).
pub const JPEG_QUALITY: u8 = 80;

/// A normalized, embeddable raster.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Why an image could not be normalized. Non-fatal by contract.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("resize failed: {0}")]
    Resize(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Fetches, decodes, downsamples, and re-encodes one image reference.
///
/// `source` is either an `http(s)` URL or an inline `data:` URL (the
/// generator occasionally hands decks back with images already inlined).
pub async fn normalize(
    client: &reqwest::Client,
    source: &str,
) -> Result<NormalizedImage, Unavailable> {
    let bytes = if source.starts_with("data:") {
        decode_data_url(source)?
    } else {
        fetch(client, source).await?
    };

    let decoded =
        image::load_from_memory(&bytes).map_err(|e| Unavailable::Decode(e.to_string()))?;

    let resized = match scaled_dims(decoded.width(), decoded.height(), MAX_WIDTH) {
        Some((w, h)) => resize(&decoded, w, h)?,
        None => decoded,
    };

    encode_jpeg(&resized)
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, Unavailable> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Unavailable::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(Unavailable::Fetch(format!(
            "{url}: status {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Unavailable::Fetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, Unavailable> {
    let payload = url
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| Unavailable::Decode("data URL is not base64".to_string()))?;
    BASE64
        .decode(payload.trim())
        .map_err(|e| Unavailable::Decode(e.to_string()))
}

/// Returns downscaled dimensions when `width` exceeds `max_width`,
/// preserving aspect ratio; `None` when the image is already in bounds.
fn scaled_dims(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }
    let scaled = (u64::from(height) * u64::from(max_width)) / u64::from(width);
    Some((max_width, (scaled as u32).max(1)))
}

fn resize(src: &image::DynamicImage, dst_w: u32, dst_h: u32) -> Result<image::DynamicImage, Unavailable> {
    use fast_image_resize as fir;

    let src_rgba = src.to_rgba8();
    let (src_w, src_h) = src_rgba.dimensions();
    let src_pixels = src_rgba.into_raw();

    let src_image = fir::images::Image::from_vec_u8(src_w, src_h, src_pixels, fir::PixelType::U8x4)
        .map_err(|e| Unavailable::Resize(e.to_string()))?;

    let mut dst_image = fir::images::Image::new(dst_w, dst_h, fir::PixelType::U8x4);
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, None)
        .map_err(|e| Unavailable::Resize(e.to_string()))?;

    let rgba = image::RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| Unavailable::Resize("invalid output buffer".to_string()))?;
    Ok(image::DynamicImage::ImageRgba8(rgba))
}

fn encode_jpeg(img: &image::DynamicImage) -> Result<NormalizedImage, Unavailable> {
    use image::codecs::jpeg::JpegEncoder;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| Unavailable::Encode(e.to_string()))?;

    Ok(NormalizedImage {
        jpeg,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn data_url(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(bytes))
    }

    #[test]
    fn scaled_dims_caps_width_and_keeps_aspect() {
        assert_eq!(scaled_dims(3200, 400, 1600), Some((1600, 200)));
        assert_eq!(scaled_dims(1601, 1601, 1600), Some((1600, 1600)));
        assert_eq!(scaled_dims(1600, 900, 1600), None);
        assert_eq!(scaled_dims(10, 10, 1600), None);
    }

    #[tokio::test]
    async fn inline_image_passes_through_unscaled() {
        let client = reqwest::Client::new();
        let normalized = normalize(&client, &data_url(&png_bytes(32, 18))).await.unwrap();
        assert_eq!((normalized.width, normalized.height), (32, 18));
        // JPEG magic bytes
        assert_eq!(&normalized.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn wide_image_is_downsampled_to_cap() {
        let client = reqwest::Client::new();
        let normalized = normalize(&client, &data_url(&png_bytes(3200, 400))).await.unwrap();
        assert_eq!((normalized.width, normalized.height), (1600, 200));
    }

    #[tokio::test]
    async fn garbage_bytes_are_unavailable_not_fatal() {
        let client = reqwest::Client::new();
        let url = format!("data:image/png;base64,{}", BASE64.encode(b"not an image"));
        let err = normalize(&client, &url).await.unwrap_err();
        assert!(matches!(err, Unavailable::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_fetch_failure() {
        let client = reqwest::Client::new();
        let err = normalize(&client, "http://127.0.0.1:1/image.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Unavailable::Fetch(_)));
    }
}
