/// Still-frame encoding and transcoding
///
/// Two entry points: `still_from_frame` turns the latest viewfinder frame
/// into an encoded still at its native resolution, and `transcode` re-encodes
/// an existing still to the configured target size/format/quality. The
/// resize stretches to the exact target; there is no aspect-preserving crop.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::Cursor;

use crate::camera::Frame;
use crate::imaging::data_url::DataUrl;
use crate::imaging::ImagingError;
use crate::state::capture::CapturedImage;
use crate::state::config::{ImageConfig, OutputFormat};

/// Re-encode a still to the configured width/height/format/quality.
///
/// Runs on a blocking thread because decode + resize are CPU-bound.
pub async fn transcode(image: CapturedImage, config: ImageConfig) -> Result<CapturedImage, String> {
    tokio::task::spawn_blocking(move || transcode_blocking(&image, &config))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| e.to_string())
}

fn transcode_blocking(
    image: &CapturedImage,
    config: &ImageConfig,
) -> Result<CapturedImage, ImagingError> {
    let bytes = image.url.decode()?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| ImagingError::Decode(e.to_string()))?;

    // Stretch to the exact target; no crop, no letterboxing
    let stretched = decoded.resize_exact(config.width, config.height, FilterType::Triangle);

    let encoded = encode_pixels(&stretched, config.format, config.quality)?;
    Ok(CapturedImage {
        url: DataUrl::encode(&encoded, config.format.mime()),
        width: config.width,
        height: config.height,
    })
}

/// Encode the latest viewfinder frame at its native resolution.
pub fn still_from_frame(
    frame: &Frame,
    format: OutputFormat,
    quality: f32,
) -> Result<CapturedImage, ImagingError> {
    let pixels = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .ok_or_else(|| ImagingError::Encode("frame buffer size mismatch".to_string()))?;
    let encoded = encode_pixels(&DynamicImage::ImageRgba8(pixels), format, quality)?;
    Ok(CapturedImage {
        url: DataUrl::encode(&encoded, format.mime()),
        width: frame.width,
        height: frame.height,
    })
}

/// Encode pixels into the requested container.
///
/// Quality maps to the JPEG encoder's 10-100 range; the PNG encoder takes no
/// quality and the WebP encoder is lossless-only, so both ignore it.
fn encode_pixels(
    pixels: &DynamicImage,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, ImagingError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let rgb = pixels.to_rgb8();
            let quality = (quality.clamp(0.1, 1.0) * 100.0).round() as u8;
            JpegEncoder::new_with_quality(&mut out, quality)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| ImagingError::Encode(e.to_string()))?;
        }
        OutputFormat::Png => {
            pixels
                .write_to(&mut out, image::ImageFormat::Png)
                .map_err(|e| ImagingError::Encode(e.to_string()))?;
        }
        OutputFormat::WebP => {
            let rgba = pixels.to_rgba8();
            WebPEncoder::new_lossless(&mut out)
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| ImagingError::Encode(e.to_string()))?;
        }
    }
    Ok(out.into_inner())
}
