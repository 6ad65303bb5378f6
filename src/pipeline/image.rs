//! Raster-to-raster re-encoding.
//!
//! Decodes the source into a pixel surface and re-encodes it in the target
//! format: lossless for PNG, a fixed high-quality lossy setting for JPEG and
//! WebP. JPEG has no alpha channel, so transparent sources are composited
//! onto an opaque white background first; without that, transparency comes
//! out black.

use crate::artifact::{replace_extension, ConversionArtifact, SourceFile};
use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::TargetFormat;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Re-encode a raster image as `target` (one of png / jpg / webp).
///
/// Runs synchronously; the dispatcher wraps it in `spawn_blocking`.
pub fn transcode(
    source: &SourceFile,
    target: TargetFormat,
    config: &ConversionConfig,
) -> Result<ConversionArtifact, ConvertError> {
    let img = image::load_from_memory(&source.bytes).map_err(|e| ConvertError::Decode {
        name: source.name.clone(),
        kind: source.kind(),
        detail: e.to_string(),
    })?;
    debug!(
        "Decoded {} → {}x{} px, re-encoding as {}",
        source.name,
        img.width(),
        img.height(),
        target
    );

    let bytes = match target {
        TargetFormat::Png => encode_png(&img)?,
        TargetFormat::Jpg => encode_jpeg(&img, config.jpeg_quality)?,
        TargetFormat::Webp => encode_webp(&img, config.webp_quality)?,
        other => {
            return Err(ConvertError::InvalidPairing {
                src: source.kind(),
                target: other,
            })
        }
    };
    if bytes.is_empty() {
        return Err(ConvertError::Encode {
            format: target,
            detail: "encoder returned an empty payload".into(),
        });
    }

    Ok(ConversionArtifact::new(
        bytes,
        replace_extension(&source.name, target.extension()),
    ))
}

/// Lossless PNG encode of an already-decoded surface.
pub(crate) fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ConvertError::Encode {
            format: TargetFormat::Png,
            detail: e.to_string(),
        })?;
    Ok(buf)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ConvertError> {
    let rgb = flatten_onto_white(img).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut Cursor::new(&mut buf), quality)
        .encode_image(&rgb)
        .map_err(|e| ConvertError::Encode {
            format: TargetFormat::Jpg,
            detail: e.to_string(),
        })?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, ConvertError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height());
    let memory = encoder.encode(quality);
    Ok(memory.to_vec())
}

/// Composite onto an opaque white canvas. `imageops::overlay` alpha-blends,
/// so partially transparent pixels blend toward white rather than black.
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let mut canvas = RgbaImage::from_pixel(img.width(), img.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(canvas)
}
