use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageReader, Limits};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::{AppError, ErrorKind};
use crate::model::{ImagePayload, ImagePreview};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to decode image: {source}")]
    Decode {
        #[from]
        source: image::ImageError,
    },

    #[error("jpeg encoding failed: width={width}, height={height}, reason={reason}")]
    JpegEncode {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("image too large: {width}x{height} = {pixels} pixels, max {max_pixels}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },

    #[error("input bytes empty")]
    EmptyInput,

    #[error("unsupported image format")]
    UnsupportedFormat,
}

impl From<PreviewError> for AppError {
    fn from(e: PreviewError) -> Self {
        AppError::new(ErrorKind::ImageProcessing, "preview unavailable").with_internal(e.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub max_image_pixels: u64,
    pub max_dimension: u32,
    pub max_alloc_bytes: u64,
    /// Longest edge of the thumbnail.
    pub thumbnail_edge: u32,
    pub jpeg_quality: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_image_pixels: 100_000_000,
            max_dimension: 15_000,
            max_alloc_bytes: 512 * 1024 * 1024,
            thumbnail_edge: 512,
            jpeg_quality: 80,
        }
    }
}

/// Builds the on-screen thumbnail for a picked photo.
///
/// The picked payload is left untouched; only the preview is downscaled
/// and re-encoded, which also drops any EXIF metadata from it.
#[instrument(skip(image), fields(input_size = image.len(), mime = %image.mime_type))]
pub fn generate(image: &ImagePayload) -> Result<ImagePreview, PreviewError> {
    generate_with(&PreviewConfig::default(), image)
}

pub fn generate_with(
    config: &PreviewConfig,
    image: &ImagePayload,
) -> Result<ImagePreview, PreviewError> {
    let img = decode_image(config, &image.bytes)?;
    let (w, h) = img.dimensions();
    // thumbnail() also upscales, so small photos are encoded as they are
    let thumb = if w > config.thumbnail_edge || h > config.thumbnail_edge {
        img.thumbnail(config.thumbnail_edge, config.thumbnail_edge)
    } else {
        img
    };
    let (width, height) = thumb.dimensions();
    let jpeg = encode_jpeg(&thumb, config.jpeg_quality)?;

    debug!(width, height, output_size = jpeg.len(), "preview generated");

    Ok(ImagePreview {
        data_uri: format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)),
        width,
        height,
    })
}

fn decode_image(config: &PreviewConfig, raw_bytes: &[u8]) -> Result<DynamicImage, PreviewError> {
    if raw_bytes.is_empty() {
        return Err(PreviewError::EmptyInput);
    }

    let mut reader = ImageReader::new(Cursor::new(raw_bytes))
        .with_guessed_format()
        .map_err(|e| PreviewError::Decode { source: e.into() })?;

    if reader.format().is_none() {
        return Err(PreviewError::UnsupportedFormat);
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(config.max_dimension);
    limits.max_image_height = Some(config.max_dimension);
    limits.max_alloc = Some(config.max_alloc_bytes);
    reader.limits(limits);

    let img = reader.decode()?;
    let (w, h) = img.dimensions();
    let pixels = u64::from(w) * u64::from(h);

    if pixels > config.max_image_pixels {
        return Err(PreviewError::ImageTooLarge {
            width: w,
            height: h,
            pixels,
            max_pixels: config.max_image_pixels,
        });
    }

    Ok(img)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, PreviewError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    if width == 0 || height == 0 {
        return Err(PreviewError::JpegEncode {
            width,
            height,
            reason: "zero dimension".into(),
        });
    }

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| PreviewError::JpegEncode {
            width,
            height,
            reason: e.to_string(),
        })?;

    Ok(buffer)
}
