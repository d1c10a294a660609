//! Encoding captured pixels to PNG files and in-memory buffers.

use std::path::Path;

use image::{ImageBuffer, Rgba};

/// Error type for capture encoding operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid image data")]
    InvalidImageData,
}

/// Saves tightly-packed RGBA pixel data to an image file.
///
/// Supports `.png`, `.jpg`, and `.jpeg` extensions. wgpu uses a top-left
/// origin so no vertical flip is needed.
pub fn save_image(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), CaptureError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, data.to_vec())
            .ok_or(CaptureError::InvalidImageData)?;

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(CaptureError::UnsupportedFormat(extension));
        }
    }

    Ok(())
}

/// Encodes tightly-packed RGBA pixel data as PNG bytes in memory.
pub fn encode_png(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, data.to_vec())
            .ok_or(CaptureError::InvalidImageData)?;

    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_png_produces_valid_signature() {
        let pixels = vec![255u8; 4 * 4 * 4];
        let png = encode_png(&pixels, 4, 4).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn encode_png_rejects_short_data() {
        let pixels = vec![0u8; 8];
        assert!(matches!(
            encode_png(&pixels, 4, 4),
            Err(CaptureError::InvalidImageData)
        ));
    }

    #[test]
    fn save_image_rejects_unknown_extension() {
        let pixels = vec![0u8; 4];
        let err = save_image("out.bmp", &pixels, 1, 1).unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedFormat(ext) if ext == "bmp"));
    }
}
