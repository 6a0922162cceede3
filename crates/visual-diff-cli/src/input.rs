//! Decoding of before/after images from paths or data URIs.

use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::error::{CliError, CliResult};

/// Load an image from a file path or a `data:<mime>;base64,<payload>` URI.
pub fn load_image(source: &str) -> CliResult<DynamicImage> {
    if let Some(rest) = source.strip_prefix("data:") {
        return load_from_data_uri(rest);
    }
    load_from_file(source)
}

/// Load an image file, checking the extension first.
pub fn load_from_file(path: &str) -> CliResult<DynamicImage> {
    if !is_supported_format(path) {
        return Err(CliError::UnsupportedFormat(path.to_string()));
    }
    let img = image::open(path)?;
    tracing::debug!("Loaded {path} ({}x{})", img.width(), img.height());
    Ok(img)
}

fn load_from_data_uri(rest: &str) -> CliResult<DynamicImage> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CliError::InvalidInput("data URI without payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CliError::InvalidInput("data URI must be base64-encoded".to_string()))?;
    load_from_base64(payload, mime)
}

/// Decode base64 image data, using `mime` as a format hint when recognized.
pub fn load_from_base64(data: &str, mime: &str) -> CliResult<DynamicImage> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| CliError::InvalidInput(format!("Invalid base64: {e}")))?;

    let format = match mime {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/webp" => Some(ImageFormat::WebP),
        "image/gif" => Some(ImageFormat::Gif),
        "image/bmp" => Some(ImageFormat::Bmp),
        _ => None,
    };

    let img = if let Some(fmt) = format {
        image::load_from_memory_with_format(&bytes, fmt)?
    } else {
        image::load_from_memory(&bytes)?
    };
    Ok(img)
}

/// Check if a file path points to a supported image format.
pub fn is_supported_format(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    matches!(
        ext.as_str(),
        "png" | "jpg" | "jpeg" | "webp" | "gif" | "bmp" | "tiff" | "tif"
    )
}
