//! Image intake: validates an uploaded MRI scan and prepares its preview.

use crate::{IntakeError, config::UiConfig};
use base64::Engine;
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::{io::Cursor, path::Path};
use tracing::debug;

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// The image currently held by a session. Replaced wholesale on each upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...` URI of the downscaled RGB preview.
    pub preview: String,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Checks and decodes an uploaded file. The original bytes are kept untouched
/// for transmission; only the preview is re-encoded.
pub fn accept_upload(
    filename: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
    ui: &UiConfig,
) -> Result<UploadedImage, IntakeError> {
    if !is_accepted_type(filename, content_type) {
        return Err(IntakeError::UnsupportedType {
            filename: filename.to_string(),
        });
    }
    if bytes.is_empty() {
        return Err(IntakeError::Empty {
            filename: filename.to_string(),
        });
    }
    if bytes.len() > ui.max_upload_bytes {
        return Err(IntakeError::TooLarge {
            size: bytes.len(),
            limit: ui.max_upload_bytes,
        });
    }

    let decoded = image::load_from_memory(&bytes).map_err(|e| IntakeError::Decode {
        filename: filename.to_string(),
        detail: e.to_string(),
    })?;
    let (width, height) = (decoded.width(), decoded.height());
    let preview = render_preview(decoded, ui.preview_width).map_err(|detail| {
        IntakeError::Decode {
            filename: filename.to_string(),
            detail,
        }
    })?;

    debug!(
        "Accepted upload {} ({} bytes, {}x{})",
        filename,
        bytes.len(),
        width,
        height
    );

    Ok(UploadedImage {
        filename: filename.to_string(),
        content_type: content_type.unwrap_or("application/octet-stream").to_string(),
        bytes,
        width,
        height,
        preview,
    })
}

fn is_accepted_type(filename: &str, content_type: Option<&str>) -> bool {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => content_type
            .map(|ct| ACCEPTED_MIME_TYPES.contains(&ct.to_ascii_lowercase().as_str()))
            .unwrap_or(false),
    }
}

fn render_preview(img: DynamicImage, max_width: u32) -> Result<String, String> {
    let mut rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    if rgb.width() > max_width {
        rgb = rgb.resize(max_width, u32::MAX, FilterType::Triangle);
    }

    let mut png = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| format!("Failed to encode preview: {}", e))?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{}", b64))
}
