//! Binary-to-text codec for uploaded images.

use crate::models::{EncodedImage, ImageBlob};
use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

/// Media type used when neither the declaration nor the bytes identify one.
pub const FALLBACK_MIME: &str = "image/png";

/// Encode a blob as standard base64, resolving its media type.
pub fn encode(blob: &ImageBlob) -> Result<EncodedImage> {
    if blob.bytes.is_empty() {
        return Err(Error::Codec("image blob is empty".to_string()));
    }

    let mime_type = detect_media_type(blob);
    let data = base64::engine::general_purpose::STANDARD.encode(&blob.bytes);

    tracing::debug!(
        "Encoded {} byte image as {} ({} base64 chars)",
        blob.bytes.len(),
        mime_type,
        data.len()
    );

    Ok(EncodedImage::new(data, mime_type))
}

pub fn decode(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| Error::Codec(format!("Failed to decode base64 image: {}", e)))
}

/// Prefer a declared `image/*` type, then sniff the bytes, then fall back.
pub fn detect_media_type(blob: &ImageBlob) -> String {
    if let Some(declared) = blob.declared_type.as_deref().and_then(normalize_declared) {
        return declared;
    }
    sniff_image_mime(&blob.bytes).to_string()
}

fn normalize_declared(declared: &str) -> Option<String> {
    let essence = declared.split(';').next()?.trim().to_ascii_lowercase();
    match essence.strip_prefix("image/") {
        Some(subtype) if !subtype.is_empty() && subtype != "*" => Some(essence),
        _ => None,
    }
}

pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_MIME
            );
            FALLBACK_MIME
        }
    }
}

/// Read an upload from disk, declaring its type from the file extension.
pub async fn read_blob(path: &Path) -> Result<ImageBlob> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Codec(format!("Failed to read {}: {}", path.display(), e)))?;

    let declared_type = path
        .extension()
        .and_then(image::ImageFormat::from_extension)
        .map(|format| format.to_mime_type().to_string());

    Ok(ImageBlob::new(bytes, declared_type))
}
