//! Image codec helper
//!
//! Converts camera frames and uploaded files into self-describing data URLs
//! (`data:<mime>;base64,<payload>`) and splits them back into MIME type and
//! raw bytes for transmission.

use std::fmt;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// JPEG quality used for camera frames (0.9 on the browser's 0..1 scale)
pub const JPEG_QUALITY: u8 = 90;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A validated `data:image/*;base64,...` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedImage(String);

/// The two halves of an [`EncodedImage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Raw RGBA8 pixels sampled from a video frame
#[derive(Debug, Clone)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl EncodedImage {
    /// Parses a data URL, checking structure and MIME type.
    ///
    /// The base64 payload itself is only decoded by [`EncodedImage::split`].
    pub fn parse(data_url: &str) -> Result<Self> {
        let (mime_type, payload) = split_data_url(data_url)?;
        if !is_image_mime(mime_type) {
            return Err(Error::UnsupportedMimeType(mime_type.to_string()));
        }
        if payload.is_empty() {
            return Err(Error::Format("empty base64 payload".into()));
        }
        Ok(Self(data_url.to_string()))
    }

    /// Builds a data URL from a MIME type and raw bytes.
    pub fn from_parts(mime_type: &str, bytes: &[u8]) -> Result<Self> {
        let mime_type = mime_type.trim();
        if !is_image_mime(mime_type) {
            return Err(Error::UnsupportedMimeType(mime_type.to_string()));
        }
        if bytes.is_empty() {
            return Err(Error::Format("empty image data".into()));
        }
        Ok(Self(format!(
            "{DATA_PREFIX}{mime_type}{BASE64_MARKER}{}",
            BASE64.encode(bytes)
        )))
    }

    pub fn mime_type(&self) -> &str {
        // validated on construction
        split_data_url(&self.0).map(|(mime, _)| mime).unwrap_or_default()
    }

    /// Base64 payload without the `data:` header, as sent on the wire
    pub fn base64_data(&self) -> &str {
        split_data_url(&self.0).map(|(_, data)| data).unwrap_or_default()
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// Decodes the payload into MIME type and raw bytes.
    pub fn split(&self) -> Result<ImagePayload> {
        split_payload(&self.0)
    }
}

impl fmt::Display for EncodedImage {
    // Payloads can be megabytes; never print them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} base64 chars)", self.mime_type(), self.base64_data().len())
    }
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Capture(format!(
                "frame has zero dimensions ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::Capture(format!(
                "frame buffer is {} bytes, expected {expected}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }
}

/// Splits a data URL into MIME type and decoded bytes.
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." formatted string
///
/// # Returns
/// The MIME type and raw bytes, or `Error::Format` when the string is not a
/// base64 data URL.
pub fn split_payload(data_url: &str) -> Result<ImagePayload> {
    let (mime_type, data) = split_data_url(data_url)?;
    let bytes = BASE64
        .decode(data.as_bytes())
        .map_err(|e| Error::Format(format!("invalid base64 payload: {e}")))?;
    Ok(ImagePayload {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// Encodes a camera frame as JPEG at [`JPEG_QUALITY`].
pub fn encode_frame(frame: &RgbaFrame) -> Result<EncodedImage> {
    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| Error::Capture("frame buffer does not match its dimensions".into()))?;
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&rgb)?;
    EncodedImage::from_parts("image/jpeg", &bytes)
}

/// Wraps uploaded file bytes without touching them.
pub fn encode_upload(mime_type: &str, bytes: &[u8]) -> Result<EncodedImage> {
    EncodedImage::from_parts(mime_type, bytes)
}

/// Re-encodes a payload as PNG. PNG input passes through unchanged.
pub fn to_png(payload: &ImagePayload) -> Result<EncodedImage> {
    if payload.mime_type.eq_ignore_ascii_case("image/png") {
        return EncodedImage::from_parts("image/png", &payload.bytes);
    }

    let decoded = image::load_from_memory(&payload.bytes)?;
    let mut bytes = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    EncodedImage::from_parts("image/png", &bytes)
}

/// MIME type for a file name, judged by its extension.
pub fn mime_type_for_path(path: &std::path::Path) -> Option<&'static str> {
    ImageFormat::from_path(path).ok().map(|format| format.to_mime_type())
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && mime_type.len() > 6
}

fn split_data_url(data_url: &str) -> Result<(&str, &str)> {
    let rest = data_url
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| Error::Format("missing `data:` prefix".into()))?;
    let marker = rest
        .find(BASE64_MARKER)
        .ok_or_else(|| Error::Format("missing `;base64,` marker".into()))?;
    let mime_type = &rest[..marker];
    if mime_type.is_empty() {
        return Err(Error::Format("missing MIME type".into()));
    }
    Ok((mime_type, &rest[marker + BASE64_MARKER.len()..]))
}
