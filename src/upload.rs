//! Reading source photos from disk and writing results back

use crate::error::{ChronoSnapError, Result};
use chronosnap_common::codec;
use chronosnap_common::{Download, EncodedImage, Error};
use std::path::Path;

/// Loads an image file unchanged, typed by its extension.
pub fn load_image(path: &Path) -> Result<EncodedImage> {
    if !path.is_file() {
        return Err(ChronoSnapError::FileNotFound(path.display().to_string()));
    }

    let mime_type = codec::mime_type_for_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        Error::UnsupportedMimeType(ext)
    })?;

    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), mime_type, bytes = bytes.len(), "loaded image");
    Ok(codec::encode_upload(mime_type, &bytes)?)
}

/// Writes a download's decoded bytes to `output`.
pub fn save_download(download: &Download, output: &Path) -> Result<()> {
    let payload = download.image.split()?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, payload.bytes)?;
    Ok(())
}
