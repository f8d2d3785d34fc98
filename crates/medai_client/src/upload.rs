//! Image files selected for upload.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not an image file", .0.display())]
    NotAnImage(PathBuf),
}

impl ImageUpload {
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let mime = mime_for_path(path).ok_or_else(|| UploadError::NotAnImage(path.to_path_buf()))?;
        let bytes = std::fs::read(path).map_err(|e| UploadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            file_name,
            mime: mime.to_string(),
            bytes,
        })
    }

    pub fn from_bytes(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Guess an `image/*` MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// File extension for an `image/*` MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}
