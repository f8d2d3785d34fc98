//! Result images: decoding `data:<mime>;base64,...` URLs and writing them to disk.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::upload::extension_for_mime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URL. Returns `None` for plain URLs or malformed payloads.
pub fn decode_data_url(s: &str) -> Option<DataImage> {
    let rest = s.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(payload).ok()?;
    Some(DataImage {
        mime: if mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime.to_string()
        },
        bytes,
    })
}

/// One-line description of an image source for terminal output.
pub fn summarize(src: &str) -> String {
    if src.starts_with("data:") {
        match decode_data_url(src) {
            Some(img) => format!("{} image, {} bytes", img.mime, img.bytes.len()),
            None => "undecodable data URL".to_string(),
        }
    } else {
        src.to_string()
    }
}

/// Write up to `limit` decodable data-URL images into `dir` as `result-NN.<ext>`.
/// Plain URLs are skipped. Returns the written paths in order.
pub fn save_images(images: &[String], dir: &Path, limit: usize) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (i, src) in images.iter().filter(|s| !s.is_empty()).take(limit).enumerate() {
        let Some(img) = decode_data_url(src) else {
            tracing::debug!(index = i + 1, "skipping non-data image");
            continue;
        };
        let path = dir.join(format!("result-{:02}.{}", i + 1, extension_for_mime(&img.mime)));
        std::fs::write(&path, &img.bytes)?;
        written.push(path);
    }
    Ok(written)
}
