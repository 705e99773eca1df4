//! Writing result images to disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use zeroxin_core::{ImagePayload, DOWNLOAD_FILE_NAME};

/// Write `image` to `path`, creating parent directories.
pub fn write_image(image: &ImagePayload, path: &Path) -> Result<()> {
    let bytes = image.decode().context("decoding result image")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
    Ok(())
}

/// Save under the fixed download name inside `dir`.
pub fn save_download(image: &ImagePayload, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(DOWNLOAD_FILE_NAME);
    write_image(image, &path)?;
    Ok(path)
}
