//! Image preparation for the panel
//!
//! The LCD only accepts raw RGBA bytes already sized to its reported
//! dimensions; this module decodes whatever the user points at, resizes
//! it to the capability block, and flattens it to the wire pixel layout.

use anyhow::{Context, Result, ensure};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use protocol::{BYTES_PER_PIXEL, LcdInfo};
use std::path::Path;
use tracing::debug;

/// Load an image file and convert it to the panel's pixel layout.
pub fn load_for_panel(path: &Path, info: &LcdInfo) -> Result<Vec<u8>> {
    let img = image::open(path)
        .with_context(|| format!("failed to open image: {}", path.display()))?;
    debug!(
        "loaded {}x{} image from {}",
        img.width(),
        img.height(),
        path.display()
    );
    convert(img, info)
}

/// Resize to the reported LCD dimensions and flatten to RGBA8888.
fn convert(img: DynamicImage, info: &LcdInfo) -> Result<Vec<u8>> {
    ensure!(
        info.is_usable(),
        "LCD reported unusable dimensions {}x{}",
        info.width,
        info.height
    );

    let resized = img.resize_exact(info.width as u32, info.height as u32, FilterType::Triangle);
    let pixels = resized.to_rgba8().into_raw();
    debug_assert_eq!(
        pixels.len(),
        info.width as usize * info.height as usize * BYTES_PER_PIXEL
    );

    Ok(pixels)
}
