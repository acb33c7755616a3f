//! PNG output for decoded images

use anyhow::{Context, Result};
use std::path::Path;
use wipeout_formats::Image;

/// Write an RGBA image as PNG
pub fn write_png(image: &Image, path: &Path) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(image.width, image.height, image.as_bytes().to_vec())
        .context("Pixel buffer does not match image dimensions")?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG: {}", path.display()))
}

/// Decode a TIM file and save it as PNG
pub fn convert_image(input: &Path, output: &Path) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read image: {}", input.display()))?;
    let image = wipeout_formats::decode_image(&data)
        .with_context(|| format!("Failed to decode image: {}", input.display()))?;
    tracing::debug!("{}x{} pixels", image.width, image.height);
    write_png(&image, output)
}
