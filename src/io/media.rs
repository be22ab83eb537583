// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes image files into RGBA pixels suitable for an egui texture and
//! reports their pixel dimensions, which the engine uses as the template
//! scale reference.

use crate::models::rectangle::ImageSize;
use anyhow::{Context, Result};
use std::path::Path;

/// File extensions offered in the image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

/// A decoded image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(from_dynamic(img))
}

/// Decode an image from encoded bytes.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("decoding image bytes")?;
    Ok(from_dynamic(img))
}

fn from_dynamic(img: image::DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    }
}
