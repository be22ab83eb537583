// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle export.
//!
//! Writes the working rectangle set, in image pixel coordinates, to YAML or
//! JSON for use outside the application.

use crate::models::rectangle::Rectangle;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exported document: the image the rectangles were drawn on plus the
/// rectangles themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub image_width: u32,
    pub image_height: u32,
    pub rectangles: Vec<Rectangle>,
}

impl ExportData {
    pub fn new(image_width: u32, image_height: u32, rectangles: &[Rectangle]) -> Self {
        Self {
            image_width,
            image_height,
            rectangles: rectangles.to_vec(),
        }
    }
}

/// Export to YAML format.
pub fn export_yaml(data: &ExportData, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export to JSON format.
pub fn export_json(data: &ExportData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export choosing the format from the file extension.
pub fn export_by_extension(data: &ExportData, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}
