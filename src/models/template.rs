// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template data structures.
//!
//! A template is a named set of relative rectangles that can be reapplied
//! to any image regardless of its pixel dimensions.

use super::rectangle::{ImageSize, Rectangle, RelativeRectangle};
use serde::{Deserialize, Serialize};

/// Image dimensions recorded alongside a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginalImageSize {
    pub width: u32,
    pub height: u32,
}

/// Named, resolution-independent rectangle set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub rectangles: Vec<RelativeRectangle>,
    pub original_image_size: OriginalImageSize,
}

impl Template {
    /// Build a template from pixel-space rectangles, generating a fresh id.
    pub fn from_rectangles(name: String, rectangles: &[Rectangle], image: ImageSize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            rectangles: rectangles.iter().map(|r| r.to_relative(image)).collect(),
            original_image_size: OriginalImageSize {
                width: image.width as u32,
                height: image.height as u32,
            },
        }
    }

    /// Project every stored rectangle onto an image of the given size.
    pub fn project(&self, image: ImageSize) -> Vec<Rectangle> {
        self.rectangles.iter().map(|r| r.to_absolute(image)).collect()
    }
}

/// The in-memory template list mirrored from the persistence gateway.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale, e.g. after the startup fetch.
    pub fn replace_all(&mut self, templates: Vec<Template>) {
        self.templates = templates;
    }

    /// Append a template that has been persisted. Duplicate names are kept.
    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    /// Remove the template with the given id, returning whether one existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        self.templates.len() != before
    }

    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
