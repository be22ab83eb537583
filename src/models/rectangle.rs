// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle data structures.
//!
//! This module defines the image-space rectangles the engine edits and
//! their resolution-independent projection used by templates.

use serde::{Deserialize, Serialize};

/// A 2D point. Image-space or screen-space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Pixel dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }
}

/// A rotated rectangle in image pixel coordinates.
///
/// `x`/`y` is the top-left corner before rotation. Rotation is in degrees
/// about the center and is never wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Rectangle {
    /// Create an unrotated rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color: color.into(),
            rotation: 0.0,
            name: None,
        }
    }

    /// Center of the unrotated box, which is also the rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Flip negative extents so that `width >= 0` and `height >= 0`,
    /// keeping the covered region unchanged.
    pub fn normalize(&mut self) {
        if self.width < 0.0 {
            self.x += self.width;
            self.width = self.width.abs();
        }
        if self.height < 0.0 {
            self.y += self.height;
            self.height = self.height.abs();
        }
    }

    /// Label shown in lists: the user name, or a positional default.
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Rectangle {}", index + 1),
        }
    }

    /// Project into ratios of the given image size.
    pub fn to_relative(&self, image: ImageSize) -> RelativeRectangle {
        RelativeRectangle {
            x_percent: self.x / image.width,
            y_percent: self.y / image.height,
            width_percent: self.width / image.width,
            height_percent: self.height / image.height,
            color: self.color.clone(),
            rotation: self.rotation,
        }
    }
}

/// Persisted, resolution-independent form of a [`Rectangle`].
///
/// Horizontal values are fractions of the image width, vertical values of
/// the image height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeRectangle {
    pub x_percent: f64,
    pub y_percent: f64,
    pub width_percent: f64,
    pub height_percent: f64,
    pub color: String,
    pub rotation: f64,
}

impl RelativeRectangle {
    /// Re-project onto an image of the given size.
    pub fn to_absolute(&self, image: ImageSize) -> Rectangle {
        Rectangle {
            x: self.x_percent * image.width,
            y: self.y_percent * image.height,
            width: self.width_percent * image.width,
            height: self.height_percent * image.height,
            color: self.color.clone(),
            rotation: self.rotation,
            name: None,
        }
    }
}
