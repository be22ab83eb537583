// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport transform between screen and image space.
//!
//! Screen coordinates are relative to the canvas' top-left corner. The pan
//! offset is stored in image-space units, so the display transform is
//! `screen = (image + offset) * scale`.

use crate::config::EngineConfig;
use crate::models::rectangle::Point;

/// Pan offset and zoom factor of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Convert a canvas-relative screen position to image space.
    pub fn screen_to_image(&self, screen: Point) -> Point {
        Point::new(screen.x / self.scale - self.x, screen.y / self.scale - self.y)
    }

    /// Convert an image-space position to canvas-relative screen space.
    pub fn image_to_screen(&self, image: Point) -> Point {
        Point::new((image.x + self.x) * self.scale, (image.y + self.y) * self.scale)
    }

    /// Pan by a screen-space pointer delta.
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        self.x += delta_x / self.scale;
        self.y += delta_y / self.scale;
    }

    /// Zoom by a wheel delta, keeping the image point under `anchor` fixed.
    pub fn zoom(&mut self, delta_wheel: f64, anchor: Point, config: &EngineConfig) {
        let before = self.screen_to_image(anchor);
        let scale = (self.scale * (1.0 - delta_wheel * config.wheel_sensitivity))
            .clamp(config.min_scale, config.max_scale);
        if !scale.is_finite() {
            return;
        }

        self.scale = scale;
        self.x = anchor.x / scale - before.x;
        self.y = anchor.y / scale - before.y;
    }

    /// Discrete zoom from the toolbar buttons; no anchor is preserved.
    pub fn step_zoom(&mut self, step: f64, config: &EngineConfig) {
        self.scale = (self.scale + step).clamp(config.min_scale, config.max_scale);
    }

    /// Back to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_transform() {
        let vp = Viewport::default();
        assert_eq!(vp.screen_to_image(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_screen_image_inverse() {
        let vp = Viewport { x: 12.5, y: -3.0, scale: 2.5 };
        let p = Point::new(40.0, 70.0);
        let back = vp.image_to_screen(vp.screen_to_image(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_pan_is_scaled_to_image_units() {
        let mut vp = Viewport { x: 0.0, y: 0.0, scale: 2.0 };
        vp.pan(10.0, -4.0);
        assert_eq!((vp.x, vp.y), (5.0, -2.0));
    }

    #[test]
    fn test_zoom_clamps_scale() {
        let config = EngineConfig::default();
        let mut vp = Viewport::default();
        vp.zoom(-1.0e6, Point::new(0.0, 0.0), &config);
        assert_eq!(vp.scale, config.max_scale);
        vp.zoom(1.0e6, Point::new(0.0, 0.0), &config);
        assert_eq!(vp.scale, config.min_scale);
    }

    #[test]
    fn test_wheel_up_zooms_in() {
        let config = EngineConfig::default();
        let mut vp = Viewport::default();
        vp.zoom(-100.0, Point::new(50.0, 50.0), &config);
        assert!((vp.scale - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_step_zoom() {
        let config = EngineConfig::default();
        let mut vp = Viewport::default();
        vp.step_zoom(config.zoom_step, &config);
        assert!((vp.scale - 1.01).abs() < 1e-9);
        vp.step_zoom(-100.0, &config);
        assert_eq!(vp.scale, config.min_scale);
    }

    proptest! {
        /// Property: the image point under the anchor does not move when zooming.
        #[test]
        fn prop_zoom_keeps_anchor(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            scale in 0.1f64..10.0,
            delta in -500.0f64..500.0,
            ax in 0.0f64..2000.0,
            ay in 0.0f64..2000.0,
        ) {
            let config = EngineConfig::default();
            let mut vp = Viewport { x, y, scale };
            let anchor = Point::new(ax, ay);
            let before = vp.screen_to_image(anchor);
            vp.zoom(delta, anchor, &config);
            let after = vp.screen_to_image(anchor);

            prop_assert!(vp.scale >= config.min_scale && vp.scale <= config.max_scale);
            prop_assert!((before.x - after.x).abs() < 1e-6);
            prop_assert!((before.y - after.y).abs() < 1e-6);
        }
    }
}
