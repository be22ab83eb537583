// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction engine.
//!
//! Owns the working set of rectangles, the single selection, the viewport
//! and the pointer gesture in progress. Hosts feed it pointer, wheel and key
//! events; every handler is synchronous and events that match no transition
//! leave the state untouched.

pub mod viewport;

use crate::config::EngineConfig;
use crate::models::rectangle::{ImageSize, Point, Rectangle};
use crate::models::template::Template;
use crate::util::geometry::{self, CursorAffordance, ResizeHandle};
use viewport::Viewport;

/// Active tool in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Rectangle,
    /// Opens the image picker; inert on the canvas.
    Image,
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Canvas,
    ResizeHandle(ResizeHandle),
    RotateHandle,
}

impl PointerTarget {
    /// Cursor to show while hovering this target.
    pub fn cursor(&self) -> Option<CursorAffordance> {
        match self {
            PointerTarget::Canvas => None,
            PointerTarget::ResizeHandle(handle) => Some(handle.cursor()),
            PointerTarget::RotateHandle => Some(CursorAffordance::Grab),
        }
    }
}

/// Keys the engine reacts to while it holds input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Gesture state. `anchor` is the image-space pointer position the next
/// delta is measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    /// The anchor stays at the pointer-down position for the whole gesture.
    Drawing { anchor: Point },
    Dragging { anchor: Point },
    Resizing { handle: ResizeHandle, anchor: Point },
    Rotating { anchor: Point },
}

/// Everything a view layer needs to draw one rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub color: String,
    pub is_selected: bool,
}

impl RenderItem {
    /// Rotated corners in image space, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        let center = Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0);
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
        .map(|p| geometry::rotate_point(p, center, self.rotation))
    }
}

/// Handle positions of the selected rectangle, image space, rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleSet {
    pub resize: Vec<(ResizeHandle, Point)>,
    pub rotate: Point,
}

pub struct Engine {
    config: EngineConfig,
    rectangles: Vec<Rectangle>,
    selected: Option<usize>,
    tool: Tool,
    interaction: Interaction,
    /// Last screen position while panning.
    pan_from: Option<Point>,
    /// Screen position of the last gesture event.
    last_pointer: Option<Point>,
    viewport: Viewport,
    image: Option<ImageSize>,
    focused: bool,
    unsaved_changes: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            rectangles: Vec::new(),
            selected: None,
            tool: Tool::Select,
            interaction: Interaction::Idle,
            pan_from: None,
            last_pointer: None,
            viewport: Viewport::default(),
            image: None,
            focused: false,
            unsaved_changes: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_panning(&self) -> bool {
        self.pan_from.is_some()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn image(&self) -> Option<ImageSize> {
        self.image
    }

    /// Capability check for template save/load.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn set_image(&mut self, image: ImageSize) {
        self.image = Some(image);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Clear the unsaved flag once a template save has completed.
    pub fn mark_saved(&mut self) {
        self.unsaved_changes = false;
    }

    /// Keys are only delivered while the canvas holds input focus.
    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle && self.pan_from.is_none()
    }

    fn selected_rect(&self) -> Option<&Rectangle> {
        self.selected.and_then(|i| self.rectangles.get(i))
    }

    fn selected_mut(&mut self) -> Option<&mut Rectangle> {
        let index = self.selected?;
        self.rectangles.get_mut(index)
    }

    /// Screen radius converted to image units at the current scale.
    fn to_image_units(&self, screen: f64) -> f64 {
        screen / self.viewport.scale
    }

    /// Classify a screen position against the selected rectangle's handles.
    pub fn target_at(&self, screen: Point) -> PointerTarget {
        let Some(handles) = self.handle_positions() else {
            return PointerTarget::Canvas;
        };
        let radius = self.config.handle_radius;
        let near = |p: Point| {
            let s = self.viewport.image_to_screen(p);
            (s.x - screen.x).hypot(s.y - screen.y) <= radius
        };

        if near(handles.rotate) {
            return PointerTarget::RotateHandle;
        }
        handles
            .resize
            .iter()
            .find(|(_, p)| near(*p))
            .map(|(h, _)| PointerTarget::ResizeHandle(*h))
            .unwrap_or(PointerTarget::Canvas)
    }

    /// Begin a gesture. Returns `true` when a transition was taken.
    pub fn pointer_down(&mut self, screen: Point, target: PointerTarget) -> bool {
        // The Image tool only opens the file picker in the host.
        if self.image.is_none() || !self.is_idle() || self.tool == Tool::Image {
            return false;
        }
        self.last_pointer = Some(screen);
        let anchor = self.viewport.screen_to_image(screen);

        match target {
            PointerTarget::ResizeHandle(handle) => {
                if self.selected_rect().is_none() {
                    return false;
                }
                log::debug!("Resize start ({})", handle.as_str());
                self.interaction = Interaction::Resizing { handle, anchor };
                true
            }
            PointerTarget::RotateHandle => {
                if self.selected_rect().is_none() {
                    return false;
                }
                log::debug!("Rotate start");
                self.interaction = Interaction::Rotating { anchor };
                true
            }
            PointerTarget::Canvas => match self.tool {
                Tool::Rectangle => {
                    let rect = Rectangle::new(
                        anchor.x,
                        anchor.y,
                        0.0,
                        0.0,
                        self.config.default_color.clone(),
                    );
                    self.rectangles.push(rect);
                    self.selected = Some(self.rectangles.len() - 1);
                    self.interaction = Interaction::Drawing { anchor };
                    self.unsaved_changes = true;
                    log::debug!("Draw start at ({:.1}, {:.1})", anchor.x, anchor.y);
                    true
                }
                Tool::Select => {
                    let hit = self
                        .rectangles
                        .iter()
                        .position(|r| geometry::is_point_in_rotated_rect(anchor, r));
                    match hit {
                        Some(index) => {
                            self.selected = Some(index);
                            self.interaction = Interaction::Dragging { anchor };
                            log::debug!("Drag start on rectangle {}", index);
                        }
                        None => {
                            self.selected = None;
                            self.pan_from = Some(screen);
                        }
                    }
                    true
                }
                Tool::Image => false,
            },
        }
    }

    /// Advance the active gesture, one rectangle commit per call.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        // A repeated position commits nothing.
        if self.last_pointer == Some(screen) {
            return false;
        }
        self.last_pointer = Some(screen);

        if let Some(last) = self.pan_from {
            self.viewport.pan(screen.x - last.x, screen.y - last.y);
            self.pan_from = Some(screen);
            return true;
        }

        let current = self.viewport.screen_to_image(screen);
        let damping = self.config.rotation_damping;
        let interaction = self.interaction;
        let Some(rect) = self.selected_mut() else {
            return false;
        };

        let next = match interaction {
            Interaction::Idle => return false,
            Interaction::Drawing { anchor } => {
                rect.x = anchor.x.min(current.x);
                rect.y = anchor.y.min(current.y);
                rect.width = (current.x - anchor.x).abs();
                rect.height = (current.y - anchor.y).abs();
                interaction
            }
            Interaction::Dragging { anchor } => {
                rect.x += current.x - anchor.x;
                rect.y += current.y - anchor.y;
                Interaction::Dragging { anchor: current }
            }
            Interaction::Resizing { handle, anchor } => {
                let delta = current.sub(anchor);
                let (resized, active) = geometry::apply_resize(rect, handle, delta.x, delta.y);
                *rect = resized;
                Interaction::Resizing {
                    handle: active,
                    anchor: current,
                }
            }
            Interaction::Rotating { anchor } => {
                let delta = geometry::rotation_delta(rect.center(), anchor, current, damping);
                rect.rotation += delta;
                Interaction::Rotating { anchor: current }
            }
        };

        self.interaction = next;
        self.unsaved_changes = true;
        true
    }

    /// End whatever gesture is active. Safe to call at any time.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = !self.is_idle();
        if was_active {
            log::debug!("Gesture end ({:?})", self.interaction);
        }
        if let Some(rect) = self.selected_mut() {
            rect.normalize();
        }
        self.interaction = Interaction::Idle;
        self.pan_from = None;
        self.last_pointer = None;
        was_active
    }

    /// Wheel zoom around the pointer. Ignored mid-gesture.
    pub fn wheel(&mut self, delta: f64, anchor: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.viewport.zoom(delta, anchor, &self.config);
        true
    }

    pub fn zoom_in(&mut self) {
        self.viewport.step_zoom(self.config.zoom_step, &self.config);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.step_zoom(-self.config.zoom_step, &self.config);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Handle a key press routed by the host. Returns `true` when consumed.
    pub fn key_down(&mut self, key: Key) -> bool {
        if !self.focused || !self.is_idle() {
            return false;
        }
        let Some(index) = self.selected.filter(|i| *i < self.rectangles.len()) else {
            return false;
        };

        let step = self.config.nudge_step;
        let (dx, dy) = match key {
            Key::Backspace => {
                self.delete(index);
                return true;
            }
            Key::Enter => {
                self.selected = None;
                return true;
            }
            Key::ArrowUp => (0.0, -step),
            Key::ArrowDown => (0.0, step),
            Key::ArrowLeft => (-step, 0.0),
            Key::ArrowRight => (step, 0.0),
        };
        let rect = &mut self.rectangles[index];
        rect.x += dx;
        rect.y += dy;
        self.unsaved_changes = true;
        true
    }

    /// Select a rectangle from outside the canvas, e.g. the side panel.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.rectangles.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove a rectangle. The selection is cleared if it pointed at the
    /// removed rectangle and shifted if it pointed past it.
    pub fn delete(&mut self, index: usize) -> bool {
        if index >= self.rectangles.len() {
            return false;
        }
        self.rectangles.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.unsaved_changes = true;
        log::info!("Deleted rectangle, total: {}", self.rectangles.len());
        true
    }

    pub fn rename(&mut self, index: usize, name: Option<String>) -> bool {
        let Some(rect) = self.rectangles.get_mut(index) else {
            return false;
        };
        rect.name = name.filter(|n| !n.trim().is_empty());
        self.unsaved_changes = true;
        true
    }

    /// Project the working set into a new template. `None` without an image
    /// or with a blank name.
    pub fn capture_template(&self, name: &str) -> Option<Template> {
        let image = self.image?;
        let name = name.trim();
        if name.is_empty() {
            log::warn!("Refusing to save a template without a name");
            return None;
        }
        Some(Template::from_rectangles(name.to_string(), &self.rectangles, image))
    }

    /// Replace the working set with a template projected onto the current
    /// image. No-op without an image.
    pub fn apply_template(&mut self, template: &Template) -> bool {
        let Some(image) = self.image else {
            return false;
        };
        self.rectangles = template.project(image);
        self.selected = None;
        self.interaction = Interaction::Idle;
        self.pan_from = None;
        self.last_pointer = None;
        self.unsaved_changes = false;
        log::info!(
            "Applied template '{}' ({} rectangles)",
            template.name,
            self.rectangles.len()
        );
        true
    }

    pub fn render_items(&self) -> Vec<RenderItem> {
        self.rectangles
            .iter()
            .enumerate()
            .map(|(i, r)| RenderItem {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                rotation: r.rotation,
                color: r.color.clone(),
                is_selected: self.selected == Some(i),
            })
            .collect()
    }

    /// Handles of the selected rectangle after rotation.
    pub fn handle_positions(&self) -> Option<HandleSet> {
        let rect = self.selected_rect()?;
        let center = rect.center();
        let resize = ResizeHandle::ALL
            .iter()
            .map(|h| (*h, geometry::rotate_point(h.anchor(rect), center, rect.rotation)))
            .collect();
        let offset = self.to_image_units(self.config.rotate_handle_offset);
        let rotate = geometry::rotate_point(
            geometry::rotate_handle_anchor(rect, offset),
            center,
            rect.rotation,
        );
        Some(HandleSet { resize, rotate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_image(ImageSize::new(200, 100));
        engine
    }

    fn draw(engine: &mut Engine, from: (f64, f64), to: (f64, f64)) {
        engine.set_tool(Tool::Rectangle);
        assert!(engine.pointer_down(Point::new(from.0, from.1), PointerTarget::Canvas));
        engine.pointer_move(Point::new(to.0, to.1));
        engine.pointer_up();
    }

    fn geom(r: &Rectangle) -> (f64, f64, f64, f64) {
        (r.x, r.y, r.width, r.height)
    }

    #[test]
    fn test_draw_scenario() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));

        assert_eq!(engine.rectangles().len(), 1);
        let r = &engine.rectangles()[0];
        assert_eq!(geom(r), (10.0, 10.0, 100.0, 50.0));
        assert_eq!(r.rotation, 0.0);
        assert_eq!(r.color, "#ff0000");
        assert_eq!(engine.selected(), Some(0));
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_draw_backwards_keeps_anchor() {
        let mut engine = engine();
        engine.set_tool(Tool::Rectangle);
        engine.pointer_down(Point::new(100.0, 80.0), PointerTarget::Canvas);
        engine.pointer_move(Point::new(50.0, 90.0));
        engine.pointer_move(Point::new(20.0, 30.0));
        engine.pointer_up();
        assert_eq!(geom(&engine.rectangles()[0]), (20.0, 30.0, 80.0, 50.0));
    }

    #[test]
    fn test_draw_respects_viewport() {
        let mut engine = engine();
        engine.wheel(-100.0, Point::new(0.0, 0.0));
        let scale = engine.viewport().scale;
        draw(&mut engine, (13.0, 13.0), (26.0, 39.0));
        let r = &engine.rectangles()[0];
        assert!((r.x - 13.0 / scale).abs() < 1e-9);
        assert!((r.height - 26.0 / scale).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_draw_is_kept() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (10.0, 10.0));
        assert_eq!(geom(&engine.rectangles()[0]), (10.0, 10.0, 0.0, 0.0));
    }

    #[test]
    fn test_pointer_down_without_image_is_ignored() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_tool(Tool::Rectangle);
        assert!(!engine.pointer_down(Point::new(1.0, 1.0), PointerTarget::Canvas));
        assert!(engine.rectangles().is_empty());
    }

    #[test]
    fn test_drag_is_incremental() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.set_tool(Tool::Select);

        assert!(engine.pointer_down(Point::new(50.0, 30.0), PointerTarget::Canvas));
        assert!(matches!(engine.interaction(), Interaction::Dragging { .. }));
        engine.pointer_move(Point::new(55.0, 35.0));
        engine.pointer_move(Point::new(60.0, 40.0));
        engine.pointer_up();
        assert_eq!(geom(&engine.rectangles()[0]), (20.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn test_resize_se_onto_opposite_corner() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));

        let handle = PointerTarget::ResizeHandle(ResizeHandle::SE);
        assert_eq!(engine.target_at(Point::new(110.0, 60.0)), handle);
        assert!(engine.pointer_down(Point::new(110.0, 60.0), handle));
        engine.pointer_move(Point::new(10.0, 10.0));
        engine.pointer_up();

        let r = &engine.rectangles()[0];
        assert_eq!(geom(r), (10.0, 10.0, 0.0, 0.0));
        assert!(r.width >= 0.0 && r.height >= 0.0);
    }

    #[test]
    fn test_resize_se_past_opposite_corner_keeps_following_pointer() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));

        let handle = PointerTarget::ResizeHandle(ResizeHandle::SE);
        engine.pointer_down(Point::new(110.0, 60.0), handle);
        engine.pointer_move(Point::new(-90.0, -40.0));
        assert_eq!(geom(&engine.rectangles()[0]), (-90.0, -40.0, 100.0, 50.0));

        engine.pointer_move(Point::new(-100.0, -50.0));
        engine.pointer_up();
        assert_eq!(geom(&engine.rectangles()[0]), (-100.0, -50.0, 110.0, 60.0));
    }

    #[test]
    fn test_resize_without_selection_is_noop() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.clear_selection();
        assert!(!engine.pointer_down(
            Point::new(110.0, 60.0),
            PointerTarget::ResizeHandle(ResizeHandle::SE)
        ));
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_image_tool_ignores_handles() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.set_tool(Tool::Image);

        let handle = engine.target_at(Point::new(110.0, 60.0));
        assert_eq!(handle, PointerTarget::ResizeHandle(ResizeHandle::SE));
        assert!(!engine.pointer_down(Point::new(110.0, 60.0), handle));
        assert!(!engine.pointer_down(Point::new(60.0, 35.0), PointerTarget::RotateHandle));
        assert!(!engine.pointer_down(Point::new(50.0, 30.0), PointerTarget::Canvas));
        engine.pointer_move(Point::new(150.0, 90.0));
        engine.pointer_up();

        assert_eq!(engine.interaction(), Interaction::Idle);
        assert!(!engine.is_panning());
        assert_eq!(geom(&engine.rectangles()[0]), (10.0, 10.0, 100.0, 50.0));
        assert_eq!(engine.rectangles()[0].rotation, 0.0);
    }

    #[test]
    fn test_rotate_applies_damped_increments() {
        let mut engine = engine();
        draw(&mut engine, (50.0, 40.0), (150.0, 60.0));
        // Center is (100, 50); start directly above it.
        let target = engine.target_at(Point::new(100.0, 10.0));
        assert_eq!(target, PointerTarget::RotateHandle);
        engine.pointer_down(Point::new(100.0, 10.0), target);
        engine.pointer_move(Point::new(140.0, 50.0));
        engine.pointer_move(Point::new(100.0, 90.0));
        engine.pointer_up();

        let rotation = engine.rectangles()[0].rotation;
        assert!((rotation - 180.0 * 0.91).abs() < 1e-9, "{}", rotation);
    }

    #[test]
    fn test_rotation_is_not_wrapped() {
        let mut engine = engine();
        draw(&mut engine, (50.0, 40.0), (150.0, 60.0));
        engine.pointer_down(Point::new(100.0, 10.0), PointerTarget::RotateHandle);
        let c = (100.0, 50.0);
        for step in 1..=60 {
            let angle = -std::f64::consts::FRAC_PI_2 + step as f64 * 0.2;
            engine.pointer_move(Point::new(c.0 + 40.0 * angle.cos(), c.1 + 40.0 * angle.sin()));
        }
        engine.pointer_up();
        let expected = (60.0 * 0.2f64).to_degrees() * 0.91;
        assert!((engine.rectangles()[0].rotation - expected).abs() < 1e-6);
        assert!(engine.rectangles()[0].rotation > 360.0);
    }

    #[test]
    fn test_click_on_empty_space_pans() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (20.0, 20.0));
        engine.set_tool(Tool::Select);

        assert!(engine.pointer_down(Point::new(150.0, 90.0), PointerTarget::Canvas));
        assert_eq!(engine.selected(), None);
        assert!(engine.is_panning());
        engine.pointer_move(Point::new(160.0, 95.0));
        engine.pointer_up();

        assert!(!engine.is_panning());
        assert_eq!((engine.viewport().x, engine.viewport().y), (10.0, 5.0));
        assert_eq!(geom(&engine.rectangles()[0]), (10.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_hit_test_selects_rotated_rectangle() {
        let mut engine = engine();
        draw(&mut engine, (0.0, 45.0), (100.0, 55.0));
        // Quarter turn of the pointer, damped to about 82 degrees.
        engine.pointer_down(Point::new(50.0, 15.0), PointerTarget::RotateHandle);
        engine.pointer_move(Point::new(85.0, 50.0));
        engine.pointer_up();
        engine.clear_selection();
        engine.set_tool(Tool::Select);

        // Inside the unrotated box but outside the rotated one.
        engine.pointer_down(Point::new(90.0, 50.0), PointerTarget::Canvas);
        assert_eq!(engine.selected(), None);
        engine.pointer_up();

        // Outside the unrotated box but inside the rotated one.
        engine.pointer_down(Point::new(50.0, 20.0), PointerTarget::Canvas);
        assert_eq!(engine.selected(), Some(0));
        engine.pointer_up();
    }

    #[test]
    fn test_wheel_zoom_keeps_anchor_and_ignored_mid_gesture() {
        let mut engine = engine();
        let anchor = Point::new(120.0, 80.0);
        let before = engine.viewport().screen_to_image(anchor);
        assert!(engine.wheel(-50.0, anchor));
        let after = engine.viewport().screen_to_image(anchor);
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

        engine.set_tool(Tool::Rectangle);
        engine.pointer_down(Point::new(5.0, 5.0), PointerTarget::Canvas);
        assert!(!engine.wheel(-50.0, anchor));
    }

    #[test]
    fn test_keys_require_focus() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        assert!(!engine.key_down(Key::Backspace));
        assert_eq!(engine.rectangles().len(), 1);

        engine.set_focus(true);
        assert!(engine.key_down(Key::Backspace));
        assert!(engine.rectangles().is_empty());
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn test_arrow_keys_nudge_and_enter_commits() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.set_focus(true);

        engine.key_down(Key::ArrowRight);
        engine.key_down(Key::ArrowRight);
        engine.key_down(Key::ArrowUp);
        engine.key_down(Key::ArrowDown);
        engine.key_down(Key::ArrowDown);
        engine.key_down(Key::ArrowLeft);
        assert_eq!(geom(&engine.rectangles()[0]), (11.0, 11.0, 100.0, 50.0));

        assert!(engine.key_down(Key::Enter));
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.rectangles().len(), 1);
        assert!(!engine.key_down(Key::ArrowLeft));
    }

    #[test]
    fn test_delete_shifts_selection() {
        let mut engine = engine();
        draw(&mut engine, (0.0, 0.0), (10.0, 10.0));
        draw(&mut engine, (20.0, 0.0), (30.0, 10.0));
        draw(&mut engine, (40.0, 0.0), (50.0, 10.0));
        assert_eq!(engine.selected(), Some(2));

        assert!(engine.delete(0));
        assert_eq!(engine.selected(), Some(1));
        assert!(!engine.delete(5));
        assert!(engine.delete(1));
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn test_moves_after_deleted_selection_are_noops() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.set_tool(Tool::Select);
        engine.pointer_down(Point::new(50.0, 30.0), PointerTarget::Canvas);
        engine.delete(0);
        assert!(!engine.pointer_move(Point::new(70.0, 40.0)));
        assert!(engine.pointer_up());
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_rename() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        assert!(engine.rename(0, Some("door".to_string())));
        assert_eq!(engine.rectangles()[0].name.as_deref(), Some("door"));
        assert!(engine.rename(0, Some("   ".to_string())));
        assert_eq!(engine.rectangles()[0].name, None);
        assert!(!engine.rename(3, None));
    }

    #[test]
    fn test_edits_set_unsaved_flag() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        draw(&mut engine, (20.0, 20.0), (40.0, 40.0));
        engine.set_focus(true);

        engine.mark_saved();
        assert!(!engine.has_unsaved_changes());
        assert!(engine.key_down(Key::ArrowLeft));
        assert!(engine.has_unsaved_changes());

        engine.mark_saved();
        assert!(engine.rename(0, Some("door".to_string())));
        assert!(engine.has_unsaved_changes());

        engine.mark_saved();
        assert!(engine.delete(1));
        assert!(engine.has_unsaved_changes());

        engine.mark_saved();
        assert!(engine.key_down(Key::Enter));
        assert!(!engine.has_unsaved_changes());
        assert!(!engine.delete(7));
        assert!(!engine.has_unsaved_changes());
    }

    #[test]
    fn test_repeated_pointer_position_is_not_an_edit() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        engine.set_tool(Tool::Select);
        engine.mark_saved();

        assert!(engine.pointer_down(Point::new(50.0, 30.0), PointerTarget::Canvas));
        assert!(!engine.pointer_move(Point::new(50.0, 30.0)));
        assert!(!engine.has_unsaved_changes());

        assert!(engine.pointer_move(Point::new(60.0, 30.0)));
        engine.mark_saved();
        assert!(!engine.pointer_move(Point::new(60.0, 30.0)));
        assert!(!engine.has_unsaved_changes());
        engine.pointer_up();
        assert_eq!(geom(&engine.rectangles()[0]), (20.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_template_scenario() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));

        let template = engine.capture_template("A").expect("image is loaded");
        let rel = &template.rectangles[0];
        assert!((rel.x_percent - 0.05).abs() < 1e-12);
        assert!((rel.y_percent - 0.1).abs() < 1e-12);
        assert!((rel.width_percent - 0.5).abs() < 1e-12);
        assert!((rel.height_percent - 0.5).abs() < 1e-12);

        engine.set_image(ImageSize::new(400, 200));
        assert!(engine.apply_template(&template));
        let r = &engine.rectangles()[0];
        assert!((r.x - 20.0).abs() < 1e-9);
        assert!((r.y - 20.0).abs() < 1e-9);
        assert!((r.width - 200.0).abs() < 1e-9);
        assert!((r.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_template_replaces_working_set() {
        let mut engine = engine();
        draw(&mut engine, (10.0, 10.0), (110.0, 60.0));
        let template = engine.capture_template("one").unwrap();
        draw(&mut engine, (0.0, 0.0), (5.0, 5.0));
        draw(&mut engine, (1.0, 1.0), (6.0, 6.0));
        assert!(engine.has_unsaved_changes());

        assert!(engine.apply_template(&template));
        assert_eq!(engine.rectangles().len(), 1);
        assert_eq!(engine.rectangles().to_vec(), template.project(engine.image().unwrap()));
        assert_eq!(engine.selected(), None);
        assert!(!engine.has_unsaved_changes());
    }

    #[test]
    fn test_templates_require_image_and_name() {
        let mut engine = Engine::new(EngineConfig::default());
        assert!(engine.capture_template("A").is_none());

        let other = {
            let mut e = self::engine();
            draw(&mut e, (10.0, 10.0), (20.0, 20.0));
            e.capture_template("B").unwrap()
        };
        assert!(!engine.apply_template(&other));
        assert!(engine.rectangles().is_empty());

        engine.set_image(ImageSize::new(10, 10));
        assert!(engine.capture_template("   ").is_none());
    }

    #[test]
    fn test_render_items_mark_selection() {
        let mut engine = engine();
        draw(&mut engine, (0.0, 0.0), (10.0, 10.0));
        draw(&mut engine, (20.0, 0.0), (30.0, 10.0));
        let items = engine.render_items();
        assert_eq!(items.len(), 2);
        assert!(!items[0].is_selected);
        assert!(items[1].is_selected);
        assert_eq!(items[1].x, 20.0);
    }

    #[test]
    fn test_handle_positions_follow_rotation() {
        let mut engine = engine();
        draw(&mut engine, (0.0, 45.0), (100.0, 55.0));
        engine.pointer_down(Point::new(50.0, 15.0), PointerTarget::RotateHandle);
        engine.pointer_move(Point::new(90.0, 50.0));
        engine.pointer_up();

        let rect = engine.rectangles()[0].clone();
        let handles = engine.handle_positions().unwrap();
        let (_, ne) = handles
            .resize
            .iter()
            .find(|(h, _)| *h == ResizeHandle::NE)
            .copied()
            .unwrap();
        let expected = geometry::rotate_point(
            ResizeHandle::NE.anchor(&rect),
            rect.center(),
            rect.rotation,
        );
        assert!((ne.x - expected.x).abs() < 1e-9 && (ne.y - expected.y).abs() < 1e-9);
    }
}
