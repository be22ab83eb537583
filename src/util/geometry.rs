// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Pure functions for rotated rectangles: the hit test used for
//! click-to-select, resize and rotate handle layout, and the incremental
//! rotation angle applied while dragging the rotate handle.

use crate::models::rectangle::{Point, Rectangle};

/// Rotate `point` about `center` by `degrees`.
///
/// This is the rendering transform: with y growing downward a positive
/// angle turns clockwise on screen.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Check whether an image-space point lies inside a rotated rectangle.
///
/// The point is un-rotated about the rectangle's center and tested against
/// the axis-aligned box, bounds inclusive.
pub fn is_point_in_rotated_rect(point: Point, rect: &Rectangle) -> bool {
    let local = rotate_point(point, rect.center(), -rect.rotation);
    local.x >= rect.x
        && local.x <= rect.x + rect.width
        && local.y >= rect.y
        && local.y <= rect.y + rect.height
}

/// Cursor shown while hovering a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAffordance {
    NsResize,
    EwResize,
    NeswResize,
    NwseResize,
    Grab,
}

/// Which of `{x, y, width, height}` a handle drag changes, and in which
/// direction. A sign of `-1` means the delta is subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleMutation {
    pub moves_x: bool,
    pub moves_y: bool,
    pub width_sign: i8,
    pub height_sign: i8,
}

/// One of the eight resize handles on a selected rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::NE,
        ResizeHandle::NW,
        ResizeHandle::SE,
        ResizeHandle::SW,
    ];

    /// Parse a compass identifier such as `"ne"`. Unknown ids yield `None`.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "n" => Some(ResizeHandle::N),
            "s" => Some(ResizeHandle::S),
            "e" => Some(ResizeHandle::E),
            "w" => Some(ResizeHandle::W),
            "ne" => Some(ResizeHandle::NE),
            "nw" => Some(ResizeHandle::NW),
            "se" => Some(ResizeHandle::SE),
            "sw" => Some(ResizeHandle::SW),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::NE => "ne",
            ResizeHandle::NW => "nw",
            ResizeHandle::SE => "se",
            ResizeHandle::SW => "sw",
        }
    }

    /// Position on the unrotated bounding box (corners and edge midpoints).
    pub fn anchor(&self, rect: &Rectangle) -> Point {
        let left = rect.x;
        let right = rect.x + rect.width;
        let top = rect.y;
        let bottom = rect.y + rect.height;
        let mid_x = rect.x + rect.width / 2.0;
        let mid_y = rect.y + rect.height / 2.0;
        match self {
            ResizeHandle::N => Point::new(mid_x, top),
            ResizeHandle::S => Point::new(mid_x, bottom),
            ResizeHandle::E => Point::new(right, mid_y),
            ResizeHandle::W => Point::new(left, mid_y),
            ResizeHandle::NE => Point::new(right, top),
            ResizeHandle::NW => Point::new(left, top),
            ResizeHandle::SE => Point::new(right, bottom),
            ResizeHandle::SW => Point::new(left, bottom),
        }
    }

    pub fn cursor(&self) -> CursorAffordance {
        match self {
            ResizeHandle::N | ResizeHandle::S => CursorAffordance::NsResize,
            ResizeHandle::E | ResizeHandle::W => CursorAffordance::EwResize,
            ResizeHandle::NE | ResizeHandle::SW => CursorAffordance::NeswResize,
            ResizeHandle::NW | ResizeHandle::SE => CursorAffordance::NwseResize,
        }
    }

    pub fn mutation(&self) -> HandleMutation {
        let (moves_x, moves_y, width_sign, height_sign) = match self {
            ResizeHandle::N => (false, true, 0, -1),
            ResizeHandle::S => (false, false, 0, 1),
            ResizeHandle::E => (false, false, 1, 0),
            ResizeHandle::W => (true, false, -1, 0),
            ResizeHandle::NE => (false, true, 1, -1),
            ResizeHandle::NW => (true, true, -1, -1),
            ResizeHandle::SE => (false, false, 1, 1),
            ResizeHandle::SW => (true, false, -1, 1),
        };
        HandleMutation {
            moves_x,
            moves_y,
            width_sign,
            height_sign,
        }
    }

    /// Mirror across the vertical axis (east <-> west).
    pub fn flipped_horizontally(&self) -> Self {
        match self {
            ResizeHandle::E => ResizeHandle::W,
            ResizeHandle::W => ResizeHandle::E,
            ResizeHandle::NE => ResizeHandle::NW,
            ResizeHandle::NW => ResizeHandle::NE,
            ResizeHandle::SE => ResizeHandle::SW,
            ResizeHandle::SW => ResizeHandle::SE,
            other => *other,
        }
    }

    /// Mirror across the horizontal axis (north <-> south).
    pub fn flipped_vertically(&self) -> Self {
        match self {
            ResizeHandle::N => ResizeHandle::S,
            ResizeHandle::S => ResizeHandle::N,
            ResizeHandle::NE => ResizeHandle::SE,
            ResizeHandle::SE => ResizeHandle::NE,
            ResizeHandle::NW => ResizeHandle::SW,
            ResizeHandle::SW => ResizeHandle::NW,
            other => *other,
        }
    }
}

/// Position of the rotate handle: `offset` above the top edge midpoint of
/// the unrotated box.
pub fn rotate_handle_anchor(rect: &Rectangle, offset: f64) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y - offset)
}

/// Apply a pointer delta through a resize handle and normalize the result.
///
/// Returns the new geometry and the handle that is active afterwards:
/// crossing the opposite edge mirrors the handle so that further movement
/// keeps following the pointer.
pub fn apply_resize(
    rect: &Rectangle,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
) -> (Rectangle, ResizeHandle) {
    let rule = handle.mutation();
    let mut next = rect.clone();

    if rule.moves_x {
        next.x += dx;
    }
    if rule.moves_y {
        next.y += dy;
    }
    next.width += f64::from(rule.width_sign) * dx;
    next.height += f64::from(rule.height_sign) * dy;

    let mut active = handle;
    if next.width < 0.0 {
        active = active.flipped_horizontally();
    }
    if next.height < 0.0 {
        active = active.flipped_vertically();
    }
    next.normalize();

    (next, active)
}

/// Damped angle in degrees swept by the pointer around `center` between two
/// successive move events.
///
/// Unlike a plain `end - start` of the two `atan2` angles, the step is
/// wrapped into `(-180, 180]` before damping. Crossing the branch cut
/// behind the center would otherwise add a near full turn in one step;
/// keep the wrap.
pub fn rotation_delta(center: Point, previous: Point, current: Point, damping: f64) -> f64 {
    let start = (previous.y - center.y).atan2(previous.x - center.x);
    let end = (current.y - center.y).atan2(current.x - center.x);
    let mut diff = (end - start).to_degrees();
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff * damping
}
