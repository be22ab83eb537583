// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and rectangle annotation.
//!
//! This is the view layer over the interaction engine: it draws the image,
//! rectangles and handles with the viewport transform applied, and turns
//! egui pointer, wheel and key input into engine events.

use crate::engine::{Engine, Key, PointerTarget, RenderItem, Tool};
use crate::models::rectangle::Point;
use crate::util::geometry::CursorAffordance;

const HANDLE_FILL: egui::Color32 = egui::Color32::WHITE;
const HANDLE_STROKE: egui::Color32 = egui::Color32::BLACK;

/// Display the canvas and feed its input to the engine.
pub fn show(ui: &mut egui::Ui, engine: &mut Engine, image_texture: &Option<egui::TextureHandle>) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size() - egui::vec2(0.0, 24.0);
    let (response, painter) =
        ui.allocate_painter(available_size.max(egui::Vec2::ZERO), egui::Sense::click_and_drag());
    let origin = response.rect.min;
    painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(40));

    handle_input(ui, &response, engine, origin);

    match (image_texture, engine.image()) {
        (Some(texture), Some(size)) => {
            let viewport = engine.viewport();
            let min = to_screen(origin, viewport.image_to_screen(Point::new(0.0, 0.0)));
            let max = to_screen(origin, viewport.image_to_screen(Point::new(size.width, size.height)));
            let painter = painter.with_clip_rect(response.rect);
            painter.image(
                texture.id(),
                egui::Rect::from_min_max(min, max),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            for item in engine.render_items() {
                draw_rectangle(&painter, engine, origin, &item);
            }
            draw_handles(&painter, engine, origin);
        }
        _ => welcome(ui, response.rect),
    }

    // Status line
    ui.horizontal(|ui| {
        ui.label(format!("Current tool: {:?}", engine.tool()));
        ui.separator();
        ui.label(format!("Zoom: {:.0}%", engine.viewport().scale * 100.0));
        ui.separator();
        match engine.image() {
            Some(size) => ui.label(format!("Image {}x{}", size.width, size.height)),
            None => ui.label("No image loaded"),
        };
        if engine.has_unsaved_changes() {
            ui.separator();
            ui.label(egui::RichText::new("Unsaved changes").weak());
        }
    });
}

fn handle_input(ui: &egui::Ui, response: &egui::Response, engine: &mut Engine, origin: egui::Pos2) {
    let (pressed, released, moved, pointer, scroll) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.any_released(),
            i.pointer.delta() != egui::Vec2::ZERO,
            i.pointer.latest_pos(),
            i.raw_scroll_delta.y,
        )
    });
    let local = pointer.map(|p| Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64));

    if pressed && response.hovered() {
        response.request_focus();
        if let Some(pos) = local {
            let target = engine.target_at(pos);
            engine.pointer_down(pos, target);
        }
    }

    if moved {
        if let Some(pos) = local {
            engine.pointer_move(pos);
        }
    }

    // Released anywhere, not only over the canvas.
    if released {
        engine.pointer_up();
    }

    if response.hovered() && scroll != 0.0 {
        if let Some(pos) = local {
            engine.wheel(-scroll as f64, pos);
        }
    }

    if response.hovered() {
        if let Some(pos) = local {
            update_cursor(ui, engine, pos);
        }
    }

    route_keys(ui, response, engine);
}

/// Deliver keys only while the canvas holds keyboard focus.
fn route_keys(ui: &egui::Ui, response: &egui::Response, engine: &mut Engine) {
    let focused = response.has_focus();
    engine.set_focus(focused);
    if !focused {
        return;
    }

    // Keep arrow keys for nudging instead of focus navigation.
    ui.memory_mut(|m| {
        m.set_focus_lock_filter(
            response.id,
            egui::EventFilter {
                horizontal_arrows: true,
                vertical_arrows: true,
                ..Default::default()
            },
        )
    });

    let keys = [
        (egui::Key::Backspace, Key::Backspace),
        (egui::Key::Delete, Key::Backspace),
        (egui::Key::Enter, Key::Enter),
        (egui::Key::ArrowUp, Key::ArrowUp),
        (egui::Key::ArrowDown, Key::ArrowDown),
        (egui::Key::ArrowLeft, Key::ArrowLeft),
        (egui::Key::ArrowRight, Key::ArrowRight),
    ];
    for (egui_key, key) in keys {
        if ui.input(|i| i.key_pressed(egui_key)) {
            engine.key_down(key);
        }
    }
}

fn update_cursor(ui: &egui::Ui, engine: &Engine, pos: Point) {
    let icon = match engine.target_at(pos).cursor() {
        Some(CursorAffordance::NsResize) => egui::CursorIcon::ResizeVertical,
        Some(CursorAffordance::EwResize) => egui::CursorIcon::ResizeHorizontal,
        Some(CursorAffordance::NeswResize) => egui::CursorIcon::ResizeNeSw,
        Some(CursorAffordance::NwseResize) => egui::CursorIcon::ResizeNwSe,
        Some(CursorAffordance::Grab) => egui::CursorIcon::Grab,
        None if engine.tool() == Tool::Rectangle => egui::CursorIcon::Crosshair,
        None if engine.is_panning() => egui::CursorIcon::Grabbing,
        None => egui::CursorIcon::Default,
    };
    ui.ctx().set_cursor_icon(icon);
}

fn to_screen(origin: egui::Pos2, p: Point) -> egui::Pos2 {
    egui::pos2(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn image_to_egui(engine: &Engine, origin: egui::Pos2, p: Point) -> egui::Pos2 {
    to_screen(origin, engine.viewport().image_to_screen(p))
}

fn draw_rectangle(painter: &egui::Painter, engine: &Engine, origin: egui::Pos2, item: &RenderItem) {
    let color = egui::Color32::from_hex(&item.color).unwrap_or(egui::Color32::RED);
    let fill = if item.is_selected {
        egui::Color32::from_white_alpha(77)
    } else {
        egui::Color32::TRANSPARENT
    };
    let points = item
        .corners()
        .iter()
        .map(|p| image_to_egui(engine, origin, *p))
        .collect();
    painter.add(egui::Shape::convex_polygon(points, fill, egui::Stroke::new(2.0, color)));
}

fn draw_handles(painter: &egui::Painter, engine: &Engine, origin: egui::Pos2) {
    let Some(handles) = engine.handle_positions() else {
        return;
    };
    let radius = engine.config().handle_radius as f32;
    let stroke = egui::Stroke::new(1.0, HANDLE_STROKE);

    for (_, p) in &handles.resize {
        let pos = image_to_egui(engine, origin, *p);
        painter.circle_filled(pos, radius, HANDLE_FILL);
        painter.circle_stroke(pos, radius, stroke);
    }
    let rotate = image_to_egui(engine, origin, handles.rotate);
    painter.circle_filled(rotate, radius, HANDLE_FILL);
    painter.circle_stroke(rotate, radius, stroke);
}

fn welcome(ui: &egui::Ui, rect: egui::Rect) {
    let painter = ui.painter_at(rect);
    let center = rect.center();
    painter.text(
        center - egui::vec2(0.0, 30.0),
        egui::Align2::CENTER_CENTER,
        "ROIMARK",
        egui::FontId::proportional(32.0),
        egui::Color32::from_gray(200),
    );
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        "Rotated region annotation with reusable templates",
        egui::FontId::proportional(14.0),
        egui::Color32::from_gray(150),
    );
    painter.text(
        center + egui::vec2(0.0, 30.0),
        egui::Align2::CENTER_CENTER,
        "File → Open Image... or pick the Image tool to begin",
        egui::FontId::proportional(13.0),
        egui::Color32::from_gray(130),
    );
}
