// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar for choosing the active tool and the
//! zoom buttons.

use crate::engine::{Engine, Tool};

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    /// The Image tool was chosen; the host opens a file picker.
    PickImage,
}

/// Display the toolbar with tool selection buttons.
pub fn show(ui: &mut egui::Ui, engine: &mut Engine) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        let current = engine.tool();
        if ui.selectable_label(current == Tool::Select, "⬆ Select").clicked() {
            engine.set_tool(Tool::Select);
        }
        if ui.selectable_label(current == Tool::Rectangle, "▭ Rectangle").clicked() {
            engine.set_tool(Tool::Rectangle);
        }
        if ui.selectable_label(current == Tool::Image, "🖼 Image").clicked() {
            engine.set_tool(Tool::Image);
            action = ToolbarAction::PickImage;
        }

        ui.separator();

        if ui.button("−").on_hover_text("Zoom out").clicked() {
            engine.zoom_out();
        }
        ui.label(format!("{:.0}%", engine.viewport().scale * 100.0));
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            engine.zoom_in();
        }

        ui.separator();

        let tool_text = match engine.tool() {
            Tool::Select => "Click a rectangle to select and drag it, drag empty space to pan",
            Tool::Rectangle => "Drag to draw a rectangle",
            Tool::Image => "Choose an image file to annotate",
        };
        ui.label(egui::RichText::new(tool_text).italics().weak());
    });

    action
}
