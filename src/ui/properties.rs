// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle and template side panel.
//!
//! Lists the rectangles of the working set (select, rename, delete) and the
//! saved templates (save, load, delete).

use crate::engine::Engine;
use crate::models::template::TemplateLibrary;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    SelectRectangle(usize),
    DeleteRectangle(usize),
    RenameRectangle(usize, String),
    SaveTemplate(String),
    LoadTemplate(String),
    DeleteTemplate(String),
}

/// Panel state that outlives a frame.
#[derive(Debug, Default)]
pub struct PanelState {
    pub template_name: String,
}

/// Display the panel. `busy` disables template buttons while a store call
/// is in flight.
pub fn show(
    ui: &mut egui::Ui,
    engine: &Engine,
    library: &TemplateLibrary,
    state: &mut PanelState,
    busy: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Rectangles");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("rectangles")
        .max_height(ui.available_height() * 0.5)
        .show(ui, |ui| {
            if engine.rectangles().is_empty() {
                ui.label(egui::RichText::new("No rectangles yet").weak());
            }
            for (index, rect) in engine.rectangles().iter().enumerate() {
                let selected = engine.selected() == Some(index);
                ui.horizontal(|ui| {
                    if ui.selectable_label(selected, rect.display_name(index)).clicked() {
                        action = PropertiesAction::SelectRectangle(index);
                    }
                    ui.label(
                        egui::RichText::new(format!("{:.0}x{:.0}", rect.width, rect.height)).weak(),
                    );
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = PropertiesAction::DeleteRectangle(index);
                    }
                });

                if selected {
                    ui.horizontal(|ui| {
                        ui.label("Name:");
                        let mut name = rect.name.clone().unwrap_or_default();
                        if ui.text_edit_singleline(&mut name).changed() {
                            action = PropertiesAction::RenameRectangle(index, name);
                        }
                    });
                    ui.label(
                        egui::RichText::new(format!(
                            "x {:.1}  y {:.1}  rotation {:.1}°",
                            rect.x, rect.y, rect.rotation
                        ))
                        .small()
                        .weak(),
                    );
                }
            }
        });

    ui.add_space(12.0);
    ui.heading("Templates");
    ui.separator();

    let has_image = engine.has_image();
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut state.template_name);
        let can_save = has_image && !busy && !state.template_name.trim().is_empty();
        if ui
            .add_enabled(can_save, egui::Button::new("Save"))
            .on_disabled_hover_text("Load an image and enter a name")
            .clicked()
        {
            action = PropertiesAction::SaveTemplate(state.template_name.trim().to_string());
            state.template_name.clear();
        }
    });
    if busy {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Syncing templates...");
        });
    }

    egui::ScrollArea::vertical().id_source("templates").show(ui, |ui| {
        if library.is_empty() {
            ui.label(egui::RichText::new("No saved templates").weak());
        }
        for template in library.templates() {
            ui.horizontal(|ui| {
                ui.label(&template.name);
                ui.label(
                    egui::RichText::new(format!(
                        "{} rect(s), {}x{}",
                        template.rectangles.len(),
                        template.original_image_size.width,
                        template.original_image_size.height
                    ))
                    .weak(),
                );
                if ui.add_enabled(has_image, egui::Button::new("Load")).clicked() {
                    action = PropertiesAction::LoadTemplate(template.id.clone());
                }
                if ui.add_enabled(!busy, egui::Button::new("🗑")).clicked() {
                    action = PropertiesAction::DeleteTemplate(template.id.clone());
                }
            });
        }
    });

    action
}
